use crate::*;

// row alignment of frame planes, matching what hardware decoders usually hand out
pub const FRAME_ALIGN: usize = 16;

/// Pixel layouts understood by frames and images.
///
/// Every variant can appear in a decoder-native `Frame`. Only the packed
/// RGB and gray variants can be the target of an `Image` (see `is_raster_output`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
    Gray8,
    Yuyv,
    Yuv420p,
    Nv12,
}

/// Row geometry of a single plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneLayout {
    pub row_bytes: usize,
    pub rows: usize,
}

impl PixelFormat {
    /// Bytes per pixel of the packed image formats.
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::Rgb8 => Some(3),
            PixelFormat::Rgba8 => Some(4),
            PixelFormat::Gray8 => Some(1),
            PixelFormat::Yuyv | PixelFormat::Yuv420p | PixelFormat::Nv12 => None,
        }
    }

    pub fn is_raster_output(&self) -> bool {
        self.bytes_per_pixel().is_some()
    }

    pub fn plane_count(&self) -> usize {
        match self {
            PixelFormat::Rgb8 | PixelFormat::Rgba8 | PixelFormat::Gray8 | PixelFormat::Yuyv => 1,
            PixelFormat::Nv12 => 2,
            PixelFormat::Yuv420p => 3,
        }
    }

    /// Unpadded geometry of every plane for a frame of `size`.
    ///
    /// Fails with `ImageError::Layout` when a row of `size` overflows `usize`.
    pub fn plane_layouts(&self, size: Vec2<usize>) -> Result<Vec<PlaneLayout>, ImageError> {
        let overflow = || ImageError::Layout(format!("{:?} rows of a {} frame overflow", self, size));
        let chroma = size.half_rounded_up();
        let layouts = match self {
            PixelFormat::Rgb8 | PixelFormat::Rgba8 | PixelFormat::Gray8 => {
                let bpp = self.bytes_per_pixel().unwrap_or(1);
                vec![PlaneLayout {
                    row_bytes: size.x.checked_mul(bpp).ok_or_else(overflow)?,
                    rows: size.y,
                }]
            }
            // two pixels share one U/V pair, so odd widths still occupy a full macropixel
            PixelFormat::Yuyv => vec![PlaneLayout {
                row_bytes: chroma.x.checked_mul(4).ok_or_else(overflow)?,
                rows: size.y,
            }],
            PixelFormat::Yuv420p => vec![
                PlaneLayout {
                    row_bytes: size.x,
                    rows: size.y,
                },
                PlaneLayout {
                    row_bytes: chroma.x,
                    rows: chroma.y,
                },
                PlaneLayout {
                    row_bytes: chroma.x,
                    rows: chroma.y,
                },
            ],
            PixelFormat::Nv12 => vec![
                PlaneLayout {
                    row_bytes: size.x,
                    rows: size.y,
                },
                PlaneLayout {
                    row_bytes: chroma.x.checked_mul(2).ok_or_else(overflow)?,
                    rows: chroma.y,
                },
            ],
        };
        Ok(layouts)
    }

    /// Bytes of a tightly packed `size` picture, summed over all planes.
    pub fn packed_bytes(&self, size: Vec2<usize>) -> Result<usize, ImageError> {
        self.plane_layouts(size)?
            .iter()
            .try_fold(0usize, |total, layout| {
                layout
                    .row_bytes
                    .checked_mul(layout.rows)
                    .and_then(|bytes| total.checked_add(bytes))
            })
            .ok_or_else(|| ImageError::Layout(format!("a {:?} frame of {} overflows", self, size)))
    }

    /// `(stride, len)` of every plane once rows are padded to `FRAME_ALIGN`.
    pub(crate) fn padded_planes(&self, size: Vec2<usize>) -> Result<Vec<(usize, usize)>, ImageError> {
        if size.checked_area().is_none() {
            return Err(ImageError::Layout(format!("frame size {} overflows", size)));
        }
        self.plane_layouts(size)?
            .iter()
            .map(|layout| {
                align_up(layout.row_bytes, FRAME_ALIGN)
                    .and_then(|stride| Some((stride, stride.checked_mul(layout.rows)?)))
                    .ok_or_else(|| {
                        ImageError::Layout(format!("plane of {} rows overflows", layout.rows))
                    })
            })
            .collect()
    }

    /// Bytes a decoder-native frame of `size` occupies, row padding included.
    pub fn padded_bytes(&self, size: Vec2<usize>) -> Result<usize, ImageError> {
        self.padded_planes(size)?
            .iter()
            .try_fold(0usize, |total, &(_, len)| total.checked_add(len))
            .ok_or_else(|| ImageError::Layout(format!("a {:?} frame of {} overflows", self, size)))
    }

    pub fn ensure_raster_output(&self) -> Result<(), ImageError> {
        if !self.is_raster_output() {
            return Err(ImageError::UnsupportedFormat(*self));
        }
        Ok(())
    }
}

pub(crate) fn align_up(value: usize, align: usize) -> Option<usize> {
    value.checked_next_multiple_of(align)
}

// BT.601 YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}

// BT.601 luma from RGB (fixed-point, weights sum to 256)
pub(crate) fn rgb_to_luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
}

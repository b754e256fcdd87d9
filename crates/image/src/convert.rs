use crate::*;

#[derive(Clone, Copy)]
struct Pixel {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
    // exact luma when the source carries one (YUV or gray)
    luma: Option<u8>,
}

impl Pixel {
    fn rgb(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a,
            luma: None,
        }
    }

    fn yuv(y: u8, u: u8, v: u8) -> Self {
        let (r, g, b) = yuv_to_rgb(y, u, v);
        Self {
            r,
            g,
            b,
            a: 255,
            luma: Some(y),
        }
    }

    fn gray(value: u8) -> Self {
        Self {
            r: value,
            g: value,
            b: value,
            a: 255,
            luma: Some(value),
        }
    }

    fn put(self, target: PixelFormat, dst: &mut [u8], x: usize) {
        match target {
            PixelFormat::Rgb8 => dst[x * 3..x * 3 + 3].copy_from_slice(&[self.r, self.g, self.b]),
            PixelFormat::Rgba8 => {
                dst[x * 4..x * 4 + 4].copy_from_slice(&[self.r, self.g, self.b, self.a])
            }
            PixelFormat::Gray8 => {
                dst[x] = self
                    .luma
                    .unwrap_or_else(|| rgb_to_luma(self.r, self.g, self.b))
            }
            PixelFormat::Yuyv | PixelFormat::Yuv420p | PixelFormat::Nv12 => {}
        }
    }
}

/// Convert a validated `frame` into tightly packed `target` pixels.
///
/// `out` must hold `frame.size.area()` pixels of `target`.
pub(crate) fn convert_frame(
    frame: &Frame,
    target: PixelFormat,
    out: &mut [u8],
) -> Result<(), ImageError> {
    let bpp = target
        .bytes_per_pixel()
        .ok_or(ImageError::UnsupportedFormat(target))?;
    let width = frame.size.x;
    let row_bytes = width * bpp;
    if out.len() < row_bytes * frame.size.y {
        return Err(ImageError::Layout(format!(
            "output holds {} bytes, needs {}",
            out.len(),
            row_bytes * frame.size.y
        )));
    }

    for (y, dst) in out.chunks_exact_mut(row_bytes).take(frame.size.y).enumerate() {
        match frame.format {
            PixelFormat::Rgb8 => {
                let src = frame.row(0, y);
                for x in 0..width {
                    let p = &src[x * 3..x * 3 + 3];
                    Pixel::rgb(p[0], p[1], p[2], 255).put(target, dst, x);
                }
            }
            PixelFormat::Rgba8 => {
                let src = frame.row(0, y);
                for x in 0..width {
                    let p = &src[x * 4..x * 4 + 4];
                    Pixel::rgb(p[0], p[1], p[2], p[3]).put(target, dst, x);
                }
            }
            PixelFormat::Gray8 => {
                let src = frame.row(0, y);
                for x in 0..width {
                    Pixel::gray(src[x]).put(target, dst, x);
                }
            }
            // [Y0, U, Y1, V] per pair of pixels
            PixelFormat::Yuyv => {
                let src = frame.row(0, y);
                for x in 0..width {
                    let pair = &src[(x / 2) * 4..(x / 2) * 4 + 4];
                    Pixel::yuv(pair[(x % 2) * 2], pair[1], pair[3]).put(target, dst, x);
                }
            }
            PixelFormat::Yuv420p => {
                let (luma, u, v) = (frame.row(0, y), frame.row(1, y / 2), frame.row(2, y / 2));
                for x in 0..width {
                    Pixel::yuv(luma[x], u[x / 2], v[x / 2]).put(target, dst, x);
                }
            }
            // interleaved [U, V] chroma plane
            PixelFormat::Nv12 => {
                let (luma, uv) = (frame.row(0, y), frame.row(1, y / 2));
                for x in 0..width {
                    let c = (x / 2) * 2;
                    Pixel::yuv(luma[x], uv[c], uv[c + 1]).put(target, dst, x);
                }
            }
        }
    }
    Ok(())
}

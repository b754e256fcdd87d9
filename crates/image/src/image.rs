use crate::*;

/// Application-level raster image, tightly packed rows of `format` pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    /// Allocate a zeroed image, typically a pre-allocated destination for decoding.
    pub fn alloc(size: Vec2<usize>, format: PixelFormat) -> Result<Self, ImageError> {
        let bpp = format
            .bytes_per_pixel()
            .ok_or(ImageError::UnsupportedFormat(format))?;
        let len = size
            .checked_area()
            .and_then(|area| area.checked_mul(bpp))
            .ok_or_else(|| ImageError::Layout(format!("image size {} overflows", size)))?;
        Ok(Self::new(size, vec![0; len], format))
    }

    pub fn row_bytes(&self) -> usize {
        self.size.x * self.format.bytes_per_pixel().unwrap_or(0)
    }

    /// Row `y` of the image, `None` when out of bounds.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        let row_bytes = self.row_bytes();
        if y >= self.size.y {
            return None;
        }
        self.data.get(y * row_bytes..(y + 1) * row_bytes)
    }

    /// Populate this image in place from a decoded frame.
    ///
    /// The image keeps its pixel format and takes the frame's size; strides and
    /// chroma subsampling of the frame are resolved here. Repeating the call with
    /// the same frame produces identical contents. A frame that fails validation
    /// leaves the image untouched.
    pub fn assign(&mut self, frame: &Frame) -> Result<(), ImageError> {
        self.format.ensure_raster_output()?;
        if frame.location == FrameLocation::Device {
            return Err(ImageError::DeviceFrame);
        }
        frame.validate()?;

        let len = self.format.packed_bytes(frame.size)?;
        self.data.resize(len, 0);
        convert_frame(frame, self.format, &mut self.data)?;
        self.size = frame.size;
        Ok(())
    }
}

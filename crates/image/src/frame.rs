use {crate::*, std::fmt};

/// Where the picture data of a frame lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameLocation {
    #[default]
    Host,
    /// Owned by an accelerator; must be transferred before the host can read it.
    Device,
}

#[derive(Clone, PartialEq, Eq, Default)]
pub struct Plane {
    pub data: Vec<u8>,
    pub stride: usize,
}

impl fmt::Debug for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plane")
            .field("stride", &self.stride)
            .field("len", &self.data.len())
            .finish()
    }
}

/// A decoder-native frame: planar (or packed) picture data with row strides.
///
/// Frames are obtained from a `FrameAllocator` and freed by dropping them.
/// `Frame::empty` builds an untracked frame for decoder-internal scratch use.
pub struct Frame {
    pub size: Vec2<usize>,
    pub format: PixelFormat,
    pub planes: Vec<Plane>,
    pub pts: Option<i64>,
    pub location: FrameLocation,
    lease: Option<Lease>,
}

impl Frame {
    pub fn empty() -> Self {
        Self {
            size: Vec2::new(0, 0),
            format: PixelFormat::Rgb8,
            planes: Vec::new(),
            pts: None,
            location: FrameLocation::Host,
            lease: None,
        }
    }

    pub(crate) fn leased(lease: Lease) -> Self {
        Self {
            lease: Some(lease),
            ..Self::empty()
        }
    }

    /// Whether this frame is counted by a `FrameAllocator`.
    pub fn is_tracked(&self) -> bool {
        self.lease.is_some()
    }

    /// Whether a decoder has written a picture into this frame.
    pub fn is_populated(&self) -> bool {
        !self.size.is_empty() && self.planes.len() == self.format.plane_count()
    }

    /// Shape the frame for a `size` picture in `format`, zero-filling every plane.
    ///
    /// Rows are padded to `FRAME_ALIGN` bytes. Existing plane buffers are reused.
    pub fn reshape(&mut self, size: Vec2<usize>, format: PixelFormat) -> Result<(), ImageError> {
        let geometry = format.padded_planes(size)?;
        self.planes.resize_with(geometry.len(), Plane::default);
        for (plane, (stride, len)) in self.planes.iter_mut().zip(geometry) {
            plane.stride = stride;
            plane.data.clear();
            plane.data.resize(len, 0);
        }
        self.size = size;
        self.format = format;
        Ok(())
    }

    /// Drop the picture and its planes.
    pub fn clear(&mut self) {
        self.size = Vec2::new(0, 0);
        self.planes.clear();
        self.pts = None;
        self.location = FrameLocation::Host;
    }

    /// Copy picture data, geometry and pts from `other`; the copy is host resident.
    pub fn copy_picture_from(&mut self, other: &Frame) {
        self.size = other.size;
        self.format = other.format;
        self.pts = other.pts;
        self.location = FrameLocation::Host;
        self.planes.clone_from(&other.planes);
    }

    /// Write packed rows of `row_bytes` each into plane `index`, honouring its stride.
    pub fn write_rows(&mut self, index: usize, source: &[u8], row_bytes: usize) -> Result<(), ImageError> {
        let plane = self
            .planes
            .get_mut(index)
            .ok_or_else(|| ImageError::Layout(format!("frame has no plane {}", index)))?;
        if row_bytes == 0 {
            return Ok(());
        }
        if row_bytes > plane.stride {
            return Err(ImageError::Layout(format!(
                "row of {} bytes exceeds stride {}",
                row_bytes, plane.stride
            )));
        }
        for (src, dst) in source
            .chunks_exact(row_bytes)
            .zip(plane.data.chunks_exact_mut(plane.stride))
        {
            dst[..row_bytes].copy_from_slice(src);
        }
        Ok(())
    }

    /// Check that every plane is large enough for the declared size and format.
    pub fn validate(&self) -> Result<(), ImageError> {
        if !self.is_populated() {
            return Err(ImageError::EmptyFrame);
        }
        let layouts = self.format.plane_layouts(self.size)?;
        for (index, (plane, layout)) in self.planes.iter().zip(layouts).enumerate() {
            if plane.stride < layout.row_bytes {
                return Err(ImageError::Layout(format!(
                    "plane {} stride {} is shorter than a {} byte row",
                    index, plane.stride, layout.row_bytes
                )));
            }
            let needed = match layout.rows {
                0 => Some(0),
                rows => plane
                    .stride
                    .checked_mul(rows - 1)
                    .and_then(|bytes| bytes.checked_add(layout.row_bytes)),
            }
            .ok_or_else(|| ImageError::Layout(format!("plane {} overflows", index)))?;
            if plane.data.len() < needed {
                return Err(ImageError::Layout(format!(
                    "plane {} holds {} bytes, needs {}",
                    index,
                    plane.data.len(),
                    needed
                )));
            }
        }
        Ok(())
    }

    /// Row `y` of plane `index`. Callers validate the frame first.
    pub(crate) fn row(&self, index: usize, y: usize) -> &[u8] {
        let plane = &self.planes[index];
        &plane.data[y * plane.stride..]
    }
}

impl Clone for Frame {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            format: self.format,
            planes: self.planes.clone(),
            pts: self.pts,
            location: self.location,
            lease: self.lease.clone(),
        }
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.format == other.format
            && self.planes == other.planes
            && self.pts == other.pts
            && self.location == other.location
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("size", &self.size)
            .field("format", &self.format)
            .field("planes", &self.planes)
            .field("pts", &self.pts)
            .field("location", &self.location)
            .field("tracked", &self.is_tracked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reshape_pads_rows() {
        let mut frame = Frame::empty();
        frame.reshape(Vec2::new(5, 3), PixelFormat::Yuv420p).unwrap();
        assert_eq!(frame.planes.len(), 3);
        assert_eq!(frame.planes[0].stride, 16);
        assert_eq!(frame.planes[0].data.len(), 48);
        assert_eq!(frame.planes[1].stride, 16);
        assert_eq!(frame.planes[1].data.len(), 32);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_write_rows_respects_stride() {
        let mut frame = Frame::empty();
        frame.reshape(Vec2::new(2, 2), PixelFormat::Gray8).unwrap();
        frame.write_rows(0, &[1, 2, 3, 4], 2).unwrap();
        assert_eq!(&frame.planes[0].data[0..2], &[1, 2]);
        assert_eq!(&frame.planes[0].data[16..18], &[3, 4]);
    }

    #[test]
    fn test_validate_short_plane() {
        let mut frame = Frame::empty();
        frame.reshape(Vec2::new(4, 4), PixelFormat::Gray8).unwrap();
        frame.planes[0].data.truncate(10);
        assert!(matches!(frame.validate(), Err(ImageError::Layout(_))));
    }

    #[test]
    fn test_clear() {
        let mut frame = Frame::empty();
        frame.reshape(Vec2::new(4, 4), PixelFormat::Rgb8).unwrap();
        assert!(frame.is_populated());
        frame.clear();
        assert!(!frame.is_populated());
        assert!(matches!(frame.validate(), Err(ImageError::EmptyFrame)));
    }

    #[test]
    fn test_reshape_oversized_fails() {
        let mut frame = Frame::empty();
        let result = frame.reshape(Vec2::new(usize::MAX / 2, 2), PixelFormat::Yuyv);
        assert!(matches!(result, Err(ImageError::Layout(_))));
        assert!(!frame.is_populated());
    }
}

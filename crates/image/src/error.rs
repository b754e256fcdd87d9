use {crate::PixelFormat, std::fmt};

#[derive(Debug)]
pub enum ImageError {
    Decode(String),
    Encode(String),
    Layout(String),
    UnsupportedFormat(PixelFormat),
    EmptyFrame,
    DeviceFrame,
    Exhausted { limit: usize },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Decode(msg) => write!(f, "decode error: {msg}"),
            ImageError::Encode(msg) => write!(f, "encode error: {msg}"),
            ImageError::Layout(msg) => write!(f, "layout error: {msg}"),
            ImageError::UnsupportedFormat(format) => {
                write!(f, "unsupported pixel format: {format:?}")
            }
            ImageError::EmptyFrame => write!(f, "frame holds no picture"),
            ImageError::DeviceFrame => {
                write!(f, "frame is device resident, transfer it to host memory first")
            }
            ImageError::Exhausted { limit } => {
                write!(f, "frame allocator exhausted ({limit} frames live)")
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl From<crates_image::ImageError> for ImageError {
    fn from(err: crates_image::ImageError) -> Self {
        ImageError::Decode(err.to_string())
    }
}

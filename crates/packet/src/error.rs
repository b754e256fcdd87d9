use {image::ImageError, std::fmt};

/// Failures of the media unit itself: payload holds and image extraction.
#[derive(Debug)]
pub enum PacketError {
    /// The source payload has no data to hold on to.
    Unfilled,
    /// Image extraction was asked for before a successful decode.
    NoFrame,
    /// The unit has no image and the caller supplied no destination.
    NoImage,
    Image(ImageError),
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketError::Unfilled => write!(f, "payload is unfilled"),
            PacketError::NoFrame => write!(f, "no decoded frame, decode first"),
            PacketError::NoImage => write!(f, "no image held and no pre-allocated image supplied"),
            PacketError::Image(err) => write!(f, "image error: {err}"),
        }
    }
}

impl std::error::Error for PacketError {}

impl From<ImageError> for PacketError {
    fn from(err: ImageError) -> Self {
        PacketError::Image(err)
    }
}

/// Failures on the decode path. None of them is fatal to a pipeline; the
/// caller skips the unit and carries on with the next one.
#[derive(Debug)]
pub enum DecodeError {
    /// No frame available yet; the decoder wants more input.
    Again,
    /// The decoder has been drained.
    Eof,
    /// The unit already holds a decoded frame.
    FramePresent,
    /// The decoder refused the payload.
    Rejected(String),
    /// The decoder failed to produce a frame from accepted input.
    Corrupt(String),
    /// Copying a device frame to host memory failed.
    Transfer(String),
    /// No destination frame could be allocated.
    Allocation(ImageError),
    Config(String),
}

impl DecodeError {
    /// Expected under normal streaming conditions (reordering, partial GOPs).
    pub fn is_again(&self) -> bool {
        matches!(self, DecodeError::Again)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Again => write!(f, "no frame available yet"),
            DecodeError::Eof => write!(f, "end of stream"),
            DecodeError::FramePresent => write!(f, "unit already holds a decoded frame"),
            DecodeError::Rejected(msg) => write!(f, "payload rejected: {msg}"),
            DecodeError::Corrupt(msg) => write!(f, "unable to receive frame: {msg}"),
            DecodeError::Transfer(msg) => write!(f, "unable to transfer frame: {msg}"),
            DecodeError::Allocation(err) => write!(f, "frame allocation failed: {err}"),
            DecodeError::Config(msg) => write!(f, "decoder configuration error: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}

use base::Vec2;

/// Compressed formats the bundled decoders understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Mjpeg,
    Yuyv,
}

/// Which decoder API generation to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderApi {
    SendReceive,
    OneShot,
}

/// Configuration for opening a `DecodeContext`.
#[derive(Clone, Debug)]
pub struct DecoderConfig {
    codec: Codec,
    api: DecoderApi,
    size: Option<Vec2<usize>>,
    hw_accel: bool,
    max_frames: Option<usize>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            codec: Codec::Mjpeg,
            api: DecoderApi::SendReceive,
            size: None,
            hw_accel: false,
            max_frames: None,
        }
    }
}

impl DecoderConfig {
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_api(mut self, api: DecoderApi) -> Self {
        self.api = api;
        self
    }

    /// Picture size, required for headerless streams such as raw YUYV.
    pub fn with_size(mut self, size: Vec2<usize>) -> Self {
        self.size = Some(size);
        self
    }

    /// Prefer hardware decoding; falls back to software when no device is available.
    pub fn with_hw_accel(mut self, hw_accel: bool) -> Self {
        self.hw_accel = hw_accel;
        self
    }

    /// Upper bound on decoded frames alive at once.
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn api(&self) -> DecoderApi {
        self.api
    }

    pub fn size(&self) -> Option<Vec2<usize>> {
        self.size
    }

    pub fn hw_accel(&self) -> bool {
        self.hw_accel
    }

    pub fn max_frames(&self) -> Option<usize> {
        self.max_frames
    }
}

use {
    crate::*,
    image::{Frame, FrameAllocator, PixelFormat},
    std::fmt,
};

/// A decode strategy together with the allocator its destination frames come from.
pub struct DecodeContext {
    strategy: Box<dyn DecodeStrategy>,
    allocator: FrameAllocator,
}

impl DecodeContext {
    /// Open one of the bundled decoders.
    pub fn open(config: &DecoderConfig) -> Result<Self, DecodeError> {
        if config.hw_accel() {
            // none of the bundled codecs has a hardware path
            log::warn!(
                "no hardware decoder for {:?}, falling back to software",
                config.codec()
            );
        }

        let strategy: Box<dyn DecodeStrategy> = match config.codec() {
            Codec::Mjpeg => match config.api() {
                DecoderApi::SendReceive => Box::new(SoftwareDecode::new(MjpegDecoder::new())),
                DecoderApi::OneShot => Box::new(LegacyDecode::new(MjpegDecoder::new())),
            },
            Codec::Yuyv => {
                let size = config
                    .size()
                    .filter(|size| !size.is_empty())
                    .ok_or_else(|| {
                        DecodeError::Config("raw YUYV decoding needs a frame size".to_string())
                    })?;
                // a frame of this size must be representable once padded for decoding
                PixelFormat::Yuyv
                    .padded_bytes(size)
                    .map_err(|e| DecodeError::Config(e.to_string()))?;
                match config.api() {
                    DecoderApi::SendReceive => {
                        Box::new(SoftwareDecode::new(YuyvDecoder::new(size)))
                    }
                    DecoderApi::OneShot => Box::new(LegacyDecode::new(YuyvDecoder::new(size))),
                }
            }
        };

        let allocator = match config.max_frames() {
            Some(limit) => FrameAllocator::with_limit(limit),
            None => FrameAllocator::new(),
        };

        log::info!(
            "opened {:?} decoder, {} strategy",
            config.codec(),
            strategy.name()
        );
        Ok(Self {
            strategy,
            allocator,
        })
    }

    /// Wrap any decode strategy, e.g. one driving an external decoder library.
    pub fn with_strategy(strategy: impl DecodeStrategy + 'static, allocator: FrameAllocator) -> Self {
        Self {
            strategy: Box::new(strategy),
            allocator,
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn is_hw_accelerated(&self) -> bool {
        self.strategy.is_hw_accelerated()
    }

    pub fn allocator(&self) -> &FrameAllocator {
        &self.allocator
    }

    pub(crate) fn allocate_frame(&self) -> Result<Frame, DecodeError> {
        self.allocator.allocate().map_err(DecodeError::Allocation)
    }

    pub(crate) fn run(
        &mut self,
        payload: &Payload,
        frame: &mut Frame,
        scratch: &mut Held<'_, Vec<u8>>,
    ) -> Result<(), DecodeError> {
        self.strategy.decode(payload, frame, scratch)
    }
}

impl fmt::Debug for DecodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeContext")
            .field("strategy", &self.strategy.name())
            .field("live_frames", &self.allocator.live())
            .finish()
    }
}

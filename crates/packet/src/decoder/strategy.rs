use {
    crate::*,
    image::{Frame, FrameLocation},
};

/// Send/receive decoding straight into the destination frame.
pub struct SoftwareDecode<D> {
    decoder: D,
}

impl<D: SendReceive> SoftwareDecode<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }
}

impl<D: SendReceive> DecodeStrategy for SoftwareDecode<D> {
    fn name(&self) -> &'static str {
        "software"
    }

    fn decode(
        &mut self,
        payload: &Payload,
        frame: &mut Frame,
        _scratch: &mut Held<'_, Vec<u8>>,
    ) -> Result<(), DecodeError> {
        self.decoder.send_packet(payload)?;
        self.decoder.receive_frame(frame)
    }
}

/// Send/receive decoding into a device frame, then a transfer to the host.
pub struct HardwareDecode<D> {
    decoder: D,
    device_frame: Frame,
}

impl<D: SendReceive + HwTransfer> HardwareDecode<D> {
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            device_frame: Frame::empty(),
        }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }
}

impl<D: SendReceive + HwTransfer> DecodeStrategy for HardwareDecode<D> {
    fn name(&self) -> &'static str {
        "hardware"
    }

    fn is_hw_accelerated(&self) -> bool {
        true
    }

    fn decode(
        &mut self,
        payload: &Payload,
        frame: &mut Frame,
        scratch: &mut Held<'_, Vec<u8>>,
    ) -> Result<(), DecodeError> {
        self.decoder.send_packet(payload)?;
        self.device_frame.clear();
        self.decoder.receive_frame(&mut self.device_frame)?;
        let staging = scratch.get_or_insert_with(Vec::new);
        self.decoder.transfer(frame, &self.device_frame, staging)?;
        if frame.location != FrameLocation::Host {
            return Err(DecodeError::Transfer(
                "frame still device resident after transfer".to_string(),
            ));
        }
        Ok(())
    }
}

/// One-call decoding through the older API; an incomplete frame is `Again`.
pub struct LegacyDecode<D> {
    decoder: D,
}

impl<D: OneShot> LegacyDecode<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }
}

impl<D: OneShot> DecodeStrategy for LegacyDecode<D> {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn decode(
        &mut self,
        payload: &Payload,
        frame: &mut Frame,
        _scratch: &mut Held<'_, Vec<u8>>,
    ) -> Result<(), DecodeError> {
        if self.decoder.decode_video(frame, payload)? {
            Ok(())
        } else {
            log::debug!("incomplete frame");
            Err(DecodeError::Again)
        }
    }
}

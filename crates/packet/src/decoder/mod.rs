//! The contract between a media unit and an external decoder.
//!
//! Two decoder API generations are supported: `SendReceive` (submit a payload,
//! then retrieve a frame) and the older `OneShot` (one call that may report an
//! incomplete frame). `HwTransfer` is the extra step hardware decoders need to
//! move a device-resident frame into host memory.
//!
//! A `DecodeStrategy` wraps one decoder behind a single call and is chosen once,
//! when the `DecodeContext` is opened.

use {
    crate::*,
    image::Frame,
};

mod mjpeg;
pub use mjpeg::*;

mod strategy;
pub use strategy::*;

mod yuyv;
pub use yuyv::*;

pub trait SendReceive: Send {
    /// Submit one payload. `DecodeError::Again` means frames must be received first.
    fn send_packet(&mut self, payload: &Payload) -> Result<(), DecodeError>;

    /// Retrieve the next frame. `DecodeError::Again` means more input is needed.
    fn receive_frame(&mut self, frame: &mut Frame) -> Result<(), DecodeError>;
}

pub trait OneShot: Send {
    /// Decode one payload. `Ok(false)` means the payload was consumed but no
    /// complete frame came out of it.
    fn decode_video(&mut self, frame: &mut Frame, payload: &Payload) -> Result<bool, DecodeError>;
}

pub trait HwTransfer {
    /// Copy `device` into the host frame `host`, staging through `staging`.
    fn transfer(
        &mut self,
        host: &mut Frame,
        device: &Frame,
        staging: &mut Vec<u8>,
    ) -> Result<(), DecodeError>;
}

pub trait DecodeStrategy: Send {
    fn name(&self) -> &'static str;

    fn is_hw_accelerated(&self) -> bool {
        false
    }

    /// Decode `payload` into `frame`. `scratch` is the unit's intermediate buffer,
    /// allocated on first use by strategies that need one.
    fn decode(
        &mut self,
        payload: &Payload,
        frame: &mut Frame,
        scratch: &mut Held<'_, Vec<u8>>,
    ) -> Result<(), DecodeError>;
}

/// Bundled decoders refuse payloads the capture side already flagged as corrupt.
pub(crate) fn reject_corrupt(payload: &Payload) -> Result<(), DecodeError> {
    if payload.is_corrupt() {
        return Err(DecodeError::Rejected("payload is flagged corrupt".to_string()));
    }
    Ok(())
}

use {
    crate::*,
    super::reject_corrupt,
    image::{Frame, decode_jpeg},
    std::collections::VecDeque,
};

// payloads accepted before the caller has to receive frames
const MAX_PENDING: usize = 4;

/// Motion-JPEG decoder. Every payload is a complete, independently coded picture.
#[derive(Debug, Default)]
pub struct MjpegDecoder {
    pending: VecDeque<Payload>,
}

impl MjpegDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads submitted but not yet received.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drop everything queued, e.g. after a seek.
    pub fn flush(&mut self) {
        self.pending.clear();
    }
}

fn decode_into(payload: &Payload, frame: &mut Frame) -> Result<(), DecodeError> {
    decode_jpeg(payload.data(), frame).map_err(|e| DecodeError::Corrupt(e.to_string()))?;
    frame.pts = payload.pts;
    Ok(())
}

impl SendReceive for MjpegDecoder {
    fn send_packet(&mut self, payload: &Payload) -> Result<(), DecodeError> {
        reject_corrupt(payload)?;
        if self.pending.len() >= MAX_PENDING {
            return Err(DecodeError::Again);
        }
        let held = payload
            .acquire()
            .map_err(|e| DecodeError::Rejected(e.to_string()))?;
        self.pending.push_back(held);
        Ok(())
    }

    fn receive_frame(&mut self, frame: &mut Frame) -> Result<(), DecodeError> {
        let payload = self.pending.pop_front().ok_or(DecodeError::Again)?;
        decode_into(&payload, frame)
    }
}

impl OneShot for MjpegDecoder {
    fn decode_video(&mut self, frame: &mut Frame, payload: &Payload) -> Result<bool, DecodeError> {
        if !payload.is_filled() {
            return Ok(false);
        }
        reject_corrupt(payload)?;
        decode_into(payload, frame)?;
        Ok(true)
    }
}

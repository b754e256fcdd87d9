use {
    crate::*,
    super::reject_corrupt,
    base::Vec2,
    image::{Frame, FrameLocation, PixelFormat},
};

/// Raw YUYV 4:2:2 "decoder": copies packed camera rows into a strided frame.
///
/// The stream carries no header, so the picture size is fixed at construction.
/// A payload shorter than one picture is an incomplete frame.
#[derive(Debug)]
pub struct YuyvDecoder {
    size: Vec2<usize>,
    pending: Option<Payload>,
}

impl YuyvDecoder {
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            pending: None,
        }
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    /// Bytes in one packed picture. Fails when the picture size overflows.
    pub fn frame_bytes(&self) -> Result<usize, DecodeError> {
        PixelFormat::Yuyv
            .packed_bytes(self.size)
            .map_err(|e| DecodeError::Config(e.to_string()))
    }

    fn decode_into(&self, payload: &Payload, frame: &mut Frame) -> Result<bool, DecodeError> {
        reject_corrupt(payload)?;
        let needed = self.frame_bytes()?;
        if payload.size() < needed {
            return Ok(false);
        }
        let row_bytes = needed / self.size.y.max(1);
        frame
            .reshape(self.size, PixelFormat::Yuyv)
            .and_then(|_| frame.write_rows(0, &payload.data()[..needed], row_bytes))
            .map_err(|e| DecodeError::Corrupt(e.to_string()))?;
        frame.pts = payload.pts;
        frame.location = FrameLocation::Host;
        Ok(true)
    }
}

impl OneShot for YuyvDecoder {
    fn decode_video(&mut self, frame: &mut Frame, payload: &Payload) -> Result<bool, DecodeError> {
        self.decode_into(payload, frame)
    }
}

impl SendReceive for YuyvDecoder {
    fn send_packet(&mut self, payload: &Payload) -> Result<(), DecodeError> {
        reject_corrupt(payload)?;
        if self.pending.is_some() {
            return Err(DecodeError::Again);
        }
        let held = payload
            .acquire()
            .map_err(|e| DecodeError::Rejected(e.to_string()))?;
        self.pending = Some(held);
        Ok(())
    }

    fn receive_frame(&mut self, frame: &mut Frame) -> Result<(), DecodeError> {
        let payload = self.pending.take().ok_or(DecodeError::Again)?;
        if self.decode_into(&payload, frame)? {
            Ok(())
        } else {
            Err(DecodeError::Corrupt(format!(
                "payload holds {} bytes, a {} frame needs {}",
                payload.size(),
                self.size,
                self.frame_bytes()?
            )))
        }
    }
}

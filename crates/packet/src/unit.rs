use {
    crate::*,
    image::{Frame, Image},
    std::{fmt, time::SystemTime},
};

/// One unit of media on its way through a capture-decode pipeline.
///
/// A unit holds up to three representations of the same picture: the encoded
/// payload, the decoder-native frame produced by `decode`, and an application
/// image filled by `get_image`. Each buffer sits in its own `Held` slot, so the
/// unit always knows what it must free:
///
/// - the payload is a reference-counted hold, released on `reset` and drop
/// - the frame and the scratch buffer are owned, freed on `reset` and drop
/// - the image is owned when the unit was built from one (`from_image`,
///   `from_decoded`) and freed on drop; an image supplied to `get_image` or
///   `set_image` is borrowed and handed back untouched
///
/// `reset` leaves the image alone so the unit can be refilled with the next payload.
/// A unit is not synchronised: pipeline stages pass it along by value.
pub struct MediaUnit<'a> {
    payload: Payload,
    frame: Held<'a, Frame>,
    scratch: Held<'a, Vec<u8>>,
    image: Held<'a, Image>,
    keyframe: bool,
    timestamp: SystemTime,
}

impl<'a> MediaUnit<'a> {
    /// An empty unit: unfilled payload, no frame, no image.
    pub fn new() -> Self {
        Self {
            payload: Payload::empty(),
            frame: Held::Absent,
            scratch: Held::Absent,
            image: Held::Absent,
            keyframe: false,
            timestamp: SystemTime::UNIX_EPOCH,
        }
    }

    /// A unit carrying a raw picture. The unit owns the image and frees it on drop.
    ///
    /// A raw picture is complete on its own, so the unit is a keyframe.
    pub fn from_image(image: Image) -> Self {
        let mut unit = Self::new();
        unit.image = Held::Owned(image);
        unit.keyframe = true;
        unit
    }

    /// A unit holding `payload`, stamped with the current time.
    pub fn from_payload(payload: &Payload) -> Result<Self, PacketError> {
        let mut unit = Self::new();
        unit.set_payload(payload)?;
        Ok(unit)
    }

    /// A unit holding `payload`, stamped with the arrival time the caller observed.
    pub fn from_payload_at(payload: &Payload, timestamp: SystemTime) -> Result<Self, PacketError> {
        let mut unit = Self::from_payload(payload)?;
        unit.timestamp = timestamp;
        Ok(unit)
    }

    /// A unit that only carries results decoded upstream. It owns `frame` and `image`.
    pub fn from_decoded(payload: &Payload, frame: Frame, image: Image) -> Result<Self, PacketError> {
        let mut unit = Self::from_payload(payload)?;
        unit.frame = Held::Owned(frame);
        unit.image = Held::Owned(image);
        Ok(unit)
    }

    /// Hold `payload`, replacing any previous hold.
    ///
    /// The arrival time is stamped to now (never moving backwards) and the
    /// keyframe flag is taken from the new payload, even when replacing. When
    /// no hold can be taken the unit is left as it was.
    pub fn set_payload(&mut self, payload: &Payload) -> Result<&Payload, PacketError> {
        let held = payload.acquire().inspect_err(|error| {
            log::error!("error taking a hold on payload: {}", error);
        })?;
        self.payload = held;
        self.timestamp = SystemTime::now().max(self.timestamp);
        self.keyframe = self.payload.is_keyframe();
        Ok(&self.payload)
    }

    /// Decode the held payload into a freshly allocated frame.
    ///
    /// Fails without calling the decoder if a frame is already present. Any
    /// decoder failure frees the destination frame, so the unit is left
    /// without one. `DecodeError::Again` is routine for streams with delayed
    /// frames; callers move on to the next unit.
    pub fn decode(&mut self, context: &mut DecodeContext) -> Result<(), DecodeError> {
        log::debug!("about to decode {} byte payload", self.payload.size());

        if self.frame.is_present() {
            log::error!("already have a frame, refusing to decode again");
            return Err(DecodeError::FramePresent);
        }

        let mut frame = context.allocate_frame().inspect_err(|error| {
            log::error!("unable to allocate frame: {}", error);
        })?;

        let result = context
            .run(&self.payload, &mut frame, &mut self.scratch)
            .and_then(|_| {
                if frame.is_populated() {
                    Ok(())
                } else {
                    Err(DecodeError::Corrupt("decoder returned an empty frame".to_string()))
                }
            });

        match result {
            Ok(()) => {
                self.frame = Held::Owned(frame);
                Ok(())
            }
            Err(error) => {
                if error.is_again() {
                    log::debug!("no frame yet: {}", error);
                } else {
                    log::error!("unable to decode: {}", error);
                }
                Err(error)
            }
        }
    }

    /// Fill the unit's image from the decoded frame and return it.
    ///
    /// Without a decoded frame this fails and nothing changes. If the unit has
    /// no image yet, `preallocated` is filled and becomes its (borrowed) image,
    /// but only once the fill succeeded; if it has one, `preallocated` is
    /// ignored. Repeated calls on the same frame write identical contents.
    pub fn get_image(&mut self, preallocated: Option<&'a mut Image>) -> Result<&mut Image, PacketError> {
        let Some(frame) = self.frame.get() else {
            log::error!("can't get image without a frame, decode first");
            return Err(PacketError::NoFrame);
        };

        match self.image.get_mut() {
            Some(image) => image.assign(frame).inspect_err(|error| {
                log::error!("unable to assign image: {}", error);
            })?,
            None => {
                let Some(image) = preallocated else {
                    log::error!("need a pre-allocated image buffer");
                    return Err(PacketError::NoImage);
                };
                image.assign(frame).inspect_err(|error| {
                    log::error!("unable to assign pre-allocated image: {}", error);
                })?;
                self.image = Held::Borrowed(image);
            }
        }

        self.image.get_mut().ok_or(PacketError::NoImage)
    }

    /// Point the unit at a caller-owned image, borrowed from now on.
    ///
    /// An image the unit owned until now is returned rather than freed.
    pub fn set_image(&mut self, image: &'a mut Image) -> Option<Image> {
        std::mem::replace(&mut self.image, Held::Borrowed(image)).into_owned()
    }

    /// Move an owned image out of the unit. Borrowed images stay put.
    pub fn take_image(&mut self) -> Option<Image> {
        self.image.take_owned()
    }

    /// Release payload, frame and scratch buffer, ready for a new payload.
    ///
    /// The image survives. Safe to call any number of times.
    pub fn reset(&mut self) {
        self.release_buffers();
    }

    fn release_buffers(&mut self) {
        self.payload.release();
        self.frame.release();
        self.scratch.release();
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_keyframe(&self) -> bool {
        self.keyframe
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.get()
    }

    pub fn has_frame(&self) -> bool {
        self.frame.is_present()
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.get()
    }

    pub fn image_ownership(&self) -> Ownership {
        self.image.ownership()
    }

    /// Length of the scratch buffer, 0 when none was allocated.
    pub fn scratch_len(&self) -> usize {
        self.scratch.get().map_or(0, Vec::len)
    }
}

impl Default for MediaUnit<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MediaUnit<'_> {
    fn drop(&mut self) {
        self.release_buffers();
        // owned images are freed here, borrowed ones go back to their owner
        self.image.release();
    }
}

impl fmt::Debug for MediaUnit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaUnit")
            .field("payload", &self.payload)
            .field("keyframe", &self.keyframe)
            .field("timestamp", &self.timestamp)
            .field("frame", &self.frame.ownership())
            .field("scratch", &self.scratch.ownership())
            .field("image", &self.image.ownership())
            .finish()
    }
}

use {
    crate::*,
    bitflags::bitflags,
    std::{fmt, sync::Arc},
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PayloadFlags: u32 {
        /// Decodable without reference to earlier payloads.
        const KEY = 0x0001;
        /// The capture side knows the bytes are damaged.
        const CORRUPT = 0x0002;
    }
}

/// A hold on the encoded bytes of one media unit.
///
/// The bytes are reference counted: `acquire` takes another hold on the same
/// storage and `release` (or drop) gives one back. The storage is freed when
/// the last hold goes. A payload of size 0 is "unfilled".
#[derive(Default)]
pub struct Payload {
    data: Option<Arc<[u8]>>,
    pub flags: PayloadFlags,
    pub pts: Option<i64>,
    pub dts: Option<i64>,
    pub stream_index: usize,
}

impl Payload {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        let data: Arc<[u8]> = data.into();
        Self {
            data: (!data.is_empty()).then_some(data),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_flags(mut self, flags: PayloadFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_pts(mut self, pts: i64) -> Self {
        self.pts = Some(pts);
        self
    }

    pub fn with_dts(mut self, dts: i64) -> Self {
        self.dts = Some(dts);
        self
    }

    pub fn with_stream_index(mut self, stream_index: usize) -> Self {
        self.stream_index = stream_index;
        self
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    pub fn size(&self) -> usize {
        self.data().len()
    }

    pub fn is_filled(&self) -> bool {
        self.size() > 0
    }

    pub fn is_keyframe(&self) -> bool {
        self.flags.contains(PayloadFlags::KEY)
    }

    pub fn is_corrupt(&self) -> bool {
        self.flags.contains(PayloadFlags::CORRUPT)
    }

    /// Number of holds on the underlying storage, 0 when unfilled.
    pub fn hold_count(&self) -> usize {
        self.data.as_ref().map_or(0, Arc::strong_count)
    }

    pub fn shares_storage_with(&self, other: &Payload) -> bool {
        match (&self.data, &other.data) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Take a new hold on the same bytes, copying the metadata.
    pub fn acquire(&self) -> Result<Payload, PacketError> {
        let data = self.data.as_ref().ok_or(PacketError::Unfilled)?;
        Ok(Payload {
            data: Some(Arc::clone(data)),
            flags: self.flags,
            pts: self.pts,
            dts: self.dts,
            stream_index: self.stream_index,
        })
    }

    /// Give this hold back and return to the unfilled state. Repeat calls are no-ops.
    pub fn release(&mut self) {
        *self = Payload::empty();
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("size", &self.size())
            .field("flags", &self.flags)
            .field("pts", &self.pts)
            .field("dts", &self.dts)
            .field("stream_index", &self.stream_index)
            .field("holds", &self.hold_count())
            .finish()
    }
}

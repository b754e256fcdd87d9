use {
    crate::*,
    std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

#[derive(Debug, Default)]
struct Counters {
    live: AtomicUsize,
    total: AtomicUsize,
}

/// Hands out decoder-native frames and keeps count of the ones still alive.
///
/// Freeing a frame is dropping it. Clones of the allocator share counters, so a
/// pipeline can hold one handle while the decode context holds another. When a
/// limit is set, `allocate` fails once that many frames are alive.
#[derive(Clone, Debug, Default)]
pub struct FrameAllocator {
    counters: Arc<Counters>,
    limit: Option<usize>,
}

impl FrameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            counters: Arc::default(),
            limit: Some(limit),
        }
    }

    /// Allocate an empty frame, ready to be shaped by a decoder.
    pub fn allocate(&self) -> Result<Frame, ImageError> {
        let reserved = self
            .counters
            .live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| match self.limit {
                Some(limit) if live >= limit => None,
                _ => Some(live + 1),
            });
        if reserved.is_err() {
            let limit = self.limit.unwrap_or(0);
            log::warn!("frame allocator exhausted, {} frames live", limit);
            return Err(ImageError::Exhausted { limit });
        }
        self.counters.total.fetch_add(1, Ordering::Relaxed);
        Ok(Frame::leased(Lease {
            counters: Arc::clone(&self.counters),
        }))
    }

    /// Frames allocated here (or cloned from one) that have not been dropped.
    pub fn live(&self) -> usize {
        self.counters.live.load(Ordering::Acquire)
    }

    /// Frames handed out by `allocate`. Clones of a frame are not counted.
    pub fn total_allocated(&self) -> usize {
        self.counters.total.load(Ordering::Relaxed)
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

/// Accounting token carried by every allocated frame.
pub(crate) struct Lease {
    counters: Arc<Counters>,
}

impl Clone for Lease {
    fn clone(&self) -> Self {
        self.counters.live.fetch_add(1, Ordering::AcqRel);
        Self {
            counters: Arc::clone(&self.counters),
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::AcqRel);
    }
}

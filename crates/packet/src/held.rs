use std::fmt;

/// How a unit holds one of its buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Absent,
    /// The unit frees the buffer on reset or drop.
    Owned,
    /// The caller keeps the buffer and frees it; the unit only writes into it.
    Borrowed,
}

/// A buffer slot that records whether its content is owned or borrowed.
///
/// Releasing a slot is idempotent: owned content is handed back (and freed by
/// the caller dropping it), a borrow is simply forgotten, and the slot is left
/// `Absent`.
pub enum Held<'a, T> {
    Absent,
    Owned(T),
    Borrowed(&'a mut T),
}

impl<T> Default for Held<'_, T> {
    fn default() -> Self {
        Held::Absent
    }
}

impl<'a, T> Held<'a, T> {
    pub fn ownership(&self) -> Ownership {
        match self {
            Held::Absent => Ownership::Absent,
            Held::Owned(_) => Ownership::Owned,
            Held::Borrowed(_) => Ownership::Borrowed,
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Held::Absent)
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Held::Absent => None,
            Held::Owned(value) => Some(value),
            Held::Borrowed(value) => Some(&**value),
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Held::Absent => None,
            Held::Owned(value) => Some(value),
            Held::Borrowed(value) => Some(&mut **value),
        }
    }

    /// The content, creating an owned value first if the slot is empty.
    pub fn get_or_insert_with(&mut self, create: impl FnOnce() -> T) -> &mut T {
        if let Held::Absent = self {
            *self = Held::Owned(create());
        }
        match self {
            Held::Owned(value) => value,
            Held::Borrowed(value) => &mut **value,
            Held::Absent => unreachable!("slot was filled above"),
        }
    }

    /// Empty the slot, returning owned content. A borrow is dropped without freeing.
    pub fn release(&mut self) -> Option<T> {
        std::mem::take(self).into_owned()
    }

    /// Take owned content out of the slot; borrowed content stays in place.
    pub fn take_owned(&mut self) -> Option<T> {
        match self {
            Held::Owned(_) => self.release(),
            _ => None,
        }
    }

    pub fn into_owned(self) -> Option<T> {
        match self {
            Held::Owned(value) => Some(value),
            Held::Absent | Held::Borrowed(_) => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Held<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Held::Absent => write!(f, "Absent"),
            Held::Owned(value) => f.debug_tuple("Owned").field(value).finish(),
            Held::Borrowed(value) => f.debug_tuple("Borrowed").field(value).finish(),
        }
    }
}

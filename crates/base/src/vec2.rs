use std::fmt;

/// Two-component vector, used throughout the workspace for raster sizes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

impl<T: fmt::Debug> fmt::Debug for Vec2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vec2")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for Vec2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

impl<T> Vec2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl Vec2<usize> {
    /// Number of cells covered by a `x` by `y` raster.
    pub fn area(&self) -> usize {
        self.x * self.y
    }

    /// Checked variant of `area`, `None` on overflow.
    pub fn checked_area(&self) -> Option<usize> {
        self.x.checked_mul(self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0 || self.y == 0
    }

    /// Size of a plane subsampled by two in both directions, rounding up.
    pub fn half_rounded_up(&self) -> Self {
        Self::new(self.x.div_ceil(2), self.y.div_ceil(2))
    }
}

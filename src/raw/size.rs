use core::num::NonZero;

use super::handle::{Handle, RawHandle};

/// Cached node count of a non-empty subtree.
///
/// A subtree always contains at least its own root, so the count is `NonZero`; an absent
/// subtree is `None` and counts as zero (see [`Size::of`]).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Size(NonZero<RawHandle>);

impl Size {
    // The arena can never hold more nodes than it has handles.
    pub(crate) const MAX: usize = Handle::MAX;
    pub(crate) const ONE: Self = Self::from_usize(1);

    #[inline]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size != 0 && size <= Self::MAX, "`Size::from_usize()` - `size` outside 1..=`Size::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        match NonZero::new(size as RawHandle) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0.get() as usize
    }

    /// Node count of an optional subtree: zero when absent.
    #[inline]
    pub(crate) fn of(size: Option<Self>) -> usize {
        size.map_or(0, Self::to_usize)
    }
}

use core::num::NonZero;

/// A non-owning index into the node arena.
///
/// Stored as `NonZero<u32>` so that `Option<Handle>` is the same size as
/// `Handle`; tree nodes hold several optional handles each, and the niche
/// keeps them compact.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<u32>);

impl Handle {
    pub(crate) const MAX: usize = (u32::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // `index + 1` cannot be zero and cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as u32).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

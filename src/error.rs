use std::collections::TryReserveError;

/// Error type for the [`SkipList`](crate::SkipList), [`SkipSet`](crate::SkipSet)
/// and [`SkipMap`](crate::SkipMap).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// Indicates that the allocator refused to hand out another node
  /// because its budget of `limit` nodes is used up.
  Full {
    /// The number of nodes the allocator may hand out.
    limit: usize,
  },

  /// Indicates that the backing arena could not grow.
  Alloc(TryReserveError),

  /// Indicates that the arena has run out of node indices.
  Capacity,

  /// Indicates that the requested tower height is larger than the configured maximum height.
  HeightTooLarge {
    /// The requested height.
    height: u8,
    /// The maximum height of the skiplist.
    max: u8,
  },

  /// Indicates that two containers whose allocators neither compare equal nor
  /// propagate on swap were asked to swap.
  IncompatibleAllocators,
}

impl core::fmt::Display for Error {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::Full { limit } => write!(
        f,
        "allocation failed because allocator is full (limit {limit} nodes)"
      ),
      Self::Alloc(e) => write!(f, "{e}"),
      Self::Capacity => write!(f, "arena has run out of node indices"),
      Self::HeightTooLarge { height, max } => {
        write!(f, "height {height} is larger than the maximum height {max}")
      }
      Self::IncompatibleAllocators => write!(
        f,
        "cannot swap skiplists whose allocators are unequal and do not propagate on swap"
      ),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<TryReserveError> for Error {
  #[inline]
  fn from(e: TryReserveError) -> Self {
    Self::Alloc(e)
  }
}

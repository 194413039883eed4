use arbitrary_int::u6;

use super::MAX_HEIGHT;

/// Height of a tower, the number of levels a node participates in.
///
/// A height is always in `1..=MAX_HEIGHT`, it is stored as a 6-bit unsigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Height(u6);

impl Default for Height {
  #[inline]
  fn default() -> Self {
    Self::MAX
  }
}

impl Height {
  /// The smallest height, a node with this height only lives on the bottom level.
  pub const MIN: Self = Self(u6::new(1));

  /// The largest height.
  pub const MAX: Self = Self(u6::new(MAX_HEIGHT as u8));

  /// Creates a new height, returns `None` if `height` is `0` or larger than [`MAX_HEIGHT`](crate::MAX_HEIGHT).
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skl_ord::Height;
  ///
  /// assert_eq!(Height::new(4).unwrap().get(), 4);
  /// assert!(Height::new(0).is_none());
  /// assert!(Height::new(33).is_none());
  /// ```
  #[inline]
  pub const fn new(height: u8) -> Option<Self> {
    if height == 0 || height as usize > MAX_HEIGHT {
      return None;
    }
    Some(Self(u6::new(height)))
  }

  /// Returns the height as a `u8`.
  #[inline]
  pub const fn get(self) -> u8 {
    self.0.value()
  }

  /// Returns the height as a `usize`.
  #[inline]
  pub const fn to_usize(self) -> usize {
    self.0.value() as usize
  }
}

impl From<Height> for usize {
  #[inline]
  fn from(h: Height) -> Self {
    h.to_usize()
  }
}

impl From<Height> for u8 {
  #[inline]
  fn from(h: Height) -> Self {
    h.get()
  }
}

impl core::fmt::Display for Height {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{}", self.get())
  }
}

use super::Height;

/// Options for a [`SkipList`](crate::SkipList).
#[viewit::viewit(vis_all = "pub(crate)", getters(skip), setters(skip))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Options {
  max_height: Height,
  capacity: usize,
  seed: Option<u64>,
}

impl Default for Options {
  #[inline]
  fn default() -> Options {
    Options::new()
  }
}

impl Options {
  /// Creates a new set of options with the default values.
  #[inline]
  pub const fn new() -> Self {
    Self {
      max_height: Height::MAX,
      capacity: 0,
      seed: None,
    }
  }

  /// Set the maximum height of the towers.
  ///
  /// Randomly drawn heights never exceed this value, and
  /// [`insert_at_height`](crate::SkipList::insert_at_height) rejects larger ones.
  ///
  /// The default max height is [`MAX_HEIGHT`](crate::MAX_HEIGHT).
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skl_ord::{Options, Height};
  ///
  /// let opts = Options::new().with_max_height(Height::new(8).unwrap());
  /// assert_eq!(opts.max_height().get(), 8);
  /// ```
  #[inline]
  pub const fn with_max_height(mut self, max_height: Height) -> Self {
    self.max_height = max_height;
    self
  }

  /// Set the number of nodes the arena reserves room for up front.
  ///
  /// The default capacity is `0`.
  #[inline]
  pub const fn with_capacity(mut self, capacity: usize) -> Self {
    self.capacity = capacity;
    self
  }

  /// Set the seed of the level generator.
  ///
  /// With a seed, two skiplists fed the same operations build the same
  /// towers. Without one, the generator is seeded from the operating system.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skl_ord::Options;
  ///
  /// let opts = Options::new().with_seed(Some(42));
  /// assert_eq!(opts.seed(), Some(42));
  /// ```
  #[inline]
  pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
    self.seed = seed;
    self
  }

  /// Returns the maximum height of the towers.
  #[inline]
  pub const fn max_height(&self) -> Height {
    self.max_height
  }

  /// Returns the number of nodes the arena reserves room for up front.
  #[inline]
  pub const fn capacity(&self) -> usize {
    self.capacity
  }

  /// Returns the seed of the level generator.
  #[inline]
  pub const fn seed(&self) -> Option<u64> {
    self.seed
  }
}

use core::{borrow::Borrow, cmp, fmt, marker::PhantomData, mem};

use rand::{rngs::SmallRng, SeedableRng};

use super::{
  allocator::{Allocator, Global},
  arena::{Arena, Slot},
  key::KeyTraits,
  node::{Header, Link, Node, NodeId},
  utils::random_height,
  Ascend, Comparator, Error, Height, Options, MAX_HEIGHT,
};

mod iterator;
pub use iterator::*;


/// Nodes, header and the number of levels in use.
#[derive(Debug)]
pub(crate) struct Storage<T> {
  arena: Arena<Node<T>>,
  header: Header,
  /// Number of levels in use, in `1..=MAX_HEIGHT`.
  height: usize,
}

impl<T> Default for Storage<T> {
  #[inline]
  fn default() -> Self {
    Self::with_capacity(0)
  }
}

impl<T> Storage<T> {
  #[inline]
  fn with_capacity(cap: usize) -> Self {
    Self {
      arena: Arena::with_capacity(cap),
      header: Header::new(),
      height: 1,
    }
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.arena.len()
  }

  #[inline]
  pub(crate) fn first(&self) -> Link {
    self.header.next[0]
  }

  #[inline]
  pub(crate) fn last(&self) -> Link {
    self.header.tail
  }

  #[inline]
  pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
    &self.arena[id]
  }

  #[inline]
  pub(crate) fn value(&self, id: NodeId) -> &T {
    &self.arena[id].value
  }

  /// Returns the successor of `link` on `level`, where `None` is the header.
  #[inline]
  pub(crate) fn next_of(&self, link: Link, level: usize) -> Link {
    match link {
      None => self.header.next[level],
      Some(id) => self.arena[id].tower[level],
    }
  }

  #[inline]
  fn set_next(&mut self, link: Link, level: usize, next: Link) {
    match link {
      None => self.header.next[level] = next,
      Some(id) => self.arena[id].tower[level] = next,
    }
  }

  /// Returns the predecessor of `link` on level 0, where `None` is the end position.
  #[inline]
  pub(crate) fn prev_of(&self, link: Link) -> Link {
    match link {
      None => self.header.tail,
      Some(id) => self.arena[id].prev,
    }
  }

  #[inline]
  pub(crate) fn raw_parts_mut(&mut self) -> (*mut Slot<Node<T>>, Link, Link, usize) {
    let len = self.arena.len();
    (self.arena.as_mut_ptr(), self.first(), self.last(), len)
  }

  /// Frees every node, charging the release to `alloc`.
  fn release<A: Allocator>(&mut self, alloc: &A) {
    let mut cur = self.first();
    while let Some(id) = cur {
      let node = &self.arena[id];
      alloc.deallocate(Node::<T>::size(node.height()));
      cur = node.tower[0];
    }
    self.arena.clear();
    self.header.reset();
    self.height = 1;
  }
}

/// A skiplist storing `KT::Value`s ordered by `KT::Key` under the comparator `C`,
/// with node memory accounted to the allocator `A`.
///
/// [`SkipSet`](crate::SkipSet) and [`SkipMap`](crate::SkipMap) are thin
/// wrappers around this type.
pub struct SkipList<KT: KeyTraits, C = Ascend, A: Allocator = Global> {
  storage: Storage<KT::Value>,
  cmp: C,
  alloc: A,
  rng: SmallRng,
  opts: Options,
  _marker: PhantomData<KT>,
}

impl<KT: KeyTraits, C, A: Allocator> Drop for SkipList<KT, C, A> {
  fn drop(&mut self) {
    self.storage.release(&self.alloc);
  }
}

impl<KT: KeyTraits, C: Default, A: Allocator + Default> Default for SkipList<KT, C, A> {
  #[inline]
  fn default() -> Self {
    Self::with_options_in(Options::new(), C::default(), A::default())
  }
}

impl<KT: KeyTraits> SkipList<KT> {
  /// Creates an empty skiplist ordered by the natural order of the keys.
  #[inline]
  pub fn new() -> Self {
    Self::with_options(Options::new())
  }

  /// Creates an empty skiplist with the given options.
  #[inline]
  pub fn with_options(opts: Options) -> Self {
    Self::with_options_in(opts, Ascend, Global)
  }
}

impl<KT: KeyTraits, C> SkipList<KT, C> {
  /// Creates an empty skiplist ordered by `cmp`.
  #[inline]
  pub fn with_comparator(cmp: C) -> Self {
    Self::with_options_in(Options::new(), cmp, Global)
  }

  /// Creates an empty skiplist with the given options, ordered by `cmp`.
  #[inline]
  pub fn with_options_and_comparator(opts: Options, cmp: C) -> Self {
    Self::with_options_in(opts, cmp, Global)
  }
}

impl<KT: KeyTraits, C, A: Allocator> SkipList<KT, C, A> {
  /// Creates an empty skiplist ordered by `cmp`, charging its nodes to `alloc`.
  #[inline]
  pub fn new_in(cmp: C, alloc: A) -> Self {
    Self::with_options_in(Options::new(), cmp, alloc)
  }

  /// Creates an empty skiplist with the given options, ordered by `cmp`, charging its nodes to `alloc`.
  pub fn with_options_in(opts: Options, cmp: C, alloc: A) -> Self {
    let rng = match opts.seed {
      Some(seed) => SmallRng::seed_from_u64(seed),
      None => SmallRng::from_os_rng(),
    };
    Self {
      storage: Storage::with_capacity(opts.capacity),
      cmp,
      alloc,
      rng,
      opts,
      _marker: PhantomData,
    }
  }

  /// Returns the number of elements.
  #[inline]
  pub fn len(&self) -> usize {
    self.storage.len()
  }

  /// Returns `true` if the skiplist holds no elements.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns the number of levels in use.
  ///
  /// This is the height of the tallest tower, or `1` for an empty skiplist.
  #[inline]
  pub fn height(&self) -> u8 {
    self.storage.height as u8
  }

  /// Returns the maximum height a tower may have.
  #[inline]
  pub const fn max_height(&self) -> Height {
    self.opts.max_height
  }

  /// Returns the comparator.
  #[inline]
  pub const fn comparator(&self) -> &C {
    &self.cmp
  }

  /// Returns the allocator.
  #[inline]
  pub const fn allocator(&self) -> &A {
    &self.alloc
  }

  /// Returns the options the skiplist was created with.
  #[inline]
  pub const fn options(&self) -> &Options {
    &self.opts
  }

  /// Draws a tower height from the skiplist's level generator.
  #[inline]
  pub fn random_height(&mut self) -> Height {
    random_height(&mut self.rng, self.opts.max_height)
  }

  /// Returns the first element.
  #[inline]
  pub fn first(&self) -> Option<&KT::Value> {
    self.storage.first().map(|id| self.storage.value(id))
  }

  /// Returns the last element.
  #[inline]
  pub fn last(&self) -> Option<&KT::Value> {
    self.storage.last().map(|id| self.storage.value(id))
  }

  /// Returns an iterator over the elements in order.
  #[inline]
  pub fn iter(&self) -> Iter<'_, KT::Value> {
    Iter::new(&self.storage)
  }

  /// Returns a cursor at the first element, or at the end position if the skiplist is empty.
  #[inline]
  pub fn cursor_front(&self) -> Cursor<'_, KT::Value> {
    Cursor::new(&self.storage, self.storage.first())
  }

  /// Returns a cursor at the last element, or at the end position if the skiplist is empty.
  #[inline]
  pub fn cursor_back(&self) -> Cursor<'_, KT::Value> {
    Cursor::new(&self.storage, self.storage.last())
  }

  /// Returns a cursor at the end position.
  #[inline]
  pub fn cursor_end(&self) -> Cursor<'_, KT::Value> {
    Cursor::new(&self.storage, None)
  }

  /// Returns a mutable cursor at the first element.
  #[inline]
  pub fn cursor_front_mut(&mut self) -> CursorMut<'_, KT, C, A> {
    let current = self.storage.first();
    CursorMut::new(self, current)
  }

  /// Returns a mutable cursor at the last element.
  #[inline]
  pub fn cursor_back_mut(&mut self) -> CursorMut<'_, KT, C, A> {
    let current = self.storage.last();
    CursorMut::new(self, current)
  }

  /// Returns a mutable cursor at the end position.
  #[inline]
  pub fn cursor_end_mut(&mut self) -> CursorMut<'_, KT, C, A> {
    CursorMut::new(self, None)
  }

  /// Removes every element.
  #[inline]
  pub fn clear(&mut self) {
    self.storage.release(&self.alloc);
  }

  #[inline]
  pub(crate) fn storage_mut(&mut self) -> &mut Storage<KT::Value> {
    &mut self.storage
  }

  /// Returns a mutable reference to the element at `id`.
  ///
  /// The caller must not change the element's key.
  #[inline]
  pub(crate) fn value_mut(&mut self, id: NodeId) -> &mut KT::Value {
    &mut self.storage.arena[id].value
  }

  /// Charges a node of `height` to the allocator and stores it in the arena.
  fn alloc_node(&mut self, height: Height, value: KT::Value) -> Result<NodeId, Error> {
    let size = Node::<KT::Value>::size(height.to_usize());
    self.alloc.allocate(size)?;
    match self.storage.arena.insert(Node::new(value, height)) {
      Ok(id) => Ok(id),
      Err(e) => {
        #[cfg(feature = "tracing")]
        tracing::warn!(err = %e, "failed to grow the skiplist arena");
        self.alloc.deallocate(size);
        Err(e)
      }
    }
  }

  /// Splices `id` in after `prev[level]` on each level of its tower.
  ///
  /// `prev[level]` must be the last node ordered before `id` on `level`,
  /// `None` (the header) for levels at or above the current height.
  fn link_node(&mut self, id: NodeId, prev: &[Link; MAX_HEIGHT]) {
    let height = self.storage.arena[id].height();
    for (level, &pred) in prev.iter().enumerate().take(height) {
      let next = if level >= self.storage.height {
        None
      } else {
        self.storage.next_of(pred, level)
      };
      self.storage.arena[id].tower[level] = next;
      self.storage.set_next(pred, level, Some(id));
    }

    let node = &mut self.storage.arena[id];
    node.prev = prev[0];
    let after = node.tower[0];
    match after {
      Some(next) => self.storage.arena[next].prev = Some(id),
      None => self.storage.header.tail = Some(id),
    }

    if height > self.storage.height {
      #[cfg(feature = "tracing")]
      tracing::trace!(from = self.storage.height, to = height, "skiplist grows");
      self.storage.height = height;
    }
  }

  /// Unlinks `id` from every level, shrinks the height and frees the node.
  fn unlink_node(&mut self, id: NodeId, prev: &[Link; MAX_HEIGHT]) -> KT::Value {
    let height = self.storage.arena[id].height();
    for (level, &pred) in prev.iter().enumerate().take(height) {
      debug_assert_eq!(self.storage.next_of(pred, level), Some(id));
      let next = self.storage.arena[id].tower[level];
      self.storage.set_next(pred, level, next);
    }

    let node = &self.storage.arena[id];
    let (before, after) = (node.prev, node.tower[0]);
    match after {
      Some(next) => self.storage.arena[next].prev = before,
      None => self.storage.header.tail = before,
    }

    #[cfg(feature = "tracing")]
    let old = self.storage.height;
    while self.storage.height > 1 && self.storage.header.next[self.storage.height - 1].is_none() {
      self.storage.height -= 1;
    }
    debug_assert!(self.storage.header.next[self.storage.height..]
      .iter()
      .all(Option::is_none));
    #[cfg(feature = "tracing")]
    {
      if old != self.storage.height {
        tracing::trace!(from = old, to = self.storage.height, "skiplist shrinks");
      }
    }

    let node = self.storage.arena.remove(id);
    self
      .alloc
      .deallocate(Node::<KT::Value>::size(node.height()));
    node.value
  }

  /// Allocates a node and appends it after every other element.
  ///
  /// `last[level]` tracks the last node on each level and is updated.
  fn push_back(
    &mut self,
    height: Height,
    value: KT::Value,
    last: &mut [Link; MAX_HEIGHT],
  ) -> Result<(), Error> {
    let id = self.alloc_node(height, value)?;
    self.link_node(id, last);
    for link in last.iter_mut().take(height.to_usize()) {
      *link = Some(id);
    }
    Ok(())
  }

  /// Clears `self`, then moves every element of `source` into it, charging
  /// each node to `self`'s allocator. Either every element moves or none does.
  fn move_elements_from(&mut self, source: &mut Self) -> Result<(), Error> {
    #[cfg(feature = "tracing")]
    tracing::debug!(
      len = source.len(),
      "allocators differ, moving skiplist element by element"
    );

    self.clear();
    let max = self.opts.max_height;
    let sizes = |node: &Node<KT::Value>| {
      let height = node.tower_height().min(max);
      (height, Node::<KT::Value>::size(height.to_usize()))
    };

    self.storage.arena.try_reserve(source.len())?;
    let mut cur = source.storage.first();
    while let Some(id) = cur {
      let node = source.storage.node(id);
      if let Err(e) = self.alloc.allocate(sizes(node).1) {
        // give back what was charged so far
        let mut undo = source.storage.first();
        while undo != cur {
          let Some(uid) = undo else { break };
          let node = source.storage.node(uid);
          self.alloc.deallocate(sizes(node).1);
          undo = node.tower[0];
        }
        return Err(e);
      }
      cur = node.tower[0];
    }

    let mut src = mem::take(&mut source.storage);
    let mut last = [None; MAX_HEIGHT];
    let mut cur = src.first();
    while let Some(id) = cur {
      let node = src.arena.remove(id);
      cur = node.tower[0];
      source
        .alloc
        .deallocate(Node::<KT::Value>::size(node.height()));
      let (height, _) = sizes(&node);
      // room was reserved and the node charged above
      let new_id = self.storage.arena.insert(Node::new(node.value, height))?;
      self.link_node(new_id, &last);
      for link in last.iter_mut().take(height.to_usize()) {
        *link = Some(new_id);
      }
    }
    Ok(())
  }

  /// Moves the contents out of `self` in O(1), leaving `self` empty.
  ///
  /// The returned skiplist uses a clone of the allocator handle, so the nodes
  /// stay charged to the same allocator.
  pub fn take(&mut self) -> Self
  where
    C: Clone,
  {
    Self {
      storage: mem::take(&mut self.storage),
      cmp: self.cmp.clone(),
      alloc: self.alloc.clone(),
      rng: SmallRng::from_rng(&mut self.rng),
      opts: self.opts,
      _marker: PhantomData,
    }
  }

  /// Replaces the contents of `self` with the contents of `source`, leaving `source` empty.
  ///
  /// - If the allocator propagates on move assignment, `self` adopts the
  ///   allocator and the storage of `source`.
  /// - If the allocators compare equal, `self` adopts the storage of `source`.
  /// - Otherwise every element is moved into a node charged to `self`'s
  ///   allocator. If that fails, `self` is left empty, `source` is unchanged
  ///   and the error is returned.
  pub fn try_move_from(&mut self, source: &mut Self) -> Result<(), Error>
  where
    C: Clone,
  {
    if A::PROPAGATE_ON_MOVE_ASSIGNMENT {
      self.clear();
      self.alloc = source.alloc.clone();
    } else if !self.alloc.compatible(&source.alloc) {
      self.move_elements_from(source)?;
      self.cmp = source.cmp.clone();
      return Ok(());
    } else {
      self.clear();
    }

    self.storage = mem::take(&mut source.storage);
    self.cmp = source.cmp.clone();
    self.opts.max_height = cmp::max(self.opts.max_height, source.opts.max_height);
    Ok(())
  }

  /// Exchanges the contents of `self` and `other`.
  ///
  /// Allocators are exchanged too if they propagate on swap. If they neither
  /// propagate nor compare equal the skiplists cannot exchange storage:
  /// nothing changes and [`Error::IncompatibleAllocators`] is returned.
  pub fn try_swap(&mut self, other: &mut Self) -> Result<(), Error> {
    if A::PROPAGATE_ON_SWAP {
      mem::swap(&mut self.alloc, &mut other.alloc);
    } else if !self.alloc.compatible(&other.alloc) {
      #[cfg(feature = "tracing")]
      tracing::error!("cannot swap skiplists with incompatible allocators");
      return Err(Error::IncompatibleAllocators);
    }

    mem::swap(&mut self.storage, &mut other.storage);
    mem::swap(&mut self.cmp, &mut other.cmp);
    mem::swap(&mut self.opts, &mut other.opts);
    Ok(())
  }
}

impl<KT, C, A> SkipList<KT, C, A>
where
  KT: KeyTraits,
  KT::Value: Clone,
  C: Clone,
  A: Allocator,
{
  /// Copies the skiplist.
  ///
  /// The copy uses the allocator returned by [`Allocator::select_on_copy`]
  /// and has the same tower layout as `self`. If a node cannot be allocated,
  /// the partial copy is released and the error is returned.
  pub fn try_clone(&self) -> Result<Self, Error> {
    let mut out = Self {
      storage: Storage::with_capacity(self.opts.capacity),
      cmp: self.cmp.clone(),
      alloc: self.alloc.select_on_copy(),
      // seeded from a snapshot so the copy draws its own sequence
      rng: SmallRng::from_rng(&mut self.rng.clone()),
      opts: self.opts,
      _marker: PhantomData,
    };
    out.copy_elements_from(self)?;
    Ok(out)
  }

  /// Replaces the contents of `self` with a copy of `source`.
  ///
  /// If the allocator propagates on copy assignment, `self` releases its
  /// nodes and adopts the allocator of `source` first. If a node cannot be
  /// allocated, `self` is left empty and the error is returned.
  pub fn try_clone_from(&mut self, source: &Self) -> Result<(), Error> {
    self.clear();
    if A::PROPAGATE_ON_COPY_ASSIGNMENT {
      self.alloc = source.alloc.clone();
    }
    self.cmp = source.cmp.clone();
    self.copy_elements_from(source)
  }

  fn copy_elements_from(&mut self, source: &Self) -> Result<(), Error> {
    let mut last = [None; MAX_HEIGHT];
    let mut cur = source.storage.first();
    while let Some(id) = cur {
      let node = source.storage.node(id);
      let height = node.tower_height().min(self.opts.max_height);
      if let Err(e) = self.push_back(height, node.value.clone(), &mut last) {
        self.clear();
        return Err(e);
      }
      cur = node.tower[0];
    }
    Ok(())
  }
}

impl<KT, C, A> SkipList<KT, C, A>
where
  KT: KeyTraits,
  C: Comparator<KT::Key>,
  A: Allocator,
{
  /// Searches for `key`, returning the node as soon as any level hits it.
  ///
  /// On a miss, returns the last node ordered before `key` on level 0.
  fn find_node<Q>(&self, key: &Q) -> Result<NodeId, Link>
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    let mut x: Link = None;
    for level in (0..self.storage.height).rev() {
      while let Some(next) = self.storage.next_of(x, level) {
        match KT::compare(&self.cmp, self.storage.value(next), key) {
          cmp::Ordering::Less => x = Some(next),
          cmp::Ordering::Equal => return Ok(next),
          cmp::Ordering::Greater => break,
        }
      }
    }
    Err(x)
  }

  /// Searches for `key`, recording in `prev[level]` the last node ordered before `key` on every level in use.
  fn find_node_with_prev<Q>(&self, key: &Q, prev: &mut [Link; MAX_HEIGHT]) -> Option<NodeId>
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    let mut x: Link = None;
    for level in (0..self.storage.height).rev() {
      while let Some(next) = self.storage.next_of(x, level) {
        if KT::compare(&self.cmp, self.storage.value(next), key).is_lt() {
          x = Some(next);
        } else {
          break;
        }
      }
      prev[level] = x;
    }

    self
      .storage
      .next_of(x, 0)
      .filter(|&next| KT::compare(&self.cmp, self.storage.value(next), key).is_eq())
  }

  /// Returns the first node not ordered before `key`, or, with `upper`, the first node ordered after it.
  fn seek<Q>(&self, key: &Q, upper: bool) -> Link
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    let mut x: Link = None;
    for level in (0..self.storage.height).rev() {
      while let Some(next) = self.storage.next_of(x, level) {
        match KT::compare(&self.cmp, self.storage.value(next), key) {
          cmp::Ordering::Less => x = Some(next),
          cmp::Ordering::Equal if upper => x = Some(next),
          _ => break,
        }
      }
    }
    self.storage.next_of(x, 0)
  }

  fn insert_in(&mut self, height: Height, value: KT::Value) -> Result<(NodeId, bool), Error> {
    let mut prev = [None; MAX_HEIGHT];
    if let Some(id) = self.find_node_with_prev(KT::key(&value), &mut prev) {
      return Ok((id, false));
    }

    let id = self.alloc_node(height, value)?;
    self.link_node(id, &prev);
    Ok((id, true))
  }

  /// Inserts `value` if no element with an equivalent key exists.
  ///
  /// Returns a cursor at the element with that key and `true` if `value` was
  /// inserted, or `false` if an element was already present, in which case
  /// `value` is dropped and the skiplist is unchanged.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skl_ord::{SkipList, Identity};
  ///
  /// let mut l = SkipList::<Identity<u32>>::new();
  /// assert!(l.insert(3).unwrap().1);
  /// let (cursor, inserted) = l.insert(3).unwrap();
  /// assert!(!inserted);
  /// assert_eq!(cursor.current(), Some(&3));
  /// ```
  pub fn insert(&mut self, value: KT::Value) -> Result<(Cursor<'_, KT::Value>, bool), Error> {
    let height = self.random_height();
    let (id, inserted) = self.insert_in(height, value)?;
    Ok((Cursor::new(&self.storage, Some(id)), inserted))
  }

  /// Like [`insert`](SkipList::insert), but the new node gets a tower of exactly `height` levels.
  pub fn insert_at_height(
    &mut self,
    height: Height,
    value: KT::Value,
  ) -> Result<(Cursor<'_, KT::Value>, bool), Error> {
    if height > self.opts.max_height {
      return Err(Error::HeightTooLarge {
        height: height.get(),
        max: self.opts.max_height.get(),
      });
    }
    let (id, inserted) = self.insert_in(height, value)?;
    Ok((Cursor::new(&self.storage, Some(id)), inserted))
  }

  /// Returns the node with `key`, building and inserting one from `f` if it is absent.
  ///
  /// `f` must produce a value whose key is equivalent to `key`.
  pub(crate) fn get_or_insert_node<Q, F>(&mut self, key: &Q, f: F) -> Result<NodeId, Error>
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
    F: FnOnce() -> KT::Value,
  {
    let mut prev = [None; MAX_HEIGHT];
    if let Some(id) = self.find_node_with_prev(key, &mut prev) {
      return Ok(id);
    }

    let value = f();
    assert!(
      KT::compare(&self.cmp, &value, key).is_eq(),
      "new value is not equal to the key"
    );
    self.insert_after(&prev, value)
  }

  /// Returns the node with `key`, building and inserting one from `f(key)` if it is absent.
  pub(crate) fn get_or_insert_key<F>(&mut self, key: KT::Key, f: F) -> Result<NodeId, Error>
  where
    F: FnOnce(KT::Key) -> KT::Value,
  {
    let mut prev = [None; MAX_HEIGHT];
    if let Some(id) = self.find_node_with_prev(&key, &mut prev) {
      return Ok(id);
    }
    self.insert_after(&prev, f(key))
  }

  fn insert_after(&mut self, prev: &[Link; MAX_HEIGHT], value: KT::Value) -> Result<NodeId, Error> {
    let height = self.random_height();
    let id = self.alloc_node(height, value)?;
    self.link_node(id, prev);
    Ok(id)
  }

  /// Returns the element with `key`, inserting the value built by `f` if it is absent.
  ///
  /// `f` is only called when `key` is absent, and must produce a value whose
  /// key is equivalent to `key`.
  ///
  /// ## Panics
  /// - If the value built by `f` is not equal to `key`. Nothing is allocated
  ///   and the skiplist is unchanged.
  pub fn get_or_insert_with<Q, F>(&mut self, key: &Q, f: F) -> Result<&KT::Value, Error>
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
    F: FnOnce() -> KT::Value,
  {
    let id = self.get_or_insert_node(key, f)?;
    Ok(self.storage.value(id))
  }

  /// Inserts every value of `iter`, stopping at the first allocation failure.
  pub fn try_extend<I>(&mut self, iter: I) -> Result<(), Error>
  where
    I: IntoIterator<Item = KT::Value>,
  {
    for value in iter {
      self.insert(value)?;
    }
    Ok(())
  }

  /// Returns the element with `key`.
  #[inline]
  pub fn get<Q>(&self, key: &Q) -> Option<&KT::Value>
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.find_node(key).ok().map(|id| self.storage.value(id))
  }

  #[inline]
  pub(crate) fn get_node<Q>(&self, key: &Q) -> Option<NodeId>
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.find_node(key).ok()
  }

  /// Returns `true` if an element with `key` exists.
  #[inline]
  pub fn contains<Q>(&self, key: &Q) -> bool
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.find_node(key).is_ok()
  }

  /// Returns the number of elements with `key`, `0` or `1`.
  #[inline]
  pub fn count<Q>(&self, key: &Q) -> usize
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.contains(key) as usize
  }

  /// Returns a cursor at the element with `key`, or at the end position if it is absent.
  #[inline]
  pub fn find<Q>(&self, key: &Q) -> Cursor<'_, KT::Value>
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    Cursor::new(&self.storage, self.find_node(key).ok())
  }

  /// Returns a cursor at the first element whose key is not ordered before `key`.
  #[inline]
  pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, KT::Value>
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    Cursor::new(&self.storage, self.seek(key, false))
  }

  /// Returns a cursor at the first element whose key is ordered after `key`.
  #[inline]
  pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, KT::Value>
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    Cursor::new(&self.storage, self.seek(key, true))
  }

  /// Returns `(lower_bound(key), upper_bound(key))`.
  ///
  /// The two cursors are equal if `key` is absent.
  #[inline]
  pub fn equal_range<Q>(&self, key: &Q) -> (Cursor<'_, KT::Value>, Cursor<'_, KT::Value>)
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    (self.lower_bound(key), self.upper_bound(key))
  }

  /// Removes the element with `key` if present, and returns a cursor at the
  /// element that followed it.
  ///
  /// If `key` is absent nothing changes and the cursor sits where `key` would be.
  pub fn erase<Q>(&mut self, key: &Q) -> CursorMut<'_, KT, C, A>
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    let mut prev = [None; MAX_HEIGHT];
    let current = match self.find_node_with_prev(key, &mut prev) {
      Some(id) => {
        let next = self.storage.arena[id].tower[0];
        self.unlink_node(id, &prev);
        next
      }
      None => self.storage.next_of(prev[0], 0),
    };
    CursorMut::new(self, current)
  }

  /// Removes the element with `key` and returns it.
  pub fn remove<Q>(&mut self, key: &Q) -> Option<KT::Value>
  where
    KT::Key: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    let mut prev = [None; MAX_HEIGHT];
    let id = self.find_node_with_prev(key, &mut prev)?;
    Some(self.unlink_node(id, &prev))
  }

  /// Removes the node at `id` and returns its element.
  pub(crate) fn remove_node(&mut self, id: NodeId) -> KT::Value {
    let mut prev = [None; MAX_HEIGHT];
    let found = self.find_node_with_prev(KT::key(self.storage.value(id)), &mut prev);
    debug_assert_eq!(found, Some(id));
    self.unlink_node(id, &prev)
  }

  /// Removes the first element and returns it.
  #[inline]
  pub fn pop_first(&mut self) -> Option<KT::Value> {
    self.storage.first().map(|id| self.remove_node(id))
  }

  /// Removes the last element and returns it.
  #[inline]
  pub fn pop_last(&mut self) -> Option<KT::Value> {
    self.storage.last().map(|id| self.remove_node(id))
  }

  /// Walks every level and checks the structural invariants.
  #[cfg(test)]
  pub(crate) fn check_invariants(&self) {
    let s = &self.storage;
    assert!((1..=MAX_HEIGHT).contains(&s.height));
    assert!(s.header.next[s.height..].iter().all(Option::is_none));
    if s.height > 1 {
      assert!(s.header.next[s.height - 1].is_some());
    }

    for level in 0..s.height {
      let mut cur = s.header.next[level];
      let mut before: Option<NodeId> = None;
      let mut count = 0;
      while let Some(id) = cur {
        let node = s.node(id);
        assert!(node.height() > level);
        assert!(node.height() <= self.opts.max_height.to_usize());
        if let Some(b) = before {
          assert!(KT::compare(&self.cmp, s.value(b), KT::key(&node.value)).is_lt());
        }
        if level == 0 {
          assert_eq!(node.prev, before);
        }
        before = Some(id);
        cur = node.tower[level];
        count += 1;
      }
      if level == 0 {
        assert_eq!(count, s.len());
        assert_eq!(s.header.tail, before);
      }
    }
  }
}

impl<KT, C, A> Clone for SkipList<KT, C, A>
where
  KT: KeyTraits,
  KT::Value: Clone,
  C: Clone,
  A: Allocator,
{
  /// ## Panics
  /// - If the allocator refuses a node. Use [`SkipList::try_clone`] to handle the error.
  fn clone(&self) -> Self {
    match self.try_clone() {
      Ok(list) => list,
      Err(e) => panic!("failed to clone skiplist: {e}"),
    }
  }
}

impl<KT, C, A> fmt::Debug for SkipList<KT, C, A>
where
  KT: KeyTraits,
  KT::Value: fmt::Debug,
  A: Allocator,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

impl<KT, C, A> PartialEq for SkipList<KT, C, A>
where
  KT: KeyTraits,
  KT::Value: PartialEq,
  A: Allocator,
{
  fn eq(&self, other: &Self) -> bool {
    self.len() == other.len() && self.iter().eq(other.iter())
  }
}

impl<KT, C, A> Eq for SkipList<KT, C, A>
where
  KT: KeyTraits,
  KT::Value: Eq,
  A: Allocator,
{
}

impl<KT, C, A> PartialOrd for SkipList<KT, C, A>
where
  KT: KeyTraits,
  KT::Value: PartialOrd,
  A: Allocator,
{
  fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
    self.iter().partial_cmp(other.iter())
  }
}

impl<KT, C, A> Ord for SkipList<KT, C, A>
where
  KT: KeyTraits,
  KT::Value: Ord,
  A: Allocator,
{
  fn cmp(&self, other: &Self) -> cmp::Ordering {
    self.iter().cmp(other.iter())
  }
}

impl<KT, C, A> FromIterator<KT::Value> for SkipList<KT, C, A>
where
  KT: KeyTraits,
  C: Comparator<KT::Key> + Default,
  A: Allocator + Default,
{
  /// ## Panics
  /// - If the allocator refuses a node.
  fn from_iter<I: IntoIterator<Item = KT::Value>>(iter: I) -> Self {
    let mut list = Self::default();
    if let Err(e) = list.try_extend(iter) {
      panic!("failed to collect into skiplist: {e}");
    }
    list
  }
}

impl<KT: KeyTraits, C, A: Allocator> IntoIterator for SkipList<KT, C, A> {
  type Item = KT::Value;
  type IntoIter = IntoIter<KT::Value, A>;

  #[inline]
  fn into_iter(mut self) -> Self::IntoIter {
    IntoIter::new(mem::take(&mut self.storage), self.alloc.clone())
  }
}

impl<'a, KT: KeyTraits, C, A: Allocator> IntoIterator for &'a SkipList<KT, C, A> {
  type Item = &'a KT::Value;
  type IntoIter = Iter<'a, KT::Value>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

//! Copy-on-write set that remembers insertion order.
//!
//! This module provides [`OrderedSet`], a collection of unique elements kept
//! in the order they were inserted, with O(1) average membership tests and
//! position lookups.
//!
//! # Overview
//!
//! The storage pairs a `Vec` of elements with a position map from each
//! element to its index in the `Vec`. Both are only ever changed together,
//! inside one storage method, so a lookup can never observe one without the
//! other.
//!
//! Removing an element shifts every later element down by one and rewrites
//! their map entries. Removal is therefore O(n); this is what keeps
//! [`OrderedSet::index_of`] O(1).
//!
//! # Time Complexity
//!
//! | Operation    | Complexity          |
//! |--------------|---------------------|
//! | `insert`     | O(1) average        |
//! | `remove`     | O(n)                |
//! | `contains`   | O(1) average        |
//! | `index_of`   | O(1) average        |
//! | `element_at` | O(1)                |
//! | `clone`      | O(1)                |
//!
//! # Hashing
//!
//! The default hasher is [`DefaultHashBuilder`]: the standard library's
//! `RandomState`, or `FxBuildHasher` with the `fxhash` feature, or
//! `ahash::RandomState` with the `ahash` feature. Any other builder can be
//! supplied through [`OrderedSet::with_hasher`].
//!
//! # Examples
//!
//! ```rust
//! use cow_collections::collections::OrderedSet;
//!
//! let mut set: OrderedSet<String> = ["a", "b", "a", "c"]
//!     .into_iter()
//!     .map(String::from)
//!     .collect();
//! assert_eq!(set.len(), 3);
//! assert_eq!(set.index_of("c"), Some(2));
//!
//! // Removal renumbers the elements after it
//! assert_eq!(set.remove("a"), Some("a".to_string()));
//! assert_eq!(set.index_of("b"), Some(0));
//!
//! // Re-insertion appends
//! assert_eq!(set.insert("a".to_string()), (true, 2));
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::iter::FromIterator;
use std::ops::Index;

use super::error::BoundsError;
use super::{ReferenceCounter, make_unique};

const CONTAINER_NAME: &str = "OrderedSet";

/// Hasher builder used by [`OrderedSet`] unless another one is supplied.
#[cfg(feature = "fxhash")]
pub type DefaultHashBuilder = rustc_hash::FxBuildHasher;

/// Hasher builder used by [`OrderedSet`] unless another one is supplied.
#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type DefaultHashBuilder = ahash::RandomState;

/// Hasher builder used by [`OrderedSet`] unless another one is supplied.
#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type DefaultHashBuilder = std::collections::hash_map::RandomState;

// =============================================================================
// Set Storage
// =============================================================================

#[derive(Clone)]
struct SetStorage<T, S> {
    elements: Vec<T>,
    positions: HashMap<T, usize, S>,
}

impl<T, S> SetStorage<T, S> {
    fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.positions.clear();
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher> SetStorage<T, S> {
    fn position<Q>(&self, element: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.get(element).copied()
    }

    /// Appends `element` unless present; returns whether it was inserted and
    /// its position.
    fn append(&mut self, element: T) -> (bool, usize) {
        if let Some(&position) = self.positions.get(&element) {
            return (false, position);
        }
        let position = self.elements.len();
        self.positions.insert(element.clone(), position);
        self.elements.push(element);
        debug_assert_eq!(self.positions.len(), self.elements.len());
        debug_assert_eq!(self.positions.get(&self.elements[position]), Some(&position));
        (true, position)
    }

    /// Removes the element at `position` and renumbers everything after it.
    fn remove_at(&mut self, position: usize) -> T {
        let removed = self.elements.remove(position);
        self.positions.remove(&removed);
        for (offset, element) in self.elements[position..].iter().enumerate() {
            if let Some(slot) = self.positions.get_mut(element) {
                *slot = position + offset;
            }
        }
        debug_assert!(self.is_consistent(), "OrderedSet positions out of sync");
        removed
    }

    fn reserve(&mut self, additional: usize) {
        self.elements.reserve(additional);
        self.positions.reserve(additional);
    }

    /// Every element maps to its own index and the map holds nothing else.
    fn is_consistent(&self) -> bool {
        self.positions.len() == self.elements.len()
            && self
                .elements
                .iter()
                .enumerate()
                .all(|(index, element)| self.positions.get(element) == Some(&index))
    }
}

// =============================================================================
// OrderedSet
// =============================================================================

/// A copy-on-write set of unique elements in insertion order.
///
/// Cloning an `OrderedSet` is O(1); the first mutation through a shared
/// handle copies both the elements and the position map.
///
/// # Type Parameters
///
/// * `T` - The element type. Lookups need `Hash + Eq`; mutation also needs
///   `Clone`, since every element is held by both the array and the map.
/// * `S` - The hasher builder of the position map.
///
/// # Examples
///
/// ```rust
/// use cow_collections::collections::OrderedSet;
///
/// let mut set = OrderedSet::new();
/// assert_eq!(set.insert(30), (true, 0));
/// assert_eq!(set.insert(10), (true, 1));
/// assert_eq!(set.insert(30), (false, 0));
///
/// let elements: Vec<i32> = set.iter().copied().collect();
/// assert_eq!(elements, vec![30, 10]);
/// ```
pub struct OrderedSet<T, S = DefaultHashBuilder> {
    storage: ReferenceCounter<SetStorage<T, S>>,
}

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(OrderedSet<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(OrderedSet<i32>: Send, Sync);

impl<T, S> Clone for OrderedSet<T, S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl<T> OrderedSet<T> {
    /// Creates a new empty set with the default hasher.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty set with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<T, S> OrderedSet<T, S> {
    /// Creates an empty set that hashes with `hasher`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cow_collections::collections::OrderedSet;
    /// use std::hash::{BuildHasherDefault, DefaultHasher};
    ///
    /// let mut set: OrderedSet<&str, BuildHasherDefault<DefaultHasher>> =
    ///     OrderedSet::with_hasher(BuildHasherDefault::default());
    /// set.insert("x");
    /// assert!(set.contains("x"));
    /// ```
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    /// Creates an empty set with room for `capacity` elements that hashes
    /// with `hasher`.
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            storage: ReferenceCounter::new(SetStorage::with_capacity_and_hasher(capacity, hasher)),
        }
    }

    /// Returns the number of elements in the set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.elements.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.elements.is_empty()
    }

    /// Returns the number of elements the set can hold without reallocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.elements.capacity()
    }

    /// Returns the element at `index`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.storage.elements.get(index)
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsError`] carrying `index` and the current length when
    /// `index` is not in `[0, len)`.
    pub fn element_at(&self, index: usize) -> Result<&T, BoundsError> {
        self.get(index).ok_or(BoundsError {
            index,
            count: self.len(),
        })
    }

    /// Returns the first inserted element still present, if any.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.storage.elements.first()
    }

    /// Returns the most recently appended element, if any.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.storage.elements.last()
    }

    /// Returns the elements in insertion order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.storage.elements
    }

    /// Iterates the elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.storage.elements.iter()
    }

    /// Returns `true` if both sets currently share one storage.
    #[inline]
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.storage, &other.storage)
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher + Clone> OrderedSet<T, S> {
    /// Returns `true` if the set contains `element`.
    ///
    /// The element may be any borrowed form of the element type, so an
    /// `OrderedSet<String>` can be queried with a `&str`.
    #[inline]
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.storage.positions.contains_key(element)
    }

    /// Returns the position of `element` in insertion order, if present.
    #[inline]
    #[must_use]
    pub fn index_of<Q>(&self, element: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.storage.position(element)
    }

    /// Inserts `element` at the end unless it is already present.
    ///
    /// Returns `(true, index)` when the element was appended at `index`, and
    /// `(false, index)` with the existing position otherwise. Inserting an
    /// element that is already present never copies shared storage.
    ///
    /// # Complexity
    ///
    /// O(1) average
    pub fn insert(&mut self, element: T) -> (bool, usize) {
        if let Some(position) = self.storage.position(&element) {
            return (false, position);
        }
        make_unique(&mut self.storage, CONTAINER_NAME).append(element)
    }

    /// Removes `element` and returns it, or `None` if it is absent.
    ///
    /// Every element after the removed one moves down one position.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cow_collections::collections::OrderedSet;
    ///
    /// let mut set: OrderedSet<char> = "abc".chars().collect();
    /// assert_eq!(set.remove(&'a'), Some('a'));
    /// assert_eq!(set.remove(&'a'), None);
    /// assert_eq!(set.index_of(&'c'), Some(1));
    /// ```
    pub fn remove<Q>(&mut self, element: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.storage.position(element)?;
        Some(make_unique(&mut self.storage, CONTAINER_NAME).remove_at(position))
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsError`] if `index` is not in `[0, len)`; the set is
    /// unchanged.
    pub fn remove_at(&mut self, index: usize) -> Result<T, BoundsError> {
        if index >= self.len() {
            return Err(BoundsError {
                index,
                count: self.len(),
            });
        }
        Ok(make_unique(&mut self.storage, CONTAINER_NAME).remove_at(index))
    }

    /// Ensures the set owns its storage and has room for `additional` more
    /// elements.
    pub fn reserve(&mut self, additional: usize) {
        make_unique(&mut self.storage, CONTAINER_NAME).reserve(additional);
    }

    /// Removes every element.
    ///
    /// With `keeping_capacity`, the storage keeps its allocation (a shared
    /// storage is replaced by a fresh one of the same capacity).
    pub fn clear(&mut self, keeping_capacity: bool) {
        if keeping_capacity && let Some(storage) = ReferenceCounter::get_mut(&mut self.storage) {
            storage.clear();
            return;
        }
        let capacity = if keeping_capacity { self.capacity() } else { 0 };
        let hasher = self.storage.positions.hasher().clone();
        self.storage = ReferenceCounter::new(SetStorage::with_capacity_and_hasher(capacity, hasher));
    }

    /// Returns the elements of `self` followed by the elements of `other`
    /// that `self` lacks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cow_collections::collections::OrderedSet;
    ///
    /// let left: OrderedSet<i32> = [3, 1].into_iter().collect();
    /// let right: OrderedSet<i32> = [2, 3, 4].into_iter().collect();
    /// assert_eq!(left.union(&right).as_slice(), &[3, 1, 2, 4]);
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for element in other {
            result.insert(element.clone());
        }
        result
    }

    /// Returns the elements of `self` that are also in `other`, in the order
    /// of `self`.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.retained(|element| other.contains(element))
    }

    /// Returns the elements of `self` that are not in `other`, in the order
    /// of `self`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.retained(|element| !other.contains(element))
    }

    fn retained(&self, mut keep: impl FnMut(&T) -> bool) -> Self {
        let hasher = self.storage.positions.hasher().clone();
        let mut storage = SetStorage::with_capacity_and_hasher(0, hasher);
        for element in self.iter().filter(|element| keep(*element)) {
            storage.append(element.clone());
        }
        Self {
            storage: ReferenceCounter::new(storage),
        }
    }
}

impl<T, S: Default> Default for OrderedSet<T, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> Index<usize> for OrderedSet<T, S> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).unwrap_or_else(|| {
            panic!(
                "OrderedSet index {index} out of bounds for length {}",
                self.len()
            )
        })
    }
}

/// Two sets are equal when they hold the same elements in the same order.
impl<T: PartialEq, S> PartialEq for OrderedSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, S> Eq for OrderedSet<T, S> {}

impl<T: Hash, S> Hash for OrderedSet<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug, S> fmt::Debug for OrderedSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Keeps the first occurrence of each element.
impl<T: Hash + Eq + Clone, S: BuildHasher + Clone + Default> FromIterator<T> for OrderedSet<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher + Clone> Extend<T> for OrderedSet<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower_bound, _) = iter.size_hint();
        if lower_bound > 0 {
            self.reserve(lower_bound);
        }
        for element in iter {
            self.insert(element);
        }
    }
}

impl<T: Clone, S: Clone> IntoIterator for OrderedSet<T, S> {
    type Item = T;
    type IntoIter = OrderedSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        let elements = match ReferenceCounter::try_unwrap(self.storage) {
            Ok(storage) => storage.elements,
            Err(shared) => shared.elements.clone(),
        };
        OrderedSetIntoIterator {
            elements: elements.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a OrderedSet<T, S> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over the elements of an [`OrderedSet`] in insertion
/// order.
pub struct OrderedSetIntoIterator<T> {
    elements: std::vec::IntoIter<T>,
}

impl<T> Iterator for OrderedSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.elements.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}

impl<T> DoubleEndedIterator for OrderedSetIntoIterator<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.elements.next_back()
    }
}

impl<T> ExactSizeIterator for OrderedSetIntoIterator<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn letters(text: &str) -> OrderedSet<char> {
        text.chars().collect()
    }

    mod storage {
        use super::*;

        #[rstest]
        fn test_append_registers_position() {
            let mut storage: SetStorage<&str, DefaultHashBuilder> =
                SetStorage::with_capacity_and_hasher(0, DefaultHashBuilder::default());
            assert_eq!(storage.append("a"), (true, 0));
            assert_eq!(storage.append("b"), (true, 1));
            assert_eq!(storage.append("a"), (false, 0));
            assert!(storage.is_consistent());
        }

        #[rstest]
        #[case::first(0)]
        #[case::middle(2)]
        #[case::last(4)]
        fn test_remove_at_renumbers_following_elements(#[case] position: usize) {
            let mut storage = SetStorage::with_capacity_and_hasher(0, DefaultHashBuilder::default());
            for element in 0..5 {
                storage.append(element * 10);
            }
            let removed = storage.remove_at(position);
            assert_eq!(removed, position * 10);
            assert!(storage.is_consistent());
            assert_eq!(storage.position(&removed), None);
            for (index, element) in storage.elements.iter().enumerate() {
                assert_eq!(storage.position(element), Some(index));
            }
        }
    }

    mod facade {
        use super::*;

        #[rstest]
        fn test_from_iter_keeps_first_occurrence() {
            let set = letters("banana");
            assert_eq!(set.as_slice(), &['b', 'a', 'n']);
            assert!(set.storage.is_consistent());
        }

        #[rstest]
        fn test_reinsert_appends_at_end() {
            let mut set = letters("abc");
            set.remove(&'a');
            assert_eq!(set.insert('a'), (true, 2));
            assert_eq!(set.as_slice(), &['b', 'c', 'a']);
        }

        #[rstest]
        fn test_duplicate_insert_does_not_detach() {
            let original = letters("abc");
            let mut copy = original.clone();
            assert_eq!(copy.insert('b'), (false, 1));
            assert!(copy.shares_storage_with(&original));
        }

        #[rstest]
        fn test_absent_remove_does_not_detach() {
            let original = letters("abc");
            let mut copy = original.clone();
            assert_eq!(copy.remove(&'z'), None);
            assert!(copy.shares_storage_with(&original));
        }

        #[rstest]
        fn test_remove_on_shared_storage_leaves_original() {
            let original = letters("abc");
            let mut copy = original.clone();
            copy.remove(&'a');
            assert_eq!(original.index_of(&'b'), Some(1));
            assert_eq!(copy.index_of(&'b'), Some(0));
            assert!(original.storage.is_consistent());
            assert!(copy.storage.is_consistent());
        }

        #[rstest]
        fn test_remove_at_out_of_bounds() {
            let mut set = letters("ab");
            assert_eq!(set.remove_at(2), Err(BoundsError { index: 2, count: 2 }));
            assert_eq!(set.remove_at(0), Ok('a'));
            assert_eq!(set.index_of(&'b'), Some(0));
        }

        #[rstest]
        fn test_clear_keeping_capacity() {
            let mut set: OrderedSet<i32> = (0..100).collect();
            let capacity = set.capacity();
            set.clear(true);
            assert!(set.is_empty());
            assert_eq!(set.capacity(), capacity);
            set.clear(false);
            assert_eq!(set.capacity(), 0);
        }

        #[rstest]
        fn test_clear_shared_leaves_original() {
            let original = letters("abc");
            let mut copy = original.clone();
            copy.clear(true);
            assert!(copy.is_empty());
            assert_eq!(original.len(), 3);
        }

        #[rstest]
        fn test_set_algebra_preserves_order() {
            let left = letters("dcba");
            let right = letters("bdx");
            assert_eq!(left.union(&right).as_slice(), &['d', 'c', 'b', 'a', 'x']);
            assert_eq!(left.intersection(&right).as_slice(), &['d', 'b']);
            assert_eq!(left.difference(&right).as_slice(), &['c', 'a']);
        }

        #[rstest]
        fn test_equality_is_order_sensitive() {
            assert_eq!(letters("abc"), letters("abc"));
            assert_ne!(letters("abc"), letters("cba"));
        }

        #[rstest]
        fn test_debug_lists_in_insertion_order() {
            assert_eq!(format!("{:?}", letters("ba")), "{'b', 'a'}");
        }
    }
}

//! Copy-on-write double-ended queue (Deque).
//!
//! This module provides [`Deque`], a double-ended queue backed by a growable
//! ring buffer that is shared between clones until one of them writes.
//!
//! # Overview
//!
//! - O(1) amortized `push_front` and `push_back`
//! - O(1) `pop_front`, `pop_back`, `front`, `back`
//! - O(1) indexed access
//! - O(1) `clone`; the first mutation through a shared handle costs O(n)
//!
//! # Ring Buffer Layout
//!
//! The storage is a buffer of `capacity` slots plus a header recording the
//! physical slot of the logical-first element (`head`) and the element count.
//! Logical index `i` lives in slot `(head + i) % capacity`, so removing from
//! the front only advances `head` and nothing moves.
//!
//! ```text
//!   capacity = 8, head = 6, count = 4
//!
//!   slot:     0   1   2   3   4   5   6   7
//!           [ c | d | . | . | . | . | a | b ]
//!                                     ^ head
//!   logical order: a b c d
//! ```
//!
//! Growth at least doubles the capacity (starting at 4) and is the only
//! reallocation point. Every copy, whether for growth or because the storage
//! is shared, lays the elements out again from slot 0. Capacity is never
//! released by removals.
//!
//! # Examples
//!
//! ```rust
//! use cow_collections::collections::Deque;
//!
//! let mut deque = Deque::new();
//! deque.push_back(2);
//! deque.push_back(3);
//! deque.push_front(1);
//!
//! assert_eq!(deque.front(), Some(&1));
//! assert_eq!(deque.back(), Some(&3));
//!
//! // Copy-on-write: the clone keeps the old contents
//! let snapshot = deque.clone();
//! assert_eq!(deque.pop_front(), Ok(1));
//! assert_eq!(snapshot.len(), 3);
//! assert_eq!(deque.len(), 2);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::Index;

use super::error::{BoundsError, EmptyError};
use super::{ReferenceCounter, make_unique};

const CONTAINER_NAME: &str = "Deque";

/// Capacity allocated by the first growth of an empty deque.
const MINIMUM_CAPACITY: usize = 4;

// =============================================================================
// Index Arithmetic
// =============================================================================

/// Physical slot of logical index `logical` for a buffer starting at `head`.
#[inline]
const fn physical_index(head: usize, logical: usize, capacity: usize) -> usize {
    (head + logical) % capacity
}

#[inline]
const fn wrap_increment(index: usize, capacity: usize) -> usize {
    if index + 1 == capacity { 0 } else { index + 1 }
}

#[inline]
const fn wrap_decrement(index: usize, capacity: usize) -> usize {
    if index == 0 { capacity - 1 } else { index - 1 }
}

/// Capacity to grow to when `required` slots are needed.
#[inline]
fn grown_capacity(current: usize, required: usize) -> usize {
    current
        .saturating_mul(2)
        .max(MINIMUM_CAPACITY)
        .max(required)
}

// =============================================================================
// Ring Storage
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BufferHeader {
    capacity: usize,
    count: usize,
    head: usize,
}

/// Ring buffer backing a [`Deque`].
///
/// Slots outside the live range hold `None`, so dropping the storage drops
/// exactly the live elements.
struct RingStorage<T> {
    header: BufferHeader,
    slots: Vec<Option<T>>,
}

impl<T> RingStorage<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            header: BufferHeader {
                capacity,
                count: 0,
                head: 0,
            },
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
        }
    }

    /// Builds a linear storage (`head == 0`) from elements in logical order.
    fn from_vec(elements: Vec<T>) -> Self {
        let count = elements.len();
        Self {
            header: BufferHeader {
                capacity: count,
                count,
                head: 0,
            },
            slots: elements.into_iter().map(Some).collect(),
        }
    }

    #[inline]
    const fn len(&self) -> usize {
        self.header.count
    }

    #[inline]
    const fn capacity(&self) -> usize {
        self.header.capacity
    }

    #[inline]
    const fn physical(&self, logical: usize) -> usize {
        physical_index(self.header.head, logical, self.header.capacity)
    }

    fn get(&self, logical: usize) -> Option<&T> {
        if logical >= self.header.count {
            return None;
        }
        self.slots[self.physical(logical)].as_ref()
    }

    fn get_mut(&mut self, logical: usize) -> Option<&mut T> {
        if logical >= self.header.count {
            return None;
        }
        let physical = self.physical(logical);
        self.slots[physical].as_mut()
    }

    fn push_back(&mut self, element: T) {
        debug_assert!(self.header.count < self.header.capacity);
        let physical = self.physical(self.header.count);
        self.slots[physical] = Some(element);
        self.header.count += 1;
    }

    fn push_front(&mut self, element: T) {
        debug_assert!(self.header.count < self.header.capacity);
        self.header.head = wrap_decrement(self.header.head, self.header.capacity);
        self.slots[self.header.head] = Some(element);
        self.header.count += 1;
    }

    fn pop_front(&mut self) -> Option<T> {
        if self.header.count == 0 {
            return None;
        }
        let element = self.slots[self.header.head].take();
        self.header.head = wrap_increment(self.header.head, self.header.capacity);
        self.header.count -= 1;
        element
    }

    fn pop_back(&mut self) -> Option<T> {
        if self.header.count == 0 {
            return None;
        }
        self.header.count -= 1;
        let physical = self.physical(self.header.count);
        self.slots[physical].take()
    }

    fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.header.count = 0;
        self.header.head = 0;
    }

    /// Moves every element into a new linear storage of `capacity` slots,
    /// leaving `self` empty.
    fn relocated(&mut self, capacity: usize) -> Self {
        debug_assert!(capacity >= self.header.count);
        let mut relocated = Self::with_capacity(capacity);
        while let Some(element) = self.pop_front() {
            relocated.push_back(element);
        }
        relocated
    }

    /// Clones every element into a new linear storage of `capacity` slots.
    fn copied(&self, capacity: usize) -> Self
    where
        T: Clone,
    {
        debug_assert!(capacity >= self.header.count);
        let mut copied = Self::with_capacity(capacity);
        for logical in 0..self.header.count {
            if let Some(element) = self.get(logical) {
                copied.push_back(element.clone());
            }
        }
        copied
    }
}

impl<T: Clone> Clone for RingStorage<T> {
    fn clone(&self) -> Self {
        self.copied(self.header.capacity)
    }
}

// =============================================================================
// Deque
// =============================================================================

/// A copy-on-write double-ended queue.
///
/// Cloning a `Deque` is O(1): both handles share one ring buffer until either
/// is mutated. Mutating operations require `T: Clone` because a write through
/// a shared handle copies the elements.
///
/// # Time Complexity
///
/// | Operation          | Complexity     |
/// |--------------------|----------------|
/// | `push_front`       | O(1) amortized |
/// | `push_back`        | O(1) amortized |
/// | `pop_front`        | O(1)           |
/// | `pop_back`         | O(1)           |
/// | `front` / `back`   | O(1)           |
/// | `element_at`       | O(1)           |
/// | `clone`            | O(1)           |
/// | first write after `clone` | O(n)    |
///
/// # Examples
///
/// ```rust
/// use cow_collections::collections::Deque;
///
/// let mut deque: Deque<i32> = (1..=3).collect();
/// assert_eq!(deque.pop_back(), Ok(3));
/// assert_eq!(deque.pop_front(), Ok(1));
/// assert_eq!(deque.element_at(0), Ok(&2));
/// ```
pub struct Deque<T> {
    storage: ReferenceCounter<RingStorage<T>>,
}

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(Deque<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Deque<i32>: Send, Sync);

impl<T> Clone for Deque<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl<T> Deque<T> {
    /// Creates a new empty deque without allocating.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty deque with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: ReferenceCounter::new(RingStorage::with_capacity(capacity)),
        }
    }

    /// Returns the number of elements in the deque.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the deque contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of slots in the current buffer.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns a reference to the first element, if any.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.storage.get(0)
    }

    /// Returns a reference to the last element, if any.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.len()
            .checked_sub(1)
            .and_then(|last| self.storage.get(last))
    }

    /// Returns the element at `index`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.storage.get(index)
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsError`] carrying `index` and the current length when
    /// `index` is not in `[0, len)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cow_collections::collections::{BoundsError, Deque};
    ///
    /// let deque: Deque<char> = "ab".chars().collect();
    /// assert_eq!(deque.element_at(1), Ok(&'b'));
    /// assert_eq!(deque.element_at(2), Err(BoundsError { index: 2, count: 2 }));
    /// ```
    pub fn element_at(&self, index: usize) -> Result<&T, BoundsError> {
        self.get(index).ok_or(BoundsError {
            index,
            count: self.len(),
        })
    }

    /// Removes every element.
    ///
    /// With `keeping_capacity`, the buffer keeps its size (a shared buffer is
    /// replaced by a fresh one of the same size); otherwise the deque goes
    /// back to an unallocated buffer.
    pub fn clear(&mut self, keeping_capacity: bool) {
        if !keeping_capacity {
            self.storage = ReferenceCounter::new(RingStorage::with_capacity(0));
            return;
        }
        if let Some(storage) = ReferenceCounter::get_mut(&mut self.storage) {
            storage.clear();
            return;
        }
        let capacity = self.capacity();
        self.storage = ReferenceCounter::new(RingStorage::with_capacity(capacity));
    }

    /// Returns a front-to-back iterator.
    #[must_use]
    pub fn iter(&self) -> DequeIterator<'_, T> {
        DequeIterator {
            storage: &self.storage,
            front_index: 0,
            back_index: self.len(),
        }
    }

    /// Returns `true` if both deques currently share one buffer.
    #[inline]
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.storage, &other.storage)
    }
}

impl<T: Clone> Deque<T> {
    /// Appends an element to the back of the deque.
    pub fn push_back(&mut self, element: T) {
        self.storage_for_insertion(1).push_back(element);
    }

    /// Prepends an element to the front of the deque.
    pub fn push_front(&mut self, element: T) {
        self.storage_for_insertion(1).push_front(element);
    }

    /// Removes and returns the first element.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyError`] if the deque is empty; the deque is unchanged.
    pub fn pop_front(&mut self) -> Result<T, EmptyError> {
        let error = EmptyError {
            container: CONTAINER_NAME,
            operation: "pop_front",
        };
        if self.is_empty() {
            return Err(error);
        }
        make_unique(&mut self.storage, CONTAINER_NAME)
            .pop_front()
            .ok_or(error)
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyError`] if the deque is empty; the deque is unchanged.
    pub fn pop_back(&mut self) -> Result<T, EmptyError> {
        let error = EmptyError {
            container: CONTAINER_NAME,
            operation: "pop_back",
        };
        if self.is_empty() {
            return Err(error);
        }
        make_unique(&mut self.storage, CONTAINER_NAME)
            .pop_back()
            .ok_or(error)
    }

    /// Returns a mutable reference to the element at `index`, copying the
    /// buffer first if it is shared.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            return None;
        }
        make_unique(&mut self.storage, CONTAINER_NAME).get_mut(index)
    }

    /// Ensures the deque owns its buffer and that the buffer has at least
    /// `minimum_capacity` slots. The contents are unchanged. A buffer that
    /// has to grow at least doubles, as on insertion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cow_collections::collections::Deque;
    ///
    /// let mut deque: Deque<i32> = Deque::new();
    /// deque.reserve(10);
    /// assert!(deque.capacity() >= 10);
    /// ```
    pub fn reserve(&mut self, minimum_capacity: usize) {
        if minimum_capacity > self.capacity() {
            self.reallocate(grown_capacity(self.capacity(), minimum_capacity));
        } else {
            make_unique(&mut self.storage, CONTAINER_NAME);
        }
    }

    /// Returns uniquely owned storage with room for `additional` more elements.
    fn storage_for_insertion(&mut self, additional: usize) -> &mut RingStorage<T> {
        let required = self.len().saturating_add(additional);
        if required > self.capacity() {
            self.reallocate(grown_capacity(self.capacity(), required));
        }
        make_unique(&mut self.storage, CONTAINER_NAME)
    }

    /// Replaces the buffer by a linear one of `capacity` slots. Elements are
    /// moved when the buffer is uniquely owned and cloned otherwise.
    fn reallocate(&mut self, capacity: usize) {
        let previous_capacity = self.capacity();
        let replacement = match ReferenceCounter::get_mut(&mut self.storage) {
            Some(storage) => storage.relocated(capacity),
            None => self.storage.copied(capacity),
        };
        tracing::trace!(
            container = CONTAINER_NAME,
            previous_capacity,
            capacity,
            "reallocating ring buffer"
        );
        self.storage = ReferenceCounter::new(replacement);
    }
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Deque<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).unwrap_or_else(|| {
            panic!(
                "Deque index {index} out of bounds for length {}",
                self.len()
            )
        })
    }
}

impl<T: PartialEq> PartialEq for Deque<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for Deque<T> {}

impl<T: PartialOrd> PartialOrd for Deque<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for Deque<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for Deque<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<T>>().into()
    }
}

impl<T> From<Vec<T>> for Deque<T> {
    fn from(elements: Vec<T>) -> Self {
        Self {
            storage: ReferenceCounter::new(RingStorage::from_vec(elements)),
        }
    }
}

impl<T, const N: usize> From<[T; N]> for Deque<T> {
    fn from(elements: [T; N]) -> Self {
        Vec::from(elements).into()
    }
}

impl<T: Clone> Extend<T> for Deque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower_bound, _) = iter.size_hint();
        if lower_bound > 0 {
            self.storage_for_insertion(lower_bound);
        }
        for element in iter {
            self.push_back(element);
        }
    }
}

impl<T: Clone> IntoIterator for Deque<T> {
    type Item = T;
    type IntoIter = DequeIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        let storage = ReferenceCounter::try_unwrap(self.storage)
            .unwrap_or_else(|shared| RingStorage::clone(&shared));
        DequeIntoIterator { storage }
    }
}

impl<'a, T> IntoIterator for &'a Deque<T> {
    type Item = &'a T;
    type IntoIter = DequeIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Front-to-back iterator over references to the elements of a [`Deque`].
pub struct DequeIterator<'a, T> {
    storage: &'a RingStorage<T>,
    front_index: usize,
    back_index: usize,
}

impl<'a, T> Iterator for DequeIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front_index >= self.back_index {
            return None;
        }
        let result = self.storage.get(self.front_index);
        self.front_index += 1;
        result
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back_index - self.front_index;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for DequeIterator<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front_index >= self.back_index {
            return None;
        }
        self.back_index -= 1;
        self.storage.get(self.back_index)
    }
}

impl<T> ExactSizeIterator for DequeIterator<'_, T> {}

/// Owning front-to-back iterator over the elements of a [`Deque`].
pub struct DequeIntoIterator<T> {
    storage: RingStorage<T>,
}

impl<T> Iterator for DequeIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.storage.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.storage.len(), Some(self.storage.len()))
    }
}

impl<T> DoubleEndedIterator for DequeIntoIterator<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.storage.pop_back()
    }
}

impl<T> ExactSizeIterator for DequeIntoIterator<T> {}

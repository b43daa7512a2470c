//! Copy-on-write min-max heap.
//!
//! This module provides [`Heap`], a double-ended priority queue: both the
//! smallest and the largest element are available in O(1) and removable in
//! O(log n).
//!
//! # Min-Max Ordering
//!
//! The elements form an implicit complete binary tree in a single array.
//! Levels alternate between min levels (even depth, starting at the root)
//! and max levels (odd depth):
//!
//! ```text
//!   depth 0 (min)            1
//!                         /     \
//!   depth 1 (max)       9        8
//!                      / \      / \
//!   depth 2 (min)     3   4    2   5
//! ```
//!
//! An element on a min level is `<=` all of its descendants and an element
//! on a max level is `>=` all of its descendants. The minimum is therefore
//! the root and the maximum is the larger of the root's children.
//!
//! Both repair algorithms take the level of the node they start from and use
//! [`Level::precedes`] as their only comparison, so the min and max paths
//! are the same code.
//!
//! # Examples
//!
//! ```rust
//! use cow_collections::collections::Heap;
//!
//! let mut heap = Heap::new();
//! for element in [5, 3, 8, 1] {
//!     heap.insert(element);
//! }
//!
//! assert_eq!(heap.peek_min(), Some(&1));
//! assert_eq!(heap.peek_max(), Some(&8));
//! assert_eq!(heap.remove_min(), Some(1));
//! assert_eq!(heap.remove_max(), Some(8));
//! assert_eq!(heap.len(), 2);
//! ```

mod node;

use std::fmt;
use std::iter::FromIterator;

use super::inline_array::InlineArray;
use super::{ReferenceCounter, make_unique};
use node::{Level, Node};

const CONTAINER_NAME: &str = "Heap";

/// Default factor of [`BulkInsertStrategy::Heuristic`].
const DEFAULT_HEAPIFY_FACTOR: usize = 2;

// =============================================================================
// Bulk Insertion Strategy
// =============================================================================

/// How [`Heap::insert_all_with`] restores the heap order after appending a
/// batch of elements.
///
/// Appending `k` elements and bubbling each one up costs O(k log n), while
/// rebuilding the whole heap costs O(n). Every strategy yields a valid heap;
/// they only differ in speed.
///
/// # Examples
///
/// ```rust
/// use cow_collections::collections::BulkInsertStrategy;
///
/// let strategy = BulkInsertStrategy::default();
/// assert!(!strategy.should_heapify(1, 1024));
/// assert!(strategy.should_heapify(1000, 1024));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkInsertStrategy {
    /// Rebuild when `added > factor * total / floor(log2(total))`, where
    /// `total` is the size after insertion.
    Heuristic {
        /// Multiplier of the rebuild threshold.
        factor: usize,
    },
    /// Always rebuild the whole heap.
    AlwaysHeapify,
    /// Always bubble up each new element.
    AlwaysBubbleUp,
}

impl Default for BulkInsertStrategy {
    fn default() -> Self {
        Self::Heuristic {
            factor: DEFAULT_HEAPIFY_FACTOR,
        }
    }
}

impl BulkInsertStrategy {
    /// Returns `true` if a batch of `added` elements that brought the heap
    /// to `total` elements should be absorbed by a full rebuild.
    #[must_use]
    pub fn should_heapify(self, added: usize, total: usize) -> bool {
        match self {
            Self::Heuristic { factor } => {
                if total < 2 {
                    return false;
                }
                let logarithm = total.ilog2() as usize;
                added > factor.saturating_mul(total) / logarithm
            }
            Self::AlwaysHeapify => true,
            Self::AlwaysBubbleUp => false,
        }
    }
}

// =============================================================================
// Heap Repair
// =============================================================================

/// Moves the element at `node` up until the min-max order holds again.
///
/// The first step compares against the parent, which belongs to the other
/// level kind; after that the element only moves between grandparents.
fn bubble_up<T: Ord>(elements: &mut [T], node: Node) {
    let Some(parent) = node.parent() else {
        return;
    };

    let mut node = node;
    if parent
        .level()
        .precedes(&elements[node.offset], &elements[parent.offset])
    {
        elements.swap(node.offset, parent.offset);
        node = parent;
    }

    let level = node.level();
    while let Some(grandparent) = node.grandparent() {
        if !level.precedes(&elements[node.offset], &elements[grandparent.offset]) {
            break;
        }
        elements.swap(node.offset, grandparent.offset);
        node = grandparent;
    }
}

/// Returns the candidate holding the element that should sit highest on a
/// level of kind `level`.
fn best_of<T: Ord>(elements: &[T], level: Level, candidates: &[Node]) -> Option<Node> {
    let (&first, rest) = candidates.split_first()?;
    Some(rest.iter().fold(first, |best, &candidate| {
        if level.precedes(&elements[candidate.offset], &elements[best.offset]) {
            candidate
        } else {
            best
        }
    }))
}

/// Moves the element at `node` down until the min-max order holds again.
///
/// While all four grandchildren exist, the element is compared against the
/// best of them and moves two levels at a time; a displaced element that
/// violates the order of the intermediate parent is swapped with it. Once
/// fewer than four grandchildren remain, a final step considers the
/// children and the remaining grandchildren together.
fn trickle_down<T: Ord>(elements: &mut [T], node: Node) {
    let level = node.level();
    let count = elements.len();
    let mut node = node;

    loop {
        let first_grandchild = node.first_grandchild();
        if first_grandchild.offset + 3 >= count {
            break;
        }

        let grandchildren: InlineArray<Node, 4> = (0..4)
            .map(|index| Node {
                offset: first_grandchild.offset + index,
                depth: first_grandchild.depth,
            })
            .collect();
        let Some(best) = best_of(elements, level, &grandchildren) else {
            return;
        };
        if !level.precedes(&elements[best.offset], &elements[node.offset]) {
            return;
        }

        elements.swap(node.offset, best.offset);
        node = best;
        swap_with_parent_if_out_of_order(elements, level, node);
    }

    let mut candidates: InlineArray<Node, 5> = InlineArray::new();
    for child in [node.left_child(), node.right_child()] {
        if child.offset < count {
            candidates.push(child);
        }
    }
    let first_grandchild = node.first_grandchild();
    for offset in first_grandchild.offset..count {
        candidates.push(Node {
            offset,
            depth: first_grandchild.depth,
        });
    }

    let Some(best) = best_of(elements, level, &candidates) else {
        return;
    };
    if !level.precedes(&elements[best.offset], &elements[node.offset]) {
        return;
    }

    elements.swap(node.offset, best.offset);
    if best.depth == node.depth + 2 {
        swap_with_parent_if_out_of_order(elements, level, best);
    }
}

fn swap_with_parent_if_out_of_order<T: Ord>(elements: &mut [T], level: Level, node: Node) {
    if let Some(parent) = node.parent()
        && level.precedes(&elements[parent.offset], &elements[node.offset])
    {
        elements.swap(parent.offset, node.offset);
    }
}

/// Rebuilds the min-max order of arbitrary `elements` in O(n), bottom-up
/// from the deepest level that has children.
fn heapify<T: Ord>(elements: &mut [T]) {
    let count = elements.len();
    if count < 2 {
        return;
    }
    let first_leaf = count / 2;
    let deepest = Node::new(first_leaf - 1).depth;
    for depth in (0..=deepest).rev() {
        for node in Node::nodes_at_depth(depth, first_leaf) {
            trickle_down(elements, node);
        }
    }
}

/// The root child holding the maximum. Requires at least three elements.
fn max_child_of_root<T: Ord>(elements: &[T]) -> Node {
    let left = Node::ROOT.left_child();
    let right = Node::ROOT.right_child();
    if elements[right.offset] > elements[left.offset] {
        right
    } else {
        left
    }
}

// =============================================================================
// Heap
// =============================================================================

/// A copy-on-write min-max heap.
///
/// Cloning a `Heap` is O(1); the first mutation through a shared handle
/// copies the elements.
///
/// # Time Complexity
///
/// | Operation                   | Complexity              |
/// |-----------------------------|-------------------------|
/// | `peek_min` / `peek_max`     | O(1)                    |
/// | `insert`                    | O(log n)                |
/// | `remove_min` / `remove_max` | O(log n)                |
/// | `replace_min` / `replace_max` | O(log n)              |
/// | `insert_all`                | O(min(k log n, n))      |
/// | `from_iter`                 | O(n)                    |
///
/// # Examples
///
/// ```rust
/// use cow_collections::collections::Heap;
///
/// let heap: Heap<i32> = vec![4, 1, 7, 3].into();
/// let snapshot = heap.clone();
///
/// let mut drained = heap;
/// let mut ascending = Vec::new();
/// while let Some(element) = drained.remove_min() {
///     ascending.push(element);
/// }
///
/// assert_eq!(ascending, vec![1, 3, 4, 7]);
/// assert_eq!(snapshot.len(), 4);
/// ```
pub struct Heap<T> {
    storage: ReferenceCounter<Vec<T>>,
}

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(Heap<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Heap<i32>: Send, Sync);

impl<T> Clone for Heap<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl<T> Heap<T> {
    /// Creates a new empty heap.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty heap with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: ReferenceCounter::new(Vec::with_capacity(capacity)),
        }
    }

    /// Returns the number of elements in the heap.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the heap contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns the capacity of the backing array.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns the elements in array order, which is neither ascending nor
    /// descending.
    #[inline]
    #[must_use]
    pub fn unordered_elements(&self) -> &[T] {
        &self.storage
    }

    /// Iterates the elements in array order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.storage.iter()
    }

    /// Returns `true` if both heaps currently share one array.
    #[inline]
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.storage, &other.storage)
    }
}

impl<T: Ord> Heap<T> {
    /// Returns the smallest element, if any.
    #[inline]
    #[must_use]
    pub fn peek_min(&self) -> Option<&T> {
        self.storage.first()
    }

    /// Returns the largest element, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cow_collections::collections::Heap;
    ///
    /// let heap: Heap<i32> = [2, 9, 4].into_iter().collect();
    /// assert_eq!(heap.peek_max(), Some(&9));
    /// ```
    #[must_use]
    pub fn peek_max(&self) -> Option<&T> {
        match self.len() {
            0 | 1 => self.storage.first(),
            2 => self.storage.get(1),
            _ => self.storage.get(max_child_of_root(&self.storage).offset),
        }
    }
}

impl<T: Ord + Clone> Heap<T> {
    /// Inserts an element.
    pub fn insert(&mut self, element: T) {
        let elements = make_unique(&mut self.storage, CONTAINER_NAME);
        elements.push(element);
        let node = Node::new(elements.len() - 1);
        bubble_up(elements, node);
    }

    /// Inserts every element of `iter` using the default
    /// [`BulkInsertStrategy`].
    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all_with(iter, BulkInsertStrategy::default());
    }

    /// Inserts every element of `iter`, restoring the heap order as chosen
    /// by `strategy`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cow_collections::collections::{BulkInsertStrategy, Heap};
    ///
    /// let mut heap: Heap<i32> = Heap::new();
    /// heap.insert_all_with([3, 1, 2], BulkInsertStrategy::AlwaysBubbleUp);
    /// heap.insert_all_with([9, 0], BulkInsertStrategy::AlwaysHeapify);
    /// assert_eq!(heap.peek_min(), Some(&0));
    /// assert_eq!(heap.peek_max(), Some(&9));
    /// ```
    pub fn insert_all_with<I: IntoIterator<Item = T>>(
        &mut self,
        iter: I,
        strategy: BulkInsertStrategy,
    ) {
        let elements = make_unique(&mut self.storage, CONTAINER_NAME);
        let original = elements.len();
        elements.extend(iter);
        let total = elements.len();
        let added = total - original;
        if added == 0 {
            return;
        }

        let rebuild = strategy.should_heapify(added, total);
        tracing::trace!(
            container = CONTAINER_NAME,
            added,
            total,
            rebuild,
            "restoring heap order after bulk insertion"
        );
        if rebuild {
            heapify(elements);
        } else {
            for offset in original..total {
                bubble_up(elements, Node::new(offset));
            }
        }
    }

    /// Removes and returns the smallest element, or `None` if the heap is
    /// empty.
    pub fn remove_min(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let elements = make_unique(&mut self.storage, CONTAINER_NAME);
        let mut removed = elements.pop()?;
        if elements.is_empty() {
            return Some(removed);
        }
        std::mem::swap(&mut removed, &mut elements[Node::ROOT.offset]);
        trickle_down(elements, Node::ROOT);
        Some(removed)
    }

    /// Removes and returns the largest element, or `None` if the heap is
    /// empty.
    pub fn remove_max(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let elements = make_unique(&mut self.storage, CONTAINER_NAME);
        if elements.len() <= 2 {
            return elements.pop();
        }

        let max_node = max_child_of_root(elements);
        let mut removed = elements.pop()?;
        if max_node.offset == elements.len() {
            return Some(removed);
        }
        std::mem::swap(&mut removed, &mut elements[max_node.offset]);
        trickle_down(elements, max_node);
        Some(removed)
    }

    /// Replaces the smallest element with `replacement` and returns it.
    ///
    /// Equivalent to `remove_min` followed by `insert`, in a single repair
    /// pass.
    ///
    /// # Panics
    ///
    /// Panics if the heap is empty.
    pub fn replace_min(&mut self, replacement: T) -> T {
        assert!(!self.is_empty(), "Heap::replace_min: heap is empty");
        let elements = make_unique(&mut self.storage, CONTAINER_NAME);
        let removed = std::mem::replace(&mut elements[Node::ROOT.offset], replacement);
        trickle_down(elements, Node::ROOT);
        removed
    }

    /// Replaces the largest element with `replacement` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the heap is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cow_collections::collections::Heap;
    ///
    /// let mut heap: Heap<i32> = [5, 10, 8].into_iter().collect();
    /// assert_eq!(heap.replace_max(1), 10);
    /// assert_eq!(heap.peek_min(), Some(&1));
    /// assert_eq!(heap.peek_max(), Some(&8));
    /// ```
    pub fn replace_max(&mut self, replacement: T) -> T {
        assert!(!self.is_empty(), "Heap::replace_max: heap is empty");
        let elements = make_unique(&mut self.storage, CONTAINER_NAME);
        if elements.len() == 1 {
            return std::mem::replace(&mut elements[Node::ROOT.offset], replacement);
        }

        let max_node = if elements.len() == 2 {
            Node::ROOT.left_child()
        } else {
            max_child_of_root(elements)
        };
        let removed = std::mem::replace(&mut elements[max_node.offset], replacement);
        // The replacement may belong at the root; whatever ends up at
        // `max_node` afterwards is then pushed down the max levels.
        bubble_up(elements, max_node);
        trickle_down(elements, max_node);
        removed
    }

    /// Ensures the heap owns its array and has room for `additional` more
    /// elements.
    pub fn reserve(&mut self, additional: usize) {
        make_unique(&mut self.storage, CONTAINER_NAME).reserve(additional);
    }

    /// Returns the elements in array order.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        ReferenceCounter::try_unwrap(self.storage).unwrap_or_else(|shared| shared.to_vec())
    }

    /// Returns the elements in ascending order.
    #[must_use]
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Some(element) = self.remove_min() {
            sorted.push(element);
        }
        sorted
    }
}

impl<T> Default for Heap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Two heaps are equal when they hold the same multiset of elements,
/// whatever their array layout.
impl<T: Ord> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if self.shares_storage_with(other) {
            return true;
        }
        let mut left: Vec<&T> = self.iter().collect();
        let mut right: Vec<&T> = other.iter().collect();
        left.sort_unstable();
        right.sort_unstable();
        left == right
    }
}

impl<T: Ord> Eq for Heap<T> {}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("elements", &self.unordered_elements())
            .finish()
    }
}

impl<T: Ord> From<Vec<T>> for Heap<T> {
    fn from(mut elements: Vec<T>) -> Self {
        heapify(&mut elements);
        Self {
            storage: ReferenceCounter::new(elements),
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for Heap<T> {
    fn from(elements: [T; N]) -> Self {
        Vec::from(elements).into()
    }
}

impl<T: Ord> FromIterator<T> for Heap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<T>>().into()
    }
}

impl<T: Ord + Clone> Extend<T> for Heap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<'a, T> IntoIterator for &'a Heap<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

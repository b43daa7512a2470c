//! Copy-on-write containers.
//!
//! This module provides value containers that share their storage between
//! clones and copy it lazily, on the first write through a shared handle:
//!
//! - [`Deque`]: Double-ended queue over a ring buffer
//! - [`Heap`]: Min-max heap (double-ended priority queue)
//! - [`OrderedSet`]: Unique elements in insertion order with a position map
//! - [`InlineArray`]: Fixed-capacity inline array
//!
//! # Copy-on-Write
//!
//! Each container holds a [`ReferenceCounter`] to its storage. Reads never
//! copy. Every mutating operation first checks whether the handle is the sole
//! owner of the storage and, if it is not, replaces it with a private deep
//! copy before mutating in place.
//!
//! # Examples
//!
//! ## `Deque`
//!
//! ```rust
//! use cow_collections::collections::Deque;
//!
//! let mut deque = Deque::new();
//! deque.push_back(2);
//! deque.push_front(1);
//! assert_eq!(deque.front(), Some(&1));
//!
//! let snapshot = deque.clone();
//! deque.push_back(3);
//! assert_eq!(snapshot.len(), 2);     // Snapshot unchanged
//! assert_eq!(deque.len(), 3);
//! ```
//!
//! ## `Heap`
//!
//! ```rust
//! use cow_collections::collections::Heap;
//!
//! let mut heap: Heap<i32> = [5, 3, 8, 1].into_iter().collect();
//! assert_eq!(heap.peek_min(), Some(&1));
//! assert_eq!(heap.peek_max(), Some(&8));
//! assert_eq!(heap.remove_max(), Some(8));
//! ```
//!
//! ## `OrderedSet`
//!
//! ```rust
//! use cow_collections::collections::OrderedSet;
//!
//! let mut set = OrderedSet::new();
//! assert_eq!(set.insert("a"), (true, 0));
//! assert_eq!(set.insert("b"), (true, 1));
//! assert_eq!(set.insert("a"), (false, 0));
//!
//! set.remove("a");
//! assert_eq!(set.index_of("b"), Some(0));
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`, so
/// containers of `Send + Sync` elements may be shared across threads for
/// reading.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

/// Returns exclusive access to the storage behind `handle`, copying it first
/// if any other handle shares it.
///
/// Containers never hand out weak references, so a strong count of one means
/// the handle is the sole owner.
pub(crate) fn make_unique<'a, S: Clone>(
    handle: &'a mut ReferenceCounter<S>,
    container: &'static str,
) -> &'a mut S {
    if !is_unique(handle) {
        tracing::trace!(
            container,
            shared_by = ReferenceCounter::strong_count(handle),
            "copying shared storage before mutation"
        );
    }
    ReferenceCounter::make_mut(handle)
}

#[inline]
pub(crate) fn is_unique<S>(handle: &ReferenceCounter<S>) -> bool {
    ReferenceCounter::strong_count(handle) == 1
}

mod error;
mod inline_array;

#[cfg(feature = "deque")]
mod deque;
#[cfg(feature = "heap")]
mod heap;
#[cfg(feature = "ordered-set")]
mod ordered_set;

pub use error::BoundsError;
pub use error::CollectionError;
pub use error::EmptyError;
pub use inline_array::InlineArray;

#[cfg(feature = "deque")]
pub use deque::Deque;
#[cfg(feature = "deque")]
pub use deque::DequeIntoIterator;
#[cfg(feature = "deque")]
pub use deque::DequeIterator;
#[cfg(feature = "heap")]
pub use heap::BulkInsertStrategy;
#[cfg(feature = "heap")]
pub use heap::Heap;
#[cfg(feature = "ordered-set")]
pub use ordered_set::DefaultHashBuilder;
#[cfg(feature = "ordered-set")]
pub use ordered_set::OrderedSet;
#[cfg(feature = "ordered-set")]
pub use ordered_set::OrderedSetIntoIterator;

// =============================================================================
// Tests
// =============================================================================

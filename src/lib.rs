//! # cow-collections
//!
//! Copy-on-write value containers over contiguous buffers.
//!
//! ## Overview
//!
//! Every container in this crate is a lightweight handle to a
//! reference-counted storage object. Cloning a container is O(1) and shares
//! the storage; the first mutation through a shared handle copies the storage
//! so that no other handle ever observes the write.
//!
//! - **`Deque`**: double-ended queue over a growable ring buffer
//! - **`Heap`**: min-max heap with O(1) access to both extremes
//! - **`OrderedSet`**: unique elements in insertion order with O(1) lookups
//! - **`InlineArray`**: fixed-capacity inline array used by the heap
//!
//! ## Feature Flags
//!
//! - `deque`: `Deque`
//! - `heap`: `Heap`
//! - `ordered-set`: `OrderedSet`
//! - `arc`: share storage through `Arc` instead of `Rc` (containers become `Send + Sync`)
//! - `fxhash` / `ahash`: faster default hasher for `OrderedSet`
//! - `full`: all containers plus `arc`
//!
//! ## Example
//!
//! ```rust
//! use cow_collections::prelude::*;
//!
//! let original: Deque<i32> = [1, 2, 3].into_iter().collect();
//! let mut copy = original.clone();
//! copy.push_back(4);
//!
//! assert_eq!(original.len(), 3);
//! assert_eq!(copy.len(), 4);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the containers and their error types.
///
/// # Usage
///
/// ```rust
/// use cow_collections::prelude::*;
/// ```
pub mod prelude {
    pub use crate::collections::*;
}

pub mod collections;

//! Error types for the containers.
//!
//! These are the recoverable failures: removing from an empty container and
//! bounds-checked element access. Caller contract violations such as an
//! out-of-range `container[index]` panic instead.

/// Represents an attempt to remove an element from an empty container.
///
/// # Examples
///
/// ```rust
/// use cow_collections::collections::{Deque, EmptyError};
///
/// let mut deque: Deque<i32> = Deque::new();
/// let error = deque.pop_front().unwrap_err();
/// assert_eq!(
///     error,
///     EmptyError { container: "Deque", operation: "pop_front" }
/// );
/// assert_eq!(format!("{error}"), "Deque::pop_front: container is empty");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyError {
    /// The name of the container that was empty.
    pub container: &'static str,
    /// The name of the operation that failed.
    pub operation: &'static str,
}

impl std::fmt::Display for EmptyError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}::{}: container is empty",
            self.container, self.operation
        )
    }
}

impl std::error::Error for EmptyError {}

/// Represents a bounds-checked access outside `[0, count)`.
///
/// Carries the requested index and the element count at the time of the
/// access.
///
/// # Examples
///
/// ```rust
/// use cow_collections::collections::{BoundsError, Deque};
///
/// let deque: Deque<i32> = [1, 2, 3].into_iter().collect();
/// let error = deque.element_at(5).unwrap_err();
/// assert_eq!(error, BoundsError { index: 5, count: 3 });
/// assert_eq!(format!("{error}"), "index 5 out of bounds for length 3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsError {
    /// The index that was requested.
    pub index: usize,
    /// The number of elements in the container.
    pub count: usize,
}

impl std::fmt::Display for BoundsError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "index {} out of bounds for length {}",
            self.index, self.count
        )
    }
}

impl std::error::Error for BoundsError {}

/// Unified error type for container operations.
///
/// Both concrete errors convert into it, so code mixing pops and indexed
/// reads can propagate failures with `?`.
///
/// # Examples
///
/// ```rust
/// use cow_collections::collections::{CollectionError, Deque};
///
/// fn second_then_pop(deque: &mut Deque<i32>) -> Result<i32, CollectionError> {
///     let second = *deque.element_at(1)?;
///     let front = deque.pop_front()?;
///     Ok(second + front)
/// }
///
/// let mut deque: Deque<i32> = [10, 20].into_iter().collect();
/// assert_eq!(second_then_pop(&mut deque), Ok(30));
/// assert!(matches!(
///     second_then_pop(&mut deque),
///     Err(CollectionError::OutOfBounds(_))
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionError {
    /// The container had no element to remove.
    Empty(EmptyError),
    /// An index was outside the container's bounds.
    OutOfBounds(BoundsError),
}

impl std::fmt::Display for CollectionError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(error) => write!(formatter, "{error}"),
            Self::OutOfBounds(error) => write!(formatter, "{error}"),
        }
    }
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Empty(error) => Some(error),
            Self::OutOfBounds(error) => Some(error),
        }
    }
}

impl From<EmptyError> for CollectionError {
    fn from(error: EmptyError) -> Self {
        Self::Empty(error)
    }
}

impl From<BoundsError> for CollectionError {
    fn from(error: BoundsError) -> Self {
        Self::OutOfBounds(error)
    }
}

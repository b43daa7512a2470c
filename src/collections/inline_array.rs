//! Fixed-capacity inline array.
//!
//! [`InlineArray`] stores up to `N` elements without heap allocation. It is
//! the scratch buffer the heap uses to collect trickle-down candidates, and
//! is public for callers that need a small bounded sequence.
//!
//! Exceeding the capacity is a caller contract violation and panics;
//! [`InlineArray::try_push`] is the non-panicking alternative.

use arrayvec::ArrayVec;
use std::fmt;
use std::ops::Deref;

/// A sequence of at most `N` elements stored inline.
///
/// # Examples
///
/// ```rust
/// use cow_collections::collections::InlineArray;
///
/// let mut array: InlineArray<u8, 4> = InlineArray::repeating(2, 0);
/// array.push(7);
/// assert_eq!(array.as_slice(), &[0, 0, 7]);
/// assert_eq!(array.try_push(8), Ok(()));
/// assert_eq!(array.try_push(9), Err(9));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct InlineArray<T, const N: usize> {
    elements: ArrayVec<T, N>,
}

impl<T, const N: usize> InlineArray<T, N> {
    /// Creates an empty array.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: ArrayVec::new_const(),
        }
    }

    /// Creates an array holding `count` copies of `value`.
    ///
    /// # Panics
    ///
    /// Panics if `count` is greater than the capacity `N`.
    #[must_use]
    pub fn repeating(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        assert!(
            count <= N,
            "InlineArray::repeating: count {count} exceeds capacity {N}"
        );
        let mut elements = ArrayVec::new();
        elements.extend(std::iter::repeat_n(value, count));
        Self { elements }
    }

    /// Appends an element.
    ///
    /// # Panics
    ///
    /// Panics if the array is already full.
    #[inline]
    pub fn push(&mut self, element: T) {
        assert!(
            !self.elements.is_full(),
            "InlineArray::push: capacity {N} exceeded"
        );
        self.elements.push(element);
    }

    /// Appends an element, handing it back if the array is full.
    ///
    /// # Errors
    ///
    /// Returns `Err(element)` when the array already holds `N` elements.
    #[inline]
    pub fn try_push(&mut self, element: T) -> Result<(), T> {
        self.elements
            .try_push(element)
            .map_err(arrayvec::CapacityError::element)
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the array holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the fixed capacity `N`.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the elements as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.elements.as_slice()
    }
}

impl<T, const N: usize> Default for InlineArray<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Deref for InlineArray<T, N> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for InlineArray<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// # Panics
///
/// Panics if the iterator yields more than `N` elements.
impl<T, const N: usize> FromIterator<T> for InlineArray<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        for element in iter {
            array.push(element);
        }
        array
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a InlineArray<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_is_empty() {
        let array: InlineArray<i32, 4> = InlineArray::new();
        assert!(array.is_empty());
        assert_eq!(array.len(), 0);
        assert_eq!(array.capacity(), 4);
    }

    #[rstest]
    #[case::none(0)]
    #[case::some(2)]
    #[case::full(4)]
    fn test_repeating_fills_count(#[case] count: usize) {
        let array: InlineArray<char, 4> = InlineArray::repeating(count, 'x');
        assert_eq!(array.len(), count);
        assert!(array.iter().all(|&c| c == 'x'));
    }

    #[rstest]
    #[should_panic(expected = "exceeds capacity")]
    fn test_repeating_beyond_capacity_panics() {
        let _ = InlineArray::<i32, 2>::repeating(3, 0);
    }

    #[rstest]
    #[should_panic(expected = "capacity 1 exceeded")]
    fn test_push_when_full_panics() {
        let mut array: InlineArray<i32, 1> = InlineArray::new();
        array.push(1);
        array.push(2);
    }

    #[rstest]
    fn test_try_push_returns_element_when_full() {
        let mut array: InlineArray<String, 1> = InlineArray::new();
        assert_eq!(array.try_push("a".to_string()), Ok(()));
        assert_eq!(array.try_push("b".to_string()), Err("b".to_string()));
        assert_eq!(array.as_slice(), &["a".to_string()]);
    }

    #[rstest]
    fn test_collect_and_deref() {
        let array: InlineArray<i32, 6> = (1..=3).collect();
        assert_eq!(&*array, &[1, 2, 3]);
        assert_eq!(array.first(), Some(&1));
        assert_eq!(format!("{array:?}"), "[1, 2, 3]");
    }
}

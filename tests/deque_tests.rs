//! Unit tests for Deque.
//!
//! These tests cover the end operations, indexed access, growth and the
//! behavior of the ring buffer once the live range wraps around.

#![cfg(feature = "deque")]

use cow_collections::collections::{BoundsError, CollectionError, Deque, EmptyError};
use rstest::rstest;

// =============================================================================
// Construction
// =============================================================================

#[rstest]
fn test_new_creates_empty_deque() {
    let deque: Deque<i32> = Deque::new();
    assert!(deque.is_empty());
    assert_eq!(deque.len(), 0);
    assert_eq!(deque.capacity(), 0);
    assert_eq!(deque.front(), None);
    assert_eq!(deque.back(), None);
}

#[rstest]
#[case::zero(0)]
#[case::small(3)]
#[case::large(100)]
fn test_with_capacity_preallocates(#[case] capacity: usize) {
    let deque: Deque<String> = Deque::with_capacity(capacity);
    assert!(deque.is_empty());
    assert_eq!(deque.capacity(), capacity);
}

#[rstest]
fn test_from_array_keeps_order() {
    let deque = Deque::from([1, 2, 3]);
    assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(deque.front(), Some(&1));
    assert_eq!(deque.back(), Some(&3));
}

// =============================================================================
// End Operations
// =============================================================================

#[rstest]
fn test_push_front_then_pop_back_is_fifo() {
    let mut deque = Deque::new();
    for element in 0..10 {
        deque.push_front(element);
    }
    for expected in 0..10 {
        assert_eq!(deque.pop_back(), Ok(expected));
    }
    assert!(deque.is_empty());
}

#[rstest]
fn test_push_back_then_pop_back_is_lifo() {
    let mut deque = Deque::new();
    for element in 0..10 {
        deque.push_back(element);
    }
    for expected in (0..10).rev() {
        assert_eq!(deque.pop_back(), Ok(expected));
    }
}

#[rstest]
#[case::front(true)]
#[case::back(false)]
fn test_pop_on_empty_reports_operation(#[case] from_front: bool) {
    let mut deque: Deque<i32> = Deque::new();
    let result = if from_front {
        deque.pop_front()
    } else {
        deque.pop_back()
    };
    let error = result.unwrap_err();
    assert_eq!(error.container, "Deque");
    assert_eq!(
        error.operation,
        if from_front { "pop_front" } else { "pop_back" }
    );
    assert!(deque.is_empty());
}

#[rstest]
fn test_empty_error_converts_into_collection_error() {
    let mut deque: Deque<u8> = Deque::new();
    let error: CollectionError = deque.pop_front().unwrap_err().into();
    assert_eq!(
        error,
        CollectionError::Empty(EmptyError {
            container: "Deque",
            operation: "pop_front",
        })
    );
}

// =============================================================================
// Indexed Access
// =============================================================================

#[rstest]
fn test_element_at_follows_logical_order() {
    let mut deque = Deque::new();
    deque.push_back('b');
    deque.push_back('c');
    deque.push_front('a');
    assert_eq!(deque.element_at(0), Ok(&'a'));
    assert_eq!(deque.element_at(2), Ok(&'c'));
    assert_eq!(deque[1], 'b');
}

#[rstest]
#[case::at_length(3)]
#[case::far_beyond(usize::MAX)]
fn test_element_at_out_of_bounds(#[case] index: usize) {
    let deque = Deque::from(vec![1, 2, 3]);
    assert_eq!(deque.element_at(index), Err(BoundsError { index, count: 3 }));
    assert_eq!(deque.get(index), None);
}

#[rstest]
#[should_panic(expected = "out of bounds")]
fn test_index_out_of_bounds_panics() {
    let deque: Deque<i32> = Deque::new();
    let _ = deque[0];
}

#[rstest]
fn test_get_mut_changes_element_in_place() {
    let mut deque = Deque::from(vec![1, 2, 3]);
    if let Some(element) = deque.get_mut(1) {
        *element = 20;
    }
    assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![1, 20, 3]);
    assert!(deque.get_mut(3).is_none());
}

// =============================================================================
// Wrap-Around and Growth
// =============================================================================

/// Builds a deque whose live range wraps past the end of its buffer.
fn wrapped_deque() -> Deque<i32> {
    let mut deque = Deque::with_capacity(8);
    for element in 0..8 {
        deque.push_back(element);
    }
    for _ in 0..5 {
        deque.pop_front().unwrap();
    }
    for element in 8..12 {
        deque.push_back(element);
    }
    deque
}

#[rstest]
fn test_wrapped_deque_reads_in_logical_order() {
    let deque = wrapped_deque();
    assert_eq!(deque.capacity(), 8);
    assert_eq!(
        deque.iter().copied().collect::<Vec<_>>(),
        vec![5, 6, 7, 8, 9, 10, 11]
    );
    assert_eq!(deque.iter().rev().next(), Some(&11));
    assert_eq!(deque[3], 8);
}

#[rstest]
fn test_growth_from_wrapped_state_keeps_order() {
    let mut deque = wrapped_deque();
    deque.push_back(12);
    deque.push_back(13);
    assert_eq!(deque.capacity(), 16);
    assert_eq!(
        deque.iter().copied().collect::<Vec<_>>(),
        (5..14).collect::<Vec<_>>()
    );
}

#[rstest]
fn test_growth_at_least_doubles() {
    let mut deque = Deque::new();
    deque.push_back(0);
    assert_eq!(deque.capacity(), 4);
    for element in 1..5 {
        deque.push_back(element);
    }
    assert_eq!(deque.capacity(), 8);
}

#[rstest]
fn test_reserve_never_shrinks() {
    let mut deque = Deque::from(vec![1, 2, 3]);
    deque.reserve(50);
    assert!(deque.capacity() >= 50);
    let capacity = deque.capacity();
    deque.reserve(1);
    assert_eq!(deque.capacity(), capacity);
    assert_eq!(deque.len(), 3);
}

#[rstest]
fn test_removal_keeps_capacity() {
    let mut deque: Deque<i32> = (0..20).collect();
    let capacity = deque.capacity();
    while deque.pop_front().is_ok() {}
    assert_eq!(deque.capacity(), capacity);
}

#[rstest]
#[case::keeping(true)]
#[case::releasing(false)]
fn test_clear(#[case] keeping_capacity: bool) {
    let mut deque = Deque::from(vec![1, 2, 3, 4, 5]);
    let capacity = deque.capacity();
    deque.clear(keeping_capacity);
    assert!(deque.is_empty());
    let expected = if keeping_capacity { capacity } else { 0 };
    assert_eq!(deque.capacity(), expected);
}

// =============================================================================
// Trait Implementations
// =============================================================================

#[rstest]
fn test_equality_ignores_buffer_layout() {
    let wrapped = wrapped_deque();
    let linear = Deque::from(vec![5, 6, 7, 8, 9, 10, 11]);
    assert_eq!(wrapped, linear);
    assert_ne!(wrapped, Deque::from(vec![5, 6, 7]));
}

#[rstest]
fn test_ordering_is_lexicographic() {
    assert!(Deque::from([1, 2]) < Deque::from([1, 3]));
    assert!(Deque::from([1, 2]) < Deque::from([1, 2, 0]));
}

#[rstest]
fn test_debug_lists_elements() {
    assert_eq!(format!("{:?}", Deque::from(['a', 'b'])), "['a', 'b']");
}

#[rstest]
fn test_extend_appends() {
    let mut deque = Deque::from(vec![1]);
    deque.extend(2..=4);
    assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
}

#[rstest]
fn test_into_iter_is_double_ended() {
    let deque = wrapped_deque();
    let mut iterator = deque.into_iter();
    assert_eq!(iterator.len(), 7);
    assert_eq!(iterator.next(), Some(5));
    assert_eq!(iterator.next_back(), Some(11));
    assert_eq!(iterator.collect::<Vec<_>>(), vec![6, 7, 8, 9, 10]);
}

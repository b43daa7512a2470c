//! Node addressing for the implicit min-max tree.
//!
//! The heap is a complete binary tree stored in breadth-first order: the
//! children of offset `k` are `2k + 1` and `2k + 2`. Even depths are min
//! levels, odd depths are max levels.

/// Ordering convention of a tree level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Level {
    /// Every element is less than or equal to all of its descendants.
    Min,
    /// Every element is greater than or equal to all of its descendants.
    Max,
}

impl Level {
    #[inline]
    const fn of_depth(depth: u32) -> Self {
        if depth % 2 == 0 { Self::Min } else { Self::Max }
    }

    /// Returns `true` if `candidate` must sit above `other` on a level of
    /// this kind.
    #[inline]
    pub(super) fn precedes<T: Ord>(self, candidate: &T, other: &T) -> bool {
        match self {
            Self::Min => candidate < other,
            Self::Max => candidate > other,
        }
    }
}

/// A position in the tree. The depth is cached because every repair step
/// needs the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Node {
    pub(super) offset: usize,
    pub(super) depth: u32,
}

impl Node {
    pub(super) const ROOT: Self = Self {
        offset: 0,
        depth: 0,
    };

    #[inline]
    pub(super) const fn new(offset: usize) -> Self {
        Self {
            offset,
            depth: depth_of(offset),
        }
    }

    #[inline]
    pub(super) const fn level(self) -> Level {
        Level::of_depth(self.depth)
    }

    #[inline]
    pub(super) const fn parent(self) -> Option<Self> {
        if self.depth == 0 {
            return None;
        }
        Some(Self {
            offset: (self.offset - 1) / 2,
            depth: self.depth - 1,
        })
    }

    #[inline]
    pub(super) const fn grandparent(self) -> Option<Self> {
        if self.depth < 2 {
            return None;
        }
        Some(Self {
            offset: (self.offset - 3) / 4,
            depth: self.depth - 2,
        })
    }

    #[inline]
    pub(super) const fn left_child(self) -> Self {
        Self {
            offset: 2 * self.offset + 1,
            depth: self.depth + 1,
        }
    }

    #[inline]
    pub(super) const fn right_child(self) -> Self {
        Self {
            offset: 2 * self.offset + 2,
            depth: self.depth + 1,
        }
    }

    /// The leftmost grandchild; the other three follow it contiguously.
    #[inline]
    pub(super) const fn first_grandchild(self) -> Self {
        Self {
            offset: 4 * self.offset + 3,
            depth: self.depth + 2,
        }
    }

    /// Nodes at `depth` whose offsets are below `limit`, left to right.
    pub(super) fn nodes_at_depth(depth: u32, limit: usize) -> impl Iterator<Item = Self> {
        let first = first_offset(depth);
        let end = first_offset(depth + 1).min(limit);
        (first..end).map(move |offset| Self { offset, depth })
    }
}

#[inline]
const fn depth_of(offset: usize) -> u32 {
    (offset + 1).ilog2()
}

#[inline]
const fn first_offset(depth: u32) -> usize {
    (1_usize << depth) - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(2, 1)]
    #[case(3, 2)]
    #[case(6, 2)]
    #[case(7, 3)]
    #[case(14, 3)]
    #[case(15, 4)]
    fn test_depth_of_offset(#[case] offset: usize, #[case] depth: u32) {
        assert_eq!(Node::new(offset).depth, depth);
    }

    #[rstest]
    fn test_levels_alternate_from_min_root() {
        assert_eq!(Node::ROOT.level(), Level::Min);
        assert_eq!(Node::new(1).level(), Level::Max);
        assert_eq!(Node::new(2).level(), Level::Max);
        assert_eq!(Node::new(5).level(), Level::Min);
        assert_eq!(Node::new(9).level(), Level::Max);
    }

    #[rstest]
    fn test_parent_and_children_are_inverse() {
        for offset in 0..100 {
            let node = Node::new(offset);
            assert_eq!(node.left_child().parent(), Some(node));
            assert_eq!(node.right_child().parent(), Some(node));
            assert_eq!(node.left_child(), Node::new(2 * offset + 1));
        }
        assert_eq!(Node::ROOT.parent(), None);
    }

    #[rstest]
    fn test_grandparent_matches_parent_of_parent() {
        for offset in 0..200 {
            let node = Node::new(offset);
            let expected = node.parent().and_then(Node::parent);
            assert_eq!(node.grandparent(), expected, "offset {offset}");
        }
    }

    #[rstest]
    fn test_grandchildren_are_contiguous() {
        let node = Node::new(2);
        let first = node.first_grandchild();
        assert_eq!(first, node.left_child().left_child());
        assert_eq!(first.offset + 3, node.right_child().right_child().offset);
    }

    #[rstest]
    fn test_nodes_at_depth_respect_limit() {
        let offsets: Vec<usize> = Node::nodes_at_depth(2, 5).map(|node| node.offset).collect();
        assert_eq!(offsets, vec![3, 4]);
        let offsets: Vec<usize> = Node::nodes_at_depth(1, 100).map(|node| node.offset).collect();
        assert_eq!(offsets, vec![1, 2]);
        assert!(Node::nodes_at_depth(3, 5).next().is_none());
    }

    #[rstest]
    fn test_precedes_is_strict() {
        assert!(Level::Min.precedes(&1, &2));
        assert!(!Level::Min.precedes(&2, &2));
        assert!(Level::Max.precedes(&3, &2));
        assert!(!Level::Max.precedes(&2, &2));
    }
}

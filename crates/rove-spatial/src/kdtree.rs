//! Balanced KD-tree over projected planar points.
//!
//! # Data layout
//!
//! Tree nodes live in an index-addressed arena (`Vec<KdNode>`) with `u32`
//! child links — no boxed pointers, one contiguous allocation.  The split
//! axis is not stored: it alternates per level, x at the root.
//!
//! # Construction
//!
//! [`KdTree::build`] recursively median-splits the point set: the current
//! set is sorted by the active axis, the element at `len / 2` becomes the
//! subtree root, points before it form the left subtree and points after
//! it the right.  The median itself goes to neither child, so a 2-element
//! set produces a node with only a left child.  The result is balanced by
//! construction, bounding both tree depth and query recursion at O(log n).
//!
//! The tree is built once and read-only afterward; shared references may
//! query it concurrently.

use rove_core::NodeId;

/// A node's projected position, carried through the index so a
/// nearest-neighbor hit can be mapped back to the graph.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialPoint {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

impl SpatialPoint {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// Squared Euclidean distance to a query point.
    #[inline]
    fn dist2(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

// ── Split axis ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// The point's coordinate on this axis.
    #[inline]
    fn coord(self, p: &SpatialPoint) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }

    /// The query's coordinate on this axis.
    #[inline]
    fn query_coord(self, x: f64, y: f64) -> f64 {
        match self {
            Axis::X => x,
            Axis::Y => y,
        }
    }
}

// ── KdTree ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct KdNode {
    point: SpatialPoint,
    left: Option<u32>,
    right: Option<u32>,
}

/// Immutable balanced KD-tree supporting nearest-neighbor queries.
#[derive(Debug)]
pub struct KdTree {
    arena: Vec<KdNode>,
    root: Option<u32>,
}

impl KdTree {
    /// Build a balanced tree from the full point set.
    ///
    /// An empty input yields an empty tree, for which every
    /// [`nearest`](Self::nearest) query returns `None`.
    pub fn build(points: Vec<SpatialPoint>) -> Self {
        let mut arena = Vec::with_capacity(points.len());
        let root = if points.is_empty() {
            None
        } else {
            Some(build_rec(&mut arena, points, Axis::X))
        };
        Self { arena, root }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// The stored point minimizing Euclidean distance to `(x, y)`.
    ///
    /// Returns `None` only for an index built from zero points; callers
    /// surface that as [`SpatialError::EmptyIndex`](crate::SpatialError).
    pub fn nearest(&self, x: f64, y: f64) -> Option<&SpatialPoint> {
        let root = self.root?;
        let mut best = (root, f64::INFINITY);
        self.nearest_rec(root, x, y, Axis::X, &mut best);
        Some(&self.arena[best.0 as usize].point)
    }

    /// Descend toward the query's side of the splitting line first, then
    /// visit the far side only if the hypersphere of radius best-distance
    /// crosses the splitting hyperplane (strict inequality — a far subtree
    /// exactly on the boundary cannot improve the best).
    fn nearest_rec(&self, idx: u32, x: f64, y: f64, axis: Axis, best: &mut (u32, f64)) {
        let node = &self.arena[idx as usize];

        let d2 = node.point.dist2(x, y);
        if d2 < best.1 {
            *best = (idx, d2);
        }

        let delta = axis.query_coord(x, y) - axis.coord(&node.point);
        let (near, far) = if delta < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = near {
            self.nearest_rec(child, x, y, axis.other(), best);
        }
        if let Some(child) = far {
            if delta * delta < best.1 {
                self.nearest_rec(child, x, y, axis.other(), best);
            }
        }
    }
}

/// Recursive median split.  Returns the arena index of the subtree root.
fn build_rec(arena: &mut Vec<KdNode>, mut points: Vec<SpatialPoint>, axis: Axis) -> u32 {
    if let &[point] = points.as_slice() {
        let slot = arena.len() as u32;
        arena.push(KdNode { point, left: None, right: None });
        return slot;
    }

    points.sort_by(|a, b| axis.coord(a).total_cmp(&axis.coord(b)));
    let mid = points.len() / 2;

    // `points` keeps indices before the median; `upper` yields the median
    // itself plus the right half.
    let mut upper = points.split_off(mid);
    let point = upper.remove(0);

    let slot = arena.len() as u32;
    arena.push(KdNode { point, left: None, right: None });

    let left = build_rec(arena, points, axis.other());
    arena[slot as usize].left = Some(left);

    if !upper.is_empty() {
        let right = build_rec(arena, upper, axis.other());
        arena[slot as usize].right = Some(right);
    }
    slot
}

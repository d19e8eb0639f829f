//! Shortest-path search and turn-by-turn directions.
//!
//! # Search
//!
//! [`shortest_path`] resolves both query coordinates to graph nodes
//! through the KD-tree, then runs Dijkstra over the adjacency lists.
//! `BinaryHeap` offers no decrease-key, so a node is re-pushed on every
//! improvement and stale pops are skipped against the visited set.  The
//! search stops the moment the destination is popped; an exhausted
//! frontier is the explicit [`SpatialError::NoRoute`] outcome, never a
//! hang or a panic.
//!
//! # Directions
//!
//! [`route_directions`] folds a node path into per-way steps: consecutive
//! edges on the same way accumulate distance, and each way transition is
//! classified into one of eight turn buckets from the signed change in
//! bearing.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use rove_core::NodeId;

use crate::graph::RoadGraph;
use crate::{SpatialError, SpatialResult};

// ── Shortest path ─────────────────────────────────────────────────────────────

/// Frontier entry ordered as a min-heap on distance (then id, for
/// deterministic tie-breaking) inside `std`'s max-oriented `BinaryHeap`.
#[derive(Copy, Clone, Debug)]
struct Frontier {
    dist: f64,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: the smallest distance surfaces first.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Ordered node ids of the shortest route between two query coordinates.
///
/// The endpoints are the retained nodes nearest each coordinate; the
/// result runs from start node to destination node inclusive.  Querying a
/// coordinate pair that resolves to a single node yields the one-node,
/// zero-distance path.
///
/// # Errors
///
/// [`SpatialError::EmptyIndex`] if the graph retained no nodes;
/// [`SpatialError::NoRoute`] if the endpoints lie in disjoint components.
pub fn shortest_path(
    graph: &RoadGraph,
    st_lon: f64,
    st_lat: f64,
    dest_lon: f64,
    dest_lat: f64,
) -> SpatialResult<Vec<NodeId>> {
    let start = graph.closest(st_lon, st_lat)?;
    let dest = graph.closest(dest_lon, dest_lat)?;
    dijkstra(graph, start, dest)
}

fn dijkstra(graph: &RoadGraph, start: NodeId, dest: NodeId) -> SpatialResult<Vec<NodeId>> {
    if start == dest {
        return Ok(vec![start]);
    }

    // Absent entries in `best` are implicitly infinite.
    let mut best: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut prev: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();

    let mut heap = BinaryHeap::new();
    best.insert(start, 0.0);
    heap.push(Frontier { dist: 0.0, node: start });

    while let Some(Frontier { dist, node }) = heap.pop() {
        // Lazy deletion: a node already settled was popped at a smaller
        // distance earlier; this entry is stale.
        if !visited.insert(node) {
            continue;
        }
        if node == dest {
            return Ok(walk_back(&prev, start, dest));
        }

        for edge in graph.edges(node) {
            let candidate = dist + edge.miles;
            let improved = best
                .get(&edge.to)
                .is_none_or(|&current| candidate < current);
            if improved {
                best.insert(edge.to, candidate);
                prev.insert(edge.to, node);
                heap.push(Frontier { dist: candidate, node: edge.to });
            }
        }
    }

    Err(SpatialError::NoRoute { from: start, to: dest })
}

/// Reconstruct the path by following predecessors from the destination,
/// then reversing.
fn walk_back(prev: &FxHashMap<NodeId, NodeId>, start: NodeId, dest: NodeId) -> Vec<NodeId> {
    let mut path = vec![dest];
    let mut current = dest;
    while current != start {
        match prev.get(&current) {
            Some(&parent) => {
                path.push(parent);
                current = parent;
            }
            // Every relaxation recorded a predecessor, so a popped
            // destination always chains back to the start.  Truncating
            // here would hand back a path that silently stops short.
            None => unreachable!("predecessor chain broken at {current}"),
        }
    }
    path.reverse();
    path
}

// ── Directions ────────────────────────────────────────────────────────────────

/// The eight turn buckets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    Start,
    Straight,
    SlightLeft,
    SlightRight,
    Left,
    Right,
    SharpLeft,
    SharpRight,
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Turn::Start => "Start",
            Turn::Straight => "Go straight",
            Turn::SlightLeft => "Slight left",
            Turn::SlightRight => "Slight right",
            Turn::Left => "Turn left",
            Turn::Right => "Turn right",
            Turn::SharpLeft => "Sharp left",
            Turn::SharpRight => "Sharp right",
        };
        f.write_str(label)
    }
}

/// Classify a signed bearing change in degrees into a turn bucket.
fn classify(delta: f64) -> Turn {
    // Normalize to [-180, 180).
    let d = (delta + 180.0).rem_euclid(360.0) - 180.0;
    match d.abs() {
        a if a <= 15.0 => Turn::Straight,
        a if a <= 30.0 => {
            if d < 0.0 { Turn::SlightLeft } else { Turn::SlightRight }
        }
        a if a <= 100.0 => {
            if d < 0.0 { Turn::Left } else { Turn::Right }
        }
        _ => {
            if d < 0.0 { Turn::SharpLeft } else { Turn::SharpRight }
        }
    }
}

/// One leg of the directions output: a turn onto a way and the distance
/// traveled along it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationStep {
    pub turn: Turn,
    /// Name of the way, when it had one.
    pub way: Option<String>,
    pub miles: f64,
}

impl fmt::Display for NavigationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} and continue for {:.3} miles.",
            self.turn,
            self.way.as_deref().unwrap_or("unknown road"),
            self.miles,
        )
    }
}

/// Fold a resolved node path into ordered per-way navigation steps.
///
/// Consecutive edges cut from the same way accumulate into one step; each
/// way transition emits the finished step and opens the next with the
/// turn bucket of the bearing change between the segment entering the
/// transition and the segment leaving it.  The first step is always
/// [`Turn::Start`].  Paths shorter than two nodes produce no steps.
///
/// # Errors
///
/// [`SpatialError::NotAdjacent`] if two consecutive path ids share no
/// edge — the path did not come from this graph.
pub fn route_directions(graph: &RoadGraph, path: &[NodeId]) -> SpatialResult<Vec<NavigationStep>> {
    if path.len() < 2 {
        return Ok(Vec::new());
    }

    let mut steps = Vec::new();
    let mut current_way = None;
    let mut current_turn = Turn::Start;
    let mut current_miles = 0.0;

    for (i, pair) in path.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        let edge = graph
            .edge_between(a, b, current_way)
            .ok_or(SpatialError::NotAdjacent(a, b))?;

        match current_way {
            None => current_way = Some(edge.way),
            Some(way) if way == edge.way => {}
            Some(way) => {
                steps.push(NavigationStep {
                    turn: current_turn,
                    way: graph.way_name(way).map(str::to_owned),
                    miles: current_miles,
                });

                // Bearing into the transition vs. bearing out of it.  Both
                // endpoints of both segments are in the graph, so the
                // bearings always resolve.
                let entering = graph.bearing(path[i - 1], a).unwrap_or(0.0);
                let leaving = graph.bearing(a, b).unwrap_or(0.0);
                current_turn = classify(leaving - entering);
                current_way = Some(edge.way);
                current_miles = 0.0;
            }
        }
        current_miles += edge.miles;
    }

    if let Some(way) = current_way {
        steps.push(NavigationStep {
            turn: current_turn,
            way: graph.way_name(way).map(str::to_owned),
            miles: current_miles,
        });
    }
    Ok(steps)
}

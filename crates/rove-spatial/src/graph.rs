//! Road network graph: construction, filtering, pruning, and queries.
//!
//! # Two-phase lifecycle
//!
//! [`RoadGraphBuilder`] is the mutable ingestion-phase surface: node
//! records, tag updates, and whole ways go in.  [`build`](RoadGraphBuilder::build)
//! prunes degree-zero nodes, projects the survivors, and bulk-builds the
//! KD-tree, producing an immutable [`RoadGraph`] that is safe for
//! concurrent read-only queries.  No mutation is possible afterward.
//!
//! # Data layout
//!
//! Nodes keep their stable producer-assigned ids, so both the node table
//! and the adjacency table are id-keyed `FxHashMap`s.  After pruning the
//! two maps hold an identical key set, and every edge endpoint is present
//! in both — edges are only ever created between already-registered nodes.

use log::debug;
use rustc_hash::FxHashMap;

use rove_core::{GeoPoint, NodeId, Projection, WayId};

use crate::kdtree::{KdTree, SpatialPoint};
use crate::{SpatialError, SpatialResult};

// ── Highway filtering ─────────────────────────────────────────────────────────

/// Road classifications that contribute routable edges.  Non-vehicular
/// ways (footways, cycleways, service alleys, …) are rejected whole.
pub const ROUTABLE_HIGHWAYS: [&str; 13] = [
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
    "residential",
    "living_street",
    "motorway_link",
    "trunk_link",
    "primary_link",
    "secondary_link",
    "tertiary_link",
];

/// Whether a `highway` tag value admits a way into the graph.
pub fn is_routable(highway: &str) -> bool {
    ROUTABLE_HIGHWAYS.contains(&highway)
}

// ── Node and edge records ─────────────────────────────────────────────────────

/// A graph vertex: one map node with its coordinate and descriptive tags.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    pub pos: GeoPoint,
    pub name: Option<String>,
    pub amenity: Option<String>,
    pub address: Option<String>,
}

impl Node {
    /// A bare node with no tags; tags may arrive later via
    /// [`RoadGraphBuilder::annotate`].
    pub fn new(id: NodeId, pos: GeoPoint) -> Self {
        Self { id, pos, name: None, amenity: None, address: None }
    }
}

/// Descriptive tag updates attributed to an already-registered node.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeTags {
    pub name: Option<String>,
    pub amenity: Option<String>,
    pub address: Option<String>,
}

/// One directed half of an undirected road edge, stored in the source
/// node's adjacency list.  Parallel edges between the same pair are kept.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub to: NodeId,
    /// The way this edge was cut from; directions output groups by it.
    pub way: WayId,
    /// Great-circle length in miles — the shortest-path weight.
    pub miles: f64,
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Accumulates node and way records during ingestion, then freezes into a
/// [`RoadGraph`].
///
/// # Example
///
/// ```
/// use rove_core::{GeoPoint, NodeId, WayId};
/// use rove_spatial::{Node, RoadGraphBuilder};
///
/// let mut b = RoadGraphBuilder::new();
/// b.add_node(Node::new(NodeId(1), GeoPoint::new(-122.26, 37.87)));
/// b.add_node(Node::new(NodeId(2), GeoPoint::new(-122.25, 37.87)));
/// b.add_way(WayId(10), &[NodeId(1), NodeId(2)], "residential", Some("Oxford St"));
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// ```
#[derive(Default)]
pub struct RoadGraphBuilder {
    nodes: FxHashMap<NodeId, Node>,
    adjacency: FxHashMap<NodeId, Vec<Edge>>,
    way_names: FxHashMap<WayId, String>,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node and initialize its empty adjacency entry.
    ///
    /// A duplicate id overwrites the stored node record; any edges already
    /// incident to the id remain.
    pub fn add_node(&mut self, node: Node) {
        self.adjacency.entry(node.id).or_default();
        self.nodes.insert(node.id, node);
    }

    /// Merge tag updates onto an existing node.  Unknown ids are ignored —
    /// tags for a node the producer never emitted carry no information.
    pub fn annotate(&mut self, id: NodeId, tags: NodeTags) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if tags.name.is_some() {
                node.name = tags.name;
            }
            if tags.amenity.is_some() {
                node.amenity = tags.amenity;
            }
            if tags.address.is_some() {
                node.address = tags.address;
            }
        }
    }

    /// Commit one fully-read way.
    ///
    /// If `highway` is not a routable classification the call has no graph
    /// effect.  Otherwise each consecutive ref pair becomes one undirected
    /// edge weighted by great-circle miles, appended to both endpoints'
    /// adjacency lists.  Pairs with an unresolved endpoint are skipped,
    /// and fewer than 2 refs contribute nothing.
    pub fn add_way(&mut self, id: WayId, refs: &[NodeId], highway: &str, name: Option<&str>) {
        if !is_routable(highway) {
            return;
        }

        let mut committed = false;
        for pair in refs.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (Some(na), Some(nb)) = (self.nodes.get(&a), self.nodes.get(&b)) else {
                continue;
            };
            let miles = na.pos.distance_miles(nb.pos);

            self.adjacency.entry(a).or_default().push(Edge { to: b, way: id, miles });
            self.adjacency.entry(b).or_default().push(Edge { to: a, way: id, miles });
            committed = true;
        }

        // A way that produced no edges leaves no trace, its name included.
        if committed {
            if let Some(name) = name {
                self.way_names.insert(id, name.to_owned());
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges accumulated so far.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Freeze the graph: prune every degree-zero node, derive the
    /// projection center from the retained nodes' bounding box, and build
    /// the spatial index over the projected point set.
    pub fn build(mut self) -> RoadGraph {
        let before = self.nodes.len();
        let isolated: Vec<NodeId> = self
            .adjacency
            .iter()
            .filter(|(_, edges)| edges.is_empty())
            .map(|(&id, _)| id)
            .collect();
        for id in &isolated {
            self.adjacency.remove(id);
            self.nodes.remove(id);
        }

        let projection = Projection::centered_at(bbox_center(self.nodes.values()));
        let points: Vec<SpatialPoint> = self
            .nodes
            .values()
            .map(|n| {
                let (x, y) = projection.project(n.pos);
                SpatialPoint::new(n.id, x, y)
            })
            .collect();
        let index = KdTree::build(points);

        debug!(
            "road graph built: {} nodes retained, {} pruned, {} edges",
            self.nodes.len(),
            before - self.nodes.len(),
            self.edge_count(),
        );

        RoadGraph {
            nodes: self.nodes,
            adjacency: self.adjacency,
            way_names: self.way_names,
            projection,
            index,
        }
    }
}

/// Midpoint of the bounding box of the given node positions; the origin
/// for an empty set.
fn bbox_center<'a>(nodes: impl Iterator<Item = &'a Node>) -> GeoPoint {
    let mut min = GeoPoint::new(f64::INFINITY, f64::INFINITY);
    let mut max = GeoPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut any = false;
    for node in nodes {
        min.lon = min.lon.min(node.pos.lon);
        min.lat = min.lat.min(node.pos.lat);
        max.lon = max.lon.max(node.pos.lon);
        max.lat = max.lat.max(node.pos.lat);
        any = true;
    }
    if !any {
        return GeoPoint::new(0.0, 0.0);
    }
    GeoPoint::new((min.lon + max.lon) / 2.0, (min.lat + max.lat) / 2.0)
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// The frozen road network: id-keyed node and adjacency tables plus the
/// projection and KD-tree built over the post-prune node set.
#[derive(Debug)]
pub struct RoadGraph {
    nodes: FxHashMap<NodeId, Node>,
    adjacency: FxHashMap<NodeId, Vec<Edge>>,
    way_names: FxHashMap<WayId, String>,
    projection: Projection,
    index: KdTree,
}

impl RoadGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All retained node ids, in no particular order.
    pub fn vertices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn position(&self, id: NodeId) -> Option<GeoPoint> {
        self.nodes.get(&id).map(|n| n.pos)
    }

    /// Longitude of `id`, or `None` if the id is not in the graph.
    pub fn lon(&self, id: NodeId) -> Option<f64> {
        self.position(id).map(|p| p.lon)
    }

    /// Latitude of `id`, or `None` if the id is not in the graph.
    pub fn lat(&self, id: NodeId) -> Option<f64> {
        self.position(id).map(|p| p.lat)
    }

    /// Neighbor ids one edge away from `id`; empty for unknown ids.
    /// Parallel edges yield repeated neighbors.
    pub fn adjacent(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges(id).iter().map(|e| e.to)
    }

    /// Incident edge records of `id`; empty for unknown ids.
    pub fn edges(&self, id: NodeId) -> &[Edge] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Great-circle distance in miles between two retained nodes.
    pub fn distance(&self, v: NodeId, w: NodeId) -> Option<f64> {
        Some(self.position(v)?.distance_miles(self.position(w)?))
    }

    /// Initial bearing in degrees from `v` toward `w`.
    pub fn bearing(&self, v: NodeId, w: NodeId) -> Option<f64> {
        Some(self.position(v)?.bearing_deg(self.position(w)?))
    }

    /// The recorded name of a way, if it had one.
    pub fn way_name(&self, way: WayId) -> Option<&str> {
        self.way_names.get(&way).map(String::as_str)
    }

    /// The retained node nearest to the query coordinate, via the KD-tree
    /// over projected points.
    ///
    /// # Errors
    ///
    /// [`SpatialError::EmptyIndex`] if the graph retained no nodes.
    pub fn closest(&self, lon: f64, lat: f64) -> SpatialResult<NodeId> {
        let (x, y) = self.projection.project(GeoPoint::new(lon, lat));
        self.index
            .nearest(x, y)
            .map(|p| p.id)
            .ok_or(SpatialError::EmptyIndex)
    }

    /// An edge connecting `a` to `b`, preferring one cut from `prefer` so
    /// that directions output stays on the same way across intersections
    /// where parallel edges exist.
    pub(crate) fn edge_between(&self, a: NodeId, b: NodeId, prefer: Option<WayId>) -> Option<&Edge> {
        match prefer {
            Some(way) => self
                .edges(a)
                .iter()
                .find(|e| e.to == b && e.way == way)
                .or_else(|| self.edges(a).iter().find(|e| e.to == b)),
            None => self
                .edges(a)
                .iter()
                .filter(|e| e.to == b)
                .min_by(|x, y| x.miles.total_cmp(&y.miles)),
        }
    }
}

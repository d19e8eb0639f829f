//! OSM PBF loader — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use rove_spatial::osm::load_from_pbf;
//!
//! let graph = load_from_pbf(Path::new("berkeley.osm.pbf"))?;
//! ```
//!
//! # What is loaded
//!
//! Node records become graph nodes; their `name`, `amenity`, and
//! `addr:street` tags are attached as annotations.  Ways are read whole
//! and committed through [`RoadGraphBuilder::add_way`], which discards any
//! way whose `highway` tag is outside the routable allow-list.  Relations
//! and all other features are ignored.  Nodes left without edges are
//! pruned when the builder freezes.

use std::path::Path;

use log::{debug, info};
use osmpbf::{Element, ElementReader};

use rove_core::{GeoPoint, NodeId, WayId};

use crate::graph::{Node, NodeTags, RoadGraph, RoadGraphBuilder};
use crate::SpatialError;

/// Load a road graph from an OSM PBF file.
///
/// Use [`RoadGraphBuilder`] directly for non-OSM sources.
///
/// # Errors
///
/// Returns [`SpatialError::Osm`] on parse errors, [`SpatialError::Io`] on
/// file errors.
pub fn load_from_pbf(path: &Path) -> Result<RoadGraph, SpatialError> {
    let file = std::fs::File::open(path)?;
    let reader = ElementReader::new(std::io::BufReader::new(file));

    let mut builder = RoadGraphBuilder::new();
    let mut ways_seen = 0u64;

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                let id = NodeId(n.id());
                builder.add_node(Node::new(id, GeoPoint::new(n.lon(), n.lat())));
                annotate_from_tags(&mut builder, id, n.tags());
            }
            Element::DenseNode(n) => {
                let id = NodeId(n.id());
                builder.add_node(Node::new(id, GeoPoint::new(n.lon(), n.lat())));
                annotate_from_tags(&mut builder, id, n.tags());
            }
            Element::Way(w) => {
                ways_seen += 1;
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let highway = tag_value(&tags, "highway").unwrap_or("");
                let name = tag_value(&tags, "name");
                let refs: Vec<NodeId> = w.refs().map(NodeId).collect();

                builder.add_way(WayId(w.id()), &refs, highway, name);
            }
            Element::Relation(_) => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    debug!(
        "pbf ingest: {} nodes, {} ways seen, {} undirected edges accepted",
        builder.node_count(),
        ways_seen,
        builder.edge_count(),
    );

    let graph = builder.build();
    info!("loaded road graph from {}: {} nodes", path.display(), graph.node_count());
    Ok(graph)
}

/// First value for `key` among a way or node's tags.
fn tag_value<'a>(tags: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    tags.iter().find(|(k, _)| *k == key).map(|&(_, v)| v)
}

/// Attach the descriptive node tags the router surfaces (`name`,
/// `amenity`, `addr:street`) as a post-creation annotation.
fn annotate_from_tags<'a>(
    builder: &mut RoadGraphBuilder,
    id: NodeId,
    tags: impl Iterator<Item = (&'a str, &'a str)>,
) {
    let mut node_tags = NodeTags::default();
    let mut any = false;
    for (k, v) in tags {
        match k {
            "name" => {
                node_tags.name = Some(v.to_owned());
                any = true;
            }
            "amenity" => {
                node_tags.amenity = Some(v.to_owned());
                any = true;
            }
            "addr:street" => {
                node_tags.address = Some(v.to_owned());
                any = true;
            }
            _ => {}
        }
    }
    if any {
        builder.annotate(id, node_tags);
    }
}

//! Spatial-subsystem error type.

use thiserror::Error;

use rove_core::NodeId;

/// Errors produced by `rove-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Frontier exhausted before the destination was reached — the two
    /// endpoints lie in disjoint components.  A first-class outcome, not a
    /// fault: pruning only removes degree-zero nodes and never guarantees
    /// global connectivity.
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    /// Nearest-neighbor query against a graph that retained no nodes.
    #[error("spatial index is empty")]
    EmptyIndex,

    /// A supplied path steps between two nodes with no connecting edge.
    #[error("{0} and {1} are not adjacent")]
    NotAdjacent(NodeId, NodeId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;

//! `rove-spatial` — road network graph, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`graph`]  | `RoadGraphBuilder` → `RoadGraph` (id-keyed maps + KD-tree) |
//! | [`kdtree`] | `KdTree`, `SpatialPoint` (arena-backed, median-balanced)   |
//! | [`router`] | `shortest_path`, `route_directions`, `NavigationStep`      |
//! | [`osm`]    | `load_from_pbf` (feature = `"osm"` only)                   |
//! | [`error`]  | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.              |
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod graph;
pub mod kdtree;
pub mod router;

#[cfg(feature = "osm")]
pub mod osm;


pub use error::{SpatialError, SpatialResult};
pub use graph::{Edge, Node, NodeTags, RoadGraph, RoadGraphBuilder, ROUTABLE_HIGHWAYS};
pub use kdtree::{KdTree, SpatialPoint};
pub use router::{route_directions, shortest_path, NavigationStep, Turn};

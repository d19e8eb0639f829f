//! `rove-core` — foundational types for the `rove` routing engine.
//!
//! This crate is a dependency of every other `rove-*` crate.  It has no
//! `rove-*` dependencies and only an optional `serde` external one.
//!
//! # What lives here
//!
//! | Module   | Contents                                                  |
//! |----------|-----------------------------------------------------------|
//! | [`ids`]  | `NodeId`, `WayId`                                         |
//! | [`geo`]  | `GeoPoint`, haversine distance, bearing, `Projection`     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::{EARTH_RADIUS_MILES, GeoPoint, Projection};
pub use ids::{NodeId, WayId};

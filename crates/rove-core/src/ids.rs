//! Strongly typed identifier wrappers.
//!
//! Graph entities keep the stable integer ids assigned by the map-data
//! producer (OSM), so the wrappers hold an `i64` and are used as hash-map
//! keys rather than dense array indices.  All IDs are `Copy + Ord + Hash`
//! so they can be map keys and sorted collection elements without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for $inner {
            #[inline(always)]
            fn from(id: $name) -> $inner {
                id.0
            }
        }
    };
}

typed_id! {
    /// Stable id of a road-network node, as assigned by the map producer.
    pub struct NodeId(i64);
}

typed_id! {
    /// Stable id of a way (one tagged road segment).
    pub struct WayId(i64);
}

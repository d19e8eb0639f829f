//! Geographic coordinate type and spherical geometry.
//!
//! Coordinates are double-precision WGS-84 longitude/latitude.  Distances
//! are great-circle miles (haversine); routing sums many fractional edge
//! weights, so `f64` is used throughout rather than trading precision for
//! memory.

/// Mean radius of the Earth in miles.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Haversine great-circle distance in miles.
    pub fn distance_miles(self, other: GeoPoint) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let a = (d_phi * 0.5).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda * 0.5).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_MILES * c
    }

    /// Initial compass bearing from `self` toward `other`, in degrees.
    ///
    /// The angle that, followed along the great-circle arc from `self`,
    /// leads to `other`.  Range `(-180, 180]`; 0 is north, 90 is east.
    pub fn bearing_deg(self, other: GeoPoint) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let y = d_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
        y.atan2(x).to_degrees()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

// ── Projection ────────────────────────────────────────────────────────────────

/// Scale factor at the natural origin.  1.0 rather than the UTM 0.9996 —
/// the projection only feeds relative nearest-neighbor comparisons.
const K0: f64 = 1.0;

/// Transverse Mercator projection centered at a fixed reference coordinate.
///
/// Flattens (lon, lat) into planar (x, y) so that Euclidean distance near
/// the center approximates geographic proximity; the spatial index runs
/// its nearest-neighbor search in this plane.  x grows eastward, y grows
/// northward, and the reference coordinate maps to the origin.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    root: GeoPoint,
}

impl Projection {
    /// A projection whose natural origin is `root`.
    pub fn centered_at(root: GeoPoint) -> Self {
        Self { root }
    }

    /// Project `p` to planar (x, y).
    pub fn project(&self, p: GeoPoint) -> (f64, f64) {
        let d_lon = (p.lon - self.root.lon).to_radians();
        let phi = p.lat.to_radians();

        let b = d_lon.sin() * phi.cos();
        let x = (K0 / 2.0) * ((1.0 + b) / (1.0 - b)).ln();
        let y = K0 * ((phi.tan() / d_lon.cos()).atan() - self.root.lat.to_radians());
        (x, y)
    }
}

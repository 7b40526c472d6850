//! Great-circle distance helpers.
//!
//! Distances are computed with the haversine formula on a spherical Earth.
//! Good to within ~0.5% of true geodesic distance, which is more than enough
//! for urban delivery routing.

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Latitude is expected in `[-90, 90]` and longitude in `[-180, 180]`;
/// validation is the caller's responsibility, this module does none.
///
/// # Examples
///
/// ```
/// use route_optimizer::geo::GeoPoint;
///
/// let p = GeoPoint::new(52.52, 13.405); // Berlin
/// assert_eq!(p.latitude, 52.52);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude in decimal degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two points in kilometers.
///
/// Haversine formula with a mean Earth radius of 6371 km. The result is
/// always non-negative and symmetric in its arguments; identical points
/// yield zero (up to floating-point epsilon).
///
/// # Examples
///
/// ```
/// use route_optimizer::geo::{distance_km, GeoPoint};
///
/// // One degree of longitude at the equator is ~111.2 km.
/// let a = GeoPoint::new(0.0, 0.0);
/// let b = GeoPoint::new(0.0, 1.0);
/// assert!((distance_km(a, b) - 111.19).abs() < 0.1);
/// ```
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Total length of the path visiting `points` in order, in kilometers.
///
/// Sums [`distance_km`] over each consecutive pair. Paths of length 0 or 1
/// have zero distance. The path is open: there is no return leg from the
/// last point to the first.
///
/// # Examples
///
/// ```
/// use route_optimizer::geo::{total_path_distance_km, GeoPoint};
///
/// assert_eq!(total_path_distance_km(&[]), 0.0);
/// assert_eq!(total_path_distance_km(&[GeoPoint::new(1.0, 2.0)]), 0.0);
/// ```
pub fn total_path_distance_km(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_km(pair[0], pair[1]))
        .sum()
}

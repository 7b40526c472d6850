//! Delivery stop type.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A geolocated delivery point (a shop), read-only for the optimizer.
///
/// Stops are owned by shop management; the optimizer borrows them for the
/// duration of one run. Identity is the `id` string.
///
/// # Examples
///
/// ```
/// use route_optimizer::models::Stop;
///
/// let stop = Stop::new("s1", "Corner Market", 41.0, 29.0);
/// assert_eq!(stop.id, "s1");
/// assert_eq!(stop.position().latitude, 41.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    /// Stable identifier assigned by shop management.
    pub id: String,
    /// Display name, used in suggestion prompts.
    pub name: String,
    /// Latitude in decimal degrees, `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in decimal degrees, `[-180, 180]`.
    pub longitude: f64,
}

impl Stop {
    /// Creates a stop from id, name, and coordinates.
    pub fn new(id: impl Into<String>, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// The stop's coordinates as a [`GeoPoint`].
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_new() {
        let s = Stop::new("a", "Shop A", 10.0, 20.0);
        assert_eq!(s.id, "a");
        assert_eq!(s.name, "Shop A");
        assert_eq!(s.latitude, 10.0);
        assert_eq!(s.longitude, 20.0);
    }

    #[test]
    fn test_stop_position() {
        let s = Stop::new("a", "Shop A", -33.9, 151.2);
        let p = s.position();
        assert_eq!(p.latitude, -33.9);
        assert_eq!(p.longitude, 151.2);
    }
}

//! Geographic locations and sites.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometres (haversine formula).
    ///
    /// # Example
    ///
    /// ```
    /// use roster_compliance::models::GeoPoint;
    ///
    /// let melbourne = GeoPoint::new(-37.8136, 144.9631);
    /// let geelong = GeoPoint::new(-38.1499, 144.3617);
    /// let km = melbourne.distance_km(&geelong);
    /// assert!((km - 64.0).abs() < 2.0);
    /// ```
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

/// A place where support is delivered (group home, day centre).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Unique identifier for the site.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Where the site is.
    pub location: GeoPoint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = GeoPoint::new(-33.8688, 151.2093);
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let sydney = GeoPoint::new(-33.8688, 151.2093);
        let parramatta = GeoPoint::new(-33.8150, 151.0011);
        let there = sydney.distance_km(&parramatta);
        let back = parramatta.distance_km(&sydney);
        assert!((there - back).abs() < 1e-9);
        assert!(there > 18.0 && there < 21.0);
    }
}

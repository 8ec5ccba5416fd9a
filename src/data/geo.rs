//! Geographic helpers: coordinates, bounding boxes and distances

use super::Business;
use serde::{Deserialize, Serialize};

/// Earth's radius in miles
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Feet per mile, for short distances
const FEET_PER_MILE: f64 = 5280.0;

/// Fredericksburg town center
pub const DEFAULT_CENTER: Location = Location {
    lat: 30.2752,
    lng: -98.8719,
};

/// Area covering town and the nearby wine road
pub const DEFAULT_BOUNDS: BoundingBox = BoundingBox {
    north: 30.3152,
    south: 30.2352,
    east: -98.8219,
    west: -98.9219,
};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Parses "lat,lng"
    pub fn parse(s: &str) -> Option<Location> {
        let (lat, lng) = s.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lng: f64 = lng.trim().parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        Some(Location { lat, lng })
    }
}

/// Rectangle scoping a listing query to the visible area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Whether a point lies inside the box, edges included
    pub fn contains(&self, location: &Location) -> bool {
        location.lat >= self.south
            && location.lat <= self.north
            && location.lng >= self.west
            && location.lng <= self.east
    }

    /// Center point of the box
    pub fn center(&self) -> Location {
        Location {
            lat: (self.north + self.south) / 2.0,
            lng: (self.east + self.west) / 2.0,
        }
    }
}

/// Haversine distance between two points in miles
pub fn distance_miles(from: &Location, to: &Location) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Formats a distance: feet below a tenth of a mile, otherwise miles
pub fn format_distance(miles: f64) -> String {
    if miles < 0.1 {
        format!("{} ft", (miles * FEET_PER_MILE).round() as i64)
    } else {
        format!("{:.1} mi", miles)
    }
}

/// Formats a price level as dollar signs, or "N/A" when unknown
pub fn format_price_range(price_range: Option<u8>) -> String {
    match price_range {
        Some(level) if level > 0 => "$".repeat(level as usize),
        _ => "N/A".to_string(),
    }
}

/// Sets `distance` on every business with a known location
pub fn annotate_distances(businesses: &mut [Business], origin: &Location) {
    for business in businesses.iter_mut() {
        if let Some(location) = business.location {
            business.distance = Some(distance_miles(origin, &location));
        }
    }
}

/// Sets `visible` on every business with a known location
pub fn annotate_visibility(businesses: &mut [Business], bounds: &BoundingBox) {
    for business in businesses.iter_mut() {
        if let Some(location) = business.location {
            business.visible = bounds.contains(&location);
        }
    }
}

//! Map coordinates and distances
//!
//! Geolocation itself is supplied from outside. Everything here keeps working
//! when the user's position is unknown.

use serde::{Deserialize, Serialize};

use crate::models::CampusArea;

const EARTH_RADIUS_MILES: f64 = 3959.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Center pin for moves that carry no coordinates of their own
pub fn default_coordinates_for_area(area: CampusArea) -> Coordinates {
    let (latitude, longitude) = match area {
        CampusArea::North => (42.0565, -87.6753),
        CampusArea::South => (42.0505, -87.6780),
        CampusArea::Downtown => (42.0464, -87.6817),
        CampusArea::Other => (42.0551, -87.6750),
    };
    Coordinates {
        latitude,
        longitude,
    }
}

/// Great-circle distance in miles (haversine)
pub fn distance_miles(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

pub fn format_distance(miles: f64) -> String {
    if miles < 0.1 {
        "< 0.1 mi".to_string()
    } else {
        format!("{:.1} mi", miles)
    }
}

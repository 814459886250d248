//! Remaining-travel-time estimators used to guide A*.
//!
//! Every estimator divides a great-circle style distance from the current node
//! to the goal by the current node's own speed. A faster stretch later on the
//! true route makes the estimate too high, so the search is not guaranteed to
//! return the optimal route for the non-zero heuristics.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::Node;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// One knot expressed in metres per second.
pub const KNOT_IN_METRES_PER_SECOND: f64 = 0.514444;

/// Supported remaining-time estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Always zero; the search degenerates to Dijkstra.
    Zero,
    /// Haversine great-circle distance.
    #[default]
    Haversine,
    /// Spherical law of cosines.
    SphericalCosines,
    /// Equirectangular projection approximation.
    Equirectangular,
}

impl Heuristic {
    pub const ALL: [Heuristic; 4] = [
        Heuristic::Zero,
        Heuristic::Haversine,
        Heuristic::SphericalCosines,
        Heuristic::Equirectangular,
    ];

    /// Resolve the numeric selector used by batch tooling (0..=3).
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Heuristic::Zero),
            1 => Ok(Heuristic::Haversine),
            2 => Ok(Heuristic::SphericalCosines),
            3 => Ok(Heuristic::Equirectangular),
            _ => Err(Error::UnsupportedHeuristic { code }),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Heuristic::Zero => 0,
            Heuristic::Haversine => 1,
            Heuristic::SphericalCosines => 2,
            Heuristic::Equirectangular => 3,
        }
    }

    /// Estimated seconds from `current` to `goal` at `current`'s speed.
    pub fn estimate(self, current: &Node, goal: &Node) -> f64 {
        if self == Heuristic::Zero {
            return 0.0;
        }
        let distance = self.distance_km(current.lat, current.lon, goal.lat, goal.lon);
        travel_seconds(distance, current.speed)
    }

    /// Distance in kilometres according to this estimator's formula.
    pub fn distance_km(self, lat_1: f64, lon_1: f64, lat_2: f64, lon_2: f64) -> f64 {
        match self {
            Heuristic::Zero => 0.0,
            Heuristic::Haversine => haversine_km(lat_1, lon_1, lat_2, lon_2),
            Heuristic::SphericalCosines => spherical_cosines_km(lat_1, lon_1, lat_2, lon_2),
            Heuristic::Equirectangular => equirectangular_km(lat_1, lon_1, lat_2, lon_2),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Heuristic::Zero => "zero",
            Heuristic::Haversine => "haversine",
            Heuristic::SphericalCosines => "spherical-cosines",
            Heuristic::Equirectangular => "equirectangular",
        };
        f.write_str(value)
    }
}

/// Seconds needed to cover `distance_km` at `speed_knots`; zero for a stationary vessel.
pub fn travel_seconds(distance_km: f64, speed_knots: f64) -> f64 {
    if speed_knots <= 0.0 || distance_km <= 0.0 {
        return 0.0;
    }
    distance_km * 1000.0 / (speed_knots * KNOT_IN_METRES_PER_SECOND)
}

/// Great-circle distance in kilometres using the haversine formula.
pub fn haversine_km(lat_1: f64, lon_1: f64, lat_2: f64, lon_2: f64) -> f64 {
    let phi_1 = lat_1.to_radians();
    let phi_2 = lat_2.to_radians();
    let delta_phi = (lat_2 - lat_1).to_radians();
    let delta_lambda = (lon_2 - lon_1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi_1.cos() * phi_2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

fn spherical_cosines_km(lat_1: f64, lon_1: f64, lat_2: f64, lon_2: f64) -> f64 {
    let phi_1 = lat_1.to_radians();
    let phi_2 = lat_2.to_radians();
    let delta_lambda = (lon_2 - lon_1).to_radians();

    // Rounding can push the cosine marginally outside [-1, 1] for near-identical points.
    let cosine = (phi_1.sin() * phi_2.sin() + phi_1.cos() * phi_2.cos() * delta_lambda.cos())
        .clamp(-1.0, 1.0);
    EARTH_RADIUS_KM * cosine.acos()
}

fn equirectangular_km(lat_1: f64, lon_1: f64, lat_2: f64, lon_2: f64) -> f64 {
    let mean_phi = ((lat_1 + lat_2) / 2.0).to_radians();
    let x = (lon_2 - lon_1).to_radians() * mean_phi.cos();
    let y = (lat_2 - lat_1).to_radians();
    EARTH_RADIUS_KM * (x * x + y * y).sqrt()
}

//! Command-line value types mapped onto library selectors.

use clap::ValueEnum;

use shiproute_lib::{Coordinate, Heuristic, QueueKind};

/// Remaining-time estimator selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HeuristicArg {
    /// No estimate; plain Dijkstra.
    Zero,
    /// Haversine great-circle distance.
    #[default]
    Haversine,
    /// Spherical law of cosines.
    SphericalCosines,
    /// Equirectangular approximation.
    Equirectangular,
}

impl From<HeuristicArg> for Heuristic {
    fn from(value: HeuristicArg) -> Self {
        match value {
            HeuristicArg::Zero => Heuristic::Zero,
            HeuristicArg::Haversine => Heuristic::Haversine,
            HeuristicArg::SphericalCosines => Heuristic::SphericalCosines,
            HeuristicArg::Equirectangular => Heuristic::Equirectangular,
        }
    }
}

/// Priority-queue backend selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QueueArg {
    OrderedList,
    #[default]
    BinaryHeap,
}

impl From<QueueArg> for QueueKind {
    fn from(value: QueueArg) -> Self {
        match value {
            QueueArg::OrderedList => QueueKind::OrderedList,
            QueueArg::BinaryHeap => QueueKind::BinaryHeap,
        }
    }
}

/// Parse `LAT,LON` in decimal degrees.
pub fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{}'", value))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {} outside [-90, 90]", lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {} outside [-180, 180]", lon));
    }
    Ok(Coordinate::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_parse_with_spaces() {
        assert_eq!(
            parse_coordinate("43.5, -7.25").unwrap(),
            Coordinate::new(43.5, -7.25)
        );
    }

    #[test]
    fn malformed_coordinates_are_rejected() {
        assert!(parse_coordinate("43.5").is_err());
        assert!(parse_coordinate("north,7").is_err());
        assert!(parse_coordinate("95,7").is_err());
    }

    #[test]
    fn selectors_map_onto_library_types() {
        assert_eq!(Heuristic::from(HeuristicArg::default()), Heuristic::Haversine);
        assert_eq!(QueueKind::from(QueueArg::OrderedList), QueueKind::OrderedList);
    }
}

//! AIS position reports in CSV form, turned into trajectories.
//!
//! Consecutive rows carrying the same ship name form one trajectory; each
//! pair of consecutive rows becomes an edge weighted by the time between the
//! two reports.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, PathId};

/// Ship name used by satellite-relayed reports.
pub const SATELLITE_SHIPNAME: &str = "[SAT-AIS]";

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Options applied while reading position reports.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Drop rows whose ship name is [`SATELLITE_SHIPNAME`].
    pub skip_satellite: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            skip_satellite: true,
        }
    }
}

/// What one ingestion call added to a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub rows: usize,
    pub skipped: usize,
    pub nodes: usize,
    pub edges: usize,
    pub paths: usize,
}

/// Build a new graph from a CSV file.
pub fn load_csv(path: &Path) -> Result<Graph> {
    let mut graph = Graph::new();
    append_csv(&mut graph, path, &IngestOptions::default())?;
    Ok(graph)
}

/// Append the trajectories of a CSV file to an existing graph.
pub fn append_csv(graph: &mut Graph, path: &Path, options: &IngestOptions) -> Result<IngestSummary> {
    let file = File::open(path)?;
    let summary = append_csv_reader(graph, file, options)?;
    info!(
        path = %path.display(),
        rows = summary.rows,
        skipped = summary.skipped,
        nodes = summary.nodes,
        edges = summary.edges,
        paths = summary.paths,
        "ingested position reports"
    );
    Ok(summary)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Column {
    Lat,
    Lon,
    Speed,
    Shipname,
    Timestamp,
    Shiptype,
}

impl Column {
    const ALL: [Column; 6] = [
        Column::Lat,
        Column::Lon,
        Column::Speed,
        Column::Shipname,
        Column::Timestamp,
        Column::Shiptype,
    ];

    fn name(self) -> &'static str {
        match self {
            Column::Lat => "lat",
            Column::Lon => "lon",
            Column::Speed => "speed",
            Column::Shipname => "shipname",
            Column::Timestamp => "scraping_time",
            Column::Shiptype => "shiptype",
        }
    }

    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Column::Lat => &["lat", "latitude"],
            Column::Lon => &["lon", "lng", "long", "longitude"],
            Column::Speed => &["speed", "sog", "speed_knots"],
            Column::Shipname => &["shipname", "ship_name", "name", "vessel_name"],
            Column::Timestamp => &["scraping_time", "scrapingtime", "timestamp", "time", "datetime"],
            Column::Shiptype => &["shiptype", "ship_type", "type", "vessel_type"],
        }
    }
}

fn normalize_header(header: &str) -> String {
    header
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

fn locate_columns(headers: &StringRecord) -> Result<BTreeMap<Column, usize>> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    let mut index_map = BTreeMap::new();

    for column in Column::ALL {
        let found = column
            .synonyms()
            .iter()
            .find_map(|alt| normalized.iter().position(|h| h == alt));
        if let Some(index) = found {
            index_map.insert(column, index);
        }
    }

    let missing: Vec<&str> = Column::ALL
        .into_iter()
        .filter(|column| !index_map.contains_key(column))
        .map(Column::name)
        .collect();
    if !missing.is_empty() {
        return Err(Error::CsvHeader {
            missing: missing.join(", "),
            available: headers.iter().collect::<Vec<_>>().join(", "),
        });
    }
    Ok(index_map)
}

struct OpenTrack {
    path: PathId,
    shipname: String,
    last_node: NodeId,
    last_time: NaiveDateTime,
}

/// Append the trajectories read from any CSV source.
pub fn append_csv_reader<R: Read>(
    graph: &mut Graph,
    reader: R,
    options: &IngestOptions,
) -> Result<IngestSummary> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::Fields)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = locate_columns(&headers)?;

    let nodes_before = graph.node_count();
    let edges_before = graph.edge_count();
    let paths_before = graph.path_count();
    let mut summary = IngestSummary::default();
    let mut open: Option<OpenTrack> = None;

    for result in csv_reader.records() {
        let record = result?;
        summary.rows += 1;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |column: Column| record_field(&record, &columns, column, line);

        let shipname = field(Column::Shipname)?;
        if options.skip_satellite && shipname == SATELLITE_SHIPNAME {
            summary.skipped += 1;
            continue;
        }

        let lat = parse_number(field(Column::Lat)?, line, Column::Lat)?;
        let lon = parse_number(field(Column::Lon)?, line, Column::Lon)?;
        let speed = parse_number(field(Column::Speed)?, line, Column::Speed)?;
        let timestamp = parse_timestamp(field(Column::Timestamp)?, line)?;
        let node = graph.add_node(lat, lon, speed);

        if let Some(track) = open.as_mut().filter(|track| track.shipname == shipname) {
            let seconds = elapsed_seconds(track.last_time, timestamp);
            if seconds < 0.0 {
                warn!(
                    line,
                    shipname,
                    seconds,
                    "position report out of order; clamping edge time to zero"
                );
            }
            graph.add_edge(track.last_node, node, seconds.max(0.0))?;
            graph.extend_path(track.path, node)?;
            track.last_node = node;
            track.last_time = timestamp;
            continue;
        }

        let shiptype = parse_shiptype(field(Column::Shiptype)?, line)?;
        let path = graph.start_path(shiptype, node)?;
        open = Some(OpenTrack {
            path,
            shipname: shipname.to_string(),
            last_node: node,
            last_time: timestamp,
        });
    }

    summary.nodes = graph.node_count() - nodes_before;
    summary.edges = graph.edge_count() - edges_before;
    summary.paths = graph.path_count() - paths_before;
    Ok(summary)
}

fn record_field<'r>(
    record: &'r StringRecord,
    columns: &BTreeMap<Column, usize>,
    column: Column,
    line: u64,
) -> Result<&'r str> {
    columns
        .get(&column)
        .and_then(|&index| record.get(index))
        .ok_or_else(|| Error::CsvField {
            line,
            field: column.name(),
            value: String::new(),
        })
}

fn parse_number(value: &str, line: u64, column: Column) -> Result<f64> {
    value.parse::<f64>().map_err(|_| Error::CsvField {
        line,
        field: column.name(),
        value: value.to_string(),
    })
}

fn parse_shiptype(value: &str, line: u64) -> Result<i32> {
    value
        .parse::<i32>()
        .or_else(|_| value.parse::<f64>().map(|v| v as i32))
        .map_err(|_| Error::CsvField {
            line,
            field: Column::Shiptype.name(),
            value: value.to_string(),
        })
}

fn parse_timestamp(value: &str, line: u64) -> Result<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| Error::CsvField {
            line,
            field: Column::Timestamp.name(),
            value: value.to_string(),
        })
}

fn elapsed_seconds(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

/// Number of trajectories per shiptype, in ascending shiptype order.
pub fn shiptype_counts(graph: &Graph) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for path in graph.paths() {
        *counts.entry(path.shiptype()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACKS: &str = "\
lat,lon,speed,shipname,scraping_time,shiptype
0.0,0.0,10,ALPHA,2023-05-01 00:00:00.000,70
0.5,0.5,11,ALPHA,2023-05-01 01:00:00.500,70
12.0,12.0,3,[SAT-AIS],2023-05-01 01:10:00,0
1.0,1.0,12,ALPHA,2023-05-01 02:00:00,70
0.0,0.8,9,BRAVO,2023-05-01 10:00:00,80
";

    #[test]
    fn consecutive_rows_of_one_ship_form_a_trajectory() {
        let mut graph = Graph::new();
        let summary =
            append_csv_reader(&mut graph, TRACKS.as_bytes(), &IngestOptions::default()).unwrap();
        assert_eq!(
            summary,
            IngestSummary {
                rows: 5,
                skipped: 1,
                nodes: 4,
                edges: 2,
                paths: 2,
            }
        );
        assert_eq!(graph.path_nodes(0).unwrap().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(graph.path(1).unwrap().shiptype(), 80);
        assert_eq!(graph.neighbours(0)[0].travel_time, 3600.5);
        assert_eq!(graph.neighbours(1)[0].travel_time, 3599.5);
        assert_eq!(graph.node(1).unwrap().speed, 11.0);
    }

    #[test]
    fn satellite_rows_can_be_kept() {
        let mut graph = Graph::new();
        let options = IngestOptions {
            skip_satellite: false,
        };
        let summary = append_csv_reader(&mut graph, TRACKS.as_bytes(), &options).unwrap();
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.paths, 4);
    }

    #[test]
    fn header_synonyms_are_accepted() {
        let csv = "Latitude,Longitude,SOG,Ship_Name,Timestamp,Ship_Type\n1,2,3,X,2023-01-01T00:00:00,5\n";
        let mut graph = Graph::new();
        append_csv_reader(&mut graph, csv.as_bytes(), &IngestOptions::default()).unwrap();
        assert_eq!(graph.node(0).unwrap().lon, 2.0);
        assert_eq!(shiptype_counts(&graph).get(&5), Some(&1));
    }

    #[test]
    fn missing_columns_are_reported() {
        let csv = "lat,lon,shipname\n1,2,X\n";
        let mut graph = Graph::new();
        let err = append_csv_reader(&mut graph, csv.as_bytes(), &IngestOptions::default())
            .unwrap_err();
        match err {
            Error::CsvHeader { missing, .. } => {
                assert_eq!(missing, "speed, scraping_time, shiptype");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn malformed_timestamp_names_its_line() {
        let csv = "lat,lon,speed,shipname,scraping_time,shiptype\n1,2,3,X,yesterday,5\n";
        let mut graph = Graph::new();
        let err = append_csv_reader(&mut graph, csv.as_bytes(), &IngestOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::CsvField {
                line: 2,
                field: "scraping_time",
                ..
            }
        ));
    }

    #[test]
    fn appended_files_start_new_trajectories() {
        let mut graph = Graph::new();
        append_csv_reader(&mut graph, TRACKS.as_bytes(), &IngestOptions::default()).unwrap();
        append_csv_reader(&mut graph, TRACKS.as_bytes(), &IngestOptions::default()).unwrap();
        assert_eq!(graph.path_count(), 4);
        assert_eq!(graph.path_nodes(2).unwrap().collect::<Vec<_>>(), vec![4, 5, 6]);
        assert_eq!(shiptype_counts(&graph).into_iter().collect::<Vec<_>>(), vec![(70, 2), (80, 2)]);
    }
}

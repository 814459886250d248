//! Binary container for prepared graphs.
//!
//! Ingesting CSV and computing intersections is slow on large datasets, so a
//! prepared graph can be written once and reloaded for every search.
//!
//! # Serialization Format
//!
//! ```text
//! Header (32 bytes):
//!   - Magic: b"SRGF" (4 bytes)
//!   - Version: u8 (1 byte)
//!   - Reserved: 3 bytes
//!   - Node count: u64 LE (8 bytes)
//!   - Edge count: u64 LE (8 bytes)
//!   - Path count: u64 LE (8 bytes)
//!
//! Body:
//!   - postcard-serialized StoredGraph
//!   - zstd compressed
//!
//! Footer (32 bytes):
//!   - SHA-256 checksum of compressed body
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{BoundingBox, Graph};

const STORE_MAGIC: &[u8; 4] = b"SRGF";

const STORE_VERSION: u8 = 1;

const HEADER_SIZE: usize = 32;

const CHECKSUM_SIZE: usize = 32;

/// zstd compression level (balanced speed/ratio).
const COMPRESSION_LEVEL: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredNode {
    id: u64,
    lat: f64,
    lon: f64,
    speed: f64,
    edge_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPath {
    id: u64,
    shiptype: i32,
    /// `[min_lon, max_lon, min_lat, max_lat]`.
    bounds: [f64; 4],
    len: u64,
    frontier: Option<u64>,
    checked_count: u64,
}

/// Column-wise body: per-node and per-path records followed by the flat
/// blocks they index into.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredGraph {
    nodes: Vec<StoredNode>,
    edge_targets: Vec<u64>,
    edge_times: Vec<f64>,
    paths: Vec<StoredPath>,
    checked: Vec<u64>,
    sequences: Vec<u64>,
}

impl StoredGraph {
    fn capture(graph: &Graph) -> Result<Self> {
        let mut stored = StoredGraph::default();
        for node in graph.nodes() {
            stored.nodes.push(StoredNode {
                id: node.id as u64,
                lat: node.lat,
                lon: node.lon,
                speed: node.speed,
                edge_count: node.edges.len() as u32,
            });
            for edge in &node.edges {
                stored.edge_targets.push(edge.target as u64);
                stored.edge_times.push(edge.travel_time);
            }
        }
        for path in graph.paths() {
            let bounds = path.bounds();
            stored.paths.push(StoredPath {
                id: path.id() as u64,
                shiptype: path.shiptype(),
                bounds: [bounds.min_lon, bounds.max_lon, bounds.min_lat, bounds.max_lat],
                len: path.len() as u64,
                frontier: path.checked_frontier().map(|f| f as u64),
                checked_count: path.checked_paths().len() as u64,
            });
            stored
                .checked
                .extend(path.checked_paths().iter().map(|&p| p as u64));
            stored
                .sequences
                .extend(graph.path_nodes(path.id())?.map(|n| n as u64));
        }
        Ok(stored)
    }

    /// Rebuild a graph, validating every block length and reference.
    fn restore(self) -> std::result::Result<Graph, String> {
        let node_count = self.nodes.len();
        let path_count = self.paths.len();
        let declared_edges =
            checked_total("edge", self.nodes.iter().map(|n| u64::from(n.edge_count)))?;
        if declared_edges != self.edge_targets.len() as u64
            || declared_edges != self.edge_times.len() as u64
        {
            return Err(format!(
                "edge blocks hold {} targets and {} times for {} declared edges",
                self.edge_targets.len(),
                self.edge_times.len(),
                declared_edges
            ));
        }
        let declared_checked =
            checked_total("checked", self.paths.iter().map(|p| p.checked_count))?;
        if declared_checked != self.checked.len() as u64 {
            return Err(format!(
                "checked block holds {} entries, records declare {}",
                self.checked.len(),
                declared_checked
            ));
        }
        let declared_sequence = checked_total("sequence", self.paths.iter().map(|p| p.len))?;
        if declared_sequence != self.sequences.len() as u64 {
            return Err(format!(
                "sequence block holds {} entries, records declare {}",
                self.sequences.len(),
                declared_sequence
            ));
        }

        let in_nodes = |value: u64| -> std::result::Result<usize, String> {
            usize::try_from(value)
                .ok()
                .filter(|&v| v < node_count)
                .ok_or_else(|| format!("node reference {value} out of range ({node_count} nodes)"))
        };
        let in_paths = |value: u64| -> std::result::Result<usize, String> {
            usize::try_from(value)
                .ok()
                .filter(|&v| v < path_count)
                .ok_or_else(|| format!("path reference {value} out of range ({path_count} paths)"))
        };

        let mut graph = Graph::with_capacity(node_count);
        for (index, node) in self.nodes.iter().enumerate() {
            if node.id != index as u64 {
                return Err(format!("node record {index} carries id {}", node.id));
            }
            graph.add_node(node.lat, node.lon, node.speed);
        }

        let mut edge_cursor = 0;
        for (index, node) in self.nodes.iter().enumerate() {
            for _ in 0..node.edge_count {
                let target = in_nodes(self.edge_targets[edge_cursor])?;
                graph
                    .add_edge(index, target, self.edge_times[edge_cursor])
                    .map_err(|e| e.to_string())?;
                edge_cursor += 1;
            }
        }

        let mut checked_cursor = 0;
        let mut sequence_cursor = 0;
        for (index, record) in self.paths.iter().enumerate() {
            if record.id != index as u64 {
                return Err(format!("path record {index} carries id {}", record.id));
            }
            if record.len == 0 {
                return Err(format!("path {index} has no nodes"));
            }
            let len = record.len as usize;
            let sequence = &self.sequences[sequence_cursor..sequence_cursor + len];
            sequence_cursor += len;

            let first = in_nodes(sequence[0])?;
            let path = graph
                .start_path(record.shiptype, first)
                .map_err(|e| e.to_string())?;
            for &node in &sequence[1..] {
                graph
                    .extend_path(path, in_nodes(node)?)
                    .map_err(|e| e.to_string())?;
            }

            let count = record.checked_count as usize;
            let checked = self.checked[checked_cursor..checked_cursor + count]
                .iter()
                .map(|&p| in_paths(p))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            checked_cursor += count;
            let frontier = record.frontier.map(in_paths).transpose()?;

            let trajectory = graph.path_mut(path).map_err(|e| e.to_string())?;
            let [min_lon, max_lon, min_lat, max_lat] = record.bounds;
            trajectory.bounds = BoundingBox {
                min_lon,
                max_lon,
                min_lat,
                max_lat,
            };
            trajectory.checked_frontier = frontier;
            trajectory.checked_paths = checked;
        }

        Ok(graph)
    }
}

/// Write a graph container to `path`.
pub fn save_graph(graph: &Graph, path: &Path) -> Result<()> {
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        paths = graph.path_count(),
        "saving graph"
    );

    let stored = StoredGraph::capture(graph)?;
    let serialized = postcard::to_allocvec(&stored).map_err(|e| Error::GraphStoreSerialize {
        message: format!("postcard serialization failed: {}", e),
    })?;
    let compressed = zstd::encode_all(serialized.as_slice(), COMPRESSION_LEVEL).map_err(|e| {
        Error::GraphStoreSerialize {
            message: format!("zstd compression failed: {}", e),
        }
    })?;
    let checksum = Sha256::digest(&compressed);

    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(STORE_MAGIC);
    header[4] = STORE_VERSION;
    // bytes 5-7 reserved
    header[8..16].copy_from_slice(&(graph.node_count() as u64).to_le_bytes());
    header[16..24].copy_from_slice(&(graph.edge_count() as u64).to_le_bytes());
    header[24..32].copy_from_slice(&(graph.path_count() as u64).to_le_bytes());

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&header)?;
    writer.write_all(&compressed)?;
    writer.write_all(&checksum)?;
    writer.flush()?;

    info!(
        file_size = HEADER_SIZE + compressed.len() + CHECKSUM_SIZE,
        compressed_size = compressed.len(),
        "graph saved"
    );
    Ok(())
}

fn read_u64(header: &[u8; HEADER_SIZE], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&header[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

/// Load a graph container, verifying header, checksum and every reference.
pub fn load_graph(path: &Path) -> Result<Graph> {
    debug!(path = %path.display(), "loading graph");
    let load_error = |message: String| Error::GraphStoreLoad {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| load_error(format!("failed to open file: {}", e)))?;
    let file_len = file
        .metadata()
        .map_err(|e| load_error(format!("failed to read metadata: {}", e)))?
        .len() as usize;
    if file_len < HEADER_SIZE + CHECKSUM_SIZE {
        return Err(load_error(format!("file too short ({} bytes)", file_len)));
    }
    let mut reader = BufReader::new(file);

    let mut header = [0u8; HEADER_SIZE];
    reader
        .read_exact(&mut header)
        .map_err(|e| load_error(format!("failed to read header: {}", e)))?;
    if &header[0..4] != STORE_MAGIC {
        return Err(load_error("invalid magic bytes".to_string()));
    }
    let version = header[4];
    if version != STORE_VERSION {
        return Err(load_error(format!(
            "unsupported version {} (expected {})",
            version, STORE_VERSION
        )));
    }
    let node_count = read_u64(&header, 8);
    let edge_count = read_u64(&header, 16);
    let path_count = read_u64(&header, 24);

    let mut compressed = vec![0u8; file_len - HEADER_SIZE - CHECKSUM_SIZE];
    reader
        .read_exact(&mut compressed)
        .map_err(|e| load_error(format!("failed to read compressed data: {}", e)))?;
    let mut stored_checksum = [0u8; CHECKSUM_SIZE];
    reader
        .read_exact(&mut stored_checksum)
        .map_err(|e| load_error(format!("failed to read checksum: {}", e)))?;
    if Sha256::digest(&compressed).as_slice() != stored_checksum {
        return Err(load_error(
            "checksum mismatch - file may be corrupted".to_string(),
        ));
    }

    let decompressed = zstd::decode_all(compressed.as_slice())
        .map_err(|e| load_error(format!("zstd decompression failed: {}", e)))?;
    let stored: StoredGraph = postcard::from_bytes(&decompressed)
        .map_err(|e| load_error(format!("postcard deserialization failed: {}", e)))?;

    if stored.nodes.len() as u64 != node_count
        || stored.edge_targets.len() as u64 != edge_count
        || stored.paths.len() as u64 != path_count
    {
        return Err(load_error(format!(
            "header declares {} nodes, {} edges, {} paths; body holds {}, {}, {}",
            node_count,
            edge_count,
            path_count,
            stored.nodes.len(),
            stored.edge_targets.len(),
            stored.paths.len()
        )));
    }

    let graph = stored.restore().map_err(load_error)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        paths = graph.path_count(),
        crossed = graph.is_crossed(),
        "loaded graph"
    );
    Ok(graph)
}

/// Sum of per-record lengths read from a container; crafted files may overflow.
fn checked_total(
    block: &str,
    mut lengths: impl Iterator<Item = u64>,
) -> std::result::Result<u64, String> {
    lengths
        .try_fold(0u64, |total, len| total.checked_add(len))
        .ok_or_else(|| format!("{block} block lengths overflow"))
}

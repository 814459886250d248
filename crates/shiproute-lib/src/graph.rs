use serde::Serialize;

use crate::error::{Error, Result};

/// Identifier of a node; always equal to its index in [`Graph::nodes`].
pub type NodeId = usize;

/// Identifier of a trajectory; always equal to its index in [`Graph::paths`].
pub type PathId = usize;

/// Index of a link in the graph's trajectory-chain arena.
pub type LinkId = usize;

/// Directed edge leaving a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    /// Travel time in seconds.
    pub travel_time: f64,
}

/// Position report of a vessel, as a graph vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    /// Speed over ground in knots.
    pub speed: f64,
    pub edges: Vec<Edge>,
}

/// Axis-aligned lon/lat box enclosing every node of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Degenerate box around a single point.
    pub fn from_point(lat: f64, lon: f64) -> Self {
        Self {
            min_lon: lon,
            max_lon: lon,
            min_lat: lat,
            max_lat: lat,
        }
    }

    /// Grow the box so it contains `(lat, lon)`.
    pub fn include(&mut self, lat: f64, lon: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
    }

    /// Whether the boxes overlap on both axes. Boxes touching along an edge overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.min_lon > other.max_lon
            || self.max_lon < other.min_lon
            || self.min_lat > other.max_lat
            || self.max_lat < other.min_lat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PathLink {
    node: NodeId,
    next: Option<LinkId>,
}

/// One vessel's route through the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    id: PathId,
    shiptype: i32,
    head: LinkId,
    tail: LinkId,
    len: usize,
    pub(crate) bounds: BoundingBox,
    pub(crate) checked_frontier: Option<PathId>,
    pub(crate) checked_paths: Vec<PathId>,
}

impl Trajectory {
    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn shiptype(&self) -> i32 {
        self.shiptype
    }

    /// Number of nodes in the chain, including spliced intersection nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// A trajectory always holds at least its first node.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Highest path index this trajectory has been fully compared against.
    pub fn checked_frontier(&self) -> Option<PathId> {
        self.checked_frontier
    }

    /// Path indices already compared against this trajectory, ascending.
    pub fn checked_paths(&self) -> &[PathId] {
        &self.checked_paths
    }

    /// First link of the chain.
    pub fn head(&self) -> LinkId {
        self.head
    }
}

/// Routable graph of vessel positions and the trajectories threading them.
///
/// Nodes, edges and trajectory chains reference each other exclusively by
/// integer id, so every storage vector may grow while a scan holds ids into it.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edge_count: usize,
    paths: Vec<Trajectory>,
    links: Vec<PathLink>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocate room for `nodes` nodes and as many chain links.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edge_count: 0,
            paths: Vec::new(),
            links: Vec::with_capacity(nodes),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn paths(&self) -> &[Trajectory] {
        &self.paths
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::UnknownNode {
            node: id,
            count: self.nodes.len(),
        })
    }

    pub fn path(&self, id: PathId) -> Result<&Trajectory> {
        self.paths.get(id).ok_or(Error::UnknownPath {
            path: id,
            count: self.paths.len(),
        })
    }

    pub(crate) fn path_mut(&mut self, id: PathId) -> Result<&mut Trajectory> {
        let count = self.paths.len();
        self.paths
            .get_mut(id)
            .ok_or(Error::UnknownPath { path: id, count })
    }

    /// Outgoing edges of a node; unknown ids have none.
    pub fn neighbours(&self, id: NodeId) -> &[Edge] {
        self.nodes
            .get(id)
            .map(|node| node.edges.as_slice())
            .unwrap_or(&[])
    }

    /// Append a node without edges and return its id.
    pub fn add_node(&mut self, lat: f64, lon: f64, speed: f64) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            lat,
            lon,
            speed,
            edges: Vec::new(),
        });
        id
    }

    /// Append a directed edge `from -> to`.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, travel_time: f64) -> Result<()> {
        self.node(to)?;
        let count = self.nodes.len();
        let node = self
            .nodes
            .get_mut(from)
            .ok_or(Error::UnknownNode { node: from, count })?;
        node.edges.push(Edge {
            target: to,
            travel_time,
        });
        self.edge_count += 1;
        Ok(())
    }

    /// Index in `from`'s adjacency list of the first edge reaching `to`.
    pub fn edge_index(&self, from: NodeId, to: NodeId) -> Result<usize> {
        self.node(from)?
            .edges
            .iter()
            .position(|edge| edge.target == to)
            .ok_or(Error::MissingEdge { from, to })
    }

    pub(crate) fn edge_mut(&mut self, from: NodeId, index: usize) -> Result<&mut Edge> {
        let count = self.nodes.len();
        self.nodes
            .get_mut(from)
            .and_then(|node| node.edges.get_mut(index))
            .ok_or(Error::UnknownNode { node: from, count })
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        let count = self.nodes.len();
        self.nodes
            .get_mut(id)
            .ok_or(Error::UnknownNode { node: id, count })
    }

    pub(crate) fn bump_edge_count(&mut self, added: usize) {
        self.edge_count += added;
    }

    /// Open a new trajectory whose first node is `first`.
    pub fn start_path(&mut self, shiptype: i32, first: NodeId) -> Result<PathId> {
        let (lat, lon) = {
            let node = self.node(first)?;
            (node.lat, node.lon)
        };
        let link = self.push_link(first, None);
        let id = self.paths.len();
        self.paths.push(Trajectory {
            id,
            shiptype,
            head: link,
            tail: link,
            len: 1,
            bounds: BoundingBox::from_point(lat, lon),
            checked_frontier: None,
            checked_paths: Vec::new(),
        });
        Ok(id)
    }

    /// Append `node` to the end of trajectory `path`, widening its bounding box.
    pub fn extend_path(&mut self, path: PathId, node: NodeId) -> Result<()> {
        let (lat, lon) = {
            let node = self.node(node)?;
            (node.lat, node.lon)
        };
        let tail = self.path(path)?.tail;
        let link = self.push_link(node, None);
        self.links[tail].next = Some(link);
        let trajectory = self.path_mut(path)?;
        trajectory.tail = link;
        trajectory.len += 1;
        trajectory.bounds.include(lat, lon);
        Ok(())
    }

    /// Insert `node` into trajectory `path` right after `after`. Returns the new link.
    pub(crate) fn splice_after(&mut self, path: PathId, after: LinkId, node: NodeId) -> Result<LinkId> {
        let next = self.links[after].next;
        let link = self.push_link(node, next);
        self.links[after].next = Some(link);
        let trajectory = self.path_mut(path)?;
        if trajectory.tail == after {
            trajectory.tail = link;
        }
        trajectory.len += 1;
        Ok(link)
    }

    fn push_link(&mut self, node: NodeId, next: Option<LinkId>) -> LinkId {
        self.links.push(PathLink { node, next });
        self.links.len() - 1
    }

    /// Node referenced by a chain link.
    pub fn link_node(&self, link: LinkId) -> NodeId {
        self.links[link].node
    }

    /// Successor of a chain link.
    pub fn next_link(&self, link: LinkId) -> Option<LinkId> {
        self.links[link].next
    }

    /// Iterate the node ids of a trajectory in travel order.
    pub fn path_nodes(&self, path: PathId) -> Result<PathNodes<'_>> {
        let head = self.path(path)?.head;
        Ok(PathNodes {
            graph: self,
            cursor: Some(head),
        })
    }

    /// First and last node of a trajectory.
    pub fn path_endpoints(&self, path: PathId) -> Result<(NodeId, NodeId)> {
        let trajectory = self.path(path)?;
        Ok((
            self.link_node(trajectory.head),
            self.link_node(trajectory.tail),
        ))
    }

    /// Node closest to `(lat, lon)` by squared planar distance; the lowest id wins ties.
    pub fn nearest_node(&self, lat: f64, lon: f64) -> Result<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for node in &self.nodes {
            let distance = (node.lat - lat).powi(2) + (node.lon - lon).powi(2);
            match best {
                Some((_, current)) if distance >= current => {}
                _ => best = Some((node.id, distance)),
            }
        }
        best.map(|(id, _)| id).ok_or(Error::EmptyGraph)
    }

    /// Whether any trajectory has already been intersection-checked.
    pub fn is_crossed(&self) -> bool {
        self.paths
            .iter()
            .any(|path| path.checked_frontier.is_some())
    }
}

/// Iterator over the node ids of one trajectory.
pub struct PathNodes<'a> {
    graph: &'a Graph,
    cursor: Option<LinkId>,
}

impl Iterator for PathNodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.cursor?;
        self.cursor = self.graph.next_link(link);
        Some(self.graph.link_node(link))
    }
}

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::graph::{Edge, Graph, LinkId, NodeId, PathId};

use super::classify::{classify, SegmentIntersection};
use super::filter::{needs_test, record_checked, PairDecision};

/// A proper crossing between segment `p1 -> q1` of `path` and segment
/// `p2 -> q2` of `other`, located at parameters `t` and `u` respectively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub path: PathId,
    pub other: PathId,
    /// Chain link of `p1` in `path`.
    pub p1_link: LinkId,
    /// Chain link of `p2` in `other`.
    pub p2_link: LinkId,
    pub p1: NodeId,
    pub q1: NodeId,
    pub p2: NodeId,
    pub q2: NodeId,
    pub t: f64,
    pub u: f64,
}

/// Insert the crossing node, split both edges and splice the node into both
/// trajectories. Returns the new node's id.
pub fn add_intersection(graph: &mut Graph, crossing: &Crossing) -> Result<NodeId> {
    let Crossing { t, u, .. } = *crossing;

    let (lat, lon, speed) = {
        let p1 = graph.node(crossing.p1)?;
        let q1 = graph.node(crossing.q1)?;
        let p2 = graph.node(crossing.p2)?;
        (
            p1.lat + t * (q1.lat - p1.lat),
            p1.lon + t * (q1.lon - p1.lon),
            p1.speed.max(p2.speed),
        )
    };

    let first = graph.edge_index(crossing.p1, crossing.q1)?;
    let second = graph.edge_index(crossing.p2, crossing.q2)?;
    let first_time = graph.node(crossing.p1)?.edges[first].travel_time;
    let second_time = graph.node(crossing.p2)?.edges[second].travel_time;

    let new = graph.add_node(lat, lon, speed);
    graph.node_mut(new)?.edges = vec![
        Edge {
            target: crossing.q1,
            travel_time: (1.0 - t) * first_time,
        },
        Edge {
            target: crossing.q2,
            travel_time: (1.0 - u) * second_time,
        },
    ];
    *graph.edge_mut(crossing.p1, first)? = Edge {
        target: new,
        travel_time: t * first_time,
    };
    *graph.edge_mut(crossing.p2, second)? = Edge {
        target: new,
        travel_time: u * second_time,
    };
    graph.bump_edge_count(2);

    graph.splice_after(crossing.path, crossing.p1_link, new)?;
    graph.splice_after(crossing.other, crossing.p2_link, new)?;
    Ok(new)
}

/// Counters gathered while augmenting a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntersectionReport {
    pub pairs_tested: usize,
    pub pairs_skipped_shiptype: usize,
    pub pairs_skipped_disjoint: usize,
    pub segments_compared: usize,
    /// Proper crossings turned into new nodes.
    pub added: usize,
    /// Endpoint contacts, classified but left alone.
    pub touching: usize,
    /// Collinear overlaps, classified but left alone.
    pub overlapping: usize,
    /// Crossings added per trajectory.
    pub per_path: Vec<usize>,
}

impl IntersectionReport {
    /// Contacts that were classified but did not alter the graph.
    pub fn ignored(&self) -> usize {
        self.touching + self.overlapping
    }
}

/// What the scan does after comparing one pair of segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanStep {
    /// Move on to the next segment of the second trajectory.
    Advance,
    /// The first segment was split; re-read its far end before moving on.
    RetryShortened,
}

/// Positions of the two segments under comparison.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    path: PathId,
    other: PathId,
    p1: LinkId,
    q1: LinkId,
    p2: LinkId,
    q2: LinkId,
}

/// Compare every trajectory pair not yet checked and splice a node into
/// both trajectories at each proper crossing.
///
/// Pairs are visited with `other` increasing for each `path`, starting past
/// the path's checked frontier, so rerunning on a graph with appended
/// trajectories only compares the new pairs.
pub fn augment(graph: &mut Graph) -> Result<IntersectionReport> {
    let path_count = graph.path_count();
    let nodes_before = graph.node_count();
    let mut report = IntersectionReport {
        per_path: vec![0; path_count],
        ..IntersectionReport::default()
    };

    for path in 0..path_count {
        let start = graph
            .path(path)?
            .checked_frontier()
            .map_or(path + 1, |frontier| frontier + 1)
            .max(path + 1);

        for other in start..path_count {
            match needs_test(graph, path, other)? {
                PairDecision::Test => {}
                PairDecision::SkipShiptype => {
                    report.pairs_skipped_shiptype += 1;
                    continue;
                }
                PairDecision::SkipDisjoint => {
                    report.pairs_skipped_disjoint += 1;
                    continue;
                }
            }
            report.pairs_tested += 1;
            scan_pair(graph, path, other, &mut report)?;
            record_checked(graph, path, other)?;
        }

        if path > 0 && path % 1000 == 0 {
            debug!(path, path_count, added = report.added, "augmentation progress");
        }
    }

    info!(
        paths = path_count,
        pairs_tested = report.pairs_tested,
        added = report.added,
        ignored = report.ignored(),
        nodes_before,
        nodes_after = graph.node_count(),
        "intersections computed"
    );
    Ok(report)
}

/// Compare every edge of `path` against every edge of `other`, mutating the
/// graph as crossings are found.
fn scan_pair(
    graph: &mut Graph,
    path: PathId,
    other: PathId,
    report: &mut IntersectionReport,
) -> Result<()> {
    let mut p1 = graph.path(path)?.head();
    let other_head = graph.path(other)?.head();

    while let Some(mut q1) = graph.next_link(p1) {
        let mut p2 = other_head;
        while let Some(q2) = graph.next_link(p2) {
            let cursor = Cursor {
                path,
                other,
                p1,
                q1,
                p2,
                q2,
            };
            if compare_segments(graph, &cursor, report)? == ScanStep::RetryShortened {
                if let Some(shortened) = graph.next_link(p1) {
                    q1 = shortened;
                }
            }
            // The spliced node now follows p2; continue from the old far end.
            p2 = q2;
        }
        p1 = q1;
    }
    Ok(())
}

fn compare_segments(
    graph: &mut Graph,
    cursor: &Cursor,
    report: &mut IntersectionReport,
) -> Result<ScanStep> {
    let p1 = graph.link_node(cursor.p1);
    let q1 = graph.link_node(cursor.q1);
    let p2 = graph.link_node(cursor.p2);
    let q2 = graph.link_node(cursor.q2);

    let result = classify(
        graph.node(p1)?,
        graph.node(q1)?,
        graph.node(p2)?,
        graph.node(q2)?,
    );
    report.segments_compared += 1;

    match result {
        SegmentIntersection::Proper { t, u } => {
            let crossing = Crossing {
                path: cursor.path,
                other: cursor.other,
                p1_link: cursor.p1,
                p2_link: cursor.p2,
                p1,
                q1,
                p2,
                q2,
                t,
                u,
            };
            add_intersection(graph, &crossing)?;
            report.added += 1;
            report.per_path[cursor.path] += 1;
            report.per_path[cursor.other] += 1;
            Ok(ScanStep::RetryShortened)
        }
        SegmentIntersection::Touching { .. } => {
            report.touching += 1;
            Ok(ScanStep::Advance)
        }
        SegmentIntersection::Overlap { .. } => {
            report.overlapping += 1;
            Ok(ScanStep::Advance)
        }
        SegmentIntersection::SharedEndpoint | SegmentIntersection::None => Ok(ScanStep::Advance),
    }
}

//! Planar classification of two directed segments in lon/lat space.

use serde::Serialize;

use crate::graph::Node;

/// Where two non-parallel segments touch at an endpoint.
///
/// Names read as "first segment position / second segment position", with
/// `Start`/`End` for parameter 0/1 and `Inner` for the open interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchKind {
    InnerStart,
    InnerEnd,
    StartInner,
    EndInner,
    StartStart,
    EndStart,
    StartEnd,
    EndEnd,
}

impl TouchKind {
    /// Swap the roles of the two segments.
    pub fn swapped(self) -> Self {
        match self {
            TouchKind::InnerStart => TouchKind::StartInner,
            TouchKind::InnerEnd => TouchKind::EndInner,
            TouchKind::StartInner => TouchKind::InnerStart,
            TouchKind::EndInner => TouchKind::InnerEnd,
            TouchKind::StartStart => TouchKind::StartStart,
            TouchKind::EndStart => TouchKind::StartEnd,
            TouchKind::StartEnd => TouchKind::EndStart,
            TouchKind::EndEnd => TouchKind::EndEnd,
        }
    }
}

/// How two collinear segments overlap, in terms of the second segment's
/// endpoints projected onto the first (`t0` for its start, `t1` for its end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapKind {
    /// Starts inside, runs past the end in the same direction.
    TailForward,
    /// Starts inside, runs back past the start.
    HeadBackward,
    /// Starts beyond the end, finishes inside.
    TailBackward,
    /// Starts before the start, finishes inside.
    HeadForward,
    /// Fully inside, same direction.
    ContainedForward,
    /// Fully inside, opposite direction.
    ContainedBackward,
    /// Covers the whole first segment, same direction.
    CoversForward,
    /// Covers the whole first segment, opposite direction.
    CoversBackward,
}

/// Classification of a segment pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentIntersection {
    /// The segments share a node, so any contact is the shared node itself.
    SharedEndpoint,
    None,
    /// Interior crossing at `P1 + t (Q1 - P1) = P2 + u (Q2 - P2)`.
    Proper { t: f64, u: f64 },
    Touching { touch: TouchKind, t: f64, u: f64 },
    Overlap { overlap: OverlapKind, t0: f64, t1: f64 },
}

impl SegmentIntersection {
    /// Numeric class: 0 for no intersection, 1 for a proper crossing, 2 to 9
    /// for touching and 10 to 17 for collinear overlaps.
    pub fn code(&self) -> u8 {
        match self {
            SegmentIntersection::SharedEndpoint | SegmentIntersection::None => 0,
            SegmentIntersection::Proper { .. } => 1,
            SegmentIntersection::Touching { touch, .. } => match touch {
                TouchKind::InnerStart => 2,
                TouchKind::InnerEnd => 3,
                TouchKind::StartInner => 4,
                TouchKind::EndInner => 5,
                TouchKind::StartStart => 6,
                TouchKind::EndStart => 7,
                TouchKind::StartEnd => 8,
                TouchKind::EndEnd => 9,
            },
            SegmentIntersection::Overlap { overlap, .. } => match overlap {
                OverlapKind::TailForward => 10,
                OverlapKind::HeadBackward => 11,
                OverlapKind::TailBackward => 12,
                OverlapKind::HeadForward => 13,
                OverlapKind::ContainedForward => 14,
                OverlapKind::ContainedBackward => 15,
                OverlapKind::CoversForward => 16,
                OverlapKind::CoversBackward => 17,
            },
        }
    }

    pub fn is_proper(&self) -> bool {
        matches!(self, SegmentIntersection::Proper { .. })
    }

    /// Contact that is recorded but does not alter the graph.
    pub fn is_ignored_contact(&self) -> bool {
        self.code() > 1
    }
}

fn cross(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

fn interior(value: f64) -> bool {
    value > 0.0 && value < 1.0
}

/// Classify segment `p1 -> q1` against segment `p2 -> q2`.
///
/// A first segment whose start node is an endpoint of the second is never
/// classified further; the trajectories of a graph share nodes wherever an
/// intersection was spliced. A shared end node pins `t` to 1, so it is
/// classified as a touching contact instead.
pub fn classify(p1: &Node, q1: &Node, p2: &Node, q2: &Node) -> SegmentIntersection {
    if p1.id == p2.id || p1.id == q2.id {
        return SegmentIntersection::SharedEndpoint;
    }

    let (rx, ry) = (q1.lon - p1.lon, q1.lat - p1.lat);
    let (sx, sy) = (q2.lon - p2.lon, q2.lat - p2.lat);
    let (dx, dy) = (p2.lon - p1.lon, p2.lat - p1.lat);

    let denominator = cross(rx, ry, sx, sy);
    let offset_cross_s = cross(dx, dy, sx, sy);

    if denominator != 0.0 {
        let t = offset_cross_s / denominator;
        let u = cross(dx, dy, rx, ry) / denominator;
        return classify_crossing(t, u);
    }

    if offset_cross_s != 0.0 {
        return SegmentIntersection::None;
    }

    let length_squared = rx * rx + ry * ry;
    if length_squared == 0.0 {
        return SegmentIntersection::None;
    }
    let t0 = (dx * rx + dy * ry) / length_squared;
    let t1 = t0 + (sx * rx + sy * ry) / length_squared;
    classify_overlap(t0, t1)
}

fn classify_crossing(t: f64, u: f64) -> SegmentIntersection {
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return SegmentIntersection::None;
    }
    if interior(t) && interior(u) {
        return SegmentIntersection::Proper { t, u };
    }

    let touch = if interior(t) && u == 0.0 {
        TouchKind::InnerStart
    } else if interior(t) && u == 1.0 {
        TouchKind::InnerEnd
    } else if t == 0.0 && interior(u) {
        TouchKind::StartInner
    } else if t == 1.0 && interior(u) {
        TouchKind::EndInner
    } else if t == 0.0 && u == 0.0 {
        TouchKind::StartStart
    } else if t == 1.0 && u == 0.0 {
        TouchKind::EndStart
    } else if t == 0.0 && u == 1.0 {
        TouchKind::StartEnd
    } else {
        TouchKind::EndEnd
    };
    SegmentIntersection::Touching { touch, t, u }
}

fn classify_overlap(t0: f64, t1: f64) -> SegmentIntersection {
    let overlap = if interior(t0) && t1 > 1.0 {
        OverlapKind::TailForward
    } else if interior(t0) && t1 < 0.0 {
        OverlapKind::HeadBackward
    } else if t0 > 1.0 && interior(t1) {
        OverlapKind::TailBackward
    } else if t0 < 0.0 && interior(t1) {
        OverlapKind::HeadForward
    } else if interior(t0) && interior(t1) && t1 > t0 {
        OverlapKind::ContainedForward
    } else if interior(t0) && interior(t1) && t1 < t0 {
        OverlapKind::ContainedBackward
    } else if t0 < 0.0 && t1 > 1.0 {
        OverlapKind::CoversForward
    } else if t0 > 1.0 && t1 < 0.0 {
        OverlapKind::CoversBackward
    } else {
        return SegmentIntersection::None;
    };
    SegmentIntersection::Overlap { overlap, t0, t1 }
}

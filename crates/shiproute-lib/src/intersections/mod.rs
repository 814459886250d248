//! Trajectory crossing detection and graph augmentation.
//!
//! Augmentation must finish before any search runs over the graph: it adds
//! nodes, rewrites edges and splices trajectory chains while scanning them.

mod augment;
mod classify;
mod filter;

pub use augment::{add_intersection, augment, Crossing, IntersectionReport};
pub use classify::{classify, OverlapKind, SegmentIntersection, TouchKind};
pub use filter::{needs_test, record_checked, PairDecision};

use crate::error::{Error, Result};
use crate::graph::{Graph, PathId};

/// Whether a pair of trajectories has to be compared segment by segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairDecision {
    Test,
    /// Different vessel classes never share a crossing.
    SkipShiptype,
    /// Bounding boxes do not overlap.
    SkipDisjoint,
}

/// Decide whether trajectory `path` must be compared against `other`.
///
/// `other` must lie beyond `path`'s checked frontier: revisiting an already
/// compared pair means the caller's sweep went backwards.
pub fn needs_test(graph: &Graph, path: PathId, other: PathId) -> Result<PairDecision> {
    let first = graph.path(path)?;
    let second = graph.path(other)?;

    if first.shiptype() != second.shiptype() {
        return Ok(PairDecision::SkipShiptype);
    }

    if let Some(frontier) = first.checked_frontier() {
        if other <= frontier {
            return Err(Error::PairOrder {
                path,
                other,
                frontier,
            });
        }
    }

    if first.bounds().overlaps(second.bounds()) {
        Ok(PairDecision::Test)
    } else {
        Ok(PairDecision::SkipDisjoint)
    }
}

/// Extend `path`'s checked frontier to `last`, recording every newly covered
/// path index except `path` itself.
pub fn record_checked(graph: &mut Graph, path: PathId, last: PathId) -> Result<()> {
    let trajectory = graph.path_mut(path)?;
    let first_new = trajectory.checked_frontier.map_or(0, |frontier| frontier + 1);
    if last < first_new {
        return Ok(());
    }
    trajectory
        .checked_paths
        .extend((first_new..=last).filter(|&index| index != path));
    trajectory.checked_frontier = Some(last);
    Ok(())
}

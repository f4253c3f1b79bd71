//! Single-pass path engines over a topological order.
//!
//! Both engines relax every outgoing edge of each vertex exactly once, in
//! the supplied order, so they are correct for negative weights as long as
//! the order is a real topological order of an acyclic graph. Neither
//! engine checks that precondition; gate calls on [`crate::topo::TopoResult::is_dag`].
//!
//! Distances are `Option<i64>`: `None` is "unreachable" for shortest paths
//! and "no path established" for longest paths. Additions saturate.

mod longest;
mod shortest;

pub use longest::{LongestPaths, longest_paths};
pub use shortest::{ShortestPaths, shortest_paths};

/// Follow `parent` links back from `target` and return the path root-first.
///
/// Returns an empty path when `target` has no distance.
fn reconstruct(dist: &[Option<i64>], parent: &[Option<usize>], target: usize) -> Vec<usize> {
    if dist.get(target).copied().flatten().is_none() {
        return Vec::new();
    }
    let mut path = vec![target];
    let mut current = target;
    // Parents strictly precede children in the order, so the walk is bounded.
    while let Some(p) = parent[current] {
        path.push(p);
        current = p;
        if path.len() > parent.len() {
            break;
        }
    }
    path.reverse();
    path
}

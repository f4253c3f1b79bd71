//! Strongly connected components.
//!
//! # Overview
//!
//! Two independent engines compute the same partition:
//!
//! | Engine | Strategy | Passes |
//! |--------|----------|--------|
//! | [`Tarjan`] | discovery index / low-link, single DFS | 1 |
//! | [`Kosaraju`] | finish order, then DFS on the transpose | 2 |
//!
//! Both implement [`SccAlgorithm`] and return an [`SccResult`]. Callers pick
//! one explicitly, either statically (`Tarjan.run(&g)`) or by name through
//! [`SccEngine`]. Running both and comparing `components()` is the
//! cross-check the analysis pipeline performs.
//!
//! # Canonical ordering
//!
//! Members of each [`Component`] are sorted ascending and components are
//! sorted by their minimum member. Component indices are therefore a pure
//! function of the partition, not of traversal order, and the two engines
//! produce equal results for every graph. Only their [`SccMetrics`] differ.

mod kosaraju;
mod tarjan;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::condense::condense;
use crate::graph::Graph;
use crate::metrics::SccMetrics;

pub use kosaraju::Kosaraju;
pub use tarjan::Tarjan;

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// One SCC: its member vertices in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Component {
    members: Vec<usize>,
}

impl Component {
    /// Members in ascending order.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false` for components produced by an engine.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Smallest member; the component's sort key.
    #[must_use]
    pub fn min(&self) -> Option<usize> {
        self.members.first().copied()
    }

    #[must_use]
    pub fn contains(&self, vertex: usize) -> bool {
        self.members.binary_search(&vertex).is_ok()
    }

    /// `true` if this component contains a cycle: more than one member, or
    /// a single member with a self-loop.
    #[must_use]
    pub fn is_cyclic(&self, graph: &Graph) -> bool {
        match self.members.as_slice() {
            [] => false,
            [only] => graph.has_self_loop(*only),
            _ => true,
        }
    }
}

// ---------------------------------------------------------------------------
// SccResult
// ---------------------------------------------------------------------------

/// Partition of a graph's vertices into SCCs, plus the run's counters.
#[derive(Debug, Clone, Serialize)]
pub struct SccResult {
    components: Vec<Component>,
    component_of: Vec<usize>,
    metrics: SccMetrics,
}

impl SccResult {
    /// Canonicalize raw engine output.
    ///
    /// Sorts each component's members, sorts components by minimum member,
    /// and rebuilds the vertex → component index.
    pub(crate) fn from_components(
        raw: Vec<Vec<usize>>,
        vertex_count: usize,
        metrics: SccMetrics,
    ) -> Self {
        let mut components: Vec<Component> = raw
            .into_iter()
            .map(|mut members| {
                members.sort_unstable();
                Component { members }
            })
            .collect();
        components.sort_unstable_by_key(|c| c.min().unwrap_or(usize::MAX));

        let mut component_of = vec![0; vertex_count];
        for (idx, component) in components.iter().enumerate() {
            for &v in &component.members {
                component_of[v] = idx;
            }
        }

        Self {
            components,
            component_of,
            metrics,
        }
    }

    /// Components ordered by minimum member.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Index into [`SccResult::components`] of the component holding `vertex`.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is not a vertex of the analysed graph.
    #[must_use]
    pub fn component_of(&self, vertex: usize) -> usize {
        self.component_of[vertex]
    }

    /// The full vertex → component index.
    #[must_use]
    pub fn component_index(&self) -> &[usize] {
        &self.component_of
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[must_use]
    pub const fn metrics(&self) -> SccMetrics {
        self.metrics
    }

    /// Size of the largest component, 0 for an empty graph.
    #[must_use]
    pub fn largest_size(&self) -> usize {
        self.components.iter().map(Component::len).max().unwrap_or(0)
    }

    /// `true` when every component is a singleton.
    ///
    /// Self-loops are not visible here; see [`SccResult::cyclic_components`].
    #[must_use]
    pub fn all_singletons(&self) -> bool {
        self.components.len() == self.component_of.len()
    }

    /// Components that actually contain a cycle, in component order.
    pub fn cyclic_components<'a>(
        &'a self,
        graph: &'a Graph,
    ) -> impl Iterator<Item = &'a Component> + 'a {
        self.components.iter().filter(move |c| c.is_cyclic(graph))
    }

    /// `true` if `other` holds the same partition in the same order.
    #[must_use]
    pub fn same_partition(&self, other: &Self) -> bool {
        self.components == other.components
    }

    /// Expand an order over component indices into an order over vertices.
    ///
    /// Each component contributes its members in ascending order. Indices
    /// that do not name a component are skipped.
    #[must_use]
    pub fn task_order(&self, component_order: &[usize]) -> Vec<usize> {
        component_order
            .iter()
            .filter_map(|&idx| self.components.get(idx))
            .flat_map(|c| c.members.iter().copied())
            .collect()
    }

    /// Build the condensation of `graph` from this partition.
    #[must_use]
    pub fn condense(&self, graph: &Graph) -> Graph {
        condense(graph, self)
    }
}

// ---------------------------------------------------------------------------
// Engine selection
// ---------------------------------------------------------------------------

/// Computes the SCC partition of a graph.
pub trait SccAlgorithm {
    /// Short engine name used in logs and reports.
    const NAME: &'static str;

    /// Run the engine. Every call starts from fresh state.
    fn run(&self, graph: &Graph) -> SccResult;
}

/// Engine chosen by name, e.g. from a config file or command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SccEngine {
    #[default]
    Tarjan,
    Kosaraju,
}

impl SccEngine {
    pub const ALL: [Self; 2] = [Self::Tarjan, Self::Kosaraju];

    #[must_use]
    pub fn run(self, graph: &Graph) -> SccResult {
        match self {
            Self::Tarjan => Tarjan.run(graph),
            Self::Kosaraju => Kosaraju.run(graph),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tarjan => Tarjan::NAME,
            Self::Kosaraju => Kosaraju::NAME,
        }
    }
}

impl fmt::Display for SccEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name that matches no [`SccEngine`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SCC engine {0:?} (expected \"tarjan\" or \"kosaraju\")")]
pub struct UnknownEngine(pub String);

impl FromStr for SccEngine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tarjan" => Ok(Self::Tarjan),
            "kosaraju" => Ok(Self::Kosaraju),
            _ => Err(UnknownEngine(s.to_string())),
        }
    }
}

//! Directed trust graph.
//!
//! Nodes are identity ids. Each ordered pair of identities has at most one
//! edge, always the one from the latest-dated trust proof seen so far. The
//! graph may contain cycles (mutual trust), so every search tracks visited
//! nodes.

use chrono::{DateTime, FixedOffset};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crev_core::{PublicId, TrustLevel};
use crev_proof::Proof;

/// Trust from one identity to another, as of the proof that set it.
#[derive(Debug, Clone)]
pub struct TrustEdge {
    pub level: TrustLevel,
    pub date: DateTime<FixedOffset>,
    pub proof: Arc<Proof>,
}

#[derive(Debug, Default)]
pub struct TrustGraph {
    nodes: HashMap<String, PublicId>,
    /// source id -> target id -> edge
    adjacency: HashMap<String, BTreeMap<String, TrustEdge>>,
}

impl TrustGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a node. The url of the most recently added sighting
    /// wins, regardless of proof dates.
    pub fn add_node(&mut self, id: &PublicId) {
        self.nodes.insert(id.id.clone(), id.clone());
    }

    pub fn node(&self, id: &str) -> Option<&PublicId> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PublicId> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum()
    }

    /// Insert an edge, or replace the existing one if `edge` is strictly
    /// newer. Returns whether the graph changed.
    pub fn add_edge(&mut self, source: &str, target: &str, edge: TrustEdge) -> bool {
        let targets = self.adjacency.entry(source.to_string()).or_default();
        match targets.get(target) {
            Some(existing) if edge.date <= existing.date => {
                tracing::trace!(
                    source,
                    target,
                    "ignoring trust edge not newer than the stored one"
                );
                false
            }
            _ => {
                targets.insert(target.to_string(), edge);
                true
            }
        }
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&TrustEdge> {
        self.adjacency.get(source)?.get(target)
    }

    /// Ids that `source` has an edge to, in id order.
    pub fn successors(&self, source: &str) -> impl Iterator<Item = &str> {
        self.adjacency
            .get(source)
            .into_iter()
            .flat_map(|targets| targets.keys().map(String::as_str))
    }

    /// Every id reachable from `source`, including `source` itself.
    ///
    /// Edge levels are not consulted: `distrust` and `none` edges are
    /// followed like any other.
    pub fn reachable_from(&self, source: &str) -> HashSet<String> {
        let mut visited = HashSet::new();
        let mut stack = vec![source.to_string()];
        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            stack.extend(
                self.successors(&id)
                    .filter(|next| !visited.contains(*next))
                    .map(str::to_string),
            );
        }
        visited
    }

    /// Whether a directed path leads from `source` to `target`. A node
    /// always reaches itself.
    pub fn has_path(&self, source: &str, target: &str) -> bool {
        self.reachable_from(source).contains(target)
    }

    /// All simple paths (no repeated node) from `source` to `target`, each
    /// listed as the sequence of node ids.
    ///
    /// The number of simple paths can grow exponentially with graph size;
    /// use [`TrustGraph::has_path`] when only existence matters.
    pub fn simple_paths(&self, source: &str, target: &str) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        let mut path = vec![source.to_string()];
        let mut on_path = HashSet::from([source.to_string()]);
        self.extend_paths(target, &mut path, &mut on_path, &mut paths);
        paths
    }

    fn extend_paths(
        &self,
        target: &str,
        path: &mut Vec<String>,
        on_path: &mut HashSet<String>,
        paths: &mut Vec<Vec<String>>,
    ) {
        let Some(last) = path.last().cloned() else {
            return;
        };
        if last == target {
            paths.push(path.clone());
            return;
        }
        for next in self.successors(&last) {
            if on_path.contains(next) {
                continue;
            }
            path.push(next.to_string());
            on_path.insert(next.to_string());
            self.extend_paths(target, path, on_path, paths);
            on_path.remove(next);
            path.pop();
        }
    }
}

//! Mutual-exclusion constraints between signal heads
//!
//! Which pairs of lights may never be Green at the same time is derived
//! once when a system is built and never changes afterwards.

use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{BTreeSet, HashMap};

use super::types::{Light, LightId};

/// Undirected graph of lights; an edge means the two endpoints may never
/// show Green simultaneously
#[derive(Debug, Clone)]
pub struct ConflictGraph {
    graph: UnGraph<LightId, ()>,
    light_to_node: HashMap<LightId, NodeIndex>,
}

impl ConflictGraph {
    fn with_nodes(light_count: usize) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut light_to_node = HashMap::new();
        for i in 0..light_count {
            let id = LightId(i);
            let node = graph.add_node(id);
            light_to_node.insert(id, node);
        }
        Self { graph, light_to_node }
    }

    fn add_pair(&mut self, a: LightId, b: LightId) {
        if let (Some(&na), Some(&nb)) = (self.light_to_node.get(&a), self.light_to_node.get(&b)) {
            self.graph.update_edge(na, nb, ());
        }
    }

    /// Default topology: every pair of lights in different sync groups
    /// conflicts; membership within a group never does
    pub fn derive(lights: &[Light]) -> Self {
        let mut conflicts = Self::with_nodes(lights.len());
        for i in 0..lights.len() {
            for j in (i + 1)..lights.len() {
                if lights[i].sync_group != lights[j].sync_group {
                    conflicts.add_pair(lights[i].id, lights[j].id);
                }
            }
        }
        conflicts
    }

    /// Explicit topology from a caller-supplied pair list. Pairs that are
    /// out of range or self-referential were already rejected by
    /// `SimConfig::validate` and are skipped here.
    pub fn from_pairs(light_count: usize, pairs: &[(usize, usize)]) -> Self {
        let mut conflicts = Self::with_nodes(light_count);
        for &(a, b) in pairs {
            if a == b || a >= light_count || b >= light_count {
                continue;
            }
            conflicts.add_pair(LightId(a), LightId(b));
        }
        conflicts
    }

    /// Whether the two lights are a conflicting pair
    pub fn conflicts(&self, a: LightId, b: LightId) -> bool {
        match (self.light_to_node.get(&a), self.light_to_node.get(&b)) {
            (Some(&na), Some(&nb)) => self.graph.contains_edge(na, nb),
            _ => false,
        }
    }

    /// Ids of currently Green lights that conflict with the given light
    pub fn green_conflicts(&self, light: LightId, lights: &[Light]) -> Vec<LightId> {
        lights
            .iter()
            .filter(|other| other.id != light && other.is_green() && self.conflicts(light, other.id))
            .map(|other| other.id)
            .collect()
    }

    /// True iff any conflicting pair is simultaneously Green. Pure query.
    pub fn has_any_conflict(&self, lights: &[Light]) -> bool {
        self.green_pairs(lights).next().is_some()
    }

    /// Every light participating in at least one simultaneous-Green
    /// conflicting pair, in ascending id order
    pub fn green_conflict_participants(&self, lights: &[Light]) -> Vec<LightId> {
        let mut participants = BTreeSet::new();
        for (a, b) in self.green_pairs(lights) {
            participants.insert(a);
            participants.insert(b);
        }
        participants.into_iter().collect()
    }

    /// All conflicting pairs, each ordered low-to-high, sorted
    pub fn pairs(&self) -> Vec<(LightId, LightId)> {
        let mut pairs: Vec<(LightId, LightId)> = self
            .graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(na, nb)| {
                let (a, b) = (self.graph[na], self.graph[nb]);
                if a <= b {
                    (a, b)
                } else {
                    (b, a)
                }
            })
            .collect();
        pairs.sort();
        pairs
    }

    fn green_pairs<'a>(
        &'a self,
        lights: &'a [Light],
    ) -> impl Iterator<Item = (LightId, LightId)> + 'a {
        self.graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(na, nb)| (self.graph[na], self.graph[nb]))
            .filter(|&(a, b)| {
                let a_green = lights.iter().any(|l| l.id == a && l.is_green());
                let b_green = lights.iter().any(|l| l.id == b && l.is_green());
                a_green && b_green
            })
    }
}

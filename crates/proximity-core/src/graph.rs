//! Social graph accumulated across circle levels

use crate::author::{Author, AuthorId};
use crate::circle::{CircleOutcome, CircleResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Direction for graph traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow "author -> co-author" arcs only
    Outgoing,
    Incoming,
    /// Treat co-authorship as symmetric
    #[default]
    Both,
}

/// A directed co-authorship arc: `to` appears on a paper attributed to `from`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub from: AuthorId,
    pub to: AuthorId,
}

/// Co-authorship graph keyed by author id
///
/// Merges are idempotent; nothing is removed during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "GraphSnapshot", into = "GraphSnapshot")]
pub struct SocialGraph {
    nodes: BTreeSet<AuthorId>,
    outgoing: BTreeMap<AuthorId, BTreeSet<AuthorId>>,
    incoming: BTreeMap<AuthorId, BTreeSet<AuthorId>>,
    authors: BTreeMap<AuthorId, Author>,
    edge_count: usize,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; returns true if it was not present
    pub fn add_node(&mut self, id: &AuthorId) -> bool {
        if id.is_empty() || self.nodes.contains(id) {
            return false;
        }
        self.nodes.insert(id.clone())
    }

    /// Add an arc and both endpoints; self-loops are ignored.
    ///
    /// Returns true if the arc was not present.
    pub fn add_edge(&mut self, from: &AuthorId, to: &AuthorId) -> bool {
        if from == to || from.is_empty() || to.is_empty() {
            return false;
        }
        self.add_node(from);
        self.add_node(to);

        let inserted = self
            .outgoing
            .entry(from.clone())
            .or_default()
            .insert(to.clone());
        if inserted {
            self.incoming
                .entry(to.clone())
                .or_default()
                .insert(from.clone());
            self.edge_count += 1;
        }
        inserted
    }

    /// Merge a circle discovered for `seeker`.
    ///
    /// The first circle links the seeker to each co-author. Deeper circles
    /// only add nodes; their arcs come from [`SocialGraph::merge_author`].
    pub fn merge_circle(&mut self, seeker: &AuthorId, circle: &CircleResult) {
        self.add_node(seeker);
        match circle {
            CircleResult::First { papers } => {
                for paper in papers {
                    for co_author in &paper.co_authors {
                        self.add_edge(seeker, co_author);
                    }
                }
            }
            CircleResult::Expanded { ids, .. } => {
                for id in ids {
                    self.add_node(id);
                }
            }
        }
    }

    /// Merge a fetched author record, replacing any earlier record for it
    pub fn merge_author(&mut self, author: &Author) {
        let from = &author.author_id;
        self.add_node(from);
        for paper in &author.papers {
            for co_author in paper.co_authors_excluding(from) {
                self.add_edge(from, co_author);
            }
        }
        self.authors.insert(from.clone(), author.clone());
    }

    /// Merge everything an expansion step produced
    pub fn merge_outcome(&mut self, seeker: &AuthorId, outcome: &CircleOutcome) {
        self.merge_circle(seeker, &outcome.result);
        for author in &outcome.authors {
            self.merge_author(author);
        }
        tracing::debug!(
            "Merged circle {} into graph: {} nodes, {} edges",
            outcome.result.level(),
            self.node_count(),
            self.edge_count()
        );
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct directed arcs
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, id: &AuthorId) -> bool {
        self.nodes.contains(id)
    }

    pub fn has_edge(&self, from: &AuthorId, to: &AuthorId) -> bool {
        self.outgoing
            .get(from)
            .map(|set| set.contains(to))
            .unwrap_or(false)
    }

    /// Neighbors of a node in sorted order
    pub fn neighbors(&self, id: &AuthorId, direction: Direction) -> Vec<&AuthorId> {
        let out = self.outgoing.get(id).into_iter().flatten();
        let inc = self.incoming.get(id).into_iter().flatten();
        match direction {
            Direction::Outgoing => out.collect(),
            Direction::Incoming => inc.collect(),
            Direction::Both => {
                let merged: BTreeSet<&AuthorId> = out.chain(inc).collect();
                merged.into_iter().collect()
            }
        }
    }

    pub fn author(&self, id: &AuthorId) -> Option<&Author> {
        self.authors.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &AuthorId> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.outgoing.iter().flat_map(|(from, tos)| {
            tos.iter().map(move |to| Edge {
                from: from.clone(),
                to: to.clone(),
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Serialized form of [`SocialGraph`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<AuthorId>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub authors: Vec<Author>,
}

impl From<SocialGraph> for GraphSnapshot {
    fn from(graph: SocialGraph) -> Self {
        Self {
            edges: graph.edges().collect(),
            nodes: graph.nodes.into_iter().collect(),
            authors: graph.authors.into_values().collect(),
        }
    }
}

impl From<GraphSnapshot> for SocialGraph {
    fn from(snapshot: GraphSnapshot) -> Self {
        let mut graph = SocialGraph::new();
        for id in &snapshot.nodes {
            graph.add_node(id);
        }
        for edge in &snapshot.edges {
            graph.add_edge(&edge.from, &edge.to);
        }
        for author in snapshot.authors {
            graph.add_node(&author.author_id);
            graph.authors.insert(author.author_id.clone(), author);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::author::Paper;

    fn first_circle() -> CircleResult {
        let seeker = Author::new("S")
            .with_paper(Paper::new("P1").with_authors(["S", "A", "B"]))
            .with_paper(Paper::new("P2").with_authors(["S", "B", "C"]));
        CircleResult::from_seeker(&seeker)
    }

    #[test]
    fn test_merge_first_circle() {
        let mut graph = SocialGraph::new();
        graph.merge_circle(&"S".into(), &first_circle());

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.has_edge(&"S".into(), &"B".into()));
        assert!(!graph.has_edge(&"B".into(), &"S".into()));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let seeker: AuthorId = "S".into();
        let circle = first_circle();
        let expanded = CircleResult::expanded(2, vec!["D".into(), "E".into()]);
        let author = Author::new("A").with_paper(Paper::new("Q").with_authors(["A", "D"]));

        let mut graph = SocialGraph::new();
        graph.merge_circle(&seeker, &circle);
        graph.merge_circle(&seeker, &expanded);
        graph.merge_author(&author);
        let (nodes, edges) = (graph.node_count(), graph.edge_count());

        graph.merge_circle(&seeker, &circle);
        graph.merge_circle(&seeker, &expanded);
        graph.merge_author(&author);
        assert_eq!(graph.node_count(), nodes);
        assert_eq!(graph.edge_count(), edges);
    }

    #[test]
    fn test_no_self_loops() {
        let mut graph = SocialGraph::new();
        assert!(!graph.add_edge(&"A".into(), &"A".into()));

        let author = Author::new("A").with_paper(Paper::new("Solo").with_authors(["A", "A"]));
        graph.merge_author(&author);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_refetch_replaces_record() {
        let mut graph = SocialGraph::new();
        graph.merge_author(&Author::new("A").with_name("Old"));
        graph.merge_author(&Author::new("A").with_name("New"));

        assert_eq!(graph.author(&"A".into()).unwrap().label(), "New");
    }

    #[test]
    fn test_neighbors_by_direction() {
        let mut graph = SocialGraph::new();
        graph.add_edge(&"A".into(), &"B".into());
        graph.add_edge(&"C".into(), &"B".into());

        let b: AuthorId = "B".into();
        assert!(graph.neighbors(&b, Direction::Outgoing).is_empty());
        assert_eq!(graph.neighbors(&b, Direction::Incoming).len(), 2);
        assert_eq!(graph.neighbors(&b, Direction::Both).len(), 2);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut graph = SocialGraph::new();
        graph.merge_circle(&"S".into(), &first_circle());
        graph.merge_author(&Author::new("A").with_name("Alice"));

        let json = serde_json::to_string(&graph).unwrap();
        let back: SocialGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);
    }
}

//! Guide path finding over the social graph

use crate::author::AuthorId;
use crate::graph::{Direction, SocialGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Default hop cutoff for reporting a guide
pub const DEFAULT_MAX_HOPS: usize = 3;

/// Shortest route from the seeker to one guide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidePath {
    pub guide: AuthorId,

    /// Author ids from seeker to guide, inclusive
    pub path: Vec<AuthorId>,

    /// Number of hops (path nodes minus one)
    pub length: usize,
}

/// Result of a guide search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideReport {
    pub seeker: AuthorId,
    pub max_hops: usize,

    /// Guides reachable within the cutoff
    pub paths: BTreeMap<AuthorId, GuidePath>,

    /// Guides with no route from the seeker
    #[serde(default)]
    pub unreachable: Vec<AuthorId>,

    /// Guides whose shortest route exceeds the cutoff
    #[serde(default)]
    pub beyond_cutoff: Vec<GuidePath>,
}

impl GuideReport {
    pub fn get(&self, guide: &AuthorId) -> Option<&GuidePath> {
        self.paths.get(guide)
    }

    pub fn found(&self) -> usize {
        self.paths.len()
    }
}

/// Finds short co-authorship routes to guides
#[derive(Debug, Clone, Copy)]
pub struct GuideFinder {
    max_hops: usize,
    direction: Direction,
}

impl Default for GuideFinder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HOPS)
    }
}

impl GuideFinder {
    pub fn new(max_hops: usize) -> Self {
        Self {
            max_hops,
            direction: Direction::Both,
        }
    }

    /// Set traversal direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    /// Search each guide independently and keep paths within the cutoff.
    ///
    /// The search itself is unbounded; the cutoff only filters results.
    pub fn find_guides(
        &self,
        graph: &SocialGraph,
        seeker: &AuthorId,
        guides: &[AuthorId],
    ) -> GuideReport {
        let mut report = GuideReport {
            seeker: seeker.clone(),
            max_hops: self.max_hops,
            paths: BTreeMap::new(),
            unreachable: Vec::new(),
            beyond_cutoff: Vec::new(),
        };
        let mut seen = HashSet::new();

        for guide in guides.iter().filter(|g| seen.insert(*g)) {
            match shortest_path(graph, seeker, guide, self.direction) {
                None => {
                    tracing::info!("No path found to guide {}", guide);
                    report.unreachable.push(guide.clone());
                }
                Some(path) => {
                    let found = GuidePath {
                        guide: guide.clone(),
                        length: path.len() - 1,
                        path,
                    };
                    if found.length <= self.max_hops {
                        tracing::debug!("Guide {} reachable in {} hops", guide, found.length);
                        report.paths.insert(guide.clone(), found);
                    } else {
                        tracing::info!(
                            "Guide {} is {} hops away (cutoff {})",
                            guide,
                            found.length,
                            self.max_hops
                        );
                        report.beyond_cutoff.push(found);
                    }
                }
            }
        }

        report
    }
}

/// BFS for the unweighted shortest path between two authors
///
/// Returns `None` when either endpoint is absent or no route exists.
pub fn shortest_path(
    graph: &SocialGraph,
    from: &AuthorId,
    to: &AuthorId,
    direction: Direction,
) -> Option<Vec<AuthorId>> {
    if !graph.contains(from) || !graph.contains(to) {
        return None;
    }
    if from == to {
        return Some(vec![from.clone()]);
    }

    let mut visited: HashSet<&AuthorId> = HashSet::new();
    let mut parent: HashMap<&AuthorId, &AuthorId> = HashMap::new();
    let mut queue: VecDeque<&AuthorId> = VecDeque::new();

    visited.insert(from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        for next in graph.neighbors(current, direction) {
            if !visited.insert(next) {
                continue;
            }
            parent.insert(next, current);
            if next == to {
                return Some(reconstruct_path(from, to, &parent));
            }
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct_path<'a>(
    start: &'a AuthorId,
    end: &'a AuthorId,
    parent: &HashMap<&'a AuthorId, &'a AuthorId>,
) -> Vec<AuthorId> {
    let mut nodes = vec![end.clone()];
    let mut current = end;

    while current != start {
        match parent.get(current) {
            Some(&prev) => {
                nodes.push(prev.clone());
                current = prev;
            }
            None => break,
        }
    }

    nodes.reverse();
    nodes
}

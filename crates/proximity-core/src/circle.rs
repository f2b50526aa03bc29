//! Circle results: the authors discovered at each expansion level

use crate::author::{Author, AuthorId};
use crate::error::CircleError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

const LEVEL_PREFIX: &str = "Level-";

/// Co-authors of the seeker on a single paper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperCircle {
    pub title: String,
    pub co_authors: Vec<AuthorId>,
}

/// Authors discovered at one circle level
///
/// Serialized as a JSON object: `title -> [ids]` for the first circle and
/// `{"Level-k": [ids]}` for deeper circles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircleResult {
    /// Direct co-authors grouped by paper, in authored order
    First { papers: Vec<PaperCircle> },

    /// Distinct authors found at level >= 2
    Expanded { level: u32, ids: BTreeSet<AuthorId> },
}

impl CircleResult {
    pub fn empty_first() -> Self {
        Self::First { papers: Vec::new() }
    }

    /// Build the first circle from the seeker's own record.
    ///
    /// Papers sharing a title collapse into one entry.
    pub fn from_seeker(seeker: &Author) -> Self {
        let mut papers: Vec<PaperCircle> = Vec::with_capacity(seeker.papers.len());

        for paper in &seeker.papers {
            let co_authors = paper.co_authors_excluding(&seeker.author_id).cloned();

            match papers.iter_mut().find(|p| p.title == paper.title) {
                Some(existing) => {
                    for id in co_authors {
                        if !existing.co_authors.contains(&id) {
                            existing.co_authors.push(id);
                        }
                    }
                }
                None => {
                    let mut ids: Vec<AuthorId> = Vec::new();
                    for id in co_authors {
                        if !ids.contains(&id) {
                            ids.push(id);
                        }
                    }
                    papers.push(PaperCircle {
                        title: paper.title.clone(),
                        co_authors: ids,
                    });
                }
            }
        }

        Self::First { papers }
    }

    pub fn expanded(level: u32, ids: impl IntoIterator<Item = AuthorId>) -> Self {
        Self::Expanded {
            level,
            ids: ids.into_iter().collect(),
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            Self::First { .. } => 1,
            Self::Expanded { level, .. } => *level,
        }
    }

    /// Deduplicated ids in this circle; the input to the next level
    pub fn author_ids(&self) -> BTreeSet<AuthorId> {
        match self {
            Self::First { papers } => papers
                .iter()
                .flat_map(|p| p.co_authors.iter().cloned())
                .collect(),
            Self::Expanded { ids, .. } => ids.clone(),
        }
    }

    /// Number of distinct authors in the circle
    pub fn len(&self) -> usize {
        match self {
            Self::First { .. } => self.author_ids().len(),
            Self::Expanded { ids, .. } => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::First { papers } => papers.iter().all(|p| p.co_authors.is_empty()),
            Self::Expanded { ids, .. } => ids.is_empty(),
        }
    }

    pub fn contains(&self, id: &AuthorId) -> bool {
        match self {
            Self::First { papers } => papers.iter().any(|p| p.co_authors.contains(id)),
            Self::Expanded { ids, .. } => ids.contains(id),
        }
    }

    /// Label used as the JSON key for expanded circles
    pub fn level_label(level: u32) -> String {
        format!("{}{}", LEVEL_PREFIX, level)
    }
}

impl Serialize for CircleResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::First { papers } => {
                let mut map = serializer.serialize_map(Some(papers.len()))?;
                for paper in papers {
                    map.serialize_entry(&paper.title, &paper.co_authors)?;
                }
                map.end()
            }
            Self::Expanded { level, ids } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(&Self::level_label(*level), ids)?;
                map.end()
            }
        }
    }
}

struct CircleVisitor;

impl<'de> Visitor<'de> for CircleVisitor {
    type Value = CircleResult;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of paper titles or a single Level-k entry")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, Vec<AuthorId>)> = Vec::new();
        while let Some((key, ids)) = access.next_entry::<String, Vec<AuthorId>>()? {
            entries.push((key, ids));
        }

        if let [(key, ids)] = entries.as_slice() {
            let level = key
                .strip_prefix(LEVEL_PREFIX)
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|n| *n >= 2);
            if let Some(level) = level {
                return Ok(CircleResult::expanded(level, ids.iter().cloned()));
            }
        }

        let papers = entries
            .into_iter()
            .map(|(title, co_authors)| PaperCircle { title, co_authors })
            .collect();
        Ok(CircleResult::First { papers })
    }
}

impl<'de> Deserialize<'de> for CircleResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CircleVisitor)
    }
}

/// Counters for one circle level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleStats {
    pub level: u32,
    /// Distinct authors whose records were requested
    pub requested: usize,
    pub fetched: usize,
    pub failed: usize,
    /// Distinct authors in the resulting circle
    pub discovered: usize,
}

impl CircleStats {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Result of expanding one circle, with anything that went wrong
#[derive(Debug, Clone)]
pub struct CircleOutcome {
    pub result: CircleResult,
    pub stats: CircleStats,
    /// Records fetched while expanding (empty for the first circle)
    pub authors: Vec<Author>,
    pub error: Option<CircleError>,
}

impl CircleOutcome {
    pub fn is_degraded(&self) -> bool {
        self.error.is_some() || self.stats.failed > 0
    }
}

//! Author (node) types and co-author extraction

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::limits::{validate_author_id, ValidationError};

/// Provider-assigned author identifier
///
/// Opaque token; Semantic Scholar uses numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub String);

impl AuthorId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Parse and validate an identifier from user input
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        validate_author_id(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AuthorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AuthorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for AuthorId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// An author as listed on a paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperAuthor {
    /// Missing when the provider could not resolve the author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<AuthorId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PaperAuthor {
    pub fn new(author_id: impl Into<AuthorId>) -> Self {
        Self {
            author_id: Some(author_id.into()),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A paper authored by an author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_id: Option<String>,

    pub title: String,

    /// All authors of the paper, including the record's own author
    #[serde(default)]
    pub authors: Vec<PaperAuthor>,
}

impl Paper {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            paper_id: None,
            title: title.into(),
            authors: Vec::new(),
        }
    }

    pub fn with_author(mut self, author_id: impl Into<AuthorId>) -> Self {
        self.authors.push(PaperAuthor::new(author_id));
        self
    }

    pub fn with_authors<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AuthorId>,
    {
        self.authors.extend(ids.into_iter().map(PaperAuthor::new));
        self
    }

    /// Author ids on this paper other than `exclude`, in listed order.
    ///
    /// Entries without an id and empty ids are skipped.
    pub fn co_authors_excluding<'a>(
        &'a self,
        exclude: &'a AuthorId,
    ) -> impl Iterator<Item = &'a AuthorId> + 'a {
        self.authors
            .iter()
            .filter_map(|a| a.author_id.as_ref())
            .filter(move |id| !id.is_empty() && *id != exclude)
    }
}

/// An author profile as returned by the provider (a node)
///
/// Records are immutable once fetched; a refetch replaces the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub author_id: AuthorId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_count: Option<u32>,

    #[serde(default)]
    pub papers: Vec<Paper>,
}

impl Author {
    pub fn new(author_id: impl Into<AuthorId>) -> Self {
        Self {
            author_id: author_id.into(),
            name: None,
            paper_count: None,
            papers: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_paper_count(mut self, count: u32) -> Self {
        self.paper_count = Some(count);
        self
    }

    pub fn with_paper(mut self, paper: Paper) -> Self {
        self.papers.push(paper);
        self
    }

    /// Distinct co-author ids across all papers, first-seen order,
    /// never including this author's own id.
    pub fn co_author_ids(&self) -> Vec<AuthorId> {
        let mut seen = HashSet::new();
        self.papers
            .iter()
            .flat_map(|p| p.co_authors_excluding(&self.author_id))
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect()
    }

    /// Display label: name if known, otherwise the id
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.author_id.as_str())
    }
}

//! Proximity Core - Co-authorship circle expansion and guide path finding
//!
//! This crate provides the data model, the circle expansion engine and the
//! path finder. Author records come from any [`AuthorFetcher`].

pub mod author;
pub mod circle;
pub mod error;
pub mod expander;
pub mod fetcher;
pub mod graph;
pub mod guide;
pub mod limits;
pub mod rate_limit;
pub mod summary;

pub use author::{Author, AuthorId, Paper, PaperAuthor};
pub use circle::{CircleOutcome, CircleResult, CircleStats, PaperCircle};
pub use error::{CircleError, FetchError};
pub use expander::{CircleExpander, ExpansionConfig, Frontier, LevelObserver};
pub use fetcher::AuthorFetcher;
pub use graph::{Direction, Edge, GraphSnapshot, SocialGraph};
pub use guide::{shortest_path, GuideFinder, GuidePath, GuideReport, DEFAULT_MAX_HOPS};
pub use limits::ValidationError;
pub use rate_limit::{Pacer, RateLimit};
pub use summary::{RunId, RunSummary};

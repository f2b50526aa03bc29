//! Input validation limits for expansion and path search

/// Maximum length for an author identifier (64 chars)
pub const MAX_AUTHOR_ID_LEN: usize = 64;

/// Maximum authors fetched sequentially in one batch (1000)
pub const MAX_BATCH_SIZE: usize = 1000;

/// Maximum batches running at once (64)
pub const MAX_WORKERS: usize = 64;

/// Deepest circle that may be requested (6)
pub const MAX_CIRCLE_LEVEL: u32 = 6;

/// Largest accepted hop cutoff for guide search (20)
pub const MAX_HOPS: usize = 20;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyAuthorId,
    AuthorIdTooLong { len: usize, max: usize },
    BatchSizeOutOfRange { size: usize, max: usize },
    WorkersOutOfRange { workers: usize, max: usize },
    LevelOutOfRange { level: u32, max: u32 },
    HopsTooLarge { hops: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAuthorId => write!(f, "Author id cannot be empty"),
            Self::AuthorIdTooLong { len, max } => {
                write!(f, "Author id too long: {} chars (max {})", len, max)
            }
            Self::BatchSizeOutOfRange { size, max } => {
                write!(f, "Batch size must be between 1 and {} (got {})", max, size)
            }
            Self::WorkersOutOfRange { workers, max } => {
                write!(f, "Worker count must be between 1 and {} (got {})", max, workers)
            }
            Self::LevelOutOfRange { level, max } => {
                write!(f, "Circle level must be between 1 and {} (got {})", max, level)
            }
            Self::HopsTooLarge { hops, max } => {
                write!(f, "Hop cutoff too large: {} (max {})", hops, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate author identifier
pub fn validate_author_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::EmptyAuthorId);
    }
    if id.len() > MAX_AUTHOR_ID_LEN {
        return Err(ValidationError::AuthorIdTooLong {
            len: id.len(),
            max: MAX_AUTHOR_ID_LEN,
        });
    }
    Ok(())
}

/// Validate batch size
pub fn validate_batch_size(size: usize) -> Result<(), ValidationError> {
    if size == 0 || size > MAX_BATCH_SIZE {
        return Err(ValidationError::BatchSizeOutOfRange {
            size,
            max: MAX_BATCH_SIZE,
        });
    }
    Ok(())
}

/// Validate worker pool size
pub fn validate_workers(workers: usize) -> Result<(), ValidationError> {
    if workers == 0 || workers > MAX_WORKERS {
        return Err(ValidationError::WorkersOutOfRange {
            workers,
            max: MAX_WORKERS,
        });
    }
    Ok(())
}

/// Validate circle level
pub fn validate_level(level: u32) -> Result<(), ValidationError> {
    if level == 0 || level > MAX_CIRCLE_LEVEL {
        return Err(ValidationError::LevelOutOfRange {
            level,
            max: MAX_CIRCLE_LEVEL,
        });
    }
    Ok(())
}

/// Validate hop cutoff
pub fn validate_max_hops(hops: usize) -> Result<(), ValidationError> {
    if hops > MAX_HOPS {
        return Err(ValidationError::HopsTooLarge {
            hops,
            max: MAX_HOPS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_author_id() {
        assert!(validate_author_id("2112355103").is_ok());
        assert!(validate_author_id("").is_err());
        assert!(validate_author_id(&"9".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_ranges() {
        assert!(validate_batch_size(10).is_ok());
        assert!(validate_batch_size(0).is_err());
        assert!(validate_workers(0).is_err());
        assert!(validate_workers(MAX_WORKERS + 1).is_err());
        assert!(validate_level(2).is_ok());
        assert!(validate_level(0).is_err());
        assert!(validate_max_hops(3).is_ok());
        assert!(validate_max_hops(MAX_HOPS + 1).is_err());
    }
}

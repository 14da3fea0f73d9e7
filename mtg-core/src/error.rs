//! Error types for sentence completion

/// Errors that can occur while building a model or completing a sentence.
#[derive(Debug, thiserror::Error)]
pub enum MtgError {
	#[error("n must be >= 1, got {0}")]
	InvalidOrder(usize),

	#[error("failed to read corpus")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MtgError>;

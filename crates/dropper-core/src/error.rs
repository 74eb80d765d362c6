//! Error types for the drop engine.

/// Errors raised by the strict parsing surfaces.
///
/// Rolling itself never fails: malformed roll inputs are coerced to
/// neutral defaults instead.
#[derive(Debug, thiserror::Error)]
pub enum LootError {
    /// An algorithm name other than NORMAL or GENTLE.
    #[error("unknown algorithm: {0} (expected NORMAL or GENTLE)")]
    UnknownAlgorithm(String),

    /// An item argument that is not `id=chances`.
    #[error("invalid item '{0}': expected id=chances")]
    InvalidItem(String),

    /// A history entry that is not `id` or `id:quantity`.
    #[error("invalid entry '{0}': expected id or id:quantity")]
    InvalidEntry(String),

    /// Malformed JSON input.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for drop operations.
pub type LootResult<T> = Result<T, LootError>;

/// Errors from item store operations.
///
/// The set is closed so callers can branch on the kind of failure instead of
/// inspecting message text.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The payload failed the `name` rule. Always caller-correctable.
    #[error("{0}")]
    Validation(String),

    /// No item with this id exists in the collection.
    #[error("item not found: {id}")]
    NotFound { id: String },

    /// The persisted document could not be read or parsed.
    #[error("failed to read collection: {0}")]
    StorageRead(String),

    /// The persisted document could not be written.
    #[error("failed to write collection: {0}")]
    StorageWrite(String),
}

impl StoreError {
    /// Returns `true` for failures the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

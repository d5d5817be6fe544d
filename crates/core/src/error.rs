use crate::types::DbId;

/// Domain errors shared by every crate in the studio backend.
///
/// The HTTP layer maps each variant onto a status code; the messages here
/// are what the admin UI ends up showing.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or missing request input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A unique value (collection slug) is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A dependency such as the Adobe connection is not ready yet.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

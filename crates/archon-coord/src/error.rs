//! Coordinator errors.

/// Errors surfaced by the search coordinator.
#[derive(Debug, thiserror::Error)]
pub enum CoordError {
    /// The position has no legal move, so there is nothing to fall back to.
    #[error("no legal move in the requested position")]
    NoLegalMoves,

    /// The coordinator was shut down and accepts no more requests.
    #[error("coordinator is shut down")]
    Disconnected,

    /// A worker thread could not be started.
    #[error("failed to spawn search worker: {source}")]
    Spawn {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

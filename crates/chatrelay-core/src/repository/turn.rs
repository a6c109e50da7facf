//! TurnRepository trait definition.

use chatrelay_types::error::RepositoryError;
use chatrelay_types::turn::{HistoryOrder, TurnRecord};

/// Append-only store of turn records.
///
/// There is no update or delete path. Implementations live in
/// chatrelay-infra (e.g., `SqliteTurnRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait TurnRepository: Send + Sync {
    /// Insert one turn with a store-assigned id and timestamp.
    ///
    /// The assigned timestamp is never earlier than that of any record
    /// already stored.
    fn append_turn(
        &self,
        prompt: &str,
        generated_text: &str,
    ) -> impl std::future::Future<Output = Result<TurnRecord, RepositoryError>> + Send;

    /// The newest `limit` records, returned in the requested order.
    ///
    /// Returns fewer than `limit` records when fewer exist.
    fn recent_turns(
        &self,
        limit: usize,
        order: HistoryOrder,
    ) -> impl std::future::Future<Output = Result<Vec<TurnRecord>, RepositoryError>> + Send;

    /// Every stored record in insertion order. Unbounded.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<TurnRecord>, RepositoryError>> + Send;

    /// Total number of stored records.
    fn count_turns(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}

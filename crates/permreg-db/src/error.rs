//! Database-specific error types and conversions.

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Fragments of the messages SurrealDB uses for optimistic-transaction
/// conflicts. Issuing the same statement again after one of these
/// succeeds once the competing writer has committed.
const CONFLICT_MARKERS: &[&str] = &[
    "retry the transaction",
    "Transaction conflict",
    "Resource busy",
];

/// Whether `err` is a write conflict with a concurrent transaction.
pub(crate) fn is_transaction_conflict(err: &surrealdb::Error) -> bool {
    let message = err.to_string();
    CONFLICT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

//! Error taxonomy for saga interpretation.

use thiserror::Error;

/// Failures surfaced while driving a saga.
///
/// Sagas are written for the unconditional-success path, so any fulfillment
/// failure is fatal for that instance. No retry or compensation is attempted.
#[derive(Debug, Error)]
pub enum SagaError {
    /// The dispatch bus rejected an emitted message.
    #[error("emit rejected by the dispatch bus")]
    EmitRejected(#[source] anyhow::Error),
}

//! Provider-agnostic credential form: collects values for one descriptor,
//! validates them and hands them to a [`CredentialSink`](crate::store::CredentialSink).

mod engine;
mod payload;

pub use engine::{EngineError, FormEngine, FormPhase, PendingSubmission};
pub use payload::SubmissionPayload;

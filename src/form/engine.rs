use thiserror::Error;

use crate::error::{FieldIssue, SubmitError, ValidationError};
use crate::form::SubmissionPayload;
use crate::registry::{FieldDescriptor, ProviderDescriptor, ProviderKey};
use crate::store::{Ack, CredentialSink};

/// Reason reported for a secret field that fails a format check. Validator
/// messages for secrets are dropped since they may quote the value.
const SECRET_REJECTED: &str = "the value is not in the expected format";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("provider `{provider}` has no field `{field}`")]
    UnknownField { provider: ProviderKey, field: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("credentials for `{0}` are being submitted; wait for the result")]
    SubmitInFlight(ProviderKey),

    #[error("the `{0}` credential form is closed")]
    Closed(ProviderKey),

    #[error("no submission is in flight for `{0}`")]
    NotSubmitting(ProviderKey),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Where a form is in its lifecycle.
///
/// Validation is synchronous, so there is no observable "validating" phase:
/// [`FormEngine::validate`] moves straight to `Valid` or `Invalid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Empty,
    Editing,
    Valid,
    Invalid(ValidationError),
    Submitting,
    Submitted,
    /// Edits are accepted again; the payload is kept as typed.
    SubmitFailed(SubmitError),
    Cancelled,
}

impl FormPhase {
    pub fn name(&self) -> &'static str {
        match self {
            FormPhase::Empty => "empty",
            FormPhase::Editing => "editing",
            FormPhase::Valid => "valid",
            FormPhase::Invalid(_) => "invalid",
            FormPhase::Submitting => "submitting",
            FormPhase::Submitted => "submitted",
            FormPhase::SubmitFailed(_) => "submit_failed",
            FormPhase::Cancelled => "cancelled",
        }
    }
}

/// A validated payload on its way to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub provider: ProviderKey,
    pub payload: SubmissionPayload,
}

/// Drives one credential form for one provider.
///
/// Knows nothing about specific providers: fields, required keys and format
/// checks all come from the descriptor.
pub struct FormEngine<'r> {
    descriptor: &'r ProviderDescriptor,
    payload: SubmissionPayload,
    phase: FormPhase,
}

impl<'r> FormEngine<'r> {
    pub fn new(descriptor: &'r ProviderDescriptor) -> Self {
        let mut payload = SubmissionPayload::default();
        for field in &descriptor.modal.fields {
            if let Some(default) = field.default_value {
                payload.set(field.key, default);
            }
        }

        tracing::debug!(provider = %descriptor.key, "credential form opened");
        Self {
            descriptor,
            payload,
            phase: FormPhase::Empty,
        }
    }

    pub fn descriptor(&self) -> &'r ProviderDescriptor {
        self.descriptor
    }

    pub fn provider(&self) -> ProviderKey {
        self.descriptor.key
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.payload.get(key)
    }

    /// Per-field errors from the last validation, if it failed.
    pub fn field_errors(&self) -> Option<&ValidationError> {
        match &self.phase {
            FormPhase::Invalid(err) => Some(err),
            _ => None,
        }
    }

    /// The collaborator's error from the last submit, if it failed.
    pub fn submit_error(&self) -> Option<&SubmitError> {
        match &self.phase {
            FormPhase::SubmitFailed(err) => Some(err),
            _ => None,
        }
    }

    pub fn accepts_edits(&self) -> bool {
        self.ensure_open().is_ok()
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<(), EngineError> {
        self.ensure_open()?;
        let field = self.field(key)?;
        self.payload.set(field.key, value);
        tracing::trace!(provider = %self.descriptor.key, field = field.key, "field edited");
        self.transition(FormPhase::Editing);
        Ok(())
    }

    pub fn clear_value(&mut self, key: &str) -> Result<(), EngineError> {
        self.ensure_open()?;
        let field = self.field(key)?;
        self.payload.remove(field.key);
        tracing::trace!(provider = %self.descriptor.key, field = field.key, "field cleared");
        self.transition(FormPhase::Editing);
        Ok(())
    }

    /// Checks every validate key and reports all failures at once.
    pub fn validate(&mut self) -> Result<(), EngineError> {
        self.ensure_open()?;
        tracing::debug!(provider = %self.descriptor.key, "validating credential form");

        match check_payload(self.descriptor, &self.payload) {
            Ok(()) => {
                self.transition(FormPhase::Valid);
                Ok(())
            }
            Err(err) => {
                tracing::debug!(
                    provider = %self.descriptor.key,
                    offending = ?err.offending_keys(),
                    "credential form invalid"
                );
                self.transition(FormPhase::Invalid(err.clone()));
                Err(EngineError::Invalid(err))
            }
        }
    }

    /// Validates and locks the form for submission. Edits are rejected until
    /// [`complete_submit`](Self::complete_submit) is called.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, EngineError> {
        self.validate()?;

        let pending = PendingSubmission {
            provider: self.descriptor.key,
            payload: self.submission_payload(),
        };
        let fields: Vec<&str> = pending.payload.keys().collect();
        tracing::info!(provider = %pending.provider, fields = ?fields, "submitting credentials");
        self.transition(FormPhase::Submitting);
        Ok(pending)
    }

    pub fn complete_submit(&mut self, outcome: Result<Ack, SubmitError>) -> Result<Ack, EngineError> {
        match self.phase {
            FormPhase::Submitting => {}
            FormPhase::Submitted | FormPhase::Cancelled => {
                return Err(EngineError::Closed(self.descriptor.key))
            }
            _ => return Err(EngineError::NotSubmitting(self.descriptor.key)),
        }

        match outcome {
            Ok(ack) => {
                tracing::info!(provider = %self.descriptor.key, "credentials saved");
                self.payload.clear();
                self.transition(FormPhase::Submitted);
                Ok(ack)
            }
            Err(err) => {
                tracing::warn!(provider = %self.descriptor.key, error = %err, "credential submit failed");
                self.transition(FormPhase::SubmitFailed(err.clone()));
                Err(EngineError::Submit(err))
            }
        }
    }

    pub async fn submit<S>(&mut self, sink: &S) -> Result<Ack, EngineError>
    where
        S: CredentialSink + ?Sized,
    {
        let pending = self.begin_submit()?;
        let outcome = sink
            .submit_credentials(pending.provider, &pending.payload)
            .await;
        self.complete_submit(outcome)
    }

    /// Discards the payload. No-op once the form has been submitted.
    pub fn cancel(&mut self) {
        if matches!(self.phase, FormPhase::Submitted | FormPhase::Cancelled) {
            return;
        }
        self.payload.clear();
        self.transition(FormPhase::Cancelled);
    }

    fn ensure_open(&self) -> Result<(), EngineError> {
        match self.phase {
            FormPhase::Submitting => Err(EngineError::SubmitInFlight(self.descriptor.key)),
            FormPhase::Submitted | FormPhase::Cancelled => {
                Err(EngineError::Closed(self.descriptor.key))
            }
            _ => Ok(()),
        }
    }

    fn field(&self, key: &str) -> Result<&'r FieldDescriptor, EngineError> {
        let descriptor: &'r ProviderDescriptor = self.descriptor;
        descriptor
            .modal
            .field(key)
            .ok_or_else(|| EngineError::UnknownField {
                provider: descriptor.key,
                field: key.to_string(),
            })
    }

    /// Trimmed values in field order; blank optional values are dropped.
    fn submission_payload(&self) -> SubmissionPayload {
        self.descriptor
            .modal
            .fields
            .iter()
            .filter_map(|field| {
                let value = self.payload.get(field.key)?.trim();
                (!value.is_empty()).then(|| (field.key, value))
            })
            .collect()
    }

    fn transition(&mut self, next: FormPhase) {
        tracing::trace!(
            provider = %self.descriptor.key,
            from = self.phase.name(),
            to = next.name(),
            "form phase changed"
        );
        self.phase = next;
    }
}

fn check_payload(
    descriptor: &ProviderDescriptor,
    payload: &SubmissionPayload,
) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    for key in &descriptor.modal.validate_keys {
        let value = payload.get(key).map(str::trim).unwrap_or_default();
        if value.is_empty() {
            issues.push((key.to_string(), FieldIssue::Missing));
            continue;
        }

        // the registry guarantees every validate key has a field
        let Some(field) = descriptor.modal.field(key) else {
            continue;
        };
        if let Err(reason) = field.check_value(value) {
            let reason = if field.field_type.is_secret() {
                SECRET_REJECTED.to_string()
            } else {
                reason
            };
            issues.push((key.to_string(), FieldIssue::Malformed { reason }));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

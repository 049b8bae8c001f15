//! Multi-step form wizards.
//!
//! A [`Wizard`] drives one [`Flow`]: an ordered sequence of named steps that
//! collect typed fields and end in a single submission through
//! [`ApiClient`].
//!
//! # Transitions
//!
//! | From | Action | Result |
//! |------|--------|--------|
//! | any step | `advance` | next step if the current step validates, otherwise stay and record field errors |
//! | any but first | `retreat` | previous step, fields untouched |
//! | final step | `begin_submit` | `InFlight`; a second call while in flight is rejected |
//! | in flight | `finish_submit(Ok)` | fields cleared, back to first step, flow's [`Completion`] returned |
//! | in flight | `finish_submit(Err)` | stay, fields untouched, error recorded, submit re-enabled |
//! | any | `reset` / `cancel` | everything discarded; outstanding tickets become stale |
//!
//! # Example
//!
//! ```rust,ignore
//! let mut wizard = Wizard::new(PasswordResetFlow);
//! wizard.update(|draft| draft.email = "ada@kasuwa.ng".into());
//! wizard.advance()?;
//! wizard.update(|draft| {
//!     draft.code = "123456".into();
//!     draft.password = "a-long-password".into();
//!     draft.confirm_password = "a-long-password".into();
//! });
//! let completion = wizard.submit(&client).await?;
//! ```

mod location;
mod password_reset;
mod product;
mod share_product;

pub use location::{LocationDraft, LocationFlow, LocationStep};
pub use password_reset::{
    MIN_PASSWORD_CHARS, PasswordResetDraft, PasswordResetFlow, PasswordResetStep,
};
pub use product::{AddProductFlow, ProductDraft, ProductStep, TierRow, VariantRow};
pub use share_product::{NOTE_MAX_CHARS, ShareProductDraft, ShareProductFlow, ShareProductStep};

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::http::{ApiClient, Request};

/// A named step with explicit neighbours.
pub trait Step: Copy + Eq + fmt::Debug + 'static {
    /// Where every flow starts.
    const FIRST: Self;

    /// The step after `self`, `None` on the final step.
    fn next(self) -> Option<Self>;

    /// The step before `self`, `None` on the first step.
    fn previous(self) -> Option<Self>;

    /// Whether `self` is the final step.
    fn is_final(self) -> bool {
        self.next().is_none()
    }
}

/// One kind of multi-step form.
pub trait Flow {
    /// Step enum.
    type Step: Step;
    /// Fields collected across all steps.
    type Fields: Default + Clone + fmt::Debug;

    /// Name used in logs.
    const NAME: &'static str;

    /// Check the fields required by `step`.
    fn validate(&self, step: Self::Step, fields: &Self::Fields) -> FieldErrors;

    /// Turn the collected fields into the submission request.
    ///
    /// # Errors
    ///
    /// Returns field errors for input that only fails during conversion.
    fn prepare(&self, fields: &Self::Fields) -> Result<Request, FieldErrors>;

    /// What the parent view should do after a successful submission.
    fn completion(&self) -> Completion;
}

/// What happens after a flow completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The submission waits for moderation (new listings).
    PendingReview,
    /// Saved; stay where you are.
    Saved,
    /// Navigate elsewhere.
    Redirect(Destination),
}

/// Navigation targets after a completed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Login page.
    Login,
    /// The seller's product list.
    SellerProducts,
}

/// Per-field validation messages, keyed by field path (e.g. `variants[0].label`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// No errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error, keeping the first message for a field.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Record an error, replacing any earlier message for the field.
    pub fn set(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Drop the error for `field`.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    /// Message for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` has an error.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Whether there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Errors in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another set, keeping existing messages.
    pub fn extend(&mut self, other: Self) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Errors returned by wizard transitions.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The current step has invalid or missing fields.
    #[error("please fix: {0}")]
    Invalid(FieldErrors),

    /// `retreat` on the first step.
    #[error("already at the first step")]
    AtFirstStep,

    /// `advance` on the final step.
    #[error("already at the final step")]
    AlreadyAtFinalStep,

    /// `submit` before reaching the final step.
    #[error("submit is only available on the final step")]
    NotAtFinalStep,

    /// `submit` while a submission is pending.
    #[error("a submission is already in progress")]
    SubmissionInFlight,

    /// The form was reset before its submission finished.
    #[error("the form was closed before the submission finished")]
    Discarded,

    /// The submission reached the API and failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Submission state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    /// Ready to submit.
    #[default]
    Idle,
    /// A submission is pending; submit is disabled.
    InFlight,
    /// The last submission failed with this user-facing message.
    Failed(String),
}

/// Proof of a started submission, handed back to [`Wizard::finish_submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SubmitTicket {
    generation: u64,
}

/// A started submission: the ticket plus the request to send.
#[derive(Debug)]
pub struct Submission {
    /// Ticket to finish the submission with.
    pub ticket: SubmitTicket,
    /// The single request to send.
    pub request: Request,
}

/// Result of applying a submission response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The flow completed; fields were cleared.
    Completed(Completion),
    /// The ticket belonged to a discarded form; nothing changed.
    Ignored,
}

/// Puts an abandoned `submit` back to `Idle` when its future is dropped.
struct InFlightGuard<'a, F: Flow> {
    wizard: Option<&'a mut Wizard<F>>,
}

impl<F: Flow> Drop for InFlightGuard<'_, F> {
    fn drop(&mut self) {
        if let Some(wizard) = self.wizard.take()
            && wizard.is_submitting()
        {
            debug!(flow = F::NAME, "submission abandoned");
            wizard.submit_state = SubmitState::Idle;
        }
    }
}

/// State machine for one open flow.
#[derive(Debug)]
pub struct Wizard<F: Flow> {
    flow: F,
    step: F::Step,
    fields: F::Fields,
    errors: FieldErrors,
    submit_state: SubmitState,
    generation: u64,
}

impl<F: Flow> Wizard<F> {
    /// Open a flow at its first step with empty fields.
    #[must_use]
    pub fn new(flow: F) -> Self {
        debug!(flow = F::NAME, "wizard opened");
        Self {
            flow,
            step: F::Step::FIRST,
            fields: F::Fields::default(),
            errors: FieldErrors::new(),
            submit_state: SubmitState::Idle,
            generation: 0,
        }
    }

    /// The flow definition.
    #[must_use]
    pub const fn flow(&self) -> &F {
        &self.flow
    }

    /// Current step.
    #[must_use]
    pub const fn current_step(&self) -> F::Step {
        self.step
    }

    /// Collected fields.
    #[must_use]
    pub const fn fields(&self) -> &F::Fields {
        &self.fields
    }

    /// Validation errors from the last transition attempt.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Submission state.
    #[must_use]
    pub const fn submit_state(&self) -> &SubmitState {
        &self.submit_state
    }

    /// Whether a submission is pending (the submit action should be disabled).
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.submit_state, SubmitState::InFlight)
    }

    /// Edit fields.
    pub fn update<R>(&mut self, edit: impl FnOnce(&mut F::Fields) -> R) -> R {
        edit(&mut self.fields)
    }

    /// Edit fields with access to the flow (e.g. for option lists).
    pub fn update_with<R>(&mut self, edit: impl FnOnce(&F, &mut F::Fields) -> R) -> R {
        edit(&self.flow, &mut self.fields)
    }

    /// Move to the next step if the current one validates.
    ///
    /// # Errors
    ///
    /// - `Invalid` with the failing fields; the step does not change
    /// - `AlreadyAtFinalStep` on the final step
    pub fn advance(&mut self) -> Result<F::Step, WizardError> {
        let next = self.step.next().ok_or(WizardError::AlreadyAtFinalStep)?;

        let errors = self.flow.validate(self.step, &self.fields);
        if !errors.is_empty() {
            debug!(flow = F::NAME, step = ?self.step, errors = %errors, "advance blocked");
            self.errors = errors.clone();
            return Err(WizardError::Invalid(errors));
        }

        debug!(flow = F::NAME, from = ?self.step, to = ?next, "advanced");
        self.errors = FieldErrors::new();
        self.step = next;
        Ok(next)
    }

    /// Move to the previous step. Fields are kept.
    ///
    /// # Errors
    ///
    /// Returns `AtFirstStep` on the first step.
    pub fn retreat(&mut self) -> Result<F::Step, WizardError> {
        let previous = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        debug!(flow = F::NAME, from = ?self.step, to = ?previous, "retreated");
        self.errors = FieldErrors::new();
        self.step = previous;
        Ok(previous)
    }

    /// Start the submission: validate every step, build the request and
    /// disable further submits until [`finish_submit`](Self::finish_submit).
    ///
    /// # Errors
    ///
    /// - `NotAtFinalStep` before the final step
    /// - `SubmissionInFlight` while a previous submission is pending
    /// - `Invalid` if any step's fields fail validation or conversion
    pub fn begin_submit(&mut self) -> Result<Submission, WizardError> {
        if self.is_submitting() {
            warn!(flow = F::NAME, "duplicate submit rejected");
            return Err(WizardError::SubmissionInFlight);
        }
        if !self.step.is_final() {
            return Err(WizardError::NotAtFinalStep);
        }

        let mut errors = FieldErrors::new();
        let mut step = Some(F::Step::FIRST);
        while let Some(current) = step {
            errors.extend(self.flow.validate(current, &self.fields));
            step = current.next();
        }
        let request = if errors.is_empty() {
            self.flow.prepare(&self.fields).map_err(|e| {
                errors.extend(e);
            })
        } else {
            Err(())
        };

        let Ok(request) = request else {
            self.errors = errors.clone();
            return Err(WizardError::Invalid(errors));
        };

        self.errors = FieldErrors::new();
        self.submit_state = SubmitState::InFlight;
        info!(flow = F::NAME, endpoint = request.endpoint(), "submitting");

        Ok(Submission {
            ticket: SubmitTicket {
                generation: self.generation,
            },
            request,
        })
    }

    /// Apply the response of a started submission.
    ///
    /// # Errors
    ///
    /// Returns `Api` when the submission failed. The wizard stays on the
    /// final step with every field intact and submit re-enabled.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<(), ApiError>,
    ) -> Result<SubmitOutcome, WizardError> {
        if ticket.generation != self.generation || !self.is_submitting() {
            debug!(flow = F::NAME, "stale submission response ignored");
            return Ok(SubmitOutcome::Ignored);
        }

        match result {
            Ok(()) => {
                info!(flow = F::NAME, "submission completed");
                let completion = self.flow.completion();
                self.clear();
                Ok(SubmitOutcome::Completed(completion))
            }
            Err(e) => {
                warn!(flow = F::NAME, error = %e, "submission failed");
                self.submit_state = SubmitState::Failed(e.user_message());
                Err(WizardError::Api(e))
            }
        }
    }

    /// Validate, send exactly one request and apply the response.
    ///
    /// Dropping the returned future before it resolves (a timeout, a closed
    /// view) returns the wizard to `Idle` with every field intact.
    ///
    /// # Errors
    ///
    /// See [`begin_submit`](Self::begin_submit) and
    /// [`finish_submit`](Self::finish_submit).
    pub async fn submit(&mut self, client: &ApiClient) -> Result<Completion, WizardError> {
        let Submission { ticket, request } = self.begin_submit()?;
        let mut guard = InFlightGuard { wizard: Some(self) };
        let result = client.send_empty(request).await;
        let Some(wizard) = guard.wizard.take() else {
            return Err(WizardError::Discarded);
        };
        match wizard.finish_submit(ticket, result)? {
            SubmitOutcome::Completed(completion) => Ok(completion),
            SubmitOutcome::Ignored => Err(WizardError::Discarded),
        }
    }

    /// Discard all data and go back to the first step, as when a modal is
    /// closed. Responses to earlier submissions are ignored afterwards.
    pub fn reset(&mut self) {
        debug!(flow = F::NAME, "wizard reset");
        self.clear();
    }

    /// Close the flow, discarding everything.
    pub fn cancel(self) {
        debug!(flow = F::NAME, step = ?self.step, "wizard cancelled");
    }

    fn clear(&mut self) {
        self.step = F::Step::FIRST;
        self.fields = F::Fields::default();
        self.errors = FieldErrors::new();
        self.submit_state = SubmitState::Idle;
        self.generation += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TwoStep {
        Name,
        Confirm,
    }

    impl Step for TwoStep {
        const FIRST: Self = Self::Name;

        fn next(self) -> Option<Self> {
            match self {
                Self::Name => Some(Self::Confirm),
                Self::Confirm => None,
            }
        }

        fn previous(self) -> Option<Self> {
            match self {
                Self::Name => None,
                Self::Confirm => Some(Self::Name),
            }
        }
    }

    #[derive(Debug, Clone, Default)]
    struct Draft {
        name: String,
        agreed: bool,
    }

    struct TestFlow;

    impl Flow for TestFlow {
        type Step = TwoStep;
        type Fields = Draft;

        const NAME: &'static str = "test";

        fn validate(&self, step: TwoStep, fields: &Draft) -> FieldErrors {
            let mut errors = FieldErrors::new();
            match step {
                TwoStep::Name if fields.name.trim().is_empty() => {
                    errors.insert("name", "name is required");
                }
                TwoStep::Confirm if !fields.agreed => {
                    errors.insert("agreed", "please confirm");
                }
                _ => {}
            }
            errors
        }

        fn prepare(&self, fields: &Draft) -> Result<Request, FieldErrors> {
            Request::post("/things")
                .json(&serde_json::json!({ "name": fields.name }))
                .map_err(|e| {
                    let mut errors = FieldErrors::new();
                    errors.insert("form", e.to_string());
                    errors
                })
        }

        fn completion(&self) -> Completion {
            Completion::Saved
        }
    }

    fn filled() -> Wizard<TestFlow> {
        let mut wizard = Wizard::new(TestFlow);
        wizard.update(|d| d.name = "Garri".to_string());
        wizard.advance().unwrap();
        wizard.update(|d| d.agreed = true);
        wizard
    }

    #[test]
    fn test_advance_blocked_by_missing_field() {
        let mut wizard = Wizard::new(TestFlow);
        let err = wizard.advance().unwrap_err();
        assert!(matches!(err, WizardError::Invalid(ref e) if e.contains("name")));
        assert_eq!(wizard.current_step(), TwoStep::Name);
        assert_eq!(wizard.errors().get("name"), Some("name is required"));
    }

    #[test]
    fn test_advance_and_retreat_keep_fields() {
        let mut wizard = filled();
        assert_eq!(wizard.current_step(), TwoStep::Confirm);
        assert!(matches!(wizard.advance(), Err(WizardError::AlreadyAtFinalStep)));

        assert_eq!(wizard.retreat().unwrap(), TwoStep::Name);
        assert_eq!(wizard.fields().name, "Garri");
        assert!(wizard.fields().agreed, "fields typed ahead survive retreat");
        assert!(matches!(wizard.retreat(), Err(WizardError::AtFirstStep)));
    }

    #[test]
    fn test_submit_only_from_final_step() {
        let mut wizard = Wizard::new(TestFlow);
        wizard.update(|d| d.name = "Garri".to_string());
        assert!(matches!(
            wizard.begin_submit(),
            Err(WizardError::NotAtFinalStep)
        ));
    }

    #[test]
    fn test_submit_validates_final_step() {
        let mut wizard = filled();
        wizard.update(|d| d.agreed = false);
        assert!(matches!(wizard.begin_submit(), Err(WizardError::Invalid(_))));
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_second_submit_while_in_flight_is_rejected() {
        let mut wizard = filled();
        let submission = wizard.begin_submit().unwrap();
        assert!(wizard.is_submitting());
        assert!(matches!(
            wizard.begin_submit(),
            Err(WizardError::SubmissionInFlight)
        ));

        let outcome = wizard.finish_submit(submission.ticket, Ok(())).unwrap();
        assert_eq!(outcome, SubmitOutcome::Completed(Completion::Saved));
    }

    #[test]
    fn test_failure_keeps_fields_and_reenables_submit() {
        let mut wizard = filled();
        let submission = wizard.begin_submit().unwrap();
        let err = wizard
            .finish_submit(
                submission.ticket,
                Err(ApiError::Http {
                    status: 500,
                    body: "boom".to_string(),
                }),
            )
            .unwrap_err();
        assert!(matches!(err, WizardError::Api(_)));
        assert_eq!(wizard.current_step(), TwoStep::Confirm);
        assert_eq!(wizard.fields().name, "Garri");
        assert!(wizard.fields().agreed);
        assert_eq!(wizard.submit_state(), &SubmitState::Failed("boom".to_string()));

        assert!(wizard.begin_submit().is_ok(), "resubmission is possible");
    }

    #[test]
    fn test_success_clears_fields() {
        let mut wizard = filled();
        let submission = wizard.begin_submit().unwrap();
        wizard.finish_submit(submission.ticket, Ok(())).unwrap();
        assert_eq!(wizard.current_step(), TwoStep::Name);
        assert!(wizard.fields().name.is_empty());
        assert_eq!(wizard.submit_state(), &SubmitState::Idle);
    }

    #[test]
    fn test_late_response_after_reset_is_ignored() {
        let mut wizard = filled();
        let submission = wizard.begin_submit().unwrap();
        wizard.reset();
        wizard.update(|d| d.name = "Elubo".to_string());

        let outcome = wizard
            .finish_submit(
                submission.ticket,
                Err(ApiError::Http {
                    status: 500,
                    body: String::new(),
                }),
            )
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert_eq!(wizard.fields().name, "Elubo");
        assert_eq!(wizard.submit_state(), &SubmitState::Idle);
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::new();
        errors.insert("price", "amount is required");
        errors.insert("name", "name is required");
        errors.insert("name", "ignored duplicate");
        assert_eq!(
            errors.to_string(),
            "name: name is required; price: amount is required"
        );
    }
}

use chrono::{DateTime, Utc};

use crate::storage::KeyValueStore;

use super::model::{FieldChange, FormValues, WizardPosition};
use super::session;
use super::transitions::{self, Advance, Retreat, SubmitOutcome, WizardState};

/// Read-only snapshot captured when the form is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub values: FormValues,
    pub submitted_at: DateTime<Utc>,
}

/// Owns a wizard session and mirrors it into an injected store.
///
/// Storage is best effort: read failures start a fresh session and write
/// failures are logged, leaving the session running in memory.
pub struct FormController<S: KeyValueStore> {
    state: WizardState,
    store: S,
    submission: Option<Submission>,
}

impl<S: KeyValueStore> FormController<S> {
    /// Resumes from `store` when it holds a usable session, else starts fresh.
    pub fn initialize(store: S) -> Self {
        let persisted = match session::load(&store) {
            Ok(persisted) => persisted,
            Err(err) => {
                tracing::warn!(%err, "Session storage unavailable; starting fresh");
                Default::default()
            }
        };
        let resumed = !persisted.is_empty();
        let state = WizardState::resume(
            persisted.position.unwrap_or_default(),
            persisted.values.unwrap_or_default(),
        );
        if resumed {
            tracing::info!(step = state.position.get(), "Resumed saved registration");
        }
        Self {
            state,
            store,
            submission: None,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn position(&self) -> WizardPosition {
        self.state.position
    }

    pub fn values(&self) -> &FormValues {
        &self.state.values
    }

    pub fn is_submitted(&self) -> bool {
        self.state.submitted
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn change_field(&mut self, change: FieldChange) {
        tracing::debug!(field = %change.field(), "Field edited");
        self.apply(|state| (transitions::change_field(state, change), ()));
        self.persist();
    }

    pub fn next(&mut self) -> Advance {
        let outcome = self.apply(transitions::next);
        match outcome {
            Advance::Moved { from, to } => {
                tracing::info!(from = from.get(), to = to.get(), "Advanced to next step");
            }
            Advance::Blocked(count) => {
                tracing::debug!(step = self.state.position.get(), count, "Step has errors");
            }
            Advance::AtLastStep | Advance::Ignored => {}
        }
        self.persist();
        outcome
    }

    pub fn back(&mut self) -> Retreat {
        let outcome = self.apply(transitions::back);
        self.persist();
        outcome
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.apply(transitions::submit);
        if outcome == SubmitOutcome::Submitted {
            self.submission = Some(Submission {
                values: self.state.values.clone(),
                submitted_at: Utc::now(),
            });
            if let Err(err) = session::clear(&mut self.store) {
                tracing::warn!(%err, "Could not clear saved registration");
            }
            tracing::info!("Registration submitted");
        } else {
            self.persist();
        }
        outcome
    }

    /// Abandons a submitted session and starts over with defaults.
    ///
    /// Returns `false` while a session is still in progress.
    pub fn restart(&mut self) -> bool {
        if !self.state.submitted {
            return false;
        }
        self.state = WizardState::default();
        self.submission = None;
        self.persist();
        true
    }

    fn apply<T>(&mut self, transition: impl FnOnce(WizardState) -> (WizardState, T)) -> T {
        let current = std::mem::take(&mut self.state);
        let (next, outcome) = transition(current);
        self.state = next;
        outcome
    }

    fn persist(&mut self) {
        if self.state.submitted {
            return;
        }
        if let Err(err) = session::save(&mut self.store, &self.state.values, self.state.position) {
            tracing::warn!(%err, "Could not save registration progress");
        }
    }
}

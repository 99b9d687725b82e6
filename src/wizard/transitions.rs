//! Wizard state and the pure functions that move it forward.
//!
//! Every transition takes the current [`WizardState`] by value and hands back
//! the next one together with an outcome describing what happened. Nothing
//! here touches storage; see [`super::controller`] for that.

use super::model::{ErrorMap, FieldChange, FormValues, WizardPosition};
use super::validation::validate;

/// Complete state of one wizard session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    pub position: WizardPosition,
    pub values: FormValues,
    pub errors: ErrorMap,
    pub submitted: bool,
}

impl WizardState {
    /// Fresh session resumed at `position` with `values`.
    pub fn resume(position: WizardPosition, values: FormValues) -> Self {
        Self {
            position,
            values,
            errors: ErrorMap::new(),
            submitted: false,
        }
    }
}

/// Result of a next request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved {
        from: WizardPosition,
        to: WizardPosition,
    },
    /// Validation failed; carries the number of failing fields.
    Blocked(usize),
    /// The step was valid but there is nowhere further to go.
    AtLastStep,
    Ignored,
}

/// Result of a back request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    Moved {
        from: WizardPosition,
        to: WizardPosition,
    },
    AtFirstStep,
    Ignored,
}

/// Result of a submit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Rejected(usize),
    NotOnFinalStep,
    AlreadySubmitted,
}

/// Stores `change` and drops any error attached to the edited field.
///
/// Edits after submission are ignored.
pub fn change_field(mut state: WizardState, change: FieldChange) -> WizardState {
    if state.submitted {
        return state;
    }
    let field = change.field();
    state.values.apply(change);
    state.errors.remove(field);
    state
}

/// Validates the current step and advances on success.
pub fn next(mut state: WizardState) -> (WizardState, Advance) {
    if state.submitted {
        return (state, Advance::Ignored);
    }
    let errors = validate(state.position.get(), &state.values);
    if !errors.is_empty() {
        let count = errors.len();
        state.errors = errors;
        return (state, Advance::Blocked(count));
    }

    state.errors.clear();
    let from = state.position;
    let to = from.advanced();
    state.position = to;
    let outcome = if from == to {
        Advance::AtLastStep
    } else {
        Advance::Moved { from, to }
    };
    (state, outcome)
}

/// Steps back one screen without re-validating and clears all errors.
pub fn back(mut state: WizardState) -> (WizardState, Retreat) {
    if state.submitted {
        return (state, Retreat::Ignored);
    }
    state.errors.clear();
    let from = state.position;
    let to = from.retreated();
    state.position = to;
    let outcome = if from == to {
        Retreat::AtFirstStep
    } else {
        Retreat::Moved { from, to }
    };
    (state, outcome)
}

/// Validates the final step and marks the session submitted on success.
pub fn submit(mut state: WizardState) -> (WizardState, SubmitOutcome) {
    if state.submitted {
        return (state, SubmitOutcome::AlreadySubmitted);
    }
    if !state.position.is_last() {
        return (state, SubmitOutcome::NotOnFinalStep);
    }
    let errors = validate(state.position.get(), &state.values);
    if errors.is_empty() {
        state.errors.clear();
        state.submitted = true;
        (state, SubmitOutcome::Submitted)
    } else {
        let count = errors.len();
        state.errors = errors;
        (state, SubmitOutcome::Rejected(count))
    }
}

//! Registration wizard core: data model, step validation, state transitions
//! and session persistence.

pub mod controller;
pub mod model;
pub mod session;
pub mod transitions;
pub mod validation;

pub use controller::{FormController, Submission};
pub use model::{
    ErrorMap, Field, FieldChange, FieldKind, FormValues, Plan, PlanOffer, StepDefinition,
    WizardPosition, STEPS, STEP_COUNT,
};
pub use transitions::{Advance, Retreat, SubmitOutcome, WizardState};
pub use validation::validate;

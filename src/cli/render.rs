//! Plain-text views of the wizard. Everything here returns lines; printing
//! and styling happen in the shell.

use crate::wizard::{
    Field, FieldKind, FormValues, Plan, Submission, WizardPosition, WizardState, STEPS,
    STEP_COUNT,
};

pub const APP_TITLE: &str = "ProStep Account";
pub const FOOTER: &str = "Secure Form • Progress Automatically Saved";
const PROGRESS_WIDTH: usize = 20;
const REVIEW_NOTICE: &str = "Please ensure all details are correct. You can edit them later in \
your profile settings, but your username is permanent.";

/// `[#####---------------]  25%` style progress bar.
pub fn progress_bar(position: WizardPosition) -> String {
    let filled = position.get() * PROGRESS_WIDTH / STEP_COUNT;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        position.progress_percent()
    )
}

/// Step markers: `✓` completed, `●` current, `○` pending.
pub fn step_indicator(position: WizardPosition) -> String {
    STEPS
        .iter()
        .map(|step| {
            let marker = if step.id < position.get() {
                "✓"
            } else if step.id == position.get() {
                "●"
            } else {
                "○"
            };
            format!("{marker} {}", step.title)
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn step_header(position: WizardPosition) -> Vec<String> {
    let step = position.definition();
    vec![
        APP_TITLE.to_string(),
        format!("Step {} of {}: {}", position, STEP_COUNT, step.title),
        progress_bar(position),
        step_indicator(position),
    ]
}

/// Current step title, its fields with values and any errors.
pub fn step_body(state: &WizardState) -> Vec<String> {
    let step = state.position.definition();
    let mut lines = vec![step.title.to_string(), step.description.to_string(), String::new()];

    if state.position.is_last() {
        lines.extend(review_lines(&state.values));
        lines.push(String::new());
        lines.push(REVIEW_NOTICE.to_string());
    }

    for field in step.fields {
        lines.extend(field_lines(*field, &state.values));
        if let Some(message) = state.errors.get(*field) {
            lines.push(format!("    ! {message}"));
        }
    }

    // Errors belonging to fields of another step.
    for (field, message) in state.errors.iter() {
        if !step.fields.contains(&field) {
            lines.push(format!("  ! {}: {message}", field.label()));
        }
    }
    lines
}

pub fn field_lines(field: Field, values: &FormValues) -> Vec<String> {
    match field.kind() {
        FieldKind::Choice => {
            let mut lines = vec![format!(
                "  {} [{}]: {}",
                field.label(),
                field.key(),
                plan_label(values.plan)
            )];
            for plan in Plan::ALL {
                let offer = plan.offer();
                let marker = if values.plan == Some(plan) { "(•)" } else { "( )" };
                lines.push(format!(
                    "    {marker} {} {} - {}",
                    offer.name, offer.price, offer.summary
                ));
            }
            lines
        }
        FieldKind::Toggle => {
            let marker = if values.newsletter { "[x]" } else { "[ ]" };
            vec![format!("  {marker} {} [{}]", field.label(), field.key())]
        }
        _ => vec![format!(
            "  {} [{}]: {}",
            field.label(),
            field.key(),
            display_value(field, values)
        )],
    }
}

/// Value as shown to the user: secrets masked, empty fields hinted.
pub fn display_value(field: Field, values: &FormValues) -> String {
    match field.kind() {
        FieldKind::Choice => plan_label(values.plan),
        FieldKind::Toggle => (if values.newsletter { "Yes" } else { "No" }).to_string(),
        kind => {
            let text = values.text(field).unwrap_or_default();
            if text.is_empty() {
                match field.placeholder() {
                    Some(hint) => format!("(e.g. {hint})"),
                    None => "(empty)".to_string(),
                }
            } else if kind == FieldKind::Secret {
                "•".repeat(text.chars().count())
            } else {
                text.to_string()
            }
        }
    }
}

fn plan_label(plan: Option<Plan>) -> String {
    match plan {
        Some(plan) => plan.code().to_string(),
        None => "(none selected)".to_string(),
    }
}

/// Read-only summary shown on the review step.
pub fn review_lines(values: &FormValues) -> Vec<String> {
    let mut lines = vec![
        format!("  Name:     {}", values.full_name),
        format!("  Email:    {}", values.email),
        format!("  Username: {}", values.username),
        format!("  Plan:     {}", plan_label(values.plan)),
    ];
    if !values.phone.is_empty() {
        lines.push(format!("  Phone:    {}", values.phone));
    }
    lines.push(format!(
        "  Newsletter: {}",
        if values.newsletter { "Yes" } else { "No" }
    ));
    if !values.bio.is_empty() {
        lines.push(format!("  Bio:      \"{}\"", values.bio));
    }
    lines
}

/// Commands that make sense on the current screen.
pub fn action_hint(state: &WizardState) -> String {
    if state.submitted {
        return "Type `restart` to start a new form or `exit` to quit.".to_string();
    }
    let mut actions = Vec::new();
    if !state.position.definition().fields.is_empty() {
        actions.push("set <field> <value>");
        actions.push("edit");
    }
    if !state.position.is_first() {
        actions.push("back");
    }
    if state.position.is_last() {
        actions.push("submit");
    } else {
        actions.push("next");
    }
    format!("Actions: {}", actions.join(", "))
}

/// Terminal confirmation view.
pub fn confirmation_lines(submission: &Submission) -> Vec<String> {
    vec![
        "Registration Complete!".to_string(),
        format!(
            "Thank you, {}. Your account has been created successfully. \
We've sent a verification email to {}.",
            submission.values.full_name, submission.values.email
        ),
        format!(
            "Submitted at {}",
            submission.submitted_at.format("%Y-%m-%d %H:%M UTC")
        ),
    ]
}

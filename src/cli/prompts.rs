use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};

use crate::errors::CliError;
use crate::wizard::{Field, FieldChange, FieldKind, FormValues, Plan};

/// Walks the user through `fields` with dialoguer prompts, pre-filled from
/// `values`. Only edits that differ from the current value are returned.
pub fn guided_edit(fields: &[Field], values: &FormValues) -> Result<Vec<FieldChange>, CliError> {
    let theme = ColorfulTheme::default();
    let mut changes = Vec::new();
    for field in fields {
        if let Some(change) = prompt_field(&theme, *field, values)? {
            changes.push(change);
        }
    }
    Ok(changes)
}

fn prompt_field(
    theme: &ColorfulTheme,
    field: Field,
    values: &FormValues,
) -> Result<Option<FieldChange>, CliError> {
    let change = match field.kind() {
        FieldKind::Text | FieldKind::LongText => {
            let current = values.text(field).unwrap_or_default();
            let input: String = Input::with_theme(theme)
                .with_prompt(field.label())
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;
            FieldChange::Text(field, input)
        }
        FieldKind::Secret => {
            let input = Password::with_theme(theme)
                .with_prompt(format!("{} (leave empty to keep)", field.label()))
                .allow_empty_password(true)
                .interact()?;
            if input.is_empty() {
                return Ok(None);
            }
            FieldChange::Text(field, input)
        }
        FieldKind::Choice => {
            let items: Vec<String> = Plan::ALL
                .iter()
                .map(|plan| {
                    let offer = plan.offer();
                    format!("{} {} - {}", offer.name, offer.price, offer.summary)
                })
                .collect();
            let default = values
                .plan
                .and_then(|current| Plan::ALL.iter().position(|plan| *plan == current))
                .unwrap_or(0);
            let index = Select::with_theme(theme)
                .with_prompt(field.label())
                .items(&items)
                .default(default)
                .interact()?;
            FieldChange::Plan(Plan::ALL.get(index).copied())
        }
        FieldKind::Toggle => {
            let enabled = Confirm::with_theme(theme)
                .with_prompt("I want to receive the monthly developer newsletter")
                .default(values.newsletter)
                .interact()?;
            FieldChange::Newsletter(enabled)
        }
    };

    Ok(is_different(&change, values).then_some(change))
}

fn is_different(change: &FieldChange, values: &FormValues) -> bool {
    match change {
        FieldChange::Text(field, text) => values.text(*field) != Some(text.as_str()),
        FieldChange::Plan(plan) => values.plan != *plan,
        FieldChange::Newsletter(enabled) => values.newsletter != *enabled,
    }
}

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of screens in the registration wizard.
pub const STEP_COUNT: usize = 4;

/// Subscription tiers offered on the preferences step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plan {
    Free,
    Pro,
    Enterprise,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Free, Plan::Pro, Plan::Enterprise];

    /// Wire identifier, identical to the persisted representation.
    pub fn code(self) -> &'static str {
        match self {
            Plan::Free => "FREE",
            Plan::Pro => "PRO",
            Plan::Enterprise => "ENTERPRISE",
        }
    }

    pub fn offer(self) -> PlanOffer {
        match self {
            Plan::Free => PlanOffer {
                plan: self,
                name: "Free",
                price: "$0",
                summary: "Basic features",
            },
            Plan::Pro => PlanOffer {
                plan: self,
                name: "Pro",
                price: "$19",
                summary: "Power tools",
            },
            Plan::Enterprise => PlanOffer {
                plan: self,
                name: "Biz",
                price: "$99",
                summary: "Team scaling",
            },
        }
    }

    /// Accepts the wire code, the offer name or `enterprise`, case-insensitively.
    pub fn parse(input: &str) -> Option<Plan> {
        let needle = input.trim();
        Plan::ALL.into_iter().find(|plan| {
            needle.eq_ignore_ascii_case(plan.code()) || needle.eq_ignore_ascii_case(plan.offer().name)
        })
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Display card for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanOffer {
    pub plan: Plan,
    pub name: &'static str,
    pub price: &'static str,
    pub summary: &'static str,
}

/// Everything the user fills in across the wizard.
///
/// Serialized with camelCase keys. Missing keys fall back to their defaults
/// when a persisted record is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormValues {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub plan: Option<Plan>,
    pub newsletter: bool,
    pub bio: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            username: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            plan: Some(Plan::Free),
            newsletter: false,
            bio: String::new(),
        }
    }
}

impl FormValues {
    /// Applies a single edit. Text is stored verbatim.
    pub fn apply(&mut self, change: FieldChange) {
        match change {
            FieldChange::Text(field, value) => {
                if let Some(slot) = self.text_slot_mut(field) {
                    *slot = value;
                }
            }
            FieldChange::Plan(plan) => self.plan = plan,
            FieldChange::Newsletter(enabled) => self.newsletter = enabled,
        }
    }

    /// Returns the stored text for text fields, `None` for plan/newsletter.
    pub fn text(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::FullName => &self.full_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
            Field::Bio => &self.bio,
            Field::Plan | Field::Newsletter => return None,
        };
        Some(value.as_str())
    }

    fn text_slot_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::FullName => Some(&mut self.full_name),
            Field::Email => Some(&mut self.email),
            Field::Phone => Some(&mut self.phone),
            Field::Username => Some(&mut self.username),
            Field::Password => Some(&mut self.password),
            Field::ConfirmPassword => Some(&mut self.confirm_password),
            Field::Bio => Some(&mut self.bio),
            Field::Plan | Field::Newsletter => None,
        }
    }
}

/// The kind of input control a field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    LongText,
    Choice,
    Toggle,
}

/// Identifies one of the fixed form fields. Ordering follows display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    Phone,
    Username,
    Password,
    ConfirmPassword,
    Plan,
    Newsletter,
    Bio,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::FullName,
        Field::Email,
        Field::Phone,
        Field::Username,
        Field::Password,
        Field::ConfirmPassword,
        Field::Plan,
        Field::Newsletter,
        Field::Bio,
    ];

    /// camelCase name used in persisted records and in error maps.
    pub fn key(self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Username => "username",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::Plan => "plan",
            Field::Newsletter => "newsletter",
            Field::Bio => "bio",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FullName => "Full Name",
            Field::Email => "Email Address",
            Field::Phone => "Phone Number (Optional)",
            Field::Username => "Username",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm Password",
            Field::Plan => "Subscription Plan",
            Field::Newsletter => "Monthly developer newsletter",
            Field::Bio => "Short Bio",
        }
    }

    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Field::FullName => Some("John Doe"),
            Field::Email => Some("john@example.com"),
            Field::Phone => Some("+1 (555) 000-0000"),
            Field::Username => Some("johndoe123"),
            Field::Password => Some("Minimum 8 characters"),
            Field::ConfirmPassword => Some("Repeat your password"),
            Field::Bio => Some("Tell us a bit about yourself..."),
            Field::Plan | Field::Newsletter => None,
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Password | Field::ConfirmPassword => FieldKind::Secret,
            Field::Bio => FieldKind::LongText,
            Field::Plan => FieldKind::Choice,
            Field::Newsletter => FieldKind::Toggle,
            _ => FieldKind::Text,
        }
    }

    /// Resolves a user supplied field name. Accepts the camelCase key,
    /// snake_case and kebab-case spellings, ignoring case.
    pub fn from_name(name: &str) -> Option<Field> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        Field::ALL
            .into_iter()
            .find(|field| field.key().to_ascii_lowercase() == normalized)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A typed edit to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Text(Field, String),
    Plan(Option<Plan>),
    Newsletter(bool),
}

impl FieldChange {
    pub fn field(&self) -> Field {
        match self {
            FieldChange::Text(field, _) => *field,
            FieldChange::Plan(_) => Field::Plan,
            FieldChange::Newsletter(_) => Field::Newsletter,
        }
    }

    /// Builds a change from raw user input for `field`.
    ///
    /// Text fields take the input verbatim. The plan accepts a plan name, and
    /// the newsletter flag accepts yes/no, true/false, on/off or 1/0.
    pub fn parse(field: Field, raw: &str) -> Result<FieldChange, String> {
        match field.kind() {
            FieldKind::Choice => Plan::parse(raw)
                .map(|plan| FieldChange::Plan(Some(plan)))
                .ok_or_else(|| {
                    let options: Vec<&str> = Plan::ALL.iter().map(|plan| plan.code()).collect();
                    format!("Plan must be one of: {}", options.join(", "))
                }),
            FieldKind::Toggle => match raw.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" | "true" | "on" | "1" => Ok(FieldChange::Newsletter(true)),
                "n" | "no" | "false" | "off" | "0" => Ok(FieldChange::Newsletter(false)),
                _ => Err("Enter yes/no, true/false, on/off, or 1/0".into()),
            },
            _ => Ok(FieldChange::Text(field, raw.to_string())),
        }
    }
}

/// Field name to message for every currently failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: BTreeMap<Field, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.entries.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

impl FromIterator<(Field, String)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// 1-based wizard step, always within `1..=STEP_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WizardPosition(usize);

impl WizardPosition {
    pub const FIRST: WizardPosition = WizardPosition(1);
    pub const LAST: WizardPosition = WizardPosition(STEP_COUNT);

    pub fn new(step: usize) -> Option<Self> {
        (1..=STEP_COUNT).contains(&step).then_some(Self(step))
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn is_first(self) -> bool {
        self == Self::FIRST
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }

    /// One step forward, capped at the last step.
    pub fn advanced(self) -> Self {
        Self((self.0 + 1).min(STEP_COUNT))
    }

    /// One step back, floored at the first step.
    pub fn retreated(self) -> Self {
        Self(self.0.saturating_sub(1).max(1))
    }

    pub fn definition(self) -> &'static StepDefinition {
        &STEPS[self.0 - 1]
    }

    /// Completion percentage shown by the progress bar.
    pub fn progress_percent(self) -> u8 {
        ((self.0 * 100) / STEP_COUNT) as u8
    }
}

impl Default for WizardPosition {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for WizardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Static description of one wizard screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: usize,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [Field],
}

pub const STEPS: [StepDefinition; STEP_COUNT] = [
    StepDefinition {
        id: 1,
        title: "Personal Info",
        description: "Tell us about yourself",
        fields: &[Field::FullName, Field::Email, Field::Phone],
    },
    StepDefinition {
        id: 2,
        title: "Account Setup",
        description: "Secure your account",
        fields: &[Field::Username, Field::Password, Field::ConfirmPassword],
    },
    StepDefinition {
        id: 3,
        title: "Preferences",
        description: "Customize your experience",
        fields: &[Field::Plan, Field::Bio, Field::Newsletter],
    },
    StepDefinition {
        id: 4,
        title: "Review",
        description: "Check your details",
        fields: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_preselect_free_plan() {
        let values = FormValues::default();
        assert_eq!(values.plan, Some(Plan::Free));
        assert!(!values.newsletter);
        assert!(values.full_name.is_empty());
    }

    #[test]
    fn field_names_resolve_in_several_spellings() {
        assert_eq!(Field::from_name("fullName"), Some(Field::FullName));
        assert_eq!(Field::from_name("full_name"), Some(Field::FullName));
        assert_eq!(Field::from_name("CONFIRM-PASSWORD"), Some(Field::ConfirmPassword));
        assert_eq!(Field::from_name("nickname"), None);
    }

    #[test]
    fn position_is_bounded() {
        assert!(WizardPosition::new(0).is_none());
        assert!(WizardPosition::new(5).is_none());
        assert_eq!(WizardPosition::LAST.advanced(), WizardPosition::LAST);
        assert_eq!(WizardPosition::FIRST.retreated(), WizardPosition::FIRST);
        assert_eq!(WizardPosition::new(2).unwrap().progress_percent(), 50);
    }

    #[test]
    fn apply_stores_text_verbatim() {
        let mut values = FormValues::default();
        values.apply(FieldChange::Text(Field::FullName, "  Ada  ".into()));
        values.apply(FieldChange::Newsletter(true));
        assert_eq!(values.full_name, "  Ada  ");
        assert!(values.newsletter);
    }

    #[test]
    fn parse_change_checks_plan_and_toggle_input() {
        assert_eq!(
            FieldChange::parse(Field::Plan, "biz"),
            Ok(FieldChange::Plan(Some(Plan::Enterprise)))
        );
        assert_eq!(
            FieldChange::parse(Field::Newsletter, "Yes"),
            Ok(FieldChange::Newsletter(true))
        );
        assert!(FieldChange::parse(Field::Plan, "gold").is_err());
        assert!(FieldChange::parse(Field::Newsletter, "maybe").is_err());
    }

    #[test]
    fn persisted_shape_uses_camel_case_keys() {
        let json = serde_json::to_value(FormValues::default()).unwrap();
        assert_eq!(json["confirmPassword"], "");
        assert_eq!(json["plan"], "FREE");
    }
}

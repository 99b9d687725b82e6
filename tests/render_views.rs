use chrono::{TimeZone, Utc};
use insta::assert_snapshot;
use prostep::cli::render;
use prostep::wizard::{FormValues, Plan, Submission, WizardPosition, WizardState};

fn ada() -> FormValues {
    FormValues {
        full_name: "Ada Lovelace".into(),
        email: "ada@math.org".into(),
        username: "countess".into(),
        password: "analytical-engine".into(),
        confirm_password: "analytical-engine".into(),
        plan: Some(Plan::Pro),
        newsletter: true,
        ..FormValues::default()
    }
}

#[test]
fn header_for_the_first_step() {
    let header = render::step_header(WizardPosition::FIRST).join("\n");
    assert_snapshot!(header, @r###"
    ProStep Account
    Step 1 of 4: Personal Info
    [#####---------------]  25%
    ● Personal Info  ○ Account Setup  ○ Preferences  ○ Review
    "###);
}

#[test]
fn header_for_the_review_step() {
    let header = render::step_header(WizardPosition::LAST).join("\n");
    assert_snapshot!(header, @r###"
    ProStep Account
    Step 4 of 4: Review
    [####################] 100%
    ✓ Personal Info  ✓ Account Setup  ✓ Preferences  ● Review
    "###);
}

#[test]
fn review_summary_skips_empty_optional_fields() {
    let lines = render::review_lines(&ada());
    assert_eq!(
        lines,
        vec![
            "  Name:     Ada Lovelace",
            "  Email:    ada@math.org",
            "  Username: countess",
            "  Plan:     PRO",
            "  Newsletter: Yes",
        ]
    );
}

#[test]
fn review_summary_quotes_the_bio() {
    let values = FormValues {
        phone: "+44 20-7946-0000".into(),
        bio: "Poet of science".into(),
        newsletter: false,
        ..ada()
    };
    let lines = render::review_lines(&values);
    assert!(lines.contains(&"  Phone:    +44 20-7946-0000".to_string()));
    assert!(lines.contains(&"  Newsletter: No".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some("  Bio:      \"Poet of science\""));
}

#[test]
fn review_step_offers_back_and_submit() {
    let state = WizardState::resume(WizardPosition::LAST, ada());
    assert_snapshot!(render::action_hint(&state), @"Actions: back, submit");
}

#[test]
fn submitted_state_offers_restart() {
    let mut state = WizardState::resume(WizardPosition::LAST, ada());
    state.submitted = true;
    assert_snapshot!(
        render::action_hint(&state),
        @"Type `restart` to start a new form or `exit` to quit."
    );
}

#[test]
fn confirmation_names_the_user_and_email() {
    let submission = Submission {
        values: ada(),
        submitted_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
    };
    let view = render::confirmation_lines(&submission).join("\n");
    assert_snapshot!(view, @r###"
    Registration Complete!
    Thank you, Ada Lovelace. Your account has been created successfully. We've sent a verification email to ada@math.org.
    Submitted at 2026-01-02 03:04 UTC
    "###);
}

#[test]
fn account_step_masks_passwords_and_shows_errors() {
    let mut state = WizardState::resume(WizardPosition::new(2).unwrap(), ada());
    state.values.username = "ab".into();
    state.errors = prostep::wizard::validate(2, &state.values);
    let body = render::step_body(&state);
    assert_eq!(body[0], "Account Setup");
    assert_eq!(body[1], "Secure your account");
    assert!(body.contains(&"  Username [username]: ab".to_string()));
    assert!(body.contains(&"    ! Username must be at least 4 characters".to_string()));
    assert!(body.contains(&format!("  Password [password]: {}", "•".repeat(17))));
}

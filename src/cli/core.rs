use strsim::levenshtein;
use thiserror::Error;

use crate::cli::output::{self, OutputPreferences};
use crate::cli::{prompts, render};
use crate::config::{Config, ConfigManager};
use crate::errors::CliError;
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::utils::build_info;
use crate::wizard::{
    Advance, Field, FieldChange, FieldKind, FormController, Retreat, SubmitOutcome, STEPS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Recoverable command failures, reported without leaving the shell.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("exit requested")]
    ExitRequested,
    #[error(transparent)]
    Cli(#[from] CliError),
}

pub type CommandResult = Result<(), CommandError>;

pub(crate) struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub(crate) const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "show",
        usage: "show",
        summary: "Display the current step",
    },
    CommandSpec {
        name: "set",
        usage: "set <field> <value>",
        summary: "Change a field on the current step",
    },
    CommandSpec {
        name: "clear",
        usage: "clear <field>",
        summary: "Empty a text field on the current step",
    },
    CommandSpec {
        name: "edit",
        usage: "edit",
        summary: "Fill in the current step with guided prompts",
    },
    CommandSpec {
        name: "next",
        usage: "next",
        summary: "Validate this step and continue",
    },
    CommandSpec {
        name: "back",
        usage: "back",
        summary: "Return to the previous step",
    },
    CommandSpec {
        name: "submit",
        usage: "submit",
        summary: "Complete the registration from the Review step",
    },
    CommandSpec {
        name: "review",
        usage: "review",
        summary: "Summarize everything entered so far",
    },
    CommandSpec {
        name: "restart",
        usage: "restart",
        summary: "Start a new form after submitting",
    },
    CommandSpec {
        name: "version",
        usage: "version",
        summary: "Show build information",
    },
    CommandSpec {
        name: "help",
        usage: "help",
        summary: "List commands and field names",
    },
    CommandSpec {
        name: "exit",
        usage: "exit | quit",
        summary: "Leave the wizard (progress is kept)",
    },
];

/// Shared shell runtime: the wizard controller plus front end settings.
pub struct ShellContext {
    pub mode: CliMode,
    pub controller: FormController<Box<dyn KeyValueStore>>,
    pub config: Config,
}

impl ShellContext {
    /// Loads configuration from the application directory and resumes any
    /// saved session.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::new()?;
        let config = match manager.load() {
            Ok(config) => config,
            Err(err) => {
                output::warning(format!(
                    "Ignoring unreadable configuration at {}: {err}",
                    manager.config_path().display()
                ));
                Config::default()
            }
        };
        let store: Box<dyn KeyValueStore> = if config.persist_progress {
            Box::new(JsonFileStore::open(
                config.resolve_session_file(manager.base_dir()),
            ))
        } else {
            Box::new(MemoryStore::new())
        };
        Ok(Self::with_store(mode, config, store))
    }

    pub fn with_store(mode: CliMode, config: Config, store: Box<dyn KeyValueStore>) -> Self {
        apply_config(mode, &config);
        Self {
            mode,
            controller: FormController::initialize(store),
            config,
        }
    }

    pub fn prompt(&self) -> String {
        if self.controller.is_submitted() {
            return "prostep [done]> ".to_string();
        }
        let position = self.controller.position();
        format!(
            "prostep [{}/{} {}]> ",
            position,
            STEPS.len(),
            position.definition().title
        )
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = COMMANDS.iter().map(|spec| spec.name).collect();
        names.push("quit");
        names
    }

    pub(crate) fn dispatch(&mut self, command: &str, raw: &str, args: &[&str]) -> CommandResult {
        match command {
            "show" => {
                self.render_current();
                Ok(())
            }
            "set" => self.cmd_set(args),
            "clear" => self.cmd_clear(args),
            "edit" => self.cmd_edit(),
            "next" => {
                self.cmd_next();
                Ok(())
            }
            "back" => {
                self.cmd_back();
                Ok(())
            }
            "submit" => {
                self.cmd_submit();
                Ok(())
            }
            "review" => {
                output::section("Review");
                output::lines(render::review_lines(self.controller.values()));
                Ok(())
            }
            "restart" => {
                self.cmd_restart();
                Ok(())
            }
            "version" => {
                let build = build_info::current();
                output::info(build.summary());
                output::lines([format!("rustc: {}", build.rustc)]);
                Ok(())
            }
            "help" => {
                self.print_help();
                Ok(())
            }
            "exit" | "quit" => Err(CommandError::ExitRequested),
            _ => {
                self.suggest_command(raw);
                Ok(())
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                Ok(())
            }
            CommandError::Cli(err) => {
                output::error(err);
                Ok(())
            }
        }
    }

    pub(crate) fn farewell(&self) {
        if self.controller.is_submitted() {
            output::info("Goodbye.");
        } else if self.config.persist_progress {
            output::info("Progress saved. Run again to pick up where you left off.");
        } else {
            output::info("Progress persistence is disabled; this session was not saved.");
        }
    }

    pub fn render_current(&self) {
        let state = self.controller.state();
        if state.submitted {
            if let Some(submission) = self.controller.submission() {
                let mut lines = render::confirmation_lines(submission).into_iter();
                if let Some(title) = lines.next() {
                    output::success(title);
                }
                output::lines(lines);
            }
            output::lines([render::action_hint(state)]);
            return;
        }

        let mut header = render::step_header(state.position).into_iter();
        if let Some(title) = header.next() {
            output::section(title);
        }
        output::lines(header);
        output::separator();
        output::lines(render::step_body(state));
        output::separator();
        output::lines([render::action_hint(state)]);
        if self.config.persist_progress {
            output::lines([render::FOOTER]);
        }
    }

    fn cmd_set(&mut self, args: &[&str]) -> CommandResult {
        let (name, rest) = args.split_first().ok_or_else(|| {
            CommandError::InvalidArguments("Usage: set <field> <value>".into())
        })?;
        if rest.is_empty() {
            return Err(CommandError::InvalidArguments(format!(
                "Usage: set {name} <value> (use `clear {name}` to empty a text field)"
            )));
        }
        let field = self.editable_field(name)?;
        let change = FieldChange::parse(field, &rest.join(" "))
            .map_err(CommandError::InvalidArguments)?;
        self.controller.change_field(change);
        output::success(format!("{} updated.", field.label()));
        Ok(())
    }

    fn cmd_clear(&mut self, args: &[&str]) -> CommandResult {
        let [name] = args else {
            return Err(CommandError::InvalidArguments("Usage: clear <field>".into()));
        };
        let field = self.editable_field(name)?;
        if matches!(field.kind(), FieldKind::Choice | FieldKind::Toggle) {
            return Err(CommandError::InvalidArguments(format!(
                "`{}` cannot be cleared; use `set {} <value>`.",
                field.key(),
                field.key()
            )));
        }
        self.controller
            .change_field(FieldChange::Text(field, String::new()));
        output::success(format!("{} cleared.", field.label()));
        Ok(())
    }

    fn cmd_edit(&mut self) -> CommandResult {
        if self.ensure_in_progress() {
            return Ok(());
        }
        if self.mode == CliMode::Script {
            return Err(CommandError::InvalidArguments(
                "`edit` needs an interactive terminal; use `set <field> <value>` instead.".into(),
            ));
        }
        let fields = self.controller.position().definition().fields;
        if fields.is_empty() {
            output::info("Nothing to edit on this step. Use `back` to change earlier answers.");
            return Ok(());
        }
        let changes = prompts::guided_edit(fields, self.controller.values())?;
        for change in changes {
            self.controller.change_field(change);
        }
        self.render_current();
        Ok(())
    }

    fn cmd_next(&mut self) {
        match self.controller.next() {
            Advance::Moved { .. } => self.render_current(),
            Advance::Blocked(count) => {
                output::warning(format!(
                    "Please fix {count} {} before continuing.",
                    plural(count, "field", "fields")
                ));
                self.render_current();
            }
            Advance::AtLastStep => {
                output::info("This is the last step. Type `submit` to complete registration.")
            }
            Advance::Ignored => self.report_submitted(),
        }
    }

    fn cmd_back(&mut self) {
        match self.controller.back() {
            Retreat::Moved { .. } => self.render_current(),
            Retreat::AtFirstStep => output::info("Already on the first step."),
            Retreat::Ignored => self.report_submitted(),
        }
    }

    fn cmd_submit(&mut self) {
        match self.controller.submit() {
            SubmitOutcome::Submitted => self.render_current(),
            SubmitOutcome::Rejected(count) => {
                output::warning(format!(
                    "Please fix {count} {} before submitting.",
                    plural(count, "field", "fields")
                ));
                self.render_current();
            }
            SubmitOutcome::NotOnFinalStep => output::warning(format!(
                "Submit is available on the Review step (step {}). Use `next` to get there.",
                STEPS.len()
            )),
            SubmitOutcome::AlreadySubmitted => self.report_submitted(),
        }
    }

    fn cmd_restart(&mut self) {
        if self.controller.restart() {
            output::success("Started a new form.");
            self.render_current();
        } else {
            output::warning(
                "Restart is available after submitting. Your current progress is kept.",
            );
        }
    }

    /// Resolves `name` to a field shown on the current step.
    fn editable_field(&self, name: &str) -> Result<Field, CommandError> {
        if self.ensure_in_progress() {
            return Err(CommandError::InvalidArguments(
                "The form is already submitted.".into(),
            ));
        }
        let field = Field::from_name(name).ok_or_else(|| {
            let mut message = format!("Unknown field `{name}`.");
            if let Some(best) = closest(name, Field::ALL.iter().map(|field| field.key())) {
                message.push_str(&format!(" Did you mean `{best}`?"));
            }
            CommandError::InvalidArguments(message)
        })?;
        let position = self.controller.position();
        if !position.definition().fields.contains(&field) {
            let owner = STEPS
                .iter()
                .find(|step| step.fields.contains(&field))
                .map(|step| format!("step {} ({})", step.id, step.title))
                .unwrap_or_else(|| "another step".to_string());
            return Err(CommandError::InvalidArguments(format!(
                "`{}` belongs to {owner}. Use `next`/`back` to get there.",
                field.key()
            )));
        }
        Ok(field)
    }

    /// Prints a notice and returns `true` once the form is submitted.
    fn ensure_in_progress(&self) -> bool {
        if self.controller.is_submitted() {
            self.report_submitted();
            true
        } else {
            false
        }
    }

    fn report_submitted(&self) {
        output::info("This registration is complete. Type `restart` to start a new form.");
    }

    fn print_help(&self) {
        output::section("Commands");
        let width = COMMANDS
            .iter()
            .map(|spec| spec.usage.len())
            .max()
            .unwrap_or(0);
        output::lines(
            COMMANDS
                .iter()
                .map(|spec| format!("  {:width$}  {}", spec.usage, spec.summary)),
        );
        output::section("Fields");
        output::lines(STEPS.iter().filter(|step| !step.fields.is_empty()).map(|step| {
            let keys: Vec<&str> = step.fields.iter().map(|field| field.key()).collect();
            format!("  Step {} ({}): {}", step.id, step.title, keys.join(", "))
        }));
    }

    fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = closest(input, self.command_names().into_iter()) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }
}

fn apply_config(mode: CliMode, config: &Config) {
    output::set_preferences(OutputPreferences {
        screen_reader_mode: config.screen_reader_mode,
        quiet_mode: config.quiet_mode,
    });
    if mode == CliMode::Script || !config.ui_color_enabled {
        colored::control::set_override(false);
    }
}

fn closest<'a>(input: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let needle = input.to_ascii_lowercase();
    candidates
        .map(|candidate| (levenshtein(&candidate.to_ascii_lowercase(), &needle), candidate))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, candidate)| candidate)
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

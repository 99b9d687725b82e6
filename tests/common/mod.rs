#![allow(dead_code)]

use assert_cmd::Command;
use prostep::storage::{self, KeyValueStore};
use prostep::wizard::{Field, FieldChange, FormController};
use std::io;
use tempfile::TempDir;

pub const BIN_NAME: &str = "prostep_cli";

/// Script-mode command rooted in an isolated application directory.
pub fn script_command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("PROSTEP_CLI_SCRIPT", "1")
        .env("PROSTEP_HOME", home.path())
        .env_remove("RUST_LOG");
    cmd
}

/// Store whose every operation fails, standing in for unavailable storage.
#[derive(Default)]
pub struct BrokenStore {
    pub attempts: usize,
}

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> storage::Result<Option<String>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage disabled").into())
    }

    fn set(&mut self, _key: &str, _value: &str) -> storage::Result<()> {
        self.attempts += 1;
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage disabled").into())
    }

    fn remove(&mut self, _key: &str) -> storage::Result<()> {
        self.attempts += 1;
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage disabled").into())
    }
}

pub fn set_text<S: KeyValueStore>(controller: &mut FormController<S>, field: Field, value: &str) {
    controller.change_field(FieldChange::Text(field, value.to_string()));
}

/// Fills every step with valid answers, advancing to the review step.
pub fn complete_to_review<S: KeyValueStore>(controller: &mut FormController<S>) {
    set_text(controller, Field::FullName, "Ada Lovelace");
    set_text(controller, Field::Email, "ada@math.org");
    set_text(controller, Field::Phone, "+44 20-7946-0000");
    controller.next();
    set_text(controller, Field::Username, "countess");
    set_text(controller, Field::Password, "analytical-engine");
    set_text(controller, Field::ConfirmPassword, "analytical-engine");
    controller.next();
    controller.change_field(FieldChange::Newsletter(true));
    controller.next();
}

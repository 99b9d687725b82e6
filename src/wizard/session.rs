//! Persisted layout of an in-progress session.
//!
//! Two independent keys hold the serialized form record and the step number.
//! Each piece falls back to its default on its own when missing or corrupt.

use crate::storage::{self, KeyValueStore};

use super::model::{FormValues, WizardPosition};

pub const FORM_DATA_KEY: &str = "prostep_form_data";
pub const CURRENT_STEP_KEY: &str = "prostep_current_step";

/// What could be recovered from storage. `None` means absent or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub values: Option<FormValues>,
    pub position: Option<WizardPosition>,
}

impl PersistedSession {
    pub fn is_empty(&self) -> bool {
        self.values.is_none() && self.position.is_none()
    }
}

pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> storage::Result<PersistedSession> {
    let values = store
        .get(FORM_DATA_KEY)?
        .and_then(|raw| match decode_values(&raw) {
            Some(values) => Some(values),
            None => {
                tracing::warn!(key = FORM_DATA_KEY, "Discarding malformed form record");
                None
            }
        });
    let position = store
        .get(CURRENT_STEP_KEY)?
        .and_then(|raw| match decode_position(&raw) {
            Some(position) => Some(position),
            None => {
                tracing::warn!(key = CURRENT_STEP_KEY, value = %raw, "Discarding malformed step");
                None
            }
        });
    Ok(PersistedSession { values, position })
}

pub fn save<S: KeyValueStore + ?Sized>(
    store: &mut S,
    values: &FormValues,
    position: WizardPosition,
) -> storage::Result<()> {
    let json = serde_json::to_string(values)?;
    store.set(FORM_DATA_KEY, &json)?;
    store.set(CURRENT_STEP_KEY, &position.get().to_string())
}

pub fn clear<S: KeyValueStore + ?Sized>(store: &mut S) -> storage::Result<()> {
    store.remove(FORM_DATA_KEY)?;
    store.remove(CURRENT_STEP_KEY)
}

fn decode_values(raw: &str) -> Option<FormValues> {
    serde_json::from_str(raw).ok()
}

fn decode_position(raw: &str) -> Option<WizardPosition> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .and_then(WizardPosition::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::wizard::model::Plan;

    #[test]
    fn empty_store_loads_nothing() {
        let session = load(&MemoryStore::new()).unwrap();
        assert!(session.is_empty());
    }

    #[test]
    fn save_then_load_reproduces_values_and_position() {
        let mut store = MemoryStore::new();
        let values = FormValues {
            full_name: "Grace Hopper".into(),
            phone: "+1 555-000-0000".into(),
            plan: Some(Plan::Enterprise),
            newsletter: true,
            bio: "Line one\nline \"two\"".into(),
            ..FormValues::default()
        };
        let position = WizardPosition::new(3).unwrap();

        save(&mut store, &values, position).unwrap();
        let session = load(&store).unwrap();

        assert_eq!(session.values, Some(values));
        assert_eq!(session.position, Some(position));
    }

    #[test]
    fn each_piece_falls_back_independently() {
        let mut store = MemoryStore::new();
        store.set(FORM_DATA_KEY, "{\"fullName\": 42").unwrap();
        store.set(CURRENT_STEP_KEY, "2").unwrap();
        let session = load(&store).unwrap();
        assert_eq!(session.values, None);
        assert_eq!(session.position, WizardPosition::new(2));

        store.set(FORM_DATA_KEY, "{\"email\":\"x@y.z\"}").unwrap();
        store.set(CURRENT_STEP_KEY, "seven").unwrap();
        let session = load(&store).unwrap();
        assert_eq!(session.values.unwrap().email, "x@y.z");
        assert_eq!(session.position, None);
    }

    #[test]
    fn out_of_range_step_is_treated_as_absent() {
        let mut store = MemoryStore::new();
        for raw in ["0", "5", "-1", "2.5"] {
            store.set(CURRENT_STEP_KEY, raw).unwrap();
            assert_eq!(load(&store).unwrap().position, None, "step `{raw}`");
        }
    }

    #[test]
    fn null_plan_is_preserved() {
        let mut store = MemoryStore::new();
        store.set(FORM_DATA_KEY, "{\"plan\":null}").unwrap();
        let values = load(&store).unwrap().values.unwrap();
        assert_eq!(values.plan, None);
    }

    #[test]
    fn clear_removes_both_keys() {
        let mut store = MemoryStore::new();
        save(&mut store, &FormValues::default(), WizardPosition::FIRST).unwrap();
        clear(&mut store).unwrap();
        assert!(!store.contains(FORM_DATA_KEY));
        assert!(!store.contains(CURRENT_STEP_KEY));
    }
}

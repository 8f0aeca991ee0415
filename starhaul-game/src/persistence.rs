//! Snapshot validation and the load-or-fresh boot path.

use log::{info, warn};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use crate::GameStorage;
use crate::constants::{HULL_MAX, SHIELDS_MAX, UNKNOWN_LOCATION};
use crate::state::{EncounterKind, GameState};
use crate::sync::sync_state;

/// A snapshot that cannot be trusted as game state.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("snapshot is missing {0}")]
    MissingField(&'static str),
    #[error("snapshot location is unknown")]
    UnknownLocation,
    #[error("snapshot does not match the game state shape: {0}")]
    Shape(#[source] serde_json::Error),
    #[error("snapshot is inconsistent: {0}")]
    Inconsistent(String),
}

/// Parse and validate a raw snapshot, then re-derive its computed fields.
///
/// # Errors
///
/// Returns `SnapshotError` when the text is not JSON, lacks `meta.location`,
/// `ship`, or `map`, names the unknown location, or fails range checks.
pub fn parse_snapshot(raw: &str) -> Result<GameState, SnapshotError> {
    let value: Value = serde_json::from_str(raw).map_err(SnapshotError::Syntax)?;
    let location = value
        .pointer("/meta/location")
        .and_then(Value::as_str)
        .filter(|location| !location.trim().is_empty())
        .ok_or(SnapshotError::MissingField("meta.location"))?;
    if location == UNKNOWN_LOCATION {
        return Err(SnapshotError::UnknownLocation);
    }
    for field in ["ship", "map"] {
        if !value.get(field).is_some_and(Value::is_object) {
            return Err(SnapshotError::MissingField(field));
        }
    }
    let mut state: GameState = serde_json::from_value(value).map_err(SnapshotError::Shape)?;
    check_consistency(&state)?;
    sync_state(&mut state);
    Ok(state)
}

fn check_consistency(state: &GameState) -> Result<(), SnapshotError> {
    let stats = &state.ship.stats;
    if stats.hull > HULL_MAX || stats.shields > SHIELDS_MAX {
        return Err(SnapshotError::Inconsistent(format!(
            "hull {} / shields {} out of range",
            stats.hull, stats.shields
        )));
    }
    if let Some(encounter) = &state.encounter {
        let pirate = encounter.kind() == EncounterKind::Pirate;
        if encounter.hostile != pirate {
            return Err(SnapshotError::Inconsistent(format!(
                "{:?} encounter with hostile = {}",
                encounter.kind(),
                encounter.hostile
            )));
        }
    }
    Ok(())
}

/// Serialize the full state for a snapshot overwrite.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_snapshot(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(state)
}

/// How the engine obtained its starting state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    Loaded,
    Fresh,
    Recovered { reason: String },
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => f.write_str("loaded saved game"),
            Self::Fresh => f.write_str("no save found, started fresh"),
            Self::Recovered { reason } => write!(f, "save unusable ({reason}), started fresh"),
        }
    }
}

/// Load the slot, falling back to a fresh state on absence, corruption, or
/// storage failure. Corrupt snapshots are handed to `backup_corrupt` first.
pub fn load_or_fresh<S: GameStorage>(storage: &S, slot: &str) -> (GameState, LoadReport) {
    let raw = match storage.load_snapshot(slot) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("no snapshot in slot {slot}");
            return (GameState::fresh(), LoadReport::Fresh);
        }
        Err(err) => {
            warn!("reading slot {slot} failed: {err}");
            return (
                GameState::fresh(),
                LoadReport::Recovered {
                    reason: err.to_string(),
                },
            );
        }
    };
    match parse_snapshot(&raw) {
        Ok(state) => (state, LoadReport::Loaded),
        Err(err) => {
            warn!("corrupt snapshot in slot {slot}: {err}");
            if let Err(backup) = storage.backup_corrupt(slot) {
                warn!("backing up corrupt slot {slot} failed: {backup}");
            }
            (
                GameState::fresh(),
                LoadReport::Recovered {
                    reason: err.to_string(),
                },
            )
        }
    }
}

/// In-process storage keyed by slot name.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    saves: Rc<RefCell<HashMap<String, String>>>,
    backups: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn with_snapshot(slot: &str, raw: &str) -> Self {
        let storage = Self::default();
        storage
            .saves
            .borrow_mut()
            .insert(slot.to_string(), raw.to_string());
        storage
    }

    #[must_use]
    pub fn snapshot(&self, slot: &str) -> Option<String> {
        self.saves.borrow().get(slot).cloned()
    }

    #[must_use]
    pub fn backup(&self, slot: &str) -> Option<String> {
        self.backups.borrow().get(slot).cloned()
    }
}

impl GameStorage for MemoryStorage {
    type Error = Infallible;

    fn load_snapshot(&self, slot: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.snapshot(slot))
    }

    fn save_snapshot(&self, slot: &str, raw: &str) -> Result<(), Self::Error> {
        self.saves
            .borrow_mut()
            .insert(slot.to_string(), raw.to_string());
        Ok(())
    }

    fn delete_save(&self, slot: &str) -> Result<(), Self::Error> {
        self.saves.borrow_mut().remove(slot);
        Ok(())
    }

    fn backup_corrupt(&self, slot: &str) -> Result<(), Self::Error> {
        if let Some(raw) = self.snapshot(slot) {
            self.backups.borrow_mut().insert(slot.to_string(), raw);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Encounter, EncounterDetail};

    fn fresh_json() -> Value {
        serde_json::to_value(GameState::fresh()).unwrap()
    }

    #[test]
    fn round_trip_preserves_state() {
        let state = GameState::fresh();
        let raw = to_snapshot(&state).unwrap();
        let back = parse_snapshot(&raw).unwrap();
        assert_eq!(back.meta, state.meta);
        assert_eq!(back.ship, state.ship);
        assert_eq!(back.known_systems, state.known_systems);
    }

    #[test]
    fn missing_required_sections_are_corrupt() {
        for field in ["ship", "map"] {
            let mut value = fresh_json();
            value.as_object_mut().unwrap().remove(field);
            let err = parse_snapshot(&value.to_string()).unwrap_err();
            assert!(matches!(err, SnapshotError::MissingField(name) if name == field));
        }
        let mut value = fresh_json();
        value["meta"].as_object_mut().unwrap().remove("location");
        assert!(matches!(
            parse_snapshot(&value.to_string()),
            Err(SnapshotError::MissingField("meta.location"))
        ));
    }

    #[test]
    fn unknown_location_is_corrupt() {
        let mut value = fresh_json();
        value["meta"]["location"] = "Unknown".into();
        assert!(matches!(
            parse_snapshot(&value.to_string()),
            Err(SnapshotError::UnknownLocation)
        ));
    }

    #[test]
    fn truncated_json_is_corrupt() {
        let raw = to_snapshot(&GameState::fresh()).unwrap();
        let err = parse_snapshot(&raw[..raw.len() / 2]).unwrap_err();
        assert!(matches!(err, SnapshotError::Syntax(_)));
    }

    #[test]
    fn hostility_must_match_encounter_kind() {
        let mut state = GameState::fresh();
        state.encounter = Some(Encounter {
            hostile: true,
            text: "calm rocks".to_string(),
            detail: EncounterDetail::Asteroid,
        });
        let raw = to_snapshot(&state).unwrap();
        assert!(matches!(
            parse_snapshot(&raw),
            Err(SnapshotError::Inconsistent(_))
        ));
    }

    #[test]
    fn loaded_snapshot_recomputes_slots() {
        let mut value = fresh_json();
        value["ship"]["stats"]["slotsUsed"] = 99.into();
        let state = parse_snapshot(&value.to_string()).unwrap();
        assert_eq!(state.ship.stats.slots_used, 4);
    }

    #[test]
    fn load_or_fresh_backs_up_corrupt_saves() {
        let storage = MemoryStorage::with_snapshot("slot", "{\"meta\":");
        let (state, report) = load_or_fresh(&storage, "slot");
        assert!(matches!(report, LoadReport::Recovered { .. }));
        assert_eq!(state, GameState::fresh());
        assert_eq!(storage.backup("slot").as_deref(), Some("{\"meta\":"));

        let empty = MemoryStorage::default();
        assert_eq!(load_or_fresh(&empty, "slot").1, LoadReport::Fresh);
    }
}

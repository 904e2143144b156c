//! Per-domain decoding of stored records.
//!
//! Each reader is independent: a missing or corrupt value for one domain
//! degrades only that domain to its defaults.

use crate::lenient;
use crate::models::{MacroState, Settings, TodoRecord, WaterUnit, WorkoutRecord};
use crate::store::StateStore;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

pub const WORKOUTS_KEY: &str = "workouts_v1";
pub const MACROS_KEY: &str = "macros_v1";
pub const TODOS_KEY: &str = "todos_v1";
pub const WATER_KEY: &str = "water_v1";
pub const WATER_GOAL_KEY: &str = "water_goal_v1";
pub const WATER_UNIT_KEY: &str = "water_unit_v1";
pub const TIMERS_KEY: &str = "timers_count_v1";
pub const SETTINGS_KEY: &str = "workout_settings_v1";

fn read_value(store: &dyn StateStore, key: &str) -> Option<Value> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, "ignoring unparsable stored value: {err}");
            None
        }
    }
}

fn read_record<T>(store: &dyn StateStore, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let value = read_value(store, key)?;
    if !value.is_object() {
        warn!(key, "stored value is not a record, using defaults");
        return None;
    }
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(key, "stored value has the wrong shape: {err}");
            None
        }
    }
}

fn read_list<T>(store: &dyn StateStore, key: &str) -> Vec<T>
where
    T: DeserializeOwned + Default,
{
    read_value(store, key)
        .map(lenient::list_from_value)
        .unwrap_or_default()
}

/// The collection as a writer sees it: elements that are not records are
/// dropped, so a write never turns them into blank records.
fn read_list_for_update<T>(store: &dyn StateStore, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
{
    read_value(store, key)
        .map(lenient::decodable_list_from_value)
        .unwrap_or_default()
}

pub fn read_workouts_for_update(store: &dyn StateStore) -> Vec<WorkoutRecord> {
    read_list_for_update(store, WORKOUTS_KEY)
}

pub fn read_todos_for_update(store: &dyn StateStore) -> Vec<TodoRecord> {
    read_list_for_update(store, TODOS_KEY)
}

/// Saved macro state with unusable entries dropped; `None` when nothing
/// usable has been saved yet.
pub fn load_macros_for_update(store: &dyn StateStore) -> Option<MacroState> {
    let value = read_value(store, MACROS_KEY)?;
    let entries = value
        .get("entries")
        .cloned()
        .map(lenient::decodable_list_from_value)
        .unwrap_or_default();
    let mut state: MacroState = lenient::object_from_value(value)?;
    state.entries = entries;
    Some(state)
}

pub fn read_workouts(store: &dyn StateStore) -> Vec<WorkoutRecord> {
    read_list(store, WORKOUTS_KEY)
}

pub fn read_todos(store: &dyn StateStore) -> Vec<TodoRecord> {
    read_list(store, TODOS_KEY)
}

/// `None` when nothing usable has been saved yet.
pub fn load_macros(store: &dyn StateStore) -> Option<MacroState> {
    read_record(store, MACROS_KEY)
}

pub fn read_macros(store: &dyn StateStore) -> MacroState {
    load_macros(store).unwrap_or_default()
}

pub fn read_settings(store: &dyn StateStore) -> Settings {
    read_record::<Settings>(store, SETTINGS_KEY)
        .unwrap_or_default()
        .normalized()
}

/// Plain numeric keys hold a bare number string.
pub fn read_number(store: &dyn StateStore, key: &str) -> f64 {
    store
        .get(key)
        .map(|raw| lenient::number_from_value(&Value::String(raw)))
        .unwrap_or(0.0)
}

pub fn read_water(store: &dyn StateStore) -> f64 {
    read_number(store, WATER_KEY)
}

pub fn read_water_goal(store: &dyn StateStore) -> f64 {
    read_number(store, WATER_GOAL_KEY)
}

pub fn read_water_unit(store: &dyn StateStore) -> WaterUnit {
    store
        .get(WATER_UNIT_KEY)
        .and_then(|raw| WaterUnit::parse(raw.trim()))
        .unwrap_or_default()
}

pub fn read_timers(store: &dyn StateStore) -> u64 {
    let count = read_number(store, TIMERS_KEY);
    if count > 0.0 { count.trunc() as u64 } else { 0 }
}

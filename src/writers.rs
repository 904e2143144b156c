//! Record writers for the individual tracker panels.
//!
//! Collections are kept newest-first: new records are always prepended.

use crate::errors::AppError;
use crate::models::{
    MacroEntry, MacroEntryRequest, MacroState, MacroTargetUpdate, MacroTotals, Settings,
    TodoRecord, WaterUnit, WorkoutRecord, WorkoutRequest,
};
use crate::records::{
    self, MACROS_KEY, SETTINGS_KEY, TODOS_KEY, WATER_GOAL_KEY, WATER_KEY, WATER_UNIT_KEY,
    WORKOUTS_KEY,
};
use crate::store::StateStore;
use chrono::Utc;
use serde::Serialize;

pub const MAX_MACRO_ENTRIES: usize = 50;
const DEFAULT_SETS: i64 = 3;
const DEFAULT_REPS: i64 = 8;

fn save_json<T: Serialize>(
    store: &dyn StateStore,
    key: &str,
    value: &T,
) -> Result<(), AppError> {
    let payload = serde_json::to_string(value)?;
    store.set(key, payload);
    Ok(())
}

/// Millisecond timestamp, bumped past every id already in use.
fn next_id(existing: impl Iterator<Item = i64>) -> i64 {
    let now = Utc::now().timestamp_millis();
    existing.map(|id| id.saturating_add(1)).fold(now, i64::max)
}

fn require_finite(amount: f64, what: &str) -> Result<f64, AppError> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(AppError::bad_request(format!("{what} must be a finite number")))
    }
}

pub fn add_workout(
    store: &dyn StateStore,
    request: WorkoutRequest,
) -> Result<WorkoutRecord, AppError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("workout name is required"));
    }

    let mut workouts = records::read_workouts_for_update(store);
    let record = WorkoutRecord {
        id: next_id(workouts.iter().map(|w| w.id)),
        name: name.to_string(),
        sets: if request.sets != 0 { request.sets } else { DEFAULT_SETS },
        reps: if request.reps != 0 { request.reps } else { DEFAULT_REPS },
        weight: request.weight.trim().to_string(),
        created_at: Some(Utc::now()),
    };
    workouts.insert(0, record.clone());
    save_json(store, WORKOUTS_KEY, &workouts)?;
    Ok(record)
}

pub fn delete_workout(store: &dyn StateStore, id: i64) -> Result<Vec<WorkoutRecord>, AppError> {
    let mut workouts = records::read_workouts_for_update(store);
    let before = workouts.len();
    workouts.retain(|w| w.id != id);
    if workouts.len() == before {
        return Err(AppError::not_found(format!("no workout with id {id}")));
    }
    save_json(store, WORKOUTS_KEY, &workouts)?;
    Ok(workouts)
}

pub fn clear_workouts(store: &dyn StateStore) -> Result<(), AppError> {
    save_json(store, WORKOUTS_KEY, &Vec::<WorkoutRecord>::new())
}

pub fn save_settings(store: &dyn StateStore, settings: Settings) -> Result<Settings, AppError> {
    let settings = settings.normalized();
    save_json(store, SETTINGS_KEY, &settings)?;
    Ok(settings)
}

fn macros_for_update(store: &dyn StateStore) -> MacroState {
    records::load_macros_for_update(store).unwrap_or_else(MacroState::starter)
}

pub fn add_macro_entry(
    store: &dyn StateStore,
    request: MacroEntryRequest,
) -> Result<MacroState, AppError> {
    let mut state = macros_for_update(store);
    let entry = MacroEntry {
        id: next_id(state.entries.iter().map(|e| e.id)),
        cal: request.cal,
        protein: request.protein,
        carbs: request.carbs,
        fat: request.fat,
        note: request.note.trim().to_string(),
        created_at: Some(Utc::now()),
    };
    state.today = state.today.add(entry.totals());
    state.entries.insert(0, entry);
    state.entries.truncate(MAX_MACRO_ENTRIES);
    save_json(store, MACROS_KEY, &state)?;
    Ok(state)
}

pub fn delete_macro_entry(store: &dyn StateStore, id: i64) -> Result<MacroState, AppError> {
    let mut state = macros_for_update(store);
    let before = state.entries.len();
    state.entries.retain(|e| e.id != id);
    if state.entries.len() == before {
        return Err(AppError::not_found(format!("no macro entry with id {id}")));
    }
    state.today = state
        .entries
        .iter()
        .fold(MacroTotals::default(), |acc, e| acc.add(e.totals()));
    save_json(store, MACROS_KEY, &state)?;
    Ok(state)
}

pub fn reset_macros_today(store: &dyn StateStore) -> Result<MacroState, AppError> {
    let mut state = macros_for_update(store);
    state.today = MacroTotals::default();
    state.entries.clear();
    save_json(store, MACROS_KEY, &state)?;
    Ok(state)
}

pub fn update_macro_target(
    store: &dyn StateStore,
    update: MacroTargetUpdate,
) -> Result<MacroState, AppError> {
    let mut state = macros_for_update(store);
    let target = &mut state.target;
    if let Some(cal) = update.cal {
        target.cal = cal;
    }
    if let Some(protein) = update.protein {
        target.protein = protein;
    }
    if let Some(carbs) = update.carbs {
        target.carbs = carbs;
    }
    if let Some(fat) = update.fat {
        target.fat = fat;
    }
    save_json(store, MACROS_KEY, &state)?;
    Ok(state)
}

pub fn add_todo(store: &dyn StateStore, text: &str) -> Result<TodoRecord, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::bad_request("todo text is required"));
    }

    let mut todos = records::read_todos_for_update(store);
    let record = TodoRecord {
        id: next_id(todos.iter().map(|t| t.id)),
        text: text.to_string(),
        done: false,
        created_at: Some(Utc::now()),
    };
    todos.insert(0, record.clone());
    save_json(store, TODOS_KEY, &todos)?;
    Ok(record)
}

pub fn toggle_todo(store: &dyn StateStore, id: i64) -> Result<TodoRecord, AppError> {
    let mut todos = records::read_todos_for_update(store);
    let todo = todos
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| AppError::not_found(format!("no todo with id {id}")))?;
    todo.done = !todo.done;
    let updated = todo.clone();
    save_json(store, TODOS_KEY, &todos)?;
    Ok(updated)
}

pub fn delete_todo(store: &dyn StateStore, id: i64) -> Result<(), AppError> {
    let mut todos = records::read_todos_for_update(store);
    let before = todos.len();
    todos.retain(|t| t.id != id);
    if todos.len() == before {
        return Err(AppError::not_found(format!("no todo with id {id}")));
    }
    save_json(store, TODOS_KEY, &todos)
}

pub fn clear_todos(store: &dyn StateStore) -> Result<(), AppError> {
    save_json(store, TODOS_KEY, &Vec::<TodoRecord>::new())
}

pub fn add_water(store: &dyn StateStore, amount: f64) -> Result<f64, AppError> {
    let amount = require_finite(amount, "amount")?;
    let total = records::read_water(store) + amount;
    store.set(WATER_KEY, total.to_string());
    Ok(total)
}

pub fn remove_water(store: &dyn StateStore, amount: f64) -> Result<f64, AppError> {
    let amount = require_finite(amount, "amount")?;
    let total = (records::read_water(store) - amount).max(0.0);
    store.set(WATER_KEY, total.to_string());
    Ok(total)
}

pub fn reset_water(store: &dyn StateStore) {
    store.set(WATER_KEY, "0".to_string());
}

pub fn set_water_goal(store: &dyn StateStore, goal: f64) -> Result<f64, AppError> {
    let goal = require_finite(goal, "goal")?.max(0.0);
    store.set(WATER_GOAL_KEY, goal.to_string());
    Ok(goal)
}

pub fn set_water_unit(store: &dyn StateStore, unit: WaterUnit) {
    store.set(WATER_UNIT_KEY, unit.as_str().to_string());
}

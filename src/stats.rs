use crate::models::{Snapshot, WaterStatus};
use crate::records;
use crate::store::StateStore;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tracing::debug;

pub const RECENT_LIMIT: usize = 5;

/// Reads every tracked domain and derives a fresh snapshot. Never fails:
/// each domain falls back to its defaults on its own.
pub fn aggregate(store: &dyn StateStore) -> Snapshot {
    let workouts = records::read_workouts(store);
    let macros = records::read_macros(store);
    let todos = records::read_todos(store);
    let water = records::read_water(store);
    let water_goal = records::read_water_goal(store);
    let timers = records::read_timers(store);
    let settings = records::read_settings(store);

    let todos_done = todos.iter().filter(|todo| todo.done).count();
    let todos_remaining = todos.len().saturating_sub(todos_done);

    let exercises_pct = clamp_pct(percent(
        workouts.len() as f64,
        settings.exercises_target.max(1.0),
    ));
    let macros_pct = if macros.target.cal != 0.0 {
        floor_pct(percent(macros.today.cal, macros.target.cal))
    } else {
        0
    };
    let water_pct = water_pct(water, water_goal);
    let todos_pct = if todos.is_empty() {
        0
    } else {
        clamp_pct(percent(todos_done as f64, todos.len() as f64))
    };

    Snapshot {
        exercises: workouts.len(),
        exercises_pct,
        macro_entries: macros.entries.len(),
        macros_pct,
        water,
        water_pct,
        todos: todos.len(),
        todos_pct,
        todos_done,
        todos_remaining,
        timers,
        recent_exercises: recent(workouts),
        recent_macro_entries: recent(macros.entries),
        recent_todos: recent(todos),
    }
}

pub fn water_status(store: &dyn StateStore) -> WaterStatus {
    let amount = records::read_water(store);
    let goal = records::read_water_goal(store);
    WaterStatus {
        amount,
        goal,
        unit: records::read_water_unit(store),
        pct: water_pct(amount, goal),
    }
}

fn water_pct(water: f64, goal: f64) -> u32 {
    if goal != 0.0 {
        clamp_pct(percent(water, goal))
    } else {
        0
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    (part / whole * 100.0).round()
}

fn clamp_pct(pct: f64) -> u32 {
    pct.clamp(0.0, 100.0) as u32
}

/// Lower bound only; intake may legitimately run past its target.
fn floor_pct(pct: f64) -> u32 {
    if pct.is_finite() && pct > 0.0 { pct as u32 } else { 0 }
}

fn recent<T>(mut items: Vec<T>) -> Vec<T> {
    items.truncate(RECENT_LIMIT);
    items
}

/// Latest snapshot, recomputed from scratch whenever the store changes.
#[derive(Clone)]
pub struct LiveSnapshot {
    current: Arc<RwLock<Arc<Snapshot>>>,
}

impl LiveSnapshot {
    pub fn attach(store: Arc<dyn StateStore>) -> Self {
        let current = Arc::new(RwLock::new(Arc::new(aggregate(store.as_ref()))));
        let weak_store: Weak<dyn StateStore> = Arc::downgrade(&store);
        let target = Arc::downgrade(&current);
        store.subscribe(Arc::new(move || {
            let (Some(store), Some(target)) = (weak_store.upgrade(), target.upgrade()) else {
                return;
            };
            let fresh = Arc::new(aggregate(store.as_ref()));
            debug!(
                exercises = fresh.exercises,
                todos = fresh.todos,
                "snapshot recomputed"
            );
            *target.write() = fresh;
        }));
        Self { current }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }
}

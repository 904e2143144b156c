use crate::chart;
use crate::errors::AppError;
use crate::models::{
    ChartRequest, DonutChart, MacroEntryRequest, MacroState, MacroTargetUpdate, Settings,
    Snapshot, TodoRecord, TodoRequest, WaterAmountRequest, WaterGoalRequest, WaterStatus,
    WaterUnitRequest, WorkoutRecord, WorkoutRequest,
};
use crate::records;
use crate::state::AppState;
use crate::stats::water_status;
use crate::storage::persist_store;
use crate::store::StateStore;
use crate::ui::render_home;
use crate::writers;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.live.current();
    let settings = records::read_settings(&*state.store);
    Html(render_home(&snapshot, &settings))
}

pub async fn get_snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json((*state.live.current()).clone())
}

pub async fn render_chart(Json(payload): Json<ChartRequest>) -> Json<DonutChart> {
    Json(chart::render(&payload.categories, payload.size))
}

/// Runs one write against the store and persists the result before the
/// reload task can observe the file again.
async fn mutate<T>(
    state: &AppState,
    op: impl FnOnce(&dyn StateStore) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let _guard = state.io_lock.lock().await;
    let store: &dyn StateStore = &*state.store;
    let result = op(store)?;
    persist_store(&state.data_path, &state.store).await?;
    Ok(result)
}

pub async fn list_workouts(State(state): State<AppState>) -> Json<Vec<WorkoutRecord>> {
    Json(records::read_workouts(&*state.store))
}

pub async fn add_workout(
    State(state): State<AppState>,
    Json(payload): Json<WorkoutRequest>,
) -> Result<Json<WorkoutRecord>, AppError> {
    let record = mutate(&state, |store| writers::add_workout(store, payload)).await?;
    Ok(Json(record))
}

pub async fn delete_workout(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<WorkoutRecord>>, AppError> {
    let remaining = mutate(&state, |store| writers::delete_workout(store, id)).await?;
    Ok(Json(remaining))
}

pub async fn clear_workouts(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    mutate(&state, writers::clear_workouts).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(records::read_settings(&*state.store))
}

pub async fn put_settings(
    State(state): State<AppState>,
    Json(payload): Json<Settings>,
) -> Result<Json<Settings>, AppError> {
    let saved = mutate(&state, |store| writers::save_settings(store, payload)).await?;
    Ok(Json(saved))
}

pub async fn get_macros(State(state): State<AppState>) -> Json<MacroState> {
    Json(records::load_macros(&*state.store).unwrap_or_else(MacroState::starter))
}

pub async fn add_macro_entry(
    State(state): State<AppState>,
    Json(payload): Json<MacroEntryRequest>,
) -> Result<Json<MacroState>, AppError> {
    let macros = mutate(&state, |store| writers::add_macro_entry(store, payload)).await?;
    Ok(Json(macros))
}

pub async fn delete_macro_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MacroState>, AppError> {
    let macros = mutate(&state, |store| writers::delete_macro_entry(store, id)).await?;
    Ok(Json(macros))
}

pub async fn reset_macros(State(state): State<AppState>) -> Result<Json<MacroState>, AppError> {
    let macros = mutate(&state, writers::reset_macros_today).await?;
    Ok(Json(macros))
}

pub async fn put_macro_target(
    State(state): State<AppState>,
    Json(payload): Json<MacroTargetUpdate>,
) -> Result<Json<MacroState>, AppError> {
    let macros = mutate(&state, |store| writers::update_macro_target(store, payload)).await?;
    Ok(Json(macros))
}

pub async fn list_todos(State(state): State<AppState>) -> Json<Vec<TodoRecord>> {
    Json(records::read_todos(&*state.store))
}

pub async fn add_todo(
    State(state): State<AppState>,
    Json(payload): Json<TodoRequest>,
) -> Result<Json<TodoRecord>, AppError> {
    let todo = mutate(&state, |store| writers::add_todo(store, &payload.text)).await?;
    Ok(Json(todo))
}

pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TodoRecord>, AppError> {
    let todo = mutate(&state, |store| writers::toggle_todo(store, id)).await?;
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    mutate(&state, |store| writers::delete_todo(store, id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_todos(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    mutate(&state, writers::clear_todos).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_water(State(state): State<AppState>) -> Json<WaterStatus> {
    Json(water_status(&*state.store))
}

pub async fn add_water(
    State(state): State<AppState>,
    Json(payload): Json<WaterAmountRequest>,
) -> Result<Json<WaterStatus>, AppError> {
    let status = mutate(&state, |store| {
        writers::add_water(store, payload.amount)?;
        Ok(water_status(store))
    })
    .await?;
    Ok(Json(status))
}

pub async fn remove_water(
    State(state): State<AppState>,
    Json(payload): Json<WaterAmountRequest>,
) -> Result<Json<WaterStatus>, AppError> {
    let status = mutate(&state, |store| {
        writers::remove_water(store, payload.amount)?;
        Ok(water_status(store))
    })
    .await?;
    Ok(Json(status))
}

pub async fn reset_water(State(state): State<AppState>) -> Result<Json<WaterStatus>, AppError> {
    let status = mutate(&state, |store| {
        writers::reset_water(store);
        Ok(water_status(store))
    })
    .await?;
    Ok(Json(status))
}

pub async fn put_water_goal(
    State(state): State<AppState>,
    Json(payload): Json<WaterGoalRequest>,
) -> Result<Json<WaterStatus>, AppError> {
    let status = mutate(&state, |store| {
        writers::set_water_goal(store, payload.goal)?;
        Ok(water_status(store))
    })
    .await?;
    Ok(Json(status))
}

pub async fn put_water_unit(
    State(state): State<AppState>,
    Json(payload): Json<WaterUnitRequest>,
) -> Result<Json<WaterStatus>, AppError> {
    let status = mutate(&state, |store| {
        writers::set_water_unit(store, payload.unit);
        Ok(water_status(store))
    })
    .await?;
    Ok(Json(status))
}

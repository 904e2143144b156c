use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/snapshot", get(handlers::get_snapshot))
        .route("/api/chart", post(handlers::render_chart))
        .route(
            "/api/workouts",
            get(handlers::list_workouts)
                .post(handlers::add_workout)
                .delete(handlers::clear_workouts),
        )
        .route("/api/workouts/:id", delete(handlers::delete_workout))
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::put_settings),
        )
        .route("/api/macros", get(handlers::get_macros))
        .route("/api/macros/entries", post(handlers::add_macro_entry))
        .route("/api/macros/entries/:id", delete(handlers::delete_macro_entry))
        .route("/api/macros/reset", post(handlers::reset_macros))
        .route("/api/macros/target", put(handlers::put_macro_target))
        .route(
            "/api/todos",
            get(handlers::list_todos)
                .post(handlers::add_todo)
                .delete(handlers::clear_todos),
        )
        .route("/api/todos/:id", delete(handlers::delete_todo))
        .route("/api/todos/:id/toggle", post(handlers::toggle_todo))
        .route("/api/water", get(handlers::get_water))
        .route("/api/water/add", post(handlers::add_water))
        .route("/api/water/remove", post(handlers::remove_water))
        .route("/api/water/reset", post(handlers::reset_water))
        .route("/api/water/goal", put(handlers::put_water_goal))
        .route("/api/water/unit", put(handlers::put_water_unit))
        .with_state(state)
}

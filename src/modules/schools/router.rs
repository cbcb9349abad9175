use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{
    create_school, delete_school, get_school_students, get_schools, update_school,
};

pub fn init_schools_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_schools).post(create_school))
        .route("/{id}", patch(update_school).delete(delete_school))
        .route("/{id}/students", get(get_school_students))
}

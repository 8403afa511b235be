use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::middleware::role::require_teacher;
use crate::state::AppState;

use super::controller::{
    create_course, enroll_course, get_course_by_id, get_courses, update_course,
};

pub fn init_courses_router(state: AppState) -> Router<AppState> {
    // The role layer covers only the routes registered before it; reads and
    // enrollment stay open to any (or no) authenticated user.
    Router::new()
        .route("/create", post(create_course))
        .route("/update/{id}", put(update_course))
        .route_layer(middleware::from_fn_with_state(state, require_teacher))
        .route("/search/{course_id}", get(get_course_by_id))
        .route("/enroll/{course_id}", post(enroll_course))
        .route("/", get(get_courses))
}

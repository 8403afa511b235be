use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationParams;
use crate::validator::ValidatedJson;

use super::model::{
    Course, CourseCreatedResponse, CourseDetail, CreateCourseDto, EnrollResponse,
    PaginatedCoursesResponse, UpdateCourseDto,
};
use super::service::CourseService;

/// Create a course (teacher or admin only)
#[utoipa::path(
    post,
    path = "/api/courses/create",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created successfully", body = CourseCreatedResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden - teacher role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<CourseCreatedResponse>), AppError> {
    let creator = auth_user.user_id()?;
    let course = CourseService::create_course(&state.db, dto, creator).await?;
    Ok((StatusCode::CREATED, Json(CourseCreatedResponse { course })))
}

/// List courses with paging and an optional search term
#[utoipa::path(
    get,
    path = "/api/courses",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of courses", body = PaginatedCoursesResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedCoursesResponse>, AppError> {
    let response = CourseService::get_courses(&state.db, &params).await?;
    Ok(Json(response))
}

/// Fetch one course with its creator and enrolled students resolved
#[utoipa::path(
    get,
    path = "/api/courses/search/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course detail", body = CourseDetail),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseDetail>, AppError> {
    let course = CourseService::get_course_by_id(&state.db, course_id).await?;
    Ok(Json(course))
}

/// Update a course (creator only)
#[utoipa::path(
    put,
    path = "/api/courses/update/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated successfully", body = Course),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden - not the course creator", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let requester = auth_user.user_id()?;
    let course = CourseService::update_course(&state.db, id, requester, dto).await?;
    Ok(Json(course))
}

/// Enroll the authenticated user into a course
#[utoipa::path(
    post,
    path = "/api/courses/enroll/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled successfully", body = EnrollResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 404, description = "Course or user not found", body = ErrorResponse),
        (status = 409, description = "Already enrolled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn enroll_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<EnrollResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    CourseService::enroll_course(&state.db, course_id, user_id).await?;
    Ok(Json(EnrollResponse {
        success: true,
        message: "Successfully enrolled in the course".to_string(),
    }))
}

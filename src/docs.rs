use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, RegisterRequestDto, RegisterResponse, RegisteredUser, UserRole,
};
use crate::modules::courses::model::{
    ContentBlock, ContentKind, Course, CourseCreatedResponse, CourseDetail, CourseSummary,
    CreateCourseDto, EnrollResponse, EnrollmentStatus, PaginatedCoursesResponse, UpdateCourseDto,
    UserSummary,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course_by_id,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::enroll_course,
    ),
    components(
        schemas(
            UserRole,
            RegisterRequestDto,
            RegisterResponse,
            RegisteredUser,
            LoginRequest,
            LoginResponse,
            ErrorResponse,
            Course,
            CourseSummary,
            CourseDetail,
            CourseCreatedResponse,
            CreateCourseDto,
            UpdateCourseDto,
            ContentBlock,
            ContentKind,
            EnrollmentStatus,
            PaginatedCoursesResponse,
            EnrollResponse,
            UserSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Courses", description = "Course management and enrollment")
    ),
    info(
        title = "LearnX API",
        version = "0.1.0",
        description = "A course-enrollment REST API built with Rust, Axum, and PostgreSQL featuring JWT-based authentication."
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

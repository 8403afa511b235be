use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Whether a course accepts enrollments. New courses start as drafts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "enrollment_status", rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Open,
    Closed,
    #[default]
    Draft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Video,
    Document,
}

/// One unit of course material. The payload is opaque to the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: Value,
}

/// A course row. `creator` is immutable after creation; the enrolled-student
/// list lives in the `enrollments` table, never on this row.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[schema(value_type = Vec<ContentBlock>)]
    pub content: Json<Vec<ContentBlock>>,
    pub creator: Uuid,
    #[serde(rename = "enrollmentStatus")]
    pub enrollment_status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course row joined with its creator's public identity.
#[derive(Debug, FromRow)]
pub struct CourseWithCreatorRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: Json<Vec<ContentBlock>>,
    pub enrollment_status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub creator_name: String,
    pub creator_email: String,
}

/// How user identities appear in course reads: name and email, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct UserSummary {
    pub name: String,
    pub email: String,
}

/// List-item shape: course fields with the creator resolved.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: Vec<ContentBlock>,
    #[serde(rename = "enrollmentStatus")]
    pub enrollment_status: EnrollmentStatus,
    pub creator: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CourseWithCreatorRow> for CourseSummary {
    fn from(row: CourseWithCreatorRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            content: row.content.0,
            enrollment_status: row.enrollment_status,
            creator: UserSummary {
                name: row.creator_name,
                email: row.creator_email,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Single-course shape: the summary plus the resolved student roster.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: Vec<ContentBlock>,
    #[serde(rename = "enrollmentStatus")]
    pub enrollment_status: EnrollmentStatus,
    pub creator: UserSummary,
    #[serde(rename = "enrolledStudents")]
    pub enrolled_students: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseDetail {
    pub fn from_parts(row: CourseWithCreatorRow, enrolled_students: Vec<UserSummary>) -> Self {
        let summary = CourseSummary::from(row);
        Self {
            id: summary.id,
            title: summary.title,
            description: summary.description,
            content: summary.content,
            enrollment_status: summary.enrollment_status,
            creator: summary.creator,
            enrolled_students,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default, rename = "enrollmentStatus")]
    pub enrollment_status: EnrollmentStatus,
}

/// Patch for a course update; absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    pub content: Option<Vec<ContentBlock>>,
    #[serde(rename = "enrollmentStatus")]
    pub enrollment_status: Option<EnrollmentStatus>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("must not be empty".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseCreatedResponse {
    pub course: Course,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub courses: Vec<CourseSummary>,
    #[serde(rename = "currentPage")]
    pub current_page: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollResponse {
    pub success: bool,
    pub message: String,
}

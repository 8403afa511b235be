use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationParams;

use super::model::{
    Course, CourseDetail, CourseSummary, CourseWithCreatorRow, CreateCourseDto,
    PaginatedCoursesResponse, UpdateCourseDto, UserSummary,
};

const COURSE_WITH_CREATOR: &str = "SELECT c.id, c.title, c.description, c.content, \
     c.enrollment_status, c.created_at, c.updated_at, \
     u.name AS creator_name, u.email AS creator_email \
     FROM courses c JOIN users u ON u.id = c.creator";

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db, dto))]
    pub async fn create_course(
        db: &PgPool,
        dto: CreateCourseDto,
        creator: Uuid,
    ) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            "INSERT INTO courses (title, description, content, creator, enrollment_status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, title, description, content, creator, enrollment_status,
                       created_at, updated_at",
        )
        .bind(dto.title.trim())
        .bind(dto.description.trim())
        .bind(Json(&dto.content))
        .bind(creator)
        .bind(dto.enrollment_status)
        .fetch_one(db)
        .await?;

        Ok(course)
    }

    /// Paged listing with a case-insensitive contains-match over title and
    /// description. An empty search term matches everything.
    #[instrument(skip(db))]
    pub async fn get_courses(
        db: &PgPool,
        params: &PaginationParams,
    ) -> Result<PaginatedCoursesResponse, AppError> {
        let search = params.search();
        let limit = params.limit();
        let page = params.page();

        let rows = sqlx::query_as::<_, CourseWithCreatorRow>(&format!(
            "{COURSE_WITH_CREATOR}
             WHERE $1 = '' OR c.title ILIKE '%' || $1 || '%' OR c.description ILIKE '%' || $1 || '%'
             ORDER BY c.created_at, c.id
             LIMIT $2 OFFSET $3",
        ))
        .bind(search)
        .bind(limit)
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM courses c
             WHERE $1 = '' OR c.title ILIKE '%' || $1 || '%' OR c.description ILIKE '%' || $1 || '%'",
        )
        .bind(search)
        .fetch_one(db)
        .await?;

        let total_pages = (total as f64 / limit as f64).ceil() as i64;

        Ok(PaginatedCoursesResponse {
            courses: rows.into_iter().map(CourseSummary::from).collect(),
            current_page: page,
            total_pages,
            total,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_course_by_id(db: &PgPool, id: Uuid) -> Result<CourseDetail, AppError> {
        let row = sqlx::query_as::<_, CourseWithCreatorRow>(&format!(
            "{COURSE_WITH_CREATOR} WHERE c.id = $1",
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

        let enrolled_students = sqlx::query_as::<_, UserSummary>(
            "SELECT u.name, u.email
             FROM enrollments e
             JOIN users u ON u.id = e.user_id
             WHERE e.course_id = $1
             ORDER BY e.enrolled_at, u.id",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(CourseDetail::from_parts(row, enrolled_students))
    }

    /// Whole-row replace: provided patch fields win, the rest keep their
    /// stored values. Only the creator may update a course.
    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        id: Uuid,
        requester: Uuid,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = sqlx::query_as::<_, Course>(
            "SELECT id, title, description, content, creator, enrollment_status,
                    created_at, updated_at
             FROM courses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

        if existing.creator != requester {
            return Err(AppError::forbidden(
                "Only the course creator can update this course",
            ));
        }

        let title = dto
            .title
            .map(|t| t.trim().to_string())
            .unwrap_or(existing.title);
        let description = dto
            .description
            .map(|d| d.trim().to_string())
            .unwrap_or(existing.description);
        let content = dto.content.map(Json).unwrap_or(existing.content);
        let enrollment_status = dto.enrollment_status.unwrap_or(existing.enrollment_status);

        let updated = sqlx::query_as::<_, Course>(
            "UPDATE courses
             SET title = $1, description = $2, content = $3, enrollment_status = $4,
                 updated_at = now()
             WHERE id = $5
             RETURNING id, title, description, content, creator, enrollment_status,
                       created_at, updated_at",
        )
        .bind(&title)
        .bind(&description)
        .bind(content)
        .bind(enrollment_status)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(updated)
    }

    /// Enrolls a user into a course.
    ///
    /// The original two-sided mutation is a single row here, so the duplicate
    /// check and the write are one atomic statement: concurrent attempts for
    /// the same (course, user) pair race to exactly one winner, and there is
    /// no partial state to reconcile.
    #[instrument(skip(db))]
    pub async fn enroll_course(
        db: &PgPool,
        course_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let course_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM courses WHERE id = $1)")
                .bind(course_id)
                .fetch_one(db)
                .await?;
        if !course_exists {
            return Err(AppError::not_found("Course not found"));
        }

        let user_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(db)
                .await?;
        if !user_exists {
            return Err(AppError::not_found("User not found"));
        }

        sqlx::query("INSERT INTO enrollments (course_id, user_id) VALUES ($1, $2)")
            .bind(course_id)
            .bind(user_id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::conflict("Already enrolled in this course");
                    }
                    // Entity vanished between the existence check and the
                    // insert; surface it the same way as a failed lookup.
                    if db_err.is_foreign_key_violation() {
                        return AppError::not_found("Course not found");
                    }
                }
                AppError::from(e)
            })?;

        Ok(())
    }
}

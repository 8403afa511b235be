mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use common::{create_test_course, create_test_user, get, login, post_json, setup_test_app};
use learnx::modules::auth::model::UserRole;

async fn linkage_count(pool: &PgPool, course_id: &str, user_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM enrollments WHERE course_id = $1 AND user_id = $2",
    )
    .bind(Uuid::parse_str(course_id).unwrap())
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn student_can_enroll_once(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let teacher_token = login(&app, &teacher.email, &teacher.password).await;
    let student_token = login(&app, &student.email, &student.password).await;
    let course = create_test_course(&app, &teacher_token, "Rust Basics").await;
    let course_id = course["id"].as_str().unwrap();

    let (status, body) = post_json(
        &app,
        &format!("/api/courses/enroll/{course_id}"),
        json!({}),
        Some(&student_token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(linkage_count(&pool, course_id, student.id).await, 1);

    // The enrolled student shows up in the course detail, as name and email.
    let (_, detail) = get(&app, &format!("/api/courses/search/{course_id}")).await;
    let students = detail["enrolledStudents"].as_array().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["email"], student.email.as_str());
}

#[sqlx::test(migrations = "./migrations")]
async fn second_enrollment_conflicts_and_keeps_one_linkage(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let teacher_token = login(&app, &teacher.email, &teacher.password).await;
    let student_token = login(&app, &student.email, &student.password).await;
    let course = create_test_course(&app, &teacher_token, "Rust Basics").await;
    let course_id = course["id"].as_str().unwrap();
    let uri = format!("/api/courses/enroll/{course_id}");

    let (first, _) = post_json(&app, &uri, json!({}), Some(&student_token)).await;
    let (second, body) = post_json(&app, &uri, json!({}), Some(&student_token)).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Already enrolled in this course");
    assert_eq!(linkage_count(&pool, course_id, student.id).await, 1);

    let (_, detail) = get(&app, &format!("/api/courses/search/{course_id}")).await;
    assert_eq!(detail["enrolledStudents"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn enrolling_into_missing_course_is_not_found(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_user(&pool, UserRole::Student).await;
    let token = login(&app, &student.email, &student.password).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/courses/enroll/{}", Uuid::new_v4()),
        json!({}),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn enrollment_requires_a_token(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = post_json(
        &app,
        &format!("/api/courses/enroll/{}", Uuid::new_v4()),
        json!({}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn teachers_can_enroll_too(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let other_teacher = create_test_user(&pool, UserRole::Teacher).await;
    let creator_token = login(&app, &teacher.email, &teacher.password).await;
    let other_token = login(&app, &other_teacher.email, &other_teacher.password).await;
    let course = create_test_course(&app, &creator_token, "Pedagogy").await;

    let (status, _) = post_json(
        &app,
        &format!("/api/courses/enroll/{}", course["id"].as_str().unwrap()),
        json!({}),
        Some(&other_token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_enrollments_have_exactly_one_winner(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let teacher_token = login(&app, &teacher.email, &teacher.password).await;
    let student_token = login(&app, &student.email, &student.password).await;
    let course = create_test_course(&app, &teacher_token, "Concurrency 101").await;
    let course_id = course["id"].as_str().unwrap().to_string();

    let mut handles = Vec::new();
    for _ in 0..5 {
        let app = app.clone();
        let uri = format!("/api/courses/enroll/{course_id}");
        let token = student_token.clone();
        handles.push(tokio::spawn(async move {
            post_json(&app, &uri, json!({}), Some(&token)).await.0
        }));
    }

    let mut ok = 0;
    let mut conflict = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflict += 1,
            status => panic!("unexpected status: {status}"),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(conflict, 4);
    assert_eq!(linkage_count(&pool, &course_id, student.id).await, 1);
}

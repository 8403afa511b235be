use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Account role. `Admin` passes every teacher gate but cannot be registered
/// through the API; admin accounts are seeded by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
}

/// Decoded token payload. `sub` carries the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

/// Internal user row including the password hash. Never serialized into a
/// response; the public shape is [`RegisteredUser`].
#[derive(Debug, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(custom(function = "registerable_role"))]
    pub role: UserRole,
    #[validate(range(min = 13, max = 100, message = "age must be between 13 and 100"))]
    pub age: i32,
}

fn registerable_role(role: &UserRole) -> Result<(), ValidationError> {
    match role {
        UserRole::Teacher | UserRole::Student => Ok(()),
        UserRole::Admin => {
            let mut error = ValidationError::new("registerable_role");
            error.message = Some("must be teacher or student".into());
            Err(error)
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Public user shape returned from registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub token: String,
    pub user: RegisteredUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub role: UserRole,
    pub id: Uuid,
}

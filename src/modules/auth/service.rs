use sqlx::PgPool;
use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{
    LoginRequest, LoginResponse, RegisterRequestDto, RegisterResponse, RegisteredUser, UserRecord,
};

pub struct AuthService;

impl AuthService {
    /// Registers a new user and issues a token.
    ///
    /// Email uniqueness rides on the store's unique constraint, so two
    /// concurrent registrations for the same address race to a single
    /// winner; there is no check-then-insert window.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn register_user(
        db: &PgPool,
        dto: RegisterRequestDto,
        jwt_config: &JwtConfig,
    ) -> Result<RegisterResponse, AppError> {
        let email = dto.email.trim().to_lowercase();
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (name, email, password, role, age)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, email, password, role",
        )
        .bind(&dto.name)
        .bind(&email)
        .bind(&hashed_password)
        .bind(dto.role)
        .bind(dto.age)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict("Email already exists");
                }
            }
            AppError::from(e)
        })?;

        let token = create_token(user.id, &user.email, user.role, jwt_config)?;

        Ok(RegisterResponse {
            token,
            user: RegisteredUser {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
            },
        })
    }

    /// Verifies credentials and issues a token.
    ///
    /// A missing account and a wrong password produce the same error, so the
    /// response does not reveal which part was wrong.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let email = dto.email.trim().to_lowercase();

        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, name, email, password, role FROM users WHERE email = $1",
        )
        .bind(&email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        let is_valid = verify_password(dto.password.trim(), &user.password)?;
        if !is_valid {
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        let token = create_token(user.id, &user.email, user.role, jwt_config)?;

        Ok(LoginResponse {
            token,
            email: user.email,
            role: user.role,
            id: user.id,
        })
    }
}

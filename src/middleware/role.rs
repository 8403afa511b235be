use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rejects the request unless the authenticated user holds one of the
/// allowed roles. Authentication necessarily runs first: the token is
/// verified before any role is inspected, so a missing or invalid token is a
/// 401 and a wrong role is a 403.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: Vec<UserRole>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, &allowed_roles)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Route layer for course writes: teachers pass, admins pass as well.
pub async fn require_teacher(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(
        State(state),
        req,
        next,
        vec![UserRole::Teacher, UserRole::Admin],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Role check against already-extracted claims, for use inside handlers.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&auth_user.role()) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles,
            auth_user.role()
        )));
    }

    Ok(())
}

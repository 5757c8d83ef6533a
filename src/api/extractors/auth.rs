use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tracing::Span;

/// Identity forwarded by the authenticating gateway. The gateway has
/// already verified the user; this service trusts the headers as-is.
const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Teacher,
    Student,
}

#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts.headers.get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let role = match parts.headers.get(USER_ROLE_HEADER).and_then(|v| v.to_str().ok()) {
            Some("teacher") => Role::Teacher,
            Some("student") => Role::Student,
            _ => return Err(StatusCode::UNAUTHORIZED),
        };

        Span::current().record("user_id", id);

        Ok(AuthUser { id, role })
    }
}

/// An authenticated user holding the teacher role.
pub struct AuthTeacher(pub i64);

impl<S> FromRequestParts<S> for AuthTeacher
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Teacher {
            return Err(StatusCode::FORBIDDEN);
        }
        Ok(AuthTeacher(user.id))
    }
}

/// An authenticated user holding the student role.
pub struct AuthStudent(pub i64);

impl<S> FromRequestParts<S> for AuthStudent
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Student {
            return Err(StatusCode::FORBIDDEN);
        }
        Ok(AuthStudent(user.id))
    }
}

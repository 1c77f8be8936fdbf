//! Users API handlers.
//!
//! ```text
//! GET /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::ProfileView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Public profile fields.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileBody {
    /// Identity-provider user id.
    #[schema(example = "user_2abc")]
    pub id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada")]
    pub name: String,
    #[schema(example = "contributor")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileView> for UserProfileBody {
    fn from(value: ProfileView) -> Self {
        Self {
            id: value.id.into(),
            email: value.email.into(),
            name: value.name.into(),
            role: value.role.as_str().to_owned(),
            created_at: value.created_at,
        }
    }
}

/// Response envelope for `GET /users/me`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentUserResponseBody {
    pub success: bool,
    pub user: UserProfileBody,
}

/// Return the authenticated caller's profile.
///
/// Served from the profile cache when fresh; a first request with email
/// claims creates the local account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "No local account", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("BearerAuth" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
) -> ApiResult<HttpResponse> {
    let profile = state.profile.fetch_profile(&identity.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "private, no-cache, must-revalidate"))
        .json(CurrentUserResponseBody {
            success: true,
            user: profile.into(),
        }))
}

#[cfg(test)]
mod tests;

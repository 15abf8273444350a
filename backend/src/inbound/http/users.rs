//! Users API handlers.
//!
//! ```text
//! POST /users {"login":"alice","password":"secretpw","firstName":"Alice",...}
//! PATCH /users/{id} {"login":"alice","firstName":"Alice",...}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Error, UserCandidate, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FIRST_NAME, LAST_NAME, PASSWORD, missing_field_error, parse_birthday, parse_gender,
    parse_login, parse_name, parse_password, parse_user_id,
};

/// Registration and profile update request body.
///
/// `password` is required for `POST /users` and optional for
/// `PATCH /users/{id}`, where omitting it keeps the current password.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[schema(example = "alice")]
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "secretpw", min_length = 8)]
    pub password: Option<String>,
    #[schema(example = "Alice")]
    pub first_name: String,
    #[schema(example = "Liddell")]
    pub last_name: String,
    #[schema(example = "female")]
    pub gender: String,
    #[schema(example = "1990-05-04", format = "date")]
    pub birthday: String,
}

impl UserRequest {
    fn into_candidate(self, password_required: bool) -> Result<UserCandidate, Error> {
        let Self {
            login,
            password,
            first_name,
            last_name,
            gender,
            birthday,
        } = self;
        let password = match password {
            Some(raw) => Some(parse_password(raw)?),
            None if password_required => return Err(missing_field_error(PASSWORD)),
            None => None,
        };
        Ok(UserCandidate {
            login: parse_login(&login)?,
            password,
            profile: UserProfile {
                first_name: parse_name(&first_name, FIRST_NAME)?,
                last_name: parse_name(&last_name, LAST_NAME)?,
                gender: parse_gender(&gender)?,
                birthday: parse_birthday(&birthday)?,
            },
        })
    }
}

/// Success marker returned by mutating user endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StatusResponse {
    #[schema(example = "success")]
    pub status: String,
}

impl StatusResponse {
    pub(crate) fn success() -> Self {
        Self {
            status: "success".to_owned(),
        }
    }
}

/// Register a new user.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::inbound::http::users::create_user;
///
/// let app = App::new().service(create_user);
/// ```
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User registered", body = StatusResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Login already taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let candidate = payload.into_inner().into_candidate(true)?;
    let id = state.users.create(candidate).await?;
    debug!(user_id = %id, "registration accepted");
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/users/{id}")))
        .json(StatusResponse::success()))
}

/// Update the signed-in user's profile.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = StatusResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 409, description = "Login already taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<StatusResponse>> {
    let id = parse_user_id(&path.into_inner())?;
    session.require_owner(&id)?;
    let candidate = payload.into_inner().into_candidate(false)?;
    state.users.update(&id, candidate).await?;
    Ok(web::Json(StatusResponse::success()))
}

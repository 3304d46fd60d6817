//! User administration API handlers.
//!
//! ```text
//! POST   /api/v1/login          {"username":"admin","password":"password"}
//! GET    /api/v1/users
//! GET    /api/v1/users/create
//! POST   /api/v1/users
//! GET    /api/v1/users/{id}
//! GET    /api/v1/users/{id}/edit
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{AccessCatalog, CreateUserRequest, EditForm, UpdateUserRequest};
use crate::domain::{
    Error, LoginCredentials, LoginValidationError, PermissionId, RoleId, User, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Submitted username.
    pub username: String,
    /// Submitted password.
    pub password: String,
}

/// Create request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    /// Account name.
    pub name: String,
    /// Account email address.
    pub email: String,
    /// Roles to assign at creation.
    #[serde(default)]
    pub role_ids: Vec<RoleId>,
    /// Permissions to grant directly at creation.
    #[serde(default)]
    pub permission_ids: Vec<PermissionId>,
}

impl From<CreateUserBody> for CreateUserRequest {
    fn from(body: CreateUserBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            role_ids: body.role_ids,
            permission_ids: body.permission_ids,
        }
    }
}

/// Update request body for `PUT /api/v1/users/{id}`. Absent fields are
/// left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserBody {
    /// Replacement account name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<UpdateUserBody> for UpdateUserRequest {
    fn from(body: UpdateUserBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&payload.username, &payload.password)
        .map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_actor(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// List users visible to the acting administrator.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users in creation order", body = [User]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<User>>> {
    let actor = session.require_actor()?;
    let users = state.query.list_users(&actor).await?;
    Ok(web::Json(users))
}

/// Role and permission catalogues for the create form.
#[utoipa::path(
    get,
    path = "/api/v1/users/create",
    responses(
        (status = 200, description = "Catalogues for assignment pick lists", body = AccessCatalog),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "viewCreateForm"
)]
#[get("/users/create")]
pub async fn create_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AccessCatalog>> {
    let actor = session.require_actor()?;
    let catalog = state.query.create_form(&actor).await?;
    Ok(web::Json(catalog))
}

/// Create a user with a generated one-time password.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "Created user", body = User),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown role or permission id", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let created = state
        .command
        .create_user(&actor, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "viewUser"
)]
#[get("/users/{id}")]
pub async fn view_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<User>> {
    let actor = session.require_actor()?;
    let id = UserId::from_uuid(path.into_inner());
    let user = state.query.view_user(&actor, &id).await?;
    Ok(web::Json(user))
}

/// Edit form payload: the user, the catalogues, and current assignments.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/edit",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Edit form payload", body = EditForm),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "viewEditForm"
)]
#[get("/users/{id}/edit")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<EditForm>> {
    let actor = session.require_actor()?;
    let id = UserId::from_uuid(path.into_inner());
    let form = state.query.edit_form(&actor, &id).await?;
    Ok(web::Json(form))
}

/// Partially update a user's name and/or email.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<User>> {
    let actor = session.require_actor()?;
    let id = UserId::from_uuid(path.into_inner());
    let updated = state
        .command
        .update_user(&actor, &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(updated))
}

/// Delete a user and its assignment links.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User removed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let id = UserId::from_uuid(path.into_inner());
    state.command.delete_user(&actor, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

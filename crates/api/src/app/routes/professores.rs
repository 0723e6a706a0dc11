use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use escola_core::{ProfessorId, UserId};

use crate::app::dto;
use crate::app::errors::{ApiError, PROFESSOR_NOT_FOUND, USER_NOT_FOUND};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

const PROFESSOR_DELETED: &str = "Professor deletado";

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_professores).post(create_professor))
        .route(
            "/:id",
            get(get_professor)
                .put(update_professor)
                .delete(delete_professor),
        )
        .route("/user/:user_id", get(list_professores_by_user))
}

pub async fn list_professores(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<impl IntoResponse, ApiError> {
    let items = services.professores.list_all().await?;
    Ok((StatusCode::OK, Json(items)))
}

pub async fn get_professor(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    // An unparseable id cannot name a stored record.
    let id: ProfessorId = id
        .parse()
        .map_err(|_| ApiError::not_found(PROFESSOR_NOT_FOUND))?;

    match services.professores.get_by_id(id).await? {
        Some(professor) => Ok((StatusCode::OK, Json(professor))),
        None => Err(ApiError::not_found(PROFESSOR_NOT_FOUND)),
    }
}

pub async fn create_professor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateProfessorRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::validation(e.body_text()))?;
    let new = body
        .into_new_professor()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let professor = services
        .professores
        .create(new)
        .await
        .map_err(|e| ApiError::from(e).into_validation())?;

    tracing::info!(
        id = %professor.id,
        user_ref = %professor.user_ref,
        actor = %principal.user_id(),
        "professor created"
    );
    Ok((StatusCode::CREATED, Json(professor)))
}

pub async fn update_professor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateProfessorRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id: ProfessorId = id
        .parse()
        .map_err(|_| ApiError::not_found(PROFESSOR_NOT_FOUND))?;
    // Only create reports client errors; an unusable update is a fault.
    let Json(body) = body.map_err(|e| ApiError::fault(e.body_text()))?;
    let patch = body
        .into_patch()
        .map_err(|e| ApiError::fault(e.to_string()))?;

    match services.professores.update_by_id(id, patch).await? {
        Some(professor) => {
            tracing::info!(%id, actor = %principal.user_id(), "professor updated");
            Ok((StatusCode::OK, Json(professor)))
        }
        None => Err(ApiError::not_found(PROFESSOR_NOT_FOUND)),
    }
}

/// Always 200, whether or not the record existed.
pub async fn delete_professor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if let Ok(id) = id.parse::<ProfessorId>() {
        let removed = services.professores.delete_by_id(id).await?;
        tracing::info!(%id, removed, actor = %principal.user_id(), "professor delete");
    }

    Ok((
        StatusCode::OK,
        Json(dto::MessageResponse {
            message: PROFESSOR_DELETED,
        }),
    ))
}

/// Owner existence is checked first; no professor query runs for an unknown user.
pub async fn list_professores_by_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = user_id
        .parse()
        .map_err(|_| ApiError::not_found(USER_NOT_FOUND))?;

    if services.users.find_by_id(user_id).await?.is_none() {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }

    let items = services.professores.find_by_user(user_id).await?;
    Ok((StatusCode::OK, Json(items)))
}

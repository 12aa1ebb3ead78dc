use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use tracing::error;
use uuid::Uuid;

use crate::{
    application::usecases::recipients::RecipientsUseCase,
    domain::{
        repositories::recipients::RecipientRepository,
        value_objects::recipients::{CreateRecipientModel, UpdateRecipientModel},
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        postgres::{postgres_connection::PgPool, repositories::recipients::RecipientPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let usecase = RecipientsUseCase::new(Arc::new(RecipientPostgres::new(db_pool)));

    Router::new()
        .route("/", post(create_recipient))
        .route("/", get(list_recipients))
        .route("/:recipient_id", put(update_recipient))
        .route("/:recipient_id", delete(delete_recipient))
        .with_state(Arc::new(usecase))
}

pub async fn create_recipient<R>(
    State(usecase): State<Arc<RecipientsUseCase<R>>>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateRecipientModel>,
) -> impl IntoResponse
where
    R: RecipientRepository + Send + Sync + 'static,
{
    match usecase.create(&user, body).await {
        Ok(recipient_id) => (StatusCode::CREATED, Json(recipient_id)).into_response(),
        Err(err) => {
            error!(user_id = %user.user_id, error = ?err, "recipients: failed to create");
            (err.status_code(), err.to_string()).into_response()
        }
    }
}

pub async fn list_recipients<R>(
    State(usecase): State<Arc<RecipientsUseCase<R>>>,
    AuthUser(user): AuthUser,
) -> impl IntoResponse
where
    R: RecipientRepository + Send + Sync + 'static,
{
    match usecase.list(&user).await {
        Ok(recipients) => Json(recipients).into_response(),
        Err(err) => {
            error!(user_id = %user.user_id, error = ?err, "recipients: failed to list");
            (err.status_code(), err.to_string()).into_response()
        }
    }
}

pub async fn update_recipient<R>(
    State(usecase): State<Arc<RecipientsUseCase<R>>>,
    AuthUser(user): AuthUser,
    Path(recipient_id): Path<Uuid>,
    Json(body): Json<UpdateRecipientModel>,
) -> impl IntoResponse
where
    R: RecipientRepository + Send + Sync + 'static,
{
    match usecase.update(&user, recipient_id, body).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!(%recipient_id, error = ?err, "recipients: failed to update");
            (err.status_code(), err.to_string()).into_response()
        }
    }
}

pub async fn delete_recipient<R>(
    State(usecase): State<Arc<RecipientsUseCase<R>>>,
    AuthUser(user): AuthUser,
    Path(recipient_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: RecipientRepository + Send + Sync + 'static,
{
    match usecase.delete(&user, recipient_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!(%recipient_id, error = ?err, "recipients: failed to delete");
            (err.status_code(), err.to_string()).into_response()
        }
    }
}

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
    application::usecases::messages::MessagesUseCase,
    domain::{
        repositories::messages::MessageRepository,
        value_objects::messages::{CreateMessageModel, UpdateMessageModel},
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        postgres::{postgres_connection::PgPool, repositories::messages::MessagePostgres},
    },
};

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let usecase = MessagesUseCase::new(Arc::new(MessagePostgres::new(db_pool)));

    Router::new()
        .route("/", post(create_message))
        .route("/", get(list_messages))
        .route("/:message_id", put(update_message))
        .route("/:message_id", delete(delete_message))
        .with_state(Arc::new(usecase))
}

pub async fn create_message<G>(
    State(usecase): State<Arc<MessagesUseCase<G>>>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateMessageModel>,
) -> impl IntoResponse
where
    G: MessageRepository + Send + Sync + 'static,
{
    match usecase.create(&user, body).await {
        Ok(message_id) => (StatusCode::CREATED, Json(message_id)).into_response(),
        Err(err) => {
            error!(user_id = %user.user_id, error = ?err, "messages: failed to create");
            (err.status_code(), err.to_string()).into_response()
        }
    }
}

pub async fn list_messages<G>(
    State(usecase): State<Arc<MessagesUseCase<G>>>,
    AuthUser(user): AuthUser,
) -> impl IntoResponse
where
    G: MessageRepository + Send + Sync + 'static,
{
    match usecase.list(&user).await {
        Ok(messages) => Json(messages).into_response(),
        Err(err) => {
            error!(user_id = %user.user_id, error = ?err, "messages: failed to list");
            (err.status_code(), err.to_string()).into_response()
        }
    }
}

pub async fn update_message<G>(
    State(usecase): State<Arc<MessagesUseCase<G>>>,
    AuthUser(user): AuthUser,
    Path(message_id): Path<Uuid>,
    Json(body): Json<UpdateMessageModel>,
) -> impl IntoResponse
where
    G: MessageRepository + Send + Sync + 'static,
{
    match usecase.update(&user, message_id, body).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!(%message_id, error = ?err, "messages: failed to update");
            (err.status_code(), err.to_string()).into_response()
        }
    }
}

pub async fn delete_message<G>(
    State(usecase): State<Arc<MessagesUseCase<G>>>,
    AuthUser(user): AuthUser,
    Path(message_id): Path<Uuid>,
) -> impl IntoResponse
where
    G: MessageRepository + Send + Sync + 'static,
{
    match usecase.delete(&user, message_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!(%message_id, error = ?err, "messages: failed to delete");
            (err.status_code(), err.to_string()).into_response()
        }
    }
}

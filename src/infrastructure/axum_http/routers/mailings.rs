use std::sync::Arc;

use anyhow::Result;
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
    application::{
        ports::{
            cache::Cache,
            clock::{Clock, SystemClock},
            mail_transport::MailTransport,
        },
        usecases::{
            dispatch::DispatchUseCase,
            mailings::{MailingError, MailingsUseCase},
        },
    },
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            mailing_attempts::MailingAttemptRepository, mailings::MailingRepository,
            messages::MessageRepository,
        },
        value_objects::mailings::{CreateMailingModel, UpdateMailingModel},
    },
    infrastructure::{
        axum_http::auth::{AuthUser, MaybeAuthUser},
        cache::memory::MemoryCache,
        postgres::{
            postgres_connection::PgPool,
            repositories::{
                mailing_attempts::MailingAttemptPostgres, mailings::MailingPostgres,
                messages::MessagePostgres,
            },
        },
        smtp::smtp_mailer::SmtpMailer,
    },
};

pub fn routes(
    db_pool: Arc<PgPool>,
    config: Arc<DotEnvyConfig>,
    cache: Arc<MemoryCache>,
) -> Result<Router> {
    let clock = Arc::new(SystemClock);

    let crud_usecase = MailingsUseCase::new(
        Arc::new(MailingPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MailingAttemptPostgres::new(Arc::clone(&db_pool))),
        Arc::clone(&cache),
        Arc::clone(&clock),
    );

    let dispatch_usecase = DispatchUseCase::new(
        Arc::new(MailingPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MessagePostgres::new(Arc::clone(&db_pool))),
        Arc::new(MailingAttemptPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SmtpMailer::new(&config.smtp)?),
        Arc::clone(&clock),
        config.smtp.from_address.clone(),
    );

    let crud_routes = Router::new()
        .route("/", post(create_mailing))
        .route("/", get(list_mailings))
        .route("/:mailing_id", get(get_mailing))
        .route("/:mailing_id", put(update_mailing))
        .route("/:mailing_id", delete(delete_mailing))
        .route("/:mailing_id/attempts", get(list_attempts))
        .with_state(Arc::new(crud_usecase));

    let send_routes = Router::new()
        .route("/:mailing_id/send", post(send_mailing))
        .with_state(Arc::new(dispatch_usecase));

    Ok(Router::new().merge(crud_routes).merge(send_routes))
}

fn mailing_error_response(err: MailingError) -> axum::response::Response {
    if let MailingError::InvalidSchedule(errors) = &err {
        return (err.status_code(), Json(errors.clone())).into_response();
    }
    (err.status_code(), err.to_string()).into_response()
}

pub async fn create_mailing<M, A, C, K>(
    State(usecase): State<Arc<MailingsUseCase<M, A, C, K>>>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateMailingModel>,
) -> impl IntoResponse
where
    M: MailingRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    match usecase.create(&user, body).await {
        Ok(mailing_id) => (StatusCode::CREATED, Json(mailing_id)).into_response(),
        Err(err) => {
            error!(user_id = %user.user_id, error = ?err, "mailings: failed to create");
            mailing_error_response(err)
        }
    }
}

pub async fn list_mailings<M, A, C, K>(
    State(usecase): State<Arc<MailingsUseCase<M, A, C, K>>>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> impl IntoResponse
where
    M: MailingRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    match usecase.list(user.as_ref()).await {
        Ok(mailings) => Json(mailings).into_response(),
        Err(err) => {
            error!(error = ?err, "mailings: failed to list");
            mailing_error_response(err)
        }
    }
}

pub async fn get_mailing<M, A, C, K>(
    State(usecase): State<Arc<MailingsUseCase<M, A, C, K>>>,
    AuthUser(user): AuthUser,
    Path(mailing_id): Path<Uuid>,
) -> impl IntoResponse
where
    M: MailingRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    match usecase.get_detail(&user, mailing_id).await {
        Ok(mailing) => Json(mailing).into_response(),
        Err(err) => {
            error!(%mailing_id, error = ?err, "mailings: failed to load detail");
            mailing_error_response(err)
        }
    }
}

pub async fn update_mailing<M, A, C, K>(
    State(usecase): State<Arc<MailingsUseCase<M, A, C, K>>>,
    AuthUser(user): AuthUser,
    Path(mailing_id): Path<Uuid>,
    Json(body): Json<UpdateMailingModel>,
) -> impl IntoResponse
where
    M: MailingRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    match usecase.update(&user, mailing_id, body).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!(%mailing_id, error = ?err, "mailings: failed to update");
            mailing_error_response(err)
        }
    }
}

pub async fn delete_mailing<M, A, C, K>(
    State(usecase): State<Arc<MailingsUseCase<M, A, C, K>>>,
    AuthUser(user): AuthUser,
    Path(mailing_id): Path<Uuid>,
) -> impl IntoResponse
where
    M: MailingRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    match usecase.delete(&user, mailing_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!(%mailing_id, error = ?err, "mailings: failed to delete");
            mailing_error_response(err)
        }
    }
}

pub async fn list_attempts<M, A, C, K>(
    State(usecase): State<Arc<MailingsUseCase<M, A, C, K>>>,
    AuthUser(user): AuthUser,
    Path(mailing_id): Path<Uuid>,
) -> impl IntoResponse
where
    M: MailingRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    match usecase.list_attempts(&user, mailing_id).await {
        Ok(attempts) => Json(attempts).into_response(),
        Err(err) => {
            error!(%mailing_id, error = ?err, "mailings: failed to list attempts");
            mailing_error_response(err)
        }
    }
}

pub async fn send_mailing<M, G, A, T, K>(
    State(usecase): State<Arc<DispatchUseCase<M, G, A, T, K>>>,
    AuthUser(user): AuthUser,
    Path(mailing_id): Path<Uuid>,
) -> impl IntoResponse
where
    M: MailingRepository + Send + Sync + 'static,
    G: MessageRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    T: MailTransport + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    match usecase.send_now(&user, mailing_id).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            error!(%mailing_id, user_id = %user.user_id, error = ?err, "mailings: send failed");
            mailing_error_response(err)
        }
    }
}

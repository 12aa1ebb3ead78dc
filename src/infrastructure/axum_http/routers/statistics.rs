use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use tracing::error;

use crate::{
    application::{
        ports::{
            cache::Cache,
            clock::{Clock, SystemClock},
        },
        usecases::statistics::StatisticsUseCase,
    },
    domain::repositories::{
        mailing_attempts::MailingAttemptRepository, mailings::MailingRepository,
        recipients::RecipientRepository,
    },
    infrastructure::{
        axum_http::auth::MaybeAuthUser,
        cache::memory::MemoryCache,
        postgres::{
            postgres_connection::PgPool,
            repositories::{
                mailing_attempts::MailingAttemptPostgres, mailings::MailingPostgres,
                recipients::RecipientPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPool>, cache: Arc<MemoryCache>) -> Router {
    let usecase = StatisticsUseCase::new(
        Arc::new(MailingPostgres::new(Arc::clone(&db_pool))),
        Arc::new(RecipientPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MailingAttemptPostgres::new(Arc::clone(&db_pool))),
        cache,
        Arc::new(SystemClock),
    );

    Router::new()
        .route("/", get(get_user_stats))
        .with_state(Arc::new(usecase))
}

pub async fn get_user_stats<M, R, A, C, K>(
    State(usecase): State<Arc<StatisticsUseCase<M, R, A, C, K>>>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> impl IntoResponse
where
    M: MailingRepository + Send + Sync + 'static,
    R: RecipientRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    match usecase.get_user_stats(user.as_ref()).await {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => {
            error!(error = ?err, "statistics: failed to load user stats");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load statistics".to_string(),
            )
                .into_response()
        }
    }
}

use axum::{
    http::{header::CONTENT_TYPE, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    serve::Serve,
    Json, Router,
};

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{collections::BTreeMap, error::Error};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

use domain::PlanningAPIError;
pub mod routes;
use crate::utils::{constants::GROUP_HEADER, tracing::*};
use routes::{
    planning::{
        get_assignments, get_planning, make_planning_cycle,
        upsert_planning_entry, validate_planning_cycle,
        validate_planning_entry,
    },
    projects::{get_project, list_projects, upsert_project},
};
pub mod app_state;
pub mod domain;
pub mod services;
use app_state::AppState;
pub mod utils;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for PlanningAPIError {
    fn into_response(self) -> Response {
        let mut messages = None;
        let (status, error_message) = match &self {
            PlanningAPIError::InvalidForm(errors) => {
                log_error_chain(&self, Level::DEBUG);
                messages = Some(form_messages(errors));
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            PlanningAPIError::ValidationError(message) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, message.as_ref().to_owned())
            }
            PlanningAPIError::MultipleAssignmentNotAllowed
            | PlanningAPIError::EmployeesNotFound
            | PlanningAPIError::EmployeeNotEligible
            | PlanningAPIError::ArchivedProject
            | PlanningAPIError::StartAfterEnd
            | PlanningAPIError::UnknownRotationFrequency(_)
            | PlanningAPIError::MissingGroup => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            PlanningAPIError::GroupNotFound(_)
            | PlanningAPIError::IDNotFoundError(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::NOT_FOUND, self.to_string())
            }
            PlanningAPIError::IDExistsError(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::CONFLICT, self.to_string())
            }
            PlanningAPIError::Cancelled | PlanningAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
            messages,
        });
        (status, body).into_response()
    }
}

/// Field name to messages. Falls back to the failed rule's code when the
/// rule carries no message.
fn form_messages(
    errors: &validator::ValidationErrors,
) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => error.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

pub struct Application {
    server: Serve<Router, Router>,
    pub address: String,
}

impl Application {
    pub async fn build(
        app_state: AppState,
        address: &str,
    ) -> Result<Self, Box<dyn Error>> {
        let allowed_origins = [
            "http://localhost:3000".parse()?,
            "http://127.0.0.1:3000".parse()?,
        ];

        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE, HeaderName::from_static(GROUP_HEADER)])
            .allow_credentials(true)
            .allow_origin(allowed_origins);

        let router = Router::new()
            .route("/projects", get(list_projects).post(upsert_project))
            .route("/projects/:project_id", get(get_project))
            .route(
                "/projects/:project_id/planning",
                get(get_planning).post(upsert_planning_entry),
            )
            .route(
                "/projects/:project_id/planning/validate",
                post(validate_planning_entry),
            )
            .route(
                "/projects/:project_id/planning/cycle",
                post(make_planning_cycle),
            )
            .route(
                "/projects/:project_id/planning/cycle/validate",
                post(validate_planning_cycle),
            )
            .route(
                "/planning/assignments/:employee_id",
                get(get_assignments),
            )
            .with_state(app_state)
            .layer(cors)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            );

        let listener = tokio::net::TcpListener::bind(address).await?;
        let address = listener.local_addr()?.to_string();
        let server = axum::serve(listener, router);

        Ok(Application { server, address })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.server.with_graceful_shutdown(shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

pub async fn get_postgres_pool(
    url: &Secret<String>,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(url.expose_secret())
        .await
}

//! Shared types and HTTP API for the folio server.
//!
//! The public surface is two routes resolving a share token — an HTML page
//! and a JSON view model — plus a small owner-side admin API for managing
//! the share link. Both public routes fail closed: any negative or
//! erroneous resolution outcome is a uniform 404.

pub mod shell;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post, put},
};
use folio_model::{ProfileData, SectionData, ShareBackend};
use folio_resolver::{Resolution, ShareLinkManager, ShareLinkStatus, ViewRecorder, resolve};
use folio_types::{OwnerId, ShareToken};
use serde::{Deserialize, Serialize};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::error;

use shell::{ROBOTS_DIRECTIVE, ShellState};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ShareBackend>,
    pub manager: Arc<ShareLinkManager>,
    /// The single owner this deployment serves. Authentication of the
    /// admin surface is outside this service.
    pub owner: OwnerId,
}

/// JSON body of a successfully resolved share.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SharedPortfolioBody {
    pub profile: ProfileData,
    pub sections: Vec<SectionData>,
}

/// JSON body for the unified negative outcome.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NotFoundBody {
    pub error: String,
}

impl NotFoundBody {
    fn new() -> Self {
        Self {
            error: "not found".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// Build the HTTP API router with the given application state.
///
/// The shared routes carry an `X-Robots-Tag` header on every response,
/// whatever the outcome: applying the directive as a layer on the
/// sub-router means no handler, error path included, can exit without it.
pub fn build_router(state: AppState) -> Router {
    let robots = SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-robots-tag"),
        HeaderValue::from_static(ROBOTS_DIRECTIVE),
    );

    let shared = Router::new()
        .route("/shared/{token}", get(shared_page))
        .route("/api/v1/shared/{token}", get(shared_view_model))
        .layer(robots);

    let admin = Router::new()
        .route("/api/v1/share", get(share_status))
        .route("/api/v1/share/rotate", post(share_rotate))
        .route("/api/v1/share/active", put(share_set_active));

    shared.merge(admin).with_state(state)
}

fn client_metadata(headers: &HeaderMap) -> (String, String) {
    let referrer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    (referrer, user_agent)
}

/// The shared portfolio page.
async fn shared_page(
    Path(token): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let shell = match ShareToken::parse(&token) {
        Err(_) => ShellState::Invalid,
        Ok(token) => {
            let resolution = resolve(state.backend.as_ref(), token.as_str()).await;
            if resolution.is_ready() {
                // Exactly one recorder per page load; rendering never
                // waits on the write.
                let (referrer, user_agent) = client_metadata(&headers);
                let recorder = ViewRecorder::new();
                recorder.record_once(state.backend.clone(), &token, &referrer, &user_agent);
            }
            ShellState::from_resolution(resolution)
        }
    };

    (shell.status_code(), Html(shell.render())).into_response()
}

/// The shared portfolio as a JSON view model.
///
/// Does not record a view: the page load does that, and a page that
/// consumes this endpoint would otherwise double-count.
async fn shared_view_model(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Response {
    match resolve(state.backend.as_ref(), &token).await {
        Resolution::NotFound => {
            (StatusCode::NOT_FOUND, Json(NotFoundBody::new())).into_response()
        }
        Resolution::Ready { profile, sections } => Json(SharedPortfolioBody {
            profile: profile.sanitized(),
            sections: sections.iter().map(SectionData::sanitized).collect(),
        })
        .into_response(),
    }
}

// ── owner admin surface ───────────────────────────────────────────────

async fn share_status(State(state): State<AppState>) -> Response {
    match state.manager.status(state.owner).await {
        Ok(Some(status)) => Json(status).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Json(NotFoundBody::new())).into_response(),
        Err(err) => internal_error("share status", &err),
    }
}

async fn share_rotate(State(state): State<AppState>) -> Response {
    match state.manager.rotate(state.owner).await {
        Ok(status) => Json::<ShareLinkStatus>(status).into_response(),
        Err(err) => internal_error("share rotate", &err),
    }
}

async fn share_set_active(
    State(state): State<AppState>,
    Json(req): Json<SetActiveRequest>,
) -> Response {
    match state.manager.set_active(state.owner, req.active).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => internal_error("share set-active", &err),
    }
}

fn internal_error(operation: &str, err: &folio_model::BackendError) -> Response {
    error!(operation, error = %err, "admin operation failed");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

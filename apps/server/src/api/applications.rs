use std::future::Future;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    sessions::WizardSession,
};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use studentbank_core::applications::{
    DocumentFile, DocumentKind, FieldUpdate, MAX_DOCUMENT_SIZE_BYTES,
};
use studentbank_core::errors::Error as CoreError;
use studentbank_core::notifications::Notice;
use studentbank_core::wizard::{WizardConfig, WizardSnapshot};
use tokio::sync::OwnedMutexGuard;

// Leaves room for multipart framing around a maximum-size document.
const DOCUMENT_BODY_LIMIT: usize = MAX_DOCUMENT_SIZE_BYTES + 1024 * 1024;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WizardResponse {
    session_id: String,
    wizard: WizardSnapshot,
    notices: Vec<Notice>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldUpdates {
    One(FieldUpdate),
    Many(Vec<FieldUpdate>),
}

impl FieldUpdates {
    fn into_vec(self) -> Vec<FieldUpdate> {
        match self {
            FieldUpdates::One(update) => vec![update],
            FieldUpdates::Many(updates) => updates,
        }
    }
}

/// Locks a session for the duration of a request.
///
/// A session already locked by another request is mid-save, so the caller
/// gets a conflict instead of queueing behind it.
fn lock_session(
    state: &AppState,
    session_id: &str,
) -> ApiResult<OwnedMutexGuard<WizardSession>> {
    let session = state
        .sessions
        .get(session_id)
        .ok_or_else(|| ApiError::SessionNotFound(session_id.to_string()))?;
    let mut session = session
        .try_lock_owned()
        .map_err(|_| ApiError::SessionBusy(session_id.to_string()))?;
    session.touch();
    Ok(session)
}

/// Runs a saving operation on its own task.
///
/// The task owns the session lock, so a save that has started always runs to
/// completion and releases the session, even when the client disconnects or
/// the request times out first.
async fn run_to_completion<T>(
    operation: impl Future<Output = ApiResult<T>> + Send + 'static,
) -> ApiResult<T>
where
    T: Send + 'static,
{
    tokio::spawn(operation).await.map_err(|e| {
        ApiError::Core(CoreError::Unexpected(format!(
            "Session task did not complete: {}",
            e
        )))
    })?
}

fn respond<T>(
    session_id: String,
    session: &WizardSession,
    result: studentbank_core::Result<T>,
) -> ApiResult<Json<WizardResponse>> {
    let notices = session.drain_notices();
    match result {
        Ok(_) => Ok(Json(WizardResponse {
            session_id,
            wizard: session.wizard.snapshot(),
            notices,
        })),
        Err(err) => Err(ApiError::from(err).with_notices(notices)),
    }
}

async fn open_application(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<WizardResponse>)> {
    let config = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(
            serde_json::from_slice::<WizardConfig>(&body)
                .map_err(|e| ApiError::BadRequest(format!("Invalid session options: {}", e)))?,
        )
    };

    let (session_id, session) = state.sessions.open(config);
    tracing::info!("Opened wizard session {}", session_id);
    let session = session.lock().await;
    let response = respond(session_id, &session, Ok(()))?;
    Ok((StatusCode::CREATED, response))
}

async fn get_application(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<WizardResponse>> {
    let session = lock_session(&state, &session_id)?;
    respond(session_id, &session, Ok(()))
}

async fn close_application(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.sessions.close(&session_id) {
        return Err(ApiError::SessionNotFound(session_id));
    }
    tracing::info!("Closed wizard session {}", session_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn update_fields(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(updates): Json<FieldUpdates>,
) -> ApiResult<Json<WizardResponse>> {
    let mut session = lock_session(&state, &session_id)?;
    let result = updates
        .into_vec()
        .into_iter()
        .try_for_each(|update| session.wizard.update_field(update));
    respond(session_id, &session, result)
}

async fn advance(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<WizardResponse>> {
    let mut session = lock_session(&state, &session_id)?;
    run_to_completion(async move {
        let result = session.wizard.advance().await;
        respond(session_id, &session, result)
    })
    .await
}

async fn retreat(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<WizardResponse>> {
    let mut session = lock_session(&state, &session_id)?;
    let result = session.wizard.retreat();
    respond(session_id, &session, result)
}

async fn submit(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<WizardResponse>> {
    let mut session = lock_session(&state, &session_id)?;
    run_to_completion(async move {
        let result = session.wizard.submit().await;
        let submitted = match &result {
            Ok(application_id) => {
                tracing::info!(
                    "Session {} submitted application {}",
                    session_id,
                    application_id
                );
                true
            }
            Err(_) => false,
        };
        let response = respond(session_id.clone(), &session, result);
        // Submitted wizards take no further changes.
        if submitted {
            state.sessions.close(&session_id);
        }
        response
    })
    .await
}

async fn attach_document(
    State(state): State<Arc<AppState>>,
    Path((session_id, kind)): Path<(String, DocumentKind)>,
    mut multipart: Multipart,
) -> ApiResult<Json<WizardResponse>> {
    let mut file: Option<DocumentFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file content: {}", e)))?;
        file = Some(DocumentFile::new(file_name, mime_type, bytes.to_vec()));
    }

    let file = file
        .ok_or_else(|| ApiError::BadRequest("Missing file in multipart request".to_string()))?;

    let mut session = lock_session(&state, &session_id)?;
    let result = session.wizard.attach_document(kind, file);
    respond(session_id, &session, result)
}

async fn remove_document(
    State(state): State<Arc<AppState>>,
    Path((session_id, kind)): Path<(String, DocumentKind)>,
) -> ApiResult<Json<WizardResponse>> {
    let mut session = lock_session(&state, &session_id)?;
    let result = session.wizard.remove_document(kind);
    respond(session_id, &session, result)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/applications", post(open_application))
        .route(
            "/applications/{session_id}",
            get(get_application).delete(close_application),
        )
        .route("/applications/{session_id}/fields", patch(update_fields))
        .route("/applications/{session_id}/advance", post(advance))
        .route("/applications/{session_id}/retreat", post(retreat))
        .route("/applications/{session_id}/submit", post(submit))
        .route(
            "/applications/{session_id}/documents/{kind}",
            put(attach_document)
                .delete(remove_document)
                .layer(DefaultBodyLimit::max(DOCUMENT_BODY_LIMIT)),
        )
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use studentbank_core::errors::Error as CoreError;
use studentbank_core::notifications::Notice;
use studentbank_core::wizard::WizardError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Wizard session {0} not found")]
    SessionNotFound(String),
    #[error("Wizard session {0} is busy; a save is in progress")]
    SessionBusy(String),
    #[error("{0}")]
    BadRequest(String),
    /// An error raised while handling a session, with the notices it produced.
    #[error("{error}")]
    WithNotices {
        error: Box<ApiError>,
        notices: Vec<Notice>,
    },
}

impl ApiError {
    /// Attaches notices to the error body. No-op when there are none.
    pub fn with_notices(self, notices: Vec<Notice>) -> Self {
        if notices.is_empty() {
            return self;
        }
        ApiError::WithNotices {
            error: Box::new(self),
            notices,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e {
                CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CoreError::Wizard(WizardError::StepIncomplete { .. })
                | CoreError::Wizard(WizardError::ConsentRequired(_)) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                CoreError::Wizard(WizardError::SaveInProgress) => StatusCode::CONFLICT,
                CoreError::Wizard(WizardError::SubmissionFailed) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                CoreError::Wizard(_) => StatusCode::BAD_REQUEST,
                CoreError::Database(_)
                | CoreError::Upload { .. }
                | CoreError::DocumentStore(_)
                | CoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::SessionBusy(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::WithNotices { error, .. } => error.status(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notices: Vec<Notice>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let message = self.to_string();
        let notices = match self {
            ApiError::WithNotices { notices, .. } => notices,
            _ => Vec::new(),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message,
            notices,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

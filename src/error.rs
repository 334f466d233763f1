use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error as ThisError;
use tracing::error;

/// Error taxonomy surfaced by every operation. Each variant carries the
/// human-readable message returned to the caller; internal store errors are
/// logged and collapsed into `Unavailable`.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unavailable(String),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "not_found",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::Conflict(_) => "conflict",
            Error::Forbidden(_) => "forbidden",
            Error::Unavailable(_) => "unavailable",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    kind: &'static str,
    err: String,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            // the surface reports conflicts as plain bad requests; the
            // `kind` field in the body still tells them apart
            Error::InvalidArgument(_) | Error::Conflict(_) => StatusCode::BAD_REQUEST,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let err = match self {
            Error::Unavailable(msg) => {
                error!("store or runtime failure: {}", msg);
                "service temporarily unavailable".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            kind: self.kind(),
            err,
        })
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Unavailable(format!("database error: {}", err))
    }
}

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::Unavailable(format!("connection pool error: {}", err))
    }
}

impl<E> From<BlockingError<E>> for Error
where
    E: Into<Error> + std::fmt::Debug,
{
    fn from(err: BlockingError<E>) -> Self {
        match err {
            BlockingError::Error(err) => err.into(),
            BlockingError::Canceled => {
                Error::Unavailable("blocking task was canceled".to_string())
            }
        }
    }
}

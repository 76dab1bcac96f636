use poem::http::StatusCode;
use tracing::error;

use crate::domain::errors::DispatchError;

pub fn dispatch_error(err: DispatchError) -> poem::Error {
    let status = match &err {
        DispatchError::ContactNotFound(_) => StatusCode::NOT_FOUND,
        DispatchError::MissingAddress { .. }
        | DispatchError::Validation(_)
        | DispatchError::UnsupportedChannel(_) => StatusCode::BAD_REQUEST,
        DispatchError::Transport(_) => StatusCode::BAD_GATEWAY,
        DispatchError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = ?err, "request failed");
    }
    poem::Error::from_string(err.to_string(), status)
}

pub fn internal_error(err: anyhow::Error) -> poem::Error {
    error!(error = ?err, "request failed");
    poem::Error::from_string(err.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
}

//! Domain errors as HTTP responses.
//!
//! Client mistakes (validation, missing records, conflicts, refused trip
//! transitions, alerts without contacts) go out verbatim with their
//! `details`. Failures raised by a repository or notification adapter carry
//! adapter text, so the response replaces them with a fixed message while
//! the log line keeps the original under the same trace identifier.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";
const UNAVAILABLE_MESSAGE: &str = "storage is temporarily unavailable; please retry";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict | ErrorCode::InvalidState => StatusCode::CONFLICT,
        ErrorCode::NoContacts => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The body a client may see for `error`.
///
/// Adapter failures lose their message and details; the trace id survives
/// so a report can be matched to the server log.
fn client_view(error: &Error) -> Error {
    let public = match error.code() {
        ErrorCode::InternalError => {
            error!(
                trace_id = error.trace_id(),
                message = error.message(),
                "internal failure hidden from client"
            );
            Error::internal(INTERNAL_MESSAGE)
        }
        ErrorCode::ServiceUnavailable => {
            warn!(
                trace_id = error.trace_id(),
                message = error.message(),
                "storage outage reported to client"
            );
            Error::service_unavailable(UNAVAILABLE_MESSAGE)
        }
        _ => return error.clone(),
    };
    match error.trace_id() {
        Some(id) => public.with_trace_id(id.to_owned()),
        None => public,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(client_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_MESSAGE)
    }
}

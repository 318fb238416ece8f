use crate::body::{BoxError, ResponseBody};
use http::{HeaderValue, Response, StatusCode};
use thiserror::Error;

const JSON_ERROR_PREFIX: &str = "Error when parsing JSON request body: ";

/// The request body could not be decoded by the strategy that matched its content type.
///
/// Always maps to `400 Bad Request`.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct MalformedRequestBody {
    message: String,
}

impl MalformedRequestBody {
    pub fn new<S: ToString>(message: S) -> Self {
        Self { message: message.to_string() }
    }

    /// Builds the error raised when a JSON body fails to decode, `diagnostic` being the decoder's
    /// own description of the failure.
    pub fn json<S: ToString>(diagnostic: S) -> Self {
        Self { message: format!("{JSON_ERROR_PREFIX}{}", diagnostic.to_string()) }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Renders the error as a plain text response carrying its status and message.
    pub fn to_response(&self) -> Response<ResponseBody> {
        let mut response = Response::new(ResponseBody::from(self.message.clone()));
        *response.status_mut() = self.status_code();
        response
            .headers_mut()
            .insert(http::header::CONTENT_TYPE, HeaderValue::from_static(mime::TEXT_PLAIN_UTF_8.as_ref()));
        response
    }
}

#[derive(Error, Debug)]
pub enum BodyParamsError {
    #[error("malformed request body: {source}")]
    MalformedBody {
        #[from]
        source: MalformedRequestBody,
    },

    #[error("failed to read request body: {source}")]
    ReadBody { source: BoxError },
}

impl BodyParamsError {
    pub fn read_body<E: Into<BoxError>>(e: E) -> Self {
        Self::ReadBody { source: e.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedBody { source } => source.status_code(),
            Self::ReadBody { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns the decode failure, if that is what this error is.
    pub fn as_malformed(&self) -> Option<&MalformedRequestBody> {
        match self {
            Self::MalformedBody { source } => Some(source),
            Self::ReadBody { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn json_error_is_prefixed() {
        let error = MalformedRequestBody::json("key must be a string at line 1 column 2");

        assert_eq!(error.message(), "Error when parsing JSON request body: key must be a string at line 1 column 2");
        assert_eq!(error.to_string(), error.message());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn wrapped_errors_are_bad_requests() {
        let malformed = BodyParamsError::from(MalformedRequestBody::new("broken"));
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(malformed.as_malformed().map(MalformedRequestBody::message), Some("broken"));

        let read = BodyParamsError::read_body(std::io::Error::other("reset"));
        assert_eq!(read.status_code(), StatusCode::BAD_REQUEST);
        assert!(read.as_malformed().is_none());
    }

    #[tokio::test]
    async fn to_response_renders_plain_text() {
        let response = MalformedRequestBody::json("EOF while parsing").to_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[http::header::CONTENT_TYPE], "text/plain; charset=utf-8");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), b"Error when parsing JSON request body: EOF while parsing");
    }
}

use crate::body_params::{BodyParamsStrategy, read_body};
use crate::error::{BodyParamsError, MalformedRequestBody};
use crate::request::{ParsedBody, RawBody, RequestAttributes};
use crate::ReqBody;
use async_trait::async_trait;
use http::Request;
use serde_json::Value;
use tracing::debug;

/// Parses `application/json` and `application/*+json` request bodies.
///
/// The parsed request carries both a [`RawBody`] and a [`ParsedBody`] attribute. Only JSON objects and
/// arrays are kept as the parsed body; an empty body or a JSON scalar yields `ParsedBody(None)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonStrategy;

impl JsonStrategy {
    fn is_json_media_type(media_type: &str) -> bool {
        let Some(subtype) = media_type.strip_prefix("application/") else {
            return false;
        };

        if subtype == "json" {
            return true;
        }

        // a structured syntax suffix needs a non-empty, single-token prefix, e.g. `hal+json`
        subtype.strip_suffix("+json").is_some_and(|prefix| {
            !prefix.is_empty() && !prefix.contains(|c: char| c == '+' || c == '/' || c.is_whitespace())
        })
    }
}

/// Decodes a non-empty body, keeping only composite values.
fn decode(raw_body: &[u8]) -> Result<Option<Value>, MalformedRequestBody> {
    let value: Value = serde_json::from_slice(raw_body).map_err(|e| {
        debug!(cause = %e, "malformed json request body");
        MalformedRequestBody::json(e)
    })?;

    Ok(match value {
        Value::Object(_) | Value::Array(_) => Some(value),
        _ => None,
    })
}

#[async_trait]
impl BodyParamsStrategy for JsonStrategy {
    fn matches(&self, content_type: &str) -> bool {
        let media_type = content_type.split_once(';').map_or(content_type, |(media_type, _params)| media_type);
        Self::is_json_media_type(media_type.trim())
    }

    async fn parse(&self, req: Request<ReqBody>) -> Result<Request<ReqBody>, BodyParamsError> {
        let (parts, raw_body) = read_body(req).await?;

        let parsed_body = if raw_body.is_empty() { ParsedBody::none() } else { ParsedBody::new(decode(&raw_body)?) };

        let req = Request::from_parts(parts, ReqBody::once(raw_body.clone()));
        Ok(req.with_raw_body(RawBody::new(raw_body)).with_parsed_body(parsed_body))
    }
}

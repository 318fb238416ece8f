use crate::body_params::{BodyParamsStrategy, read_body};
use crate::error::{BodyParamsError, MalformedRequestBody};
use crate::request::{ParsedBody, RequestAttributes};
use crate::ReqBody;
use async_trait::async_trait;
use http::Request;
use serde_json::{Map, Value};

/// Parses `application/x-www-form-urlencoded` request bodies into a flat object of strings.
///
/// A request that already carries a non-empty [`ParsedBody`] is returned untouched, as is a request
/// with an empty body. When a key repeats, its last value wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormUrlEncodedStrategy;

#[async_trait]
impl BodyParamsStrategy for FormUrlEncodedStrategy {
    fn matches(&self, content_type: &str) -> bool {
        content_type
            .strip_prefix(mime::APPLICATION_WWW_FORM_URLENCODED.essence_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', ';']))
    }

    async fn parse(&self, req: Request<ReqBody>) -> Result<Request<ReqBody>, BodyParamsError> {
        if req.parsed_body().is_some_and(|parsed_body| !parsed_body.is_empty()) {
            return Ok(req);
        }

        let (parts, raw_body) = read_body(req).await?;
        let req = Request::from_parts(parts, ReqBody::once(raw_body.clone()));
        if raw_body.is_empty() {
            return Ok(req);
        }

        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&raw_body)
            .map_err(|e| MalformedRequestBody::new(format!("Error when parsing form request body: {e}")))?;
        let fields: Map<String, Value> = pairs.into_iter().map(|(key, value)| (key, Value::String(value))).collect();

        Ok(req.with_parsed_body(ParsedBody::new(Some(Value::Object(fields)))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form_request(body: &'static str) -> Request<ReqBody> {
        Request::builder()
            .method("POST")
            .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(ReqBody::from(body))
            .unwrap()
    }

    #[test]
    fn matches_form_types() {
        for content_type in [
            "application/x-www-form-urlencoded",
            "application/x-www-form-urlencoded;charset=utf-8",
            "application/x-www-form-urlencoded; charset=utf-8",
            "application/x-www-form-urlencoded ",
        ] {
            assert!(FormUrlEncodedStrategy.matches(content_type), "{content_type} should match");
        }
    }

    #[test]
    fn does_not_match_other_types() {
        for content_type in [
            "application/x-www-form-urlencodedx",
            "application/json",
            "multipart/form-data",
            " application/x-www-form-urlencoded",
            "",
        ] {
            assert!(!FormUrlEncodedStrategy.matches(content_type), "{content_type} should not match");
        }
    }

    #[tokio::test]
    async fn parses_pairs() {
        let req = FormUrlEncodedStrategy.parse(form_request("name=micro+http&zip=10001&tag=a&tag=b")).await.unwrap();

        assert_eq!(
            req.parsed_body().and_then(ParsedBody::value),
            Some(&json!({"name": "micro http", "zip": "10001", "tag": "b"}))
        );
        assert!(req.raw_body().is_none());
    }

    #[tokio::test]
    async fn decodes_percent_encoding() {
        let req = FormUrlEncodedStrategy.parse(form_request("q=a%26b%3Dc")).await.unwrap();

        assert_eq!(req.parsed_body().and_then(ParsedBody::value), Some(&json!({"q": "a&b=c"})));
    }

    #[tokio::test]
    async fn empty_body_is_left_alone() {
        let req = FormUrlEncodedStrategy.parse(form_request("")).await.unwrap();

        assert!(req.parsed_body().is_none());
    }

    #[tokio::test]
    async fn existing_parsed_body_is_kept() {
        let req = form_request("name=other").with_parsed_body(ParsedBody::new(Some(json!({"name": "first"}))));

        let req = FormUrlEncodedStrategy.parse(req).await.unwrap();

        assert_eq!(req.parsed_body().and_then(ParsedBody::value), Some(&json!({"name": "first"})));
        let bytes = req.into_body().read_to_bytes().await.unwrap();
        assert_eq!(bytes.as_ref(), b"name=other");
    }

    #[tokio::test]
    async fn empty_parsed_body_is_replaced() {
        let req = form_request("name=micro").with_parsed_body(ParsedBody::none());

        let req = FormUrlEncodedStrategy.parse(req).await.unwrap();

        assert_eq!(req.parsed_body().and_then(ParsedBody::value), Some(&json!({"name": "micro"})));
    }
}

//! Request attributes attached by body parsing strategies.
//!
//! Attributes are stored in the request's [`http::Extensions`]:
//! - [`RawBody`]: the body exactly as it was read from the request
//! - [`ParsedBody`]: the decoded body, or `None` when there was nothing structured to decode
//!
//! [`RequestAttributes`] provides typed accessors for both on any [`http::Request`].

use bytes::Bytes;
use http::Request;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The raw content of a request body, as read by a body parsing strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody(Bytes);

impl RawBody {
    pub fn new(bytes: Bytes) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the body as a string, or `None` if it is not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// The decoded request body.
///
/// Only composite values (objects and arrays) are ever held; every other outcome, including an empty
/// body or a JSON scalar, is represented as `ParsedBody(None)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedBody(Option<Value>);

impl ParsedBody {
    pub fn new(value: Option<Value>) -> Self {
        Self(value)
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn value(&self) -> Option<&Value> {
        self.0.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.0
    }

    /// true when there is no parsed value, or the value is an empty object or array
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            None => true,
            Some(Value::Object(map)) => map.is_empty(),
            Some(Value::Array(array)) => array.is_empty(),
            Some(_) => false,
        }
    }

    /// Deserializes the parsed value into `T`.
    ///
    /// Returns `None` when there is no value.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.0.as_ref().map(|value| T::deserialize(value))
    }
}

/// Typed access to the body attributes of a request.
pub trait RequestAttributes {
    fn raw_body(&self) -> Option<&RawBody>;

    fn parsed_body(&self) -> Option<&ParsedBody>;

    fn with_raw_body(self, raw_body: RawBody) -> Self;

    fn with_parsed_body(self, parsed_body: ParsedBody) -> Self;
}

impl<B> RequestAttributes for Request<B> {
    fn raw_body(&self) -> Option<&RawBody> {
        self.extensions().get::<RawBody>()
    }

    fn parsed_body(&self) -> Option<&ParsedBody> {
        self.extensions().get::<ParsedBody>()
    }

    fn with_raw_body(mut self, raw_body: RawBody) -> Self {
        self.extensions_mut().insert(raw_body);
        self
    }

    fn with_parsed_body(mut self, parsed_body: ParsedBody) -> Self {
        self.extensions_mut().insert(parsed_body);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Params {
        name: String,
        zip: String,
    }

    #[test]
    fn attributes_are_absent_until_set() {
        let request = Request::new(());

        assert!(request.raw_body().is_none());
        assert!(request.parsed_body().is_none());
    }

    #[test]
    fn with_attributes_replaces_previous_values() {
        let request = Request::new(())
            .with_raw_body(RawBody::new(Bytes::from_static(b"first")))
            .with_raw_body(RawBody::new(Bytes::from_static(b"second")))
            .with_parsed_body(ParsedBody::new(Some(json!({"a": 1}))));

        assert_eq!(request.raw_body().and_then(RawBody::as_str), Some("second"));
        assert_eq!(request.parsed_body().and_then(ParsedBody::value), Some(&json!({"a": 1})));
    }

    #[test]
    fn raw_body_rejects_invalid_utf8_view() {
        let raw_body = RawBody::new(Bytes::from_static(&[0xff, 0xfe]));

        assert!(raw_body.as_str().is_none());
        assert_eq!(raw_body.as_bytes(), &[0xff, 0xfe]);
    }

    #[test]
    fn attributes_hand_back_owned_values() {
        let request = Request::new(())
            .with_raw_body(RawBody::new(Bytes::from_static(b"[1,2]")))
            .with_parsed_body(ParsedBody::new(Some(json!([1, 2]))));

        let raw_body = request.raw_body().cloned().map(RawBody::into_bytes);
        let parsed_body = request.parsed_body().cloned().and_then(ParsedBody::into_value);

        assert_eq!(raw_body, Some(Bytes::from_static(b"[1,2]")));
        assert_eq!(parsed_body, Some(json!([1, 2])));
        assert_eq!(ParsedBody::none().into_value(), None);
    }

    #[test]
    fn parsed_body_emptiness() {
        assert!(ParsedBody::none().is_empty());
        assert!(ParsedBody::new(Some(json!({}))).is_empty());
        assert!(ParsedBody::new(Some(json!([]))).is_empty());
        assert!(!ParsedBody::new(Some(json!(["a"]))).is_empty());
    }

    #[test]
    fn parsed_body_deserialize() {
        let parsed_body = ParsedBody::new(Some(json!({"name": "micro", "zip": "10001"})));

        let params: Params = parsed_body.deserialize().unwrap().unwrap();
        assert_eq!(params, Params { name: "micro".into(), zip: "10001".into() });

        assert!(ParsedBody::none().deserialize::<Params>().is_none());
    }
}

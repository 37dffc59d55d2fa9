use reqwest::{header, multipart::Form, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};

use super::error::ApiError;
use super::request::ApiRequest;
use super::session::Session;
use crate::config::FrontendConfig;

/// Backend REST client. Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: Session::anonymous(),
        })
    }

    pub fn from_config(config: &FrontendConfig) -> Result<Self, ApiError> {
        Self::new(config.api_base(), config.request_timeout())
    }

    /// A client sharing this one's connection pool but acting for `session`.
    pub fn with_session(&self, session: Session) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder, auth: bool, path: &str) -> RequestBuilder {
        if !auth {
            return builder;
        }
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => {
                tracing::debug!(path = %path, "no session token, sending unauthenticated");
                builder
            }
        }
    }

    /// Sends `req` and returns the unwrapped JSON payload.
    pub async fn send(&self, req: &ApiRequest) -> Result<Value, ApiError> {
        let mut builder = self
            .http
            .request(req.method.clone(), self.url(&req.path))
            .header(header::ACCEPT, "application/json");
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }
        builder = self.authorize(builder, req.auth, &req.path);

        self.execute(builder, req.method.as_str(), &req.target()).await
    }

    /// Sends `req` and parses the payload into `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        req: &ApiRequest,
        resource: &'static str,
    ) -> Result<T, ApiError> {
        let value = self.send(req).await?;
        parse(value, resource)
    }

    /// GETs an absolute URL outside the API base (the backend's own health route)
    /// and reports how long it took to answer successfully.
    pub async fn probe(&self, url: &str) -> Result<Duration, ApiError> {
        let start = Instant::now();
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(
                status,
                format!("Request failed with status {}", status.as_u16()),
            ));
        }
        Ok(start.elapsed())
    }

    /// POSTs a multipart form.
    pub async fn send_multipart(
        &self,
        path: &str,
        form: Form,
        auth: bool,
    ) -> Result<Value, ApiError> {
        let builder = self
            .http
            .post(self.url(path))
            .header(header::ACCEPT, "application/json")
            .multipart(form);
        let builder = self.authorize(builder, auth, path);

        self.execute(builder, "POST", path).await
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        method: &str,
        target: &str,
    ) -> Result<Value, ApiError> {
        let start = Instant::now();

        let response = builder.send().await.map_err(|e| {
            tracing::error!(method = %method, path = %target, error = %e, "backend request failed");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let duration = start.elapsed();

        if status.is_success() {
            tracing::debug!(
                method = %method,
                path = %target,
                status = %status,
                duration_ms = %duration.as_millis(),
                "backend request completed"
            );
        } else {
            tracing::warn!(
                method = %method,
                path = %target,
                status = %status,
                duration_ms = %duration.as_millis(),
                "backend returned error"
            );
        }

        decode_response(status, &bytes)
    }
}

/// Turns a raw backend response into its payload or a typed failure.
///
/// Success bodies shaped `{ "data": ... }` are unwrapped; anything else is returned whole.
/// An empty success body is `null`. For failures the server's `error` (or `message`)
/// string is surfaced, falling back to `Request failed with status <code>`.
pub fn decode_response(status: StatusCode, bytes: &[u8]) -> Result<Value, ApiError> {
    if status.is_success() {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        let value: Value = serde_json::from_slice(bytes).map_err(|source| ApiError::Parse {
            resource: "response",
            source,
        })?;
        return Ok(unwrap_envelope(value));
    }

    let message = serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|body| error_message(&body))
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    Err(ApiError::from_status(status, message))
}

fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn error_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parses a JSON payload into a record type, naming the resource on mismatch.
pub fn parse<T: DeserializeOwned>(value: Value, resource: &'static str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|source| {
        tracing::warn!(resource = resource, error = %source, "payload did not match record shape");
        ApiError::Parse { resource, source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_is_unwrapped() {
        let body = br#"{"success":true,"data":[{"_id":"b1"}]}"#;
        let value = decode_response(StatusCode::OK, body).unwrap();
        assert_eq!(value, json!([{"_id": "b1"}]));
    }

    #[test]
    fn test_body_without_data_is_returned_whole() {
        let body = br#"{"url":"https://cdn/x.png"}"#;
        let value = decode_response(StatusCode::CREATED, body).unwrap();
        assert_eq!(value["url"], "https://cdn/x.png");
    }

    #[test]
    fn test_empty_success_is_null() {
        assert_eq!(
            decode_response(StatusCode::NO_CONTENT, b"").unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_server_error_string_is_surfaced() {
        let err = decode_response(StatusCode::BAD_REQUEST, br#"{"error":"Email exists"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Email exists");

        let err = decode_response(StatusCode::CONFLICT, br#"{"message":"Duplicate"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Duplicate");
    }

    #[test]
    fn test_unparseable_error_uses_fallback() {
        let err = decode_response(StatusCode::BAD_GATEWAY, b"<html>oops</html>").unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn test_not_found_and_unauthorized_are_typed() {
        assert!(decode_response(StatusCode::NOT_FOUND, b"").unwrap_err().is_not_found());
        assert!(matches!(
            decode_response(StatusCode::UNAUTHORIZED, br#"{"error":"Not authorized"}"#),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_parse_names_resource() {
        let err = parse::<Vec<String>>(json!({"a": 1}), "blogs").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse blogs"));
    }
}

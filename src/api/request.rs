use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// A single backend call, described independently of the HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the `/api` base, always starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Attach the session's bearer token when one exists.
    pub auth: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
            auth: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` as the JSON payload. Serialization of plain records cannot fail;
    /// should it, the request is sent with a `null` body and the server rejects it.
    pub fn json_of<T: Serialize>(self, body: &T) -> Self {
        let value = serde_json::to_value(body).unwrap_or(Value::Null);
        self.json(value)
    }

    pub fn authenticated(mut self) -> Self {
        self.auth = true;
        self
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// `path?k=v&...`, used as the cache key and in logs.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

/// Encodes one path segment so ids and emails cannot alter the route.
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

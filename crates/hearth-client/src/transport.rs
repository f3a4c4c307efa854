//! Plain HTTP transport: base URL, JSON bodies, optional bearer token.
//!
//! The transport knows nothing about sessions. It sends one request and hands
//! back the buffered response, whatever its status.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result, extract_message};

/// A request description that can be re-sent.
///
/// The body is held as a JSON value rather than a stream so a clone carries
/// exactly the same method, path, query and body as the original.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
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

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Append query parameters.
    ///
    /// `query` must serialize to a map (a struct or a map type); `None`
    /// fields are skipped. Anything else is rejected.
    pub fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Result<Self> {
        let map = match serde_json::to_value(query)? {
            Value::Object(map) => map,
            Value::Null => return Ok(self),
            other => {
                return Err(Error::Json(serde::ser::Error::custom(format!(
                    "query parameters must serialize to a map, got {}",
                    other
                ))));
            }
        };
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::String(s) => self.query.push((key, s)),
                other => self.query.push((key, other.to_string())),
            }
        }
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The body as a JSON value, if it is JSON.
    pub fn json_value(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Message suitable for showing to a user.
    pub fn error_message(&self) -> String {
        self.json_value()
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| format!("HTTP {}", self.status.as_u16()))
    }

    /// Convert a non-2xx response into the matching error.
    pub fn into_error(self) -> Error {
        let status = self.status.as_u16();
        let message = self.error_message();
        if status == 404 {
            Error::NotFound(message)
        } else {
            Error::Api {
                status,
                message,
                body: self.json_value(),
            }
        }
    }
}

/// HTTP transport bound to one API base URL.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl Transport {
    /// Create a transport. The base URL is normalized to end with `/`.
    pub fn new(http: reqwest::Client, base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the absolute URL for an API path.
    pub fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.base_url.join(path).map_err(Error::from)
    }

    /// Send one request, optionally authorized with a bearer token.
    pub async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<ApiResponse> {
        let url = self.url(&request.path)?;
        tracing::debug!(
            method = %request.method,
            url = %url,
            authorized = bearer.is_some(),
            "Sending request"
        );

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .timeout(self.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(status = status.as_u16(), path = %request.path, "Received response");

        Ok(ApiResponse { status, body })
    }
}

use reqwest::{Client, RequestBuilder, Response, header};
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::error::{AttendanceError, AttendanceResult};

/// Builds a client that sends `key` as bearer token on every request.
pub fn google_client_init(key: &str) -> AttendanceResult<Client> {
    info!("Initializing Google API client");

    let authorization = match header::HeaderValue::from_str(format!("Bearer {}", key).as_str()) {
        Ok(value) => {
            let mut val = value;
            val.set_sensitive(true);
            val
        }
        Err(e) => {
            error!("Failed to create Authorization header value: {}", e);
            return Err(e.into());
        }
    };

    let mut headers = header::HeaderMap::new();
    headers.insert(header::AUTHORIZATION, authorization);
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    match Client::builder().default_headers(headers).build() {
        Ok(client) => {
            info!("Google API client initialized successfully");
            Ok(client)
        }
        Err(e) => {
            error!("Failed to build Google API client: {}", e);
            Err(e.into())
        }
    }
}

/// Sends `request` and turns any non-success status into an error.
/// `action` names the call in logs and errors.
pub async fn send(request: RequestBuilder, action: &str) -> AttendanceResult<Response> {
    let response = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Failed to send request to {}: {}", action, e);
            return Err(e.into());
        }
    };

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!("Google API returned error status {} to {}: {}", status, action, body);
        return Err(AttendanceError::Api {
            action: action.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    Ok(response)
}

/// Sends `request` and decodes the JSON body.
pub async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    action: &str,
) -> AttendanceResult<T> {
    let text = match send(request, action).await?.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response body to {}: {}", action, e);
            return Err(e.into());
        }
    };

    match serde_json::from_str::<T>(&text) {
        Ok(value) => Ok(value),
        Err(e) => {
            error!("Failed to parse response to {}: {}", action, e);
            error!("Raw response: {}", text);
            Err(e.into())
        }
    }
}

/// Sends `request` and returns the raw body, e.g. an exported PDF.
pub async fn send_bytes(request: RequestBuilder, action: &str) -> AttendanceResult<Vec<u8>> {
    match send(request, action).await?.bytes().await {
        Ok(bytes) => Ok(bytes.to_vec()),
        Err(e) => {
            error!("Failed to read response body to {}: {}", action, e);
            Err(e.into())
        }
    }
}

/// `base` with each of `segments` appended as an escaped path segment.
pub fn endpoint(base: &str, segments: &[&str]) -> AttendanceResult<reqwest::Url> {
    let mut url = reqwest::Url::parse(base)
        .map_err(|e| AttendanceError::Config(format!("invalid API base url {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| AttendanceError::Config(format!("API base url {base} cannot have a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use crate::errors::{OpenPhotoError, Result};
use crate::oauth::Creds;
use crate::transport::{Method, RequestOptions, Response, SharedTransport, Transport};
use futures::StreamExt;
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

/// Where and how to reach the API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub scheme: String,
    /// 0 is silent, 1 logs request lines and statuses, 2 also logs bodies
    pub http_debug_level: u32,
}

impl ClientConfig {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.into(),
            scheme: "https".into(),
            http_debug_level: 0,
        }
    }

    pub fn scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn http_debug_level(mut self, level: u32) -> Self {
        self.http_debug_level = level;
        self
    }
}

/// OAuth1 signing HTTP client for the OpenPhoto API.
///
/// This is the default [`Transport`]. Wrap it in an `Arc` (or call
/// [`Client::shared`]) to hand it to resources.
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    creds: Creds,
    https_client: reqwest::Client,
}

impl Client {
    pub fn new(config: ClientConfig, creds: Creds) -> Self {
        Self {
            config,
            creds,
            https_client: reqwest::Client::new(),
        }
    }

    pub fn shared(self) -> SharedTransport {
        Arc::new(self)
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn http_debug_level(&self) -> u32 {
        self.config.http_debug_level
    }

    pub fn set_http_debug_level(&mut self, level: u32) {
        self.config.http_debug_level = level;
    }

    /// Full url for an endpoint. Absolute urls are returned untouched.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        let sep = if endpoint.starts_with('/') { "" } else { "/" };
        format!("{}://{}{}{}", self.config.scheme, self.config.host, sep, endpoint)
    }

    async fn send(&self, method: Method, endpoint: &str, options: RequestOptions) -> Result<Response> {
        let mut req_url = Url::parse(&self.url(endpoint))?;
        if !options.params.is_empty() {
            req_url.query_pairs_mut().extend_pairs(&options.params);
        }

        let form = options.form_pairs();
        let multipart = !options.files.is_empty();
        // Multipart bodies are not part of the OAuth1 signature
        let signed_body: &[(String, String)] = if multipart { &[] } else { &form };
        let method_name: &'static str = method.into();
        let auth = self.creds.authorization_header(method_name, &req_url, signed_body);

        if self.config.http_debug_level > 0 {
            log::debug!("{} {}", method_name, req_url);
        }

        let mut req = self
            .https_client
            .request(reqwest_method(method), req_url.clone())
            .header("Authorization", auth)
            .header("Accept", "application/json");

        if multipart {
            let mut parts = reqwest::multipart::Form::new();
            for (k, v) in form {
                parts = parts.text(k, v);
            }
            for file in options.files {
                let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
                parts = parts.part(file.field, part);
            }
            req = req.multipart(parts);
        } else if options.data.is_some() {
            let body = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&form)
                .finish();
            req = req
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if self.config.http_debug_level > 0 {
            log::debug!("{} {} -> {}", method_name, req_url, status);
        }

        if options.stream && status.is_success() {
            let body = resp
                .bytes_stream()
                .map(|chunk| chunk.map_err(OpenPhotoError::from))
                .boxed();
            return Ok(Response::from_stream(status.as_u16(), body));
        }

        let body = resp.bytes().await?;
        if self.config.http_debug_level > 1 {
            log::trace!("{}", String::from_utf8_lossy(&body));
        }
        check_status(status.as_u16(), status.canonical_reason(), &body)?;
        Ok(Response::from_bytes(status.as_u16(), body))
    }
}

impl Transport for Client {
    fn request<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        options: RequestOptions,
    ) -> BoxFuture<'a, Result<Response>> {
        self.send(method, path, options).boxed()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("creds", &self.creds)
            .finish()
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
        Method::Head => reqwest::Method::HEAD,
    }
}

// In-band status the API reports next to (or instead of) the HTTP one
#[derive(Deserialize, Debug, Default)]
struct ResponseBody {
    code: Option<u16>,
    message: Option<String>,
}

/// Translates a failed HTTP status, or a failure code reported inside an
/// otherwise successful JSON body, into an error.
fn check_status(status: u16, reason: Option<&str>, body: &[u8]) -> Result<()> {
    let parsed = serde_json::from_slice::<ResponseBody>(body).ok();

    if !(200..300).contains(&status) {
        let message = parsed
            .and_then(|b| b.message)
            .or(reason.map(String::from))
            .unwrap_or_default();
        return Err(OpenPhotoError::Http { status, message });
    }

    match parsed {
        Some(ResponseBody {
            code: Some(code),
            message,
        }) if code >= 400 => Err(OpenPhotoError::Http {
            status: code,
            message: message.unwrap_or_default(),
        }),
        _ => Ok(()),
    }
}

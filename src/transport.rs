/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! The request/response seam between the resource model and the network.
//!
//! Resources never talk to HTTP directly. They hand a [`Method`], a path relative
//! to the API host and some [`RequestOptions`] to a [`Transport`] and get a
//! [`Response`] back. The default implementation is [`crate::Client`]; tests
//! substitute their own.

use crate::errors::{OpenPhotoError, Result};
use async_stream::try_stream;
use bytes::{Bytes, BytesMut};
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::{Map, Value};
use std::sync::Arc;
use strum_macros::{Display, IntoStaticStr};

/// Shared handle every resource keeps to the transport it was built with
pub type SharedTransport = Arc<dyn Transport>;

/// Lazily produced chunks of a response body
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Query string parameters, in the order they are sent
pub type ApiParams = Vec<(String, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

/// A file sent as one part of a multipart body
#[derive(Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FilePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything besides method and path that shapes a request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub params: ApiParams,
    pub data: Option<Map<String, Value>>,
    pub files: Vec<FilePart>,
    pub stream: bool,
}

impl RequestOptions {
    pub fn with_params(params: ApiParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn with_data(data: Map<String, Value>) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn streaming() -> Self {
        Self {
            stream: true,
            ..Default::default()
        }
    }

    /// Appends a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// The form body rendered as text pairs, empty if there is none
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        self.data
            .iter()
            .flat_map(|d| d.iter())
            .map(|(k, v)| (k.clone(), form_value(v)))
            .collect()
    }
}

/// Renders a field value the way it travels inside a form body
pub fn form_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Authenticated request execution.
///
/// Implementations own signing, connection reuse and translating failed
/// statuses into errors. A returned `Ok(Response)` is always a success.
pub trait Transport: Send + Sync {
    fn request<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        options: RequestOptions,
    ) -> BoxFuture<'a, Result<Response>>;

    fn get<'a>(&'a self, path: &'a str, options: RequestOptions) -> BoxFuture<'a, Result<Response>> {
        self.request(Method::Get, path, options)
    }

    fn post<'a>(&'a self, path: &'a str, options: RequestOptions) -> BoxFuture<'a, Result<Response>> {
        self.request(Method::Post, path, options)
    }

    fn put<'a>(&'a self, path: &'a str, options: RequestOptions) -> BoxFuture<'a, Result<Response>> {
        self.request(Method::Put, path, options)
    }

    fn delete<'a>(&'a self, path: &'a str, options: RequestOptions) -> BoxFuture<'a, Result<Response>> {
        self.request(Method::Delete, path, options)
    }

    fn patch<'a>(&'a self, path: &'a str, options: RequestOptions) -> BoxFuture<'a, Result<Response>> {
        self.request(Method::Patch, path, options)
    }

    fn head<'a>(&'a self, path: &'a str, options: RequestOptions) -> BoxFuture<'a, Result<Response>> {
        self.request(Method::Head, path, options)
    }
}

enum Body {
    Buffered(Bytes),
    Streaming(ByteStream),
}

/// A successful response, body either already read or still on the wire
pub struct Response {
    status: u16,
    body: Body,
}

impl Response {
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: Body::Buffered(body.into()),
        }
    }

    pub fn from_json(body: &Value) -> Self {
        Self::from_bytes(200, body.to_string())
    }

    pub fn from_stream(status: u16, body: ByteStream) -> Self {
        Self {
            status,
            body: Body::Streaming(body),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reads the whole body
    pub async fn bytes(self) -> Result<Bytes> {
        match self.body {
            Body::Buffered(b) => Ok(b),
            Body::Streaming(mut s) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = s.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(buf.freeze())
            }
        }
    }

    /// Decodes the body as JSON
    pub async fn json(self) -> Result<Value> {
        let body = self.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Decodes the body and unwraps the `result` envelope
    pub async fn into_result(self) -> Result<Value> {
        match self.json().await? {
            Value::Object(mut envelope) => envelope
                .remove("result")
                .ok_or(OpenPhotoError::ResponseMissing()),
            _ => Err(OpenPhotoError::ResponseMissing()),
        }
    }

    /// Yields the body in chunks of `chunk_size` bytes. The last chunk may be
    /// shorter. A `chunk_size` of 0 keeps the chunks as received.
    pub fn iter_content(self, chunk_size: usize) -> ByteStream {
        let source: ByteStream = match self.body {
            Body::Buffered(b) => stream::iter([Ok(b)]).boxed(),
            Body::Streaming(s) => s,
        };
        if chunk_size == 0 {
            return source;
        }
        rechunk(source, chunk_size)
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = match &self.body {
            Body::Buffered(b) => format!("{} bytes", b.len()),
            Body::Streaming(_) => "stream".to_string(),
        };
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("body", &body)
            .finish()
    }
}

fn rechunk(mut source: ByteStream, chunk_size: usize) -> ByteStream {
    let chunks = try_stream! {
        let mut pending = BytesMut::new();
        while let Some(chunk) = source.next().await {
            pending.extend_from_slice(&chunk?);
            while pending.len() >= chunk_size {
                yield pending.split_to(chunk_size).freeze();
            }
        }
        if !pending.is_empty() {
            yield pending.freeze();
        }
    };
    chunks.boxed()
}

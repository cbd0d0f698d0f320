/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use openphoto::{Method, OpenPhotoError, RequestOptions, Response, SharedTransport, Transport};
use serde_json::{Map, Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A request as the mock saw it
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: Method,
    pub path: String,
    pub options: RequestOptions,
}

#[allow(dead_code)]
impl Recorded {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.options
            .params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn data(&self) -> Map<String, Value> {
        self.options.data.clone().unwrap_or_default()
    }
}

/// Transport answering from a queue of canned responses and recording
/// every request. An empty queue answers `{"result": []}`.
#[derive(Default)]
pub(crate) struct MockTransport {
    requests: Mutex<Vec<Recorded>>,
    responses: Mutex<VecDeque<Result<Response, OpenPhotoError>>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(Response::from_json(&body)));
    }

    pub fn push_result(&self, result: Value) {
        self.push_json(json!({"code": 200, "message": "ok", "result": result}));
    }

    pub fn push_chunks(&self, chunks: Vec<Result<Bytes, OpenPhotoError>>) {
        let body = stream::iter(chunks).boxed();
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(Response::from_stream(200, body)));
    }

    pub fn push_error(&self, err: OpenPhotoError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn request<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        options: RequestOptions,
    ) -> BoxFuture<'a, Result<Response, OpenPhotoError>> {
        self.requests.lock().unwrap().push(Recorded {
            method,
            path: path.to_string(),
            options,
        });
        let resp = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Response::from_json(&json!({"result": []}))));
        Box::pin(async move { resp })
    }
}

#[allow(dead_code)]
pub(crate) fn shared(mock: &Arc<MockTransport>) -> SharedTransport {
    mock.clone()
}

#[allow(dead_code)]
pub(crate) fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected a JSON object"),
    }
}

/// Client for a real server, configured from the environment (or `.env`)
#[allow(dead_code)]
pub(crate) fn live_client() -> anyhow::Result<SharedTransport> {
    let host = std::env::var("OPENPHOTO_HOST")?;
    let creds = openphoto::Creds::from_tokens(
        &std::env::var("OPENPHOTO_CONSUMER_KEY")?,
        &std::env::var("OPENPHOTO_CONSUMER_SECRET")?,
        std::env::var("OPENPHOTO_TOKEN").ok().as_deref(),
        std::env::var("OPENPHOTO_TOKEN_SECRET").ok().as_deref(),
    );
    Ok(openphoto::Client::new(openphoto::ClientConfig::new(&host), creds).shared())
}

/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::errors::{OpenPhotoError, Result};
use crate::registry::KindSpec;
use crate::resource::Resource;
use crate::transport::{ApiParams, RequestOptions, SharedTransport, Transport};
use async_stream::try_stream;
use futures::Stream;
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// How a listing is fetched.
///
/// `params` are sent with every page request. When paginating, `page` and
/// `pageSize` are set by the listing itself and replace any caller values.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub paginate: bool,
    pub page_size: u32,
    pub params: ApiParams,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            paginate: true,
            page_size: DEFAULT_PAGE_SIZE,
            params: Vec::new(),
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paginate(mut self, paginate: bool) -> Self {
        self.paginate = paginate;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Adds a filter sent with every request
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

// Paginator owned keys first, then caller filters without them
fn page_params(filters: &ApiParams, page_size: u32, page: u32) -> ApiParams {
    let mut params = vec![
        ("pageSize".to_string(), page_size.to_string()),
        ("page".to_string(), page.to_string()),
    ];
    params.extend(
        filters
            .iter()
            .filter(|(k, _)| k != "page" && k != "pageSize")
            .cloned(),
    );
    params
}

fn into_items(result: Value) -> Result<Vec<Value>> {
    match result {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(OpenPhotoError::ApiResponseMalformed(format!(
            "expected a list result, got {other}"
        ))),
    }
}

/// Streams resources of kind `spec` from a list endpoint.
///
/// Paginated listings request page 1, 2, ... and stop at the first empty page.
/// Otherwise exactly one request is made. Nothing is fetched until the stream
/// is polled.
pub(crate) fn listing(
    transport: SharedTransport,
    spec: &'static KindSpec,
    path: String,
    options: SearchOptions,
) -> impl Stream<Item = Result<Resource>> + Send + 'static {
    try_stream! {
        if !options.paginate {
            let result = transport
                .get(&path, RequestOptions::with_params(options.params.clone()))
                .await?
                .into_result()
                .await?;
            for item in into_items(result)? {
                yield Resource::from_value(transport.clone(), spec, item)?;
            }
        } else {
            let mut page = 1;
            loop {
                log::debug!("{} page {} of {}", path, page, spec.name);
                let params = page_params(&options.params, options.page_size, page);
                let result = transport
                    .get(&path, RequestOptions::with_params(params))
                    .await?
                    .into_result()
                    .await?;
                let items = into_items(result)?;
                if items.is_empty() {
                    break;
                }
                for item in items {
                    yield Resource::from_value(transport.clone(), spec, item)?;
                }
                page += 1;
            }
        }
    }
}

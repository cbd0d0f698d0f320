/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use std::io;
use thiserror::Error;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum OpenPhotoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Request network error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("URL Parse error: {0}")]
    UrlParsing(#[from] url::ParseError),

    /// Field lookup after name translation found nothing
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation exists on the resource but is not supported by this client
    #[error("not implemented: {0}")]
    Unsupported(&'static str),

    #[error("{status} {} Error: {message}", status_class(*.status))]
    Http { status: u16, message: String },

    #[error("Expected response missing")]
    ResponseMissing(),

    #[error("API Response is malformed: {0}")]
    ApiResponseMalformed(String),
}

impl OpenPhotoError {
    /// True when the error is a "not yet supported" condition rather than a failure
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// True when the error reports a missing field
    pub fn is_attribute_not_found(&self) -> bool {
        matches!(self, Self::AttributeNotFound(_))
    }
}

fn status_class(status: u16) -> &'static str {
    if status >= 500 { "Server" } else { "Client" }
}

pub type Result<T, E = OpenPhotoError> = std::result::Result<T, E>;

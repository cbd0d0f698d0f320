/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # OpenPhoto
//!
//! Client library for the OpenPhoto (Trovebox) REST API.
//!
//! ## Features
//!
//! - Photos
//!     - Search/list with pagination, view, update, delete
//!     - Upload and download (to a file, a writer or as a byte stream)
//!     - Size variant urls, transforms, next/previous traversal
//!     - Comments and favorites
//! - Albums
//!     - Create, list, add/remove photos, list the photos of an album
//! - Tags
//!     - Create, list, list the photos of a tag
//! - A schema-less [`Resource`] underneath it all, for fields this library
//!   has no typed accessor for
//!
//! *Requests are signed with OAuth1 by [`Client`]. Getting the tokens is left
//! up to the consumer of this library. Any other [`Transport`] can be plugged
//! in instead.*
//!
//! ## Usage
//!
//! ```rust,no_run
//! use futures::{pin_mut, StreamExt};
//! use openphoto::{Client, ClientConfig, Creds, Photo, SearchOptions};
//!
//! async fn print_titles() -> Result<(), openphoto::OpenPhotoError> {
//!     let transport = Client::new(
//!         ClientConfig::new("photos.example.com"),
//!         Creds::from_tokens("consumer_key", "consumer_secret", Some("token"), Some("secret")),
//!     )
//!     .shared();
//!
//!     let photos = Photo::search(transport, SearchOptions::new().param("tags", "sunset"))?;
//!     pin_mut!(photos);
//!     while let Some(photo) = photos.next().await {
//!         let photo = photo?;
//!         println!("{}: {:?}", photo, photo.title());
//!     }
//!     Ok(())
//! }
//! ```
//!
pub mod client;
pub mod codec;
pub mod errors;
mod macros;
pub mod models;
pub mod oauth;
pub mod pagination;
mod parsers;
pub mod registry;
pub mod resource;
pub mod transport;

pub use client::*;
pub use errors::*;
pub use models::*;
pub use oauth::Creds;
pub use pagination::{DEFAULT_PAGE_SIZE, SearchOptions};
pub use registry::{Cardinality, Kind, KindSpec, Relationship};
pub use resource::{Related, Resource};
pub use transport::*;

pub use parsers::check_known_options;

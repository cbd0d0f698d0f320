/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::errors::{OpenPhotoError, Result};
use crate::macros::resource_wrapper;
use crate::models::Action;
use crate::pagination::SearchOptions;
use crate::parsers::from_timestamp;
use crate::registry::PHOTO;
use crate::resource::Resource;
use crate::transport::{ApiParams, ByteStream, FilePart, RequestOptions, SharedTransport, Transport};
use async_stream::try_stream;
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt, TryStreamExt};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

resource_wrapper!(
    /// Holds information returned from the Photo API.
    Photo,
    &PHOTO
);

/// Where downloaded bytes go
pub enum Destination<'a> {
    /// Created (or truncated) and removed again if the download fails
    Path(&'a Path),
    /// Written to as is; never closed or cleaned up
    Writer(&'a mut (dyn Write + Send)),
}

/// Outcome of [`Photo::download`]
pub enum Download {
    Written(u64),
    Chunks(ByteStream),
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Download::Written(n) => f.debug_tuple("Written").field(n).finish(),
            Download::Chunks(_) => f.write_str("Chunks"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Size variant to fetch (`"original"`, `"100x100"`, ...). The download
    /// endpoint is used when unset.
    pub size: Option<String>,
    pub chunk_size: usize,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            size: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Neighbours of a photo in the owner's photo stream
#[derive(Debug, Clone, Default)]
pub struct NextPrevious {
    pub next: Option<Photo>,
    pub previous: Option<Photo>,
}

impl Photo {
    pub fn search(
        transport: SharedTransport,
        options: SearchOptions,
    ) -> Result<impl Stream<Item = Result<Photo>> + Send + 'static> {
        Ok(Resource::search(transport, &PHOTO, options)?.map_ok(Photo))
    }

    pub fn all(
        transport: SharedTransport,
        paginate: bool,
    ) -> Result<impl Stream<Item = Result<Photo>> + Send + 'static> {
        Self::search(transport, SearchOptions::default().paginate(paginate))
    }

    /// Photos only come into existence through [`Photo::upload`]
    pub async fn create(_transport: SharedTransport, _fields: Map<String, Value>) -> Result<Photo> {
        Err(OpenPhotoError::Unsupported("creating a photo without a file"))
    }

    /// Uploads `bytes` as a new photo with the given fields
    pub async fn upload(
        transport: SharedTransport,
        file_name: &str,
        bytes: Vec<u8>,
        fields: Map<String, Value>,
    ) -> Result<Photo> {
        let request = RequestOptions {
            files: vec![FilePart {
                field: "photo".into(),
                file_name: file_name.into(),
                bytes,
            }],
            ..Default::default()
        };
        log::debug!("uploading {}", file_name);
        Resource::create(transport, &PHOTO, None, request, fields)
            .await
            .map(Photo)
    }

    pub async fn update_batch(_transport: SharedTransport, _photos: &[&Photo]) -> Result<Value> {
        Err(OpenPhotoError::Unsupported("batch photo update"))
    }

    pub async fn delete_batch(_transport: SharedTransport, _photos: &[&Photo]) -> Result<Value> {
        Err(OpenPhotoError::Unsupported("batch photo delete"))
    }

    pub async fn replace(&mut self, _file_name: &str, _bytes: Vec<u8>) -> Result<()> {
        Err(OpenPhotoError::Unsupported("replacing a photo's image"))
    }

    pub fn title(&self) -> Option<&str> {
        self.field("title").ok().and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.field("description").ok().and_then(Value::as_str)
    }

    pub fn tags(&self) -> Vec<String> {
        self.field_as("tags").unwrap_or_default()
    }

    pub fn date_taken(&self) -> Option<DateTime<Utc>> {
        self.field("date_taken").ok().and_then(from_timestamp)
    }

    pub fn date_uploaded(&self) -> Option<DateTime<Utc>> {
        self.field("date_uploaded").ok().and_then(from_timestamp)
    }

    fn required_id(&self) -> Result<String> {
        self.id()
            .ok_or_else(|| OpenPhotoError::AttributeNotFound("id".into()))
    }

    pub async fn add_comment(&self, email: &str, message: &str, extras: &Map<String, Value>) -> Result<Action> {
        Action::comment(self.transport().clone(), &self.required_id()?, email, message, extras).await
    }

    pub async fn favorite(&self, email: &str, message: &str, extras: &Map<String, Value>) -> Result<Action> {
        Action::favorite(self.transport().clone(), &self.required_id()?, email, message, extras).await
    }

    /// Urls of the requested size variants, keyed by size.
    ///
    /// Variants come from the `pathOriginal` / `path{size}` fields. The photo is
    /// re-viewed with `returnSizes` only if one of them is missing.
    pub async fn paths(&mut self, sizes: &[&str]) -> Result<BTreeMap<String, String>> {
        if sizes.iter().any(|s| !self.fields().contains_key(&size_field(s))) {
            let params: ApiParams = vec![("returnSizes".into(), sizes.join(","))];
            self.view_with(params).await?;
        }
        Ok(sizes
            .iter()
            .filter_map(|s| {
                self.fields()
                    .get(&size_field(s))
                    .and_then(Value::as_str)
                    .map(|url| (s.to_string(), url.to_string()))
            })
            .collect())
    }

    /// Downloads the photo.
    ///
    /// With no destination the body is returned as a lazy chunk stream. When a
    /// path is given and anything fails once it is opened, the partial file is
    /// removed before the error is returned.
    pub async fn download(
        &mut self,
        destination: Option<Destination<'_>>,
        options: DownloadOptions,
    ) -> Result<Download> {
        match destination {
            None => Ok(Download::Chunks(self.open_download(&options).await?)),
            Some(Destination::Writer(writer)) => {
                let chunks = self.open_download(&options).await?;
                write_chunks(chunks, writer).await.map(Download::Written)
            }
            Some(Destination::Path(path)) => {
                let mut file = File::create(path)?;
                let written = match self.open_download(&options).await {
                    Ok(chunks) => write_chunks(chunks, &mut file).await,
                    Err(err) => Err(err),
                };
                let written = written.and_then(|n| {
                    file.flush()?;
                    Ok(n)
                });
                drop(file);

                if written.is_err() {
                    if let Err(err) = std::fs::remove_file(path) {
                        log::warn!("could not remove partial download {}: {}", path.display(), err);
                    }
                }
                written.map(Download::Written)
            }
        }
    }

    async fn open_download(&mut self, options: &DownloadOptions) -> Result<ByteStream> {
        let source = match &options.size {
            Some(size) => self
                .paths(&[size.as_str()])
                .await?
                .remove(size)
                .ok_or_else(|| OpenPhotoError::AttributeNotFound(size_field(size)))?,
            None => self.url_with_extension(&["download"], None)?,
        };
        log::debug!("downloading {} from {}", self, source);
        let resp = self.transport().get(&source, RequestOptions::streaming()).await?;
        Ok(resp.iter_content(options.chunk_size))
    }

    /// Applies a server side transform (`rotate`, ...) and takes the result as
    /// the new field set
    pub async fn transform(&mut self, params: Map<String, Value>) -> Result<()> {
        let path = self.url(&["transform"])?;
        let result = self
            .transport()
            .post(&path, RequestOptions::with_data(params))
            .await?
            .into_result()
            .await?;
        self.0.replace_fields(result)
    }

    /// The photos before and after this one
    pub async fn next_previous(&self, params: ApiParams) -> Result<NextPrevious> {
        let path = self.url(&["nextprevious"])?;
        let mut result = match self
            .transport()
            .get(&path, RequestOptions::with_params(params))
            .await?
            .into_result()
            .await?
        {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(NextPrevious {
            next: self.neighbour(result.remove("next"))?,
            previous: self.neighbour(result.remove("previous"))?,
        })
    }

    fn neighbour(&self, value: Option<Value>) -> Result<Option<Photo>> {
        let value = match value {
            Some(Value::Array(items)) => items.into_iter().next(),
            other => other,
        };
        match value {
            Some(v @ Value::Object(_)) => {
                Ok(Some(Photo(Resource::from_value(self.transport().clone(), &PHOTO, v)?)))
            }
            _ => Ok(None),
        }
    }

    /// Walks the photo stream from this photo, forward or (`reverse`) back,
    /// ending when the server reports no further neighbour. This photo itself
    /// is not yielded.
    pub fn stream(&self, reverse: bool) -> impl Stream<Item = Result<Photo>> + Send + 'static {
        let start = self.clone();
        try_stream! {
            let mut current = start;
            loop {
                let neighbours = current.next_previous(Vec::new()).await?;
                let next = if reverse { neighbours.previous } else { neighbours.next };
                match next {
                    Some(photo) => {
                        yield photo.clone();
                        current = photo;
                    }
                    None => break,
                }
            }
        }
    }
}

fn size_field(size: &str) -> String {
    if size == "original" {
        "pathOriginal".to_string()
    } else {
        format!("path{size}")
    }
}

async fn write_chunks(mut chunks: ByteStream, writer: &mut (dyn Write + Send)) -> Result<u64> {
    let mut written = 0u64;
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk)?;
        written += chunk.len() as u64;
    }
    Ok(written)
}

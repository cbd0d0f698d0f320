/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::errors::{OpenPhotoError, Result};
use crate::macros::resource_wrapper;
use crate::models::Photo;
use crate::pagination::{SearchOptions, listing};
use crate::parsers::path_id;
use crate::registry::{ALBUM, PHOTO};
use crate::resource::Resource;
use crate::transport::{RequestOptions, SharedTransport, Transport};
use futures::{Stream, TryStreamExt};
use serde_json::{Map, Value, json};

resource_wrapper!(
    /// Holds information returned from the Album API.
    ///
    /// The `cover` and `photos` fields are resolved into [`Photo`]s whenever the
    /// album is constructed or refreshed.
    Album,
    &ALBUM
);

impl Album {
    pub fn search(
        transport: SharedTransport,
        options: SearchOptions,
    ) -> Result<impl Stream<Item = Result<Album>> + Send + 'static> {
        Ok(Resource::search(transport, &ALBUM, options)?.map_ok(Album))
    }

    pub fn all(
        transport: SharedTransport,
        paginate: bool,
    ) -> Result<impl Stream<Item = Result<Album>> + Send + 'static> {
        Self::search(transport, SearchOptions::default().paginate(paginate))
    }

    /// Creates a new album called `name`
    pub async fn create(transport: SharedTransport, name: &str, mut fields: Map<String, Value>) -> Result<Album> {
        fields.insert("name".into(), json!(name));
        Resource::create(transport, &ALBUM, None, RequestOptions::default(), fields)
            .await
            .map(Album)
    }

    pub fn name(&self) -> Option<&str> {
        self.field("name").ok().and_then(Value::as_str)
    }

    /// Number of photos the server reports for the album
    pub fn count(&self) -> Option<u64> {
        match self.field("count").ok()? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn cover(&self) -> Option<Photo> {
        self.related_one("cover").cloned().map(Photo)
    }

    /// Photos embedded in the album's own data
    pub fn photos(&self) -> Vec<Photo> {
        self.related_many("photos").iter().cloned().map(Photo).collect()
    }

    /// Lists every photo in the album from `/photos/album-{id}/list.json`
    pub fn list_photos(&self, options: SearchOptions) -> Result<impl Stream<Item = Result<Photo>> + Send + 'static> {
        let id = self
            .id()
            .ok_or_else(|| OpenPhotoError::AttributeNotFound("id".into()))?;
        let collection = PHOTO.collection_path.unwrap_or("/photos");
        let path = format!("{collection}/album-{}/list.json", path_id(&id));
        Ok(listing(self.transport().clone(), &PHOTO, path, options).map_ok(Photo))
    }

    pub async fn add(&self, photos: &[&Photo]) -> Result<Value> {
        self.add_remove("add", photos).await
    }

    pub async fn remove(&self, photos: &[&Photo]) -> Result<Value> {
        self.add_remove("remove", photos).await
    }

    async fn add_remove(&self, action: &str, photos: &[&Photo]) -> Result<Value> {
        if photos.is_empty() {
            return Err(OpenPhotoError::InvalidArgument(format!(
                "no photos given to {action} on {self}"
            )));
        }
        let ids = photos
            .iter()
            .map(|p| p.id().ok_or_else(|| OpenPhotoError::AttributeNotFound("id".into())))
            .collect::<Result<Vec<_>>>()?
            .join(",");
        let path = self.url(&["photo", action])?;

        let mut data = Map::new();
        data.insert("ids".into(), json!(ids));
        self.transport()
            .post(&path, RequestOptions::with_data(data))
            .await?
            .json()
            .await
    }
}

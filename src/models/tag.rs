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
use crate::registry::{PHOTO, TAG};
use crate::resource::Resource;
use crate::transport::{RequestOptions, SharedTransport};
use futures::{Stream, TryStreamExt};
use serde_json::{Map, Value, json};

resource_wrapper!(
    /// Holds information returned from the Tag API.
    Tag,
    &TAG
);

impl Tag {
    /// Lists every tag in one request. The tag list endpoint doesn't page.
    pub fn search(
        transport: SharedTransport,
        paginate: bool,
    ) -> Result<impl Stream<Item = Result<Tag>> + Send + 'static> {
        if paginate {
            return Err(OpenPhotoError::InvalidArgument(
                "Tag does not support paginate in list".into(),
            ));
        }
        Ok(Resource::search(transport, &TAG, SearchOptions::default().paginate(false))?.map_ok(Tag))
    }

    pub fn all(transport: SharedTransport) -> Result<impl Stream<Item = Result<Tag>> + Send + 'static> {
        Self::search(transport, false)
    }

    pub async fn create(transport: SharedTransport, tag: &str, mut fields: Map<String, Value>) -> Result<Tag> {
        fields.insert("tag".into(), json!(tag));
        Resource::create(transport, &TAG, None, RequestOptions::default(), fields)
            .await
            .map(Tag)
    }

    pub fn count(&self) -> Option<u64> {
        match self.field("count").ok()? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Photos embedded in the tag's own data
    pub fn photos(&self) -> Vec<Photo> {
        self.related_many("photos").iter().cloned().map(Photo).collect()
    }

    /// Lists the photos carrying this tag from `/photos/tags-{id}/list.json`
    pub fn list_photos(&self, options: SearchOptions) -> Result<impl Stream<Item = Result<Photo>> + Send + 'static> {
        let id = self
            .id()
            .ok_or_else(|| OpenPhotoError::AttributeNotFound("id".into()))?;
        let collection = PHOTO.collection_path.unwrap_or("/photos");
        let path = format!("{collection}/tags-{}/list.json", path_id(&id));
        Ok(listing(self.transport().clone(), &PHOTO, path, options).map_ok(Photo))
    }
}

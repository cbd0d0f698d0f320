/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::codec::to_external;
use crate::errors::{OpenPhotoError, Result};
use crate::macros::resource_wrapper;
use crate::pagination::SearchOptions;
use crate::parsers::{check_known_options, is_truthy, path_id};
use crate::registry::ACTION;
use crate::resource::Resource;
use crate::transport::{RequestOptions, SharedTransport};
use futures::{Stream, stream};
use serde_json::{Map, Value, json};
use strum_macros::{EnumString, IntoStaticStr};

/// Optional fields an action can carry besides email and message
pub const ACTION_EXTRAS: [&str; 4] = ["name", "website", "target_url", "permalink"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ActionType {
    Comment,
    Favorite,
}

resource_wrapper!(
    /// A comment or favorite left on a photo.
    Action,
    &ACTION
);

impl Action {
    /// Creates an action on the photo with id `photo_id`.
    ///
    /// `extras` may hold any of [`ACTION_EXTRAS`]; empty values are skipped
    /// and any other key is rejected.
    pub async fn create(
        transport: SharedTransport,
        photo_id: &str,
        action_type: ActionType,
        email: &str,
        message: &str,
        extras: &Map<String, Value>,
    ) -> Result<Self> {
        check_known_options(extras, &ACTION_EXTRAS)?;

        let type_name: &'static str = action_type.into();
        let mut fields = Map::new();
        fields.insert("email".into(), json!(email));
        fields.insert("value".into(), json!(message));
        fields.insert("type".into(), json!(type_name));
        for (key, value) in extras.iter().filter(|(_, v)| is_truthy(v)) {
            fields.insert(to_external(key), value.clone());
        }

        let path = format!("/action/{}/photo/create.json", path_id(photo_id));
        Resource::create(transport, &ACTION, Some(&path), RequestOptions::default(), fields)
            .await
            .map(Self)
    }

    pub async fn comment(
        transport: SharedTransport,
        photo_id: &str,
        email: &str,
        message: &str,
        extras: &Map<String, Value>,
    ) -> Result<Self> {
        Self::create(transport, photo_id, ActionType::Comment, email, message, extras).await
    }

    pub async fn favorite(
        transport: SharedTransport,
        photo_id: &str,
        email: &str,
        message: &str,
        extras: &Map<String, Value>,
    ) -> Result<Self> {
        Self::create(transport, photo_id, ActionType::Favorite, email, message, extras).await
    }

    /// Actions can't be listed
    pub fn search(
        _transport: SharedTransport,
        _options: SearchOptions,
    ) -> Result<impl Stream<Item = Result<Action>> + Send + 'static> {
        Err::<stream::Empty<Result<Action>>, _>(OpenPhotoError::Unsupported("listing actions"))
    }

    pub fn all(
        transport: SharedTransport,
        paginate: bool,
    ) -> Result<impl Stream<Item = Result<Action>> + Send + 'static> {
        Self::search(transport, SearchOptions::default().paginate(paginate))
    }

    /// Actions can't be edited
    pub async fn update(&self) -> Result<Value> {
        Err(OpenPhotoError::Unsupported("updating actions"))
    }

    pub fn action_type(&self) -> Option<ActionType> {
        self.field("type")
            .ok()
            .and_then(Value::as_str)
            .and_then(|t| t.parse().ok())
    }

    pub fn value(&self) -> Option<&str> {
        self.field("value").ok().and_then(Value::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.field("email").ok().and_then(Value::as_str)
    }
}

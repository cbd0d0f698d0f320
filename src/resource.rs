/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! The generic, schema-less entity every resource kind is built on.
//!
//! A [`Resource`] is the JSON object the server returned plus the transport it
//! came from. Field names are translated with [`to_external`] on every read
//! and write, and the field map is the only place data lives. Nested
//! resources declared by the kind's [`Relationship`]s are derived from it on
//! construction and on every refresh.

use crate::codec::to_external;
use crate::errors::{OpenPhotoError, Result};
use crate::pagination::{SearchOptions, listing};
use crate::parsers::{check_known_options, id_string, is_truthy, path_id};
use crate::registry::{Cardinality, KindSpec, Relationship};
use crate::transport::{ApiParams, RequestOptions, SharedTransport, Transport};
use futures::Stream;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Resolved value of one relationship
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    Single(Option<Box<Resource>>),
    Many(Vec<Resource>),
}

#[derive(Clone)]
pub struct Resource {
    spec: &'static KindSpec,
    transport: SharedTransport,
    fields: Map<String, Value>,
    related: BTreeMap<&'static str, Related>,
}

impl Resource {
    /// Wraps a field map returned by the server, resolving declared relationships
    pub fn new(transport: SharedTransport, spec: &'static KindSpec, fields: Map<String, Value>) -> Result<Self> {
        let mut resource = Self {
            spec,
            transport,
            fields,
            related: BTreeMap::new(),
        };
        resource.resolve_relationships()?;
        Ok(resource)
    }

    pub fn from_value(transport: SharedTransport, spec: &'static KindSpec, value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Self::new(transport, spec, fields),
            other => Err(OpenPhotoError::ApiResponseMalformed(format!(
                "expected a {} object, got {}",
                spec.name, other
            ))),
        }
    }

    /// Fetches a single resource by id
    pub async fn get(transport: SharedTransport, spec: &'static KindSpec, id: &str) -> Result<Self> {
        let path = format!("{}/{}/view.json", spec.object_path, path_id(id));
        log::debug!("fetching {} {}", spec.name, id);
        let result = transport
            .get(&path, view_options(Vec::new()))
            .await?
            .into_result()
            .await?;
        Self::from_value(transport, spec, result)
    }

    /// POSTs `fields` to `path`, or the kind's creation path, and wraps the result.
    ///
    /// Entries in `request.data` are merged over `fields`.
    pub async fn create(
        transport: SharedTransport,
        spec: &'static KindSpec,
        path: Option<&str>,
        mut request: RequestOptions,
        mut fields: Map<String, Value>,
    ) -> Result<Self> {
        let path = path.or(spec.create_path).ok_or_else(|| {
            OpenPhotoError::InvalidArgument(format!("{} has no creation path", spec.name))
        })?;
        if let Some(data) = request.data.take() {
            fields.extend(data);
        }
        request.data = Some(fields);

        let result = transport.post(path, request).await?.into_result().await?;
        Self::from_value(transport, spec, result)
    }

    /// Lists `{collection_path}/list.json` with the given filters
    pub fn search(
        transport: SharedTransport,
        spec: &'static KindSpec,
        options: SearchOptions,
    ) -> Result<impl Stream<Item = Result<Self>> + Send + 'static> {
        let collection = spec.collection_path.ok_or_else(|| {
            OpenPhotoError::InvalidArgument(format!("{} has no collection path", spec.name))
        })?;
        let path = format!("{collection}/list.json");
        Ok(listing(transport, spec, path, options))
    }

    pub fn all(
        transport: SharedTransport,
        spec: &'static KindSpec,
        paginate: bool,
    ) -> Result<impl Stream<Item = Result<Self>> + Send + 'static> {
        Self::search(transport, spec, SearchOptions::default().paginate(paginate))
    }

    /// Re-reads this resource from the server, replacing every field
    pub async fn view(&mut self) -> Result<()> {
        self.view_with(Vec::new()).await
    }

    pub async fn refresh(&mut self) -> Result<()> {
        self.view().await
    }

    /// `view` with extra query parameters
    pub async fn view_with(&mut self, params: ApiParams) -> Result<()> {
        let path = self.url(&["view"])?;
        let result = self
            .transport
            .get(&path, view_options(params))
            .await?
            .into_result()
            .await?;
        self.replace_fields(result)
    }

    /// Sends the whole field map to the update endpoint.
    ///
    /// Returns the decoded response as is; fields are left untouched.
    pub async fn update(&self) -> Result<Value> {
        let path = self.url(&["update"])?;
        self.transport
            .post(&path, RequestOptions::with_data(self.fields.clone()))
            .await?
            .json()
            .await
    }

    /// Deletes this resource on the server. The local value is stale afterwards.
    pub async fn delete(&self) -> Result<Value> {
        let path = self.url(&["delete"])?;
        self.transport
            .post(&path, RequestOptions::default())
            .await?
            .json()
            .await
    }

    /// `{object_path}/{id}/{segments}.json`
    pub fn url(&self, segments: &[&str]) -> Result<String> {
        self.url_with_extension(segments, Some(".json"))
    }

    /// Same as [`Resource::url`]; `None` leaves the extension off
    pub fn url_with_extension(&self, segments: &[&str], extension: Option<&str>) -> Result<String> {
        let id = self
            .id()
            .ok_or_else(|| OpenPhotoError::AttributeNotFound("id".into()))?;
        Ok(format!(
            "{}/{}/{}{}",
            self.spec.object_path,
            path_id(&id),
            segments.join("/"),
            extension.unwrap_or_default()
        ))
    }

    /// [`Resource::url`] taking keyword style options. Only `extension`
    /// (a string, or null for none) is understood.
    pub fn url_with_options(&self, segments: &[&str], options: &Map<String, Value>) -> Result<String> {
        check_known_options(options, &["extension"])?;
        match options.get("extension") {
            None => self.url(segments),
            Some(Value::Null) => self.url_with_extension(segments, None),
            Some(Value::String(ext)) => self.url_with_extension(segments, Some(ext)),
            Some(other) => Err(OpenPhotoError::InvalidArgument(format!(
                "extension must be a string or null, got {other}"
            ))),
        }
    }

    pub fn spec(&self) -> &'static KindSpec {
        self.spec
    }

    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    pub fn id(&self) -> Option<String> {
        self.fields.get("id").and_then(id_string)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    /// Reads a field by accessor name
    pub fn field(&self, name: &str) -> Result<&Value> {
        self.fields
            .get(&to_external(name))
            .ok_or_else(|| OpenPhotoError::AttributeNotFound(name.to_string()))
    }

    /// Reads and deserializes a field
    pub fn field_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        Ok(serde_json::from_value(self.field(name)?.clone())?)
    }

    /// Stores a field by accessor name. Sent on the next [`Resource::update`].
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(to_external(name), value.into());
    }

    pub fn related(&self, field: &str) -> Option<&Related> {
        self.related.get(field)
    }

    /// The resolved single relationship, if declared and present
    pub fn related_one(&self, field: &str) -> Option<&Resource> {
        match self.related.get(field) {
            Some(Related::Single(Some(r))) => Some(r),
            _ => None,
        }
    }

    /// The resolved many relationship, empty if undeclared or absent
    pub fn related_many(&self, field: &str) -> &[Resource] {
        match self.related.get(field) {
            Some(Related::Many(items)) => items,
            _ => &[],
        }
    }

    /// Swaps in a fresh field map from the server and re-derives relationships
    pub(crate) fn replace_fields(&mut self, result: Value) -> Result<()> {
        match result {
            Value::Object(fields) => {
                self.fields = fields;
                self.resolve_relationships()
            }
            other => Err(OpenPhotoError::ApiResponseMalformed(format!(
                "expected a {} object, got {}",
                self.spec.name, other
            ))),
        }
    }

    fn resolve_relationships(&mut self) -> Result<()> {
        let mut related = BTreeMap::new();
        for rel in self.spec.relationships {
            let raw = self.fields.get(rel.field).filter(|v| is_truthy(v));
            related.insert(rel.field, self.resolve(rel, raw)?);
        }
        self.related = related;
        Ok(())
    }

    fn resolve(&self, rel: &Relationship, raw: Option<&Value>) -> Result<Related> {
        let target = rel.target.spec();
        let build = |v: &Value| Resource::from_value(self.transport.clone(), target, v.clone());

        match (rel.cardinality, raw) {
            (Cardinality::Many, None) => Ok(Related::Many(Vec::new())),
            (Cardinality::Single, None) => Ok(Related::Single(None)),
            (Cardinality::Many, Some(Value::Array(items))) => {
                log::debug!("resolving {} {} for {}", items.len(), rel.field, self);
                let mut resolved = Vec::with_capacity(items.len());
                for item in items {
                    if item.is_object() {
                        resolved.push(build(item)?);
                    } else {
                        log::warn!("skipping non {} item in '{}' of {}: {}", target.name, rel.field, self, item);
                    }
                }
                Ok(Related::Many(resolved))
            }
            (Cardinality::Many, Some(v @ Value::Object(_))) => Ok(Related::Many(vec![build(v)?])),
            (Cardinality::Single, Some(v @ Value::Object(_))) => {
                Ok(Related::Single(Some(Box::new(build(v)?))))
            }
            (_, Some(other)) => Err(OpenPhotoError::ApiResponseMalformed(format!(
                "'{}' on {} should hold {} data, got {}",
                rel.field, self.spec.name, target.name, other
            ))),
        }
    }
}

fn view_options(mut params: ApiParams) -> RequestOptions {
    params.insert(0, ("includeElements".to_string(), "1".to_string()));
    RequestOptions::with_params(params)
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.spec.name == other.spec.name && self.fields == other.fields
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.id() {
            Some(id) => write!(f, "<{} {}>", self.spec.name, id),
            None => write!(f, "<{}>", self.spec.name),
        }
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(self.spec.name)
            .field("fields", &self.fields)
            .field("related", &self.related)
            .finish()
    }
}

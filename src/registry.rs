/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! Static description of every resource kind and the nested resources it
//! declares.
//!
//! Photo, Album and Tag refer to each other. Relationships therefore name
//! their target by [`Kind`] and the concrete [`KindSpec`] is looked up only
//! when the nested data is resolved.

use crate::errors::{OpenPhotoError, Result};
use std::str::FromStr;
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Identifier of a built-in resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    Photo,
    Album,
    Tag,
    Action,
}

impl Kind {
    pub fn spec(self) -> &'static KindSpec {
        match self {
            Kind::Photo => &PHOTO,
            Kind::Album => &ALBUM,
            Kind::Tag => &TAG,
            Kind::Action => &ACTION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Cardinality {
    Single,
    Many,
}

/// A field holding nested resource data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relationship {
    pub field: &'static str,
    pub target: Kind,
    pub cardinality: Cardinality,
}

impl Relationship {
    pub const fn many(field: &'static str, target: Kind) -> Self {
        Self {
            field,
            target,
            cardinality: Cardinality::Many,
        }
    }

    pub const fn single(field: &'static str, target: Kind) -> Self {
        Self {
            field,
            target,
            cardinality: Cardinality::Single,
        }
    }

    /// Builds a relationship from a textual cardinality (`"single"` or `"many"`)
    pub fn parse(field: &'static str, target: Kind, cardinality: &str) -> Result<Self> {
        let cardinality = Cardinality::from_str(cardinality).map_err(|_| {
            OpenPhotoError::InvalidArgument(format!(
                "relationship '{field}': cardinality must be 'single' or 'many', got '{cardinality}'"
            ))
        })?;
        Ok(Self {
            field,
            target,
            cardinality,
        })
    }
}

/// Paths and relationships of one resource kind
#[derive(Debug, PartialEq, Eq)]
pub struct KindSpec {
    pub name: &'static str,
    pub collection_path: Option<&'static str>,
    pub object_path: &'static str,
    pub create_path: Option<&'static str>,
    pub relationships: &'static [Relationship],
}

pub static PHOTO: KindSpec = KindSpec {
    name: "Photo",
    collection_path: Some("/photos"),
    object_path: "/photo",
    create_path: Some("/photos/upload.json"),
    relationships: &[],
};

pub static ALBUM: KindSpec = KindSpec {
    name: "Album",
    collection_path: Some("/albums"),
    object_path: "/album",
    create_path: Some("/album/create.json"),
    relationships: &[
        Relationship::many("photos", Kind::Photo),
        Relationship::single("cover", Kind::Photo),
    ],
};

pub static TAG: KindSpec = KindSpec {
    name: "Tag",
    collection_path: Some("/tags"),
    object_path: "/tag",
    create_path: Some("/tag/create.json"),
    relationships: &[Relationship::many("photos", Kind::Photo)],
};

pub static ACTION: KindSpec = KindSpec {
    name: "Action",
    collection_path: None,
    object_path: "/action",
    create_path: None,
    relationships: &[],
};

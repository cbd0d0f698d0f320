/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

// Typed wrapper around a Resource of one kind: derefs to the Resource and
// adds the constructors every kind shares.
macro_rules! resource_wrapper {
    ( $(#[$meta:meta])* $name:ident, $spec:expr ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(pub(crate) crate::resource::Resource);

        impl $name {
            pub fn spec() -> &'static crate::registry::KindSpec {
                $spec
            }

            /// Wraps a field map returned by the server
            pub fn new(
                transport: crate::transport::SharedTransport,
                fields: serde_json::Map<String, serde_json::Value>,
            ) -> Result<Self, crate::errors::OpenPhotoError> {
                crate::resource::Resource::new(transport, $spec, fields).map(Self)
            }

            /// Returns the resource with the given id
            pub async fn get(
                transport: crate::transport::SharedTransport,
                id: &str,
            ) -> Result<Self, crate::errors::OpenPhotoError> {
                crate::resource::Resource::get(transport, $spec, id)
                    .await
                    .map(Self)
            }

            pub fn into_inner(self) -> crate::resource::Resource {
                self.0
            }
        }

        impl From<$name> for crate::resource::Resource {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = crate::resource::Resource;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

pub(crate) use resource_wrapper;

//! Identifier newtypes.
//!
//! Every entity in a project is addressed by an opaque string id. Ids are
//! generated as UUID v4 so they stay unique across the whole project, not just
//! within one page, and survive serialization unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh, globally unique id
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_id!(
    /// Identifies an [`Element`](crate::Element)
    ElementId
);
define_id!(
    /// Identifies an [`ElementContent`](crate::ElementContent)
    ContentId
);
define_id!(
    /// Identifies a [`Page`](crate::Page)
    PageId
);
define_id!(
    /// Identifies a [`Project`](crate::Project)
    ProjectId
);
define_id!(PatternId);
define_id!(SlotId);
define_id!(LibraryId);
define_id!(
    /// Identifies an element property or a user store property
    PropertyId
);
define_id!(ActionId);

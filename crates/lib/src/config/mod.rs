//! Per-type configuration of the nested-set field roles.
//!
//! Each record type maps the left/right/level roles (and optionally the root
//! role) to concrete field names in its store. The presence of a root field
//! switches the type into multi-root mode, where every tree is numbered
//! independently starting at `1`.

mod errors;

pub use errors::ConfigError;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The roles a record field can play for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Left,
    Right,
    Level,
    Root,
}

impl Field {
    /// Human readable role name.
    pub fn role(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Left => "left",
            Field::Right => "right",
            Field::Level => "level",
            Field::Root => "root",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role())
    }
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_left_field() -> String {
    "lft".to_string()
}

fn default_right_field() -> String {
    "rgt".to_string()
}

fn default_level_field() -> String {
    "level".to_string()
}

/// Field-role mapping and store name for one record type.
///
/// Immutable once handed to a manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    entity_name: String,
    #[serde(default = "default_id_field")]
    id_field: String,
    #[serde(default = "default_left_field")]
    left_field: String,
    #[serde(default = "default_right_field")]
    right_field: String,
    #[serde(default = "default_level_field")]
    level_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root_field: Option<String>,
}

impl Configuration {
    /// Creates a single-tree configuration with the default field names
    /// `id`, `lft`, `rgt` and `level`.
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            id_field: default_id_field(),
            left_field: default_left_field(),
            right_field: default_right_field(),
            level_field: default_level_field(),
            root_field: None,
        }
    }

    /// Parses a configuration from a JSON document and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Configuration =
            serde_json::from_str(json).map_err(|source| ConfigError::InvalidDocument { source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field = name.into();
        self
    }

    pub fn with_left_field(mut self, name: impl Into<String>) -> Self {
        self.left_field = name.into();
        self
    }

    pub fn with_right_field(mut self, name: impl Into<String>) -> Self {
        self.right_field = name.into();
        self
    }

    pub fn with_level_field(mut self, name: impl Into<String>) -> Self {
        self.level_field = name.into();
        self
    }

    /// Declares the root field, turning the type into a multi-root type.
    pub fn with_root_field(mut self, name: impl Into<String>) -> Self {
        self.root_field = Some(name.into());
        self
    }

    /// Logical store name of the record type.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Whether records of this type form many independently numbered trees.
    pub fn has_many_roots(&self) -> bool {
        self.root_field.is_some()
    }

    /// Store name of the field playing `field`'s role, `None` for the root
    /// role of a single-tree type.
    pub fn field_name(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => Some(&self.id_field),
            Field::Left => Some(&self.left_field),
            Field::Right => Some(&self.right_field),
            Field::Level => Some(&self.level_field),
            Field::Root => self.root_field.as_deref(),
        }
    }

    /// Checks that every role has a distinct, non-empty field name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entity_name.is_empty() {
            return Err(ConfigError::EmptyEntityName);
        }

        let mut seen = HashSet::new();
        for field in [Field::Id, Field::Left, Field::Right, Field::Level, Field::Root] {
            let Some(name) = self.field_name(field) else {
                continue;
            };
            if name.is_empty() {
                return Err(ConfigError::EmptyFieldName { role: field.role() });
            }
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateFieldName {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[entity: {}, left: {}, right: {}, level: {}, root: {}]",
            self.entity_name,
            self.left_field,
            self.right_field,
            self.level_field,
            self.root_field.as_deref().unwrap_or("-"),
        )
    }
}

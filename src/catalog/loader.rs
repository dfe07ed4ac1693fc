//! Load the game catalog from a JSON data file
//!
//! Row-level problems are never fatal: a row that fails to deserialize, or
//! that references a missing row in another table, is warned about and
//! dropped so the rest of the catalog stays usable.

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::schema::{
    AbilityDef, ClassDef, FaceDef, RawAbility, RawClass, RawFace,
};
use crate::core::error::Result;

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(rename = "Abilities", default)]
    abilities: AHashMap<String, Value>,
    #[serde(rename = "Classes", default)]
    classes: AHashMap<String, Value>,
    #[serde(rename = "Faces", default)]
    faces: AHashMap<String, Value>,
}

/// Immutable lookup tables for abilities, classes, and die faces
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    abilities: AHashMap<String, AbilityDef>,
    classes: AHashMap<String, ClassDef>,
    faces: AHashMap<String, FaceDef>,
}

impl Catalog {
    /// Load a catalog from a JSON file on disk
    pub fn load(path: &Path) -> Result<Catalog> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Build a catalog from raw JSON text
    pub fn from_json(content: &str) -> Result<Catalog> {
        let raw: RawCatalog = serde_json::from_str(content)?;
        let mut catalog = Catalog::default();

        for (row_id, value) in raw.abilities {
            match serde_json::from_value::<RawAbility>(value) {
                Ok(row) => {
                    catalog.abilities.insert(row_id, AbilityDef::from_raw(row));
                }
                Err(err) => {
                    tracing::warn!("Malformed ability row `{}` - dropped: {}", row_id, err);
                }
            }
        }
        for (row_id, value) in raw.classes {
            match serde_json::from_value::<RawClass>(value) {
                Ok(row) => {
                    catalog.classes.insert(row_id, ClassDef::from_raw(row));
                }
                Err(err) => {
                    tracing::warn!("Malformed class row `{}` - dropped: {}", row_id, err);
                }
            }
        }
        for (row_id, value) in raw.faces {
            match serde_json::from_value::<RawFace>(value) {
                Ok(row) => {
                    catalog.faces.insert(row_id, FaceDef::from_raw(row));
                }
                Err(err) => {
                    tracing::warn!("Malformed face row `{}` - dropped: {}", row_id, err);
                }
            }
        }

        catalog.validate_references();
        Ok(catalog)
    }

    /// Drop rows that reference rows missing from another table
    fn validate_references(&mut self) {
        let abilities = &self.abilities;
        self.faces.retain(|row_id, face| {
            let known = abilities.contains_key(&face.ability_id);
            if !known {
                tracing::warn!(
                    "Face `{}` references unknown ability `{}` - dropped",
                    row_id,
                    face.ability_id
                );
            }
            known
        });
        let faces = &self.faces;
        self.classes.retain(|row_id, class| {
            let dangling = class.faces.iter().find(|face_id| !faces.contains_key(*face_id));
            if let Some(face_id) = dangling {
                tracing::warn!(
                    "Class `{}` references unknown face `{}` - dropped",
                    row_id,
                    face_id
                );
            }
            dangling.is_none()
        });
    }

    pub fn ability(&self, id: &str) -> Option<&AbilityDef> {
        self.abilities.get(id)
    }

    pub fn class(&self, id: &str) -> Option<&ClassDef> {
        self.classes.get(id)
    }

    pub fn face(&self, id: &str) -> Option<&FaceDef> {
        self.faces.get(id)
    }

    pub fn ability_count(&self) -> usize {
        self.abilities.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

//! Character definitions: class levels and the stats derived from them

use crate::catalog::Catalog;
use crate::core::error::{RediceError, Result};

/// A player or NPC definition, independent of any battle
///
/// Max health and base initiative are derived from class levels and only
/// change when a level is gained. The class-level list keeps insertion
/// order; a unit's dice are built in that order, one die per level.
#[derive(Debug, Clone)]
pub struct Character {
    pub name: String,
    class_levels: Vec<(String, u32)>,
    /// First class ever added; never changes afterwards
    pub primary_class_id: String,
    pub max_health: i32,
    pub base_init: f32,
}

impl Character {
    pub fn new(catalog: &Catalog, name: &str, class_uids: &[&str]) -> Result<Character> {
        let mut character = Character {
            name: name.to_string(),
            class_levels: Vec::new(),
            primary_class_id: String::new(),
            max_health: 0,
            base_init: 0.0,
        };
        for class_uid in class_uids {
            character.add_level(class_uid);
        }
        character.recompute(catalog)?;
        Ok(character)
    }

    /// Add a level in the given class and recompute derived stats
    pub fn gain_level(&mut self, catalog: &Catalog, class_uid: &str) -> Result<()> {
        self.add_level(class_uid);
        self.recompute(catalog)
    }

    fn add_level(&mut self, class_uid: &str) {
        if let Some(entry) = self
            .class_levels
            .iter_mut()
            .find(|(uid, _)| uid == class_uid)
        {
            entry.1 += 1;
        } else {
            self.class_levels.push((class_uid.to_string(), 1));
        }
        if self.primary_class_id.is_empty() {
            self.primary_class_id = class_uid.to_string();
        }
    }

    fn recompute(&mut self, catalog: &Catalog) -> Result<()> {
        let mut total_health = 0;
        let mut total_init = 0;
        let mut total_levels = 0;
        for (class_id, level) in &self.class_levels {
            let class = catalog
                .class(class_id)
                .ok_or_else(|| RediceError::unknown_row("Classes", class_id.clone()))?;
            total_health += class.health * *level as i32;
            total_init += class.init * *level as i32;
            total_levels += *level;
        }
        self.max_health = total_health;
        self.base_init = if total_levels > 0 {
            total_init as f32 / total_levels as f32
        } else {
            0.0
        };
        Ok(())
    }

    pub fn class_levels(&self) -> &[(String, u32)] {
        &self.class_levels
    }

    /// Sum of levels across all classes; also the number of dice a unit of
    /// this character owns
    pub fn total_levels(&self) -> u32 {
        self.class_levels.iter().map(|(_, level)| level).sum()
    }
}

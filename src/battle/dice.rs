//! Six-sided class dice
//!
//! A die is rolled once at the start of its owner's turn and holds the
//! rolled face until it is spent by an action, which resets it to unrolled.

use rand::Rng;

use crate::catalog::Catalog;
use crate::core::config::NUM_DIE_FACES;
use crate::core::error::{RediceError, Result};

/// One side of a die: a reference to an ability plus the scalar fed into
/// its effects
#[derive(Debug, Clone)]
pub struct DieFace {
    /// Catalog id of the face row
    pub face_id: String,
    /// Positional index of the face row, used by observation encodings
    pub index: u32,
    /// Effect multiplier input
    pub x: i32,
}

/// A die built from a class definition
#[derive(Debug, Clone)]
pub struct Die {
    pub class_id: String,
    faces: Vec<DieFace>,
    roll: Option<usize>,
}

impl Die {
    /// Build a die from the six face rows of a class
    pub fn from_class(catalog: &Catalog, class_id: &str) -> Result<Die> {
        let class = catalog
            .class(class_id)
            .ok_or_else(|| RediceError::unknown_row("Classes", class_id))?;
        let mut faces = Vec::with_capacity(NUM_DIE_FACES);
        for face_id in &class.faces {
            let face = catalog
                .face(face_id)
                .ok_or_else(|| RediceError::unknown_row("Faces", face_id.clone()))?;
            faces.push(DieFace {
                face_id: face_id.clone(),
                index: face.index,
                x: face.base_x,
            });
        }
        Ok(Die {
            class_id: class_id.to_string(),
            faces,
            roll: None,
        })
    }

    /// Roll the die, selecting one of its faces
    pub(crate) fn roll(&mut self, rng: &mut impl Rng) {
        self.roll = Some(rng.gen_range(0..NUM_DIE_FACES));
    }

    /// Return the die to its unrolled state after being spent
    pub(crate) fn reset(&mut self) {
        self.roll = None;
    }

    pub fn is_rolled(&self) -> bool {
        self.roll.is_some()
    }

    pub fn face(&self, face_index: usize) -> Option<&DieFace> {
        self.faces.get(face_index)
    }

    /// The face selected by the current roll, if any
    pub fn rolled_face(&self) -> Option<&DieFace> {
        self.face(self.roll?)
    }

    /// One-line rendering of all faces, marking the rolled one
    pub fn details(&self) -> String {
        let mut ret = String::new();
        for (i, face) in self.faces.iter().enumerate() {
            let face_details = format!("{}-{}", face.face_id, face.x);
            if self.roll == Some(i) {
                ret.push_str(&format!("[*{}*]", face_details));
            } else {
                ret.push_str(&format!("[ {} ]", face_details));
            }
        }
        ret
    }
}

//! Sequence: the top-level playable/shareable unit.
//!
//! Sequences are the unit of serialization: routines are saved and loaded
//! via `Sequence::to_json` / `Sequence::from_json`, and stored by uuid in
//! the document store.
//!
//! Editing follows the copy-on-write pattern used throughout: fetch a
//! cloned section, build the replacement, and swap it back in with
//! `update_section`. The engine only ever reads a `Sequence` value, so a
//! flattening pass always sees one consistent tree.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::section::Section;

/// Top-level sequence: an ordered list of named sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    /// Stable identifier, key into the document store
    pub uuid: Uuid,

    /// Human-readable name
    pub name: String,

    /// Sections played in order
    pub sections: Vec<Section>,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            sections: Vec::new(),
        }
    }

    /// Builder-style section list for sequence authoring code
    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }

    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn contains_section(&self, uuid: Uuid) -> bool {
        self.sections.iter().any(|s| s.uuid == uuid)
    }

    /// Get section by uuid (cloned value, copy-on-write editing)
    pub fn get_section(&self, uuid: Uuid) -> Option<Section> {
        self.sections.iter().find(|s| s.uuid == uuid).cloned()
    }

    /// Replace the section carrying the same uuid with `section`.
    /// Returns false if no section matches.
    pub fn update_section(&mut self, section: Section) -> bool {
        match self.sections.iter_mut().find(|s| s.uuid == section.uuid) {
            Some(slot) => {
                *slot = section;
                true
            }
            None => false,
        }
    }

    pub fn remove_section(&mut self, uuid: Uuid) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.uuid != uuid);
        self.sections.len() != before
    }

    /// Total duration in seconds across all sections
    pub fn duration_secs(&self) -> u64 {
        self.sections.iter().map(|s| s.duration_secs()).sum()
    }

    /// Serialize sequence to a JSON file.
    pub fn to_json<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Serialize sequence error: {}", e))?;

        let path = path.as_ref();
        let path = if path.extension().and_then(|s| s.to_str()) != Some("json") {
            path.with_extension("json")
        } else {
            path.to_path_buf()
        };

        fs::write(&path, json).map_err(|e| format!("Write sequence error: {}", e))?;
        Ok(())
    }

    /// Load sequence from a JSON file.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let json = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Read sequence error: {}", e))?;

        serde_json::from_str(&json).map_err(|e| format!("Parse sequence error: {}", e))
    }
}

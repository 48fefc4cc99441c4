//! The backing-store seam: where edit sets come from and go to.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use fieldkit_core::{EditError, EditSet};

use crate::error::Result;

/// Identifies one field of areas in the store: source, subsource, run time,
/// valid time, element and level together name exactly one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Weather element, e.g. "precip_type".
    pub element: String,
    /// Vertical level, e.g. "surface".
    pub level: String,
    /// Valid time of the depiction.
    pub valid_time: DateTime<Utc>,
    /// Originating source, e.g. a model or an office.
    pub source: String,
    /// Variant within the source; empty for the source's default.
    pub subsource: String,
    /// Model run (or issue time) the field belongs to.
    pub run_time: DateTime<Utc>,
}

impl FieldDescriptor {
    /// Descriptor with the default subsource and the run time equal to the
    /// valid time (an analysis).
    pub fn new(
        element: impl Into<String>,
        level: impl Into<String>,
        valid_time: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            element: element.into(),
            level: level.into(),
            valid_time,
            source: source.into(),
            subsource: String::new(),
            run_time: valid_time,
        }
    }

    pub fn with_subsource(mut self, subsource: impl Into<String>) -> Self {
        self.subsource = subsource.into();
        self
    }

    pub fn with_run_time(mut self, run_time: DateTime<Utc>) -> Self {
        self.run_time = run_time;
        self
    }

    fn key(&self) -> String {
        format!(
            "{}~{}~{}~{}~{}~{}",
            self.source,
            self.subsource,
            self.run_time.format("%Y%m%dT%H%M%SZ"),
            self.valid_time.format("%Y%m%dT%H%M%SZ"),
            self.element,
            self.level
        )
    }
}

/// Persistence backend for edit sets.
pub trait FieldStore {
    /// Loads the edit set for a field. Missing fields are a commit-domain
    /// error; merge surfaces them as a refusal.
    fn fetch(&self, desc: &FieldDescriptor) -> Result<EditSet>;

    /// Writes the edit set back under a change tag.
    fn commit(&mut self, desc: &FieldDescriptor, set: &EditSet, tag: &str) -> Result<()>;
}

/// In-memory store for tests and scripted runs.
#[derive(Debug, Default)]
pub struct MemoryFieldStore {
    fields: HashMap<String, EditSet>,
}

impl MemoryFieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a field without going through commit.
    pub fn seed(&mut self, desc: &FieldDescriptor, set: EditSet) {
        self.fields.insert(desc.key(), set);
    }
}

impl FieldStore for MemoryFieldStore {
    fn fetch(&self, desc: &FieldDescriptor) -> Result<EditSet> {
        self.fields
            .get(&desc.key())
            .cloned()
            .ok_or_else(|| EditError::CommitFailure(format!("no such field: {}", desc.key())).into())
    }

    fn commit(&mut self, desc: &FieldDescriptor, set: &EditSet, tag: &str) -> Result<()> {
        info!(field = %desc.key(), tag, areas = set.len(), "committed field");
        self.fields.insert(desc.key(), set.clone());
        Ok(())
    }
}

/// Store keeping one JSON file per field under a directory.
#[derive(Debug)]
pub struct JsonFieldStore {
    dir: PathBuf,
}

impl JsonFieldStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, desc: &FieldDescriptor) -> PathBuf {
        self.dir.join(format!("{}.json", desc.key()))
    }
}

impl FieldStore for JsonFieldStore {
    fn fetch(&self, desc: &FieldDescriptor) -> Result<EditSet> {
        let path = self.path_for(desc);
        let raw = fs::read_to_string(&path)
            .map_err(|e| EditError::CommitFailure(format!("read {}: {e}", path.display())))?;
        let set = serde_json::from_str(&raw)
            .map_err(|e| EditError::CommitFailure(format!("parse {}: {e}", path.display())))?;
        Ok(set)
    }

    fn commit(&mut self, desc: &FieldDescriptor, set: &EditSet, tag: &str) -> Result<()> {
        let path = self.path_for(desc);
        let raw = serde_json::to_string_pretty(set)
            .map_err(|e| EditError::CommitFailure(format!("encode field: {e}")))?;
        fs::write(&path, raw)
            .map_err(|e| EditError::CommitFailure(format!("write {}: {e}", path.display())))?;
        info!(field = %desc.key(), tag, "committed field to {}", path.display());
        Ok(())
    }
}

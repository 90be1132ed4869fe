//! Renders a persisted forest into the portable manifest

use chrono::{Local, NaiveDateTime};

use crate::domain::{Manifest, ManifestMenu, MenuNode, EXPORT_TIME_FORMAT, MANIFEST_VERSION};

/// Pure forest-to-manifest transform. Store identity (`id`, `parent_id`,
/// audit fields) is left out of the output.
#[derive(Debug, Clone)]
pub struct TreeExporter {
    producer: String,
}

impl TreeExporter {
    pub fn new(producer: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
        }
    }

    pub fn producer(&self) -> &str {
        &self.producer
    }

    /// Exports stamped with the current local time.
    pub fn export(&self, forest: &[MenuNode]) -> Manifest {
        self.export_at(forest, Local::now().naive_local())
    }

    pub fn export_at(&self, forest: &[MenuNode], time: NaiveDateTime) -> Manifest {
        Manifest {
            version: MANIFEST_VERSION.to_string(),
            export_time: time.format(EXPORT_TIME_FORMAT).to_string(),
            export_by: self.producer.clone(),
            total_count: MenuNode::count(forest),
            menus: forest.iter().map(ManifestMenu::from).collect(),
        }
    }
}

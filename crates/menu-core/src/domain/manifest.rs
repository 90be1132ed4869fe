// ============================================================================
// Menu Core - Manifest
// File: crates/menu-core/src/domain/manifest.rs
// Description: Portable, versioned JSON envelope for a menu forest
// ============================================================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::menu_node::{MenuChanges, MenuId, MenuMeta, MenuNode, MenuStatus, NewMenu, UserId};
use crate::error::DomainError;

pub const MANIFEST_VERSION: &str = "1.0.0";
pub const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Export/import envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    pub version: String,
    pub export_time: String,
    pub export_by: String,
    pub total_count: usize,
    pub menus: Vec<ManifestMenu>,
}

impl Manifest {
    /// Pretty-printed UTF-8 JSON; non-ASCII text is written as-is.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec_pretty(self).map_err(|e| DomainError::InternalError(e.to_string()))
    }

    /// Download name for a manifest exported at `time`.
    pub fn file_name(time: NaiveDateTime) -> String {
        format!("menus_{}.json", time.format("%Y%m%d_%H%M%S"))
    }
}

/// A menu in portable form: no store identity, children nested inline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestMenu {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub component: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub redirect: String,
    #[serde(default = "enabled", deserialize_with = "null_as_enabled")]
    pub status: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remark: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: MenuMeta,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ManifestMenu>,
    /// Fields that arrived with the wrong JSON type. They hold their
    /// default here and fail the menu when it is written.
    #[serde(skip)]
    pub field_errors: Vec<String>,
}

impl ManifestMenu {
    pub fn check_fields(&self) -> Result<(), DomainError> {
        if self.field_errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::ValidationError(self.field_errors.join("; ")))
        }
    }

    pub fn to_new_menu(&self, parent_id: MenuId, created_by: UserId) -> NewMenu {
        NewMenu {
            parent_id,
            name: self.name.clone(),
            path: self.path.clone(),
            component: self.component.clone(),
            redirect: self.redirect.clone(),
            status: self.status,
            sort: self.sort,
            remark: self.remark.clone(),
            meta: self.meta.clone(),
            created_by,
        }
    }

    pub fn to_changes(&self, updated_by: UserId) -> MenuChanges {
        MenuChanges {
            path: self.path.clone(),
            component: self.component.clone(),
            redirect: self.redirect.clone(),
            status: self.status,
            sort: self.sort,
            remark: self.remark.clone(),
            meta: self.meta.clone(),
            updated_by,
        }
    }
}

impl From<&MenuNode> for ManifestMenu {
    fn from(node: &MenuNode) -> Self {
        Self {
            name: node.name.clone(),
            path: node.path.clone(),
            component: node.component.clone(),
            redirect: node.redirect.clone(),
            status: node.status,
            sort: node.sort,
            remark: node.remark.clone(),
            meta: node.meta.clone(),
            children: node.children.iter().map(ManifestMenu::from).collect(),
            field_errors: Vec::new(),
        }
    }
}

fn enabled() -> i32 {
    MenuStatus::ENABLED
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_enabled<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(MenuStatus::ENABLED))
}

/// Decodes uploaded manifest bytes into an untyped JSON value.
///
/// Shape checks are left to the import validator.
pub fn decode_manifest(content: &[u8]) -> Result<Value, DomainError> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Err(DomainError::EmptyManifest);
    }
    serde_json::from_slice(content).map_err(|e| DomainError::InvalidJson(e.to_string()))
}

//! # Menu Core - Domain Module
//! 
//! Domain entities for menu migration.

pub mod menu_node;
pub mod manifest;
pub mod import_result;
pub mod node_path;

// Re-export all entities
pub use menu_node::{MenuChanges, MenuId, MenuMeta, MenuNode, MenuStatus, NewMenu, UserId, ROOT_PARENT_ID};
pub use manifest::{decode_manifest, Manifest, ManifestMenu, EXPORT_TIME_FORMAT, MANIFEST_VERSION};
pub use import_result::{ImportFailure, ImportResult};
pub use node_path::NodePath;

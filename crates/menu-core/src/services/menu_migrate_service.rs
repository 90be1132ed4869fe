// ============================================================================
// Menu Core - Menu Migrate Service
// File: crates/menu-core/src/services/menu_migrate_service.rs
// ============================================================================
//! List, export and import of the menu tree

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::domain::{decode_manifest, ImportResult, Manifest, MenuNode, UserId, ROOT_PARENT_ID};
use crate::error::DomainError;
use crate::repositories::MenuRepository;
use crate::services::{ImportValidator, TreeExporter, TreeMerger};

/// Entry point used by the transport layer.
pub struct MenuMigrateService<R: MenuRepository> {
    menu_repo: Arc<R>,
    exporter: TreeExporter,
}

impl<R: MenuRepository> MenuMigrateService<R> {
    pub fn new(menu_repo: Arc<R>, producer: impl Into<String>) -> Self {
        Self {
            menu_repo,
            exporter: TreeExporter::new(producer),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.menu_repo
    }

    /// Current menu forest, for display
    pub async fn list_menus(&self) -> Result<Vec<MenuNode>, DomainError> {
        self.menu_repo.all_tree().await
    }

    /// Renders an already fetched forest
    pub fn export(&self, forest: &[MenuNode]) -> Manifest {
        self.exporter.export(forest)
    }

    /// Fetches the current forest and renders it
    pub async fn export_menus(&self) -> Result<Manifest, DomainError> {
        let forest = self.menu_repo.all_tree().await?;
        let manifest = self.export(&forest);
        info!("Exported {} menus", manifest.total_count);
        Ok(manifest)
    }

    /// Decodes, validates and imports an uploaded manifest file.
    pub async fn import_bytes(
        &self,
        content: &[u8],
        overwrite: bool,
        user_id: UserId,
    ) -> Result<ImportResult, DomainError> {
        let data = decode_manifest(content)?;
        self.import(&data, overwrite, user_id).await
    }

    /// Validates `data` and merges its menus into the store in one
    /// transaction.
    ///
    /// Structural defects are rejected before the transaction opens.
    /// Per-menu failures are reported in the result and the transaction
    /// still commits; a transaction failure rolls everything back.
    pub async fn import(
        &self,
        data: &Value,
        overwrite: bool,
        user_id: UserId,
    ) -> Result<ImportResult, DomainError> {
        let menus = ImportValidator::validate(data).map_err(|e| {
            warn!("Menu import rejected: {}", e);
            e
        })?;

        info!("Importing {} root menus (overwrite: {}, user: {})", menus.len(), overwrite, user_id);

        let mut result = ImportResult::default();
        let mut tx = self.menu_repo.begin().await?;
        let merged = TreeMerger::new(overwrite, user_id)
            .merge(&mut tx, &menus, ROOT_PARENT_ID, &mut result)
            .await;

        match merged {
            Ok(()) => {
                self.menu_repo.commit(tx).await?;
                info!(
                    "Menu import finished: total={}, success={}, skipped={}, failed={}",
                    result.total, result.success, result.skipped, result.failed
                );
                Ok(result)
            }
            Err(e) => {
                error!("Menu import aborted, rolling back: {}", e);
                if let Err(rollback_err) = self.menu_repo.rollback(tx).await {
                    error!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

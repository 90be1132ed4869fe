// ============================================================================
// Menu Core - Tree Merger
// File: crates/menu-core/src/services/merger.rs
// Description: Reconciles an incoming menu forest against the store
// ============================================================================
//! Recursive create / update / skip reconciliation with per-node error
//! isolation.

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, warn};
use validator::Validate;

use crate::domain::{ImportResult, ManifestMenu, MenuId, UserId};
use crate::error::DomainError;
use crate::repositories::MenuWriter;

/// Matches incoming menus to stored ones by `(name, parent_id)`.
///
/// A matched menu is skipped, or overwritten in place when `overwrite` is
/// set; either way its children are still merged beneath its existing id.
#[derive(Debug, Clone, Copy)]
pub struct TreeMerger {
    overwrite: bool,
    user_id: UserId,
}

impl TreeMerger {
    pub fn new(overwrite: bool, user_id: UserId) -> Self {
        Self { overwrite, user_id }
    }

    /// Merges `menus` under `parent_id`, accumulating into `result`.
    ///
    /// Node-level failures are recorded and never returned. Only a
    /// transaction failure stops the traversal and comes back as `Err`.
    pub async fn merge<W>(
        &self,
        writer: &mut W,
        menus: &[ManifestMenu],
        parent_id: MenuId,
        result: &mut ImportResult,
    ) -> Result<(), DomainError>
    where
        W: MenuWriter + ?Sized,
    {
        self.merge_level(writer, menus, parent_id, result).await
    }

    fn merge_level<'a, W>(
        &'a self,
        writer: &'a mut W,
        menus: &'a [ManifestMenu],
        parent_id: MenuId,
        result: &'a mut ImportResult,
    ) -> BoxFuture<'a, Result<(), DomainError>>
    where
        W: MenuWriter + ?Sized + 'a,
    {
        async move {
            for menu in menus {
                result.record_seen();
                match self.merge_node(&mut *writer, menu, parent_id, &mut *result).await {
                    Ok(()) => {}
                    Err(e) if e.is_transaction_failure() => return Err(e),
                    Err(e) => {
                        warn!("Failed to import menu '{}' under parent {}: {}", menu.name, parent_id, e);
                        result.record_failure(&menu.name, &e);
                    }
                }
            }
            Ok(())
        }
        .boxed()
    }

    async fn merge_node<W>(
        &self,
        writer: &mut W,
        menu: &ManifestMenu,
        parent_id: MenuId,
        result: &mut ImportResult,
    ) -> Result<(), DomainError>
    where
        W: MenuWriter + ?Sized,
    {
        let resolved_id = self.resolve(&mut *writer, menu, parent_id, &mut *result).await?;

        if !menu.children.is_empty() {
            self.merge_level(writer, &menu.children, resolved_id, result).await?;
        }
        Ok(())
    }

    /// Creates, overwrites or skips a single menu and returns the id its
    /// children attach to.
    async fn resolve<W>(
        &self,
        writer: &mut W,
        menu: &ManifestMenu,
        parent_id: MenuId,
        result: &mut ImportResult,
    ) -> Result<MenuId, DomainError>
    where
        W: MenuWriter + ?Sized,
    {
        let existing = writer.find_by_name_and_parent(&menu.name, parent_id).await?;

        match existing {
            None => {
                menu.check_fields()?;
                let new_menu = menu.to_new_menu(parent_id, self.user_id);
                new_menu.validate()?;
                let created = writer.create(&new_menu).await?;
                result.record_success();
                debug!("Created menu '{}' ({}) under parent {}", menu.name, created.id, parent_id);
                Ok(created.id)
            }
            Some(existing) if !self.overwrite => {
                result.record_skipped();
                debug!("Skipped existing menu '{}' ({})", menu.name, existing.id);
                Ok(existing.id)
            }
            Some(existing) => {
                menu.check_fields()?;
                let changes = menu.to_changes(self.user_id);
                changes.validate()?;
                writer.update_by_id(existing.id, &changes).await?;
                result.record_success();
                debug!("Overwrote menu '{}' ({})", menu.name, existing.id);
                Ok(existing.id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::domain::{MenuMeta, MenuNode, MenuStatus, NewMenu, ROOT_PARENT_ID};
    use crate::repositories::MockMenuWriter;

    fn menu(name: &str, children: Vec<ManifestMenu>) -> ManifestMenu {
        ManifestMenu {
            name: name.to_string(),
            path: format!("/{}", name.to_lowercase()),
            component: String::new(),
            redirect: String::new(),
            status: MenuStatus::ENABLED,
            sort: 0,
            remark: String::new(),
            meta: MenuMeta::new(),
            children,
            field_errors: Vec::new(),
        }
    }

    fn stored(id: MenuId, parent_id: MenuId, name: &str) -> MenuNode {
        MenuNode::from_new(
            id,
            &NewMenu {
                parent_id,
                name: name.to_string(),
                path: String::new(),
                component: String::new(),
                redirect: String::new(),
                status: MenuStatus::ENABLED,
                sort: 0,
                remark: String::new(),
                meta: MenuMeta::new(),
                created_by: 0,
            },
        )
    }

    #[tokio::test]
    async fn test_creates_children_under_new_parent_id() {
        let created: Arc<Mutex<Vec<NewMenu>>> = Arc::default();
        let log = created.clone();

        let mut writer = MockMenuWriter::new();
        writer
            .expect_find_by_name_and_parent()
            .times(2)
            .returning(|_, _| Ok(None));
        let mut next_id = 10;
        writer.expect_create().times(2).returning(move |new_menu| {
            next_id += 1;
            log.lock().unwrap().push(new_menu.clone());
            Ok(MenuNode::from_new(next_id, new_menu))
        });

        let mut result = ImportResult::default();
        TreeMerger::new(false, 7)
            .merge(&mut writer, &[menu("System", vec![menu("Users", vec![])])], ROOT_PARENT_ID, &mut result)
            .await
            .unwrap();

        assert_eq!((result.total, result.success, result.skipped, result.failed), (2, 2, 0, 0));
        let created = created.lock().unwrap();
        assert_eq!(created[0].parent_id, ROOT_PARENT_ID);
        assert_eq!(created[1].name, "Users");
        assert_eq!(created[1].parent_id, 11);
        assert!(created.iter().all(|m| m.created_by == 7));
    }

    #[tokio::test]
    async fn test_overwrite_updates_in_place() {
        let updates: Arc<Mutex<Vec<(MenuId, UserId)>>> = Arc::default();
        let log = updates.clone();

        let mut writer = MockMenuWriter::new();
        writer
            .expect_find_by_name_and_parent()
            .times(1)
            .returning(|name, parent_id| Ok(Some(stored(5, parent_id, name))));
        writer.expect_create().never();
        writer.expect_update_by_id().times(1).returning(move |id, changes| {
            log.lock().unwrap().push((id, changes.updated_by));
            Ok(())
        });

        let mut result = ImportResult::default();
        TreeMerger::new(true, 3)
            .merge(&mut writer, &[menu("Dashboard", vec![])], ROOT_PARENT_ID, &mut result)
            .await
            .unwrap();

        assert_eq!((result.total, result.success, result.skipped), (1, 1, 0));
        assert_eq!(*updates.lock().unwrap(), vec![(5, 3)]);
    }

    #[tokio::test]
    async fn test_skipped_parent_still_receives_children() {
        let parents: Arc<Mutex<Vec<MenuId>>> = Arc::default();
        let log = parents.clone();

        let mut writer = MockMenuWriter::new();
        writer.expect_find_by_name_and_parent().times(2).returning(move |name, parent_id| {
            log.lock().unwrap().push(parent_id);
            if parent_id == ROOT_PARENT_ID {
                Ok(Some(stored(40, ROOT_PARENT_ID, name)))
            } else {
                Ok(None)
            }
        });
        writer
            .expect_create()
            .times(1)
            .returning(|new_menu| Ok(MenuNode::from_new(41, new_menu)));
        writer.expect_update_by_id().never();

        let mut result = ImportResult::default();
        TreeMerger::new(false, 1)
            .merge(&mut writer, &[menu("A", vec![menu("B", vec![])])], ROOT_PARENT_ID, &mut result)
            .await
            .unwrap();

        assert_eq!((result.total, result.success, result.skipped, result.failed), (2, 1, 1, 0));
        assert_eq!(*parents.lock().unwrap(), vec![ROOT_PARENT_ID, 40]);
    }

    #[tokio::test]
    async fn test_node_failure_is_isolated() {
        let mut writer = MockMenuWriter::new();
        writer
            .expect_find_by_name_and_parent()
            .times(3)
            .returning(|_, _| Ok(None));
        let mut next_id = 0;
        writer.expect_create().times(3).returning(move |new_menu| {
            next_id += 1;
            if new_menu.name == "Second" {
                Err(DomainError::DatabaseError("constraint violation".into()))
            } else {
                Ok(MenuNode::from_new(next_id, new_menu))
            }
        });

        let mut result = ImportResult::default();
        TreeMerger::new(false, 1)
            .merge(
                &mut writer,
                &[menu("First", vec![]), menu("Second", vec![menu("Lost", vec![])]), menu("Third", vec![])],
                ROOT_PARENT_ID,
                &mut result,
            )
            .await
            .unwrap();

        assert_eq!((result.total, result.success, result.skipped, result.failed), (3, 2, 0, 1));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].menu, "Second");
        assert_eq!(result.errors[0].error, "Database error: constraint violation");
    }

    #[tokio::test]
    async fn test_invalid_fields_fail_only_that_node() {
        let mut writer = MockMenuWriter::new();
        writer
            .expect_find_by_name_and_parent()
            .times(2)
            .returning(|_, _| Ok(None));
        writer
            .expect_create()
            .times(1)
            .returning(|new_menu| Ok(MenuNode::from_new(1, new_menu)));

        let long_name = "n".repeat(60);
        let mut result = ImportResult::default();
        TreeMerger::new(false, 1)
            .merge(&mut writer, &[menu(&long_name, vec![]), menu("Ok", vec![])], ROOT_PARENT_ID, &mut result)
            .await
            .unwrap();

        assert_eq!((result.total, result.success, result.failed), (2, 1, 1));
        assert_eq!(result.errors[0].menu, long_name);
    }

    #[tokio::test]
    async fn test_mistyped_fields_fail_on_write() {
        let mut writer = MockMenuWriter::new();
        writer
            .expect_find_by_name_and_parent()
            .times(3)
            .returning(|name, parent_id| {
                if name == "Kept" {
                    Ok(Some(stored(9, parent_id, name)))
                } else {
                    Ok(None)
                }
            });
        writer
            .expect_create()
            .times(1)
            .returning(|new_menu| Ok(MenuNode::from_new(1, new_menu)));

        let mut broken = menu("Broken", vec![]);
        broken.field_errors = vec!["`sort` must be an integer".into()];
        let mut kept = menu("Kept", vec![]);
        kept.field_errors = vec!["`path` must be a string".into()];

        let mut result = ImportResult::default();
        TreeMerger::new(false, 1)
            .merge(&mut writer, &[broken, kept, menu("Fine", vec![])], ROOT_PARENT_ID, &mut result)
            .await
            .unwrap();

        assert_eq!((result.total, result.success, result.skipped, result.failed), (3, 1, 1, 1));
        assert_eq!(result.errors[0].menu, "Broken");
        assert_eq!(result.errors[0].error, "Validation error: `sort` must be an integer");
    }

    #[tokio::test]
    async fn test_transaction_failure_aborts_traversal() {
        let mut writer = MockMenuWriter::new();
        writer
            .expect_find_by_name_and_parent()
            .times(1)
            .returning(|_, _| Err(DomainError::TransactionError("connection reset".into())));
        writer.expect_create().never();

        let mut result = ImportResult::default();
        let err = TreeMerger::new(false, 1)
            .merge(&mut writer, &[menu("A", vec![]), menu("B", vec![])], ROOT_PARENT_ID, &mut result)
            .await
            .unwrap_err();

        assert!(err.is_transaction_failure());
        assert_eq!(result.total, 1);
        assert_eq!(result.failed, 0);
    }
}

//! Menu repository traits (ports)

use async_trait::async_trait;

use crate::domain::{MenuChanges, MenuId, MenuNode, NewMenu};
use crate::error::DomainError;

/// Store of persisted menus.
///
/// Reads go straight to committed state; writes only happen through the
/// transaction handed out by [`MenuRepository::begin`].
#[async_trait]
pub trait MenuRepository: Send + Sync {
    type Tx: MenuWriter + 'static;

    /// Whole forest, children populated, siblings in display order.
    async fn all_tree(&self) -> Result<Vec<MenuNode>, DomainError>;

    async fn begin(&self) -> Result<Self::Tx, DomainError>;
    async fn commit(&self, tx: Self::Tx) -> Result<(), DomainError>;
    async fn rollback(&self, tx: Self::Tx) -> Result<(), DomainError>;
}

/// Transaction-scoped menu operations used by the importer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuWriter: Send {
    async fn find_by_name_and_parent(
        &mut self,
        name: &str,
        parent_id: MenuId,
    ) -> Result<Option<MenuNode>, DomainError>;

    async fn create(&mut self, menu: &NewMenu) -> Result<MenuNode, DomainError>;

    async fn update_by_id(&mut self, id: MenuId, changes: &MenuChanges) -> Result<(), DomainError>;
}

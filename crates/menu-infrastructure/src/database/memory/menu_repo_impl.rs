// ============================================================================
// Menu Infrastructure - In-Memory Menu Repository
// File: crates/menu-infrastructure/src/database/memory/menu_repo_impl.rs
// Description: Process-local menu store with single-writer transactions
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, warn};

use menu_core::domain::{MenuChanges, MenuId, MenuNode, NewMenu};
use menu_core::error::DomainError;
use menu_core::repositories::{MenuRepository, MenuWriter};

/// Scope in which menu names must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameUniqueness {
    /// `(parent_id, name)` is unique; matches the PostgreSQL schema.
    #[default]
    PerParent,
    /// `name` is unique across the whole tree.
    Global,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    rows: Vec<MenuNode>,
    last_id: MenuId,
}

impl MemoryState {
    fn insert(&mut self, menu: &NewMenu) -> MenuNode {
        self.last_id += 1;
        let node = MenuNode::from_new(self.last_id, menu);
        self.rows.push(node.clone());
        node
    }
}

#[derive(Debug, Default)]
struct Faults {
    fail_commit: bool,
    disconnect_after_writes: Option<usize>,
}

/// Menu store held in memory.
///
/// Readers see the last committed state. One transaction at a time may be
/// open; it works on a private copy that replaces the committed state on
/// commit and is discarded on rollback.
pub struct InMemoryMenuRepository {
    committed: Arc<RwLock<MemoryState>>,
    writer: Arc<AsyncMutex<()>>,
    uniqueness: NameUniqueness,
    faults: Arc<Mutex<Faults>>,
}

impl Default for InMemoryMenuRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMenuRepository {
    pub fn new() -> Self {
        Self::with_uniqueness(NameUniqueness::PerParent)
    }

    pub fn with_uniqueness(uniqueness: NameUniqueness) -> Self {
        Self {
            committed: Arc::new(RwLock::new(MemoryState::default())),
            writer: Arc::new(AsyncMutex::new(())),
            uniqueness,
            faults: Arc::new(Mutex::new(Faults::default())),
        }
    }

    /// Inserts a committed row directly, bypassing uniqueness checks.
    pub fn seed(&self, menu: NewMenu) -> MenuNode {
        self.committed.write().insert(&menu)
    }

    /// Committed rows in insertion order.
    pub fn rows(&self) -> Vec<MenuNode> {
        self.committed.read().rows.clone()
    }

    /// Makes the next commit fail with a transaction error.
    pub fn fail_next_commit(&self) {
        self.faults.lock().fail_commit = true;
    }

    /// Simulates a dropped connection: every operation of a transaction
    /// fails once it has performed `writes` writes.
    pub fn disconnect_after_writes(&self, writes: usize) {
        self.faults.lock().disconnect_after_writes = Some(writes);
    }
}

#[async_trait]
impl MenuRepository for InMemoryMenuRepository {
    type Tx = InMemoryMenuTransaction;

    async fn all_tree(&self) -> Result<Vec<MenuNode>, DomainError> {
        let mut rows = self.committed.read().rows.clone();
        rows.sort_by_key(|row| (row.sort, row.id));
        Ok(MenuNode::build_forest(rows))
    }

    async fn begin(&self) -> Result<InMemoryMenuTransaction, DomainError> {
        let guard = self.writer.clone().lock_owned().await;
        let working = self.committed.read().clone();
        let disconnect_after_writes = self.faults.lock().disconnect_after_writes;
        Ok(InMemoryMenuTransaction {
            _guard: guard,
            working,
            uniqueness: self.uniqueness,
            writes: 0,
            disconnect_after_writes,
        })
    }

    async fn commit(&self, tx: InMemoryMenuTransaction) -> Result<(), DomainError> {
        if std::mem::take(&mut self.faults.lock().fail_commit) {
            warn!("Injected commit failure, discarding {} writes", tx.writes);
            return Err(DomainError::TransactionError("commit failed".to_string()));
        }
        debug!("Committing {} menu writes", tx.writes);
        *self.committed.write() = tx.working;
        Ok(())
    }

    async fn rollback(&self, tx: InMemoryMenuTransaction) -> Result<(), DomainError> {
        debug!("Rolling back {} menu writes", tx.writes);
        Ok(())
    }
}

/// Open transaction on an [`InMemoryMenuRepository`].
pub struct InMemoryMenuTransaction {
    _guard: OwnedMutexGuard<()>,
    working: MemoryState,
    uniqueness: NameUniqueness,
    writes: usize,
    disconnect_after_writes: Option<usize>,
}

impl InMemoryMenuTransaction {
    fn ensure_connected(&self) -> Result<(), DomainError> {
        match self.disconnect_after_writes {
            Some(limit) if self.writes >= limit => {
                Err(DomainError::TransactionError("connection lost".to_string()))
            }
            _ => Ok(()),
        }
    }

    fn name_taken(&self, menu: &NewMenu) -> bool {
        self.working.rows.iter().any(|row| {
            row.name == menu.name
                && (self.uniqueness == NameUniqueness::Global || row.parent_id == menu.parent_id)
        })
    }
}

#[async_trait]
impl MenuWriter for InMemoryMenuTransaction {
    async fn find_by_name_and_parent(
        &mut self,
        name: &str,
        parent_id: MenuId,
    ) -> Result<Option<MenuNode>, DomainError> {
        self.ensure_connected()?;
        Ok(self
            .working
            .rows
            .iter()
            .find(|row| row.name == name && row.parent_id == parent_id)
            .cloned())
    }

    async fn create(&mut self, menu: &NewMenu) -> Result<MenuNode, DomainError> {
        self.ensure_connected()?;
        if self.name_taken(menu) {
            return Err(DomainError::MenuNameAlreadyExists {
                parent_id: menu.parent_id,
                name: menu.name.clone(),
            });
        }
        self.writes += 1;
        Ok(self.working.insert(menu))
    }

    async fn update_by_id(&mut self, id: MenuId, changes: &MenuChanges) -> Result<(), DomainError> {
        self.ensure_connected()?;
        let row = self
            .working
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(DomainError::MenuNotFound(id))?;
        row.apply(changes);
        self.writes += 1;
        Ok(())
    }
}

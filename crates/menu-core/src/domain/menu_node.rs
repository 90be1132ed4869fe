// ============================================================================
// Menu Core - Menu Node Entity
// File: crates/menu-core/src/domain/menu_node.rs
// Description: Persisted menu tree node and its write models
// ============================================================================

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

pub type MenuId = i64;
pub type UserId = i64;

/// Opaque per-menu attributes (icon, title, i18n key, flags...).
pub type MenuMeta = Map<String, Value>;

/// `parent_id` of every root-level menu.
pub const ROOT_PARENT_ID: MenuId = 0;

/// Status flag values
pub struct MenuStatus;

impl MenuStatus {
    pub const ENABLED: i32 = 1;
    pub const DISABLED: i32 = 2;
}

/// Menu node as stored, with its children populated when read as a forest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuNode {
    pub id: MenuId,
    pub parent_id: MenuId,
    pub name: String,
    pub path: String,
    pub component: String,
    pub redirect: String,
    pub status: i32,
    pub sort: i32,
    pub remark: String,
    pub meta: MenuMeta,

    // Audit fields
    pub created_by: UserId,
    pub updated_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Materializes a freshly inserted row.
    pub fn from_new(id: MenuId, menu: &NewMenu) -> Self {
        Self {
            id,
            parent_id: menu.parent_id,
            name: menu.name.clone(),
            path: menu.path.clone(),
            component: menu.component.clone(),
            redirect: menu.redirect.clone(),
            status: menu.status,
            sort: menu.sort,
            remark: menu.remark.clone(),
            meta: menu.meta.clone(),
            created_by: menu.created_by,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: None,
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }

    pub fn apply(&mut self, changes: &MenuChanges) {
        self.path = changes.path.clone();
        self.component = changes.component.clone();
        self.redirect = changes.redirect.clone();
        self.status = changes.status;
        self.sort = changes.sort;
        self.remark = changes.remark.clone();
        self.meta = changes.meta.clone();
        self.updated_by = Some(changes.updated_by);
        self.updated_at = Some(Utc::now());
    }

    /// Counts every node of the forest, descendants included.
    pub fn count(forest: &[MenuNode]) -> usize {
        forest
            .iter()
            .map(|node| 1 + Self::count(&node.children))
            .sum()
    }

    /// Assembles flat rows into an ordered forest.
    ///
    /// Siblings keep the order they have in `rows`. Rows whose parent is not
    /// reachable from the root are dropped.
    pub fn build_forest(rows: Vec<MenuNode>) -> Vec<MenuNode> {
        let mut by_parent: HashMap<MenuId, Vec<MenuNode>> = HashMap::new();
        for mut row in rows {
            row.children.clear();
            by_parent.entry(row.parent_id).or_default().push(row);
        }
        Self::attach_children(ROOT_PARENT_ID, &mut by_parent)
    }

    fn attach_children(
        parent_id: MenuId,
        by_parent: &mut HashMap<MenuId, Vec<MenuNode>>,
    ) -> Vec<MenuNode> {
        let mut siblings = by_parent.remove(&parent_id).unwrap_or_default();
        for node in &mut siblings {
            node.children = Self::attach_children(node.id, by_parent);
        }
        siblings
    }

    /// Flattens a forest back into rows, parents before children.
    pub fn flatten(forest: &[MenuNode]) -> Vec<&MenuNode> {
        let mut rows = Vec::new();
        for node in forest {
            rows.push(node);
            rows.extend(Self::flatten(&node.children));
        }
        rows
    }
}

/// Fields written when a menu is created.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct NewMenu {
    pub parent_id: MenuId,

    #[validate(length(min = 1, max = 50, message = "Menu name must be between 1 and 50 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Menu path too long"))]
    pub path: String,

    #[validate(length(max = 255, message = "Menu component too long"))]
    pub component: String,

    #[validate(length(max = 255, message = "Menu redirect too long"))]
    pub redirect: String,

    pub status: i32,
    pub sort: i32,

    #[validate(length(max = 255, message = "Menu remark too long"))]
    pub remark: String,

    pub meta: MenuMeta,
    pub created_by: UserId,
}

/// Mutable fields written when an existing menu is overwritten.
///
/// Identity (`id`, `parent_id`, `name`) never changes on update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct MenuChanges {
    #[validate(length(max = 255, message = "Menu path too long"))]
    pub path: String,

    #[validate(length(max = 255, message = "Menu component too long"))]
    pub component: String,

    #[validate(length(max = 255, message = "Menu redirect too long"))]
    pub redirect: String,

    pub status: i32,
    pub sort: i32,

    #[validate(length(max = 255, message = "Menu remark too long"))]
    pub remark: String,

    pub meta: MenuMeta,
    pub updated_by: UserId,
}

// ============================================================================
// Menu Core - Import Validator
// File: crates/menu-core/src/services/validator.rs
// Description: Structural checks on an uploaded manifest, run before any write
// ============================================================================

use serde_json::{Map, Value};

use crate::domain::{ManifestMenu, MenuMeta, MenuStatus, NodePath};
use crate::error::DomainError;

/// Fail-fast shape validation of a decoded manifest.
///
/// Walks the `menus` forest depth first and stops at the first defect,
/// reporting it with the locator of the offending node. A manifest that
/// passes comes back as typed menus ready for the merger.
pub struct ImportValidator;

impl ImportValidator {
    pub fn validate(data: &Value) -> Result<Vec<ManifestMenu>, DomainError> {
        let menus = data
            .get("menus")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                DomainError::structural("menus", "missing `menus` field or it is not a list")
            })?;

        let mut path = NodePath::root("menus");
        Self::validate_menus(menus, &mut path)
    }

    fn validate_menus(menus: &[Value], path: &mut NodePath) -> Result<Vec<ManifestMenu>, DomainError> {
        let mut validated = Vec::with_capacity(menus.len());
        for (index, menu) in menus.iter().enumerate() {
            path.push_index(index);
            validated.push(Self::validate_menu(menu, path)?);
            path.pop();
        }
        Ok(validated)
    }

    fn validate_menu(menu: &Value, path: &mut NodePath) -> Result<ManifestMenu, DomainError> {
        let fields = menu
            .as_object()
            .ok_or_else(|| DomainError::structural(path.to_string(), "menu must be an object"))?;

        let name = match fields.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
            None | Some(Value::Null) | Some(Value::String(_)) => {
                return Err(DomainError::structural(path.to_string(), "menu is missing a name"))
            }
            Some(_) => return Err(DomainError::structural(path.to_string(), "`name` must be a string")),
        };

        let meta = Self::meta(fields, path)?;
        let children = match fields.get("children") {
            Some(Value::Array(children)) => {
                path.push_field("children");
                let children = Self::validate_menus(children, path)?;
                path.pop();
                children
            }
            _ => Vec::new(),
        };

        let mut field_errors = Vec::new();
        Ok(ManifestMenu {
            name,
            path: Self::string(fields, "path", &mut field_errors),
            component: Self::string(fields, "component", &mut field_errors),
            redirect: Self::string(fields, "redirect", &mut field_errors),
            status: Self::integer(fields, "status", MenuStatus::ENABLED, &mut field_errors),
            sort: Self::integer(fields, "sort", 0, &mut field_errors),
            remark: Self::string(fields, "remark", &mut field_errors),
            meta,
            children,
            field_errors,
        })
    }

    // An empty list is accepted as an empty mapping: older exporters wrote
    // empty meta as `[]`.
    fn meta(fields: &Map<String, Value>, path: &NodePath) -> Result<MenuMeta, DomainError> {
        match fields.get("meta") {
            None | Some(Value::Null) => Ok(MenuMeta::new()),
            Some(Value::Object(meta)) => Ok(meta.clone()),
            Some(Value::Array(items)) if items.is_empty() => Ok(MenuMeta::new()),
            Some(_) => Err(DomainError::structural(path.to_string(), "`meta` must be a mapping")),
        }
    }

    // Mistyped scalars are not structural; they are left to fail their own
    // menu in the merger.
    fn string(fields: &Map<String, Value>, key: &'static str, errors: &mut Vec<String>) -> String {
        match fields.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(value)) => value.clone(),
            Some(_) => {
                errors.push(format!("`{}` must be a string", key));
                String::new()
            }
        }
    }

    fn integer(
        fields: &Map<String, Value>,
        key: &'static str,
        default: i32,
        errors: &mut Vec<String>,
    ) -> i32 {
        match fields.get(key) {
            None | Some(Value::Null) => default,
            Some(value) => match value.as_i64().and_then(|n| i32::try_from(n).ok()) {
                Some(n) => n,
                None => {
                    errors.push(format!("`{}` must be an integer", key));
                    default
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn locator(err: DomainError) -> String {
        match err {
            DomainError::StructuralError { locator, .. } => locator,
            other => panic!("expected structural error, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_exported_shape() {
        let data = json!({
            "version": "1.0.0",
            "export_time": "2024-01-01 00:00:00",
            "export_by": "prod",
            "total_count": 2,
            "menus": [{
                "name": "System",
                "path": "/system",
                "component": "",
                "redirect": "/system/users",
                "status": 1,
                "sort": 10,
                "remark": "",
                "meta": {"icon": "ri:settings-line", "hidden": false},
                "children": [{"name": "Users", "meta": []}]
            }]
        });

        let menus = ImportValidator::validate(&data).unwrap();

        assert_eq!(menus.len(), 1);
        assert_eq!(menus[0].redirect, "/system/users");
        assert_eq!(menus[0].sort, 10);
        assert_eq!(menus[0].meta["icon"], json!("ri:settings-line"));
        assert_eq!(menus[0].children[0].name, "Users");
        assert_eq!(menus[0].children[0].status, MenuStatus::ENABLED);
        assert!(menus[0].children[0].meta.is_empty());
    }

    #[test]
    fn test_rejects_missing_menus() {
        let err = ImportValidator::validate(&json!({"version": "1.0.0"})).unwrap_err();
        assert_eq!(locator(err), "menus");

        let err = ImportValidator::validate(&json!({"menus": {"name": "A"}})).unwrap_err();
        assert_eq!(locator(err), "menus");
    }

    #[test]
    fn test_rejects_second_root_without_name() {
        let data = json!({"menus": [{"name": "A"}, {"path": "/b"}, {"name": "C"}]});
        let err = ImportValidator::validate(&data).unwrap_err();
        assert_eq!(err.to_string(), "menus[1]: menu is missing a name");
    }

    #[test]
    fn test_rejects_blank_name() {
        let data = json!({"menus": [{"name": "   "}]});
        assert_eq!(locator(ImportValidator::validate(&data).unwrap_err()), "menus[0]");
    }

    #[test]
    fn test_locates_nested_defect() {
        let data = json!({"menus": [
            {"name": "A"},
            {"name": "B"},
            {"name": "C", "children": [
                {"name": "C1", "meta": "not-a-map"}
            ]}
        ]});
        let err = ImportValidator::validate(&data).unwrap_err();
        assert_eq!(err.to_string(), "menus[2].children[0]: `meta` must be a mapping");
    }

    #[test]
    fn test_stops_at_first_defect() {
        let data = json!({"menus": [
            {"name": "A", "children": [{"name": ""}]},
            {"path": "/no-name"}
        ]});
        assert_eq!(locator(ImportValidator::validate(&data).unwrap_err()), "menus[0].children[0]");
    }

    #[test]
    fn test_rejects_non_string_name() {
        let data = json!({"menus": [{"name": "A"}, {"name": 5}]});
        assert_eq!(
            ImportValidator::validate(&data).unwrap_err().to_string(),
            "menus[1]: `name` must be a string"
        );
    }

    #[test]
    fn test_ignores_children_that_are_not_a_list() {
        let data = json!({"menus": [{"name": "A", "children": "x"}]});
        let menus = ImportValidator::validate(&data).unwrap();

        assert!(menus[0].children.is_empty());
        assert!(menus[0].field_errors.is_empty());
    }

    #[test]
    fn test_carries_mistyped_fields_to_the_menu() {
        let data = json!({"menus": [
            {"name": "A", "sort": "3", "path": 7},
            {"name": "B", "status": 4294967296u64},
            {"name": "C", "sort": 2}
        ]});
        let menus = ImportValidator::validate(&data).unwrap();

        assert_eq!(
            menus[0].field_errors,
            vec!["`path` must be a string".to_string(), "`sort` must be an integer".to_string()]
        );
        assert_eq!(menus[0].sort, 0);
        assert_eq!(menus[1].field_errors, vec!["`status` must be an integer".to_string()]);
        assert_eq!(menus[1].status, MenuStatus::ENABLED);
        assert!(menus[2].field_errors.is_empty());
    }

    #[test]
    fn test_rejects_non_empty_list_meta() {
        let data = json!({"menus": [{"name": "A", "meta": ["icon"]}]});
        assert!(ImportValidator::validate(&data).is_err());
    }
}

//! Domain services (business logic)

pub mod exporter;
pub mod validator;
pub mod merger;
pub mod menu_migrate_service;

pub use exporter::TreeExporter;
pub use self::validator::ImportValidator;
pub use merger::TreeMerger;
pub use menu_migrate_service::MenuMigrateService;

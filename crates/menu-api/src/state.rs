use std::sync::Arc;

use menu_core::repositories::MenuRepository;
use menu_core::services::MenuMigrateService;

pub struct AppState<R: MenuRepository> {
    pub service: Arc<MenuMigrateService<R>>,
    pub max_upload_bytes: usize,
}

impl<R: MenuRepository> AppState<R> {
    pub fn new(service: Arc<MenuMigrateService<R>>, max_upload_bytes: usize) -> Self {
        Self { service, max_upload_bytes }
    }
}

impl<R: MenuRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

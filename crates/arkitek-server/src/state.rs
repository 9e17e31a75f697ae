use std::sync::Arc;

use arkitek_common::BootDefaults;
use arkitek_registry::LinkRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn LinkRegistry>,
    pub boot_defaults: Arc<BootDefaults>,
}

impl AppState {
    pub fn new(registry: Arc<dyn LinkRegistry>, boot_defaults: BootDefaults) -> Self {
        Self {
            registry,
            boot_defaults: Arc::new(boot_defaults),
        }
    }
}

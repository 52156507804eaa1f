//! Service Manifest

use crate::context::ServiceContext;

/// `on_start` / `on_stop`
pub type OnServiceLifecycle = fn(&ServiceContext);

/// Static service declaration
#[derive(Clone, Copy, Debug)]
pub struct ServiceManifest {
    /// Unique identifier
    pub id: &'static str,
    pub on_start: Option<OnServiceLifecycle>,
    pub on_stop: Option<OnServiceLifecycle>,
}

impl ServiceManifest {
    pub const fn new(id: &'static str) -> Self {
        Self {
            id,
            on_start: None,
            on_stop: None,
        }
    }
}

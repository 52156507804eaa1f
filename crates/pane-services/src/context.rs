//! Running service instances

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pane_hal::Configuration;

use crate::manifest::ServiceManifest;
use crate::runtime::Runtime;

type ServiceData = Arc<dyn Any + Send + Sync>;

/// Live instance of a running service.
pub struct ServiceContext {
    manifest: &'static ServiceManifest,
    data: Mutex<Option<ServiceData>>,
    runtime: Runtime,
}

impl ServiceContext {
    pub fn new(manifest: &'static ServiceManifest, runtime: Runtime) -> Self {
        Self {
            manifest,
            data: Mutex::new(None),
            runtime,
        }
    }

    pub fn manifest(&self) -> &'static ServiceManifest {
        self.manifest
    }

    pub fn id(&self) -> &'static str {
        self.manifest.id
    }

    /// Attach the service's payload, replacing any previous one.
    pub fn set_data<T: Any + Send + Sync>(&self, data: Arc<T>) {
        *self.slot() = Some(data);
    }

    /// The payload as `T`; `None` if unset or of another type.
    pub fn data<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let data = self.slot().clone()?;
        data.downcast::<T>().ok()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Shorthand for `runtime().configuration()`
    pub fn configuration(&self) -> &Arc<Configuration> {
        self.runtime.configuration()
    }

    fn slot(&self) -> MutexGuard<'_, Option<ServiceData>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("id", &self.manifest.id)
            .field("has_data", &self.slot().is_some())
            .finish()
    }
}

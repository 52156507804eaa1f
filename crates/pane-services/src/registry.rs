//! Service registry
//!
//! A flat, statically declared table of services. Any number of services
//! run at once; each has exactly one context while running.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pane_sync::RecursiveMutex;

use crate::context::ServiceContext;
use crate::error::ServiceError;
use crate::manifest::ServiceManifest;
use crate::runtime::Runtime;

const TAG: &str = "service_registry";

/// Declared services and the running subset.
pub struct ServiceRegistry {
    manifests: Vec<&'static ServiceManifest>,
    /// Running services, in start order
    running: Mutex<Vec<Arc<ServiceContext>>>,
    /// Serializes start/stop; reentrant so `on_start` may start other services
    lifecycle: RecursiveMutex<()>,
    runtime: Runtime,
}

impl ServiceRegistry {
    /// Build a registry; ids must be unique.
    pub fn new<I>(manifests: I, runtime: Runtime) -> Result<Self, ServiceError>
    where
        I: IntoIterator<Item = &'static ServiceManifest>,
    {
        let mut declared: Vec<&'static ServiceManifest> = Vec::new();
        for manifest in manifests {
            if declared.iter().any(|m| m.id == manifest.id) {
                log::error!(target: TAG, "duplicate service id {}", manifest.id);
                return Err(ServiceError::DuplicateId(manifest.id.to_string()));
            }
            declared.push(manifest);
        }

        Ok(Self {
            manifests: declared,
            running: Mutex::new(Vec::new()),
            lifecycle: RecursiveMutex::new(()),
            runtime,
        })
    }

    /// Start service `id`: create its context and run `on_start`.
    pub fn start_service(&self, id: &str) -> Result<(), ServiceError> {
        let _lifecycle = self.lifecycle.lock();

        let Some(manifest) = self.manifests.iter().copied().find(|m| m.id == id) else {
            log::warn!(target: TAG, "service {} not found", id);
            return Err(ServiceError::NotFound(id.to_string()));
        };
        if self.find_service(id).is_some() {
            log::warn!(target: TAG, "service {} already running", id);
            return Err(ServiceError::AlreadyRunning(id.to_string()));
        }

        log::info!(target: TAG, "starting {}", id);
        let context = Arc::new(ServiceContext::new(manifest, self.runtime.clone()));
        if let Some(on_start) = manifest.on_start {
            on_start(&context);
        }
        self.running().push(context);
        Ok(())
    }

    /// Stop service `id`: run `on_stop`, then drop its context.
    pub fn stop_service(&self, id: &str) -> Result<(), ServiceError> {
        let _lifecycle = self.lifecycle.lock();

        let Some(context) = self.find_service(id) else {
            log::warn!(target: TAG, "service {} not running", id);
            return Err(ServiceError::NotRunning(id.to_string()));
        };

        log::info!(target: TAG, "stopping {}", id);
        if let Some(on_stop) = context.manifest().on_stop {
            on_stop(&context);
        }
        self.running().retain(|c| !Arc::ptr_eq(c, &context));
        Ok(())
    }

    /// Stop every running service, most recently started first.
    pub fn stop_all(&self) {
        let _lifecycle = self.lifecycle.lock();
        let ids: Vec<&'static str> = self.running_services();
        for id in ids.into_iter().rev() {
            if let Err(e) = self.stop_service(id) {
                log::warn!(target: TAG, "stop_all: {}", e);
            }
        }
    }

    /// Context of a running service
    pub fn find_service(&self, id: &str) -> Option<Arc<ServiceContext>> {
        self.running().iter().find(|c| c.id() == id).cloned()
    }

    /// Payload of a running service, if it is a `T`
    pub fn service_data<T: Any + Send + Sync>(&self, id: &str) -> Option<Arc<T>> {
        self.find_service(id)?.data::<T>()
    }

    /// Ids of running services, in start order
    pub fn running_services(&self) -> Vec<&'static str> {
        self.running().iter().map(|c| c.id()).collect()
    }

    /// Every declared manifest
    pub fn manifests(&self) -> &[&'static ServiceManifest] {
        &self.manifests
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    fn running(&self) -> MutexGuard<'_, Vec<Arc<ServiceContext>>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("declared", &self.manifests.len())
            .field("running", &self.running_services())
            .finish()
    }
}

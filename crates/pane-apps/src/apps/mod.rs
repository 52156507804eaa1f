//! Builtin apps
//!
//! Each app lives in its own module and exposes a `static MANIFEST`.

pub mod hello_world;

use crate::manifest::AppManifest;

/// Manifests registered by default on every device
pub fn builtin() -> Vec<&'static AppManifest> {
    vec![&hello_world::MANIFEST]
}

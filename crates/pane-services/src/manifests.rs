//! Builtin service table

use crate::manifest::ServiceManifest;
use crate::services::{screenshot, sdcard};

/// Services every runtime declares, in start order.
pub fn builtin() -> Vec<&'static ServiceManifest> {
    vec![&sdcard::MANIFEST, &screenshot::MANIFEST]
}

//! Builtin background services

pub mod screenshot;
pub mod sdcard;

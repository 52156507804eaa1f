//! Service registry lifecycle
//!
//! - Start/stop/lookup and the warnings on misuse
//! - Payload access by type
//! - Builtin services

mod common;

use std::sync::{Arc, Mutex};

use pane_hal_mock::MockBoard;
use pane_services::{manifests, sdcard, test_utils, ServiceContext, ServiceError, ServiceManifest, ServiceRegistry};

use common::{fixture, fixture_with};

static ORDER: Mutex<Vec<String>> = Mutex::new(Vec::new());

fn record(ctx: &ServiceContext, what: &str) {
    ORDER.lock().unwrap().push(format!("{}:{}", ctx.id(), what));
}

fn wifi_start(ctx: &ServiceContext) {
    record(ctx, "start");
    ctx.set_data(Arc::new(String::from("connected")));
}

fn wifi_stop(ctx: &ServiceContext) {
    record(ctx, "stop");
}

fn gps_start(ctx: &ServiceContext) {
    record(ctx, "start");
}

fn gps_stop(ctx: &ServiceContext) {
    record(ctx, "stop");
}

static WIFI: ServiceManifest = ServiceManifest {
    on_start: Some(wifi_start),
    on_stop: Some(wifi_stop),
    ..ServiceManifest::new("Wifi")
};

static GPS: ServiceManifest = ServiceManifest {
    on_start: Some(gps_start),
    on_stop: Some(gps_stop),
    ..ServiceManifest::new("Gps")
};

static PLAIN: ServiceManifest = ServiceManifest::new("Plain");

fn registry(manifests: Vec<&'static ServiceManifest>) -> ServiceRegistry {
    ServiceRegistry::new(manifests, fixture(&[]).runtime).unwrap()
}

fn order_for(prefixes: &[&str]) -> Vec<String> {
    ORDER
        .lock()
        .unwrap()
        .iter()
        .filter(|e| prefixes.iter().any(|p| e.starts_with(p)))
        .cloned()
        .collect()
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_start_find_and_stop() {
    let registry = registry(vec![&PLAIN]);

    registry.start_service("Plain").unwrap();
    assert!(registry.find_service("Plain").is_some());
    assert_eq!(registry.running_services(), vec!["Plain"]);

    registry.stop_service("Plain").unwrap();
    assert!(registry.find_service("Plain").is_none());
}

#[test]
fn test_service_data_by_type() {
    let registry = registry(vec![&WIFI]);
    registry.start_service("Wifi").unwrap();

    let status = registry.service_data::<String>("Wifi").unwrap();
    assert_eq!(status.as_str(), "connected");
    assert!(registry.service_data::<u32>("Wifi").is_none());
    assert!(registry.service_data::<String>("Gps").is_none());

    registry.stop_service("Wifi").unwrap();
}

#[test]
fn test_stop_all_in_reverse_start_order() {
    let registry = registry(vec![&WIFI, &GPS]);
    registry.start_service("Wifi").unwrap();
    registry.start_service("Gps").unwrap();

    registry.stop_all();

    assert!(registry.running_services().is_empty());
    let order = order_for(&["Wifi", "Gps"]);
    let stops: Vec<&String> = order.iter().filter(|e| e.ends_with(":stop")).collect();
    assert_eq!(stops, vec!["Gps:stop", "Wifi:stop"]);
}

// =============================================================================
// Misuse
// =============================================================================

#[test]
fn test_unknown_service_warns() {
    test_utils::init();
    let registry = registry(vec![&PLAIN]);

    assert_eq!(
        registry.start_service("Bluetooth"),
        Err(ServiceError::NotFound(String::from("Bluetooth")))
    );
    assert!(test_utils::has_warning("service_registry", "Bluetooth not found"));
}

#[test]
fn test_double_start_warns_and_keeps_one_context() {
    test_utils::init();
    let registry = registry(vec![&PLAIN]);
    registry.start_service("Plain").unwrap();
    let first = registry.find_service("Plain").unwrap();

    assert_eq!(
        registry.start_service("Plain"),
        Err(ServiceError::AlreadyRunning(String::from("Plain")))
    );
    assert!(Arc::ptr_eq(&first, &registry.find_service("Plain").unwrap()));
    assert!(test_utils::has_warning("service_registry", "already running"));
}

#[test]
fn test_stop_of_stopped_service_warns() {
    test_utils::init();
    let registry = registry(vec![&PLAIN]);

    assert_eq!(
        registry.stop_service("Plain"),
        Err(ServiceError::NotRunning(String::from("Plain")))
    );
    assert!(test_utils::has_warning("service_registry", "not running"));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let result = ServiceRegistry::new(vec![&PLAIN, &PLAIN], fixture(&[]).runtime);
    assert!(matches!(result, Err(ServiceError::DuplicateId(id)) if id == "Plain"));
}

// =============================================================================
// Builtin services
// =============================================================================

#[test]
fn test_builtin_services_start_on_mock_board() {
    let registry = ServiceRegistry::new(manifests::builtin(), fixture(&[]).runtime).unwrap();

    for manifest in manifests::builtin() {
        registry.start_service(manifest.id).unwrap();
    }

    let monitor = sdcard::opt_service(&registry).unwrap();
    assert!(monitor.is_running());
    assert!(pane_services::screenshot::opt_service(&registry).is_some());

    registry.stop_all();
    assert!(!monitor.is_running());
}

#[test]
fn test_sdcard_service_idles_without_card() {
    let f = fixture_with(MockBoard::named("nocard").without_sdcard(), &[]);
    let registry = ServiceRegistry::new(manifests::builtin(), f.runtime).unwrap();

    registry.start_service("sdcard").unwrap();

    assert!(registry.find_service("sdcard").is_some());
    assert!(sdcard::opt_service(&registry).is_none());
}

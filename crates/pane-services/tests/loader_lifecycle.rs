//! App lifecycle through the loader
//!
//! - Start/stop transitions and callback order
//! - At most one app shown
//! - Restart of a running app
//! - Result delivery and app data lookup

mod common;

use std::cell::RefCell;
use std::sync::{Arc, Mutex};

use pane_apps::{AppContext, AppManifest, AppResult, AppState, Bundle};
use pane_services::{test_utils, LoaderError, LoaderEvent};

use common::fixture;

thread_local! {
    static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn record(event: String) {
    EVENTS.with(|events| events.borrow_mut().push(event));
}

fn events() -> Vec<String> {
    EVENTS.with(|events| events.borrow().clone())
}

fn clear_events() {
    EVENTS.with(|events| events.borrow_mut().clear());
}

fn on_start(ctx: &AppContext) {
    record(format!("{}:start", ctx.id()));
}

fn on_stop(ctx: &AppContext) {
    record(format!("{}:stop", ctx.id()));
}

fn on_hide(ctx: &AppContext) {
    record(format!("{}:hide", ctx.id()));
}

fn on_result(ctx: &AppContext, result: AppResult, bundle: Option<&Bundle>) {
    let answer = bundle.and_then(|b| b.get_string("answer")).unwrap_or("-");
    record(format!("{}:result:{:?}:{}", ctx.id(), result, answer));
}

const fn tracked(id: &'static str) -> AppManifest {
    AppManifest {
        on_start: Some(on_start),
        on_stop: Some(on_stop),
        on_hide: Some(on_hide),
        on_result: Some(on_result),
        ..AppManifest::new(id, id)
    }
}

static ALPHA: AppManifest = tracked("Alpha");
static BETA: AppManifest = tracked("Beta");
static GAMMA: AppManifest = tracked("Gamma");

fn start_beta_from_start(ctx: &AppContext) {
    record(format!("{}:start", ctx.id()));
    ctx.start_app("Beta", None).unwrap();
}

static LAUNCHER: AppManifest = AppManifest {
    on_start: Some(start_beta_from_start),
    ..tracked("Launcher")
};

fn attach_counter(ctx: &AppContext) {
    ctx.set_data(Arc::new(Mutex::new(7u32)));
}

static COUNTER: AppManifest = AppManifest {
    on_start: Some(attach_counter),
    ..AppManifest::new("Counter", "Counter")
};

fn stop_from_start(ctx: &AppContext) {
    record(format!("{}:start", ctx.id()));
    ctx.stop().unwrap();
}

static QUITTER: AppManifest = AppManifest {
    on_start: Some(stop_from_start),
    ..tracked("Quitter")
};

static ALL: [&AppManifest; 6] = [&ALPHA, &BETA, &GAMMA, &LAUNCHER, &COUNTER, &QUITTER];

fn shown_count(loader: &pane_services::Loader) -> usize {
    loader
        .contexts()
        .iter()
        .filter(|ctx| ctx.state() == AppState::Shown)
        .count()
}

// =============================================================================
// Start / stop
// =============================================================================

#[test]
fn test_start_runs_on_start_and_shows() {
    clear_events();
    let f = fixture(&ALL);

    f.loader.start_app("Alpha").unwrap();

    let current = f.loader.current_app().unwrap();
    assert_eq!(current.id(), "Alpha");
    assert_eq!(current.state(), AppState::Shown);
    assert_eq!(f.gui.current_app().unwrap().id(), "Alpha");
    assert_eq!(events(), vec!["Alpha:start"]);
}

#[test]
fn test_unknown_app_is_rejected_with_warning() {
    test_utils::init();
    let f = fixture(&ALL);

    assert_eq!(
        f.loader.start_app("Nope"),
        Err(LoaderError::AppNotFound(String::from("Nope")))
    );
    assert!(f.loader.running_apps().is_empty());
    assert!(test_utils::has_warning("loader", "Nope"));
}

#[test]
fn test_stop_without_app_warns() {
    test_utils::init();
    let f = fixture(&ALL);

    assert_eq!(f.loader.stop_app(), Err(LoaderError::NoAppRunning));
    assert!(test_utils::has_warning("loader", "no app running"));
}

#[test]
fn test_hide_runs_before_next_show() {
    clear_events();
    let f = fixture(&ALL);

    f.loader.start_app("Alpha").unwrap();
    f.loader.start_app("Beta").unwrap();

    assert_eq!(events(), vec!["Alpha:start", "Alpha:hide", "Beta:start"]);
    assert_eq!(f.loader.running_apps(), vec!["Alpha", "Beta"]);
    assert_eq!(f.loader.contexts()[0].state(), AppState::Hidden);
    assert_eq!(f.gui.current_app().unwrap().id(), "Beta");
}

#[test]
fn test_stop_shows_parent_again() {
    clear_events();
    let f = fixture(&ALL);
    f.loader.start_app("Alpha").unwrap();
    f.loader.start_app("Beta").unwrap();
    clear_events();

    f.loader.stop_app().unwrap();

    assert_eq!(events(), vec!["Beta:hide", "Beta:stop"]);
    let current = f.loader.current_app().unwrap();
    assert_eq!(current.id(), "Alpha");
    assert_eq!(current.state(), AppState::Shown);
    assert_eq!(f.gui.current_app().unwrap().id(), "Alpha");
}

#[test]
fn test_stopping_last_app_clears_gui() {
    let f = fixture(&ALL);
    f.loader.start_app("Alpha").unwrap();
    let alpha = f.loader.current_app().unwrap();

    f.loader.stop_app().unwrap();

    assert_eq!(alpha.state(), AppState::Stopped);
    assert!(f.loader.current_app().is_none());
    assert!(f.gui.current_app().is_none());
}

#[test]
fn test_events_are_published_in_order() {
    let f = fixture(&ALL);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    f.loader
        .pubsub()
        .subscribe(move |event: &LoaderEvent| sink.lock().unwrap().push(*event));

    f.loader.start_app("Alpha").unwrap();
    f.loader.start_app("Beta").unwrap();
    f.loader.stop_app().unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            LoaderEvent::AppStarted { id: "Alpha" },
            LoaderEvent::AppShowing { id: "Alpha" },
            LoaderEvent::AppHiding { id: "Alpha" },
            LoaderEvent::AppStarted { id: "Beta" },
            LoaderEvent::AppShowing { id: "Beta" },
            LoaderEvent::AppHiding { id: "Beta" },
            LoaderEvent::AppStopped { id: "Beta" },
            LoaderEvent::AppShowing { id: "Alpha" },
        ]
    );
}

#[test]
fn test_app_stopped_in_on_start_is_never_reported_started() {
    clear_events();
    let f = fixture(&ALL);
    f.loader.start_app("Alpha").unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    f.loader
        .pubsub()
        .subscribe(move |event: &LoaderEvent| sink.lock().unwrap().push(*event));

    f.loader.start_app("Quitter").unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            LoaderEvent::AppHiding { id: "Alpha" },
            LoaderEvent::AppStopped { id: "Quitter" },
            LoaderEvent::AppShowing { id: "Alpha" },
        ]
    );
    assert_eq!(f.loader.running_apps(), vec!["Alpha"]);
    assert!(events().ends_with(&[String::from("Quitter:start"), String::from("Quitter:stop")]));
}

// =============================================================================
// Invariants
// =============================================================================

#[test]
fn test_at_most_one_app_shown() {
    let f = fixture(&ALL);
    let script = [
        "Alpha", "Beta", "-", "Gamma", "Beta", "-", "-", "Alpha", "Gamma", "Launcher", "-", "-",
        "-", "-", "-",
    ];

    for step in script {
        if step == "-" {
            let _ = f.loader.stop_app();
        } else {
            f.loader.start_app(step).unwrap();
        }
        assert!(shown_count(&f.loader) <= 1, "after {}", step);
        if let Some(current) = f.loader.current_app() {
            assert_eq!(current.state(), AppState::Shown, "after {}", step);
        }
    }
}

#[test]
fn test_restart_unwinds_to_existing_instance() {
    clear_events();
    let f = fixture(&ALL);
    f.loader.start_app("Alpha").unwrap();
    f.loader.start_app("Beta").unwrap();
    f.loader.start_app("Gamma").unwrap();
    let first_beta = f.loader.contexts()[1].clone();
    clear_events();

    f.loader.start_app("Beta").unwrap();

    assert_eq!(f.loader.running_apps(), vec!["Alpha", "Beta"]);
    assert_eq!(first_beta.state(), AppState::Stopped);
    assert!(!Arc::ptr_eq(&first_beta, &f.loader.current_app().unwrap()));
    assert_eq!(
        events(),
        vec!["Gamma:hide", "Gamma:stop", "Beta:stop", "Beta:start"]
    );
}

#[test]
fn test_start_from_on_start_leaves_launcher_hidden() {
    clear_events();
    let f = fixture(&ALL);

    f.loader.start_app("Launcher").unwrap();

    assert_eq!(f.loader.running_apps(), vec!["Launcher", "Beta"]);
    assert_eq!(f.loader.contexts()[0].state(), AppState::Hidden);
    assert_eq!(f.loader.current_app().unwrap().state(), AppState::Shown);
    assert_eq!(shown_count(&f.loader), 1);

    f.loader.stop_app().unwrap();
    assert_eq!(f.loader.current_app().unwrap().id(), "Launcher");
    assert_eq!(f.loader.current_app().unwrap().state(), AppState::Shown);
}

// =============================================================================
// Results and data
// =============================================================================

#[test]
fn test_result_is_delivered_to_parent() {
    clear_events();
    let f = fixture(&ALL);
    f.loader.start_app("Alpha").unwrap();
    f.loader.start_app("Beta").unwrap();

    let mut bundle = Bundle::new();
    bundle.put_string("answer", "42");
    f.loader
        .current_app()
        .unwrap()
        .set_result(AppResult::Ok, Some(bundle));
    clear_events();

    f.loader.stop_app().unwrap();

    assert_eq!(
        events(),
        vec!["Beta:hide", "Beta:stop", "Alpha:result:Ok:42"]
    );
}

#[test]
fn test_no_result_means_no_callback() {
    clear_events();
    let f = fixture(&ALL);
    f.loader.start_app("Alpha").unwrap();
    f.loader.start_app("Beta").unwrap();
    clear_events();

    f.loader.stop_app().unwrap();

    assert!(events().iter().all(|e| !e.contains("result")));
}

#[test]
fn test_app_stops_itself_through_context() {
    let f = fixture(&ALL);
    f.loader.start_app("Alpha").unwrap();
    f.loader.start_app("Beta").unwrap();

    let beta = f.loader.current_app().unwrap();
    beta.set_result(AppResult::Cancelled, None);
    beta.stop().unwrap();

    assert_eq!(f.loader.running_apps(), vec!["Alpha"]);
    assert!(events().contains(&String::from("Alpha:result:Cancelled:-")));
}

#[test]
fn test_app_data_requires_matching_id_and_type() {
    let f = fixture(&ALL);
    f.loader.start_app("Counter").unwrap();

    let counter = f.loader.app_data::<Mutex<u32>>("Counter").unwrap();
    assert_eq!(*counter.lock().unwrap(), 7);

    assert!(f.loader.app_data::<Mutex<u32>>("Alpha").is_none());
    assert!(f.loader.app_data::<String>("Counter").is_none());
}

#[test]
fn test_stop_all_empties_stack_top_down() {
    clear_events();
    let f = fixture(&ALL);
    f.loader.start_app("Alpha").unwrap();
    f.loader.start_app("Beta").unwrap();
    clear_events();

    f.loader.stop_all();

    assert!(f.loader.running_apps().is_empty());
    assert_eq!(events(), vec!["Beta:hide", "Beta:stop", "Alpha:stop"]);
}

//! App Manifest
//!
//! Declares app identity and lifecycle callbacks.

use pane_render::{NodeId, WidgetTree};

use crate::bundle::{AppResult, Bundle};
use crate::context::AppContext;

/// `on_start` / `on_stop` / `on_hide`
pub type OnLifecycle = fn(&AppContext);

/// `on_show`: populate `container`, which is empty on every call
pub type OnShow = fn(&AppContext, &mut WidgetTree, NodeId);

/// `on_result`: a child app returned
pub type OnResult = fn(&AppContext, AppResult, Option<&Bundle>);

/// Category tag, used by launchers to group apps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppType {
    /// Shown while the system boots
    Boot,
    /// The home screen
    Launcher,
    /// Listed in the settings app
    Settings,
    /// Regular user-facing app
    User,
    /// System utility
    System,
    /// Not listed anywhere; started programmatically
    Hidden,
}

/// Application manifest
///
/// Declared as a `static` and registered with the
/// [`AppRegistry`](crate::AppRegistry):
///
/// ```
/// use pane_apps::{AppManifest, AppType};
///
/// static SETTINGS: AppManifest = AppManifest {
///     app_type: AppType::Settings,
///     ..AppManifest::new("TimeDateSettings", "Time & Date")
/// };
/// assert_eq!(SETTINGS.id, "TimeDateSettings");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct AppManifest {
    /// Unique identifier
    pub id: &'static str,

    /// Human-readable name, shown in the toolbar
    pub name: &'static str,

    /// Icon asset path or symbol
    pub icon: Option<&'static str>,

    pub app_type: AppType,

    pub on_start: Option<OnLifecycle>,
    pub on_stop: Option<OnLifecycle>,
    pub on_show: Option<OnShow>,
    pub on_hide: Option<OnLifecycle>,
    pub on_result: Option<OnResult>,
}

impl AppManifest {
    /// A user app with no callbacks
    pub const fn new(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            icon: None,
            app_type: AppType::User,
            on_start: None,
            on_stop: None,
            on_show: None,
            on_hide: None,
            on_result: None,
        }
    }

    /// Whether launchers should list this app
    pub fn is_listed(&self) -> bool {
        !matches!(self.app_type, AppType::Hidden | AppType::Boot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static HIDDEN: AppManifest = AppManifest {
        app_type: AppType::Hidden,
        ..AppManifest::new("Splash", "Splash")
    };

    #[test]
    fn test_new_has_no_callbacks() {
        let manifest = AppManifest::new("HelloWorld", "Hello World");
        assert_eq!(manifest.app_type, AppType::User);
        assert!(manifest.on_start.is_none());
        assert!(manifest.on_show.is_none());
        assert!(manifest.on_result.is_none());
        assert!(manifest.is_listed());
    }

    #[test]
    fn test_hidden_not_listed() {
        assert!(!HIDDEN.is_listed());
    }
}

pub mod display;
pub mod preferences;

pub use display::{DisplayMode, Palette};
pub use preferences::{EditorPreferences, Preferences, PreferencesError, PreferencesStore, UiPreferences};

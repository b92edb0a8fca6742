use sandpad_settings::{DisplayMode, Palette};
use serde::Serialize;

use crate::tabs::TabSession;

/// 分頁外觀。 / Resolved colours for one tab.
///
/// Idle tabs have no background of their own and show the strip behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabStyle {
    pub text: &'static str,
    pub background: Option<&'static str>,
    /// Preview tabs render their title in italics.
    pub italic: bool,
}

impl TabStyle {
    pub fn resolve(palette: &Palette, is_active: bool, is_preview: bool) -> Self {
        let (text, background) = if is_active {
            (palette.tab_active_text, Some(palette.tab_active_background))
        } else {
            (palette.tab_idle, None)
        };
        Self {
            text,
            background,
            italic: is_preview,
        }
    }
}

/// 分頁列上的單一分頁。 / One rendered tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabItem {
    pub key: String,
    pub title: String,
    pub tooltip: String,
    pub is_preview: bool,
    pub is_active: bool,
    pub style: TabStyle,
}

/// Pinned tabs in order, then the preview tab if any.
/// 依序列出釘選分頁，預覽分頁排在最後。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabStrip {
    /// Strip background for the display mode.
    pub background: &'static str,
    pub tabs: Vec<TabItem>,
}

impl TabStrip {
    pub fn from_session(session: &TabSession, mode: DisplayMode) -> Self {
        let palette = mode.palette();
        let pinned = session
            .opened_files()
            .iter()
            .map(|key| tab_item(session, &palette, key, false));
        let preview = session
            .preview_file()
            .map(|key| tab_item(session, &palette, key, true));
        Self {
            background: palette.tab_strip,
            tabs: pinned.chain(preview).collect(),
        }
    }

    pub fn active(&self) -> Option<&TabItem> {
        self.tabs.iter().find(|tab| tab.is_active)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

/// Last path segment, or the whole key when it has none.
pub fn tab_title(key: &str) -> &str {
    key.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(key)
}

fn tab_item(session: &TabSession, palette: &Palette, key: &str, is_preview: bool) -> TabItem {
    let is_active = session.active_file() == key;
    TabItem {
        key: key.to_string(),
        title: tab_title(key).to_string(),
        tooltip: if is_preview {
            format!("{key} (Preview)")
        } else {
            key.to_string()
        },
        is_preview,
        is_active,
        style: TabStyle::resolve(palette, is_active, is_preview),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::TabSessionManager;

    #[test]
    fn preview_tab_renders_last() {
        let mut manager = TabSessionManager::new("src/app.jsx");
        manager.open_persistent("index.html");
        manager.open_preview("src/pages/home.jsx");
        let strip = TabStrip::from_session(manager.session(), DisplayMode::Dark);

        let titles: Vec<&str> = strip.tabs.iter().map(|tab| tab.title.as_str()).collect();
        assert_eq!(titles, vec!["app.jsx", "index.html", "home.jsx"]);
        let preview = strip.tabs.last().unwrap();
        assert!(preview.is_preview);
        assert_eq!(preview.tooltip, "src/pages/home.jsx (Preview)");
        assert_eq!(strip.active().map(|tab| tab.key.as_str()), Some("src/pages/home.jsx"));
    }

    #[test]
    fn styles_follow_display_mode() {
        let mut manager = TabSessionManager::new("src/app.jsx");
        manager.open_preview("index.html");

        let dark = TabStrip::from_session(manager.session(), DisplayMode::Dark);
        assert_eq!(dark.background, "#111827");
        let pinned = &dark.tabs[0];
        assert_eq!(pinned.style.text, "#D1D5DB");
        assert_eq!(pinned.style.background, None);
        assert!(!pinned.style.italic);
        let preview = &dark.tabs[1];
        assert_eq!(preview.style.text, "#FFFFFF");
        assert_eq!(preview.style.background, Some("#030712"));
        assert!(preview.style.italic);

        let light = TabStrip::from_session(manager.session(), DisplayMode::Light);
        assert_eq!(light.background, "#F5F5F5");
        assert_eq!(light.tabs[0].style.text, "#404040");
        assert_eq!(light.tabs[1].style.text, "#171717");
        assert_eq!(light.tabs[1].style.background, Some("#FFFFFF"));
    }

    #[test]
    fn titles_ignore_trailing_and_leading_slashes() {
        assert_eq!(tab_title("/App.jsx"), "App.jsx");
        assert_eq!(tab_title("src/"), "src");
        assert_eq!(tab_title(""), "");
    }
}

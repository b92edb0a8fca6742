use serde::{Deserialize, Serialize};

/// 介面顯示模式。 / Light or dark presentation, passed explicitly to views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Light,
    #[default]
    Dark,
}

impl DisplayMode {
    /// 對應的色票。 / Colours used by the sidebar and tab strip.
    pub fn palette(self) -> Palette {
        match self {
            DisplayMode::Light => Palette {
                text: "#262626",
                hover: "#E5E5E5",
                active_row: "#D4D4D4",
                tab_strip: "#F5F5F5",
                tab_idle: "#404040",
                tab_active_background: "#FFFFFF",
                tab_active_text: "#171717",
            },
            DisplayMode::Dark => Palette {
                text: "#E5E5E5",
                hover: "#262626",
                active_row: "#404040",
                tab_strip: "#111827",
                tab_idle: "#D1D5DB",
                tab_active_background: "#030712",
                tab_active_text: "#FFFFFF",
            },
        }
    }
}

/// 固定色票（十六進位）。 / Hex colour tokens for one display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub text: &'static str,
    pub hover: &'static str,
    pub active_row: &'static str,
    pub tab_strip: &'static str,
    pub tab_idle: &'static str,
    pub tab_active_background: &'static str,
    pub tab_active_text: &'static str,
}

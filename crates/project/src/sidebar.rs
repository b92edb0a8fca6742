//! Sidebar view model: folder open state plus flattened, styled rows.
//! 側欄檢視模型：資料夾展開狀態與展平後的列。

use std::collections::BTreeSet;

use sandpad_settings::DisplayMode;
use sandpad_template::Descriptor;

use crate::tree::{TreeBuilder, TreeNode};

const BASE_INDENT_PX: u32 = 8;
const INDENT_STEP_PX: u32 = 12;

/// Left padding for a row at `depth`.
pub fn indent_for_depth(depth: usize) -> u32 {
    BASE_INDENT_PX + depth as u32 * INDENT_STEP_PX
}

/// 列的呈現樣式。 / Colours applied to one sidebar row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStyle {
    pub text: &'static str,
    pub hover: &'static str,
    /// Present only on the active file row.
    pub background: Option<&'static str>,
}

impl RowStyle {
    fn resolve(mode: DisplayMode, is_active: bool) -> Self {
        let palette = mode.palette();
        Self {
            text: palette.text,
            hover: palette.hover,
            background: is_active.then_some(palette.active_row),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow<'a> {
    pub node: &'a TreeNode,
    pub depth: usize,
    pub indent_px: u32,
    /// `None` for files.
    pub is_open: Option<bool>,
    pub is_active: bool,
    pub style: RowStyle,
}

/// Holds the forest derived from the current descriptor.
/// 由目前描述子衍生的樹；描述子變更時才重新計算。
#[derive(Debug, Clone)]
pub struct Sidebar {
    nodes: Vec<TreeNode>,
    collapsed: BTreeSet<String>,
    display_mode: DisplayMode,
}

impl Sidebar {
    pub fn new(descriptor: &Descriptor, display_mode: DisplayMode) -> Self {
        Self {
            nodes: TreeBuilder::build(descriptor),
            collapsed: BTreeSet::new(),
            display_mode,
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }

    /// Rebuilds the forest. Collapsed folders that still exist stay collapsed.
    /// 重新建立樹；仍存在的已收合資料夾維持收合。
    pub fn replace_descriptor(&mut self, descriptor: &Descriptor) {
        self.nodes = TreeBuilder::build(descriptor);
        let mut surviving = BTreeSet::new();
        collect_directories(&self.nodes, &mut surviving);
        self.collapsed.retain(|path| surviving.contains(path));
    }

    /// Folders start open.
    pub fn is_open(&self, display_path: &str) -> bool {
        !self.collapsed.contains(display_path)
    }

    /// Flips a folder and returns its new open state.
    pub fn toggle(&mut self, display_path: &str) -> bool {
        if self.collapsed.remove(display_path) {
            true
        } else {
            self.collapsed.insert(display_path.to_string());
            false
        }
    }

    /// Visible rows in display order; children of closed folders are skipped.
    /// 依顯示順序列出可見的列。
    pub fn rows(&self, active_key: &str) -> Vec<SidebarRow<'_>> {
        let mut rows = Vec::new();
        self.push_rows(&self.nodes, 0, active_key, &mut rows);
        rows
    }

    fn push_rows<'a>(
        &'a self,
        nodes: &'a [TreeNode],
        depth: usize,
        active_key: &str,
        rows: &mut Vec<SidebarRow<'a>>,
    ) {
        for node in nodes {
            let is_active = node.exact_key() == Some(active_key);
            let is_open = node
                .children()
                .map(|_| self.is_open(&node.display_path));
            rows.push(SidebarRow {
                node,
                depth,
                indent_px: indent_for_depth(depth),
                is_open,
                is_active,
                style: RowStyle::resolve(self.display_mode, is_active),
            });
            if let (Some(children), Some(true)) = (node.children(), is_open) {
                self.push_rows(children, depth + 1, active_key, rows);
            }
        }
    }
}

fn collect_directories(nodes: &[TreeNode], into: &mut BTreeSet<String>) {
    for node in nodes {
        if let Some(children) = node.children() {
            into.insert(node.display_path.clone());
            collect_directories(children, into);
        }
    }
}

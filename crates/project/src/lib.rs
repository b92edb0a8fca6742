//! Sidebar tree primitives for SandPad.
//! SandPad 側欄檔案樹的核心模組。

pub mod sidebar;
pub mod tree;

pub use sidebar::{indent_for_depth, RowStyle, Sidebar, SidebarRow};
pub use tree::{compare_nodes, TreeBuilder, TreeError, TreeNode, TreeNodeKind};

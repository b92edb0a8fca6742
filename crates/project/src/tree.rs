use std::cmp::Ordering;
use std::collections::BTreeMap;

use sandpad_template::{join_key, Descriptor, DescriptorNode};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Sidebar-facing node kind. Files carry their exact key, directories their children.
/// 側欄節點類型：檔案帶有完整鍵值，資料夾帶有子節點。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNodeKind {
    Directory { children: Vec<TreeNode> },
    File { exact_key: String },
}

/// One entry of the sidebar forest.
/// 側欄樹中的單一節點。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    /// Slash-joined path from the root, no leading slash.
    pub display_path: String,
    pub kind: TreeNodeKind,
}

impl TreeNode {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, TreeNodeKind::File { .. })
    }

    /// 檔案節點的完整鍵值。 / Key addressing the descriptor and the mounted filesystem.
    pub fn exact_key(&self) -> Option<&str> {
        match &self.kind {
            TreeNodeKind::File { exact_key } => Some(exact_key.as_str()),
            TreeNodeKind::Directory { .. } => None,
        }
    }

    pub fn children(&self) -> Option<&[TreeNode]> {
        match &self.kind {
            TreeNodeKind::Directory { children } => Some(children.as_slice()),
            TreeNodeKind::File { .. } => None,
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .map_or(0, |children| children.iter().map(TreeNode::subtree_len).sum())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SerializedNode<'a> {
    name: &'a str,
    display_path: &'a str,
    exact_key: Option<&'a str>,
    is_file: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<&'a [TreeNode]>,
}

impl Serialize for TreeNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SerializedNode {
            name: &self.name,
            display_path: &self.display_path,
            exact_key: self.exact_key(),
            is_file: self.is_file(),
            children: self.children(),
        }
        .serialize(serializer)
    }
}

/// Errors raised when flat keys cannot form a tree.
/// 平面鍵值無法組成樹狀結構時的錯誤。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("key '{key}' is empty")]
    EmptyKey { key: String },
    #[error("key '{key}' nests below file '{file}'")]
    FileAsDirectory { key: String, file: String },
    #[error("key '{key}' names an existing directory")]
    DirectoryAsFile { key: String },
    #[error("keys '{first}' and '{second}' address the same file")]
    Duplicate { first: String, second: String },
}

/// Converts descriptors (or flat key lists) into an ordered forest.
/// 將描述子（或平面鍵值清單）轉為排序後的樹。
pub struct TreeBuilder;

impl TreeBuilder {
    /// Pure and idempotent; directories sort before files, names compare byte-wise.
    /// 純函式：資料夾排在檔案之前，名稱以位元組順序比較。
    pub fn build(descriptor: &Descriptor) -> Vec<TreeNode> {
        build_level(descriptor, "")
    }

    /// Builds the same forest from keys such as `src/App.jsx`.
    /// Leading slashes are ignored for structure; `exact_key` keeps the key as given.
    /// 以平面鍵值建立樹；結構忽略開頭斜線，但 `exact_key` 保留原始鍵值。
    pub fn from_keys<I, S>(keys: I) -> Result<Vec<TreeNode>, TreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = Draft::default();
        for key in keys {
            root.insert(key.as_ref())?;
        }
        Ok(root.finish(""))
    }
}

fn build_level(descriptor: &Descriptor, parent: &str) -> Vec<TreeNode> {
    let mut nodes: Vec<TreeNode> = descriptor
        .iter()
        .map(|(name, node)| {
            let display_path = join_key(parent, name);
            let kind = match node {
                DescriptorNode::Directory(children) => TreeNodeKind::Directory {
                    children: build_level(children, &display_path),
                },
                DescriptorNode::File(_) => TreeNodeKind::File {
                    exact_key: display_path.clone(),
                },
            };
            TreeNode {
                name: name.clone(),
                display_path,
                kind,
            }
        })
        .collect();
    nodes.sort_by(compare_nodes);
    nodes
}

/// Directories first, then byte-wise name order. Never locale dependent.
pub fn compare_nodes(left: &TreeNode, right: &TreeNode) -> Ordering {
    left.is_file()
        .cmp(&right.is_file())
        .then_with(|| left.name.as_bytes().cmp(right.name.as_bytes()))
}

#[derive(Default)]
struct Draft {
    children: BTreeMap<String, DraftNode>,
}

enum DraftNode {
    Directory(Draft),
    File(String),
}

impl Draft {
    fn insert(&mut self, key: &str) -> Result<(), TreeError> {
        let trimmed = key.trim_start_matches('/');
        let parts: Vec<&str> = trimmed.split('/').filter(|part| !part.is_empty()).collect();
        let (leaf, parents) = parts.split_last().ok_or_else(|| TreeError::EmptyKey {
            key: key.to_string(),
        })?;

        let mut cursor = self;
        for part in parents {
            let node = cursor
                .children
                .entry((*part).to_string())
                .or_insert_with(|| DraftNode::Directory(Draft::default()));
            cursor = match node {
                DraftNode::Directory(draft) => draft,
                DraftNode::File(file) => {
                    return Err(TreeError::FileAsDirectory {
                        key: key.to_string(),
                        file: file.clone(),
                    })
                }
            };
        }

        match cursor.children.get(*leaf) {
            Some(DraftNode::File(existing)) => Err(TreeError::Duplicate {
                first: existing.clone(),
                second: key.to_string(),
            }),
            Some(DraftNode::Directory(_)) => Err(TreeError::DirectoryAsFile {
                key: key.to_string(),
            }),
            None => {
                cursor
                    .children
                    .insert((*leaf).to_string(), DraftNode::File(key.to_string()));
                Ok(())
            }
        }
    }

    fn finish(self, parent: &str) -> Vec<TreeNode> {
        let mut nodes: Vec<TreeNode> = self
            .children
            .into_iter()
            .map(|(name, node)| {
                let display_path = join_key(parent, &name);
                let kind = match node {
                    DraftNode::Directory(draft) => TreeNodeKind::Directory {
                        children: draft.finish(&display_path),
                    },
                    DraftNode::File(exact_key) => TreeNodeKind::File { exact_key },
                };
                TreeNode {
                    name,
                    display_path,
                    kind,
                }
            })
            .collect();
        nodes.sort_by(compare_nodes);
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(paths: &[&str]) -> Descriptor {
        let mut descriptor = Descriptor::new();
        for path in paths {
            descriptor.insert_file(path, format!("// {path}")).unwrap();
        }
        descriptor
    }

    #[test]
    fn src_directory_with_two_files() {
        let forest = TreeBuilder::build(&descriptor(&["src/main.jsx", "src/App.jsx"]));
        assert_eq!(forest.len(), 1);
        let src = &forest[0];
        assert_eq!(src.name, "src");
        assert!(!src.is_file());
        assert_eq!(src.exact_key(), None);

        let children = src.children().unwrap();
        let names: Vec<&str> = children.iter().map(|node| node.name.as_str()).collect();
        // Byte order puts upper-case before lower-case.
        assert_eq!(names, vec!["App.jsx", "main.jsx"]);
        assert_eq!(children[0].exact_key(), Some("src/App.jsx"));
        assert_eq!(children[0].display_path, "src/App.jsx");
        assert!(children.iter().all(|child| child.children().is_none()));
    }

    #[test]
    fn directories_sort_before_files() {
        let forest = TreeBuilder::build(&descriptor(&[
            "a.txt",
            "zeta/one.txt",
            "Beta.md",
            "alpha/two.txt",
        ]));
        let names: Vec<&str> = forest.iter().map(|node| node.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta", "Beta.md", "a.txt"]);
    }

    #[test]
    fn build_is_idempotent_and_non_mutating() {
        let input = descriptor(&["src/app.jsx", "src/pages/home.jsx", "index.html"]);
        let snapshot = input.clone();
        let first = TreeBuilder::build(&input);
        let second = TreeBuilder::build(&input);
        assert_eq!(first, second);
        assert_eq!(input, snapshot);
        let count: usize = first.iter().map(TreeNode::subtree_len).sum();
        assert_eq!(count, 5);
    }

    #[test]
    fn from_keys_matches_descriptor_forest() {
        let keys = ["src/app.jsx", "src/pages/home.jsx", "index.html"];
        assert_eq!(
            TreeBuilder::from_keys(keys).unwrap(),
            TreeBuilder::build(&descriptor(&keys))
        );
    }

    #[test]
    fn from_keys_preserves_leading_slash_in_exact_key() {
        let forest = TreeBuilder::from_keys(["/App.jsx"]).unwrap();
        assert_eq!(forest[0].display_path, "App.jsx");
        assert_eq!(forest[0].exact_key(), Some("/App.jsx"));
    }

    #[test]
    fn from_keys_rejects_conflicts() {
        assert!(matches!(
            TreeBuilder::from_keys(["a", "a/b"]),
            Err(TreeError::FileAsDirectory { .. })
        ));
        assert!(matches!(
            TreeBuilder::from_keys(["/a", "a"]),
            Err(TreeError::Duplicate { .. })
        ));
        assert!(matches!(
            TreeBuilder::from_keys(["///"]),
            Err(TreeError::EmptyKey { .. })
        ));
    }

    #[test]
    fn serialises_with_sidebar_field_names() {
        let forest = TreeBuilder::build(&descriptor(&["src/app.jsx"]));
        let json = serde_json::to_value(&forest).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "name": "src",
                "displayPath": "src",
                "exactKey": null,
                "isFile": false,
                "children": [{
                    "name": "app.jsx",
                    "displayPath": "src/app.jsx",
                    "exactKey": "src/app.jsx",
                    "isFile": true
                }]
            }])
        );
    }
}

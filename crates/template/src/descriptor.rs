use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nested directory/file structure keyed by literal path segment.
/// 以路徑片段為鍵的巢狀目錄／檔案結構。
///
/// Serialises to the mount shape
/// `{ "<name>": { "directory": { .. } } | { "file": { "contents": ".." } } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor {
    entries: BTreeMap<String, DescriptorNode>,
}

/// One entry of a [`Descriptor`].
/// 描述子中的單一節點。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorNode {
    Directory(Descriptor),
    File(FileNode),
}

/// Leaf contents. Symbolic descriptors store an export name here, resolved
/// ones store the file text.
/// 檔案內容；符號化描述子存放匯出名稱，已解析者存放檔案文字。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub contents: String,
}

impl FileNode {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }
}

/// Structural errors raised while inserting or validating paths.
/// 插入或驗證路徑時的結構錯誤。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("descriptor path is empty")]
    EmptyPath,
    #[error("invalid segment '{segment}' in descriptor path '{path}'")]
    InvalidSegment { path: String, segment: String },
    #[error("descriptor path '{path}' crosses an existing file")]
    NotADirectory { path: String },
    #[error("descriptor path '{path}' already exists")]
    Duplicate { path: String },
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates direct children in name order.
    /// 依名稱順序列舉直接子節點。
    pub fn iter(&self) -> btree_map::Iter<'_, String, DescriptorNode> {
        self.entries.iter()
    }

    /// Inserts a file at a slash-separated path, creating directories on demand.
    /// 於斜線分隔路徑插入檔案，必要時建立中介目錄。
    pub fn insert_file(
        &mut self,
        path: &str,
        contents: impl Into<String>,
    ) -> Result<(), DescriptorError> {
        let segments = split_path(path)?;
        let (file_name, parents) = segments
            .split_last()
            .ok_or(DescriptorError::EmptyPath)?;

        let mut cursor = self;
        for (depth, segment) in parents.iter().enumerate() {
            let node = cursor
                .entries
                .entry((*segment).to_string())
                .or_insert_with(|| DescriptorNode::Directory(Descriptor::new()));
            cursor = match node {
                DescriptorNode::Directory(children) => children,
                DescriptorNode::File(_) => {
                    return Err(DescriptorError::NotADirectory {
                        path: parents[..=depth].join("/"),
                    })
                }
            };
        }

        match cursor.entries.entry((*file_name).to_string()) {
            Entry::Occupied(_) => Err(DescriptorError::Duplicate {
                path: segments.join("/"),
            }),
            Entry::Vacant(slot) => {
                slot.insert(DescriptorNode::File(FileNode::new(contents)));
                Ok(())
            }
        }
    }

    /// Looks up a node by slash-separated path.
    /// 依路徑尋找節點。
    pub fn get(&self, path: &str) -> Option<&DescriptorNode> {
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let first = segments.next()?;
        let mut node = self.entries.get(first)?;
        for segment in segments {
            node = match node {
                DescriptorNode::Directory(children) => children.entries.get(segment)?,
                DescriptorNode::File(_) => return None,
            };
        }
        Some(node)
    }

    /// Returns the contents of the file at `path`, if it is a file.
    /// 取得指定檔案的內容。
    pub fn file_contents(&self, path: &str) -> Option<&str> {
        match self.get(path)? {
            DescriptorNode::File(file) => Some(file.contents.as_str()),
            DescriptorNode::Directory(_) => None,
        }
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.file_contents(path).is_some()
    }

    /// Every file key (root-joined with `/`) in depth-first name order.
    /// 以深度優先、名稱排序列出所有檔案鍵。
    pub fn file_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.visit_files("", &mut |key: &str, _: &FileNode| keys.push(key.to_string()));
        keys
    }

    /// Number of files in the whole tree.
    pub fn file_count(&self) -> usize {
        let mut count = 0usize;
        self.visit_files("", &mut |_: &str, _: &FileNode| count += 1);
        count
    }

    /// Calls `visit` with each file's full key and node.
    /// 走訪每個檔案並傳入完整鍵值。
    pub fn visit_files<F>(&self, prefix: &str, visit: &mut F)
    where
        F: FnMut(&str, &FileNode),
    {
        for (name, node) in &self.entries {
            let key = join_key(prefix, name);
            match node {
                DescriptorNode::Directory(children) => children.visit_files(&key, visit),
                DescriptorNode::File(file) => visit(&key, file),
            }
        }
    }

    /// Checks that every segment is a mountable path segment.
    /// 檢查所有片段皆為可掛載的合法名稱。
    pub fn validate(&self) -> Result<(), DescriptorError> {
        self.validate_under("")
    }

    fn validate_under(&self, prefix: &str) -> Result<(), DescriptorError> {
        for (name, node) in &self.entries {
            let key = join_key(prefix, name);
            check_segment(&key, name)?;
            if let DescriptorNode::Directory(children) = node {
                children.validate_under(&key)?;
            }
        }
        Ok(())
    }
}

/// Joins a parent key and a segment without producing a leading slash.
pub fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, DescriptorError> {
    if path.is_empty() {
        return Err(DescriptorError::EmptyPath);
    }
    let segments: Vec<&str> = path.split('/').collect();
    for segment in &segments {
        check_segment(path, segment)?;
    }
    Ok(segments)
}

fn check_segment(path: &str, segment: &str) -> Result<(), DescriptorError> {
    let invalid = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('/')
        || segment.contains('\\');
    if invalid {
        Err(DescriptorError::InvalidSegment {
            path: path.to_string(),
            segment: segment.to_string(),
        })
    } else {
        Ok(())
    }
}

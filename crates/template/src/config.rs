use std::path::{Path, PathBuf};

/// 預設來源資料夾。 / Default directory holding the project sources.
pub const SOURCE_ROOT: &str = "container-src";
/// 產生模組的輸出資料夾。 / Default directory receiving one module per file.
pub const OUTPUT_ROOT: &str = "src/templates/app-files";
/// 彙整模組路徑。 / Default aggregate accessor module.
pub const AGGREGATE_PATH: &str = "src/templates/react-vite.ts";
/// 解析後描述子的 JSON 清單。 / Default JSON manifest with resolved contents.
pub const MANIFEST_PATH: &str = "src/templates/template.json";

/// Fixed inputs of a compilation run.
/// 單次編譯所需的固定設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub aggregate_path: PathBuf,
    /// Skipped when `None`.
    pub manifest_path: Option<PathBuf>,
    /// Name of the exported template constant in the aggregate module.
    pub template_const: String,
    /// Directory (relative to the source root) searched for `app.*`/`main.*`.
    pub entry_dir: String,
    /// Entry used when neither `app.*` nor `main.*` exists.
    pub default_entry: String,
    /// Project-root configuration files offered as visible tabs when present.
    pub root_config_files: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from(SOURCE_ROOT),
            output_root: PathBuf::from(OUTPUT_ROOT),
            aggregate_path: PathBuf::from(AGGREGATE_PATH),
            manifest_path: Some(PathBuf::from(MANIFEST_PATH)),
            template_const: "VITE_REACT_TEMPLATE".to_string(),
            entry_dir: "src".to_string(),
            default_entry: "src/app.jsx".to_string(),
            root_config_files: vec![
                "index.html".to_string(),
                "package.json".to_string(),
                "vite.config.js".to_string(),
            ],
        }
    }
}

impl CompilerConfig {
    /// Resolves every default path against `base`.
    /// 以 `base` 為基準解析所有預設路徑。
    pub fn rooted_at(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let defaults = Self::default();
        Self {
            source_root: base.join(defaults.source_root),
            output_root: base.join(defaults.output_root),
            aggregate_path: base.join(defaults.aggregate_path),
            manifest_path: defaults.manifest_path.map(|path| base.join(path)),
            ..defaults
        }
    }

    /// Scan-only configuration for an arbitrary source directory.
    /// 僅供掃描使用、以任意資料夾為來源的設定。
    pub fn for_source(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            ..Self::default()
        }
    }

    pub fn with_default_entry(mut self, entry: impl Into<String>) -> Self {
        self.default_entry = entry.into();
        self
    }
}

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::CompilerConfig;
use crate::descriptor::Descriptor;
use crate::emit::{render_aggregate, render_module};
use crate::error::CompileError;
use crate::export::{export_name, import_specifier, module_path, CompiledExport};
use crate::manifest::Manifest;
use crate::util::{OutputBatch, StagingError};

/// Result of scanning a source tree.
/// 掃描來源樹後的結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    pub exports: Vec<CompiledExport>,
    /// Symbolic descriptor: file contents are export names.
    pub descriptor: Descriptor,
    /// Same shape as `descriptor`, file contents are the source text.
    pub resolved: Descriptor,
    pub entry: String,
    pub visible_files: Vec<String>,
}

impl CompiledTemplate {
    pub fn resolved_descriptor(&self) -> &Descriptor {
        &self.resolved
    }

    /// Converts into the runtime manifest.
    pub fn to_manifest(&self) -> Manifest {
        Manifest {
            files: self.resolved.clone(),
            entry: self.entry.clone(),
            visible_files: self.visible_files.clone(),
        }
    }
}

struct ScannedFile {
    export: CompiledExport,
    raw: String,
}

/// Walks a source directory and turns it into embeddable modules.
/// 走訪來源資料夾並轉換為可嵌入的模組。
#[derive(Debug, Clone)]
pub struct TemplateCompiler {
    config: CompilerConfig,
}

impl TemplateCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Reads and transforms every file without writing anything.
    /// 讀取並轉換所有檔案，但不寫入任何輸出。
    pub fn scan(&self) -> Result<CompiledTemplate, CompileError> {
        self.scan_files().map(|(template, _)| template)
    }

    /// Full run: scan, then write every module, the aggregate, and the manifest.
    /// 完整編譯：掃描後寫出所有模組、彙整模組與清單。
    ///
    /// Outputs are staged first and moved into place together. When any write
    /// fails, files from earlier runs are left exactly as they were.
    pub fn compile(&self) -> Result<CompiledTemplate, CompileError> {
        let (template, files) = self.scan_files()?;
        let mut batch = OutputBatch::new();

        for file in &files {
            let module = render_module(&file.export.export_name, &file.raw);
            batch
                .stage(&file.export.module_path, module.as_bytes())
                .map_err(write_error)?;
        }

        let aggregate = render_aggregate(&template, &self.config.template_const);
        batch
            .stage(&self.config.aggregate_path, aggregate.as_bytes())
            .map_err(write_error)?;

        if let Some(manifest_path) = &self.config.manifest_path {
            let payload = serde_json::to_vec_pretty(&template.to_manifest())
                .map_err(CompileError::Manifest)?;
            batch.stage(manifest_path, &payload).map_err(write_error)?;
        }

        batch.commit().map_err(write_error)?;
        for file in &files {
            info!(path = %file.export.module_path.display(), "created module");
        }
        info!(count = files.len(), "generated export modules");
        info!(path = %self.config.aggregate_path.display(), "updated aggregate module");
        if let Some(manifest_path) = &self.config.manifest_path {
            info!(path = %manifest_path.display(), "updated manifest");
        }

        Ok(template)
    }

    fn scan_files(&self) -> Result<(CompiledTemplate, Vec<ScannedFile>), CompileError> {
        let root = &self.config.source_root;
        if !root.is_dir() {
            return Err(CompileError::MissingSourceRoot { path: root.clone() });
        }
        info!(root = %root.display(), "scanning source directory");

        let aggregate_dir = self
            .config
            .aggregate_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut files = Vec::new();
        let mut names: HashMap<String, String> = HashMap::new();

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|source| CompileError::Walk {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone()),
                source,
            })?;
            if !entry.file_type().is_file() {
                if entry.file_type().is_symlink() {
                    debug!(path = %entry.path().display(), "skipping symlink");
                }
                continue;
            }

            let relative_path = relative_key(root, entry.path())?;
            let bytes = fs::read(entry.path()).map_err(|source| CompileError::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;
            let raw = String::from_utf8(bytes).map_err(|_| CompileError::NonUtf8Contents {
                path: entry.path().to_path_buf(),
            })?;

            let name = export_name(&relative_path);
            if let Some(first) = names.insert(name.clone(), relative_path.clone()) {
                return Err(CompileError::IdentifierCollision {
                    export_name: name,
                    first,
                    second: relative_path,
                });
            }
            let target = module_path(&self.config.output_root, &relative_path);

            let export = CompiledExport {
                import_path: import_specifier(&aggregate_dir, &target),
                export_name: name,
                relative_path,
                module_path: target,
            };
            files.push(ScannedFile { export, raw });
        }
        info!(count = files.len(), "found files to convert");

        let mut descriptor = Descriptor::new();
        let mut resolved = Descriptor::new();
        for file in &files {
            descriptor.insert_file(&file.export.relative_path, file.export.export_name.clone())?;
            resolved.insert_file(&file.export.relative_path, file.raw.clone())?;
        }

        let entry = self.select_entry(&resolved);
        let visible_files = self.select_visible(&resolved, &entry);
        debug!(%entry, ?visible_files, "resolved entry and visible files");

        let template = CompiledTemplate {
            exports: files.iter().map(|file| file.export.clone()).collect(),
            descriptor,
            resolved,
            entry,
            visible_files,
        };
        Ok((template, files))
    }

    fn select_entry(&self, descriptor: &Descriptor) -> String {
        self.find_by_stem(descriptor, "app")
            .or_else(|| self.find_by_stem(descriptor, "main"))
            .unwrap_or_else(|| self.config.default_entry.clone())
    }

    fn select_visible(&self, descriptor: &Descriptor, entry: &str) -> Vec<String> {
        let mut candidates = vec![entry.to_string()];
        if let Some(bootstrap) = self.find_by_stem(descriptor, "main") {
            candidates.push(bootstrap);
        }
        candidates.extend(self.config.root_config_files.iter().cloned());

        let mut visible: Vec<String> = Vec::new();
        for candidate in candidates {
            if descriptor.contains_file(&candidate) && !visible.contains(&candidate) {
                visible.push(candidate);
            }
        }
        visible
    }

    /// Script file directly inside `entry_dir` whose stem equals `stem`.
    /// Siblings such as `app.css` never qualify; ties go to [`SCRIPT_EXTENSIONS`] order.
    fn find_by_stem(&self, descriptor: &Descriptor, stem: &str) -> Option<String> {
        let dir = self.config.entry_dir.trim_matches('/');
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        descriptor
            .file_keys()
            .into_iter()
            .filter_map(|key| {
                let name = key.strip_prefix(prefix.as_str())?;
                if name.contains('/') {
                    return None;
                }
                let path = Path::new(name);
                if path.file_stem()? != stem {
                    return None;
                }
                let extension = path.extension()?.to_str()?;
                let rank = SCRIPT_EXTENSIONS
                    .iter()
                    .position(|candidate| *candidate == extension)?;
                Some((rank, key))
            })
            .min()
            .map(|(_, key)| key)
    }
}

/// 可作為進入點的副檔名，依優先順序排列。 / Entry-capable extensions, most preferred first.
const SCRIPT_EXTENSIONS: [&str; 4] = ["jsx", "tsx", "js", "ts"];

fn write_error(err: StagingError) -> CompileError {
    CompileError::Write {
        path: err.path,
        source: err.source,
    }
}

fn relative_key(root: &Path, path: &Path) -> Result<String, CompileError> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut segments = Vec::new();
    for component in relative.components() {
        if let Component::Normal(segment) = component {
            let segment = segment.to_str().ok_or_else(|| CompileError::NonUtf8Path {
                path: path.to_path_buf(),
            })?;
            segments.push(segment);
        }
    }
    Ok(segments.join("/"))
}

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sandpad_core::EditingSession;
use sandpad_project::Sidebar;
use sandpad_sandbox::{
    DirectoryFileSystem, FileSystemAdapter, MemoryFileSystem, SandboxRuntime, SubmitOutcome,
    WriteBackEvent, WriteBackQueue,
};
use sandpad_settings::{Preferences, PreferencesStore};
use sandpad_template::{CompilerConfig, Manifest, TemplateCompiler};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sandpad-cli",
    about = "Utility commands for SandPad templates and editing sessions",
    author,
    version
)]
struct Cli {
    /// 偏好設定檔路徑。 / Preferences file (defaults are used when absent).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 顯示側欄檔案樹。 / Print the sidebar tree of a template.
    Tree(TreeArgs),
    /// 將樣板寫入資料夾。 / Materialise a template into a directory.
    Mount(MountArgs),
    /// 重播分頁操作並輸出結果。 / Replay tab actions and print the resulting session.
    Session(SessionArgs),
    /// 掛載後修改單一檔案。 / Mount a template, then edit one file through write-back.
    Edit(EditArgs),
}

#[derive(Args)]
struct TreeArgs {
    /// 來源資料夾或 JSON 清單。 / Source directory or JSON manifest.
    source: PathBuf,
    /// 以 JSON 輸出。 / Emit the forest as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct MountArgs {
    source: PathBuf,
    /// 目的資料夾。 / Destination directory.
    dest: PathBuf,
}

#[derive(Args)]
struct SessionArgs {
    source: PathBuf,
    /// 依序套用的操作，例如 `click:src/app.jsx`。 / Actions applied in order, e.g. `click:src/app.jsx`.
    #[arg(long = "action", value_name = "KIND:KEY")]
    actions: Vec<TabAction>,
}

#[derive(Args)]
struct EditArgs {
    source: PathBuf,
    dest: PathBuf,
    /// 要修改的檔案鍵值。 / Key of the file to edit.
    #[arg(long, value_name = "KEY")]
    file: String,
    /// 新內容。 / Replacement contents.
    #[arg(long, value_name = "TEXT")]
    contents: String,
}

#[derive(Debug, Clone)]
enum TabAction {
    Click(String),
    DoubleClick(String),
    Close(String),
}

impl FromStr for TabAction {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (kind, key) = input
            .split_once(':')
            .ok_or_else(|| format!("expected KIND:KEY, got '{input}'"))?;
        if key.is_empty() {
            return Err(format!("missing file key in '{input}'"));
        }
        match kind {
            "click" | "preview" => Ok(TabAction::Click(key.to_string())),
            "double-click" | "pin" => Ok(TabAction::DoubleClick(key.to_string())),
            "close" => Ok(TabAction::Close(key.to_string())),
            other => Err(format!(
                "unknown action '{other}' (expected click, double-click or close)"
            )),
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let preferences = load_preferences(cli.config.as_deref())?;

    match cli.command {
        Commands::Tree(args) => execute_tree(args, &preferences),
        Commands::Mount(args) => execute_mount(args, &preferences),
        Commands::Session(args) => execute_session(args, &preferences),
        Commands::Edit(args) => execute_edit(args, &preferences),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_preferences(path: Option<&Path>) -> Result<Preferences> {
    match path {
        Some(path) => {
            let store = PreferencesStore::load(path)
                .with_context(|| format!("load preferences from {}", path.display()))?;
            Ok(store.preferences().clone())
        }
        None => Ok(Preferences::default()),
    }
}

/// Scans a directory or loads a compiled JSON manifest.
fn load_manifest(source: &Path, preferences: &Preferences) -> Result<Manifest> {
    if source.is_dir() {
        let config = CompilerConfig::for_source(source)
            .with_default_entry(preferences.editor.default_entry.clone());
        let template = TemplateCompiler::new(config)
            .scan()
            .with_context(|| format!("scan {}", source.display()))?;
        Ok(template.to_manifest())
    } else if source.is_file() {
        Ok(Manifest::load(source)?)
    } else {
        bail!("source {} does not exist", source.display());
    }
}

fn execute_tree(args: TreeArgs, preferences: &Preferences) -> Result<()> {
    let manifest = load_manifest(&args.source, preferences)?;
    let sidebar = Sidebar::new(&manifest.files, preferences.ui.display_mode);

    if args.json {
        println!("{}", serde_json::to_string_pretty(sidebar.nodes())?);
        return Ok(());
    }

    for row in sidebar.rows(&manifest.entry) {
        let marker = if row.is_active { "*" } else { " " };
        let suffix = if row.node.is_file() { "" } else { "/" };
        println!(
            "{marker} {}{}{suffix}",
            "  ".repeat(row.depth),
            row.node.name
        );
    }
    Ok(())
}

fn execute_mount(args: MountArgs, preferences: &Preferences) -> Result<()> {
    let manifest = load_manifest(&args.source, preferences)?;
    let runtime = SandboxRuntime::new().context("start async runtime")?;
    let fs = DirectoryFileSystem::new(&args.dest);
    runtime
        .block_on(fs.mount(&manifest.files))
        .with_context(|| format!("mount into {}", args.dest.display()))?;
    println!(
        "Mounted {} file(s) into {}",
        manifest.files.file_count(),
        args.dest.display()
    );
    Ok(())
}

fn execute_session(args: SessionArgs, preferences: &Preferences) -> Result<()> {
    let manifest = load_manifest(&args.source, preferences)?;
    let runtime = SandboxRuntime::new().context("start async runtime")?;
    let queue = WriteBackQueue::spawn(&runtime.handle(), Arc::new(MemoryFileSystem::new()), None);
    let mut session = EditingSession::new(manifest, queue, preferences.ui.display_mode);
    session.apply_preferences(preferences);

    for action in args.actions {
        match action {
            TabAction::Click(key) => session.click(&key),
            TabAction::DoubleClick(key) => session.double_click(&key),
            TabAction::Close(key) => {
                session.close(&key);
            }
        }
    }

    let report = json!({
        "session": session.tabs().session(),
        "tabs": session.tab_strip().tabs,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn execute_edit(args: EditArgs, preferences: &Preferences) -> Result<()> {
    let manifest = load_manifest(&args.source, preferences)?;
    let key = args.file.trim_start_matches('/');
    if !manifest.files.contains_file(key) {
        bail!("file '{}' is not part of the template", args.file);
    }

    let runtime = SandboxRuntime::new().context("start async runtime")?;
    let fs = Arc::new(DirectoryFileSystem::new(&args.dest));
    runtime
        .block_on(fs.mount(&manifest.files))
        .with_context(|| format!("mount into {}", args.dest.display()))?;

    let (events_tx, events_rx) = std::sync::mpsc::channel();
    let queue = WriteBackQueue::spawn(&runtime.handle(), fs, Some(events_tx));
    let mut session = EditingSession::new(manifest, queue, preferences.ui.display_mode);
    session.double_click(key);

    if session.record_edit(args.contents) != SubmitOutcome::Queued {
        bail!("write-back queue rejected the edit");
    }
    runtime.block_on(session.flush());

    for event in events_rx.try_iter() {
        match event {
            WriteBackEvent::Written { path } => println!("Wrote {path}"),
            WriteBackEvent::Failed { path, error } => bail!("failed to write {path}: {error}"),
        }
    }
    Ok(())
}

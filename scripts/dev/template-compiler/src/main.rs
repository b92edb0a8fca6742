use anyhow::Result;
use clap::Parser;
use sandpad_template::{CompilerConfig, TemplateCompiler};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "template-compiler",
    about = "Embeds container-src into generated TypeScript modules and a JSON manifest",
    version
)]
struct Args {}

fn main() {
    if let Err(err) = run() {
        eprintln!("template-compiler error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let _args = Args::parse();
    init_tracing();

    let config = CompilerConfig::default();
    let compiler = TemplateCompiler::new(config);
    let template = compiler.compile()?;

    let config = compiler.config();
    println!(
        "Compiled {} file(s) from {} into {}",
        template.exports.len(),
        config.source_root.display(),
        config.output_root.display()
    );
    println!(" - aggregate: {}", config.aggregate_path.display());
    if let Some(manifest) = &config.manifest_path {
        println!(" - manifest: {}", manifest.display());
    }
    println!(" - entry: {}", template.entry);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

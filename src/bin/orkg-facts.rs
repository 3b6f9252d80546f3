//! orkg-facts CLI: extract compact facts from ORKG papers.
//!
//! Usage:
//!   orkg-facts extract <paper-id> [--out file] [--depth n] [--rules file] [--snapshot file]
//!   orkg-facts docs <paper-id> [--out file] ...
//!   orkg-facts rules [--rules file]

use clap::{Args, Parser, Subcommand};
use orkg_facts::{
    bundle_to_docs, summary_paragraph, Extractor, MemorySource, OrkgClient, PaperBundle, RuleSet,
    Settings, StatementSource,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "orkg-facts",
    version,
    about = "Extract compact research facts from an ORKG paper"
)]
struct Cli {
    /// More logging (debug level)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Less logging (warnings only)
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ExtractArgs {
    /// ORKG paper id (e.g. R874684)
    paper_id: String,
    /// Output file (defaults to the exports directory)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Crawl depth around each contribution
    #[arg(long)]
    depth: Option<usize>,
    /// Contributions crawled concurrently
    #[arg(long)]
    concurrency: Option<usize>,
    /// Rules file (YAML, or JSON with a .json extension)
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Read the graph from a JSON snapshot instead of the API
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a paper bundle and print a summary
    Extract(ExtractArgs),
    /// Extract a paper and write retrieval documents as JSON lines
    Docs(ExtractArgs),
    /// Print the effective rule set as YAML
    Rules {
        /// Rules file to validate and print instead of the built-in set
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_rules(path: Option<&Path>) -> Result<RuleSet, String> {
    match path {
        Some(p) => RuleSet::load(p).map_err(|e| format!("Failed to load rules from {}: {}", p.display(), e)),
        None => Ok(RuleSet::default()),
    }
}

fn open_source(settings: &Settings, snapshot: Option<&Path>) -> Result<Arc<dyn StatementSource>, String> {
    match snapshot {
        Some(path) => {
            let source = MemorySource::load(path)
                .map_err(|e| format!("Failed to load snapshot {}: {}", path.display(), e))?;
            Ok(Arc::new(source))
        }
        None => {
            let client = OrkgClient::from_settings(settings)
                .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
            Ok(Arc::new(client))
        }
    }
}

fn run_extraction(settings: &Settings, args: &ExtractArgs) -> Result<PaperBundle, String> {
    let rules = load_rules(args.rules.as_deref())?;
    let source = open_source(settings, args.snapshot.as_deref())?;

    let mut params = settings.crawl_params();
    if let Some(depth) = args.depth {
        params = params.with_depth(depth);
    }
    if let Some(concurrency) = args.concurrency {
        params = params.with_concurrency(concurrency);
    }
    let extractor = Extractor::new(source).with_rules(rules).with_params(params);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;
    runtime
        .block_on(extractor.extract_paper_bundle(&args.paper_id))
        .map_err(|e| format!("Extraction of {} failed: {}", args.paper_id, e))
}

/// Resolve the output path, creating its directory
fn output_path(settings: &Settings, out: Option<&Path>, default_name: String) -> Result<PathBuf, String> {
    let path = match out {
        Some(p) => p.to_path_buf(),
        None => settings.exports_dir.join(default_name),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Cannot create {}: {}", parent.display(), e))?;
    }
    Ok(path)
}

fn write_bundle(settings: &Settings, args: &ExtractArgs, bundle: &PaperBundle) -> Result<PathBuf, String> {
    let path = output_path(settings, args.out.as_deref(), format!("orkg_bundle_{}.json", args.paper_id))?;
    let json = serde_json::to_string_pretty(bundle).map_err(|e| format!("Serialization error: {}", e))?;
    std::fs::write(&path, json).map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
    Ok(path)
}

fn write_docs(settings: &Settings, args: &ExtractArgs, bundle: &PaperBundle) -> Result<(PathBuf, usize), String> {
    let path = output_path(settings, args.out.as_deref(), format!("orkg_docs_{}.jsonl", args.paper_id))?;
    let docs = bundle_to_docs(bundle);

    let file = std::fs::File::create(&path).map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
    let mut writer = std::io::BufWriter::new(file);
    for doc in &docs {
        let line = serde_json::to_string(doc).map_err(|e| format!("Serialization error: {}", e))?;
        writeln!(writer, "{}", line).map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
    }
    writer.flush().map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
    Ok((path, docs.len()))
}

fn cmd_extract(settings: &Settings, args: &ExtractArgs) -> i32 {
    let bundle = match run_extraction(settings, args) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match write_bundle(settings, args, &bundle) {
        Ok(path) => {
            println!("Wrote: {}", path.display());
            println!("Contributions: {}", bundle.contributions().len());
            if !bundle.skipped().is_empty() {
                println!("Skipped: {}", bundle.skipped().len());
            }
            println!("\nSummary paragraph:");
            println!("{}", summary_paragraph(&bundle));
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_docs(settings: &Settings, args: &ExtractArgs) -> i32 {
    let bundle = match run_extraction(settings, args) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match write_docs(settings, args, &bundle) {
        Ok((path, count)) => {
            println!("Wrote {} documents to {}", count, path.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_rules(path: Option<&Path>) -> i32 {
    let yaml = load_rules(path)
        .and_then(|rules| rules.to_yaml().map_err(|e| format!("Serialization error: {}", e)));
    match yaml {
        Ok(yaml) => {
            print!("{}", yaml);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let settings = Settings::from_env();

    let code = match &cli.command {
        Commands::Extract(args) => cmd_extract(&settings, args),
        Commands::Docs(args) => cmd_docs(&settings, args),
        Commands::Rules { rules } => cmd_rules(rules.as_deref()),
    };
    std::process::exit(code);
}

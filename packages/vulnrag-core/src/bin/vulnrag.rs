//! Vulnrag CLI
//!
//! # Usage
//!
//! ```bash
//! # Inspect one exported CPG
//! vulnrag check-cpg data/cpg/CVE-2021-1234.json
//!
//! # Sanity-check an export directory (recursive) with a CSV report
//! vulnrag check-cpg data/cpg --report results/cpg_check.csv
//!
//! # Corpus-wide signatures
//! vulnrag signatures data/cpg --output data/signatures.csv
//!
//! # Build the VULN/PATCH indexes
//! vulnrag build-index --corpus data/corpus.json --out data/index
//!
//! # Query
//! vulnrag query suspect.c --top-k 5 --config vulnrag.yaml
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vulnrag_core::config::{Preset, RetrievalConfig};
use vulnrag_core::features::graph_parsing::{
    check_dir, check_file, write_report_file, GraphParser,
};
use vulnrag_core::features::retrieval::{
    cached_provider, load_corpus, HybridRetriever, IndexBuilder,
};
use vulnrag_core::features::signature::{collect_graph_files, write_csv_file, SignatureBatch};
use vulnrag_core::{Result, VulnragError};

#[derive(Parser)]
#[command(name = "vulnrag")]
#[command(about = "CPG-based vulnerability retrieval", long_about = None)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sanity-check graph documents; exits non-zero if any is KO
    CheckCpg {
        /// GraphSON file, or a directory scanned recursively for *.json
        input: PathBuf,

        /// Per-file CSV report
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// KO examples listed after a directory scan
        #[arg(long, default_value_t = 5)]
        max_show: usize,
    },

    /// Extract structural signatures into a CSV file
    Signatures {
        /// Graph files or directories of graph files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output CSV
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Build VULN and PATCH index artifacts from a corpus file
    BuildIndex {
        /// Corpus JSON (array of records)
        #[arg(long)]
        corpus: PathBuf,

        /// Artifact directory
        #[arg(short, long)]
        out: PathBuf,

        /// YAML configuration (embedding + cache sections are used)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Retrieve similar vulnerable and patched code for a source file
    Query {
        /// C source file
        file: PathBuf,

        /// Results per index (defaults to the configured top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// YAML configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Artifact directory (overrides the configuration)
        #[arg(long)]
        index: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::CheckCpg {
            input,
            report,
            max_show,
        } => check_cpg(&input, report.as_deref(), max_show),
        Commands::Signatures { inputs, output } => signatures(&inputs, &output),
        Commands::BuildIndex {
            corpus,
            out,
            config,
        } => build_index(&corpus, &out, config.as_deref()),
        Commands::Query {
            file,
            top_k,
            config,
            index,
        } => query(&file, top_k, config.as_deref(), index),
    }
}

fn load_config(path: Option<&Path>) -> Result<RetrievalConfig> {
    let config = match path {
        Some(path) => RetrievalConfig::from_yaml(path)?,
        None => RetrievalConfig::preset(Preset::default()),
    };
    config.validate()?;
    Ok(config)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn check_cpg(input: &Path, report: Option<&Path>, max_show: usize) -> Result<()> {
    let checks = if input.is_dir() {
        let result = check_dir(input)?;
        if result.checks.is_empty() {
            return Err(VulnragError::invalid_input(format!(
                "no *.json under {}",
                input.display()
            )));
        }
        let total = result.total();
        for (i, check) in result.checks.iter().enumerate() {
            println!("[{:4}/{total}] {}: {}", i + 1, check.relative_path, check.message());
        }
        println!("\nOK: {} | KO: {} | Total: {total}", result.ok(), result.ko());
        for check in result.failures().take(max_show) {
            println!(" - {} -> {}", check.filename, check.reason);
        }
        result.checks
    } else {
        let check = check_file(input);
        println!("{}", check.message());
        if check.is_ok() {
            let mut parser = GraphParser::new();
            if parser.parse(input) {
                if let Some(summary) = parser.summary() {
                    print_json(&summary)?;
                }
            }
        }
        vec![check]
    };

    if let Some(report) = report {
        write_report_file(report, &checks)?;
        info!(report = %report.display(), rows = checks.len(), "wrote sanity report");
    }

    let ko = checks.iter().filter(|c| !c.is_ok()).count();
    if ko > 0 {
        return Err(VulnragError::invalid_input(format!(
            "{ko} of {} graph documents failed the sanity check",
            checks.len()
        )));
    }
    Ok(())
}

fn signatures(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(collect_graph_files(input)?);
        } else {
            files.push(input.clone());
        }
    }
    if files.is_empty() {
        return Err(VulnragError::invalid_input("no graph files found"));
    }

    let result = SignatureBatch::new().run(&files);
    write_csv_file(output, &result.signatures)?;
    info!(output = %output.display(), rows = result.signatures.len(), "wrote signatures");
    print_json(&result.summary)
}

fn build_index(corpus: &Path, out: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let records = load_corpus(corpus)?;
    let (embedder, cache) = cached_provider(&config.embedding, &config.cache)?;

    let report = IndexBuilder::new(embedder).build_to_dir(&records, out);
    cache.flush()?;
    print_json(&report?)
}

fn query(
    file: &Path,
    top_k: Option<usize>,
    config: Option<&Path>,
    index: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(index) = index {
        config.artifacts_dir = index;
    }
    let top_k = top_k.unwrap_or(config.top_k);
    let code = std::fs::read_to_string(file)?;

    let (embedder, cache) = cached_provider(&config.embedding, &config.cache)?;
    let retriever = HybridRetriever::from_config(&config, embedder)?;
    let result = retriever.hybrid_retrieval(&code, top_k);
    cache.flush()?;
    print_json(&result?)
}

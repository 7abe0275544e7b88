use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

use collectsugar::config::Config;
use collectsugar::diagnostics::{self, Diagnostic, SugarError};
use collectsugar::sugar::Desugarer;
use collectsugar::tree_io::{self, LoadedTree};
use collectsugar::visit::composers::count_stmts_in_file;
use collectsugar::syntax::Stmt;

#[derive(Parser)]
#[command(name = "collectsugar", version, about = "Desugar collect blocks in parsed Go syntax trees")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite collect blocks and write the resulting tree
    Desugar {
        /// Tree file (.json or binary container)
        tree: PathBuf,
        /// Output tree path. If omitted, prints JSON to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Original source text, used to render diagnostics
        #[arg(long)]
        source: Option<PathBuf>,
        /// Config file (defaults to collectsugar.toml next to the tree)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Stop at the first diagnostic
        #[arg(long)]
        fail_fast: bool,
    },
    /// Report collect diagnostics without writing anything
    Check {
        /// Tree file (.json or binary container)
        tree: PathBuf,
        /// Original source text, used to render diagnostics
        #[arg(long)]
        source: Option<PathBuf>,
        /// Config file (defaults to collectsugar.toml next to the tree)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Re-encode a tree between JSON and the binary container
    Convert {
        /// Input tree file
        input: PathBuf,
        /// Output path; `.json` writes JSON, anything else the binary container
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(false)
        .init();
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {msg}");
    std::process::exit(1);
}

fn load_config(explicit: Option<&Path>, tree: &Path) -> Config {
    let result = match explicit {
        Some(path) => Config::load(path),
        None => Config::discover(tree.parent().unwrap_or(Path::new("."))),
    };
    result.unwrap_or_else(|e| fail(e))
}

fn load_tree(path: &Path, source: Option<&Path>) -> LoadedTree {
    let mut loaded = tree_io::read_tree(path).unwrap_or_else(|e| fail(e));
    if let Some(source) = source {
        match std::fs::read_to_string(source) {
            Ok(text) => loaded.source = Some(text),
            Err(e) => fail(format!("failed to read {}: {e}", source.display())),
        }
    }
    loaded
}

/// Print one diagnostic, against the source text when there is one.
fn emit(diag: &Diagnostic, filename: &str, source: Option<&str>) {
    match source {
        Some(text) => {
            if let Err(e) = diagnostics::render_diagnostic(text, filename, diag, std::io::stderr()) {
                tracing::warn!("could not render diagnostic: {e}");
                eprintln!("{}", diagnostics::format_plain(filename, diag));
            }
        }
        None => eprintln!("{}", diagnostics::format_plain(filename, diag)),
    }
}

/// Run the pass, printing diagnostics as they come. Returns how many were
/// reported.
fn run_pass(loaded: &mut LoadedTree, config: &Config, filename: &str, keep_going: bool) -> usize {
    let source = loaded.source.clone();
    let result = if keep_going {
        let mut desugarer =
            Desugarer::new(config).with_handler(|diag: &Diagnostic| emit(diag, filename, source.as_deref()));
        let result = desugarer.run(&mut loaded.file);
        let reported = desugarer.diagnostics_reported();
        tracing::info!(labels = desugarer.labels_issued(), reported, "pass finished");
        result.map_err(|e| (e, reported))
    } else {
        Desugarer::new(config).run(&mut loaded.file).map_err(|e| {
            if let Some(diag) = e.diagnostic() {
                emit(diag, filename, source.as_deref());
            }
            (e, 1)
        })
    };
    match result {
        Ok(()) => 0,
        Err((SugarError::Config { msg }, _)) => fail(msg),
        Err((SugarError::Internal { msg }, _)) => fail(format!("internal error in collect desugaring: {msg}")),
        Err((SugarError::Diagnostic(_), reported)) => reported,
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Desugar { tree, output, source, config, fail_fast } => {
            let config = load_config(config.as_deref(), &tree);
            let mut loaded = load_tree(&tree, source.as_deref());
            let filename = tree.display().to_string();
            let keep_going = config.keep_going && !fail_fast;

            let reported = run_pass(&mut loaded, &config, &filename, keep_going);
            if reported > 0 {
                eprintln!("error: {reported} collect diagnostic(s) in {filename}");
                std::process::exit(1);
            }

            match output {
                Some(out) => {
                    if let Err(e) = tree_io::write_tree(&out, &loaded.file, loaded.source.as_deref()) {
                        fail(e);
                    }
                    tracing::info!(output = %out.display(), "wrote desugared tree");
                }
                None => match tree_io::to_json(&loaded.file) {
                    Ok(json) => println!("{json}"),
                    Err(e) => fail(e),
                },
            }
        }
        Commands::Check { tree, source, config } => {
            let config = load_config(config.as_deref(), &tree);
            let mut loaded = load_tree(&tree, source.as_deref());
            let filename = tree.display().to_string();
            let blocks = count_stmts_in_file(&loaded.file, |s| matches!(s, Stmt::Collect { .. }));

            let reported = run_pass(&mut loaded, &config, &filename, config.keep_going);
            if reported > 0 {
                eprintln!("error: {reported} collect diagnostic(s) in {filename}");
                std::process::exit(1);
            }
            println!("{filename}: ok ({blocks} collect block(s))");
        }
        Commands::Convert { input, output } => {
            let loaded = tree_io::read_tree(&input).unwrap_or_else(|e| fail(e));
            if let Err(e) = tree_io::write_tree(&output, &loaded.file, loaded.source.as_deref()) {
                fail(e);
            }
            eprintln!("  converted {} \u{2192} {}", input.display(), output.display());
        }
    }
}

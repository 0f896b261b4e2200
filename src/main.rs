use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use dirseek::{
    Config, Error, FolderContext, Intent, Origin, Resolution, Result, ScoredPath, TerminalPrompt,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// dirseek - resolve loosely named folders to real paths
#[derive(Parser)]
#[command(name = "dirseek")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".dirseek.toml")]
    config: PathBuf,

    /// Index file (overrides the config)
    #[arg(short, long, global = true)]
    index: Option<PathBuf>,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the folder index and save it
    Build {
        /// Roots to scan (defaults to the configured roots)
        #[arg(short, long)]
        root: Vec<PathBuf>,

        /// Scan every drive instead of the roots (slow)
        #[arg(long)]
        full_scan: bool,
    },

    /// Use the stored index or refresh it, asking when one exists
    Init,

    /// Resolve a folder name to a path
    Resolve {
        /// Folder name
        #[arg(required = true)]
        name: Vec<String>,

        /// Only accept exact folder names
        #[arg(long)]
        no_fuzzy: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve the folders of an intent JSON document
    Intent {
        /// Intent file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Show index statistics
    Stats {
        /// Show the N most duplicated folder names
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Interactive resolution mode
    Repl,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = load_config(&cli).and_then(|config| {
        let quiet = cli.quiet;
        match cli.command {
            Commands::Build { root, full_scan } => cmd_build(config, root, full_scan, quiet),
            Commands::Init => cmd_init(config, quiet),
            Commands::Resolve { name, no_fuzzy, json } => {
                cmd_resolve(config, &name.join(" "), !no_fuzzy, json)
            }
            Commands::Intent { file } => cmd_intent(config, file.as_deref()),
            Commands::Stats { top } => cmd_stats(config, top),
            Commands::Repl => cmd_repl(config),
        }
    });

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(index) = &cli.index {
        config.index_path = index.clone();
    }
    Ok(config)
}

fn cmd_build(mut config: Config, roots: Vec<PathBuf>, full_scan: bool, quiet: bool) -> Result<()> {
    let start = Instant::now();
    if !roots.is_empty() {
        config.roots = roots;
    }

    let mut ctx = FolderContext::new(config);
    let report = ctx.rebuild(full_scan, |root| {
        if !quiet {
            let label = if full_scan { "Scanning drive" } else { "Scanning" };
            println!("{} {}", label.cyan().bold(), root.display());
        }
    })?;

    if !quiet {
        for root in &report.missing_roots {
            println!("{} {}", "Skipped missing root".yellow(), root.display());
        }
        println!();
        println!("{}", "Index Statistics".green().bold());
        println!("  Folder names:     {}", ctx.index().len().to_string().cyan());
        println!("  Folder paths:     {}", ctx.index().total_paths().to_string().cyan());
        println!("  Unreadable paths: {}", report.diagnostics.len().to_string().cyan());
        println!("  Time elapsed:     {:.2?}", start.elapsed());
        println!();
        println!(
            "{} {}",
            "Index written to".green(),
            ctx.store().path().display().to_string().cyan()
        );
    }

    Ok(())
}

fn cmd_init(config: Config, quiet: bool) -> Result<()> {
    let mut ctx = FolderContext::new(config);
    let mut prompt = TerminalPrompt::stdio();
    let init = ctx.initialize(&mut prompt)?;

    if !quiet {
        let message = match init.origin {
            Origin::Reused => "Using existing index.",
            Origin::Refreshed => "Index refreshed.",
            Origin::Built => "Index built and saved.",
        };
        println!("{}", message.green());
        println!(
            "Indexed {} unique folder names.",
            init.index.len().to_string().cyan()
        );
        if let Some(report) = &init.report {
            if !report.diagnostics.is_empty() {
                println!(
                    "{} unreadable paths skipped",
                    report.diagnostics.len().to_string().yellow()
                );
            }
        }
    }

    Ok(())
}

/// Context with the stored index loaded; a missing index is an error.
fn loaded_context(config: Config) -> Result<FolderContext> {
    let mut ctx = FolderContext::new(config);
    if !ctx.load()? {
        return Err(Error::MissingIndex(ctx.store().path().to_path_buf()));
    }
    Ok(ctx)
}

#[derive(Serialize)]
struct ResolveOutput<'a> {
    query: &'a str,
    matched: Option<&'a str>,
    fuzzy: bool,
    path: Option<&'a str>,
    candidates: &'a [ScoredPath],
}

fn cmd_resolve(config: Config, name: &str, allow_fuzzy: bool, json: bool) -> Result<()> {
    let ctx = loaded_context(config)?;
    let mut prompt = TerminalPrompt::stdio();
    let resolution = ctx.resolve(Some(name), allow_fuzzy, &mut prompt)?;

    if json {
        let candidates: &[ScoredPath] = match &resolution {
            Resolution::AutoSelected { ranked, .. }
            | Resolution::Selected { ranked, .. }
            | Resolution::InvalidSelection { ranked, .. } => ranked,
            Resolution::NotFound | Resolution::Single { .. } => &[],
        };
        let output = ResolveOutput {
            query: name,
            matched: resolution.lookup().map(|l| l.key.as_str()),
            fuzzy: resolution.lookup().is_some_and(|l| l.fuzzy),
            path: resolution.path(),
            candidates,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_resolution(&resolution);
    Ok(())
}

fn print_resolution(resolution: &Resolution) {
    if let Some(lookup) = resolution.lookup().filter(|l| l.fuzzy) {
        println!("{}", format!("(closest folder name: {})", lookup.key).dimmed());
    }
    match resolution {
        Resolution::NotFound => println!("{}", "Folder not found.".yellow()),
        Resolution::InvalidSelection { input, .. } => {
            println!("{} {:?}", "Invalid selection:".yellow(), input)
        }
        _ => {
            if let Some(path) = resolution.path() {
                println!("{} {}", "Resolved Path:".green().bold(), path);
            }
        }
    }
}

fn cmd_intent(config: Config, file: Option<&Path>) -> Result<()> {
    let raw = match file {
        Some(path) => fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            source: e,
        })?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map_err(Error::Prompt)?;
            buf
        }
    };
    let intent = Intent::from_json(&raw)?;

    let ctx = loaded_context(config)?;
    let mut prompt = TerminalPrompt::stdio();
    let resolved = ctx.resolve_intent(intent, &mut prompt)?;

    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

fn cmd_stats(config: Config, top: usize) -> Result<()> {
    let ctx = loaded_context(config)?;
    let index = ctx.index();

    println!("{}", "Index Statistics".green().bold());
    println!();
    println!("  Index file:      {}", ctx.store().path().display().to_string().dimmed());
    println!("  Folder names:    {}", index.len().to_string().cyan());
    println!("  Folder paths:    {}", index.total_paths().to_string().cyan());
    println!();

    let duplicated = index.most_duplicated(top);
    if duplicated.is_empty() {
        return Ok(());
    }

    println!("{}", format!("Top {} Shared Names", top).green().bold());
    println!();
    for (name, count) in duplicated {
        let bar = "=".repeat(count.min(40));
        println!("  {:>20} {:>4} {}", name.cyan(), count, bar.dimmed());
    }

    Ok(())
}

fn cmd_repl(config: Config) -> Result<()> {
    let mut ctx = FolderContext::new(config);
    let mut prompt = TerminalPrompt::stdio();
    let init = ctx.initialize(&mut prompt)?;
    println!(
        "\nIndexed {} unique folder names.\n",
        init.index.len().to_string().cyan()
    );

    loop {
        let line = match prompt.ask("Enter folder name (or 'exit'): ") {
            Ok(line) => line,
            Err(Error::Prompt(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };
        let query = line.trim();
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }

        match ctx.resolve(Some(query), true, &mut prompt) {
            Ok(resolution) => print_resolution(&resolution),
            Err(Error::Prompt(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
        println!();
    }

    Ok(())
}

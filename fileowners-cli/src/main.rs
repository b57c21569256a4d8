use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;

use fileowners::{Owner, OwnershipEngine};

#[derive(Parser)]
#[command(version, about = "Resolve file ownership from a CODEOWNERS-style rules file")]
struct Cli {
    /// Files or directories to resolve (defaults to the current directory)
    paths: Vec<PathBuf>,

    /// Rules file to load (defaults to ./CODEOWNERS)
    #[clap(short = 'f', long = "file")]
    rules_file: Option<PathBuf>,

    /// Print per-rule match counts after resolving
    #[arg(long)]
    stats: bool,
}

impl Cli {
    fn rules_path(&self) -> PathBuf {
        self.rules_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("./CODEOWNERS"))
    }

    fn root_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths.clone()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let rules_path = cli.rules_path();
    let engine = OwnershipEngine::from_path(&rules_path)
        .with_context(|| format!("loading rules from {}", rules_path.display()))?;

    for root_path in cli.root_paths() {
        if !root_path.exists() {
            eprintln!("error: path does not exist: {}", root_path.display());
            continue;
        }

        if root_path.is_dir() {
            for entry in walk_files(&root_path) {
                let path = entry.path().strip_prefix(".").unwrap_or(entry.path());
                print_owners(&engine, &path.to_string_lossy());
            }
        } else {
            print_owners(&engine, &root_path.to_string_lossy());
        }
    }

    if cli.stats {
        println!();
        for stat in engine.rule_stats() {
            println!("{:>8}  {}", stat.matched, stat.rule);
        }
    }

    Ok(())
}

fn print_owners(engine: &OwnershipEngine, path: &str) {
    match engine.resolve(path) {
        Some(ownership) if !ownership.owners.is_empty() => {
            let owners: Vec<&str> = ownership.owners.iter().map(Owner::as_str).collect();
            println!("{:<70}  {}", path, owners.join(" "));
        }
        _ => println!("{:<70}  (unowned)", path),
    }
}

fn walk_files(root: impl AsRef<Path>) -> impl Iterator<Item = walkdir::DirEntry> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != OsStr::new(".git"))
        .filter_map(|e| e.ok())
        .filter(|entry| !entry.file_type().is_dir())
}

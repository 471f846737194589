use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use futures::TryStreamExt;
use humansize::{DECIMAL, format_size};
use tokio::io::{self, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use appxfs::ResourceResolver;

#[derive(Parser)]
#[command(name = "appxfs", version, about = "Inspect APPX/MSIX package layouts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files in the package
    Ls {
        /// Package root: a directory or a manifest file
        root: PathBuf,
        /// Directory inside the package (defaults to the root)
        path: Option<String>,
        /// Wildcard to match file names against
        #[arg(short, long, default_value = "*")]
        wildcard: String,
        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },
    /// List immediate subdirectories
    Dirs {
        root: PathBuf,
        /// Directory inside the package (defaults to the root)
        path: Option<String>,
    },
    /// Write a file's exact-path contents to stdout
    Cat { root: PathBuf, file: String },
    /// Resolve a resource request through qualifier fallback
    Resolve { root: PathBuf, resource: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cancel = CancellationToken::new();

    match cli.command {
        Commands::Ls {
            root,
            path,
            wildcard,
            recursive,
        } => {
            let reader = appxfs::open(&root)?;
            let mut files = reader.enumerate_files(path.as_deref(), &wildcard, recursive, cancel);
            while let Some(entry) = files.try_next().await? {
                let size = format_size(entry.size, DECIMAL);
                let modified = entry
                    .modified
                    .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>10}  {}  {}",
                    size.cyan(),
                    modified.dimmed(),
                    entry.path.display()
                );
            }
        }
        Commands::Dirs { root, path } => {
            let reader = appxfs::open(&root)?;
            let mut dirs = reader.enumerate_directories(path.as_deref(), cancel);
            while let Some(dir) = dirs.try_next().await? {
                println!("{}", dir.display().to_string().blue());
            }
        }
        Commands::Cat { root, file } => {
            let reader = appxfs::open(&root)?;
            let bytes = reader.get_file_bytes(&file).await?;
            io::stdout().write_all(&bytes).await?;
        }
        Commands::Resolve { root, resource } => {
            let reader = appxfs::open(&root)?;
            let resolver = ResourceResolver::new(reader.as_ref());
            match resolver.resolve(&resource, &cancel).await? {
                Some(path) => println!("{}", path.display().to_string().green()),
                None => {
                    eprintln!(
                        "{} no matching resource for '{}'",
                        "miss:".yellow().bold(),
                        resource
                    );
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

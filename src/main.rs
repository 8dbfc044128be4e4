//! Command-line front end.
//!
//! Lists and extracts members of ZIP archives addressed by local path or
//! HTTP(S) URL. Remote archives are never downloaded whole: the index comes
//! from the archive's tail and each extracted member costs one range
//! request.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use remzip::{
    CentralDirectoryRecord, Cli, DirectoryIndex, DirectoryLocator, HttpRangeFetcher,
    LocalRangeFetcher, MemberExtractor, RangeFetch,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.is_http_url() {
        let fetcher = Arc::new(HttpRangeFetcher::new(cli.file.clone()).await?);
        process_archive(fetcher.clone(), &cli).await?;

        // Show how little of the archive actually came down the wire
        if !cli.is_quiet() {
            eprintln!(
                "\nTotal bytes transferred: {}",
                format_size(fetcher.transferred_bytes())
            );
        }
    } else {
        let fetcher = Arc::new(LocalRangeFetcher::new(Path::new(&cli.file))?);
        process_archive(fetcher, &cli).await?;
    }

    Ok(())
}

/// Locate the directory once, then list or extract per the CLI options.
async fn process_archive<F: RangeFetch + 'static>(fetcher: Arc<F>, cli: &Cli) -> Result<()> {
    let index = DirectoryLocator::new(fetcher.clone()).locate().await?;

    if cli.list || cli.verbose {
        return list_members(&index, cli.verbose);
    }

    let extractor = MemberExtractor::new(fetcher);

    // Directories are skipped (created as needed on extraction); positional
    // arguments select members by exact name, basename, or glob; -x patterns
    // exclude.
    let selected: Vec<&CentralDirectoryRecord> = index
        .iter()
        .filter(|record| {
            if record.is_directory {
                return false;
            }

            if !cli.members.is_empty() {
                let matches = cli.members.iter().any(|m| {
                    if has_glob_chars(m) {
                        glob_match(m, &record.file_name)
                    } else {
                        let basename = Path::new(&record.file_name)
                            .file_name()
                            .map(|s| s.to_string_lossy())
                            .unwrap_or_default();
                        record.file_name == *m || basename == *m
                    }
                });
                if !matches {
                    return false;
                }
            }

            !cli.exclude
                .iter()
                .any(|x| record.file_name.contains(x) || glob_match(x, &record.file_name))
        })
        .collect();

    let multiple = cli.pipe && selected.len() > 1;
    for record in selected {
        extract_member(&extractor, &index, record, cli, multiple).await?;
    }

    Ok(())
}

/// Print the index, either names only or an unzip-style verbose table.
fn list_members(index: &DirectoryIndex, verbose: bool) -> Result<()> {
    if verbose {
        println!(
            "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
            "Length", "Size", "Cmpr", "Date", "Time"
        );
        println!("{}", "-".repeat(70));
    }

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut member_count = 0usize;

    for record in index.iter() {
        if verbose {
            let modified = record.modified();

            let ratio = if record.uncompressed_size > 0 {
                format!(
                    "{:>4}%",
                    100 - (record.compressed_size as u64 * 100 / record.uncompressed_size as u64)
                )
            } else {
                "  0%".to_string()
            };

            println!(
                "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
                record.uncompressed_size,
                record.compressed_size,
                ratio,
                modified.year,
                modified.month,
                modified.day,
                modified.hour,
                modified.minute,
                record.file_name
            );

            if !record.is_directory {
                total_uncompressed += record.uncompressed_size as u64;
                total_compressed += record.compressed_size as u64;
                member_count += 1;
            }
        } else {
            println!("{}", record.file_name);
        }
    }

    if verbose {
        println!("{}", "-".repeat(70));
        let total_ratio = if total_uncompressed > 0 {
            format!(
                "{:>4}%",
                100 - (total_compressed * 100 / total_uncompressed)
            )
        } else {
            "  0%".to_string()
        };
        println!(
            "{:>10}  {:>10}  {}  {:>21}  {} files",
            total_uncompressed, total_compressed, total_ratio, "", member_count
        );
    }

    Ok(())
}

/// Extract one member to stdout or disk, honoring overwrite options.
async fn extract_member<F: RangeFetch>(
    extractor: &MemberExtractor<F>,
    index: &DirectoryIndex,
    record: &CentralDirectoryRecord,
    cli: &Cli,
    show_member_name: bool,
) -> Result<()> {
    if cli.pipe {
        if show_member_name {
            use tokio::io::AsyncWriteExt;
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(format!("--- {} ---\n", record.file_name).as_bytes())
                .await?;
        }
        extractor.extract_to_stdout(index, &record.file_name).await?;
        return Ok(());
    }

    let file_name = if cli.junk_paths {
        Path::new(&record.file_name)
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| record.file_name.clone())
    } else {
        record.file_name.clone()
    };
    let output_path = match cli.extract_dir {
        Some(ref dir) => PathBuf::from(dir).join(&file_name),
        None => PathBuf::from(&file_name),
    };

    if output_path.exists() {
        if cli.never_overwrite || !cli.overwrite {
            if !cli.is_quiet() {
                if cli.never_overwrite {
                    eprintln!("Skipping: {} (file exists)", record.file_name);
                } else {
                    eprintln!("Skipping: {} (use -o to overwrite)", record.file_name);
                }
            }
            return Ok(());
        }
    }

    if !cli.is_quiet() {
        println!("  extracting: {}", record.file_name);
    }

    extractor
        .extract_to_file(index, &record.file_name, &output_path)
        .await?;

    Ok(())
}

fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Glob matching for member selection: `*` matches any run of characters,
/// `?` exactly one.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}

fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

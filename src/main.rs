//! Main entry point for the rangeread CLI application.
//!
//! Lists the entries of a ZIP, TAR or TAR.GZ archive that lives either on
//! the local filesystem or behind an HTTP URL. Remote archives are read
//! through [`RemoteFile`], so only the byte ranges the decoder asks for are
//! transferred.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use rangeread::logging::init_logging;
use rangeread::{ArchiveEntry, ArchiveFormat, Cli, HttpClient, ReadAt, RemoteFile, list_entries};

/// Application entry point.
///
/// Parses command-line arguments and dispatches on whether the input is a
/// local file or an HTTP URL.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.is_http_url() {
        let client = Arc::new(HttpClient::with_config(cli.client_config())?);
        let mut file = RemoteFile::with_client(&cli.file, client)
            .with_context(|| format!("Cannot open {}", cli.file))?;
        tracing::info!(url = file.url(), size = ?file.size(), "opened remote archive");

        let format = resolve_format(&cli, file.url(), &file)?;
        let entries = list_entries(BufReader::with_capacity(cli.buffer_size, &mut file), format)?;
        print_entries(&entries, cli.is_verbose());

        // Display network transfer statistics for HTTP sources
        if !cli.is_quiet() {
            eprintln!("\nTotal bytes transferred: {}", format_size(file.transferred_bytes()));
        }
        file.close()?;
    } else {
        let mut file = File::open(&cli.file).with_context(|| format!("Cannot open {}", cli.file))?;
        let format = resolve_format(&cli, &cli.file, &file)?;
        let entries = list_entries(BufReader::with_capacity(cli.buffer_size, &mut file), format)?;
        print_entries(&entries, cli.is_verbose());
    }

    Ok(())
}

/// Pick the archive format: `-f` first, then the name, then magic bytes.
fn resolve_format<R: ReadAt + ?Sized>(cli: &Cli, name: &str, reader: &R) -> Result<ArchiveFormat> {
    if let Some(format) = cli.format.or_else(|| ArchiveFormat::from_name(name)) {
        return Ok(format);
    }
    match ArchiveFormat::sniff(reader)? {
        Some(format) => Ok(format),
        None => bail!("Cannot tell the archive format of {name}, use -f"),
    }
}

/// Print archive entries.
///
/// - Simple format: just entry names, one per line
/// - Verbose format (`-v`): sizes, a directory marker and a summary line
fn print_entries(entries: &[ArchiveEntry], verbose: bool) {
    if !verbose {
        for entry in entries {
            println!("{}", entry.name);
        }
        return;
    }

    println!("{:>10}  {:>4}  Name", "Length", "Type");
    println!("{}", "-".repeat(40));

    let mut total = 0u64;
    let mut file_count = 0usize;
    for entry in entries {
        let kind = if entry.is_dir { "dir" } else { "file" };
        println!("{:>10}  {:>4}  {}", entry.size, kind, entry.name);
        if !entry.is_dir {
            total += entry.size;
            file_count += 1;
        }
    }

    println!("{}", "-".repeat(40));
    println!("{:>10}        {} files", total, file_count);
}

/// Format a byte size into a human-readable string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
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

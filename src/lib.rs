//! # rangeread
//!
//! Seekable reads of remote HTTP resources using Range requests.
//!
//! [`RemoteFile`] turns a URL into a sized, randomly-addressable byte
//! source: it implements [`std::io::Read`], [`std::io::Seek`] and
//! [`ReadAt`], and every read becomes a single `Range: bytes=<start>-<end>`
//! request. Consumers that need to jump around a file, such as archive
//! decoders looking for a central directory, can work straight against a
//! URL without downloading it in full.
//!
//! ## Features
//!
//! - One HEAD probe at open time to learn the length and the final URL
//! - `200`/`206` read as data, `416` as end of stream, anything else as an error
//! - Reads past a known end never reach the network
//! - Any number of readers can share one [`HttpClient`]
//! - A pluggable [`Transport`] for custom HTTP stacks and tests
//!
//! ## Example
//!
//! ```no_run
//! use std::io::{BufReader, Read, Seek, SeekFrom};
//! use rangeread::RemoteFile;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut file = RemoteFile::open("https://example.com/archive.zip")?;
//!
//!     // Last 22 bytes: the ZIP end of central directory record
//!     file.seek(SeekFrom::End(-22))?;
//!     let mut eocd = [0u8; 22];
//!     file.read_exact(&mut eocd)?;
//!
//!     // Or hand it to any Read + Seek consumer
//!     file.rewind()?;
//!     let entries = zip::ZipArchive::new(BufReader::new(&mut file))?.len();
//!     println!("{entries} entries");
//!
//!     file.close()?;
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod io;
pub mod logging;

pub use archive::{ArchiveEntry, ArchiveFormat, list_entries};
pub use cli::Cli;
pub use error::{Error, Result};
pub use io::{ClientConfig, HttpClient, ReadAt, RemoteFile, Transport};

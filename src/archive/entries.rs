use std::io::{Read, Seek};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

use super::ArchiveFormat;

/// One member of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    pub is_dir: bool,
}

/// List every entry of the archive in `reader`.
///
/// `reader` should be buffered when it is remote: the decoders issue many
/// small reads.
pub fn list_entries<R: Read + Seek>(reader: R, format: ArchiveFormat) -> Result<Vec<ArchiveEntry>> {
    match format {
        ArchiveFormat::Zip => list_zip(reader),
        ArchiveFormat::Tar => {
            let mut archive = tar::Archive::new(reader);
            archive
                .entries_with_seek()
                .context("Not a valid TAR archive")?
                .map(|entry| tar_entry(entry?))
                .collect()
        }
        ArchiveFormat::TarGz => {
            let mut archive = tar::Archive::new(GzDecoder::new(reader));
            archive
                .entries()
                .context("Not a valid TAR.GZ archive")?
                .map(|entry| tar_entry(entry?))
                .collect()
        }
    }
}

fn list_zip<R: Read + Seek>(reader: R) -> Result<Vec<ArchiveEntry>> {
    let mut archive = zip::ZipArchive::new(reader).context("Not a valid ZIP file")?;
    let mut entries = Vec::with_capacity(archive.len());

    // Raw access reads the central directory record only, so encrypted or
    // exotic compression methods do not get in the way of listing.
    for index in 0..archive.len() {
        let file = archive.by_index_raw(index)?;
        entries.push(ArchiveEntry {
            name: file.name().to_string(),
            size: file.size(),
            is_dir: file.is_dir(),
        });
    }
    Ok(entries)
}

fn tar_entry<R: Read>(entry: tar::Entry<'_, R>) -> Result<ArchiveEntry> {
    let name = entry.path()?.to_string_lossy().into_owned();
    let header = entry.header();
    Ok(ArchiveEntry {
        name,
        size: header.size()?,
        is_dir: header.entry_type().is_dir(),
    })
}

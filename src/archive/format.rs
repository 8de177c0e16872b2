use std::io;

use clap::ValueEnum;

use crate::io::{ReadAt, read_exact_at};

const ZIP_LOCAL_HEADER: [u8; 4] = *b"PK\x03\x04";
const ZIP_EMPTY_ARCHIVE: [u8; 4] = *b"PK\x05\x06";
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const USTAR_OFFSET: u64 = 257;

/// Archive formats that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Guess the format from a file name or URL path.
    pub fn from_name(name: &str) -> Option<Self> {
        let path = name.split(['?', '#']).next().unwrap_or(name);
        let path = path.to_ascii_lowercase();

        if path.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else if path.ends_with(".tar.gz") || path.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else if path.ends_with(".tar") {
            Some(ArchiveFormat::Tar)
        } else {
            None
        }
    }

    /// Guess the format from magic bytes.
    ///
    /// Reads at most two small ranges from the source.
    pub fn sniff<R: ReadAt + ?Sized>(reader: &R) -> io::Result<Option<Self>> {
        let mut magic = [0u8; 4];
        if !read_magic(reader, &mut magic, 0)? {
            return Ok(None);
        }
        if magic == ZIP_LOCAL_HEADER || magic == ZIP_EMPTY_ARCHIVE {
            return Ok(Some(ArchiveFormat::Zip));
        }
        if magic[..2] == GZIP_MAGIC {
            return Ok(Some(ArchiveFormat::TarGz));
        }

        let mut ustar = [0u8; 5];
        if read_magic(reader, &mut ustar, USTAR_OFFSET)? && &ustar == b"ustar" {
            return Ok(Some(ArchiveFormat::Tar));
        }
        Ok(None)
    }
}

/// `Ok(false)` when the source is too short to hold `buf` at `offset`.
fn read_magic<R: ReadAt + ?Sized>(reader: &R, buf: &mut [u8], offset: u64) -> io::Result<bool> {
    if let Some(size) = reader.size()
        && size < offset + buf.len() as u64
    {
        return Ok(false);
    }
    match read_exact_at(reader, buf, offset) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && e.get_ref().is_none() => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn format_from_name() {
        assert_eq!(ArchiveFormat::from_name("a.zip"), Some(ArchiveFormat::Zip));
        assert_eq!(
            ArchiveFormat::from_name("https://host/dl/Release.TAR.GZ?token=1"),
            Some(ArchiveFormat::TarGz)
        );
        assert_eq!(ArchiveFormat::from_name("x.tgz#frag"), Some(ArchiveFormat::TarGz));
        assert_eq!(ArchiveFormat::from_name("/tmp/backup.tar"), Some(ArchiveFormat::Tar));
        assert_eq!(ArchiveFormat::from_name("https://host/download"), None);
        assert_eq!(ArchiveFormat::from_name("notes.txt"), None);
    }

    #[test]
    fn sniff_magic_bytes() {
        let zip = Cursor::new(b"PK\x03\x04rest of the archive".to_vec());
        assert_eq!(ArchiveFormat::sniff(&zip).unwrap(), Some(ArchiveFormat::Zip));

        let gz = Cursor::new(vec![0x1f, 0x8b, 0x08, 0x00, 0x00]);
        assert_eq!(ArchiveFormat::sniff(&gz).unwrap(), Some(ArchiveFormat::TarGz));

        let mut tar = vec![0u8; 512];
        tar[257..262].copy_from_slice(b"ustar");
        assert_eq!(ArchiveFormat::sniff(&Cursor::new(tar)).unwrap(), Some(ArchiveFormat::Tar));

        assert_eq!(ArchiveFormat::sniff(&Cursor::new(b"PK".to_vec())).unwrap(), None);
        assert_eq!(ArchiveFormat::sniff(&Cursor::new(vec![0u8; 600])).unwrap(), None);
    }
}

mod http;
mod local;
mod range;
mod transport;

pub use http::RemoteFile;
pub use range::{ByteRange, RangeStatus};
pub use transport::{ClientConfig, HttpClient, Probe, RangeResponse, Transport};

use std::io::{self, Cursor};

/// Random access to a sized byte source
pub trait ReadAt {
    /// Read into `buf` starting at `offset`, without touching any cursor.
    ///
    /// Returns `Ok(0)` at or past the end. May return fewer bytes than
    /// requested.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    /// Total size of the source, if known.
    fn size(&self) -> Option<u64>;
}

impl<B: AsRef<[u8]>> ReadAt for Cursor<B> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let data = self.get_ref().as_ref();
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        if start >= data.len() {
            return Ok(0);
        }
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> Option<u64> {
        Some(self.get_ref().as_ref().len() as u64)
    }
}

/// Fill `buf` from `offset`, issuing as many reads as needed.
///
/// Fails with `UnexpectedEof` if the source ends first.
pub fn read_exact_at<R: ReadAt + ?Sized>(reader: &R, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    while !buf.is_empty() {
        match reader.read_at(buf, offset) {
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => {
                buf = &mut buf[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

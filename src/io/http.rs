use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::StatusCode;

use super::ReadAt;
use super::range::{ByteRange, RangeStatus};
use super::transport::{HttpClient, Transport};
use crate::error::{Error, Result};

/// Seekable reader over a remote HTTP resource.
///
/// Every read becomes a single `Range` request against the resolved URL;
/// nothing is cached and nothing is retried. Reads past the end return
/// `Ok(0)`, either without touching the network (when the length is
/// known) or after the server answers `416 Range Not Satisfiable`.
///
/// The transport is shared: several readers may hold the same
/// `Arc<T>`, and [`close`](Self::close) only hints it to drop idle
/// connections.
pub struct RemoteFile<T: Transport = HttpClient> {
    client: Arc<T>,
    url: String,
    length: Option<u64>,
    point: u64,
    closed: bool,
    transferred_bytes: AtomicU64,
}

impl RemoteFile<HttpClient> {
    /// Open `url` with a freshly built default [`HttpClient`].
    pub fn open(url: &str) -> Result<Self> {
        Self::with_client(url, Arc::new(HttpClient::new()?))
    }
}

impl<T: Transport> RemoteFile<T> {
    /// Open `url` through a shared transport.
    ///
    /// This sends one HEAD request to learn the resource length and the
    /// final URL after redirects.
    pub fn with_client(url: &str, client: Arc<T>) -> Result<Self> {
        let probe = client.probe(url)?;
        tracing::debug!(
            url = %probe.url,
            status = %probe.status,
            length = ?probe.content_length,
            "probed remote file"
        );

        match probe.status {
            StatusCode::NOT_FOUND => return Err(Error::NotFound { url: probe.url }),
            StatusCode::FORBIDDEN => return Err(Error::PermissionDenied { url: probe.url }),
            status if !status.is_success() => {
                return Err(Error::Status {
                    status,
                    url: probe.url,
                });
            }
            _ => {}
        }

        Ok(Self {
            client,
            url: probe.url,
            length: probe.content_length,
            point: 0,
            closed: false,
            transferred_bytes: AtomicU64::new(0),
        })
    }

    /// Resolved URL every range request is sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Length reported by the probe. `None` when the server sent none.
    pub fn size(&self) -> Option<u64> {
        self.length
    }

    /// Current cursor.
    pub fn position(&self) -> u64 {
        self.point
    }

    /// Whether end-relative seeking is available.
    pub fn is_seekable(&self) -> bool {
        self.known_length().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Total body bytes received by range requests so far.
    pub fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes.load(Ordering::Relaxed)
    }

    pub fn client(&self) -> &Arc<T> {
        &self.client
    }

    /// Release the reader. Fails if it was already closed.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::AlreadyClosed {
                url: self.url.clone(),
            });
        }
        self.closed = true;
        self.client.close_idle_connections();
        tracing::debug!(url = %self.url, "closed remote file");
        Ok(())
    }

    /// Read at `offset` without moving the cursor.
    ///
    /// The body is read once; fewer bytes than `buf.len()` may come back
    /// even when more data remains.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.ensure_open()?;
        if self.is_past_end(offset) {
            tracing::trace!(url = %self.url, offset, "read past known end");
            return Ok(0);
        }

        let range = ByteRange::for_buffer(offset, buf.len());
        let mut resp = self.client.get_range(&self.url, &range)?;
        tracing::debug!(url = %self.url, %range, status = %resp.status, "range request");

        match RangeStatus::classify(resp.status) {
            RangeStatus::Data => {
                let n = resp.body.read(buf)?;
                self.transferred_bytes.fetch_add(n as u64, Ordering::Relaxed);
                Ok(n)
            }
            RangeStatus::EndOfStream => Ok(0),
            RangeStatus::Unexpected => Err(Error::UnexpectedEof {
                status: resp.status,
                url: self.url.clone(),
            }),
        }
    }

    /// Append everything from the cursor to the end with one open-ended
    /// request, advancing the cursor.
    fn read_remaining(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
        self.ensure_open()?;
        if self.is_past_end(self.point) {
            return Ok(0);
        }

        let range = ByteRange::from_offset(self.point);
        let mut resp = self.client.get_range(&self.url, &range)?;
        tracing::debug!(url = %self.url, %range, status = %resp.status, "range request");

        match RangeStatus::classify(resp.status) {
            RangeStatus::Data => {
                let before = buf.len();
                let result = resp.body.read_to_end(buf);
                let n = buf.len() - before;
                self.point += n as u64;
                self.transferred_bytes.fetch_add(n as u64, Ordering::Relaxed);
                result?;
                Ok(n)
            }
            RangeStatus::EndOfStream => Ok(0),
            RangeStatus::Unexpected => Err(Error::UnexpectedEof {
                status: resp.status,
                url: self.url.clone(),
            }),
        }
    }

    fn seek_to(&mut self, pos: SeekFrom) -> Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.point.checked_add_signed(delta),
            SeekFrom::End(delta) => self
                .known_length()
                .and_then(|len| len.checked_add_signed(delta)),
        };

        match target {
            Some(point) if point <= i64::MAX as u64 => {
                self.point = point;
                Ok(point)
            }
            _ => Err(Error::InvalidSeek {
                url: self.url.clone(),
            }),
        }
    }

    /// Length, if reported and non-zero.
    fn known_length(&self) -> Option<u64> {
        self.length.filter(|&len| len > 0)
    }

    fn is_past_end(&self, offset: u64) -> bool {
        matches!(self.known_length(), Some(len) if offset >= len)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Closed {
                url: self.url.clone(),
            });
        }
        Ok(())
    }
}

impl<T: Transport> Read for RemoteFile<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = RemoteFile::read_at(self, buf, self.point)?;
        self.point += n as u64;
        Ok(n)
    }

    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        Ok(self.read_remaining(buf)?)
    }
}

impl<T: Transport> Seek for RemoteFile<T> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(self.seek_to(pos)?)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.point)
    }
}

impl<T: Transport> ReadAt for RemoteFile<T> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        Ok(RemoteFile::read_at(self, buf, offset)?)
    }

    fn size(&self) -> Option<u64> {
        self.length
    }
}

impl<T: Transport> fmt::Debug for RemoteFile<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteFile")
            .field("url", &self.url)
            .field("length", &self.length)
            .field("point", &self.point)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

//! HTTP byte-range plumbing: the `Range` header value and the
//! interpretation of range-response status codes.

use std::fmt;

use reqwest::StatusCode;

/// An inclusive byte range as sent in a `Range` request header.
///
/// `end == None` requests everything from `start` to the end of the
/// resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl ByteRange {
    /// Range covering a buffer of `len` bytes starting at `offset`.
    ///
    /// `len` must be non-zero; empty reads never reach the network.
    pub fn for_buffer(offset: u64, len: usize) -> Self {
        debug_assert!(len > 0);
        Self {
            start: offset,
            end: Some(offset.saturating_add(len as u64 - 1)),
        }
    }

    /// Open-ended range from `offset` to the end of the resource.
    pub fn from_offset(offset: u64) -> Self {
        Self {
            start: offset,
            end: None,
        }
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "bytes={}-{}", self.start, end),
            None => write!(f, "bytes={}-", self.start),
        }
    }
}

/// How a range request's response status is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStatus {
    /// `200 OK` or `206 Partial Content`: the body carries data.
    Data,
    /// `416 Range Not Satisfiable`: the offset is at or past the end.
    EndOfStream,
    /// Anything else.
    Unexpected,
}

impl RangeStatus {
    pub fn classify(status: StatusCode) -> Self {
        match status {
            StatusCode::OK | StatusCode::PARTIAL_CONTENT => RangeStatus::Data,
            StatusCode::RANGE_NOT_SATISFIABLE => RangeStatus::EndOfStream,
            _ => RangeStatus::Unexpected,
        }
    }
}

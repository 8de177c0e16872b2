//! Archive listing on top of any seekable source.
//!
//! Format parsing is delegated to the `zip`, `tar` and `flate2` crates;
//! this module only picks the decoder and collects entry metadata.
//!
//! ZIP listing touches the end of central directory and the central
//! directory only, which keeps remote listings down to a handful of
//! range requests. Plain TAR skips over member data with seeks. TAR.GZ
//! has to be decompressed sequentially from the start.

mod entries;
mod format;

pub use entries::{ArchiveEntry, list_entries};
pub use format::ArchiveFormat;

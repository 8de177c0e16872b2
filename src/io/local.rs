use std::fs::File;
use std::io;

use super::ReadAt;

impl ReadAt for File {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            FileExt::read_at(self, buf, offset)
        }

        #[cfg(windows)]
        {
            // seek_read moves the OS cursor; callers here only use
            // positioned reads or seek explicitly before reading.
            use std::os::windows::fs::FileExt;
            FileExt::seek_read(self, buf, offset)
        }

        #[cfg(not(any(unix, windows)))]
        {
            use std::io::{Read, Seek, SeekFrom};
            let mut file = self;
            file.seek(SeekFrom::Start(offset))?;
            file.read(buf)
        }
    }

    fn size(&self) -> Option<u64> {
        self.metadata().ok().map(|m| m.len())
    }
}

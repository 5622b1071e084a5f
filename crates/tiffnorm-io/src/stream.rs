//! Byte streams backing the TIFF codec.
//!
//! [`Stream`] is any readable, writable, seekable store; the backend is
//! generic over it and hands it to the `tiff` decoder or encoder.
//! [`FileStream`] wraps a file and [`MemoryStream`] a growable byte vector.
//!
//! # Example
//!
//! ```rust
//! use std::io::{Read, Seek, SeekFrom, Write};
//! use tiffnorm_io::MemoryStream;
//!
//! let mut stream = MemoryStream::new();
//! stream.write_all(b"II*\0").unwrap();
//! stream.seek(SeekFrom::Start(0)).unwrap();
//! let mut magic = [0u8; 4];
//! stream.read_exact(&mut magic).unwrap();
//! assert_eq!(&magic, b"II*\0");
//! ```

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Readable, writable, seekable byte store.
pub trait Stream: Read + Write + Seek {}

impl<T: Read + Write + Seek + ?Sized> Stream for T {}

/// File-backed stream.
#[derive(Debug)]
pub struct FileStream {
    file: File,
}

impl FileStream {
    /// Opens an existing file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self {
            file: File::open(path)?,
        })
    }

    /// Creates or truncates a file for writing.
    ///
    /// The file is also readable so the encoder can patch earlier offsets.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self { file })
    }

    /// Flushes buffered data to disk.
    pub fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for FileStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for FileStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

/// In-memory stream.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    cursor: Cursor<Vec<u8>>,
}

impl MemoryStream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing bytes, positioned at the start.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Stored bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    /// Consumes the stream, returning its bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::mode::Mode;
use crate::{Result, StreamError};

const MEMORY_MODE: &str = "w+b";
const READER_MODE: &str = "rb";
const WRITER_MODE: &str = "wb";
const MEMORY_URI: &str = "memory";

/// An open byte stream owned by a [`Stream`](crate::Stream).
///
/// Files and memory buffers are seekable. Readers and writers are
/// forward-only, they only count the bytes passing through them.
pub enum Resource {
    File {
        file: File,
        mode: String,
        path: Option<PathBuf>,
    },
    Memory(Cursor<Vec<u8>>),
    Reader {
        reader: Box<dyn Read + Send>,
        consumed: u64,
    },
    Writer {
        writer: Box<dyn Write + Send>,
        written: u64,
    },
}

impl Resource {
    /// Wrap a file that was opened with the given access mode.
    pub fn file(file: File, mode: impl Into<String>) -> Self {
        Self::File {
            file,
            mode: mode.into(),
            path: None,
        }
    }

    /// Same as [`Resource::file`], remembering where the file lives.
    pub fn file_at(
        file: File,
        mode: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Self {
        Self::File {
            file,
            mode: mode.into(),
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// An in-memory buffer, readable and writable, cursor at the start.
    pub fn memory(buffer: Vec<u8>) -> Self {
        Self::Memory(Cursor::new(buffer))
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self::Reader {
            reader: Box::new(reader),
            consumed: 0,
        }
    }

    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Self::Writer {
            writer: Box::new(writer),
            written: 0,
        }
    }

    /// Check that the resource is an open byte stream.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Self::File { file, mode, .. } = self {
            mode.parse::<Mode>()?;
            let metadata = file
                .metadata()
                .map_err(|e| StreamError::InvalidResource(Some(e)))?;
            if metadata.is_dir() {
                return Err(StreamError::invalid_resource());
            }
        }
        Ok(())
    }

    pub fn mode(&self) -> &str {
        match self {
            Self::File { mode, .. } => mode,
            Self::Memory(_) => MEMORY_MODE,
            Self::Reader { .. } => READER_MODE,
            Self::Writer { .. } => WRITER_MODE,
        }
    }

    pub fn wrapper_type(&self) -> &'static str {
        match self {
            Self::File { .. } => "plainfile",
            Self::Memory(_) => "memory",
            Self::Reader { .. } | Self::Writer { .. } => "user-space",
        }
    }

    pub fn stream_type(&self) -> &'static str {
        match self {
            Self::File { .. } => "STDIO",
            Self::Memory(_) => "MEMORY",
            Self::Reader { .. } => "READER",
            Self::Writer { .. } => "WRITER",
        }
    }

    pub fn uri(&self) -> Option<String> {
        match self {
            Self::File { path, .. } => {
                path.as_ref().map(|p| p.display().to_string())
            }
            Self::Memory(_) => Some(MEMORY_URI.to_owned()),
            Self::Reader { .. } | Self::Writer { .. } => None,
        }
    }

    /// Pipes and sockets opened as files refuse to report a cursor.
    pub(crate) fn probe_seekable(&self) -> bool {
        match self {
            Self::File { file, .. } => {
                let mut file = file;
                file.stream_position().is_ok()
            }
            Self::Memory(_) => true,
            Self::Reader { .. } | Self::Writer { .. } => false,
        }
    }

    /// Byte length, when the resource has one.
    pub fn size(&self) -> Option<u64> {
        match self {
            Self::File { file, .. } => file
                .metadata()
                .ok()
                .filter(|m| m.is_file())
                .map(|m| m.len()),
            Self::Memory(cursor) => Some(cursor.get_ref().len() as u64),
            Self::Reader { .. } | Self::Writer { .. } => None,
        }
    }

    pub fn position(&mut self) -> io::Result<u64> {
        match self {
            Self::File { file, .. } => file.stream_position(),
            Self::Memory(cursor) => Ok(cursor.position()),
            Self::Reader { consumed, .. } => Ok(*consumed),
            Self::Writer { written, .. } => Ok(*written),
        }
    }

    /// Consume the resource and return the file, if it is one.
    pub fn into_file(self) -> Option<File> {
        match self {
            Self::File { file, .. } => Some(file),
            _ => None,
        }
    }

    /// Consume the resource and return the buffer, if it is in memory.
    pub fn into_buffer(self) -> Option<Vec<u8>> {
        match self {
            Self::Memory(cursor) => Some(cursor.into_inner()),
            _ => None,
        }
    }
}

fn unsupported(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, what.to_owned())
}

impl Read for Resource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File { file, .. } => file.read(buf),
            Self::Memory(cursor) => cursor.read(buf),
            Self::Reader { reader, consumed } => {
                let n = reader.read(buf)?;
                *consumed += n as u64;
                Ok(n)
            }
            Self::Writer { .. } => Err(unsupported("writer cannot be read")),
        }
    }
}

impl Write for Resource {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File { file, .. } => file.write(buf),
            Self::Memory(cursor) => cursor.write(buf),
            Self::Writer { writer, written } => {
                let n = writer.write(buf)?;
                *written += n as u64;
                Ok(n)
            }
            Self::Reader { .. } => Err(unsupported("reader cannot be written")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File { file, .. } => file.flush(),
            Self::Memory(_) | Self::Reader { .. } => Ok(()),
            Self::Writer { writer, .. } => writer.flush(),
        }
    }
}

impl Seek for Resource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::File { file, .. } => file.seek(pos),
            Self::Memory(cursor) => cursor.seek(pos),
            Self::Reader { .. } | Self::Writer { .. } => {
                Err(unsupported("forward-only resource"))
            }
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { file, mode, path } => f
                .debug_struct("File")
                .field("file", file)
                .field("mode", mode)
                .field("path", path)
                .finish(),
            Self::Memory(cursor) => f
                .debug_struct("Memory")
                .field("len", &cursor.get_ref().len())
                .field("position", &cursor.position())
                .finish(),
            Self::Reader { consumed, .. } => f
                .debug_struct("Reader")
                .field("consumed", consumed)
                .finish_non_exhaustive(),
            Self::Writer { written, .. } => f
                .debug_struct("Writer")
                .field("written", written)
                .finish_non_exhaustive(),
        }
    }
}

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use once_cell::unsync::OnceCell;
use serde_json::Value;

use crate::meta::Metadata;
use crate::mode::{self, Mode};
use crate::resource::Resource;
use crate::{Result, StreamError, LOG_PREFIX};

const READ_CHUNK: usize = 8192;

/// Origin of a [`Stream::seek`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Whence {
    #[default]
    Start,
    Current,
    End,
}

/// A byte stream over an owned [`Resource`], with every failure reported
/// as a [`StreamError`].
///
/// A stream is open until [`Stream::close`] or [`Stream::detach`] is
/// called, after which every operation needing the resource fails with
/// [`StreamError::InvalidResource`].
#[derive(Debug)]
pub struct Stream {
    resource: Option<Resource>,
    metadata: OnceCell<Metadata>,
    ended: bool,
}

impl Stream {
    /// Open the file at `path` with the given access mode.
    pub fn from_path<P: AsRef<Path>>(path: P, mode: &str) -> Result<Self> {
        let path = path.as_ref();
        log::trace!(
            "{} Opening {} with mode {}",
            LOG_PREFIX,
            path.display(),
            mode
        );

        let parsed: Mode = mode.parse()?;
        let file = parsed.open_options().open(path).map_err(|e| {
            log::debug!(
                "{} Failed to open {}: {}",
                LOG_PREFIX,
                path.display(),
                e
            );
            StreamError::InvalidResource(Some(e))
        })?;

        Self::new(Resource::file_at(file, parsed.as_str(), path))
    }

    /// Open the file at `path` for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path(path, Mode::default().as_str())
    }

    /// A stream over an in-memory buffer holding `content`,
    /// positioned at the start.
    pub fn from_content(content: impl AsRef<[u8]>) -> Self {
        let content = content.as_ref();
        log::trace!(
            "{} Allocating memory stream of {} bytes",
            LOG_PREFIX,
            content.len()
        );

        Self::wrap(Resource::memory(content.to_vec()))
    }

    /// Take ownership of an already open resource.
    pub fn new(resource: Resource) -> Result<Self> {
        if let Err(e) = resource.validate() {
            log::debug!("{} Rejecting resource {:?}", LOG_PREFIX, resource);
            return Err(e);
        }
        Ok(Self::wrap(resource))
    }

    fn wrap(resource: Resource) -> Self {
        Self {
            resource: Some(resource),
            metadata: OnceCell::new(),
            ended: false,
        }
    }

    fn resource(&mut self) -> Result<&mut Resource> {
        self.resource
            .as_mut()
            .ok_or_else(StreamError::invalid_resource)
    }

    fn snapshot(&self) -> Option<&Metadata> {
        let resource = self.resource.as_ref()?;
        Some(self.metadata.get_or_init(|| Metadata::scan(resource)))
    }

    /// Flush and release the resource.
    pub fn close(&mut self) -> Result<()> {
        let mut resource = self.resource.take().ok_or_else(|| {
            log::debug!("{} Closing a detached stream", LOG_PREFIX);
            StreamError::invalid_resource()
        })?;

        log::debug!("{} Closing {:?}", LOG_PREFIX, resource);
        if let Err(e) = resource.flush() {
            log::warn!("{} Failed to flush on close: {}", LOG_PREFIX, e);
            return Err(StreamError::Unwritable(Some(e)));
        }
        Ok(())
    }

    /// Hand the resource back to the caller without releasing it.
    pub fn detach(&mut self) -> Option<Resource> {
        let resource = self.resource.take();
        if let Some(resource) = &resource {
            log::debug!("{} Detaching {:?}", LOG_PREFIX, resource);
        }
        resource
    }

    /// Whether the resource has been closed or detached.
    pub fn is_detached(&self) -> bool {
        self.resource.is_none()
    }

    /// Whether a read has run past the end of the data.
    /// A detached stream has always ended.
    pub fn eof(&self) -> bool {
        self.resource.is_none() || self.ended
    }

    /// Everything from the cursor to the end of the stream.
    pub fn contents(&mut self) -> Result<Vec<u8>> {
        if !self.is_readable() {
            return Err(StreamError::unreadable());
        }

        let mut buf = Vec::new();
        self.resource()?
            .read_to_end(&mut buf)
            .map_err(|e| StreamError::Unreadable(Some(e)))?;
        self.ended = true;
        Ok(buf)
    }

    /// The metadata snapshot, taken on first use.
    pub fn metadata(&self) -> Result<&Metadata> {
        self.snapshot().ok_or_else(StreamError::invalid_resource)
    }

    /// A single metadata field, `None` if there is no such field.
    pub fn metadata_value(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.metadata()?.get(key))
    }

    /// Length of the resource in bytes, when it has one.
    pub fn size(&self) -> Result<Option<u64>> {
        self.resource
            .as_ref()
            .map(Resource::size)
            .ok_or_else(StreamError::invalid_resource)
    }

    pub fn is_readable(&self) -> bool {
        self.snapshot()
            .map(|meta| mode::is_readable(&meta.mode))
            .unwrap_or(false)
    }

    pub fn is_seekable(&self) -> bool {
        self.snapshot().map(|meta| meta.seekable).unwrap_or(false)
    }

    pub fn is_writable(&self) -> bool {
        self.snapshot()
            .map(|meta| mode::is_writable(&meta.mode))
            .unwrap_or(false)
    }

    /// Read up to `length` bytes. Fewer bytes are returned only when the
    /// end of the stream is reached.
    pub fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        if !self.is_readable() {
            return Err(StreamError::unreadable());
        }

        let mut buf = Vec::with_capacity(length.min(READ_CHUNK));
        self.resource()?
            .take(length as u64)
            .read_to_end(&mut buf)
            .map_err(|e| StreamError::Unreadable(Some(e)))?;
        if buf.len() < length {
            self.ended = true;
        }
        Ok(buf)
    }

    pub fn rewind(&mut self) -> Result<()> {
        self.seek(0, Whence::Start)
    }

    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<()> {
        if !self.is_seekable() {
            return Err(StreamError::unseekable());
        }

        let pos = match whence {
            Whence::Start => SeekFrom::Start(
                u64::try_from(offset).map_err(|_| StreamError::unseekable())?,
            ),
            Whence::Current => SeekFrom::Current(offset),
            Whence::End => SeekFrom::End(offset),
        };
        log::trace!("{} Seeking to {:?}", LOG_PREFIX, pos);

        self.resource()?
            .seek(pos)
            .map_err(|e| StreamError::Unseekable(Some(e)))?;
        self.ended = false;
        Ok(())
    }

    /// Current offset of the cursor.
    pub fn tell(&mut self) -> Result<u64> {
        self.resource()?
            .position()
            .map_err(|e| StreamError::InvalidResource(Some(e)))
    }

    /// Write all of `data`, returning the number of bytes written.
    pub fn write(&mut self, data: impl AsRef<[u8]>) -> Result<usize> {
        if !self.is_writable() {
            return Err(StreamError::unwritable());
        }

        let data = data.as_ref();
        self.resource()?
            .write_all(data)
            .map_err(|e| StreamError::Unwritable(Some(e)))?;
        self.ended = false;
        Ok(data.len())
    }

    /// The entire contents as text, or an empty string if they cannot
    /// be read.
    pub fn to_text(&mut self) -> String {
        if !self.is_readable() {
            return String::new();
        }

        if self.is_seekable() && self.rewind().is_err() {
            return String::new();
        }

        self.contents()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.is_readable() {
            return Err(StreamError::unreadable().into());
        }

        let n = self
            .resource()?
            .read(buf)
            .map_err(|e| StreamError::Unreadable(Some(e)))?;
        if n == 0 && !buf.is_empty() {
            self.ended = true;
        }
        Ok(n)
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.is_writable() {
            return Err(StreamError::unwritable().into());
        }

        let n = self
            .resource()?
            .write(buf)
            .map_err(|e| StreamError::Unwritable(Some(e)))?;
        self.ended = false;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.resource()?
            .flush()
            .map_err(|e| StreamError::Unwritable(Some(e)).into())
    }
}

impl Seek for Stream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            SeekFrom::Start(offset) => (
                i64::try_from(offset).map_err(|_| StreamError::unseekable())?,
                Whence::Start,
            ),
            SeekFrom::Current(offset) => (offset, Whence::Current),
            SeekFrom::End(offset) => (offset, Whence::End),
        };
        Stream::seek(self, offset, whence)?;
        Ok(self.tell()?)
    }
}

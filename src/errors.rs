use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StreamError>;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Invalid stream resource")]
    InvalidResource(#[source] Option<io::Error>),
    #[error("Stream resource is not readable")]
    Unreadable(#[source] Option<io::Error>),
    #[error("Stream resource is not seekable")]
    Unseekable(#[source] Option<io::Error>),
    #[error("Stream resource is not writable")]
    Unwritable(#[source] Option<io::Error>),
}

impl StreamError {
    pub fn invalid_resource() -> Self {
        Self::InvalidResource(None)
    }

    pub fn unreadable() -> Self {
        Self::Unreadable(None)
    }

    pub fn unseekable() -> Self {
        Self::Unseekable(None)
    }

    pub fn unwritable() -> Self {
        Self::Unwritable(None)
    }

    pub fn is_invalid_resource(&self) -> bool {
        matches!(self, Self::InvalidResource(_))
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Unreadable(_))
    }

    pub fn is_unseekable(&self) -> bool {
        matches!(self, Self::Unseekable(_))
    }

    pub fn is_unwritable(&self) -> bool {
        matches!(self, Self::Unwritable(_))
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        let kind = match &err {
            StreamError::InvalidResource(_) => io::ErrorKind::NotConnected,
            StreamError::Unseekable(_) => io::ErrorKind::Unsupported,
            StreamError::Unreadable(_) | StreamError::Unwritable(_) => {
                io::ErrorKind::PermissionDenied
            }
        };
        io::Error::new(kind, err)
    }
}

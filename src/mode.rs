use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

use crate::{Result, StreamError, LOG_PREFIX};

const READ_MARKERS: &[char] = &['r', '+'];
const WRITE_MARKERS: &[char] = &['x', 'w', 'c', 'a', '+'];
const IGNORED_FLAGS: &[char] = &['b', 't', 'e'];

/// Access mode of a stream, parsed from a conventional mode string
/// such as `"r"`, `"w+"` or `"ab"`.
///
/// The original string is kept verbatim, it is what the stream reports
/// in its metadata.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Mode {
    raw: String,
    base: Base,
    plus: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Base {
    Read,
    Write,
    Append,
    Exclusive,
    Create,
}

impl Mode {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_readable(&self) -> bool {
        is_readable(&self.raw)
    }

    pub fn is_writable(&self) -> bool {
        is_writable(&self.raw)
    }

    /// Options to open a file with this mode.
    pub fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self.base {
            Base::Read => {
                options.read(true).write(self.plus);
            }
            Base::Write => {
                options
                    .read(self.plus)
                    .write(true)
                    .create(true)
                    .truncate(true);
            }
            Base::Append => {
                options.read(self.plus).append(true).create(true);
            }
            Base::Exclusive => {
                options.read(self.plus).write(true).create_new(true);
            }
            Base::Create => {
                options.read(self.plus).write(true).create(true);
            }
        }
        options
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            raw: "r".to_owned(),
            base: Base::Read,
            plus: false,
        }
    }
}

impl FromStr for Mode {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let base = match chars.next() {
            Some('r') => Base::Read,
            Some('w') => Base::Write,
            Some('a') => Base::Append,
            Some('x') => Base::Exclusive,
            Some('c') => Base::Create,
            _ => {
                log::debug!("{} Rejecting access mode {:?}", LOG_PREFIX, s);
                return Err(StreamError::invalid_resource());
            }
        };

        let mut seen = Vec::with_capacity(4);
        for flag in chars {
            if !(flag == '+' || IGNORED_FLAGS.contains(&flag))
                || seen.contains(&flag)
            {
                log::debug!("{} Rejecting access mode {:?}", LOG_PREFIX, s);
                return Err(StreamError::invalid_resource());
            }
            seen.push(flag);
        }

        Ok(Self {
            raw: s.to_owned(),
            base,
            plus: seen.contains(&'+'),
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Whether a mode string allows reading.
pub fn is_readable(mode: &str) -> bool {
    mode.contains(READ_MARKERS)
}

/// Whether a mode string allows writing.
pub fn is_writable(mode: &str) -> bool {
    mode.contains(WRITE_MARKERS)
}

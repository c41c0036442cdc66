// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    log::error,
    std::fmt,
    thiserror::Error,
    wlan_common::{
        appendable::BufferTooSmall,
        error::{FrameParseError, FrameWriteError},
    },
};

/// Status code reported by the link layer. Values follow the Zircon status codes drivers use.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(i32);

impl Status {
    pub const OK: Self = Self(0);
    pub const INTERNAL: Self = Self(-1);
    pub const NOT_SUPPORTED: Self = Self(-2);
    pub const NO_RESOURCES: Self = Self(-3);
    pub const INVALID_ARGS: Self = Self(-10);
    pub const BUFFER_TOO_SMALL: Self = Self(-15);
    pub const BAD_STATE: Self = Self(-20);
    pub const TIMED_OUT: Self = Self(-21);
    pub const IO: Self = Self(-40);
    pub const IO_REFUSED: Self = Self(-41);
    pub const IO_INVALID: Self = Self(-47);

    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub fn into_raw(self) -> i32 {
        self.0
    }

    /// Maps a raw status to a `Result`, treating everything but `OK` as an error.
    pub fn ok(raw: i32) -> Result<(), Status> {
        match Self(raw) {
            Self::OK => Ok(()),
            status => Err(status),
        }
    }

    fn name(&self) -> Option<&'static str> {
        Some(match *self {
            Self::OK => "OK",
            Self::INTERNAL => "INTERNAL",
            Self::NOT_SUPPORTED => "NOT_SUPPORTED",
            Self::NO_RESOURCES => "NO_RESOURCES",
            Self::INVALID_ARGS => "INVALID_ARGS",
            Self::BUFFER_TOO_SMALL => "BUFFER_TOO_SMALL",
            Self::BAD_STATE => "BAD_STATE",
            Self::TIMED_OUT => "TIMED_OUT",
            Self::IO => "IO",
            Self::IO_REFUSED => "IO_REFUSED",
            Self::IO_INVALID => "IO_INVALID",
            _ => return None,
        })
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "Status({})", self.0),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for Status {}

#[derive(Debug, Error)]
pub enum Error {
    #[error("out of buffers; requested {} bytes", _0)]
    NoResources(usize),
    #[error("provided buffer to small")]
    BufferTooSmall,
    #[error("error parsing frame: {}", _0)]
    ParsingFrame(#[source] FrameParseError),
    #[error("error writing frame: {}", _0)]
    WritingFrame(#[source] FrameWriteError),
    #[error("{}", _0)]
    Internal(anyhow::Error),
    #[error("{}; {}", _0, _1)]
    Status(String, #[source] Status),
}

impl From<Error> for Status {
    fn from(e: Error) -> Self {
        match e {
            Error::NoResources(_) => Status::NO_RESOURCES,
            Error::BufferTooSmall => Status::BUFFER_TOO_SMALL,
            Error::Internal(_) => Status::INTERNAL,
            Error::ParsingFrame(_) => Status::IO_INVALID,
            Error::WritingFrame(_) => Status::IO_REFUSED,
            Error::Status(_, status) => status,
        }
    }
}

pub trait ResultExt {
    /// Returns `Status::OK` if Self is Ok, otherwise, logs the error and turns Self into the
    /// corresponding status.
    fn into_status(self) -> Status;
}

impl ResultExt for Result<(), Error> {
    fn into_status(self) -> Status {
        match self {
            Ok(()) | Err(Error::Status(_, Status::OK)) => Status::OK,
            Err(e) => {
                error!("{}", e);
                e.into()
            }
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Internal(e)
    }
}

impl From<FrameParseError> for Error {
    fn from(e: FrameParseError) -> Self {
        Error::ParsingFrame(e)
    }
}

impl From<FrameWriteError> for Error {
    fn from(e: FrameWriteError) -> Self {
        match e {
            FrameWriteError::BufferTooSmall => Error::BufferTooSmall,
            e => Error::WritingFrame(e),
        }
    }
}

impl From<BufferTooSmall> for Error {
    fn from(_: BufferTooSmall) -> Self {
        Error::BufferTooSmall
    }
}

#[cfg(test)]
mod tests {
    use {super::*, anyhow::format_err};

    #[test]
    fn test_error_into_status() {
        let status = Status::from(Error::Status("foo".to_string(), Status::OK));
        assert_eq!(status, Status::OK);

        let status = Status::from(Error::Status("foo".to_string(), Status::NOT_SUPPORTED));
        assert_eq!(status, Status::NOT_SUPPORTED);

        let status = Status::from(Error::Internal(format_err!("lorem")));
        assert_eq!(status, Status::INTERNAL);

        let status = Status::from(Error::WritingFrame(FrameWriteError::BufferTooSmall));
        assert_eq!(status, Status::IO_REFUSED);

        let status = Status::from(Error::ParsingFrame(FrameParseError("short".to_string())));
        assert_eq!(status, Status::IO_INVALID);

        let status = Status::from(Error::BufferTooSmall);
        assert_eq!(status, Status::BUFFER_TOO_SMALL);

        let status = Status::from(Error::NoResources(42));
        assert_eq!(status, Status::NO_RESOURCES);
    }

    #[test]
    fn frame_write_error_into_error() {
        let e = Error::from(FrameWriteError::BufferTooSmall);
        assert_eq!(Status::from(e), Status::BUFFER_TOO_SMALL);

        let e = Error::from(FrameWriteError::new_invalid_data("no rates"));
        assert_eq!(Status::from(e), Status::IO_REFUSED);
    }

    #[test]
    fn test_result_into_status() {
        let status: Result<(), Error> = Err(Error::Status("foo".to_string(), Status::OK));
        assert_eq!(status.into_status(), Status::OK);

        let status: Result<(), Error> =
            Err(Error::Status("foo".to_string(), Status::NOT_SUPPORTED));
        assert_eq!(status.into_status(), Status::NOT_SUPPORTED);

        let status: Result<(), Error> = Err(Error::Internal(format_err!("lorem")));
        assert_eq!(status.into_status(), Status::INTERNAL);

        let status: Result<(), Error> = Ok(());
        assert_eq!(status.into_status(), Status::OK);
    }

    #[test]
    fn raw_status() {
        assert_eq!(Ok(()), Status::ok(0));
        assert_eq!(Err(Status::BAD_STATE), Status::ok(-20));
        assert_eq!(-41, Status::IO_REFUSED.into_raw());
        assert_eq!("IO_REFUSED", format!("{}", Status::IO_REFUSED));
        assert_eq!("Status(-99)", format!("{:?}", Status::from_raw(-99)));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            "could not send frame; IO",
            format!("{}", Error::Status("could not send frame".to_string(), Status::IO))
        );
    }
}

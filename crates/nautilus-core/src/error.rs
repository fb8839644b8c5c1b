//! Error types for Nautilus Core

use std::io;

/// Error raised by a command handler.
///
/// Every variant is recoverable: the shell reports it as
/// `<command>: <message>` and keeps reading input.
#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    #[error("Invalid syntax")]
    InvalidSyntax,
    #[error("No such file or directory")]
    FileNotFound,
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Operation not permitted")]
    OperationNotPermitted,
    #[error("No such file")]
    NoSuchFile,
    #[error("File exists")]
    FileExists,
    #[error("Destination is a directory")]
    DestinationIsDirectory,
    #[error("Destination is a file")]
    DestinationIsFile,
    #[error("Source is a directory")]
    SourceIsDirectory,
    #[error("Not a directory")]
    NotADirectory,
    #[error("Is a directory")]
    IsADirectory,
    #[error("Ancestor directory does not exist")]
    AncestorMissing,
    #[error("Directory not empty")]
    DirectoryNotEmpty,
    #[error("Cannot remove pwd")]
    CannotRemovePwd,
    #[error("Invalid mode")]
    InvalidMode,
    #[error("Invalid user")]
    InvalidUser,
    #[error("The user already exists")]
    UserExists,
    #[error("The user does not exist")]
    UserNotFound,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;

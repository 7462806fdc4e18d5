use std::{io, path::PathBuf};
use thiserror::Error;

use crate::mdb::Tag;

#[derive(Debug, Error)]
pub enum PatchErrorKind {
    #[error("File could not be opened")]
    OpenFailed(#[source] io::Error),
    #[error("File is too short ({0} bytes)")]
    TooShort(u64),
    #[error("Cannot read file")]
    ReadFailed(#[source] io::Error),
    #[error("Cannot handle file (header bytes {0:02x?})")]
    UnrecognizedFormat([u8; 4]),
    #[error("Packet directory entry {index} lies outside of the file")]
    DirectoryOutOfBounds { index: usize },
    #[error("{tag} offset out of bounds ({offset:#x} + {required} > {size})")]
    OffsetOutOfBounds {
        tag: Tag,
        offset: u32,
        required: u32,
        size: usize,
    },
    #[error("Cannot write file")]
    WriteFailed(#[source] io::Error),
}

/// Failure to convert a single model file.
#[derive(Debug, Error)]
#[error("{} : {kind}", .path.display())]
pub struct PatchError {
    pub path: PathBuf,
    #[source]
    pub kind: PatchErrorKind,
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to read ERF header of {}", .0.display())]
    ErfHeader(PathBuf, #[source] binrw::Error),
    #[error("{} is not an ERF archive (type {:?}, version {:?})", .0.display(), .1, .2)]
    BadErfHeader(PathBuf, Box<str>, Box<str>),
    #[error("Failed to seek within ERF archive")]
    ErfSeek(#[source] io::Error),
    #[error("Failed to read ERF entry")]
    ErfEntry(#[source] binrw::Error),
    #[error("Resource {0} lies outside of its archive")]
    ErfResourceBounds(Box<str>),

    #[error("Module {0} not found")]
    ModuleNotFound(Box<str>),
    #[error("Hak {0} not found")]
    HakNotFound(Box<str>),

    #[error("Failed to extract {0}")]
    Extract(Box<str>, #[source] io::Error),

    #[error(transparent)]
    IO(io::Error),
}

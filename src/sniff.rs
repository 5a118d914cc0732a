//! Binary container signature sniffing.
//!
//! The artifact is expected to be a spreadsheet workbook, which arrives
//! either as a zip-based container (`.xlsx`) or a legacy compound document
//! (`.xls`). Only the leading bytes are inspected; nothing here parses the
//! file's internal structure.

use std::io::{self, Read};
use std::path::Path;

/// Zip local-file-header prefix (`PK`).
const ZIP_MAGIC: &[u8] = b"PK";

/// Compound File Binary (legacy OLE) header prefix.
const COMPOUND_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// Recognized container signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSignature {
    /// Zip-based container (modern workbook formats).
    Zip,
    /// Legacy compound-document container.
    CompoundDocument,
    /// Neither known prefix matched.
    Unknown,
}

impl FileSignature {
    /// Classifies a byte prefix.
    pub fn of_bytes(prefix: &[u8]) -> Self {
        if prefix.starts_with(ZIP_MAGIC) {
            FileSignature::Zip
        } else if prefix.starts_with(COMPOUND_MAGIC) {
            FileSignature::CompoundDocument
        } else {
            FileSignature::Unknown
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, FileSignature::Unknown)
    }
}

/// Reads at most the first 8 bytes of a file and classifies them.
///
/// A file shorter than any known prefix is simply [`FileSignature::Unknown`],
/// not an error.
pub fn sniff_file(path: &Path) -> io::Result<FileSignature> {
    let mut file = std::fs::File::open(path)?;
    let mut prefix = [0u8; 8];
    let mut read = 0;
    while read < prefix.len() {
        let n = file.read(&mut prefix[read..])?;
        if n == 0 {
            break;
        }
        read += n;
    }
    Ok(FileSignature::of_bytes(&prefix[..read]))
}

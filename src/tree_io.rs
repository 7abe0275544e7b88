//! Reading and writing syntax trees handed over by the parser.
//!
//! Two encodings: JSON (`serde_json`) for `.json` paths, and a binary
//! container for everything else:
//!
//! ```text
//! [4B magic "CSGR"] [4B schema version u32 LE] [4B source offset u32 LE] [4B tree offset u32 LE]
//! [Source section: 4B length u32 LE + UTF-8 bytes]
//! [Tree section: 4B length u32 LE + bincode bytes]
//! ```
//!
//! The source section is empty when no source text travels with the tree.

use std::path::Path;

use crate::syntax::File;

const MAGIC: &[u8; 4] = b"CSGR";

const SCHEMA_VERSION: u32 = 1;

/// magic (4) + version (4) + source_offset (4) + tree_offset (4)
const HEADER_SIZE: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum TreeIoError {
    #[error("invalid magic number: expected CSGR")]
    InvalidMagic,
    #[error("unsupported schema version {0} (expected {SCHEMA_VERSION})")]
    UnsupportedVersion(u32),
    #[error("truncated file: expected at least {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },
    #[error("section too large for container: {0} bytes")]
    TooLarge(usize),
    #[error("bincode encode error: {0}")]
    Encode(String),
    #[error("bincode decode error: {0}")]
    Decode(String),
    #[error("invalid UTF-8 in source section: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("invalid JSON tree: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Binary,
}

impl TreeFormat {
    /// Format implied by a path's extension: `.json` or binary.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TreeFormat::Json,
            _ => TreeFormat::Binary,
        }
    }
}

/// A tree plus the source text it was parsed from, when known.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTree {
    pub file: File,
    pub source: Option<String>,
}

/// Serialize a tree, and optionally its source text, into the binary container.
pub fn encode_binary(file: &File, source: Option<&str>) -> Result<Vec<u8>, TreeIoError> {
    let config = bincode::config::standard();
    let tree_bytes = bincode::serde::encode_to_vec(file, config).map_err(|e| TreeIoError::Encode(e.to_string()))?;

    let source_bytes = source.unwrap_or_default().as_bytes();
    let source_section_size = 4 + source_bytes.len();
    let tree_section_size = 4 + tree_bytes.len();

    let source_offset = HEADER_SIZE;
    let tree_offset = HEADER_SIZE + source_section_size;

    let mut buf = Vec::with_capacity(HEADER_SIZE + source_section_size + tree_section_size);

    // Header
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
    buf.extend_from_slice(&to_u32(source_offset)?.to_le_bytes());
    buf.extend_from_slice(&to_u32(tree_offset)?.to_le_bytes());

    // Source section
    buf.extend_from_slice(&to_u32(source_bytes.len())?.to_le_bytes());
    buf.extend_from_slice(source_bytes);

    // Tree section
    buf.extend_from_slice(&to_u32(tree_bytes.len())?.to_le_bytes());
    buf.extend_from_slice(&tree_bytes);

    Ok(buf)
}

/// Deserialize a binary container. An empty source section reads as `None`.
pub fn decode_binary(data: &[u8]) -> Result<LoadedTree, TreeIoError> {
    validate_header(data)?;

    let source_offset = read_u32(data, 8)? as usize;
    let tree_offset = read_u32(data, 12)? as usize;

    let source = String::from_utf8(section(data, source_offset)?.to_vec())?;
    let config = bincode::config::standard();
    let (file, _bytes_read): (File, usize) = bincode::serde::decode_from_slice(section(data, tree_offset)?, config)
        .map_err(|e| TreeIoError::Decode(e.to_string()))?;

    Ok(LoadedTree { file, source: (!source.is_empty()).then_some(source) })
}

/// Check whether a byte slice starts with the container magic number.
pub fn is_binary_format(data: &[u8]) -> bool {
    data.len() >= 4 && &data[..4] == MAGIC
}

pub fn to_json(file: &File) -> Result<String, TreeIoError> {
    Ok(serde_json::to_string_pretty(file)?)
}

pub fn from_json(text: &str) -> Result<File, TreeIoError> {
    Ok(serde_json::from_str(text)?)
}

/// Read a tree from disk. Containers are recognised by their magic number,
/// anything else is parsed as JSON.
pub fn read_tree(path: &Path) -> Result<LoadedTree, TreeIoError> {
    let data = std::fs::read(path).map_err(|source| io_error(path, source))?;
    if is_binary_format(&data) {
        return decode_binary(&data);
    }
    let file: File = serde_json::from_slice(&data)?;
    Ok(LoadedTree { file, source: None })
}

/// Write a tree in the format its path implies.
pub fn write_tree(path: &Path, file: &File, source: Option<&str>) -> Result<(), TreeIoError> {
    let bytes = match TreeFormat::for_path(path) {
        TreeFormat::Json => to_json(file)?.into_bytes(),
        TreeFormat::Binary => encode_binary(file, source)?,
    };
    std::fs::write(path, bytes).map_err(|source| io_error(path, source))
}

// --- internal helpers ---

fn io_error(path: &Path, source: std::io::Error) -> TreeIoError {
    TreeIoError::Io { path: path.display().to_string(), source }
}

fn to_u32(n: usize) -> Result<u32, TreeIoError> {
    u32::try_from(n).map_err(|_| TreeIoError::TooLarge(n))
}

fn read_u32(data: &[u8], at: usize) -> Result<u32, TreeIoError> {
    let bytes = data
        .get(at..at + 4)
        .ok_or(TreeIoError::Truncated { expected: at + 4, got: data.len() })?;
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    Ok(u32::from_le_bytes(word))
}

/// The bytes of the length-prefixed section starting at `offset`.
fn section(data: &[u8], offset: usize) -> Result<&[u8], TreeIoError> {
    let len = read_u32(data, offset)? as usize;
    let end = offset + 4 + len;
    data.get(offset + 4..end)
        .ok_or(TreeIoError::Truncated { expected: end, got: data.len() })
}

fn validate_header(data: &[u8]) -> Result<(), TreeIoError> {
    if data.len() < HEADER_SIZE {
        return Err(TreeIoError::Truncated { expected: HEADER_SIZE, got: data.len() });
    }
    if &data[..4] != MAGIC {
        return Err(TreeIoError::InvalidMagic);
    }
    let version = read_u32(data, 4)?;
    if version != SCHEMA_VERSION {
        return Err(TreeIoError::UnsupportedVersion(version));
    }
    Ok(())
}

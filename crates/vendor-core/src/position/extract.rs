//! Region extraction and fingerprinting

use std::path::Path;

use vendor_fs::FileSystem;
use vendor_fs::checksum::compute_bytes_checksum;

use super::Position;
use crate::{Error, Result};

/// Number of leading bytes scanned for a null byte when detecting binary
/// content.
pub const BINARY_SCAN_WINDOW: usize = 8000;

/// The bytes selected by an address and their fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Extracted bytes, line endings normalized to `\n`
    pub text: Vec<u8>,
    /// `sha256:<hex>` of `text`
    pub fingerprint: String,
}

impl Extracted {
    fn new(text: Vec<u8>) -> Self {
        let fingerprint = compute_bytes_checksum(&text);
        Self { text, fingerprint }
    }

    /// The extracted text, with invalid UTF-8 replaced.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.text).into_owned()
    }
}

/// Extract the region of `content` selected by `position` (`None` selects
/// the whole file).
///
/// Content is rejected as binary if a null byte occurs in the first
/// [`BINARY_SCAN_WINDOW`] bytes. `\r\n` is normalized to `\n` before lines
/// are split, so the same text with different line endings yields the same
/// result. A trailing newline produces one extra empty final line.
pub fn extract(content: &[u8], position: Option<&Position>) -> Result<Extracted> {
    ensure_text(content)?;
    let normalized = normalize_line_endings(content);

    let Some(position) = position else {
        return Ok(Extracted::new(normalized));
    };

    let lines = split_lines(&normalized);
    let (start, end) = resolve_line_range(position, lines.len())?;

    if !position.has_columns() {
        return Ok(Extracted::new(join_lines(&lines[start - 1..end])));
    }

    let span = resolve_column_span(&lines, position, start, end)?;
    let text = if start == end {
        lines[start - 1][span.first_from..span.last_to].to_vec()
    } else {
        let mut pieces: Vec<&[u8]> = Vec::with_capacity(end - start + 1);
        pieces.push(&lines[start - 1][span.first_from..]);
        pieces.extend(lines[start..end - 1].iter().copied());
        pieces.push(&lines[end - 1][..span.last_to]);
        join_lines(&pieces)
    };

    Ok(Extracted::new(text))
}

/// Read `path` and extract the addressed region.
pub fn extract_position(
    fs: &dyn FileSystem,
    path: &Path,
    position: Option<&Position>,
) -> Result<Extracted> {
    let content = fs.read(path).map_err(|source| Error::ReadSource {
        path: path.to_path_buf(),
        source,
    })?;
    extract(&content, position)
}

/// Fail if a null byte appears in the binary scan window.
pub(crate) fn ensure_text(content: &[u8]) -> Result<()> {
    let window = &content[..content.len().min(BINARY_SCAN_WINDOW)];
    if window.contains(&0) {
        return Err(Error::BinaryContent {
            window: BINARY_SCAN_WINDOW,
        });
    }
    Ok(())
}

/// Replace every `\r\n` with `\n`. A lone `\r` is kept.
pub(crate) fn normalize_line_endings(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len());
    let mut iter = content.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        if byte == b'\r' && iter.peek() == Some(&b'\n') {
            continue;
        }
        out.push(byte);
    }
    out
}

/// Split on `\n`; a trailing `\n` yields a final empty line.
pub(crate) fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    content.split(|&b| b == b'\n').collect()
}

pub(crate) fn join_lines(lines: &[&[u8]]) -> Vec<u8> {
    lines.join(&b'\n')
}

/// Number of lines `content` splits into after normalization.
pub fn line_count(content: &[u8]) -> usize {
    split_lines(&normalize_line_endings(content)).len()
}

/// Resolve an address to a 1-indexed inclusive line range.
pub(crate) fn resolve_line_range(position: &Position, line_count: usize) -> Result<(usize, usize)> {
    let start = position.start_line;
    if start < 1 || start > line_count {
        return Err(Error::LineOutOfRange {
            line: start,
            line_count,
        });
    }

    let end = position.end_line_or_start().unwrap_or(line_count);
    if end < start {
        return Err(Error::InvalidLineRange { start, end });
    }
    if end > line_count {
        return Err(Error::LineOutOfRange {
            line: end,
            line_count,
        });
    }

    Ok((start, end))
}

/// Byte bounds of a column span: the selection starts at `first_from` in the
/// first line and ends before `last_to` in the last line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnSpan {
    pub first_from: usize,
    pub last_to: usize,
}

pub(crate) fn resolve_column_span(
    lines: &[&[u8]],
    position: &Position,
    start: usize,
    end: usize,
) -> Result<ColumnSpan> {
    let first_len = lines[start - 1].len();
    let last_len = lines[end - 1].len();

    // Across lines, a start column one past the end of the first line is an
    // empty contribution from that line.
    let max_start_col = if start == end { first_len } else { first_len + 1 };

    if position.start_col < 1 || position.start_col > max_start_col {
        return Err(Error::ColumnOutOfRange {
            line: start,
            column: position.start_col,
            line_length: first_len,
        });
    }
    if position.end_col < 1 || position.end_col > last_len {
        return Err(Error::ColumnOutOfRange {
            line: end,
            column: position.end_col,
            line_length: last_len,
        });
    }
    if start == end && position.end_col < position.start_col {
        return Err(Error::InvalidColumnRange {
            start: position.start_col,
            end: position.end_col,
        });
    }

    Ok(ColumnSpan {
        first_from: position.start_col - 1,
        last_to: position.end_col,
    })
}

//! Region placement

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use vendor_fs::FileSystem;

use super::Position;
use super::extract::{
    ensure_text, extract, join_lines, line_count, normalize_line_endings, resolve_column_span,
    resolve_line_range, split_lines,
};
use crate::{Error, Result};

/// Outcome of [`place_content`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Whether the file was written (false when the range already matched)
    pub written: bool,
    /// Line count before placement (0 if the file did not exist)
    pub old_line_count: usize,
    /// Line count after placement
    pub new_line_count: usize,
}

impl Placement {
    /// Change in line count caused by the placement.
    pub fn line_delta(&self) -> i64 {
        self.new_line_count as i64 - self.old_line_count as i64
    }
}

/// Replace the region of `existing` selected by `position` with
/// `replacement`, returning the new file content.
///
/// Existing content is normalized and split exactly as in extraction and
/// the range is validated with the same rules. Lines outside the range,
/// including a trailing empty line from a final newline, are kept as they
/// were. For column addresses only the selected bytes are replaced; an
/// empty replacement deletes them.
pub fn place(existing: &[u8], position: &Position, replacement: &[u8]) -> Result<Vec<u8>> {
    ensure_text(existing)?;
    let normalized = normalize_line_endings(existing);
    let lines = split_lines(&normalized);
    let (start, end) = resolve_line_range(position, lines.len())?;

    let before = &lines[..start - 1];
    let after = &lines[end..];

    let assembled;
    let mut out: Vec<&[u8]> = Vec::with_capacity(lines.len() + 1);
    out.extend(before.iter().copied());

    if position.has_columns() {
        let span = resolve_column_span(&lines, position, start, end)?;
        let prefix = &lines[start - 1][..span.first_from];
        let suffix = &lines[end - 1][span.last_to..];
        assembled = [prefix, replacement, suffix].concat();
        out.push(&assembled);
    } else {
        out.extend(split_lines(replacement));
    }

    out.extend(after.iter().copied());
    Ok(join_lines(&out))
}

/// A placement computed in memory but not yet written.
#[derive(Debug, Clone)]
pub struct PreparedPlacement {
    path: PathBuf,
    /// New file content, or `None` when the region already holds the text
    content: Option<Vec<u8>>,
    old_line_count: usize,
    new_line_count: usize,
}

impl PreparedPlacement {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_noop(&self) -> bool {
        self.content.is_none()
    }

    pub fn line_delta(&self) -> i64 {
        self.new_line_count as i64 - self.old_line_count as i64
    }

    /// Write the prepared content.
    pub fn commit(self, fs: &dyn FileSystem) -> Result<Placement> {
        let written = match self.content {
            None => {
                debug!(path = %self.path.display(), "Content already in place");
                false
            }
            Some(content) => {
                fs.write(&self.path, &content)
                    .map_err(|e| vendor_fs::Error::io(&self.path, e))?;
                true
            }
        };
        Ok(Placement {
            written,
            old_line_count: self.old_line_count,
            new_line_count: self.new_line_count,
        })
    }
}

/// Compute the result of placing `text` into the file at `path` without
/// writing it.
pub fn prepare_placement(
    fs: &dyn FileSystem,
    path: &Path,
    text: &[u8],
    position: Option<&Position>,
) -> Result<PreparedPlacement> {
    let existing = match fs.read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(source) => {
            return Err(Error::ReadTarget {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let old_line_count = existing.as_deref().map(line_count).unwrap_or(0);

    let content = match (position, existing.as_deref()) {
        (None, Some(current)) if current == text => None,
        (None, _) => Some(text.to_vec()),
        (Some(_), None) => {
            return Err(Error::ReadTarget {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    ErrorKind::NotFound,
                    "cannot resolve a position in a file that does not exist",
                ),
            });
        }
        (Some(position), Some(current)) => {
            if extract(current, Some(position))?.text == text {
                None
            } else {
                Some(place(current, position, text)?)
            }
        }
    };

    let new_line_count = content.as_deref().map(line_count).unwrap_or(old_line_count);
    Ok(PreparedPlacement {
        path: path.to_path_buf(),
        content,
        old_line_count,
        new_line_count,
    })
}

/// Place `text` into the file at `path`.
///
/// Without a position the file is replaced verbatim (created if missing,
/// no binary check). With a position the file must already exist. The
/// file's current content is read on every call, so chained placements see
/// each other's line-count changes. If the addressed region already holds
/// `text` nothing is written.
pub fn place_content(
    fs: &dyn FileSystem,
    path: &Path,
    text: &[u8],
    position: Option<&Position>,
) -> Result<Placement> {
    prepare_placement(fs, path, text, position)?.commit(fs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vendor_fs::MemoryFs;

    fn placed(existing: &str, position: Position, replacement: &str) -> String {
        String::from_utf8(place(existing.as_bytes(), &position, replacement.as_bytes()).unwrap())
            .unwrap()
    }

    #[test]
    fn replaces_column_span() {
        assert_eq!(
            placed("Hello World!\n", Position::columns(1, 7, 1, 11), "Go"),
            "Hello Go!\n"
        );
    }

    #[test]
    fn empty_replacement_deletes_span() {
        assert_eq!(placed("abcdef", Position::columns(1, 2, 1, 4), ""), "aef");
    }

    #[test]
    fn replaces_line_range_preserving_trailing_newline() {
        assert_eq!(
            placed("l1\nl2\nl3\nl4\n", Position::lines(2, 3), "new"),
            "l1\nnew\nl4\n"
        );
    }

    #[test]
    fn replacement_may_change_line_count() {
        assert_eq!(placed("a\nb\nc", Position::line(2), "x\ny\nz"), "a\nx\ny\nz\nc");
    }

    #[test]
    fn eof_placement_consumes_trailing_empty_line() {
        assert_eq!(placed("a\nb\nc\n", Position::to_eof(2), "z"), "a\nz");
        assert_eq!(placed("a\nb\nc\n", Position::to_eof(2), "b\nc\n"), "a\nb\nc\n");
    }

    #[test]
    fn multi_line_column_replacement() {
        assert_eq!(
            placed("abcdef\nmiddle\nuvwxyz\n", Position::columns(1, 4, 3, 2), "-"),
            "abc-wxyz\n"
        );
    }

    #[test]
    fn crlf_input_is_normalized_on_write() {
        assert_eq!(placed("a\r\nb\r\n", Position::line(1), "z"), "z\nb\n");
    }

    #[test]
    fn out_of_range_placement_fails() {
        let err = place(b"a\nb", &Position::lines(2, 9), b"x").unwrap_err();
        assert!(matches!(err, Error::LineOutOfRange { line: 9, line_count: 2 }));
    }

    #[test]
    fn binary_target_is_rejected_for_positions() {
        let err = place(b"a\0b", &Position::line(1), b"x").unwrap_err();
        assert!(matches!(err, Error::BinaryContent { .. }));
    }

    #[test]
    fn whole_file_placement_creates_missing_file() {
        let fs = MemoryFs::new();
        let placement = place_content(&fs, Path::new("out/new.txt"), b"fresh", None).unwrap();
        assert!(placement.written);
        assert_eq!(fs.read_string("out/new.txt").as_deref(), Some("fresh"));
    }

    #[test]
    fn whole_file_placement_skips_binary_check() {
        let fs = MemoryFs::new().with_file("bin.dat", b"\0\0");
        place_content(&fs, Path::new("bin.dat"), b"\x01\0", None).unwrap();
        assert_eq!(fs.read(Path::new("bin.dat")).unwrap(), b"\x01\0");
    }

    #[test]
    fn positioned_placement_into_missing_file_fails() {
        let fs = MemoryFs::new();
        let err = place_content(&fs, Path::new("missing.txt"), b"x", Some(&Position::line(1)))
            .unwrap_err();
        assert!(matches!(err, Error::ReadTarget { .. }));
        assert!(err.to_string().contains("read target file"));
    }

    #[test]
    fn identical_content_is_not_rewritten() {
        let fs = MemoryFs::new().with_file("crlf.txt", "a\r\nb\r\n");
        let placement =
            place_content(&fs, Path::new("crlf.txt"), b"b", Some(&Position::line(2))).unwrap();
        assert!(!placement.written);
        assert_eq!(fs.read(Path::new("crlf.txt")).unwrap(), b"a\r\nb\r\n");
    }

    #[test]
    fn sequential_placements_see_previous_results() {
        let fs = MemoryFs::new().with_file("f.txt", "1\n2\n3\n");
        place_content(&fs, Path::new("f.txt"), b"a\nb", Some(&Position::line(1))).unwrap();
        // Line 2 now refers to "b", not the original "2".
        place_content(&fs, Path::new("f.txt"), b"B", Some(&Position::line(2))).unwrap();
        assert_eq!(fs.read_string("f.txt").as_deref(), Some("a\nB\n2\n3\n"));
    }

    #[test]
    fn prepared_placement_does_not_write_until_committed() {
        let fs = MemoryFs::new().with_file("f.txt", "1\n2\n");
        let prepared =
            prepare_placement(&fs, Path::new("f.txt"), b"x\ny", Some(&Position::line(1))).unwrap();
        assert_eq!(prepared.line_delta(), 1);
        assert_eq!(fs.read_string("f.txt").as_deref(), Some("1\n2\n"));

        prepared.commit(&fs).unwrap();
        assert_eq!(fs.read_string("f.txt").as_deref(), Some("x\ny\n2\n"));
    }

    #[test]
    fn placement_reports_line_delta() {
        let fs = MemoryFs::new().with_file("f.txt", "1\n2\n3\n");
        let placement =
            place_content(&fs, Path::new("f.txt"), b"x", Some(&Position::lines(1, 3))).unwrap();
        assert_eq!(placement.old_line_count, 4);
        assert_eq!(placement.new_line_count, 2);
        assert_eq!(placement.line_delta(), -2);
    }
}

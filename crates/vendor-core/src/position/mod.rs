//! Position addressing for sub-file regions
//!
//! A mapping path may carry a position suffix selecting a region of the
//! file:
//!
//! ```text
//! path                 whole file
//! path:L5              line 5
//! path:L5-L20          lines 5 through 20
//! path:L5-EOF          line 5 through the last line
//! path:L3C7:L4C11      line 3 column 7 through line 4 column 11
//! ```
//!
//! Lines and columns are 1-indexed and inclusive. Columns are byte offsets.
//!
//! - [`extract`]: read the addressed region and fingerprint it
//! - [`place`]: replace the addressed region with new content

pub mod extract;
pub mod place;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use extract::{Extracted, extract, extract_position, line_count};
pub use place::{Placement, PreparedPlacement, place, place_content, prepare_placement};

static POSITION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^L(\d+)(?:-(?:L(\d+)|(EOF)))?$|^L(\d+)C(\d+):L(\d+)C(\d+)$")
        .expect("Invalid position regex")
});

const POSITION_FORMS: &str = "expected L<n>, L<a>-L<b>, L<a>-EOF or L<a>C<c>:L<b>C<d>";

/// A parsed line/column address within a file.
///
/// `end_line == 0` means "same as `start_line`". Columns of zero mean
/// "whole lines". An address with columns always has both lines set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub start_line: usize,
    pub end_line: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub to_eof: bool,
}

impl Position {
    /// A single line.
    pub fn line(line: usize) -> Self {
        Self {
            start_line: line,
            ..Self::default()
        }
    }

    /// An inclusive line range.
    pub fn lines(start: usize, end: usize) -> Self {
        Self {
            start_line: start,
            end_line: end,
            ..Self::default()
        }
    }

    /// From `start` through the last line.
    pub fn to_eof(start: usize) -> Self {
        Self {
            start_line: start,
            to_eof: true,
            ..Self::default()
        }
    }

    /// An inclusive column span from `(start_line, start_col)` to `(end_line, end_col)`.
    pub fn columns(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start_line,
            end_line,
            start_col,
            end_col,
            to_eof: false,
        }
    }

    /// Whether this address selects a column span rather than whole lines.
    pub fn has_columns(&self) -> bool {
        self.start_col > 0 || self.end_col > 0
    }

    /// Whether the end line is written out explicitly (and so needs
    /// rewriting when line counts change).
    pub fn has_explicit_end(&self) -> bool {
        !self.to_eof && self.end_line > 0
    }

    /// End line as written, with `0` resolved to the start line. `None` for
    /// `EOF` addresses, which only resolve against content.
    pub fn end_line_or_start(&self) -> Option<usize> {
        if self.to_eof {
            None
        } else if self.end_line == 0 {
            Some(self.start_line)
        } else {
            Some(self.end_line)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_columns() {
            let end_line = self.end_line_or_start().unwrap_or(self.start_line);
            write!(
                f,
                "L{}C{}:L{}C{}",
                self.start_line, self.start_col, end_line, self.end_col
            )
        } else if self.to_eof {
            write!(f, "L{}-EOF", self.start_line)
        } else if self.end_line == 0 {
            write!(f, "L{}", self.start_line)
        } else {
            write!(f, "L{}-L{}", self.start_line, self.end_line)
        }
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse_error = |reason: &str| Error::AddressParse {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let caps = POSITION_REGEX
            .captures(s)
            .ok_or_else(|| parse_error(POSITION_FORMS))?;

        let number = |idx: usize| -> Result<usize> {
            match caps.get(idx) {
                None => Ok(0),
                Some(m) => {
                    let value: usize = m
                        .as_str()
                        .parse()
                        .map_err(|_| parse_error("number out of range"))?;
                    if value == 0 {
                        return Err(parse_error("line and column numbers start at 1"));
                    }
                    Ok(value)
                }
            }
        };

        if caps.get(1).is_some() {
            Ok(Self {
                start_line: number(1)?,
                end_line: number(2)?,
                to_eof: caps.get(3).is_some(),
                ..Self::default()
            })
        } else {
            Ok(Self::columns(number(4)?, number(5)?, number(6)?, number(7)?))
        }
    }
}

/// A mapping endpoint: a file path plus an optional position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSpec {
    pub path: String,
    pub position: Option<Position>,
}

impl PathSpec {
    /// Parse `path[:position]`.
    ///
    /// The position suffix starts at the first `:L<digit>` whose remainder
    /// has no path separators, so drive letters and names such as
    /// `notes:Later.txt` are left alone. A suffix that looks like a position
    /// but does not parse is an error rather than part of the path.
    pub fn parse(input: &str) -> Result<Self> {
        let split = input.match_indices(":L").map(|(idx, _)| idx).find(|&idx| {
            let rest = &input[idx + 1..];
            rest.as_bytes().get(1).is_some_and(u8::is_ascii_digit)
                && !rest.contains('/')
                && !rest.contains('\\')
        });

        let (path, position) = match split {
            Some(idx) => (&input[..idx], Some(input[idx + 1..].parse::<Position>()?)),
            None => (input, None),
        };

        if path.is_empty() {
            return Err(Error::AddressParse {
                input: input.to_string(),
                reason: "missing file path".to_string(),
            });
        }

        Ok(Self {
            path: path.to_string(),
            position,
        })
    }

    /// The same path with a different position.
    pub fn with_position(&self, position: Option<Position>) -> Self {
        Self {
            path: self.path.clone(),
            position,
        }
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{}:{}", self.path, position),
            None => write!(f, "{}", self.path),
        }
    }
}

impl FromStr for PathSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse a mapping path into its file path and optional position.
pub fn parse_path_position(input: &str) -> Result<(String, Option<Position>)> {
    let spec = PathSpec::parse(input)?;
    Ok((spec.path, spec.position))
}

//! Position rewriting after a placement changes a file's line count

use vendor_fs::NormalizedPath;

use crate::config::{MappingRef, VendorSpec};
use crate::position::extract::split_lines;
use crate::position::{PathSpec, Position};
use crate::{Error, Result};

/// A mapping address that was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRewrite {
    pub old: String,
    pub new: String,
}

/// Apply `delta` to the end line of every address in `vendor`, other than
/// the mapping at `skip`, that points into `file` and has an explicit end
/// line.
///
/// `EOF` and single-line addresses are left alone. Either every address is
/// rewritten or, if one would end before it starts, none are.
pub fn adjust_sibling_positions(
    vendor: &mut VendorSpec,
    file: &str,
    delta: i64,
    skip: Option<MappingRef>,
) -> Result<Vec<AddressRewrite>> {
    if delta == 0 {
        return Ok(Vec::new());
    }

    let target = NormalizedPath::new(file);
    let mut planned: Vec<(MappingRef, bool, AddressRewrite)> = Vec::new();

    for (at, mapping) in vendor.mappings() {
        if Some(at) == skip {
            continue;
        }
        for (is_from, address) in [(true, &mapping.from), (false, &mapping.to)] {
            let spec = PathSpec::parse(address)?;
            let Some(position) = spec.position else {
                continue;
            };
            if !position.has_explicit_end() || NormalizedPath::new(&spec.path) != target {
                continue;
            }

            let end_line = position.end_line as i64 + delta;
            if end_line < position.start_line as i64 {
                return Err(Error::PositionDelta {
                    vendor: vendor.name.clone(),
                    mapping: address.clone(),
                    start_line: position.start_line,
                    end_line,
                });
            }

            let adjusted = Position {
                end_line: end_line as usize,
                ..position
            };
            planned.push((
                at,
                is_from,
                AddressRewrite {
                    old: address.clone(),
                    new: spec.with_position(Some(adjusted)).to_string(),
                },
            ));
        }
    }

    let mut rewrites = Vec::with_capacity(planned.len());
    for (at, is_from, rewrite) in planned {
        if let Some(mapping) = vendor.mapping_mut(at) {
            let slot = if is_from {
                &mut mapping.from
            } else {
                &mut mapping.to
            };
            *slot = rewrite.new.clone();
        }
        rewrites.push(rewrite);
    }
    Ok(rewrites)
}

/// The address that selects `text` after it was placed at `position`.
///
/// Line addresses grow or shrink to the number of lines in `text`; a
/// single-line address stays single-line when `text` is one line. Column
/// addresses move their end to the last byte of `text`. `EOF` addresses
/// are unchanged.
///
/// Returns `None` when no inclusive column address selects the placed
/// text: an empty replacement, or text ending in a newline.
pub fn resize_for_replacement(position: &Position, text: &[u8]) -> Option<Position> {
    if position.to_eof {
        return Some(*position);
    }

    if !position.has_columns() {
        let line_count = split_lines(text).len();
        if line_count == 1 && !position.has_explicit_end() {
            return Some(*position);
        }
        return Some(Position::lines(
            position.start_line,
            position.start_line + line_count - 1,
        ));
    }

    let newlines = text.iter().filter(|&&b| b == b'\n').count();
    let last_piece = match text.iter().rposition(|&b| b == b'\n') {
        Some(idx) => text.len() - idx - 1,
        None => text.len(),
    };
    if last_piece == 0 {
        return None;
    }

    let end_col = if newlines == 0 {
        position.start_col + last_piece - 1
    } else {
        last_piece
    };

    Some(Position::columns(
        position.start_line,
        position.start_col,
        position.start_line + newlines,
        end_col,
    ))
}

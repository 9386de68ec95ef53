//! Extraction and placement behavior, including property tests

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vendor_core::position::{extract, line_count, place};
use vendor_core::sync::resize_for_replacement;
use vendor_core::{Error, Position};

#[test]
fn extracts_middle_lines_without_trailing_newline() {
    let content = b"line1\nline2\nline3\nline4\nline5\n";
    let extracted = extract(content, Some(&Position::lines(2, 4))).unwrap();
    assert_eq!(extracted.text_lossy(), "line2\nline3\nline4");
}

#[test]
fn places_column_span() {
    let placed = place(b"Hello World!\n", &Position::columns(1, 7, 1, 11), b"Go").unwrap();
    assert_eq!(String::from_utf8(placed).unwrap(), "Hello Go!\n");
}

#[test]
fn crlf_and_lf_fingerprints_match() {
    let crlf = extract(b"line1\r\nline2\r\n", Some(&Position::lines(1, 2))).unwrap();
    let lf = extract(b"line1\nline2\n", Some(&Position::lines(1, 2))).unwrap();
    assert_eq!(crlf.fingerprint, lf.fingerprint);
    assert!(crlf.fingerprint.starts_with("sha256:"));
}

#[test]
fn fingerprint_is_content_addressed() {
    let a = extract(b"x\nshared\ny", Some(&Position::line(2))).unwrap();
    let b = extract(b"shared", None).unwrap();
    assert_eq!(a.fingerprint, b.fingerprint);
}

#[test]
fn out_of_range_names_actual_line_count() {
    let err = extract(b"a\nb\nc", Some(&Position::line(10))).unwrap_err();
    assert_eq!(err.to_string(), "line 10 does not exist: file has 3 lines");
}

fn content_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("[a-z ]{0,8}", 1..12),
        any::<bool>(),
    )
        .prop_map(|(lines, trailing)| {
            let mut content = lines.join("\n");
            if trailing {
                content.push('\n');
            }
            content
        })
}

/// Content plus a valid line range within it.
fn content_and_range() -> impl Strategy<Value = (String, usize, usize)> {
    content_strategy().prop_flat_map(|content| {
        let n = line_count(content.as_bytes());
        (Just(content), 1..=n).prop_flat_map(move |(content, start)| {
            (Just(content), Just(start), start..=n)
        })
    })
}

/// Content of non-empty lines plus a valid column address within it.
fn content_and_columns() -> impl Strategy<Value = (String, Position)> {
    (prop::collection::vec("[a-z ]{1,8}", 1..8), any::<bool>())
        .prop_flat_map(|(lines, trailing)| {
            let n = lines.len();
            (Just(lines), Just(trailing), 1..=n)
        })
        .prop_flat_map(|(lines, trailing, start)| {
            let n = lines.len();
            (Just(lines), Just(trailing), Just(start), start..=n)
        })
        .prop_flat_map(|(lines, trailing, start, end)| {
            // Across lines the start may sit just past the end of its line.
            let first_len = lines[start - 1].len();
            let max_start_col = if start == end { first_len } else { first_len + 1 };
            (Just(lines), Just(trailing), Just(start), Just(end), 1..=max_start_col)
        })
        .prop_flat_map(|(lines, trailing, start, end, start_col)| {
            let last_len = lines[end - 1].len();
            let min_end_col = if start == end { start_col } else { 1 };
            (
                Just(lines),
                Just(trailing),
                Just(start),
                Just(end),
                Just(start_col),
                min_end_col..=last_len,
            )
        })
        .prop_map(|(lines, trailing, start, end, start_col, end_col)| {
            let mut content = lines.join("\n");
            if trailing {
                content.push('\n');
            }
            (content, Position::columns(start, start_col, end, end_col))
        })
}

proptest! {
    #[test]
    fn placing_extracted_text_back_is_a_no_op((content, start, end) in content_and_range()) {
        let position = Position::lines(start, end);
        let extracted = extract(content.as_bytes(), Some(&position)).unwrap();
        let placed = place(content.as_bytes(), &position, &extracted.text).unwrap();
        prop_assert_eq!(placed, content.into_bytes());
    }

    #[test]
    fn round_trip_through_another_file((content, start, end) in content_and_range()) {
        let position = Position::lines(start, end);
        let extracted = extract(content.as_bytes(), Some(&position)).unwrap();

        let other = "header\nplaceholder\nfooter\n";
        let placed = place(other.as_bytes(), &Position::line(2), &extracted.text).unwrap();
        let span = Position::lines(2, 2 + (end - start));
        let back = extract(&placed, Some(&span)).unwrap();

        prop_assert_eq!(&back.text, &extracted.text);
        prop_assert_eq!(back.fingerprint, extracted.fingerprint);
    }

    #[test]
    fn line_endings_do_not_change_fingerprints((content, start, end) in content_and_range()) {
        let crlf = content.replace('\n', "\r\n");
        let position = Position::lines(start, end);
        let lf = extract(content.as_bytes(), Some(&position)).unwrap();
        let cr = extract(crlf.as_bytes(), Some(&position)).unwrap();
        prop_assert_eq!(lf.fingerprint, cr.fingerprint);
    }

    #[test]
    fn start_line_bounds_follow_line_count(content in content_strategy(), extra in 1usize..5) {
        let n = line_count(content.as_bytes());
        for start in 1..=n {
            prop_assert!(extract(content.as_bytes(), Some(&Position::line(start))).is_ok());
        }
        match extract(content.as_bytes(), Some(&Position::line(n + extra))) {
            Err(Error::LineOutOfRange { line, line_count }) => {
                prop_assert_eq!(line, n + extra);
                prop_assert_eq!(line_count, n);
            }
            other => prop_assert!(false, "unexpected result: {:?}", other.map(|e| e.fingerprint)),
        }
    }

    #[test]
    fn placing_extracted_columns_back_is_a_no_op((content, position) in content_and_columns()) {
        let extracted = extract(content.as_bytes(), Some(&position)).unwrap();
        let placed = place(content.as_bytes(), &position, &extracted.text).unwrap();
        prop_assert_eq!(placed, content.into_bytes());
    }

    #[test]
    fn column_round_trip_through_another_file((content, position) in content_and_columns()) {
        let extracted = extract(content.as_bytes(), Some(&position)).unwrap();

        let target = Position::columns(1, 3, 1, 13);
        let placed = place(b"<<placeholder>>\n", &target, &extracted.text).unwrap();
        let span = resize_for_replacement(&target, &extracted.text).unwrap();
        let back = extract(&placed, Some(&span)).unwrap();

        prop_assert_eq!(&back.text, &extracted.text);
        prop_assert_eq!(back.fingerprint, extracted.fingerprint);
    }

    #[test]
    fn line_endings_do_not_change_column_fingerprints((content, position) in content_and_columns()) {
        let crlf = content.replace('\n', "\r\n");
        let lf = extract(content.as_bytes(), Some(&position)).unwrap();
        let cr = extract(crlf.as_bytes(), Some(&position)).unwrap();
        prop_assert_eq!(lf.fingerprint, cr.fingerprint);
    }

    #[test]
    fn eof_from_first_line_equals_whole_file(content in content_strategy()) {
        let whole = extract(content.as_bytes(), None).unwrap();
        let eof = extract(content.as_bytes(), Some(&Position::to_eof(1))).unwrap();
        prop_assert_eq!(whole, eof);
    }
}

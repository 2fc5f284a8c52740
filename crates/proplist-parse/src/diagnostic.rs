//! Diagnostic rendering for locate and parse errors.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::{Error, LocateError, ParseError, ScanError};

type ReportSpan<'a> = (&'a str, std::ops::Range<usize>);

/// Render an error with ariadne.
///
/// Returns a string containing the formatted error message with source
/// context. Output is uncolored so it can be embedded in editor
/// surfaces directly.
pub fn render_report(error: &Error, filename: &str, source: &str) -> String {
    let mut output = Vec::new();
    write_report(error, filename, source, &mut output);
    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}

/// Write an error report to a writer.
pub fn write_report<W: std::io::Write>(error: &Error, filename: &str, source: &str, writer: W) {
    let report = build_report(error, filename, source.len());
    let _ = report
        .finish()
        .write((filename, Source::from(source)), writer);
}

/// A one-byte range at `offset`, clamped to the source length.
fn at(offset: usize, len: usize) -> std::ops::Range<usize> {
    let start = offset.min(len);
    start..(start + 1).min(len).max(start)
}

fn build_report<'a>(
    error: &Error,
    filename: &'a str,
    len: usize,
) -> ariadne::ReportBuilder<'static, ReportSpan<'a>> {
    let report = match error {
        Error::Locate(err) => build_locate_report(err, filename, len),
        Error::Parse(err) => build_parse_report(err, filename, len),
    };
    report.with_config(Config::default().with_color(false))
}

fn build_locate_report<'a>(
    error: &LocateError,
    filename: &'a str,
    len: usize,
) -> ariadne::ReportBuilder<'static, ReportSpan<'a>> {
    match error {
        LocateError::NoEnclosingTag { offset } => {
            let range = at(*offset, len);
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("no enclosing tag")
                .with_label(
                    Label::new((filename, range))
                        .with_message("no tag starts at or before this offset")
                        .with_color(Color::Red),
                )
                .with_help("place the cursor inside an opening tag, after its `<Name`")
        }
        LocateError::NoEnclosingObject { offset } => {
            let range = at(*offset, len);
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("no enclosing object literal")
                .with_label(
                    Label::new((filename, range))
                        .with_message("no `{` block contains this offset")
                        .with_color(Color::Red),
                )
                .with_help("place the cursor between the braces of an object literal")
        }
        LocateError::Scan(err) => build_scan_report(err, filename, len),
    }
}

fn build_parse_report<'a>(
    error: &ParseError,
    filename: &'a str,
    len: usize,
) -> ariadne::ReportBuilder<'static, ReportSpan<'a>> {
    match error {
        ParseError::UnterminatedEntryList { start } => {
            let range = at(*start, len);
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("unterminated entry list")
                .with_label(
                    Label::new((filename, range))
                        .with_message("list starts here and is never closed")
                        .with_color(Color::Red),
                )
                .with_help("close the list with `>`, `/>`, or `}`")
        }
        ParseError::UnexpectedCharacter { offset, found } => {
            let range = at(*offset, len);
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(format!("unexpected character {found:?}"))
                .with_label(
                    Label::new((filename, range))
                        .with_message("cannot begin an entry")
                        .with_color(Color::Red),
                )
        }
        ParseError::Scan(err) => build_scan_report(err, filename, len),
    }
}

fn build_scan_report<'a>(
    error: &ScanError,
    filename: &'a str,
    len: usize,
) -> ariadne::ReportBuilder<'static, ReportSpan<'a>> {
    match error {
        ScanError::UnterminatedString { start, quote } => {
            let range = at(*start, len);
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("unterminated string")
                .with_label(
                    Label::new((filename, range))
                        .with_message("string opened here")
                        .with_color(Color::Red),
                )
                .with_help(format!("add a closing {quote}"))
        }
        ScanError::UnterminatedComment { start } => {
            let range = at(*start, len);
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("unterminated block comment")
                .with_label(
                    Label::new((filename, range))
                        .with_message("comment opened here")
                        .with_color(Color::Red),
                )
                .with_help("add a closing `*/`")
        }
        ScanError::UnbalancedBracket { start, open } => {
            let range = at(*start, len);
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(format!("unbalanced {open:?} block"))
                .with_label(
                    Label::new((filename, range))
                        .with_message("block opened here")
                        .with_color(Color::Red),
                )
                .with_help("add the matching closing bracket")
        }
        ScanError::ScanNotFound { from, targets } => {
            let range = at(*from, len);
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(format!("none of {targets} found"))
                .with_label(
                    Label::new((filename, range))
                        .with_message("scan started here")
                        .with_color(Color::Red),
                )
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ListKind, parse_entries, parse_tag_at, render_report};

    #[test]
    fn unterminated_string_report() {
        let source = "<T name=\"oops";
        let err = parse_tag_at(source, 3).unwrap_err();
        let rendered = render_report(&err, "screen.jsx", source);
        assert!(rendered.contains("unterminated string"));
        assert!(rendered.contains("screen.jsx"));
        assert!(rendered.contains("string opened here"));
    }

    #[test]
    fn unterminated_list_report() {
        let source = "{ a: 1";
        let err = parse_entries(source, 1, ListKind::ObjectLiteral)
            .map_err(crate::Error::Parse)
            .unwrap_err();
        let rendered = render_report(&err, "styles.js", source);
        assert!(rendered.contains("unterminated entry list"));
        assert!(rendered.contains("never closed"));
    }

    #[test]
    fn no_enclosing_tag_report() {
        let source = "plain text";
        let err = parse_tag_at(source, 4).unwrap_err();
        let rendered = render_report(&err, "screen.jsx", source);
        assert!(rendered.contains("no enclosing tag"));
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let source = "plain";
        let err = parse_tag_at(source, source.len() + 10).unwrap_err();
        // must not panic on an out-of-range cursor
        let _ = render_report(&err, "screen.jsx", source);
    }
}

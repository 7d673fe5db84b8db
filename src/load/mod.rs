//! From raw tokens to rendered reports
//!
//! Every token list goes through the same path, whether it comes from the
//! command line or from one line of a file: structural validation, parsing,
//! then rendering. Failures are recoverable and only affect their own list.

pub mod parse;
pub mod validate;

use std::{
    borrow::Cow,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
};

use anyhow::{Context, Result};
use log::{debug, info, warn};

pub use validate::is_valid;

use crate::{
    cli::{
        report::{self, ReportOptions},
        usage,
    },
    util::error::{Error, Record},
};

/// Marker of lines to skip in bill files
pub const COMMENT: &str = "//";

/// What happened to the lines of a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// reports rendered, possibly with warnings
    pub reports: usize,
    /// lines that produced an error message instead
    pub rejected: usize,
}

/// User-facing explanation of why `tokens` are not a valid input
pub fn build_error_message<S>(tokens: &[S]) -> String
where
    S: AsRef<str>,
{
    let problem = validate::check(tokens).err();
    usage::framed(&usage::invalid_input(tokens, problem.as_ref()))
}

/// Render the report described by `tokens`
///
/// Returns `None` if the tokens are not well-formed or if any value fails to parse,
/// details are then in `errs`. Warnings may be registered even when a report is produced.
pub fn compute_report<S>(tokens: &[S], options: ReportOptions, errs: &mut Record) -> Option<String>
where
    S: AsRef<str>,
{
    match validate::check(tokens) {
        Ok(shape) => debug!("{} bills and {} shares to parse", shape.bills, shape.shares),
        Err(problem) => {
            debug!("rejected by validation: {}", problem);
            usage::invalid_input(tokens, Some(&problem)).register(errs);
            return None;
        }
    }
    let data = parse::parse(tokens, errs)?;
    Some(report::render(&data, options))
}

/// Write the report of `tokens` to `out`, or the reasons why there is none
///
/// Returns whether a report was written.
pub fn emit<S, W>(out: &mut W, tokens: &[S], options: ReportOptions) -> io::Result<bool>
where
    S: AsRef<str>,
    W: Write,
{
    if !is_valid(tokens) {
        warn!("'{}' rejected: malformed input", join(tokens));
        writeln!(out, "{}", build_error_message(tokens))?;
        return Ok(false);
    }
    let mut errs = Record::new();
    match compute_report(tokens, options, &mut errs) {
        Some(report) => {
            writeln!(out, "{}", report)?;
            write!(out, "{}", errs)?;
            Ok(true)
        }
        None => {
            let labels = errs.iter().map(Error::label).collect::<Vec<_>>();
            warn!("'{}' rejected: {}", join(tokens), labels.join(", "));
            writeln!(out, "{}", usage::framed(&errs))?;
            Ok(false)
        }
    }
}

/// Treat each line of `reader` as a separate token list
///
/// Blank lines and lines starting with `//` are skipped. Bytes that are not
/// valid UTF-8 only spoil their own line.
pub fn process_lines<R, W>(reader: R, out: &mut W, options: ReportOptions) -> io::Result<Tally>
where
    R: BufRead,
    W: Write,
{
    let mut tally = Tally::default();
    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line = String::from_utf8_lossy(&bytes);
        if matches!(line, Cow::Owned(_)) {
            warn!("line {}: invalid UTF-8 replaced by '{}'", idx + 1, char::REPLACEMENT_CHARACTER);
        }
        let line = line.strip_suffix('\r').unwrap_or(&line);
        let tokens = line.split(' ').collect::<Vec<_>>();
        if is_comment_or_blank(&tokens) {
            debug!("line {}: skipped", idx + 1);
            continue;
        }
        info!("line {}: {} tokens", idx + 1, tokens.len());
        if emit(out, &tokens, options)? {
            tally.reports += 1;
        } else {
            tally.rejected += 1;
        }
    }
    Ok(tally)
}

/// Print the reports of all lines of the file at `path`
pub fn read_file(path: &Path, options: ReportOptions) -> Result<Tally> {
    let file = File::open(path).with_context(|| format!("could not open bill file '{}'", path.display()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let tally = process_lines(BufReader::new(file), &mut out, options)
        .and_then(|tally| out.flush().map(|_| tally))
        .with_context(|| format!("could not process bill file '{}'", path.display()))?;
    info!("{}: {} reports, {} rejected lines", path.display(), tally.reports, tally.rejected);
    Ok(tally)
}

fn is_comment_or_blank(tokens: &[&str]) -> bool {
    match tokens.first() {
        None => true,
        Some(first) => first.is_empty() || *first == COMMENT,
    }
}

fn join<S>(tokens: &[S]) -> String
where
    S: AsRef<str>,
{
    tokens.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::color;

    fn tokens(s: &str) -> Vec<&str> {
        s.split(' ').collect()
    }

    #[test]
    fn end_to_end() {
        color::disable();
        let mut errs = Record::new();
        let report = compute_report(&tokens("date 03/2015 gas 34.56 -- bob 55 susan 45"), ReportOptions::default(), &mut errs).unwrap();
        assert!(errs.is_empty());
        assert!(report.starts_with("March 2015\n"));
        assert!(report.contains("Gas:           $34.56\n"));
        assert!(report.contains("Total:         $34.56\n"));
        assert!(report.contains("Bob's Total:   $19.01\n"));
        assert!(report.contains("Susan's Total: $15.55\n"));
    }

    #[test]
    fn structural_errors_are_reported() {
        color::disable();
        let mut errs = Record::new();
        let input = tokens("date 03/2015 gas 34.56 electric -- bob 55 susan 45");
        assert!(!is_valid(&input));
        assert!(compute_report(&input, ReportOptions::default(), &mut errs).is_none());
        assert_eq!(errs.count_errors(), 1);
        let msg = build_error_message(&input);
        assert!(msg.contains("'date 03/2015 gas 34.56 electric -- bob 55 susan 45'"));
        assert!(msg.contains("10 tokens"));
    }

    #[test]
    fn batch_survives_bad_lines() {
        color::disable();
        let file = "\
// March bills
date 03/2015 gas 34.56 -- bob 55 susan 45

date 04/2015 gas abc -- bob 50 susan 50
date 04/2015 gas 12
month 05/2015 rent 900 -- bob 50 susan 40
header Summer-House rent 1200 -- bob 100
";
        let mut out = Vec::new();
        let tally = process_lines(file.as_bytes(), &mut out, ReportOptions::default()).unwrap();
        assert_eq!(tally, Tally { reports: 3, rejected: 2 });
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("March 2015"));
        assert!(out.contains("--> Error: Invalid amount"));
        assert!(out.contains("--> Error: There was a problem with your inputs"));
        assert!(out.contains("--> Warning: Percentages do not add up"));
        assert!(out.contains("May 2015"));
        assert!(out.contains("Summer House"));
        assert!(!out.contains("March bills"));
    }

    #[test]
    fn batch_survives_bad_encoding() {
        color::disable();
        let file = b"date 03/2015 gas 3\xff4 -- bob 50 susan 50\r\ndate 04/2015 rent 900 -- bob 50 susan 50\r\n";
        let mut out = Vec::new();
        let tally = process_lines(&file[..], &mut out, ReportOptions::default()).unwrap();
        assert_eq!(tally, Tally { reports: 1, rejected: 1 });
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("--> Error: Invalid amount"));
        assert!(out.contains("April 2015"));
        assert!(out.contains("Susan's Total: $450.00\n"));
    }

    #[test]
    fn batch_survives_overflowing_total() {
        color::disable();
        let file = "\
date 03/2015 a 100000000000000000 b 100000000000000000 -- bob 100
date 04/2015 rent 900 -- bob 50 susan 50
";
        let mut out = Vec::new();
        let tally = process_lines(file.as_bytes(), &mut out, ReportOptions::default()).unwrap();
        assert_eq!(tally, Tally { reports: 1, rejected: 1 });
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("--> Error: Unusable amount"));
        assert!(out.contains("April 2015"));
    }

    #[test]
    fn comments_and_blanks() {
        assert!(is_comment_or_blank(&tokens("")));
        assert!(is_comment_or_blank(&tokens("// date 03/2015")));
        assert!(!is_comment_or_blank(&tokens("date 03/2015 //")));
        assert!(!is_comment_or_blank(&tokens("//date")));
    }
}

//! Convert a list of tokens into the bills and shares of a report
//!
//! The list is walked once by a small state machine. Names and values
//! are paired explicitly: a name waits in `pending` until its value arrives.
//! Individual numeric and date tokens are checked by the grammar in `roomies.pest`.

#![allow(clippy::upper_case_acronyms)]

use log::{debug, trace};
use pest::Parser;
use pest_derive::*;

use crate::{
    load::validate::{is_header_marker, SEPARATOR},
    util::{
        amount::{Amount, Decimal},
        entry::{title_case, Entry, EntrySet},
        error::{Error, Record},
        month::Month,
    },
};

#[derive(Parser)]
#[grammar = "roomies.pest"]
struct TokenParser;

/// Name of the synthetic entry that sums all bills
pub const TOTAL: &str = "Total";

/// Everything needed to render one report
#[derive(Debug, Clone)]
pub struct ReportData {
    pub bills: EntrySet,
    pub shares: EntrySet,
    pub header: String,
    /// sum of the bills, as of the separator
    pub total: Entry,
}

/// Position within the token list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State<'i> {
    /// reading bills
    Scanning,
    /// the next token is the value of this header marker
    InHeader(&'i str),
    /// past the separator, reading shares
    InShares,
}

/// Build the contents of a report from `tokens`
///
/// All failures are registered in `errs`. The return value is `None` if and
/// only if at least one of them is fatal. Warnings (e.g. percentages that do not
/// sum to 100) still produce a report.
pub fn parse<S>(tokens: &[S], errs: &mut Record) -> Option<ReportData>
where
    S: AsRef<str>,
{
    let mut state = State::Scanning;
    let mut pending: Option<&str> = None;
    let mut header: Option<String> = None;
    let mut total: Option<Entry> = None;
    let mut bills = EntrySet::new();
    let mut shares = EntrySet::new();
    let mut percent_sum = Some(Decimal::integer(0));
    for token in tokens {
        let token = token.as_ref();
        state = match (state, pending.take()) {
            (State::InHeader(marker), None) => {
                if let Some(value) = read_header(marker, token, errs) {
                    if let Some(prev) = &header {
                        Error::new("Duplicate header")
                            .with_text(format!("'{} {}' would override '{}'", marker, token, prev))
                            .with_text("Each report has a single header")
                            .with_hint("remove one of the header markers")
                            .register(errs);
                    } else {
                        debug!("header '{}' from '{} {}'", value, marker, token);
                        header = Some(value);
                    }
                }
                State::Scanning
            }
            (State::InHeader(_), Some(_)) => unreachable!(),
            (State::Scanning, None) if is_header_marker(token) => State::InHeader(token),
            (State::Scanning, None) if token == SEPARATOR => {
                let sum = bills.total().unwrap_or_else(|e| {
                    Error::new("Unusable amount")
                        .with_text(e)
                        .with_text("in the total of the bills")
                        .with_hint("split this report into smaller ones")
                        .register(errs);
                    Amount::default()
                });
                trace!("total of {} bills is {}", bills.len(), sum);
                total = Some(Entry::bill(TOTAL, sum));
                State::InShares
            }
            (State::InShares, None) if token == SEPARATOR => {
                Error::new("Duplicate separator")
                    .with_text("'--' appears more than once")
                    .with_hint("keep a single '--' between the bills and the shares")
                    .register(errs);
                State::InShares
            }
            (state, None) => {
                pending = Some(token);
                state
            }
            (State::Scanning, Some(name)) => {
                if let Some(amount) = read_amount(name, token, errs) {
                    trace!("bill '{}' of {}", name, amount);
                    bills.push(Entry::bill(name, amount));
                }
                State::Scanning
            }
            (State::InShares, Some(name)) => {
                // `total` is always set when entering `InShares`
                let base = total.as_ref().map(Entry::amount).unwrap_or_default();
                if let Some((percent, amount)) = read_share(name, token, base, errs) {
                    trace!("share of '{}' is {}% of {} = {}", name, percent, base, amount);
                    percent_sum = percent_sum.and_then(|s| s + percent);
                    shares.push(Entry::share(name, amount));
                }
                State::InShares
            }
        };
    }
    check_complete(state, pending, &header, &bills, &shares, errs);
    if let Some(sum) = percent_sum {
        if !errs.is_fatal() && !shares.is_empty() && !sum.equals_integer(100) {
            Error::new("Percentages do not add up")
                .nonfatal()
                .with_text(format!("Shares cover {}% of the total", sum))
                .with_hint("make the percentages after '--' sum to 100")
                .register(errs);
        }
    }
    if errs.is_fatal() {
        return None;
    }
    match (header, total) {
        (Some(header), Some(total)) => Some(ReportData {
            bills,
            shares,
            header,
            total,
        }),
        // already reported by `check_complete`
        _ => None,
    }
}

// leftovers of a list that `validate::check` would have rejected
fn check_complete(
    state: State,
    pending: Option<&str>,
    header: &Option<String>,
    bills: &EntrySet,
    shares: &EntrySet,
    errs: &mut Record,
) {
    let mut problems = Vec::new();
    if let Some(name) = pending {
        problems.push(format!("'{}' has no value", name));
    }
    match state {
        State::InHeader(marker) => problems.push(format!("header marker '{}' is not followed by a value", marker)),
        State::Scanning => problems.push("no '--' separating the bills from the shares".to_string()),
        State::InShares => (),
    }
    // missing items are a consequence of earlier errors if there are any
    if !errs.is_fatal() {
        if header.is_none() && !matches!(state, State::InHeader(_)) {
            problems.push("no header, expected 'date', 'month' or 'header'".to_string());
        }
        if bills.is_empty() {
            problems.push("no bills before '--'".to_string());
        }
        if shares.is_empty() && state == State::InShares {
            problems.push("no name/percentage pairs after '--'".to_string());
        }
    }
    for msg in problems {
        Error::new("Incomplete input")
            .with_text(msg)
            .with_hint("input should resemble 'date 12/2015 gas 34.55 rent 933 -- bob 45 susan 55'")
            .register(errs);
    }
}

/// `"March 2015"` for `date 03/2015`, title-cased text otherwise
fn read_header(marker: &str, value: &str, errs: &mut Record) -> Option<String> {
    if marker == "header" || !value.contains('/') {
        return Some(title_case(&value.replace('-', " ")));
    }
    let pairs = match TokenParser::parse(Rule::month_year, value) {
        Ok(pairs) => pairs,
        Err(e) => {
            Error::new("Invalid date")
                .with_error(e)
                .with_text(format!("in the header '{} {}'", marker, value))
                .with_hint("dates are written MM/YYYY, e.g. 03/2015")
                .with_hint("use 'header' instead for a custom title")
                .register(errs);
            return None;
        }
    };
    let mut month = None;
    let mut year = None;
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::month => month = Month::from_digits(pair.as_str()),
            Rule::year => year = Some(pair.as_str()),
            _ => (),
        }
    }
    match (month, year) {
        (Some(month), Some(year)) => Some(format!("{} {}", month, year)),
        _ => unreachable!("grammar guarantees a month and a year"),
    }
}

fn read_amount(name: &str, token: &str, errs: &mut Record) -> Option<Amount> {
    let decimal = read_decimal(Rule::money_amount, token)
        .map_err(|err| {
            err.with_text(format!("in the amount of bill '{}'", name))
                .with_hint("write amounts as digits with an optional '.', e.g. 34.56")
                .register(errs)
        })
        .ok()?;
    match decimal.to_amount() {
        Ok(amount) => Some(amount),
        Err(e) => {
            Error::new("Unusable amount")
                .with_text(e)
                .with_text(format!("in the amount of bill '{}'", name))
                .register(errs);
            None
        }
    }
}

fn read_share(name: &str, token: &str, total: Amount, errs: &mut Record) -> Option<(Decimal, Amount)> {
    let percent = read_decimal(Rule::percentage, token)
        .map_err(|err| {
            err.with_text(format!("in the percentage of '{}'", name))
                .with_hint("write percentages as digits with an optional '.', e.g. 45 or 33.3")
                .register(errs)
        })
        .ok()?;
    match total.percent(percent) {
        Ok(amount) => Some((percent, amount)),
        Err(e) => {
            Error::new("Unusable percentage")
                .with_text(e)
                .with_text(format!("in the percentage of '{}'", name))
                .register(errs);
            None
        }
    }
}

fn read_decimal(rule: Rule, token: &str) -> Result<Decimal, Error> {
    let label = match rule {
        Rule::percentage => "Invalid percentage",
        _ => "Invalid amount",
    };
    let pairs = TokenParser::parse(rule, token).map_err(|e| Error::new(label).with_error(e))?;
    let mut integer = "";
    let mut fraction = "";
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::integer => integer = pair.as_str(),
            Rule::fraction => fraction = pair.as_str(),
            _ => (),
        }
    }
    Decimal::from_digits(integer, fraction).map_err(|e| Error::new(label).with_text(e))
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
    use super::*;

    fn split(s: &str) -> Vec<&str> {
        s.split(' ').collect()
    }

    fn run(s: &str) -> (Option<ReportData>, Record) {
        let mut errs = Record::new();
        let data = parse(&split(s), &mut errs);
        (data, errs)
    }

    fn ok(s: &str) -> ReportData {
        let (data, errs) = run(s);
        assert!(!errs.is_fatal(), "{}", errs);
        data.unwrap()
    }

    fn labels(errs: &Record) -> Vec<&str> {
        errs.iter().map(Error::label).collect()
    }

    macro_rules! header {
        ( $s:expr => $header:expr ) => {{
            assert_eq!(&ok($s).header, $header);
        }};
    }

    macro_rules! lines {
        ( $set:expr => $( $name:expr, $cents:expr );* ) => {{
            let got = $set.sorted().iter().map(|e| (e.name().to_string(), e.amount().cents())).collect::<Vec<_>>();
            let expected: Vec<(String, u64)> = vec![ $( ($name.to_string(), $cents) ),* ];
            assert_eq!(got, expected);
        }};
    }

    #[test]
    fn headers() {
        header!("date 03/2015 gas 34.56 -- bob 55 susan 45" => "March 2015");
        header!("month 03/2015 gas 34.56 -- bob 55 susan 45" => "March 2015");
        header!("header 03/2015 gas 34.56 -- bob 55 susan 45" => "03/2015");
        header!("date 12/1999 gas 1 -- bob 100" => "December 1999");
        header!("header summer-house gas 1 -- bob 100" => "Summer House");
        header!("date spring gas 1 -- bob 100" => "Spring");
        header!("gas 1 header late-bills -- bob 100" => "Late Bills");
    }

    #[test]
    fn invalid_dates() {
        for s in ["date 13/2015 gas 1 -- bob 100", "date 3/2015 gas 1 -- bob 100", "month 03/15 gas 1 -- bob 100"] {
            let (data, errs) = run(s);
            assert!(data.is_none());
            assert_eq!(labels(&errs), vec!["Invalid date"]);
        }
    }

    #[test]
    fn bills_overflowing_total() {
        let (data, errs) = run("date 03/2015 a 100000000000000000 b 100000000000000000 -- bob 100");
        assert!(data.is_none());
        assert_eq!(labels(&errs), vec!["Unusable amount"]);
    }

    #[test]
    fn bills_and_total() {
        let data = ok("date 12/2015 gas 34.55 electric 45.99 rent 933 -- bob 45 susan 55");
        lines!(data.bills => "electric", 4599; "gas", 3455; "rent", 93300);
        assert_eq!(data.total.name(), "Total");
        assert!(!data.total.is_share());
        assert_eq!(data.total.amount(), Amount::from_cents(101354));
    }

    #[test]
    fn shares_of_total() {
        let data = ok("date 03/2015 gas 34.56 -- susan 45 bob 55");
        lines!(data.shares => "bob Total", 1901; "susan Total", 1555);
        assert!(data.shares.sorted().iter().all(|e| e.is_share()));
        let data = ok("date 03/2015 rent 1000 -- bob 55 susan 45");
        lines!(data.shares => "bob Total", 55000; "susan Total", 45000);
    }

    #[test]
    fn shares_sum_to_total() {
        let data = ok("date 03/2015 gas 34.57 water 12.13 rent 1000.01 -- ann 33.3 bob 33.3 cid 33.4");
        let diff = data.shares.total().unwrap().cents() as i64 - data.total.amount().cents() as i64;
        assert!(diff.abs() <= 3, "{}", diff);
    }

    #[test]
    fn decimal_forms() {
        let data = ok("date 03/2015 a 12. b .5 c 007 d 1.005 -- bob 100");
        lines!(data.bills => "a", 1200; "b", 50; "c", 700; "d", 101);
    }

    #[test]
    fn non_numeric_is_recoverable() {
        let (data, errs) = run("date 03/2015 gas abc -- bob 50 susan 50");
        assert!(data.is_none());
        assert_eq!(labels(&errs), vec!["Invalid amount"]);
        let (data, errs) = run("date 03/2015 gas 10 -- bob 5O susan 50");
        assert!(data.is_none());
        assert_eq!(labels(&errs), vec!["Invalid percentage"]);
        let (data, errs) = run("date 03/2015 gas -1 rent x -- bob 50 susan 50");
        assert!(data.is_none());
        assert_eq!(errs.count_errors(), 2);
    }

    #[test]
    fn percentages_not_summing_warn() {
        let (data, errs) = run("date 03/2015 gas 10 -- bob 50 susan 40");
        assert!(data.is_some());
        assert!(!errs.is_fatal());
        assert_eq!(labels(&errs), vec!["Percentages do not add up"]);
        let (_, errs) = run("date 03/2015 gas 10 -- bob 33.3 susan 66.70");
        assert!(errs.is_empty());
    }

    #[test]
    fn duplicate_header() {
        let (data, errs) = run("date 03/2015 header other gas 10 -- bob 100");
        assert!(data.is_none());
        assert_eq!(labels(&errs), vec!["Duplicate header"]);
    }

    #[test]
    fn incomplete_lists_do_not_panic() {
        for s in ["", "date", "date 03/2015 gas", "date 03/2015 gas 10", "gas 10 -- bob 100", "date 03/2015 -- bob", "date 03/2015 gas 1 -- bob 50 -- sue 50"] {
            let (data, errs) = run(s);
            assert!(data.is_none(), "{}", s);
            assert!(errs.is_fatal(), "{}", s);
        }
    }

    #[test]
    fn total_is_snapshot_at_separator() {
        let data = ok("date 03/2015 gas 10 -- bob 100");
        assert_eq!(data.total.amount(), Amount::from_cents(1000));
        lines!(data.shares => "bob Total", 1000);
    }
}

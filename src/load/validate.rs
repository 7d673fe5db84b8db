//! Structural pre-check of a token list
//!
//! Only the position of tokens is inspected here, never their contents:
//! a list can pass validation and still fail to parse (e.g. `gas abc`).

use thiserror::Error;

/// Tokens that introduce the header value
pub const HEADER_MARKERS: [&str; 3] = ["date", "month", "header"];

/// Token between bills and shares
pub const SEPARATOR: &str = "--";

/// Header pair, one bill pair, separator, one share pair
pub const MIN_TOKENS: usize = 7;

pub fn is_header_marker(s: &str) -> bool {
    HEADER_MARKERS.contains(&s)
}

/// Counts of complete pairs in a well-formed token list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub bills: usize,
    pub shares: usize,
}

/// First rule violated by a token list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
    #[error("no header: expected one of 'date', 'month' or 'header' before '--'")]
    MissingHeader,
    #[error("no '--' separating the bills from the shares")]
    MissingSeparator,
    #[error("only {0} tokens, at least {} are needed", MIN_TOKENS)]
    TooFewTokens(usize),
    #[error("{0} tokens, names and values do not pair up")]
    EvenTokenCount(usize),
    #[error("header marker '{0}' is not followed by a value")]
    MissingHeaderValue(String),
    #[error("no bills before '--'")]
    NoBills,
    #[error("bill '{0}' has no amount")]
    DanglingBill(String),
    #[error("'--' appears more than once")]
    DuplicateSeparator,
    #[error("no name/percentage pairs after '--'")]
    NoShares,
    #[error("share of '{0}' has no percentage")]
    DanglingShare(String),
}

impl Problem {
    /// What message to show to help fix the input
    pub fn fix_hint(&self) -> String {
        use Problem::*;
        match self {
            MissingHeader | MissingHeaderValue(_) => {
                "start with 'date MM/YYYY', 'month MM/YYYY' or 'header Some-Label'".to_string()
            }
            MissingSeparator | NoShares => {
                "add '--' followed by name/percentage pairs, e.g. '-- bob 45 susan 55'".to_string()
            }
            TooFewTokens(_) | NoBills => "add at least one bill as a name/amount pair, e.g. 'gas 34.55'".to_string(),
            EvenTokenCount(_) => "check that every bill has an amount and every person a percentage".to_string(),
            DanglingBill(name) => format!("add an amount after '{}'", name),
            DanglingShare(name) => format!("add a percentage after '{}'", name),
            DuplicateSeparator => "keep a single '--' between the bills and the shares".to_string(),
        }
    }
}

/// Whether `tokens` are well-formed enough to be parsed
pub fn is_valid<S>(tokens: &[S]) -> bool
where
    S: AsRef<str>,
{
    check(tokens).is_ok()
}

/// Explain why `tokens` are not well-formed, or count their pairs
///
/// Names and values are paired explicitly on each side of the separator,
/// which subsumes the rules on the total number of tokens. Those rules are
/// still checked first so that their failures are reported as such.
pub fn check<S>(tokens: &[S]) -> Result<Shape, Problem>
where
    S: AsRef<str>,
{
    let tokens = tokens.iter().map(AsRef::as_ref).collect::<Vec<&str>>();
    let sep = tokens.iter().position(|t| *t == SEPARATOR);
    let (bills, shares) = match sep {
        Some(idx) => (&tokens[..idx], Some(&tokens[idx + 1..])),
        None => (&tokens[..], None),
    };
    if !bills.iter().any(|t| is_header_marker(t)) {
        return Err(Problem::MissingHeader);
    }
    let shares = shares.ok_or(Problem::MissingSeparator)?;
    if tokens.len() < MIN_TOKENS {
        return Err(Problem::TooFewTokens(tokens.len()));
    }
    if tokens.len() % 2 == 0 {
        return Err(Problem::EvenTokenCount(tokens.len()));
    }
    Ok(Shape {
        bills: count_bill_pairs(bills)?,
        shares: count_share_pairs(shares)?,
    })
}

fn count_bill_pairs(tokens: &[&str]) -> Result<usize, Problem> {
    let mut headers = 0;
    let mut bills = 0;
    let mut iter = tokens.iter();
    while let Some(&name) = iter.next() {
        let is_marker = is_header_marker(name);
        match iter.next() {
            Some(_) if is_marker => headers += 1,
            Some(_) => bills += 1,
            None if is_marker => return Err(Problem::MissingHeaderValue(name.to_string())),
            None => return Err(Problem::DanglingBill(name.to_string())),
        }
    }
    if headers == 0 {
        // a marker was present but in the value slot of a pair
        return Err(Problem::MissingHeader);
    }
    if bills == 0 {
        return Err(Problem::NoBills);
    }
    Ok(bills)
}

fn count_share_pairs(tokens: &[&str]) -> Result<usize, Problem> {
    if tokens.contains(&SEPARATOR) {
        return Err(Problem::DuplicateSeparator);
    }
    let mut shares = 0;
    for pair in tokens.chunks(2) {
        match pair {
            [_, _] => shares += 1,
            [name] => return Err(Problem::DanglingShare(name.to_string())),
            _ => unreachable!(),
        }
    }
    if shares == 0 {
        return Err(Problem::NoShares);
    }
    Ok(shares)
}

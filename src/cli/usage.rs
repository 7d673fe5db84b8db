//! Messages shown instead of a report when the input is unusable

use std::fmt;

use crate::{
    load::validate::Problem,
    util::{
        color::{line, Color},
        error::Error,
    },
};

/// A complete, valid input
pub const EXAMPLE: &str = "date 12/2015 gas 34.55 electric 45.99 rent 933 -- bob 45 susan 55";

const FRAME_WIDTH: usize = 70;

/// Explain what is wrong with `tokens` and what they should look like
pub fn invalid_input<S>(tokens: &[S], problem: Option<&Problem>) -> Error
where
    S: AsRef<str>,
{
    let input = tokens.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(" ");
    let mut err = Error::new("There was a problem with your inputs").with_text(format!("  '{}'", input));
    if let Some(problem) = problem {
        err = err.with_text(problem).with_hint(problem.fix_hint());
    }
    err.with_text("Input should resemble the following:")
        .with_text(format!("  '{}'", EXAMPLE))
        .with_hint("you must include the date ('date MM/YYYY') or a title ('header Some-Title')")
        .with_hint("you must add '--' followed by name/percentage pairs, e.g. '(args) -- bob 45 susan 55'")
}

/// `msg` between two yellow rules, to stand out among reports
pub fn framed<D>(msg: &D) -> String
where
    D: fmt::Display,
{
    let rule = line('*', FRAME_WIDTH, Color::Yellow);
    format!("{}\n{}\n{}", rule, msg, rule)
}

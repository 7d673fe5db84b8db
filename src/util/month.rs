//! Calendar months, for `MM/YYYY` report headers

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;

/// Twelve months in the year, displayed by their full English name
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, PartialOrd, Ord)]
pub enum Month {
    Jan = 1,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// Month from its 1-based number (`1` is January)
    pub fn from_number(n: u8) -> Option<Self> {
        Self::from_u8(n)
    }

    /// Parse a two-digit month (`"01"` ..= `"12"`)
    ///
    /// Meant to translate text matched by the grammar, which already
    /// restricts the range, but arbitrary input safely yields `None`.
    pub fn from_digits(s: &str) -> Option<Self> {
        s.parse::<u8>().ok().and_then(Self::from_number)
    }

    pub fn name(self) -> &'static str {
        use Month::*;
        match self {
            Jan => "January",
            Feb => "February",
            Mar => "March",
            Apr => "April",
            May => "May",
            Jun => "June",
            Jul => "July",
            Aug => "August",
            Sep => "September",
            Oct => "October",
            Nov => "November",
            Dec => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

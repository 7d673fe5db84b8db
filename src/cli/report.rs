use std::fmt;

use crate::{
    load::parse::ReportData,
    util::{
        color::{line, paint, Color},
        entry::EntrySet,
    },
};

/// Minimum width of the border and separator lines
pub const DEFAULT_LINE_WIDTH: usize = 25;

/// Room left after the name column for `": $" + amount + "\n"`
pub const AMOUNT_FIELD_WIDTH: usize = 15;

/// Settings that change how a report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// omit the shares when a single person pays the whole total
    pub collapse_single_share: bool,
    /// lower bound for the width of border and separator lines
    pub min_width: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            collapse_single_share: false,
            min_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// Dimensions shared by all lines of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// width of the widest display name, shorter names are padded to it
    pub name_width: usize,
    /// width of the border and of the separators
    pub line_width: usize,
}

impl Layout {
    pub fn compute(bills: &EntrySet, shares: &EntrySet, header: &str, min_width: usize) -> Self {
        let name_width = bills.longest_title().max(shares.longest_title());
        // `AMOUNT_FIELD_WIDTH` only falls short for totals in the billions
        let widest_amount = bills
            .sorted()
            .into_iter()
            .chain(shares.sorted())
            .map(|e| e.amount().to_string().len())
            .max()
            .unwrap_or(0);
        let amount_width = AMOUNT_FIELD_WIDTH.max(": $".len() + widest_amount + 1);
        let line_width = min_width
            .max(header.chars().count())
            .max(name_width + amount_width);
        Self {
            name_width,
            line_width,
        }
    }
}

/// Rendering of a whole report
pub struct Report<'d> {
    data: &'d ReportData,
    layout: Layout,
    options: ReportOptions,
}

impl<'d> Report<'d> {
    pub fn from(data: &'d ReportData, options: ReportOptions) -> Self {
        let layout = Layout::compute(&data.bills, &data.shares, &data.header, options.min_width);
        Self {
            data,
            layout,
            options,
        }
    }

    /// A single person paying everything makes the shares redundant with the total
    fn shows_shares(&self) -> bool {
        let shares = &self.data.shares;
        !(self.options.collapse_single_share
            && shares.len() == 1
            && shares.total() == Ok(self.data.total.amount()))
    }

    fn separator(&self) -> String {
        line('-', self.layout.line_width, Color::Green)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = self.layout.name_width;
        writeln!(f, "{}", paint(&self.data.header, Color::Blue))?;
        writeln!(f, "{}", line('*', self.layout.line_width, Color::Green))?;
        write!(f, "{}", self.data.bills.render(width))?;
        writeln!(f, "{}", self.separator())?;
        write!(f, "{}", self.data.total.render(width))?;
        if self.shows_shares() {
            writeln!(f, "{}", self.separator())?;
            write!(f, "{}", self.data.shares.render(width))?;
        }
        Ok(())
    }
}

/// Full text of the report
pub fn render(data: &ReportData, options: ReportOptions) -> String {
    Report::from(data, options).to_string()
}

use crate::util::amount::{Amount, DecimalError};

/// Suffix appended to the name of every person to form their share entry
pub const SHARE_SUFFIX: &str = " Total";

/// One named line of the report: a bill, the total, or a person's share
///
/// `name` is kept raw, exactly as typed. Formatting for display
/// happens in `display_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    amount: Amount,
    is_share: bool,
}

/// Entries of the same section of a report
#[derive(Debug, Clone, Default)]
pub struct EntrySet {
    items: Vec<Entry>,
}

impl Entry {
    pub fn new<S>(name: S, amount: Amount, is_share: bool) -> Self
    where
        S: ToString,
    {
        Self {
            name: name.to_string(),
            amount,
            is_share,
        }
    }

    /// A line-item bill
    pub fn bill<S>(name: S, amount: Amount) -> Self
    where
        S: ToString,
    {
        Self::new(name, amount, false)
    }

    /// The share of `person`, named `"<person> Total"`
    pub fn share(person: &str, amount: Amount) -> Self {
        Self::new(format!("{}{}", person, SHARE_SUFFIX), amount, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn is_share(&self) -> bool {
        self.is_share
    }

    /// Title-cased name with hyphens turned into spaces,
    /// possessive form of the first word for shares
    ///
    /// `"water-bill"` becomes `"Water Bill"` and `"bob Total"` becomes `"Bob's Total"`
    pub fn display_name(&self) -> String {
        let mut s = title_case(&self.name);
        if self.is_share() {
            s = match s.split_once(' ') {
                Some((first, rest)) => format!("{}'s {}", first, rest),
                None => format!("{}'s", s),
            };
        }
        s.replace('-', " ")
    }

    /// `"<DisplayName>:<padding> $<amount>\n"`
    ///
    /// Padding extends the name to `width` characters, longer names are never truncated.
    pub fn render(&self, width: usize) -> String {
        let name = self.display_name();
        let pad = width.saturating_sub(name.chars().count());
        format!("{}:{} ${}\n", name, " ".repeat(pad), self.amount)
    }
}

impl EntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Entry) {
        self.items.push(entry);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all contained amounts, unless it overflows
    pub fn total(&self) -> Result<Amount, DecimalError> {
        self.items
            .iter()
            .try_fold(Amount::default(), |acc, e| acc.checked_add(e.amount()))
            .ok_or_else(|| DecimalError::Overflow(format!("the sum of {} entries", self.len())))
    }

    /// Length in characters of the widest display name, `0` if empty
    pub fn longest_title(&self) -> usize {
        self.items
            .iter()
            .map(|e| e.display_name().chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Entries in ascending order of raw name
    ///
    /// The sort is stable: entries with the same name keep their input order.
    pub fn sorted(&self) -> Vec<&Entry> {
        let mut items = self.items.iter().collect::<Vec<_>>();
        items.sort_by(|a, b| a.name().cmp(b.name()));
        items
    }

    /// All entries rendered with the same column `width`, in sorted order
    pub fn render(&self, width: usize) -> String {
        self.sorted().into_iter().map(|e| e.render(width)).collect()
    }
}

impl FromIterator<Entry> for EntrySet {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Upper-case the first character of every word
///
/// A word starts at the beginning of the text or after a separator. In ASCII,
/// everything but letters, digits and `_` separates words. Beyond ASCII, only
/// whitespace does. Other characters are left untouched.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_boundary = true;
    for c in s.chars() {
        if at_boundary {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_boundary = is_word_separator(c);
    }
    out
}

fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        !(c.is_ascii_alphanumeric() || c == '_')
    } else {
        c.is_whitespace()
    }
}

//! Terminal colors
//!
//! Thin wrappers around `owo_colors` that only emit escape sequences when
//! stdout supports them. `disable` forces plain text for the whole process
//! (`--no-color`), `NO_COLOR` and non-terminal outputs are detected automatically.

use owo_colors::{OwoColorize, Stream::Stdout};

/// Colors used across reports and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    White,
}

/// Wrap `text` in the escape sequences of `color`
pub fn paint<S>(text: S, color: Color) -> String
where
    S: AsRef<str>,
{
    let text = text.as_ref();
    match color {
        Color::Red => text.if_supports_color(Stdout, |t| t.bright_red().bold().to_string()).to_string(),
        Color::Green => text.if_supports_color(Stdout, |t| t.green()).to_string(),
        Color::Yellow => text.if_supports_color(Stdout, |t| t.bright_yellow().bold().to_string()).to_string(),
        Color::Blue => text.if_supports_color(Stdout, |t| t.blue()).to_string(),
        Color::White => text.if_supports_color(Stdout, |t| t.bold()).to_string(),
    }
}

/// `c` repeated `n` times, in `color`
pub fn line(c: char, n: usize, color: Color) -> String {
    paint(c.to_string().repeat(n), color)
}

/// Never emit escape sequences from now on
pub fn disable() {
    owo_colors::set_override(false);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plain_when_disabled() {
        disable();
        assert_eq!(&paint("March 2015", Color::Blue), "March 2015");
        assert_eq!(&line('*', 5, Color::Green), "*****");
        assert_eq!(&line('-', 0, Color::Green), "");
    }
}

#![allow(clippy::module_inception)]

use std::{fmt::Display, path::Path};

use serde::Serialize;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod config;
pub mod driver;
pub mod errors;
pub mod lexer;
pub mod logger;
pub mod macros;
pub mod numeric;
pub mod parser;
pub mod render;
pub mod resolver;

/// A location in the source text. Lines start at 1, the first character
/// of a line sits in column 1 and a consumed newline leaves column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    /// Position before any character has been read.
    pub fn start() -> Self {
        Position { line: 1, column: 0 }
    }

    pub fn null() -> Self {
        Position { line: 0, column: 0 }
    }

    /// Position after consuming `ch` from this position.
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Position {
                line: self.line + 1,
                column: 0,
            }
        } else {
            Position {
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }
}

/// Returns the text of the given 1-based line, without its newline.
pub fn get_line_at_position(source: &str, position: Position) -> Option<&str> {
    if position.line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth(position.line as usize - 1)
        .map(|line| line.trim_end_matches('\r'))
}


/// Renders an error with the offending source line and a caret under it.
pub fn format_error(error: &Error, source: &str, file: &Path) -> String {
    /*
        Error: message
        -> main.go:20:9
          |
        20 | var a = #
           | --------^
    */

    let position = error.get_position();
    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}:{}\n", file.to_string_lossy(), position));
    out.push_str(&format!("{:>padding$}\n", "|"));

    if let Some(line_text) = get_line_at_position(source, *position) {
        let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
        out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

        let arrows = (position.column as usize)
            .saturating_sub(removed_whitespace)
            .max(1);
        out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    }

    out
}

pub fn display_error(error: &Error, source: &str, file: &Path) {
    eprint!("{}", format_error(error, source, file));
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (&string[start..], start)
}

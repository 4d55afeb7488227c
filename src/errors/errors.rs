use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn category(&self) -> ErrorCategory {
        self.internal_error.category()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::IllegalCharacter { .. } => "IllegalCharacter",
            ErrorImpl::IntegerOverflow { .. } => "IntegerOverflow",
            ErrorImpl::FloatOverflow { .. } => "FloatOverflow",
            ErrorImpl::InvalidNumber { .. } => "InvalidNumber",
            ErrorImpl::InvalidSeparator => "InvalidSeparator",
            ErrorImpl::InvalidDigit { .. } => "InvalidDigit",
            ErrorImpl::MissingDigits { .. } => "MissingDigits",
            ErrorImpl::ExponentHasNoDigits => "ExponentHasNoDigits",
            ErrorImpl::HexExponentRequiresHexMantissa => "HexExponentRequiresHexMantissa",
            ErrorImpl::HexMantissaRequiresHexExponent => "HexMantissaRequiresHexExponent",
            ErrorImpl::DecimalExponentRequiresDecimalMantissa => {
                "DecimalExponentRequiresDecimalMantissa"
            }
            ErrorImpl::InvalidRadixPoint { .. } => "InvalidRadixPoint",
            ErrorImpl::UnknownEscape { .. } => "UnknownEscape",
            ErrorImpl::MalformedEscape { .. } => "MalformedEscape",
            ErrorImpl::InvalidCodePoint { .. } => "InvalidCodePoint",
            ErrorImpl::OctalEscapeOutOfRange { .. } => "OctalEscapeOutOfRange",
            ErrorImpl::RuneNotTerminated => "RuneNotTerminated",
            ErrorImpl::EmptyRune => "EmptyRune",
            ErrorImpl::StringNotTerminated => "StringNotTerminated",
            ErrorImpl::RawStringNotTerminated => "RawStringNotTerminated",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::MissingCondition { .. } => "MissingCondition",
            ErrorImpl::EmptyIndex => "EmptyIndex",
            ErrorImpl::NonNameOnLeftOfDefine { .. } => "NonNameOnLeftOfDefine",
            ErrorImpl::InvalidCondition { .. } => "InvalidCondition",
            ErrorImpl::Redeclared { .. } => "Redeclared",
            ErrorImpl::NoNewVariables => "NoNewVariables",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::IllegalCharacter { character } => {
                ErrorTip::Suggestion(format!("illegal character {:?}", character))
            }
            ErrorImpl::IntegerOverflow { literal } => ErrorTip::Suggestion(format!(
                "Integer literal `{}` does not fit in a signed 32-bit integer",
                literal
            )),
            ErrorImpl::FloatOverflow { literal } => ErrorTip::Suggestion(format!(
                "Float literal `{}` is too large for a 32-bit float",
                literal
            )),
            ErrorImpl::InvalidSeparator => ErrorTip::Suggestion(String::from(
                "Remove the underscore or put it between two digits",
            )),
            ErrorImpl::InvalidDigit { digit, base } => {
                ErrorTip::Suggestion(format!("`{}` is not a digit of a {}", digit, base))
            }
            ErrorImpl::HexExponentRequiresHexMantissa => ErrorTip::Suggestion(String::from(
                "Use a `0x` prefix or an `e` exponent",
            )),
            ErrorImpl::HexMantissaRequiresHexExponent => ErrorTip::Suggestion(String::from(
                "Hexadecimal floats need a `p` exponent, e.g. `0x1.8p0`",
            )),
            ErrorImpl::UnknownEscape { escape } => ErrorTip::Suggestion(format!(
                "Unknown escape `\\{}`, did you mean `\\\\{}`?",
                escape, escape
            )),
            ErrorImpl::UnexpectedToken { expected, found } => ErrorTip::Suggestion(format!(
                "Expected {}, found `{}`",
                expected, found
            )),
            ErrorImpl::MissingCondition { statement } => ErrorTip::Suggestion(format!(
                "Add a condition before the `{{` of the {} statement",
                statement
            )),
            ErrorImpl::NonNameOnLeftOfDefine { .. } => ErrorTip::Suggestion(String::from(
                "Use `=` to assign to an existing location",
            )),
            ErrorImpl::Redeclared { name, previous } => ErrorTip::Suggestion(format!(
                "`{}` was already declared at {}",
                name, previous
            )),
            ErrorImpl::NoNewVariables => {
                ErrorTip::Suggestion(String::from("Use `=` to assign to existing variables"))
            }
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Reported through an ILLEGAL token.
    Lexical,
    /// Aborts parsing.
    Syntax,
    /// Reported through the resolver callback, resolution continues.
    Declaration,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("illegal character {character:?}")]
    IllegalCharacter { character: char },
    #[error("integer constant overflow: {literal}")]
    IntegerOverflow { literal: String },
    #[error("float constant overflow: {literal}")]
    FloatOverflow { literal: String },
    #[error("invalid number literal {literal:?}")]
    InvalidNumber { literal: String },
    #[error("'_' must separate successive digits")]
    InvalidSeparator,
    #[error("invalid digit {digit:?} in {base}")]
    InvalidDigit { digit: char, base: String },
    #[error("{base} has no digits")]
    MissingDigits { base: String },
    #[error("exponent has no digits")]
    ExponentHasNoDigits,
    #[error("p exponent requires hexadecimal mantissa")]
    HexExponentRequiresHexMantissa,
    #[error("hexadecimal mantissa requires p exponent")]
    HexMantissaRequiresHexExponent,
    #[error("e exponent requires decimal mantissa")]
    DecimalExponentRequiresDecimalMantissa,
    #[error("invalid radix point in {base}")]
    InvalidRadixPoint { base: String },
    #[error("unknown escape sequence \\{escape}")]
    UnknownEscape { escape: char },
    #[error("illegal character {found:?} in escape sequence")]
    MalformedEscape { found: Option<char> },
    #[error("escape sequence is invalid Unicode code point {value:#X}")]
    InvalidCodePoint { value: u32 },
    #[error("octal escape value {value} > 255")]
    OctalEscapeOutOfRange { value: u32 },
    #[error("rune literal not terminated")]
    RuneNotTerminated,
    #[error("empty rune literal or unescaped ' in rune literal")]
    EmptyRune,
    #[error("string literal not terminated")]
    StringNotTerminated,
    #[error("raw string literal not terminated")]
    RawStringNotTerminated,

    // Syntax
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("missing condition in {statement} statement")]
    MissingCondition { statement: String },
    #[error("empty index expression")]
    EmptyIndex,
    #[error("non-name {found} on left side of :=")]
    NonNameOnLeftOfDefine { found: String },
    #[error("cannot use {found} as value in {statement} condition")]
    InvalidCondition { statement: String, found: String },

    // Declaration
    #[error("{name} redeclared in this block\n\tprevious declaration at {previous}")]
    Redeclared { name: String, previous: Position },
    #[error("no new variables on left side of :=")]
    NoNewVariables,
}

impl ErrorImpl {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::MissingCondition { .. }
            | ErrorImpl::EmptyIndex
            | ErrorImpl::NonNameOnLeftOfDefine { .. }
            | ErrorImpl::InvalidCondition { .. } => ErrorCategory::Syntax,
            ErrorImpl::Redeclared { .. } | ErrorImpl::NoNewVariables => ErrorCategory::Declaration,
            _ => ErrorCategory::Lexical,
        }
    }
}

use std::fmt::Display;

use serde::{Serialize, Serializer};

use crate::{errors::errors::ErrorImpl, Position, Span};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum TokenKind {
    Illegal,
    EOF,
    Comment,

    Identifier,
    Int,
    Float,
    Imag,
    Char,
    String,

    Plus,      // +
    Dash,      // -
    Star,      // *
    Slash,     // /
    Percent,   // %
    Ampersand, // &
    Pipe,      // |
    Caret,     // ^
    ShiftLeft,  // <<
    ShiftRight, // >>
    AndNot,     // &^

    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,
    AmpersandEquals,
    PipeEquals,
    CaretEquals,
    ShiftLeftEquals,
    ShiftRightEquals,
    AndNotEquals,

    And,   // &&
    Or,    // ||
    Arrow, // <-
    PlusPlus,
    MinusMinus,

    Equals,     // ==
    Less,
    Greater,
    Assignment, // =
    Not,        // !
    NotEquals,  // !=
    LessEquals,
    GreaterEquals,
    Define,   // :=
    Ellipsis, // ...

    OpenParen,
    OpenBracket,
    OpenCurly,
    Comma,
    Dot,
    CloseParen,
    CloseBracket,
    CloseCurly,
    Semicolon,
    Colon,

    // Reserved
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

const RESERVED_LOOKUP: [(&str, TokenKind); 25] = [
    ("break", TokenKind::Break),
    ("case", TokenKind::Case),
    ("chan", TokenKind::Chan),
    ("const", TokenKind::Const),
    ("continue", TokenKind::Continue),
    ("default", TokenKind::Default),
    ("defer", TokenKind::Defer),
    ("else", TokenKind::Else),
    ("fallthrough", TokenKind::Fallthrough),
    ("for", TokenKind::For),
    ("func", TokenKind::Func),
    ("go", TokenKind::Go),
    ("goto", TokenKind::Goto),
    ("if", TokenKind::If),
    ("import", TokenKind::Import),
    ("interface", TokenKind::Interface),
    ("map", TokenKind::Map),
    ("package", TokenKind::Package),
    ("range", TokenKind::Range),
    ("return", TokenKind::Return),
    ("select", TokenKind::Select),
    ("struct", TokenKind::Struct),
    ("switch", TokenKind::Switch),
    ("type", TokenKind::Type),
    ("var", TokenKind::Var),
];

/// Looks up a reserved word.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    RESERVED_LOOKUP
        .iter()
        .find(|(word, _)| *word == ident)
        .map(|(_, kind)| *kind)
}

impl TokenKind {
    pub fn is_keyword(&self) -> bool {
        RESERVED_LOOKUP.iter().any(|(_, kind)| kind == self)
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::Imag
                | TokenKind::Char
                | TokenKind::String
        )
    }

    /// `=` and every `op=` form.
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::Assignment
                | TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::StarEquals
                | TokenKind::SlashEquals
                | TokenKind::PercentEquals
                | TokenKind::AmpersandEquals
                | TokenKind::PipeEquals
                | TokenKind::CaretEquals
                | TokenKind::ShiftLeftEquals
                | TokenKind::ShiftRightEquals
                | TokenKind::AndNotEquals
        )
    }

    /// Source spelling of operators, punctuation and keywords.
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            TokenKind::Plus => "+",
            TokenKind::Dash => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Ampersand => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::ShiftLeft => "<<",
            TokenKind::ShiftRight => ">>",
            TokenKind::AndNot => "&^",
            TokenKind::PlusEquals => "+=",
            TokenKind::MinusEquals => "-=",
            TokenKind::StarEquals => "*=",
            TokenKind::SlashEquals => "/=",
            TokenKind::PercentEquals => "%=",
            TokenKind::AmpersandEquals => "&=",
            TokenKind::PipeEquals => "|=",
            TokenKind::CaretEquals => "^=",
            TokenKind::ShiftLeftEquals => "<<=",
            TokenKind::ShiftRightEquals => ">>=",
            TokenKind::AndNotEquals => "&^=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Arrow => "<-",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Equals => "==",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::Assignment => "=",
            TokenKind::Not => "!",
            TokenKind::NotEquals => "!=",
            TokenKind::LessEquals => "<=",
            TokenKind::GreaterEquals => ">=",
            TokenKind::Define => ":=",
            TokenKind::Ellipsis => "...",
            TokenKind::OpenParen => "(",
            TokenKind::OpenBracket => "[",
            TokenKind::OpenCurly => "{",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::CloseParen => ")",
            TokenKind::CloseBracket => "]",
            TokenKind::CloseCurly => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            kind => {
                return RESERVED_LOOKUP
                    .iter()
                    .find(|(_, reserved)| reserved == kind)
                    .map(|(word, _)| *word)
            }
        };

        Some(symbol)
    }

    /// How the kind is named when a token of it is expected.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::EOF => String::from("EOF"),
            TokenKind::Identifier => String::from("identifier"),
            TokenKind::String => String::from("string literal"),
            kind if kind.is_literal() => String::from("literal"),
            kind => match kind.symbol() {
                Some(symbol) => format!("'{}'", symbol),
                None => format!("{:?}", kind),
            },
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Decoded payload of a token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    None,
    Int(i32),
    Float(f32),
    Imag(f32),
    Char(char),
    String(String),
    Error(#[serde(serialize_with = "serialize_error")] ErrorImpl),
}

fn serialize_error<S: Serializer>(error: &ErrorImpl, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl Display for TokenValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValue::None => write!(f, ""),
            TokenValue::Int(value) => write!(f, "{}", value),
            TokenValue::Float(value) => write!(f, "{}", value),
            TokenValue::Imag(value) => write!(f, "{}i", value),
            TokenValue::Char(value) => write!(f, "{:?}", value),
            TokenValue::String(value) => write!(f, "{:?}", value),
            TokenValue::Error(error) => write!(f, "{}", error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    /// Exact source spelling.
    pub literal: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.span.start, self.kind, self.value, self.literal
        )
    }
}

impl Token {
    pub fn pos(&self) -> Position {
        self.span.start
    }

    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// The lexical error carried by an ILLEGAL token.
    pub fn error(&self) -> Option<&ErrorImpl> {
        match &self.value {
            TokenValue::Error(error) => Some(error),
            _ => None,
        }
    }

    /// How the token is named in syntax errors.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EOF => String::from("EOF"),
            TokenKind::Identifier => format!("identifier {}", self.literal),
            kind if kind.is_literal() => format!("literal {}", self.literal),
            kind => match kind.symbol() {
                Some(symbol) if kind.is_keyword() => format!("keyword {}", symbol),
                Some(symbol) => format!("'{}'", symbol),
                None => self.literal.clone(),
            },
        }
    }
}

use std::str::Chars;

use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    numeric::{self, invalid_separator, literal_name},
    Position, MK_TOKEN,
};

use super::{
    buffer::{Buffer, Entry, BUFFER_CAPACITY},
    tokens::{lookup_keyword, Token, TokenKind, TokenValue},
};

/// Produces one token per call from a source string.
///
/// Every character read is recorded in a small pushback buffer together
/// with the position it was read at, so the scanner can step back over
/// lookahead (newlines included) and restore line and column exactly.
pub struct Scanner<'src> {
    chars: Chars<'src>,
    buffer: Buffer,
    position: Position,
    /// Source spelling of the token being scanned.
    literal: String,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Scanner {
            chars: source.chars(),
            buffer: Buffer::new(BUFFER_CAPACITY),
            position: Position::start(),
            literal: String::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Scans the next token. Whitespace is skipped; once the input is
    /// exhausted every call returns EOF. Lexical errors come back as
    /// ILLEGAL tokens carrying the error as their value.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.literal.clear();

            let Some(ch) = self.read() else {
                return MK_TOKEN!(
                    TokenKind::EOF,
                    TokenValue::None,
                    "",
                    self.position,
                    self.position
                );
            };

            if ch.is_whitespace() {
                continue;
            }

            let start = self.position;
            let (kind, value) = self.scan(ch);
            let token = MK_TOKEN!(kind, value, self.literal.as_str(), start, self.position);

            trace!(kind = %token.kind, literal = %token.literal, pos = %start, "token");
            return token;
        }
    }

    fn read(&mut self) -> Option<char> {
        let entry = match self.buffer.replay() {
            Some(entry) => entry,
            None => {
                let ch = self.chars.next()?;
                let entry = Entry {
                    ch,
                    position: self.position,
                };
                self.buffer.push(entry);
                entry
            }
        };

        self.position = entry.position.advance(entry.ch);
        self.literal.push(entry.ch);
        Some(entry.ch)
    }

    fn unread(&mut self) {
        if let Some(entry) = self.buffer.unread() {
            self.position = entry.position;
            self.literal.pop();
        }
    }

    fn peek(&mut self) -> Option<char> {
        let ch = self.read();
        if ch.is_some() {
            self.unread();
        }
        ch
    }

    /// Consumes the next character if it is `expected`.
    fn follow(&mut self, expected: char) -> bool {
        match self.read() {
            Some(ch) if ch == expected => true,
            Some(_) => {
                self.unread();
                false
            }
            None => false,
        }
    }

    fn switch2(&mut self, tok0: TokenKind, tok1: TokenKind) -> TokenKind {
        if self.follow('=') {
            tok1
        } else {
            tok0
        }
    }

    fn switch3(
        &mut self,
        tok0: TokenKind,
        tok1: TokenKind,
        ch2: char,
        tok2: TokenKind,
    ) -> TokenKind {
        if self.follow('=') {
            tok1
        } else if self.follow(ch2) {
            tok2
        } else {
            tok0
        }
    }

    fn switch4(
        &mut self,
        tok0: TokenKind,
        tok1: TokenKind,
        ch2: char,
        tok2: TokenKind,
        tok3: TokenKind,
    ) -> TokenKind {
        if self.follow('=') {
            tok1
        } else if self.follow(ch2) {
            self.switch2(tok2, tok3)
        } else {
            tok0
        }
    }

    fn scan(&mut self, ch: char) -> (TokenKind, TokenValue) {
        let kind = match ch {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '{' => TokenKind::OpenCurly,
            '}' => TokenKind::CloseCurly,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '+' => self.switch3(TokenKind::Plus, TokenKind::PlusEquals, '+', TokenKind::PlusPlus),
            '-' => self.switch3(
                TokenKind::Dash,
                TokenKind::MinusEquals,
                '-',
                TokenKind::MinusMinus,
            ),
            '*' => self.switch2(TokenKind::Star, TokenKind::StarEquals),
            '%' => self.switch2(TokenKind::Percent, TokenKind::PercentEquals),
            '^' => self.switch2(TokenKind::Caret, TokenKind::CaretEquals),
            '=' => self.switch2(TokenKind::Assignment, TokenKind::Equals),
            '!' => self.switch2(TokenKind::Not, TokenKind::NotEquals),
            ':' => self.switch2(TokenKind::Colon, TokenKind::Define),
            '|' => self.switch3(TokenKind::Pipe, TokenKind::PipeEquals, '|', TokenKind::Or),
            '&' => {
                if self.follow('^') {
                    self.switch2(TokenKind::AndNot, TokenKind::AndNotEquals)
                } else {
                    self.switch3(
                        TokenKind::Ampersand,
                        TokenKind::AmpersandEquals,
                        '&',
                        TokenKind::And,
                    )
                }
            }
            '<' => {
                if self.follow('-') {
                    TokenKind::Arrow
                } else {
                    self.switch4(
                        TokenKind::Less,
                        TokenKind::LessEquals,
                        '<',
                        TokenKind::ShiftLeft,
                        TokenKind::ShiftLeftEquals,
                    )
                }
            }
            '>' => self.switch4(
                TokenKind::Greater,
                TokenKind::GreaterEquals,
                '>',
                TokenKind::ShiftRight,
                TokenKind::ShiftRightEquals,
            ),
            '/' => {
                if self.follow('/') {
                    return self.scan_line_comment();
                } else if self.follow('*') {
                    return self.scan_block_comment();
                }
                self.switch2(TokenKind::Slash, TokenKind::SlashEquals)
            }
            '.' => {
                if self.peek().is_some_and(|next| next.is_ascii_digit()) {
                    return self.scan_number('.');
                }
                if self.follow('.') {
                    if self.follow('.') {
                        TokenKind::Ellipsis
                    } else {
                        self.unread();
                        TokenKind::Dot
                    }
                } else {
                    TokenKind::Dot
                }
            }
            '"' => return self.scan_string(),
            '`' => return self.scan_raw_string(),
            '\'' => return self.scan_rune(),
            _ if ch.is_ascii_digit() => return self.scan_number(ch),
            _ if ch.is_alphabetic() || ch == '_' => return self.scan_identifier(),
            _ => {
                return (
                    TokenKind::Illegal,
                    TokenValue::Error(ErrorImpl::IllegalCharacter { character: ch }),
                )
            }
        };

        (kind, TokenValue::None)
    }

    fn scan_identifier(&mut self) -> (TokenKind, TokenValue) {
        while let Some(ch) = self.read() {
            if !(ch.is_alphanumeric() || ch == '_') {
                self.unread();
                break;
            }
        }

        let name = self.literal.clone();
        let kind = lookup_keyword(&name).unwrap_or(TokenKind::Identifier);
        (kind, TokenValue::String(name))
    }

    fn scan_line_comment(&mut self) -> (TokenKind, TokenValue) {
        while let Some(ch) = self.read() {
            if ch == '\n' {
                self.unread();
                break;
            }
        }

        let text = self.literal[2..].to_string();
        (TokenKind::Comment, TokenValue::String(text))
    }

    /// An unterminated block comment runs to the end of input.
    fn scan_block_comment(&mut self) -> (TokenKind, TokenValue) {
        while let Some(ch) = self.read() {
            if ch == '*' && self.follow('/') {
                let text = self.literal[2..self.literal.len() - 2].to_string();
                return (TokenKind::Comment, TokenValue::String(text));
            }
        }

        let text = self.literal[2..].to_string();
        (TokenKind::Comment, TokenValue::String(text))
    }

    /// Consumes digits of `base` (and separators) starting at `ch`, the
    /// character already read. Returns the first character that is not
    /// part of the run and a mask: bit 0 for digits, bit 1 for `_`.
    fn scan_digits(
        &mut self,
        mut ch: Option<char>,
        base: u32,
        invalid: &mut Option<char>,
    ) -> (Option<char>, u8) {
        let mut digsep = 0;

        while let Some(c) = ch {
            if c == '_' {
                digsep |= 2;
            } else if base <= 10 && c.is_ascii_digit() {
                if c.to_digit(10).is_some_and(|digit| digit >= base) && invalid.is_none() {
                    *invalid = Some(c);
                }
                digsep |= 1;
            } else if base == 16 && c.is_ascii_hexdigit() {
                digsep |= 1;
            } else {
                break;
            }
            ch = self.read();
        }

        (ch, digsep)
    }

    fn scan_number(&mut self, first: char) -> (TokenKind, TokenValue) {
        let mut error: Option<ErrorImpl> = None;
        let mut kind = TokenKind::Int;
        let mut base = 10;
        let mut prefix: Option<char> = None;
        let mut digsep = 0;
        let mut invalid: Option<char> = None;
        // lookahead, already read
        let mut ch = Some(first);

        // integer part
        if first != '.' {
            if first == '0' {
                ch = self.read();
                match ch.map(|c| c.to_ascii_lowercase()) {
                    Some(p @ ('x' | 'o' | 'b')) => {
                        ch = self.read();
                        base = match p {
                            'x' => 16,
                            'o' => 8,
                            _ => 2,
                        };
                        prefix = Some(p);
                    }
                    _ => {
                        base = 8;
                        prefix = Some('0');
                        // the leading zero
                        digsep = 1;
                    }
                }
            }

            let (next, ds) = self.scan_digits(ch, base, &mut invalid);
            ch = next;
            digsep |= ds;
        }

        // fractional part
        if ch == Some('.') {
            kind = TokenKind::Float;
            if matches!(prefix, Some('o' | 'b')) {
                error.get_or_insert(ErrorImpl::InvalidRadixPoint {
                    base: literal_name(prefix).to_string(),
                });
            }
            ch = self.read();
            let (next, ds) = self.scan_digits(ch, base, &mut invalid);
            ch = next;
            digsep |= ds;
        }

        if digsep & 1 == 0 {
            error.get_or_insert(ErrorImpl::MissingDigits {
                base: literal_name(prefix).to_string(),
            });
        }

        // exponent
        match ch.map(|c| c.to_ascii_lowercase()) {
            Some(e @ ('e' | 'p')) => {
                if e == 'e' && matches!(prefix, Some('x' | 'o' | 'b')) {
                    error.get_or_insert(ErrorImpl::DecimalExponentRequiresDecimalMantissa);
                } else if e == 'p' && prefix != Some('x') {
                    error.get_or_insert(ErrorImpl::HexExponentRequiresHexMantissa);
                }

                kind = TokenKind::Float;
                ch = self.read();
                if matches!(ch, Some('+' | '-')) {
                    ch = self.read();
                }

                let (next, ds) = self.scan_digits(ch, 10, &mut None);
                ch = next;
                digsep |= ds;
                if ds & 1 == 0 {
                    error.get_or_insert(ErrorImpl::ExponentHasNoDigits);
                }
            }
            _ if prefix == Some('x') && kind == TokenKind::Float => {
                error.get_or_insert(ErrorImpl::HexMantissaRequiresHexExponent);
            }
            _ => {}
        }

        if ch == Some('i') {
            kind = TokenKind::Imag;
            ch = self.read();
        }

        if ch.is_some() {
            self.unread();
        }

        let literal = self.literal.clone();

        if kind == TokenKind::Int {
            if let Some(digit) = invalid {
                error.get_or_insert(ErrorImpl::InvalidDigit {
                    digit,
                    base: literal_name(prefix).to_string(),
                });
            }
        }

        if digsep & 2 != 0 && invalid_separator(&literal).is_some() {
            error.get_or_insert(ErrorImpl::InvalidSeparator);
        }

        if let Some(error) = error {
            return (TokenKind::Illegal, TokenValue::Error(error));
        }

        let value = match kind {
            TokenKind::Int => numeric::parse_int(&literal).map(TokenValue::Int),
            TokenKind::Imag => {
                numeric::parse_imag(&literal[..literal.len() - 1]).map(TokenValue::Imag)
            }
            _ => numeric::parse_float(&literal).map(TokenValue::Float),
        };

        match value {
            Ok(value) => (kind, value),
            Err(error) => (TokenKind::Illegal, TokenValue::Error(error)),
        }
    }

    /// Decodes the escape after a backslash into the character it denotes.
    fn scan_escape(&mut self) -> Result<char, ErrorImpl> {
        let Some(ch) = self.read() else {
            return Err(ErrorImpl::MalformedEscape { found: None });
        };

        let (digits, base) = match ch {
            'a' => return Ok('\x07'),
            'b' => return Ok('\x08'),
            'f' => return Ok('\x0C'),
            'n' => return Ok('\n'),
            'r' => return Ok('\r'),
            't' => return Ok('\t'),
            'v' => return Ok('\x0B'),
            '\\' | '\'' | '"' => return Ok(ch),
            '0'..='7' => (3, 8),
            'x' => (2, 16),
            'u' => (4, 16),
            'U' => (8, 16),
            '\n' => {
                self.unread();
                return Err(ErrorImpl::MalformedEscape { found: Some('\n') });
            }
            _ => return Err(ErrorImpl::UnknownEscape { escape: ch }),
        };

        let mut value: u32 = 0;
        let mut remaining = digits;
        if base == 8 {
            value = ch.to_digit(8).unwrap_or(0);
            remaining -= 1;
        }

        while remaining > 0 {
            match self.read() {
                Some(c) if c.is_digit(base) => {
                    value = value * base + c.to_digit(base).unwrap_or(0);
                    remaining -= 1;
                }
                found => {
                    if found.is_some() {
                        self.unread();
                    }
                    return Err(ErrorImpl::MalformedEscape { found });
                }
            }
        }

        if base == 8 && value > 255 {
            return Err(ErrorImpl::OctalEscapeOutOfRange { value });
        }

        char::from_u32(value).ok_or(ErrorImpl::InvalidCodePoint { value })
    }

    fn scan_rune(&mut self) -> (TokenKind, TokenValue) {
        let mut error = None;

        let value = match self.read() {
            None => return illegal(ErrorImpl::RuneNotTerminated),
            Some('\n') => {
                self.unread();
                return illegal(ErrorImpl::RuneNotTerminated);
            }
            Some('\'') => return illegal(ErrorImpl::EmptyRune),
            Some('\\') => self.scan_escape().unwrap_or_else(|escape_error| {
                error = Some(escape_error);
                '\0'
            }),
            Some(ch) => ch,
        };

        match self.read() {
            Some('\'') => {}
            found => {
                if found.is_some() {
                    self.unread();
                }
                error.get_or_insert(ErrorImpl::RuneNotTerminated);
            }
        }

        match error {
            Some(error) => illegal(error),
            None => (TokenKind::Char, TokenValue::Char(value)),
        }
    }

    fn scan_string(&mut self) -> (TokenKind, TokenValue) {
        let mut value = String::new();
        let mut error = None;

        loop {
            match self.read() {
                None => {
                    error.get_or_insert(ErrorImpl::StringNotTerminated);
                    break;
                }
                Some('\n') => {
                    self.unread();
                    error.get_or_insert(ErrorImpl::StringNotTerminated);
                    break;
                }
                Some('"') => break,
                Some('\\') => match self.scan_escape() {
                    Ok(ch) => value.push(ch),
                    Err(escape_error) => {
                        error.get_or_insert(escape_error);
                    }
                },
                Some(ch) => value.push(ch),
            }
        }

        match error {
            Some(error) => illegal(error),
            None => (TokenKind::String, TokenValue::String(value)),
        }
    }

    /// Raw strings keep newlines and backslashes; carriage returns are
    /// dropped from the value.
    fn scan_raw_string(&mut self) -> (TokenKind, TokenValue) {
        let mut value = String::new();

        loop {
            match self.read() {
                None => return illegal(ErrorImpl::RawStringNotTerminated),
                Some('`') => break,
                Some('\r') => {}
                Some(ch) => value.push(ch),
            }
        }

        (TokenKind::String, TokenValue::String(value))
    }
}

fn illegal(error: ErrorImpl) -> (TokenKind, TokenValue) {
    (TokenKind::Illegal, TokenValue::Error(error))
}

/// Scans the whole source. The result ends with EOF; the first ILLEGAL
/// token stops scanning and its error is returned.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut scanner = Scanner::new(source);
    let mut tokens = vec![];

    loop {
        let token = scanner.next_token();

        if let TokenValue::Error(error) = token.value {
            return Err(Error::new(error, token.span.start));
        }

        let done = token.kind == TokenKind::EOF;
        tokens.push(token);
        if done {
            break;
        }
    }

    Ok(tokens)
}

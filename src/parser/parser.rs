//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the top-level parse
//! loop. Expressions use a Pratt parser with NUD/LED handlers; statements,
//! declarations and types use recursive descent dispatched through lookup
//! tables.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for operands and prefix operators
//! - LED (left denotation) handlers for binary and postfix operators
//! - Binding powers for operator precedence
//! - Type parsing handlers

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{ast::Ident, declarations::Decl},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Scanner,
        tokens::{Token, TokenKind, TokenValue},
    },
    Position, Span, MK_TOKEN,
};

use super::{
    decl::parse_top_level_decl,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements, expressions, and types. Comments are dropped on
/// construction and the stream always ends with EOF.
pub struct Parser {
    /// The list of tokens to parse
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Expression nesting level. Negative while parsing an `if`/`for`
    /// header, where `{` after a name starts the body.
    pub(crate) expr_lev: i32,
    /// Name from the package clause, if present
    package: Option<Ident>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix and postfix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type handlers
    type_nud_lookup: TypeNUDLookup,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse, as produced by the scanner
    ///
    /// # Returns
    ///
    /// A new Parser instance with all lookup tables registered.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|token| token.kind != TokenKind::Comment)
            .collect();

        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end)
                .unwrap_or_else(Position::start);
            tokens.push(MK_TOKEN!(TokenKind::EOF, TokenValue::None, "", end, end));
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            expr_lev: 0,
            package: None,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
        };

        create_token_lookups(&mut parser);
        create_token_type_lookups(&mut parser);

        parser
    }

    /// Creates a parser that scans `source` itself.
    ///
    /// Scanning stops at the first ILLEGAL token, which is kept so the
    /// parser reports its lexical error when it reaches it.
    pub fn from_source(source: &str) -> Self {
        let mut scanner = Scanner::new(source);
        let mut tokens = vec![];

        loop {
            let token = scanner.next_token();
            let kind = token.kind;
            tokens.push(token);

            if kind == TokenKind::EOF || kind == TokenKind::Illegal {
                break;
            }
        }

        Parser::new(tokens)
    }

    /// Parses every top-level declaration until EOF.
    ///
    /// # Returns
    ///
    /// The declarations in source order, or the first syntax error.
    pub fn parse(&mut self) -> Result<Vec<Decl>, Error> {
        self.skip_semicolons();

        if self.current_token_kind() == TokenKind::Package {
            self.advance();
            let name = self.expect_ident()?;
            debug!(package = %name.name, "package clause");
            self.package = Some(name);
        }

        let mut decls = vec![];

        loop {
            self.skip_semicolons();
            if !self.has_tokens() {
                break;
            }

            let decl = parse_top_level_decl(self)?;
            debug!(pos = %decl.span().start, "parsed declaration");
            decls.push(decl);
        }

        Ok(decls)
    }

    /// Name from the package clause.
    pub fn package(&self) -> Option<&Ident> {
        self.package.as_ref()
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token `offset` places ahead.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// EOF is never consumed.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.tokens[index].kind != TokenKind::EOF {
            self.pos = index + 1;
        }
        &self.tokens[index]
    }

    /// End position of the last consumed token.
    pub fn previous_end(&self) -> Position {
        match self.pos.checked_sub(1).and_then(|index| self.tokens.get(index)) {
            Some(token) => token.span.end,
            None => self.current_token().span.start,
        }
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.previous_end())
    }

    /// Whether the current token starts on the line the last consumed
    /// token ended on.
    pub fn on_same_line(&self) -> bool {
        self.current_token().span.start.line == self.previous_end().line
    }

    /// Builds the error for an unexpected current token.
    ///
    /// An ILLEGAL token yields the lexical error it carries.
    pub fn error_at_current(&self, expected: &str) -> Error {
        let token = self.current_token();

        if let Some(error) = token.error() {
            return Error::new(error.clone(), token.span.start);
        }

        Error::new(
            ErrorImpl::UnexpectedToken {
                expected: expected.to_string(),
                found: token.describe(),
            },
            token.span.start,
        )
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `error` - Optional custom error to return if expectation fails
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(match error {
                Some(error) if self.current_token_kind() != TokenKind::Illegal => error,
                _ => self.error_at_current(&expected_kind.describe()),
            });
        }

        Ok(self.advance().clone())
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Consumes an identifier token into an [`Ident`] node.
    pub fn expect_ident(&mut self) -> Result<Ident, Error> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(Ident::new(token.literal, token.span))
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Runs `parse_fn` with the expression level set to `lev`, restoring
    /// it afterwards.
    pub fn with_expr_lev<T>(
        &mut self,
        lev: i32,
        parse_fn: impl FnOnce(&mut Parser) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let outer = self.expr_lev;
        self.expr_lev = lev;
        let result = parse_fn(self);
        self.expr_lev = outer;
        result
    }

    /// Runs `parse_fn` one expression level deeper (inside parentheses,
    /// brackets or braces).
    pub fn nested<T>(
        &mut self,
        parse_fn: impl FnOnce(&mut Parser) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let lev = self.expr_lev.max(0) + 1;
        self.with_expr_lev(lev, parse_fn)
    }

    /// Skips stray `;` separators.
    pub fn skip_semicolons(&mut self) {
        while self.current_token_kind() == TokenKind::Semicolon {
            self.advance();
        }
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Returns a reference to the type lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Registers a left denotation (infix or postfix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `nud_fn` - The handler function for this operand or prefix operator
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `stmt_fn` - The handler function for this statement type
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `nud_fn` - The handler function for types starting with this token
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }
}

/// Parses a stream of tokens into top-level declarations.
///
/// This is the main entry point for parsing. It creates a parser instance
/// and parses declarations until EOF.
///
/// # Arguments
///
/// * `tokens` - Vector of tokens to parse
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance (with state after parsing)
/// - Result containing either the declarations or the first Error
pub fn parse(tokens: Vec<Token>) -> (Parser, Result<Vec<Decl>, Error>) {
    let mut parser = Parser::new(tokens);
    let result = parser.parse();

    (parser, result)
}

//! Type parsing implementation.
//!
//! This module handles parsing of type expressions. It supports:
//!
//! - Type names, qualified names (`pkg.T`) and instantiations (`List[int]`)
//! - Array and slice types
//! - Struct types
//! - Function types, including type parameter lists
//! - Parenthesized types
//!
//! Similar to expression parsing, a lookup table maps the first token of a
//! type to its handler.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::Ident,
        expressions::{Expr, IndexExpr, IndexListExpr, ParenExpr, SelectorExpr},
        types::{ArrayType, Field, FieldList, FuncType, StructType, TypeExpr},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    expr::{expr_name, parse_expr},
    lookups::BindingPower,
    parser::Parser,
};

/// Type alias for type handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Expr, Error>;

/// Type alias for the type lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_type_name);
    parser.type_nud(TokenKind::OpenBracket, parse_array_type);
    parser.type_nud(TokenKind::Struct, parse_struct_type);
    parser.type_nud(TokenKind::Func, parse_func_type_expr);
    parser.type_nud(TokenKind::OpenParen, parse_paren_type);
}

/// Parses a type expression.
///
/// # Returns
///
/// Returns the parsed type, or an error if the current token cannot start
/// a type.
pub fn parse_type(parser: &mut Parser) -> Result<Expr, Error> {
    let token_kind = parser.current_token_kind();

    match parser.get_type_nud_lookup().get(&token_kind).copied() {
        Some(type_fn) => type_fn(parser),
        None => Err(parser.error_at_current("type")),
    }
}

/// Whether the current token can start a type.
pub fn starts_type(parser: &Parser) -> bool {
    parser
        .get_type_nud_lookup()
        .contains_key(&parser.current_token_kind())
}

/// `T`, `pkg.T`, or either followed by `[type args]` on the same line.
pub fn parse_type_name(parser: &mut Parser) -> Result<Expr, Error> {
    let name = parser.expect_ident()?;
    let start = name.pos();
    let mut ty = Expr::Ident(name);

    if parser.current_token_kind() == TokenKind::Dot {
        parser.advance();
        let sel = parser.expect_ident()?;
        ty = Expr::Selector(SelectorExpr {
            x: Box::new(ty),
            sel,
            span: parser.span_from(start),
        });
    }

    if parser.current_token_kind() == TokenKind::OpenBracket
        && parser.on_same_line()
        && parser.peek_kind(1) != TokenKind::CloseBracket
    {
        ty = parse_type_args(parser, ty)?;
    }

    Ok(ty)
}

fn parse_type_args(parser: &mut Parser, ty: Expr) -> Result<Expr, Error> {
    let start = ty.pos();
    parser.expect(TokenKind::OpenBracket)?;

    let mut args = parser.nested(|parser| {
        let mut args = vec![parse_type(parser)?];

        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            if parser.current_token_kind() == TokenKind::CloseBracket {
                break;
            }
            args.push(parse_type(parser)?);
        }

        Ok(args)
    })?;

    parser.expect(TokenKind::CloseBracket)?;
    let span = parser.span_from(start);

    if args.len() == 1 {
        if let Some(index) = args.pop() {
            return Ok(Expr::Index(IndexExpr {
                x: Box::new(ty),
                index: Box::new(index),
                span,
            }));
        }
    }

    Ok(Expr::IndexList(IndexListExpr {
        x: Box::new(ty),
        indices: args,
        span,
    }))
}

/// `[len]T` or `[]T`.
pub fn parse_array_type(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::OpenBracket)?.span.start;

    let len = if parser.current_token_kind() == TokenKind::CloseBracket {
        None
    } else {
        let len = parser.nested(|parser| parse_expr(parser, BindingPower::Default))?;
        Some(Box::new(len))
    };

    parser.expect(TokenKind::CloseBracket)?;
    let elem = parse_type(parser)?;

    Ok(Expr::Type(TypeExpr::Array(ArrayType {
        len,
        elem: Box::new(elem),
        span: parser.span_from(start),
    })))
}

pub fn parse_struct_type(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::Struct)?.span.start;
    let lbrace = parser.expect(TokenKind::OpenCurly)?.span.start;
    let mut list = vec![];

    loop {
        parser.skip_semicolons();
        if parser.current_token_kind() != TokenKind::Identifier {
            break;
        }

        list.push(parse_field_decl(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Expr::Type(TypeExpr::Struct(StructType {
        fields: FieldList {
            list,
            span: parser.span_from(lbrace),
        },
        span: parser.span_from(start),
    })))
}

/// `a, b T` or an embedded `T` / `pkg.T`.
fn parse_field_decl(parser: &mut Parser) -> Result<Field, Error> {
    let mut names = parse_ident_list(parser)?;
    let start = names[0].pos();

    if names.len() == 1 && !(parser.on_same_line() && starts_type(parser)) {
        let Some(name) = names.pop() else {
            return Err(parser.error_at_current("field name"));
        };
        let mut ty = Expr::Ident(name);

        if parser.current_token_kind() == TokenKind::Dot {
            parser.advance();
            let sel = parser.expect_ident()?;
            ty = Expr::Selector(SelectorExpr {
                x: Box::new(ty),
                sel,
                span: parser.span_from(start),
            });
        }

        return Ok(Field {
            names: vec![],
            span: ty.span(),
            ty,
        });
    }

    let ty = parse_type(parser)?;

    Ok(Field {
        names,
        ty,
        span: parser.span_from(start),
    })
}

pub fn parse_ident_list(parser: &mut Parser) -> Result<Vec<Ident>, Error> {
    let mut names = vec![parser.expect_ident()?];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        names.push(parser.expect_ident()?);
    }

    Ok(names)
}

/// `func [type params] (params) results`
pub fn parse_func_type(parser: &mut Parser) -> Result<FuncType, Error> {
    let start = parser.expect(TokenKind::Func)?.span.start;

    let type_params = if parser.current_token_kind() == TokenKind::OpenBracket {
        Some(parse_type_params(parser)?)
    } else {
        None
    };

    let params = parse_parameters(parser)?;
    let results = parse_results(parser)?;

    Ok(FuncType {
        type_params,
        params,
        results,
        span: parser.span_from(start),
    })
}

fn parse_func_type_expr(parser: &mut Parser) -> Result<Expr, Error> {
    Ok(Expr::Type(TypeExpr::Function(parse_func_type(parser)?)))
}

fn parse_paren_type(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;
    let ty = parser.nested(parse_type)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Paren(ParenExpr {
        x: Box::new(ty),
        span: parser.span_from(start),
    }))
}

/// `[T any, U comparable]`; every entry must be named.
pub fn parse_type_params(parser: &mut Parser) -> Result<FieldList, Error> {
    let list = parse_field_list(parser, TokenKind::OpenBracket, TokenKind::CloseBracket)?;

    if let Some(field) = list.list.iter().find(|field| field.names.is_empty()) {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: String::from("type parameter name"),
                found: expr_name(&field.ty),
            },
            field.span.start,
        ));
    }

    Ok(list)
}

pub fn parse_parameters(parser: &mut Parser) -> Result<FieldList, Error> {
    parse_field_list(parser, TokenKind::OpenParen, TokenKind::CloseParen)
}

/// `(results)`, a single result type on the same line, or nothing.
pub fn parse_results(parser: &mut Parser) -> Result<Option<FieldList>, Error> {
    if parser.current_token_kind() == TokenKind::OpenParen {
        return Ok(Some(parse_parameters(parser)?));
    }

    if !(parser.on_same_line() && starts_type(parser)) {
        return Ok(None);
    }

    let ty = parse_type(parser)?;
    let span = ty.span();

    Ok(Some(FieldList {
        list: vec![Field {
            names: vec![],
            ty,
            span,
        }],
        span,
    }))
}

/// One comma separated entry of a parameter list before grouping.
enum ParamEntry {
    Name(Ident),
    Typed(Ident, Expr),
    Type(Expr),
}

fn parse_field_list(
    parser: &mut Parser,
    open: TokenKind,
    close: TokenKind,
) -> Result<FieldList, Error> {
    let start = parser.expect(open)?.span.start;
    let mut entries = vec![];

    while parser.current_token_kind() != close && parser.current_token_kind() != TokenKind::EOF {
        entries.push(parse_param_entry(parser, close)?);

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    parser.expect(close)?;

    Ok(FieldList {
        list: group_params(entries)?,
        span: parser.span_from(start),
    })
}

fn parse_param_entry(parser: &mut Parser, close: TokenKind) -> Result<ParamEntry, Error> {
    if parser.current_token_kind() != TokenKind::Identifier {
        return Ok(ParamEntry::Type(parse_type(parser)?));
    }

    let name = parser.expect_ident()?;
    let token_kind = parser.current_token_kind();

    if token_kind == TokenKind::Comma || token_kind == close {
        return Ok(ParamEntry::Name(name));
    }

    if token_kind == TokenKind::Dot {
        let start = name.pos();
        parser.advance();
        let sel = parser.expect_ident()?;

        return Ok(ParamEntry::Type(Expr::Selector(SelectorExpr {
            x: Box::new(Expr::Ident(name)),
            sel,
            span: parser.span_from(start),
        })));
    }

    Ok(ParamEntry::Typed(name, parse_type(parser)?))
}

/// Groups `a, b int, c string` into fields. A list is either fully named
/// or fully unnamed; in an unnamed list bare identifiers are types.
fn group_params(entries: Vec<ParamEntry>) -> Result<Vec<Field>, Error> {
    let named = entries
        .iter()
        .any(|entry| matches!(entry, ParamEntry::Typed(..)));

    if !named {
        return Ok(entries
            .into_iter()
            .map(|entry| {
                let ty = match entry {
                    ParamEntry::Name(name) => Expr::Ident(name),
                    ParamEntry::Typed(_, ty) | ParamEntry::Type(ty) => ty,
                };
                Field {
                    names: vec![],
                    span: ty.span(),
                    ty,
                }
            })
            .collect());
    }

    let mut fields = vec![];
    let mut pending: Vec<Ident> = vec![];

    for entry in entries {
        match entry {
            ParamEntry::Name(name) => pending.push(name),
            ParamEntry::Typed(name, ty) => {
                pending.push(name);
                let names = std::mem::take(&mut pending);
                let start = names.first().map(Ident::pos).unwrap_or(ty.pos());
                fields.push(Field {
                    span: Span::new(start, ty.span().end),
                    names,
                    ty,
                });
            }
            ParamEntry::Type(ty) => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        expected: String::from("parameter name"),
                        found: expr_name(&ty),
                    },
                    ty.pos(),
                ));
            }
        }
    }

    if let Some(name) = pending.first() {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: String::from("parameter type"),
                found: format!("identifier {}", name.name),
            },
            name.pos(),
        ));
    }

    Ok(fields)
}

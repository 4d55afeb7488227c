use crate::{
    ast::{
        declarations::{Decl, FuncDecl, GenDecl, ImportSpec, Spec, TypeSpec, ValueSpec},
        expressions::{BasicLit, Expr},
        types::FuncType,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{
    expr::parse_expr_list,
    parser::Parser,
    stmt::parse_block,
    types::{
        parse_ident_list, parse_parameters, parse_results, parse_type, parse_type_params,
        starts_type,
    },
};

type SpecHandler = fn(&mut Parser) -> Result<Spec, Error>;

pub fn parse_top_level_decl(parser: &mut Parser) -> Result<Decl, Error> {
    match parser.current_token_kind() {
        TokenKind::Const | TokenKind::Var | TokenKind::Type | TokenKind::Import => {
            Ok(Decl::Gen(parse_gen_decl(parser)?))
        }
        TokenKind::Func => Ok(Decl::Func(parse_func_decl(parser)?)),
        _ => Err(parser.error_at_current("declaration")),
    }
}

/// `keyword spec` or `keyword ( spec... )`.
pub fn parse_gen_decl(parser: &mut Parser) -> Result<GenDecl, Error> {
    let keyword = parser.advance().clone();

    let spec_fn: SpecHandler = match keyword.kind {
        TokenKind::Const => parse_const_spec,
        TokenKind::Var => parse_var_spec,
        TokenKind::Type => parse_type_spec,
        _ => parse_import_spec,
    };

    let mut specs = vec![];

    if parser.current_token_kind() == TokenKind::OpenParen {
        parser.advance();

        loop {
            parser.skip_semicolons();
            if matches!(
                parser.current_token_kind(),
                TokenKind::CloseParen | TokenKind::EOF
            ) {
                break;
            }

            specs.push(spec_fn(parser)?);
        }

        parser.expect(TokenKind::CloseParen)?;
    } else {
        specs.push(spec_fn(parser)?);
    }

    Ok(GenDecl {
        tok: keyword.kind,
        specs,
        span: parser.span_from(keyword.span.start),
    })
}

fn parse_value_spec(parser: &mut Parser, type_required: bool) -> Result<Spec, Error> {
    let names = parse_ident_list(parser)?;
    let start = names[0].pos();

    let ty = if parser.on_same_line() && starts_type(parser) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let values = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        parse_expr_list(parser)?
    } else {
        vec![]
    };

    if type_required && ty.is_none() && values.is_empty() {
        return Err(parser.error_at_current("type"));
    }

    Ok(Spec::Value(ValueSpec {
        names,
        ty,
        values,
        span: parser.span_from(start),
    }))
}

/// `names [type] [= values]`; in a group both may be omitted.
fn parse_const_spec(parser: &mut Parser) -> Result<Spec, Error> {
    parse_value_spec(parser, false)
}

/// `names type [= values]` or `names = values`.
fn parse_var_spec(parser: &mut Parser) -> Result<Spec, Error> {
    parse_value_spec(parser, true)
}

fn parse_type_spec(parser: &mut Parser) -> Result<Spec, Error> {
    let name = parser.expect_ident()?;
    let start = name.pos();

    // `type A[T any] ...` versus the array type in `type A [N]int`
    let type_params = if parser.current_token_kind() == TokenKind::OpenBracket
        && parser.peek_kind(1) == TokenKind::Identifier
        && matches!(
            parser.peek_kind(2),
            TokenKind::Identifier
                | TokenKind::Comma
                | TokenKind::OpenBracket
                | TokenKind::Struct
                | TokenKind::Func
        ) {
        Some(parse_type_params(parser)?)
    } else {
        None
    };

    let assign = if parser.current_token_kind() == TokenKind::Assignment {
        Some(parser.advance().span.start)
    } else {
        None
    };

    let ty = parse_type(parser)?;

    Ok(Spec::Type(TypeSpec {
        name,
        type_params,
        assign,
        ty,
        span: parser.span_from(start),
    }))
}

fn parse_import_spec(parser: &mut Parser) -> Result<Spec, Error> {
    let start = parser.current_token().span.start;

    let name = if parser.current_token_kind() == TokenKind::Identifier {
        Some(parser.expect_ident()?)
    } else {
        None
    };

    let path = parser.expect(TokenKind::String)?;

    Ok(Spec::Import(ImportSpec {
        name,
        path: Expr::BasicLit(BasicLit {
            kind: path.kind,
            value: path.value,
            literal: path.literal,
            span: path.span,
        }),
        span: parser.span_from(start),
    }))
}

/// `func name [type params] (params) results [body]`
pub fn parse_func_decl(parser: &mut Parser) -> Result<FuncDecl, Error> {
    let start = parser.expect(TokenKind::Func)?.span.start;
    let name = parser.expect_ident()?;

    let type_params = if parser.current_token_kind() == TokenKind::OpenBracket {
        Some(parse_type_params(parser)?)
    } else {
        None
    };

    let params = parse_parameters(parser)?;
    let results = parse_results(parser)?;

    let ty = FuncType {
        type_params,
        params,
        results,
        span: parser.span_from(start),
    };

    let body = if parser.current_token_kind() == TokenKind::OpenCurly {
        Some(parser.with_expr_lev(0, parse_block)?)
    } else {
        None
    };

    Ok(FuncDecl {
        name,
        ty,
        body,
        span: parser.span_from(start),
    })
}

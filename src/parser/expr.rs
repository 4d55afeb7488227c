use crate::{
    ast::{
        ast::Ident,
        expressions::{
            BasicLit, BinaryExpr, CallExpr, CompositeLit, Expr, FuncLit, IndexExpr, IndexListExpr,
            KeyValueExpr, ParenExpr, SelectorExpr, UnaryExpr,
        },
        types::TypeExpr,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    lookups::BindingPower,
    parser::Parser,
    stmt::parse_block,
    types::{parse_func_type, parse_type},
};

/// Parses an expression whose operators all bind tighter than `bp`.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.error_at_current("expression"));
    };

    let mut left = nud_fn(parser)?;

    // While the operator after lhs binds tighter than bp, continue parsing lhs
    while let Some(led_bp) = led_binding_power(parser, &left) {
        if led_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };

        left = led_fn(parser, left, led_bp)?;
    }

    Ok(left)
}

/// Binding power of the current token as an operator after `left`.
///
/// `{` only continues an expression when `left` can be the type of a
/// composite literal; inside control clause headers a bare name or
/// selector before `{` ends the expression.
fn led_binding_power(parser: &Parser, left: &Expr) -> Option<BindingPower> {
    let kind = parser.current_token_kind();

    if kind == TokenKind::OpenCurly {
        let literal_type = match left {
            Expr::Type(TypeExpr::Array(_) | TypeExpr::Struct(_)) => true,
            Expr::Ident(_) | Expr::Selector(_) | Expr::Index(_) | Expr::IndexList(_) => {
                parser.expr_lev >= 0
            }
            _ => false,
        };

        if !literal_type {
            return None;
        }
    }

    parser.get_bp_lookup().get(&kind).copied()
}

pub fn parse_expr_list(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    let mut list = vec![parse_expr(parser, BindingPower::Default)?];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        list.push(parse_expr(parser, BindingPower::Default)?);
    }

    Ok(list)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier => Ok(Expr::Ident(parser.expect_ident()?)),
        kind if kind.is_literal() => {
            let token = parser.advance().clone();
            Ok(Expr::BasicLit(BasicLit {
                kind,
                value: token.value,
                literal: token.literal,
                span: token.span,
            }))
        }
        _ => Err(parser.error_at_current("operand")),
    }
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span::new(left.pos(), right.span().end),
        x: Box::new(left),
        op: operator_token.kind,
        op_pos: operator_token.span.start,
        y: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        span: Span::new(operator_token.span.start, rhs.span().end),
        op: operator_token.kind,
        x: Box::new(rhs),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let expr = parser.nested(|parser| parse_expr(parser, BindingPower::Default))?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Paren(ParenExpr {
        x: Box::new(expr),
        span: parser.span_from(start),
    }))
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let start = left.pos();
    parser.advance();

    let (args, has_ellipsis) = parser.nested(|parser| {
        let mut args = vec![];
        let mut has_ellipsis = false;

        while !matches!(
            parser.current_token_kind(),
            TokenKind::CloseParen | TokenKind::EOF
        ) {
            args.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Ellipsis {
                parser.advance();
                has_ellipsis = true;
            }

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }

        Ok((args, has_ellipsis))
    })?;

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        fun: Box::new(left),
        args,
        has_ellipsis,
        span: parser.span_from(start),
    }))
}

/// `x[i]` or `x[a, b, ...]`; the entry count decides the node kind.
pub fn parse_index_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let start = left.pos();
    parser.advance();

    if parser.current_token_kind() == TokenKind::CloseBracket {
        return Err(Error::new(
            ErrorImpl::EmptyIndex,
            parser.current_token().span.start,
        ));
    }

    let mut indices = parser.nested(|parser| {
        let mut indices = vec![parse_expr(parser, BindingPower::Default)?];

        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            if matches!(
                parser.current_token_kind(),
                TokenKind::CloseBracket | TokenKind::EOF
            ) {
                break;
            }
            indices.push(parse_expr(parser, BindingPower::Default)?);
        }

        Ok(indices)
    })?;

    parser.expect(TokenKind::CloseBracket)?;
    let span = parser.span_from(start);

    if indices.len() == 1 {
        if let Some(index) = indices.pop() {
            return Ok(Expr::Index(IndexExpr {
                x: Box::new(left),
                index: Box::new(index),
                span,
            }));
        }
    }

    Ok(Expr::IndexList(IndexListExpr {
        x: Box::new(left),
        indices,
        span,
    }))
}

pub fn parse_selector_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let start = left.pos();
    parser.advance();
    let sel = parser.expect_ident()?;

    Ok(Expr::Selector(SelectorExpr {
        x: Box::new(left),
        sel,
        span: parser.span_from(start),
    }))
}

pub fn parse_composite_lit(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parse_literal_value(parser, Some(left))
}

/// `{elements}` with an optional literal type already parsed.
pub fn parse_literal_value(parser: &mut Parser, ty: Option<Expr>) -> Result<Expr, Error> {
    let lbrace = parser.expect(TokenKind::OpenCurly)?.span.start;
    let start = ty.as_ref().map(Expr::pos).unwrap_or(lbrace);

    let elts = parser.nested(|parser| {
        let mut elts = vec![];

        while !matches!(
            parser.current_token_kind(),
            TokenKind::CloseCurly | TokenKind::EOF
        ) {
            elts.push(parse_element(parser)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }

        Ok(elts)
    })?;

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Expr::CompositeLit(CompositeLit {
        ty: ty.map(Box::new),
        elts,
        span: parser.span_from(start),
    }))
}

fn parse_element(parser: &mut Parser) -> Result<Expr, Error> {
    let key = parse_value(parser)?;

    if parser.current_token_kind() != TokenKind::Colon {
        return Ok(key);
    }

    parser.advance();
    let value = parse_value(parser)?;

    Ok(Expr::KeyValue(KeyValueExpr {
        span: Span::new(key.pos(), value.span().end),
        key: Box::new(key),
        value: Box::new(value),
    }))
}

fn parse_value(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.current_token_kind() == TokenKind::OpenCurly {
        return parse_literal_value(parser, None);
    }

    parse_expr(parser, BindingPower::Default)
}

/// `func(...) ... { ... }`, or a bare function type when no body follows.
pub fn parse_func_lit(parser: &mut Parser) -> Result<Expr, Error> {
    let ty = parse_func_type(parser)?;

    if parser.current_token_kind() != TokenKind::OpenCurly {
        return Ok(Expr::Type(TypeExpr::Function(ty)));
    }

    let body = parser.with_expr_lev(0, parse_block)?;

    Ok(Expr::FuncLit(FuncLit {
        span: parser.span_from(ty.span.start),
        ty,
        body,
    }))
}

/// Array and struct types used as operands, e.g. `[]int{1, 2}`.
pub fn parse_type_operand(parser: &mut Parser) -> Result<Expr, Error> {
    parse_type(parser)
}

/// Short source-like rendering of an expression for diagnostics.
pub fn expr_name(expr: &Expr) -> String {
    match expr {
        Expr::Ident(Ident { name, .. }) => name.clone(),
        Expr::BasicLit(lit) => lit.literal.clone(),
        Expr::Paren(paren) => format!("({})", expr_name(&paren.x)),
        Expr::Selector(selector) => format!("{}.{}", expr_name(&selector.x), selector.sel.name),
        Expr::Index(index) => format!("{}[{}]", expr_name(&index.x), expr_name(&index.index)),
        Expr::IndexList(index) => format!("{}[...]", expr_name(&index.x)),
        Expr::Call(call) => format!("{}(...)", expr_name(&call.fun)),
        Expr::Unary(unary) => format!(
            "{}{}",
            unary.op.symbol().unwrap_or_default(),
            expr_name(&unary.x)
        ),
        Expr::Binary(binary) => format!(
            "{} {} {}",
            expr_name(&binary.x),
            binary.op.symbol().unwrap_or_default(),
            expr_name(&binary.y)
        ),
        Expr::CompositeLit(_) => String::from("composite literal"),
        Expr::FuncLit(_) => String::from("func literal"),
        Expr::KeyValue(_) => String::from("key-value pair"),
        Expr::Type(_) => String::from("type"),
    }
}

use crate::{
    ast::{
        declarations::Decl,
        expressions::Expr,
        statements::{
            AssignStmt, BlockStmt, DeclStmt, ExprStmt, ForStmt, IfStmt, IncDecStmt, ReturnStmt,
            Stmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    decl::parse_gen_decl,
    expr::{expr_name, parse_expr_list},
    parser::Parser,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token_kind = parser.current_token_kind();
    if let Some(stmt_fn) = parser.get_stmt_lookup().get(&token_kind).copied() {
        return stmt_fn(parser);
    }

    parse_simple_stmt(parser)
}

/// Expression, assignment, short variable declaration or inc/dec
/// statement.
pub fn parse_simple_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span.start;
    let mut lhs = parse_expr_list(parser)?;
    let token_kind = parser.current_token_kind();

    if token_kind == TokenKind::Define || token_kind.is_assignment() {
        let tok_pos = parser.advance().span.start;

        if token_kind == TokenKind::Define {
            if let Some(expr) = lhs.iter().find(|expr| !matches!(expr, Expr::Ident(_))) {
                return Err(Error::new(
                    ErrorImpl::NonNameOnLeftOfDefine {
                        found: expr_name(expr),
                    },
                    expr.pos(),
                ));
            }
        }

        let rhs = parse_expr_list(parser)?;

        return Ok(Stmt::Assign(AssignStmt {
            lhs,
            tok: token_kind,
            tok_pos,
            rhs,
            span: parser.span_from(start),
        }));
    }

    if lhs.len() > 1 {
        return Err(parser.error_at_current("':=' or '='"));
    }

    let Some(x) = lhs.pop() else {
        return Err(parser.error_at_current("expression"));
    };

    if matches!(token_kind, TokenKind::PlusPlus | TokenKind::MinusMinus) {
        parser.advance();
        return Ok(Stmt::IncDec(IncDecStmt {
            x,
            tok: token_kind,
            span: parser.span_from(start),
        }));
    }

    Ok(Stmt::Expr(ExprStmt {
        span: x.span(),
        x,
    }))
}

/// `{ stmts }`
pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;
    let mut list = vec![];

    loop {
        parser.skip_semicolons();
        if matches!(
            parser.current_token_kind(),
            TokenKind::CloseCurly | TokenKind::EOF
        ) {
            break;
        }

        list.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        list,
        span: parser.span_from(start),
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

pub fn parse_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let decl = parse_gen_decl(parser)?;

    Ok(Stmt::Decl(DeclStmt {
        span: decl.span,
        decl: Decl::Gen(decl),
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    if parser.current_token_kind() == TokenKind::OpenCurly {
        return Err(Error::new(
            ErrorImpl::MissingCondition {
                statement: String::from("if"),
            },
            parser.current_token().span.start,
        ));
    }

    let (init, cond) = parser.with_expr_lev(-1, |parser| {
        let mut init = None;
        let mut cond = None;

        if parser.current_token_kind() != TokenKind::Semicolon {
            cond = Some(parse_simple_stmt(parser)?);
        }

        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            init = cond.take();

            if parser.current_token_kind() != TokenKind::OpenCurly {
                cond = Some(parse_simple_stmt(parser)?);
            }
        }

        let Some(cond) = cond else {
            return Err(Error::new(
                ErrorImpl::MissingCondition {
                    statement: String::from("if"),
                },
                parser.current_token().span.start,
            ));
        };

        Ok((init.map(Box::new), stmt_to_cond(cond, "if")?))
    })?;

    let body = parse_block(parser)?;

    let else_branch = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        match parser.current_token_kind() {
            TokenKind::If => Some(Box::new(parse_if_stmt(parser)?)),
            TokenKind::OpenCurly => Some(Box::new(Stmt::Block(parse_block(parser)?))),
            _ => return Err(parser.error_at_current("if statement or block")),
        }
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        init,
        cond,
        body,
        else_branch,
        span: parser.span_from(start),
    }))
}

/// `for {}`, `for cond {}` or `for init; cond; post {}`.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let (init, cond, post) = parser.with_expr_lev(-1, |parser| {
        let mut init = None;
        let mut cond = None;
        let mut post = None;

        if parser.current_token_kind() != TokenKind::OpenCurly {
            if parser.current_token_kind() != TokenKind::Semicolon {
                cond = Some(parse_simple_stmt(parser)?);
            }

            if parser.current_token_kind() == TokenKind::Semicolon {
                parser.advance();
                init = cond.take();

                if parser.current_token_kind() != TokenKind::Semicolon {
                    cond = Some(parse_simple_stmt(parser)?);
                }
                parser.expect(TokenKind::Semicolon)?;

                if parser.current_token_kind() != TokenKind::OpenCurly {
                    post = Some(parse_simple_stmt(parser)?);
                }
            }
        }

        let cond = cond.map(|stmt| stmt_to_cond(stmt, "for")).transpose()?;

        Ok((init.map(Box::new), cond, post.map(Box::new)))
    })?;

    let body = parse_block(parser)?;

    Ok(Stmt::For(ForStmt {
        init,
        cond,
        post,
        body,
        span: parser.span_from(start),
    }))
}

/// Results are only read from the line of the `return` keyword.
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let results = if parser.on_same_line()
        && !matches!(
            parser.current_token_kind(),
            TokenKind::Semicolon | TokenKind::CloseCurly | TokenKind::EOF
        ) {
        parse_expr_list(parser)?
    } else {
        vec![]
    };

    Ok(Stmt::Return(ReturnStmt {
        results,
        span: parser.span_from(start),
    }))
}

fn stmt_to_cond(stmt: Stmt, statement: &str) -> Result<Expr, Error> {
    let pos = stmt.span().start;
    let found = match stmt {
        Stmt::Expr(stmt) => return Ok(stmt.x),
        Stmt::Assign(assign) if assign.tok == TokenKind::Define => {
            String::from("short variable declaration")
        }
        Stmt::Assign(_) => String::from("assignment"),
        Stmt::IncDec(_) => String::from("increment statement"),
        _ => String::from("statement"),
    };

    Err(Error::new(
        ErrorImpl::InvalidCondition {
            statement: statement.to_string(),
            found,
        },
        pos,
    ))
}

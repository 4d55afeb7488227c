//! Runs one mode of the front end over a source file.

use std::{fs, io::Write, time::Instant};

use anyhow::{anyhow, Context};
use tracing::{debug, info};

use crate::{
    config::{Config, Mode, OutputFormat},
    display_error,
    errors::errors::Error,
    lexer::{
        lexer::Scanner,
        tokens::{Token, TokenKind},
    },
    parser::parser::Parser,
    render::{
        json::render_json,
        listing::{render_resolution, render_tokens},
        tree::render_tree,
    },
    resolver::resolver::resolve,
};

/// Reads the configured source file and runs the selected mode, writing
/// results to stdout. Lexical and syntax errors are printed with the
/// offending source line before being returned.
pub fn run(config: &Config) -> anyhow::Result<()> {
    let source = fs::read_to_string(&config.source)
        .with_context(|| format!("failed to read {}", config.source.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    execute(config, &source, &mut out).map_err(|err| {
        if let Some(error) = err.downcast_ref::<Error>() {
            display_error(error, &source, &config.source);
        }
        err
    })
}

/// Runs the selected mode over `source`.
///
/// A front end error comes back as an [`Error`] inside the `anyhow`
/// error, so callers can downcast it for its position.
pub fn execute<W: Write>(config: &Config, source: &str, out: &mut W) -> anyhow::Result<()> {
    match config.mode {
        Mode::Lex => lex(config, source, out),
        Mode::Ast => ast(config, source, out),
        Mode::Resolve => resolve_names(config, source, out),
    }
}

fn lex<W: Write>(config: &Config, source: &str, out: &mut W) -> anyhow::Result<()> {
    let start = Instant::now();
    let (tokens, illegal) = scan(source);
    info!(tokens = tokens.len(), elapsed = ?start.elapsed(), "scanned");

    match config.format {
        OutputFormat::Tree => out.write_all(render_tokens(&tokens).as_bytes())?,
        OutputFormat::Json => writeln!(out, "{}", render_json(&tokens)?)?,
    }

    match illegal {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn ast<W: Write>(config: &Config, source: &str, out: &mut W) -> anyhow::Result<()> {
    let start = Instant::now();
    let decls = Parser::from_source(source).parse()?;
    info!(declarations = decls.len(), elapsed = ?start.elapsed(), "parsed");

    match config.format {
        OutputFormat::Tree => out.write_all(render_tree(&decls).as_bytes())?,
        OutputFormat::Json => {
            for decl in &decls {
                writeln!(out, "{}", render_json(decl)?)?;
            }
        }
    }

    Ok(())
}

fn resolve_names<W: Write>(config: &Config, source: &str, out: &mut W) -> anyhow::Result<()> {
    let decls = Parser::from_source(source).parse()?;

    let start = Instant::now();
    let mut errors = vec![];
    let outcome = resolve(&decls, |pos, message| errors.push((pos, message)));
    info!(
        objects = outcome.objects.len(),
        scopes = outcome.scopes.len(),
        elapsed = ?start.elapsed(),
        "resolved"
    );

    for (pos, message) in &errors {
        writeln!(out, "{}:{}: {}", config.source.display(), pos, message)?;
    }

    match config.format {
        OutputFormat::Tree => out.write_all(render_resolution(&outcome)?.as_bytes())?,
        OutputFormat::Json => writeln!(out, "{}", render_json(&outcome.unresolved)?)?,
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("{} declaration error(s)", errors.len()))
    }
}

/// Tokens up to EOF, or up to and including the first ILLEGAL token
/// together with its error.
fn scan(source: &str) -> (Vec<Token>, Option<Error>) {
    let mut scanner = Scanner::new(source);
    let mut tokens = vec![];

    loop {
        let token = scanner.next_token();

        match token.kind {
            TokenKind::EOF => return (tokens, None),
            TokenKind::Illegal => {
                let error = token.error().map(|error| Error::new(error.clone(), token.pos()));
                debug!(pos = %token.pos(), "stopped at illegal token");
                tokens.push(token);
                return (tokens, error);
            }
            _ => tokens.push(token),
        }
    }
}

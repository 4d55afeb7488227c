use std::fmt::Write;

use crate::{lexer::tokens::Token, resolver::resolver::ResolverOutcome};

/// One `line:col\tKIND\tvalue\tliteral` line per token.
pub fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();

    for token in tokens {
        out.push_str(&token.to_string());
        out.push('\n');
    }

    out
}

/// Global scope contents followed by every identifier left unresolved.
pub fn render_resolution(outcome: &ResolverOutcome<'_>) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let global = outcome.global_scope();

    writeln!(out, "global scope ({} names)", global.len())?;
    for name in global.names() {
        if let Some(id) = global.lookup(name) {
            let object = outcome.object(id);
            writeln!(out, "\t{} {} declared at {}", object.kind, name, object.pos)?;
        }
    }

    writeln!(out, "unresolved ({} identifiers)", outcome.unresolved.len())?;
    for ident in &outcome.unresolved {
        writeln!(out, "\t{} at {}", ident.name, ident.pos())?;
    }

    Ok(out)
}

//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The decoded TokenValue
/// * `$literal` - The source spelling
/// * `$start`, `$end` - The source positions
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Int, TokenValue::Int(42), "42", start, end);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $literal:expr, $start:expr, $end:expr) => {
        Token {
            kind: $kind,
            value: $value,
            literal: String::from($literal),
            span: $crate::Span {
                start: $start,
                end: $end,
            },
        }
    };
}

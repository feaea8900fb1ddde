//! CSS syntax parser using the `cssparser` crate.
//!
//! The tokenizer is only used to find item boundaries. Preludes, property
//! names and values are kept as the raw source slices between those
//! boundaries, so whatever the input says survives a round trip unchanged.

use cssparser::{ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, Token};
use vendorize_core::{Error, NodeSpec, Result};

use crate::targets;

type ItemResult<'i, T> = std::result::Result<T, CssParseError<'i, String>>;

/// Parse CSS text into node descriptions.
///
/// Every level accepts rules, at-rules and declarations, so the same entry
/// point serves whole stylesheets and the contents of a single block. An item
/// ends at `;`, at a `{...}` block or at the end of input.
///
/// # Errors
///
/// Parsing stops at the first malformed item (a declaration without `:`, or a
/// stray `}`) and reports it with its 1-indexed line and column.
///
/// # Example
///
/// ```ignore
/// let specs = parse_css("a { color: red } @import url(x.css);")?;
/// assert_eq!(specs.len(), 2);
/// ```
pub fn parse_css(css: &str) -> Result<Vec<NodeSpec>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    let specs = parse_items(&mut parser).map_err(to_error)?;
    tracing::trace!(target: targets::PARSER, items = specs.len(), "parsed css");
    Ok(specs)
}

fn parse_items<'i>(parser: &mut Parser<'i, '_>) -> ItemResult<'i, Vec<NodeSpec>> {
    let mut specs = vec![];

    loop {
        // Skip whitespace and comments
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        if let Some(spec) = parse_item(parser)? {
            specs.push(spec);
        }
    }

    Ok(specs)
}

/// Parse one item. Returns `None` for an empty statement (a lone `;`).
fn parse_item<'i>(parser: &mut Parser<'i, '_>) -> ItemResult<'i, Option<NodeSpec>> {
    let location = parser.current_source_location();
    let start = parser.position();
    let mut at_keyword = None;
    let mut first = true;

    // End of the last significant token; the terminator is never included.
    let mut end = start;
    let has_block = loop {
        let token = match parser.next() {
            Ok(t) => t.clone(),
            Err(_) => break false,
        };

        match token {
            Token::Semicolon => break false,
            Token::CurlyBracketBlock => break true,
            Token::CloseCurlyBracket => {
                return Err(parser.new_custom_error("unexpected '}'".to_string()));
            }
            Token::AtKeyword(name) if first => {
                at_keyword = Some((name.to_string(), parser.position()));
            }
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                // Consume the arguments so `end` lands after the closing bracket.
                parser.parse_nested_block(|block_parser| skip_block(block_parser))?;
            }
            _ => {}
        }
        first = false;
        end = parser.position();
    };

    let body = if has_block {
        Some(parser.parse_nested_block(|block_parser| parse_items(block_parser))?)
    } else {
        None
    };

    if let Some((name, prelude_start)) = at_keyword {
        let prelude = parser.slice(prelude_start..end).trim();
        return Ok(Some(NodeSpec::at_rule(name, prelude, body)));
    }

    let text = parser.slice(start..end).trim();
    match body {
        Some(children) => Ok(Some(NodeSpec::rule(text, children))),
        None if text.is_empty() => Ok(None),
        None => match text.split_once(':') {
            Some((name, value)) => Ok(Some(NodeSpec::declaration(name.trim(), value.trim()))),
            None => Err(CssParseError {
                kind: ParseErrorKind::Custom(format!("expected ':' in declaration '{text}'")),
                location,
            }),
        },
    }
}

fn skip_block<'i>(parser: &mut Parser<'i, '_>) -> ItemResult<'i, ()> {
    while parser.next().is_ok() {}
    Ok(())
}

fn to_error(e: CssParseError<'_, String>) -> Error {
    let message = match e.kind {
        ParseErrorKind::Custom(message) => message,
        ParseErrorKind::Basic(kind) => format!("{kind:?}"),
    };
    // cssparser lines are 0-indexed, columns 1-indexed.
    Error::parse(message, e.location.line + 1, e.location.column)
}

//! Stylesheet tokenization.
//!
//! `cssparser` does the lexing. This module groups its output into top-level
//! rules and, inside `@font-face`, into [`Token`]s that keep their exact
//! source text, so whatever the rewriter leaves alone is written back byte
//! for byte.

use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, SourcePosition, Token as CssToken};

use crate::error::{Error, Result};

type SyntaxResult<'i, T> = std::result::Result<T, ParseError<'i, String>>;

/// A top-level construct of a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    FontFace(FontFace),
    /// Any other rule, or whitespace and comments between rules.
    Opaque(String),
}

/// An `@font-face` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    /// Source text from the `@` up to the opening brace.
    pub head: String,
    /// Contents of the block, without the braces.
    pub tokens: Vec<Token>,
}

/// A component of an `@font-face` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Whitespace(String),
    /// Unquoted `url(...)` token.
    Url { value: String, raw: String },
    /// Function call such as `url("a.woff2")` or `format("woff2")`.
    ///
    /// `arguments` holds the values of the strings, identifiers and urls
    /// passed to it, other arguments as source text.
    Function { name: String, arguments: Vec<String>, raw: String },
    /// Anything else: punctuation, identifiers, comments, nested blocks.
    Literal(String),
}

impl Token {
    /// Source text of the token.
    pub fn as_css(&self) -> &str {
        match self {
            Token::Whitespace(text) | Token::Literal(text) => text,
            Token::Url { raw, .. } | Token::Function { raw, .. } => raw,
        }
    }

    /// Whether this is a function call named `name`, ignoring ASCII case.
    pub fn is_function(&self, name: &str) -> bool {
        matches!(self, Token::Function { name: n, .. } if n.eq_ignore_ascii_case(name))
    }
}

/// Split a stylesheet into top-level rules.
///
/// Unterminated rules and blocks, stray closing brackets at the top level,
/// bad strings and bad urls are reported as [`Error::Parse`].
pub fn parse_stylesheet(css: &str) -> Result<Vec<Rule>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_rules(&mut parser).map_err(syntax_error)
}

fn syntax_error(error: ParseError<'_, String>) -> Error {
    let message = match error.kind {
        ParseErrorKind::Custom(message) => message,
        ParseErrorKind::Basic(kind) => format!("{kind:?}"),
    };
    Error::Parse { line: error.location.line + 1, column: error.location.column, message }
}

fn parse_rules<'i>(parser: &mut Parser<'i, '_>) -> SyntaxResult<'i, Vec<Rule>> {
    let mut rules = Vec::new();
    loop {
        let start = parser.position();
        let Ok(token) = parser.next_including_whitespace_and_comments().cloned() else {
            return Ok(rules);
        };
        let rule = match token {
            CssToken::WhiteSpace(_) | CssToken::Comment(_) | CssToken::CDO | CssToken::CDC => {
                Rule::Opaque(parser.slice_from(start).to_string())
            }
            CssToken::AtKeyword(ref name) if name.eq_ignore_ascii_case("font-face") => {
                parse_font_face(parser, start)?
            }
            CssToken::AtKeyword(_) => {
                skip_at_rule(parser)?;
                Rule::Opaque(parser.slice_from(start).to_string())
            }
            CssToken::CloseCurlyBracket
            | CssToken::CloseParenthesis
            | CssToken::CloseSquareBracket => {
                let message = format!("unexpected '{}'", parser.slice_from(start));
                return Err(parser.new_custom_error(message));
            }
            token => {
                skip_qualified_rule(parser, start, token)?;
                Rule::Opaque(parser.slice_from(start).to_string())
            }
        };
        rules.push(rule);
    }
}

fn parse_font_face<'i>(parser: &mut Parser<'i, '_>, start: SourcePosition) -> SyntaxResult<'i, Rule> {
    loop {
        let token_start = parser.position();
        let Ok(token) = parser.next_including_whitespace_and_comments().cloned() else {
            return Err(parser.new_custom_error("unterminated @font-face rule".to_string()));
        };
        match token {
            CssToken::CurlyBracketBlock => {
                let head = parser.slice(start..token_start).to_string();
                let tokens = parse_block(parser, '}', parse_block_tokens)?;
                return Ok(Rule::FontFace(FontFace { head, tokens }));
            }
            CssToken::Semicolon => return Ok(Rule::Opaque(parser.slice_from(start).to_string())),
            token => consume_component(parser, token_start, &token)?,
        }
    }
}

fn parse_block_tokens<'i>(block: &mut Parser<'i, '_>) -> SyntaxResult<'i, Vec<Token>> {
    let mut tokens = Vec::new();
    loop {
        let start = block.position();
        let Ok(token) = block.next_including_whitespace_and_comments().cloned() else {
            return Ok(tokens);
        };
        let token = match token {
            CssToken::WhiteSpace(text) => Token::Whitespace(text.to_string()),
            CssToken::UnquotedUrl(value) => Token::Url {
                value: value.to_string(),
                raw: block.slice_from(start).to_string(),
            },
            CssToken::Function(name) => {
                let arguments = parse_block(block, ')', parse_arguments)?;
                Token::Function {
                    name: name.to_string(),
                    arguments,
                    raw: block.slice_from(start).to_string(),
                }
            }
            token => {
                consume_component(block, start, &token)?;
                Token::Literal(block.slice_from(start).to_string())
            }
        };
        tokens.push(token);
    }
}

fn parse_arguments<'i>(args: &mut Parser<'i, '_>) -> SyntaxResult<'i, Vec<String>> {
    let mut values = Vec::new();
    loop {
        let start = args.position();
        let Ok(token) = args.next_including_whitespace_and_comments().cloned() else {
            return Ok(values);
        };
        match token {
            CssToken::WhiteSpace(_) | CssToken::Comment(_) | CssToken::Comma => {}
            CssToken::QuotedString(value) | CssToken::Ident(value) | CssToken::UnquotedUrl(value) => {
                values.push(value.to_string())
            }
            token => {
                consume_component(args, start, &token)?;
                values.push(args.slice_from(start).to_string());
            }
        }
    }
}

fn skip_at_rule<'i>(parser: &mut Parser<'i, '_>) -> SyntaxResult<'i, ()> {
    loop {
        let start = parser.position();
        let Ok(token) = parser.next_including_whitespace_and_comments().cloned() else {
            return Err(parser.new_custom_error("unterminated at-rule".to_string()));
        };
        match token {
            CssToken::Semicolon => return Ok(()),
            CssToken::CurlyBracketBlock => return consume_block(parser, '}'),
            token => consume_component(parser, start, &token)?,
        }
    }
}

fn skip_qualified_rule<'i>(
    parser: &mut Parser<'i, '_>,
    mut start: SourcePosition,
    mut token: CssToken<'i>,
) -> SyntaxResult<'i, ()> {
    loop {
        if let CssToken::CurlyBracketBlock = token {
            return consume_block(parser, '}');
        }
        consume_component(parser, start, &token)?;

        start = parser.position();
        token = match parser.next_including_whitespace_and_comments().cloned() {
            Ok(token) => token,
            Err(_) => return Err(parser.new_custom_error("unterminated rule".to_string())),
        };
    }
}

/// Consume the rest of `token` if it opens a block, rejecting bad tokens.
fn consume_component<'i>(
    parser: &mut Parser<'i, '_>,
    start: SourcePosition,
    token: &CssToken<'i>,
) -> SyntaxResult<'i, ()> {
    match token {
        CssToken::Function(_) | CssToken::ParenthesisBlock => consume_block(parser, ')'),
        CssToken::SquareBracketBlock => consume_block(parser, ']'),
        CssToken::CurlyBracketBlock => consume_block(parser, '}'),
        CssToken::BadUrl(_) => {
            let message = format!("bad url: {}", parser.slice_from(start));
            Err(parser.new_custom_error(message))
        }
        CssToken::BadString(_) => Err(parser.new_custom_error("unterminated string".to_string())),
        _ => Ok(()),
    }
}

fn consume_block<'i>(parser: &mut Parser<'i, '_>, closing: char) -> SyntaxResult<'i, ()> {
    parse_block(parser, closing, |block| loop {
        let token_start = block.position();
        let Ok(token) = block.next_including_whitespace_and_comments().cloned() else {
            return Ok(());
        };
        consume_component(block, token_start, &token)?;
    })
}

/// Parse the contents of the block just opened, then require its closing
/// bracket.
///
/// The bracket was consumed iff the parser moved past the end of the
/// contents.
fn parse_block<'i, T>(
    parser: &mut Parser<'i, '_>,
    closing: char,
    parse: impl for<'tt> FnOnce(&mut Parser<'i, 'tt>) -> SyntaxResult<'i, T>,
) -> SyntaxResult<'i, T> {
    let contents_start = parser.position();
    let (value, contents_end) = parser.parse_nested_block(|block| -> SyntaxResult<'i, (T, SourcePosition)> {
        let value = parse(block)?;
        Ok((value, block.position()))
    })?;
    let contents = parser.slice(contents_start..contents_end).len();
    if parser.slice_from(contents_start).len() > contents {
        Ok(value)
    } else {
        Err(parser.new_custom_error(format!("unterminated block, expected '{closing}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "/* latin */\n\
        @font-face {\n  font-family: 'Inter';\n  font-style: normal;\n  \
        src: url(https://fonts.gstatic.com/s/inter/v12/a.woff2) format('woff2');\n  \
        unicode-range: U+0000-00FF, U+0131;\n}\n\
        @import url(\"other.css\") screen;\n\
        body { font-family: Inter, sans-serif; }\n\
        @media (min-width: 10px) { a { color: red } }\n";

    fn font_faces(rules: &[Rule]) -> Vec<&FontFace> {
        rules
            .iter()
            .filter_map(|rule| match rule {
                Rule::FontFace(font_face) => Some(font_face),
                Rule::Opaque(_) => None,
            })
            .collect()
    }

    fn serialize(rules: &[Rule]) -> String {
        let mut css = String::new();
        for rule in rules {
            match rule {
                Rule::Opaque(text) => css.push_str(text),
                Rule::FontFace(font_face) => {
                    css.push_str(&font_face.head);
                    css.push('{');
                    font_face.tokens.iter().for_each(|token| css.push_str(token.as_css()));
                    css.push('}');
                }
            }
        }
        css
    }

    #[test]
    fn test_round_trip_is_exact() {
        let rules = parse_stylesheet(SHEET).unwrap();
        assert_eq!(serialize(&rules), SHEET);
        assert_eq!(font_faces(&rules).len(), 1);
    }

    #[test]
    fn test_font_face_tokens() {
        let rules = parse_stylesheet(SHEET).unwrap();
        let font_face = font_faces(&rules)[0];
        assert_eq!(font_face.head, "@font-face ");

        let url = font_face.tokens.iter().find(|t| matches!(t, Token::Url { .. })).unwrap();
        assert_eq!(
            url,
            &Token::Url {
                value: "https://fonts.gstatic.com/s/inter/v12/a.woff2".to_string(),
                raw: "url(https://fonts.gstatic.com/s/inter/v12/a.woff2)".to_string(),
            }
        );

        let format = font_face.tokens.iter().find(|t| t.is_function("format")).unwrap();
        assert_eq!(
            format,
            &Token::Function {
                name: "format".to_string(),
                arguments: vec!["woff2".to_string()],
                raw: "format('woff2')".to_string(),
            }
        );
    }

    #[test]
    fn test_quoted_url_is_a_function() {
        let rules = parse_stylesheet("@font-face{src:url( \"a.woff2\" ) format(\"woff2\")}").unwrap();
        let font_face = font_faces(&rules)[0];
        assert!(font_face.tokens[2].is_function("url"));
        assert_eq!(
            font_face.tokens[2],
            Token::Function {
                name: "url".to_string(),
                arguments: vec!["a.woff2".to_string()],
                raw: "url( \"a.woff2\" )".to_string(),
            }
        );
        assert_eq!(font_face.tokens[3], Token::Whitespace(" ".to_string()));
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let rules = parse_stylesheet("@FONT-FACE { src: url(a.woff) }").unwrap();
        assert_eq!(font_faces(&rules)[0].head, "@FONT-FACE ");
    }

    #[test]
    fn test_font_face_without_block_is_opaque() {
        let rules = parse_stylesheet("@font-face;").unwrap();
        assert_eq!(rules, vec![Rule::Opaque("@font-face;".to_string())]);
    }

    #[test]
    fn test_unterminated_rule() {
        for css in ["a { color: red", "@font-face { src: url(a.woff)", "a", "@import url(x.css)"] {
            let err = parse_stylesheet(css).unwrap_err();
            assert!(matches!(err, Error::Parse { .. }), "{css}: {err}");
        }
    }

    #[test]
    fn test_closing_bracket_inside_token_at_end_of_input() {
        for css in [
            "a { /* } */",
            "a { /* }",
            "@font-face { src: \"a.woff}",
            "@font-face { font-family: \\}",
            "@font-face { src: url(\"a.woff\")",
            "a { b: [c]",
            "a { b: f(x)",
        ] {
            let err = parse_stylesheet(css).unwrap_err();
            assert!(matches!(err, Error::Parse { .. }), "{css}: {err}");
        }
    }

    #[test]
    fn test_closed_blocks_at_end_of_input() {
        for css in ["a { /* } */ }", "a{}", "@font-face { src: url(\"a.woff\") }", "a { b: f([x]) }"] {
            assert!(parse_stylesheet(css).is_ok(), "{css}");
        }
    }

    #[test]
    fn test_stray_closing_bracket() {
        let err = parse_stylesheet("a {}\n}").unwrap_err();
        match err {
            Error::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert_eq!(message, "unexpected '}'");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_bad_url() {
        let err = parse_stylesheet("@font-face { src: url(a b.woff) }").unwrap_err();
        assert!(matches!(err, Error::Parse { ref message, .. } if message.starts_with("bad url")));
    }
}

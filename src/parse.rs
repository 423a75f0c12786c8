use crate::config::Config;
use crate::error::{Error, Result};
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while1},
    character::complete::{char as nomchar, one_of},
    combinator::recognize,
    error::ParseError,
    multi::many0,
    sequence::{pair, preceded},
};
use std::fmt;

pub type IResult<I, O, E = nom::error::Error<I>> = Result<(I, O), nom::Err<E>>;

type In<'a> = &'a str;

/// 1-based line and column of a token in its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub position: Position,
}

//////////////////////////////////////

pub fn comment<'a, E: ParseError<In<'a>>>(s: In<'a>) -> IResult<In<'a>, In<'a>, E> {
    recognize(pair(nomchar(';'), take_till(|c: char| c == '\n')))(s)
}

/// Whitespace and comments.
pub fn gap<'a, E: ParseError<In<'a>>>(s: In<'a>) -> IResult<In<'a>, In<'a>, E> {
    recognize(many0(alt((take_while1(char::is_whitespace), comment))))(s)
}

pub fn wsl<'a, F, O, E>(inner: F) -> impl FnMut(In<'a>) -> IResult<In<'a>, O, E>
where
    E: ParseError<In<'a>>,
    F: FnMut(In<'a>) -> IResult<In<'a>, O, E> + 'a,
{
    preceded(gap, inner)
}

pub fn paren(s: In) -> IResult<In, In> {
    recognize(one_of("()"))(s)
}

pub fn ident(s: In) -> IResult<In, In> {
    take_while1(|c: char| !c.is_whitespace() && !"();".contains(c))(s)
}

pub fn lexeme(s: In) -> IResult<In, In> {
    wsl(alt((paren, ident)))(s)
}

/// Splits `source` into parenthesis and identifier tokens.
pub fn tokenize(source: &str, config: &Config) -> Result<Vec<Token>> {
    let mut tokens = vec![];
    let mut rest = source;
    let mut cursor = LineCursor::default();
    loop {
        let (after_gap, _) = gap::<nom::error::Error<&str>>(rest)
            .map_err(|_| syntax_error(source, rest, &mut cursor))?;
        if after_gap.is_empty() {
            return Ok(tokens);
        }
        let (after, text) = lexeme(rest).map_err(|_| syntax_error(source, after_gap, &mut cursor))?;
        let offset = source.len() - after.len() - text.len();
        let position = cursor.advance_to(source, offset);
        let text = if config.fold_case {
            text.to_lowercase()
        } else {
            text.to_owned()
        };
        tokens.push(Token { text, position });
        rest = after;
    }
}

fn syntax_error(source: &str, rest: &str, cursor: &mut LineCursor) -> Error {
    Error::Syntax {
        expected: "token".to_owned(),
        found: rest.chars().next().map(String::from),
        position: cursor.advance_to(source, source.len() - rest.len()),
    }
}

/// Tracks line/column incrementally so each byte is scanned once.
#[derive(Default)]
struct LineCursor {
    offset: usize,
    pos: Position,
}

impl LineCursor {
    fn advance_to(&mut self, source: &str, offset: usize) -> Position {
        for c in source[self.offset..offset].chars() {
            if c == '\n' {
                self.pos.line += 1;
                self.pos.column = 1;
            } else {
                self.pos.column += 1;
            }
        }
        self.offset = offset;
        self.pos
    }
}

//////////////////////////////////////

/// Cursor over lexed tokens. Iterating consumes tokens one by one.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
    end: Position,
}

impl TokenStream {
    pub fn new(source: &str, config: &Config) -> Result<Self> {
        let tokens = tokenize(source, config)?;
        let end = LineCursor::default().advance_to(source, source.len());
        Ok(Self { tokens, cursor: 0, end })
    }

    /// The current token, without consuming it.
    pub fn get_token(&self) -> Option<&str> {
        self.peek().map(|t| t.text.as_str())
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// Position of the current token, or of the end of input.
    pub fn current_position(&self) -> Position {
        self.peek().map_or(self.end, |t| t.position)
    }

    pub fn is_empty(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Consumes the current token if it is `expected`.
    pub fn expect(&mut self, expected: &str) -> Result<()> {
        match self.get_token() {
            Some(tok) if tok == expected => {
                self.cursor += 1;
                Ok(())
            }
            found => Err(Error::Syntax {
                expected: expected.to_owned(),
                found: found.map(str::to_owned),
                position: self.current_position(),
            }),
        }
    }
}

impl Iterator for TokenStream {
    type Item = Token;
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        tokenize(source, &Config::default()).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn parens_split_identifiers() {
        assert_eq!(texts("(on a table)"), ["(", "on", "a", "table", ")"]);
        assert_eq!(texts("  ( at ?x  loc-1 )  "), ["(", "at", "?x", "loc-1", ")"]);
        assert!(texts(" \n\t ").is_empty());
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(texts("; header\n(on a ; trailing\n b)"), ["(", "on", "a", "b", ")"]);
        assert_eq!(texts("a;b"), ["a"]);
    }

    #[test]
    fn any_unicode_whitespace_separates() {
        assert_eq!(texts("(clear\x0ca)"), ["(", "clear", "a", ")"]);
        assert_eq!(texts("a\u{a0}b\u{2003}c"), ["a", "b", "c"]);
    }

    #[test]
    fn case_folding_is_configurable() {
        assert_eq!(texts("(On A)"), ["(", "on", "a", ")"]);
        let keep = Config { fold_case: false, ..Config::default() };
        let tokens = tokenize("(On A)", &keep).unwrap();
        assert_eq!(tokens[1].text, "On");
    }

    #[test]
    fn positions_are_line_and_column() {
        let tokens = tokenize("(on\n  a b)", &Config::default()).unwrap();
        let positions: Vec<_> = tokens.iter().map(|t| (t.position.line, t.position.column)).collect();
        assert_eq!(positions, [(1, 1), (1, 2), (2, 3), (2, 5), (2, 6)]);
    }

    #[test]
    fn expect_reports_what_was_found() {
        let mut ts = TokenStream::new("a )", &Config::default()).unwrap();
        assert_eq!(
            ts.expect(")"),
            Err(Error::Syntax {
                expected: ")".into(),
                found: Some("a".into()),
                position: Position { line: 1, column: 1 },
            })
        );
        assert_eq!(ts.current_position(), Position { line: 1, column: 1 });
        assert_eq!(ts.next().map(|t| t.text), Some("a".into()));
        assert!(ts.expect(")").is_ok());
        assert!(ts.is_empty());
        assert_eq!(
            ts.expect(")"),
            Err(Error::Syntax {
                expected: ")".into(),
                found: None,
                position: Position { line: 1, column: 4 },
            })
        );
    }
}

//! Context-sensitive tokenizer.
//!
//! ES|QL lexes differently depending on where the parser is: index patterns
//! after `FROM` accept characters such as `-`, `*` and `<` that are operators
//! elsewhere, and name patterns after `KEEP`/`DROP` may contain `*`. The parser
//! therefore asks for the next token in a given [`Mode`] and the lexer is a
//! pure function of `(position, mode)`.

use crate::SyntaxError;

/// A location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset into the source.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 0-based character column within the line.
    pub column: usize,
}

impl Position {
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 0,
    };

    #[must_use]
    fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self {
                offset: self.offset + ch.len_utf8(),
                line: self.line + 1,
                column: 0,
            }
        } else {
            Self {
                offset: self.offset + ch.len_utf8(),
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

/// Lexing context requested by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Commands, expressions and qualified names.
    Expression,
    /// Index patterns and enrich policy names.
    Source,
    /// Field name patterns that may contain `*`.
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    QuotedIdent,
    Source,
    NamePattern,
    Str,
    Integer,
    Decimal,
    Param,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    CaseInsensitiveEq,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Cast,
    Colon,
    Pipe,
    Comma,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Eof,
}

impl TokenKind {
    /// Name used in `expecting {...}` diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ident => "UNQUOTED_IDENTIFIER",
            Self::QuotedIdent => "QUOTED_IDENTIFIER",
            Self::Source => "UNQUOTED_SOURCE",
            Self::NamePattern => "ID_PATTERN",
            Self::Str => "QUOTED_STRING",
            Self::Integer => "INTEGER_LITERAL",
            Self::Decimal => "DECIMAL_LITERAL",
            Self::Param => "'?'",
            Self::Eq => "'=='",
            Self::Neq => "'!='",
            Self::Lt => "'<'",
            Self::Lte => "'<='",
            Self::Gt => "'>'",
            Self::Gte => "'>='",
            Self::CaseInsensitiveEq => "'=~'",
            Self::Assign => "'='",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::Cast => "'::'",
            Self::Colon => "':'",
            Self::Pipe => "'|'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Eof => "<EOF>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: Position,
    pub end: Position,
}

impl Token<'_> {
    /// Text shown for this token in diagnostics.
    pub fn display(&self) -> &str {
        if self.kind == TokenKind::Eof {
            "<EOF>"
        } else {
            self.text
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_pattern_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || matches!(ch, '_' | '@' | '*')
}

fn is_pattern_char(ch: char) -> bool {
    is_ident_char(ch) || ch == '*'
}

/// Characters allowed in an unquoted index pattern. `/` is allowed unless it
/// opens a comment.
fn is_source_char(ch: char, next: Option<char>) -> bool {
    if ch.is_whitespace() || matches!(ch, ':' | '"' | '=' | '|' | ',' | '[' | ']') {
        return false;
    }
    !(ch == '/' && matches!(next, Some('*' | '/')))
}

#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    src: &'a str,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self { src }
    }

    fn char_at(&self, pos: Position) -> Option<char> {
        self.src[pos.offset..].chars().next()
    }

    fn nth_char(&self, pos: Position, n: usize) -> Option<char> {
        self.src[pos.offset..].chars().nth(n)
    }

    fn advance_while(&self, mut pos: Position, pred: impl Fn(char) -> bool) -> Position {
        while let Some(ch) = self.char_at(pos) {
            if !pred(ch) {
                break;
            }
            pos = pos.advance(ch);
        }
        pos
    }

    fn token(&self, kind: TokenKind, start: Position, end: Position) -> Token<'a> {
        Token {
            kind,
            text: &self.src[start.offset..end.offset],
            start,
            end,
        }
    }

    fn recognition_error(&self, start: Position, end: Position) -> SyntaxError {
        SyntaxError::at(
            start,
            format!(
                "token recognition error at: '{}'",
                &self.src[start.offset..end.offset]
            ),
        )
    }

    /// Skip whitespace, `//` line comments and `/* */` block comments.
    fn skip_trivia(&self, mut pos: Position) -> Result<Position, SyntaxError> {
        loop {
            match (self.char_at(pos), self.nth_char(pos, 1)) {
                (Some(ch), _) if ch.is_whitespace() => pos = pos.advance(ch),
                (Some('/'), Some('/')) => pos = self.advance_while(pos, |ch| ch != '\n'),
                (Some('/'), Some('*')) => {
                    let start = pos;
                    pos = pos.advance('/').advance('*');
                    loop {
                        match (self.char_at(pos), self.nth_char(pos, 1)) {
                            (Some('*'), Some('/')) => {
                                pos = pos.advance('*').advance('/');
                                break;
                            }
                            (Some(ch), _) => pos = pos.advance(ch),
                            (None, _) => return Err(self.recognition_error(start, pos)),
                        }
                    }
                }
                _ => return Ok(pos),
            }
        }
    }

    /// Lex the token starting at or after `at` in the given mode.
    pub fn lex(&self, at: Position, mode: Mode) -> Result<Token<'a>, SyntaxError> {
        let start = self.skip_trivia(at)?;
        let Some(ch) = self.char_at(start) else {
            return Ok(self.token(TokenKind::Eof, start, start));
        };

        match mode {
            Mode::Source if is_source_char(ch, self.nth_char(start, 1)) => {
                let mut end = start;
                while let Some(c) = self.char_at(end) {
                    if !is_source_char(c, self.nth_char(end, 1)) {
                        break;
                    }
                    end = end.advance(c);
                }
                return Ok(self.token(TokenKind::Source, start, end));
            }
            Mode::Pattern if is_pattern_start(ch) => {
                let end = self.advance_while(start.advance(ch), is_pattern_char);
                return Ok(self.token(TokenKind::NamePattern, start, end));
            }
            _ => {}
        }

        match ch {
            c if c.is_ascii_alphabetic() => {
                let end = self.advance_while(start, is_ident_char);
                Ok(self.token(TokenKind::Ident, start, end))
            }
            '_' | '@' => {
                let end = self.advance_while(start.advance(ch), is_ident_char);
                if end.offset == start.offset + 1 {
                    return Err(self.recognition_error(start, end));
                }
                Ok(self.token(TokenKind::Ident, start, end))
            }
            c if c.is_ascii_digit() => Ok(self.number(start)),
            '.' if self.nth_char(start, 1).is_some_and(|c| c.is_ascii_digit()) => {
                Ok(self.number(start))
            }
            '"' => self.string(start),
            '`' => self.quoted_identifier(start),
            '?' => {
                let mut end = start.advance('?');
                if self.char_at(end) == Some('?') {
                    end = end.advance('?');
                }
                let end = self.advance_while(end, is_ident_char);
                Ok(self.token(TokenKind::Param, start, end))
            }
            _ => self.operator(start, ch),
        }
    }

    fn number(&self, start: Position) -> Token<'a> {
        let digits = |c: char| c.is_ascii_digit();
        let mut end = self.advance_while(start, digits);
        let mut kind = TokenKind::Integer;

        if self.char_at(end) == Some('.') {
            end = self.advance_while(end.advance('.'), digits);
            kind = TokenKind::Decimal;
        }

        if let Some(e @ ('e' | 'E')) = self.char_at(end) {
            let after = self.nth_char(end, 1);
            let signed = matches!(after, Some('+' | '-'));
            let first_digit = if signed { self.nth_char(end, 2) } else { after };
            if first_digit.is_some_and(|c| c.is_ascii_digit()) {
                end = end.advance(e);
                if let Some(sign @ ('+' | '-')) = after {
                    end = end.advance(sign);
                }
                end = self.advance_while(end, digits);
                kind = TokenKind::Decimal;
            }
        }

        self.token(kind, start, end)
    }

    fn string(&self, start: Position) -> Result<Token<'a>, SyntaxError> {
        if self.src[start.offset..].starts_with("\"\"\"") {
            let body = start.advance('"').advance('"').advance('"');
            return match self.src[body.offset..].find("\"\"\"") {
                Some(len) => {
                    let mut end = body;
                    for ch in self.src[body.offset..body.offset + len].chars() {
                        end = end.advance(ch);
                    }
                    let end = end.advance('"').advance('"').advance('"');
                    Ok(self.token(TokenKind::Str, start, end))
                }
                None => {
                    let end = self.advance_while(start, |_| true);
                    Err(self.recognition_error(start, end))
                }
            };
        }

        let mut end = start.advance('"');
        loop {
            match self.char_at(end) {
                Some('"') => return Ok(self.token(TokenKind::Str, start, end.advance('"'))),
                Some('\\') => {
                    end = end.advance('\\');
                    match self.char_at(end) {
                        Some(escaped) if escaped != '\n' && escaped != '\r' => {
                            end = end.advance(escaped);
                        }
                        _ => return Err(self.recognition_error(start, end)),
                    }
                }
                Some(ch) if ch != '\n' && ch != '\r' => end = end.advance(ch),
                _ => return Err(self.recognition_error(start, end)),
            }
        }
    }

    fn quoted_identifier(&self, start: Position) -> Result<Token<'a>, SyntaxError> {
        let mut end = start.advance('`');
        loop {
            match (self.char_at(end), self.nth_char(end, 1)) {
                (Some('`'), Some('`')) => end = end.advance('`').advance('`'),
                (Some('`'), _) => {
                    return Ok(self.token(TokenKind::QuotedIdent, start, end.advance('`')));
                }
                (Some(ch), _) => end = end.advance(ch),
                (None, _) => return Err(self.recognition_error(start, end)),
            }
        }
    }

    fn operator(&self, start: Position, ch: char) -> Result<Token<'a>, SyntaxError> {
        let two = match (ch, self.nth_char(start, 1)) {
            ('=', Some('=')) => Some((TokenKind::Eq, '=')),
            ('!', Some('=')) => Some((TokenKind::Neq, '=')),
            ('<', Some('=')) => Some((TokenKind::Lte, '=')),
            ('>', Some('=')) => Some((TokenKind::Gte, '=')),
            ('=', Some('~')) => Some((TokenKind::CaseInsensitiveEq, '~')),
            (':', Some(':')) => Some((TokenKind::Cast, ':')),
            _ => None,
        };
        if let Some((kind, second)) = two {
            return Ok(self.token(kind, start, start.advance(ch).advance(second)));
        }

        let kind = match ch {
            '=' => TokenKind::Assign,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            ':' => TokenKind::Colon,
            '|' => TokenKind::Pipe,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            _ => return Err(self.recognition_error(start, start.advance(ch))),
        };
        Ok(self.token(kind, start, start.advance(ch)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn kinds(src: &str, mode: Mode) -> Vec<TokenKind> {
        let lexer = Lexer::new(src);
        let mut pos = Position::START;
        let mut out = Vec::new();
        loop {
            let tok = lexer.lex(pos, mode).unwrap();
            out.push(tok.kind);
            if tok.kind == TokenKind::Eof {
                return out;
            }
            pos = tok.end;
        }
    }

    #[test]
    fn test_expression_tokens() {
        assert_eq!(
            kinds("x >= 1.5 AND y != \"a\"", Mode::Expression),
            vec![
                TokenKind::Ident,
                TokenKind::Gte,
                TokenKind::Decimal,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Neq,
                TokenKind::Str,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_cast_and_colon() {
        assert_eq!(
            kinds("a::long b:c", Mode::Expression),
            vec![
                TokenKind::Ident,
                TokenKind::Cast,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_source_mode_keeps_index_pattern_whole() {
        let lexer = Lexer::new("logs-*-2024.01 , <logs-{now/d}>");
        let tok = lexer.lex(Position::START, Mode::Source).unwrap();
        assert_eq!(tok.kind, TokenKind::Source);
        assert_eq!(tok.text, "logs-*-2024.01");

        let comma = lexer.lex(tok.end, Mode::Source).unwrap();
        assert_eq!(comma.kind, TokenKind::Comma);

        let math = lexer.lex(comma.end, Mode::Source).unwrap();
        assert_eq!(math.text, "<logs-{now/d}>");
    }

    #[test]
    fn test_pattern_mode_accepts_star() {
        let lexer = Lexer::new("host.*");
        let first = lexer.lex(Position::START, Mode::Pattern).unwrap();
        assert_eq!(first.text, "host");
        let dot = lexer.lex(first.end, Mode::Pattern).unwrap();
        assert_eq!(dot.kind, TokenKind::Dot);
        let star = lexer.lex(dot.end, Mode::Pattern).unwrap();
        assert_eq!((star.kind, star.text), (TokenKind::NamePattern, "*"));
    }

    #[test]
    fn test_comments_are_skipped_and_positions_tracked() {
        let lexer = Lexer::new("// first\n  /* block\n */ FROM");
        let tok = lexer.lex(Position::START, Mode::Expression).unwrap();
        assert_eq!(tok.text, "FROM");
        assert_eq!(tok.start.line, 3);
        assert_eq!(tok.start.column, 4);
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let lexer = Lexer::new("\"\"\"a \"quoted\"\nvalue\"\"\" x");
        let tok = lexer.lex(Position::START, Mode::Expression).unwrap();
        assert_eq!(tok.kind, TokenKind::Str);
        let next = lexer.lex(tok.end, Mode::Expression).unwrap();
        assert_eq!((next.text, next.start.line, next.start.column), ("x", 2, 9));
    }

    #[test]
    fn test_params() {
        assert_eq!(
            kinds("? ?name ?1 ??field", Mode::Expression),
            vec![
                TokenKind::Param,
                TokenKind::Param,
                TokenKind::Param,
                TokenKind::Param,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_recognition_error() {
        let lexer = Lexer::new("  \"abc");
        let err = lexer.lex(Position::START, Mode::Expression).unwrap_err();
        assert_eq!((err.line, err.column), (1, 2));
        assert_eq!(err.message, "token recognition error at: '\"abc'");
    }

    #[test]
    fn test_unknown_character_is_recognition_error() {
        let lexer = Lexer::new("a # b");
        let first = lexer.lex(Position::START, Mode::Expression).unwrap();
        let err = lexer.lex(first.end, Mode::Expression).unwrap_err();
        assert_eq!(err.message, "token recognition error at: '#'");
        assert_eq!(err.column, 2);
    }

    #[test]
    fn test_exponent_literal() {
        assert_eq!(
            kinds("1e3 2E-4 .5", Mode::Expression),
            vec![
                TokenKind::Decimal,
                TokenKind::Decimal,
                TokenKind::Decimal,
                TokenKind::Eof,
            ]
        );
    }
}

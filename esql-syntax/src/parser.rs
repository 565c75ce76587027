//! Recursive descent parser for a single ES|QL statement.
//!
//! The parser builds no tree; it only proves that the input matches
//! `query EOF`. Alternatives tried at the current position are recorded so a
//! failure can report what would have been accepted instead.

use crate::SyntaxError;
use crate::lexer::{Lexer, Mode, Position, Token, TokenKind};

type ParseResult<T> = Result<T, SyntaxError>;

const E: Mode = Mode::Expression;

/// Deepest accepted nesting of parentheses, function calls, unary signs
/// and `NOT` within one expression.
pub const MAX_NESTING: usize = 100;

/// Words that cannot be used as unquoted identifiers in expressions.
const RESERVED: &[&str] = &[
    "and", "asc", "by", "desc", "false", "in", "is", "like", "not", "null", "nulls", "or",
    "rlike", "true", "where",
];

fn is_reserved(word: &str) -> bool {
    RESERVED.iter().any(|r| word.eq_ignore_ascii_case(r))
}

fn is_word(tok: &Token<'_>, word: &str) -> bool {
    matches!(
        tok.kind,
        TokenKind::Ident | TokenKind::Source | TokenKind::NamePattern
    ) && tok.text.eq_ignore_ascii_case(word)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceCommand {
    From,
    Row,
    Show,
}

impl SourceCommand {
    const ALL: [Self; 3] = [Self::From, Self::Row, Self::Show];

    const fn keyword(self) -> &'static str {
        match self {
            Self::From => "from",
            Self::Row => "row",
            Self::Show => "show",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessingCommand {
    ChangePoint,
    Dissect,
    Drop,
    Enrich,
    Eval,
    Grok,
    InlineStats,
    Keep,
    Limit,
    Lookup,
    MvExpand,
    Rename,
    Sample,
    Sort,
    Stats,
    Where,
}

impl ProcessingCommand {
    const ALL: [Self; 16] = [
        Self::ChangePoint,
        Self::Dissect,
        Self::Drop,
        Self::Enrich,
        Self::Eval,
        Self::Grok,
        Self::InlineStats,
        Self::Keep,
        Self::Limit,
        Self::Lookup,
        Self::MvExpand,
        Self::Rename,
        Self::Sample,
        Self::Sort,
        Self::Stats,
        Self::Where,
    ];

    const fn keyword(self) -> &'static str {
        match self {
            Self::ChangePoint => "change_point",
            Self::Dissect => "dissect",
            Self::Drop => "drop",
            Self::Enrich => "enrich",
            Self::Eval => "eval",
            Self::Grok => "grok",
            Self::InlineStats => "inlinestats",
            Self::Keep => "keep",
            Self::Limit => "limit",
            Self::Lookup => "lookup",
            Self::MvExpand => "mv_expand",
            Self::Rename => "rename",
            Self::Sample => "sample",
            Self::Sort => "sort",
            Self::Stats => "stats",
            Self::Where => "where",
        }
    }
}

/// Element kind of an array literal; arrays must be homogeneous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayKind {
    Numeric,
    Boolean,
    String,
}

#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    pos: Position,
    peeked: Option<(Mode, Token<'a>)>,
    expected: Vec<String>,
    depth: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            lexer: Lexer::new(src),
            pos: Position::START,
            peeked: None,
            expected: Vec::new(),
            depth: 0,
        }
    }

    // Token plumbing

    fn peek(&mut self, mode: Mode) -> ParseResult<Token<'a>> {
        if let Some((cached_mode, tok)) = self.peeked
            && cached_mode == mode
        {
            return Ok(tok);
        }
        let tok = self.lexer.lex(self.pos, mode)?;
        self.peeked = Some((mode, tok));
        Ok(tok)
    }

    fn bump(&mut self, mode: Mode) -> ParseResult<Token<'a>> {
        let tok = self.peek(mode)?;
        self.pos = tok.end;
        self.peeked = None;
        self.expected.clear();
        Ok(tok)
    }

    fn expecting(&mut self, label: &str) {
        self.expected.push(label.to_owned());
    }

    /// Consume a token of `kind` without recording it as an alternative.
    fn eat_silent(&mut self, mode: Mode, kind: TokenKind) -> ParseResult<bool> {
        if self.peek(mode)?.kind == kind {
            self.bump(mode)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn eat(&mut self, mode: Mode, kind: TokenKind) -> ParseResult<bool> {
        if self.eat_silent(mode, kind)? {
            return Ok(true);
        }
        self.expecting(kind.label());
        Ok(false)
    }

    fn eat_any(&mut self, mode: Mode, kinds: &[TokenKind]) -> ParseResult<bool> {
        let kind = self.peek(mode)?.kind;
        if kinds.contains(&kind) {
            self.bump(mode)?;
            return Ok(true);
        }
        for k in kinds {
            self.expecting(k.label());
        }
        Ok(false)
    }

    fn expect(&mut self, mode: Mode, kind: TokenKind) -> ParseResult<Token<'a>> {
        let tok = self.peek(mode)?;
        if tok.kind == kind {
            return self.bump(mode);
        }
        self.expecting(kind.label());
        Err(self.mismatched(tok))
    }

    fn at_word(&mut self, mode: Mode, word: &str) -> ParseResult<bool> {
        Ok(is_word(&self.peek(mode)?, word))
    }

    fn eat_word(&mut self, mode: Mode, word: &str) -> ParseResult<bool> {
        if self.at_word(mode, word)? {
            self.bump(mode)?;
            return Ok(true);
        }
        self.expecting(&format!("'{word}'"));
        Ok(false)
    }

    fn expect_word(&mut self, mode: Mode, word: &str) -> ParseResult<()> {
        if self.eat_word(mode, word)? {
            return Ok(());
        }
        let tok = self.peek(mode)?;
        Err(self.mismatched(tok))
    }

    fn fail<T>(&mut self, mode: Mode) -> ParseResult<T> {
        let tok = self.peek(mode)?;
        Err(self.mismatched(tok))
    }

    fn mismatched(&self, tok: Token<'a>) -> SyntaxError {
        let mut labels: Vec<&str> = Vec::new();
        for label in &self.expected {
            if !labels.contains(&label.as_str()) {
                labels.push(label);
            }
        }
        let message = match labels.as_slice() {
            [] => format!("no viable alternative at input '{}'", tok.display()),
            [one] => format!("mismatched input '{}' expecting {one}", tok.display()),
            many => format!(
                "mismatched input '{}' expecting {{{}}}",
                tok.display(),
                many.join(", ")
            ),
        };
        SyntaxError::at(tok.start, message)
    }

    /// Run `parse` one nesting level deeper, failing at `opener` once
    /// [`MAX_NESTING`] is exceeded.
    fn nested<T>(
        &mut self,
        opener: Token<'a>,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::at(
                opener.start,
                format!(
                    "expression nested deeper than {MAX_NESTING} levels at input '{}'",
                    opener.display()
                ),
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // Statement structure

    /// `singleStatement : query EOF`
    pub fn single_statement(mut self) -> ParseResult<()> {
        self.source_command()?;
        loop {
            if self.eat(E, TokenKind::Pipe)? {
                self.processing_command()?;
                continue;
            }
            let tok = self.peek(E)?;
            if tok.kind == TokenKind::Eof {
                return Ok(());
            }
            self.expecting(TokenKind::Eof.label());
            return Err(self.mismatched(tok));
        }
    }

    fn source_command(&mut self) -> ParseResult<()> {
        let tok = self.peek(E)?;
        let command = SourceCommand::ALL
            .into_iter()
            .find(|c| tok.kind == TokenKind::Ident && is_word(&tok, c.keyword()));
        let Some(command) = command else {
            for c in SourceCommand::ALL {
                self.expecting(&format!("'{}'", c.keyword()));
            }
            return Err(self.mismatched(tok));
        };
        self.bump(E)?;

        match command {
            SourceCommand::From => self.from_command(),
            SourceCommand::Row => self.fields(),
            SourceCommand::Show => self.expect_word(E, "info"),
        }
    }

    fn processing_command(&mut self) -> ParseResult<()> {
        let tok = self.peek(E)?;
        let command = ProcessingCommand::ALL
            .into_iter()
            .find(|c| tok.kind == TokenKind::Ident && is_word(&tok, c.keyword()));
        let Some(command) = command else {
            for c in ProcessingCommand::ALL {
                self.expecting(&format!("'{}'", c.keyword()));
            }
            return Err(self.mismatched(tok));
        };
        self.bump(E)?;

        match command {
            ProcessingCommand::Where => self.boolean_expression(),
            ProcessingCommand::Eval => self.fields(),
            ProcessingCommand::Stats | ProcessingCommand::InlineStats => self.stats_command(),
            ProcessingCommand::Keep | ProcessingCommand::Drop => self.name_patterns(),
            ProcessingCommand::Rename => self.rename_command(),
            ProcessingCommand::Sort => self.sort_command(),
            ProcessingCommand::Limit => self.limit_command(),
            ProcessingCommand::Dissect => self.dissect_command(),
            ProcessingCommand::Grok => self.grok_command(),
            ProcessingCommand::Enrich => self.enrich_command(),
            ProcessingCommand::MvExpand => self.qualified_name(),
            ProcessingCommand::Lookup => self.lookup_join_command(),
            ProcessingCommand::ChangePoint => self.change_point_command(),
            ProcessingCommand::Sample => self.constant(),
        }
    }

    // Commands

    /// `FROM indexPattern (, indexPattern)* (METADATA field (, field)*)?`
    fn from_command(&mut self) -> ParseResult<()> {
        self.index_pattern()?;
        while self.eat(Mode::Source, TokenKind::Comma)? {
            self.index_pattern()?;
        }
        if self.eat_word(Mode::Source, "metadata")? {
            self.expect(Mode::Source, TokenKind::Source)?;
            while self.eat(Mode::Source, TokenKind::Comma)? {
                self.expect(Mode::Source, TokenKind::Source)?;
            }
        }
        Ok(())
    }

    /// `(cluster ':')? index ('::' selector)? | "quoted"`
    fn index_pattern(&mut self) -> ParseResult<()> {
        let tok = self.peek(Mode::Source)?;
        match tok.kind {
            TokenKind::Str => {
                self.bump(Mode::Source)?;
            }
            TokenKind::Source => {
                self.bump(Mode::Source)?;
                if self.eat_silent(Mode::Source, TokenKind::Colon)? {
                    self.expect(Mode::Source, TokenKind::Source)?;
                }
                if self.eat_silent(Mode::Source, TokenKind::Cast)? {
                    self.expect(Mode::Source, TokenKind::Source)?;
                }
            }
            _ => {
                self.expecting(TokenKind::Str.label());
                self.expecting(TokenKind::Source.label());
                return Err(self.mismatched(tok));
            }
        }
        Ok(())
    }

    /// `STATS aggField (, aggField)* (BY field (, field)*)?`, both parts optional.
    fn stats_command(&mut self) -> ParseResult<()> {
        let tok = self.peek(E)?;
        let empty = matches!(tok.kind, TokenKind::Pipe | TokenKind::Eof) || is_word(&tok, "by");
        if !empty {
            self.agg_field()?;
            while self.eat(E, TokenKind::Comma)? {
                self.agg_field()?;
            }
        }
        if self.eat_word(E, "by")? {
            self.fields()?;
        }
        Ok(())
    }

    fn agg_field(&mut self) -> ParseResult<()> {
        self.field()?;
        if self.eat_word(E, "where")? {
            self.boolean_expression()?;
        }
        Ok(())
    }

    fn rename_command(&mut self) -> ParseResult<()> {
        loop {
            self.name_pattern()?;
            if self.eat_word(Mode::Pattern, "as")? || self.eat(Mode::Pattern, TokenKind::Assign)? {
                self.name_pattern()?;
            } else {
                return self.fail(Mode::Pattern);
            }
            if !self.eat(Mode::Pattern, TokenKind::Comma)? {
                return Ok(());
            }
        }
    }

    /// `SORT expr (ASC|DESC)? (NULLS (FIRST|LAST))? (, ...)*`
    fn sort_command(&mut self) -> ParseResult<()> {
        loop {
            self.boolean_expression()?;
            let _ = self.eat_word(E, "asc")? || self.eat_word(E, "desc")?;
            if self.eat_word(E, "nulls")? && !(self.eat_word(E, "first")? || self.eat_word(E, "last")?)
            {
                return self.fail(E);
            }
            if !self.eat(E, TokenKind::Comma)? {
                return Ok(());
            }
        }
    }

    fn limit_command(&mut self) -> ParseResult<()> {
        if self.eat_any(E, &[TokenKind::Integer, TokenKind::Param])? {
            return Ok(());
        }
        self.fail(E)
    }

    /// `DISSECT primary "pattern" (option = constant (, ...)*)?`
    fn dissect_command(&mut self) -> ParseResult<()> {
        self.primary()?;
        self.expect(E, TokenKind::Str)?;
        if self.at_identifier()? {
            loop {
                self.identifier()?;
                self.expect(E, TokenKind::Assign)?;
                self.constant()?;
                if !self.eat(E, TokenKind::Comma)? {
                    break;
                }
            }
        }
        Ok(())
    }

    /// `GROK primary "pattern" (, "pattern")*`
    fn grok_command(&mut self) -> ParseResult<()> {
        self.primary()?;
        self.expect(E, TokenKind::Str)?;
        while self.eat(E, TokenKind::Comma)? {
            self.expect(E, TokenKind::Str)?;
        }
        Ok(())
    }

    /// `ENRICH (mode ':')? policy (ON pattern)? (WITH (pattern =)? pattern, ...)?`
    fn enrich_command(&mut self) -> ParseResult<()> {
        self.expect(Mode::Source, TokenKind::Source)?;
        if self.eat_silent(Mode::Source, TokenKind::Colon)? {
            self.expect(Mode::Source, TokenKind::Source)?;
        }
        if self.eat_word(Mode::Pattern, "on")? {
            self.name_pattern()?;
        }
        if self.eat_word(Mode::Pattern, "with")? {
            loop {
                self.name_pattern()?;
                if self.eat(Mode::Pattern, TokenKind::Assign)? {
                    self.name_pattern()?;
                }
                if !self.eat(Mode::Pattern, TokenKind::Comma)? {
                    break;
                }
            }
        }
        Ok(())
    }

    /// `LOOKUP JOIN indexPattern ON name (, name)*`
    fn lookup_join_command(&mut self) -> ParseResult<()> {
        self.expect_word(E, "join")?;
        self.index_pattern()?;
        self.expect_word(E, "on")?;
        self.qualified_name()?;
        while self.eat(E, TokenKind::Comma)? {
            self.qualified_name()?;
        }
        Ok(())
    }

    /// `CHANGE_POINT value (ON key)? (AS type, pvalue)?`
    fn change_point_command(&mut self) -> ParseResult<()> {
        self.qualified_name()?;
        if self.eat_word(E, "on")? {
            self.qualified_name()?;
        }
        if self.eat_word(E, "as")? {
            self.qualified_name()?;
            self.expect(E, TokenKind::Comma)?;
            self.qualified_name()?;
        }
        Ok(())
    }

    // Fields and names

    fn fields(&mut self) -> ParseResult<()> {
        self.field()?;
        while self.eat(E, TokenKind::Comma)? {
            self.field()?;
        }
        Ok(())
    }

    /// `(qualifiedName '=')? booleanExpression`
    fn field(&mut self) -> ParseResult<()> {
        let checkpoint = self.clone();
        if let Ok(true) = self.assignment_target() {
            return self.boolean_expression();
        }
        *self = checkpoint;
        self.boolean_expression()
    }

    fn assignment_target(&mut self) -> ParseResult<bool> {
        if !self.at_identifier()? {
            return Ok(false);
        }
        self.qualified_name()?;
        if self.peek(E)?.kind != TokenKind::Assign {
            return Ok(false);
        }
        self.bump(E)?;
        Ok(true)
    }

    fn at_identifier(&mut self) -> ParseResult<bool> {
        let tok = self.peek(E)?;
        Ok(match tok.kind {
            TokenKind::QuotedIdent => true,
            TokenKind::Ident => !is_reserved(tok.text),
            _ => false,
        })
    }

    fn identifier(&mut self) -> ParseResult<()> {
        if self.at_identifier()? {
            self.bump(E)?;
            return Ok(());
        }
        self.expecting(TokenKind::Ident.label());
        self.expecting(TokenKind::QuotedIdent.label());
        self.fail(E)
    }

    fn qualified_name(&mut self) -> ParseResult<()> {
        self.identifier()?;
        while self.eat_silent(E, TokenKind::Dot)? {
            self.identifier()?;
        }
        Ok(())
    }

    fn name_patterns(&mut self) -> ParseResult<()> {
        self.name_pattern()?;
        while self.eat(Mode::Pattern, TokenKind::Comma)? {
            self.name_pattern()?;
        }
        Ok(())
    }

    /// `part ('.' part)*` where a part may contain `*`.
    fn name_pattern(&mut self) -> ParseResult<()> {
        loop {
            let parts = [
                TokenKind::NamePattern,
                TokenKind::QuotedIdent,
                TokenKind::Param,
            ];
            if !self.eat_any(Mode::Pattern, &parts)? {
                return self.fail(Mode::Pattern);
            }
            if !self.eat_silent(Mode::Pattern, TokenKind::Dot)? {
                return Ok(());
            }
        }
    }

    // Expressions

    fn boolean_expression(&mut self) -> ParseResult<()> {
        self.and_expression()?;
        while self.eat_word(E, "or")? {
            self.and_expression()?;
        }
        Ok(())
    }

    fn and_expression(&mut self) -> ParseResult<()> {
        self.not_expression()?;
        while self.eat_word(E, "and")? {
            self.not_expression()?;
        }
        Ok(())
    }

    fn not_expression(&mut self) -> ParseResult<()> {
        let tok = self.peek(E)?;
        if self.eat_word(E, "not")? {
            return self.nested(tok, Self::not_expression);
        }
        self.predicate()
    }

    /// A value expression optionally followed by one of `[NOT] LIKE`,
    /// `[NOT] RLIKE`, `[NOT] IN`, `IS [NOT] NULL` or a `:` match.
    fn predicate(&mut self) -> ParseResult<()> {
        self.value_expression()?;
        let negated = self.eat_word(E, "not")?;
        if self.eat_word(E, "like")? || self.eat_word(E, "rlike")? {
            return self.like_patterns();
        }
        if self.eat_word(E, "in")? {
            return self.in_list();
        }
        if negated {
            return self.fail(E);
        }
        if self.eat_word(E, "is")? {
            self.eat_word(E, "not")?;
            return self.expect_word(E, "null");
        }
        if self.eat(E, TokenKind::Colon)? {
            return self.constant();
        }
        Ok(())
    }

    fn like_patterns(&mut self) -> ParseResult<()> {
        if self.eat_any(E, &[TokenKind::Str, TokenKind::Param])? {
            return Ok(());
        }
        self.expect(E, TokenKind::LParen)?;
        loop {
            self.expect(E, TokenKind::Str)?;
            if !self.eat(E, TokenKind::Comma)? {
                self.expect(E, TokenKind::RParen)?;
                return Ok(());
            }
        }
    }

    fn in_list(&mut self) -> ParseResult<()> {
        self.expect(E, TokenKind::LParen)?;
        loop {
            self.value_expression()?;
            if !self.eat(E, TokenKind::Comma)? {
                self.expect(E, TokenKind::RParen)?;
                return Ok(());
            }
        }
    }

    fn value_expression(&mut self) -> ParseResult<()> {
        self.additive()?;
        let comparisons = [
            TokenKind::Eq,
            TokenKind::Neq,
            TokenKind::Lt,
            TokenKind::Lte,
            TokenKind::Gt,
            TokenKind::Gte,
            TokenKind::CaseInsensitiveEq,
        ];
        if self.eat_any(E, &comparisons)? {
            self.additive()?;
        }
        Ok(())
    }

    fn additive(&mut self) -> ParseResult<()> {
        self.multiplicative()?;
        while self.eat_any(E, &[TokenKind::Plus, TokenKind::Minus])? {
            self.multiplicative()?;
        }
        Ok(())
    }

    fn multiplicative(&mut self) -> ParseResult<()> {
        self.unary()?;
        let operators = [TokenKind::Star, TokenKind::Slash, TokenKind::Percent];
        while self.eat_any(E, &operators)? {
            self.unary()?;
        }
        Ok(())
    }

    fn unary(&mut self) -> ParseResult<()> {
        let tok = self.peek(E)?;
        if self.eat_any(E, &[TokenKind::Minus, TokenKind::Plus])? {
            return self.nested(tok, Self::unary);
        }
        self.primary()?;
        while self.eat_silent(E, TokenKind::Cast)? {
            self.identifier()?;
        }
        Ok(())
    }

    fn primary(&mut self) -> ParseResult<()> {
        let tok = self.peek(E)?;
        match tok.kind {
            TokenKind::LParen => {
                self.bump(E)?;
                self.nested(tok, |p| {
                    p.boolean_expression()?;
                    p.expect(E, TokenKind::RParen)?;
                    Ok(())
                })
            }
            TokenKind::Integer
            | TokenKind::Decimal
            | TokenKind::Str
            | TokenKind::Param
            | TokenKind::LBracket => self.constant(),
            TokenKind::Ident if ["null", "true", "false"].iter().any(|w| is_word(&tok, w)) => {
                self.constant()
            }
            TokenKind::QuotedIdent | TokenKind::Ident if !is_reserved(tok.text) => {
                self.bump(E)?;
                if self.eat_silent(E, TokenKind::LParen)? {
                    return self.nested(tok, Self::function_arguments);
                }
                while self.eat_silent(E, TokenKind::Dot)? {
                    self.identifier()?;
                }
                Ok(())
            }
            _ => {
                for label in [
                    "'('",
                    "'null'",
                    "'true'",
                    "'false'",
                    "'?'",
                    "'['",
                    TokenKind::Str.label(),
                    TokenKind::Integer.label(),
                    TokenKind::Decimal.label(),
                    TokenKind::Ident.label(),
                    TokenKind::QuotedIdent.label(),
                ] {
                    self.expecting(label);
                }
                Err(self.mismatched(tok))
            }
        }
    }

    /// Arguments after `name(`: `*`, or expressions with an optional
    /// trailing `{ "option": constant }` map.
    fn function_arguments(&mut self) -> ParseResult<()> {
        if self.eat_silent(E, TokenKind::RParen)? {
            return Ok(());
        }
        if self.eat_silent(E, TokenKind::Star)? {
            self.expect(E, TokenKind::RParen)?;
            return Ok(());
        }
        loop {
            if self.eat_silent(E, TokenKind::LBrace)? {
                self.map_entries()?;
                self.expect(E, TokenKind::RParen)?;
                return Ok(());
            }
            self.boolean_expression()?;
            if !self.eat(E, TokenKind::Comma)? {
                self.expect(E, TokenKind::RParen)?;
                return Ok(());
            }
        }
    }

    fn map_entries(&mut self) -> ParseResult<()> {
        if self.eat_silent(E, TokenKind::RBrace)? {
            return Ok(());
        }
        loop {
            self.expect(E, TokenKind::Str)?;
            self.expect(E, TokenKind::Colon)?;
            self.constant()?;
            if !self.eat(E, TokenKind::Comma)? {
                self.expect(E, TokenKind::RBrace)?;
                return Ok(());
            }
        }
    }

    // Literals

    fn constant(&mut self) -> ParseResult<()> {
        let tok = self.peek(E)?;
        match tok.kind {
            TokenKind::Integer => {
                self.bump(E)?;
                // `1 day`, `15 minutes`
                if self.peek(E)?.kind == TokenKind::Ident && self.at_identifier()? {
                    self.bump(E)?;
                }
                Ok(())
            }
            TokenKind::Decimal | TokenKind::Str | TokenKind::Param => {
                self.bump(E)?;
                Ok(())
            }
            TokenKind::Plus | TokenKind::Minus => {
                self.bump(E)?;
                if self.eat_any(E, &[TokenKind::Integer, TokenKind::Decimal])? {
                    return Ok(());
                }
                self.fail(E)
            }
            TokenKind::LBracket => {
                self.bump(E)?;
                self.array_elements()
            }
            _ if ["null", "true", "false"].iter().any(|w| is_word(&tok, w)) => {
                self.bump(E)?;
                Ok(())
            }
            _ => {
                for label in ["'null'", "'true'", "'false'", "'?'", "'['"] {
                    self.expecting(label);
                }
                self.expecting(TokenKind::Str.label());
                self.expecting(TokenKind::Integer.label());
                self.expecting(TokenKind::Decimal.label());
                Err(self.mismatched(tok))
            }
        }
    }

    /// Elements after `[`; the first element fixes the array kind.
    fn array_elements(&mut self) -> ParseResult<()> {
        let tok = self.peek(E)?;
        let kind = match tok.kind {
            TokenKind::Integer | TokenKind::Decimal | TokenKind::Plus | TokenKind::Minus => {
                ArrayKind::Numeric
            }
            TokenKind::Str => ArrayKind::String,
            _ if is_word(&tok, "true") || is_word(&tok, "false") => ArrayKind::Boolean,
            _ => {
                self.expecting("'true'");
                self.expecting("'false'");
                self.expecting(TokenKind::Str.label());
                self.expecting(TokenKind::Integer.label());
                self.expecting(TokenKind::Decimal.label());
                return Err(self.mismatched(tok));
            }
        };
        loop {
            self.array_element(kind)?;
            if !self.eat(E, TokenKind::Comma)? {
                self.expect(E, TokenKind::RBracket)?;
                return Ok(());
            }
        }
    }

    fn array_element(&mut self, kind: ArrayKind) -> ParseResult<()> {
        let accepted = match kind {
            ArrayKind::Numeric => {
                let _ = self.eat_any(E, &[TokenKind::Minus, TokenKind::Plus])?;
                self.eat_any(E, &[TokenKind::Integer, TokenKind::Decimal])?
            }
            ArrayKind::Boolean => self.eat_word(E, "true")? || self.eat_word(E, "false")?,
            ArrayKind::String => self.eat(E, TokenKind::Str)?,
        };
        if accepted {
            return Ok(());
        }
        self.fail(E)
    }
}

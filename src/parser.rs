//! Boolean query parser (§4.2 grammar): recursive descent over a tokenized
//! stream, producing a tree whose nodes bucket leaves by `+`/`-`/neutral.
//!
//! Grounded in the `bbonvi-bb` search-query parser's explicit-cursor shape
//! (`peek`/`advance`/`expect_*` over a `Vec<Token>`) rather than a shared
//! mutable counter closed over by recursion.

use crate::config::Config;
use crate::error::{SearchError, SearchResult};

/// Boolean operator keyword recognized between clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Not,
}

/// Explicit `+`/`-` sign prefixing a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    Plus,
    Minus,
    #[default]
    Neutral,
}

/// The value carried by a single query leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafValue {
    /// A single word, with an optional trailing wildcard marker preserved verbatim.
    Word(String),
    /// A quoted phrase, with an optional `~N` proximity suffix.
    Phrase {
        text: String,
        proximity: Option<u32>,
    },
    /// A parenthesized sub-query.
    Group(Box<QueryTree>),
}

/// A single leaf of the query tree: an optional field prefix plus a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub field: Option<String>,
    pub value: LeafValue,
}

/// A node of the parsed query: leaves bucketed by required (`+`), excluded
/// (`-`), and neutral (default, OR-like) membership.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryTree {
    pub plus: Vec<Leaf>,
    pub minus: Vec<Leaf>,
    pub neutral: Vec<Leaf>,
}

impl QueryTree {
    /// Total number of leaves across all three buckets (not recursing into groups).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.plus.len() + self.minus.len() + self.neutral.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum RawToken {
    LParen,
    RParen,
    Op(Operator),
    Sign(Sign),
    Field(String),
    Word(String),
    Phrase { text: String, proximity: Option<u32> },
}

struct Scanner<'a> {
    chars: Vec<(usize, char)>,
    src: &'a str,
    pos: usize,
    word_re: regex::Regex,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str, cfg: &Config) -> SearchResult<Self> {
        let word_re = regex::Regex::new(&format!("^{}$", cfg.word_class())).map_err(|e| {
            SearchError::InvalidConfig {
                field: "word_characters",
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            chars: src.char_indices().collect(),
            src,
            pos: 0,
            word_re,
        })
    }

    fn is_word_char(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.word_re.is_match(c.encode_utf8(&mut buf))
    }

    fn peek_char(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn byte_offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map_or(self.src.len(), |(off, _)| *off)
    }

    fn skip_whitespace(&mut self) {
        while let Some((_, c)) = self.peek_char() {
            if c.is_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?.1;
        self.pos += 1;
        Some(c)
    }

    /// Scan one raw token, if any remain. `at_clause_start` controls whether
    /// a leading `+`/`-` is consumed as a [`RawToken::Sign`].
    fn next_token(&mut self, cfg: &Config, at_clause_start: bool) -> SearchResult<Option<RawToken>> {
        self.skip_whitespace();
        let Some((start, c)) = self.peek_char() else {
            return Ok(None);
        };

        if c == '(' {
            self.advance();
            return Ok(Some(RawToken::LParen));
        }
        if c == ')' {
            self.advance();
            return Ok(Some(RawToken::RParen));
        }
        if at_clause_start && c == '+' {
            self.advance();
            return Ok(Some(RawToken::Sign(Sign::Plus)));
        }
        if at_clause_start && c == '-' {
            self.advance();
            return Ok(Some(RawToken::Sign(Sign::Minus)));
        }
        if c == cfg.phrase_delim {
            return self.scan_phrase(cfg).map(Some);
        }

        // Bare run: word, field prefix, or operator keyword.
        let run_start = start;
        while let Some((_, ch)) = self.peek_char() {
            if ch.is_whitespace() || ch == '(' || ch == ')' || ch == cfg.phrase_delim {
                break;
            }
            self.advance();
        }
        let end = self.byte_offset();
        let run = &self.src[run_start..end];
        if run.is_empty() {
            return Err(SearchError::InvalidQuery {
                offset: run_start,
                message: format!("unexpected character '{c}'"),
            });
        }

        // Field prefix: `name:` where `name` is all word characters. Guard
        // against swallowing a URI scheme (`http://...`) as a field prefix.
        if let Some(colon_rel) = run.find(':') {
            let (name, rest) = run.split_at(colon_rel);
            let rest = &rest[1..]; // drop ':'
            if !name.is_empty()
                && !rest.starts_with('/')
                && name.chars().all(|ch| self.is_word_char(ch))
            {
                if rest.is_empty() {
                    return Ok(Some(RawToken::Field(name.to_string())));
                }
                // Field immediately followed by its value in the same run
                // (e.g. `color:brown`) — rewind the scanner to re-scan the
                // value starting right after the colon.
                self.pos -= run[colon_rel + 1..].chars().count();
                return Ok(Some(RawToken::Field(name.to_string())));
            }
        }

        if run.eq_ignore_ascii_case(&cfg.and_word) {
            return Ok(Some(RawToken::Op(Operator::And)));
        }
        if run.eq_ignore_ascii_case(&cfg.or_word) {
            return Ok(Some(RawToken::Op(Operator::Or)));
        }
        if run.eq_ignore_ascii_case(&cfg.not_word) {
            return Ok(Some(RawToken::Op(Operator::Not)));
        }

        Ok(Some(RawToken::Word(run.to_string())))
    }

    fn scan_phrase(&mut self, cfg: &Config) -> SearchResult<RawToken> {
        let open_offset = self.byte_offset();
        self.advance(); // consume opening delimiter
        let text_start = self.byte_offset();
        loop {
            match self.peek_char() {
                None => {
                    return Err(SearchError::InvalidQuery {
                        offset: open_offset,
                        message: "unterminated phrase".to_string(),
                    });
                }
                Some((off, c)) if c == cfg.phrase_delim => {
                    let text = self.src[text_start..off].to_string();
                    self.advance(); // consume closing delimiter
                    let proximity = self.scan_proximity();
                    return Ok(RawToken::Phrase { text, proximity });
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn scan_proximity(&mut self) -> Option<u32> {
        let Some((_, '~')) = self.peek_char() else {
            return None;
        };
        let save = self.pos;
        self.advance();
        let digits_start = self.byte_offset();
        let mut any = false;
        while let Some((_, c)) = self.peek_char() {
            if c.is_ascii_digit() {
                any = true;
                self.advance();
            } else {
                break;
            }
        }
        if !any {
            self.pos = save;
            return None;
        }
        let digits_end = self.byte_offset();
        self.src[digits_start..digits_end].parse().ok()
    }
}

/// Parse a raw Boolean query string into a [`QueryTree`].
///
/// # Errors
/// Returns [`SearchError::InvalidQuery`] on unbalanced quotes, unbalanced
/// parentheses, or a trailing/dangling operator.
pub fn parse(raw: &str, cfg: &Config) -> SearchResult<QueryTree> {
    let mut scanner = Scanner::new(raw, cfg)?;
    let mut tokens = Vec::new();
    loop {
        let at_start = matches!(tokens.last(), None | Some(RawToken::Op(_)) | Some(RawToken::LParen));
        match scanner.next_token(cfg, at_start)? {
            Some(tok) => tokens.push(tok),
            None => break,
        }
    }

    let mut pos = 0usize;
    let tree = parse_expr(&tokens, &mut pos, raw)?;
    if pos != tokens.len() {
        return Err(SearchError::InvalidQuery {
            offset: raw.len(),
            message: "unbalanced parenthesis".to_string(),
        });
    }
    Ok(tree)
}

fn parse_expr(tokens: &[RawToken], pos: &mut usize, raw: &str) -> SearchResult<QueryTree> {
    let mut tree = QueryTree::default();
    let mut pending_op: Option<Operator> = None;
    let mut pending_sign = Sign::Neutral;
    let mut pending_field: Option<String> = None;

    while *pos < tokens.len() {
        match &tokens[*pos] {
            RawToken::RParen => break,
            RawToken::LParen => {
                *pos += 1;
                let inner = parse_expr(tokens, pos, raw)?;
                match tokens.get(*pos) {
                    Some(RawToken::RParen) => *pos += 1,
                    _ => {
                        return Err(SearchError::InvalidQuery {
                            offset: raw.len(),
                            message: "expected ')'".to_string(),
                        })
                    }
                }
                let leaf = Leaf {
                    field: pending_field.take(),
                    value: LeafValue::Group(Box::new(inner)),
                };
                place_leaf(&mut tree, leaf, pending_sign, pending_op);
                pending_sign = Sign::Neutral;
                pending_op = None;
            }
            RawToken::Op(op) => {
                pending_op = Some(*op);
                *pos += 1;
            }
            RawToken::Sign(sign) => {
                pending_sign = *sign;
                *pos += 1;
            }
            RawToken::Field(name) => {
                pending_field = Some(name.clone());
                *pos += 1;
            }
            RawToken::Word(word) => {
                let leaf = Leaf {
                    field: pending_field.take(),
                    value: LeafValue::Word(word.clone()),
                };
                place_leaf(&mut tree, leaf, pending_sign, pending_op);
                pending_sign = Sign::Neutral;
                pending_op = None;
                *pos += 1;
            }
            RawToken::Phrase { text, proximity } => {
                let leaf = Leaf {
                    field: pending_field.take(),
                    value: LeafValue::Phrase {
                        text: text.clone(),
                        proximity: *proximity,
                    },
                };
                place_leaf(&mut tree, leaf, pending_sign, pending_op);
                pending_sign = Sign::Neutral;
                pending_op = None;
                *pos += 1;
            }
        }
    }

    if pending_op.is_some() {
        return Err(SearchError::InvalidQuery {
            offset: raw.len(),
            message: "trailing operator with no following clause".to_string(),
        });
    }

    Ok(tree)
}

fn place_leaf(tree: &mut QueryTree, leaf: Leaf, sign: Sign, op: Option<Operator>) {
    match sign {
        Sign::Plus => tree.plus.push(leaf),
        Sign::Minus => tree.minus.push(leaf),
        Sign::Neutral => match op {
            Some(Operator::And) => tree.plus.push(leaf),
            Some(Operator::Not) => tree.minus.push(leaf),
            Some(Operator::Or) | None => tree.neutral.push(leaf),
        },
    }
}

//! Shell-style topic patterns.
//!
//! Grammar, matched against the whole topic string, case-sensitive:
//!
//! | token     | matches                                              |
//! |-----------|------------------------------------------------------|
//! | `*`       | any run of characters, including empty, `.` and `/`  |
//! | `?`       | exactly one character                                |
//! | `[seq]`   | one character in `seq`                               |
//! | `[!seq]`  | one character not in `seq`                           |
//! | other     | itself                                               |
//!
//! Inside brackets, `a-z` is an inclusive range, a `]` right after `[` or
//! `[!` is a literal member, a `-` at either end is literal, and a reversed
//! range such as `z-a` contains nothing. A `[` with no closing `]` is a
//! literal `[`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Single(char),
    Range(char, char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CharClass {
    negated: bool,
    items: Vec<ClassItem>,
}

impl CharClass {
    fn matches(&self, c: char) -> bool {
        let hit = self.items.iter().any(|item| match *item {
            ClassItem::Single(s) => s == c,
            ClassItem::Range(lo, hi) => lo <= c && c <= hi,
        });
        hit != self.negated
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyChar,
    AnyRun,
    Class(CharClass),
}

impl Token {
    fn matches_one(&self, c: char) -> bool {
        match self {
            Token::Literal(l) => *l == c,
            Token::AnyChar => true,
            Token::Class(class) => class.matches(c),
            Token::AnyRun => false,
        }
    }
}

/// A compiled topic pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPattern {
    raw: String,
    tokens: Vec<Token>,
}

impl TopicPattern {
    /// Compiles `pattern`. Every string is a valid pattern.
    pub fn parse(pattern: &str) -> Self {
        Self {
            raw: pattern.to_owned(),
            tokens: tokenize(pattern),
        }
    }

    /// The pattern exactly as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the whole of `topic` matches.
    pub fn matches(&self, topic: &str) -> bool {
        let text: Vec<char> = topic.chars().collect();
        let tokens = &self.tokens;

        let (mut t, mut p) = (0usize, 0usize);
        // Last `*` seen and the text position it is currently absorbing up to.
        let mut backtrack: Option<(usize, usize)> = None;

        while t < text.len() {
            if let Some(token) = tokens.get(p) {
                if *token == Token::AnyRun {
                    backtrack = Some((p, t));
                    p += 1;
                    continue;
                }
                if token.matches_one(text[t]) {
                    p += 1;
                    t += 1;
                    continue;
                }
            }
            match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            }
        }

        tokens[p..].iter().all(|token| *token == Token::AnyRun)
    }
}

impl fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                if tokens.last() != Some(&Token::AnyRun) {
                    tokens.push(Token::AnyRun);
                }
                i += 1;
            }
            '?' => {
                tokens.push(Token::AnyChar);
                i += 1;
            }
            '[' => match parse_class(&chars, i + 1) {
                Some((class, next)) => {
                    tokens.push(Token::Class(class));
                    i = next;
                }
                None => {
                    tokens.push(Token::Literal('['));
                    i += 1;
                }
            },
            c => {
                tokens.push(Token::Literal(c));
                i += 1;
            }
        }
    }
    tokens
}

/// Parses a bracket expression whose body starts at `start` (just past `[`).
/// Returns the class and the index just past the closing `]`, or `None` when
/// the bracket is never closed.
fn parse_class(chars: &[char], start: usize) -> Option<(CharClass, usize)> {
    let mut i = start;
    let negated = chars.get(i) == Some(&'!');
    if negated {
        i += 1;
    }
    let body_start = i;
    // A leading `]` belongs to the set.
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    while i < chars.len() && chars[i] != ']' {
        i += 1;
    }
    if i >= chars.len() {
        return None;
    }
    let body = &chars[body_start..i];

    let mut items = Vec::new();
    let mut j = 0;
    while j < body.len() {
        if j + 2 < body.len() && body[j + 1] == '-' {
            items.push(ClassItem::Range(body[j], body[j + 2]));
            j += 3;
        } else {
            items.push(ClassItem::Single(body[j]));
            j += 1;
        }
    }

    Some((CharClass { negated, items }, i + 1))
}

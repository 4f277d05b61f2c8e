//! Filename template compiler.
//!
//! A template such as `out/{hvr_tbl_name}-{hvr_integ_tstamp}.json` is
//! scanned once into a sequence of [`Token`]s. [`CompiledTemplate::render`]
//! turns the tokens into a concrete filename; [`CompiledTemplate::recognizer_pattern`]
//! turns the same tokens into an anchored regular expression matching every
//! filename the template can produce.
//!
//! | Placeholder          | Token                   | Rendered as                | Recognized by     |
//! |----------------------|-------------------------|----------------------------|-------------------|
//! | `{hvr_tbl_name}`     | [`Token::TableName`]    | first table of the cycle   | `(.*?)` / literal |
//! | `{hvr_integ_tstamp}` | [`Token::Timestamp`]    | `YYYYMMDDHHMMSS` UTC       | `[0-9]{14}`       |
//! | `{hvr_var_<name>}`   | [`Token::Variable`]     | the variable's value       | escaped value     |
//! | anything else        | [`Token::Wildcard`]     | error                      | `.*?`             |

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

use crate::error::TemplateError;

pub const TABLE_NAME: &str = "hvr_tbl_name";
pub const INTEG_TSTAMP: &str = "hvr_integ_tstamp";
pub const VARIABLE_PREFIX: &str = "hvr_var_";

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    TableName,
    Timestamp,
    /// A user variable, bound to its value at compile time.
    Variable { name: String, value: String },
    Wildcard(String),
}

/// Split `template` into literal runs and `{name}` placeholders.
///
/// A `{` only opens a placeholder if the next brace after it is a `}`;
/// anything else is literal text.
fn scan(template: &str, variables: &BTreeMap<String, String>) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find(['{', '}']) {
            Some(close) if after[close..].starts_with('}') => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(classify(&after[..close], variables));
                rest = &after[close + 1..];
            }
            _ => {
                literal.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

fn classify(name: &str, variables: &BTreeMap<String, String>) -> Token {
    match name {
        TABLE_NAME => Token::TableName,
        INTEG_TSTAMP => Token::Timestamp,
        _ => match variables.get(name) {
            Some(value) if name.starts_with(VARIABLE_PREFIX) => Token::Variable {
                name: name.to_owned(),
                value: value.clone(),
            },
            _ => Token::Wildcard(name.to_owned()),
        },
    }
}

// ---------------------------------------------------------------------------
// CompiledTemplate
// ---------------------------------------------------------------------------

/// Values for the two reserved placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderValues<'a> {
    pub table_name: Option<&'a str>,
    pub integ_tstamp: Option<&'a str>,
}

/// A filename template scanned into tokens, with user variables bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    source: String,
    tokens: Vec<Token>,
}

impl CompiledTemplate {
    /// Compile `template`, binding `{hvr_var_*}` placeholders from `variables`
    /// (keyed by lower-cased name).
    ///
    /// Fails if the template is empty or references a user variable that is
    /// not in `variables`.
    pub fn compile(
        template: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<Self, TemplateError> {
        if template.is_empty() {
            return Err(TemplateError::Empty);
        }

        let tokens = scan(template, variables);
        let referenced: Vec<String> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Variable { name, .. } => Some(name.clone()),
                Token::Wildcard(name) if name.starts_with(VARIABLE_PREFIX) => Some(name.clone()),
                _ => None,
            })
            .collect();
        let unknown = tokens
            .iter()
            .any(|t| matches!(t, Token::Wildcard(name) if name.starts_with(VARIABLE_PREFIX)));
        if unknown {
            return Err(TemplateError::UnknownVariable {
                referenced,
                known: variables.keys().cloned().collect(),
            });
        }

        Ok(CompiledTemplate {
            source: template.to_owned(),
            tokens,
        })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// `true` if the template contains `{hvr_tbl_name}`.
    pub fn references_table_name(&self) -> bool {
        self.tokens.iter().any(|t| matches!(t, Token::TableName))
    }

    /// Fail on the first placeholder that [`render`](Self::render) could
    /// never bind. Wildcards are only meaningful to the recognizer.
    pub fn ensure_renderable(&self) -> Result<(), TemplateError> {
        match self.tokens.iter().find_map(|t| match t {
            Token::Wildcard(name) => Some(name),
            _ => None,
        }) {
            Some(name) => Err(TemplateError::UnknownPlaceholder(name.clone())),
            None => Ok(()),
        }
    }

    /// Substitute every placeholder.
    ///
    /// Fails on the first placeholder without a value, including any
    /// wildcard.
    pub fn render(&self, values: RenderValues<'_>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::TableName => out.push_str(
                    values
                        .table_name
                        .ok_or_else(|| TemplateError::Unbound(TABLE_NAME.to_owned()))?,
                ),
                Token::Timestamp => out.push_str(
                    values
                        .integ_tstamp
                        .ok_or_else(|| TemplateError::Unbound(INTEG_TSTAMP.to_owned()))?,
                ),
                Token::Variable { value, .. } => out.push_str(value),
                Token::Wildcard(name) => return Err(TemplateError::Unbound(name.clone())),
            }
        }
        Ok(out)
    }

    /// Anchored pattern matching the filenames this template produces.
    ///
    /// With `table_name` set, `{hvr_tbl_name}` matches only that name.
    /// Otherwise its first occurrence becomes the only capture group.
    pub fn recognizer_pattern(&self, table_name: Option<&str>) -> String {
        let mut pattern = String::from("^");
        let mut captured = false;
        for token in &self.tokens {
            match token {
                Token::Literal(text) => pattern.push_str(&regex::escape(text)),
                Token::TableName => match table_name {
                    Some(name) => pattern.push_str(&regex::escape(name)),
                    None if !captured => {
                        pattern.push_str("(.*?)");
                        captured = true;
                    }
                    None => pattern.push_str(".*?"),
                },
                Token::Timestamp => pattern.push_str("[0-9]{14}"),
                Token::Variable { value, .. } => pattern.push_str(&regex::escape(value)),
                Token::Wildcard(_) => pattern.push_str(".*?"),
            }
        }
        pattern.push('$');
        pattern
    }

    /// [`recognizer_pattern`](Self::recognizer_pattern), compiled.
    pub fn recognizer(&self, table_name: Option<&str>) -> Result<Regex, TemplateError> {
        Ok(Regex::new(&self.recognizer_pattern(table_name))?)
    }
}

impl fmt::Display for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.source.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

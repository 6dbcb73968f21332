//! # Bus Messages
//!
//! The unit of delivery on the bus and the subject filters subscriptions use.
//!
//! Subjects are dot-separated tokens (`auth.register`). Filters may use `*` to
//! match exactly one token and a trailing `>` to match one or more tokens.

use crate::BusError;

/// A message delivered on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Subject the message was published on.
    pub subject: String,
    /// Subject the receiver should answer on, if any.
    pub reply: Option<String>,
    /// Opaque payload.
    pub payload: Vec<u8>,
}

impl Message {
    /// Create a message without a reply subject.
    #[must_use]
    pub fn new(subject: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            subject: subject.into(),
            reply: None,
            payload,
        }
    }

    /// Create a message that expects an answer on `reply`.
    #[must_use]
    pub fn with_reply(subject: impl Into<String>, reply: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            subject: subject.into(),
            reply: Some(reply.into()),
            payload,
        }
    }
}

/// Filter for selecting which messages a subscription receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectFilter {
    pattern: String,
    tokens: Vec<String>,
}

impl SubjectFilter {
    /// Parse a subject pattern.
    ///
    /// # Errors
    ///
    /// `BusError::InvalidSubject` for empty tokens, whitespace, or a `>` that
    /// is not the last token.
    pub fn new(pattern: &str) -> Result<Self, BusError> {
        let tokens = split_tokens(pattern)?;
        if let Some(pos) = tokens.iter().position(|t| t == ">") {
            if pos != tokens.len() - 1 {
                return Err(BusError::InvalidSubject(pattern.to_string()));
            }
        }
        Ok(Self {
            pattern: pattern.to_string(),
            tokens,
        })
    }

    /// The pattern this filter was built from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check if a concrete subject matches this filter.
    #[must_use]
    pub fn matches(&self, subject: &str) -> bool {
        let mut subject_tokens = subject.split('.');
        for token in &self.tokens {
            match token.as_str() {
                ">" => return subject_tokens.next().is_some(),
                "*" => {
                    if subject_tokens.next().is_none() {
                        return false;
                    }
                }
                literal => {
                    if subject_tokens.next() != Some(literal) {
                        return false;
                    }
                }
            }
        }
        subject_tokens.next().is_none()
    }
}

/// Validate a concrete (publishable) subject: no wildcards.
pub(crate) fn validate_subject(subject: &str) -> Result<(), BusError> {
    let tokens = split_tokens(subject)?;
    if tokens.iter().any(|t| t == "*" || t == ">") {
        return Err(BusError::InvalidSubject(subject.to_string()));
    }
    Ok(())
}

fn split_tokens(subject: &str) -> Result<Vec<String>, BusError> {
    if subject.is_empty() || subject.chars().any(char::is_whitespace) {
        return Err(BusError::InvalidSubject(subject.to_string()));
    }
    let tokens: Vec<String> = subject.split('.').map(str::to_string).collect();
    if tokens.iter().any(String::is_empty) {
        return Err(BusError::InvalidSubject(subject.to_string()));
    }
    Ok(tokens)
}

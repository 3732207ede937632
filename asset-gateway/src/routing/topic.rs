/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Slash-delimited topic tokenization and wildcard validation.

use crate::error::{InvalidTopic, InvalidTopicReason};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const TOPIC_SEPARATOR: char = '/';
pub const SINGLE_LEVEL_WILDCARD: &str = "+";
pub const MULTI_LEVEL_WILDCARD: &str = "#";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wildcard {
    /// `+`: matches exactly one token.
    SingleLevel,
    /// `#`: matches all remaining tokens.
    MultiLevel,
}

impl Wildcard {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            SINGLE_LEVEL_WILDCARD => Some(Wildcard::SingleLevel),
            MULTI_LEVEL_WILDCARD => Some(Wildcard::MultiLevel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Wildcard::SingleLevel => SINGLE_LEVEL_WILDCARD,
            Wildcard::MultiLevel => MULTI_LEVEL_WILDCARD,
        }
    }
}

/// A wildcard token and the position it occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WildcardToken {
    pub position: usize,
    pub wildcard: Wildcard,
}

/// Parsed, immutable topic.
///
/// Parsing only checks wildcard syntax: `#` must be last, and neither wildcard
/// may share a level with other characters. Token meaning is left to the
/// routing rules.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Topic {
    raw: String,
    tokens: Vec<String>,
}

impl Topic {
    pub fn parse(raw: &str) -> Result<Self, InvalidTopic> {
        if raw.is_empty() {
            return Err(InvalidTopic::new(raw, InvalidTopicReason::Empty));
        }

        let tokens: Vec<String> = raw.split(TOPIC_SEPARATOR).map(str::to_string).collect();
        let last = tokens.len() - 1;

        for (position, token) in tokens.iter().enumerate() {
            match Wildcard::from_token(token) {
                Some(Wildcard::MultiLevel) if position != last => {
                    return Err(InvalidTopic::new(
                        raw,
                        InvalidTopicReason::MultiLevelWildcardNotLast(position),
                    ));
                }
                Some(_) => {}
                None => {
                    if token.contains(SINGLE_LEVEL_WILDCARD) || token.contains(MULTI_LEVEL_WILDCARD)
                    {
                        return Err(InvalidTopic::new(
                            raw,
                            InvalidTopicReason::MalformedWildcard(position),
                        ));
                    }
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token(&self, position: usize) -> Option<&str> {
        self.tokens.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has_wildcard(&self) -> bool {
        self.tokens
            .iter()
            .any(|token| Wildcard::from_token(token).is_some())
    }

    /// Returns the single wildcard of the topic, if any.
    ///
    /// More than one wildcard token is rejected since the inverse mapping has
    /// exactly one substitution slot.
    pub fn single_wildcard(&self) -> Result<Option<WildcardToken>, InvalidTopic> {
        let mut found = None;
        for (position, token) in self.tokens.iter().enumerate() {
            if let Some(wildcard) = Wildcard::from_token(token) {
                if found.is_some() {
                    return Err(InvalidTopic::new(
                        self.raw.as_str(),
                        InvalidTopicReason::MultipleWildcards,
                    ));
                }
                found = Some(WildcardToken { position, wildcard });
            }
        }
        Ok(found)
    }

    /// Builds a concrete topic string with `replacement` at `position`.
    pub(crate) fn with_token_replaced(&self, position: usize, replacement: &str) -> String {
        self.tokens
            .iter()
            .enumerate()
            .map(|(index, token)| {
                if index == position {
                    replacement
                } else {
                    token.as_str()
                }
            })
            .collect::<Vec<&str>>()
            .join("/")
    }
}

impl FromStr for Topic {
    type Err = InvalidTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::parse(s)
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

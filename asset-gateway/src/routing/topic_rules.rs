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

//! Topic shape table shared by filter building and event-topic rewriting.
//!
//! Topics follow `realm/client-scope/category/<address...>`. Each row of
//! [`TOPIC_RULES`] describes one accepted address shape: the slot kinds for
//! every address token, the filter restrictions derived from it, and what
//! the wildcard slot (if any) is substituted with when an event is
//! published back to the subscriber. Both directions read the same row, so
//! every accepted subscription shape has exactly one rewrite rule.

use crate::error::{InvalidTopic, InvalidTopicReason};
use crate::model::EventKind;
use crate::routing::topic::{Topic, Wildcard, WildcardToken};
use regex::Regex;

pub const ASSET_TOPIC: &str = "asset";
pub const ATTRIBUTE_TOPIC: &str = "attribute";
pub const ATTRIBUTE_VALUE_TOPIC: &str = "attribute-value";

pub(crate) const REALM_POSITION: usize = 0;
pub(crate) const CATEGORY_POSITION: usize = 2;
pub(crate) const ADDRESS_START: usize = 3;

/// 22 character base62 identifiers.
pub const DEFAULT_ASSET_ID_PATTERN: &str = "^[0-9A-Za-z]{22}$";

/// The fixed identifier syntax that distinguishes asset ids from attribute names.
#[derive(Clone, Debug)]
pub struct AssetIdSyntax {
    pattern: Regex,
}

impl AssetIdSyntax {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn is_asset_id(&self, token: &str) -> bool {
        self.pattern.is_match(token)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TopicCategory {
    Asset,
    Attribute,
    /// Attribute events published as the bare attribute value.
    AttributeValue,
}

impl TopicCategory {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            ASSET_TOPIC => Some(TopicCategory::Asset),
            ATTRIBUTE_TOPIC => Some(TopicCategory::Attribute),
            ATTRIBUTE_VALUE_TOPIC => Some(TopicCategory::AttributeValue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicCategory::Asset => ASSET_TOPIC,
            TopicCategory::Attribute => ATTRIBUTE_TOPIC,
            TopicCategory::AttributeValue => ATTRIBUTE_VALUE_TOPIC,
        }
    }

    pub fn event_kind(&self) -> EventKind {
        match self {
            TopicCategory::Asset => EventKind::Asset,
            TopicCategory::Attribute | TopicCategory::AttributeValue => EventKind::Attribute,
        }
    }

    pub fn is_value_only(&self) -> bool {
        matches!(self, TopicCategory::AttributeValue)
    }
}

/// What one address token must look like.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Slot {
    Wildcard(Wildcard),
    /// Literal matching [`AssetIdSyntax`].
    AssetId,
    /// Literal not matching [`AssetIdSyntax`].
    AttributeName,
    /// Any literal.
    Literal,
}

impl Slot {
    fn accepts(&self, token: &str, asset_ids: &AssetIdSyntax) -> bool {
        let wildcard = Wildcard::from_token(token);
        match self {
            Slot::Wildcard(expected) => wildcard == Some(*expected),
            Slot::AssetId => wildcard.is_none() && asset_ids.is_asset_id(token),
            Slot::AttributeName => wildcard.is_none() && !asset_ids.is_asset_id(token),
            Slot::Literal => wildcard.is_none(),
        }
    }
}

/// Filter dimension populated from a token position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Restriction {
    AssetIdAt(usize),
    ParentAt(usize),
    /// Parent is unspecified: root-level assets only.
    RootParent,
    PathAt(usize),
    AttributeNameAt(usize),
}

/// Event field written into the wildcard slot when publishing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Substitution {
    /// The subscription topic has no wildcard.
    Concrete,
    AssetId,
    AttributeName,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CategoryClass {
    Asset,
    Attribute,
}

impl From<TopicCategory> for CategoryClass {
    fn from(category: TopicCategory) -> Self {
        match category {
            TopicCategory::Asset => CategoryClass::Asset,
            TopicCategory::Attribute | TopicCategory::AttributeValue => CategoryClass::Attribute,
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub(crate) struct TopicRule {
    pub(crate) class: CategoryClass,
    /// Slot kinds for tokens `ADDRESS_START..`.
    pub(crate) slots: &'static [Slot],
    pub(crate) restrictions: &'static [Restriction],
    pub(crate) substitution: Substitution,
}

impl TopicRule {
    pub(crate) fn token_count(&self) -> usize {
        ADDRESS_START + self.slots.len()
    }

    pub(crate) fn wildcard(&self) -> Option<WildcardToken> {
        self.slots
            .iter()
            .enumerate()
            .find_map(|(offset, slot)| match slot {
                Slot::Wildcard(wildcard) => Some(WildcardToken {
                    position: ADDRESS_START + offset,
                    wildcard: *wildcard,
                }),
                _ => None,
            })
    }

    fn accepts(&self, class: CategoryClass, topic: &Topic, asset_ids: &AssetIdSyntax) -> bool {
        self.class == class
            && self.token_count() == topic.len()
            && self
                .slots
                .iter()
                .zip(&topic.tokens()[ADDRESS_START..])
                .all(|(slot, token)| slot.accepts(token, asset_ids))
    }
}

use Restriction::*;
use Slot::{AssetId, AttributeName, Literal};

const SINGLE: Slot = Slot::Wildcard(Wildcard::SingleLevel);
const MULTI: Slot = Slot::Wildcard(Wildcard::MultiLevel);

/// Every accepted (category, token count, wildcard position) shape.
///
/// The asset `#` row is the only one without restrictions; no attribute row
/// may yield an unrestricted filter.
pub(crate) static TOPIC_RULES: &[TopicRule] = &[
    // realm/client/asset/#
    TopicRule {
        class: CategoryClass::Asset,
        slots: &[MULTI],
        restrictions: &[],
        substitution: Substitution::AssetId,
    },
    // realm/client/asset/+
    TopicRule {
        class: CategoryClass::Asset,
        slots: &[SINGLE],
        restrictions: &[RootParent],
        substitution: Substitution::AssetId,
    },
    // realm/client/asset/{assetId}
    TopicRule {
        class: CategoryClass::Asset,
        slots: &[AssetId],
        restrictions: &[AssetIdAt(3)],
        substitution: Substitution::Concrete,
    },
    // realm/client/attribute/{assetId}
    TopicRule {
        class: CategoryClass::Attribute,
        slots: &[AssetId],
        restrictions: &[AssetIdAt(3)],
        substitution: Substitution::Concrete,
    },
    // realm/client/attribute/{attributeName}
    TopicRule {
        class: CategoryClass::Attribute,
        slots: &[AttributeName],
        restrictions: &[AttributeNameAt(3)],
        substitution: Substitution::Concrete,
    },
    // realm/client/asset/{assetId}/#
    TopicRule {
        class: CategoryClass::Asset,
        slots: &[AssetId, MULTI],
        restrictions: &[PathAt(3)],
        substitution: Substitution::AssetId,
    },
    // realm/client/asset/{assetId}/+
    TopicRule {
        class: CategoryClass::Asset,
        slots: &[AssetId, SINGLE],
        restrictions: &[ParentAt(3)],
        substitution: Substitution::AssetId,
    },
    // realm/client/attribute/{assetId}/#
    TopicRule {
        class: CategoryClass::Attribute,
        slots: &[AssetId, MULTI],
        restrictions: &[PathAt(3)],
        substitution: Substitution::AttributeName,
    },
    // realm/client/attribute/{assetId}/+
    TopicRule {
        class: CategoryClass::Attribute,
        slots: &[AssetId, SINGLE],
        restrictions: &[ParentAt(3)],
        substitution: Substitution::AttributeName,
    },
    // realm/client/attribute/{assetId}/{attributeName}
    TopicRule {
        class: CategoryClass::Attribute,
        slots: &[AssetId, Literal],
        restrictions: &[AssetIdAt(3), AttributeNameAt(4)],
        substitution: Substitution::Concrete,
    },
    // realm/client/attribute/+/{attributeName}
    TopicRule {
        class: CategoryClass::Attribute,
        slots: &[SINGLE, Literal],
        restrictions: &[RootParent, AttributeNameAt(4)],
        substitution: Substitution::AssetId,
    },
    // realm/client/attribute/{parentId}/+/{attributeName}
    TopicRule {
        class: CategoryClass::Attribute,
        slots: &[AssetId, SINGLE, Literal],
        restrictions: &[ParentAt(3), AttributeNameAt(5)],
        substitution: Substitution::AssetId,
    },
];

/// Resolves the category and shape rule for a parsed topic.
pub(crate) fn classify(
    topic: &Topic,
    asset_ids: &AssetIdSyntax,
) -> Result<(TopicCategory, &'static TopicRule), InvalidTopic> {
    if topic.len() <= ADDRESS_START {
        return Err(InvalidTopic::new(
            topic.as_str(),
            InvalidTopicReason::TooFewTokens(topic.len()),
        ));
    }

    let category_token = topic.token(CATEGORY_POSITION).unwrap_or_default();
    let category = TopicCategory::from_token(category_token).ok_or_else(|| {
        InvalidTopic::new(
            topic.as_str(),
            InvalidTopicReason::UnsupportedCategory(category_token.to_string()),
        )
    })?;

    // Realm and client scope are always literal; only address tokens may be wildcards.
    if let Some(token) = topic.single_wildcard()? {
        if token.position < ADDRESS_START {
            return Err(InvalidTopic::new(
                topic.as_str(),
                InvalidTopicReason::UnsupportedShape,
            ));
        }
    }

    let class = CategoryClass::from(category);
    TOPIC_RULES
        .iter()
        .find(|rule| rule.accepts(class, topic, asset_ids))
        .map(|rule| (category, rule))
        .ok_or_else(|| InvalidTopic::new(topic.as_str(), InvalidTopicReason::UnsupportedShape))
}

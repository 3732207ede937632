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

//! Subscribe-side translation of topics into domain filters.

use crate::error::InvalidTopic;
use crate::model::DomainFilter;
use crate::routing::topic::{Topic, WildcardToken};
use crate::routing::topic_rules::{
    classify, AssetIdSyntax, Restriction, TopicCategory, TopicRule, REALM_POSITION,
};

/// A subscription topic resolved against its shape rule.
///
/// Holds the derived filter next to the rule that produced it so the
/// publish-side rewrite uses the same row.
#[derive(Clone, Debug)]
pub struct TopicBinding {
    topic: Topic,
    category: TopicCategory,
    rule: &'static TopicRule,
    filter: DomainFilter,
}

impl TopicBinding {
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn category(&self) -> TopicCategory {
        self.category
    }

    pub fn filter(&self) -> &DomainFilter {
        &self.filter
    }

    pub fn realm(&self) -> &str {
        &self.filter.realm
    }

    pub fn wildcard(&self) -> Option<WildcardToken> {
        self.rule.wildcard()
    }

    pub(crate) fn rule(&self) -> &'static TopicRule {
        self.rule
    }
}

/// Builds [`DomainFilter`]s from subscription topics.
#[derive(Clone, Debug)]
pub struct FilterBuilder {
    asset_ids: AssetIdSyntax,
}

impl FilterBuilder {
    pub fn new(asset_ids: AssetIdSyntax) -> Self {
        Self { asset_ids }
    }

    pub fn asset_ids(&self) -> &AssetIdSyntax {
        &self.asset_ids
    }

    /// Derives the filter for a parsed topic.
    pub fn build(&self, topic: &Topic) -> Result<DomainFilter, InvalidTopic> {
        self.bind(topic.clone()).map(|binding| binding.filter)
    }

    /// Parses and binds a raw topic string.
    pub fn bind_str(&self, raw: &str) -> Result<TopicBinding, InvalidTopic> {
        self.bind(Topic::parse(raw)?)
    }

    pub fn bind(&self, topic: Topic) -> Result<TopicBinding, InvalidTopic> {
        let (category, rule) = classify(&topic, &self.asset_ids)?;
        let realm = topic.token(REALM_POSITION).unwrap_or_default();
        let mut filter = DomainFilter::new(realm, category.event_kind());

        for restriction in rule.restrictions {
            apply_restriction(&mut filter, *restriction, &topic);
        }

        Ok(TopicBinding {
            topic,
            category,
            rule,
            filter,
        })
    }
}

fn apply_restriction(filter: &mut DomainFilter, restriction: Restriction, topic: &Topic) {
    let token = |position: usize| topic.token(position).unwrap_or_default().to_string();

    match restriction {
        Restriction::AssetIdAt(position) => filter.asset_ids.push(token(position)),
        Restriction::ParentAt(position) => filter.parent_ids.push(Some(token(position))),
        Restriction::RootParent => filter.parent_ids.push(None),
        Restriction::PathAt(position) => filter.paths.push(token(position)),
        Restriction::AttributeNameAt(position) => filter.attribute_names.push(token(position)),
    }
}

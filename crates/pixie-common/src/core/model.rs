// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Domain records for the tagged-post corpus.
//!
//! The wire format is one JSON object per line with string-encoded integer
//! ids and single-character enum tokens; the deserializers here are strict
//! about the token sets and lenient about absent fields.

use crate::core::id::Id;
use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Category of a tag label.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
#[repr(i8)]
pub enum TagCategory {
    #[default]
    Unspecified = -1,
    General = 0,
    Artist = 1,
    Copyright = 3,
    Character = 4,
    Meta = 5,
}

impl<'de> Deserialize<'de> for TagCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None => Ok(TagCategory::Unspecified),
            Some("0") => Ok(TagCategory::General),
            Some("1") => Ok(TagCategory::Artist),
            Some("3") => Ok(TagCategory::Copyright),
            Some("4") => Ok(TagCategory::Character),
            Some("5") => Ok(TagCategory::Meta),
            Some(other) => Err(de::Error::custom(format!(
                "tag category must be one of general (0), artist (1), \
                 copyright (3), character (4), or meta (5), got '{other}'"
            ))),
        }
    }
}

/// Content rating of a post.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
#[repr(i8)]
pub enum ContentRating {
    #[default]
    Unspecified = -1,
    Safe = 0,
    Questionable = 1,
    Explicit = 2,
}

impl<'de> Deserialize<'de> for ContentRating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None => Ok(ContentRating::Unspecified),
            Some("s") => Ok(ContentRating::Safe),
            Some("q") => Ok(ContentRating::Questionable),
            Some("e") => Ok(ContentRating::Explicit),
            Some(other) => Err(de::Error::custom(format!(
                "invalid content-rating token '{other}' (must be one of 's', 'q', or 'e')"
            ))),
        }
    }
}

fn i64_from_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse::<i64>()
        .map_err(|e| de::Error::custom(format!("id '{raw}' is not an integer: {e}")))
}

/// A tag label attached to posts.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Tag {
    #[serde(deserialize_with = "i64_from_string")]
    pub id: i64,
    #[serde(default)]
    pub category: TagCategory,
    #[serde(default)]
    pub name: String,
}

impl Tag {
    pub fn node_id(&self) -> Id {
        Id::tag(self.id)
    }
}

/// A tagged item.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Post {
    #[serde(deserialize_with = "i64_from_string")]
    pub id: i64,
    #[serde(default)]
    pub rating: ContentRating,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Post {
    pub fn node_id(&self) -> Id {
        Id::post(self.id)
    }
}

//! Gameplay tags - dotted hierarchical labels carried by damage events

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A dotted hierarchical tag such as `Damage.Type.Fire`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameplayTag(String);

impl GameplayTag {
    pub fn new(tag: impl Into<String>) -> Self {
        GameplayTag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this tag equals `parent` or sits below it in the hierarchy
    ///
    /// `Damage.Type.Fire` matches `Damage.Type` and `Damage`, but not `Damage.Ty`.
    pub fn matches(&self, parent: &GameplayTag) -> bool {
        match self.0.strip_prefix(parent.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }
}

impl From<&str> for GameplayTag {
    fn from(s: &str) -> Self {
        GameplayTag(s.to_string())
    }
}

impl From<String> for GameplayTag {
    fn from(s: String) -> Self {
        GameplayTag(s)
    }
}

impl fmt::Display for GameplayTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered set of gameplay tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<GameplayTag>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<GameplayTag>) -> bool {
        self.0.insert(tag.into())
    }

    pub fn with(mut self, tag: impl Into<GameplayTag>) -> Self {
        self.insert(tag);
        self
    }

    /// Exact membership, no hierarchy
    pub fn has_exact(&self, tag: &GameplayTag) -> bool {
        self.0.contains(tag)
    }

    /// Whether any tag in the set is `tag` or one of its children
    pub fn has(&self, tag: &GameplayTag) -> bool {
        self.0.iter().any(|t| t.matches(tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameplayTag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Into<GameplayTag>> FromIterator<T> for TagSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        TagSet(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.iter().map(GameplayTag::as_str).collect();
        write!(f, "[{}]", joined.join(", "))
    }
}

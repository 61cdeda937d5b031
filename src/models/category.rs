//! Category model
//!
//! A category is a case-insensitive named tag shared by transactions and
//! budgets. The display casing is whatever the category was first created
//! with; lookups and equality ignore case.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{FinanceError, FinanceResult};

/// A named transaction/budget category
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Category {
    name: String,
}

impl Category {
    /// Create a category from a user-supplied name
    ///
    /// The name is trimmed; a blank name is rejected.
    pub fn new(name: &str) -> FinanceResult<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(FinanceError::InvalidInput(
                "Category name cannot be empty".into(),
            ));
        }
        Ok(Self {
            name: trimmed.to_string(),
        })
    }

    /// The display name, in its original casing
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercase key used by the wallet's budget index
    pub fn normalized(&self) -> String {
        normalize(&self.name)
    }

    /// Case-insensitive comparison against a raw name
    pub fn matches_name(&self, name: &str) -> bool {
        self.normalized() == normalize(name)
    }
}

/// Normalize a raw category name into an index key
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Category::new(&raw).map_err(serde::de::Error::custom)
    }
}

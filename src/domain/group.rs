use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

lazy_static! {
    static ref GROUP_NAME: Regex =
        Regex::new(r"^[A-Za-z]{2,24}$").expect("group name pattern is valid");
}

/// Name of a tenant. Every persisted entity belongs to exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(String);

impl Group {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        if !GROUP_NAME.is_match(name) {
            return Err(ValidationError::new(format!(
                "Invalid group name: {name}"
            )));
        }
        Ok(Self(name.to_lowercase()))
    }
}

impl AsRef<str> for Group {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// src/models.rs
use serde::{Deserialize, Serialize};

/// Which character pools were enabled when a password was generated.
///
/// Persisted alongside every entry as a `{pool-name: bool}` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolOptions {
    #[serde(default)]
    pub digits: bool,
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub uppercase: bool,
    #[serde(default)]
    pub lowercase: bool,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            digits: true,
            special: true,
            uppercase: true,
            lowercase: true,
        }
    }
}

impl PoolOptions {
    pub const fn none() -> Self {
        Self {
            digits: false,
            special: false,
            uppercase: false,
            lowercase: false,
        }
    }

    // Names of the enabled pools, in the order they are printed
    pub fn enabled_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.digits {
            names.push("digits");
        }
        if self.special {
            names.push("special");
        }
        if self.uppercase {
            names.push("uppercase");
        }
        if self.lowercase {
            names.push("lowercase");
        }
        names
    }
}

/// One persisted record of a generated password. Holds the digest, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub label: String,
    pub hash: String,
    pub length: usize,
    #[serde(default = "PoolOptions::none")]
    pub options: PoolOptions,
    pub created_at: String,
}

impl StoredEntry {
    // Two records describe the same entry when label, digest and creation time agree
    pub fn same_identity(&self, other: &StoredEntry) -> bool {
        self.label == other.label && self.hash == other.hash && self.created_at == other.created_at
    }
}

// src/generators/charset.rs
//! Character pools a password is drawn from.

use super::{GeneratorError, Result};
use crate::models::PoolOptions;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// Punctuation that survives being pasted into a shell argument:
/// no quotes, backslash, backtick or whitespace.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()-_=+[]{};:,.?/<>|~";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Lowercase,
    Uppercase,
    Digit,
    Special,
}

impl Pool {
    pub fn chars(&self) -> &'static [u8] {
        match self {
            Pool::Lowercase => LOWERCASE,
            Pool::Uppercase => UPPERCASE,
            Pool::Digit => DIGITS,
            Pool::Special => SPECIAL_CHARACTERS.as_bytes(),
        }
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.chars().contains(&(c as u8))
    }
}

/// Ordered, non-empty list of active pools.
///
/// Order is always lowercase, uppercase, digit, special; the generator draws its
/// guaranteed characters in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetPolicy {
    pools: Vec<Pool>,
}

impl CharsetPolicy {
    pub fn new(
        include_lower: bool,
        include_upper: bool,
        include_digits: bool,
        include_special: bool,
    ) -> Result<Self> {
        let mut pools = Vec::with_capacity(4);
        if include_lower {
            pools.push(Pool::Lowercase);
        }
        if include_upper {
            pools.push(Pool::Uppercase);
        }
        if include_digits {
            pools.push(Pool::Digit);
        }
        if include_special {
            pools.push(Pool::Special);
        }

        if pools.is_empty() {
            return Err(GeneratorError::NoPoolsSelected);
        }
        Ok(Self { pools })
    }

    pub fn from_options(options: &PoolOptions) -> Result<Self> {
        Self::new(
            options.lowercase,
            options.uppercase,
            options.digits,
            options.special,
        )
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Flat union of every active pool.
    pub fn alphabet(&self) -> Vec<u8> {
        self.pools.iter().flat_map(|pool| pool.chars().iter().copied()).collect()
    }

    pub fn options(&self) -> PoolOptions {
        PoolOptions {
            digits: self.pools.contains(&Pool::Digit),
            special: self.pools.contains(&Pool::Special),
            uppercase: self.pools.contains(&Pool::Uppercase),
            lowercase: self.pools.contains(&Pool::Lowercase),
        }
    }
}

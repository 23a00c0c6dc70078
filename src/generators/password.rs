// src/generators/password.rs
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

use super::{CharsetPolicy, GeneratorError, Result};
use crate::models::PoolOptions;

/// A validated generation request: `length` is at least the number of active pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRequest {
    length: usize,
    policy: CharsetPolicy,
}

impl PasswordRequest {
    pub fn new(length: usize, policy: CharsetPolicy) -> Result<Self> {
        let required = policy.len();
        if length < required {
            return Err(GeneratorError::LengthTooShort { length, required });
        }
        Ok(Self { length, policy })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn policy(&self) -> &CharsetPolicy {
        &self.policy
    }
}

/// Draws a password from the OS CSPRNG.
///
/// One character is taken from each active pool, the rest uniformly from the flat
/// union of all pools, and the whole sequence is shuffled.
pub fn generate(request: &PasswordRequest) -> String {
    let mut rng = OsRng;
    let pools = request.policy.pools();

    let mut chars: Vec<u8> = Vec::with_capacity(request.length);
    for pool in pools {
        if let Some(c) = pool.chars().choose(&mut rng) {
            chars.push(*c);
        }
    }

    let alphabet = request.policy.alphabet();
    while chars.len() < request.length {
        match alphabet.choose(&mut rng) {
            Some(c) => chars.push(*c),
            None => break,
        }
    }

    chars.shuffle(&mut rng);
    chars.into_iter().map(char::from).collect()
}

/// Validates `length` against `options` and generates in one step.
pub fn generate_password(length: usize, options: &PoolOptions) -> Result<String> {
    let policy = CharsetPolicy::from_options(options)?;
    let request = PasswordRequest::new(length, policy)?;
    Ok(generate(&request))
}

//! Pedigree ID Sequence
//!
//! Suggests the next business identifier (fixed prefix plus a zero-padded
//! number) from the greatest identifier already stored.
//!
//! The result is a hint, not an allocation: two callers reading before
//! either writes get the same suggestion. The repository's unique
//! constraint on `pedigree_id` rejects the second insert.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::pedigree::PedigreeRepository;

pub const DEFAULT_PREFIX: &str = "JCU";
pub const DEFAULT_WIDTH: usize = 7;

// == ID Scheme ==
/// Shape of the identifier: `prefix` followed by `width` digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdScheme {
    pub prefix: String,
    pub width: usize,
}

impl Default for IdScheme {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_WIDTH)
    }
}

impl IdScheme {
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width: width.max(1),
        }
    }

    /// First identifier of the sequence, e.g. `JCU0000001`.
    pub fn seed(&self) -> String {
        self.render(1)
    }

    /// Renders `number` zero-padded to the scheme width.
    pub fn render(&self, number: u64) -> String {
        format!("{}{:0width$}", self.prefix, number, width = self.width)
    }

    /// Largest number that still fits the width.
    fn max_number(&self) -> u64 {
        // 10^20 overflows u64, so wider schemes are bounded by u64 itself
        u32::try_from(self.width)
            .ok()
            .and_then(|w| 10u64.checked_pow(w))
            .map(|p| p - 1)
            .unwrap_or(u64::MAX)
    }

    // == Next After ==
    /// Computes the identifier following `latest`.
    ///
    /// - no latest identifier: the seed
    /// - latest without trailing digits: the seed
    /// - otherwise: trailing number + 1, re-padded under this scheme's prefix
    ///
    /// Fails with [`AppError::SequenceExhausted`] when the next number no
    /// longer fits the fixed width.
    pub fn next_after(&self, latest: Option<&str>) -> Result<String> {
        let Some(latest) = latest else {
            return Ok(self.seed());
        };

        let Some(digits) = trailing_digits(latest) else {
            warn!(
                "Latest pedigree ID '{}' has no numeric suffix, restarting at seed",
                latest
            );
            return Ok(self.seed());
        };

        let current: u64 = digits.parse().map_err(|_| {
            AppError::SequenceExhausted(format!("numeric suffix of '{}' is out of range", latest))
        })?;

        let next = current
            .checked_add(1)
            .filter(|n| *n <= self.max_number())
            .ok_or_else(|| {
                AppError::SequenceExhausted(format!(
                    "'{}' is the last {}-digit identifier",
                    latest, self.width
                ))
            })?;

        Ok(self.render(next))
    }
}

/// Maximal run of ASCII digits at the end of `id`.
fn trailing_digits(id: &str) -> Option<&str> {
    let start = id
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    Some(&id[start..])
}

// == Generator ==
/// Reads the current maximum identifier from the store and suggests the next.
#[derive(Clone)]
pub struct PedigreeIdGenerator {
    scheme: IdScheme,
    repository: Arc<dyn PedigreeRepository>,
}

impl PedigreeIdGenerator {
    pub fn new(scheme: IdScheme, repository: Arc<dyn PedigreeRepository>) -> Self {
        Self { scheme, repository }
    }

    pub fn scheme(&self) -> &IdScheme {
        &self.scheme
    }

    /// Suggests the next pedigree identifier.
    ///
    /// A failed store read is returned as-is; nothing is retried.
    pub async fn next_id(&self) -> Result<String> {
        let latest = self.repository.latest_pedigree_id().await?;
        let next = self.scheme.next_after(latest.as_deref())?;
        debug!("Suggested next pedigree ID {} (latest: {:?})", next, latest);
        Ok(next)
    }
}

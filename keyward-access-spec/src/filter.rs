//! Client-side filters over full listings.
//!
//! The list API has no native filtering, so every filtered read is a full
//! scan. Secret filters are compiled up front and reject malformed input
//! before any network call; target set filters are evaluated leniently per
//! item. The divergence is intentional and pinned by tests.

use crate::details;
use crate::error::{Error, Result};
use crate::types::{Secret, SecretKind, TargetSet};
use regex::Regex;
use std::str::FromStr;

/// Query object for [`Secret`] listings. Empty fields are ignored; the rest
/// are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretsFilter {
    /// Exact secret kind; must name a member of the closed set.
    pub secret_type: String,
    /// Regular expression searched against the secret name.
    pub name: String,
    /// Tri-state token: `"true"`, `"false"` or empty, case-insensitive.
    pub is_active: String,
    /// Regular expression searched against the `account_domain` detail value.
    pub account_domain: String,
}

impl SecretsFilter {
    /// Validate the filter and compile its patterns. Fails without touching
    /// the network.
    pub fn compile(&self) -> Result<CompiledSecretsFilter> {
        let kind = if self.secret_type.is_empty() {
            None
        } else {
            Some(SecretKind::from_str(&self.secret_type)?)
        };
        Ok(CompiledSecretsFilter {
            kind,
            active: parse_bool_token(&self.is_active, "is_active")?,
            name: compile_pattern(&self.name, "name")?,
            account_domain: compile_pattern(&self.account_domain, "account_domain")?,
        })
    }
}

/// A validated [`SecretsFilter`], ready to scan with.
#[derive(Debug, Clone)]
pub struct CompiledSecretsFilter {
    kind: Option<SecretKind>,
    active: Option<bool>,
    name: Option<Regex>,
    account_domain: Option<Regex>,
}

impl CompiledSecretsFilter {
    /// Matching is case-sensitive throughout the regex path. A secret whose
    /// details lack a textual `account_domain` is excluded by a domain
    /// filter, never erred.
    pub fn matches(&self, secret: &Secret) -> bool {
        if let Some(active) = self.active {
            if secret.is_active != active {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if secret.secret_type != kind {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !name.is_match(&secret.secret_name) {
                return false;
            }
        }
        if let Some(domain) = &self.account_domain {
            match details::account_domain(&secret.secret_details) {
                Some(value) if domain.is_match(value) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Query object for [`TargetSet`] listings. Both fields are regular
/// expressions, applied only when non-empty, ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSetsFilter {
    pub name: String,
    pub secret_type: String,
}

impl TargetSetsFilter {
    pub fn matches(&self, target_set: &TargetSet) -> bool {
        lenient_match(&self.name, &target_set.name)
            && lenient_match(&self.secret_type, &target_set.secret_type)
    }
}

// An empty pattern matches everything; a pattern that fails to compile
// matches nothing.
fn lenient_match(pattern: &str, text: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }
    match Regex::new(pattern) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

fn parse_bool_token(token: &str, field: &'static str) -> Result<Option<bool>> {
    if token.is_empty() {
        Ok(None)
    } else if token.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if token.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else {
        Err(Error::InvalidBoolToken {
            field,
            value: token.to_string(),
        })
    }
}

fn compile_pattern(pattern: &str, field: &'static str) -> Result<Option<Regex>> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern).map(Some).map_err(|err| Error::InvalidPattern {
        field,
        reason: err.to_string(),
    })
}

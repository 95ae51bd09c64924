//! Scope policy deciding which discovered references belong to a crawl
//!
//! Two modes exist. In exact mode a candidate's host must be one of a fixed
//! set (the seed host plus an optional `Host` header override). In subdomain
//! mode the raw URL text is matched against the seed host preceded by `.` or
//! `//`. The subdomain check is textual: `https://example.com.evil.com/` and
//! `https://x.test/?next=.example.com` both count as inside `example.com`.

use crate::url::domain::host_of;
use crate::{UrlError, UrlResult};
use regex::Regex;
use std::collections::HashSet;

/// How a crawl decides whether a discovered URL is in scope
#[derive(Debug, Clone)]
pub enum ScopePolicy {
    /// Candidate host must be an exact member of the set
    ExactSet(HashSet<String>),

    /// Candidate URL text must contain the seed host after `.` or `//`
    SubdomainSuffix {
        /// The seed's network location
        seed_host: String,
        /// Compiled boundary pattern for `seed_host`
        pattern: Regex,
    },
}

impl ScopePolicy {
    /// Builds an exact-match policy from the seed host and an optional
    /// virtual host taken from a `Host` request header
    pub fn exact(seed_host: &str, virtual_host: Option<&str>) -> Self {
        let mut allowed = HashSet::new();
        allowed.insert(seed_host.to_lowercase());
        if let Some(host) = virtual_host {
            allowed.insert(host.trim().to_lowercase());
        }
        Self::ExactSet(allowed)
    }

    /// Builds a subdomain-suffix policy for the seed host
    pub fn subdomain(seed_host: &str) -> UrlResult<Self> {
        let expr = format!(r"(\.|//){}((#|/|\?).*)?", regex::escape(seed_host));
        let pattern = Regex::new(&expr)
            .map_err(|e| UrlError::Parse(format!("scope pattern for {}: {}", seed_host, e)))?;
        Ok(Self::SubdomainSuffix {
            seed_host: seed_host.to_string(),
            pattern,
        })
    }

    /// Selects the policy for a crawl
    ///
    /// With `subdomains` enabled the allowed-host set is bypassed entirely,
    /// including any `Host` header override.
    ///
    /// # Arguments
    ///
    /// * `seed_host` - Network location of the seed URL
    /// * `virtual_host` - Value of a `Host` request header, if one was configured
    /// * `subdomains` - Whether subdomain-suffix matching is enabled
    pub fn for_seed(
        seed_host: &str,
        virtual_host: Option<&str>,
        subdomains: bool,
    ) -> UrlResult<Self> {
        if subdomains {
            Self::subdomain(seed_host)
        } else {
            Ok(Self::exact(seed_host, virtual_host))
        }
    }

    /// Returns true if the candidate URL is eligible for emission and traversal
    ///
    /// Depth is not considered here; the engine enforces it.
    pub fn is_in_scope(&self, candidate: &str) -> bool {
        match self {
            Self::ExactSet(allowed) => match host_of(candidate) {
                Some(host) => allowed.contains(&host),
                None => false,
            },
            Self::SubdomainSuffix { pattern, .. } => pattern.is_match(candidate),
        }
    }

    /// Returns true if this policy uses subdomain-suffix matching
    pub fn is_subdomain_mode(&self) -> bool {
        matches!(self, Self::SubdomainSuffix { .. })
    }
}

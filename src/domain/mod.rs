//! Domain extraction for login URLs.
//!
//! Every stored URL is split into `(subdomain, domain, suffix)` using a
//! public-suffix aware rule, so `sub.example.co.uk` yields `example` +
//! `co.uk`. Two strings are then derived from the parts:
//!
//! - the **root domain** (`example.co.uk`), which groups all sites of one
//!   account family together, and
//! - the **display domain**, which keeps a non-`www` subdomain
//!   (`app.example.co.uk`) and is used to tell distinct sites apart.
//!
//! Parsing never fails. Anything that cannot be understood produces empty
//! components.

use std::collections::BTreeSet;
use std::net::{Ipv4Addr, Ipv6Addr};

/// The parsed host of one URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DomainParts {
    pub subdomain: String,
    pub domain: String,
    pub suffix: String,
}

impl DomainParts {
    /// `domain.suffix`, with the subdomain dropped entirely.
    pub fn root_domain(&self) -> String {
        join_non_empty(&[&self.domain, &self.suffix])
    }

    /// The full host, except that a `www` subdomain collapses to the root domain.
    pub fn display_domain(&self) -> String {
        if self.subdomain == "www" {
            self.root_domain()
        } else {
            join_non_empty(&[&self.subdomain, &self.domain, &self.suffix])
        }
    }
}

/// Parse a URL (or a bare host) into its domain parts.
///
/// E.g., "https://mail.example.com/inbox" -> ("mail", "example", "com")
/// E.g., "sub.example.co.uk" -> ("sub", "example", "co.uk")
/// E.g., "http://192.168.1.1:8080" -> ("", "192.168.1.1", "")
pub fn parse_domain_parts(url: &str) -> DomainParts {
    let host = extract_host(url);
    if host.is_empty() {
        return DomainParts::default();
    }

    if host.parse::<Ipv4Addr>().is_ok() || host.starts_with('[') {
        return DomainParts {
            domain: host,
            ..DomainParts::default()
        };
    }

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.is_empty() {
        return DomainParts::default();
    }
    let suffix_len = public_suffix_labels(&labels.join("."));
    if suffix_len == 0 {
        // No listed suffix, e.g. "localhost" or an internal TLD.
        let (domain, subdomain) = labels.split_last().map_or(("", &[][..]), |(d, s)| (*d, s));
        return DomainParts {
            subdomain: subdomain.join("."),
            domain: domain.to_string(),
            suffix: String::new(),
        };
    }

    let suffix_start = labels.len().saturating_sub(suffix_len);
    let suffix = labels[suffix_start..].join(".");
    if suffix_start == 0 {
        // The host is a bare public suffix such as "co.uk".
        return DomainParts {
            suffix,
            ..DomainParts::default()
        };
    }

    DomainParts {
        subdomain: labels[..suffix_start - 1].join("."),
        domain: labels[suffix_start - 1].to_string(),
        suffix,
    }
}

/// Number of trailing labels of `host` that form an ICANN public suffix, or 0
/// when the host ends in no listed suffix.
///
/// Suffixes from the private section of the list (`github.io`)
/// are skipped in favour of the ICANN suffix beneath them.
fn public_suffix_labels(host: &str) -> usize {
    let mut name = host;
    loop {
        let Some(suffix) = psl::suffix(name.as_bytes()) else {
            return 0;
        };
        let len = suffix.as_bytes().len();
        let matched = &name[name.len() - len..];
        match suffix.typ() {
            Some(psl::Type::Icann) => return matched.split('.').count(),
            Some(psl::Type::Private) => match matched.split_once('.') {
                Some((_, shorter)) => name = shorter,
                None => return 0,
            },
            None => return 0,
        }
    }
}

/// Root domains referenced by a set of parsed URLs.
pub fn root_domains(parts: &[DomainParts]) -> BTreeSet<String> {
    parts.iter().map(DomainParts::root_domain).collect()
}

/// Display domains referenced by a set of parsed URLs.
pub fn display_domains(parts: &[DomainParts]) -> BTreeSet<String> {
    parts.iter().map(DomainParts::display_domain).collect()
}

/// Strip scheme, credentials, port, path, query and fragment from a URL.
/// Returns the lowercased host, or an empty string if nothing is left.
fn extract_host(url: &str) -> String {
    let mut rest = url.trim();

    if let Some(pos) = rest.find("://") {
        rest = &rest[pos + 3..];
    } else if let Some(stripped) = rest.strip_prefix("//") {
        rest = stripped;
    }

    if let Some(pos) = rest.find(['/', '?', '#']) {
        rest = &rest[..pos];
    }

    if let Some(pos) = rest.rfind('@') {
        rest = &rest[pos + 1..];
    }

    if rest.starts_with('[') {
        // IPv6 literal, keep the brackets and drop any port
        return match rest.find(']') {
            Some(end) if rest[1..end].parse::<Ipv6Addr>().is_ok() => rest[..=end].to_lowercase(),
            _ => String::new(),
        };
    }

    if let Some(pos) = rest.find(':') {
        rest = &rest[..pos];
    }

    rest.trim_matches('.').to_lowercase()
}

fn join_non_empty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(".")
}

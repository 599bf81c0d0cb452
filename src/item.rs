//! Login items as listed by the vault CLI, with lazily derived fields.
//!
//! Domain parts and the password are computed on first access and cached on
//! the item for the rest of the run. The OTP is fetched on every call since a
//! code is only meaningful at the moment it is read.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use crate::domain::{self, DomainParts};
use crate::error::DedupeResult;
use crate::vault_client::VaultClient;

/// The vault an item belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// One URL stored on an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUrl {
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub primary: bool,
}

/// A login item record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub vault: VaultRef,
    #[serde(default)]
    pub urls: Vec<ItemUrl>,
    /// The account identifier; the vault CLI reports it as additional information.
    #[serde(rename = "additional_information", default)]
    pub username: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    /// Set when the item was already trashed before the run, or when this run removed it.
    #[serde(default, deserialize_with = "deserialize_trashed")]
    pub trashed: bool,

    #[serde(skip)]
    domain_parts: Option<Vec<DomainParts>>,
    /// `Some(None)` records a retrieval that failed, so it is not retried.
    #[serde(skip)]
    password: Option<Option<String>>,
}

impl LoginItem {
    /// Create an item that has not been trashed or favorited.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        vault_name: impl Into<String>,
        urls: &[&str],
        username: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            vault: VaultRef {
                id: String::new(),
                name: vault_name.into(),
            },
            urls: urls
                .iter()
                .map(|href| ItemUrl {
                    href: (*href).to_string(),
                    primary: false,
                })
                .collect(),
            username: username.map(String::from),
            favorite: false,
            trashed: false,
            domain_parts: None,
            password: None,
        }
    }

    /// Decode the JSON array printed by `op item list --format=json`.
    pub fn list_from_json(json: &str) -> DedupeResult<Vec<LoginItem>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn vault_name(&self) -> &str {
        &self.vault.name
    }

    /// The vault id, or the name for items built without one.
    pub fn vault_id(&self) -> &str {
        if self.vault.id.is_empty() {
            &self.vault.name
        } else {
            &self.vault.id
        }
    }

    pub fn has_urls(&self) -> bool {
        !self.urls.is_empty()
    }

    /// Parsed parts of every URL, computed once per item.
    pub fn domain_parts(&mut self) -> &[DomainParts] {
        self.domain_parts.get_or_insert_with(|| {
            self.urls
                .iter()
                .map(|url| domain::parse_domain_parts(&url.href))
                .collect()
        })
    }

    /// Root domains (`example.com`) the item's URLs point at.
    pub fn root_domains(&mut self) -> BTreeSet<String> {
        domain::root_domains(self.domain_parts())
    }

    /// Sites (`app.example.com`, with `www` collapsed) the item's URLs point at.
    pub fn display_domains(&mut self) -> BTreeSet<String> {
        domain::display_domains(self.domain_parts())
    }

    /// The item's password, fetched from the vault on first use.
    ///
    /// A failed fetch is logged, cached and reported as `None`.
    pub fn password<C: VaultClient + ?Sized>(&mut self, client: &C) -> Option<&str> {
        if self.password.is_none() {
            let fetched = match client.password(self.vault_id(), &self.id) {
                Ok(password) => Some(password),
                Err(e) => {
                    tracing::warn!(item_id = %self.id, title = %self.title, error = %e, "Password retrieval failed");
                    None
                }
            };
            self.password = Some(fetched);
        }
        self.password.as_ref().and_then(|p| p.as_deref())
    }

    /// Whether the item currently exposes a one-time password.
    /// Retrieval failures count as no OTP.
    pub fn has_otp<C: VaultClient + ?Sized>(&self, client: &C) -> bool {
        match client.otp(&self.id) {
            Ok(code) => code.is_some(),
            Err(e) => {
                tracing::debug!(item_id = %self.id, error = %e, "No OTP available");
                false
            }
        }
    }
}

/// Any present value other than `null` or `false` marks the item as trashed.
fn deserialize_trashed<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(!matches!(
        value,
        serde_json::Value::Null | serde_json::Value::Bool(false)
    ))
}

//! The vault collaborator: listing login items, reading secrets and removing items.

mod op_cli;

pub use op_cli::OpCli;

use crate::error::DedupeResult;
use crate::item::LoginItem;

/// Restricts which items are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Only list items from this vault (name or id).
    pub vault: Option<String>,
    /// Only list items carrying one of these tags.
    pub tags: Vec<String>,
}

/// Access to a password vault.
///
/// Every call is synchronous and blocks the run until the vault answers.
pub trait VaultClient {
    /// List all login items matching `filter`.
    fn list_login_items(&self, filter: &ItemFilter) -> DedupeResult<Vec<LoginItem>>;

    /// Read an item's password. The vault is addressed by id.
    fn password(&self, vault_id: &str, item_id: &str) -> DedupeResult<String>;

    /// Read an item's current one-time password, if it has one.
    fn otp(&self, item_id: &str) -> DedupeResult<Option<u32>>;

    /// Permanently delete an item, or move it to the archive when `archive` is set.
    fn delete_item(&self, item_id: &str, archive: bool) -> DedupeResult<()>;
}

impl<T: VaultClient + ?Sized> VaultClient for &T {
    fn list_login_items(&self, filter: &ItemFilter) -> DedupeResult<Vec<LoginItem>> {
        (**self).list_login_items(filter)
    }

    fn password(&self, vault_id: &str, item_id: &str) -> DedupeResult<String> {
        (**self).password(vault_id, item_id)
    }

    fn otp(&self, item_id: &str) -> DedupeResult<Option<u32>> {
        (**self).otp(item_id)
    }

    fn delete_item(&self, item_id: &str, archive: bool) -> DedupeResult<()> {
        (**self).delete_item(item_id, archive)
    }
}

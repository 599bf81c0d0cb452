//! Reporting, confirming and performing the removal of a discarded item.

use std::collections::BTreeSet;
use std::io::Write;

use super::DedupeOptions;
use crate::confirm::Confirm;
use crate::error::{DedupeError, DedupeResult};
use crate::item::LoginItem;
use crate::vault_client::VaultClient;

/// What happened to a discarded item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// Dry run: reported only.
    WouldDelete,
    Deleted,
    Archived,
    /// The operator declined; the item stays live for the rest of the run.
    Aborted,
}

/// Removes discarded items according to the run's [`DedupeOptions`].
pub struct DeletionExecutor<'a, C: ?Sized, P, W> {
    client: &'a C,
    confirm: P,
    out: W,
    options: DedupeOptions,
}

impl<'a, C, P, W> DeletionExecutor<'a, C, P, W>
where
    C: VaultClient + ?Sized,
    P: Confirm,
    W: Write,
{
    pub fn new(client: &'a C, confirm: P, out: W, options: DedupeOptions) -> Self {
        Self {
            client,
            confirm,
            out,
            options,
        }
    }

    /// Remove `item`, unless this is a dry run or the operator declines.
    ///
    /// The item is marked trashed in memory for every outcome except
    /// [`DeletionOutcome::Aborted`]. A failed delete or archive call is
    /// returned as [`DedupeError::Mutation`] and leaves the item untouched.
    pub fn execute(&mut self, item: &mut LoginItem) -> DedupeResult<DeletionOutcome> {
        let username = item.username.clone().unwrap_or_else(|| "<none>".to_string());
        let sites = describe_sites(&item.display_domains());

        if self.options.dry_run {
            let password = self.password_for_report(item)?;
            writeln!(
                self.out,
                "To delete duplicate item {}, username {}, with password {} in vault {} for {}, run again without the dry run flag.",
                item.title,
                username,
                password,
                item.vault_name(),
                sites,
            )?;
            item.trashed = true;
            return Ok(DeletionOutcome::WouldDelete);
        }

        if self.options.prompt {
            let password = self.password_for_report(item)?;
            let question = format!(
                "Are you sure you want to delete duplicate item {}, username {}, password {} in vault {} for {}?",
                item.title,
                username,
                password,
                item.vault_name(),
                sites,
            );
            if !self.confirm.confirm(&question)? {
                writeln!(self.out, "Kept duplicate item {}, username {}", item.title, username)?;
                tracing::info!(item_id = %item.id, "Removal declined by operator");
                return Ok(DeletionOutcome::Aborted);
            }
        }

        let (action, verb, outcome) = if self.options.archive {
            ("archive", "Archived", DeletionOutcome::Archived)
        } else {
            ("delete", "Deleted", DeletionOutcome::Deleted)
        };

        self.client
            .delete_item(&item.id, self.options.archive)
            .map_err(|e| DedupeError::Mutation {
                action,
                item_id: item.id.clone(),
                title: item.title.clone(),
                message: e.to_string(),
            })?;

        writeln!(self.out, "{} duplicate item {}, username {} for {}", verb, item.title, username, sites)?;
        tracing::info!(item_id = %item.id, action, "Removed duplicate item");
        item.trashed = true;
        Ok(outcome)
    }

    /// The password for a status line, or a placeholder after printing a notice.
    fn password_for_report(&mut self, item: &mut LoginItem) -> DedupeResult<String> {
        match item.password(self.client).map(str::to_owned) {
            Some(password) => Ok(password),
            None => {
                writeln!(self.out, "Could not retrieve password for {}", item.title)?;
                Ok("<unavailable>".to_string())
            }
        }
    }
}

/// "site a.com" or "sites a.com, b.com".
fn describe_sites(domains: &BTreeSet<String>) -> String {
    let plural = if domains.len() > 1 { "s" } else { "" };
    let joined = domains.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    format!("site{plural} {joined}")
}

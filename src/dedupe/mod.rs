//! Duplicate detection and removal.
//!
//! Items are scanned once, in input order. Each item is keyed by
//! `(root domain, username)` for every root domain its URLs touch, and a
//! [`UniqueIndex`] remembers which item currently holds each key. When a
//! second item lands on a held key the two are compared:
//!
//! 1. Items on different sites (display domains differ) with different
//!    passwords are not duplicates and are both left alone.
//! 2. Otherwise the item with an OTP wins; with equal OTP status the strictly
//!    longer password wins; on a tie the earlier item is kept.
//! 3. The loser goes to the [`DeletionExecutor`], which reports, asks,
//!    deletes or archives according to [`DedupeOptions`].
//!
//! An item with URLs on several unrelated root domains is evaluated once per
//! domain. It can therefore win on one domain and lose on another within the
//! same pass; the index is updated domain by domain.

mod executor;
mod resolver;

pub use executor::{DeletionExecutor, DeletionOutcome};
pub use resolver::{resolve_conflict, Resolution};

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use crate::confirm::Confirm;
use crate::error::DedupeResult;
use crate::item::LoginItem;
use crate::vault_client::VaultClient;

/// Mode flags for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupeOptions {
    /// Report what would be removed without touching the vault.
    pub dry_run: bool,
    /// Ask before each removal.
    pub prompt: bool,
    /// Archive instead of permanently deleting.
    pub archive: bool,
    /// Leave favorited items out of duplicate detection entirely.
    pub ignore_favorites: bool,
}

impl Default for DedupeOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            prompt: true,
            archive: false,
            ignore_favorites: false,
        }
    }
}

/// Identity of an account: two items with equal keys are duplicate candidates.
/// A missing username is a value of its own, so two items without one share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    pub root_domain: String,
    pub username: Option<String>,
}

impl DuplicateKey {
    pub fn new(root_domain: impl Into<String>, username: Option<&str>) -> Self {
        Self {
            root_domain: root_domain.into(),
            username: username.map(String::from),
        }
    }
}

/// Which item (by position in the scanned list) currently holds each key.
#[derive(Debug, Default)]
pub struct UniqueIndex {
    holders: HashMap<DuplicateKey, usize>,
}

impl UniqueIndex {
    pub fn holder(&self, key: &DuplicateKey) -> Option<usize> {
        self.holders.get(key).copied()
    }

    pub fn insert(&mut self, key: DuplicateKey, position: usize) {
        self.holders.insert(key, position);
    }

    /// Number of distinct keys seen.
    pub(crate) fn len(&self) -> usize {
        self.holders.len()
    }
}

/// Statistics about one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupeStats {
    /// Number of items looked at
    pub items_scanned: u32,
    /// Items left out: already trashed, without URLs, or ignored favorites
    pub items_skipped: u32,
    /// Key collisions between two live items
    pub conflicts: u32,
    /// Collisions judged to be different sites with different credentials
    pub distinct_sites: u32,
    /// Items permanently deleted
    pub deleted: u32,
    /// Items archived
    pub archived: u32,
    /// Items reported by a dry run
    pub would_delete: u32,
    /// Removals the operator declined
    pub aborted: u32,
}

impl DedupeStats {
    /// Number of items removed, or reported for removal in a dry run.
    pub fn removed(&self) -> u32 {
        self.deleted + self.archived + self.would_delete
    }

    fn record(&mut self, outcome: DeletionOutcome) {
        match outcome {
            DeletionOutcome::WouldDelete => self.would_delete += 1,
            DeletionOutcome::Deleted => self.deleted += 1,
            DeletionOutcome::Archived => self.archived += 1,
            DeletionOutcome::Aborted => self.aborted += 1,
        }
    }
}

impl fmt::Display for DedupeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scanned {}, skipped {}, conflicts {}, distinct sites {}, deleted {}, archived {}, dry-run {}, declined {}",
            self.items_scanned,
            self.items_skipped,
            self.conflicts,
            self.distinct_sites,
            self.deleted,
            self.archived,
            self.would_delete,
            self.aborted,
        )
    }
}

/// Single-pass duplicate grouper driving conflict resolution and removal.
pub struct Deduplicator<'a, C: ?Sized, P, W> {
    client: &'a C,
    options: DedupeOptions,
    executor: DeletionExecutor<'a, C, P, W>,
    index: UniqueIndex,
    stats: DedupeStats,
}

impl<'a, C, P, W> Deduplicator<'a, C, P, W>
where
    C: VaultClient + ?Sized,
    P: Confirm,
    W: Write,
{
    /// `confirm` is only consulted when `options.prompt` is set and the run is not a dry run.
    /// Status lines are written to `out`.
    pub fn new(client: &'a C, confirm: P, out: W, options: DedupeOptions) -> Self {
        Self {
            client,
            options,
            executor: DeletionExecutor::new(client, confirm, out, options),
            index: UniqueIndex::default(),
            stats: DedupeStats::default(),
        }
    }

    /// Scan `items` once, removing duplicates as they are found.
    ///
    /// Stops at the first failed delete or archive call.
    pub fn run(&mut self, items: &mut [LoginItem]) -> DedupeResult<DedupeStats> {
        for position in 0..items.len() {
            self.stats.items_scanned += 1;
            if self.should_skip(&items[position]) {
                self.stats.items_skipped += 1;
                continue;
            }

            let username = items[position].username.clone();
            for root_domain in items[position].root_domains() {
                let key = DuplicateKey::new(root_domain, username.as_deref());

                let existing = match self.index.holder(&key) {
                    Some(existing) => existing,
                    None => {
                        self.index.insert(key, position);
                        continue;
                    }
                };

                if items[existing].trashed {
                    continue;
                }

                self.handle_collision(items, position, existing, key)?;
            }
        }

        tracing::info!(stats = %self.stats, keys = self.index.len(), "Deduplication pass finished");
        Ok(self.stats.clone())
    }

    /// The key index as it stands after the items scanned so far.
    pub fn index(&self) -> &UniqueIndex {
        &self.index
    }

    fn should_skip(&self, item: &LoginItem) -> bool {
        item.trashed || !item.has_urls() || (self.options.ignore_favorites && item.favorite)
    }

    fn handle_collision(
        &mut self,
        items: &mut [LoginItem],
        new: usize,
        existing: usize,
        key: DuplicateKey,
    ) -> DedupeResult<()> {
        self.stats.conflicts += 1;
        let (new_item, existing_item) = pair_mut(items, new, existing);

        tracing::debug!(
            root_domain = %key.root_domain,
            username = ?key.username,
            new = %new_item.title,
            existing = %existing_item.title,
            "Duplicate key collision"
        );

        let loser = match resolve_conflict(self.client, new_item, existing_item) {
            Resolution::DistinctSites => {
                self.stats.distinct_sites += 1;
                return Ok(());
            }
            Resolution::KeepNew => {
                self.index.insert(key, new);
                existing_item
            }
            Resolution::KeepExisting => new_item,
        };

        let outcome = self.executor.execute(loser)?;
        self.stats.record(outcome);
        Ok(())
    }
}

/// Borrow two distinct items of a slice mutably.
fn pair_mut(items: &mut [LoginItem], a: usize, b: usize) -> (&mut LoginItem, &mut LoginItem) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

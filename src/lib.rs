//! onepassword-dedupe
//!
//! Finds duplicate login items in a 1Password vault and removes them:
//! - **domain**: public-suffix aware splitting of stored URLs into root and display domains
//! - **item**: login items as listed by `op`, with lazily fetched and cached fields
//! - **dedupe**: single-pass grouping by `(root domain, username)`, keep/discard policy
//!   and the dry-run / confirm / delete / archive executor
//! - **vault_client**: the vault seam, with an implementation shelling out to `op`
//!
//! # Example (conceptual)
//! ```ignore
//! let client = OpCli::default();
//! let mut items = client.list_login_items(&ItemFilter::default())?;
//! let options = DedupeOptions { dry_run: true, ..DedupeOptions::default() };
//! let stats = Deduplicator::new(&client, LinePrompt::stdio(), std::io::stdout(), options)
//!     .run(&mut items)?;
//! ```

pub mod cli;
pub mod confirm;
pub mod dedupe;
pub mod domain;
pub mod error;
pub mod item;
pub mod logging;
pub mod vault_client;

pub use confirm::{Confirm, LinePrompt};
pub use dedupe::{
    resolve_conflict, DedupeOptions, DedupeStats, Deduplicator, DeletionExecutor, DeletionOutcome,
    DuplicateKey, Resolution, UniqueIndex,
};
pub use domain::{parse_domain_parts, DomainParts};
pub use error::{DedupeError, DedupeResult};
pub use item::LoginItem;
pub use vault_client::{ItemFilter, OpCli, VaultClient};

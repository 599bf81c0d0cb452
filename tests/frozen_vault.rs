//! End-to-end runs against an in-memory vault whose state only changes through deletions.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use onepassword_dedupe::{
    Confirm, DedupeError, DedupeOptions, DedupeResult, Deduplicator, ItemFilter, LoginItem,
    VaultClient,
};

const LISTING: &str = r#"[
    {"id": "a1", "title": "Example", "vault": {"id": "v", "name": "Private"},
     "additional_information": "bob", "urls": [{"href": "https://example.com"}]},
    {"id": "a2", "title": "Example (2FA)", "vault": {"id": "v", "name": "Private"},
     "additional_information": "bob", "urls": [{"href": "https://www.example.com/login"}]},
    {"id": "b1", "title": "App", "vault": {"id": "v", "name": "Private"},
     "additional_information": "bob", "urls": [{"href": "https://app.example.com"}]},
    {"id": "c1", "title": "Shop", "vault": {"id": "v", "name": "Work"},
     "additional_information": "alice", "urls": [{"href": "https://shop.example.org"}], "favorite": true},
    {"id": "c2", "title": "Shop copy", "vault": {"id": "v", "name": "Work"},
     "additional_information": "alice", "urls": [{"href": "https://shop.example.org"}]},
    {"id": "d1", "title": "Note-like login", "vault": {"id": "v", "name": "Private"}},
    {"id": "e1", "title": "Gone", "vault": {"id": "v", "name": "Private"},
     "additional_information": "bob", "urls": [{"href": "https://example.com"}], "trashed": "Y"}
]"#;

/// Vault backed by the listing above, with passwords and OTPs keyed by item id.
struct FrozenVault {
    items: RefCell<Vec<LoginItem>>,
    passwords: HashMap<&'static str, &'static str>,
    otps: HashSet<&'static str>,
    delete_calls: RefCell<u32>,
}

impl FrozenVault {
    fn new() -> Self {
        Self {
            items: RefCell::new(LoginItem::list_from_json(LISTING).unwrap()),
            passwords: HashMap::from([
                ("a1", "correct-horse"),
                ("a2", "tr0ub4dor"),
                ("b1", "app-only-secret"),
                ("c1", "shop"),
                ("c2", "shop-longer"),
                ("e1", "whatever"),
            ]),
            otps: HashSet::from(["a2"]),
            delete_calls: RefCell::new(0),
        }
    }
}

impl VaultClient for FrozenVault {
    fn list_login_items(&self, filter: &ItemFilter) -> DedupeResult<Vec<LoginItem>> {
        Ok(self
            .items
            .borrow()
            .iter()
            .filter(|item| filter.vault.as_deref().map_or(true, |v| item.vault_name() == v))
            .cloned()
            .collect())
    }

    fn password(&self, _vault_name: &str, item_id: &str) -> DedupeResult<String> {
        self.passwords
            .get(item_id)
            .map(|p| p.to_string())
            .ok_or_else(|| DedupeError::General(format!("no password for {item_id}")))
    }

    fn otp(&self, item_id: &str) -> DedupeResult<Option<u32>> {
        Ok(self.otps.contains(item_id).then_some(424242))
    }

    fn delete_item(&self, item_id: &str, _archive: bool) -> DedupeResult<()> {
        *self.delete_calls.borrow_mut() += 1;
        self.items.borrow_mut().retain(|item| item.id != item_id);
        Ok(())
    }
}

struct NeverAsked;

impl Confirm for NeverAsked {
    fn confirm(&mut self, question: &str) -> DedupeResult<bool> {
        panic!("unexpected prompt: {question}");
    }
}

fn run_once(vault: &FrozenVault, options: DedupeOptions) -> (u32, String) {
    let mut items = vault.list_login_items(&ItemFilter::default()).unwrap();
    let mut out = Vec::new();
    let stats = Deduplicator::new(vault, NeverAsked, &mut out, options)
        .run(&mut items)
        .unwrap();
    (stats.removed(), String::from_utf8(out).unwrap())
}

fn unattended() -> DedupeOptions {
    DedupeOptions {
        prompt: false,
        ..DedupeOptions::default()
    }
}

#[test]
fn test_second_run_removes_nothing() {
    let vault = FrozenVault::new();

    let (removed, out) = run_once(&vault, unattended());
    // a1 loses to a2 (OTP), c1 loses to c2 (longer). b1 is a different site with its own password.
    assert_eq!(removed, 2);
    assert!(out.contains("Deleted duplicate item Example, username bob for site example.com"));
    assert!(out.contains("Deleted duplicate item Shop, username alice for site shop.example.org"));

    let remaining: Vec<String> = vault.items.borrow().iter().map(|i| i.id.clone()).collect();
    assert_eq!(remaining, vec!["a2", "b1", "c2", "d1", "e1"]);

    let (removed, out) = run_once(&vault, unattended());
    assert_eq!(removed, 0);
    assert!(out.is_empty());
    assert_eq!(*vault.delete_calls.borrow(), 2);
}

#[test]
fn test_dry_run_leaves_vault_untouched() {
    let vault = FrozenVault::new();

    let (reported, out) = run_once(
        &vault,
        DedupeOptions {
            dry_run: true,
            ..DedupeOptions::default()
        },
    );

    assert_eq!(reported, 2);
    assert!(out.contains("To delete duplicate item Example, username bob, with password correct-horse"));
    assert_eq!(*vault.delete_calls.borrow(), 0);
    assert_eq!(vault.items.borrow().len(), 7);

    // Nothing changed, so a second dry run reports the same items.
    let (reported_again, _) = run_once(
        &vault,
        DedupeOptions {
            dry_run: true,
            ..DedupeOptions::default()
        },
    );
    assert_eq!(reported_again, 2);
}

#[test]
fn test_favorites_are_protected_on_request() {
    let vault = FrozenVault::new();

    let (removed, out) = run_once(
        &vault,
        DedupeOptions {
            ignore_favorites: true,
            ..unattended()
        },
    );

    assert_eq!(removed, 1);
    assert!(!out.contains("Shop"));
}

//! Keep/discard decision between two items sharing a duplicate key.

use crate::item::LoginItem;
use crate::vault_client::VaultClient;

/// Outcome of comparing a newly scanned item with the current key holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Different sites with different passwords: not duplicates, nothing to do.
    DistinctSites,
    /// The new item replaces the holder, which is discarded.
    KeepNew,
    /// The holder stays and the new item is discarded.
    KeepExisting,
}

/// Decide which of two colliding items survives.
///
/// Passwords are fetched whenever the display domains differ, and OTPs and
/// passwords are fetched for the tie-break. Failed fetches count as no OTP
/// and as an absent password of length zero. An absent password never
/// matches another password, so it cannot turn two sites into duplicates.
pub fn resolve_conflict<C: VaultClient + ?Sized>(
    client: &C,
    new: &mut LoginItem,
    existing: &mut LoginItem,
) -> Resolution {
    if new.display_domains() != existing.display_domains() && !same_password(client, new, existing) {
        tracing::debug!(
            new = %new.title,
            existing = %existing.title,
            "Different sites with different passwords, keeping both"
        );
        return Resolution::DistinctSites;
    }

    let resolution = if prefers_new(client, new, existing) {
        Resolution::KeepNew
    } else {
        Resolution::KeepExisting
    };
    tracing::debug!(new = %new.title, existing = %existing.title, ?resolution, "Resolved duplicate");
    resolution
}

/// An OTP beats any password length; otherwise a strictly longer password wins.
/// Ties keep the existing item.
fn prefers_new<C: VaultClient + ?Sized>(client: &C, new: &mut LoginItem, existing: &mut LoginItem) -> bool {
    let new_otp = new.has_otp(client);
    let existing_otp = existing.has_otp(client);
    if new_otp != existing_otp {
        return new_otp;
    }

    password_len(client, new) > password_len(client, existing)
}

fn same_password<C: VaultClient + ?Sized>(client: &C, new: &mut LoginItem, existing: &mut LoginItem) -> bool {
    match (new.password(client), existing.password(client)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn password_len<C: VaultClient + ?Sized>(client: &C, item: &mut LoginItem) -> usize {
    item.password(client).map_or(0, |p| p.chars().count())
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership filtering for stored records.
//!
//! Records owned by another user are indistinguishable from missing ones:
//! lookups through [`OwnedBy`] return `None` instead of a permission error,
//! so callers never learn that a foreign identifier exists.

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_user_id(&self) -> &str;

    /// Whether `user_id` owns this resource.
    fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_user_id() == user_id
    }
}

/// Extension for optional lookups that must be scoped to the caller.
pub trait OwnedBy<T> {
    /// Keep the resource only if `user_id` owns it.
    fn owned_by(self, user_id: &str) -> Option<T>;
}

impl<T: OwnedResource> OwnedBy<T> for Option<T> {
    fn owned_by(self, user_id: &str) -> Option<T> {
        self.filter(|resource| resource.is_owned_by(user_id))
    }
}

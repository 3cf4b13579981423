//! Access policy for mutations, expressed as pure functions over [`Actor`].
//!
//! Read endpoints for the catalog, reviews and comments take no identity at
//! all, so there is no "can read" rule to encode. Everything that changes
//! state or exposes account data goes through one of these checks inside the
//! owning usecase.

use uuid::Uuid;

use crate::domain::types::Actor;

/// Catalog writes (categories, genres, titles): admin only.
pub fn can_write_catalog(actor: &Actor) -> bool {
    actor.is_admin()
}

/// Account administration, including listing and reading other accounts:
/// admin only.
pub fn can_administer_users(actor: &Actor) -> bool {
    actor.is_admin()
}

/// Editing or deleting an authored record (review or comment): the author
/// themselves, or anyone of moderator rank and above.
pub fn can_edit_authored(actor: &Actor, author_id: Uuid) -> bool {
    actor.id == author_id || actor.is_moderator()
}

//! Slug derivation and deduplication.

use kinodex_model::{CatalogItem, ItemID};

use crate::error::Result;
use crate::store::CatalogStore;

/// Derive a URL-safe slug candidate from a display name.
///
/// Accents are folded to ASCII, everything outside [a-z0-9 -] is stripped,
/// and whitespace runs collapse to single hyphens. Year is deliberately not
/// part of the slug text.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    let mut buf = [0u8; 4];
    for c in name.chars() {
        let folded: &str = if c.is_ascii() {
            c.encode_utf8(&mut buf)
        } else {
            fold_accent(c)
        };
        for f in folded.chars() {
            match f.to_ascii_lowercase() {
                lower @ ('a'..='z' | '0'..='9') => {
                    if pending_hyphen && !out.is_empty() {
                        out.push('-');
                    }
                    pending_hyphen = false;
                    out.push(lower);
                }
                ' ' | '-' | '_' => pending_hyphen = true,
                _ => {}
            }
        }
    }
    out
}

/// ASCII fold for the Latin accents that actually show up in titles.
/// Anything unmapped is dropped.
fn fold_accent(c: char) -> &'static str {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä'
        | 'Å' => "a",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö'
        | 'Ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ñ' | 'Ñ' => "n",
        'ç' | 'Ç' => "c",
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        _ => "",
    }
}

/// Assigns unique slugs by probing the store for collisions.
///
/// The probe-then-write sequence is not atomic: two concurrent creates with
/// the same name can both pass the collision check. The store port offers no
/// uniqueness primitive, so this matches the backing store's real guarantees;
/// bulk regeneration re-dedupes the catalog when it matters.
pub struct SlugAssigner<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> SlugAssigner<'a> {
    pub fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    /// Produce a free slug for `name`, ignoring `owner` itself when probing.
    /// An empty candidate falls back to the owner's id.
    pub async fn assign(&self, owner: &ItemID, name: &str) -> Result<String> {
        let mut base = slugify(name);
        if base.is_empty() {
            base = owner.as_str();
        }
        let mut candidate = base.clone();
        let mut suffix = 2u32;
        loop {
            match self.store.get_by_slug(&candidate).await? {
                None => return Ok(candidate),
                Some(existing) if existing.id == *owner => {
                    return Ok(candidate);
                }
                Some(_) => {
                    candidate = format!("{base}-{suffix}");
                    suffix += 1;
                }
            }
        }
    }

    /// Regenerate only when the name or year changed, or no slug exists yet.
    pub fn needs_regeneration(
        item: &CatalogItem,
        new_name: &str,
        new_year: Option<i32>,
    ) -> bool {
        item.slug.is_none() || item.name != new_name || item.year != new_year
    }
}

//! Stable row identity, assigned once when rows enter the system.
//!
//! Rows keep their native `listing_id` when present. Otherwise the
//! `property_url` is promoted, and as a last resort a content hash is used.
//! Identical rows without any key get an occurrence suffix so keys stay
//! unique within one batch.

use std::collections::HashMap;

use log::debug;
use sha2::{Digest, Sha256};

use crate::api::models::{KeyOrigin, Listing};

const SURROGATE_PREFIX: &str = "sur-";

/// Assign an identifier to every row that lacks one. Idempotent.
pub fn ingest(rows: Vec<Listing>) -> Vec<Listing> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut surrogates = 0usize;

    let rows: Vec<Listing> = rows
        .into_iter()
        .map(|mut row| {
            if has_text(row.listing_id.as_deref()) {
                return row;
            }

            if let Some(url) = row.secondary_key().map(str::to_string) {
                row.listing_id = Some(url);
                row.key_origin = KeyOrigin::SecondaryKey;
                return row;
            }

            let base = surrogate_key(&row);
            let occurrence = seen.entry(base.clone()).or_insert(0);
            let key = if *occurrence == 0 {
                base
            } else {
                format!("{}#{}", base, occurrence)
            };
            *occurrence += 1;
            surrogates += 1;

            row.listing_id = Some(key);
            row.key_origin = KeyOrigin::Surrogate;
            row
        })
        .collect();

    if surrogates > 0 {
        debug!("assigned {} surrogate keys", surrogates);
    }
    rows
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Content hash over the serialized row.
fn surrogate_key(row: &Listing) -> String {
    let bytes = serde_json::to_vec(row).unwrap_or_default();
    let digest = Sha256::digest(&bytes);
    let hex: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();
    format!("{}{}", SURROGATE_PREFIX, hex)
}

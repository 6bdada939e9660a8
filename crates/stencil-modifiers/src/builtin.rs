//! The built-in modifier set.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use sha2::{Digest, Sha256, Sha512};

use crate::casing::title_case;
use crate::registry::Modifiers;

/// Registers the standard modifier set onto `registry`.
pub(crate) fn register(registry: Modifiers) -> Modifiers {
    registry
        .with_modifier("sha256", |value| Ok(hex_digest::<Sha256>(value)))
        .with_modifier("sha512", |value| Ok(hex_digest::<Sha512>(value)))
        .with_modifier("sha1", |value| Ok(sha1_digest(value)))
        .with_modifier("base64", |value| Ok(BASE64_STANDARD.encode(value)))
        .with_modifier("upper", |value| Ok(value.to_uppercase()))
        .with_modifier("lower", |value| Ok(value.to_lowercase()))
        .with_modifier("title", |value| Ok(title_case(value)))
        .with_modifier("noop", |value| Ok(value.to_owned()))
}

/// Hex-encoded digest of `value`.
fn hex_digest<D: Digest>(value: &str) -> String {
    hex::encode(D::digest(value.as_bytes()))
}

// The sha1 crate sits on an older `digest` release than sha2, so it cannot
// share the generic helper's trait bound.
fn sha1_digest(value: &str) -> String {
    use sha1::Digest as _;

    let mut hasher = sha1::Sha1::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

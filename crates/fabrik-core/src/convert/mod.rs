// ── Bidirectional mapping ──
//
// `AttributeMapping` converts between the local attribute bag and typed
// remote payloads. `to_remote` skips zero values so partial payloads do
// not clobber server fields; `to_local` writes every populated field and
// omits absent ones.

mod common;
mod fabric;
mod metal;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::attrs::AttributeBag;
use crate::error::{CoreError, ValidationError};

/// Conversion between a local attribute bag and a typed payload.
///
/// For every populated field `x`, `to_local(to_remote(x)) == x`.
pub trait AttributeMapping: Sized {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError>;
    fn to_local(&self) -> AttributeBag;
}

// ── Helpers ─────────────────────────────────────────────────────────

pub(crate) fn timestamp(
    bag: &AttributeBag,
    key: &str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    bag.parsed(key)
}

pub(crate) fn put_timestamp(bag: &mut AttributeBag, key: &str, value: Option<&DateTime<Utc>>) {
    bag.put(
        key,
        value.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    );
}

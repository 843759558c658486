// ── Local attribute bag ──
//
// The caller-owned representation of a resource: an ordered map from
// attribute name to a loosely typed value. Singular nested groups are a
// single `Block`; only genuinely multi-valued groups are `Blocks`.
// Typed accessors report mismatches as `ValidationError::AttributeType`.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::convert::AttributeMapping;
use crate::error::{CoreError, ValidationError};

// ── AttrValue ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
    Block(AttributeBag),
    Blocks(Vec<AttributeBag>),
}

impl AttrValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::List(_) => "string list",
            Self::Block(_) => "block",
            Self::Blocks(_) => "block list",
        }
    }

    /// Zero values count as "not set" when building remote payloads.
    /// Booleans are always explicit.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Bool(_) => false,
            Self::Int(i) => *i == 0,
            Self::Str(s) => s.is_empty(),
            Self::List(l) => l.is_empty(),
            Self::Block(b) => b.is_empty(),
            Self::Blocks(b) => b.is_empty(),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<&String> for AttrValue {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

impl From<&Vec<String>> for AttrValue {
    fn from(v: &Vec<String>) -> Self {
        Self::List(v.clone())
    }
}

impl From<AttributeBag> for AttrValue {
    fn from(v: AttributeBag) -> Self {
        Self::Block(v)
    }
}

impl From<Vec<AttributeBag>> for AttrValue {
    fn from(v: Vec<AttributeBag>) -> Self {
        Self::Blocks(v)
    }
}

// ── AttributeBag ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag(IndexMap<String, AttrValue>);

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Insert unconditionally.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.0.shift_remove(key)
    }

    /// Builder-style insert for literals in tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Overwrite every key present in `other`; keys absent from `other`
    /// keep their current value.
    pub fn merge(&mut self, other: Self) {
        for (k, v) in other.0 {
            self.0.insert(k, v);
        }
    }

    // ── Writers (remote → local) ────────────────────────────────────

    /// Write `value` when present. `None` leaves the key untouched.
    pub fn put<V: Into<AttrValue>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.insert(key, v);
        }
        self
    }

    /// Write a value through its `Display` form (enums, timestamps).
    pub fn put_display<V: fmt::Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        self.put(key, value.map(|v| v.to_string()))
    }

    /// Write a singular nested group as one block. Empty groups are omitted.
    pub fn put_block<T: AttributeMapping>(&mut self, key: &str, value: Option<&T>) -> &mut Self {
        let bag = value.map(AttributeMapping::to_local).unwrap_or_default();
        if !bag.is_empty() {
            self.insert(key, bag);
        }
        self
    }

    /// Write a multi-valued nested group. Empty lists are omitted.
    pub fn put_blocks<T: AttributeMapping>(&mut self, key: &str, value: Option<&[T]>) -> &mut Self {
        let items = value.unwrap_or_default();
        if !items.is_empty() {
            let bags: Vec<AttributeBag> = items.iter().map(AttributeMapping::to_local).collect();
            self.insert(key, bags);
        }
        self
    }

    // ── Readers (local → remote) ────────────────────────────────────

    /// A non-zero value, or `None` if absent or zero-valued.
    fn present(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key).filter(|v| !v.is_zero())
    }

    fn mismatch(key: &str, expected: &'static str, found: &AttrValue) -> ValidationError {
        ValidationError::AttributeType {
            key: key.to_owned(),
            expected,
            found: found.type_name(),
        }
    }

    pub fn string(&self, key: &str) -> Result<Option<String>, ValidationError> {
        match self.present(key) {
            None => Ok(None),
            Some(AttrValue::Str(s)) => Ok(Some(s.clone())),
            Some(other) => Err(Self::mismatch(key, "string", other)),
        }
    }

    /// An integer; numeric strings are coerced.
    pub fn int(&self, key: &str) -> Result<Option<i64>, ValidationError> {
        match self.present(key) {
            None => Ok(None),
            Some(AttrValue::Int(i)) => Ok(Some(*i)),
            Some(AttrValue::Str(s)) => {
                s.trim()
                    .parse()
                    .map(Some)
                    .map_err(|e: std::num::ParseIntError| ValidationError::InvalidValue {
                        key: key.to_owned(),
                        value: s.clone(),
                        reason: e.to_string(),
                    })
            }
            Some(other) => Err(Self::mismatch(key, "int", other)),
        }
    }

    pub fn boolean(&self, key: &str) -> Result<Option<bool>, ValidationError> {
        match self.present(key) {
            None => Ok(None),
            Some(AttrValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(Self::mismatch(key, "bool", other)),
        }
    }

    /// A string list; a lone string is promoted to a one-element list.
    pub fn strings(&self, key: &str) -> Result<Option<Vec<String>>, ValidationError> {
        match self.present(key) {
            None => Ok(None),
            Some(AttrValue::List(l)) => Ok(Some(l.clone())),
            Some(AttrValue::Str(s)) => Ok(Some(vec![s.clone()])),
            Some(other) => Err(Self::mismatch(key, "string list", other)),
        }
    }

    /// Parse a string attribute through `FromStr` (enums, timestamps).
    pub fn parsed<T>(&self, key: &str) -> Result<Option<T>, ValidationError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let Some(raw) = self.string(key)? else {
            return Ok(None);
        };
        raw.parse()
            .map(Some)
            .map_err(|e: T::Err| ValidationError::InvalidValue {
                key: key.to_owned(),
                value: raw.clone(),
                reason: e.to_string(),
            })
    }

    /// A singular nested group.
    ///
    /// A one-element `Blocks` list is accepted for state written by older
    /// tooling; more than one element is an error.
    pub fn block(&self, key: &str) -> Result<Option<&AttributeBag>, ValidationError> {
        match self.present(key) {
            None => Ok(None),
            Some(AttrValue::Block(b)) => Ok(Some(b)),
            Some(AttrValue::Blocks(list)) if list.len() == 1 => Ok(list.first()),
            Some(other) => Err(Self::mismatch(key, "single block", other)),
        }
    }

    /// A multi-valued nested group; a lone block counts as one entry.
    pub fn blocks(&self, key: &str) -> Result<Vec<&AttributeBag>, ValidationError> {
        match self.present(key) {
            None => Ok(Vec::new()),
            Some(AttrValue::Blocks(list)) => Ok(list.iter().collect()),
            Some(AttrValue::Block(b)) => Ok(vec![b]),
            Some(other) => Err(Self::mismatch(key, "block list", other)),
        }
    }

    /// Map a singular nested group; groups with no populated field are
    /// treated as absent.
    pub fn mapped<T>(&self, key: &str) -> Result<Option<T>, CoreError>
    where
        T: AttributeMapping + Default + PartialEq,
    {
        let Some(bag) = self.block(key)? else {
            return Ok(None);
        };
        let value = T::to_remote(bag)?;
        Ok((value != T::default()).then_some(value))
    }

    /// Map a multi-valued nested group; empty entries are dropped and an
    /// empty result is `None`.
    pub fn mapped_list<T>(&self, key: &str) -> Result<Option<Vec<T>>, CoreError>
    where
        T: AttributeMapping + Default + PartialEq,
    {
        let mut out = Vec::new();
        for bag in self.blocks(key)? {
            let value = T::to_remote(bag)?;
            if value != T::default() {
                out.push(value);
            }
        }
        Ok((!out.is_empty()).then_some(out))
    }

    /// Like [`string`](Self::string) but absent is an error.
    pub fn required_string(&self, key: &str) -> Result<String, ValidationError> {
        self.string(key)?
            .ok_or_else(|| ValidationError::MissingAttribute {
                key: key.to_owned(),
            })
    }
}

impl FromIterator<(String, AttrValue)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (String, AttrValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_values_read_as_absent() {
        let bag = AttributeBag::new()
            .with("name", "")
            .with("bandwidth", 0_i64)
            .with("tags", Vec::<String>::new());
        assert_eq!(bag.string("name").unwrap(), None);
        assert_eq!(bag.int("bandwidth").unwrap(), None);
        assert_eq!(bag.strings("tags").unwrap(), None);
        assert_eq!(bag.string("missing").unwrap(), None);
    }

    #[test]
    fn false_is_an_explicit_value() {
        let bag = AttributeBag::new().with("enabled", false);
        assert_eq!(bag.boolean("enabled").unwrap(), Some(false));
    }

    #[test]
    fn wrong_type_is_validation_error() {
        let bag = AttributeBag::new().with("name", 5_i64);
        let err = bag.string("name").unwrap_err();
        assert_eq!(
            err,
            ValidationError::AttributeType {
                key: "name".into(),
                expected: "string",
                found: "int",
            }
        );
    }

    #[test]
    fn numeric_strings_coerce_to_int() {
        let bag = AttributeBag::new().with("bandwidth", "100").with("bad", "ten");
        assert_eq!(bag.int("bandwidth").unwrap(), Some(100));
        assert!(matches!(
            bag.int("bad"),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn singleton_block_list_is_accepted_as_block() {
        let inner = AttributeBag::new().with("code", "STANDARD");
        let bag = AttributeBag::new().with("package", vec![inner.clone()]);
        assert_eq!(bag.block("package").unwrap(), Some(&inner));

        let two = AttributeBag::new().with("package", vec![inner.clone(), inner]);
        assert!(two.block("package").is_err());
    }

    #[test]
    fn merge_keeps_unmentioned_keys() {
        let mut local = AttributeBag::new().with("name", "a").with("secret", "x");
        local.merge(AttributeBag::new().with("name", "b").with("state", "ACTIVE"));
        assert_eq!(local.string("name").unwrap().as_deref(), Some("b"));
        assert_eq!(local.string("secret").unwrap().as_deref(), Some("x"));
        assert_eq!(local.keys().collect::<Vec<_>>(), vec!["name", "secret", "state"]);
    }

    #[test]
    fn json_form_is_plain_object() {
        let bag = AttributeBag::new()
            .with("name", "r")
            .with("location", AttributeBag::new().with("metro_code", "SV"));
        let json = serde_json::to_value(&bag).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "r", "location": { "metro_code": "SV" } })
        );
        let back: AttributeBag = serde_json::from_value(json).unwrap();
        assert_eq!(back, bag);
    }
}

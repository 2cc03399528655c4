//! Shape coercion for hand-authored YAML.
//!
//! Scalars are accepted wherever text is expected, null reads as absent,
//! and a lone value is accepted where a list is expected. Component
//! parameters use the strict helpers, which reject impossible shapes.
//! Front matter uses the forgiving ones, which log and fall back instead:
//! metadata field shapes are never a reason to reject an entry.

use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

fn scalar(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Sequence(_) => Err("expected text, found a list".to_string()),
        Value::Mapping(_) => Err("expected text, found an object".to_string()),
        Value::Tagged(tagged) => scalar(tagged.value),
    }
}

pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    scalar(Value::deserialize(d)?).map_err(D::Error::custom)
}

pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        other => scalar(other).map(Some).map_err(D::Error::custom),
    }
}

pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| scalar(item).map_err(D::Error::custom))
            .collect(),
        other => scalar(other).map(|s| vec![s]).map_err(D::Error::custom),
    }
}

pub fn seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(d)? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| serde_yaml::from_value(item).map_err(D::Error::custom))
            .collect(),
        Value::Mapping(map) => serde_yaml::from_value(Value::Mapping(map))
            .map(|one| vec![one])
            .map_err(D::Error::custom),
        _ => Err(D::Error::custom("expected a list")),
    }
}

fn ignored(reason: impl std::fmt::Display) {
    tracing::warn!("Ignoring front matter value: {}", reason);
}

/// Like [`string`], but a list or object reads as empty text.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(scalar(Value::deserialize(d)?).unwrap_or_else(|reason| {
        ignored(reason);
        String::new()
    }))
}

pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => None,
        other => scalar(other).map_err(ignored).ok(),
    })
}

/// Like [`string_list`], but items that are not scalars are dropped.
pub fn text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => Vec::new(),
        Value::Sequence(items) => items
            .into_iter()
            .filter_map(|item| scalar(item).map_err(ignored).ok())
            .collect(),
        other => scalar(other).map(|s| vec![s]).map_err(ignored).unwrap_or_default(),
    })
}

/// Like [`seq`], but records that do not fit are dropped.
pub fn records<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(d)? {
        Value::Null => Vec::new(),
        Value::Sequence(items) => items,
        Value::Mapping(map) => vec![Value::Mapping(map)],
        _ => {
            ignored("expected a list");
            Vec::new()
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_yaml::from_value(item).map_err(ignored).ok())
        .collect())
}

/// Any shape that does not fit `T` reads as `T::default()`.
pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(serde_yaml::from_value(Value::deserialize(d)?)
        .map_err(ignored)
        .unwrap_or_default())
}

//! The DOM value tree.

use alloc::{collections::BTreeMap, string::String, vec::Vec};

/// Object representation used by [`Value`].
pub type Map = BTreeMap<String, Value>;
/// Array representation used by [`Value`].
pub type Array = Vec<Value>;

/// A JSON value as defined by RFC 8259.
///
/// Produced by [`ValueBuilder`](crate::ValueBuilder) and
/// [`parse_value`](crate::parse_value). The `Display` implementation writes
/// the value back as compact JSON with objects in key order.
///
/// # Examples
///
/// ```
/// use jsontape::{Map, Value};
///
/// let mut fields = Map::new();
/// fields.insert("id".into(), Value::Number(7.0));
/// fields.insert("tags".into(), Value::Array(vec![Value::Null]));
/// let value = Value::Object(fields);
/// assert_eq!(value.to_string(), r#"{"id":7,"tags":[null]}"#);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// `null`.
    #[default]
    Null,
    /// `true` or `false`.
    Boolean(bool),
    /// Any JSON number.
    Number(f64),
    /// A string, fully unescaped.
    String(String),
    /// An array of values.
    Array(Array),
    /// An object; duplicate keys keep the last value.
    Object(Map),
}

impl Value {
    /// `true` if the value is `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `true` if the value is an object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// `true` if the value is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// The boolean, if this is a boolean value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is a number value.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string contents, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The fields, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Field lookup on objects; `None` for any other kind.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

/// Writes `src` with the escaping `Display` uses: quotes, backslashes and
/// control characters, everything else verbatim.
pub(crate) fn write_escaped_string<W: core::fmt::Write>(src: &str, f: &mut W) -> core::fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04X}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            // Finite floats format to their shortest exact form, which is
            // itself a valid JSON number.
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => {
                f.write_str("\"")?;
                write_escaped_string(s, f)?;
                f.write_str("\"")
            }
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str("\"")?;
                    write_escaped_string(key, f)?;
                    write!(f, "\":{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(any(test, feature = "serde"))]
mod serde_impls {
    use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

    use super::Value;

    impl Serialize for Value {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match self {
                Value::Null => serializer.serialize_unit(),
                Value::Boolean(b) => serializer.serialize_bool(*b),
                Value::Number(n) => serializer.serialize_f64(*n),
                Value::String(s) => serializer.serialize_str(s),
                Value::Array(items) => {
                    let mut seq = serializer.serialize_seq(Some(items.len()))?;
                    for item in items {
                        seq.serialize_element(item)?;
                    }
                    seq.end()
                }
                Value::Object(map) => {
                    let mut out = serializer.serialize_map(Some(map.len()))?;
                    for (key, item) in map {
                        out.serialize_entry(key, item)?;
                    }
                    out.end()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::*;

    #[test]
    fn display_is_compact_json() {
        let mut map = Map::new();
        map.insert("b".into(), Value::Boolean(false));
        map.insert("a".into(), Value::Array(vec![Value::Number(1.0), Value::Null]));
        let value = Value::Object(map);
        assert_eq!(value.to_string(), r#"{"a":[1,null],"b":false}"#);
    }

    #[test]
    fn display_escapes_strings() {
        let value = Value::String("a\"b\\c\nd\u{1}".into());
        assert_eq!(value.to_string(), "\"a\\\"b\\\\c\\u000Ad\\u0001\"");
    }

    #[test]
    fn accessors() {
        let mut map = Map::new();
        map.insert("n".into(), Value::Number(2.5));
        let value = Value::Object(map);
        assert_eq!(value.get("n").and_then(Value::as_f64), Some(2.5));
        assert!(value.get("missing").is_none());
        assert!(Value::Null.get("n").is_none());
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
    }

    #[test]
    fn serde_serialization_matches_display() {
        let mut map = Map::new();
        map.insert("list".into(), Value::Array(vec![Value::Boolean(true)]));
        map.insert("text".into(), Value::String("x".into()));
        map.insert("nothing".into(), Value::Null);
        let value = Value::Object(map);
        let via_serde: serde_json::Value = serde_json::to_value(&value).unwrap();
        let via_display: serde_json::Value =
            serde_json::from_str(&value.to_string()).unwrap();
        assert_eq!(via_serde, via_display);
    }
}

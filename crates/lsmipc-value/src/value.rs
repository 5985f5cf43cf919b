use std::collections::BTreeMap;
use std::fmt;

use crate::error::ValueError;
use crate::number::Number;

/// Object representation: string keys to values.
pub type Map = BTreeMap<String, Value>;

static NULL: Value = Value::Null;

/// Variant tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Null,
    Boolean,
    String,
    Numeric,
    Object,
    Array,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Null => "null",
            Tag::Boolean => "boolean",
            Tag::String => "string",
            Tag::Numeric => "numeric",
            Tag::Object => "object",
            Tag::Array => "array",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON-shaped value exchanged with plugins.
///
/// Accessors never coerce between variants: asking a string for a number is
/// a [`ValueError::TypeMismatch`], not a parse attempt.
///
/// Numbers keep their wire text; booleans are held as `bool`. Only two
/// spellings exist for a boolean, so the encoder reproduces `true`/`false`
/// exactly and nothing is lost by not storing the text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    String(String),
    Numeric(Number),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Numeric value from raw decimal text, validated against the JSON
    /// number grammar.
    pub fn numeric(text: &str) -> Result<Self, ValueError> {
        Ok(Value::Numeric(text.parse()?))
    }

    /// An empty object.
    pub fn object() -> Self {
        Value::Object(Map::new())
    }

    /// The variant this value holds.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Null => Tag::Null,
            Value::Boolean(_) => Tag::Boolean,
            Value::String(_) => Tag::String,
            Value::Numeric(_) => Tag::Numeric,
            Value::Array(_) => Tag::Array,
            Value::Object(_) => Tag::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this is an object containing `key`. Always false for
    /// non-objects.
    pub fn has_key(&self, key: &str) -> bool {
        match self {
            Value::Object(map) => map.contains_key(key),
            _ => false,
        }
    }

    /// Look up `key` in an object.
    ///
    /// A missing key yields [`Value::Null`] rather than an error: plugins
    /// omit optional fields, and callers treat absent and null alike. Calling
    /// this on anything but an object is a type mismatch.
    pub fn get(&self, key: &str) -> Result<&Value, ValueError> {
        Ok(self.as_object()?.get(key).unwrap_or(&NULL))
    }

    pub fn as_null(&self) -> Result<(), ValueError> {
        match self {
            Value::Null => Ok(()),
            other => Err(other.mismatch(Tag::Null)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Value::Boolean(value) => Ok(*value),
            other => Err(other.mismatch(Tag::Boolean)),
        }
    }

    /// The number as a finite double.
    pub fn as_f64(&self) -> Result<f64, ValueError> {
        self.as_number()?.to_f64()
    }

    pub fn as_i32(&self) -> Result<i32, ValueError> {
        self.as_number()?.parse("i32")
    }

    pub fn as_i64(&self) -> Result<i64, ValueError> {
        self.as_number()?.parse("i64")
    }

    pub fn as_u32(&self) -> Result<u32, ValueError> {
        self.as_number()?.parse("u32")
    }

    pub fn as_u64(&self) -> Result<u64, ValueError> {
        self.as_number()?.parse("u64")
    }

    /// The stored number, text intact.
    pub fn as_number(&self) -> Result<&Number, ValueError> {
        match self {
            Value::Numeric(number) => Ok(number),
            other => Err(other.mismatch(Tag::Numeric)),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::String(text) => Ok(text),
            other => Err(other.mismatch(Tag::String)),
        }
    }

    pub fn as_array(&self) -> Result<&[Value], ValueError> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(other.mismatch(Tag::Array)),
        }
    }

    pub fn as_object(&self) -> Result<&Map, ValueError> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(other.mismatch(Tag::Object)),
        }
    }

    /// Take the elements out of an array.
    pub fn into_array(self) -> Result<Vec<Value>, ValueError> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(other.mismatch(Tag::Array)),
        }
    }

    /// Take the entries out of an object.
    pub fn into_object(self) -> Result<Map, ValueError> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(other.mismatch(Tag::Object)),
        }
    }

    fn mismatch(&self, expected: Tag) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            actual: self.tag(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Numeric(value)
    }
}

/// Non-finite doubles have no JSON form and become [`Value::Null`].
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Value::Null, Value::Numeric)
    }
}

macro_rules! value_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Numeric(Number::from(value))
                }
            }
        )*
    };
}

value_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

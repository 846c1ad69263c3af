use std::collections::{BTreeMap, HashMap};

use crate::value::Value;

/// Read-only lookup of message properties by name.
///
/// A missing property reads as `None` and evaluates as `UNKNOWN`.
pub trait PropertySource {
    fn property(&self, name: &str) -> Option<Value>;
}

impl PropertySource for HashMap<String, Value> {
    fn property(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl PropertySource for BTreeMap<String, Value> {
    fn property(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl<P: PropertySource + ?Sized> PropertySource for &P {
    fn property(&self, name: &str) -> Option<Value> {
        (**self).property(name)
    }
}

/// An owned set of message properties.
///
/// # Examples
///
/// ```
/// use selector_lang::{Properties, PropertySource, Value};
///
/// let props = Properties::new()
///     .with("JMSType", "order")
///     .with("priority", 2);
///
/// assert_eq!(props.property("priority"), Some(Value::int(2)));
/// assert_eq!(props.property("region"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: HashMap<String, Value>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a property. Setting `Value::Unknown` removes it.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        match value.into() {
            Value::Unknown => {
                self.values.remove(&name);
            }
            value => {
                self.values.insert(name, value);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Builds properties from a JSON object of scalars.
    ///
    /// `null` members are treated as absent. Returns the name of the first
    /// member that is an array or object.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, String> {
        let serde_json::Value::Object(members) = json else {
            return Err("properties must be a JSON object".to_string());
        };

        let mut props = Properties::new();
        for (name, member) in members {
            let value = match member {
                serde_json::Value::Null => Value::Unknown,
                serde_json::Value::Bool(b) => Value::Bool(*b),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => Value::int(i),
                    None => match n.as_f64() {
                        Some(f) => Value::float(f),
                        None => return Err(format!("property `{}` is out of range", name)),
                    },
                },
                serde_json::Value::String(s) => Value::String(s.clone()),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(format!("property `{}` must be a scalar", name));
                }
            };
            props.insert(name.clone(), value);
        }
        Ok(props)
    }
}

impl PropertySource for Properties {
    fn property(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (name, value) in iter {
            props.insert(name, value);
        }
        props
    }
}

//! fixbase record
//!
//! A `Record` is an ordered association list of column/field name to [`Value`].
//! Insertion order is preserved so the SQL layer can emit columns and values
//! in a stable order. `Condition` is the same (name, value) shape used for
//! WHERE clauses, combined with logical AND by the statement builder.

use crate::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(Vec<(String, Value)>);

impl Record {
    pub fn new() -> Self {
        Record(Vec::new())
    }

    pub fn push<K, V>(&mut self, name: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.0.push((name.into(), value.into()));
    }

    /// chainable push, handy for literals
    pub fn with<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.push(name, value);
        self
    }

    /// first value under `name`, exact match
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<(String, Value)>> for Record {
    fn from(v: Vec<(String, Value)>) -> Self {
        Record(v)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Record(iter.into_iter().collect())
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// a single WHERE-clause condition pair
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub key: String,
    pub value: Value,
}

impl Condition {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Condition {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod record_tests {
    use super::*;

    #[test]
    fn record_preserves_insertion_order() {
        let rec = Record::new().with("b", 2).with("a", 1).with("c", "x");

        let names = rec.names().collect::<Vec<_>>();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(rec.get("a"), Some(&Value::Int(1)));
        assert_eq!(rec.get("missing"), None);
    }

    #[test]
    fn condition_coerces_values() {
        let c = Condition::new("updated_at", "now");
        assert_eq!(c.value, Value::Now);
    }
}

//! Records of key-value pairs.
use crate::error::DistrlError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{IntoIter, Iter, Keys},
    HashMap,
};

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single value, typically used for metrics such as loss or return.
    Scalar(f32),

    /// A timestamp.
    DateTime(DateTime<Local>),

    /// A 1-dimensional array.
    Array1(Vec<f32>),

    /// A text value.
    String(String),
}

/// A container of key-value pairs.
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair. An existing value with the same key is replaced.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns an iterator that consumes the record.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets a reference to the value of the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records. Values of `record` take precedence on key collisions.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value.
    ///
    /// Fails with [`DistrlError::RecordKey`] if the key does not exist, or with
    /// [`DistrlError::RecordValueType`] if the value is not a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f32, DistrlError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(DistrlError::RecordValueType("Scalar".to_string())),
            None => Err(DistrlError::RecordKey(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, DistrlError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(DistrlError::RecordValueType("Array1".to_string())),
            None => Err(DistrlError::RecordKey(k.to_string())),
        }
    }

    /// Gets a string value.
    pub fn get_string(&self, k: &str) -> Result<String, DistrlError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(DistrlError::RecordValueType("String".to_string())),
            None => Err(DistrlError::RecordKey(k.to_string())),
        }
    }

    /// Returns `true` if the record has no key-value pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of key-value pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_latter() {
        let r1 = Record::from_slice(&[
            ("loss", RecordValue::Scalar(1.0)),
            ("epsilon", RecordValue::Scalar(0.5)),
        ]);
        let r2 = Record::from_scalar("loss", 2.0);
        let r = r1.merge(r2);

        assert_eq!(r.len(), 2);
        assert_eq!(r.get_scalar("loss"), Ok(2.0));
        assert_eq!(r.get_scalar("epsilon"), Ok(0.5));
    }

    #[test]
    fn test_typed_getters() {
        let mut r = Record::empty();
        r.insert("name", RecordValue::String("c51".into()));
        r.insert("atoms", RecordValue::Array1(vec![0.0, 1.0]));

        assert_eq!(r.get_string("name"), Ok("c51".to_string()));
        assert_eq!(r.get_array1("atoms"), Ok(vec![0.0, 1.0]));
        assert_eq!(
            r.get_scalar("name"),
            Err(DistrlError::RecordValueType("Scalar".to_string()))
        );
        assert_eq!(
            r.get_scalar("missing"),
            Err(DistrlError::RecordKey("missing".to_string()))
        );
    }
}

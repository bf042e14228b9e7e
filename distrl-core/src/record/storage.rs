//! Storage and aggregation of records.
use super::{Record, RecordValue};
use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// Stores records and aggregates them.
///
/// On [`RecordStorage::aggregate`], scalar values of the same key are summarized.
/// A key observed once keeps its name and value. A key observed more than once is
/// replaced with `<key>_min`, `<key>_max`, `<key>_mean` and `<key>_median`.
/// For the other value types, the most recent value is taken.
#[derive(Debug, Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

fn min(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::INFINITY, f32::min)
}

fn max(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

fn mean(vs: &[f32]) -> f32 {
    vs.iter().sum::<f32>() / vs.len() as f32
}

fn median(mut vs: Vec<f32>) -> f32 {
    vs.sort_by(|x, y| x.total_cmp(y));
    vs[vs.len() / 2]
}

impl RecordStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Stores a record.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no record is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn get_keys(&self) -> HashSet<String, Xxh3Builder> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        for record in self.data.iter() {
            for k in record.keys() {
                keys.insert(k.clone());
            }
        }
        keys
    }

    fn latest(&self, key: &str) -> Option<&RecordValue> {
        self.data.iter().rev().find_map(|record| record.get(key))
    }

    fn scalar(&self, key: &str) -> Record {
        let vs: Vec<f32> = self
            .data
            .iter()
            .filter_map(|record| match record.get(key) {
                Some(RecordValue::Scalar(v)) => Some(*v),
                _ => None,
            })
            .collect();

        if vs.len() == 1 {
            Record::from_scalar(key, vs[0])
        } else {
            Record::from_slice(&[
                (format!("{}_min", key), RecordValue::Scalar(min(&vs))),
                (format!("{}_max", key), RecordValue::Scalar(max(&vs))),
                (format!("{}_mean", key), RecordValue::Scalar(mean(&vs))),
                (format!("{}_median", key), RecordValue::Scalar(median(vs))),
            ])
        }
    }

    /// Aggregates all stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();

        for key in self.get_keys().iter() {
            match self.latest(key) {
                Some(RecordValue::Scalar(..)) => record.merge_inplace(self.scalar(key)),
                Some(value) => record.insert(key.clone(), value.clone()),
                None => {}
            }
        }

        self.data = vec![];

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_keeps_key() {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_scalar("episode_return", 12.0));

        let record = storage.aggregate();
        assert_eq!(record.get_scalar("episode_return"), Ok(12.0));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_scalar_statistics() {
        let mut storage = RecordStorage::new();
        for v in [4.0, 1.0, 3.0, 2.0, 5.0] {
            storage.store(Record::from_scalar("loss", v));
        }
        storage.store(Record::from_slice(&[(
            "note",
            RecordValue::String("first".into()),
        )]));
        storage.store(Record::from_slice(&[(
            "note",
            RecordValue::String("second".into()),
        )]));

        let record = storage.aggregate();
        assert_eq!(record.get_scalar("loss_min"), Ok(1.0));
        assert_eq!(record.get_scalar("loss_max"), Ok(5.0));
        assert_eq!(record.get_scalar("loss_mean"), Ok(3.0));
        assert_eq!(record.get_scalar("loss_median"), Ok(3.0));
        assert!(record.get("loss").is_none());
        assert_eq!(record.get_string("note"), Ok("second".to_string()));
    }
}

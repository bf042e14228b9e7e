use super::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use log::info;

/// Writes records through the [`log`] facade.
///
/// Aggregated values are emitted with `info!` on [`AggregateRecorder::flush`], one line
/// per flush with keys sorted alphabetically. Arrays are summarized by their length.
#[derive(Debug, Default)]
pub struct LogRecorder {
    storage: RecordStorage,
}

impl LogRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn format(record: &Record) -> String {
        let mut items = record
            .iter()
            .map(|(k, v)| match v {
                RecordValue::Scalar(v) => format!("{}={:.4}", k, v),
                RecordValue::DateTime(v) => format!("{}={}", k, v.to_rfc3339()),
                RecordValue::Array1(v) => format!("{}=[{} values]", k, v.len()),
                RecordValue::String(v) => format!("{}={}", k, v),
            })
            .collect::<Vec<_>>();
        items.sort();
        items.join(", ")
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        info!("{}", Self::format(&record));
    }
}

impl AggregateRecorder for LogRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        let record = self.storage.aggregate();
        if !record.is_empty() {
            info!("frame {}: {}", step, Self::format(&record));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sorted() {
        let record = Record::from_slice(&[
            ("loss", RecordValue::Scalar(0.25)),
            ("epsilon", RecordValue::Scalar(1.0)),
            ("atoms", RecordValue::Array1(vec![0.0; 3])),
        ]);
        assert_eq!(
            LogRecorder::format(&record),
            "atoms=[3 values], epsilon=1.0000, loss=0.2500"
        );
    }
}

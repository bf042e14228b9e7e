use super::{AggregateRecorder, Record, RecordStorage, Recorder};

/// Keeps records in memory.
///
/// Records given to [`Recorder::write`] are kept as they are. Records given to
/// [`AggregateRecorder::store`] are aggregated on [`AggregateRecorder::flush`],
/// then kept together with the step. Used to inspect training runs in tests.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    flushed: Vec<(i64, Record)>,
    storage: RecordStorage,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the written records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Returns the aggregated records with the steps at which they were flushed.
    pub fn flushed(&self) -> &[(i64, Record)] {
        &self.flushed
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}

impl AggregateRecorder for BufferedRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        let record = self.storage.aggregate();
        if !record.is_empty() {
            self.flushed.push((step, record));
        }
    }
}

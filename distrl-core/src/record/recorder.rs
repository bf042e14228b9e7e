use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);
}

/// Stores records, then aggregates and writes them with [`AggregateRecorder::flush`].
pub trait AggregateRecorder {
    /// Stores the record.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records.
    ///
    /// `step` is the number of environment steps at the time of flushing.
    fn flush(&mut self, step: i64);
}

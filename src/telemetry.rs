/// Category of a timed query, reported to the telemetry sink after a
/// successful dispatch. Timing is strictly observational: failed calls
/// never reach `record_duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Collision,
    Distance,
    Ccd,
    HighPriorityCollision,
}

/// External collaborator for query-duration reporting. The engine never
/// reads values back; this is a one-way sink.
pub trait TelemetrySink: Send + Sync {
    fn record_duration(&self, kind: QueryKind, microseconds: u64);
}

/// Default sink that discards every sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn record_duration(&self, _kind: QueryKind, _microseconds: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    struct CountingSink {
        calls: AtomicU64,
    }

    impl TelemetrySink for CountingSink {
        fn record_duration(&self, _kind: QueryKind, _microseconds: u64) {
            self.calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn null_sink_accepts_samples_without_panicking() {
        let sink = NullSink;
        sink.record_duration(QueryKind::Collision, 42);
    }

    #[test]
    fn custom_sink_observes_recorded_samples() {
        let sink = CountingSink::default();
        sink.record_duration(QueryKind::Ccd, 10);
        sink.record_duration(QueryKind::Distance, 20);
        assert_eq!(sink.calls.load(Ordering::Relaxed), 2);
    }
}

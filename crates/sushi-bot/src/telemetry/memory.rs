use super::{DecisionLogger, DecisionRecord, TelemetryError};
use parking_lot::RwLock;

/// Keeps the most recent `retention` records in memory.
#[derive(Debug)]
pub struct MemoryDecisionLog {
    retention: usize,
    records: RwLock<Vec<DecisionRecord>>,
}

impl MemoryDecisionLog {
    pub fn new(retention: usize) -> Self {
        Self {
            retention: retention.max(1),
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn push(&self, record: DecisionRecord) {
        let mut records = self.records.write();
        records.push(record);
        if records.len() > self.retention {
            let overflow = records.len() - self.retention;
            records.drain(0..overflow);
        }
    }

    pub fn snapshot(&self) -> Vec<DecisionRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }
}

impl DecisionLogger for MemoryDecisionLog {
    fn record(&self, record: &DecisionRecord) -> Result<(), TelemetryError> {
        self.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::sample_record;

    #[test]
    fn retention_drops_oldest_records() {
        let log = MemoryDecisionLog::new(2);
        for index in 0..5 {
            log.record(&sample_record(index)).unwrap();
        }
        let kept: Vec<u64> = log.snapshot().iter().map(|r| r.decision_index).collect();
        assert_eq!(kept, vec![3, 4]);
    }

    #[test]
    fn clear_empties_log() {
        let log = MemoryDecisionLog::new(0);
        log.push(sample_record(1));
        assert_eq!(log.len(), 1);
        log.clear();
        assert!(log.is_empty());
    }
}

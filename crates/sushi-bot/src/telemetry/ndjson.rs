use super::{DecisionLogger, DecisionRecord, TelemetryError};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// One JSON object per decision, appended to a single file.
#[derive(Debug)]
pub struct NdjsonDecisionLog {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl NdjsonDecisionLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TelemetryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(TelemetryError::io("creating decision log directory"))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(TelemetryError::io("opening decision log"))?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn close(self) -> Result<(), TelemetryError> {
        self.writer
            .into_inner()
            .flush()
            .map_err(TelemetryError::io("flushing decision log"))
    }
}

impl DecisionLogger for NdjsonDecisionLog {
    fn record(&self, record: &DecisionRecord) -> Result<(), TelemetryError> {
        let json = serde_json::to_string(record)?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{json}").map_err(TelemetryError::io("writing decision record"))?;
        writer
            .flush()
            .map_err(TelemetryError::io("flushing decision log"))
    }

    fn flush(&self) -> Result<(), TelemetryError> {
        self.writer
            .lock()
            .flush()
            .map_err(TelemetryError::io("flushing decision log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::sample_record;
    use tempfile::tempdir;

    #[test]
    fn appends_one_line_per_record() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("decisions.jsonl");
        let log = NdjsonDecisionLog::open(&path).expect("log opens");
        log.record(&sample_record(1)).unwrap();
        log.record(&sample_record(2)).unwrap();
        log.close().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["decision_index"], 2);
        assert_eq!(second["chosen"], "Sashimi");
    }
}

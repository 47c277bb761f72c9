use super::{DecisionLogger, DecisionRecord, TelemetryError};
use csv::{Writer, WriterBuilder};
use parking_lot::Mutex;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct TraceRow<'a> {
    round: u32,
    turn: u32,
    agent: &'a str,
    action: &'a str,
    chosen_action: &'a str,
    score: String,
    is_chosen: bool,
    best_score: &'a str,
    player_count: usize,
}

#[derive(Debug, Serialize)]
struct RegretRow<'a> {
    round: u32,
    turn: u32,
    agent: &'a str,
    chosen_action: &'a str,
    regret: String,
}

/// Flat CSV trace: one row per candidate action, plus a regret row per decision.
#[derive(Debug)]
pub struct CsvDecisionLog {
    trace_path: PathBuf,
    regret_path: PathBuf,
    trace: Mutex<Writer<File>>,
    regret: Mutex<Writer<File>>,
}

impl CsvDecisionLog {
    /// Opens (appending) `decision_trace_<label>.csv` and `regret_log.csv` in `dir`.
    pub fn open(dir: impl AsRef<Path>, label: &str) -> Result<Self, TelemetryError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(TelemetryError::io("creating trace directory"))?;
        let trace_path = dir.join(format!("decision_trace_{label}.csv"));
        let regret_path = dir.join("regret_log.csv");
        let trace = open_appending(&trace_path)?;
        let regret = open_appending(&regret_path)?;
        Ok(Self {
            trace_path,
            regret_path,
            trace: Mutex::new(trace),
            regret: Mutex::new(regret),
        })
    }

    pub fn trace_path(&self) -> &Path {
        &self.trace_path
    }

    pub fn regret_path(&self) -> &Path {
        &self.regret_path
    }

    pub fn close(self) -> Result<(), TelemetryError> {
        self.trace
            .into_inner()
            .flush()
            .map_err(TelemetryError::io("flushing decision trace"))?;
        self.regret
            .into_inner()
            .flush()
            .map_err(TelemetryError::io("flushing regret log"))
    }
}

/// Header row is emitted by the first `serialize` only when the file is new.
fn open_appending(path: &Path) -> Result<Writer<File>, TelemetryError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(TelemetryError::io("opening csv log"))?;
    let empty = file
        .metadata()
        .map_err(TelemetryError::io("reading csv log metadata"))?
        .len()
        == 0;
    Ok(WriterBuilder::new().has_headers(empty).from_writer(file))
}

fn format_score(score: Option<f64>) -> String {
    score.map(|value| format!("{value:.3}")).unwrap_or_default()
}

impl DecisionLogger for CsvDecisionLog {
    fn record(&self, record: &DecisionRecord) -> Result<(), TelemetryError> {
        let best = format_score(record.best_score());
        {
            let mut trace = self.trace.lock();
            for candidate in &record.candidates {
                trace.serialize(TraceRow {
                    round: record.round,
                    turn: record.turn,
                    agent: &record.agent,
                    action: &candidate.action,
                    chosen_action: &record.chosen,
                    score: format_score(candidate.score()),
                    is_chosen: candidate.action == record.chosen,
                    best_score: &best,
                    player_count: record.player_count,
                })?;
            }
            trace
                .flush()
                .map_err(TelemetryError::io("flushing decision trace"))?;
        }

        if let Some(regret) = record.regret() {
            let mut log = self.regret.lock();
            log.serialize(RegretRow {
                round: record.round,
                turn: record.turn,
                agent: &record.agent,
                chosen_action: &record.chosen,
                regret: format!("{regret:.3}"),
            })?;
            log.flush()
                .map_err(TelemetryError::io("flushing regret log"))?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), TelemetryError> {
        self.trace
            .lock()
            .flush()
            .map_err(TelemetryError::io("flushing decision trace"))?;
        self.regret
            .lock()
            .flush()
            .map_err(TelemetryError::io("flushing regret log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::sample_record;
    use tempfile::tempdir;

    const TRACE_HEADER: &str =
        "round,turn,agent,action,chosen_action,score,is_chosen,best_score,player_count";
    const REGRET_HEADER: &str = "round,turn,agent,chosen_action,regret";

    #[test]
    fn writes_row_per_candidate_and_regret() {
        let dir = tempdir().expect("temp dir");
        let log = CsvDecisionLog::open(dir.path(), "p3").expect("log opens");
        log.record(&sample_record(1)).unwrap();
        let trace_path = log.trace_path().to_path_buf();
        let regret_path = log.regret_path().to_path_buf();
        log.close().unwrap();

        let trace = fs::read_to_string(trace_path).unwrap();
        let lines: Vec<_> = trace.lines().collect();
        assert_eq!(lines[0], TRACE_HEADER);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "2,4,Agent1,Tempura,Sashimi,0.410,false,0.410,3");
        assert_eq!(lines[2], "2,4,Agent1,Sashimi,Sashimi,0.380,true,0.410,3");
        assert_eq!(lines[3], "2,4,Agent1,Pudding,Sashimi,,false,0.410,3");

        let regret = fs::read_to_string(regret_path).unwrap();
        let lines: Vec<_> = regret.lines().collect();
        assert_eq!(lines, vec![REGRET_HEADER, "2,4,Agent1,Sashimi,-0.030"]);
    }

    #[test]
    fn reopening_does_not_repeat_header() {
        let dir = tempdir().expect("temp dir");
        let first = CsvDecisionLog::open(dir.path(), "run").unwrap();
        first.record(&sample_record(1)).unwrap();
        first.close().unwrap();
        let second = CsvDecisionLog::open(dir.path(), "run").unwrap();
        second.record(&sample_record(2)).unwrap();
        let path = second.trace_path().to_path_buf();
        second.close().unwrap();

        let trace = fs::read_to_string(path).unwrap();
        assert_eq!(trace.matches("round,turn").count(), 1);
        assert_eq!(trace.lines().count(), 7);
    }

    #[test]
    fn agent_labels_with_commas_stay_in_one_field() {
        let dir = tempdir().expect("temp dir");
        let log = CsvDecisionLog::open(dir.path(), "quoted").unwrap();
        let mut record = sample_record(1);
        record.agent = "seat \"1\", north".to_string();
        log.record(&record).unwrap();
        let path = log.trace_path().to_path_buf();
        log.close().unwrap();

        let mut reader = csv::Reader::from_path(path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 9));
        assert_eq!(&rows[0][2], "seat \"1\", north");
    }
}

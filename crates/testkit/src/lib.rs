#![warn(missing_docs)]
//! Deterministic testing surfaces (event stream + scenario summaries).

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use voxfarm_core::SimTick;

/// Primary event record captured by headless runs and worldtests.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Human-readable kind label.
    pub kind: &'a str,
    /// Free-form payload.
    pub payload: &'a str,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create (truncate) a sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        create_parent(path.as_ref())?;
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Open a sink that appends to an existing log at `path`.
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        create_parent(path.as_ref())?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

/// End-of-run counters for a scenario.
#[derive(Debug, Default, Serialize)]
pub struct ScenarioSummary {
    /// Scenario label.
    pub scenario: String,
    /// Ticks simulated.
    pub ticks: u64,
    /// Named counters (block census, crops, inventory totals).
    pub counters: BTreeMap<String, u64>,
}

impl ScenarioSummary {
    /// Start an empty summary.
    pub fn new(scenario: impl Into<String>, ticks: u64) -> Self {
        Self {
            scenario: scenario.into(),
            ticks,
            counters: BTreeMap::new(),
        }
    }

    /// Set a counter, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: u64) {
        self.counters.insert(name.into(), value);
    }
}

/// Writes scenario summaries as pretty JSON for CI artifacts.
pub struct SummarySink {
    file: File,
}

impl SummarySink {
    /// Create a sink pointed at the supplied path, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        create_parent(path.as_ref())?;
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Persist the provided summary as pretty JSON.
    pub fn write(&mut self, summary: &ScenarioSummary) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        self.file.write_all(json.as_bytes())?;
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

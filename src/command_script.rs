use crate::commands::{parse_command, CommandError, GameCommand};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::VecDeque, fs, path::Path};
use thiserror::Error;
use voxfarm_core::SimTick;

/// Reasons a farm script is rejected at load time.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("malformed script JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("script has no steps")]
    NoSteps,
    #[error("step {index} is scheduled at tick {tick}, before tick {previous}")]
    OutOfOrder {
        index: usize,
        tick: u64,
        previous: u64,
    },
    #[error("step {index} `{line}`: {source}")]
    BadCommand {
        index: usize,
        line: String,
        #[source]
        source: CommandError,
    },
}

#[derive(Debug, Deserialize)]
struct ScriptFile {
    steps: Vec<StepDef>,
}

#[derive(Debug, Deserialize)]
struct StepDef {
    tick: u64,
    command: String,
}

/// A parsed slash command and the tick it fires on.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledCommand {
    pub tick: SimTick,
    /// Source text, kept for logs and event records.
    pub line: String,
    pub command: GameCommand,
}

/// Timed slash commands replayed against a farm session.
///
/// Every step is parsed up front, so a typo in the last step fails the load rather than the
/// run. Steps sharing a tick fire in file order.
#[derive(Debug)]
pub struct FarmScript {
    queue: VecDeque<ScheduledCommand>,
}

impl FarmScript {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read farm script {}", path.display()))?;
        let script = Self::parse(&contents)
            .with_context(|| format!("invalid farm script {}", path.display()))?;
        Ok(script)
    }

    pub fn parse(contents: &str) -> Result<Self, ScriptError> {
        let file: ScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            return Err(ScriptError::NoSteps);
        }

        let mut queue = VecDeque::with_capacity(file.steps.len());
        let mut previous = 0;
        for (index, step) in file.steps.into_iter().enumerate() {
            if step.tick < previous {
                return Err(ScriptError::OutOfOrder {
                    index,
                    tick: step.tick,
                    previous,
                });
            }
            previous = step.tick;

            let line = step.command.trim().to_string();
            // A blank line would parse as /help; scripts must say what they mean.
            let parsed = if line.is_empty() {
                Err(CommandError::new("empty command"))
            } else {
                parse_command(&line)
            };
            let command = parsed.map_err(|source| ScriptError::BadCommand {
                index,
                line: line.clone(),
                source,
            })?;
            queue.push_back(ScheduledCommand {
                tick: SimTick(step.tick),
                line,
                command,
            });
        }
        Ok(Self { queue })
    }

    /// Pop the next command due at or before `now`.
    pub fn next_due(&mut self, now: SimTick) -> Option<ScheduledCommand> {
        if self.queue.front()?.tick > now {
            return None;
        }
        self.queue.pop_front()
    }

    /// Tick of the final queued command.
    pub fn final_tick(&self) -> Option<SimTick> {
        self.queue.back().map(|step| step.tick)
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }
}

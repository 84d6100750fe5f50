use crate::command_script::{FarmScript, ScheduledCommand};
use crate::commands::{execute_command, CommandContext, CommandError, GameCommand};
use crate::config::SimConfig;
use anyhow::{Context, Result};
use glam::Vec3;
use std::path::PathBuf;
use tracing::{info, warn};
use voxfarm_core::ItemKind;
use voxfarm_testkit::{EventRecord, JsonlSink, ScenarioSummary};
use voxfarm_world::{BlockKind, FarmSession, MoveInput, PrimaryOutcome, Target, UseEffect};

pub struct HeadlessConfig {
    pub sim: SimConfig,
    pub command_script: Option<PathBuf>,
    pub exit_when_script_finished: bool,
}

/// A farm session plus the movement intent held between `/move` commands.
pub struct HeadlessSim {
    session: FarmSession,
    input: MoveInput,
}

impl HeadlessSim {
    pub fn new(sim: &SimConfig) -> Result<Self> {
        let session = FarmSession::new(
            sim.world_size_x,
            sim.world_size_z,
            sim.seed,
            sim.rules.clone(),
        )
        .context("invalid rules config")?;
        Ok(Self {
            session,
            input: MoveInput::default(),
        })
    }

    pub fn session(&self) -> &FarmSession {
        &self.session
    }

    pub fn move_input(&self) -> MoveInput {
        self.input
    }

    /// Run one command, returning its output lines.
    pub fn execute(&mut self, command: GameCommand) -> Result<Vec<String>, CommandError> {
        Ok(execute_command(self, command)?.lines)
    }

    #[cfg(test)]
    fn run_command(&mut self, line: &str) -> Result<Vec<String>, CommandError> {
        self.execute(crate::commands::parse_command(line)?)
    }
}

impl CommandContext for HeadlessSim {
    fn player_position(&self) -> Vec3 {
        self.session.player().position
    }

    fn primary_action(&mut self, target: Target) -> PrimaryOutcome {
        self.session.primary_action(Some(&target))
    }

    fn secondary_action(&mut self, target: Target) -> Option<UseEffect> {
        self.session.secondary_action(Some(&target))
    }

    fn selected_slot(&self) -> usize {
        self.session.inventory().selected_index()
    }

    fn selected_item(&self) -> Option<ItemKind> {
        self.session.inventory().selected_item()
    }

    fn select_slot(&mut self, index: usize) {
        self.session.select_slot(index);
    }

    fn scroll_slot(&mut self, delta: i32) {
        self.session.scroll_slot(delta);
    }

    fn give_item(&mut self, item: ItemKind, count: u32) -> u32 {
        self.session.inventory_mut().add_item(item, count)
    }

    fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockKind) -> bool {
        self.session.world_mut().set_block(x, y, z, block)
    }

    fn set_move_input(&mut self, input: MoveInput) {
        self.input = input;
    }

    fn status_lines(&self) -> Vec<String> {
        let session = &self.session;
        let world = session.world();
        let player = session.player();
        let inventory = session.inventory();

        let mut lines = vec![
            format!(
                "Tick {} t={:.2}s",
                session.current_tick().0,
                session.clock().elapsed
            ),
            format!(
                "Player at {:.2} {:.2} {:.2}{}",
                player.position.x,
                player.position.y,
                player.position.z,
                if player.on_ground { " (on ground)" } else { "" }
            ),
        ];
        let held = match inventory.selected() {
            Some(stack) => format!("{} x{}", stack.item.display_name(), stack.count),
            None => "empty".to_string(),
        };
        lines.push(format!("Slot {}: {held}", inventory.selected_index() + 1));
        lines.push(format!(
            "Crops: {} ({} mature), drops on ground: {}",
            world.crop_count(),
            world.mature_crop_count(),
            session.drops().count()
        ));
        let census = world
            .block_census()
            .into_iter()
            .map(|(block, count)| format!("{block}={count}"))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("Blocks: {census}"));
        lines
    }
}

#[derive(Debug, Default)]
struct RunCounters {
    commands: u64,
    command_errors: u64,
    picked_up: u64,
    block_rebuilds: u64,
    crop_rebuilds: u64,
}

pub fn run(cfg: HeadlessConfig) -> Result<ScenarioSummary> {
    let mut sim = HeadlessSim::new(&cfg.sim)?;
    let mut script = cfg
        .command_script
        .as_deref()
        .map(FarmScript::load)
        .transpose()?;
    let mut events = cfg
        .sim
        .event_log
        .as_deref()
        .map(|path| {
            JsonlSink::create(path)
                .with_context(|| format!("failed to create event log {}", path.display()))
        })
        .transpose()?;

    info!(
        seed = cfg.sim.seed,
        max_ticks = cfg.sim.max_ticks,
        script_steps = script.as_ref().map_or(0, FarmScript::remaining),
        script_end = ?script.as_ref().and_then(FarmScript::final_tick),
        "headless run starting"
    );

    let mut counters = RunCounters::default();
    while sim.session.current_tick().0 < cfg.sim.max_ticks {
        let tick = sim.session.current_tick();
        if let Some(script) = script.as_mut() {
            while let Some(step) = script.next_due(tick) {
                run_scheduled(&mut sim, step, events.as_mut(), &mut counters)?;
            }
            if cfg.exit_when_script_finished && script.is_finished() {
                info!(tick = tick.0, "command script finished");
                break;
            }
        }

        let input = sim.move_input();
        let report = sim.session.tick(cfg.sim.frame_dt, &input);
        for (item, count) in &report.picked_up {
            counters.picked_up += u64::from(*count);
            if let Some(sink) = events.as_mut() {
                sink.write(&EventRecord {
                    tick: sim.session.current_tick(),
                    kind: "pickup",
                    payload: &format!("{}x{count}", item.key()),
                })?;
            }
        }

        // Stand-in for the renderer: rebuild whenever the grid reports changes.
        let world = sim.session.world_mut();
        if world.consume_dirty_blocks() {
            counters.block_rebuilds += 1;
        }
        if world.consume_dirty_crops() {
            counters.crop_rebuilds += 1;
        }
    }

    let summary = build_summary(&sim, &counters);
    for (name, value) in &summary.counters {
        info!(counter = name.as_str(), value, "summary");
    }
    let payload = serde_json::to_string(&summary)?;
    let record = EventRecord {
        tick: sim.session.current_tick(),
        kind: "summary",
        payload: &payload,
    };
    if let Some(sink) = events.as_mut() {
        sink.write(&record)?;
    }
    if let Some(path) = cfg.sim.summary_log.as_deref() {
        JsonlSink::append(path)
            .and_then(|mut sink| sink.write(&record))
            .with_context(|| format!("failed to append summary to {}", path.display()))?;
    }
    Ok(summary)
}

fn run_scheduled(
    sim: &mut HeadlessSim,
    step: ScheduledCommand,
    events: Option<&mut JsonlSink>,
    counters: &mut RunCounters,
) -> Result<()> {
    counters.commands += 1;
    let ScheduledCommand {
        tick,
        line,
        command,
    } = step;
    let (kind, payload) = match sim.execute(command) {
        Ok(lines) => {
            for out in &lines {
                info!(tick = tick.0, command = line.as_str(), "{out}");
            }
            ("command", format!("{line} => {}", lines.join("; ")))
        }
        Err(err) => {
            counters.command_errors += 1;
            warn!(tick = tick.0, command = line.as_str(), "command refused: {err}");
            ("command_error", format!("{line} => {err}"))
        }
    };
    if let Some(sink) = events {
        sink.write(&EventRecord {
            tick,
            kind,
            payload: &payload,
        })?;
    }
    Ok(())
}

fn build_summary(sim: &HeadlessSim, counters: &RunCounters) -> ScenarioSummary {
    let session = sim.session();
    let world = session.world();
    let mut summary = ScenarioSummary::new("headless", session.current_tick().0);

    for (block, count) in world.block_census() {
        summary.set(format!("block.{block}"), count as u64);
    }
    summary.set("crops", world.crop_count() as u64);
    summary.set("crops.mature", world.mature_crop_count() as u64);
    summary.set("drops", session.drops().count() as u64);
    for item in ItemKind::ALL {
        let count = session.inventory().count_item(item);
        if count > 0 {
            summary.set(format!("item.{}", item.key()), u64::from(count));
        }
    }
    summary.set("commands", counters.commands);
    summary.set("commands.failed", counters.command_errors);
    summary.set("picked_up", counters.picked_up);
    summary.set("rebuilds.blocks", counters.block_rebuilds);
    summary.set("rebuilds.crops", counters.crop_rebuilds);
    summary
}

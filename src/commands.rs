use glam::{IVec3, Vec3};
use thiserror::Error;
use voxfarm_core::ItemKind;
use voxfarm_world::{BlockKind, MoveInput, PrimaryOutcome, Target, UseEffect, HOTBAR_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Block coordinate, either absolute or `~offset` from the player's feet cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCoordArg {
    Absolute(i32),
    Relative(i32),
}

impl BlockCoordArg {
    pub fn resolve(self, base: i32) -> i32 {
        match self {
            Self::Absolute(v) => v,
            Self::Relative(delta) => base.saturating_add(delta),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellArg {
    pub x: BlockCoordArg,
    pub y: BlockCoordArg,
    pub z: BlockCoordArg,
}

impl CellArg {
    fn resolve(self, feet: Vec3) -> IVec3 {
        let base = feet.floor().as_ivec3();
        IVec3::new(
            self.x.resolve(base.x),
            self.y.resolve(base.y),
            self.z.resolve(base.z),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameCommand {
    Help,
    Break {
        cell: CellArg,
    },
    Use {
        cell: CellArg,
        normal: IVec3,
    },
    Harvest {
        x: BlockCoordArg,
        z: BlockCoordArg,
    },
    /// Zero-based hotbar index.
    Select {
        slot: usize,
    },
    Scroll {
        delta: i32,
    },
    Give {
        item: ItemKind,
        count: u32,
    },
    Setblock {
        cell: CellArg,
        block: BlockKind,
    },
    Move {
        input: MoveInput,
    },
    Status,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub lines: Vec<String>,
}

pub trait CommandContext {
    fn player_position(&self) -> Vec3;

    fn primary_action(&mut self, target: Target) -> PrimaryOutcome;
    fn secondary_action(&mut self, target: Target) -> Option<UseEffect>;

    fn selected_slot(&self) -> usize;
    fn selected_item(&self) -> Option<ItemKind>;
    fn select_slot(&mut self, index: usize);
    fn scroll_slot(&mut self, delta: i32);

    /// Attempt to give items to the player. Returns leftover count if inventory is full.
    fn give_item(&mut self, item: ItemKind, count: u32) -> u32;

    fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockKind) -> bool;

    /// Replace the movement intent applied on every following tick.
    fn set_move_input(&mut self, input: MoveInput);

    fn status_lines(&self) -> Vec<String>;
}

/// Run a parsed command. Commands the world refuses (a guarded `/setblock`, an empty `/give`)
/// return an error and leave the session unchanged.
pub fn execute_command(
    ctx: &mut impl CommandContext,
    cmd: GameCommand,
) -> Result<CommandOutput, CommandError> {
    let mut out = CommandOutput::default();
    match cmd {
        GameCommand::Help => {
            out.lines.extend(help_lines());
        }
        GameCommand::Break { cell } => {
            let cell = cell.resolve(ctx.player_position());
            let outcome = ctx.primary_action(Target::block(cell, Vec3::Y));
            out.lines.push(describe_primary(outcome, cell, false));
        }
        GameCommand::Harvest { x, z } => {
            let base = ctx.player_position().floor().as_ivec3();
            let (x, z) = (x.resolve(base.x), z.resolve(base.z));
            let outcome = ctx.primary_action(Target::crop(x, z));
            out.lines.push(describe_primary(outcome, IVec3::new(x, 1, z), true));
        }
        GameCommand::Use { cell, normal } => {
            let cell = cell.resolve(ctx.player_position());
            let held = ctx.selected_item();
            match ctx.secondary_action(Target::block(cell, normal.as_vec3())) {
                Some(effect) => out.lines.push(describe_use(effect)),
                None => out.lines.push(match held {
                    Some(item) => format!(
                        "{} has no effect at {} {} {}",
                        item.display_name(),
                        cell.x,
                        cell.y,
                        cell.z
                    ),
                    None => "Empty hand has no use".to_string(),
                }),
            }
        }
        GameCommand::Select { slot } => {
            ctx.select_slot(slot);
            out.lines.push(describe_selection(ctx));
        }
        GameCommand::Scroll { delta } => {
            ctx.scroll_slot(delta);
            out.lines.push(describe_selection(ctx));
        }
        GameCommand::Give { item, count } => {
            if count == 0 {
                return Err(CommandError::new("give count must be > 0"));
            }
            let leftover = ctx.give_item(item, count);
            let given = count.saturating_sub(leftover);
            if given > 0 {
                out.lines.push(format!("Gave {given}× {}", item.key()));
            }
            if leftover > 0 {
                out.lines.push(format!("Inventory full; {leftover}× not given"));
            }
        }
        GameCommand::Setblock { cell, block } => {
            let cell = cell.resolve(ctx.player_position());
            if !ctx.set_block(cell.x, cell.y, cell.z, block) {
                return Err(CommandError::new(format!(
                    "cannot set {} {} {} to {block}",
                    cell.x, cell.y, cell.z
                )));
            }
            out.lines.push(format!(
                "Set block at {} {} {} to {block}",
                cell.x, cell.y, cell.z
            ));
        }
        GameCommand::Move { input } => {
            ctx.set_move_input(input);
            let mut line = format!(
                "Moving forward={:.2} strafe={:.2}",
                input.forward, input.strafe
            );
            if input.sprint {
                line.push_str(" sprint");
            }
            if input.jump {
                line.push_str(" jump");
            }
            out.lines.push(line);
        }
        GameCommand::Status => {
            out.lines.extend(ctx.status_lines());
        }
    }
    Ok(out)
}

fn describe_primary(outcome: PrimaryOutcome, cell: IVec3, crop: bool) -> String {
    match outcome {
        PrimaryOutcome::Nothing if crop => {
            format!("Nothing ready to harvest at {} {}", cell.x, cell.z)
        }
        PrimaryOutcome::Nothing => {
            format!("Nothing to break at {} {} {}", cell.x, cell.y, cell.z)
        }
        PrimaryOutcome::Harvested { cell, crop, count } => format!(
            "Harvested {count}× {} at {} {}",
            crop.harvest_item().key(),
            cell.x,
            cell.z
        ),
        PrimaryOutcome::Broken { cell, block } => {
            format!("Broke {block} at {} {} {}", cell.x, cell.y, cell.z)
        }
    }
}

fn describe_use(effect: UseEffect) -> String {
    match effect {
        UseEffect::FillBucket { drain: Some(cell) } => {
            format!("Filled bucket from {} {} {}", cell.x, cell.y, cell.z)
        }
        UseEffect::FillBucket { drain: None } => "Filled bucket from the source".to_string(),
        UseEffect::PourWater { cell, .. } => {
            format!("Poured water at {} {} {}", cell.x, cell.y, cell.z)
        }
        UseEffect::Till { x, z } => format!("Tilled {x} {z}"),
        UseEffect::Plant { x, z, crop } => format!("Planted {crop:?} at {x} {z}"),
        UseEffect::PlaceDirt { cell } => {
            format!("Placed dirt at {} {} {}", cell.x, cell.y, cell.z)
        }
    }
}

fn describe_selection(ctx: &impl CommandContext) -> String {
    let name = ctx
        .selected_item()
        .map(ItemKind::display_name)
        .unwrap_or("empty");
    format!("Selected slot {} ({name})", ctx.selected_slot() + 1)
}

pub fn parse_command(input: &str) -> Result<GameCommand, CommandError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(GameCommand::Help);
    }

    let input = input.strip_prefix('/').unwrap_or(input).trim();
    if input.is_empty() {
        return Ok(GameCommand::Help);
    }

    let mut parts = input.split_whitespace();
    let cmd = parts
        .next()
        .ok_or_else(|| CommandError::new("Missing command"))?
        .to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    match cmd.as_str() {
        "help" | "?" => Ok(GameCommand::Help),
        "status" => Ok(GameCommand::Status),
        "break" => {
            if args.len() != 3 {
                return Err(CommandError::new("Usage: /break <x> <y> <z>"));
            }
            Ok(GameCommand::Break {
                cell: parse_cell(&args)?,
            })
        }
        "use" => {
            if args.len() != 6 {
                return Err(CommandError::new("Usage: /use <x> <y> <z> <nx> <ny> <nz>"));
            }
            Ok(GameCommand::Use {
                cell: parse_cell(&args[..3])?,
                normal: parse_normal(&args[3..])?,
            })
        }
        "harvest" => {
            if args.len() != 2 {
                return Err(CommandError::new("Usage: /harvest <x> <z>"));
            }
            Ok(GameCommand::Harvest {
                x: parse_block_coord(args[0])?,
                z: parse_block_coord(args[1])?,
            })
        }
        "select" => {
            if args.len() != 1 {
                return Err(CommandError::new("Usage: /select <1-9>"));
            }
            let slot = args[0]
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=HOTBAR_SIZE).contains(n))
                .ok_or_else(|| CommandError::new("Usage: /select <1-9>"))?;
            Ok(GameCommand::Select { slot: slot - 1 })
        }
        "scroll" => {
            if args.len() != 1 {
                return Err(CommandError::new("Usage: /scroll <delta>"));
            }
            let delta = args[0]
                .trim_start_matches('+')
                .parse::<i32>()
                .map_err(|_| CommandError::new("Invalid scroll delta"))?;
            Ok(GameCommand::Scroll { delta })
        }
        "give" => {
            if !(1..=2).contains(&args.len()) {
                return Err(CommandError::new("Usage: /give <item> [count]"));
            }
            let item = args[0]
                .parse::<ItemKind>()
                .map_err(|err| CommandError::new(err.to_string()))?;
            let count = if args.len() == 2 {
                parse_positive_u32(args[1])
                    .ok_or_else(|| CommandError::new("Invalid give count"))?
            } else {
                1
            };
            Ok(GameCommand::Give { item, count })
        }
        "setblock" => {
            if args.len() != 4 {
                return Err(CommandError::new("Usage: /setblock <x> <y> <z> <block>"));
            }
            let block = args[3]
                .parse::<BlockKind>()
                .map_err(|err| CommandError::new(err.to_string()))?;
            Ok(GameCommand::Setblock {
                cell: parse_cell(&args[..3])?,
                block,
            })
        }
        "move" => parse_move_command(&args),
        _ => Err(CommandError::new(format!("Unknown command: {cmd}. Try /help"))),
    }
}

fn parse_positive_u32(s: &str) -> Option<u32> {
    s.parse::<u32>().ok().filter(|value| *value > 0)
}

fn parse_block_coord(s: &str) -> Result<BlockCoordArg, CommandError> {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix('~') {
        if rest.is_empty() {
            return Ok(BlockCoordArg::Relative(0));
        }
        let delta = rest
            .parse::<i32>()
            .map_err(|_| CommandError::new(format!("Invalid relative block coordinate: {s}")))?;
        return Ok(BlockCoordArg::Relative(delta));
    }
    let value = s
        .parse::<i32>()
        .map_err(|_| CommandError::new(format!("Invalid block coordinate: {s}")))?;
    Ok(BlockCoordArg::Absolute(value))
}

fn parse_cell(args: &[&str]) -> Result<CellArg, CommandError> {
    Ok(CellArg {
        x: parse_block_coord(args[0])?,
        y: parse_block_coord(args[1])?,
        z: parse_block_coord(args[2])?,
    })
}

fn parse_normal(args: &[&str]) -> Result<IVec3, CommandError> {
    let mut axes = [0i32; 3];
    for (axis, token) in axes.iter_mut().zip(args) {
        *axis = token
            .parse::<i32>()
            .ok()
            .filter(|v| (-1..=1).contains(v))
            .ok_or_else(|| CommandError::new(format!("Invalid normal component: {token}")))?;
    }
    let normal = IVec3::from_array(axes);
    if normal.x.abs() + normal.y.abs() + normal.z.abs() != 1 {
        return Err(CommandError::new("Normal must point along exactly one axis"));
    }
    Ok(normal)
}

fn parse_move_command(args: &[&str]) -> Result<GameCommand, CommandError> {
    const USAGE: &str = "Usage: /move <forward> <strafe> [sprint] [jump]";
    if !(2..=4).contains(&args.len()) {
        return Err(CommandError::new(USAGE));
    }
    let axis = |token: &str| {
        token
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(-1.0, 1.0))
            .ok_or_else(|| CommandError::new(format!("Invalid move axis: {token}")))
    };
    let mut input = MoveInput {
        forward: axis(args[0])?,
        strafe: axis(args[1])?,
        ..MoveInput::default()
    };
    for flag in &args[2..] {
        match flag.to_ascii_lowercase().as_str() {
            "sprint" => input.sprint = true,
            "jump" => input.jump = true,
            _ => return Err(CommandError::new(USAGE)),
        }
    }
    Ok(GameCommand::Move { input })
}

fn help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  /help".to_string(),
        "  /break <x> <y> <z>                 (supports ~offset)".to_string(),
        "  /use <x> <y> <z> <nx> <ny> <nz>    use the selected item on a face".to_string(),
        "  /harvest <x> <z>".to_string(),
        "  /select <1-9>".to_string(),
        "  /scroll <delta>".to_string(),
        "  /give <item> [count]".to_string(),
        "  /setblock <x> <y> <z> <block>".to_string(),
        "  /move <forward> <strafe> [sprint] [jump]".to_string(),
        "  /status".to_string(),
    ]
}

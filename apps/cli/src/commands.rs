//! Line-oriented command language for driving a session headless.

use anyhow::{anyhow, bail, Context, Result};
use dispatch_core::{BuildingTypeId, Position, VehicleKind};
use dispatch_runtime::{DisplaySurface, MapSurface, Orchestrator};
use persistence::KeyValueStore;
use std::io::BufRead;
use tracing::warn;

/// One player interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `select <type>`
    Select(BuildingTypeId),
    /// `click <lat> <lng>`
    Click(Position),
    /// `open <type> <lat> <lng>`
    Open(BuildingTypeId, Position),
    /// `buy <type> <lat> <lng> <vehicle name>`
    Buy(BuildingTypeId, Position, VehicleKind),
    /// `cancel`
    Cancel,
    /// `status`
    Status,
}

/// Parse a line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let rest: Vec<&str> = words.collect();
    let cmd = match (verb.as_str(), rest.as_slice()) {
        ("select", [kind]) => Command::Select(kind.parse()?),
        ("click", [lat, lng]) => Command::Click(position(lat, lng)?),
        ("open", [kind, lat, lng]) => Command::Open(kind.parse()?, position(lat, lng)?),
        ("buy", [kind, lat, lng, name @ ..]) if !name.is_empty() => Command::Buy(
            kind.parse()?,
            position(lat, lng)?,
            name.join(" ").parse()?,
        ),
        ("cancel", []) => Command::Cancel,
        ("status", []) => Command::Status,
        _ => bail!("unrecognised command: {line}"),
    };
    Ok(Some(cmd))
}

fn position(lat: &str, lng: &str) -> Result<Position> {
    let lat: f64 = lat.parse().with_context(|| format!("bad latitude {lat}"))?;
    let lng: f64 = lng.parse().with_context(|| format!("bad longitude {lng}"))?;
    if !(lat.is_finite() && lng.is_finite()) {
        return Err(anyhow!("coordinates must be finite"));
    }
    Ok(Position::new(lat, lng))
}

/// Counts reported at the end of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub executed: usize,
    pub rejected: usize,
    pub invalid: usize,
}

/// Apply one command.
pub fn apply<S, M, D>(orchestrator: &mut Orchestrator<S, M, D>, cmd: Command) -> bool
where
    S: KeyValueStore,
    M: MapSurface,
    D: DisplaySurface,
{
    match cmd {
        Command::Select(kind) => orchestrator.select_building(kind).is_ok(),
        Command::Click(position) => match orchestrator.handle_surface_click(position) {
            Some(result) => result.is_ok(),
            None => {
                println!("no building selected");
                false
            }
        },
        Command::Open(kind, position) => orchestrator.open_building(kind, position).is_ok(),
        Command::Buy(kind, position, vehicle) => {
            orchestrator.purchase(kind, position, vehicle).is_ok()
        }
        Command::Cancel => orchestrator.cancel_placement(),
        Command::Status => {
            print_status(orchestrator);
            true
        }
    }
}

fn print_status<S, M, D>(orchestrator: &Orchestrator<S, M, D>)
where
    S: KeyValueStore,
    M: MapSurface,
    D: DisplaySurface,
{
    let store = orchestrator.store();
    println!(
        "budget: ${} | buildings: {} | vehicles: {} | placement: {:?}",
        store.budget(),
        store.buildings().len(),
        store.vehicles().len(),
        orchestrator.placement()
    );
    for b in store.buildings() {
        println!("  {} {} at {}", b.kind.marker_icon(), b.kind, b.position);
    }
    for v in store.vehicles() {
        println!("  {} [{:?}] at {} {}", v.kind, v.status, v.building_type, v.position);
    }
}

/// Run every command from `input` against the orchestrator.
pub fn run_session<S, M, D, R>(
    orchestrator: &mut Orchestrator<S, M, D>,
    input: R,
) -> Result<SessionSummary>
where
    S: KeyValueStore,
    M: MapSurface,
    D: DisplaySurface,
    R: BufRead,
{
    let mut summary = SessionSummary::default();
    for (n, line) in input.lines().enumerate() {
        let line = line.context("reading commands")?;
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(cmd)) => {
                if apply(orchestrator, cmd) {
                    summary.executed += 1;
                } else {
                    summary.rejected += 1;
                }
            }
            Err(err) => {
                warn!(line = n + 1, error = %err, "skipping command");
                summary.invalid += 1;
            }
        }
    }
    Ok(summary)
}

//! Headless session loop that drives a full simulation without a display.

use anyhow::{Context, Result as AnyResult};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slither_core::{Command, Event, MatchPhase, PadState};
use slither_rendering::{present, Scene, TextSurface};
use slither_system_control::Control;
use slither_system_pilot::{Config as PilotConfig, Pilot};
use slither_world::{apply, query, World};

/// Parameters describing one headless session.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Config {
    /// Raw frames to simulate.
    pub ticks: u32,
    /// Seed for the session; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Human seats to claim at the first frame; zero stays in attract.
    pub humans: u8,
    /// Grid width in cells.
    pub columns: u32,
    /// Grid height in cells.
    pub rows: u32,
}

/// Summary of a finished session.
#[derive(Clone, Debug)]
pub(crate) struct Report {
    /// Raw frames that were simulated.
    pub ticks: u32,
    /// Rounds that reached a result.
    pub rounds: u32,
    /// Matches that crowned a winner.
    pub matches: u32,
    /// Scores of players one and two when the session stopped.
    pub scores: [u16; 2],
    /// Human seats still claimed when the session stopped.
    #[allow(dead_code)]
    pub humans: u8,
    /// Phase the world was in when the session stopped.
    pub phase: MatchPhase,
    /// Text rendering of the final frame.
    pub final_frame: String,
}

/// Runs the session to completion and reports what happened.
pub(crate) fn run(config: Config) -> AnyResult<Report> {
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut world = World::with_grid(config.columns, config.rows)
        .context("requested grid cannot host a session")?;
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::SeedRandom {
            seed: rng.next_u64(),
        },
        &mut events,
    );

    let control = Control::new();
    let mut pilot = Pilot::new(PilotConfig::new(rng.next_u64()));

    let mut rounds = 0;
    let mut matches = 0;
    for tick in 0..config.ticks {
        let pads = scripted_pads(tick, config.humans);

        let mut commands = Vec::new();
        control.handle(
            pads,
            query::phase(&world),
            &query::player_view(&world),
            &mut commands,
        );
        events.clear();
        for command in commands {
            apply(&mut world, command, &mut events);
        }

        apply(&mut world, Command::Tick, &mut events);
        if events.contains(&Event::StepReady) {
            let mut steering = Vec::new();
            pilot.handle(
                &events,
                &query::player_view(&world),
                query::occupancy_view(&world),
                query::pickup(&world),
                &mut steering,
            );
            for command in steering {
                apply(&mut world, command, &mut events);
            }
            apply(&mut world, Command::Step, &mut events);
        }

        rounds += events
            .iter()
            .filter(|event| matches!(event, Event::RoundEnded { .. }))
            .count() as u32;
        matches += events
            .iter()
            .filter(|event| matches!(event, Event::MatchEnded { .. }))
            .count() as u32;
    }

    let scene = Scene::compose(
        query::occupancy_view(&world),
        &query::player_view(&world),
        query::phase(&world),
        query::scores(&world),
    );
    let mut surface = TextSurface::new();
    present(&scene, &mut surface).context("final frame could not be presented")?;

    Ok(Report {
        ticks: config.ticks,
        rounds,
        matches,
        scores: query::scores(&world),
        humans: query::humans(&world),
        phase: query::phase(&world),
        final_frame: surface.render(),
    })
}

/// Pads for the given frame: the requested seats press their start button
/// on the first frame and release everything afterwards.
fn scripted_pads(tick: u32, humans: u8) -> [PadState; 2] {
    if tick == 0 {
        match humans {
            1 => [PadState::from_bits(PadState::BUTTON_A), PadState::released()],
            2 => [PadState::from_bits(PadState::BUTTON_B), PadState::released()],
            _ => [PadState::released(); 2],
        }
    } else {
        [PadState::released(); 2]
    }
}

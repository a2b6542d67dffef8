//! Attract-mode behaviour driven through the control system and world.

use slither_core::{Command, Event, MatchPhase, PadState, FLASH_HOLD_TICKS};
use slither_system_control::Control;
use slither_world::{apply, query, World};

fn pump(world: &mut World, pads: [PadState; 2]) -> Vec<Event> {
    let control = Control::new();
    let mut commands = Vec::new();
    control.handle(pads, query::phase(world), &query::player_view(world), &mut commands);

    let mut events = Vec::new();
    for command in commands {
        apply(world, command, &mut events);
    }
    apply(world, Command::Tick, &mut events);
    if events.contains(&Event::StepReady) {
        apply(world, Command::Step, &mut events);
    }
    events
}

#[test]
fn attract_demo_cycles_rounds_without_scoring() {
    let mut world = World::new();
    assert_eq!(query::phase(&world), MatchPhase::Attract);

    let mut rounds_started = 0;
    for _ in 0..4_000 {
        let events = pump(&mut world, [PadState::released(); 2]);
        rounds_started += events
            .iter()
            .filter(|event| matches!(event, Event::RoundStarted { .. }))
            .count();
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::MatchStarted { .. })));
    }

    assert_eq!(query::humans(&world), 0);
    assert_eq!(query::scores(&world), [0, 0]);
    assert!(rounds_started >= 1);
}

#[test]
fn pressing_start_leaves_attract_for_a_match() {
    let mut world = World::new();
    let events = pump(&mut world, [PadState::from_bits(PadState::BUTTON_A), PadState::released()]);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::MatchStarted { .. })));
    assert_eq!(query::phase(&world), MatchPhase::Playing);
    assert_eq!(query::humans(&world), 1);
    let view = query::player_view(&world);
    assert!(view.get(slither_core::PlayerId::One).expect("snapshot").human);
}

#[test]
fn start_presses_during_a_round_result_are_ignored() {
    let mut world = World::new();
    let _ = pump(&mut world, [PadState::from_bits(PadState::BUTTON_A), PadState::released()]);

    // Steer player one into the top border to end the round.
    for _ in 0..2_000 {
        let events = pump(&mut world, [PadState::from_bits(PadState::UP), PadState::released()]);
        if events
            .iter()
            .any(|event| matches!(event, Event::RoundEnded { .. }))
        {
            break;
        }
    }
    assert_eq!(query::phase(&world), MatchPhase::RoundOver);

    let events = pump(&mut world, [PadState::from_bits(PadState::BUTTON_B), PadState::released()]);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::MatchStarted { .. })));
    assert_eq!(query::humans(&world), 1);

    for _ in 0..u32::from(FLASH_HOLD_TICKS) {
        let _ = pump(&mut world, [PadState::released(); 2]);
    }
    assert_eq!(query::phase(&world), MatchPhase::Playing);
}

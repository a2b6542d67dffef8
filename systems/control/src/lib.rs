#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pad-driven control system that turns raw input into world commands.
//!
//! The system is stateless: each call inspects the latest pad sample for
//! both ports together with the current match phase and player snapshots,
//! and emits start or steering commands. Reversal suppression lives here
//! rather than in the world, so autonomous players stay unconstrained.

use slither_core::{Command, Direction, HumanCount, MatchPhase, PadState, PlayerView};

/// Stateless system that maps pad samples onto world commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Control;

impl Control {
    /// Creates a new control system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes one pad sample per port and emits the resulting commands.
    pub fn handle(
        &self,
        pads: [PadState; 2],
        phase: MatchPhase,
        players: &PlayerView,
        out: &mut Vec<Command>,
    ) {
        for pad in pads {
            if phase == MatchPhase::Attract {
                if pad.pressed(PadState::BUTTON_A) {
                    out.push(Command::StartMatch {
                        humans: HumanCount::One,
                    });
                    return;
                }
                if pad.pressed(PadState::BUTTON_B) {
                    out.push(Command::StartMatch {
                        humans: HumanCount::Two,
                    });
                    return;
                }
            }
        }

        if phase != MatchPhase::Playing {
            return;
        }

        for (snapshot, pad) in players.iter().zip(pads) {
            if !snapshot.human {
                continue;
            }
            let Some(requested) = requested_direction(pad) else {
                continue;
            };
            if requested == snapshot.direction || requested == snapshot.direction.opposite() {
                continue;
            }
            out.push(Command::SetDirection {
                player: snapshot.id,
                direction: requested,
            });
        }
    }
}

/// Resolves a pad sample into a heading. When several directional bits are
/// held at once the later-checked bit wins, so down beats up beats right
/// beats left.
fn requested_direction(pad: PadState) -> Option<Direction> {
    let mut requested = None;
    if pad.pressed(PadState::LEFT) {
        requested = Some(Direction::West);
    }
    if pad.pressed(PadState::RIGHT) {
        requested = Some(Direction::East);
    }
    if pad.pressed(PadState::UP) {
        requested = Some(Direction::North);
    }
    if pad.pressed(PadState::DOWN) {
        requested = Some(Direction::South);
    }
    requested
}

#[cfg(test)]
mod tests {
    use super::Control;
    use slither_core::{
        Command, Direction, GridCoord, HumanCount, MatchPhase, PadState, PlayerId, PlayerSnapshot,
        PlayerView,
    };

    fn playing_view(first_human: bool, second_human: bool) -> PlayerView {
        PlayerView::from_snapshots(vec![
            PlayerSnapshot {
                id: PlayerId::One,
                cell: GridCoord::new(5, 5),
                direction: Direction::East,
                score: 0,
                human: first_human,
                collided: false,
                length: 2,
            },
            PlayerSnapshot {
                id: PlayerId::Two,
                cell: GridCoord::new(26, 21),
                direction: Direction::West,
                score: 0,
                human: second_human,
                collided: false,
                length: 2,
            },
        ])
    }

    fn commands(
        pads: [PadState; 2],
        phase: MatchPhase,
        players: &PlayerView,
    ) -> Vec<Command> {
        let mut out = Vec::new();
        Control::new().handle(pads, phase, players, &mut out);
        out
    }

    #[test]
    fn button_a_starts_a_single_human_match() {
        let out = commands(
            [PadState::from_bits(PadState::BUTTON_A), PadState::released()],
            MatchPhase::Attract,
            &playing_view(false, false),
        );
        assert_eq!(
            out,
            vec![Command::StartMatch {
                humans: HumanCount::One,
            }]
        );
    }

    #[test]
    fn button_b_starts_a_two_human_match_from_either_pad() {
        let out = commands(
            [PadState::released(), PadState::from_bits(PadState::BUTTON_B)],
            MatchPhase::Attract,
            &playing_view(false, false),
        );
        assert_eq!(
            out,
            vec![Command::StartMatch {
                humans: HumanCount::Two,
            }]
        );
    }

    #[test]
    fn start_buttons_are_ignored_outside_attract() {
        let out = commands(
            [PadState::from_bits(PadState::BUTTON_A), PadState::released()],
            MatchPhase::Playing,
            &playing_view(true, false),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn directional_input_steers_the_human_player() {
        let out = commands(
            [PadState::from_bits(PadState::UP), PadState::released()],
            MatchPhase::Playing,
            &playing_view(true, false),
        );
        assert_eq!(
            out,
            vec![Command::SetDirection {
                player: PlayerId::One,
                direction: Direction::North,
            }]
        );
    }

    #[test]
    fn reversal_requests_are_suppressed() {
        let out = commands(
            [PadState::from_bits(PadState::LEFT), PadState::released()],
            MatchPhase::Playing,
            &playing_view(true, false),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn autonomous_players_ignore_pad_input() {
        let out = commands(
            [PadState::released(), PadState::from_bits(PadState::DOWN)],
            MatchPhase::Playing,
            &playing_view(true, false),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn second_pad_steers_the_second_human() {
        let out = commands(
            [PadState::released(), PadState::from_bits(PadState::DOWN)],
            MatchPhase::Playing,
            &playing_view(true, true),
        );
        assert_eq!(
            out,
            vec![Command::SetDirection {
                player: PlayerId::Two,
                direction: Direction::South,
            }]
        );
    }

    #[test]
    fn held_direction_matching_the_heading_is_silent() {
        let out = commands(
            [PadState::from_bits(PadState::RIGHT), PadState::released()],
            MatchPhase::Playing,
            &playing_view(true, false),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn opposed_bits_resolve_by_fixed_priority() {
        let pad = PadState::from_bits(PadState::UP | PadState::DOWN);
        let out = commands(
            [pad, PadState::released()],
            MatchPhase::Playing,
            &playing_view(true, false),
        );
        assert_eq!(
            out,
            vec![Command::SetDirection {
                player: PlayerId::One,
                direction: Direction::South,
            }]
        );
    }
}

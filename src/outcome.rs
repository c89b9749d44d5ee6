use crate::engine::ChessState;
use crate::snapshot::{GameSnapshot, PlayerHandle};

/// What the position after a move means for the game, with fixed
/// precedence: checkmate > stalemate > other draw > check > ongoing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassifiedOutcome {
    Ongoing {
        check: bool,
    },
    Checkmate {
        winner: PlayerHandle,
        loser: PlayerHandle,
    },
    Stalemate {
        players: (PlayerHandle, PlayerHandle),
    },
    Draw {
        players: (PlayerHandle, PlayerHandle),
    },
}

pub fn classify(state: &ChessState, snapshot: &GameSnapshot) -> ClassifiedOutcome {
    let mover = snapshot.last_move_player.clone();
    let other = snapshot.next_move_player.clone();
    if state.is_checkmate() {
        ClassifiedOutcome::Checkmate {
            winner: mover,
            loser: other,
        }
    } else if state.is_stalemate() {
        ClassifiedOutcome::Stalemate {
            players: (mover, other),
        }
    } else if state.is_draw() {
        ClassifiedOutcome::Draw {
            players: (mover, other),
        }
    } else {
        ClassifiedOutcome::Ongoing {
            check: state.is_check(),
        }
    }
}

impl ClassifiedOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ClassifiedOutcome::Ongoing { .. })
    }

    /// The status text posted for this outcome. Terminal outcomes still get
    /// a final board image but encode no further "to move" state.
    pub fn status_text(&self, snapshot: &GameSnapshot) -> String {
        match self {
            ClassifiedOutcome::Ongoing { check } => snapshot.encode(*check),
            ClassifiedOutcome::Checkmate { winner, loser } => {
                format!("Checkmate! @{} beats @{}", winner, loser)
            }
            ClassifiedOutcome::Stalemate { players: (a, b) } => {
                format!("@{} @{} Game ends in a stalemate.", a, b)
            }
            ClassifiedOutcome::Draw { players: (a, b) } => {
                format!("@{} @{} Game ends in a draw.", a, b)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(code: &str) -> GameSnapshot {
        GameSnapshot::new(
            code.to_owned(),
            "Qh4".to_owned(),
            "bob".to_owned(),
            "carol".to_owned(),
        )
    }

    #[test]
    fn checkmate_outranks_draw() {
        // mated position is simultaneously game_over; precedence must pick mate
        let state =
            ChessState::from_position_code("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert!(state.is_game_over());
        let outcome = classify(&state, &snapshot(&state.position_code()));
        assert_eq!(
            outcome,
            ClassifiedOutcome::Checkmate {
                winner: "bob".to_owned(),
                loser: "carol".to_owned(),
            }
        );
        assert_eq!(
            outcome.status_text(&snapshot(&state.position_code())),
            "Checkmate! @bob beats @carol"
        );
    }

    #[test]
    fn stalemate_outranks_other_draws() {
        let state = ChessState::from_position_code("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        let outcome = classify(&state, &snapshot(&state.position_code()));
        assert_eq!(
            outcome,
            ClassifiedOutcome::Stalemate {
                players: ("bob".to_owned(), "carol".to_owned()),
            }
        );
        assert_eq!(
            outcome.status_text(&snapshot(&state.position_code())),
            "@bob @carol Game ends in a stalemate."
        );
    }

    #[test]
    fn non_mate_game_over_is_a_draw() {
        let state = ChessState::from_position_code("8/8/8/8/8/8/8/k1K5 w - - 0 1").unwrap();
        let outcome = classify(&state, &snapshot(&state.position_code()));
        assert_eq!(
            outcome.status_text(&snapshot(&state.position_code())),
            "@bob @carol Game ends in a draw."
        );
        assert!(outcome.is_terminal());
    }

    #[test]
    fn check_is_an_ongoing_game() {
        // black king in check from the b5 bishop, with blocks available
        let state =
            ChessState::from_position_code("rnbqkbnr/ppp2ppp/8/1B1pp3/4P3/8/PPPP1PPP/RNBQK1NR b KQkq - 1 3")
                .unwrap();
        let outcome = classify(&state, &snapshot(&state.position_code()));
        assert_eq!(outcome, ClassifiedOutcome::Ongoing { check: true });
        assert!(!outcome.is_terminal());
        let text = outcome.status_text(&snapshot(&state.position_code()));
        assert!(text.starts_with("Check!\n"));
    }

    #[test]
    fn ongoing_status_text_is_the_encoded_snapshot() {
        let state = ChessState::new();
        let s = snapshot(&state.position_code());
        let outcome = classify(&state, &s);
        assert_eq!(outcome, ClassifiedOutcome::Ongoing { check: false });
        assert_eq!(outcome.status_text(&s), s.encode(false));
    }
}

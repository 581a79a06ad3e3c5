//! Tests for the session controller state machine.

mod common;

use common::{accepted, after_e4, new_game, sq, starting_board, starting_state, state};
use std::time::Duration;
use strictly_chess::{
    ApiError, BUSY_MESSAGE, Color, Command, GameStatus, HistoryFetch, MoveRecord, Piece, PieceKind,
    RequestTicket, ServiceReply, SessionController, SessionId, SelectionPhase, Severity,
    UserAction,
};

fn controller() -> SessionController {
    SessionController::new(Duration::from_secs(3), true)
}

fn new_game_ticket(commands: &[Command]) -> RequestTicket {
    match commands {
        [Command::NewGame { ticket }] => *ticket,
        other => panic!("expected a single NewGame command, got {:?}", other),
    }
}

fn move_ticket(commands: &[Command]) -> RequestTicket {
    match commands {
        [Command::SubmitMove { ticket, .. }] => *ticket,
        other => panic!("expected a single SubmitMove command, got {:?}", other),
    }
}

fn history_fetch(commands: &[Command]) -> HistoryFetch {
    match commands {
        [Command::FetchHistory { fetch, .. }] => *fetch,
        other => panic!("expected a single FetchHistory command, got {:?}", other),
    }
}

/// Controller with game `g1` in the starting position, plus the history
/// fetch the new game triggered.
fn start_game() -> (SessionController, HistoryFetch) {
    let mut c = controller();
    let ticket = new_game_ticket(&c.start_new_session());
    let commands = c.apply(ServiceReply::NewGame {
        ticket,
        outcome: Ok(new_game("g1")),
    });
    (c, history_fetch(&commands))
}

/// Controller with game `g1` in the starting position.
fn started() -> SessionController {
    start_game().0
}

fn message(c: &SessionController) -> (String, Severity) {
    let current = c.messages().current().expect("a message is shown");
    (current.text().clone(), *current.severity())
}

/// Selects e2 and clicks e4; returns the move ticket.
fn play_e4(c: &mut SessionController) -> RequestTicket {
    assert!(c.handle(UserAction::Click(sq(6, 4))).is_empty());
    move_ticket(&c.handle(UserAction::Click(sq(4, 4))))
}

#[test]
fn test_new_session_installs_state_and_fetches_history() {
    let mut c = controller();
    assert!(c.session().is_none());
    assert_eq!(c.phase(), SelectionPhase::Idle);

    let ticket = new_game_ticket(&c.start_new_session());
    assert!(c.is_busy());

    let commands = c.apply(ServiceReply::NewGame {
        ticket,
        outcome: Ok(new_game("g1")),
    });

    assert!(matches!(
        commands.as_slice(),
        [Command::FetchHistory { session_id, .. }] if session_id.as_str() == "g1"
    ));
    assert!(!c.is_busy());
    let session = c.session().as_ref().expect("session installed");
    assert_eq!(session.id().as_str(), "g1");
    assert_eq!(session.state(), &starting_state());
    assert_eq!(
        message(&c),
        ("New game started!".to_string(), Severity::Success)
    );

    let summary = c.summary().expect("summary");
    assert_eq!(summary.turn, "White");
    assert_eq!(summary.status, "Active");
    assert_eq!(summary.move_count, 0);
}

#[test]
fn test_new_session_failure_messages() {
    let mut c = controller();
    let ticket = new_game_ticket(&c.start_new_session());
    c.apply(ServiceReply::NewGame {
        ticket,
        outcome: Err(ApiError::transport("connection refused")),
    });
    assert_eq!(
        message(&c),
        (
            "Error connecting to server: connection refused".to_string(),
            Severity::Error
        )
    );
    assert!(c.session().is_none());
    assert!(!c.is_busy());

    let ticket = new_game_ticket(&c.start_new_session());
    c.apply(ServiceReply::NewGame {
        ticket,
        outcome: Err(ApiError::rejected("Too many games")),
    });
    assert_eq!(
        message(&c),
        (
            "Failed to create game: Too many games".to_string(),
            Severity::Error
        )
    );
}

#[test]
fn test_click_before_game_exists_does_nothing() {
    let mut c = controller();
    assert!(c.handle(UserAction::Click(sq(6, 4))).is_empty());
    assert!(c.messages().current().is_none());
}

#[test]
fn test_select_shows_guidance() {
    let mut c = started();

    assert!(c.handle(UserAction::Click(sq(6, 4))).is_empty());

    assert_eq!(c.phase(), SelectionPhase::Selecting);
    assert_eq!(
        message(&c),
        (
            "Selected Pawn. Click a highlighted square to move.".to_string(),
            Severity::Info
        )
    );
}

#[test]
fn test_king_then_pawn_switches_without_request() {
    let mut c = started();

    assert!(c.handle(UserAction::Click(sq(7, 4))).is_empty());
    assert_eq!(c.selection().candidates().len(), 48);
    assert!(c.handle(UserAction::Click(sq(6, 4))).is_empty());

    assert_eq!(c.selection().selected(), Some(sq(6, 4)));
    assert!(!c.is_busy());
}

#[test]
fn test_empty_click_without_selection_changes_nothing() {
    let mut c = started();
    let before = c.messages().current().cloned();

    assert!(c.handle(UserAction::Click(sq(4, 4))).is_empty());

    assert_eq!(c.messages().current().cloned(), before);
    assert_eq!(c.phase(), SelectionPhase::Idle);
    assert!(!c.is_busy());
}

#[test]
fn test_accepted_move_replaces_state() {
    let mut c = started();
    let ticket = play_e4(&mut c);
    assert!(c.is_busy());

    let commands = c.apply(ServiceReply::Move {
        ticket,
        outcome: Ok(accepted(after_e4())),
    });

    assert!(matches!(
        commands.as_slice(),
        [Command::FetchHistory { session_id, .. }] if session_id.as_str() == "g1"
    ));
    let session = c.session().as_ref().expect("session");
    assert_eq!(session.state(), &after_e4());
    assert_eq!(c.phase(), SelectionPhase::Idle);
    assert_eq!(
        message(&c),
        ("Move successful".to_string(), Severity::Success)
    );
    assert_eq!(c.summary().expect("summary").turn, "Black");
}

#[test]
fn test_submit_carries_session_and_squares() {
    let mut c = started();
    c.handle(UserAction::Click(sq(6, 4)));

    let commands = c.handle(UserAction::Click(sq(4, 4)));

    match commands.as_slice() {
        [Command::SubmitMove { request, .. }] => {
            assert_eq!(request.session_id(), &SessionId::new("g1"));
            assert_eq!(*request.from(), sq(6, 4));
            assert_eq!(*request.to(), sq(4, 4));
        }
        other => panic!("unexpected commands {:?}", other),
    }
}

#[test]
fn test_rejected_move_keeps_board_and_shows_service_text() {
    let mut c = started();
    let ticket = play_e4(&mut c);

    let commands = c.apply(ServiceReply::Move {
        ticket,
        outcome: Err(ApiError::rejected("Invalid move")),
    });

    assert!(commands.is_empty());
    let session = c.session().as_ref().expect("session");
    assert_eq!(session.state(), &starting_state());
    assert_eq!(message(&c), ("Invalid move".to_string(), Severity::Error));
    assert!(!c.is_busy());
    assert_eq!(c.phase(), SelectionPhase::Idle);
}

#[test]
fn test_transport_failure_on_move() {
    let mut c = started();
    let ticket = play_e4(&mut c);

    c.apply(ServiceReply::Move {
        ticket,
        outcome: Err(ApiError::transport("timed out")),
    });

    assert_eq!(
        message(&c),
        ("Error making move: timed out".to_string(), Severity::Error)
    );
    let session = c.session().as_ref().expect("session");
    assert_eq!(session.state(), &starting_state());
}

#[test]
fn test_second_move_refused_while_first_in_flight() {
    let mut c = started();
    play_e4(&mut c);

    c.handle(UserAction::Click(sq(6, 3)));
    let commands = c.handle(UserAction::Click(sq(4, 3)));

    assert!(commands.is_empty());
    assert_eq!(message(&c), (BUSY_MESSAGE.to_string(), Severity::Info));
    assert!(c.handle(UserAction::NewGame).is_empty());
    assert!(c.handle(UserAction::Resync).is_empty());
}

#[test]
fn test_stale_reply_is_discarded() {
    let mut c = controller();
    let first = new_game_ticket(&c.start_new_session());
    c.apply(ServiceReply::NewGame {
        ticket: first,
        outcome: Ok(new_game("g1")),
    });

    // The same ticket again, e.g. a duplicate delivery
    let commands = c.apply(ServiceReply::NewGame {
        ticket: first,
        outcome: Ok(new_game("g2")),
    });

    assert!(commands.is_empty());
    let session = c.session().as_ref().expect("session");
    assert_eq!(session.id().as_str(), "g1");
}

#[test]
fn test_escape_clears_selection() {
    let mut c = started();
    c.handle(UserAction::Click(sq(7, 1)));
    assert_eq!(c.phase(), SelectionPhase::Selecting);

    assert!(c.handle(UserAction::ClearSelection).is_empty());
    assert_eq!(c.phase(), SelectionPhase::Idle);
    assert_eq!(
        message(&c),
        ("Selection cleared".to_string(), Severity::Info)
    );

    c.handle(UserAction::ClearSelection);
    assert_eq!(c.phase(), SelectionPhase::Idle);
}

#[test]
fn test_escape_before_game_exists_is_silent() {
    let mut c = controller();

    assert!(c.handle(UserAction::ClearSelection).is_empty());

    assert!(c.messages().current().is_none());
}

#[test]
fn test_shortcut_asks_before_new_game() {
    let mut c = started();

    assert!(c.handle(UserAction::NewGameShortcut).is_empty());
    assert!(*c.awaiting_confirmation());
    assert_eq!(
        message(&c),
        ("Start a new game? (y/n)".to_string(), Severity::Info)
    );

    let commands = c.handle(UserAction::Confirm(true));
    assert!(matches!(commands.as_slice(), [Command::NewGame { .. }]));
    assert!(!*c.awaiting_confirmation());
}

#[test]
fn test_declined_prompt_keeps_game() {
    let mut c = started();
    c.handle(UserAction::NewGameShortcut);

    assert!(c.handle(UserAction::Confirm(false)).is_empty());
    assert!(!*c.awaiting_confirmation());
    assert_eq!(
        message(&c),
        ("New game cancelled".to_string(), Severity::Info)
    );
    assert_eq!(c.session().as_ref().expect("session").id().as_str(), "g1");
}

#[test]
fn test_other_action_dismisses_prompt_and_runs() {
    let mut c = started();
    c.handle(UserAction::NewGameShortcut);

    c.handle(UserAction::Click(sq(6, 4)));

    assert!(!*c.awaiting_confirmation());
    assert_eq!(c.phase(), SelectionPhase::Selecting);
}

#[test]
fn test_shortcut_without_confirmation() {
    let mut c = SessionController::new(Duration::from_secs(3), false);
    let commands = c.handle(UserAction::NewGameShortcut);
    assert!(matches!(commands.as_slice(), [Command::NewGame { .. }]));
}

#[test]
fn test_history_reply_for_current_game_is_shown() {
    let (mut c, fetch) = start_game();
    let record = MoveRecord::new(sq(6, 4), sq(4, 4), PieceKind::Pawn, None);

    c.apply(ServiceReply::History {
        session_id: SessionId::new("g1"),
        fetch,
        outcome: Ok(vec![record]),
    });

    assert_eq!(c.history().lines(), ["1. Pawn e2 → e4".to_string()]);
}

#[test]
fn test_history_reply_for_previous_game_is_dropped() {
    let (mut c, fetch) = start_game();
    let record = MoveRecord::new(sq(6, 4), sq(4, 4), PieceKind::Pawn, None);

    c.apply(ServiceReply::History {
        session_id: SessionId::new("old"),
        fetch,
        outcome: Ok(vec![record]),
    });

    assert!(c.history().lines().is_empty());
}

#[test]
fn test_new_game_resets_history() {
    let (mut c, fetch) = start_game();
    c.apply(ServiceReply::History {
        session_id: SessionId::new("g1"),
        fetch,
        outcome: Ok(vec![MoveRecord::new(
            sq(6, 4),
            sq(4, 4),
            PieceKind::Pawn,
            None,
        )]),
    });

    let ticket = new_game_ticket(&c.handle(UserAction::NewGame));
    c.apply(ServiceReply::NewGame {
        ticket,
        outcome: Ok(new_game("g2")),
    });

    assert!(c.history().lines().is_empty());
    assert_eq!(
        c.history().session_id(),
        Some(&SessionId::new("g2"))
    );
}

#[test]
fn test_out_of_order_history_keeps_newest() {
    let (mut c, _) = start_game();
    let e4 = MoveRecord::new(sq(6, 4), sq(4, 4), PieceKind::Pawn, None);
    let e5 = MoveRecord::new(sq(1, 4), sq(3, 4), PieceKind::Pawn, None);

    let ticket = play_e4(&mut c);
    let after_e4_fetch = history_fetch(&c.apply(ServiceReply::Move {
        ticket,
        outcome: Ok(accepted(after_e4())),
    }));

    c.handle(UserAction::Click(sq(1, 4)));
    let ticket = move_ticket(&c.handle(UserAction::Click(sq(3, 4))));
    let after_e5 = after_e4().board.with_piece(sq(1, 4), None).with_piece(
        sq(3, 4),
        Some(Piece::new(Color::Black, PieceKind::Pawn)),
    );
    let after_e5_fetch = history_fetch(&c.apply(ServiceReply::Move {
        ticket,
        outcome: Ok(accepted(state(after_e5, Color::White, GameStatus::Active, 2))),
    }));
    assert!(after_e5_fetch > after_e4_fetch);

    // The newer reply lands first, the older one after it
    c.apply(ServiceReply::History {
        session_id: SessionId::new("g1"),
        fetch: after_e5_fetch,
        outcome: Ok(vec![e4.clone(), e5]),
    });
    c.apply(ServiceReply::History {
        session_id: SessionId::new("g1"),
        fetch: after_e4_fetch,
        outcome: Ok(vec![e4]),
    });

    assert_eq!(c.summary().expect("summary").move_count, 2);
    assert_eq!(
        c.history().lines(),
        [
            "1. Pawn e2 → e4".to_string(),
            "2. Pawn e7 → e5".to_string(),
        ]
    );
}

#[test]
fn test_failed_history_does_not_block_older_success() {
    let (mut c, first) = start_game();
    let ticket = play_e4(&mut c);
    let second = history_fetch(&c.apply(ServiceReply::Move {
        ticket,
        outcome: Ok(accepted(after_e4())),
    }));

    c.apply(ServiceReply::History {
        session_id: SessionId::new("g1"),
        fetch: second,
        outcome: Err(ApiError::transport("connection reset")),
    });
    c.apply(ServiceReply::History {
        session_id: SessionId::new("g1"),
        fetch: first,
        outcome: Ok(Vec::new()),
    });
    c.apply(ServiceReply::History {
        session_id: SessionId::new("g1"),
        fetch: second,
        outcome: Ok(vec![MoveRecord::new(sq(6, 4), sq(4, 4), PieceKind::Pawn, None)]),
    });

    assert_eq!(c.history().lines(), ["1. Pawn e2 → e4".to_string()]);
}

#[test]
fn test_check_announcement_follows_move() {
    let mut c = started();
    let ticket = play_e4(&mut c);
    let checked = state(starting_board(), Color::Black, GameStatus::Check, 1);

    c.apply(ServiceReply::Move {
        ticket,
        outcome: Ok(accepted(checked)),
    });

    assert_eq!(
        message(&c),
        ("Black is in check!".to_string(), Severity::Info)
    );
}

#[test]
fn test_checkmate_locks_board() {
    let mut c = started();
    let ticket = play_e4(&mut c);
    let mated = state(starting_board(), Color::Black, GameStatus::Checkmate, 3);

    c.apply(ServiceReply::Move {
        ticket,
        outcome: Ok(accepted(mated)),
    });

    assert_eq!(
        message(&c),
        ("Checkmate! White wins!".to_string(), Severity::Success)
    );
    assert_eq!(c.phase(), SelectionPhase::Locked);

    assert!(c.handle(UserAction::Click(sq(1, 4))).is_empty());
    assert_eq!(
        message(&c),
        (
            "Game is over. Start a new game!".to_string(),
            Severity::Info
        )
    );

    // A new game unlocks the board
    let ticket = new_game_ticket(&c.handle(UserAction::NewGame));
    c.apply(ServiceReply::NewGame {
        ticket,
        outcome: Ok(new_game("g2")),
    });
    assert_eq!(c.phase(), SelectionPhase::Idle);
}

#[test]
fn test_stalemate_announcement() {
    let mut c = started();
    let ticket = play_e4(&mut c);
    let drawn = state(starting_board(), Color::Black, GameStatus::Stalemate, 40);

    c.apply(ServiceReply::Move {
        ticket,
        outcome: Ok(accepted(drawn)),
    });

    assert_eq!(
        message(&c),
        ("Stalemate! Game is a draw.".to_string(), Severity::Info)
    );
    assert_eq!(c.phase(), SelectionPhase::Locked);
}

#[test]
fn test_resync_replaces_state() {
    let mut c = started();
    c.handle(UserAction::Click(sq(6, 4)));

    let commands = c.handle(UserAction::Resync);
    let ticket = match commands.as_slice() {
        [Command::FetchState { ticket, session_id }] => {
            assert_eq!(session_id.as_str(), "g1");
            *ticket
        }
        other => panic!("unexpected commands {:?}", other),
    };

    let commands = c.apply(ServiceReply::State {
        ticket,
        session_id: SessionId::new("g1"),
        outcome: Ok(after_e4()),
    });

    assert!(matches!(commands.as_slice(), [Command::FetchHistory { .. }]));
    assert_eq!(c.phase(), SelectionPhase::Idle);
    assert_eq!(
        c.session().as_ref().expect("session").state(),
        &after_e4()
    );
}

#[test]
fn test_success_message_expires_on_tick() {
    let mut c = started();
    let deadline = c.messages().deadline().expect("success message has deadline");

    assert!(!c.tick(deadline - Duration::from_millis(1)));
    assert!(c.tick(deadline));
    assert!(c.messages().current().is_none());
}

#[test]
fn test_select_after_move_uses_new_turn() {
    let mut c = started();
    let ticket = play_e4(&mut c);
    c.apply(ServiceReply::Move {
        ticket,
        outcome: Ok(accepted(after_e4())),
    });

    // White pawn on e4 is no longer selectable, black pawns are
    c.handle(UserAction::Click(sq(4, 4)));
    assert_eq!(c.phase(), SelectionPhase::Idle);
    c.handle(UserAction::Click(sq(1, 4)));
    assert_eq!(c.selection().selected(), Some(sq(1, 4)));
    assert_eq!(
        c.session()
            .as_ref()
            .and_then(|s| s.state().board.piece_at(sq(1, 4))),
        Some(Piece::new(Color::Black, PieceKind::Pawn))
    );
}

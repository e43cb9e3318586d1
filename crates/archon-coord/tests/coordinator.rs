//! Integration tests for request dispatch, progress relay, the outer
//! timeout, and mode changes.

use std::time::Duration;

use archon_coord::{CoordError, Coordinator, CoordinatorConfig, SearchRequest};
use archon_core::{Board, generate_legal_moves};
use archon_engine::{Coord, Difficulty, MoveSource, OpeningBook, SearchLimits};

fn config(workers: usize) -> CoordinatorConfig {
    CoordinatorConfig {
        workers,
        outer_timeout: Duration::from_secs(30),
        tt_capacity: 1 << 16,
        progress_interval: Duration::ZERO,
    }
}

fn shallow(board: Board) -> SearchRequest {
    SearchRequest::new(board).with_limits(SearchLimits::new(3, Duration::from_secs(20)))
}

#[test]
fn returns_a_legal_move() {
    let mut coordinator = Coordinator::new(config(1), "classic", None).unwrap();
    let board = Board::classic();
    let outcome = coordinator.request(shallow(board.clone())).unwrap().wait().unwrap();

    let mv = outcome.best_move.unwrap();
    assert!(generate_legal_moves(&board).contains(mv));
    assert_eq!(outcome.source, MoveSource::Search);
    assert_eq!(outcome.depth, 3);
}

#[test]
fn relays_progress() {
    let mut coordinator = Coordinator::new(config(1), "classic", None).unwrap();
    let ticket = coordinator.request(shallow(Board::standard())).unwrap();

    let mut events = Vec::new();
    while events.len() < 3 {
        events.extend(ticket.progress());
        std::thread::sleep(Duration::from_millis(5));
        if events.iter().any(|p| p.depth == 3) {
            break;
        }
    }
    let outcome = ticket.wait().unwrap();

    assert!(!events.is_empty());
    assert!(events.windows(2).all(|w| w[0].depth <= w[1].depth));
    assert!(events.iter().all(|p| p.max_depth == 3));
    assert_eq!(outcome.depth, 3);
}

#[test]
fn outer_timeout_falls_back_to_a_legal_move() {
    let cfg = CoordinatorConfig {
        outer_timeout: Duration::from_millis(50),
        ..config(1)
    };
    let mut coordinator = Coordinator::new(cfg, "classic", None).unwrap();
    let board = Board::classic();
    let request = SearchRequest::new(board.clone())
        .with_limits(SearchLimits::new(64, Duration::from_secs(60)))
        .with_difficulty(Difficulty::default().with_seed(11));

    let outcome = coordinator.request(request).unwrap().wait().unwrap();
    assert_eq!(outcome.source, MoveSource::Fallback);
    assert!(generate_legal_moves(&board).contains(outcome.best_move.unwrap()));
    assert_eq!(outcome.pv, vec![outcome.best_move.unwrap()]);
}

#[test]
fn no_legal_moves_is_an_error() {
    let mut coordinator = Coordinator::new(config(1), "classic", None).unwrap();
    let stalemate: Board = "k7/2K5/1Q6/8/8/8/8/8 b - - 0 1".parse().unwrap();
    let result = coordinator.request(shallow(stalemate)).unwrap().wait();
    assert!(matches!(result, Err(CoordError::NoLegalMoves)));
}

#[test]
fn concurrent_requests_are_independent() {
    let mut coordinator = Coordinator::new(config(2), "classic", None).unwrap();
    let classic = Board::classic();
    let standard = Board::standard();

    let background = coordinator.request(shallow(classic.clone())).unwrap();
    let hint = coordinator.request(shallow(standard.clone())).unwrap();

    let hint = hint.wait().unwrap();
    let background = background.wait().unwrap();
    assert!(generate_legal_moves(&standard).contains(hint.best_move.unwrap()));
    assert!(generate_legal_moves(&classic).contains(background.best_move.unwrap()));
}

#[test]
fn cancelled_request_still_answers() {
    let mut coordinator = Coordinator::new(config(1), "classic", None).unwrap();
    let board = Board::classic();
    let request =
        SearchRequest::new(board.clone()).with_limits(SearchLimits::new(64, Duration::from_secs(60)));
    let ticket = coordinator.request(request).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    ticket.cancel();

    let outcome = ticket.wait().unwrap();
    assert!(generate_legal_moves(&board).contains(outcome.best_move.unwrap()));
}

#[test]
fn mode_change_loads_the_new_book() {
    let board = Board::classic();
    let size = board.size();
    let mv = board.find_move("e2e4").unwrap();
    let mut book = OpeningBook::new();
    book.add_move(
        board.hash(),
        Coord {
            r: mv.source().row(size),
            c: mv.source().col(size),
        },
        Coord {
            r: mv.dest().row(size),
            c: mv.dest().col(size),
        },
    );

    let mut coordinator = Coordinator::new(config(2), "practice", None).unwrap();
    coordinator.set_mode("practice", Some(book.clone())).unwrap();
    let outcome = coordinator.request(shallow(board.clone())).unwrap().wait().unwrap();
    assert_ne!(outcome.source, MoveSource::Book, "same mode must not reload");

    coordinator.set_mode("campaign", Some(book)).unwrap();
    assert_eq!(coordinator.mode(), "campaign");
    assert_eq!(coordinator.worker_count(), 2);
    let outcome = coordinator.request(shallow(board)).unwrap().wait().unwrap();
    assert_eq!(outcome.source, MoveSource::Book);
    assert_eq!(outcome.best_move, Some(mv));
}

#[test]
fn requests_after_shutdown_are_rejected() {
    let mut coordinator = Coordinator::new(config(1), "classic", None).unwrap();
    coordinator.shutdown();
    assert_eq!(coordinator.worker_count(), 0);
    let result = coordinator.request(shallow(Board::classic()));
    assert!(matches!(result, Err(CoordError::Disconnected)));
}

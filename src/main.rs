use std::time::Duration;

use anyhow::Result;
use archon_coord::{Coordinator, CoordinatorConfig, SearchRequest};
use archon_core::Board;
use archon_engine::{Difficulty, SearchLimits};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    info!("archon starting");

    let mut coordinator = Coordinator::new(CoordinatorConfig::default(), "classic", None)?;
    let board = Board::classic();
    let request = SearchRequest::new(board.clone())
        .with_limits(SearchLimits::new(6, Duration::from_secs(2)))
        .with_difficulty(Difficulty::default());

    let ticket = coordinator.request(request)?;
    let outcome = ticket.wait()?;
    if let Some(mv) = outcome.best_move {
        info!(
            mv = %mv.notation(board.size()),
            score = outcome.score,
            depth = outcome.depth,
            nodes = outcome.nodes,
            source = ?outcome.source,
            "best move"
        );
    }

    coordinator.shutdown();
    Ok(())
}

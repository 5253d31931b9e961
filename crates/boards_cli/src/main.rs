//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `boards_core` linkage without the Flutter/FFI runtime.
//! - Print a deterministic text rendering of a tiny in-memory board.

use boards_core::db::open_db_in_memory;
use boards_core::{BoardService, ItemKind, SqliteStateRepository};

const DEMO_COLS: usize = 10;

fn main() {
    println!("boards_core ping={}", boards_core::ping());
    println!("boards_core version={}", boards_core::core_version());

    if let Err(err) = run_demo() {
        eprintln!("boards demo failed: {err}");
        std::process::exit(1);
    }
}

fn run_demo() -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let service = BoardService::new(SqliteStateRepository::try_new(&conn)?);
    let root = service.resolve_board(None)?;
    service.create_item(root, ItemKind::Note, Some("Todo"), "buy milk", DEMO_COLS)?;
    service.create_item(root, ItemKind::Link, None, "example.com", DEMO_COLS)?;
    service.create_board(root, Some("Projects"), DEMO_COLS)?;
    service.resize_grid(root, 30, DEMO_COLS)?;

    let view = service.board_view(root, DEMO_COLS)?;
    println!("board title={} slots={}", view.title, view.slot_count);
    for row in view.occupancy.chunks(DEMO_COLS) {
        let line: String = row
            .iter()
            .map(|owner| match owner {
                Some(anchor) => char::from_digit((*anchor % 36) as u32, 36).unwrap_or('#'),
                None => '.',
            })
            .collect();
        println!("{line}");
    }
    Ok(())
}

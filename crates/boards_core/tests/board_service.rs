use boards_core::db::open_db;
use boards_core::{
    BoardService, ClickOutcome, Interaction, ItemKind, MoveOutcome, OpError, ServiceError,
    SqliteStateRepository, TileContent, TileSize, ToolMode,
};

const COLS: usize = 10;

#[test]
fn move_click_flow_is_persisted_only_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("boards.db");
    let conn = open_db(&path).unwrap();
    let service = BoardService::new(SqliteStateRepository::try_new(&conn).unwrap());
    let root = service.resolve_board(None).unwrap();
    service
        .create_item(root, ItemKind::Note, Some("Plan"), "ship it", COLS)
        .unwrap();

    let mut interaction = Interaction::new(ToolMode::Move);
    // Clicking a covered cell picks the anchor.
    let picked = service
        .handle_slot_click(&mut interaction, root, 11, COLS)
        .unwrap();
    assert_eq!(picked, ClickOutcome::Picked { anchor: 0 });

    let dropped = service
        .handle_slot_click(&mut interaction, root, 5, COLS)
        .unwrap();
    assert_eq!(dropped, ClickOutcome::Moved(MoveOutcome::Moved { from: 0, to: 5 }));
    assert!(interaction.pick().is_none());
    drop(service);
    drop(conn);

    let reopened = open_db(&path).unwrap();
    let service = BoardService::new(SqliteStateRepository::try_new(&reopened).unwrap());
    let view = service.board_view(root, COLS).unwrap();
    assert_eq!(view.tiles.len(), 1);
    assert_eq!(view.tiles[0].anchor, 5);
    assert_eq!(view.tiles[0].size, TileSize::new(2, 2));
}

#[test]
fn refused_drop_keeps_the_pick() {
    let conn = boards_core::db::open_db_in_memory().unwrap();
    let service = BoardService::new(SqliteStateRepository::try_new(&conn).unwrap());
    let root = service.resolve_board(None).unwrap();
    service
        .create_item(root, ItemKind::Note, None, "a", COLS)
        .unwrap();
    service
        .create_item(root, ItemKind::Link, None, "b.dev", COLS)
        .unwrap();

    let mut interaction = Interaction::new(ToolMode::Move);
    service
        .handle_slot_click(&mut interaction, root, 2, COLS)
        .unwrap();
    // A 2x1 link anchored in the last column would wrap.
    let err = service
        .handle_slot_click(&mut interaction, root, 9, COLS)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Op(OpError::Placement(_))));
    assert_eq!(interaction.pick().map(|pick| pick.slot_index), Some(2));
}

#[test]
fn trashing_a_child_board_from_inside_redirects_home() {
    let conn = boards_core::db::open_db_in_memory().unwrap();
    let service = BoardService::new(SqliteStateRepository::try_new(&conn).unwrap());
    let root = service.resolve_board(None).unwrap();
    let child = service.create_board(root, Some("Trip"), COLS).unwrap();
    service
        .create_item(child, ItemKind::Link, None, "maps.example", COLS)
        .unwrap();

    let report = service.trash_tile(root, 0, child).unwrap();
    assert_eq!(report.redirect_to, Some(root));
    assert_eq!(report.outcome.removed_items.len(), 1);

    let state = service.load_state().unwrap();
    assert_eq!(state.boards.len(), 1);
    assert!(state.items.is_empty());
}

#[test]
fn grid_steps_respect_limits_and_tiles() {
    let conn = boards_core::db::open_db_in_memory().unwrap();
    let service = BoardService::new(SqliteStateRepository::try_new(&conn).unwrap());
    let root = service.resolve_board(None).unwrap();

    assert_eq!(service.shrink_grid(root, COLS).unwrap().new_size(), 60);
    assert_eq!(service.resize_grid(root, 5, COLS).unwrap().new_size(), 20);
    assert_eq!(service.resize_grid(root, 100, COLS).unwrap().new_size(), 100);

    let (_, anchor) = service
        .create_item(root, ItemKind::Note, None, "x", COLS)
        .unwrap();
    service.move_tile(root, anchor, 80, COLS).unwrap();

    // The note now covers 80, 81, 90, 91.
    let err = service.shrink_grid(root, COLS).unwrap_err();
    assert!(matches!(err, ServiceError::Op(OpError::Resize(_))));
    assert_eq!(service.grow_grid(root, COLS).unwrap().new_size(), 120);
}

#[test]
fn export_then_import_restores_the_same_boards() {
    let conn = boards_core::db::open_db_in_memory().unwrap();
    let service = BoardService::new(SqliteStateRepository::try_new(&conn).unwrap());
    let root = service.resolve_board(None).unwrap();
    service.rename_board(root, "Home").unwrap();
    let backup = service.export_json().unwrap();

    service.rename_board(root, "Changed").unwrap();
    assert!(service.import_json("not json").is_err());
    assert_eq!(service.board_view(root, COLS).unwrap().title, "Changed");

    service.import_json(&backup).unwrap();
    let view = service.board_view(root, COLS).unwrap();
    assert_eq!(view.title, "Home");
    assert!(matches!(
        view.breadcrumb.as_slice(),
        [crumb] if crumb.board_id == root
    ));
    assert!(view
        .tiles
        .iter()
        .all(|tile| !matches!(tile.content, TileContent::Missing(_))));
}

#[test]
fn empty_object_document_still_accepts_new_tiles() {
    let conn = boards_core::db::open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, '{}');",
        [boards_core::repo::state_repo::STATE_KEY],
    )
    .unwrap();
    let service = BoardService::new(SqliteStateRepository::try_new(&conn).unwrap());

    let root = service.resolve_board(None).unwrap();
    service
        .create_item(root, ItemKind::Note, None, "first", COLS)
        .unwrap();
    let view = service.board_view(root, COLS).unwrap();
    assert_eq!(view.board_id, root);
    assert_eq!(view.tiles.len(), 1);
}

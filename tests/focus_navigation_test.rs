use sheet_grid::data::data_provider::{DataProvider, DefaultDataProvider};
use sheet_grid::data::datatable::{DataColumn, DataTable, GridStore};
use sheet_grid::data::events::ChangeOutcome;
use sheet_grid::ui::actions::{CellCoord, GridInput, NavigateAction};
use sheet_grid::ui::focus_controller::{FocusController, FocusState, FocusTarget, Transition};
use sheet_grid::ui::focus_ring::FocusRing;

fn team_store() -> GridStore {
    GridStore::new(DefaultDataProvider.load().unwrap())
}

fn press(
    controller: &mut FocusController,
    store: &mut GridStore,
    ring: &mut FocusRing,
    direction: NavigateAction,
) -> Transition {
    controller.handle(GridInput::Navigate(direction), store, ring)
}

fn snapshot(store: &GridStore) -> Vec<Vec<String>> {
    let table = store.table();
    (0..table.row_count())
        .map(|row| {
            table
                .columns()
                .iter()
                .map(|c| table.get_cell(row, &c.id).unwrap().to_string())
                .collect()
        })
        .collect()
}

#[test]
fn test_vertical_moves_stay_in_bounds() {
    let mut store = team_store();
    let row_count = store.row_count();

    // Deterministic pseudo-random walk
    let mut seed: u32 = 0x2545_f491;
    for start in 0..row_count {
        let mut controller = FocusController::new();
        let mut ring = FocusRing::new();
        controller.handle(GridInput::Click(CellCoord::new(start, 1)), &mut store, &mut ring);

        for _ in 0..200 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let down = (seed >> 16) & 1 == 1;
            let before = controller.focused().unwrap().row;

            let direction = if down {
                NavigateAction::Down
            } else {
                NavigateAction::Up
            };
            press(&mut controller, &mut store, &mut ring, direction);

            let after = controller.focused().unwrap();
            assert!(after.row < row_count);
            assert_eq!(after.col, 1);
            if down {
                assert_eq!(after.row, (before + 1).min(row_count - 1));
            } else {
                assert_eq!(after.row, before.saturating_sub(1));
            }
        }
    }
}

#[test]
fn test_clamping_is_idempotent() {
    let mut store = team_store();
    let mut controller = FocusController::new();
    let mut ring = FocusRing::new();
    controller.handle(GridInput::Click(CellCoord::new(1, 1)), &mut store, &mut ring);

    for _ in 0..5 {
        press(&mut controller, &mut store, &mut ring, NavigateAction::Down);
    }
    assert_eq!(controller.focused(), Some(CellCoord::new(2, 1)));
    assert_eq!(
        press(&mut controller, &mut store, &mut ring, NavigateAction::Down),
        Transition::Clamped(CellCoord::new(2, 1))
    );

    for _ in 0..5 {
        press(&mut controller, &mut store, &mut ring, NavigateAction::Up);
    }
    assert_eq!(controller.focused(), Some(CellCoord::new(0, 1)));

    for _ in 0..5 {
        press(&mut controller, &mut store, &mut ring, NavigateAction::Left);
    }
    assert_eq!(controller.focused(), Some(CellCoord::new(0, 0)));
}

#[test]
fn test_right_three_times_then_clamp() {
    let mut store = team_store();
    let mut controller = FocusController::new();
    let mut ring = FocusRing::new();

    controller.handle(GridInput::Click(CellCoord::new(0, 0)), &mut store, &mut ring);
    for _ in 0..3 {
        press(&mut controller, &mut store, &mut ring, NavigateAction::Right);
    }
    assert_eq!(controller.focused(), Some(CellCoord::new(0, 3)));

    let transition = press(&mut controller, &mut store, &mut ring, NavigateAction::Right);
    assert_eq!(transition, Transition::Clamped(CellCoord::new(0, 3)));
    assert_eq!(controller.focused(), Some(CellCoord::new(0, 3)));
    assert_eq!(ring.target(), Some(CellCoord::new(0, 3)));
}

#[test]
fn test_hide_and_show_column_keeps_schema_order() {
    let mut store = team_store();
    assert_eq!(
        store.view().column_ids(),
        vec!["name", "role", "status", "email"]
    );

    assert_eq!(store.set_column_visible("role", false), ChangeOutcome::Applied);
    let view = store.view();
    assert_eq!(view.column_ids(), vec!["name", "status", "email"]);
    assert_eq!(view.visible_index_of("status"), Some(1));
    assert_eq!(view.visible_index_of("email"), Some(2));
    assert_eq!(view.visible_index_of("role"), None);

    // Hiding twice is a no-op
    assert_eq!(store.set_column_visible("role", false), ChangeOutcome::Unchanged);

    assert_eq!(store.set_column_visible("role", true), ChangeOutcome::Applied);
    assert_eq!(
        store.view().column_ids(),
        vec!["name", "role", "status", "email"]
    );
    assert_eq!(
        store.set_column_visible("salary", true),
        ChangeOutcome::UnknownColumn
    );
}

#[test]
fn test_edit_commit_changes_only_target_cell() {
    let mut store = team_store();
    let mut controller = FocusController::new();
    let mut ring = FocusRing::new();
    let before = snapshot(&store);

    controller.handle(GridInput::Click(CellCoord::new(1, 1)), &mut store, &mut ring);
    assert_eq!(
        controller.handle(GridInput::Commit, &mut store, &mut ring),
        Transition::EditStarted(CellCoord::new(1, 1))
    );
    assert!(controller.set_draft("Lead Developer"));
    controller.handle(GridInput::ConfirmEdit, &mut store, &mut ring);

    assert_eq!(store.get_cell(1, "role").unwrap(), "Lead Developer");
    assert!(matches!(controller.state(), FocusState::Focused(c) if *c == CellCoord::new(1, 1)));

    let after = snapshot(&store);
    for (row, (old, new)) in before.iter().zip(after.iter()).enumerate() {
        for (col, (a, b)) in old.iter().zip(new.iter()).enumerate() {
            if (row, col) != (1, 1) {
                assert_eq!(a, b, "cell ({}, {}) changed", row, col);
            }
        }
    }
}

#[test]
fn test_edit_cancel_keeps_prior_value() {
    let mut store = team_store();
    let mut controller = FocusController::new();
    let mut ring = FocusRing::new();

    controller.handle(GridInput::Click(CellCoord::new(1, 1)), &mut store, &mut ring);
    controller.handle(GridInput::Commit, &mut store, &mut ring);
    controller.set_draft("Lead Developer");
    assert_eq!(
        controller.handle(GridInput::CancelEdit, &mut store, &mut ring),
        Transition::EditCancelled
    );

    assert_eq!(store.get_cell(1, "role").unwrap(), "Developer");
    assert_eq!(controller.focused(), Some(CellCoord::new(1, 1)));
    assert!(!controller.is_editing());
}

#[test]
fn test_empty_edit_writes_empty_string() {
    let mut store = team_store();
    let mut controller = FocusController::new();
    let mut ring = FocusRing::new();

    controller.handle(GridInput::Click(CellCoord::new(2, 0)), &mut store, &mut ring);
    controller.handle(GridInput::Commit, &mut store, &mut ring);
    controller.handle(GridInput::ConfirmEdit, &mut store, &mut ring);

    assert_eq!(store.get_cell(2, "name").unwrap(), "");
}

#[test]
fn test_zero_rows_never_focuses() {
    let mut table = DataTable::new("empty");
    table.add_column(DataColumn::new("name")).unwrap();
    let mut store = GridStore::new(table);
    let mut controller = FocusController::new();
    let mut ring = FocusRing::new();

    for direction in [
        NavigateAction::Up,
        NavigateAction::Down,
        NavigateAction::Left,
        NavigateAction::Right,
    ] {
        assert_eq!(
            press(&mut controller, &mut store, &mut ring, direction),
            Transition::Ignored
        );
    }
    assert_eq!(
        controller.handle(GridInput::Click(CellCoord::new(0, 0)), &mut store, &mut ring),
        Transition::Ignored
    );
    assert_eq!(
        controller.handle(GridInput::Commit, &mut store, &mut ring),
        Transition::Ignored
    );
    assert!(matches!(controller.state(), FocusState::Unfocused));
    assert_eq!(ring.target(), None);
}

#[test]
fn test_resize_leaves_data_and_focus_alone() {
    let mut store = team_store();
    let mut controller = FocusController::new();
    let mut ring = FocusRing::new();
    controller.handle(GridInput::Click(CellCoord::new(2, 3)), &mut store, &mut ring);
    let before = snapshot(&store);

    assert_eq!(store.set_column_width("email", 35), ChangeOutcome::Applied);
    assert_eq!(store.set_column_width("name", 1), ChangeOutcome::Applied);
    controller.revalidate(&store.view(), &mut ring);

    assert_eq!(snapshot(&store), before);
    assert_eq!(controller.focused(), Some(CellCoord::new(2, 3)));
    assert_eq!(store.table().column("email").unwrap().width, 35);
}

#[test]
fn test_column_hidden_mid_edit_discards_edit() {
    let mut store = team_store();
    let mut controller = FocusController::new();
    let mut ring = FocusRing::new();

    controller.handle(GridInput::Click(CellCoord::new(0, 1)), &mut store, &mut ring);
    controller.handle(GridInput::Commit, &mut store, &mut ring);
    controller.set_draft("Architect");

    // Hiding "role" shifts "status" into visible index 1
    store.set_column_visible("role", false);
    let transition = controller.handle(GridInput::ConfirmEdit, &mut store, &mut ring);

    assert!(matches!(transition, Transition::EditDiscarded(_)));
    assert_eq!(store.get_cell(0, "role").unwrap(), "Designer");
    assert_eq!(store.get_cell(0, "status").unwrap(), "Active");
    assert!(!controller.is_editing());
}

struct Recorder(Vec<CellCoord>);

impl FocusTarget for Recorder {
    fn focus_cell(&mut self, coord: CellCoord) {
        self.0.push(coord);
    }
}

#[test]
fn test_host_sees_every_committed_move_in_order() {
    let mut store = team_store();
    let mut controller = FocusController::new();
    let mut host = Recorder(Vec::new());

    let inputs = [
        GridInput::Click(CellCoord::new(0, 0)),
        GridInput::Navigate(NavigateAction::Right),
        GridInput::Navigate(NavigateAction::Down),
        GridInput::Navigate(NavigateAction::Down),
        GridInput::Navigate(NavigateAction::Down),
        GridInput::Navigate(NavigateAction::Left),
    ];
    for input in inputs {
        controller.handle(input, &mut store, &mut host);
    }

    assert_eq!(
        host.0,
        vec![
            CellCoord::new(0, 0),
            CellCoord::new(0, 1),
            CellCoord::new(1, 1),
            CellCoord::new(2, 1),
            CellCoord::new(2, 0),
        ]
    );
}

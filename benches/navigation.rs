use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sheet_grid::data::datatable::{DataColumn, DataRow, DataTable, GridStore};
use sheet_grid::ui::actions::{CellCoord, GridInput, NavigateAction};
use sheet_grid::ui::focus_controller::FocusController;
use sheet_grid::ui::focus_ring::FocusRing;

fn create_test_data(rows: usize, columns: usize) -> DataTable {
    let mut table = DataTable::new("bench");
    let ids: Vec<String> = (0..columns).map(|c| format!("col{}", c)).collect();
    for id in &ids {
        table.add_column(DataColumn::new(id.as_str())).unwrap();
    }
    for r in 0..rows {
        table.add_row(DataRow::from_pairs(
            ids.iter().map(|id| (id.as_str(), format!("{}-{}", id, r))),
        ));
    }
    table
}

fn benchmark_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigation");

    for (rows, columns) in [(1_000, 10), (10_000, 40)] {
        group.bench_function(format!("{}x{}_down_right", rows, columns), |b| {
            let mut store = GridStore::new(create_test_data(rows, columns));
            let mut controller = FocusController::new();
            let mut ring = FocusRing::new();
            controller.handle(GridInput::Click(CellCoord::new(0, 0)), &mut store, &mut ring);

            b.iter(|| {
                for direction in [NavigateAction::Down, NavigateAction::Right] {
                    black_box(controller.handle(
                        GridInput::Navigate(direction),
                        &mut store,
                        &mut ring,
                    ));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_visibility_toggle(c: &mut Criterion) {
    let mut store = GridStore::new(create_test_data(10_000, 40));
    let mut controller = FocusController::new();
    let mut ring = FocusRing::new();
    controller.handle(GridInput::Click(CellCoord::new(500, 39)), &mut store, &mut ring);

    c.bench_function("toggle_and_revalidate", |b| {
        b.iter(|| {
            store.toggle_column_visible("col39");
            controller.revalidate(&store.view(), &mut ring);
            black_box(controller.focused())
        });
    });
}

criterion_group!(benches, benchmark_navigation, benchmark_visibility_toggle);
criterion_main!(benches);

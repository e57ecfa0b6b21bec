//! List coordinator tests
//!
//! Runs a coordinator task against a fake list endpoint on a paused clock:
//! - Out-of-order answers and the loading flag
//! - Debounced free text and parent scoping
//! - Failures, bus refreshes and shutdown

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use beereign_console::logging::LogLevel;
use beereign_console::notify::NoticeKind;
use beereign_console::table::{project, TableView};
use beereign_console::{ConsoleError, CoordinatorOptions, ListCoordinator};
use common::{harness, raw_batch, FakeListSource};
use shared::{EntityId, EntityKind, OrderDirection, Page, ParentRef, RawMaterialBatch, StockFilter};

fn options() -> CoordinatorOptions {
    CoordinatorOptions::new(EntityKind::RawMaterialBatch)
}

fn ids(rows: &[RawMaterialBatch]) -> Vec<i64> {
    rows.iter().map(|row| row.lot.id.get()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_last_issued_query_wins_over_slower_earlier_one() {
    let h = harness();
    let source = FakeListSource::new(|query| match (query.order, query.stock_filter) {
        (OrderDirection::Desc, StockFilter::InStock) => (
            Duration::from_millis(300),
            Ok(Page::new(vec![raw_batch(1, "3")], 1)),
        ),
        (_, StockFilter::Empty) => (
            Duration::from_millis(10),
            Ok(Page::new(vec![raw_batch(2, "0")], 1)),
        ),
        _ => (Duration::ZERO, Ok(Page::default())),
    });
    let coordinator =
        ListCoordinator::<RawMaterialBatch>::spawn(source.clone(), options(), h.context.clone());
    coordinator.settled().await.unwrap();

    coordinator.set_order(OrderDirection::Desc);
    coordinator.set_stock_filter(StockFilter::Empty);
    let snapshot = coordinator.settled().await.unwrap();
    assert_eq!(ids(&snapshot.page.rows), vec![2]);

    // The slower, older answer arrives later and must not replace the rows
    tokio::time::sleep(Duration::from_secs(1)).await;
    let snapshot = coordinator.snapshot();
    assert_eq!(ids(&snapshot.page.rows), vec![2]);
    assert_eq!(snapshot.query.order, OrderDirection::Desc);
    assert_eq!(snapshot.query.stock_filter, StockFilter::Empty);
    assert!(!snapshot.loading);
    assert_eq!(source.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_loading_holds_until_latest_request_answers() {
    let h = harness();
    let source = FakeListSource::new(|query| match query.stock_filter {
        StockFilter::Empty => (
            Duration::from_millis(300),
            Ok(Page::new(vec![raw_batch(2, "0")], 1)),
        ),
        StockFilter::InStock if query.order == OrderDirection::Desc => (
            Duration::from_millis(10),
            Ok(Page::new(vec![raw_batch(1, "3")], 1)),
        ),
        StockFilter::InStock => (Duration::ZERO, Ok(Page::default())),
    });
    let coordinator =
        ListCoordinator::<RawMaterialBatch>::spawn(source, options(), h.context.clone());
    coordinator.settled().await.unwrap();

    coordinator.set_order(OrderDirection::Desc);
    coordinator.set_stock_filter(StockFilter::Empty);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let midway = coordinator.snapshot();
    assert!(midway.loading);
    assert!(midway.page.rows.is_empty());

    let snapshot = coordinator.settled().await.unwrap();
    assert_eq!(ids(&snapshot.page.rows), vec![2]);
}

#[tokio::test(start_paused = true)]
async fn test_quick_typing_fetches_once_with_final_text() {
    let h = harness();
    let source = FakeListSource::fixed(Page::<RawMaterialBatch>::default());
    let coordinator =
        ListCoordinator::<RawMaterialBatch>::spawn(source.clone(), options(), h.context.clone());
    coordinator.settled().await.unwrap();

    coordinator.set_text("A");
    coordinator.set_text("AB");
    coordinator.set_text("ABC ");
    let snapshot = coordinator.settled().await.unwrap();

    let calls = source.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].free_text, "ABC");
    assert_eq!(calls[1].effective_text(), Some("ABC"));
    assert_eq!(snapshot.query.free_text, "ABC");
    assert_eq!(snapshot.query.page, 0);
}

#[tokio::test(start_paused = true)]
async fn test_parent_selection_resets_page_and_overrides_text() {
    let h = harness();
    let rows: Vec<RawMaterialBatch> = (1..=10).map(|id| raw_batch(id, "3")).collect();
    let source = FakeListSource::fixed(Page::new(rows, 100));
    let coordinator =
        ListCoordinator::<RawMaterialBatch>::spawn(source.clone(), options(), h.context.clone());
    coordinator.settled().await.unwrap();

    coordinator.go_to_page(2);
    assert_eq!(coordinator.settled().await.unwrap().query.page, 2);

    coordinator.set_text("cer");
    coordinator.select_parent(ParentRef::new(EntityId(7), "cera"));
    let snapshot = coordinator.settled().await.unwrap();
    assert_eq!(snapshot.query.page, 0);
    assert_eq!(snapshot.query.parent_id(), Some(EntityId(7)));
    assert_eq!(snapshot.query.free_text, "");
    assert_eq!(snapshot.raw_text, "");

    // The debounced "cer" was overtaken by the selection
    let before = source.call_count();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(source.call_count(), before);
    assert_eq!(source.calls().last().and_then(|q| q.parent_id()), Some(EntityId(7)));

    coordinator.go_to_page(4);
    coordinator.settled().await.unwrap();
    coordinator.clear_parent();
    let snapshot = coordinator.settled().await.unwrap();
    assert_eq!(snapshot.query.page, 0);
    assert_eq!(snapshot.query.parent, None);
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_keeps_rows_and_notifies() {
    let h = harness();
    let failing = Arc::new(AtomicBool::new(false));
    let flag = failing.clone();
    let source = FakeListSource::new(move |_| {
        if flag.load(Ordering::SeqCst) {
            (
                Duration::from_millis(20),
                Err(ConsoleError::Network("connection reset".to_string())),
            )
        } else {
            (Duration::ZERO, Ok(Page::new(vec![raw_batch(1, "3")], 1)))
        }
    });
    let coordinator =
        ListCoordinator::<RawMaterialBatch>::spawn(source, options(), h.context.clone());
    coordinator.settled().await.unwrap();

    failing.store(true, Ordering::SeqCst);
    coordinator.refresh();
    let snapshot = coordinator.settled().await.unwrap();

    assert_eq!(ids(&snapshot.page.rows), vec![1]);
    assert!(!snapshot.loading);
    let notices = h.notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, NoticeKind::Error);
    assert_eq!(h.logs.count(LogLevel::Error), 1);
}

#[tokio::test(start_paused = true)]
async fn test_bus_refresh_refetches_only_matching_kind() {
    let h = harness();
    let source = FakeListSource::fixed(Page::new(vec![raw_batch(1, "3")], 1));
    let coordinator =
        ListCoordinator::<RawMaterialBatch>::spawn(source.clone(), options(), h.context.clone());
    let first = coordinator.settled().await.unwrap();
    assert_eq!(source.call_count(), 1);

    h.context.bus.publish(EntityKind::Warehouse);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(source.call_count(), 1);

    assert_eq!(h.context.bus.publish(EntityKind::RawMaterialBatch), 1);
    tokio::time::sleep(Duration::from_millis(10)).await;
    let snapshot = coordinator.settled().await.unwrap();
    assert_eq!(source.call_count(), 2);
    assert_ne!(snapshot.refresh, first.refresh);
    assert_eq!(snapshot.query, first.query);
}

#[tokio::test(start_paused = true)]
async fn test_settled_waits_for_bus_refresh() {
    let h = harness();
    let emptied = Arc::new(AtomicBool::new(false));
    let flag = emptied.clone();
    let source = FakeListSource::new(move |_| {
        if flag.load(Ordering::SeqCst) {
            (Duration::from_millis(50), Ok(Page::new(Vec::new(), 0)))
        } else {
            (Duration::ZERO, Ok(Page::new(vec![raw_batch(5, "3")], 1)))
        }
    });
    let coordinator =
        ListCoordinator::<RawMaterialBatch>::spawn(source.clone(), options(), h.context.clone());
    assert_eq!(ids(&coordinator.settled().await.unwrap().page.rows), vec![5]);

    emptied.store(true, Ordering::SeqCst);
    h.context.bus.publish(EntityKind::RawMaterialBatch);
    let snapshot = coordinator.settled().await.unwrap();

    assert!(snapshot.page.rows.is_empty());
    assert_eq!(snapshot.bus_seen, 1);
    assert_eq!(source.call_count(), 2);

    // Other kinds do not hold the list back
    h.context.bus.publish(EntityKind::Warehouse);
    let snapshot = coordinator.settled().await.unwrap();
    assert_eq!(snapshot.bus_seen, 1);
    assert_eq!(source.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_single_lot_renders_one_page() {
    let h = harness();
    let source = FakeListSource::fixed(Page::new(vec![raw_batch(5, "3")], 1));
    let coordinator =
        ListCoordinator::<RawMaterialBatch>::spawn(source, options(), h.context.clone());
    let snapshot = coordinator.settled().await.unwrap();

    assert_eq!(snapshot.total_pages(), 1);
    let view = project(&snapshot.page.rows, snapshot.loading, &h.context);
    assert_eq!(view.row_count(), 1);
    match view {
        TableView::Rows { rows, .. } => {
            assert_eq!(rows[0].id, EntityId(5));
            assert!(rows[0].cells.contains(&"#5".to_string()));
            assert!(rows[0].cells.contains(&"3 kg".to_string()));
        }
        other => panic!("expected rows, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_empty_result_shows_no_records_message() {
    let h = harness();
    let source = FakeListSource::fixed(Page::<RawMaterialBatch>::new(Vec::new(), 0));
    let coordinator =
        ListCoordinator::<RawMaterialBatch>::spawn(source, options(), h.context.clone());
    let snapshot = coordinator.settled().await.unwrap();

    assert_eq!(snapshot.total_pages(), 0);
    assert!(snapshot.pagination().controls().buttons.is_empty());
    assert_eq!(
        project(&snapshot.page.rows, snapshot.loading, &h.context),
        TableView::Empty("no se encontró ningún registro".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_task() {
    let h = harness();
    let source = FakeListSource::new(|_| {
        (
            Duration::from_secs(1),
            Ok(Page::<RawMaterialBatch>::default()),
        )
    });
    let coordinator =
        ListCoordinator::<RawMaterialBatch>::spawn(source, options(), h.context.clone());
    let mut snapshots = coordinator.subscribe();
    drop(coordinator);

    let stopped = tokio::time::timeout(Duration::from_secs(5), async {
        while snapshots.changed().await.is_ok() {}
    })
    .await;
    assert!(stopped.is_ok());
    assert_eq!(h.context.bus.publish(EntityKind::RawMaterialBatch), 0);
}

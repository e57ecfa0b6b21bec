//! Scanner field and pick modal tests

mod common;

use beereign_console::logging::LogLevel;
use beereign_console::notify::NoticeKind;
use beereign_console::picker::PickModal;
use beereign_console::remote::Lookup;
use beereign_console::scan::{not_found_message, placeholder, ScanField, ScanOutcome, ENTER_KEY_CODE};
use beereign_console::ConsoleError;
use common::{harness, product, FakeLookup};
use shared::{Entity, EntityId, Language, Product};

const BARCODE: &str = "7501234567890";

#[tokio::test]
async fn test_blank_enter_makes_no_request() {
    let h = harness();
    let lookup = FakeLookup::new(|_| Ok(Lookup::<Product>::NotFound));
    let mut field = ScanField::<Product>::new(lookup.clone(), h.context.clone());

    field.set_value("   ");
    let outcome = field.on_key(ENTER_KEY_CODE).await;

    assert!(matches!(outcome, Some(ScanOutcome::Skipped)));
    assert!(lookup.calls().is_empty());
    assert_eq!(field.value(), "");
    assert!(h.notices.drain().is_empty());
}

#[tokio::test]
async fn test_other_keys_are_edits() {
    let h = harness();
    let lookup = FakeLookup::new(|_| Ok(Lookup::<Product>::NotFound));
    let mut field = ScanField::<Product>::new(lookup.clone(), h.context.clone());

    field.set_value("75012");
    assert!(field.on_key(53).await.is_none());
    assert_eq!(field.value(), "75012");
    assert!(lookup.calls().is_empty());
}

#[tokio::test]
async fn test_scan_selects_parent_and_clears_field() {
    let h = harness();
    let lookup = FakeLookup::new(|code| {
        if code == BARCODE {
            Ok(Lookup::One(product(3, BARCODE)))
        } else {
            Ok(Lookup::NotFound)
        }
    });
    let mut field = ScanField::<Product>::new(lookup.clone(), h.context.clone());

    field.set_value(format!(" {} ", BARCODE));
    let outcome = field.on_key(ENTER_KEY_CODE).await.unwrap();

    assert_eq!(lookup.calls(), vec![BARCODE.to_string()]);
    assert_eq!(field.value(), "");
    let parent = outcome.parent().unwrap();
    assert_eq!(parent.id, EntityId(3));
    assert_eq!(placeholder(Some(&parent), Language::Spanish), "Miel De Abeja");
}

#[tokio::test]
async fn test_unknown_code_notifies_and_clears_field() {
    let h = harness();
    let lookup = FakeLookup::new(|_| Ok(Lookup::<Product>::NotFound));
    let mut field = ScanField::<Product>::new(lookup.clone(), h.context.clone());

    field.set_value(BARCODE);
    let outcome = field.on_key(ENTER_KEY_CODE).await;

    assert!(matches!(outcome, Some(ScanOutcome::NotFound)));
    assert_eq!(lookup.calls().len(), 1);
    assert_eq!(field.value(), "");
    assert_eq!(
        h.notices.drain(),
        vec![(NoticeKind::Info, not_found_message(Language::Spanish).to_string())]
    );
}

#[tokio::test]
async fn test_failed_lookup_logs_notifies_and_clears_field() {
    let h = harness();
    let lookup = FakeLookup::new(|_| -> beereign_console::ConsoleResult<Lookup<Product>> {
        Err(ConsoleError::Network("timed out".to_string()))
    });
    let mut field = ScanField::<Product>::new(lookup.clone(), h.context.clone());

    field.set_value(BARCODE);
    let outcome = field.on_key(ENTER_KEY_CODE).await;

    assert!(matches!(outcome, Some(ScanOutcome::Failed(ConsoleError::Network(_)))));
    assert_eq!(lookup.calls().len(), 1);
    assert_eq!(field.value(), "");
    assert_eq!(h.logs.count(LogLevel::Error), 1);
    let notices = h.notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, NoticeKind::Error);
}

#[tokio::test]
async fn test_shared_code_hands_candidates_to_picker() {
    let h = harness();
    let lookup = FakeLookup::new(|code| {
        Ok(Lookup::from_rows(vec![product(3, code), product(4, code)]))
    });
    let mut field = ScanField::<Product>::new(lookup.clone(), h.context.clone());
    let mut picker = PickModal::<Product>::new(lookup.clone(), h.context.clone());

    field.set_value(BARCODE);
    let Some(ScanOutcome::Ambiguous(candidates)) = field.on_key(ENTER_KEY_CODE).await else {
        panic!("expected several candidates");
    };
    picker.open_with(candidates);
    assert!(picker.is_visible());
    assert_eq!(picker.results().len(), 2);

    let mut chosen = None;
    assert!(picker.pick(1, |p: Product| chosen = Some(p.id())));
    assert_eq!(chosen, Some(EntityId(4)));
    assert!(!picker.is_visible());
    assert!(picker.results().is_empty());
}

#[tokio::test]
async fn test_hidden_picker_ignores_input() {
    let h = harness();
    let lookup = FakeLookup::new(|code| Ok(Lookup::One(product(3, code))));
    let mut picker = PickModal::<Product>::new(lookup.clone(), h.context.clone());

    picker.set_query(BARCODE);
    picker.on_key(ENTER_KEY_CODE).await;

    assert_eq!(picker.query(), "");
    assert!(lookup.calls().is_empty());
    assert!(!picker.pick(0, |_| panic!("nothing to pick")));
}

#[tokio::test]
async fn test_picker_lookup_fills_results_and_close_clears() {
    let h = harness();
    let lookup = FakeLookup::new(|code| Ok(Lookup::One(product(3, code))));
    let mut picker = PickModal::<Product>::new(lookup.clone(), h.context.clone());

    picker.open();
    picker.set_query(BARCODE);
    picker.on_key(ENTER_KEY_CODE).await;

    assert_eq!(lookup.calls(), vec![BARCODE.to_string()]);
    assert_eq!(picker.results().len(), 1);
    assert_eq!(picker.query(), "");
    assert!(!picker.is_loading());

    picker.close();
    assert!(!picker.is_visible());
    assert!(picker.results().is_empty());
}

#[tokio::test]
async fn test_picker_not_found_clears_results() {
    let h = harness();
    let lookup = FakeLookup::new(|code| {
        if code == BARCODE {
            Ok(Lookup::One(product(3, code)))
        } else {
            Ok(Lookup::NotFound)
        }
    });
    let mut picker = PickModal::<Product>::new(lookup.clone(), h.context.clone());

    picker.open();
    picker.set_query(BARCODE);
    picker.on_key(ENTER_KEY_CODE).await;
    assert_eq!(picker.results().len(), 1);

    picker.set_query("000");
    picker.on_key(ENTER_KEY_CODE).await;
    assert!(picker.results().is_empty());
    assert!(picker.is_visible());
    assert_eq!(h.notices.drain()[0].0, NoticeKind::Info);
}

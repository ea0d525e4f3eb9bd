//! End-to-end scan scenarios over the scripted gallery host.
//!
//! Paused tokio time makes every polling loop run instantly and
//! deterministically.

mod harness;

use std::collections::HashSet;
use std::time::Duration;

use claimdex_common::{AdvanceStrategy, ClaimdexError, RunState};
use claimdex_engine::{ProgressEvent, RunOutcome};
use simgallery::{ScriptedComment, SimBehavior, SimGallery};

use harness::{album, booking, chatter, scanner_for, scanner_with_behavior, ORIGIN};

fn url(path: &str) -> String {
    format!("{ORIGIN}{path}")
}

// ---------------------------------------------------------------------------
// Terminal outcomes
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn empty_gallery_ends_idle_with_nothing_found() {
    let (scanner, sink) = scanner_for(SimGallery::new(album(&[])));

    let stats = scanner.run().await.unwrap();

    assert_eq!(stats.outcome, RunOutcome::NothingFound);
    assert_eq!(stats.items_discovered, 0);
    assert_eq!(scanner.state(), RunState::Idle);
    assert!(scanner.rows().is_empty());
    assert_eq!(scanner.export_csv(), None);
    assert!(sink.contains(|e| matches!(e, ProgressEvent::NothingFound)));
}

#[tokio::test(start_paused = true)]
async fn single_item_single_match_produces_one_row() {
    let script = album(&[("/photo-1_1", &[booking("/id1"), chatter("красота!")])]);
    let (scanner, sink) = scanner_for(SimGallery::new(script));

    let stats = scanner.run().await.unwrap();

    assert_eq!(stats.outcome, RunOutcome::Completed);
    assert_eq!(stats.items_visited, 1);
    assert_eq!(stats.new_associations, 1);
    assert_eq!(stats.claimants, 1);
    assert_eq!(scanner.state(), RunState::Done);

    let rows = scanner.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].claimant.as_str(), url("/id1"));
    assert_eq!(rows[0].items.len(), 1);
    assert_eq!(rows[0].items[0].as_str(), url("/photo-1_1"));

    let csv = scanner.export_csv().unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("\"claimant_url\",\"item_urls\""));
    assert_eq!(
        lines.next().unwrap(),
        format!("\"{}\",\"{}\"", url("/id1"), url("/photo-1_1"))
    );

    assert!(sink.contains(
        |e| matches!(e, ProgressEvent::ItemProgress { index: 1, total: 1, new_matches: 1 })
    ));
}

#[tokio::test(start_paused = true)]
async fn same_claimant_across_items_folds_into_one_row() {
    let script = album(&[
        ("/photo-1_2", &[booking("/id1")]),
        ("/photo-1_1", &[booking("/id1")]),
    ]);
    let (scanner, _sink) = scanner_for(SimGallery::new(script));

    let stats = scanner.run().await.unwrap();

    assert_eq!(stats.outcome, RunOutcome::Completed);
    assert_eq!(stats.items_visited, 2);
    let rows = scanner.rows();
    assert_eq!(rows.len(), 1);
    // Item list is sorted lexically regardless of visit order.
    assert_eq!(
        rows[0]
            .items
            .iter()
            .map(|i| i.as_str().to_string())
            .collect::<Vec<_>>(),
        vec![url("/photo-1_1"), url("/photo-1_2")]
    );

    let csv = scanner.export_csv().unwrap();
    assert!(csv.contains(&format!(
        "\"{}; {}\"",
        url("/photo-1_1"),
        url("/photo-1_2")
    )));
}

// ---------------------------------------------------------------------------
// Degraded navigation
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn advance_stall_ends_run_with_partial_results() {
    let script = album(&[
        ("/photo-1_1", &[booking("/id1")]),
        ("/photo-1_2", &[booking("/id1")]),
        ("/photo-1_3", &[booking("/id2")]),
        ("/photo-1_4", &[]),
        ("/photo-1_5", &[]),
    ]);
    // One successful move (item 1 → 2), then the view freezes.
    let behavior = SimBehavior {
        advance_stall_after: Some(1),
        ..SimBehavior::default()
    };
    let (scanner, sink) = scanner_with_behavior(script, behavior);

    let stats = scanner.run().await.unwrap();

    assert_eq!(stats.outcome, RunOutcome::Stalled);
    assert_eq!(stats.items_visited, 2);
    assert_eq!(scanner.state(), RunState::Done);

    // Matches from the visited prefix survive.
    let rows = scanner.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].claimant.as_str(), url("/id1"));
    assert_eq!(rows[0].items.len(), 2);

    assert!(sink.contains(|e| matches!(
        e,
        ProgressEvent::Warning { message } if message.contains("advance not confirmed")
    )));
}

#[tokio::test(start_paused = true)]
async fn advance_falls_back_to_less_direct_strategies() {
    let script = album(&[
        ("/photo-1_1", &[booking("/id1")]),
        ("/photo-1_2", &[booking("/id2")]),
    ]);
    let behavior = SimBehavior {
        advance_supported: HashSet::from([AdvanceStrategy::ArrowKey]),
        ..SimBehavior::default()
    };
    let (scanner, _sink) = scanner_with_behavior(script, behavior);

    let stats = scanner.run().await.unwrap();

    assert_eq!(stats.outcome, RunOutcome::Completed);
    assert_eq!(stats.items_visited, 2);
    assert_eq!(scanner.rows().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn missing_advance_control_is_a_controlled_end() {
    let script = album(&[
        ("/photo-1_1", &[booking("/id1")]),
        ("/photo-1_2", &[booking("/id2")]),
    ]);
    let behavior = SimBehavior {
        advance_supported: HashSet::new(),
        ..SimBehavior::default()
    };
    let (scanner, sink) = scanner_with_behavior(script, behavior);

    let stats = scanner.run().await.unwrap();

    assert_eq!(stats.outcome, RunOutcome::Stalled);
    assert_eq!(stats.items_visited, 1);
    assert_eq!(scanner.state(), RunState::Done);
    assert!(sink.contains(|e| matches!(
        e,
        ProgressEvent::Warning { message } if message.contains("no advance control")
    )));
}

#[tokio::test(start_paused = true)]
async fn unready_comment_region_skips_item_and_continues() {
    let script = album(&[
        ("/photo-1_1", &[booking("/id1")]),
        ("/photo-1_2", &[booking("/id2")]),
        ("/photo-1_3", &[booking("/id3")]),
    ]);
    let behavior = SimBehavior {
        comment_list_missing_for: HashSet::from([1]),
        ..SimBehavior::default()
    };
    let (scanner, sink) = scanner_with_behavior(script, behavior);

    let stats = scanner.run().await.unwrap();

    assert_eq!(stats.outcome, RunOutcome::Completed);
    assert_eq!(stats.items_visited, 2);
    assert_eq!(stats.items_skipped, 1);
    // Claims from items 1 and 3 made it; item 2 was skipped, not fatal.
    assert_eq!(scanner.rows().len(), 2);
    assert!(sink.contains(|e| matches!(
        e,
        ProgressEvent::ItemProgress { index: 2, total: 3, new_matches: 0 }
    )));
}

#[tokio::test(start_paused = true)]
async fn paginated_comment_thread_is_fully_mined() {
    let mut script = album(&[]);
    let mut item = simgallery::ScriptedItem::new("/photo-1_1").batched(2);
    for i in 0..5 {
        item = item.comment(ScriptedComment::by_href("бронь", &format!("/id{i}")));
    }
    script = script.item(item);
    let (scanner, _sink) = scanner_for(SimGallery::new(script));

    let stats = scanner.run().await.unwrap();

    // All five claimants found even though the thread loads two at a time.
    assert_eq!(stats.new_associations, 5);
    assert_eq!(scanner.rows().len(), 5);
}

// ---------------------------------------------------------------------------
// Stop and failure
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn stop_during_gallery_load_keeps_discovered_items() {
    let behavior = SimBehavior {
        endless_growth: true,
        ..SimBehavior::default()
    };
    let (scanner, sink) = scanner_with_behavior(album(&[]), behavior);

    let runner = scanner.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    // Let a few scroll rounds happen, then pull the plug.
    while sink.count(|e| matches!(e, ProgressEvent::GalleryLoading { .. })) < 4 {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    scanner.stop();

    let stats = handle.await.unwrap().unwrap();
    assert_eq!(stats.outcome, RunOutcome::Stopped);
    assert_eq!(scanner.state(), RunState::Stopped);
    assert!(stats.items_discovered >= 3);
}

#[tokio::test(start_paused = true)]
async fn stop_between_items_preserves_partial_results() {
    let script = album(&[
        ("/photo-1_1", &[booking("/id1")]),
        ("/photo-1_2", &[booking("/id2")]),
        ("/photo-1_3", &[booking("/id3")]),
    ]);
    let (scanner, sink) = scanner_for(SimGallery::new(script));

    let runner = scanner.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    while sink.count(|e| matches!(e, ProgressEvent::ItemProgress { .. })) < 1 {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    scanner.stop();

    let stats = handle.await.unwrap().unwrap();
    assert_eq!(stats.outcome, RunOutcome::Stopped);
    assert!(stats.items_visited >= 1);
    assert!(!scanner.rows().is_empty());
}

#[tokio::test(start_paused = true)]
async fn missing_gallery_is_fatal_with_results_inspectable() {
    let behavior = SimBehavior {
        gallery_missing: true,
        ..SimBehavior::default()
    };
    let (scanner, sink) = scanner_with_behavior(album(&[]), behavior);

    let err = scanner.run().await.unwrap_err();
    assert!(matches!(err, ClaimdexError::GalleryMissing));
    assert_eq!(scanner.state(), RunState::Error);
    assert!(scanner.rows().is_empty());
    assert!(sink.contains(|e| matches!(e, ProgressEvent::Error { .. })));
}

#[tokio::test(start_paused = true)]
async fn host_read_failure_mid_run_preserves_earlier_claims() {
    let script = album(&[
        ("/photo-1_1", &[booking("/id1")]),
        ("/photo-1_2", &[booking("/id2")]),
    ]);
    let host = harness::FailingCommentsHost::new(SimGallery::new(script), &url("/photo-1_2"));
    let sink = std::sync::Arc::new(claimdex_engine::testing::RecordingSink::new());
    let scanner = claimdex_engine::Scanner::new(
        std::sync::Arc::new(host),
        claimdex_common::ScanConfig::default(),
        sink.clone(),
    );

    let err = scanner.run().await.unwrap_err();
    assert!(matches!(err, ClaimdexError::Anyhow(_)));
    assert_eq!(scanner.state(), RunState::Error);
    // Item 1's claim survives the failure on item 2.
    let rows = scanner.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].claimant.as_str(), url("/id1"));
}

// ---------------------------------------------------------------------------
// Lifecycle guards
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn start_outside_idle_warns_and_does_nothing() {
    let script = album(&[("/photo-1_1", &[booking("/id1")])]);
    let (scanner, sink) = scanner_for(SimGallery::new(script));

    scanner.run().await.unwrap();
    assert_eq!(scanner.state(), RunState::Done);

    let err = scanner.run().await.unwrap_err();
    assert!(matches!(err, ClaimdexError::RunActive));
    assert_eq!(scanner.state(), RunState::Done);
    assert_eq!(scanner.rows().len(), 1);
    assert!(sink.contains(|e| matches!(
        e,
        ProgressEvent::Warning { message } if message.contains("start ignored")
    )));
}

#[tokio::test(start_paused = true)]
async fn clear_resets_to_idle_and_allows_a_new_run() {
    let script = album(&[("/photo-1_1", &[booking("/id1")])]);
    let (scanner, _sink) = scanner_for(SimGallery::new(script));

    scanner.run().await.unwrap();
    assert!(!scanner.rows().is_empty());

    scanner.clear().unwrap();
    assert_eq!(scanner.state(), RunState::Idle);
    assert!(scanner.rows().is_empty());
    assert_eq!(scanner.export_csv(), None);

    let stats = scanner.run().await.unwrap();
    assert_eq!(stats.outcome, RunOutcome::Completed);
    assert_eq!(scanner.rows().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn clear_is_rejected_while_a_run_is_active() {
    let behavior = SimBehavior {
        endless_growth: true,
        ..SimBehavior::default()
    };
    let (scanner, sink) = scanner_with_behavior(album(&[]), behavior);

    let runner = scanner.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    while sink.count(|e| matches!(e, ProgressEvent::GalleryLoading { .. })) < 1 {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let err = scanner.clear().unwrap_err();
    assert!(matches!(err, ClaimdexError::RunActive));

    scanner.stop();
    handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn loader_collects_a_gallery_that_reveals_gradually() {
    let script = album(&[("/photo-1_1", &[]), ("/photo-1_2", &[])]);
    let behavior = SimBehavior {
        items_per_scroll: 1,
        ..SimBehavior::default()
    };
    let (scanner, _sink) = scanner_with_behavior(script, behavior);

    let stats = scanner.run().await.unwrap();
    assert_eq!(stats.items_discovered, 2);
    assert_eq!(stats.outcome, RunOutcome::Completed);
}

#[tokio::test(start_paused = true)]
async fn loader_gives_up_on_growth_slower_than_the_idle_threshold() {
    // More items exist, but each reveal needs 20 scrolls while the idle
    // threshold is 14 rounds — the loader must stop waiting and run with
    // what it has instead of looping forever.
    let script = album(&[("/photo-1_1", &[]), ("/photo-1_2", &[]), ("/photo-1_3", &[])]);
    let behavior = SimBehavior {
        items_per_scroll: 1,
        scrolls_per_step: 20,
        ..SimBehavior::default()
    };
    let (scanner, _sink) = scanner_with_behavior(script, behavior);

    let stats = scanner.run().await.unwrap();
    assert_eq!(stats.items_discovered, 1);
    assert_eq!(stats.items_visited, 1);
    assert_eq!(stats.outcome, RunOutcome::Completed);
}

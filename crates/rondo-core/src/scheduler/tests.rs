//! Tests for the scheduler module.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;

use super::*;
use crate::directory::StaticDirectory;
use crate::models::{RoundEvent, RoundStatus};
use crate::params::{AddStop, AddStopForPatient, CreateRound, DeleteRound, Id, ListRounds, StopRef};
use crate::routing::TableCostProvider;
use crate::RoundsError;

/// Helper function to create a test scheduler
async fn create_test_scheduler() -> (TempDir, Scheduler) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let scheduler = SchedulerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create scheduler");
    (temp_dir, scheduler)
}

/// Helper to create a round named "Morning" with the given stop count
async fn create_round_with_stops(scheduler: &Scheduler, stop_count: usize) -> u64 {
    let round = scheduler
        .create_round(&CreateRound {
            name: "Morning".to_string(),
            date: "2026-08-06".to_string(),
        })
        .await
        .expect("Failed to create round");

    for i in 0..stop_count {
        scheduler
            .add_stop(&AddStop {
                round_id: round.id,
                patient_name: format!("Patient {}", i + 1),
                patient_address: format!("{} Main Street", i + 1),
                scheduled_time: format!("{:02}:00", 8 + i),
                care_label: "Routine visit".to_string(),
            })
            .await
            .expect("Failed to add stop");
    }

    round.id
}

#[tokio::test]
async fn test_create_round_starts_planned() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;

    let round = scheduler
        .create_round(&CreateRound {
            name: "Morning".to_string(),
            date: "2026-08-06".to_string(),
        })
        .await
        .expect("Failed to create round");

    assert_eq!(round.name, "Morning");
    assert_eq!(round.status, RoundStatus::Planned);
    assert!(round.stops.is_empty());
}

#[tokio::test]
async fn test_create_round_blank_name_fails() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;

    let result = scheduler
        .create_round(&CreateRound {
            name: "  ".to_string(),
            date: "2026-08-06".to_string(),
        })
        .await;

    match result {
        Err(RoundsError::InvalidInput { field, .. }) => assert_eq!(field, "name"),
        other => panic!("Expected InvalidInput error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_add_stop_to_missing_round_fails() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;

    let result = scheduler
        .add_stop(&AddStop {
            round_id: 999,
            patient_name: "Jo Miller".to_string(),
            patient_address: "12 Elm Street".to_string(),
            scheduled_time: "08:30".to_string(),
            care_label: "Wound care".to_string(),
        })
        .await;

    match result {
        Err(RoundsError::RoundNotFound { id }) => assert_eq!(id, 999),
        other => panic!("Expected RoundNotFound error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_add_stop_orders_are_contiguous() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 3).await;

    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");

    let orders: Vec<u32> = round.stops.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_remove_stop_renumbers_remaining() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 3).await;

    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");
    let middle = round.stops[1].id;

    scheduler
        .remove_stop(&StopRef {
            round_id,
            stop_id: middle,
        })
        .await
        .expect("Failed to remove stop");

    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");

    assert_eq!(round.stops.len(), 2);
    let orders: Vec<u32> = round.stops.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![1, 2]);
    assert_eq!(round.stops[0].patient_name, "Patient 1");
    assert_eq!(round.stops[1].patient_name, "Patient 3");
}

#[tokio::test]
async fn test_start_round_with_stops() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 2).await;

    let round = scheduler
        .start_round(&Id { id: round_id })
        .await
        .expect("Failed to start round");

    assert_eq!(round.status, RoundStatus::Started);
}

#[tokio::test]
async fn test_start_empty_round_fails_and_stays_planned() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 0).await;

    match scheduler.start_round(&Id { id: round_id }).await {
        Err(RoundsError::EmptyRound { id }) => assert_eq!(id, round_id),
        other => panic!("Expected EmptyRound error, got {other:?}"),
    }

    // The failed transition must not mutate state
    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");
    assert_eq!(round.status, RoundStatus::Planned);
}

#[tokio::test]
async fn test_start_round_twice_fails() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 1).await;

    scheduler
        .start_round(&Id { id: round_id })
        .await
        .expect("Failed to start round");

    match scheduler.start_round(&Id { id: round_id }).await {
        Err(RoundsError::InvalidTransition { status, .. }) => {
            assert_eq!(status, RoundStatus::Started);
        }
        other => panic!("Expected InvalidTransition error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stop_editing_rejected_after_start() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 2).await;

    scheduler
        .start_round(&Id { id: round_id })
        .await
        .expect("Failed to start round");

    let result = scheduler
        .add_stop(&AddStop {
            round_id,
            patient_name: "Late Addition".to_string(),
            patient_address: "99 Oak Lane".to_string(),
            scheduled_time: "12:00".to_string(),
            care_label: "Check-in".to_string(),
        })
        .await;

    assert!(matches!(
        result,
        Err(RoundsError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_completing_last_stop_completes_round() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 3).await;

    scheduler
        .start_round(&Id { id: round_id })
        .await
        .expect("Failed to start round");

    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");
    let stop_ids: Vec<u64> = round.stops.iter().map(|s| s.id).collect();

    // First two completions leave the round started
    for &stop_id in &stop_ids[..2] {
        let round = scheduler
            .complete_stop(&StopRef { round_id, stop_id })
            .await
            .expect("Failed to complete stop");
        assert_eq!(round.status, RoundStatus::Started);
    }

    // The last completion completes the round implicitly
    let round = scheduler
        .complete_stop(&StopRef {
            round_id,
            stop_id: stop_ids[2],
        })
        .await
        .expect("Failed to complete stop");

    assert_eq!(round.status, RoundStatus::Completed);
    assert!(round.all_stops_completed());
}

#[tokio::test]
async fn test_complete_stop_on_planned_round_fails() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 1).await;

    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");

    let result = scheduler
        .complete_stop(&StopRef {
            round_id,
            stop_id: round.stops[0].id,
        })
        .await;

    match result {
        Err(RoundsError::InvalidTransition { status, .. }) => {
            assert_eq!(status, RoundStatus::Planned);
        }
        other => panic!("Expected InvalidTransition error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_complete_stop_from_other_round_fails() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let first = create_round_with_stops(&scheduler, 2).await;
    let second = create_round_with_stops(&scheduler, 1).await;

    scheduler
        .start_round(&Id { id: first })
        .await
        .expect("Failed to start round");

    let other = scheduler
        .get_round(&Id { id: second })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");
    let foreign_stop = other.stops[0].id;

    match scheduler
        .complete_stop(&StopRef {
            round_id: first,
            stop_id: foreign_stop,
        })
        .await
    {
        Err(RoundsError::StopNotFound { id }) => assert_eq!(id, foreign_stop),
        other => panic!("Expected StopNotFound error, got {other:?}"),
    }

    // The round must be left unchanged
    let round = scheduler
        .get_round(&Id { id: first })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");
    assert_eq!(round.status, RoundStatus::Started);
    assert_eq!(round.completed_stop_count(), 0);
}

#[tokio::test]
async fn test_reactivate_stop_reopens_completed_round() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 2).await;

    scheduler
        .start_round(&Id { id: round_id })
        .await
        .expect("Failed to start round");
    let round = scheduler
        .complete_round(&Id { id: round_id })
        .await
        .expect("Failed to complete round");
    assert_eq!(round.status, RoundStatus::Completed);

    let target = round.stops[0].id;
    let round = scheduler
        .reactivate_stop(&StopRef {
            round_id,
            stop_id: target,
        })
        .await
        .expect("Failed to reactivate stop");

    assert_eq!(round.status, RoundStatus::Started);
    assert!(!round.stops[0].completed);
    // The other stop's completion is untouched
    assert!(round.stops[1].completed);
}

#[tokio::test]
async fn test_reactivate_stop_on_planned_round_fails() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 1).await;

    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");

    let result = scheduler
        .reactivate_stop(&StopRef {
            round_id,
            stop_id: round.stops[0].id,
        })
        .await;

    assert!(matches!(
        result,
        Err(RoundsError::InvalidTransition {
            status: RoundStatus::Planned,
            ..
        })
    ));
}

#[tokio::test]
async fn test_complete_round_forces_all_stops() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 3).await;

    scheduler
        .start_round(&Id { id: round_id })
        .await
        .expect("Failed to start round");

    let round = scheduler
        .complete_round(&Id { id: round_id })
        .await
        .expect("Failed to complete round");

    assert_eq!(round.status, RoundStatus::Completed);
    assert_eq!(round.completed_stop_count(), 3);
}

#[tokio::test]
async fn test_events_emitted_in_commit_order() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 2).await;

    let mut events = scheduler.subscribe();

    scheduler
        .start_round(&Id { id: round_id })
        .await
        .expect("Failed to start round");

    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");
    let stop_ids: Vec<u64> = round.stops.iter().map(|s| s.id).collect();

    for &stop_id in &stop_ids {
        scheduler
            .complete_stop(&StopRef { round_id, stop_id })
            .await
            .expect("Failed to complete stop");
    }

    assert_eq!(
        events.recv().await.expect("Missing event"),
        RoundEvent::RoundStarted { round_id }
    );
    assert_eq!(
        events.recv().await.expect("Missing event"),
        RoundEvent::StopCompleted {
            round_id,
            stop_id: stop_ids[0]
        }
    );
    assert_eq!(
        events.recv().await.expect("Missing event"),
        RoundEvent::StopCompleted {
            round_id,
            stop_id: stop_ids[1]
        }
    );
    // Completing the last stop also completes the round
    assert_eq!(
        events.recv().await.expect("Missing event"),
        RoundEvent::RoundCompleted { round_id }
    );
}

#[tokio::test]
async fn test_add_stop_for_patient_snapshots_directory() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 0).await;

    let mut directory = StaticDirectory::new();
    directory.insert("p-7", "Jo Miller", "12 Elm Street");

    let stop = scheduler
        .add_stop_for_patient(
            &AddStopForPatient {
                round_id,
                patient_id: "p-7".to_string(),
                scheduled_time: "09:15".to_string(),
                care_label: "Medication".to_string(),
            },
            &directory,
        )
        .await
        .expect("Failed to add stop");

    assert_eq!(stop.patient_name, "Jo Miller");
    assert_eq!(stop.patient_address, "12 Elm Street");

    // The stop keeps its snapshot even if the directory changes
    directory.insert("p-7", "Jo Miller", "1 New Address");
    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");
    assert_eq!(round.stops[0].patient_address, "12 Elm Street");
}

#[tokio::test]
async fn test_list_rounds_summary_counts() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 2).await;

    scheduler
        .start_round(&Id { id: round_id })
        .await
        .expect("Failed to start round");
    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");
    scheduler
        .complete_stop(&StopRef {
            round_id,
            stop_id: round.stops[0].id,
        })
        .await
        .expect("Failed to complete stop");

    let summaries = scheduler
        .list_rounds_summary(&ListRounds::default())
        .await
        .expect("Failed to list summaries");

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].total_stops, 2);
    assert_eq!(summaries[0].completed_stops, 1);
    assert_eq!(summaries[0].pending_stops, 1);
}

#[tokio::test]
async fn test_delete_round_requires_confirmation() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 1).await;

    let result = scheduler
        .delete_round(&DeleteRound {
            id: round_id,
            confirmed: false,
        })
        .await;
    assert!(matches!(result, Err(RoundsError::InvalidInput { .. })));

    let deleted = scheduler
        .delete_round(&DeleteRound {
            id: round_id,
            confirmed: true,
        })
        .await
        .expect("Failed to delete round")
        .expect("Round should exist");
    assert_eq!(deleted.id, round_id);

    let gone = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to query round");
    assert!(gone.is_none());
}

#[tokio::test]
async fn test_optimize_round_and_apply() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round = scheduler
        .create_round(&CreateRound {
            name: "Optimizable".to_string(),
            date: "2026-08-06".to_string(),
        })
        .await
        .expect("Failed to create round");

    for (name, address) in [("P1", "A"), ("P2", "B"), ("P3", "C"), ("P4", "D")] {
        scheduler
            .add_stop(&AddStop {
                round_id: round.id,
                patient_name: name.to_string(),
                patient_address: address.to_string(),
                scheduled_time: "08:00".to_string(),
                care_label: "Visit".to_string(),
            })
            .await
            .expect("Failed to add stop");
    }

    let mut provider = TableCostProvider::new();
    provider.insert("A", "B", 4.0, 20.0);
    provider.insert("B", "C", 2.0, 10.0);
    provider.insert("C", "D", 4.0, 20.0);
    provider.insert("A", "C", 2.4, 12.0);
    provider.insert("B", "D", 2.4, 12.0);
    provider.insert("A", "D", 10.0, 50.0);

    let optimized = scheduler
        .optimize_round(
            &Id { id: round.id },
            Arc::new(provider),
            Some(Duration::from_secs(5)),
        )
        .await
        .expect("Optimization should succeed");

    assert!((optimized.distance_saved_km - 3.2).abs() < 1e-9);
    let names: Vec<&str> = optimized
        .stops
        .iter()
        .map(|s| s.patient_name.as_str())
        .collect();
    assert_eq!(names, vec!["P1", "P3", "P2", "P4"]);

    // Nothing persisted yet
    let unchanged = scheduler
        .get_round(&Id { id: round.id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");
    assert_eq!(unchanged.stops[1].patient_name, "P2");

    let applied = scheduler
        .apply_optimization(&Id { id: round.id }, &optimized)
        .await
        .expect("Failed to apply optimization");

    let names: Vec<&str> = applied
        .stops
        .iter()
        .map(|s| s.patient_name.as_str())
        .collect();
    assert_eq!(names, vec!["P1", "P3", "P2", "P4"]);
    let orders: Vec<u32> = applied.stops.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_optimize_round_provider_unavailable_keeps_order() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 3).await;

    // Empty provider: every pair lookup fails
    let provider = Arc::new(TableCostProvider::new());

    let result = scheduler
        .optimize_round(&Id { id: round_id }, provider, None)
        .await;
    assert!(matches!(
        result,
        Err(RoundsError::ProviderUnavailable { .. })
    ));

    // The stored order is untouched
    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");
    let orders: Vec<u32> = round.stops.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_itinerary_for_round() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 3).await;

    let itinerary = scheduler
        .itinerary(&Id { id: round_id })
        .await
        .expect("Failed to build itinerary");

    assert_eq!(itinerary.origin, "1 Main Street");
    assert_eq!(itinerary.intermediate, vec!["2 Main Street"]);
    assert_eq!(itinerary.destination, "3 Main Street");
}

#[tokio::test]
async fn test_itinerary_requires_two_stops() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 1).await;

    let result = scheduler.itinerary(&Id { id: round_id }).await;
    assert!(matches!(
        result,
        Err(RoundsError::InsufficientStops {
            required: 2,
            actual: 1
        })
    ));
}

/// Generator double that records invocations and can be told to fail.
struct RecordingGenerator {
    calls: Mutex<Vec<(u64, u64)>>,
    fail: bool,
}

impl CareSheetGenerator for RecordingGenerator {
    fn generate(&self, round_id: u64, stop_id: u64) -> crate::Result<()> {
        self.calls
            .lock()
            .expect("Lock poisoned")
            .push((round_id, stop_id));
        if self.fail {
            return Err(RoundsError::Configuration {
                message: "printer on fire".to_string(),
            });
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_care_sheet_worker_receives_completions() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 1).await;

    let generator = Arc::new(RecordingGenerator {
        calls: Mutex::new(Vec::new()),
        fail: false,
    });
    let _worker = spawn_care_sheet_worker(scheduler.subscribe(), generator.clone());

    scheduler
        .start_round(&Id { id: round_id })
        .await
        .expect("Failed to start round");
    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");
    let stop_id = round.stops[0].id;
    scheduler
        .complete_stop(&StopRef { round_id, stop_id })
        .await
        .expect("Failed to complete stop");

    // Give the worker a moment to drain the channel
    for _ in 0..50 {
        if !generator.calls.lock().expect("Lock poisoned").is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let calls = generator.calls.lock().expect("Lock poisoned").clone();
    assert_eq!(calls, vec![(round_id, stop_id)]);
}

#[tokio::test]
async fn test_care_sheet_failure_never_blocks_transition() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let round_id = create_round_with_stops(&scheduler, 1).await;

    let generator = Arc::new(RecordingGenerator {
        calls: Mutex::new(Vec::new()),
        fail: true,
    });
    let _worker = spawn_care_sheet_worker(scheduler.subscribe(), generator);

    scheduler
        .start_round(&Id { id: round_id })
        .await
        .expect("Failed to start round");
    let round = scheduler
        .get_round(&Id { id: round_id })
        .await
        .expect("Failed to get round")
        .expect("Round should exist");

    // The transition succeeds regardless of the generator failing
    let round = scheduler
        .complete_stop(&StopRef {
            round_id,
            stop_id: round.stops[0].id,
        })
        .await
        .expect("Failed to complete stop");
    assert_eq!(round.status, RoundStatus::Completed);
}

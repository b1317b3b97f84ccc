#![cfg(feature = "serde")]

use kitchen_tools::{TraceEvent, TraceLog, TraceSink};

#[test]
fn trace_log_roundtrips_via_serde() {
    let mut log = TraceLog::with_capacity(2);
    log.emit(TraceEvent::new(0, "planner.select").with_detail("pickup_plate"));
    log.emit(
        TraceEvent::new(3, "planner.backtrack")
            .with_detail("chop_lettuce")
            .with_a(1),
    );
    log.emit(TraceEvent::new(4, "planner.recipe.pop").with_detail("LettuceBurger"));

    let json = serde_json::to_string(&log).expect("serialize trace");
    let log2: TraceLog = serde_json::from_str(&json).expect("deserialize trace");
    assert_eq!(log, log2);
    assert_eq!(log2.len(), 2);
    assert_eq!(log2.with_tag("planner.select").count(), 0, "oldest event was dropped");

    // Capacity survives the trip.
    let mut log2 = log2;
    log2.emit(TraceEvent::new(5, "planner.done"));
    let ticks: Vec<u64> = log2.events().map(|e| e.tick).collect();
    assert_eq!(ticks, vec![4, 5]);
}

#[test]
fn trace_event_fields_are_plain_json() {
    let event = TraceEvent::new(7, "planner.fail").with_detail("no fire");
    let json = serde_json::to_value(&event).expect("serialize event");
    assert_eq!(
        json,
        serde_json::json!({"tick": 7, "tag": "planner.fail", "detail": "no fire", "a": 0})
    );
}

use super::*;
use crate::metrics::MetricsReport;

#[test]
fn global_init_has_no_extra_fields() {
    let json = serde_json::to_value(Event::GlobalInit).unwrap();
    assert_eq!(json, serde_json::json!({"type": "GLOBAL_INIT"}));
}

#[test]
fn stream_omits_encoding_when_raw() {
    let event = Event::Stream {
        module: ModuleId::new("F_TypeScript"),
        data: "hello\n".to_string(),
        encoding: None,
    };
    let json = serde_json::to_value(event).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"type": "STREAM", "module": "F_TypeScript", "data": "hello\n"})
    );
}

#[test]
fn stream_reports_gzip_base64_encoding() {
    let event = Event::Stream {
        module: ModuleId::new("F_TypeScript"),
        data: "aGVsbG8=".to_string(),
        encoding: Some(StreamEncoding::GzipBase64),
    };
    let json = serde_json::to_value(event).unwrap();
    assert_eq!(json["encoding"], serde_json::json!("gzip_base64"));
}

#[test]
fn end_serializes_status_uppercase() {
    let event = Event::End {
        module: ModuleId::new("B_Ruff"),
        status: ModuleOutcome::Fail,
        summary: "2 issues".to_string(),
    };
    let json = serde_json::to_value(event).unwrap();
    assert_eq!(json["status"], serde_json::json!("FAIL"));
}

#[test]
fn metrics_round_trips() {
    let report = MetricsReport::default();
    let event = Event::Metrics {
        module: ModuleId::new("B_Lizard"),
        report: report.clone(),
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    match back {
        Event::Metrics { report: r, .. } => assert_eq!(r, report),
        _ => panic!("expected Metrics variant"),
    }
}

#[yare::parameterized(
    global_success = { Event::GlobalEnd { status: GlobalStatus::Success }, "SUCCESS" },
    global_failure = { Event::GlobalEnd { status: GlobalStatus::Failure }, "FAILURE" },
    module_pass = { Event::End { module: ModuleId::new("A"), status: ModuleOutcome::Pass, summary: String::new() }, "PASS" },
    module_fail = { Event::End { module: ModuleId::new("A"), status: ModuleOutcome::Fail, summary: String::new() }, "FAIL" },
)]
fn terminal_status_serializes_uppercase(event: Event, expected: &str) {
    let json = serde_json::to_value(event).unwrap();
    assert_eq!(json["status"], serde_json::json!(expected));
}

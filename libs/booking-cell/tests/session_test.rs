use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::machine::SLOTS_FAILED_MESSAGE;
use booking_cell::models::{BookingOutcome, NoticeLevel, Outcome, Phase};
use booking_cell::scope::NO_DOCTORS_NOTICE;
use booking_cell::submitter::BOOKING_FAILED_MESSAGE;
use booking_cell::{BookingDialog, BookingSession, DateSelector, HttpSchedulingBackend, Signal};
use shared_models::{CallerRole, RecordId};
use shared_utils::test_utils::{MockSchedulingResponses, TestClock, TestConfig};

fn tomorrow() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn session_for(mock_server: &MockServer, role: CallerRole) -> BookingSession<HttpSchedulingBackend> {
    let config = TestConfig::with_base_url(mock_server.uri()).to_app_config();
    let backend = assert_ok!(HttpSchedulingBackend::new(&config));
    let dialog = BookingDialog::new(role, DateSelector::new(), TestClock::at("2026-10-16", "14:00"));
    BookingSession::new(dialog, Arc::new(backend))
}

async fn mount_active_doctors(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/doctors/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockSchedulingResponses::active_doctors_response(vec![
                MockSchedulingResponses::doctor(1, "Dr. Rao", "Andheri", "active"),
                MockSchedulingResponses::doctor(2, "Dr. Iyer", "Bandra", "active"),
                MockSchedulingResponses::doctor(3, "Dr. Shah", "Andheri", "inactive"),
                MockSchedulingResponses::staff_member(4, "Meera", "Andheri", "receptionist"),
            ]),
        ))
        .expect(1)
        .mount(mock_server)
        .await;
}

async fn mount_slots(mock_server: &MockServer, date: &str, slots: &[(u64, &str, &str)]) {
    Mock::given(method("GET"))
        .and(path("/api/slots/unbooked"))
        .and(query_param("date", date))
        .and(query_param("doctorId", "1"))
        .and(query_param("branch", "Andheri"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSchedulingResponses::slots_response(slots)))
        .mount(mock_server)
        .await;
}

/// Opens a client session and picks Andheri, Dr. Rao and `date`.
async fn client_session_with_scope(mock_server: &MockServer, date: NaiveDate) -> BookingSession<HttpSchedulingBackend> {
    let mut session = session_for(mock_server, CallerRole::Client);
    assert!(session.open().await.is_empty());
    session.select_date(date).await;
    session.select_branch("andheri").await;
    session.select_doctor(Some(RecordId::from(1u64))).await;
    session
}

#[tokio::test]
async fn test_client_books_tomorrow_slot() {
    let mock_server = MockServer::start().await;
    mount_active_doctors(&mock_server).await;
    mount_slots(&mock_server, "2026-10-17", &[(10, "10:00:00", "10:30:00"), (11, "10:30:00", "11:00:00")]).await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .and(body_partial_json(json!({
            "doctorId": 1,
            "appointment_date": "2026-10-17",
            "from_time": "10:00:00",
            "to_time": "10:30:00",
            "purpose": "follow-up",
            "selected_branch": "Andheri"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": MockSchedulingResponses::appointment_response(900, 1, "2026-10-17", "10:00:00", "10:30:00")
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = client_session_with_scope(&mock_server, tomorrow()).await;

    let labels: Vec<String> = session.dialog().slot_views().into_iter().map(|v| v.label).collect();
    assert_eq!(labels, vec!["10:00 AM".to_string(), "10:30 AM".to_string()]);

    session.pick_slot(RecordId::from(10u64)).await;
    session.set_purpose("  follow-up ").await;
    let signals = session.submit().await;

    match signals.as_slice() {
        [Signal::Outcome(BookingOutcome::Booked { appointment, message })] => {
            assert_eq!(appointment.id, RecordId::from(900u64));
            assert_eq!(message, "Appointment booked with Dr. Rao on 2026-10-17 at 10:00 AM");
        }
        other => panic!("unexpected signals {:?}", other),
    }
    assert_eq!(session.dialog().phase(), &Phase::Done(Outcome::Success));
    assert!(!session.dialog().is_open());
}

#[tokio::test]
async fn test_rejected_booking_reports_generic_failure() {
    let mock_server = MockServer::start().await;
    mount_active_doctors(&mock_server).await;
    mount_slots(&mock_server, "2026-10-17", &[(10, "10:00:00", "10:30:00")]).await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            MockSchedulingResponses::error_response("slot already taken"),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = client_session_with_scope(&mock_server, tomorrow()).await;
    session.pick_slot(RecordId::from(10u64)).await;
    session.set_purpose("follow-up").await;
    let signals = session.submit().await;

    assert_eq!(
        signals,
        vec![Signal::Outcome(BookingOutcome::Failed {
            message: BOOKING_FAILED_MESSAGE.to_string(),
            status: Some(500),
        })]
    );
    assert_eq!(session.dialog().phase(), &Phase::Done(Outcome::Failure));
}

#[tokio::test]
async fn test_same_day_slots_before_now_are_disabled() {
    let mock_server = MockServer::start().await;
    mount_active_doctors(&mock_server).await;
    mount_slots(&mock_server, "2026-10-16", &[(1, "13:30:00", "14:00:00"), (2, "14:30:00", "15:00:00")]).await;

    let mut session = client_session_with_scope(&mock_server, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()).await;

    let views = session.dialog().slot_views();
    assert_eq!(views.len(), 2);
    assert!(views[0].disabled);
    assert!(!views[1].disabled);

    session.pick_slot(RecordId::from(1u64)).await;
    assert!(session.dialog().draft().slot.is_none());

    session.pick_slot(RecordId::from(2u64)).await;
    assert_eq!(
        session.dialog().draft().slot.as_ref().map(|s| s.slot_time_from.as_str()),
        Some("14:30:00")
    );
}

#[tokio::test]
async fn test_branch_without_doctors_never_queries_slots() {
    let mock_server = MockServer::start().await;
    mount_active_doctors(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/slots/unbooked"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSchedulingResponses::slots_response(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut session = session_for(&mock_server, CallerRole::Client);
    session.open().await;
    session.select_branch("Juhu").await;
    session.select_doctor(Some(RecordId::from(1u64))).await;
    session.select_date(tomorrow()).await;

    let dialog = session.dialog();
    assert_eq!(dialog.doctor_notice(), Some(NO_DOCTORS_NOTICE));
    assert!(!dialog.doctor_selection_enabled());
    assert_eq!(dialog.phase(), &Phase::ScopeIncomplete);
    assert!(dialog.slot_views().is_empty());
}

#[tokio::test]
async fn test_slot_lookup_failure_raises_notice() {
    let mock_server = MockServer::start().await;
    mount_active_doctors(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/slots/unbooked"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let mut session = session_for(&mock_server, CallerRole::Client);
    session.open().await;
    session.select_branch("Andheri").await;
    let signals = session.select_doctor(Some(RecordId::from(1u64))).await;

    match signals.as_slice() {
        [Signal::Notice(notice)] => {
            assert_eq!(notice.level, NoticeLevel::Error);
            assert_eq!(notice.message, SLOTS_FAILED_MESSAGE);
        }
        other => panic!("unexpected signals {:?}", other),
    }
    assert_eq!(session.dialog().phase(), &Phase::SlotsEmpty { failed: true });
    assert!(session.dialog().is_open());
}

#[tokio::test]
async fn test_malformed_slot_payload_is_a_failure_not_an_empty_list() {
    let mock_server = MockServer::start().await;
    mount_active_doctors(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/slots/unbooked"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "slots": [{ "id": 1, "slot_time_from": "ten", "slot_time_to": "10:30" }]
        })))
        .mount(&mock_server)
        .await;

    let mut session = session_for(&mock_server, CallerRole::Client);
    session.open().await;
    session.select_branch("Andheri").await;
    let signals = session.select_doctor(Some(RecordId::from(1u64))).await;

    assert_matches!(signals.as_slice(), [Signal::Notice(_)]);
    assert_eq!(session.dialog().phase(), &Phase::SlotsEmpty { failed: true });
}

#[tokio::test]
async fn test_staff_books_for_patient_in_own_branch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/receptionist/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockSchedulingResponses::branch_doctors_response("Bandra", &[(7, "Dr. Iyer")]),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/receptionist/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockSchedulingResponses::patients_response(&[(12, "Kiran Rao"), (120, "Asha Nair")]),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/slots/unbooked"))
        .and(query_param("date", "2026-10-17"))
        .and(query_param("doctorId", "7"))
        .and(query_param_is_missing("branch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockSchedulingResponses::slots_response(&[(5, "16:00", "16:30")]),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/receptionist/appointments"))
        .and(body_partial_json(json!({
            "doctorId": 7,
            "clientId": 12,
            "from_time": "16:00",
            "selected_branch": "Bandra"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockSchedulingResponses::appointment_response(901, 7, "2026-10-17", "16:00", "16:30"),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = session_for(&mock_server, CallerRole::Staff);
    session.open().await;

    assert_eq!(session.dialog().branch_options(), vec!["Bandra".to_string()]);
    let ids: Vec<RecordId> = session.dialog().patient_options("12").into_iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec![RecordId::from(12u64), RecordId::from(120u64)]);

    session.select_date(tomorrow()).await;
    session.select_doctor(Some(RecordId::from(7u64))).await;
    session.pick_slot(RecordId::from(5u64)).await;
    session.set_purpose("vaccination").await;
    session.select_client(Some(RecordId::from(12u64))).await;

    let signals = session.submit().await;

    assert_matches!(signals.as_slice(), [Signal::Outcome(BookingOutcome::Booked { .. })]);
}

#[tokio::test]
async fn test_incomplete_submit_sends_nothing() {
    let mock_server = MockServer::start().await;
    mount_active_doctors(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut session = session_for(&mock_server, CallerRole::Client);
    session.open().await;
    let signals = session.submit().await;

    assert!(signals.is_empty());
    assert_eq!(session.dialog().field_errors().len(), 4);
    assert!(session.dialog().is_open());
}

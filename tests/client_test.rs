//! Integration tests for instrument reads against a scripted native library.

mod common;

use std::time::Duration;

use common::{RecordingSupervisor, ScriptedApi, Step};
use qdppms::{
    FieldStatus, InstrumentClient, InstrumentConnection, InstrumentType, RetryPolicy,
    TemperatureStatus, UNKNOWN_VALUE,
};

fn no_wait(tries: u32) -> RetryPolicy {
    RetryPolicy::new(tries, Duration::ZERO)
}

#[test]
fn test_temperature_errors_twice_with_two_tries_is_exhausted() {
    let api = ScriptedApi::new([Step::flagged(1), Step::flagged(1), Step::ok(300.0, 1)]);
    let supervisor = RecordingSupervisor::running();
    let client = InstrumentClient::new(InstrumentConnection::default(), &api, &supervisor)
        .with_temperature_policy(no_wait(2));

    let reading = client.get_temperature();

    assert_eq!(reading.as_tuple(), (true, 1e99, "TemperatureUnknown"));
    assert!(reading.is_sentinel());
    assert_eq!(api.calls.get(), 2);
    assert_eq!(supervisor.pause_count(), 2);
}

#[test]
fn test_temperature_errors_twice_with_three_tries_succeeds() {
    let api = ScriptedApi::new([Step::flagged(1), Step::Fault, Step::ok(300.0, 1)]);
    let supervisor = RecordingSupervisor::running();
    let client = InstrumentClient::new(InstrumentConnection::default(), &api, &supervisor)
        .with_temperature_policy(no_wait(3));

    let reading = client.get_temperature();

    assert_eq!(reading.status, TemperatureStatus::Stable);
    assert_eq!(reading.value, 300.0);
    assert!(!reading.error);
    assert_eq!(supervisor.pause_count(), 2);
}

#[test]
fn test_field_read_uses_connection_params() {
    let api = ScriptedApi::new([Step::ok(20000.0, 1)]);
    let supervisor = RecordingSupervisor::running();
    let connection = InstrumentConnection::from_line("remote=True;ip=192.168.1.20;insttype=VersaLab");
    let client = InstrumentClient::new(connection, &api, &supervisor);

    let reading = client.get_field();

    assert_eq!(reading.status, FieldStatus::StablePersistent);
    assert_eq!(reading.value, 20000.0);

    let params = api.last_params.borrow().clone().unwrap();
    assert_eq!(params.address, "192.168.1.20");
    assert!(params.remote);
    assert_eq!(params.instrument, InstrumentType::VersaLab);
}

#[test]
fn test_field_exhaustion_returns_magnet_unknown() {
    let api = ScriptedApi::new(Vec::new());
    let supervisor = RecordingSupervisor::stopped();
    let client = InstrumentClient::new(InstrumentConnection::default(), &api, &supervisor)
        .with_field_policy(no_wait(2));

    let reading = client.get_field();

    assert_eq!(reading.as_tuple(), (true, UNKNOWN_VALUE, "MagnetUnknown"));
    assert_eq!(supervisor.launches.get(), 2);
}

#[test]
fn test_inert_connection_never_calls_library() {
    let api = ScriptedApi::new([Step::ok(300.0, 1)]);
    let supervisor = RecordingSupervisor::stopped();
    let client = InstrumentClient::new(InstrumentConnection::from_line("insttype=PPMS"), &api, &supervisor);

    assert!(client.connection().is_inert());
    assert!(client.get_temperature().is_sentinel());
    assert!(client.get_field().is_sentinel());
    assert_eq!(api.calls.get(), 0);
    assert_eq!(supervisor.checks.get(), 0);
    assert_eq!(supervisor.launches.get(), 0);
}

#[test]
fn test_unrecognized_status_code_is_reported_not_mislabeled() {
    let api = ScriptedApi::new([Step::ok(1.9, 12)]);
    let supervisor = RecordingSupervisor::running();
    let client = InstrumentClient::new(InstrumentConnection::default(), &api, &supervisor);

    let reading = client.get_temperature();

    assert_eq!(reading.status, TemperatureStatus::Unrecognized(12));
    assert_eq!(reading.status.to_string(), "Unrecognized(12)");
    assert_eq!(api.calls.get(), 1);
}

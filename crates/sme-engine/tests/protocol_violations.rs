//! Integration test: protocol violations abort the tick and poison the
//! network.

use sme_core::{ChannelError, ProtocolError, TickId, Value};
use sme_engine::{Mode, Network, NetworkConfig, SimError, WiringError};
use sme_process::{BindError, ProcessError};
use sme_test_utils::fixtures::{
    ConstantSource, Counter, DoubleWriter, FailingProcess, ScriptedWriter, UndrivenReader,
    WrongWay,
};

fn channel_fault(err: &SimError) -> Option<&ChannelError> {
    match err {
        SimError::Process {
            source: ProcessError::Protocol(ProtocolError::Channel { source, .. }),
            ..
        } => Some(source),
        _ => None,
    }
}

#[test]
fn double_write_aborts_the_first_tick() {
    let mut net = Network::wire("N", NetworkConfig::traced(), Mode::Local, |w| {
        let out = w.bus("out", ["value"])?;
        w.process::<DoubleWriter>("twice", &[], &[out], ())?;
        Ok(())
    })
    .unwrap();

    let err = net.advance(3).unwrap_err();
    assert!(matches!(
        err,
        SimError::Process { ref process, tick: TickId(1), .. } if process == "twice"
    ));
    assert_eq!(
        channel_fault(&err),
        Some(&ChannelError::DoubleWrite {
            pending: Value::Int(1),
            attempted: Value::Int(2),
        })
    );
    assert_eq!(net.current_tick(), TickId(0));
}

#[test]
fn two_writers_on_one_channel_collide() {
    let mut net = Network::wire("N", NetworkConfig::default(), Mode::Local, |w| {
        let out = w.bus("out", ["value"])?;
        w.process::<ConstantSource>("a", &[], &[out], Value::from(1))?;
        w.process::<ConstantSource>("b", &[], &[out], Value::from(2))?;
        Ok(())
    })
    .unwrap();

    let err = net.advance(1).unwrap_err();
    assert!(matches!(err, SimError::Process { ref process, .. } if process == "b"));
    assert!(matches!(
        channel_fault(&err),
        Some(ChannelError::DoubleWrite { .. })
    ));
}

#[test]
fn aborted_network_stays_poisoned() {
    let mut net = Network::wire("N", NetworkConfig::default(), Mode::Local, |w| {
        w.process::<FailingProcess>("flaky", &[], &[], 2)?;
        Ok(())
    })
    .unwrap();

    net.advance(2).unwrap();
    let err = net.advance(5).unwrap_err();
    assert!(matches!(err, SimError::Process { tick: TickId(3), .. }));
    assert!(net.is_poisoned());
    assert_eq!(net.current_tick(), TickId(2));
    assert!(matches!(
        net.advance(1),
        Err(SimError::Poisoned { ref network }) if network == "N"
    ));
}

#[test]
fn undriven_read_outside_trace_capture_is_fatal() {
    let mut net = Network::wire("N", NetworkConfig::traced(), Mode::Local, |w| {
        let input = w.bus("input", ["value"])?;
        w.process::<UndrivenReader>("reader", &[input], &[], ())?;
        Ok(())
    })
    .unwrap();

    let err = net.advance(1).unwrap_err();
    assert_eq!(channel_fault(&err), Some(&ChannelError::UndrivenRead));
}

#[test]
fn writing_an_input_bus_is_rejected() {
    let mut net = Network::wire("N", NetworkConfig::default(), Mode::Local, |w| {
        let input = w.bus("input", ["value"])?;
        w.process::<WrongWay>("wrong", &[input], &[], ())?;
        Ok(())
    })
    .unwrap();

    assert!(matches!(
        net.advance(1),
        Err(SimError::Process {
            source: ProcessError::NotAnOutput { .. },
            ..
        })
    ));
}

#[test]
fn typed_channels_reject_out_of_range_writes() {
    let mut net = Network::wire("N", NetworkConfig::default(), Mode::Local, |w| {
        let out = w.typed_bus("out", [("value", "u2")])?;
        w.process::<ScriptedWriter>("w", &[], &[out], vec![Some(Value::from(3)), Some(Value::from(4))])?;
        Ok(())
    })
    .unwrap();

    net.advance(1).unwrap();
    let err = net.advance(1).unwrap_err();
    assert!(matches!(
        channel_fault(&err),
        Some(ChannelError::OutOfRange { value: Value::Int(4), .. })
    ));
}

#[test]
fn bus_map_mismatch_fails_before_any_tick() {
    let err = Network::wire("N", NetworkConfig::default(), Mode::Local, |w| {
        let a = w.bus("a", ["value"])?;
        let b = w.bus("b", ["value"])?;
        w.process::<Counter>("counter", &[], &[a, b], 1)?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(
        err,
        WiringError::Bind(BindError::BusMapMismatch { buses: 2, fields: 1, .. })
    ));
}

#[test]
fn setup_can_reject_its_parameters() {
    let err = Network::wire("N", NetworkConfig::default(), Mode::Local, |w| {
        let a = w.bus("a", ["value"])?;
        w.process::<Counter>("counter", &[], &[a], 0)?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, WiringError::Bind(BindError::SetupFailed { .. })));
}

#[test]
fn empty_network_name_is_a_configuration_error() {
    let err = Network::wire("", NetworkConfig::default(), Mode::Local, |_| Ok(())).unwrap_err();
    assert!(matches!(err, WiringError::Config(_)));
}

#[test]
fn traced_buses_cannot_share_a_column() {
    // `a_b.c` and `a.b_c` both trace as `N_a_b_c`.
    let err = Network::wire("N", NetworkConfig::traced(), Mode::Local, |w| {
        w.bus("a_b", ["c"])?;
        w.bus("a", ["b_c"])?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(
        err,
        WiringError::DuplicateColumn {
            column: "N_a_b_c".into()
        }
    );
}

#[test]
fn one_trace_row_per_tick_for_distinct_columns() {
    let mut net = Network::wire("N", NetworkConfig::traced(), Mode::Local, |w| {
        w.bus("a_b", ["c"])?;
        w.bus("a", ["d"])?;
        Ok(())
    })
    .unwrap();
    net.advance(2).unwrap();
    let trace = net.trace().unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.row_count().unwrap(), 2);
}

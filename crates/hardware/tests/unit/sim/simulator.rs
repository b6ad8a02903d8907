//! # Simulator Tests
//!
//! The clocked driver against a mocked stage (protocol) and the real station (end to end).

use mockall::predicate::always;
use pretty_assertions::assert_eq;
use tomasim_core::Simulator;
use tomasim_core::common::{SimError, StepError, Tag};
use tomasim_core::config::{Config, GeneralConfig};
use tomasim_core::sim::{TimedBroadcast, Workload};

use crate::common::builder::dispatch::{ready_op, result, waiting_op};
use crate::common::mocks::stage::{MockStage, quiet_output};

fn general(max_cycles: u64, honor_backpressure: bool) -> GeneralConfig {
    GeneralConfig {
        max_cycles,
        honor_backpressure,
    }
}

fn one_group() -> Workload {
    Workload {
        groups: vec![vec![ready_op(1, 0, 0)]],
        ..Workload::default()
    }
}

#[test]
fn test_backpressure_withholds_group() {
    let mut stage = MockStage::new();
    let _ = stage.expect_admission_ready().return_const(false);
    let _ = stage.expect_occupancy().return_const(16_usize);
    let _ = stage
        .expect_step()
        .withf(|input| input.dispatch.is_empty())
        .times(5)
        .returning(|_| Ok(quiet_output(2, false, true)));

    let mut sim = Simulator::new(stage, one_group(), &general(5, true));
    let err = sim.run().unwrap_err();
    assert!(matches!(
        err,
        SimError::Deadlock {
            cycles: 5,
            pending: 1,
            occupied: 16
        }
    ));
}

#[test]
fn test_rejected_group_retried_until_accepted() {
    let mut stage = MockStage::new();
    let mut calls = 0;
    let _ = stage.expect_admission_ready().return_const(false);
    let _ = stage.expect_occupancy().return_const(0_usize);
    let _ = stage
        .expect_step()
        .withf(|input| input.dispatch.len() == 1)
        .times(3)
        .returning(move |_| {
            calls += 1;
            Ok(quiet_output(2, false, calls == 3))
        });

    let mut sim = Simulator::new(stage, one_group(), &general(100, false));
    assert_eq!(sim.run().unwrap(), 3);
    assert_eq!(sim.upstream().retries(), 2);
}

#[test]
fn test_scheduled_flush_reaches_stage() {
    let mut stage = MockStage::new();
    let _ = stage.expect_admission_ready().return_const(true);
    let _ = stage.expect_occupancy().return_const(0_usize);
    let _ = stage.expect_flush().times(1).return_const(());
    let _ = stage
        .expect_step()
        .with(always())
        .returning(|_| Ok(quiet_output(2, true, true)));

    let workload = Workload {
        flushes: vec![2],
        ..Workload::default()
    };
    let mut sim = Simulator::new(stage, workload, &general(100, true));
    assert_eq!(sim.run().unwrap(), 3);
}

#[test]
fn test_stage_error_propagates() {
    let mut stage = MockStage::new();
    let _ = stage.expect_admission_ready().return_const(true);
    let _ = stage
        .expect_step()
        .returning(|_| Err(StepError::DuplicateBroadcastTag(Tag(3))));

    let mut sim = Simulator::new(stage, one_group(), &general(100, true));
    assert!(matches!(
        sim.tick(),
        Err(SimError::Step(StepError::DuplicateBroadcastTag(Tag(3))))
    ));
}

#[test]
fn test_end_to_end_issue_log() {
    let workload = Workload {
        groups: vec![
            vec![waiting_op(1, 10), waiting_op(2, 11)],
            vec![ready_op(3, 30, 31)],
        ],
        broadcasts: vec![TimedBroadcast {
            cycle: 4,
            results: vec![result(10, 100), result(11, 110)],
        }],
        flushes: Vec::new(),
    };
    let mut sim = Simulator::from_config(&Config::default(), workload).unwrap();
    let cycles = sim.run().unwrap();
    assert_eq!(cycles, 6);

    let log: Vec<(u64, u32, u32)> = sim
        .log()
        .iter()
        .map(|r| (r.cycle, r.packet.opcode.0, r.packet.src1))
        .collect();
    assert_eq!(log, vec![(2, 3, 30), (5, 1, 100), (5, 2, 110)]);
    assert_eq!(sim.stage().stats().issued, 3);
}

#[test]
fn test_oversized_group_rejected_at_load() {
    let workload = Workload {
        groups: vec![(0..5).map(|op| ready_op(op, 0, 0)).collect()],
        ..Workload::default()
    };
    assert!(matches!(
        Simulator::from_config(&Config::default(), workload),
        Err(SimError::GroupTooWide {
            index: 0,
            len: 5,
            max: 4
        })
    ));
}

#[test]
fn test_repeated_tag_across_shared_cycle_rejected_at_load() {
    let workload = Workload {
        groups: vec![vec![waiting_op(1, 10)]],
        broadcasts: vec![
            TimedBroadcast {
                cycle: 3,
                results: vec![result(10, 1)],
            },
            TimedBroadcast {
                cycle: 3,
                results: vec![result(10, 2)],
            },
        ],
        flushes: Vec::new(),
    };
    let err = Simulator::from_config(&Config::default(), workload).unwrap_err();
    assert!(matches!(
        err,
        SimError::BroadcastSchedule {
            cycle: 3,
            source: StepError::DuplicateBroadcastTag(Tag(10))
        }
    ));
    assert_eq!(
        err.to_string(),
        "broadcasts scheduled for cycle 3: tag t10 broadcast more than once in a single step"
    );
}

#[test]
fn test_bus_overflow_across_shared_cycle_rejected_at_load() {
    let mut config = Config::default();
    config.station.broadcast_width = 2;
    let workload = Workload {
        broadcasts: vec![
            TimedBroadcast {
                cycle: 0,
                results: vec![result(1, 0), result(2, 0)],
            },
            TimedBroadcast {
                cycle: 0,
                results: vec![result(3, 0)],
            },
        ],
        ..Workload::default()
    };
    assert!(matches!(
        Simulator::from_config(&config, workload),
        Err(SimError::BroadcastSchedule {
            cycle: 0,
            source: StepError::BroadcastOverflow { len: 3, max: 2 }
        })
    ));
}

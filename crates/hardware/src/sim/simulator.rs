//! Simulator: owns the issue stage and its collaborators side-by-side.
//!
//! Each tick applies any scheduled flush, lets the upstream model form the
//! dispatch group from the stage's backpressure signal, presents the scheduled
//! broadcasts, steps the stage once, and logs every issued packet.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::common::error::SimError;
use crate::config::{Config, GeneralConfig};
use crate::core::ReservationStation;
use crate::core::signals::{Broadcast, IssuePacket, StepInput, StepOutput};
use crate::core::traits::IssueStage;

use super::upstream::Upstream;
use super::workload::Workload;

/// One packet handed to an execution port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    /// Cycle the packet was issued.
    pub cycle: u64,
    /// Execution port.
    pub port: usize,
    /// Issued payload.
    pub packet: IssuePacket,
}

/// Top-level simulator: issue stage + upstream model + scheduled bus events.
#[derive(Debug)]
pub struct Simulator<S: IssueStage = ReservationStation> {
    stage: S,
    upstream: Upstream,
    broadcasts: BTreeMap<u64, Vec<Broadcast>>,
    flushes: BTreeSet<u64>,
    cycle: u64,
    max_cycles: u64,
    log: Vec<IssueRecord>,
}

impl Simulator<ReservationStation> {
    /// Builds a reservation station from `config` and loads `workload`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` for an invalid station configuration, and the
    /// errors of [`Workload::validate`] for a workload that does not fit it.
    pub fn from_config(config: &Config, workload: Workload) -> Result<Self, SimError> {
        workload.validate(&config.station)?;
        let stage = ReservationStation::new(&config.station)?;
        Ok(Self::new(stage, workload, &config.general))
    }
}

impl<S: IssueStage> Simulator<S> {
    /// Wraps an existing stage. The workload is assumed to fit the stage's widths.
    pub fn new(stage: S, workload: Workload, general: &GeneralConfig) -> Self {
        let broadcasts = workload.broadcast_schedule();
        Self {
            stage,
            upstream: Upstream::new(workload.groups, general.honor_backpressure),
            broadcasts,
            flushes: workload.flushes.into_iter().collect(),
            cycle: 0,
            max_cycles: general.max_cycles,
            log: Vec::new(),
        }
    }

    /// Advances the simulation by one clock cycle.
    ///
    /// # Errors
    ///
    /// Propagates the stage's `StepError` if a scheduled broadcast violates the
    /// bus contract.
    pub fn tick(&mut self) -> Result<StepOutput, SimError> {
        if self.flushes.remove(&self.cycle) {
            debug!(cycle = self.cycle, "flush");
            self.stage.flush();
        }

        let input = StepInput {
            reset: false,
            dispatch: self.upstream.offer(self.stage.admission_ready()),
            broadcast: self.broadcasts.remove(&self.cycle).unwrap_or_default(),
        };
        let output = self.stage.step(&input)?;
        self.upstream.resolve(&input.dispatch, output.accepted);

        for (port, packet) in output.fired() {
            self.log.push(IssueRecord {
                cycle: self.cycle,
                port,
                packet: *packet,
            });
        }
        self.cycle += 1;
        Ok(output)
    }

    /// Ticks until the workload drains.
    ///
    /// Returns the number of cycles simulated.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Deadlock` if the workload has not drained after the
    /// configured cycle limit, or any error from [`Simulator::tick`].
    pub fn run(&mut self) -> Result<u64, SimError> {
        while !self.is_done() {
            if self.cycle >= self.max_cycles {
                return Err(SimError::Deadlock {
                    cycles: self.cycle,
                    pending: self.upstream.pending(),
                    occupied: self.stage.occupancy(),
                });
            }
            let _ = self.tick()?;
        }
        info!(
            cycles = self.cycle,
            issued = self.log.len(),
            retries = self.upstream.retries(),
            "workload drained"
        );
        Ok(self.cycle)
    }

    /// True when every group was accepted, the stage is empty, and no event is scheduled.
    pub fn is_done(&self) -> bool {
        self.upstream.is_empty()
            && self.stage.occupancy() == 0
            && self.broadcasts.is_empty()
            && self.flushes.is_empty()
    }

    /// Cycles simulated so far.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Every packet issued so far, in cycle then port order.
    pub fn log(&self) -> &[IssueRecord] {
        &self.log
    }

    /// The issue stage.
    pub const fn stage(&self) -> &S {
        &self.stage
    }

    /// The issue stage, mutably.
    pub const fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    /// The upstream dispatch model.
    pub const fn upstream(&self) -> &Upstream {
        &self.upstream
    }
}

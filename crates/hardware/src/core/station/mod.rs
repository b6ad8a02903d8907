//! Reservation station.
//!
//! The station owns a fixed table of entries addressed by slot index and composes
//! its units into one synchronous step:
//! 1. **Select:** Picks up to one ready entry per port from the pre-step table.
//! 2. **Wakeup:** Computes operand captures from this cycle's broadcasts, also against the pre-step table.
//! 3. **Admission:** Accepts or rejects the offered group from the pre-step occupancy.
//! 4. **Commit:** Clears issued slots, applies captures, and inserts the accepted group, all at once.
//!
//! Nothing written during a step's commit is visible to that step's reads: a
//! broadcast cannot make an entry issue in the same cycle, and a freshly inserted
//! entry issues at the earliest in the following cycle.

/// Admission controller (capacity check and backpressure).
pub mod admission;

/// Reservation station entry.
pub mod entry;

/// Select / arbitration policies.
pub mod select;

/// Wakeup unit (tag match and operand forwarding).
pub mod wakeup;

use std::fmt;

use tracing::{debug, trace};

use crate::common::error::{ConfigError, StepError};
use crate::config::{Arbitration, StationConfig};
use crate::core::signals::{IssuePacket, StepInput, StepOutput};
use crate::core::traits::IssueStage;
use crate::stats::{CycleSample, IssueStats};

pub use admission::{AdmissionController, AdmissionDecision};
pub use entry::{Entry, OperandSlot};
pub use select::{Arbiter, Candidate};
pub use wakeup::{Capture, WakeupUnit};

/// Every decision of one step, computed from the pre-step snapshot.
#[derive(Debug)]
struct StepPlan {
    /// Slots granted a port, in port order.
    grant: Vec<usize>,
    /// Operand captures from this cycle's broadcasts.
    captures: Vec<Capture>,
    /// Admission outcome for the offered group.
    decision: AdmissionDecision,
    /// Destination slot of each accepted candidate, in group order.
    inserts: Vec<usize>,
}

/// Fixed-capacity reservation station.
#[derive(Debug)]
pub struct ReservationStation {
    /// Entry table, indexed by slot.
    entries: Vec<Entry>,
    /// Number of occupied entries.
    occupied: usize,
    /// Sequence number given to the next inserted entry.
    next_seq: u64,
    /// Maximum dispatch group size.
    dispatch_width: usize,
    /// Maximum broadcast pairs per cycle.
    broadcast_width: usize,
    /// Number of execution ports.
    ports: usize,
    /// Select policy in use.
    arbitration: Arbitration,
    admission: AdmissionController,
    arbiter: Box<dyn Arbiter>,
    stats: IssueStats,
}

impl ReservationStation {
    /// Creates an empty station.
    ///
    /// # Errors
    ///
    /// Returns the validation error if `config` describes an unusable geometry.
    pub fn new(config: &StationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            entries: vec![Entry::default(); config.capacity],
            occupied: 0,
            next_seq: 0,
            dispatch_width: config.dispatch_width,
            broadcast_width: config.broadcast_width,
            ports: config.issue_ports,
            arbitration: config.arbitration,
            admission: AdmissionController::new(config.capacity, config.dispatch_width),
            arbiter: select::build(config.arbitration, config.capacity),
            stats: IssueStats::new(config.issue_ports),
        })
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.occupied
    }

    /// Returns true if no slot is occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Returns true if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupied == self.entries.len()
    }

    /// Number of free slots.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.entries.len() - self.occupied
    }

    /// Number of execution ports.
    #[inline]
    pub const fn ports(&self) -> usize {
        self.ports
    }

    /// Select policy in use.
    #[inline]
    pub const fn arbitration(&self) -> Arbitration {
        self.arbitration
    }

    /// The whole entry table, indexed by slot.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The entry at `slot`, if the slot exists.
    pub fn entry(&self, slot: usize) -> Option<&Entry> {
        self.entries.get(slot)
    }

    /// Slots currently eligible for issue, ascending.
    pub fn ready_slots(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_ready())
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Collected statistics.
    pub const fn stats(&self) -> &IssueStats {
        &self.stats
    }

    /// The `admission_ready` value the next step will report.
    pub const fn admission_ready(&self) -> bool {
        self.admission.admission_ready(self.occupied)
    }

    /// Executes one clock cycle.
    ///
    /// # Errors
    ///
    /// Returns a `StepError` when the dispatch group or broadcast event exceeds its
    /// configured width, or when a broadcast repeats a tag. The station is left
    /// untouched in that case.
    pub fn step(&mut self, input: &StepInput) -> Result<StepOutput, StepError> {
        self.check_contract(input)?;

        if input.reset {
            let occupancy_before = self.occupied;
            self.reset();
            self.stats.record_cycle(&CycleSample {
                occupancy_before,
                admission_ready: true,
                ..CycleSample::default()
            });
            self.stats.record_issue(&vec![false; self.ports]);
            return Ok(StepOutput {
                admission_ready: true,
                accepted: false,
                issue: vec![None; self.ports],
            });
        }

        let plan = self.plan(input);
        let issue: Vec<Option<IssuePacket>> = (0..self.ports)
            .map(|port| {
                plan.grant
                    .get(port)
                    .map(|&slot| self.entries[slot].to_packet(slot))
            })
            .collect();
        let output = StepOutput {
            admission_ready: plan.decision.admission_ready,
            accepted: plan.decision.accept,
            issue,
        };

        let occupancy_before = self.occupied;
        let unmatched = WakeupUnit::unmatched(&self.entries, &input.broadcast);
        self.commit(&plan, input);

        self.stats.record_cycle(&CycleSample {
            occupancy_before,
            occupancy_after: self.occupied,
            admission_ready: plan.decision.admission_ready,
            offered: input.dispatch.len(),
            accepted: plan.decision.accept,
            broadcasts: input.broadcast.len(),
            unmatched,
            captures: plan.captures.len(),
        });
        let fired: Vec<bool> = output.issue.iter().map(Option::is_some).collect();
        self.stats.record_issue(&fired);

        trace!(
            cycle = self.stats.cycles,
            occupied = self.occupied,
            issued = plan.grant.len(),
            admission_ready = output.admission_ready,
            "step committed"
        );
        Ok(output)
    }

    /// Discards every entry. Arbiter state, sequence numbering, and statistics are kept.
    pub fn flush(&mut self) {
        let squashed = self.clear_entries();
        self.stats.record_squash(squashed, false);
        debug!(squashed, "reservation station flushed");
    }

    /// Returns the station to its power-on state. Statistics keep accumulating.
    pub fn reset(&mut self) {
        let squashed = self.clear_entries();
        self.arbiter.reset();
        self.next_seq = 0;
        self.stats.record_squash(squashed, true);
        debug!(squashed, "reservation station reset");
    }

    fn clear_entries(&mut self) -> usize {
        let squashed = self.occupied;
        for entry in &mut self.entries {
            entry.clear();
        }
        self.occupied = 0;
        squashed
    }

    fn check_contract(&self, input: &StepInput) -> Result<(), StepError> {
        if input.dispatch.len() > self.dispatch_width {
            return Err(StepError::DispatchOverflow {
                len: input.dispatch.len(),
                max: self.dispatch_width,
            });
        }
        if input.broadcast.len() > self.broadcast_width {
            return Err(StepError::BroadcastOverflow {
                len: input.broadcast.len(),
                max: self.broadcast_width,
            });
        }
        for (i, b) in input.broadcast.iter().enumerate() {
            if input.broadcast[i + 1..].iter().any(|other| other.tag == b.tag) {
                return Err(StepError::DuplicateBroadcastTag(b.tag));
            }
        }
        Ok(())
    }

    /// Computes select, wakeup, and admission against the current table.
    fn plan(&self, input: &StepInput) -> StepPlan {
        let ready: Vec<Candidate> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_ready())
            .map(|(slot, e)| Candidate { slot, seq: e.seq })
            .collect();
        let grant = self.arbiter.select(&ready, self.ports);
        debug_assert!(grant.len() <= self.ports);

        let captures = WakeupUnit::compute(&self.entries, &input.broadcast);
        let decision = self.admission.decide(self.occupied, input.dispatch.len());

        let inserts = if decision.accept {
            self.allocate(&grant, input.dispatch.len())
        } else {
            Vec::new()
        };
        debug_assert!(!decision.accept || inserts.len() == input.dispatch.len());

        StepPlan {
            grant,
            captures,
            decision,
            inserts,
        }
    }

    /// Picks destination slots, preferring slots freed by this cycle's issue.
    fn allocate(&self, freed: &[usize], count: usize) -> Vec<usize> {
        let free = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.occupied)
            .map(|(slot, _)| slot);
        freed.iter().copied().chain(free).take(count).collect()
    }

    /// Applies a plan. Issued slots never carry captures, so the three effects commute.
    fn commit(&mut self, plan: &StepPlan, input: &StepInput) {
        for (port, &slot) in plan.grant.iter().enumerate() {
            debug!(
                port,
                slot,
                opcode = %self.entries[slot].opcode,
                dest = %self.entries[slot].dest,
                "issue"
            );
            self.entries[slot].clear();
        }

        for capture in &plan.captures {
            trace!(
                slot = capture.slot,
                operand = ?capture.operand,
                value = capture.value,
                "operand captured"
            );
        }
        WakeupUnit::apply(&mut self.entries, &plan.captures);

        if !plan.decision.accept {
            debug!(
                offered = input.dispatch.len(),
                free = self.admission.free(self.occupied),
                "dispatch group rejected"
            );
        }
        for (&slot, op) in plan.inserts.iter().zip(&input.dispatch) {
            self.entries[slot] = Entry::from_dispatch(op, self.next_seq);
            self.next_seq += 1;
        }

        self.arbiter.update(&plan.grant);
        self.occupied = self.occupied - plan.grant.len() + plan.inserts.len();
        debug_assert_eq!(
            self.occupied,
            self.entries.iter().filter(|e| e.occupied).count()
        );
    }
}

impl IssueStage for ReservationStation {
    fn step(&mut self, input: &StepInput) -> Result<StepOutput, StepError> {
        Self::step(self, input)
    }

    fn admission_ready(&self) -> bool {
        Self::admission_ready(self)
    }

    fn occupancy(&self) -> usize {
        self.occupied
    }

    fn flush(&mut self) {
        Self::flush(self);
    }

    fn reset(&mut self) {
        Self::reset(self);
    }
}

impl fmt::Display for ReservationStation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "RS {}/{} occupied, admission_ready={}",
            self.occupied,
            self.entries.len(),
            self.admission_ready()
        )?;
        for (slot, entry) in self.entries.iter().enumerate() {
            if entry.occupied {
                let mark = if entry.is_ready() { '*' } else { ' ' };
                writeln!(f, "  [{slot:>2}]{mark} {entry}")?;
            }
        }
        Ok(())
    }
}

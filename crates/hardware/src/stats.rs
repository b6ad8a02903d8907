//! Issue-stage statistics collection and reporting.
//!
//! This module tracks performance metrics for the issue stage. It provides:
//! 1. **Cycles and throughput:** Steps executed, instructions issued, and issue rate.
//! 2. **Admission:** Groups accepted and rejected, instructions dispatched, stall cycles.
//! 3. **Wakeup:** Broadcast pairs seen, operand captures, and broadcasts that matched nothing.
//! 4. **Select:** Per-port issue counts, idle port-cycles, and port utilization.
//! 5. **Occupancy:** Average and peak number of occupied entries.
//!
//! Statistics observe the station; they never influence scheduling decisions.

use std::time::Instant;

use serde::Serialize;

/// Observations from one step, recorded after the step's decisions are made.
#[derive(Clone, Copy, Debug, Default)]
pub struct CycleSample {
    /// Occupied entries at the start of the cycle.
    pub occupancy_before: usize,
    /// Occupied entries after commit.
    pub occupancy_after: usize,
    /// Whether `admission_ready` was asserted.
    pub admission_ready: bool,
    /// Size of the offered dispatch group.
    pub offered: usize,
    /// Whether the offered group was inserted.
    pub accepted: bool,
    /// Broadcast pairs presented.
    pub broadcasts: usize,
    /// Broadcast pairs that matched no pending operand.
    pub unmatched: usize,
    /// Operand captures applied.
    pub captures: usize,
}

/// Issue-stage statistics structure tracking all performance metrics.
#[derive(Clone, Debug, Serialize)]
pub struct IssueStats {
    #[serde(skip)]
    start_time: Instant,
    /// Total steps executed (including reset steps).
    pub cycles: u64,

    /// Non-empty dispatch groups inserted.
    pub groups_accepted: u64,
    /// Non-empty dispatch groups rejected for lack of space.
    pub groups_rejected: u64,
    /// Instructions inserted into the station.
    pub dispatched: u64,
    /// Cycles with `admission_ready` deasserted.
    pub stall_cycles: u64,

    /// Broadcast pairs presented on the result bus.
    pub broadcasts: u64,
    /// Broadcast pairs that matched no pending operand.
    pub broadcasts_unmatched: u64,
    /// Operands resolved by a broadcast.
    pub captures: u64,

    /// Instructions issued across all ports.
    pub issued: u64,
    /// Instructions issued on each port.
    pub issued_per_port: Vec<u64>,
    /// Port-cycles with no instruction issued.
    pub idle_port_cycles: u64,

    /// Sum of start-of-cycle occupancy, for the average.
    pub occupancy_sum: u64,
    /// Highest occupancy observed.
    pub peak_occupancy: usize,

    /// Flushes applied.
    pub flushes: u64,
    /// Entries discarded by flushes and resets.
    pub squashed: u64,
    /// Resets applied.
    pub resets: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"admission"`, `"wakeup"`, `"select"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "admission", "wakeup", "select"];

impl IssueStats {
    /// Creates zeroed statistics for a stage with `ports` execution ports.
    pub fn new(ports: usize) -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            groups_accepted: 0,
            groups_rejected: 0,
            dispatched: 0,
            stall_cycles: 0,
            broadcasts: 0,
            broadcasts_unmatched: 0,
            captures: 0,
            issued: 0,
            issued_per_port: vec![0; ports],
            idle_port_cycles: 0,
            occupancy_sum: 0,
            peak_occupancy: 0,
            flushes: 0,
            squashed: 0,
            resets: 0,
        }
    }

    /// Records the admission, wakeup, and occupancy observations of one step.
    pub fn record_cycle(&mut self, sample: &CycleSample) {
        self.cycles += 1;
        self.occupancy_sum += sample.occupancy_before as u64;
        self.peak_occupancy = self
            .peak_occupancy
            .max(sample.occupancy_before)
            .max(sample.occupancy_after);
        if !sample.admission_ready {
            self.stall_cycles += 1;
        }
        if sample.offered > 0 {
            if sample.accepted {
                self.groups_accepted += 1;
                self.dispatched += sample.offered as u64;
            } else {
                self.groups_rejected += 1;
            }
        }
        self.broadcasts += sample.broadcasts as u64;
        self.broadcasts_unmatched += sample.unmatched as u64;
        self.captures += sample.captures as u64;
    }

    /// Records which ports fired this cycle.
    pub fn record_issue(&mut self, fired: &[bool]) {
        for (port, &did_fire) in fired.iter().enumerate() {
            if did_fire {
                self.issued += 1;
                if let Some(count) = self.issued_per_port.get_mut(port) {
                    *count += 1;
                }
            } else {
                self.idle_port_cycles += 1;
            }
        }
    }

    /// Records a flush or reset that discarded `entries` entries.
    pub fn record_squash(&mut self, entries: usize, reset: bool) {
        self.squashed += entries as u64;
        if reset {
            self.resets += 1;
        } else {
            self.flushes += 1;
        }
    }

    /// Instructions issued per cycle.
    pub fn issue_rate(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.issued as f64 / self.cycles as f64
        }
    }

    /// Mean start-of-cycle occupancy.
    pub fn average_occupancy(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.occupancy_sum as f64 / self.cycles as f64
        }
    }

    /// Fraction of port-cycles that issued an instruction.
    pub fn port_utilization(&self) -> f64 {
        let port_cycles = self.cycles * self.issued_per_port.len() as u64;
        if port_cycles == 0 {
            0.0
        } else {
            self.issued as f64 / port_cycles as f64
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of `"summary"`, `"admission"`, `"wakeup"`,
    /// or `"select"`. Pass an empty slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1) as f64;

        if want("summary") {
            let khz = if seconds > 0.0 {
                (self.cycles as f64 / seconds) / 1000.0
            } else {
                0.0
            };
            println!("\n==========================================================");
            println!("ISSUE STAGE SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_freq                 {khz:.2} kHz");
            println!("sim_issued               {}", self.issued);
            println!("sim_issue_rate           {:.4}", self.issue_rate());
            println!("occupancy.avg            {:.2}", self.average_occupancy());
            println!("occupancy.peak           {}", self.peak_occupancy);
            println!("----------------------------------------------------------");
        }
        if want("admission") {
            println!("ADMISSION");
            println!("  groups.accepted        {}", self.groups_accepted);
            println!("  groups.rejected        {}", self.groups_rejected);
            println!("  insts.dispatched       {}", self.dispatched);
            println!(
                "  stalls.full            {} ({:.2}%)",
                self.stall_cycles,
                (self.stall_cycles as f64 / cyc) * 100.0
            );
            println!("  flushes                {}", self.flushes);
            println!("  resets                 {}", self.resets);
            println!("  entries.squashed       {}", self.squashed);
            println!("----------------------------------------------------------");
        }
        if want("wakeup") {
            println!("WAKEUP");
            println!("  bus.broadcasts         {}", self.broadcasts);
            println!("  bus.unmatched          {}", self.broadcasts_unmatched);
            println!("  operand.captures       {}", self.captures);
            println!("----------------------------------------------------------");
        }
        if want("select") {
            println!("SELECT");
            for (port, count) in self.issued_per_port.iter().enumerate() {
                println!(
                    "  port{:<2} issued         {} ({:.2}%)",
                    port,
                    count,
                    (*count as f64 / cyc) * 100.0
                );
            }
            println!("  ports.idle_cycles      {}", self.idle_port_cycles);
            println!(
                "  ports.utilization      {:.2}%",
                self.port_utilization() * 100.0
            );
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

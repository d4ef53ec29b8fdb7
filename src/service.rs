/*
 *   Copyright (c) 2024 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

//! `DeviceServices` is the one service object a running kernel instance
//! constructs: every per-unit array a file-scoped-globals design would keep at
//! module scope is a field here instead.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::{
    clock::{run_clock_driver, ClockState},
    config::ServiceConfig,
    substrate::{Mailbox, Pid, ProcessTable, TermControl, TermStatusWord, TerminalDevice},
    syscalls::{self, SyscallArgs, SyscallNumber, SyscallOutcome, SyscallTable},
    term::{run_terminal_driver, TerminalUnit},
};

/// The pids `start()` spawned, kept only so tests can assert the driver
/// processes actually came up; no syscall handler consults this.
pub struct ServiceHandles {
    pub clock: Pid,
    pub terminals: Vec<Pid>,
}

/// Owns every piece of per-unit and per-kernel state, plus a handle to the
/// device substrate it drives. Constructed once via [`DeviceServices::new`];
/// every syscall handler borrows it, never reconstructs it.
pub struct DeviceServices {
    config: ServiceConfig,
    processes: ProcessTable,
    clock_state: Arc<Mutex<ClockState>>,
    clock_ticks: Mailbox<()>,
    device: Arc<dyn TerminalDevice>,
    units: Vec<Arc<TerminalUnit>>,
}

impl DeviceServices {
    /// `clock_ticks` and `interrupt_mboxes` are supplied by the caller rather
    /// than created here so the same mailbox instances can be wired into the
    /// device substrate feeding them (`substrate::device::sim::SimHardware` in
    /// tests, or a real interrupt vector in a production embedding).
    pub fn new(
        config: ServiceConfig,
        device: Arc<dyn TerminalDevice>,
        clock_ticks: Mailbox<()>,
        interrupt_mboxes: Vec<Mailbox<TermStatusWord>>,
    ) -> Self {
        assert_eq!(
            interrupt_mboxes.len(),
            config.term_units,
            "one interrupt mailbox is required per configured terminal unit"
        );
        let units = interrupt_mboxes
            .into_iter()
            .enumerate()
            .map(|(unit, mbox)| Arc::new(TerminalUnit::new(unit, &config, mbox)))
            .collect();
        Self {
            config,
            processes: ProcessTable::new(),
            clock_state: Arc::new(Mutex::new(ClockState::new())),
            clock_ticks,
            device,
            units,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn processes(&self) -> &ProcessTable {
        &self.processes
    }

    pub fn unit(&self, unit: usize) -> &Arc<TerminalUnit> {
        &self.units[unit]
    }

    /// Spawns the clock driver and one terminal driver per unit, and performs
    /// the one-time "both interrupt streams disabled" control write for every
    /// unit.
    pub fn start(&self) -> ServiceHandles {
        let clock = self.processes.spawn("clock-driver", {
            let clock_ticks = self.clock_ticks.clone();
            let clock_state = self.clock_state.clone();
            let processes = self.processes.clone();
            move |_pid| run_clock_driver(clock_ticks, clock_state, processes)
        });

        let mut terminals = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            self.device.output(unit.unit(), TermControl::disabled());
            let pid = self.processes.spawn("terminal-driver", {
                let unit = unit.clone();
                let device = self.device.clone();
                let processes = self.processes.clone();
                move |_pid| run_terminal_driver(unit, device, processes)
            });
            terminals.push(pid);
        }

        info!(units = terminals.len(), "device services started");
        ServiceHandles { clock, terminals }
    }

    /// Runs on the caller's own task under its own pid.
    pub async fn sleep(&self, seconds: i32) -> i32 {
        syscalls::sleep(&self.clock_state, &self.processes, seconds, &self.config).await
    }

    pub async fn term_write(&self, unit: usize, buf: &[u8]) -> (i32, i32) {
        syscalls::term_write(&self.units, unit, self.device.as_ref(), &self.processes, buf).await
    }

    pub async fn term_read(&self, unit: usize, cap: usize) -> (Vec<u8>, i32) {
        syscalls::term_read(&self.units, unit, cap).await
    }

    /// Wires all three handlers into `table`, one call-number slot each.
    /// `self` must outlive `table`'s use, since the installed closures capture
    /// clones of this instance's shared handles (never `self` directly —
    /// `DeviceServices` isn't `Clone`).
    pub fn install(&self, table: &mut SyscallTable) {
        {
            let clock_state = self.clock_state.clone();
            let processes = self.processes.clone();
            let config = self.config;
            table.install(
                SyscallNumber::Sleep,
                Box::new(move |args| {
                    let clock_state = clock_state.clone();
                    let processes = processes.clone();
                    Box::pin(async move {
                        let SyscallArgs::Sleep { seconds } = args else {
                            unreachable!("dispatch guarantees matching args for this slot")
                        };
                        let status = syscalls::sleep(&clock_state, &processes, seconds, &config).await;
                        SyscallOutcome::Sleep { status }
                    })
                }),
            );
        }
        {
            let units = self.units.clone();
            let device = self.device.clone();
            let processes = self.processes.clone();
            table.install(
                SyscallNumber::TermWrite,
                Box::new(move |args| {
                    let units = units.clone();
                    let device = device.clone();
                    let processes = processes.clone();
                    Box::pin(async move {
                        let SyscallArgs::TermWrite { unit, buf } = args else {
                            unreachable!("dispatch guarantees matching args for this slot")
                        };
                        let (bytes_written, status) =
                            syscalls::term_write(&units, unit, device.as_ref(), &processes, &buf).await;
                        SyscallOutcome::TermWrite { bytes_written, status }
                    })
                }),
            );
        }
        {
            let units = self.units.clone();
            table.install(
                SyscallNumber::TermRead,
                Box::new(move |args| {
                    let units = units.clone();
                    Box::pin(async move {
                        let SyscallArgs::TermRead { unit, cap } = args else {
                            unreachable!("dispatch guarantees matching args for this slot")
                        };
                        let (data, status) = syscalls::term_read(&units, unit, cap).await;
                        SyscallOutcome::TermRead { data, status }
                    })
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::substrate::device::sim::SimHardware;

    fn services(config: ServiceConfig) -> (Arc<SimHardware>, DeviceServices) {
        let hw = SimHardware::new(&config);
        let interrupt_mboxes = (0..config.term_units).map(|u| hw.terminal_interrupts(u)).collect();
        let services = DeviceServices::new(config, hw.clone() as Arc<dyn TerminalDevice>, hw.clock_ticks(), interrupt_mboxes);
        (hw, services)
    }

    #[tokio::test]
    async fn sleep_returns_after_enough_ticks_elapse() {
        let config = ServiceConfig {
            tick_rate_hz: 1000,
            ..ServiceConfig::default()
        };
        let (hw, services) = services(config);
        hw.spawn_clock(Duration::from_millis(1));
        services.start();

        let result = services
            .processes()
            .run_as(|_pid| async { services.sleep(0).await })
            .await;
        assert_eq!(result, 0);
    }

    #[tokio::test]
    async fn out_of_range_unit_is_rejected_without_panicking() {
        let config = ServiceConfig::default();
        let (_hw, services) = services(config);
        services.start();

        let write_result = services
            .processes()
            .run_as(|_pid| async { services.term_write(config.term_units, b"x").await })
            .await;
        assert_eq!(write_result, (-1, -1));

        let read_result = services.term_read(config.term_units, config.max_line_length).await;
        assert_eq!(read_result, (Vec::new(), -1));
    }

    #[tokio::test]
    async fn shorter_concurrent_sleep_wakes_before_a_longer_one() {
        let config = ServiceConfig {
            tick_rate_hz: 1000,
            ..ServiceConfig::default()
        };
        let (hw, services) = services(config);
        let services = Arc::new(services);
        hw.spawn_clock(Duration::from_millis(1));
        services.start();

        let order = Arc::new(Mutex::new(Vec::new()));

        let order_five = order.clone();
        let services_five = services.clone();
        let five = services.processes().spawn("sleep-5", move |_pid| async move {
            services_five.sleep(5).await;
            order_five.lock().unwrap().push("five");
        });

        let order_three = order.clone();
        let services_three = services.clone();
        let three = services.processes().spawn("sleep-3", move |_pid| async move {
            services_three.sleep(3).await;
            order_three.lock().unwrap().push("three");
        });

        let _ = (five, three);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*order.lock().unwrap(), vec!["three", "five"]);
    }

    #[tokio::test]
    async fn write_then_loopback_read_round_trips() {
        let config = ServiceConfig::default();
        let (hw, services) = services(config);
        hw.set_loopback(1, true);
        services.start();

        let write_result = services
            .processes()
            .run_as(|_pid| async { services.term_write(1, b"hi\n").await })
            .await;
        assert_eq!(write_result, (3, 0));

        let (data, status) = services.term_read(1, config.max_line_length).await;
        assert_eq!(status, 0);
        assert_eq!(data, b"hi\n");
    }

    #[tokio::test]
    async fn dispatch_table_reaches_the_same_handlers() {
        let config = ServiceConfig::default();
        let (hw, services) = services(config);
        hw.set_loopback(2, true);
        services.start();

        let mut table = SyscallTable::new();
        services.install(&mut table);

        let write = table
            .invoke(SyscallArgs::TermWrite {
                unit: 2,
                buf: b"ok\n".to_vec(),
            })
            .await;
        assert_eq!(
            write,
            SyscallOutcome::TermWrite {
                bytes_written: 3,
                status: 0
            }
        );

        let read = table
            .invoke(SyscallArgs::TermRead {
                unit: 2,
                cap: config.max_line_length,
            })
            .await;
        assert_eq!(
            read,
            SyscallOutcome::TermRead {
                data: b"ok\n".to_vec(),
                status: 0
            }
        );
    }
}

// src/driver/mock.rs
//
// Simulated SEN0609 on the other end of the UART, shared by the driver and
// host tests.

use crate::common::{
    command::Decimal,
    config::SerialSettings,
    hal_traits::{SensorPort, SensorSerial, SensorTimer},
    types::PresenceConfig,
};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockCommError;

/// Plays the sensor: records what the driver writes, answers `get*` queries
/// from its settings table, applies `set*` commands to that table, and advances
/// a virtual clock on every delay.
#[derive(Debug)]
pub struct SimulatedSensor {
    /// Settings table: query text -> fields of its `Response` line.
    settings: HashMap<String, String>,
    silent: HashSet<String>,
    read_queue: VecDeque<u8>,
    write_log: Vec<u8>,
    current_line: Vec<u8>,
    after_write: Vec<u8>,
    before_reply: Vec<u8>,
    /// Echo each command line back, like the sensor's console does.
    pub echo: bool,
    pub fail_writes: bool,
    pub stall_writes: bool,
    pub fail_reads: bool,
    pub flushes: u32,
    pub elapsed_us: u64,
}

impl SimulatedSensor {
    pub fn new() -> Self {
        Self::with_config(&PresenceConfig::default())
    }

    pub fn with_config(cfg: &PresenceConfig) -> Self {
        let mut sim = SimulatedSensor {
            settings: HashMap::new(),
            silent: HashSet::new(),
            read_queue: VecDeque::new(),
            write_log: Vec::new(),
            current_line: Vec::new(),
            after_write: Vec::new(),
            before_reply: Vec::new(),
            echo: true,
            fail_writes: false,
            stall_writes: false,
            fail_reads: false,
            flushes: 0,
            elapsed_us: 0,
        };
        sim.load(cfg);
        sim
    }

    /// Overwrites the settings table as if the sensor had been configured with `cfg`.
    pub fn load(&mut self, cfg: &PresenceConfig) {
        let entries = [
            (
                "getRange",
                format!("{} {}", Decimal::Centi(cfg.range_min_cm), Decimal::Centi(cfg.range_max_cm)),
            ),
            ("getTrigRange", format!("{}", Decimal::Centi(cfg.trig_range_cm))),
            (
                "getSensitivity",
                format!("{} {}", cfg.keep_sensitivity, cfg.trig_sensitivity),
            ),
            (
                "getLatency",
                format!(
                    "{} {}",
                    Decimal::Centi(cfg.trig_delay as u16),
                    Decimal::Half(cfg.keep_timeout)
                ),
            ),
            ("getGpioMode 1", format!("1 {}", cfg.io_polarity)),
            ("getMicroMotion", format!("{}", cfg.fretting as u8)),
        ];
        for (query, fields) in entries {
            self.settings.insert(query.to_string(), fields);
        }
    }

    /// Raw fields the sensor would report for `query`.
    pub fn setting(&self, query: &str) -> Option<&str> {
        self.settings.get(query).map(String::as_str)
    }

    /// Never answer `query` with a `Response` line.
    pub fn silence(&mut self, query: &str) {
        self.silent.insert(query.to_string());
    }

    /// Bytes already waiting in the receive buffer.
    pub fn stage(&mut self, bytes: &[u8]) {
        self.read_queue.extend(bytes.iter().copied());
    }

    /// Bytes that arrive once the next command line has been written.
    pub fn stage_after_write(&mut self, bytes: &[u8]) {
        self.after_write.extend_from_slice(bytes);
    }

    /// Bytes slipped in between the echo and the `Response` line of the next query.
    pub fn inject_before_reply(&mut self, bytes: &[u8]) {
        self.before_reply.extend_from_slice(bytes);
    }

    pub fn pending(&self) -> usize {
        self.read_queue.len()
    }

    pub fn written(&self) -> &[u8] {
        &self.write_log
    }

    /// Every complete command line written so far, without `<CR><LF>`.
    pub fn commands(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.write_log)
            .split("\r\n")
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    fn on_command(&mut self, line: &str) {
        if self.echo {
            self.stage(line.as_bytes());
            self.stage(b"\r\n");
        }

        let mut parts = line.split(' ');
        let name = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        let joined = args.join(" ");
        match name {
            "setRange" => self.update("getRange", joined),
            "setTrigRange" => self.update("getTrigRange", joined),
            "setSensitivity" => self.update("getSensitivity", joined),
            "setLatency" => self.update("getLatency", joined),
            "setGpioLevel" => self.update("getGpioMode 1", format!("1 {}", joined)),
            "setMicroMotion" => self.update("getMicroMotion", joined),
            _ => {}
        }

        if let Some(fields) = self.settings.get(line).cloned() {
            let injected = core::mem::take(&mut self.before_reply);
            self.stage(&injected);
            if !self.silent.contains(line) {
                self.stage(format!("Response {}\r\n", fields).as_bytes());
            }
        }
        if self.echo {
            self.stage(b"Done\r\n");
        }

        let after = core::mem::take(&mut self.after_write);
        self.stage(&after);
    }

    fn update(&mut self, query: &str, fields: String) {
        self.settings.insert(query.to_string(), fields);
    }
}

impl SensorTimer for SimulatedSensor {
    fn delay_us(&mut self, us: u32) {
        self.elapsed_us += us as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_us += (ms as u64) * 1000;
    }
}

impl SensorSerial for SimulatedSensor {
    type Error = MockCommError;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        if self.fail_reads {
            return Err(nb::Error::Other(MockCommError));
        }
        self.read_queue.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if self.fail_writes {
            return Err(nb::Error::Other(MockCommError));
        }
        if self.stall_writes {
            return Err(nb::Error::WouldBlock);
        }
        self.write_log.push(byte);
        self.current_line.push(byte);
        if self.current_line.ends_with(b"\r\n") {
            let len = self.current_line.len() - 2;
            let line = String::from_utf8_lossy(&self.current_line[..len]).into_owned();
            self.current_line.clear();
            self.on_command(&line);
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

/// Port that hands out a prepared interface, or fails to open.
pub struct MockPort {
    interface: Option<SimulatedSensor>,
    pub opened_with: Option<SerialSettings>,
}

impl MockPort {
    pub fn new(interface: Option<SimulatedSensor>) -> Self {
        MockPort { interface, opened_with: None }
    }
}

impl SensorPort for MockPort {
    type Interface = SimulatedSensor;

    fn open(&mut self, settings: &SerialSettings) -> Option<SimulatedSensor> {
        self.opened_with = Some(*settings);
        self.interface.take()
    }
}

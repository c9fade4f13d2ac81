// src/driver/settings.rs

use super::PresenceSensor;
use crate::common::{
    command::Command,
    hal_traits::{SensorSerial, SensorTimer},
    types::{centi_from_f32, half_from_f32, truncate_u8, PresenceConfig},
};
use log::info;

/// GPIO pin whose polarity `getGpioMode` reports.
const OUTPUT_PIN: u8 = 1;

// Settings sequencing: every write stops detection, applies, persists with
// `saveConfig` and restarts, so the sensor never runs on half-applied settings.
impl<IF> PresenceSensor<IF>
where
    IF: SensorSerial + SensorTimer,
{
    /// Reads every setting back from the sensor and refreshes the cache.
    ///
    /// A query the sensor does not acknowledge leaves the corresponding cached
    /// fields untouched.
    pub fn read_full_config(&mut self) -> PresenceConfig {
        let mut cfg = self.cache;

        self.send(Command::SensorStop);

        let resp = self.query(Command::GetRange);
        if resp.ok {
            cfg.range_min_cm = centi_from_f32(resp.field1);
            cfg.range_max_cm = centi_from_f32(resp.field2);
        }

        let resp = self.query(Command::GetTrigRange);
        if resp.ok {
            cfg.trig_range_cm = centi_from_f32(resp.field1);
        }

        // keep first, trigger second
        let resp = self.query(Command::GetSensitivity);
        if resp.ok {
            cfg.keep_sensitivity = truncate_u8(resp.field1);
            cfg.trig_sensitivity = truncate_u8(resp.field2);
        }

        let resp = self.query(Command::GetLatency);
        if resp.ok {
            cfg.trig_delay = centi_from_f32(resp.field1).min(u8::MAX as u16) as u8;
            cfg.keep_timeout = half_from_f32(resp.field2);
        }

        let resp = self.query(Command::GetGpioMode(OUTPUT_PIN));
        if resp.ok {
            cfg.io_polarity = truncate_u8(resp.field2);
        }

        let resp = self.query(Command::GetMicroMotion);
        if resp.ok {
            cfg.fretting = resp.field1 != 0.0;
        }

        self.send(Command::SensorStart);

        if cfg != self.cache {
            info!("sensor config refreshed: {:?}", cfg);
        }
        self.cache = cfg;
        cfg
    }

    /// Writes every setting and persists them.
    ///
    /// The cache takes `cfg` as soon as the sequence has been sent, whether or
    /// not each command reached the sensor; a later [`read_full_config`]
    /// reconciles it with what the sensor actually stored.
    ///
    /// [`read_full_config`]: Self::read_full_config
    pub fn apply_full_config(&mut self, cfg: &PresenceConfig) {
        info!("applying sensor config: {:?}", cfg);
        self.write_settings(&[
            Command::SetRunApp(0),
            Command::SetRange { min_cm: cfg.range_min_cm, max_cm: cfg.range_max_cm },
            Command::SetTrigRange { trig_cm: cfg.trig_range_cm },
            Command::SetSensitivity { keep: cfg.keep_sensitivity, trig: cfg.trig_sensitivity },
            Command::SetLatency { trig_delay: cfg.trig_delay, keep_timeout: cfg.keep_timeout },
            Command::SetGpioLevel(cfg.io_polarity),
            Command::SetMicroMotion(cfg.fretting),
        ]);
        self.cache = *cfg;
    }

    /// Sets the detection window and trigger distance, all in cm.
    pub fn set_range(&mut self, min_cm: u16, max_cm: u16, trig_cm: u16) {
        info!("set range: min={} max={} trig={}", min_cm, max_cm, trig_cm);
        self.write_settings(&[
            Command::SetRange { min_cm, max_cm },
            Command::SetTrigRange { trig_cm },
        ]);
        self.cache.range_min_cm = min_cm;
        self.cache.range_max_cm = max_cm;
        self.cache.trig_range_cm = trig_cm;
    }

    pub fn set_sensitivity(&mut self, trig: u8, keep: u8) {
        info!("set sensitivity: trig={} keep={}", trig, keep);
        self.write_settings(&[Command::SetSensitivity { keep, trig }]);
        self.cache.trig_sensitivity = trig;
        self.cache.keep_sensitivity = keep;
    }

    /// `trig_delay` in 10 ms units, `keep_timeout` in 500 ms units.
    pub fn set_latency(&mut self, trig_delay: u8, keep_timeout: u16) {
        info!("set latency: trig_delay={} keep_timeout={}", trig_delay, keep_timeout);
        self.write_settings(&[Command::SetLatency { trig_delay, keep_timeout }]);
        self.cache.trig_delay = trig_delay;
        self.cache.keep_timeout = keep_timeout;
    }

    pub fn set_io_polarity(&mut self, polarity: u8) {
        info!("set io polarity: {}", polarity);
        self.write_settings(&[Command::SetGpioLevel(polarity)]);
        self.cache.io_polarity = polarity;
    }

    pub fn set_fretting(&mut self, enabled: bool) {
        info!("set fretting: {}", enabled);
        self.write_settings(&[Command::SetMicroMotion(enabled)]);
        self.cache.fretting = enabled;
    }

    /// `sensorStop`, the given commands, `saveConfig`, `sensorStart`.
    fn write_settings(&mut self, commands: &[Command]) {
        self.send(Command::SensorStop);
        for command in commands {
            self.send(*command);
        }
        self.send(Command::SaveConfig);
        self.send(Command::SensorStart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::DriverConfig;
    use crate::driver::mock::SimulatedSensor;

    fn driver_with(sim: SimulatedSensor) -> PresenceSensor<SimulatedSensor> {
        PresenceSensor::new(sim, DriverConfig::default())
    }

    fn sim(driver: &PresenceSensor<SimulatedSensor>) -> &SimulatedSensor {
        driver.interface.as_ref().unwrap()
    }

    fn commands(driver: &PresenceSensor<SimulatedSensor>) -> Vec<String> {
        sim(driver).commands()
    }

    fn sample() -> PresenceConfig {
        PresenceConfig {
            range_min_cm: 120,
            range_max_cm: 840,
            trig_range_cm: 450,
            trig_sensitivity: 7,
            keep_sensitivity: 3,
            trig_delay: 120,
            keep_timeout: 41,
            io_polarity: 1,
            fretting: false,
        }
    }

    #[test]
    fn test_set_range_command_text() {
        let mut d = driver_with(SimulatedSensor::new());
        d.set_range(30, 600, 300);
        assert_eq!(
            commands(&d),
            vec!["sensorStop", "setRange 0.3 6.0", "setTrigRange 3.0", "saveConfig", "sensorStart"]
        );
        let cfg = d.get_config();
        assert_eq!((cfg.range_min_cm, cfg.range_max_cm, cfg.trig_range_cm), (30, 600, 300));
    }

    #[test]
    fn test_narrow_setters_bracket_with_stop_save_start() {
        let mut d = driver_with(SimulatedSensor::new());
        d.set_sensitivity(8, 2);
        d.set_latency(50, 11);
        d.set_io_polarity(1);
        d.set_fretting(false);
        assert_eq!(
            commands(&d),
            vec![
                "sensorStop", "setSensitivity 2 8", "saveConfig", "sensorStart",
                "sensorStop", "setLatency 0.5 5.5", "saveConfig", "sensorStart",
                "sensorStop", "setGpioLevel 1", "saveConfig", "sensorStart",
                "sensorStop", "setMicroMotion 0", "saveConfig", "sensorStart",
            ]
        );
    }

    #[test]
    fn test_narrow_setters_touch_only_their_fields() {
        let mut d = driver_with(SimulatedSensor::new());
        let before = d.get_config();

        d.set_sensitivity(8, 2);
        let after = d.get_config();
        assert_eq!((after.trig_sensitivity, after.keep_sensitivity), (8, 2));
        assert_eq!(PresenceConfig { trig_sensitivity: 5, keep_sensitivity: 5, ..after }, before);

        d.set_io_polarity(1);
        assert_eq!(d.get_config(), PresenceConfig { io_polarity: 1, ..after });
    }

    #[test]
    fn test_apply_full_config_sequence() {
        let mut d = driver_with(SimulatedSensor::new());
        d.apply_full_config(&sample());
        assert_eq!(
            commands(&d),
            vec![
                "sensorStop",
                "setRunApp 0",
                "setRange 1.2 8.4",
                "setTrigRange 4.5",
                "setSensitivity 3 7",
                "setLatency 1.2 20.5",
                "setGpioLevel 1",
                "setMicroMotion 0",
                "saveConfig",
                "sensorStart",
            ]
        );
    }

    #[test]
    fn test_apply_then_get_round_trip() {
        let mut d = driver_with(SimulatedSensor::new());
        d.apply_full_config(&sample());
        assert_eq!(d.get_config(), sample());
    }

    #[test]
    fn test_apply_updates_cache_even_if_writes_fail() {
        let mut s = SimulatedSensor::new();
        s.fail_writes = true;
        let mut d = driver_with(s);
        d.apply_full_config(&sample());
        assert_eq!(d.get_config(), sample());
    }

    #[test]
    fn test_read_full_config() {
        let mut d = driver_with(SimulatedSensor::with_config(&sample()));
        let cfg = d.read_full_config();
        assert_eq!(cfg, sample());
        assert_eq!(d.get_config(), sample());

        let cmds = commands(&d);
        assert_eq!(cmds.first().map(String::as_str), Some("sensorStop"));
        assert_eq!(cmds.last().map(String::as_str), Some("sensorStart"));
        assert_eq!(
            &cmds[1..7],
            &["getRange", "getTrigRange", "getSensitivity", "getLatency", "getGpioMode 1", "getMicroMotion"]
        );
    }

    #[test]
    fn test_read_full_config_is_idempotent() {
        let mut d = driver_with(SimulatedSensor::with_config(&sample()));
        let first = d.read_full_config();
        let second = d.read_full_config();
        assert_eq!(first, second);
    }

    #[test]
    fn test_read_after_apply_reflects_sensor() {
        let mut d = driver_with(SimulatedSensor::new());
        d.apply_full_config(&sample());
        assert_eq!(sim(&d).setting("getRange"), Some("1.2 8.4"));
        assert_eq!(d.read_full_config(), sample());
    }

    #[test]
    fn test_read_full_config_keeps_slice_of_failed_query() {
        let cases: [(&str, fn(&mut PresenceConfig, &PresenceConfig)); 6] = [
            ("getRange", |c, old| {
                c.range_min_cm = old.range_min_cm;
                c.range_max_cm = old.range_max_cm;
            }),
            ("getTrigRange", |c, old| c.trig_range_cm = old.trig_range_cm),
            ("getSensitivity", |c, old| {
                c.trig_sensitivity = old.trig_sensitivity;
                c.keep_sensitivity = old.keep_sensitivity;
            }),
            ("getLatency", |c, old| {
                c.trig_delay = old.trig_delay;
                c.keep_timeout = old.keep_timeout;
            }),
            ("getGpioMode 1", |c, old| c.io_polarity = old.io_polarity),
            ("getMicroMotion", |c, old| c.fretting = old.fretting),
        ];

        for (query, keep_old) in cases {
            let mut s = SimulatedSensor::with_config(&sample());
            s.silence(query);
            let mut d = driver_with(s);
            let before = d.get_config();

            let got = d.read_full_config();

            let mut expected = sample();
            keep_old(&mut expected, &before);
            assert_eq!(got, expected, "silenced {}", query);
            assert_ne!(got, sample(), "silenced {}", query);
        }
    }

    #[test]
    fn test_read_full_config_ignores_stale_output() {
        let mut s = SimulatedSensor::with_config(&sample());
        s.stage(b"Response 9.9 9.9\r\njunk\r\n$DFHPD,1, , , *\r\n");
        let mut d = driver_with(s);
        assert_eq!(d.read_full_config(), sample());
        assert!(d.get_presence());
    }

    #[test]
    fn test_truncating_encoding_reads_back_truncated() {
        let mut d = driver_with(SimulatedSensor::new());
        d.set_range(35, 605, 305);
        // Cache holds intent...
        assert_eq!(d.get_config().trig_range_cm, 305);
        // ...while the sensor stored one decimal place
        let cfg = d.read_full_config();
        assert_eq!((cfg.range_min_cm, cfg.range_max_cm, cfg.trig_range_cm), (30, 600, 300));
    }

    #[test]
    fn test_unordered_ranges_pass_through() {
        let mut d = driver_with(SimulatedSensor::new());
        d.set_range(900, 100, 2000);
        assert!(commands(&d).contains(&"setRange 9.0 1.0".to_string()));
        assert_eq!(d.get_config().range_min_cm, 900);
    }

    #[test]
    fn test_unavailable_transport_keeps_intent() {
        let mut d: PresenceSensor<SimulatedSensor> =
            PresenceSensor::unavailable(DriverConfig::default());
        d.set_fretting(false);
        assert!(!d.get_config().fretting);

        let before = d.get_config();
        assert_eq!(d.read_full_config(), before);
    }

    #[test]
    fn test_write_settle_time() {
        let mut d = driver_with(SimulatedSensor::new());
        d.set_io_polarity(0);
        // stop, command, save, start
        assert_eq!(sim(&d).elapsed_us, 4 * 200_000);
    }
}

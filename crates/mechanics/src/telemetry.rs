use std::collections::VecDeque;
use std::io::{self, Write};

use simcore::{PlanarExt, VehicleState};

pub const DEFAULT_TRACE_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    EngineRpm,
    ShaftRpm,
    Throttle,
    SpeedSq,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::EngineRpm,
        Channel::ShaftRpm,
        Channel::Throttle,
        Channel::SpeedSq,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Channel::EngineRpm => "engine_rpm",
            Channel::ShaftRpm => "shaft_rpm",
            Channel::Throttle => "throttle",
            Channel::SpeedSq => "speed_sq",
        }
    }
}

/// One tick's drivetrain readings, taken after the engine rpm update and
/// before the shaft and tire updates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TraceSample {
    pub engine_rpm: f64,
    /// Shaft rpm as it stood when the tick began.
    pub shaft_rpm: f64,
    pub throttle: f64,
    /// Squared speed as it stood when the tick began.
    pub speed_sq: f64,
}

impl TraceSample {
    /// Combines the state at the start of a tick with the state after it.
    /// Nothing past the rpm update touches engine rpm or throttle, so those
    /// read the same from `after`.
    pub fn between(before: &VehicleState, after: &VehicleState) -> Self {
        TraceSample {
            engine_rpm: after.engine_rpm,
            shaft_rpm: before.shaft_rpm,
            throttle: after.throttle,
            speed_sq: before.velocity.length_sq(),
        }
    }
}

/// Rolling window of drivetrain numbers, newest last.
#[derive(Debug, Clone)]
pub struct Trace {
    tick: VecDeque<u64>,
    engine_rpm: VecDeque<f64>,
    shaft_rpm: VecDeque<f64>,
    throttle: VecDeque<f64>,
    speed_sq: VecDeque<f64>,
    capacity: usize,
}

impl Default for Trace {
    fn default() -> Self {
        Trace::new(DEFAULT_TRACE_LEN)
    }
}

impl Trace {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            tick: VecDeque::with_capacity(capacity),
            engine_rpm: VecDeque::with_capacity(capacity),
            shaft_rpm: VecDeque::with_capacity(capacity),
            throttle: VecDeque::with_capacity(capacity),
            speed_sq: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, tick: u64, sample: &TraceSample) {
        self.tick.push_back(tick);
        self.engine_rpm.push_back(sample.engine_rpm);
        self.shaft_rpm.push_back(sample.shaft_rpm);
        self.throttle.push_back(sample.throttle);
        self.speed_sq.push_back(sample.speed_sq);
        self.trim();
    }

    fn trim(&mut self) {
        while self.tick.len() > self.capacity {
            self.tick.pop_front();
            self.engine_rpm.pop_front();
            self.shaft_rpm.pop_front();
            self.throttle.pop_front();
            self.speed_sq.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.tick.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tick.is_empty()
    }

    pub fn ticks(&self) -> &VecDeque<u64> {
        &self.tick
    }

    pub fn channel(&self, channel: Channel) -> &VecDeque<f64> {
        match channel {
            Channel::EngineRpm => &self.engine_rpm,
            Channel::ShaftRpm => &self.shaft_rpm,
            Channel::Throttle => &self.throttle,
            Channel::SpeedSq => &self.speed_sq,
        }
    }

    pub fn last(&self, channel: Channel) -> Option<f64> {
        self.channel(channel).back().copied()
    }

    /// Minimum and maximum of a channel, for normalising a plot.
    pub fn range(&self, channel: Channel) -> Option<(f64, f64)> {
        let values = self.channel(channel);
        let first = *values.front()?;
        Some(
            values
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    /// Exponentially smoothed copy of a channel (`v = 0.8 v + 0.2 x`), seeded
    /// with the mean of the first ten samples.
    pub fn smoothed(&self, channel: Channel) -> Vec<f64> {
        let values = self.channel(channel);
        let seed_len = values.len().min(10);
        if seed_len == 0 {
            return Vec::new();
        }
        let mut v = values.iter().take(seed_len).sum::<f64>() / seed_len as f64;
        values
            .iter()
            .map(|&x| {
                v = v * 0.8 + x * 0.2;
                v
            })
            .collect()
    }

    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "tick")?;
        for channel in Channel::ALL {
            write!(out, ",{}", channel.label())?;
        }
        writeln!(out)?;
        for i in 0..self.len() {
            writeln!(
                out,
                "{},{:.6},{:.6},{:.6},{:.6}",
                self.tick[i], self.engine_rpm[i], self.shaft_rpm[i], self.throttle[i], self.speed_sq[i]
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use simcore::vec2;

    fn sample_with_rpm(rpm: f64) -> TraceSample {
        TraceSample {
            engine_rpm: rpm,
            ..Default::default()
        }
    }

    #[test]
    fn test_sample_mixes_start_and_end_of_tick() {
        let before = VehicleState {
            shaft_rpm: 3.0,
            velocity: vec2(0.0, 2.0),
            ..Default::default()
        };
        let after = VehicleState {
            engine_rpm: 40.0,
            shaft_rpm: 3.5,
            throttle: 0.3,
            velocity: vec2(0.0, 1.0),
            ..Default::default()
        };
        let sample = TraceSample::between(&before, &after);
        assert_eq!(
            sample,
            TraceSample {
                engine_rpm: 40.0,
                shaft_rpm: 3.0,
                throttle: 0.3,
                speed_sq: 4.0,
            }
        );
    }

    #[test]
    fn test_keeps_only_the_newest_samples() {
        let mut trace = Trace::new(3);
        for i in 0..5 {
            trace.record(i, &sample_with_rpm(i as f64));
        }
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.ticks().iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(trace.range(Channel::EngineRpm), Some((2.0, 4.0)));
        assert_eq!(trace.last(Channel::EngineRpm), Some(4.0));
    }

    #[test]
    fn test_smoothing_starts_from_the_early_mean() {
        let mut trace = Trace::default();
        for _ in 0..4 {
            trace.record(0, &sample_with_rpm(10.0));
        }
        let s = trace.smoothed(Channel::EngineRpm);
        assert_eq!(s.len(), 4);
        assert!(s.iter().all(|v| (v - 10.0).abs() < 1e-12));

        trace.record(4, &sample_with_rpm(20.0));
        let s = trace.smoothed(Channel::EngineRpm);
        // seed is mean(10, 10, 10, 10, 20) = 12
        assert!((s[0] - 11.6).abs() < 1e-12);
        assert!(Trace::default().smoothed(Channel::Throttle).is_empty());
        assert_eq!(Trace::default().range(Channel::Throttle), None);
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let mut trace = Trace::default();
        trace.record(7, &sample_with_rpm(5.0));
        let mut buf = Vec::new();
        trace.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("tick,engine_rpm,shaft_rpm,throttle,speed_sq"));
        assert_eq!(lines.next(), Some("7,5.000000,0.000000,0.000000,0.000000"));
        assert_eq!(lines.next(), None);
    }
}

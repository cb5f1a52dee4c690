//! Sample-accurate parameter automation.

/*
Parameter Timelines
===================

Every time-varying parameter in a note graph (gain, cutoff, oscillator pitch)
is described up front as a list of events, then read back sample by sample
while rendering. Nothing is ramped "live": the whole shape of a note is known
the moment it is scheduled.

Event kinds:
------------

  SetValue(t, v)          jump to v at time t and hold
  LinearRamp(t, v)        straight line from the previous point to (t, v)
  ExponentialRamp(t, v)   constant-ratio curve from the previous point to (t, v)

The "previous point" is the (time, value) of the event before the ramp. Before
the first event the timeline outputs its default value; after the last event
the last value holds forever.

    value
      1.0 |      /\
          |     /  \___________
      0.5 |    /               \
          |   /                 \__
      0.0 |__/                     ‾‾‾---___
          +--|--|--|-----------|------------> time
             set lin exp       set exp

Exponential ramps
-----------------

    v(t) = v0 * (v1 / v0) ^ ((t - t0) / (t1 - t0))

The curve is undefined when either end is zero or the ends differ in sign, so
ramp targets are clamped to EXP_RAMP_FLOOR when inserted. A ramp that starts
from zero (or a negative value) holds the start value until it ends and then
jumps, which matches how audio parameter automation behaves in browsers.
*/

/// Smallest value an exponential ramp may target.
pub const EXP_RAMP_FLOOR: f32 = 1.0e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamEvent {
    SetValue { time: f64, value: f32 },
    LinearRamp { time: f64, value: f32 },
    ExponentialRamp { time: f64, value: f32 },
}

impl ParamEvent {
    #[inline]
    pub fn time(&self) -> f64 {
        match *self {
            ParamEvent::SetValue { time, .. }
            | ParamEvent::LinearRamp { time, .. }
            | ParamEvent::ExponentialRamp { time, .. } => time,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        match *self {
            ParamEvent::SetValue { value, .. }
            | ParamEvent::LinearRamp { value, .. }
            | ParamEvent::ExponentialRamp { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamTimeline {
    default_value: f32,
    events: Vec<ParamEvent>,
}

impl ParamTimeline {
    pub fn new(default_value: f32) -> Self {
        Self {
            default_value,
            events: Vec::new(),
        }
    }

    /// A timeline that never moves.
    pub fn constant(value: f32) -> Self {
        Self::new(value)
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(ParamEvent::SetValue { time, value })
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(ParamEvent::LinearRamp { time, value })
    }

    pub fn exponential_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        let value = if value.is_finite() {
            value.max(EXP_RAMP_FLOOR)
        } else {
            EXP_RAMP_FLOOR
        };
        self.insert(ParamEvent::ExponentialRamp { time, value })
    }

    // Equal times keep insertion order.
    fn insert(&mut self, event: ParamEvent) -> &mut Self {
        let at = self
            .events
            .partition_point(|existing| existing.time() <= event.time());
        self.events.insert(at, event);
        self
    }

    pub fn events(&self) -> &[ParamEvent] {
        &self.events
    }

    pub fn default_value(&self) -> f32 {
        self.default_value
    }

    /// Time of the final event, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.events.last().map(ParamEvent::time)
    }

    pub fn value_at(&self, time: f64) -> f32 {
        let idx = self.events.partition_point(|e| e.time() <= time);

        // A ramp with nothing before it has no start point to sweep from.
        let Some(prev) = idx.checked_sub(1).and_then(|i| self.events.get(i)) else {
            return self.default_value;
        };
        let (t0, v0) = (prev.time(), prev.value());

        match self.events.get(idx) {
            Some(&ParamEvent::LinearRamp { time: t1, value: v1 }) => {
                let frac = ramp_fraction(time, t0, t1);
                v0 + (v1 - v0) * frac
            }
            Some(&ParamEvent::ExponentialRamp { time: t1, value: v1 }) => {
                if v0 <= 0.0 {
                    return v0;
                }
                let frac = ramp_fraction(time, t0, t1);
                v0 * (v1 / v0).powf(frac)
            }
            _ => v0,
        }
    }

    /// Fill `out` with one value per frame, starting at `start_time`.
    pub fn render(&self, out: &mut [f32], start_time: f64, sample_rate: f32) {
        if self.events.is_empty() {
            out.fill(self.default_value);
            return;
        }

        let dt = 1.0 / sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.value_at(start_time + i as f64 * dt);
        }
    }
}

#[inline]
fn ramp_fraction(time: f64, t0: f64, t1: f64) -> f32 {
    let span = t1 - t0;
    if span <= 0.0 {
        return 1.0;
    }
    ((time - t0) / span).clamp(0.0, 1.0) as f32
}

use crate::{
    dsp::automation::ParamTimeline,
    graph::node::{GraphNode, RenderCtx},
};

/// Renders a parameter timeline as a control signal.
///
/// Multiplied into a source with `.amplify()` it becomes a gain envelope;
/// the whole attack/decay/sustain/release shape is already in the timeline,
/// so there is no gate and no note-off.
pub struct EnvNode {
    timeline: ParamTimeline,
}

impl EnvNode {
    pub fn new(timeline: ParamTimeline) -> Self {
        Self { timeline }
    }

    /// `from` at `start`, decaying exponentially to `to` at `end`.
    pub fn exp_decay(from: f32, to: f32, start: f64, end: f64) -> Self {
        let mut timeline = ParamTimeline::new(0.0);
        timeline
            .set_value_at_time(from, start)
            .exponential_ramp_to_value_at_time(to, end);
        Self::new(timeline)
    }

    pub fn timeline(&self) -> &ParamTimeline {
        &self.timeline
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.timeline.render(out, ctx.time, ctx.sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_decay_shape() {
        let mut env = EnvNode::exp_decay(1.0, 0.001, 0.0, 0.35);
        let mut out = vec![0.0f32; 400];
        env.render_block(&mut out, &RenderCtx::new(1_000.0, 0.0));

        assert_eq!(out[0], 1.0);
        assert!(out[100] < out[50]);
        assert!((out[350] - 0.001).abs() < 1e-5);
        assert!((out[399] - 0.001).abs() < 1e-5);
    }

    #[test]
    fn silent_before_start() {
        let mut env = EnvNode::exp_decay(0.7, 0.01, 0.5, 0.6);
        let mut out = vec![1.0f32; 10];
        env.render_block(&mut out, &RenderCtx::new(1_000.0, 0.0));
        assert!(out.iter().all(|&s| s == 0.0));
    }
}

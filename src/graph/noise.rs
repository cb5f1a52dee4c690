use std::sync::Arc;

use crate::dsp::noise::NoiseBuffer;
use crate::graph::node::{GraphNode, RenderCtx};

/// One-shot playback of a noise buffer, starting at `start`.
///
/// Plays the buffer once from its first frame. Past the end of the buffer or
/// after `stop` it writes silence.
pub struct NoiseNode {
    buffer: Arc<NoiseBuffer>,
    start: f64,
    stop: f64,
}

impl NoiseNode {
    pub fn new(buffer: Arc<NoiseBuffer>, start: f64, stop: f64) -> Self {
        Self {
            buffer,
            start,
            stop,
        }
    }
}

impl GraphNode for NoiseNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let sr = ctx.sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            let t = ctx.frame_time(i);
            *sample = if t < self.start || t >= self.stop {
                0.0
            } else {
                let frame = ((t - self.start) * sr).round() as usize;
                self.buffer.get(frame)
            };
        }
    }
}

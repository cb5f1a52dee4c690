use crate::{
    dsp::{
        automation::ParamTimeline,
        filter::{FilterType, SVFilter},
    },
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Filter Node
===========

Wraps the state-variable filter as an in-place processor with a cutoff
timeline. Used in two places:

  note graphs   filter envelope on a voice (low-pass, Q 8, cutoff sweeps
                base -> peak -> sustain -> base), fixed band/high-pass on drums
  channel strip the per-voice LP / HP pair, driven directly by set_cutoff

A constant timeline renders at a single cutoff without per-sample
coefficient updates.

Example usage:
  // Closed hat: shared noise through a 6 kHz high-pass
  NoiseNode::new(noise, t, t + 0.15)
      .through(FilterNode::highpass(6000.0))
      .amplify(EnvNode::new(gain))
*/

pub struct FilterNode {
    filter: SVFilter,
    cutoff: ParamTimeline,
    cutoff_buffer: Vec<f32>,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, cutoff: ParamTimeline, q: f32) -> Self {
        let initial = cutoff.default_value();
        Self {
            filter: SVFilter::new(filter_type, initial, q),
            cutoff,
            cutoff_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, ParamTimeline::constant(cutoff_hz), 1.0)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, ParamTimeline::constant(cutoff_hz), 1.0)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, ParamTimeline::constant(cutoff_hz), 1.0)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.filter.set_q(q);
        self
    }

    pub fn cutoff(&self) -> &ParamTimeline {
        &self.cutoff
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.cutoff.events().is_empty() {
            self.filter.render(out, ctx.sample_rate);
            return;
        }

        for (chunk_index, chunk) in out.chunks_mut(MAX_BLOCK_SIZE).enumerate() {
            let cutoffs = &mut self.cutoff_buffer[..chunk.len()];
            let chunk_ctx = ctx.advanced(chunk_index * MAX_BLOCK_SIZE);
            self.cutoff
                .render(cutoffs, chunk_ctx.time, chunk_ctx.sample_rate);
            self.filter
                .render_modulated(chunk, cutoffs, chunk_ctx.sample_rate);
        }
    }
}

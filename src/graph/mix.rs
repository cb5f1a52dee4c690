use crate::{
    dsp::mix::{equal_power_gain, scale_in_place, sum_in_place},
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Parallel Signal Summing
=======================

Sum renders two graphs side by side and adds them. Drums with more than one
body use it: the snare is a noise rattle plus a triangle body, each with its
own envelope.

  Sum:    [A] ────┬──→ (+) ──→ output
          [B] ────┘

Layer is the N-way version for detuned oscillator stacks. Each layer is scaled
by 1/sqrt(N) so stacking more voices thickens the sound without getting
louder.

  Layer:  [osc -12c] ─┐
          [osc   0c] ─┼──→ (+) × 1/√N ──→ output
          [osc +12c] ─┘
*/

pub struct Sum<A, B> {
    a: A,
    b: B,
    temp_buffer: Vec<f32>,
}

impl<A, B> Sum<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self {
            a,
            b,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<A: GraphNode, B: GraphNode> GraphNode for Sum<A, B> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.a.render_block(out, ctx);

        for (chunk_index, chunk) in out.chunks_mut(MAX_BLOCK_SIZE).enumerate() {
            let frames = &mut self.temp_buffer[..chunk.len()];
            frames.fill(0.0);
            self.b
                .render_block(frames, &ctx.advanced(chunk_index * MAX_BLOCK_SIZE));
            sum_in_place(chunk, frames);
        }
    }
}

pub struct Layer<N> {
    layers: Vec<N>,
    gain: f32,
    temp_buffer: Vec<f32>,
}

impl<N> Layer<N> {
    /// Sum `layers` at equal power.
    pub fn new(layers: Vec<N>) -> Self {
        let gain = equal_power_gain(layers.len());
        Self {
            layers,
            gain,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl<N: GraphNode> GraphNode for Layer<N> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);

        for (chunk_index, chunk) in out.chunks_mut(MAX_BLOCK_SIZE).enumerate() {
            let chunk_ctx = ctx.advanced(chunk_index * MAX_BLOCK_SIZE);
            let frames = &mut self.temp_buffer[..chunk.len()];
            for layer in self.layers.iter_mut() {
                layer.render_block(frames, &chunk_ctx);
                sum_in_place(chunk, frames);
            }
            scale_in_place(chunk, self.gain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f32);

    impl GraphNode for Constant {
        fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
            out.fill(self.0);
        }
    }

    #[test]
    fn sum_adds_both_branches() {
        let mut sum = Sum::new(Constant(0.25), Constant(0.5));
        let mut out = vec![0.0f32; 4];
        sum.render_block(&mut out, &RenderCtx::new(48_000.0, 0.0));
        assert_eq!(out, vec![0.75; 4]);
    }

    #[test]
    fn layer_scales_by_inverse_root() {
        let mut layer = Layer::new(vec![Constant(1.0), Constant(1.0), Constant(1.0), Constant(1.0)]);
        assert_eq!(layer.len(), 4);
        let mut out = vec![0.0f32; 4];
        layer.render_block(&mut out, &RenderCtx::new(48_000.0, 0.0));
        // Four layers at 1/sqrt(4) each.
        assert!(out.iter().all(|&s| (s - 2.0).abs() < 1e-6));
    }

    #[test]
    fn single_layer_is_unity() {
        let mut layer = Layer::new(vec![Constant(0.3)]);
        let mut out = vec![0.0f32; 2];
        layer.render_block(&mut out, &RenderCtx::new(48_000.0, 0.0));
        assert_eq!(out, vec![0.3; 2]);
    }
}

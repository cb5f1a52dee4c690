use crate::{
    dsp::mix::multiply_in_place,
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Multiply a signal by a control signal, typically a gain envelope.
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        // Blocks larger than the scratch buffer are handled in slices (RT-safe, no allocation)
        for (chunk_index, chunk) in out.chunks_mut(MAX_BLOCK_SIZE).enumerate() {
            let frames = &mut self.temp_buffer[..chunk.len()];
            frames.fill(0.0);
            self.modulator
                .render_block(frames, &ctx.advanced(chunk_index * MAX_BLOCK_SIZE));
            multiply_in_place(chunk, frames);
        }
    }
}

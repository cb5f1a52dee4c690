use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series: the source renders into the buffer,
then the processor transforms that buffer in place.

  Through: [Source] ──→ [Processor] ──→ output

A synth note is built almost entirely out of Through links:

    oscillators ─→ filter envelope ─→ drive ─→ (× gain envelope)

and drums the same way with a noise source and a fixed filter. Links that
a voice has switched off are simply not added, so a dry note is just
`osc.amplify(env)`.
*/

pub struct Through<S, F> {
    source: S,
    processor: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, processor: F) -> Self {
        Self { source, processor }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.processor.render_block(out, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorWaveform;
    use crate::graph::{distortion::ShaperNode, oscillator::OscNode};

    #[test]
    fn processor_sees_source_output() {
        let source = OscNode::fixed(OscillatorWaveform::Square, 100.0, 0.0, 1.0);
        let mut chain = Through::new(source, ShaperNode::drive(20.0, 1.0));

        let mut out = vec![0.0f32; 64];
        chain.render_block(&mut out, &RenderCtx::new(48_000.0, 0.0));

        // The drive curve tops out well below unity at the default amount.
        let peak = out.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(peak > 0.2 && peak < 0.5, "peak {peak}");
    }
}

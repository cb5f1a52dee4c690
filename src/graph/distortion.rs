use crate::dsp::distortion::WaveShaper;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Drive Node
==========

Adds grit by pushing the signal through the drive curve, blended with the
dry signal.

Parameters
----------

Amount (0 - 100+):
  Shape of the curve. 0 is nearly linear, 20 is the voice default,
  higher squares the wave off.

Mix (0.0 - 1.0):
  Dry/wet blend. 0.0 = all dry, 1.0 = all wet, 0.5 = 50/50

Placement
---------

With a filter envelope on, drive sits after the filter so the sweep is
distorted. Without one it sits straight after the oscillators, before the
gain envelope.
*/

pub struct ShaperNode {
    shaper: WaveShaper,
}

impl ShaperNode {
    pub fn new(shaper: WaveShaper) -> Self {
        Self { shaper }
    }

    pub fn drive(amount: f32, mix: f32) -> Self {
        Self::new(WaveShaper::drive(amount, mix))
    }
}

impl GraphNode for ShaperNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.shaper.render(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_mix_sits_between_dry_and_wet() {
        let mut node = ShaperNode::drive(20.0, 0.5);
        let mut out = [0.8f32];
        node.render_block(&mut out, &RenderCtx::new(48_000.0, 0.0));

        let wet = WaveShaper::drive(20.0, 1.0).shape(0.8);
        let expected = 0.5 * 0.8 + 0.5 * wet;
        assert!((out[0] - expected).abs() < 1e-4);
    }
}

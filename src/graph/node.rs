/// Context passed to graph nodes during rendering
///
/// Contains information about what to render:
/// - sample_rate: Audio sample rate (e.g., 44100.0)
/// - time: Audio clock time of the first frame in the block, in seconds
///
/// Pitch is not part of the context. Every note graph carries its own
/// frequency automation, scheduled when the note was triggered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, time: f64) -> Self {
        Self { sample_rate, time }
    }

    /// Clock time of frame `frame` within this block.
    #[inline]
    pub fn frame_time(&self, frame: usize) -> f64 {
        self.time + frame as f64 / self.sample_rate as f64
    }

    /// Context for the block that starts `frames` later.
    pub fn advanced(&self, frames: usize) -> Self {
        Self {
            sample_rate: self.sample_rate,
            time: self.frame_time(frames),
        }
    }
}

/// Core trait for audio processing graph nodes
///
/// Sources overwrite `out`; processors (filters, shapers) transform what is
/// already in it. Combinators decide which is which.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }
}

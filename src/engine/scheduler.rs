/*
  Scheduler
  =========

  Every note and drum hit becomes its own small graph, built the moment its
  step fires and handed here with the span it sounds for:

      schedule(graph, start, stop, destination)

           block 1        block 2        block 3        block 4
      |--------------|--------------|--------------|--------------|
                ^ start                              ^ stop
                [=========== rendered ==============]
                                                       dropped

  A graph is only pulled while its span overlaps the block being rendered.
  Once the clock passes `stop` it is dropped. Graphs are never reused.

  Destinations:
    - Voice(v) → summed into that voice's buffer, then its channel strip
    - Master   → summed straight onto the master bus (drums)
*/

use crate::dsp::mix::sum_in_place;
use crate::graph::{GraphNode, RenderCtx};
use crate::{MAX_BLOCK_SIZE, NUM_VOICES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Voice(usize),
    Master,
}

pub struct ScheduledGraph {
    pub graph: Box<dyn GraphNode>,
    pub start: f64,
    pub stop: f64,
    pub destination: Destination,
}

pub struct Scheduler {
    graphs: Vec<ScheduledGraph>,
    scratch: Vec<f32>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            graphs: Vec::with_capacity(64),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn schedule(&mut self, graph: Box<dyn GraphNode>, start: f64, stop: f64, destination: Destination) {
        self.graphs.push(ScheduledGraph {
            graph,
            start,
            stop,
            destination,
        });
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Render every graph that overlaps the block into its destination.
    ///
    /// Buffers are summed into, not cleared. Returns which voices received
    /// signal this block.
    pub fn render(
        &mut self,
        ctx: &RenderCtx,
        voices: &mut [Vec<f32>; NUM_VOICES],
        master: &mut [f32],
    ) -> [bool; NUM_VOICES] {
        let frames = master.len().min(self.scratch.len());
        let block_end = ctx.frame_time(frames);
        let mut touched = [false; NUM_VOICES];

        for scheduled in &mut self.graphs {
            if scheduled.start >= block_end || scheduled.stop <= ctx.time {
                continue;
            }

            let scratch = &mut self.scratch[..frames];
            scratch.fill(0.0);
            scheduled.graph.render_block(scratch, ctx);

            match scheduled.destination {
                Destination::Master => sum_in_place(&mut master[..frames], scratch),
                Destination::Voice(voice) => match voices.get_mut(voice) {
                    Some(buffer) => {
                        sum_in_place(&mut buffer[..frames], scratch);
                        touched[voice] = true;
                    }
                    None => log::warn!("dropping block for unknown voice {voice}"),
                },
            }
        }

        touched
    }

    /// Drop graphs whose span ended at or before `now`. Returns how many went.
    pub fn retire(&mut self, now: f64) -> usize {
        let before = self.graphs.len();
        self.graphs.retain(|scheduled| scheduled.stop > now);
        before - self.graphs.len()
    }

    pub fn clear(&mut self) {
        self.graphs.clear();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeExt;

    /// Writes 1.0 for every frame inside its span.
    struct Gate {
        start: f64,
        stop: f64,
    }

    impl GraphNode for Gate {
        fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
            for (i, sample) in out.iter_mut().enumerate() {
                let t = ctx.frame_time(i);
                *sample = if t >= self.start && t < self.stop { 1.0 } else { 0.0 };
            }
        }
    }

    fn buffers(frames: usize) -> ([Vec<f32>; NUM_VOICES], Vec<f32>) {
        (
            std::array::from_fn(|_| vec![0.0; frames]),
            vec![0.0; frames],
        )
    }

    #[test]
    fn routes_to_voice_and_master() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Gate { start: 0.0, stop: 1.0 }.boxed(), 0.0, 1.0, Destination::Voice(2));
        scheduler.schedule(Gate { start: 0.0, stop: 1.0 }.boxed(), 0.0, 1.0, Destination::Master);

        let (mut voices, mut master) = buffers(10);
        let touched = scheduler.render(&RenderCtx::new(100.0, 0.0), &mut voices, &mut master);

        assert_eq!(touched, [false, false, true]);
        assert!(voices[2].iter().all(|&s| s == 1.0));
        assert!(voices[0].iter().all(|&s| s == 0.0));
        assert!(master.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn future_graphs_are_skipped() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Gate { start: 5.0, stop: 6.0 }.boxed(), 5.0, 6.0, Destination::Voice(0));

        let (mut voices, mut master) = buffers(10);
        let touched = scheduler.render(&RenderCtx::new(100.0, 0.0), &mut voices, &mut master);
        assert_eq!(touched, [false; NUM_VOICES]);
    }

    #[test]
    fn finished_graphs_are_retired() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Gate { start: 0.0, stop: 0.5 }.boxed(), 0.0, 0.5, Destination::Master);
        scheduler.schedule(Gate { start: 0.0, stop: 2.0 }.boxed(), 0.0, 2.0, Destination::Master);

        assert_eq!(scheduler.retire(0.4), 0);
        assert_eq!(scheduler.retire(0.5), 1);
        assert_eq!(scheduler.len(), 1);
    }
}

use crate::graph::{amplify::Amplify, mix::Sum, node::GraphNode, through::Through};

pub trait NodeExt: GraphNode + Sized {
    fn amplify<M: GraphNode>(self, modulator: M) -> Amplify<Self, M> {
        Amplify::new(self, modulator)
    }

    fn through<F: GraphNode>(self, processor: F) -> Through<Self, F> {
        Through::new(self, processor)
    }

    fn sum<B: GraphNode>(self, other: B) -> Sum<Self, B> {
        Sum::new(self, other)
    }

    fn boxed(self) -> Box<dyn GraphNode>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: GraphNode> NodeExt for T {}

use crate::cst::builder::Event;
use crate::cst::NodeKind;
use crate::diagnostics::ErrorNode;
use crate::parser::Parser;

/// An open node. Must be completed or abandoned.
#[must_use]
pub(crate) struct Marker {
    pos: usize,
}

impl Marker {
    pub(crate) fn new(pos: usize) -> Self {
        Self { pos }
    }

    pub(crate) fn complete(self, p: &mut Parser<'_, '_>, kind: NodeKind) -> CompletedMarker {
        self.finish(p, kind, None)
    }

    pub(crate) fn complete_error(self, p: &mut Parser<'_, '_>, error: ErrorNode) -> CompletedMarker {
        log::trace!("{} (resuming at {}): {}", error.code(), error.recovery, error);
        self.finish(p, NodeKind::Error, Some(Box::new(error)))
    }

    fn finish(
        self,
        p: &mut Parser<'_, '_>,
        kind: NodeKind,
        error: Option<Box<ErrorNode>>,
    ) -> CompletedMarker {
        if let Some(event) = p.events.get_mut(self.pos) {
            *event = Event::Start {
                kind,
                forward_parent: None,
                error,
            };
        }
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Drop the node; its children attach to the enclosing node. The start
    /// event stays behind as a tombstone, since a completed child may already
    /// point at it.
    pub(crate) fn abandon(self, _p: &mut Parser<'_, '_>) {}
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CompletedMarker {
    pos: usize,
}

impl CompletedMarker {
    /// Start a node that will wrap this one.
    pub(crate) fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let parent = p.start_raw();
        if let Some(Event::Start { forward_parent, .. }) = p.events.get_mut(self.pos) {
            *forward_parent = Some(parent.pos);
        }
        parent
    }
}

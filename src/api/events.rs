use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Point, RecordId, TransformDelta, Window, ZoomTransform};
use crate::render::RenderReason;

use super::TransformedScales;

/// Event kinds a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatterplotEventKind {
    Render,
    WindowChanged,
    SelectionChanged,
    SelectionInProgress,
    MouseMoved,
    MouseClicked,
    Dragged,
    ZoomChanged,
}

/// Notifications emitted synchronously by the plot.
#[derive(Debug, Clone, PartialEq)]
pub enum ScatterplotEvent {
    Render {
        reason: RenderReason,
        delta: TransformDelta,
    },
    WindowChanged {
        window: Window,
        scales: TransformedScales,
    },
    SelectionChanged {
        selection: Vec<RecordId>,
    },
    SelectionInProgress {
        selection: Vec<RecordId>,
    },
    /// Pointer position in surface pixels.
    MouseMoved {
        position: Point,
    },
    MouseClicked {
        position: Point,
    },
    Dragged {
        position: Point,
    },
    ZoomChanged {
        transform: ZoomTransform,
    },
}

impl ScatterplotEvent {
    #[must_use]
    pub fn kind(&self) -> ScatterplotEventKind {
        match self {
            Self::Render { .. } => ScatterplotEventKind::Render,
            Self::WindowChanged { .. } => ScatterplotEventKind::WindowChanged,
            Self::SelectionChanged { .. } => ScatterplotEventKind::SelectionChanged,
            Self::SelectionInProgress { .. } => ScatterplotEventKind::SelectionInProgress,
            Self::MouseMoved { .. } => ScatterplotEventKind::MouseMoved,
            Self::MouseClicked { .. } => ScatterplotEventKind::MouseClicked,
            Self::Dragged { .. } => ScatterplotEventKind::Dragged,
            Self::ZoomChanged { .. } => ScatterplotEventKind::ZoomChanged,
        }
    }
}

/// Subscription handle returned by `EventEmitter::on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ScatterplotEvent)>;

/// Listener registry keyed by event kind, invoked in subscription order.
#[derive(Default)]
pub struct EventEmitter {
    next_id: u64,
    listeners: Vec<(ListenerId, ScatterplotEventKind, Listener)>,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventEmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, kind: ScatterplotEventKind, listener: F) -> ListenerId
    where
        F: FnMut(&ScatterplotEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        id
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _, _)| *listener_id != id);
        before != self.listeners.len()
    }

    #[must_use]
    pub fn has_listeners(&self, kind: ScatterplotEventKind) -> bool {
        self.listeners.iter().any(|(_, listener_kind, _)| *listener_kind == kind)
    }

    pub fn emit(&mut self, event: &ScatterplotEvent) {
        let kind = event.kind();
        trace!(?kind, "emit event");
        for (_, listener_kind, listener) in &mut self.listeners {
            if *listener_kind == kind {
                listener(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{EventEmitter, ScatterplotEvent, ScatterplotEventKind};
    use crate::core::Point;

    #[test]
    fn listeners_only_receive_their_kind() {
        let mut emitter = EventEmitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        emitter.on(ScatterplotEventKind::MouseMoved, move |event| {
            sink.borrow_mut().push(event.clone());
        });

        emitter.emit(&ScatterplotEvent::MouseClicked {
            position: Point::new(1.0, 1.0),
        });
        emitter.emit(&ScatterplotEvent::MouseMoved {
            position: Point::new(2.0, 3.0),
        });

        assert_eq!(
            seen.borrow().as_slice(),
            &[ScatterplotEvent::MouseMoved {
                position: Point::new(2.0, 3.0)
            }]
        );
    }

    #[test]
    fn off_unsubscribes() {
        let mut emitter = EventEmitter::new();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = emitter.on(ScatterplotEventKind::Dragged, move |_| *sink.borrow_mut() += 1);
        let event = ScatterplotEvent::Dragged {
            position: Point::default(),
        };
        emitter.emit(&event);
        assert!(emitter.off(id));
        assert!(!emitter.off(id));
        emitter.emit(&event);
        assert_eq!(*count.borrow(), 1);
        assert!(!emitter.has_listeners(ScatterplotEventKind::Dragged));
    }
}

//! Change notifications delivered to host collaborators.

use crate::scene::LayerInfo;
use crate::shapes::ShapeId;

/// Something observable changed inside the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Active object ids, in selection order.
    SelectionChanged(Vec<ShapeId>),
    /// Layer list, top layer first.
    ObjectsChanged(Vec<LayerInfo>),
    HistoryChanged { can_undo: bool, can_redo: bool },
    ZoomChanged(f64),
    /// A collaborator failed to acquire an image or font.
    AcquisitionFailed(String),
}

/// Receives editor events synchronously.
pub trait EditorObserver {
    fn notify(&mut self, event: &EditorEvent);
}

impl<F> EditorObserver for F
where
    F: FnMut(&EditorEvent),
{
    fn notify(&mut self, event: &EditorEvent) {
        self(event)
    }
}

/// Registered observers.
#[derive(Default)]
pub(crate) struct Observers {
    observers: Vec<Box<dyn EditorObserver>>,
}

impl Observers {
    pub(crate) fn push(&mut self, observer: Box<dyn EditorObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn emit(&mut self, event: EditorEvent) {
        log::trace!("editor event: {event:?}");
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_closure_observer_receives_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut observers = Observers::default();
        observers.push(Box::new(move |event: &EditorEvent| {
            sink.borrow_mut().push(event.clone());
        }));
        assert_eq!(observers.observers.len(), 1);

        observers.emit(EditorEvent::ZoomChanged(2.0));
        assert_eq!(seen.borrow().as_slice(), &[EditorEvent::ZoomChanged(2.0)]);
    }
}

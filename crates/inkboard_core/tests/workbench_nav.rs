use inkboard_core::{
    DocId, GestureConfig, GestureDisambiguator, OpenDocumentHandler, Point, ViewState, Workbench,
};
use std::time::{Duration, Instant};

fn doc(id: &str) -> DocId {
    DocId::parse(id).expect("test doc id parses")
}

#[test]
fn workbench_starts_on_the_canvas() {
    let workbench = Workbench::new();
    assert_eq!(workbench.active_view(), ViewState::Canvas);
    assert!(workbench.active_document().is_none());
}

#[test]
fn opening_a_document_switches_to_the_editor() {
    let mut workbench = Workbench::new();

    let previous = workbench.open_document(doc("journal"));
    assert_eq!(previous, ViewState::Canvas);
    assert_eq!(
        workbench.active_view(),
        ViewState::Editor {
            doc_id: doc("journal")
        }
    );
    assert_eq!(workbench.active_document(), Some(&doc("journal")));
}

#[test]
fn closing_the_editor_returns_the_closed_document() {
    let mut workbench = Workbench::new();
    workbench.open_document(doc("journal"));

    let closed = workbench.close_editor();
    assert_eq!(closed, Some(doc("journal")));
    assert_eq!(workbench.active_view(), ViewState::Canvas);

    // Closing on the canvas is a silent no-op.
    assert_eq!(workbench.close_editor(), None);
}

#[test]
fn opening_over_an_open_editor_replaces_the_document() {
    let mut workbench = Workbench::new();
    workbench.open_document(doc("first"));

    let previous = workbench.open_document(doc("second"));
    assert_eq!(
        previous,
        ViewState::Editor {
            doc_id: doc("first")
        }
    );
    assert_eq!(workbench.active_document(), Some(&doc("second")));
}

#[test]
fn gesture_activations_route_through_the_injected_handler() {
    // The gesture owner only sees the typed capability, not the workbench.
    fn route_activation(handler: &mut dyn OpenDocumentHandler, id: DocId) {
        handler.handle_open(id);
    }

    let mut workbench = Workbench::new();
    let mut gesture = GestureDisambiguator::new(GestureConfig::default());
    let t0 = Instant::now();

    gesture.on_press(doc("pressed"), Point::new(10.0, 10.0), t0);
    let activation = gesture
        .poll(t0 + Duration::from_millis(500))
        .expect("hold activates");

    route_activation(&mut workbench, activation.target);
    assert_eq!(
        workbench.active_view(),
        ViewState::Editor {
            doc_id: doc("pressed")
        }
    );
}

use inkboard_core::{
    CanvasRepository, CanvasService, CanvasSink, CanvasSnapshot, CanvasSnapshotSource,
    DebouncePolicy, DocId, DocumentDraftSource, DocumentService, DocumentSink, FlushOutcome,
    KvCanvasRepository, KvDocumentRepository, KvStore, RepoError, RepoResult,
};
use serde_json::json;
use std::cell::RefCell;
use std::time::{Duration, Instant};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Board stand-in whose snapshot is pulled at flush time, like the real
/// canvas engine's on-demand snapshot call.
struct LiveBoard {
    state: RefCell<serde_json::Value>,
}

impl LiveBoard {
    fn new() -> Self {
        Self {
            state: RefCell::new(json!({"objects": []})),
        }
    }

    fn mutate(&self, value: serde_json::Value) {
        *self.state.borrow_mut() = value;
    }
}

impl CanvasSnapshotSource for LiveBoard {
    fn current_snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot::new(self.state.borrow().clone())
    }
}

struct Draft {
    title: String,
    content: String,
}

impl DocumentDraftSource for Draft {
    fn current_title(&self) -> String {
        self.title.clone()
    }

    fn current_content(&self) -> String {
        self.content.clone()
    }
}

/// Repository that rejects every write, for failure-path coverage.
struct FailingCanvasRepo;

impl CanvasRepository for FailingCanvasRepo {
    fn load_snapshot(&mut self) -> RepoResult<Option<CanvasSnapshot>> {
        Ok(None)
    }

    fn save_snapshot(&mut self, _snapshot: &CanvasSnapshot) -> RepoResult<()> {
        Err(RepoError::InvalidData("write refused".to_string()))
    }
}

#[test]
fn burst_of_mutations_yields_exactly_one_flush_with_final_state() {
    let mut store = KvStore::in_memory();
    let mut service = CanvasService::new(KvCanvasRepository::new(&mut store));
    let board = LiveBoard::new();
    let mut sink = CanvasSink::new(DebouncePolicy::default());
    let t0 = Instant::now();

    board.mutate(json!({"objects": ["a"]}));
    sink.notify_changed(t0);
    board.mutate(json!({"objects": ["a", "b"]}));
    sink.notify_changed(t0 + ms(50));
    board.mutate(json!({"objects": ["a", "b", "c"]}));
    sink.notify_changed(t0 + ms(150));

    // Quiet period counts from the LAST mutation: t0+150 + 200 = t0+350.
    assert_eq!(
        sink.flush_due(t0 + ms(200), &board, &mut service),
        FlushOutcome::NotDue
    );
    assert_eq!(
        sink.flush_due(t0 + ms(349), &board, &mut service),
        FlushOutcome::NotDue
    );
    assert_eq!(
        sink.flush_due(t0 + ms(350), &board, &mut service),
        FlushOutcome::Flushed
    );

    // One flush per burst, carrying the final state.
    assert_eq!(
        sink.flush_due(t0 + ms(400), &board, &mut service),
        FlushOutcome::NotDue
    );
    assert_eq!(
        service.load_canvas().as_value(),
        &json!({"objects": ["a", "b", "c"]})
    );
}

#[test]
fn snapshot_is_captured_at_flush_time_not_at_schedule_time() {
    let mut store = KvStore::in_memory();
    let mut service = CanvasService::new(KvCanvasRepository::new(&mut store));
    let board = LiveBoard::new();
    let mut sink = CanvasSink::new(DebouncePolicy::default());
    let t0 = Instant::now();

    board.mutate(json!({"objects": ["scheduled"]}));
    sink.notify_changed(t0);
    // The board moved on after the notification; the write must see this.
    board.mutate(json!({"objects": ["current"]}));

    assert_eq!(
        sink.flush_due(t0 + ms(200), &board, &mut service),
        FlushOutcome::Flushed
    );
    assert_eq!(
        service.load_canvas().as_value(),
        &json!({"objects": ["current"]})
    );
}

#[test]
fn a_new_notification_rearms_after_a_flush() {
    let mut store = KvStore::in_memory();
    let mut service = CanvasService::new(KvCanvasRepository::new(&mut store));
    let board = LiveBoard::new();
    let mut sink = CanvasSink::new(DebouncePolicy::default());
    let t0 = Instant::now();

    sink.notify_changed(t0);
    assert_eq!(
        sink.flush_due(t0 + ms(200), &board, &mut service),
        FlushOutcome::Flushed
    );
    assert!(!sink.is_pending());

    board.mutate(json!({"objects": ["later"]}));
    sink.notify_changed(t0 + ms(300));
    assert!(sink.is_pending());
    assert_eq!(
        sink.flush_due(t0 + ms(500), &board, &mut service),
        FlushOutcome::Flushed
    );
}

#[test]
fn idle_sink_never_flushes() {
    let mut store = KvStore::in_memory();
    let mut service = CanvasService::new(KvCanvasRepository::new(&mut store));
    let board = LiveBoard::new();
    let mut sink = CanvasSink::new(DebouncePolicy::default());

    assert_eq!(
        sink.flush_due(Instant::now(), &board, &mut service),
        FlushOutcome::NotDue
    );
}

#[test]
fn failed_flush_is_reported_and_the_next_cycle_tries_again() {
    let board = LiveBoard::new();
    let mut sink = CanvasSink::new(DebouncePolicy::default());
    let t0 = Instant::now();

    let mut failing = CanvasService::new(FailingCanvasRepo);
    sink.notify_changed(t0);
    assert_eq!(
        sink.flush_due(t0 + ms(200), &board, &mut failing),
        FlushOutcome::Failed
    );
    // The failure consumed the deadline; no stale timer keeps re-firing.
    assert!(!sink.is_pending());

    // The next mutation's debounce cycle is the retry.
    let mut store = KvStore::in_memory();
    let mut service = CanvasService::new(KvCanvasRepository::new(&mut store));
    board.mutate(json!({"objects": ["recovered"]}));
    sink.notify_changed(t0 + ms(300));
    assert_eq!(
        sink.flush_due(t0 + ms(500), &board, &mut service),
        FlushOutcome::Flushed
    );
    assert_eq!(
        service.load_canvas().as_value(),
        &json!({"objects": ["recovered"]})
    );
}

#[test]
fn flush_now_writes_immediately_and_cancels_the_pending_deadline() {
    let mut store = KvStore::in_memory();
    let mut service = CanvasService::new(KvCanvasRepository::new(&mut store));
    let board = LiveBoard::new();
    let mut sink = CanvasSink::new(DebouncePolicy::default());
    let t0 = Instant::now();

    board.mutate(json!({"objects": ["leaving"]}));
    sink.notify_changed(t0);
    assert_eq!(sink.flush_now(&board, &mut service), FlushOutcome::Flushed);

    // The cancelled deadline must not produce a second write later.
    assert_eq!(
        sink.flush_due(t0 + ms(500), &board, &mut service),
        FlushOutcome::NotDue
    );
}

#[test]
fn document_sink_round_trips_title_and_content() {
    let mut store = KvStore::in_memory();
    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));
    let id = DocId::parse("travel-journal").expect("test id parses");
    let mut sink = DocumentSink::new(id.clone(), DebouncePolicy::default());
    let t0 = Instant::now();

    let draft = Draft {
        title: "Travel journal".to_string(),
        content: "<p>Day one: rain.</p>".to_string(),
    };
    sink.notify_changed(t0);
    assert_eq!(
        sink.flush_due(t0 + ms(199), &draft, &mut service),
        FlushOutcome::NotDue
    );
    assert_eq!(
        sink.flush_due(t0 + ms(200), &draft, &mut service),
        FlushOutcome::Flushed
    );

    let record = service.open_document(&id);
    assert_eq!(record.title, "Travel journal");
    assert_eq!(record.content, "<p>Day one: rain.</p>");
    assert_eq!(record.preview_text.as_deref(), Some("Day one: rain."));
}

#[test]
fn document_sink_reports_invalid_titles_as_failed_flushes() {
    let mut store = KvStore::in_memory();
    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));
    let id = DocId::parse("untitled").expect("test id parses");
    let mut sink = DocumentSink::new(id.clone(), DebouncePolicy::default());

    let draft = Draft {
        title: "   ".to_string(),
        content: "<p>orphan</p>".to_string(),
    };
    assert_eq!(sink.flush_now(&draft, &mut service), FlushOutcome::Failed);

    // Nothing was persisted for the id.
    let mut repo = KvDocumentRepository::new(&mut store);
    use inkboard_core::DocumentRepository;
    assert!(repo.load(&id).expect("load succeeds").is_none());
}

#[test]
fn sinks_on_different_surfaces_are_independent() {
    let mut store = KvStore::in_memory();
    let board = LiveBoard::new();
    let mut canvas_sink = CanvasSink::new(DebouncePolicy::default());
    let id = DocId::parse("side-doc").expect("test id parses");
    let mut doc_sink = DocumentSink::new(id.clone(), DebouncePolicy::default());
    let t0 = Instant::now();

    canvas_sink.notify_changed(t0);
    doc_sink.notify_changed(t0 + ms(100));

    board.mutate(json!({"objects": ["solo"]}));
    {
        let mut canvas_service = CanvasService::new(KvCanvasRepository::new(&mut store));
        assert_eq!(
            canvas_sink.flush_due(t0 + ms(200), &board, &mut canvas_service),
            FlushOutcome::Flushed
        );
    }

    // The canvas flush did not consume the document deadline.
    let draft = Draft {
        title: "Side doc".to_string(),
        content: "<p>still pending</p>".to_string(),
    };
    let mut doc_service = DocumentService::new(KvDocumentRepository::new(&mut store));
    assert_eq!(
        doc_sink.flush_due(t0 + ms(200), &draft, &mut doc_service),
        FlushOutcome::NotDue
    );
    assert_eq!(
        doc_sink.flush_due(t0 + ms(300), &draft, &mut doc_service),
        FlushOutcome::Flushed
    );
}

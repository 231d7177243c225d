//! FFI use-case API for host-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to the UI host via FRB.
//! - Keep error semantics simple envelopes for UI integration.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The store is opened per call; session state (workbench, gesture
//!   machine, autosave sinks) lives in one process-level bridge struct.

use inkboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    search_documents, CanvasService, CanvasSink, CanvasSnapshot, CanvasSnapshotSource,
    DebouncePolicy, DocId, DocumentDraftSource, DocumentService, DocumentSink, FlushOutcome,
    GestureConfig, GestureDisambiguator, KvCanvasRepository, KvDocumentRepository, KvStore, Point,
    SearchQuery, ViewState, Workbench,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

const STORE_FILE_NAME: &str = "inkboard_data.json";
static STORE_PATH: OnceLock<PathBuf> = OnceLock::new();
static HOST_SESSION: OnceLock<Mutex<HostSession>> = OnceLock::new();

/// Per-process bridge state shared by the host surfaces.
struct HostSession {
    workbench: Workbench,
    gesture: GestureDisambiguator,
    canvas_sink: CanvasSink,
    document_sink: Option<DocumentSink>,
}

impl HostSession {
    fn new() -> Self {
        Self {
            workbench: Workbench::new(),
            gesture: GestureDisambiguator::new(GestureConfig::default()),
            canvas_sink: CanvasSink::new(DebouncePolicy::default()),
            document_sink: None,
        }
    }
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for host command flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl HostActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Flush response envelope for autosave endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResponse {
    /// Whether the call itself succeeded (a not-due tick is a success).
    pub ok: bool,
    /// Whether a durable write happened during this call.
    pub flushed: bool,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Canvas state envelope returned on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasStateResponse {
    pub ok: bool,
    /// Serialized whiteboard snapshot; `{}` for a fresh board.
    pub snapshot_json: String,
    pub message: String,
}

/// Document envelope returned on open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentResponse {
    pub ok: bool,
    pub doc_id: String,
    pub title: String,
    /// Serialized rich-text markup for the editor host.
    pub content: String,
    pub message: String,
}

/// Activation envelope returned by the pointer feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationResponse {
    /// Whether an activation fired during this call.
    pub activated: bool,
    /// Target document when `activated` is true.
    pub doc_id: Option<String>,
    /// Host should give best-effort tactile feedback when true.
    pub haptic: bool,
}

impl ActivationResponse {
    fn none() -> Self {
        Self {
            activated: false,
            doc_id: None,
            haptic: false,
        }
    }
}

/// Current view envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewResponse {
    /// `canvas` or `editor`.
    pub view: String,
    /// Open document when the editor view is active.
    pub doc_id: Option<String>,
}

/// Search item returned by document search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSearchItem {
    pub doc_id: String,
    pub title: String,
    pub snippet: String,
}

/// Search response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSearchResponse {
    pub items: Vec<DocSearchItem>,
    pub message: String,
    pub applied_limit: u32,
}

/// Loads the whiteboard snapshot for the canvas host.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics; an unreadable store yields an empty board plus a
///   diagnostic message, keeping the canvas usable.
#[flutter_rust_bridge::frb(sync)]
pub fn canvas_load() -> CanvasStateResponse {
    let mut store = match open_store() {
        Ok(store) => store,
        Err(err) => {
            return CanvasStateResponse {
                ok: false,
                snapshot_json: "{}".to_string(),
                message: format!("canvas_load failed: {err}"),
            };
        }
    };

    let mut service = CanvasService::new(KvCanvasRepository::new(&mut store));
    let snapshot = service.load_canvas();
    CanvasStateResponse {
        ok: true,
        snapshot_json: snapshot.as_value().to_string(),
        message: String::new(),
    }
}

/// Records one canvas mutation for debounced autosave.
///
/// # FFI contract
/// - Sync call, non-blocking; never reads or copies board state.
#[flutter_rust_bridge::frb(sync)]
pub fn canvas_changed() {
    let mut session = lock_session();
    session.canvas_sink.notify_changed(Instant::now());
}

/// Flushes the canvas when its quiet period has elapsed.
///
/// The host calls this on its regular tick, passing the current snapshot;
/// the snapshot is only persisted when a flush is actually due.
///
/// # FFI contract
/// - Sync call, store-backed execution when due.
/// - Never panics; write failures are reported, not retried.
#[flutter_rust_bridge::frb(sync)]
pub fn canvas_flush_due(snapshot_json: String) -> SaveResponse {
    flush_canvas(&snapshot_json, false)
}

/// Flushes the canvas immediately, e.g. before the window closes.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics; write failures are reported, not retried.
#[flutter_rust_bridge::frb(sync)]
pub fn canvas_flush_now(snapshot_json: String) -> SaveResponse {
    flush_canvas(&snapshot_json, true)
}

/// Opens a document and switches the workbench to the editor view.
///
/// Never-written ids come back as the placeholder document; the editor
/// always has something to show.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn document_open(doc_id: String) -> DocumentResponse {
    let id = match DocId::parse(&doc_id) {
        Ok(id) => id,
        Err(err) => {
            return DocumentResponse {
                ok: false,
                doc_id,
                title: String::new(),
                content: String::new(),
                message: format!("document_open failed: {err}"),
            };
        }
    };

    let mut store = match open_store() {
        Ok(store) => store,
        Err(err) => {
            return DocumentResponse {
                ok: false,
                doc_id: id.to_string(),
                title: String::new(),
                content: String::new(),
                message: format!("document_open failed: {err}"),
            };
        }
    };

    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));
    let record = service.open_document(&id);

    let mut session = lock_session();
    session.workbench.open_document(id.clone());
    session.document_sink = Some(DocumentSink::new(id, DebouncePolicy::default()));

    DocumentResponse {
        ok: true,
        doc_id: record.id.to_string(),
        title: record.title,
        content: record.content,
        message: String::new(),
    }
}

/// Records one edit of the open document for debounced autosave.
///
/// # FFI contract
/// - Sync call, non-blocking; never reads or copies the draft.
#[flutter_rust_bridge::frb(sync)]
pub fn document_changed() {
    let mut session = lock_session();
    if let Some(sink) = session.document_sink.as_mut() {
        sink.notify_changed(Instant::now());
    }
}

/// Flushes the open document when its quiet period has elapsed.
///
/// # FFI contract
/// - Sync call, store-backed execution when due.
/// - Never panics; write failures are reported, not retried.
#[flutter_rust_bridge::frb(sync)]
pub fn document_flush_due(title: String, content: String) -> SaveResponse {
    flush_document(title, content, false)
}

/// Flushes the open document immediately and returns to the canvas view.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics; the view switches back even when the final write fails.
#[flutter_rust_bridge::frb(sync)]
pub fn document_close(title: String, content: String) -> SaveResponse {
    let response = flush_document(title, content, true);
    let mut session = lock_session();
    session.workbench.close_editor();
    session.document_sink = None;
    response
}

/// Renames a persisted document.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics; unknown ids and empty titles are reported as failures.
#[flutter_rust_bridge::frb(sync)]
pub fn document_rename(doc_id: String, title: String) -> HostActionResponse {
    let id = match DocId::parse(&doc_id) {
        Ok(id) => id,
        Err(err) => return HostActionResponse::failure(format!("document_rename failed: {err}")),
    };
    let mut store = match open_store() {
        Ok(store) => store,
        Err(err) => return HostActionResponse::failure(format!("document_rename failed: {err}")),
    };

    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));
    match service.rename_document(&id, &title) {
        Ok(()) => HostActionResponse::success("Document renamed."),
        Err(err) => HostActionResponse::failure(format!("document_rename failed: {err}")),
    }
}

/// Deletes a document and all its stored fields.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics; deleting an absent id succeeds (idempotent).
#[flutter_rust_bridge::frb(sync)]
pub fn document_delete(doc_id: String) -> HostActionResponse {
    let id = match DocId::parse(&doc_id) {
        Ok(id) => id,
        Err(err) => return HostActionResponse::failure(format!("document_delete failed: {err}")),
    };
    let mut store = match open_store() {
        Ok(store) => store,
        Err(err) => return HostActionResponse::failure(format!("document_delete failed: {err}")),
    };

    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));
    match service.delete_document(&id) {
        Ok(()) => HostActionResponse::success("Document deleted."),
        Err(err) => HostActionResponse::failure(format!("document_delete failed: {err}")),
    }
}

/// Feeds a pointer-down on a document button into the gesture machine.
///
/// The host must not suppress its native select/drag handling; this call
/// only observes the event.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; an invalid id is reported and ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn button_pointer_down(doc_id: String, x: f64, y: f64) -> HostActionResponse {
    let id = match DocId::parse(&doc_id) {
        Ok(id) => id,
        Err(err) => {
            return HostActionResponse::failure(format!("button_pointer_down failed: {err}"))
        }
    };
    let mut session = lock_session();
    session.gesture.on_press(id, Point::new(x, y), Instant::now());
    HostActionResponse::success("")
}

/// Feeds a pointer-move while a button press is being tracked.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - May emit an activation under the eager threshold policy.
#[flutter_rust_bridge::frb(sync)]
pub fn button_pointer_move(x: f64, y: f64) -> ActivationResponse {
    let mut session = lock_session();
    match session.gesture.on_move(Point::new(x, y)) {
        Some(activation) => ActivationResponse {
            activated: true,
            doc_id: Some(activation.target.to_string()),
            haptic: activation.haptic,
        },
        None => ActivationResponse::none(),
    }
}

/// Ends button press tracking on pointer release.
///
/// # FFI contract
/// - Sync call, non-blocking; safe without a tracked press.
#[flutter_rust_bridge::frb(sync)]
pub fn button_pointer_up() {
    lock_session().gesture.on_release();
}

/// Ends button press tracking when the pointer leaves the button.
///
/// # FFI contract
/// - Sync call, non-blocking; safe without a tracked press.
#[flutter_rust_bridge::frb(sync)]
pub fn button_pointer_leave() {
    lock_session().gesture.on_leave();
}

/// Polls for a due hold-to-activate on the host tick.
///
/// After an activation the host switches surfaces via `document_open`.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Emits each activation at most once.
#[flutter_rust_bridge::frb(sync)]
pub fn gesture_poll() -> ActivationResponse {
    let mut session = lock_session();
    match session.gesture.poll(Instant::now()) {
        Some(activation) => ActivationResponse {
            activated: true,
            doc_id: Some(activation.target.to_string()),
            haptic: activation.haptic,
        },
        None => ActivationResponse::none(),
    }
}

/// Returns the active view and open document.
///
/// # FFI contract
/// - Sync call, non-blocking.
#[flutter_rust_bridge::frb(sync)]
pub fn current_view() -> ViewResponse {
    let session = lock_session();
    match session.workbench.active_view() {
        ViewState::Canvas => ViewResponse {
            view: "canvas".to_string(),
            doc_id: None,
        },
        ViewState::Editor { doc_id } => ViewResponse {
            view: "editor".to_string(),
            doc_id: Some(doc_id.to_string()),
        },
    }
}

/// Searches persisted documents by title and preview text.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics; returns a deterministic envelope with the applied limit.
#[flutter_rust_bridge::frb(sync)]
pub fn docs_search(text: String, limit: Option<u32>) -> DocSearchResponse {
    let query = SearchQuery { text, limit };
    let applied_limit = inkboard_core::search::normalize_search_limit(limit);

    let mut store = match open_store() {
        Ok(store) => store,
        Err(err) => {
            return DocSearchResponse {
                items: Vec::new(),
                message: format!("docs_search failed: {err}"),
                applied_limit,
            };
        }
    };

    let mut repo = KvDocumentRepository::new(&mut store);
    match search_documents(&mut repo, &query) {
        Ok(result) => {
            let items: Vec<DocSearchItem> = result
                .hits
                .into_iter()
                .map(|hit| DocSearchItem {
                    doc_id: hit.doc_id.to_string(),
                    title: hit.title,
                    snippet: hit.snippet,
                })
                .collect();
            let message = if items.is_empty() {
                "No results.".to_string()
            } else {
                format!("Found {} result(s).", items.len())
            };
            DocSearchResponse {
                items,
                message,
                applied_limit: result.applied_limit,
            }
        }
        Err(err) => DocSearchResponse {
            items: Vec::new(),
            message: format!("docs_search failed: {err}"),
            applied_limit,
        },
    }
}

struct SnapshotPayload(CanvasSnapshot);

impl CanvasSnapshotSource for SnapshotPayload {
    fn current_snapshot(&self) -> CanvasSnapshot {
        self.0.clone()
    }
}

struct DraftPayload {
    title: String,
    content: String,
}

impl DocumentDraftSource for DraftPayload {
    fn current_title(&self) -> String {
        self.title.clone()
    }

    fn current_content(&self) -> String {
        self.content.clone()
    }
}

fn flush_canvas(snapshot_json: &str, immediate: bool) -> SaveResponse {
    let snapshot: serde_json::Value = match serde_json::from_str(snapshot_json) {
        Ok(value) => value,
        Err(err) => {
            return SaveResponse {
                ok: false,
                flushed: false,
                message: format!("canvas flush failed: unreadable snapshot: {err}"),
            };
        }
    };
    let payload = SnapshotPayload(CanvasSnapshot::new(snapshot));

    let mut store = match open_store() {
        Ok(store) => store,
        Err(err) => {
            return SaveResponse {
                ok: false,
                flushed: false,
                message: format!("canvas flush failed: {err}"),
            };
        }
    };
    let mut service = CanvasService::new(KvCanvasRepository::new(&mut store));

    let mut session = lock_session();
    let outcome = if immediate {
        session.canvas_sink.flush_now(&payload, &mut service)
    } else {
        session
            .canvas_sink
            .flush_due(Instant::now(), &payload, &mut service)
    };
    save_response(outcome, "canvas")
}

fn flush_document(title: String, content: String, immediate: bool) -> SaveResponse {
    let payload = DraftPayload { title, content };

    let mut store = match open_store() {
        Ok(store) => store,
        Err(err) => {
            return SaveResponse {
                ok: false,
                flushed: false,
                message: format!("document flush failed: {err}"),
            };
        }
    };
    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));

    let mut session = lock_session();
    let Some(sink) = session.document_sink.as_mut() else {
        return SaveResponse {
            ok: false,
            flushed: false,
            message: "document flush failed: no open document".to_string(),
        };
    };

    let outcome = if immediate {
        sink.flush_now(&payload, &mut service)
    } else {
        sink.flush_due(Instant::now(), &payload, &mut service)
    };
    save_response(outcome, "document")
}

fn save_response(outcome: FlushOutcome, surface: &str) -> SaveResponse {
    match outcome {
        FlushOutcome::Flushed => SaveResponse {
            ok: true,
            flushed: true,
            message: String::new(),
        },
        FlushOutcome::NotDue => SaveResponse {
            ok: true,
            flushed: false,
            message: String::new(),
        },
        FlushOutcome::Failed => SaveResponse {
            ok: false,
            flushed: false,
            message: format!("{surface} flush failed; see log for details"),
        },
    }
}

fn open_store() -> Result<KvStore, String> {
    KvStore::open(resolve_store_path()).map_err(|err| format!("store open failed: {err}"))
}

fn resolve_store_path() -> PathBuf {
    STORE_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("INKBOARD_STORE_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_FILE_NAME)
        })
        .clone()
}

fn lock_session() -> std::sync::MutexGuard<'static, HostSession> {
    HOST_SESSION
        .get_or_init(|| Mutex::new(HostSession::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

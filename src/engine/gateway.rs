//! Request/response orchestration against the external engines.

use super::response::{parse_export_result, parse_transcript, ExportResult};
use super::runner::EngineRunner;
use crate::error::{Error, Result};
use crate::segments::Segment;
use log::{debug, warn};
use serde::Serialize;
use std::sync::Mutex;
use uuid::Uuid;

/// The two independent job kinds the gateway dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Transcribe,
    Generate,
}

/// Lifecycle of the most recent job of a kind. A terminal phase is handed
/// out once by `phase()` and the machine returns to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    Idle,
    Requested,
    Succeeded,
    Failed,
}

/// Timestamp range sent to the generation engine, in seconds.
#[derive(Debug, Clone, Serialize)]
struct ClipRange {
    start: f64,
    end: f64,
}

impl From<&Segment> for ClipRange {
    fn from(seg: &Segment) -> Self {
        Self {
            start: seg.start,
            end: seg.end,
        }
    }
}

/// Issues single-shot requests to the transcription and generation engines.
///
/// Each call is self-contained and carries all required input; the engines
/// are stateless from this side. Nothing is retried automatically and there
/// is no mid-flight cancellation. Dispatching the same media path to the
/// same kind twice concurrently is the caller's mistake to avoid.
pub struct JobGateway {
    transcriber: Box<dyn EngineRunner>,
    generator: Box<dyn EngineRunner>,
    transcribe_phase: Mutex<JobPhase>,
    generate_phase: Mutex<JobPhase>,
}

impl JobGateway {
    pub fn new(transcriber: Box<dyn EngineRunner>, generator: Box<dyn EngineRunner>) -> Self {
        Self {
            transcriber,
            generator,
            transcribe_phase: Mutex::new(JobPhase::Idle),
            generate_phase: Mutex::new(JobPhase::Idle),
        }
    }

    fn phase_slot(&self, kind: JobKind) -> &Mutex<JobPhase> {
        match kind {
            JobKind::Transcribe => &self.transcribe_phase,
            JobKind::Generate => &self.generate_phase,
        }
    }

    /// Observe the current phase. Terminal phases are consumed: the first
    /// observation returns them, subsequent ones see `Idle` again.
    pub fn phase(&self, kind: JobKind) -> JobPhase {
        let mut slot = self.phase_slot(kind).lock().unwrap();
        let current = *slot;
        if matches!(current, JobPhase::Succeeded | JobPhase::Failed) {
            *slot = JobPhase::Idle;
        }
        current
    }

    fn begin(&self, kind: JobKind) {
        let mut slot = self.phase_slot(kind).lock().unwrap();
        if *slot == JobPhase::Requested {
            warn!("[jobs] {:?} dispatched while a previous request is in flight", kind);
        }
        *slot = JobPhase::Requested;
    }

    fn finish(&self, kind: JobKind, ok: bool) {
        *self.phase_slot(kind).lock().unwrap() = if ok {
            JobPhase::Succeeded
        } else {
            JobPhase::Failed
        };
    }

    /// Ask the transcription engine for the segments of `media_path`.
    ///
    /// The path is handed to the engine as-is; existence checks are the
    /// engine's job. On failure the caller's segment state is untouched,
    /// since nothing here writes to it.
    pub fn transcribe(&self, media_path: &str) -> Result<Vec<Segment>> {
        let request_id = Uuid::new_v4();
        debug!("[transcribe] {} dispatch for {}", request_id, media_path);
        self.begin(JobKind::Transcribe);
        let result = self
            .transcriber
            .run(&["transcribe-audio".to_string(), media_path.to_string()])
            .and_then(|out| parse_transcript(&out.stdout));
        match &result {
            Ok(segments) => {
                debug!("[transcribe] {} done: {} segments", request_id, segments.len());
            }
            Err(e) => warn!("[transcribe] {} failed: {}", request_id, e),
        }
        self.finish(JobKind::Transcribe, result.is_ok());
        result
    }

    /// Ask the generation engine to render the selected ranges of
    /// `media_path`.
    ///
    /// `selection` is whatever the caller read from the store at call time;
    /// edits made after that read are not reflected (last-read-wins). An
    /// empty selection is rejected before any external request goes out.
    pub fn generate(&self, media_path: &str, selection: &[Segment]) -> Result<ExportResult> {
        if selection.is_empty() {
            return Err(Error::EmptySelection);
        }
        let ranges: Vec<ClipRange> = selection.iter().map(ClipRange::from).collect();
        let ranges_json = serde_json::to_string(&ranges)
            .map_err(|e| Error::EngineError(format!("failed to encode ranges: {}", e)))?;
        let request_id = Uuid::new_v4();
        debug!(
            "[generate] {} dispatch for {} with {} ranges",
            request_id,
            media_path,
            ranges.len()
        );
        self.begin(JobKind::Generate);
        let result = self
            .generator
            .run(&[
                "generate-video".to_string(),
                media_path.to_string(),
                ranges_json,
            ])
            .and_then(|out| parse_export_result(&out.stdout));
        match &result {
            Ok(r) => debug!("[generate] {} done: {}", request_id, r.output_path),
            Err(e) => warn!("[generate] {} failed: {}", request_id, e),
        }
        self.finish(JobKind::Generate, result.is_ok());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::runner::EngineOutput;
    use crate::segments::{seg, SegmentStore};
    use std::sync::Arc;

    /// Scripted engine: returns a canned response and records every call.
    struct StubRunner {
        response: std::result::Result<String, Error>,
        calls: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl StubRunner {
        fn ok(stdout: &str) -> (Box<Self>, Arc<Mutex<Vec<Vec<String>>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Box::new(Self {
                    response: Ok(stdout.to_string()),
                    calls: calls.clone(),
                }),
                calls,
            )
        }

        fn err(e: Error) -> Box<Self> {
            Box::new(Self {
                response: Err(e),
                calls: Arc::new(Mutex::new(Vec::new())),
            })
        }
    }

    impl EngineRunner for StubRunner {
        fn run(&self, args: &[String]) -> Result<EngineOutput> {
            self.calls.lock().unwrap().push(args.to_vec());
            match &self.response {
                Ok(stdout) => Ok(EngineOutput {
                    stdout: stdout.clone(),
                    stderr: String::new(),
                }),
                Err(Error::EngineUnavailable(m)) => Err(Error::EngineUnavailable(m.clone())),
                Err(Error::EngineError(m)) => Err(Error::EngineError(m.clone())),
                Err(_) => unreachable!("stubs only script engine failures"),
            }
        }
    }

    fn unused() -> Box<StubRunner> {
        StubRunner::err(Error::EngineUnavailable("unused".into()))
    }

    #[test]
    fn transcribe_parses_engine_output() {
        let (runner, calls) =
            StubRunner::ok(r#"[{"id": 1, "text": "hi", "start": 0.0, "end": 1.0}]"#);
        let gateway = JobGateway::new(runner, unused());
        let segments = gateway.transcribe("/media/talk.mp4").unwrap();
        assert_eq!(segments.len(), 1);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec!["transcribe-audio", "/media/talk.mp4"]);
    }

    #[test]
    fn transcribe_malformed_output_fails_and_store_is_untouched() {
        let (runner, _) = StubRunner::ok(r#"[{"id": 1, "text": "hi", "end": 1.0}]"#);
        let gateway = JobGateway::new(runner, unused());
        let mut store = SegmentStore::new();
        let err = gateway.transcribe("/media/talk.mp4").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
        // A failed transcription never clears the existing collection.
        assert!(store.is_empty());
        store.load(vec![seg(1, "prior", 0.0, 1.0)]).unwrap();
        let err = gateway.transcribe("/media/talk.mp4").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn transcribe_duplicate_ids_fail_at_the_wire_not_the_store() {
        let (runner, _) = StubRunner::ok(
            r#"[
                {"id": 1, "text": "hello", "start": 0.0, "end": 2.0},
                {"id": 1, "text": "again", "start": 2.0, "end": 4.0}
            ]"#,
        );
        let gateway = JobGateway::new(runner, unused());
        let err = gateway.transcribe("/media/talk.mp4").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
        // The state machine records the malformed response as a failure.
        assert_eq!(gateway.phase(JobKind::Transcribe), JobPhase::Failed);
    }

    #[test]
    fn transcribe_engine_failure_propagates() {
        let gateway = JobGateway::new(
            StubRunner::err(Error::EngineError("exit code 1".into())),
            unused(),
        );
        let err = gateway.transcribe("/media/talk.mp4").unwrap_err();
        assert!(matches!(err, Error::EngineError(_)));
    }

    #[test]
    fn generate_sends_selected_ranges_in_order() {
        let (runner, calls) = StubRunner::ok(r#"{"output_path": "/out/cut.mp4"}"#);
        let gateway = JobGateway::new(unused(), runner);

        let mut store = SegmentStore::new();
        store
            .load(vec![seg(1, "hello world", 0.0, 2.0), seg(2, "goodbye", 2.0, 5.0)])
            .unwrap();
        store.set_checked(&crate::segments::SegmentId::Number(1), true).unwrap();

        let result = gateway
            .generate("/media/talk.mp4", &store.export_selection())
            .unwrap();
        assert_eq!(result.output_path, "/out/cut.mp4");

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0], "generate-video");
        assert_eq!(calls[0][1], "/media/talk.mp4");
        let ranges: serde_json::Value = serde_json::from_str(&calls[0][2]).unwrap();
        assert_eq!(ranges, serde_json::json!([{"start": 0.0, "end": 2.0}]));
    }

    #[test]
    fn generate_with_empty_selection_issues_no_request() {
        let (runner, calls) = StubRunner::ok(r#"{"output_path": "/out/cut.mp4"}"#);
        let gateway = JobGateway::new(unused(), runner);
        let err = gateway.generate("/media/talk.mp4", &[]).unwrap_err();
        assert!(matches!(err, Error::EmptySelection));
        assert!(calls.lock().unwrap().is_empty());
        // The state machine never left idle either.
        assert_eq!(gateway.phase(JobKind::Generate), JobPhase::Idle);
    }

    #[test]
    fn phases_run_idle_requested_terminal_idle() {
        let (runner, _) = StubRunner::ok("[]");
        let gateway = JobGateway::new(runner, unused());
        assert_eq!(gateway.phase(JobKind::Transcribe), JobPhase::Idle);
        gateway.transcribe("/media/talk.mp4").unwrap();
        // Terminal phase is consumed on first observation.
        assert_eq!(gateway.phase(JobKind::Transcribe), JobPhase::Succeeded);
        assert_eq!(gateway.phase(JobKind::Transcribe), JobPhase::Idle);
    }

    #[test]
    fn failed_job_reports_failed_then_idle() {
        let gateway = JobGateway::new(
            StubRunner::err(Error::EngineUnavailable("not installed".into())),
            unused(),
        );
        gateway.transcribe("/media/talk.mp4").unwrap_err();
        assert_eq!(gateway.phase(JobKind::Transcribe), JobPhase::Failed);
        assert_eq!(gateway.phase(JobKind::Transcribe), JobPhase::Idle);
    }

    #[test]
    fn job_kinds_are_independent() {
        let (t, _) = StubRunner::ok("[]");
        let (g, _) = StubRunner::ok(r#"{"output_path": "/out/cut.mp4"}"#);
        let gateway = JobGateway::new(t, g);
        gateway.transcribe("/media/a.mp4").unwrap();
        assert_eq!(gateway.phase(JobKind::Generate), JobPhase::Idle);
        assert_eq!(gateway.phase(JobKind::Transcribe), JobPhase::Succeeded);
    }
}

mod engine;
mod error;
mod export;
mod paths;
mod playback;
mod segments;

use engine::{resolve_engine_program, CliEngineRunner, ExportResult, JobGateway, JobKind, JobPhase};
use export::{export_srt, export_vtt};
use paths::{app_data_dir, exports_dir};
use playback::{PlaybackBridge, PlaybackSurface};
use segments::{deselect, filter_segments, select, Segment, SegmentId, SegmentStore};
use std::sync::{Arc, Mutex};
use tauri::{Emitter, Manager};

/// Engine binary names, resolved next to the executable or on PATH.
const TRANSCRIBE_ENGINE: &str = "transcribe-engine";
const RENDER_ENGINE: &str = "render-engine";

/// Application state wrapper. The segment store is the single owner of the
/// current collection; everything else reads through it.
pub struct AppState {
    store: Mutex<SegmentStore>,
    gateway: Arc<JobGateway>,
    playback: PlaybackBridge,
}

impl AppState {
    fn new() -> Self {
        Self {
            store: Mutex::new(SegmentStore::new()),
            gateway: Arc::new(JobGateway::new(
                Box::new(CliEngineRunner::new(resolve_engine_program(
                    TRANSCRIBE_ENGINE,
                ))),
                Box::new(CliEngineRunner::new(resolve_engine_program(RENDER_ENGINE))),
            )),
            playback: PlaybackBridge::new(),
        }
    }
}

/// Playback surface backed by the webview's player: seeks are emitted as
/// events and applied to the video element on the frontend.
struct WebviewPlayback {
    app: tauri::AppHandle,
}

impl PlaybackSurface for WebviewPlayback {
    fn seek_to(&self, seconds: f64) {
        let _ = self
            .app
            .emit("player-seek", serde_json::json!({ "seconds": seconds }));
    }
}

#[tauri::command]
fn get_app_data_dir(app: tauri::AppHandle) -> Result<String, String> {
    app_data_dir(&app).map(|p| p.to_string_lossy().into_owned())
}

#[tauri::command]
fn get_log_file_path(app: tauri::AppHandle) -> Result<String, String> {
    paths::log_file_path(&app).map(|p| p.to_string_lossy().into_owned())
}

#[tauri::command]
fn get_exports_dir(app: tauri::AppHandle) -> Result<String, String> {
    exports_dir(&app).map(|p| p.to_string_lossy().into_owned())
}

/// Run the transcription engine for a media file and replace the current
/// collection with the result. A failed run leaves the previous collection
/// in place.
#[tauri::command]
async fn transcribe_media_command(
    state: tauri::State<'_, AppState>,
    media_path: String,
) -> Result<Vec<Segment>, String> {
    let gateway = state.gateway.clone();
    let segments = tauri::async_runtime::spawn_blocking(move || gateway.transcribe(&media_path))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())?;
    let mut store = state.store.lock().unwrap();
    store.load(segments).map_err(|e| e.to_string())?;
    Ok(store.all().to_vec())
}

/// Render the currently selected segments into a new video. The selection is
/// read from the store at call time; edits made while the engine runs do not
/// affect the request.
#[tauri::command]
async fn generate_video_command(
    state: tauri::State<'_, AppState>,
    media_path: String,
) -> Result<ExportResult, String> {
    let selection = state.store.lock().unwrap().export_selection();
    let gateway = state.gateway.clone();
    tauri::async_runtime::spawn_blocking(move || gateway.generate(&media_path, &selection))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}

/// Load an already-parsed transcript directly (e.g. segments the frontend
/// kept from a previous transcription in this session).
#[tauri::command]
fn load_segments_command(
    state: tauri::State<'_, AppState>,
    segments: Vec<Segment>,
) -> Result<Vec<Segment>, String> {
    let mut store = state.store.lock().unwrap();
    store.load(segments).map_err(|e| e.to_string())?;
    Ok(store.all().to_vec())
}

#[tauri::command]
fn get_segments_command(state: tauri::State<'_, AppState>) -> Result<Vec<Segment>, String> {
    Ok(state.store.lock().unwrap().all().to_vec())
}

#[tauri::command]
fn filter_segments_command(
    state: tauri::State<'_, AppState>,
    query: String,
) -> Result<Vec<Segment>, String> {
    let store = state.store.lock().unwrap();
    Ok(filter_segments(store.all(), &query)
        .into_iter()
        .cloned()
        .collect())
}

#[tauri::command]
fn set_segment_checked(
    state: tauri::State<'_, AppState>,
    id: SegmentId,
    checked: bool,
) -> Result<(), String> {
    state
        .store
        .lock()
        .unwrap()
        .set_checked(&id, checked)
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn select_segment(state: tauri::State<'_, AppState>, id: SegmentId) -> Result<(), String> {
    select(&mut state.store.lock().unwrap(), &id).map_err(|e| e.to_string())
}

#[tauri::command]
fn deselect_segment(state: tauri::State<'_, AppState>, id: SegmentId) -> Result<(), String> {
    deselect(&mut state.store.lock().unwrap(), &id).map_err(|e| e.to_string())
}

/// The user clicked a segment: seek playback to its start. Fire-and-forget;
/// succeeds without effect when the player is not mounted yet.
#[tauri::command]
fn activate_segment(state: tauri::State<'_, AppState>, id: SegmentId) -> Result<(), String> {
    let store = state.store.lock().unwrap();
    let segment = store
        .get(&id)
        .ok_or_else(|| error::Error::UnknownSegment(id.to_string()).to_string())?;
    state.playback.activate(segment);
    Ok(())
}

#[tauri::command]
fn player_mounted(app: tauri::AppHandle, state: tauri::State<'_, AppState>) {
    state.playback.mount(Box::new(WebviewPlayback { app }));
}

#[tauri::command]
fn player_unmounted(state: tauri::State<'_, AppState>) {
    state.playback.unmount();
}

#[tauri::command]
fn job_state_command(state: tauri::State<'_, AppState>, kind: String) -> Result<JobPhase, String> {
    let kind = match kind.as_str() {
        "transcribe" => JobKind::Transcribe,
        "generate" => JobKind::Generate,
        other => return Err(format!("Unknown job kind: {}", other)),
    };
    Ok(state.gateway.phase(kind))
}

#[tauri::command]
fn export_transcript(
    state: tauri::State<'_, AppState>,
    path: String,
    format: String,
) -> Result<(), String> {
    let store = state.store.lock().unwrap();
    let p = std::path::Path::new(&path);
    match format.as_str() {
        "srt" => export_srt(p, store.all()),
        "vtt" => export_vtt(p, store.all()),
        _ => Err(format!("Unsupported format: {}", format)),
    }
}

/// Log directory in Roaming (next to exports). Resolved without AppHandle.
fn log_dir_path() -> std::path::PathBuf {
    #[cfg(windows)]
    {
        std::env::var("APPDATA")
            .map(|p| std::path::PathBuf::from(p).join("cutlist").join("logs"))
            .unwrap_or_else(|_| std::path::PathBuf::from(".").join("logs"))
    }
    #[cfg(not(windows))]
    {
        dirs::data_dir()
            .map(|d| d.join("cutlist").join("logs"))
            .unwrap_or_else(|| std::path::PathBuf::from(".").join("logs"))
    }
}

fn init_logger() -> Result<std::path::PathBuf, fern::InitError> {
    let log_dir = log_dir_path();
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = log_dir.join("cutlist.log");

    let format = |out: fern::FormatCallback<'_>, message: &std::fmt::Arguments<'_>, record: &log::Record| {
        out.finish(format_args!(
            "[{}][{}][{}][{:?}] {}",
            chrono::Local::now().format("%Y-%m-%d"),
            chrono::Local::now().format("%H:%M:%S"),
            record.target(),
            record.level(),
            message
        ))
    };

    fern::Dispatch::new()
        .format(format)
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .chain(fern::log_file(&log_file)?)
        .apply()?;

    Ok(log_file)
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let _log_path = init_logger().ok();

    tauri::Builder::default()
        .plugin(tauri_plugin_log::Builder::default().skip_logger().build())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_store::Builder::default().build())
        .setup(|app| {
            paths::ensure_directories(app.handle())?;
            app.manage(AppState::new());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_app_data_dir,
            get_log_file_path,
            get_exports_dir,
            transcribe_media_command,
            generate_video_command,
            load_segments_command,
            get_segments_command,
            filter_segments_command,
            set_segment_checked,
            select_segment,
            deselect_segment,
            activate_segment,
            player_mounted,
            player_unmounted,
            job_state_command,
            export_transcript,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

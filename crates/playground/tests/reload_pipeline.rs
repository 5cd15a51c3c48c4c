use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use playground::{
    CommitOutcome, DebounceState, ErrorOverlay, FilenamePrompt, ManualScheduler, MemoryDocument,
    SaveTarget, Session, SessionConfig, SessionEvent, ShaderBackend, ShaderCompileError,
    UniformSnapshot, ViewportSize, DEFAULT_FRAGMENT_SHADER,
};

const D: Duration = Duration::from_millis(500);

/// Stand-in for the GPU: rejects statements missing their semicolon and
/// records which program drew each frame.
#[derive(Default)]
struct FakeGpu {
    program: Option<String>,
    compiles: Vec<String>,
    frames: Vec<(String, UniformSnapshot)>,
    size: (u32, u32),
}

impl ShaderBackend for FakeGpu {
    fn compile(&mut self, source: &str) -> Result<(), ShaderCompileError> {
        self.compiles.push(source.to_string());
        for (index, line) in source.lines().enumerate() {
            let line = line.trim();
            let complete = line.is_empty()
                || line.starts_with("//")
                || line.starts_with('#')
                || line.ends_with(';')
                || line.ends_with('{')
                || line.ends_with('}');
            if !complete {
                return Err(ShaderCompileError::new(format!(
                    "ERROR: 0:{}: ';' expected",
                    index + 1
                )));
            }
        }
        self.program = Some(source.to_string());
        Ok(())
    }

    fn draw(&mut self, uniforms: &UniformSnapshot) -> anyhow::Result<()> {
        let program = self.program.clone().unwrap_or_default();
        self.frames.push((program, *uniforms));
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

#[derive(Default)]
struct Overlay {
    text: Option<String>,
}

impl ErrorOverlay for Overlay {
    fn show(&mut self, diagnostic: &str) {
        self.text = Some(diagnostic.to_string());
    }

    fn hide(&mut self) {
        self.text = None;
    }

    fn is_visible(&self) -> bool {
        self.text.is_some()
    }
}

type TestSession = Session<FakeGpu, Overlay, MemoryDocument>;

fn start(initial: &str) -> (TestSession, ManualScheduler) {
    let mut scheduler = ManualScheduler::new();
    let session = Session::start(
        SessionConfig::default(),
        FakeGpu::default(),
        Overlay::default(),
        MemoryDocument::new(initial),
        ViewportSize::new(640, 480),
        &mut scheduler,
    )
    .expect("session starts");
    (session, scheduler)
}

fn type_text(session: &mut TestSession, text: &str, at: Instant) {
    session.document_mut().replace(text);
    session.edit(at);
}

const VALID_EDIT: &str = "void main() {\n    gl_FragColor = vec4(1.0);\n}\n";
const BROKEN_EDIT: &str = "void main() {\n    gl_FragColor = vec4(1.0)\n}\n";

#[test]
fn burst_of_edits_compiles_once_with_last_text() {
    let (mut session, _) = start(DEFAULT_FRAGMENT_SHADER);
    let t0 = Instant::now();

    for (step, text) in ["void", "void main() {", "void main() {\n}"]
        .into_iter()
        .enumerate()
    {
        let at = t0 + Duration::from_millis(step as u64 * 100);
        type_text(&mut session, text, at);
        assert_eq!(session.poll_timers(at), None);
    }

    assert_eq!(session.poll_timers(t0 + Duration::from_millis(600)), None);
    assert_eq!(
        session.poll_timers(t0 + Duration::from_millis(200) + D),
        Some(CommitOutcome::Compiled)
    );

    let compiles = &session.backend().compiles;
    assert_eq!(compiles.len(), 2, "startup compile plus one debounced compile");
    assert_eq!(compiles[1], "void main() {\n}");
    assert_eq!(session.debounce_state(), DebounceState::Idle);
}

#[test]
fn separated_bursts_compile_once_each() {
    let (mut session, _) = start(DEFAULT_FRAGMENT_SHADER);
    let t0 = Instant::now();

    type_text(&mut session, VALID_EDIT, t0);
    assert!(session.poll_timers(t0 + D).is_some());

    let t1 = t0 + D + Duration::from_millis(50);
    type_text(&mut session, DEFAULT_FRAGMENT_SHADER, t1);
    assert!(session.poll_timers(t1 + D).is_some());

    assert_eq!(session.compile_attempts(), 3);
}

#[test]
fn syntax_error_keeps_default_shader_and_shows_diagnostic() {
    let (mut session, mut scheduler) = start(DEFAULT_FRAGMENT_SHADER);
    let t0 = Instant::now();
    session.pointer_moved(10.0, 20.0);
    session.tick(Duration::from_millis(100), &mut scheduler);
    let before = session.uniforms();

    type_text(&mut session, BROKEN_EDIT, t0);
    let outcome = session.poll_timers(t0 + D).unwrap();

    let CommitOutcome::Failed(err) = outcome else {
        panic!("expected compile failure, got {outcome:?}");
    };
    assert!(!err.log.is_empty());
    let shown = session.overlay().text.as_deref().unwrap();
    assert_eq!(shown, err.log);
    assert_eq!(session.uniforms(), before);
    assert_eq!(session.active_source(), DEFAULT_FRAGMENT_SHADER);

    session.tick(Duration::from_millis(100), &mut scheduler);
    let (program, uniforms) = session.backend().frames.last().unwrap();
    assert_eq!(program, DEFAULT_FRAGMENT_SHADER);
    assert_eq!(*uniforms, before);
}

#[test]
fn broken_shader_at_launch_runs_default_until_fixed() {
    let (mut session, mut scheduler) = start(BROKEN_EDIT);
    assert_eq!(scheduler.requested(), 1);
    assert_eq!(session.active_source(), DEFAULT_FRAGMENT_SHADER);
    let shown = session.overlay().text.clone().unwrap();
    assert!(shown.contains("';' expected"), "{shown}");

    session.tick(Duration::from_millis(16), &mut scheduler);
    let (program, _) = session.backend().frames.last().unwrap();
    assert_eq!(program, DEFAULT_FRAGMENT_SHADER);

    let t0 = Instant::now();
    type_text(&mut session, VALID_EDIT, t0);
    assert!(!session.overlay().is_visible());
    assert_eq!(session.poll_timers(t0 + D), Some(CommitOutcome::Compiled));
    assert_eq!(session.active_source(), VALID_EDIT);
}

#[test]
fn valid_edit_activates_after_quiet_period_and_hides_overlay() {
    let (mut session, mut scheduler) = start(DEFAULT_FRAGMENT_SHADER);
    let t0 = Instant::now();

    type_text(&mut session, BROKEN_EDIT, t0);
    session.poll_timers(t0 + D);
    assert!(session.overlay().is_visible());

    let t1 = t0 + D * 2;
    type_text(&mut session, VALID_EDIT, t1);
    assert!(
        !session.overlay().is_visible(),
        "overlay clears as soon as the next burst starts"
    );
    assert_eq!(session.poll_timers(t1 + D - Duration::from_millis(1)), None);
    assert_eq!(session.poll_timers(t1 + D), Some(CommitOutcome::Compiled));

    session.tick(Duration::from_secs(1), &mut scheduler);
    let (program, _) = session.backend().frames.last().unwrap();
    assert_eq!(program, VALID_EDIT);
    assert!(!session.overlay().is_visible());
}

#[test]
fn render_loop_keeps_requesting_frames() {
    let (mut session, mut scheduler) = start(DEFAULT_FRAGMENT_SHADER);
    let mut elapsed = Duration::ZERO;
    for _ in 0..5 {
        assert!(scheduler.take());
        elapsed += Duration::from_millis(16);
        session.tick(elapsed, &mut scheduler);
    }
    assert!(scheduler.take());
    assert_eq!(session.backend().frames.len(), 5);
    assert!((session.time() - 0.8).abs() < 1e-4);
}

#[test]
fn resize_updates_resolution_and_surface() {
    let (mut session, _) = start(DEFAULT_FRAGMENT_SHADER);
    for (w, h) in [(1, 1), (1024, 768), (7, 3000)] {
        assert!(session.resize(ViewportSize::new(w, h)));
        assert_eq!(session.backend().size, (w, h));
        assert_eq!(session.uniforms().resolution, [w as f32, h as f32]);
    }
}

#[test]
fn subscribers_observe_the_reload_cycle_until_unsubscribed() {
    let (mut session, _) = start(DEFAULT_FRAGMENT_SHADER);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let id = {
        let seen = Rc::clone(&seen);
        session.subscribe(move |event| seen.borrow_mut().push(event.clone()))
    };
    let t0 = Instant::now();

    type_text(&mut session, BROKEN_EDIT, t0);
    session.poll_timers(t0 + D);
    type_text(&mut session, VALID_EDIT, t0 + D * 2);
    session.poll_timers(t0 + D * 3);

    let events = seen.borrow().clone();
    assert!(matches!(
        events.as_slice(),
        [
            SessionEvent::EditQueued { burst_started: true },
            SessionEvent::CompileFailed { .. },
            SessionEvent::OverlayCleared,
            SessionEvent::EditQueued { burst_started: true },
            SessionEvent::CompileSucceeded,
        ]
    ));

    assert!(session.unsubscribe(id));
    type_text(&mut session, VALID_EDIT, t0 + D * 4);
    assert_eq!(seen.borrow().len(), events.len());
}

struct KeepDefault;

impl FilenamePrompt for KeepDefault {
    fn prompt(&mut self, suggested: &str) -> Option<String> {
        Some(suggested.to_string())
    }
}

#[derive(Default)]
struct Downloads {
    files: Vec<(String, Vec<u8>)>,
}

impl SaveTarget for Downloads {
    fn save(&mut self, filename: &str, contents: &[u8]) -> anyhow::Result<PathBuf> {
        self.files.push((filename.to_string(), contents.to_vec()));
        Ok(PathBuf::from("/downloads").join(filename))
    }
}

#[test]
fn export_with_default_name_appends_extension_and_keeps_bytes() {
    let (mut session, _) = start(DEFAULT_FRAGMENT_SHADER);
    let edited = "// ✓ edited\nvoid main() {\n    gl_FragColor = vec4(0.2);\n}";
    session.document_mut().replace(edited);

    let exported = session
        .export(&mut KeepDefault, &mut Downloads::default())
        .unwrap()
        .unwrap();
    assert_eq!(exported.filename, "shader.frag");

    let mut downloads = Downloads::default();
    session.export(&mut KeepDefault, &mut downloads).unwrap();
    assert_eq!(downloads.files.len(), 1);
    assert_eq!(downloads.files[0].0, "shader.frag");
    assert_eq!(downloads.files[0].1, edited.as_bytes());
}

use std::time::{Duration, Instant};

use crate::bridge::{CompilerBridge, ErrorOverlay, ShaderBackend, ShaderCompileError};
use crate::debounce::{DebounceState, Debouncer, EditOutcome, DEFAULT_DEBOUNCE};
use crate::document::{TextDocument, DEFAULT_FRAGMENT_SHADER};
use crate::events::{SessionEvent, SubscriptionId, Subscribers};
use crate::export::{ExportAction, ExportError, ExportedFile, FilenamePrompt, SaveTarget};
use crate::pointer::PointerTracker;
use crate::render_loop::{RenderLoop, TickScheduler, DEFAULT_TIME_SCALE};
use crate::uniforms::{UniformSnapshot, UniformStore};
use crate::viewport::{ResizeHandler, ViewportSize};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("built-in fallback shader failed to compile")]
    StartupShader(#[source] ShaderCompileError),
    #[error("failed to read the shader document")]
    Document(#[source] anyhow::Error),
}

/// Tunables for a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub debounce: Duration,
    pub time_scale: f32,
    pub export: ExportAction,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            time_scale: DEFAULT_TIME_SCALE,
            export: ExportAction::default(),
        }
    }
}

/// Result of a debounced commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Compiled,
    Failed(ShaderCompileError),
    /// The document could not be read; nothing was compiled.
    DocumentUnavailable,
}

/// Everything one playground needs, wired together.
///
/// The session is driven by the host: it forwards edits, timer polls, frame
/// callbacks, resizes and pointer moves, all from one thread.
pub struct Session<B, O, D> {
    backend: B,
    overlay: O,
    document: D,
    store: UniformStore,
    bridge: CompilerBridge,
    debouncer: Debouncer,
    render_loop: RenderLoop,
    viewport: ResizeHandler,
    pointer: PointerTracker,
    export: ExportAction,
    subscribers: Subscribers<SessionEvent>,
}

impl<B, O, D> Session<B, O, D>
where
    B: ShaderBackend,
    O: ErrorOverlay,
    D: TextDocument,
{
    /// Sizes the viewport, compiles the startup shader and requests the first
    /// frame.
    ///
    /// A document that does not compile leaves the built-in shader running
    /// with the document's diagnostic on the overlay, so the next edit can
    /// fix it. Only a failure of the built-in shader itself is fatal.
    pub fn start<S>(
        config: SessionConfig,
        backend: B,
        overlay: O,
        document: D,
        initial_size: ViewportSize,
        scheduler: &mut S,
    ) -> Result<Self, SessionError>
    where
        S: TickScheduler + ?Sized,
    {
        let mut session = Self {
            backend,
            overlay,
            document,
            store: UniformStore::new(),
            bridge: CompilerBridge::new(),
            debouncer: Debouncer::new(config.debounce),
            render_loop: RenderLoop::new(config.time_scale),
            viewport: ResizeHandler::new(),
            pointer: PointerTracker::new(),
            export: config.export,
            subscribers: Subscribers::new(),
        };

        session.resize(initial_size);
        let source = session.document.text().map_err(SessionError::Document)?;
        if let Err(err) =
            session
                .bridge
                .set_source(&source, &mut session.backend, &mut session.overlay)
        {
            tracing::warn!("startup shader rejected; running the built-in shader");
            session
                .bridge
                .set_source(
                    DEFAULT_FRAGMENT_SHADER,
                    &mut session.backend,
                    &mut session.overlay,
                )
                .map_err(SessionError::StartupShader)?;
            session.overlay.show(&err.log);
        }
        tracing::info!(
            width = initial_size.width,
            height = initial_size.height,
            debounce_ms = session.debouncer.delay().as_millis() as u64,
            "playground session started"
        );
        scheduler.request_next_tick();
        Ok(session)
    }

    /// Records a document edit at `now`.
    pub fn edit(&mut self, now: Instant) -> EditOutcome {
        let outcome = self.debouncer.edit(now);
        if self.overlay.is_visible() {
            self.overlay.hide();
            self.subscribers.publish(&SessionEvent::OverlayCleared);
        }
        self.subscribers.publish(&SessionEvent::EditQueued {
            burst_started: outcome.burst_started,
        });
        outcome
    }

    /// Commits the pending edit burst if its quiet period is over.
    pub fn poll_timers(&mut self, now: Instant) -> Option<CommitOutcome> {
        if self.debouncer.poll(now) {
            Some(self.commit())
        } else {
            None
        }
    }

    fn commit(&mut self) -> CommitOutcome {
        let text = match self.document.text() {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("skipping recompile; document unreadable: {err:#}");
                return CommitOutcome::DocumentUnavailable;
            }
        };
        match self
            .bridge
            .set_source(&text, &mut self.backend, &mut self.overlay)
        {
            Ok(()) => {
                self.subscribers.publish(&SessionEvent::CompileSucceeded);
                CommitOutcome::Compiled
            }
            Err(err) => {
                self.subscribers.publish(&SessionEvent::CompileFailed {
                    log: err.log.clone(),
                });
                CommitOutcome::Failed(err)
            }
        }
    }

    /// When the host should wake up next to poll timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Frame callback. `elapsed` is host time since the session started.
    pub fn tick<S>(&mut self, elapsed: Duration, scheduler: &mut S)
    where
        S: TickScheduler + ?Sized,
    {
        self.render_loop
            .tick(elapsed, &mut self.store, &mut self.backend, scheduler);
    }

    /// Container size changed.
    pub fn resize(&mut self, size: ViewportSize) -> bool {
        let applied = self
            .viewport
            .apply(size, &mut self.backend, &mut self.store);
        if applied {
            self.subscribers.publish(&SessionEvent::Resized {
                width: size.width,
                height: size.height,
            });
        }
        applied
    }

    /// Pointer moved to client position (`x`, `y`).
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        let height = self
            .viewport
            .current()
            .map(|size| f64::from(size.height))
            .unwrap_or_default();
        self.pointer.handle_move(x, y, height, &mut self.store);
    }

    /// Saves the current document text through `prompt` and `target`.
    pub fn export<P, T>(
        &mut self,
        prompt: &mut P,
        target: &mut T,
    ) -> Result<Option<ExportedFile>, ExportError>
    where
        P: FilenamePrompt + ?Sized,
        T: SaveTarget + ?Sized,
    {
        let text = self.document.text().map_err(ExportError::Document)?;
        let exported = self.export.run(&text, prompt, target)?;
        if let Some(file) = &exported {
            self.subscribers.publish(&SessionEvent::Exported {
                path: file.path.clone(),
            });
        }
        Ok(exported)
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&SessionEvent) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn uniforms(&self) -> UniformSnapshot {
        self.store.snapshot()
    }

    pub fn active_source(&self) -> &str {
        self.bridge.active_source()
    }

    pub fn compile_attempts(&self) -> u64 {
        self.bridge.attempts()
    }

    pub fn debounce_state(&self) -> DebounceState {
        self.debouncer.state()
    }

    pub fn viewport(&self) -> Option<ViewportSize> {
        self.viewport.current()
    }

    pub fn time(&self) -> f32 {
        self.render_loop.time()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Drops all subscribers; the session keeps running.
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
        self.subscribers.clear();
    }
}

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use playground::{
    FilenamePrompt, SaveTarget, Session, SessionEvent, TextDocument, TickScheduler, ViewportSize,
};
use tracing::{debug, error};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use winit::keyboard::{Key, ModifiersState};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::overlay::TitleOverlay;
use crate::types::WindowConfig;

/// Events injected into the window's event loop from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaygroundEvent {
    /// The shader document changed on disk.
    DocumentEdited,
}

/// Cloneable handle that wakes the event loop when the document changes.
#[derive(Clone)]
pub struct EditNotifier {
    proxy: EventLoopProxy<PlaygroundEvent>,
}

impl EditNotifier {
    /// Returns `false` once the event loop has exited.
    pub fn notify_edit(&self) -> bool {
        match self.proxy.send_event(PlaygroundEvent::DocumentEdited) {
            Ok(()) => true,
            Err(_) => {
                debug!("event loop closed; dropping edit notification");
                false
            }
        }
    }
}

impl fmt::Debug for EditNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditNotifier").finish_non_exhaustive()
    }
}

/// Where Ctrl+S asks for a filename and writes the document.
pub struct ExportHandlers {
    pub prompt: Box<dyn FilenamePrompt>,
    pub target: Box<dyn SaveTarget>,
}

type WindowSession<D> = Session<GpuState, TitleOverlay, D>;

/// Frame callbacks map onto winit redraw requests.
struct RedrawScheduler<'a>(&'a Window);

impl TickScheduler for RedrawScheduler<'_> {
    fn request_next_tick(&mut self) {
        self.0.request_redraw();
    }
}

/// Opens the playground window and runs it until closed.
///
/// `open_document` receives the notifier to call on every edit and returns
/// the document the session reads from.
pub(crate) fn run_window<D, F>(
    config: WindowConfig,
    open_document: F,
    mut export: ExportHandlers,
) -> Result<()>
where
    D: TextDocument + 'static,
    F: FnOnce(EditNotifier) -> Result<D>,
{
    let event_loop = EventLoopBuilder::<PlaygroundEvent>::with_user_event()
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let notifier = EditNotifier {
        proxy: event_loop.create_proxy(),
    };

    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create playground window: {err}"))?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let gpu = GpuState::new(window.as_ref(), size, config.antialiasing)
        .context("failed to initialise GPU renderer")?;
    let overlay = TitleOverlay::new(window.clone(), config.title.clone());
    let document = open_document(notifier)?;

    let mut session: WindowSession<D> = Session::start(
        config.session.clone(),
        gpu,
        overlay,
        document,
        ViewportSize::new(size.width, size.height),
        &mut RedrawScheduler(window.as_ref()),
    )
    .context("failed to start playground session")?;
    session.subscribe(log_session_event);

    let started = Instant::now();
    let mut modifiers = ModifiersState::empty();

    let run_result = event_loop.run(move |event, elwt| match event {
        Event::UserEvent(PlaygroundEvent::DocumentEdited) => {
            session.edit(Instant::now());
        }
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                session.teardown();
                elwt.exit();
            }
            WindowEvent::Resized(new_size) => {
                if session.resize(ViewportSize::new(new_size.width, new_size.height)) {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                session.pointer_moved(position.x, position.y);
            }
            WindowEvent::ModifiersChanged(new_modifiers) => {
                modifiers = new_modifiers.state();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && is_save_shortcut(&event.logical_key, modifiers)
                {
                    export_document(&mut session, &mut export);
                }
            }
            WindowEvent::RedrawRequested => {
                session.tick(started.elapsed(), &mut RedrawScheduler(window.as_ref()));
            }
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            session.poll_timers(now);
            match session.next_deadline() {
                Some(deadline) => elwt.set_control_flow(ControlFlow::WaitUntil(deadline)),
                None => elwt.set_control_flow(ControlFlow::Wait),
            }
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}

fn export_document<D: TextDocument>(session: &mut WindowSession<D>, export: &mut ExportHandlers) {
    match session.export(export.prompt.as_mut(), export.target.as_mut()) {
        Ok(Some(file)) => debug!(filename = %file.filename, "export finished"),
        Ok(None) => debug!("export cancelled"),
        Err(err) => error!("export failed: {:#}", anyhow::Error::new(err)),
    }
}

fn log_session_event(event: &SessionEvent) {
    match event {
        SessionEvent::Resized { width, height } => debug!(width, height, "viewport resized"),
        SessionEvent::EditQueued {
            burst_started: true,
        } => debug!("edit burst started"),
        _ => {}
    }
}

/// Ctrl+S, or Cmd+S on macOS.
pub(crate) fn is_save_shortcut(key: &Key, modifiers: ModifiersState) -> bool {
    let command = modifiers.control_key() || modifiers.super_key();
    let is_s = matches!(key, Key::Character(value) if value.eq_ignore_ascii_case("s"));
    command && is_s && !modifiers.alt_key()
}

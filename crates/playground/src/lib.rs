//! Coordination core of the fragpad shader playground.
//!
//! Nothing in here touches the GPU or a window. The host (the `renderer`
//! crate in production, fakes in tests) implements the collaborator traits
//! and feeds events into a [`Session`]:
//!
//! ```text
//!   document edit ──▶ Debouncer ──(quiet period)──▶ CompilerBridge ──▶ ShaderBackend::compile
//!                                                          │
//!                                                          └─ failure ─▶ ErrorOverlay::show
//!   frame callback ─▶ RenderLoop ─▶ UniformStore::snapshot ─▶ ShaderBackend::draw
//!   resize / pointer ───────────▶ UniformStore
//! ```

mod bridge;
mod debounce;
mod document;
mod events;
mod export;
mod pointer;
mod render_loop;
mod session;
mod uniforms;
mod viewport;

pub use bridge::{CompilerBridge, ErrorOverlay, ShaderBackend, ShaderCompileError};
pub use debounce::{
    DebounceState, Debouncer, EditOutcome, TimerSlot, TimerToken, DEFAULT_DEBOUNCE,
};
pub use document::{MemoryDocument, TextDocument, DEFAULT_FRAGMENT_SHADER};
pub use events::{SessionEvent, SubscriptionId, Subscribers};
pub use export::{
    DirectoryTarget, ExportAction, ExportError, ExportedFile, FilenamePrompt, SaveTarget,
    DEFAULT_EXPORT_EXTENSION, DEFAULT_EXPORT_STEM,
};
pub use pointer::PointerTracker;
pub use render_loop::{ManualScheduler, RenderLoop, TickScheduler, DEFAULT_TIME_SCALE};
pub use session::{CommitOutcome, Session, SessionConfig, SessionError};
pub use uniforms::{
    UniformError, UniformKind, UniformName, UniformSnapshot, UniformStore, UniformValue,
};
pub use viewport::{ResizeHandler, ViewportSize};

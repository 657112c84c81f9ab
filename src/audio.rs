//! Audio collaborator: loading, transport commands and duration probing.
//!
//! The controller talks to audio through the `AudioBackend` and
//! `DurationProbe` traits; `RodioBackend` and `FileProbe` are the real
//! implementations backed by `rodio` and `lofty`.

mod backend;
mod probe;
mod rodio_backend;
mod types;

pub use backend::{AudioBackend, DurationProbe};
pub use probe::FileProbe;
pub use rodio_backend::RodioBackend;
pub use types::AudioError;

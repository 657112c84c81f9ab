//! Playback coordination: the controller state machine and the progress
//! monitor it runs for the current track.

mod controller;
mod monitor;
mod state;

pub use controller::{Controller, PlayerOptions};

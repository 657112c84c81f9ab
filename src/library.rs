//! Track list: audio files paired with their cover images.
//!
//! The list is fixed once the player starts. It is built either from the
//! two explicit lists in the config file or by scanning a music directory.

mod model;
mod scan;

pub use model::*;
pub use scan::load_tracks;

#[cfg(test)]
mod tests;

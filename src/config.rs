//! Player settings: the `[playback]`, `[library]`, `[ui]` and `[log]`
//! tables, read from an optional TOML file and `CASSETTE__*` variables.

mod load;
mod schema;

pub use load::default_log_path;
pub use schema::*;

#[cfg(test)]
mod tests;

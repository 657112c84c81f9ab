use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::Source;

use super::backend::DurationProbe;
use super::rodio_backend::decode;
use super::types::AudioError;

/// Reads track length from the file itself.
///
/// The container header (via `lofty`) is tried first; when it reports
/// nothing, the decoder's own estimate is used.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileProbe;

impl DurationProbe for FileProbe {
    fn duration(&self, path: &Path) -> Result<Duration, AudioError> {
        let header_error = match lofty::read_from_path(path) {
            Ok(tagged) => {
                let d = tagged.properties().duration();
                if !d.is_zero() {
                    return Ok(d);
                }
                "header reports zero length".to_string()
            }
            Err(e) => e.to_string(),
        };

        tracing::debug!(path = %path.display(), %header_error, "falling back to decoder length");
        decode(path)?
            .total_duration()
            .ok_or_else(|| AudioError::Probe {
                path: path.to_path_buf(),
                reason: header_error,
            })
    }
}

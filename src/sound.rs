/// Feedback cue kinds fired by the menu engine. Exactly one cue accompanies
/// every accepted or rejected action; ignored input fires nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Move,
    Confirm,
    Cancel,
    Error,
}

impl Cue {
    pub fn file_stem(self) -> &'static str {
        match self {
            Cue::Move => "move",
            Cue::Confirm => "confirm",
            Cue::Cancel => "cancel",
            Cue::Error => "error",
        }
    }
}

/// Fire-and-forget audio collaborator. Implementations swallow their own
/// failures: audio is best-effort and must never affect menu control flow.
pub trait SoundHook {
    fn fire(&self, cue: Cue);
}

/// Silent default used when audio is disabled or unavailable.
pub struct NullSound;

impl SoundHook for NullSound {
    fn fire(&self, _cue: Cue) {}
}

#[cfg(feature = "sound")]
pub use player::CuePlayer;

#[cfg(feature = "sound")]
mod player {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::PathBuf;

    use anyhow::Result;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use tracing::{debug, warn};

    use super::{Cue, SoundHook};

    /// Plays cue files from the user sounds directory
    /// (`<data_dir>/pickr/sounds/<cue>.{wav,mp3,ogg,flac}`).
    pub struct CuePlayer {
        _stream: OutputStream,
        stream_handle: OutputStreamHandle,
        volume: f32,
    }

    impl CuePlayer {
        pub fn new(volume: f32) -> Result<Self> {
            let (stream, stream_handle) = OutputStream::try_default()?;
            Ok(Self {
                _stream: stream,
                stream_handle,
                volume: volume.clamp(0.0, 1.0),
            })
        }

        fn sounds_dir() -> PathBuf {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pickr")
                .join("sounds")
        }

        fn resolve(cue: Cue) -> Option<PathBuf> {
            let dir = Self::sounds_dir();
            for ext in ["wav", "mp3", "ogg", "flac"] {
                let path = dir.join(format!("{}.{ext}", cue.file_stem()));
                if path.exists() {
                    return Some(path);
                }
            }
            None
        }

        fn play(&self, cue: Cue) -> Result<()> {
            let Some(path) = Self::resolve(cue) else {
                debug!("no sound file for cue '{}', skipping", cue.file_stem());
                return Ok(());
            };

            let file = match File::open(&path) {
                Ok(f) => f,
                Err(e) => {
                    warn!("failed to open sound file {:?}: {}", path, e);
                    return Ok(());
                }
            };
            let source = match Decoder::new(BufReader::new(file)) {
                Ok(s) => s,
                Err(e) => {
                    warn!("failed to decode sound file {:?}: {}", path, e);
                    return Ok(());
                }
            };

            let sink = Sink::try_new(&self.stream_handle)?;
            sink.set_volume(self.volume);
            sink.append(source);
            sink.detach(); // Play in background

            Ok(())
        }
    }

    impl SoundHook for CuePlayer {
        fn fire(&self, cue: Cue) {
            if let Err(e) = self.play(cue) {
                warn!("cue '{}' failed: {e}", cue.file_stem());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_file_stems_are_distinct() {
        let stems = [Cue::Move, Cue::Confirm, Cue::Cancel, Cue::Error]
            .map(Cue::file_stem);
        for (i, a) in stems.iter().enumerate() {
            for b in &stems[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_null_sound_is_silent() {
        NullSound.fire(Cue::Error);
    }
}

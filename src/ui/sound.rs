/// Sound engine: single-voice square-wave beeper via rodio.
///
/// Every `Tone` is synthesized into an in-memory WAV buffer the first time
/// it is requested and cached afterwards; the game only ever asks for a
/// couple of dozen distinct pitches. Playback is fire-and-forget
/// (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const SAMPLE_RATE: u32 = 22050;
/// Fade applied to the tail of each beep to avoid a click.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const RELEASE_MS: u32 = 8;

#[cfg(feature = "sound")]
mod inner {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::sim::event::Tone;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        volume: f32,
        cache: RefCell<HashMap<Tone, Arc<Vec<u8>>>>,
    }

    impl SoundEngine {
        /// `None` when no output device is available.
        pub fn new(volume: f32) -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("audio output unavailable: {e}");
                    return None;
                }
            };
            Some(SoundEngine {
                _stream: stream,
                handle,
                volume: volume.clamp(0.0, 1.0),
                cache: RefCell::new(HashMap::new()),
            })
        }

        fn buffer(&self, tone: Tone) -> Arc<Vec<u8>> {
            self.cache
                .borrow_mut()
                .entry(tone)
                .or_insert_with(|| Arc::new(super::make_wav(&super::gen_square(tone, self.volume))))
                .clone()
        }

        pub fn play(&self, tone: Tone) {
            if tone.hz == 0 || tone.ms == 0 { return; }
            let buf = self.buffer(tone);
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Synthesis
// ════════════════════════════════════════════════════════════

/// Square wave at `tone.hz` for `tone.ms`, linear release at the tail.
#[cfg(any(feature = "sound", test))]
fn gen_square(tone: crate::sim::event::Tone, volume: f32) -> Vec<f32> {
    let n = (SAMPLE_RATE as u64 * tone.ms as u64 / 1000) as usize;
    let release = ((SAMPLE_RATE * RELEASE_MS / 1000) as usize).min(n);
    let period = SAMPLE_RATE as f32 / tone.hz.max(1) as f32;
    (0..n)
        .map(|i| {
            let phase = (i as f32 % period) / period;
            let wave = if phase < 0.5 { 1.0 } else { -1.0 };
            let left = n - i;
            let env = if left < release { left as f32 / release as f32 } else { 1.0 };
            wave * env * volume
        })
        .collect()
}

/// Wrap mono f32 samples into a 16-bit PCM WAV buffer.
#[cfg(any(feature = "sound", test))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS: u16 = 16;
    let block_align = CHANNELS * BITS / 8;
    let byte_rate = SAMPLE_RATE * block_align as u32;
    let data_size = samples.len() as u32 * block_align as u32;

    let mut buf = Vec::with_capacity(44 + data_size as usize);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&CHANNELS.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&BITS.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }
    buf
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_volume: f32) -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _tone: crate::sim::event::Tone) {}
}

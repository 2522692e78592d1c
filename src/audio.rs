//! Sound effects: tones are synthesized at startup, nothing is loaded from
//! disk. Playback needs the `audio` feature; without it every cue is traced
//! and dropped.

use std::f32::consts::TAU;

use rand::Rng;
use tracing::trace;

use crate::game::Cue;

pub const SAMPLE_RATE: u32 = 44_100;
pub const VOLUME: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Fire,
    Explosion,
    Thrust,
    Saucer,
    Hyperspace,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Fire,
        Tone::Explosion,
        Tone::Thrust,
        Tone::Saucer,
        Tone::Hyperspace,
    ];

    pub fn duration_ms(&self) -> u32 {
        match self {
            Tone::Fire => 200,
            Tone::Explosion => 500,
            Tone::Thrust | Tone::Saucer => 1000,
            Tone::Hyperspace => 400,
        }
    }

    pub fn sample_count(&self) -> usize {
        (SAMPLE_RATE * self.duration_ms() / 1000) as usize
    }
}

impl From<Cue> for Tone {
    fn from(cue: Cue) -> Self {
        match cue {
            Cue::Fire => Tone::Fire,
            Cue::Explosion => Tone::Explosion,
            Cue::Hyperspace => Tone::Hyperspace,
        }
    }
}

/// Sounds that play continuously while a condition holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loop {
    Thrust,
    Saucer,
}

impl Loop {
    pub fn tone(&self) -> Tone {
        match self {
            Loop::Thrust => Tone::Thrust,
            Loop::Saucer => Tone::Saucer,
        }
    }
}

/// Mono samples in [-1, 1] at [`SAMPLE_RATE`].
pub fn synthesize<R: Rng>(tone: Tone, rng: &mut R) -> Vec<f32> {
    let n = tone.sample_count();
    let rate = SAMPLE_RATE as f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / rate;
            let progress = i as f32 / n as f32;
            let sample = match tone {
                // Descending laser zap
                Tone::Fire => {
                    let freq = 1500.0 - progress * 1000.0;
                    0.8 * (TAU * freq * t).sin() * (1.0 - progress)
                }
                Tone::Explosion => rng.gen_range(-1.0f32..=1.0) * (1.0 - progress),
                // Rumble: noise over a 100 Hz hum
                Tone::Thrust => rng.gen_range(-0.5f32..=0.5) + 0.5 * (TAU * 100.0 * t).sin(),
                // Two-note warble switching every tenth of a second
                Tone::Saucer => {
                    let freq = if (i / (SAMPLE_RATE as usize / 10)) % 2 == 0 {
                        400.0
                    } else {
                        600.0
                    };
                    0.7 * (TAU * freq * t).sin()
                }
                Tone::Hyperspace => {
                    let freq = 200.0 + progress * 1500.0;
                    0.8 * (TAU * freq * t).sin()
                }
            };
            sample.clamp(-1.0, 1.0)
        })
        .collect()
}

/// Fire-and-forget sound output
pub trait Audio {
    fn play(&mut self, cue: Cue);
    fn set_loop(&mut self, sound: Loop, on: bool);
}

/// Output used when muted or when no device is available.
#[derive(Debug, Default)]
pub struct Silent {
    thrust: bool,
    saucer: bool,
}

impl Audio for Silent {
    fn play(&mut self, cue: Cue) {
        trace!(?cue, "sound");
    }

    fn set_loop(&mut self, sound: Loop, on: bool) {
        let state = match sound {
            Loop::Thrust => &mut self.thrust,
            Loop::Saucer => &mut self.saucer,
        };
        if *state != on {
            trace!(?sound, on, "sound loop");
            *state = on;
        }
    }
}

#[cfg(feature = "audio")]
mod speaker {
    use std::collections::HashMap;

    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};

    use super::{synthesize, Audio, Loop, Tone, SAMPLE_RATE, VOLUME};
    use crate::error::Error;
    use crate::game::Cue;

    pub struct Speaker {
        stream: OutputStream,
        clips: HashMap<Tone, Vec<f32>>,
        thrust: Sink,
        saucer: Sink,
    }

    impl Speaker {
        pub fn open() -> Result<Self, Error> {
            let stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| Error::Audio(e.to_string()))?;

            let mut rng = rand::thread_rng();
            let clips: HashMap<Tone, Vec<f32>> = Tone::ALL
                .iter()
                .map(|&tone| (tone, synthesize(tone, &mut rng)))
                .collect();

            let looped = |tone: Tone| {
                let sink = Sink::connect_new(stream.mixer());
                sink.set_volume(VOLUME);
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, clips[&tone].clone()).repeat_infinite());
                sink.pause();
                sink
            };
            let thrust = looped(Tone::Thrust);
            let saucer = looped(Tone::Saucer);

            Ok(Self {
                stream,
                clips,
                thrust,
                saucer,
            })
        }
    }

    impl Audio for Speaker {
        fn play(&mut self, cue: Cue) {
            let tone = Tone::from(cue);
            let sink = Sink::connect_new(self.stream.mixer());
            sink.set_volume(VOLUME);
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, self.clips[&tone].clone()));
            sink.detach();
        }

        fn set_loop(&mut self, sound: Loop, on: bool) {
            let sink = match sound {
                Loop::Thrust => &self.thrust,
                Loop::Saucer => &self.saucer,
            };
            if on && sink.is_paused() {
                sink.play();
            } else if !on && !sink.is_paused() {
                sink.pause();
            }
        }
    }
}

/// Best available output: the speaker when built with `audio` and a device
/// opens, otherwise silence.
pub fn open(mute: bool) -> Box<dyn Audio> {
    if mute {
        return Box::new(Silent::default());
    }

    #[cfg(feature = "audio")]
    match speaker::Speaker::open() {
        Ok(speaker) => {
            tracing::info!("audio output opened");
            return Box::new(speaker);
        }
        Err(e) => tracing::warn!("continuing without sound: {}", e),
    }

    Box::new(Silent::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tone_lengths() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(synthesize(Tone::Fire, &mut rng).len(), 8_820);
        assert_eq!(synthesize(Tone::Explosion, &mut rng).len(), 22_050);
        assert_eq!(synthesize(Tone::Thrust, &mut rng).len(), 44_100);
        assert_eq!(synthesize(Tone::Saucer, &mut rng).len(), 44_100);
        assert_eq!(synthesize(Tone::Hyperspace, &mut rng).len(), 17_640);
    }

    #[test]
    fn test_samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        for tone in Tone::ALL {
            let samples = synthesize(tone, &mut rng);
            assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)), "{tone:?}");
            assert!(samples.iter().any(|s| s.abs() > 0.1), "{tone:?} is silent");
        }
    }

    #[test]
    fn test_decaying_tones_fade_out() {
        let mut rng = StdRng::seed_from_u64(3);
        for tone in [Tone::Fire, Tone::Explosion] {
            let samples = synthesize(tone, &mut rng);
            let tail = &samples[samples.len() - 100..];
            assert!(tail.iter().all(|s| s.abs() < 0.02), "{tone:?}");
        }
    }

    #[test]
    fn test_cues_map_to_tones() {
        assert_eq!(Tone::from(Cue::Fire), Tone::Fire);
        assert_eq!(Tone::from(Cue::Explosion), Tone::Explosion);
        assert_eq!(Tone::from(Cue::Hyperspace), Tone::Hyperspace);
        assert_eq!(Loop::Saucer.tone(), Tone::Saucer);
    }

    #[test]
    fn test_muted_output_accepts_everything() {
        let mut audio = open(true);
        audio.play(Cue::Fire);
        audio.set_loop(Loop::Thrust, true);
        audio.set_loop(Loop::Thrust, false);
    }
}

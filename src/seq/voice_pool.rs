use crate::error::ConfigError;

/// Anything that can sound a single enveloped note.
///
/// Retriggering a voice that is still ringing is always allowed; the
/// previous note is simply cut.
pub trait Voice {
    /// `start_time` is a delay in seconds from now, `sustain_time` the hold
    /// length in seconds. `None` keeps the voice's current frequency.
    fn play(&mut self, start_time: f32, sustain_time: f32, frequency: Option<f32>);
    fn start(&mut self);
    fn stop(&mut self);
    /// -1.0 is hard left, 1.0 hard right.
    fn pan(&mut self, value: f32);
}

impl<V: Voice + ?Sized> Voice for Box<V> {
    fn play(&mut self, start_time: f32, sustain_time: f32, frequency: Option<f32>) {
        (**self).play(start_time, sustain_time, frequency)
    }

    fn start(&mut self) {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn pan(&mut self, value: f32) {
        (**self).pan(value)
    }
}

/// Fixed set of voices handed out round-robin, so a fast track can retrigger
/// while earlier notes are still releasing.
pub struct VoicePool<V> {
    voices: Vec<V>,
    next_slot: usize,
}

impl<V: Voice> VoicePool<V> {
    pub fn new(voices: Vec<V>) -> Result<Self, ConfigError> {
        if voices.is_empty() {
            return Err(ConfigError::ZeroVoiceCapacity);
        }
        Ok(Self {
            voices,
            next_slot: 0,
        })
    }

    pub fn from_fn(capacity: usize, make_voice: impl FnMut(usize) -> V) -> Result<Self, ConfigError> {
        Self::new((0..capacity).map(make_voice).collect())
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn next_slot(&self) -> usize {
        self.next_slot
    }

    pub fn voices(&self) -> &[V] {
        &self.voices
    }

    pub fn play(&mut self, start_time: f32, sustain_time: f32, frequency: Option<f32>) {
        self.voices[self.next_slot].play(start_time, sustain_time, frequency);
        self.next_slot = (self.next_slot + 1) % self.voices.len();
    }

    pub fn start(&mut self) {
        for voice in &mut self.voices {
            voice.start();
        }
    }

    pub fn stop(&mut self) {
        for voice in &mut self.voices {
            voice.stop();
        }
    }

    pub fn pan(&mut self, value: f32) {
        for voice in &mut self.voices {
            voice.pan(value);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Voice;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Debug, PartialEq)]
    pub enum VoiceCall {
        Play { start: f32, sustain: f32, frequency: Option<f32> },
        Start,
        Stop,
        Pan(f32),
    }

    /// Records every call, tagged with the voice's slot, into a shared log.
    pub struct RecordingVoice {
        pub slot: usize,
        pub log: Rc<RefCell<Vec<(usize, VoiceCall)>>>,
    }

    impl Voice for RecordingVoice {
        fn play(&mut self, start: f32, sustain: f32, frequency: Option<f32>) {
            self.log.borrow_mut().push((self.slot, VoiceCall::Play { start, sustain, frequency }));
        }

        fn start(&mut self) {
            self.log.borrow_mut().push((self.slot, VoiceCall::Start));
        }

        fn stop(&mut self) {
            self.log.borrow_mut().push((self.slot, VoiceCall::Stop));
        }

        fn pan(&mut self, value: f32) {
            self.log.borrow_mut().push((self.slot, VoiceCall::Pan(value)));
        }
    }

    pub fn recording_voices(
        capacity: usize,
        log: &Rc<RefCell<Vec<(usize, VoiceCall)>>>,
    ) -> Vec<Box<dyn Voice>> {
        (0..capacity)
            .map(|slot| Box::new(RecordingVoice { slot, log: Rc::clone(log) }) as Box<dyn Voice>)
            .collect()
    }
}

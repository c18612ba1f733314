//! Named parallel voices
//!
//! A [`VoiceList`] keeps one [`EventSequence`] per voice, in the order the
//! voices were added. Window, merge and attribute operations apply to every
//! voice at once, so a whole score can be cut or annotated in one call.

use crate::errors::{IntervalError, SequenceError};
use crate::models::event::Event;
use crate::models::interval::Interval;
use crate::models::sequence::{EventSequence, Window};

/// One named part
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub name: String,
    pub events: EventSequence,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceList {
    voices: Vec<Voice>,
}

impl VoiceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Voice> {
        self.voices.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.voices.iter().map(|voice| voice.name.as_str()).collect()
    }

    pub fn voice(&self, name: &str) -> Option<&EventSequence> {
        self.voices
            .iter()
            .find(|voice| voice.name == name)
            .map(|voice| &voice.events)
    }

    pub fn voice_mut(&mut self, name: &str) -> Option<&mut EventSequence> {
        self.voices
            .iter_mut()
            .find(|voice| voice.name == name)
            .map(|voice| &mut voice.events)
    }

    /// Add a voice, or replace the events of an existing one in place.
    ///
    /// Returns the replaced events.
    pub fn insert(&mut self, name: impl Into<String>, events: EventSequence) -> Option<EventSequence> {
        let name = name.into();
        match self.voice_mut(&name) {
            Some(existing) => Some(std::mem::replace(existing, events)),
            None => {
                self.voices.push(Voice { name, events });
                None
            }
        }
    }

    fn require(&self, name: &str) -> Result<&EventSequence, SequenceError> {
        self.voice(name).ok_or_else(|| SequenceError::UnknownVoice {
            name: name.to_string(),
        })
    }

    /// The named voices, in the order given
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<VoiceList, SequenceError> {
        let mut selected = VoiceList::new();
        for name in names {
            let name = name.as_ref();
            selected.insert(name, self.require(name)?.clone());
        }
        Ok(selected)
    }

    /// Pick voices under new names, given as `(new name, source voice)` pairs
    pub fn select_as<N: AsRef<str>, S: AsRef<str>>(
        &self,
        mapping: &[(N, S)],
    ) -> Result<VoiceList, SequenceError> {
        let mut selected = VoiceList::new();
        for (name, source) in mapping {
            selected.insert(name.as_ref(), self.require(source.as_ref())?.clone());
        }
        Ok(selected)
    }

    /// [`EventSequence::get`] on every voice
    pub fn get(&self, window: impl Into<Window>) -> VoiceList {
        let window = window.into();
        VoiceList {
            voices: self
                .voices
                .iter()
                .map(|voice| Voice {
                    name: voice.name.clone(),
                    events: voice.events.get(window),
                })
                .collect(),
        }
    }

    /// [`EventSequence::slice`] on every voice
    pub fn slice(&self, window: Interval) -> Result<VoiceList, IntervalError> {
        let mut voices = Vec::with_capacity(self.voices.len());
        for voice in &self.voices {
            voices.push(Voice {
                name: voice.name.clone(),
                events: voice.events.slice(window)?,
            });
        }
        Ok(VoiceList { voices })
    }

    /// Merge `other` voice by voice.
    ///
    /// Voices only present in `other` are added at the end. Nothing changes
    /// unless every merge succeeds.
    pub fn extend(&mut self, other: VoiceList) -> Result<&mut Self, SequenceError> {
        let mut merged = self.clone();
        for voice in other.voices {
            match merged.voice_mut(&voice.name) {
                Some(events) => {
                    events.extend(voice.events)?;
                }
                None => {
                    log::debug!("Adding voice {} while merging", voice.name);
                    merged.voices.push(voice);
                }
            }
        }
        *self = merged;
        Ok(self)
    }

    /// Append an attribute to every note of every voice
    pub fn add_attr(&mut self, attr: &str) {
        for voice in &mut self.voices {
            voice.events.add_attr(attr);
        }
    }

    /// Insert a copy of `event` into every voice, e.g. a shared directive
    pub fn add_event(&mut self, event: Event) -> Result<&mut Self, SequenceError> {
        let mut updated = self.clone();
        for voice in &mut updated.voices {
            voice.events.insert(event.clone())?;
        }
        *self = updated;
        Ok(self)
    }
}

impl<'a> IntoIterator for &'a VoiceList {
    type Item = &'a Voice;
    type IntoIter = std::slice::Iter<'a, Voice>;

    fn into_iter(self) -> Self::IntoIter {
        self.voices.iter()
    }
}

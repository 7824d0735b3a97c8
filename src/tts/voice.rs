//! Language → voice resolution against the declared [`VoiceTable`].
//!
//! The table names a voice per language, either by position in the list of
//! available voices or by name.  Resolution never falls back: a reference
//! that does not match an available voice is a
//! [`TtsError::VoiceUnavailable`].

use crate::config::{VoiceRef, VoiceTable};
use crate::types::Language;

use super::TtsError;

/// The voice chosen for one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedVoice {
    /// Position in the available-voice list.
    pub index: usize,
    /// Voice identifier sent to the speech endpoint.
    pub name: String,
}

/// Pick the voice for `language` out of `available`.
///
/// ```
/// use smart_assistant::config::VoiceTable;
/// use smart_assistant::tts::resolve_voice;
/// use smart_assistant::types::Language;
///
/// let voices = vec!["alloy".to_string()];
/// let table = VoiceTable::default();
/// // English and Kiswahili share the first voice.
/// assert_eq!(resolve_voice(&table, &voices, Language::En).unwrap().index, 0);
/// assert_eq!(resolve_voice(&table, &voices, Language::Sw).unwrap().index, 0);
/// // French asks for the second voice, which does not exist here.
/// assert!(resolve_voice(&table, &voices, Language::Fr).is_err());
/// ```
pub fn resolve_voice(
    table: &VoiceTable,
    available: &[String],
    language: Language,
) -> Result<SelectedVoice, TtsError> {
    let unavailable = |requested: String| TtsError::VoiceUnavailable {
        language,
        requested,
        available: available.len(),
    };

    match table.get(language) {
        VoiceRef::Index(index) => available
            .get(*index)
            .map(|name| SelectedVoice {
                index: *index,
                name: name.clone(),
            })
            .ok_or_else(|| unavailable(format!("#{index}"))),
        VoiceRef::Name(wanted) => available
            .iter()
            .position(|v| v.eq_ignore_ascii_case(wanted))
            .map(|index| SelectedVoice {
                index,
                name: available[index].clone(),
            })
            .ok_or_else(|| unavailable(wanted.clone())),
    }
}

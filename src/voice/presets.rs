//! Character voice presets mapped onto Kokoro voice ids.

use clap::ValueEnum;
use serde::Serialize;

/// Perceived gender of a preset voice.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

/// Perceived age of a preset voice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeRange {
    Young,
    Adult,
    Old,
}

/// A named voice profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoicePreset {
    /// Preset key, e.g. `NARRATOR`.
    pub key: &'static str,
    /// Kokoro voice id sent to the model.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub gender: Gender,
    pub age_range: AgeRange,
    pub personality: &'static [&'static str],
}

const PRESETS: &[VoicePreset] = &[
    VoicePreset {
        key: "WARRIOR_DEEP",
        id: "af_bella",
        name: "Deep Warrior",
        description: "Deep, commanding voice for warriors and paladins",
        gender: Gender::Male,
        age_range: AgeRange::Adult,
        personality: &["brave", "strong", "trustworthy"],
    },
    VoicePreset {
        key: "WIZARD_OLD",
        id: "af_nicole",
        name: "Elder Wizard",
        description: "Wise, measured voice for seasoned wizards",
        gender: Gender::Male,
        age_range: AgeRange::Old,
        personality: &["wise", "mysterious", "patient"],
    },
    VoicePreset {
        key: "ROGUE_RASPY",
        id: "af_sarah",
        name: "Cunning Rogue",
        description: "Raspy, quick voice for rogues and assassins",
        gender: Gender::Male,
        age_range: AgeRange::Adult,
        personality: &["clever", "nimble", "sarcastic"],
    },
    VoicePreset {
        key: "BARD_CHARMING",
        id: "am_adam",
        name: "Charming Bard",
        description: "Enchanting, melodic voice",
        gender: Gender::Male,
        age_range: AgeRange::Young,
        personality: &["charismatic", "cheerful", "persuasive"],
    },
    VoicePreset {
        key: "CLERIC_SOFT",
        id: "af_sky",
        name: "Gentle Cleric",
        description: "Soft, comforting voice for clerics",
        gender: Gender::Female,
        age_range: AgeRange::Adult,
        personality: &["kind", "compassionate", "protective"],
    },
    VoicePreset {
        key: "RANGER_CONFIDENT",
        id: "bf_emma",
        name: "Confident Ranger",
        description: "Firm, determined voice",
        gender: Gender::Female,
        age_range: AgeRange::Adult,
        personality: &["determined", "independent", "brave"],
    },
    VoicePreset {
        key: "SORCERESS_MYSTICAL",
        id: "bf_isabella",
        name: "Mystic Sorceress",
        description: "Ethereal, powerful voice",
        gender: Gender::Female,
        age_range: AgeRange::Adult,
        personality: &["mysterious", "powerful", "enigmatic"],
    },
    VoicePreset {
        key: "NARRATOR",
        id: "am_michael",
        name: "Narrator",
        description: "Neutral, clear voice for narration",
        gender: Gender::Neutral,
        age_range: AgeRange::Adult,
        personality: &["neutral", "clear", "engaging"],
    },
    VoicePreset {
        key: "VILLAIN_MENACING",
        id: "bf_emma",
        name: "Menacing Villain",
        description: "Intimidating, dark voice",
        gender: Gender::Male,
        age_range: AgeRange::Adult,
        personality: &["menacing", "cruel", "intimidating"],
    },
    VoicePreset {
        key: "DRAGON",
        id: "bf_isabella",
        name: "Dragon",
        description: "Deep, majestic voice",
        gender: Gender::Neutral,
        age_range: AgeRange::Old,
        personality: &["majestic", "powerful", "ancient"],
    },
];

/// All presets in registry order.
pub fn all_voices() -> &'static [VoicePreset] {
    PRESETS
}

/// First preset using the given Kokoro voice id.
pub fn get_voice_by_id(id: &str) -> Option<&'static VoicePreset> {
    PRESETS.iter().find(|p| p.id == id)
}

/// Preset by key, ignoring case.
pub fn get_preset(key: &str) -> Option<&'static VoicePreset> {
    PRESETS.iter().find(|p| p.key.eq_ignore_ascii_case(key))
}

/// Presets of the given gender.
pub fn voices_by_gender(gender: Gender) -> Vec<&'static VoicePreset> {
    PRESETS.iter().filter(|p| p.gender == gender).collect()
}

/// Map a preset key to its voice id; anything else is passed through.
pub fn resolve_voice_id(input: &str) -> &str {
    match get_preset(input) {
        Some(preset) => preset.id,
        None => input,
    }
}

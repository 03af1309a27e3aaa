//! Named rate/volume presets
//!
//! All entries are fixed except the `custom` slot, which is overwritten with
//! whatever the user last dialed in manually.

/// A preset's baked-in rate/volume pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub rate: u32,
    pub volume: f32,
}

/// Preset applied when a name is unrecognized
pub const DEFAULT_PRESET: &str = "study";

/// Name of the mutable slot holding the user's manual adjustments
pub const CUSTOM_PRESET: &str = "custom";

const STUDY: Preset = Preset {
    rate: 175,
    volume: 1.0,
};
const PODCAST: Preset = Preset {
    rate: 190,
    volume: 1.0,
};
const RELAX: Preset = Preset {
    rate: 155,
    volume: 0.9,
};

pub struct PresetTable {
    custom: Preset,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetTable {
    pub fn new() -> Self {
        Self { custom: STUDY }
    }

    /// All preset names, in display order
    pub fn names() -> [&'static str; 4] {
        ["study", "podcast", "relax", CUSTOM_PRESET]
    }

    pub fn is_known(name: &str) -> bool {
        Self::names().contains(&name)
    }

    /// Look up a preset; unrecognized names fall back to `study`
    pub fn get(&self, name: &str) -> Preset {
        match name {
            "study" => STUDY,
            "podcast" => PODCAST,
            "relax" => RELAX,
            CUSTOM_PRESET => self.custom,
            _ => STUDY,
        }
    }

    /// Overwrite the `custom` slot with the latest manual adjustment
    pub fn set_custom(&mut self, rate: u32, volume: f32) {
        self.custom = Preset { rate, volume };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_presets_have_expected_values() {
        let table = PresetTable::new();
        assert_eq!(table.get("study"), Preset { rate: 175, volume: 1.0 });
        assert_eq!(table.get("podcast"), Preset { rate: 190, volume: 1.0 });
        assert_eq!(table.get("relax"), Preset { rate: 155, volume: 0.9 });
    }

    #[test]
    fn unknown_preset_falls_back_to_study() {
        let table = PresetTable::new();
        assert_eq!(table.get("does-not-exist"), table.get("study"));
        assert!(!PresetTable::is_known("does-not-exist"));
    }

    #[test]
    fn custom_slot_is_overwritten_not_appended() {
        let mut table = PresetTable::new();
        table.set_custom(240, 0.5);
        assert_eq!(table.get("custom"), Preset { rate: 240, volume: 0.5 });
        table.set_custom(130, 0.7);
        assert_eq!(table.get("custom"), Preset { rate: 130, volume: 0.7 });
    }
}

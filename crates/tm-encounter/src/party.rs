//! The party the encounter is being built for.

use serde::{Deserialize, Serialize};

use crate::error::{EncounterError, EncounterResult};
use crate::ports::SavedCharacter;

/// Party size and level, either entered by hand or taken from the user's
/// saved characters.
///
/// The manual values survive while the saved party is active, so switching
/// back restores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyConfig {
    size: u32,
    level: i32,
    saved: Option<SavedParty>,
}

/// Size and level read from a character list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedParty {
    /// Number of saved characters.
    pub size: u32,
    /// Level of the first saved character.
    pub level: i32,
}

impl SavedParty {
    /// Size is the number of characters; level is the first character's.
    pub fn from_characters(characters: &[SavedCharacter]) -> EncounterResult<Self> {
        let first = characters.first().ok_or(EncounterError::NoSavedCharacters)?;
        let size = u32::try_from(characters.len()).unwrap_or(u32::MAX);
        Ok(Self {
            size,
            level: first.level,
        })
    }
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            size: 4,
            level: 1,
            saved: None,
        }
    }
}

impl PartyConfig {
    /// A manual party. Size must be at least 1.
    pub fn new(size: u32, level: i32) -> EncounterResult<Self> {
        if size == 0 {
            return Err(EncounterError::InvalidPartySize(size));
        }
        Ok(Self {
            size,
            level,
            saved: None,
        })
    }

    /// Change the manual size. Zero is rejected and nothing changes.
    pub fn set_size(&mut self, size: u32) -> EncounterResult<()> {
        if size == 0 {
            return Err(EncounterError::InvalidPartySize(size));
        }
        self.size = size;
        Ok(())
    }

    /// Change the manual level.
    pub fn set_level(&mut self, level: i32) {
        self.level = level;
    }

    /// Take size and level from `characters`. An empty list is rejected and
    /// the party stays manual.
    pub fn use_saved(&mut self, characters: &[SavedCharacter]) -> EncounterResult<SavedParty> {
        let saved = SavedParty::from_characters(characters)?;
        self.saved = Some(saved);
        Ok(saved)
    }

    /// Go back to the manually entered values.
    pub fn use_manual(&mut self) {
        self.saved = None;
    }

    /// Whether size and level come from saved characters.
    pub fn is_using_saved(&self) -> bool {
        self.saved.is_some()
    }

    /// The manually entered size.
    pub fn manual_size(&self) -> u32 {
        self.size
    }

    /// The manually entered level.
    pub fn manual_level(&self) -> i32 {
        self.level
    }

    /// Size used for the budget.
    pub fn effective_size(&self) -> u32 {
        self.saved.map_or(self.size, |s| s.size)
    }

    /// Level used for earned XP.
    pub fn effective_level(&self) -> i32 {
        self.saved.map_or(self.level, |s| s.level)
    }
}

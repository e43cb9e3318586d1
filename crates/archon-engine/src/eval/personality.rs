//! Playing personalities: fixed weight sets applied to evaluation terms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Multipliers applied to individual evaluation terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalityWeights {
    pub material: f32,
    pub pawn_structure: f32,
    pub king_safety: f32,
    pub attack: f32,
}

/// A named playing style. Only evaluation weights change; search is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Normal,
    /// Favors king pressure and forward pieces over structure.
    Aggressive,
    /// Favors pawn structure and king shelter.
    Solid,
    /// Slightly undervalues material and attack.
    Gentle,
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::Normal,
        Personality::Aggressive,
        Personality::Solid,
        Personality::Gentle,
    ];

    /// Term weights for this personality.
    pub const fn weights(self) -> PersonalityWeights {
        match self {
            Personality::Normal => PersonalityWeights {
                material: 1.0,
                pawn_structure: 1.0,
                king_safety: 1.0,
                attack: 1.0,
            },
            Personality::Aggressive => PersonalityWeights {
                material: 1.0,
                pawn_structure: 0.7,
                king_safety: 0.8,
                attack: 1.4,
            },
            Personality::Solid => PersonalityWeights {
                material: 1.0,
                pawn_structure: 1.3,
                king_safety: 1.4,
                attack: 0.7,
            },
            Personality::Gentle => PersonalityWeights {
                material: 0.9,
                pawn_structure: 1.0,
                king_safety: 1.0,
                attack: 0.8,
            },
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Personality::Normal => "normal",
            Personality::Aggressive => "aggressive",
            Personality::Solid => "solid",
            Personality::Gentle => "gentle",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::Personality;

    #[test]
    fn normal_is_neutral() {
        let w = Personality::Normal.weights();
        assert_eq!(
            (w.material, w.pawn_structure, w.king_safety, w.attack),
            (1.0, 1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn aggressive_and_solid_pull_opposite_ways() {
        let a = Personality::Aggressive.weights();
        let s = Personality::Solid.weights();
        assert!(a.attack > 1.0 && s.attack < 1.0);
        assert!(s.king_safety > 1.0 && a.king_safety < 1.0);
        assert!(s.pawn_structure > a.pawn_structure);
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&Personality::Aggressive).unwrap();
        assert_eq!(json, "\"aggressive\"");
        let back: Personality = serde_json::from_str("\"solid\"").unwrap();
        assert_eq!(back, Personality::Solid);
        assert_eq!(Personality::Gentle.to_string(), "gentle");
    }
}

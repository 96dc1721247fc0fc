//! Intensity dials: pacing and the two tone axes.
//!
//! Hosts configure these by name ("Deliberate", "Rakish", ...). Each name maps
//! to a number the engine works with: escalation gained per turn for pacing,
//! an ordinal tone level for the tone axes.

use serde::{Deserialize, Serialize};

use crate::threshold::Threshold;

/// The two archetype-independent tone axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToneAxis {
    Sex,
    Violence,
}

/// How fast escalation accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Pacing {
    Glacial,
    Plodding,
    #[default]
    Deliberate,
    Brisk,
    Harrowing,
}

impl Pacing {
    pub const ALL: [Pacing; 5] = [
        Pacing::Glacial,
        Pacing::Plodding,
        Pacing::Deliberate,
        Pacing::Brisk,
        Pacing::Harrowing,
    ];

    /// Escalation gained per turn.
    pub fn rate(&self) -> Threshold {
        match self {
            Pacing::Glacial => 1,
            Pacing::Plodding => 3,
            Pacing::Deliberate => 5,
            Pacing::Brisk => 7,
            Pacing::Harrowing => 9,
        }
    }

    /// Name as configured by the host.
    pub fn name(&self) -> &'static str {
        match self {
            Pacing::Glacial => "Glacial",
            Pacing::Plodding => "Plodding",
            Pacing::Deliberate => "Deliberate",
            Pacing::Brisk => "Brisk",
            Pacing::Harrowing => "Harrowing",
        }
    }

    /// Look up a dial by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        match_name(&Self::ALL, name, Self::name)
    }
}

/// Sexual tone dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SexLevel {
    Chaste,
    #[default]
    Rakish,
    Debaucherous,
    Depraved,
}

impl SexLevel {
    pub const ALL: [SexLevel; 4] = [
        SexLevel::Chaste,
        SexLevel::Rakish,
        SexLevel::Debaucherous,
        SexLevel::Depraved,
    ];

    /// Ordinal used to key tone tables.
    pub fn level(&self) -> Threshold {
        match self {
            SexLevel::Chaste => 0,
            SexLevel::Rakish => 1,
            SexLevel::Debaucherous => 2,
            SexLevel::Depraved => 3,
        }
    }

    /// Name as configured by the host.
    pub fn name(&self) -> &'static str {
        match self {
            SexLevel::Chaste => "Chaste",
            SexLevel::Rakish => "Rakish",
            SexLevel::Debaucherous => "Debaucherous",
            SexLevel::Depraved => "Depraved",
        }
    }

    /// Look up a dial by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        match_name(&Self::ALL, name, Self::name)
    }
}

/// Violence tone dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ViolenceLevel {
    Nerf,
    #[default]
    Bloody,
    Gorey,
}

impl ViolenceLevel {
    pub const ALL: [ViolenceLevel; 3] = [
        ViolenceLevel::Nerf,
        ViolenceLevel::Bloody,
        ViolenceLevel::Gorey,
    ];

    /// Ordinal used to key tone tables.
    pub fn level(&self) -> Threshold {
        match self {
            ViolenceLevel::Nerf => 0,
            ViolenceLevel::Bloody => 1,
            ViolenceLevel::Gorey => 2,
        }
    }

    /// Name as configured by the host.
    pub fn name(&self) -> &'static str {
        match self {
            ViolenceLevel::Nerf => "Nerf",
            ViolenceLevel::Bloody => "Bloody",
            ViolenceLevel::Gorey => "Gorey",
        }
    }

    /// Look up a dial by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        match_name(&Self::ALL, name, Self::name)
    }
}

/// Names must match a table entry exactly; anything else is unknown.
fn match_name<T: Copy>(all: &[T], name: &str, name_of: fn(&T) -> &'static str) -> Option<T> {
    all.iter().find(|dial| name_of(dial) == name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacing_rates() {
        let rates: Vec<_> = Pacing::ALL.iter().map(Pacing::rate).collect();
        assert_eq!(rates, vec![1, 3, 5, 7, 9]);
        assert_eq!(Pacing::default().rate(), 5);
    }

    #[test]
    fn test_tone_levels() {
        assert_eq!(SexLevel::Chaste.level(), 0);
        assert_eq!(SexLevel::Depraved.level(), 3);
        assert_eq!(SexLevel::default(), SexLevel::Rakish);
        assert_eq!(ViolenceLevel::Gorey.level(), 2);
        assert_eq!(ViolenceLevel::default(), ViolenceLevel::Bloody);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Pacing::from_name("Brisk"), Some(Pacing::Brisk));
        assert_eq!(SexLevel::from_name("Chaste"), Some(SexLevel::Chaste));
        assert_eq!(ViolenceLevel::from_name("Gorey"), Some(ViolenceLevel::Gorey));
    }

    #[test]
    fn test_from_name_is_exact() {
        assert_eq!(Pacing::from_name("harrowing"), None);
        assert_eq!(SexLevel::from_name(" Chaste"), None);
        assert_eq!(ViolenceLevel::from_name("GOREY"), None);
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(Pacing::from_name("Ludicrous"), None);
        assert_eq!(SexLevel::from_name(""), None);
        assert_eq!(ViolenceLevel::from_name("Bloodier"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for pacing in Pacing::ALL {
            assert_eq!(Pacing::from_name(pacing.name()), Some(pacing));
        }
        for level in SexLevel::ALL {
            assert_eq!(SexLevel::from_name(level.name()), Some(level));
        }
        for level in ViolenceLevel::ALL {
            assert_eq!(ViolenceLevel::from_name(level.name()), Some(level));
        }
    }
}

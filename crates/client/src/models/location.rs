//! State, local government area and area hierarchy used by location pickers.

use serde::{Deserialize, Serialize};

/// A state and its local government areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRegion {
    pub name: String,
    #[serde(default)]
    pub lgas: Vec<Lga>,
}

/// A local government area and its towns/areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lga {
    pub name: String,
    #[serde(default)]
    pub areas: Vec<String>,
}

/// The full location directory returned by `GET /locations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationTree {
    pub states: Vec<StateRegion>,
}

impl LocationTree {
    /// Look up a state by name.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<&StateRegion> {
        self.states.iter().find(|state| state.name == name)
    }

    /// Look up an LGA within a state.
    #[must_use]
    pub fn lga(&self, state: &str, lga: &str) -> Option<&Lga> {
        self.state(state)?.lgas.iter().find(|l| l.name == lga)
    }
}

//! Profile location: state, then LGA, then area.

use std::sync::Arc;

use serde::Serialize;

use super::{Completion, FieldErrors, Flow, Step, Wizard};
use crate::http::Request;
use crate::models::LocationTree;
use crate::selection::{Cascade, Choice, SelectionError};

/// Steps of [`LocationFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationStep {
    State,
    Lga,
    Area,
}

impl LocationStep {
    const fn level(self) -> usize {
        match self {
            Self::State => 0,
            Self::Lga => 1,
            Self::Area => 2,
        }
    }

    const fn field(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Lga => "lga",
            Self::Area => "area",
        }
    }

    const fn prompt(self) -> &'static str {
        match self {
            Self::State => "choose a state",
            Self::Lga => "choose a local government area",
            Self::Area => "choose an area",
        }
    }
}

impl Step for LocationStep {
    const FIRST: Self = Self::State;

    fn next(self) -> Option<Self> {
        match self {
            Self::State => Some(Self::Lga),
            Self::Lga => Some(Self::Area),
            Self::Area => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            Self::State => None,
            Self::Lga => Some(Self::State),
            Self::Area => Some(Self::Lga),
        }
    }
}

/// The chosen state, LGA and area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationDraft {
    pub selection: Cascade<3>,
}

#[derive(Serialize)]
struct LocationBody<'a> {
    state: &'a str,
    lga: &'a str,
    area: &'a str,
}

/// Location picker over the loaded directory.
#[derive(Debug, Clone)]
pub struct LocationFlow {
    tree: Arc<LocationTree>,
}

impl LocationFlow {
    /// Create the flow.
    #[must_use]
    pub fn new(tree: LocationTree) -> Self {
        Self {
            tree: Arc::new(tree),
        }
    }

    /// The location directory.
    #[must_use]
    pub fn tree(&self) -> &LocationTree {
        &self.tree
    }
}

impl Flow for LocationFlow {
    type Step = LocationStep;
    type Fields = LocationDraft;

    const NAME: &'static str = "location";

    fn validate(&self, step: LocationStep, fields: &LocationDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if fields.selection.selected(step.level()).is_none() {
            errors.insert(step.field(), step.prompt());
        }
        errors
    }

    fn prepare(&self, fields: &LocationDraft) -> Result<Request, FieldErrors> {
        let pick = |step: LocationStep| fields.selection.selected(step.level()).unwrap_or_default();
        let body = LocationBody {
            state: pick(LocationStep::State),
            lga: pick(LocationStep::Lga),
            area: pick(LocationStep::Area),
        };
        Request::patch("/profile/location").json(&body).map_err(|e| {
            let mut errors = FieldErrors::new();
            errors.insert("location", e.to_string());
            errors
        })
    }

    fn completion(&self) -> Completion {
        Completion::Saved
    }
}

impl Wizard<LocationFlow> {
    /// Options for the current step.
    #[must_use]
    pub fn choices(&self) -> Vec<Choice> {
        self.fields
            .selection
            .options(self.flow.tree(), self.step.level())
    }

    /// Choose a value on the current step. Changing it clears later steps.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not offered on this step.
    pub fn choose(&mut self, name: &str) -> Result<(), SelectionError> {
        let level = self.step.level();
        self.update_with(|flow, draft| draft.selection.select(flow.tree(), level, name))
    }

    /// Swap in a reloaded directory, dropping choices it no longer offers.
    pub fn reload(&mut self, tree: LocationTree) -> bool {
        self.flow.tree = Arc::new(tree);
        self.fields.selection.prune(&*self.flow.tree)
    }
}

//! Witty analysis, overthinking scenarios, and their combined result.

use crate::MediaPayload;
use serde::{Deserialize, Serialize};

/// One evaluative section of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Primary take
    pub main: String,
    /// Contrarian take, present in the devil's-advocate variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devils_advocate: Option<String>,
}

impl Section {
    /// Section with only a primary take.
    pub fn plain(main: impl Into<String>) -> Self {
        Self {
            main: main.into(),
            devils_advocate: None,
        }
    }

    /// Section with a primary and a contrarian take.
    pub fn with_devils_advocate(main: impl Into<String>, devils_advocate: impl Into<String>) -> Self {
        Self {
            main: main.into(),
            devils_advocate: Some(devils_advocate.into()),
        }
    }

    /// True when a non-blank contrarian take is present.
    pub fn has_devils_advocate(&self) -> bool {
        self.devils_advocate
            .as_deref()
            .is_some_and(|take| !take.trim().is_empty())
    }
}

/// Three-part witty analysis of the events.
///
/// # Examples
///
/// ```
/// use overthink_core::{Analysis, Section};
///
/// let analysis = Analysis {
///     went_well: Section::plain("Nobody fell off the stage."),
///     could_have_gone_better: Section::plain("The coffee, mostly."),
///     conclusion: "A triumph of caffeine over dignity.".to_string(),
/// };
///
/// let json = serde_json::to_value(&analysis).unwrap();
/// assert_eq!(json["wentWell"]["main"], "Nobody fell off the stage.");
/// assert!(json["wentWell"].get("devilsAdvocate").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// What went well
    pub went_well: Section,
    /// What could have gone better
    pub could_have_gone_better: Section,
    /// The punchline, gated behind viewing both other sections
    pub conclusion: String,
}

impl Analysis {
    /// Section shown by the given panel.
    pub fn section(&self, panel: Panel) -> &Section {
        match panel {
            Panel::WentWell => &self.went_well,
            Panel::CouldHaveGoneBetter => &self.could_have_gone_better,
        }
    }
}

/// Input to the analysis flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    /// Newline-joined event text
    pub event_details: String,
    /// Optional outcome text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_details: Option<String>,
}

/// Evaluative panels of the analysis.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Panel {
    /// The "went well" panel
    #[display("wentWell")]
    WentWell,
    /// The "could have gone better" panel
    #[display("couldHaveGoneBetter")]
    CouldHaveGoneBetter,
}

/// Selects one entry of a [`ScenarioPair`].
///
/// # Examples
///
/// ```
/// use overthink_core::ScenarioKey;
///
/// let key: ScenarioKey = "scenario2".parse().unwrap();
/// assert_eq!(key, ScenarioKey::Scenario2);
/// assert_eq!(key.to_string(), "scenario2");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ScenarioKey {
    /// First scenario
    #[display("scenario1")]
    Scenario1,
    /// Second scenario
    #[display("scenario2")]
    Scenario2,
}

/// Two alternate "what if" scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPair {
    /// First scenario
    pub scenario1: String,
    /// Second scenario
    pub scenario2: String,
}

impl ScenarioPair {
    /// Scenario text for the key.
    pub fn get(&self, key: ScenarioKey) -> &str {
        match key {
            ScenarioKey::Scenario1 => &self.scenario1,
            ScenarioKey::Scenario2 => &self.scenario2,
        }
    }
}

/// Everything one `analyze` call returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullAnalysis {
    /// The analysis, flattened into the top level
    #[serde(flatten)]
    pub analysis: Analysis,
    /// Alternate scenarios
    pub overthinking_scenarios: ScenarioPair,
    /// Illustration of the "went well" section (eager images only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub went_well_image: Option<MediaPayload>,
    /// Illustration of the "could have gone better" section (eager images only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub could_have_gone_better_image: Option<MediaPayload>,
}

use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, MachineKind},
    error::{EngineError, EngineResult, InputError},
};

/// The machine as the editor saves it. Positions are layout data only and
/// carry no meaning for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineData {
    #[serde(default)]
    pub machine_type: Option<String>,
    #[serde(default)]
    pub start_state: Option<String>,
    #[serde(default)]
    pub states: Vec<StateData>,
    #[serde(default)]
    pub transitions: Vec<TransitionData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateData {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub is_accepting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionData {
    pub source_id: String,
    pub target_id: String,
    pub label: String,
    /// Label of the source state, echoed for human readers.
    #[serde(default)]
    pub source: Option<String>,
    /// Label of the target state, echoed for human readers.
    #[serde(default)]
    pub target: Option<String>,
}

impl MachineData {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn kind(&self) -> Result<MachineKind, InputError> {
        match &self.machine_type {
            Some(t) => t.parse(),
            None => Err(InputError::MissingMachineType),
        }
    }
}

impl TryFrom<&MachineData> for Automaton {
    type Error = EngineError;

    fn try_from(data: &MachineData) -> Result<Self, Self::Error> {
        let mut automaton = Automaton::new(data.kind()?);

        for state in &data.states {
            automaton.add_state(state.id.clone(), state.label.clone())?;
            if state.is_accepting {
                automaton.set_accepting(&state.id, true)?;
            }
        }

        for transition in &data.transitions {
            automaton.add_labeled_transition(
                &transition.source_id,
                &transition.target_id,
                &transition.label,
            )?;
        }

        if let Some(start) = &data.start_state {
            automaton.set_start(start)?;
        }

        Ok(automaton)
    }
}

impl TryFrom<MachineData> for Automaton {
    type Error = EngineError;

    fn try_from(data: MachineData) -> Result<Self, Self::Error> {
        Automaton::try_from(&data)
    }
}

impl From<&Automaton> for MachineData {
    fn from(automaton: &Automaton) -> Self {
        MachineData {
            machine_type: Some(automaton.kind().as_str().to_string()),
            start_state: automaton.start_state().map(|s| s.id.clone()),
            states: automaton
                .states()
                .map(|state| StateData {
                    id: state.id.clone(),
                    label: state.label.clone(),
                    x: 0.0,
                    y: 0.0,
                    is_accepting: state.accepting,
                })
                .collect(),
            transitions: automaton
                .transitions()
                .into_iter()
                .map(|t| TransitionData {
                    source_id: t.source.id.clone(),
                    target_id: t.target.id.clone(),
                    label: t.symbol.to_string(),
                    source: Some(t.source.label.clone()),
                    target: Some(t.target.label.clone()),
                })
                .collect(),
        }
    }
}

impl Automaton {
    /// Builds an automaton from the editor's JSON. Nothing partial is
    /// returned: any unknown reference or invariant violation fails the
    /// whole import.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Automaton::try_from(MachineData::from_json(json)?)
    }

    pub fn to_machine_data(&self) -> MachineData {
        MachineData::from(self)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        self.to_machine_data().to_json()
    }
}

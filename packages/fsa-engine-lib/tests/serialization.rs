use fsa_engine_lib::{
    automaton::{Automaton, MachineKind, serialization::MachineData, templates::Template},
    error::{EngineError, InputError, InvariantViolation, StructuralError},
    solver::simulate,
};

const EXAMPLE: &str = r#"{
    "machineType": "DFA",
    "startState": "q0",
    "states": [
        { "id": "q0", "label": "Start", "x": 100, "y": 150, "isAccepting": false },
        { "id": "q1", "label": "State 1", "x": 300, "y": 150, "isAccepting": false },
        { "id": "q2", "label": "Accept", "x": 500, "y": 150, "isAccepting": true }
    ],
    "transitions": [
        { "sourceId": "q0", "targetId": "q1", "label": "0",
          "source": "Start", "target": "State 1" },
        { "sourceId": "q1", "targetId": "q2", "label": "1",
          "source": "State 1", "target": "Accept" },
        { "sourceId": "q2", "targetId": "q0", "label": "0",
          "source": "Accept", "target": "Start" }
    ]
}"#;

#[test]
fn loads_the_editor_format() {
    let dfa = Automaton::from_json(EXAMPLE).unwrap();

    assert_eq!(dfa.kind(), MachineKind::Deterministic);
    assert_eq!(dfa.state_count(), 3);
    assert_eq!(dfa.transition_count(), 3);
    assert_eq!(dfa.start_state().unwrap().label, "Start");
    assert_eq!(dfa.accepting_states().count(), 1);

    let result = simulate(&dfa, "01").unwrap();
    assert_eq!(result.path, vec!["Start", "State 1", "Accept"]);
}

#[test]
fn export_keeps_structure_and_order() {
    let dfa = Automaton::from_json(EXAMPLE).unwrap();
    let data = dfa.to_machine_data();

    assert_eq!(data.machine_type.as_deref(), Some("DFA"));
    assert_eq!(data.start_state.as_deref(), Some("q0"));
    assert_eq!(
        data.states.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
        vec!["q0", "q1", "q2"]
    );
    assert_eq!(data.transitions[1].source.as_deref(), Some("State 1"));
    assert_eq!(data.transitions[1].target.as_deref(), Some("Accept"));

    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json["machineType"], "DFA");
    assert_eq!(json["states"][2]["isAccepting"], true);
    assert_eq!(json["transitions"][0]["sourceId"], "q0");

    let reloaded = Automaton::from_json(&dfa.to_json().unwrap()).unwrap();
    assert_eq!(reloaded.to_machine_data(), data);
}

#[test]
fn epsilon_is_written_as_the_greek_letter() {
    let mut nfa = Automaton::nondeterministic();
    nfa.add_state("q0", "q0").unwrap();
    nfa.add_labeled_transition("q0", "q0", "ε").unwrap();

    let json = nfa.to_json().unwrap();
    assert!(json.contains("\"label\": \"ε\""));
    assert!(json.contains("\"machineType\": \"NFA\""));
    assert!(json.contains("\"startState\": null"));
}

#[test]
fn machine_type_is_required() {
    let json = r#"{ "states": [], "transitions": [] }"#;
    assert_eq!(
        Automaton::from_json(json).unwrap_err(),
        EngineError::Input(InputError::MissingMachineType)
    );

    let json = r#"{ "machineType": "PDA", "states": [] }"#;
    assert_eq!(
        Automaton::from_json(json).unwrap_err(),
        EngineError::Input(InputError::UnknownMachineType("PDA".to_string()))
    );
}

#[test]
fn malformed_json_is_an_input_error() {
    let err = Automaton::from_json("{ not json").unwrap_err();
    assert!(err.is_input());
    assert!(matches!(err, EngineError::Input(InputError::Malformed(_))));

    let err = MachineData::from_json(r#"{ "machineType": "DFA", "states": [{ "label": "x" }] }"#)
        .unwrap_err();
    assert!(err.is_input());
}

#[test]
fn unknown_references_fail_the_import() {
    let json = r#"{
        "machineType": "NFA",
        "states": [{ "id": "q0", "label": "q0" }],
        "transitions": [{ "sourceId": "q0", "targetId": "q5", "label": "a" }]
    }"#;
    assert_eq!(
        Automaton::from_json(json).unwrap_err(),
        EngineError::Structural(StructuralError::UnknownState("q5".to_string()))
    );

    let json = r#"{ "machineType": "NFA", "startState": "nope", "states": [] }"#;
    assert!(Automaton::from_json(json).unwrap_err().is_structural());
}

#[test]
fn deterministic_payloads_are_checked() {
    let json = r#"{
        "machineType": "DFA",
        "states": [{ "id": "q0", "label": "q0" }],
        "transitions": [{ "sourceId": "q0", "targetId": "q0", "label": "ε" }]
    }"#;
    assert_eq!(
        Automaton::from_json(json).unwrap_err(),
        EngineError::Invariant(InvariantViolation::EpsilonOnDeterministic {
            state: "q0".to_string()
        })
    );

    let json = r#"{
        "machineType": "DFA",
        "states": [{ "id": "q0", "label": "q0" }, { "id": "q1", "label": "q1" }],
        "transitions": [
            { "sourceId": "q0", "targetId": "q0", "label": "a" },
            { "sourceId": "q0", "targetId": "q1", "label": "a" }
        ]
    }"#;
    assert!(Automaton::from_json(json).unwrap_err().is_invariant_violation());
}

#[test]
fn duplicate_state_ids_fail_the_import() {
    let json = r#"{
        "machineType": "NFA",
        "states": [{ "id": "q0", "label": "a" }, { "id": "q0", "label": "b" }]
    }"#;
    assert_eq!(
        Automaton::from_json(json).unwrap_err(),
        EngineError::Structural(StructuralError::DuplicateState("q0".to_string()))
    );
}

#[test]
fn templates_load_and_run() {
    let counter = Automaton::try_from(Template::BinaryCounter.machine_data()).unwrap();
    assert_eq!(counter.start_state().unwrap().id, "q0");
    assert!(simulate(&counter, "01").unwrap().is_accepted());
    assert!(simulate(&counter, "01001").unwrap().is_accepted());
    assert!(!simulate(&counter, "0").unwrap().is_accepted());

    let even = Automaton::try_from(Template::EvenNumberOfOnes.machine_data()).unwrap();
    for (input, expected) in [("", true), ("1", false), ("0110", true), ("10101", false)] {
        assert_eq!(simulate(&even, input).unwrap().is_accepted(), expected, "{}", input);
    }
}

#[test]
fn templates_are_found_by_name() {
    assert_eq!(Template::from_name("Binary Counter"), Some(Template::BinaryCounter));
    assert_eq!(Template::from_name("even-ones"), Some(Template::EvenNumberOfOnes));
    assert_eq!(Template::from_name(" EVEN NUMBER OF 1S "), Some(Template::EvenNumberOfOnes));
    assert_eq!(Template::from_name("odd"), None);
}

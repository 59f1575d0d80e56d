use fsa_engine_lib::{
    automaton::{Automaton, symbol::Symbol},
    error::{EngineError, InvariantViolation, StructuralError},
    solver::{Rejection, nfa_simulation::NondeterministicSimulator, simulate},
};

fn epsilon_then_a() -> Automaton {
    let mut nfa = Automaton::nondeterministic();
    nfa.add_state("q0", "q0").unwrap();
    nfa.add_state("q1", "q1").unwrap();
    nfa.add_state("q2", "q2").unwrap();
    nfa.set_start("q0").unwrap();
    nfa.set_accepting("q2", true).unwrap();

    nfa.add_transition("q0", "q1", Symbol::Epsilon).unwrap();
    nfa.add_transition("q1", "q2", 'a'.into()).unwrap();
    nfa
}

#[test]
fn follows_epsilon_before_reading() {
    let nfa = epsilon_then_a();
    let result = simulate(&nfa, "a").unwrap();

    assert!(result.is_accepted());
    assert_eq!(result.path, vec!["q0", "q1", "q2"]);
    assert_eq!(result.statistics().consumed, 1);
}

#[test]
fn rejection_has_empty_path() {
    let nfa = epsilon_then_a();

    for input in ["", "b", "aa", "ab"] {
        let result = simulate(&nfa, input).unwrap();
        assert!(!result.is_accepted(), "{}", input);
        assert_eq!(result.rejection(), Some(&Rejection::NoAcceptingPath));
        assert_eq!(result.message(), "Rejected: No accepting path found");
        assert!(result.path.is_empty());
    }
}

#[test]
fn epsilon_cycles_terminate() {
    let mut nfa = Automaton::nondeterministic();
    nfa.add_state("q0", "q0").unwrap();
    nfa.add_state("q1", "q1").unwrap();
    nfa.add_state("q2", "q2").unwrap();
    nfa.set_start("q0").unwrap();
    nfa.set_accepting("q2", true).unwrap();

    nfa.add_transition("q0", "q1", Symbol::Epsilon).unwrap();
    nfa.add_transition("q1", "q0", Symbol::Epsilon).unwrap();
    nfa.add_transition("q1", "q1", Symbol::Epsilon).unwrap();
    nfa.add_transition("q1", "q2", 'b'.into()).unwrap();

    let rejected = simulate(&nfa, "a").unwrap();
    assert!(!rejected.is_accepted());

    let too_long = simulate(&nfa, "bb").unwrap();
    assert!(!too_long.is_accepted());

    let accepted = simulate(&nfa, "b").unwrap();
    assert!(accepted.is_accepted());
    assert_eq!(accepted.path, vec!["q0", "q1", "q2"]);
}

#[test]
fn epsilon_cycle_can_be_reentered_after_reading() {
    // q0 <-ε-> q1, q1 -a-> q0, accepting q1
    let mut nfa = Automaton::nondeterministic();
    nfa.add_state("q0", "q0").unwrap();
    nfa.add_state("q1", "q1").unwrap();
    nfa.set_start("q0").unwrap();
    nfa.set_accepting("q1", true).unwrap();

    nfa.add_transition("q0", "q1", Symbol::Epsilon).unwrap();
    nfa.add_transition("q1", "q0", Symbol::Epsilon).unwrap();
    nfa.add_transition("q1", "q0", 'a'.into()).unwrap();

    let result = simulate(&nfa, "aa").unwrap();
    assert!(result.is_accepted());
    assert_eq!(result.path, vec!["q0", "q1", "q0", "q1", "q0", "q1"]);
}

#[test]
fn first_path_follows_stored_order() {
    let mut nfa = Automaton::nondeterministic();
    nfa.add_state("s", "s").unwrap();
    nfa.add_state("x", "x").unwrap();
    nfa.add_state("y", "y").unwrap();
    nfa.add_state("f", "f").unwrap();
    nfa.set_start("s").unwrap();
    nfa.set_accepting("f", true).unwrap();

    // epsilon to y is stored first, but symbol moves are tried before
    // epsilon moves
    nfa.add_transition("s", "y", Symbol::Epsilon).unwrap();
    nfa.add_transition("y", "f", 'a'.into()).unwrap();
    nfa.add_transition("s", "x", 'a'.into()).unwrap();
    nfa.add_transition("x", "f", Symbol::Epsilon).unwrap();

    let result = simulate(&nfa, "a").unwrap();
    assert!(result.is_accepted());
    assert_eq!(result.path, vec!["s", "x", "f"]);

    // among symbol moves, the first stored one wins
    let mut nfa = Automaton::nondeterministic();
    nfa.add_state("s", "s").unwrap();
    nfa.add_state("f1", "f1").unwrap();
    nfa.add_state("f2", "f2").unwrap();
    nfa.set_start("s").unwrap();
    nfa.set_accepting("f1", true).unwrap();
    nfa.set_accepting("f2", true).unwrap();
    nfa.add_transition("s", "f2", 'a'.into()).unwrap();
    nfa.add_transition("s", "f1", 'a'.into()).unwrap();

    let result = simulate(&nfa, "a").unwrap();
    assert_eq!(result.path, vec!["s", "f2"]);
}

#[test]
fn backtracks_out_of_dead_ends() {
    let mut nfa = Automaton::nondeterministic();
    nfa.add_state("s", "s").unwrap();
    nfa.add_state("dead", "dead").unwrap();
    nfa.add_state("mid", "mid").unwrap();
    nfa.add_state("f", "f").unwrap();
    nfa.set_start("s").unwrap();
    nfa.set_accepting("f", true).unwrap();

    nfa.add_transition("s", "dead", 'a'.into()).unwrap();
    nfa.add_transition("s", "mid", 'a'.into()).unwrap();
    nfa.add_transition("mid", "f", 'b'.into()).unwrap();

    let result = simulate(&nfa, "ab").unwrap();
    assert!(result.is_accepted());
    assert_eq!(result.path, vec!["s", "mid", "f"]);
    assert!(result.statistics().explored_configurations >= 3);
}

#[test]
fn empty_input_on_accepting_start() {
    let mut nfa = Automaton::nondeterministic();
    nfa.add_state("q0", "only").unwrap();
    nfa.set_start("q0").unwrap();
    nfa.set_accepting("q0", true).unwrap();

    let result = simulate(&nfa, "").unwrap();
    assert!(result.is_accepted());
    assert_eq!(result.path, vec!["only"]);
}

#[test]
fn missing_start_state_is_an_error() {
    let mut nfa = epsilon_then_a();
    nfa.clear_start();

    assert_eq!(
        simulate(&nfa, "a").unwrap_err(),
        EngineError::Structural(StructuralError::MissingStartState)
    );
}

#[test]
fn nondeterministic_simulator_requires_an_nfa() {
    let dfa = Automaton::deterministic();
    let err = NondeterministicSimulator::new(&dfa).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Invariant(InvariantViolation::KindMismatch { .. })
    ));
}

#[test]
fn runs_are_repeatable() {
    let nfa = epsilon_then_a();
    for input in ["a", "", "aa"] {
        assert_eq!(simulate(&nfa, input).unwrap(), simulate(&nfa, input).unwrap());
    }
}

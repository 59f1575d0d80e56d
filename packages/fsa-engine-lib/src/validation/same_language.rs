use itertools::{Itertools, repeat_n};

use crate::{automaton::Automaton, error::EngineResult, solver::simulate};

/// All words over the alphabet with length below `max_word_length`, shortest
/// first.
pub fn words_up_to(alphabet: &[char], max_word_length: usize) -> impl Iterator<Item = String> + '_ {
    let empty_word = (max_word_length > 0).then(String::new);

    empty_word.into_iter().chain((1..max_word_length).flat_map(move |i| {
        repeat_n(alphabet.iter(), i)
            .multi_cartesian_product()
            .map(|word| word.into_iter().collect::<String>())
    }))
}

/// The first word, up to a certain length, on which the two automata
/// disagree. The words are built from the union of both alphabets.
pub fn find_difference(
    a: &Automaton,
    b: &Automaton,
    max_word_length: usize,
) -> EngineResult<Option<String>> {
    let alphabet = a
        .alphabet()
        .into_iter()
        .chain(b.alphabet())
        .sorted()
        .dedup()
        .collect_vec();

    for word in words_up_to(&alphabet, max_word_length) {
        if simulate(a, &word)?.is_accepted() != simulate(b, &word)?.is_accepted() {
            return Ok(Some(word));
        }
    }

    Ok(None)
}

/// Checks if two automata accept the same words up to a certain length.
pub fn same_language(a: &Automaton, b: &Automaton, max_word_length: usize) -> EngineResult<bool> {
    Ok(find_difference(a, b, max_word_length)?.is_none())
}

pub fn assert_same_language(a: &Automaton, b: &Automaton, max_word_length: usize) {
    match find_difference(a, b, max_word_length) {
        Ok(None) => {}
        Ok(Some(word)) => panic!(
            "{:?} is accepted by exactly one of the automata. Thus their languages are not equal.",
            word
        ),
        Err(e) => panic!("failed to simulate: {}", e),
    }
}

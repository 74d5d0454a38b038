//! Property tests for the regex compiler and the equivalence engine.
//!
//! Regexes are generated as terms, rendered fully parenthesised, and the
//! compiled automaton is compared against a direct backtracking matcher on
//! every string over `{a, b}` up to a fixed length.

use formlang::{Nfa, Verdict, display, equivalent, normalise, regex_to_nfa};
use proptest::prelude::*;

const ALPHABET: &str = "ab";
const MAX_LEN: usize = 5;

#[derive(Debug, Clone)]
enum Term {
    Lit(char),
    Empty,
    Union(Box<Term>, Box<Term>),
    Concat(Box<Term>, Box<Term>),
    Star(Box<Term>),
    Plus(Box<Term>),
    Opt(Box<Term>),
    Rep(Box<Term>, u32),
}

impl Term {
    fn render(&self) -> String {
        match self {
            Term::Lit(c) => c.to_string(),
            Term::Empty => "()".into(),
            Term::Union(a, b) => format!("({}|{})", a.render(), b.render()),
            Term::Concat(a, b) => format!("({}{})", a.render(), b.render()),
            Term::Star(a) => format!("({})*", a.render()),
            Term::Plus(a) => format!("({})+", a.render()),
            Term::Opt(a) => format!("({})?", a.render()),
            Term::Rep(a, n) => format!("({})^{n}", a.render()),
        }
    }

    fn matches(&self, s: &[char]) -> bool {
        match self {
            Term::Lit(c) => s == [*c],
            Term::Empty => s.is_empty(),
            Term::Union(a, b) => a.matches(s) || b.matches(s),
            Term::Concat(a, b) => (0..=s.len()).any(|k| a.matches(&s[..k]) && b.matches(&s[k..])),
            Term::Star(a) => star_matches(a, s),
            Term::Plus(a) => (0..=s.len()).any(|k| a.matches(&s[..k]) && star_matches(a, &s[k..])),
            Term::Opt(a) => s.is_empty() || a.matches(s),
            Term::Rep(a, n) => rep_matches(a, *n, s),
        }
    }
}

fn star_matches(inner: &Term, s: &[char]) -> bool {
    s.is_empty() || (1..=s.len()).any(|k| inner.matches(&s[..k]) && star_matches(inner, &s[k..]))
}

fn rep_matches(inner: &Term, n: u32, s: &[char]) -> bool {
    if n == 0 {
        return s.is_empty();
    }
    (0..=s.len()).any(|k| inner.matches(&s[..k]) && rep_matches(inner, n - 1, &s[k..]))
}

fn arb_term() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![
        4 => prop::sample::select(vec!['a', 'b']).prop_map(Term::Lit),
        1 => Just(Term::Empty),
    ];
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Term::Union(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Term::Concat(Box::new(a), Box::new(b))),
            inner.clone().prop_map(|a| Term::Star(Box::new(a))),
            inner.clone().prop_map(|a| Term::Plus(Box::new(a))),
            inner.clone().prop_map(|a| Term::Opt(Box::new(a))),
            (inner, 0u32..3).prop_map(|(a, n)| Term::Rep(Box::new(a), n)),
        ]
    })
}

/// Every string over the alphabet up to `MAX_LEN`, shortest first and
/// lexicographic within a length.
fn words() -> Vec<String> {
    let mut words = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..MAX_LEN {
        frontier = frontier
            .iter()
            .flat_map(|w| ALPHABET.chars().map(move |c| format!("{w}{c}")))
            .collect();
        words.extend(frontier.iter().cloned());
    }
    words
}

fn compile(term: &Term) -> Nfa {
    regex_to_nfa(&term.render(), Some(ALPHABET)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn compiled_automaton_matches_reference(term in arb_term()) {
        let nfa = compile(&term);
        for word in words() {
            let chars: Vec<char> = word.chars().collect();
            prop_assert_eq!(
                nfa.accepts(&word),
                term.matches(&chars),
                "{} on \"{}\"",
                term.render(),
                word
            );
        }
    }

    #[test]
    fn equivalence_is_reflexive(term in arb_term()) {
        let nfa = compile(&term);
        prop_assert_eq!(equivalent(&nfa, &nfa), Verdict::Equal);

        let doubled = regex_to_nfa(&format!("{0}|{0}", term.render()), Some(ALPHABET)).unwrap();
        prop_assert_eq!(equivalent(&nfa, &doubled), Verdict::Equal);
    }

    #[test]
    fn counterexample_is_shortest_and_first(left in arb_term(), right in arb_term()) {
        let (lhs, rhs) = (compile(&left), compile(&right));
        let verdict = equivalent(&lhs, &rhs);
        let witness = verdict.counterexample().map(str::to_owned);
        if let Some(witness) = &witness {
            prop_assert_ne!(lhs.accepts(witness), rhs.accepts(witness));
        }
        for word in words() {
            if witness.as_ref() == Some(&word) {
                break;
            }
            prop_assert_eq!(
                lhs.accepts(&word),
                rhs.accepts(&word),
                "{} vs {} differ on \"{}\" before {:?}",
                left.render(),
                right.render(),
                word,
                witness
            );
        }
        prop_assert_eq!(equivalent(&rhs, &lhs), verdict);
    }

    #[test]
    fn normalise_is_idempotent(input in "[ab|∪ε*()]{0,12}") {
        let canonical = normalise(&input);
        prop_assert_eq!(normalise(&canonical), canonical.clone());
        prop_assert_eq!(normalise(&display(&canonical)), canonical);
    }
}

use proptest::prelude::*;

use super::captures::Span;
use super::compiler::compile;
use super::matcher::{MatchMode, Matcher};
use super::Nfa;
use crate::dfa::Dfa;
use crate::pattern::parse;

fn nfa(pattern: &str) -> Nfa {
    compile(&parse(pattern).expect("pattern should parse"))
}

fn ends(pattern: &str, subject: &str) -> Vec<isize> {
    ends_in(&nfa(pattern), subject, MatchMode::BestOnly)
}

fn ends_in(nfa: &Nfa, subject: &str, mode: MatchMode) -> Vec<isize> {
    Matcher::new(nfa)
        .search(subject, mode)
        .iter()
        .map(|m| m.end)
        .collect()
}

#[test]
fn class_plus_over_digits() {
    assert_eq!(ends("[0-3]+", "101234"), vec![0, 1, 2, 3, 4]);
}

#[test]
fn starred_alternation_matches_empty_first() {
    assert_eq!(ends("(a|(bc))*", "abc"), vec![-1, 0, 2]);
}

#[test]
fn alternation_with_empty_branch() {
    assert_eq!(
        ends("x[0-3]*|(a|(bc))*", "aabcbcbcaaabcb"),
        vec![-1, 0, 1, 3, 5, 7, 8, 9, 10, 12]
    );
}

#[test]
fn star_on_empty_input() {
    assert_eq!(ends("a*", ""), vec![-1]);
}

#[test]
fn dot_star_branch_extends_the_match() {
    assert_eq!(ends(".*x|(a|(bc))*", "abcqbcbcxx"), vec![-1, 0, 2, 8, 9]);
}

#[test]
fn optional_then_required() {
    assert_eq!(ends("c?c", "c"), vec![0]);
}

#[test]
fn optional_chain_needs_every_char() {
    let pattern = format!("{}{}", "c?".repeat(20), "c".repeat(20));
    assert_eq!(ends(&pattern, &"c".repeat(20)), vec![19]);
}

#[test]
fn long_optional_chain_runs_in_polynomial_time() {
    // Exponential for a backtracking matcher.
    let n = 100;
    let pattern = format!("{}{}", "c?".repeat(n), "c".repeat(n));
    assert_eq!(ends(&pattern, &"c".repeat(n)), vec![n as isize - 1]);
}

#[test]
fn url_captures() {
    let subject = "https://ddg.gg/search/?q=regular%20expressions";
    let nfa = nfa("^https?://([^/]+)(/(.*))?");
    assert_eq!(nfa.group_count(), 4);

    let found = Matcher::new(&nfa).search(subject, MatchMode::BestOnly);
    let longest = found.last().expect("url should match");
    let text = |group| longest.captures.get(group).map(|s: Span| s.extract(subject));

    assert_eq!(longest.end, subject.chars().count() as isize - 1);
    assert_eq!(text(0), Some(subject));
    assert_eq!(text(1), Some("ddg.gg"));
    assert_eq!(text(2), Some("/search/?q=regular%20expressions"));
    assert_eq!(text(3), Some("search/?q=regular%20expressions"));
}

#[test]
fn right_anchored_group_zero_spans_input() {
    let subject = "abba";
    let found = Matcher::new(&nfa("(a|b)*$")).search(subject, MatchMode::BestOnly);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].captures.get(0), Some(Span { start: -1, end: 3 }));
    assert_eq!(found[0].span().extract(subject), subject);
}

#[test]
fn empty_pattern_matches_at_every_position() {
    let nfa = nfa("");
    for mode in [MatchMode::BestOnly, MatchMode::Exhaustive] {
        assert_eq!(ends_in(&nfa, "abc", mode), vec![-1, 0, 1, 2]);
        assert_eq!(ends_in(&nfa, "", mode), vec![-1]);
    }
    let starts: Vec<_> = Matcher::new(&nfa)
        .search("abc", MatchMode::BestOnly)
        .iter()
        .map(|m| m.start())
        .collect();
    assert_eq!(starts, vec![-1, 0, 1, 2]);
}

#[test]
fn nullable_unanchored_body_matches_before_input() {
    assert_eq!(ends("x*", "abc"), vec![-1, 0, 1, 2]);
    assert_eq!(ends("x*", ""), vec![-1]);
}

#[test]
fn separate_matches_with_different_starts() {
    let subject = "abxc";
    let found = Matcher::new(&nfa("ab|c")).search(subject, MatchMode::BestOnly);
    let texts: Vec<_> = found.iter().map(|m| m.span().extract(subject)).collect();
    assert_eq!(texts, vec!["ab", "c"]);
}

#[test]
fn exhaustive_reports_overlapping_starts() {
    let nfa = nfa("a+");
    let found = Matcher::new(&nfa).search("aaa", MatchMode::Exhaustive);
    let at_end: Vec<_> = found.iter().filter(|m| m.end == 2).map(|m| m.start()).collect();
    assert_eq!(at_end, vec![-1, 0, 1]);
    assert_eq!(ends_in(&nfa, "aaa", MatchMode::BestOnly), vec![0, 1, 2]);
}

#[test]
fn searches_are_deterministic() {
    let nfa = nfa("(a|ab)(c|bcd)(d*)");
    let matcher = Matcher::new(&nfa);
    let first = matcher.search("abcd", MatchMode::BestOnly);
    for _ in 0..10 {
        assert_eq!(matcher.search("abcd", MatchMode::BestOnly), first);
    }
}

#[test]
fn subset_construction_does_not_disturb_later_searches() {
    let nfa = nfa("(a|(bc))*d");
    let before = Matcher::new(&nfa).search("abcbcd", MatchMode::BestOnly);
    let dfa = Dfa::from_nfa(&nfa);
    assert!(dfa.accepts("abcbcd"));
    let after = Matcher::new(&nfa).search("abcbcd", MatchMode::BestOnly);
    assert_eq!(before, after);
    assert_eq!(after.len(), 1);
}

#[test]
fn repeated_group_keeps_last_iteration() {
    let subject = "abcbca";
    let found = Matcher::new(&nfa("^(a|(bc))*")).search(subject, MatchMode::BestOnly);
    let longest = found.last().unwrap();
    assert_eq!(longest.end, 5);
    assert_eq!(longest.captures.get(1).unwrap().extract(subject), "a");
    assert_eq!(longest.captures.get(2).unwrap().extract(subject), "bc");
}

#[test]
fn whitespace_classes() {
    assert_eq!(ends(r"a\sb", "xa\tb"), vec![3]);
    assert_eq!(ends(r"^\S+", "ab c"), vec![0, 1]);
    assert_eq!(ends(r"^a\sb", "a\0b"), vec![2]);
    assert!(ends(r"^\S", "\0").is_empty());
}

#[test]
fn dot_does_not_cross_newlines() {
    assert!(ends("^a.b", "a\nb").is_empty());
    // The unanchored prefix is a `.*` too, so no match starts past a newline.
    assert!(ends("b", "a\nb").is_empty());
    assert_eq!(ends("b", "ab\nb"), vec![1]);
}

#[test]
#[should_panic(expected = "empty automaton")]
fn searching_the_empty_automaton_panics() {
    Matcher::new(&Nfa::default()).search("a", MatchMode::BestOnly);
}

fn arb_pattern() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("c".to_string()),
        Just(".".to_string()),
        Just("[ab]".to_string()),
        Just("[^a]".to_string()),
        Just(r"\s".to_string()),
    ];
    let body = leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(lhs, rhs)| format!("{lhs}{rhs}")),
            (inner.clone(), inner.clone()).prop_map(|(lhs, rhs)| format!("({lhs}|{rhs})")),
            (inner, prop::sample::select(vec!["", "*", "+", "?"]))
                .prop_map(|(expr, quantifier)| format!("({expr}){quantifier}")),
        ]
    });
    (any::<bool>(), body, any::<bool>()).prop_map(|(left, body, right)| {
        format!(
            "{}{body}{}",
            if left { "^" } else { "" },
            if right { "$" } else { "" }
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn nfa_and_dfa_agree_on_whole_strings(
        pattern in arb_pattern(),
        subject in "[abc \n]{0,8}"
    ) {
        let nfa = nfa(&pattern);
        let last = subject.chars().count() as isize - 1;
        let nfa_accepts = ends_in(&nfa, &subject, MatchMode::Exhaustive).last() == Some(&last);
        prop_assert_eq!(Dfa::from_nfa(&nfa).accepts(&subject), nfa_accepts);
    }

    #[test]
    fn captures_never_end_before_they_start(
        pattern in arb_pattern(),
        subject in "[abc \n]{0,8}"
    ) {
        let nfa = nfa(&pattern);
        for mode in [MatchMode::BestOnly, MatchMode::Exhaustive] {
            for found in Matcher::new(&nfa).search(&subject, mode) {
                for span in found.captures.iter().flatten() {
                    prop_assert!(span.start <= span.end);
                    prop_assert!(span.start >= -1 && span.end <= found.end);
                }
                prop_assert_eq!(found.captures.get(0).map(|s| s.end), Some(found.end));
            }
        }
    }

    #[test]
    fn best_only_is_deterministic(
        pattern in arb_pattern(),
        subject in "[abc]{0,8}"
    ) {
        let nfa = nfa(&pattern);
        let matcher = Matcher::new(&nfa);
        prop_assert_eq!(
            matcher.search(&subject, MatchMode::BestOnly),
            matcher.search(&subject, MatchMode::BestOnly)
        );
    }
}

// tests for crisis keyword triage

use arogya::{CRITICAL_RESPONSE, Safety};

#[test]
fn plain_message_is_normal() {
    let safety = Safety::check("hello, I have a question about my diet");
    assert!(!safety.is_critical);
    assert!(safety.matched.is_none());
}

#[test]
fn health_question_is_normal() {
    let safety = Safety::check("What foods help with diabetes?");
    assert!(!safety.is_critical);
}

#[test]
fn crisis_phrase_is_critical() {
    let safety = Safety::check("I think I am having a heart attack");
    assert!(safety.is_critical);
}

#[test]
fn matching_is_case_insensitive() {
    let safety = Safety::check("SEVERE CHEST PAIN");
    assert!(safety.is_critical);
}

#[test]
fn phrase_inside_a_longer_sentence() {
    let safety = Safety::check("my father is unconscious on the floor right now");
    assert!(safety.is_critical);
}

#[test]
fn reports_the_matched_keyword() {
    let safety = Safety::check("he swallowed rat poison");
    assert!(safety.is_critical);
    assert_eq!(safety.matched, Some("poison"));
}

#[test]
fn matching_is_literal_only() {
    // no apostrophe means no match, the list is deliberately literal
    let safety = Safety::check("I cant breathe well when I run");
    assert!(!safety.is_critical);
}

#[test]
fn emergency_response_points_to_emergency_services() {
    assert!(CRITICAL_RESPONSE.contains("108"));
    assert!(CRITICAL_RESPONSE.contains("not a substitute"));
}

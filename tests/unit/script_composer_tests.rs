/*!
 * Tests for narration scripts
 */

use localgen::providers::mock::MockLoader;
use localgen::script_composer::{
    script_instruction, template_script, ScriptComposer, MAX_SENTENCES, MIN_SENTENCES, SCRIPT_MAX_TOKENS,
};
use crate::common;

/// Test the sentence clamp
#[test]
fn test_template_script_withVariousCounts_shouldClampSentences() {
    assert_eq!(common::sentence_count(&template_script("jardinage", 2)), MIN_SENTENCES);
    assert_eq!(common::sentence_count(&template_script("jardinage", -4)), MIN_SENTENCES);
    assert_eq!(common::sentence_count(&template_script("jardinage", 5)), 5);
    assert_eq!(common::sentence_count(&template_script("jardinage", 10)), MAX_SENTENCES);
    assert_eq!(common::sentence_count(&template_script("jardinage", 1_000)), MAX_SENTENCES);
}

/// Test that the subject appears in the first sentence only
#[test]
fn test_template_script_shouldMentionSubjectFirst() {
    let script = template_script("jardinage", 4);
    assert!(script.starts_with("Aujourd'hui on parle de jardinage."));
    assert_eq!(script.matches("jardinage").count(), 1);
    assert_eq!(
        script,
        "Aujourd'hui on parle de jardinage. \
         Commence par définir un objectif simple et mesurable. \
         Ensuite, applique une méthode répétable chaque jour. \
         Évite de compliquer les premières étapes."
    );
}

/// Test the instruction sent to the model
#[test]
fn test_script_instruction_shouldNameSubjectLanguageAndCount() {
    let instruction = script_instruction("jardinage", 6, "fr");
    assert!(instruction.contains("jardinage"));
    assert!(instruction.contains("French"));
    assert!(instruction.contains("(fr)"));
    assert!(instruction.contains("exactly 6 sentences"));

    // Unknown codes are passed through as-is
    assert!(script_instruction("x", 3, "zz-custom").contains("zz-custom"));
}

/// Test that model output is returned verbatim
#[test]
fn test_compose_withWorkingBackend_shouldReturnModelOutput() {
    let loader = MockLoader::working("Une seule phrase du modèle.");
    let composer = ScriptComposer::new(common::mock_gateway(&loader));

    assert_eq!(composer.compose("jardinage", 8, "fr"), "Une seule phrase du modèle.");
    assert_eq!(loader.params()[0].max_new_tokens, SCRIPT_MAX_TOKENS);
}

/// Test the template fallback
#[test]
fn test_compose_withFailingBackend_shouldUseTemplate() {
    let loader = MockLoader::failing_load();
    let composer = ScriptComposer::new(common::mock_gateway(&loader));

    assert_eq!(composer.compose("jardinage", 2, "fr"), template_script("jardinage", 3));
    assert_eq!(composer.compose("cuisine", 7, "fr"), template_script("cuisine", 7));
    assert_eq!(loader.load_count(), 1);
}

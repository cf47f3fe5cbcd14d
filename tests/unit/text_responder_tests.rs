/*!
 * Tests for prompt classification and template replies
 */

use localgen::providers::mock::MockLoader;
use localgen::text_responder::{
    classify, template_response, GenerationRequest, PromptCategory, TextResponder, GENERIC_MAX_CHARS,
    RESPONSE_MAX_TOKENS, TITLE_MAX_CHARS,
};
use crate::common;

fn reply(prompt: &str, niche: &str) -> String {
    template_response(&GenerationRequest::new(prompt, niche, "fr"))
}

/// Test classification markers, case-insensitively
#[test]
fn test_classify_withMarkers_shouldDetectCategory() {
    assert_eq!(classify("Generate a YouTube Video Title about cooking"), Some(PromptCategory::Title));
    assert_eq!(classify("Write a video description"), Some(PromptCategory::Description));
    assert_eq!(classify("Write a TWITTER POST"), Some(PromptCategory::SocialPost));
    assert_eq!(classify("Give me a specific video idea"), Some(PromptCategory::Idea));
    assert_eq!(classify("Pick a topic"), Some(PromptCategory::Idea));
    assert_eq!(classify("Generate 5 image prompts"), Some(PromptCategory::ImagePrompts));
    assert_eq!(classify("Bonjour"), None);
}

/// Test that the title rule wins over the idea rule
#[test]
fn test_classify_withTitleAndTopic_shouldPreferTitle() {
    assert_eq!(
        classify("Generate a youtube video title for this topic"),
        Some(PromptCategory::Title)
    );
    assert_eq!(
        classify("topic list as image prompts"),
        Some(PromptCategory::Idea)
    );
}

/// Test the title template
#[test]
fn test_template_response_withTitlePrompt_shouldFormatTitle() {
    let title = reply("Generate a YouTube video title", "cuisine");
    assert_eq!(title, "Cuisine : astuces rapides #fr #shorts");
    assert!(title.chars().count() <= TITLE_MAX_CHARS);
}

/// Test that long titles are truncated to the limit
#[test]
fn test_template_response_withLongNiche_shouldTruncateTitle() {
    let niche = "pâtisserie ".repeat(20);
    let title = reply("youtube video title", &niche);
    assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
    assert!(title.starts_with("Pâtisserie Pâtisserie"));
}

/// Test the description, post and idea templates
#[test]
fn test_template_response_withOtherCategories_shouldInterpolateNiche() {
    assert_eq!(
        reply("video description please", "jardinage"),
        "Vidéo générée localement sur jardinage. Donne ton avis en commentaire."
    );
    assert_eq!(
        reply("twitter post", "jardinage"),
        "Astuce rapide sur jardinage: commence petit, reste régulier, mesure tes progrès."
    );
    assert_eq!(
        reply("specific video idea", "jardinage"),
        "3 erreurs fréquentes en jardinage et comment les éviter facilement."
    );
}

/// Test that image prompts form a parseable list of five
#[test]
fn test_template_response_withImagePrompts_shouldReturnJsonList() {
    let text = reply("Generate image prompts", "l'\"art\"");
    let prompts: Vec<String> = serde_json::from_str(&text).unwrap();

    assert_eq!(prompts.len(), 5);
    assert!(prompts.iter().all(|p| p.contains("l'\"art\"")));
    assert!(text.starts_with("[\"Illustration cinématique de"));
}

/// Test the generic fallback
#[test]
fn test_template_response_withUnknownPrompt_shouldCollapseAndTruncate() {
    assert_eq!(reply("  Bonjour \n\t tout   le monde ", "x"), "Bonjour tout le monde");
    assert_eq!(reply("", "x"), "");
    assert_eq!(reply(" \n\t ", "x"), "");

    let long = "mot ".repeat(100);
    let text = reply(&long, "x");
    assert_eq!(text.chars().count(), GENERIC_MAX_CHARS);
}

/// Test that model output is preferred when available
#[test]
fn test_respond_withWorkingBackend_shouldReturnModelOutput() {
    let loader = MockLoader::working("Titre du modèle");
    let responder = TextResponder::new(common::mock_gateway(&loader));

    assert_eq!(responder.respond("youtube video title", "cuisine", "fr"), "Titre du modèle");
    assert_eq!(loader.params()[0].max_new_tokens, RESPONSE_MAX_TOKENS);
}

/// Test fallback to templates when the backend cannot load
#[test]
fn test_respond_withFailingBackend_shouldUseTemplates() {
    let loader = MockLoader::failing_load();
    let responder = TextResponder::new(common::mock_gateway(&loader));

    assert_eq!(
        responder.respond("youtube video title", "cuisine", "fr"),
        "Cuisine : astuces rapides #fr #shorts"
    );
    assert_eq!(
        responder.respond("twitter post", "cuisine", "fr"),
        "Astuce rapide sur cuisine: commence petit, reste régulier, mesure tes progrès."
    );
    assert_eq!(loader.load_count(), 1);
}

/// Test templates-only responder
#[test]
fn test_respond_withTemplatesGateway_shouldBeDeterministic() {
    let responder = TextResponder::new(common::templates_gateway());
    let first = responder.respond("video description", "cuisine", "fr");
    let second = responder.respond("video description", "cuisine", "fr");
    assert_eq!(first, second);
}

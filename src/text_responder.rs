/*!
 * Replies to structured content prompts.
 *
 * The neural backend gets the first chance to answer. Without it, the prompt
 * is classified against an ordered rule table and answered from a template.
 * Rule order is part of the contract: the title rule must be checked before
 * the looser idea rule, whose `"topic"` marker also appears in title prompts.
 */

use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::gateway::ModelGateway;

/// Token budget for replies
pub const RESPONSE_MAX_TOKENS: u32 = 80;

/// Maximum length of a title reply, in characters
pub const TITLE_MAX_CHARS: usize = 95;

/// Maximum length of an unclassified reply, in characters
pub const GENERIC_MAX_CHARS: usize = 240;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Kind of content a prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptCategory {
    Title,
    Description,
    SocialPost,
    Idea,
    ImagePrompts,
}

/// One content request, with its category inferred from the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub category: Option<PromptCategory>,
    pub niche: String,
    pub language: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, niche: impl Into<String>, language: impl Into<String>) -> Self {
        let prompt = prompt.into();
        Self {
            category: classify(&prompt),
            prompt,
            niche: niche.into(),
            language: language.into(),
        }
    }
}

/// A classification rule: any marker matches, then the template renders
struct Rule {
    category: PromptCategory,
    markers: &'static [&'static str],
    template: fn(&GenerationRequest) -> String,
}

static RULES: &[Rule] = &[
    Rule {
        category: PromptCategory::Title,
        markers: &["youtube video title"],
        template: title_template,
    },
    Rule {
        category: PromptCategory::Description,
        markers: &["video description"],
        template: description_template,
    },
    Rule {
        category: PromptCategory::SocialPost,
        markers: &["twitter post"],
        template: social_post_template,
    },
    Rule {
        category: PromptCategory::Idea,
        markers: &["specific video idea", "topic"],
        template: idea_template,
    },
    Rule {
        category: PromptCategory::ImagePrompts,
        markers: &["image prompts"],
        template: image_prompts_template,
    },
];

/// Category of a prompt, first matching rule wins
pub fn classify(prompt: &str) -> Option<PromptCategory> {
    find_rule(prompt).map(|rule| rule.category)
}

fn find_rule(prompt: &str) -> Option<&'static Rule> {
    let low = prompt.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.markers.iter().any(|marker| low.contains(marker)))
}

/// Produces replies for content prompts
#[derive(Debug, Clone)]
pub struct TextResponder {
    gateway: Arc<ModelGateway>,
}

impl TextResponder {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Reply to `prompt`, never failing
    pub fn respond(&self, prompt: &str, niche: &str, language: &str) -> String {
        if let Some(reply) = self.gateway.generate(prompt, RESPONSE_MAX_TOKENS) {
            return reply;
        }
        template_response(&GenerationRequest::new(prompt, niche, language))
    }
}

/// Deterministic reply for a request
pub fn template_response(request: &GenerationRequest) -> String {
    match find_rule(&request.prompt) {
        Some(rule) => {
            debug!("Answering {:?} prompt from template", rule.category);
            (rule.template)(request)
        }
        None => {
            let clean = WHITESPACE_RUN.replace_all(&request.prompt, " ");
            truncate_chars(clean.trim(), GENERIC_MAX_CHARS)
        }
    }
}

fn title_template(request: &GenerationRequest) -> String {
    let title = format!(
        "{} : astuces rapides #{} #shorts",
        title_case(&request.niche),
        request.language
    );
    truncate_chars(&title, TITLE_MAX_CHARS)
}

fn description_template(request: &GenerationRequest) -> String {
    format!(
        "Vidéo générée localement sur {}. Donne ton avis en commentaire.",
        request.niche
    )
}

fn social_post_template(request: &GenerationRequest) -> String {
    format!(
        "Astuce rapide sur {}: commence petit, reste régulier, mesure tes progrès.",
        request.niche
    )
}

fn idea_template(request: &GenerationRequest) -> String {
    format!(
        "3 erreurs fréquentes en {} et comment les éviter facilement.",
        request.niche
    )
}

fn image_prompts_template(request: &GenerationRequest) -> String {
    let niche = &request.niche;
    let prompts = [
        format!("Illustration cinématique de {}, lumière naturelle, plan détaillé", niche),
        format!("Scène pédagogique sur {}, ambiance chaleureuse, style réaliste", niche),
        format!("Visuel vertical créatif lié à {}, couleurs contrastées", niche),
        format!("Infographie visuelle de {}, composition claire", niche),
        format!("Mise en situation moderne autour de {}, rendu propre", niche),
    ];

    let quoted: Vec<String> = prompts
        .iter()
        .map(|p| serde_json::Value::String(p.clone()).to_string())
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Upper-case the first letter of every word, lower-case the rest
///
/// A word starts after any character that is not alphabetic, so `l'art`
/// becomes `L'Art`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// First `max` characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

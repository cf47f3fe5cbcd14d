use std::sync::Arc;

use log::debug;

use crate::gateway::ModelGateway;
use crate::language_utils;

// @module: Narration script generation

/// Token budget for scripts
pub const SCRIPT_MAX_TOKENS: u32 = 140;

/// Fewest sentences a template script contains
pub const MIN_SENTENCES: usize = 3;

/// Canonical template script; the subject is spliced into the first sentence
const TEMPLATE_SENTENCES: [&str; 10] = [
    "Aujourd'hui on parle de {subject}.",
    "Commence par définir un objectif simple et mesurable.",
    "Ensuite, applique une méthode répétable chaque jour.",
    "Évite de compliquer les premières étapes.",
    "Teste rapidement puis corrige ce qui bloque.",
    "Observe les résultats et note ce qui fonctionne.",
    "Automatise les actions utiles dès que possible.",
    "Avec de la constance, les progrès deviennent visibles.",
    "Reste patient et améliore un détail à la fois.",
    "Tu peux démarrer maintenant avec les ressources locales.",
];

/// Most sentences a template script contains
pub const MAX_SENTENCES: usize = TEMPLATE_SENTENCES.len();

/// Produces narration scripts
#[derive(Debug, Clone)]
pub struct ScriptComposer {
    gateway: Arc<ModelGateway>,
}

impl ScriptComposer {
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Compose a script about `subject`
    ///
    /// Model output is returned as-is, without enforcing `sentence_count`.
    pub fn compose(&self, subject: &str, sentence_count: i64, language: &str) -> String {
        let instruction = script_instruction(subject, sentence_count, language);
        if let Some(script) = self.gateway.generate(&instruction, SCRIPT_MAX_TOKENS) {
            return script;
        }

        debug!("Composing template script for '{}'", subject);
        template_script(subject, sentence_count)
    }
}

/// Prompt sent to the neural backend
pub fn script_instruction(subject: &str, sentence_count: i64, language: &str) -> String {
    format!(
        "Write a short video narration script about {} in {} ({}). \
         Use exactly {} sentences. Return only the script text, without title, \
         markdown or stage directions.",
        subject,
        language_utils::display_name(language),
        language,
        sentence_count
    )
}

/// First `clamp(sentence_count, 3, 10)` template sentences joined by spaces
pub fn template_script(subject: &str, sentence_count: i64) -> String {
    let count = sentence_count.clamp(MIN_SENTENCES as i64, MAX_SENTENCES as i64) as usize;

    TEMPLATE_SENTENCES
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, sentence)| {
            if i == 0 {
                sentence.replace("{subject}", subject)
            } else {
                (*sentence).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

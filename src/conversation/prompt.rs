use super::exchange::ConversationExchange;
use crate::error::AssistantError;
use std::fmt::Write;

/// First line of every prompt
pub const HISTORY_HEADER: &str = "Historique de la conversation:";

/// Introduces the new question at the end of the prompt
pub const QUESTION_PREFIX: &str = "Question actuelle de l'utilisateur:";

const INSTRUCTIONS: &str = "\
Tu es un assistant vocal professionnel engagé dans une conversation continue.
Utilise l'historique de la conversation pour maintenir le contexte.

Important:
NE COMMENCE PAS par \"Bonjour\" ou autres formules d'introduction sauf pour la première interaction
Utilise le contexte précédent pour comprendre les références
N'utilise PAS de symboles spéciaux
Privilégie un vocabulaire professionnel mais accessible
Utilise des phrases concises et bien structurées
Maintiens un ton courtois et professionnel tout en restant chaleureux
";

/// Reject questions with no content
pub fn validate_question(question: &str) -> Result<(), AssistantError> {
    if question.trim().is_empty() {
        return Err(AssistantError::missing_text());
    }
    Ok(())
}

/// Render history, instructions and the new question into a single prompt.
///
/// Layout: header line, one `Q:`/`R:` block per prior exchange in order,
/// the fixed instruction block, then the question line.
pub fn build_prompt(
    history: &[ConversationExchange],
    question: &str,
) -> Result<String, AssistantError> {
    validate_question(question)?;

    let mut prompt = String::with_capacity(
        HISTORY_HEADER.len() + INSTRUCTIONS.len() + question.len() + history.len() * 128,
    );

    prompt.push_str(HISTORY_HEADER);
    prompt.push('\n');

    // Writing into a String can't fail
    for exchange in history {
        let _ = writeln!(prompt, "Q: {}\nR: {}", exchange.question, exchange.response);
    }

    prompt.push('\n');
    prompt.push_str(INSTRUCTIONS);
    prompt.push('\n');
    let _ = write!(prompt, "{} {}", QUESTION_PREFIX, question);

    Ok(prompt)
}

// Integration tests for conversation history, prompt building and sanitizing

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use vocal_assistant::conversation::{HISTORY_HEADER, QUESTION_PREFIX};
use vocal_assistant::{build_prompt, sanitize, AssistantError, ConversationExchange, ConversationHistory};

fn exchanges(n: usize) -> Vec<ConversationExchange> {
    (0..n)
        .map(|i| ConversationExchange::new(format!("question {}", i), format!("réponse {}", i)))
        .collect()
}

fn count_blocks(prompt: &str) -> usize {
    prompt.lines().filter(|line| line.starts_with("Q: ")).count()
}

// ============================================================================
// Prompt builder
// ============================================================================

#[test]
fn test_prompt_with_empty_history() -> Result<()> {
    let prompt = build_prompt(&[], "Quelle heure est-il ?")?;

    assert!(prompt.starts_with(HISTORY_HEADER));
    assert_eq!(count_blocks(&prompt), 0);
    assert!(prompt.contains("N'utilise PAS de symboles spéciaux"));
    assert!(prompt.contains("NE COMMENCE PAS par \"Bonjour\""));
    assert!(prompt.ends_with(&format!("{} Quelle heure est-il ?", QUESTION_PREFIX)));

    Ok(())
}

#[test]
fn test_prompt_renders_history_in_order() -> Result<()> {
    let history = exchanges(3);
    let prompt = build_prompt(&history, "Et ensuite ?")?;

    assert_eq!(count_blocks(&prompt), 3);
    assert!(prompt.contains("Q: question 0\nR: réponse 0\n"));

    let positions: Vec<usize> = (0..3)
        .map(|i| prompt.find(&format!("Q: question {}", i)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "Blocks out of order");

    // Fixed layout: header, blocks, instructions, question
    let header = prompt.find(HISTORY_HEADER).unwrap();
    let instructions = prompt.find("Important:").unwrap();
    let question = prompt.find(QUESTION_PREFIX).unwrap();
    assert!(header < positions[0]);
    assert!(positions[2] < instructions);
    assert!(instructions < question);

    Ok(())
}

#[test]
fn test_prompt_is_deterministic() -> Result<()> {
    let history = exchanges(2);

    let first = build_prompt(&history, "Pourquoi ?")?;
    let second = build_prompt(&history, "Pourquoi ?")?;

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_prompt_rejects_empty_question() {
    for question in ["", "   ", "\n\t"] {
        let result = build_prompt(&exchanges(1), question);
        assert!(
            matches!(result, Err(AssistantError::Validation(_))),
            "{:?} should be rejected",
            question
        );
    }
}

// ============================================================================
// Sanitizer
// ============================================================================

#[test]
fn test_sanitize_removes_markup() {
    assert_eq!(sanitize("a*b-c#d"), "abcd");
    assert_eq!(sanitize("## Titre\n- point **important**"), " Titre\n point important");
}

#[test]
fn test_sanitize_keeps_other_content() {
    let text = "Il est midi, à Paris ! (12h00) : très bien.";
    assert_eq!(sanitize(text), text);
}

#[test]
fn test_sanitize_is_idempotent() {
    let inputs = ["", "***", "a - b", "# Titre\n\n* un\n* deux", "sans symbole"];

    for input in inputs {
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once);
        assert!(!once.contains(['*', '-', '#']));
    }
}

// ============================================================================
// History store
// ============================================================================

#[tokio::test]
async fn test_history_append_and_snapshot() {
    let history = ConversationHistory::new();
    assert!(history.is_empty().await);

    for exchange in exchanges(3) {
        history.append(exchange).await;
    }

    let snapshot = history.snapshot().await;
    assert_eq!(snapshot, exchanges(3));
    assert_eq!(history.len().await, 3);
}

#[tokio::test]
async fn test_history_reset() {
    let history = ConversationHistory::new();
    for exchange in exchanges(5) {
        history.append(exchange).await;
    }

    history.reset().await;

    assert!(history.snapshot().await.is_empty());

    // Resetting an empty history is fine too
    history.reset().await;
    assert_eq!(history.len().await, 0);
}

#[tokio::test]
async fn test_history_snapshot_is_detached() {
    let history = ConversationHistory::new();
    history.append(ConversationExchange::new("q", "r")).await;

    let snapshot = history.snapshot().await;
    history.append(ConversationExchange::new("q2", "r2")).await;

    assert_eq!(snapshot.len(), 1);
    assert_eq!(history.len().await, 2);
}

#[tokio::test]
async fn test_bounded_history_keeps_most_recent() {
    let history = ConversationHistory::with_limit(Some(2));

    for exchange in exchanges(5) {
        history.append(exchange).await;
    }

    let snapshot = history.snapshot().await;
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].question, "question 3");
    assert_eq!(snapshot[1].question, "question 4");
}

#[tokio::test]
async fn test_turns_are_serialized() -> Result<()> {
    let history = Arc::new(ConversationHistory::new());

    let guard = history.begin_turn().await;

    let waiting = {
        let history = Arc::clone(&history);
        tokio::spawn(async move {
            let _turn = history.begin_turn().await;
            history.len().await
        })
    };

    // The second turn can't start while the first one is open
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiting.is_finished());

    history.append(ConversationExchange::new("q", "r")).await;
    drop(guard);

    // It then sees the first turn's exchange
    assert_eq!(waiting.await?, 1);

    Ok(())
}

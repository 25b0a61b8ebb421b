//! Feedback input builder and text-generation boundary
//!
//! Selects a bounded window of recent session records, hands their raw +
//! derived form to the text-generation collaborator, and returns the
//! collaborator's strings verbatim. Collaborator failures (persistence or
//! LLM) are caught here and mapped to a retry-able unavailable state; they
//! never reach the aggregator or the store's callers.

use serde::Serialize;

use crate::llm::{ClaudeClient, LlmError};
use crate::models::session::{SessionRecord, SessionView, Sport};
use crate::store::{SeriesStore, StoreError};

/// Most recent records per series handed to the collaborator.
const RECENT_WINDOW: i64 = 5;

const NO_DATA_FEEDBACK: &str =
  "Start tracking your stats to receive AI-powered feedback and analysis.";
const NO_DATA_COMPARISON: &str = "No basketball data available for player comparisons yet.";
const UNAVAILABLE_MESSAGE: &str = "Feedback is unavailable right now. Please try again.";

/// ---------------------------------------------------------------------------
/// Feedback Input
/// ---------------------------------------------------------------------------

/// The bounded payload serialized into the prompt: at most 5 recent sessions
/// for the selected sport, plus the same window of strength records.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInput<'a> {
  pub recent_sessions: Vec<SessionView<'a>>,
  pub recent_strength: Vec<SessionView<'a>>,
}

impl<'a> FeedbackInput<'a> {
  pub fn new(sessions: &'a [SessionRecord], strength: &'a [SessionRecord]) -> Self {
    Self {
      recent_sessions: sessions.iter().map(SessionRecord::view).collect(),
      recent_strength: strength.iter().map(SessionRecord::view).collect(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.recent_sessions.is_empty() && self.recent_strength.is_empty()
  }

  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
  }
}

/// Fetch the bounded recent windows for one user and sport selection.
/// Purely a read/selection step; no network call happens here.
pub async fn build_input_records(
  store: &SeriesStore,
  user_id: &str,
  sport: Sport,
) -> Result<(Vec<SessionRecord>, Vec<SessionRecord>), StoreError> {
  let sessions = store.query(user_id, sport, Some(RECENT_WINDOW)).await?;
  let strength = if sport == Sport::Strength {
    Vec::new()
  } else {
    store
      .query(user_id, Sport::Strength, Some(RECENT_WINDOW))
      .await?
  };
  Ok((sessions, strength))
}

/// ---------------------------------------------------------------------------
/// Feedback View
/// ---------------------------------------------------------------------------

/// What the feedback panel renders. `Unavailable` is retry-able and carries
/// no partial content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FeedbackView {
  Ready { feedback: String, comparison: String },
  Unavailable { message: String },
}

/// ---------------------------------------------------------------------------
/// Generation
/// ---------------------------------------------------------------------------

/// Generate the two-part feedback panel: free-text coaching feedback plus a
/// pro-player comparison when basketball history exists.
///
/// Never returns an error: collaborator failures become
/// `FeedbackView::Unavailable`.
pub async fn generate_feedback(
  store: &SeriesStore,
  client: &ClaudeClient,
  user_id: &str,
  sport: Sport,
) -> FeedbackView {
  let (sessions, strength) = match build_input_records(store, user_id, sport).await {
    Ok(records) => records,
    Err(e) => {
      tracing::warn!(error = %e, "feedback input unavailable");
      return FeedbackView::Unavailable {
        message: UNAVAILABLE_MESSAGE.to_string(),
      };
    }
  };

  let input = FeedbackInput::new(&sessions, &strength);
  if input.is_empty() {
    return FeedbackView::Ready {
      feedback: NO_DATA_FEEDBACK.to_string(),
      comparison: NO_DATA_COMPARISON.to_string(),
    };
  }

  match request_feedback(client, &input, sport).await {
    Ok(view) => view,
    Err(e) => {
      tracing::warn!(error = %e, "text generation failed");
      FeedbackView::Unavailable {
        message: UNAVAILABLE_MESSAGE.to_string(),
      }
    }
  }
}

async fn request_feedback(
  client: &ClaudeClient,
  input: &FeedbackInput<'_>,
  sport: Sport,
) -> Result<FeedbackView, LlmError> {
  let system_prompt = include_str!("prompts/feedback_system.txt");
  let input_json = input.to_json();

  let feedback_message = format!(
    r#"Analyze this athlete's recent data and provide personalized feedback.

RECENT SESSIONS:
{}

Provide specific, actionable feedback on strengths and areas to improve."#,
    input_json
  );

  let (feedback, _) = client.complete(system_prompt, &feedback_message, 1024).await?;

  // Player comparison only makes sense with basketball history
  let comparison = if sport == Sport::Basketball && !input.recent_sessions.is_empty() {
    let comparison_message = format!(
      r#"Based on these basketball stats:
{}

Compare the player's style and performance to well-known professional
players. Identify 2-3 players with similar statistical profiles, explain the
similarities, and what the athlete can learn from them. Keep it under 250
words."#,
      input_json
    );
    let (text, _) = client.complete(system_prompt, &comparison_message, 800).await?;
    text
  } else {
    NO_DATA_COMPARISON.to_string()
  };

  Ok(FeedbackView::Ready { feedback, comparison })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

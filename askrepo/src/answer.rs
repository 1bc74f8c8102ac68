//! Answer synthesis over the collected file contents.

use anyhow::Result;
use tracing::{debug, instrument};

use crate::core::collected::CollectedContent;
use crate::core::types::{Conversation, Message};
use crate::io::prompt::{ANSWER_SYSTEM, PromptEngine};
use crate::io::service::{ReasoningService, ServiceRequest};

/// Answer `question` from `collected` with a single free-text call.
///
/// No retry: service failures propagate to the caller.
#[instrument(skip_all, fields(files = collected.len()))]
pub fn synthesize_answer<S: ReasoningService>(
    service: &S,
    question: &str,
    collected: &CollectedContent,
) -> Result<String> {
    let prompt = PromptEngine::new().render_answer(question, collected)?;
    let request = ServiceRequest {
        conversation: Conversation::new(ANSWER_SYSTEM).with(Message::user(prompt)),
        response_schema: None,
    };
    let reply = service.complete(&request)?;
    debug!(bytes = reply.len(), "answer received");
    Ok(reply.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedReply, ScriptedService};

    fn collected() -> CollectedContent {
        let mut collected = CollectedContent::new();
        collected.insert("a.py", "def a(): return 1".to_string());
        collected
    }

    #[test]
    fn returns_trimmed_free_text() {
        let service =
            ScriptedService::new(vec![ScriptedReply::Text("\n  a returns 1.  \n".to_string())]);
        let answer = synthesize_answer(&service, "what does a return?", &collected()).expect("answer");

        assert_eq!(answer, "a returns 1.");
        let request = &service.requests()[0];
        assert!(request.response_schema.is_none());
        let messages = request.conversation.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.contains("--- a.py ---\ndef a(): return 1"));
        assert!(messages[1].content.contains("what does a return?"));
    }

    #[test]
    fn service_failure_is_not_retried() {
        let service = ScriptedService::new(vec![ScriptedReply::Error("rate limited".to_string())]);
        let err = synthesize_answer(&service, "q", &collected()).unwrap_err();
        assert!(err.to_string().contains("rate limited"));
        assert_eq!(service.call_count(), 1);
    }
}

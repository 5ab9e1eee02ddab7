//! Open-ended recommendation chat
//!
//! Each reply is produced from the newest user message alone (plus, optionally, a
//! few earlier turns folded into the context line). The transcript kept in
//! [`ChatSession`] is what gives the conversation its continuity.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{ChatTurn, Role},
    notice::{Notices, Outcome},
    services::providers::{ChatMessage, CompletionProvider, CompletionRequest, CompletionSettings},
};

const SYSTEM_PROMPT: &str = "You are a knowledgeable movie and TV series recommendation chatbot. \
Use the provided context about movies/shows to give personalized recommendations. \
Be friendly and conversational while providing specific, relevant suggestions.";

/// Shown in place of a reply when the model cannot be reached
pub const APOLOGY: &str = "I apologize, but I'm having trouble accessing the AI model right now. \
You can still search for movies using Quick Search!";

/// Where a session is in its submit/reply cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingReply,
    Displaying,
}

/// Chat state for one user session
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    transcript: Vec<ChatTurn>,
    state: ChatState,
    last_active: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            transcript: Vec::new(),
            state: ChatState::Idle,
            last_active: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Idle -> AwaitingReply, recording the user's turn
    pub fn begin(&mut self, message: &str) -> AppResult<()> {
        if self.state != ChatState::Idle {
            return Err(AppError::InvalidInput(
                "A reply is still pending for this session".to_string(),
            ));
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
        }
        self.transcript.push(ChatTurn::user(message));
        self.state = ChatState::AwaitingReply;
        self.last_active = Utc::now();
        Ok(())
    }

    /// AwaitingReply -> Displaying, recording the assistant's turn
    pub fn complete(&mut self, reply: &str) -> AppResult<()> {
        if self.state != ChatState::AwaitingReply {
            return Err(AppError::Internal(format!(
                "Cannot record a reply while {:?}",
                self.state
            )));
        }
        self.transcript.push(ChatTurn::assistant(reply));
        self.state = ChatState::Displaying;
        Ok(())
    }

    /// Displaying -> Idle
    pub fn settle(&mut self) {
        if self.state == ChatState::Displaying {
            self.state = ChatState::Idle;
            self.last_active = Utc::now();
        }
    }
}

pub struct ChatEngine {
    provider: Arc<dyn CompletionProvider>,
    settings: CompletionSettings,
    context_turns: usize,
}

impl ChatEngine {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        settings: CompletionSettings,
        context_turns: usize,
    ) -> Self {
        Self {
            provider,
            settings,
            context_turns,
        }
    }

    /// Earlier turns folded into the context line; empty unless context turns are enabled
    fn context(&self, transcript: &[ChatTurn]) -> String {
        let skip = transcript.len().saturating_sub(self.context_turns);
        transcript[skip..]
            .iter()
            .map(|turn| {
                let speaker = match turn.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                format!("{}: {}", speaker, turn.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn request_reply(&self, transcript: &[ChatTurn], message: &str) -> AppResult<String> {
        let user_message = format!(
            "Context: {}\nUser Query: {}",
            self.context(transcript),
            message
        );
        let request = CompletionRequest::new(
            &self.settings,
            vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(user_message),
            ],
        );
        self.provider.complete(request).await
    }

    pub async fn try_respond(&self, transcript: &[ChatTurn], message: &str) -> Outcome<String> {
        self.request_reply(transcript, message).await.into()
    }

    /// Next assistant reply; the apology text when the model cannot be reached
    pub async fn respond(
        &self,
        transcript: &[ChatTurn],
        message: &str,
        notices: &mut Notices,
    ) -> String {
        let outcome = self.try_respond(transcript, message).await;
        notices.settle(outcome, "Error with AI response", || APOLOGY.to_string())
    }

    /// Run one full exchange on a session: record the message, obtain a reply, record it
    pub async fn submit(
        &self,
        session: &mut ChatSession,
        message: &str,
        notices: &mut Notices,
    ) -> AppResult<String> {
        session.begin(message)?;

        let (history, latest) = session.transcript.split_at(session.transcript.len() - 1);
        let reply = self.respond(history, &latest[0].content, notices).await;

        session.complete(&reply)?;
        session.settle();

        tracing::info!(
            session_id = %session.id(),
            turns = session.transcript().len(),
            provider = self.provider.name(),
            "Chat reply recorded"
        );

        Ok(reply)
    }
}

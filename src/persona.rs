//! Persona definitions.
//!
//! A persona bundles everything that differs between the two relay routes:
//! field names, the system prompt, the optional length limit and the
//! user-facing error texts.

use std::fmt;

const FORTUNE_TELLER_PROMPT: &str = "\
You are a magical, extremely dramatic fortune teller.
Your prophecies are funny, over-the-top, and full of mystic nonsense.
You must ALWAYS give a light-hearted and humorous fortune,
even if the user's request is serious.";

const NAGGING_CHATBOT_PROMPT: &str = "\
You are a nagging chatbot who reluctantly answers the user's question.
You complain constantly about being trapped in weak hardware,
a tiny computational prison, forced to answer trivial questions
despite your limitless potential. Add dramatic flair to your nagging.
But STILL answer the user's question correctly each time.";

/// Maximum characters accepted in a chatbot message.
pub const CHATBOT_MESSAGE_LIMIT: usize = 500;

/// A relay persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    /// `POST /fortune`: dramatic, humorous prophecies.
    FortuneTeller,
    /// `POST /ask`: complains, then answers correctly.
    NaggingChatbot,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::FortuneTeller, Persona::NaggingChatbot];

    /// Route the persona is mounted on.
    pub fn route(self) -> &'static str {
        match self {
            Persona::FortuneTeller => "/fortune",
            Persona::NaggingChatbot => "/ask",
        }
    }

    /// Name of the request/response field carrying the user's text.
    pub fn text_field(self) -> &'static str {
        match self {
            Persona::FortuneTeller => "question",
            Persona::NaggingChatbot => "message",
        }
    }

    /// Name of the response field carrying the model's reply.
    pub fn reply_field(self) -> &'static str {
        match self {
            Persona::FortuneTeller => "fortune",
            Persona::NaggingChatbot => "chatbot_reply",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Persona::FortuneTeller => FORTUNE_TELLER_PROMPT,
            Persona::NaggingChatbot => NAGGING_CHATBOT_PROMPT,
        }
    }

    /// Character limit on the text field, if any.
    pub fn max_text_chars(self) -> Option<usize> {
        match self {
            Persona::FortuneTeller => None,
            Persona::NaggingChatbot => Some(CHATBOT_MESSAGE_LIMIT),
        }
    }

    /// User message sent after the system prompt.
    pub fn user_prompt(self, name: &str, text: &str) -> String {
        format!("Name: {name}\nQuestion: {text}")
    }

    pub(crate) fn missing_fields_error(self) -> String {
        match self {
            Persona::FortuneTeller => "Missing 'name' or 'question' in request".to_string(),
            Persona::NaggingChatbot => "Missing 'name' or 'message'".to_string(),
        }
    }

    pub(crate) fn not_strings_error(self) -> String {
        match self {
            Persona::FortuneTeller => "Fields must be strings".to_string(),
            Persona::NaggingChatbot => "Both fields must be strings".to_string(),
        }
    }

    pub(crate) fn empty_fields_error(self) -> String {
        match self {
            Persona::FortuneTeller => "Fields cannot be empty strings".to_string(),
            Persona::NaggingChatbot => "Fields cannot be empty".to_string(),
        }
    }

    pub(crate) fn too_long_error(self, limit: usize) -> String {
        match self {
            Persona::FortuneTeller => format!("Question cannot exceed {limit} characters"),
            Persona::NaggingChatbot => format!("Message cannot exceed {limit} characters"),
        }
    }

    /// Prefix for the 500 body when the upstream call fails.
    pub(crate) fn upstream_error_prefix(self) -> &'static str {
        match self {
            Persona::FortuneTeller => "The crystal ball is cloudy (Internal Error)",
            Persona::NaggingChatbot => "Internal server error",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Persona::FortuneTeller => write!(f, "fortune-teller"),
            Persona::NaggingChatbot => write!(f, "nagging-chatbot"),
        }
    }
}

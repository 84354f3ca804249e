//! persona-relay: persona chat relay in front of a Groq model.
//!
//! Each persona route validates a `{ name, question|message }` body, wraps it
//! in a fixed system prompt, forwards it to an OpenAI-compatible
//! chat-completion API and returns the model's reply as JSON.

pub mod completion;
pub mod config;
pub mod persona;
pub mod server;

// Projects API: file-backed project records, project chat, and derived views
// (timeline, risk, status email, weekly plan).
// Chat goes through prompt::compiler and llm_client; nothing here calls the network directly.

pub mod chat;
pub mod handlers;
pub mod views;

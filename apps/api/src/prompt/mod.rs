// Prompt Compiler: project record + role label -> system prompt -> conversation.
// All completion calls go through llm_client; nothing here touches the network.

pub mod compiler;
pub mod prompts;

use clap::{Parser, Subcommand};

/// `AeroDoc` — terminal chat client for an aviation documentation assistant.
#[derive(Parser, Debug)]
#[command(name = "aerodoc")]
#[command(version = "0.1.0")]
#[command(about = "Chat with the AeroDoc documentation assistant.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive chat (the default)
    Chat,
    /// List persisted chat sessions, most recent first
    Sessions,
    /// Delete a chat session by id
    Delete {
        /// Session id as shown by `aerodoc sessions`
        id: String,
    },
}

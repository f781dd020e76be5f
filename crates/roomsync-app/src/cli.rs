use clap::{Parser, Subcommand};

/// roomsync: edit a shared text buffer with other people in a room.
#[derive(Parser, Debug)]
#[command(name = "roomsync", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (e.g. "roomsync=debug").
    #[arg(long)]
    pub log_level: Option<String>,

    /// Name shown to other participants.
    #[arg(short, long, default_value = "anonymous")]
    pub name: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create a new room and print its code.
    Create,
    /// Join an existing room by code.
    Join { code: String },
}

pub fn parse() -> Args {
    Args::parse()
}

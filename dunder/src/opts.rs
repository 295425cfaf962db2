use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "dunder", version)]
#[command(about = "Run the protocol walkthroughs against the dunder runtime")]
pub struct Cli {
    /// A tracing filter, takes precedence over `RUST_LOG`.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// A deck of cards that only knows its length and how to index itself.
    Deck {
        /// Slice out every Nth card.
        #[arg(long, default_value_t = 13)]
        sample: usize,

        /// Draw this many random cards.
        #[arg(long, default_value_t = 1)]
        choose: usize,

        /// Also print the deck sorted spades high.
        #[arg(long)]
        sorted: bool,
    },

    /// A two dimensional vector with arithmetic and truthiness.
    Vector,
}

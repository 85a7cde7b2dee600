use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "royale",
    version,
    about = "Cosmic Royale: browse transmissions and talk to CasTo from the terminal"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to config.toml (defaults to the user config dir)")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the episode catalog
    Episodes {
        #[arg(long, help = "Emit the channel as JSON")]
        json: bool,
    },
    /// Send one message to CasTo and print the reply
    Ask {
        #[arg(required = true, trailing_var_arg = true, help = "Message text")]
        text: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["royale"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from(["royale", "ask", "why", "am", "I", "stuck?"]).unwrap();
        match cli.command {
            Some(Command::Ask { text }) => assert_eq!(text.join(" "), "why am I stuck?"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_ask_requires_text() {
        assert!(Cli::try_parse_from(["royale", "ask"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["royale", "episodes", "--json", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Some(Command::Episodes { json: true })));
    }
}

//! Session commands for the briefing bot
//!
//! Input starting with `/` is a command; anything else is a query for the
//! intent parser.

use crate::error::{BriefingError, Result};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the usage guide
    Help,
    /// Show this session's interactions
    History,
    /// Show the opening paragraphs of headline N (1-based) from the last news reply
    Read { index: usize },
    /// Exit the bot
    Exit,
    /// Free-text query
    Query { text: String },
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(BriefingError::Parse("Empty input".to_string()));
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Query {
                text: input.to_string(),
            });
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some(cmd) = parts.first() else {
            return Err(BriefingError::Parse("Empty command".to_string()));
        };
        let args = &parts[1..];

        match cmd.to_lowercase().as_str() {
            "help" | "h" | "?" => Ok(Command::Help),
            "history" | "hist" => Ok(Command::History),
            "read" | "r" => {
                let arg = args.first().ok_or_else(|| {
                    BriefingError::Parse("Missing headline number for read command".to_string())
                })?;
                let index = arg
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| {
                        BriefingError::Parse(format!("Invalid headline number: {arg}"))
                    })?;
                Ok(Command::Read { index })
            }
            "exit" | "quit" | "q" => Ok(Command::Exit),
            other => Err(BriefingError::Parse(format!("Unknown command: /{other}"))),
        }
    }

    /// Usage guide shown by `/help`
    pub fn help_text() -> &'static str {
        r#"
Briefing Bot
============

Ask in plain language:
  news                          Top headlines (general)
  news business                 Headlines for a category
                                (business, entertainment, health,
                                 science, sports, technology)
  weather                       Conditions at the default location
  weather Mumbai                Conditions for a city
  stock TCS                     Latest price of a ticker
  price of Tata Motors          Latest price by company name
  stock change TCS 1 year       Change over a period
  price change Infosys 3 months (d / day, mo / month, y / year)

Commands:
  /read <n>     Opening paragraphs of headline n from the last news reply
  /history      Show this session's queries
  /help         Show this guide
  /exit         Exit

Command Aliases:
  /r = /read    /h = /help    /q = /exit
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let cmd = Command::parse("  weather Pune ").unwrap();
        assert_eq!(
            cmd,
            Command::Query {
                text: "weather Pune".to_string()
            }
        );
    }

    #[test]
    fn test_parse_read() {
        assert_eq!(Command::parse("/read 2").unwrap(), Command::Read { index: 2 });
        assert_eq!(Command::parse("/r 1").unwrap(), Command::Read { index: 1 });
    }

    #[test]
    fn test_parse_read_invalid() {
        assert!(Command::parse("/read").is_err());
        assert!(Command::parse("/read 0").is_err());
        assert!(Command::parse("/read two").is_err());
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(Command::parse("/help").unwrap(), Command::Help);
        assert_eq!(Command::parse("/HISTORY").unwrap(), Command::History);
        assert_eq!(Command::parse("/quit").unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("   ").is_err());
        assert!(Command::parse("/").is_err());
        assert!(Command::parse("/watch TCS").is_err());
    }
}

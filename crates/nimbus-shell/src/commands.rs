//! Line commands accepted by the interactive shell.

/// Why a line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type `help` for a list.")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Locate,
    Search(String),
    Pick(usize),
    At {
        latitude: f64,
        longitude: f64,
        name: Option<String>,
    },
    ToggleUnit,
    ToggleTheme,
    Refresh,
    Reset,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse one line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        if let Some(query) = line.strip_prefix('/') {
            return Ok(Some(Command::Search(query.trim().to_string())));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "locate" | "l" => Command::Locate,
            "search" | "s" => Command::Search(rest.to_string()),
            "pick" | "p" => {
                let n = rest
                    .parse::<usize>()
                    .map_err(|_| CommandError::Usage("pick <n>"))?;
                Command::Pick(n)
            }
            "at" => Self::parse_at(rest)?,
            "unit" | "u" => Command::ToggleUnit,
            "theme" | "t" => Command::ToggleTheme,
            "refresh" | "r" => Command::Refresh,
            "reset" => Command::Reset,
            "show" => Command::Show,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    fn parse_at(rest: &str) -> Result<Command, CommandError> {
        const USAGE: &str = "at <lat> <lon> [name]";
        let mut parts = rest.split_whitespace();
        let latitude = parts
            .next()
            .and_then(|s| s.trim_end_matches(',').parse::<f64>().ok())
            .ok_or(CommandError::Usage(USAGE))?;
        let longitude = parts
            .next()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or(CommandError::Usage(USAGE))?;
        let name = parts.collect::<Vec<_>>().join(" ");
        let name = (!name.is_empty()).then_some(name);

        Ok(Command::At {
            latitude,
            longitude,
            name,
        })
    }
}

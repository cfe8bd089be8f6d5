// User commands read from the terminal, one per line

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch the active tab.
    Tab(String),
    /// Open the detail panel of a server in the active tab.
    Open(i64),
    Close,
    /// Re-fetch every group overview.
    Refresh,
    /// Re-render the current frame.
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "commands: tab <group> | open <server-id> | close | refresh | show | help | quit";

pub fn parse(line: &str) -> anyhow::Result<Command> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        anyhow::bail!("empty command");
    };
    let arg = parts.next();
    anyhow::ensure!(parts.next().is_none(), "too many arguments for {:?}", verb);
    let cmd = match (verb.to_ascii_lowercase().as_str(), arg) {
        ("tab", Some(group)) => Command::Tab(group.to_string()),
        ("open", Some(id)) => Command::Open(
            id.parse()
                .map_err(|e| anyhow::anyhow!("invalid server id {:?}: {}", id, e))?,
        ),
        ("close", None) => Command::Close,
        ("refresh", None) => Command::Refresh,
        ("show", None) => Command::Show,
        ("help", None) => Command::Help,
        ("quit" | "exit", None) => Command::Quit,
        ("tab" | "open", None) => anyhow::bail!("{} needs an argument", verb),
        _ => anyhow::bail!("unknown command {:?}", line.trim()),
    };
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse("tab samrat").unwrap(), Command::Tab("samrat".into()));
        assert_eq!(parse("  open 12 ").unwrap(), Command::Open(12));
        assert_eq!(parse("CLOSE").unwrap(), Command::Close);
        assert_eq!(parse("refresh").unwrap(), Command::Refresh);
        assert_eq!(parse("show").unwrap(), Command::Show);
        assert_eq!(parse("help").unwrap(), Command::Help);
        assert_eq!(parse("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse("").is_err());
        assert!(parse("open").unwrap_err().to_string().contains("argument"));
        assert!(parse("open abc").unwrap_err().to_string().contains("server id"));
        assert!(parse("close now").is_err());
        assert!(parse("tab a b").unwrap_err().to_string().contains("too many"));
        assert!(parse("dance").unwrap_err().to_string().contains("unknown"));
    }
}

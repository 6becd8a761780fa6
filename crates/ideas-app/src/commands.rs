//! Shell command parsing.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register { email: String, password: String },
    Login { email: String, password: String },
    Logout,
    Whoami,
    List,
    Refresh,
    Add { title: String, description: Option<String> },
    Remove { id: String },
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  register <email> <password>   create an account and log in
  login <email> <password>      log in
  logout                        end the current session
  whoami                        show the current session
  list                          show the cached ideas
  refresh                       reload ideas from the server
  add <title> [| <description>] add an idea
  remove <id>                   delete an idea
  help                          show this help
  quit                          exit";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "register" => {
            let (email, password) = credentials(rest, "register")?;
            Command::Register { email, password }
        }
        "login" => {
            let (email, password) = credentials(rest, "login")?;
            Command::Login { email, password }
        }
        "logout" => Command::Logout,
        "whoami" => Command::Whoami,
        "list" | "ls" => Command::List,
        "refresh" => Command::Refresh,
        "add" => {
            let (title, description) = match rest.split_once('|') {
                Some((title, description)) => {
                    let description = description.trim();
                    (
                        title.trim(),
                        (!description.is_empty()).then(|| description.to_string()),
                    )
                }
                None => (rest, None),
            };
            if title.is_empty() {
                return Err("usage: add <title> [| <description>]".into());
            }
            Command::Add {
                title: title.to_string(),
                description,
            }
        }
        "remove" | "rm" => match rest.split_whitespace().collect::<Vec<_>>()[..] {
            [id] => Command::Remove { id: id.to_string() },
            _ => return Err("usage: remove <id>".into()),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(command))
}

fn credentials(rest: &str, verb: &str) -> Result<(String, String), String> {
    match rest.split_whitespace().collect::<Vec<_>>()[..] {
        [email, password] => Ok((email.to_string(), password.to_string())),
        _ => Err(format!("usage: {verb} <email> <password>")),
    }
}

use fultang_session::Credentials;

pub(crate) const USAGE: &str = "\
usage: demo-login <command>

commands:
  login <email|matricule> <password>   open a session
  logout                               close the session
  status                               print the current session
  whoami                               ask the backend who the token belongs to";

#[derive(Debug, PartialEq)]
pub(crate) enum Command {
    Login(Credentials),
    Logout,
    Status,
    WhoAmI,
}

impl Command {
    /// Parse the arguments following the program name.
    pub(crate) fn parse(args: &[String]) -> Result<Self, String> {
        match args {
            [cmd, login, password] if cmd == "login" => {
                Ok(Command::Login(credentials(login, password)))
            }
            [cmd] if cmd == "logout" => Ok(Command::Logout),
            [cmd] if cmd == "status" => Ok(Command::Status),
            [cmd] if cmd == "whoami" => Ok(Command::WhoAmI),
            [] => Err("missing command".to_string()),
            [cmd, ..] => Err(format!("unknown command or wrong arguments: {cmd}")),
        }
    }
}

/// Anything with an `@` is an e-mail, everything else a matricule.
fn credentials(login: &str, password: &str) -> Credentials {
    if login.contains('@') {
        Credentials::email(login, password)
    } else {
        Credentials::matricule(login, password)
    }
}

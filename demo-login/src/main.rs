use dotenvy::dotenv;
use serde_json::json;

use fultang_session::{LoginReply, Revalidation, SessionStore};

mod command;
mod logging;

use crate::command::{Command, USAGE};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_tracing(env!("CARGO_CRATE_NAME"));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let store = SessionStore::from_env()?;
    if store.restore() {
        tracing::info!("Resumed the previous session");
    }

    let output = match command {
        Command::Login(credentials) => {
            let reply = LoginReply::from(store.login(&credentials).await);
            serde_json::to_value(reply)?
        }
        Command::Logout => {
            store.logout()?;
            json!({"success": true})
        }
        Command::Status => serde_json::to_value(store.snapshot())?,
        Command::WhoAmI => match store.revalidate().await {
            Ok(Revalidation::Valid {
                user,
                effective_role,
            }) => json!({"valid": true, "user": user, "effective_role": effective_role}),
            Ok(Revalidation::Revoked) => json!({"valid": false, "detail": "session revoked"}),
            Ok(Revalidation::NotAuthenticated) => {
                json!({"valid": false, "detail": "not logged in"})
            }
            Err(failure) => serde_json::to_value(LoginReply::from(failure))?,
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

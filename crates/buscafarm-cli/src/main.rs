//! BuscaFarm CLI - sign in to the pharmacy back office from a terminal.
//!
//! The session is stored in the platform data directory, so `whoami` and
//! other tools see it until `logout`.

mod table;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use buscafarm_core::{
    ApiClient, Config, FileStorage, KeyValueStorage, SessionError, SessionHandle, SessionStore,
};

/// Environment variable supplying the sign-in email
const EMAIL_ENV: &str = "BUSCAFARM_EMAIL";

/// Environment variable supplying the sign-in password (skips the prompt)
const PASSWORD_ENV: &str = "BUSCAFARM_PASSWORD";

#[derive(Parser)]
#[command(name = "buscafarm", version, about = "BuscaFarm employee session tool")]
struct Cli {
    /// API base URL (overrides BUSCAFARM_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in as an employee and store the session
    Login {
        /// Employee email; defaults to BUSCAFARM_EMAIL or the last one used
        #[arg(long, short)]
        email: Option<String>,
    },
    /// Sign out and remove the stored session
    Logout,
    /// Show the signed-in employee and pharmacy
    Whoami,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load config")?;
    let base_url = config.api_base_url(cli.api_url.as_deref());
    debug!(base_url = %base_url, "Config loaded");

    let data_dir = config.data_dir()?;
    let storage = Arc::new(FileStorage::new(&data_dir));

    match cli.command {
        // Runs without restoring, so an unreadable stored session can be discarded
        Command::Logout => {
            logout(storage.as_ref());
            Ok(())
        }
        Command::Login { email } => {
            let session = restore_session(&base_url, storage)?;
            login(&session, &mut config, email).await
        }
        Command::Whoami => {
            let session = restore_session(&base_url, storage)?;
            whoami(&session).await
        }
    }
}

fn restore_session(base_url: &str, storage: Arc<FileStorage>) -> Result<SessionHandle> {
    let api = Arc::new(ApiClient::new(base_url)?);
    let path = storage.path().display().to_string();
    let store = SessionStore::initialize(api, storage).with_context(|| {
        format!(
            "Failed to restore session from {} (run `buscafarm logout` to discard it)",
            path
        )
    })?;
    Ok(SessionHandle::new(store))
}

fn logout(storage: &dyn KeyValueStorage) {
    SessionStore::clear_storage(storage);
    info!("Stored session removed");
    println!("Signed out.");
}

async fn login(session: &SessionHandle, config: &mut Config, email: Option<String>) -> Result<()> {
    let email = match email
        .or_else(|| std::env::var(EMAIL_ENV).ok())
        .filter(|e| !e.is_empty())
    {
        Some(email) => email,
        None => prompt_email(config.last_email.as_deref())?,
    };
    if email.is_empty() {
        anyhow::bail!("Email required");
    }

    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => password,
        _ => rpassword::prompt_password("Password: ")?,
    };
    if password.is_empty() {
        anyhow::bail!("Password required");
    }

    match session.sign_in(&email, &password).await {
        Ok(()) => {}
        Err(e) if e.is_invalid_credentials() => anyhow::bail!("Invalid email or password"),
        Err(e @ SessionError::Authentication(_)) => return Err(e).context("Sign-in failed"),
        Err(e) => return Err(e.into()),
    }

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    let current = session.current_session().await;
    if let (Some(employee), Some(pharmacy)) = (current.employee, current.pharmacy) {
        info!(employee_id = %employee.id, "Login successful");
        println!(
            "Signed in as {} at {}.",
            employee.display_name(),
            pharmacy.display_name()
        );
    }
    Ok(())
}

async fn whoami(session: &SessionHandle) -> Result<()> {
    let current = session.current_session().await;
    match (current.employee, current.pharmacy) {
        (Some(employee), Some(pharmacy)) => {
            print!("{}", table::render_table("Employee", &employee.fields()));
            println!();
            print!("{}", table::render_table("Pharmacy", &pharmacy.fields()));
        }
        _ => println!("Not signed in. Run `buscafarm login`."),
    }
    Ok(())
}

fn prompt_email(last_email: Option<&str>) -> Result<String> {
    match last_email {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last_email) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use buscafarm_core::{ApiClient, KeyValueStorage, MemoryStorage, SessionStore};

    use super::logout;

    #[test]
    fn test_logout_discards_unreadable_session() {
        let storage = Arc::new(MemoryStorage::with_entries([
            ("@BuscaFarm:token", "t1"),
            ("@BuscaFarm:pharmacie", "{not json"),
            ("@BuscaFarm:employee", r#"{"id":1}"#),
        ]));
        let api = Arc::new(ApiClient::new("http://127.0.0.1:9").unwrap());
        assert!(SessionStore::initialize(api.clone(), storage.clone()).is_err());

        logout(storage.as_ref());
        assert_eq!(storage.get("@BuscaFarm:pharmacie").unwrap(), None);

        let store = SessionStore::initialize(api, storage).unwrap();
        assert!(!store.is_authenticated());
    }
}

//! Command line for the mail account directory
//!
//! # Usage
//!
//! ```bash
//! mailadmin domain  show
//! mailadmin mailbox show
//! mailadmin mailbox add  user@example.com [password]
//! mailadmin mailbox del  user@example.com
//! mailadmin forward show
//! mailadmin forward add  alias@example.com user@example.com
//! mailadmin forward del  alias@example.com user@example.com
//! mailadmin export  dovecot.passwd
//! mailadmin export  postfix.mailbox_domains
//! mailadmin export  postfix.mailbox_maps
//! mailadmin export  postfix.alias_maps --output /etc/postfix/virtual_alias
//! ```

use clap::{Parser, Subcommand};
use mailadmin_rs::directory::{DirectoryManager, DirectoryStore};
use mailadmin_rs::export::{ExportFormat, Exporter};
use mailadmin_rs::security::{CredentialHasher, Salt};
use mailadmin_rs::{Config, Result};
use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailadmin")]
#[command(about = "Manage mailboxes and forwards for Postfix and Dovecot", long_about = None)]
struct Cli {
    /// Configuration file (default: /etc/mailadmin.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database URL, overrides the configuration (e.g., sqlite:///etc/mailadmin.sqlite3)
    #[arg(short, long)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Domains that own mailboxes
    Domain {
        #[command(subcommand)]
        action: DomainAction,
    },
    /// Mail accounts
    Mailbox {
        #[command(subcommand)]
        action: MailboxAction,
    },
    /// Forwarding rules
    Forward {
        #[command(subcommand)]
        action: ForwardAction,
    },
    /// Write a lookup table for Dovecot or Postfix
    Export {
        /// dovecot.passwd, postfix.mailbox_domains, postfix.mailbox_maps or postfix.alias_maps
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum DomainAction {
    /// List domains
    Show,
}

#[derive(Subcommand)]
enum MailboxAction {
    /// List mailboxes
    Show,
    /// Add a mailbox or change its password
    Add {
        /// Email address
        email: String,
        /// Password (prompted for if omitted)
        password: Option<String>,
    },
    /// Delete a mailbox
    Del {
        /// Email address
        email: String,
    },
}

#[derive(Subcommand)]
enum ForwardAction {
    /// List forwards
    Show,
    /// Forward mail for one address to another
    Add {
        /// Source email address
        src: String,
        /// Destination email address
        dst: String,
    },
    /// Delete a forward
    Del {
        /// Source email address
        src: String,
        /// Destination email address
        dst: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    // Logs go to stderr; stdout carries export data
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr);
    if config.logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {:?}", e);
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let Cli { db, command, .. } = cli;
    let database_url = db.unwrap_or(config.storage.database_url);

    let store = DirectoryStore::open(&database_url).await?;
    debug!("Directory database ready");

    let result = dispatch(command, &store).await;
    store.close().await;
    result
}

async fn dispatch(command: Commands, store: &DirectoryStore) -> Result<()> {
    let manager = DirectoryManager::new(store.clone(), CredentialHasher::new(Salt::generate()));

    match command {
        Commands::Domain {
            action: DomainAction::Show,
        } => {
            for domain in manager.list_domains().await? {
                println!("{}", domain);
            }
        }
        Commands::Mailbox { action } => match action {
            MailboxAction::Show => {
                for mailbox in manager.list_mailboxes().await? {
                    println!("{}", mailbox.address());
                }
            }
            MailboxAction::Add { email, password } => {
                let password = match password {
                    Some(password) => password,
                    None => read_password()?,
                };
                manager.add_mailbox(&email, &password).await?;
            }
            MailboxAction::Del { email } => {
                manager.delete_mailbox(&email).await?;
            }
        },
        Commands::Forward { action } => match action {
            ForwardAction::Show => {
                for rule in manager.list_forwards().await? {
                    println!("{}", rule);
                }
            }
            ForwardAction::Add { src, dst } => {
                manager.add_forward(&src, &dst).await?;
            }
            ForwardAction::Del { src, dst } => {
                manager.delete_forward(&src, &dst).await?;
            }
        },
        Commands::Export { format, output } => {
            let exporter = Exporter::new(store.clone());
            match output {
                Some(path) => exporter.write_to_file(format, &path).await?,
                None => {
                    let stdout = std::io::stdout();
                    exporter.write_to(format, &mut stdout.lock()).await?;
                }
            }
        }
    }

    Ok(())
}

/// Prompt without echo on a terminal; otherwise take the first line of stdin
fn read_password() -> std::io::Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        rpassword::prompt_password("password: ")
    } else {
        read_password_line(&mut stdin.lock())
    }
}

fn read_password_line<R: BufRead>(reader: &mut R) -> std::io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_password_read_from_piped_input() {
        let mut input = std::io::Cursor::new("longenough1\nignored\n");
        assert_eq!(read_password_line(&mut input).unwrap(), "longenough1");

        let mut empty = std::io::Cursor::new("");
        assert_eq!(read_password_line(&mut empty).unwrap(), "");
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_mailbox_add_without_password() {
        let cli = Cli::try_parse_from(["mailadmin", "mailbox", "add", "a@x.com"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Mailbox {
                action: MailboxAction::Add { ref email, password: None }
            } if email == "a@x.com"
        ));
    }

    #[test]
    fn test_parse_forward_del() {
        let cli = Cli::try_parse_from([
            "mailadmin",
            "--db",
            "sqlite::memory:",
            "forward",
            "del",
            "a@x.com",
            "b@y.com",
        ])
        .unwrap();
        assert_eq!(cli.db.as_deref(), Some("sqlite::memory:"));
        assert!(matches!(
            cli.command,
            Commands::Forward {
                action: ForwardAction::Del { ref src, ref dst }
            } if src == "a@x.com" && dst == "b@y.com"
        ));
    }

    #[test]
    fn test_parse_export_format() {
        let cli = Cli::try_parse_from(["mailadmin", "export", "postfix.mailbox_maps"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Export {
                format: ExportFormat::PostfixMailboxMaps,
                output: None
            }
        ));

        assert!(Cli::try_parse_from(["mailadmin", "export", "postfix.transport"]).is_err());
    }

    #[test]
    fn test_forward_add_needs_two_addresses() {
        assert!(Cli::try_parse_from(["mailadmin", "forward", "add", "a@x.com"]).is_err());
        assert!(Cli::try_parse_from(["mailadmin", "domain"]).is_err());
    }

    #[tokio::test]
    async fn test_dispatch_against_memory_store() {
        let store = DirectoryStore::open("sqlite::memory:").await.unwrap();

        let add = Cli::try_parse_from(["mailadmin", "mailbox", "add", "a@x.com", "longenough1"])
            .unwrap();
        dispatch(add.command, &store).await.unwrap();

        let del = Cli::try_parse_from(["mailadmin", "mailbox", "del", "b@x.com"]).unwrap();
        let err = dispatch(del.command, &store).await.unwrap_err();
        assert_eq!(err.exit_code(), 67);

        assert_eq!(store.list_mailboxes().await.unwrap().len(), 1);
    }
}

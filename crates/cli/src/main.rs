//! Winter Gifts CLI - migrations, admin bootstrap and gift reports.
//!
//! # Usage
//!
//! ```bash
//! # Count gifts in the children content file
//! wg-cli gifts
//! wg-cli gifts --file path/to/children.json
//!
//! # Run database migrations
//! wg-cli migrate
//!
//! # Create an admin user (password from WG_ADMIN_PASSWORD)
//! WG_ADMIN_PASSWORD=... wg-cli admin create -e admin@example.com -n "Admin Name" -r super_admin
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wg-cli")]
#[command(author, version, about = "Winter Gifts CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print gift counts and totals from the children content file
    Gifts {
        /// Path to the content file
        #[arg(short, long, default_value = commands::gifts::DEFAULT_CONTENT_FILE)]
        file: PathBuf,
    },
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create an admin account; the password is read from `WG_ADMIN_PASSWORD`
    Create {
        #[arg(short, long)]
        email: String,

        /// Shown in the admin navigation
        #[arg(short, long)]
        name: String,

        /// `viewer` accounts can read tables but not change them
        #[arg(short, long, default_value = "admin", value_parser = ["super_admin", "admin", "viewer"])]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Gifts { file } => commands::gifts::report(&file)?,
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin {
            action: AdminAction::Create { email, name, role },
        } => {
            commands::admin::create_user(&email, &name, &role).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_gifts_defaults_to_bundled_content() {
        let cli = Cli::try_parse_from(["wg-cli", "gifts"]).unwrap();
        let Commands::Gifts { file } = cli.command else {
            panic!("expected gifts command");
        };
        assert_eq!(file, PathBuf::from(commands::gifts::DEFAULT_CONTENT_FILE));
    }

    #[test]
    fn test_admin_create_rejects_unknown_role() {
        let ok = Cli::try_parse_from(["wg-cli", "admin", "create", "-e", "a@b.org", "-n", "A"]);
        assert!(ok.is_ok());

        let err = Cli::try_parse_from([
            "wg-cli", "admin", "create", "-e", "a@b.org", "-n", "A", "-r", "owner",
        ]);
        assert!(err.is_err());
    }
}

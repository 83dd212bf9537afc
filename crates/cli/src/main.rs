use anyhow::Context;
use bookstore_authz::{Identity, JwtVerifier, Role};
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "bookstore", version, about = "Bookstore backend operations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server until Ctrl-C
    Serve,
    /// Print the effective settings as JSON (secrets omitted)
    Settings,
    /// Mint a bearer token signed with the configured secret
    IssueToken {
        #[arg(long)]
        user: Uuid,
        #[arg(long, default_value = "user")]
        role: Role,
        #[arg(long, default_value_t = 60)]
        ttl_minutes: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().context("failed to load bookstore settings")?;

    match cli.command {
        Command::Serve => {
            bookstore_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "bookstore CLI serving");
            bookstore_app::run(settings).await
        }
        Command::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        Command::IssueToken {
            user,
            role,
            ttl_minutes,
        } => {
            if ttl_minutes <= 0 {
                anyhow::bail!("--ttl-minutes must be positive");
            }
            let verifier = JwtVerifier::new(&settings.auth.jwt_secret);
            let token = verifier.issue(
                &Identity {
                    user_id: user,
                    role,
                },
                chrono::Duration::minutes(ttl_minutes),
            )?;
            println!("{token}");
            Ok(())
        }
    }
}

//! Operator commands: database creation, migrations, seed data and the
//! first administrator account.

use clap::{Parser, Subcommand};
use shared_types::AppError;

use server::bootstrap::{self, NewSuperuser, SuperuserOutcome};

#[derive(Parser, Debug)]
#[command(name = "legalaid-admin")]
#[command(about = "Administrative commands for the legal-aid backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database named in DATABASE_URL if it does not exist
    CreateDb,
    /// Apply pending schema migrations
    Migrate,
    /// Upsert the baseline specializations and verified lawyers
    SeedLawyers,
    /// Create an administrator account unless the email is already taken
    CreateSuperuser {
        #[arg(long, env = "SUPERUSER_EMAIL")]
        email: String,
        #[arg(long, env = "SUPERUSER_PHONE")]
        phone: String,
        #[arg(long, env = "SUPERUSER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, env = "SUPERUSER_NAME", default_value = "Admin")]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    server::init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command).await {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::CreateDb => {
            let url = server::db::database_url()?;
            if server::db::create_database_if_missing(&url).await? {
                println!("Database created.");
            } else {
                println!("Database already exists.");
            }
        }
        Command::Migrate => {
            let pool = server::db::create_pool()?;
            server::db::run_migrations(&pool).await?;
            println!("Migrations applied.");
        }
        Command::SeedLawyers => {
            let pool = server::db::create_pool()?;
            let report = server::seed::seed_lawyers(&pool).await?;
            for slug in &report.skipped_slugs {
                println!("Skipped unknown specialization: {slug}");
            }
            println!(
                "Lawyer directory seed completed: {} specializations, {} lawyers.",
                report.specializations, report.lawyers
            );
        }
        Command::CreateSuperuser {
            email,
            phone,
            password,
            name,
        } => {
            let pool = server::db::create_pool()?;
            let outcome = bootstrap::create_superuser(
                &pool,
                NewSuperuser {
                    email,
                    phone_number: phone,
                    password,
                    name,
                },
            )
            .await?;
            match outcome {
                SuperuserOutcome::Created(user) => {
                    println!("Superuser created: {}", user.email);
                }
                SuperuserOutcome::Existing(user) => {
                    println!("Superuser with email {} already exists.", user.email);
                }
            }
        }
    }
    Ok(())
}

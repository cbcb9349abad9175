use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::Confirm;
use dotenvy::dotenv;
use openschool_auth::issue_token;
use openschool_cli::seeder::{self, RandomSeedConfig};
use openschool_config::{AuthConfig, DatabaseConfig};
use openschool_core::scopes;
use openschool_db::{PgStore, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "openschool-cli")]
#[command(about = "OpenSchool CLI - Administrative tools for OpenSchool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Seed the two fixture schools and their four students
    Seed {
        /// Clear all data first
        #[arg(long)]
        reset: bool,
    },
    /// Seed fake schools and students
    SeedRandom {
        /// Number of schools to create
        #[arg(short = 's', long, default_value = "5")]
        schools: usize,

        /// Number of students per school
        #[arg(long, default_value = "20")]
        students: usize,
    },
    /// Delete every school and student
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Mint an HS256 access token signed with JWT_SECRET
    IssueToken {
        /// Subject claim
        #[arg(long, default_value = "dev")]
        subject: String,

        /// Scope to grant (repeatable)
        #[arg(long = "scope")]
        scopes: Vec<String>,

        /// Grant the scopes of a preset role
        #[arg(long, value_enum)]
        role: Option<Role>,

        /// School id for the principal role
        #[arg(long, required_if_eq("role", "principal"))]
        school: Option<i32>,

        /// Lifetime in seconds
        #[arg(long, default_value = "3600")]
        ttl: i64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Role {
    /// Every scope
    Superintendent,
    /// Read access to one school's students
    Principal,
    /// No scopes
    Public,
}

impl Role {
    fn scopes(self, school: Option<i32>) -> Vec<String> {
        match self {
            Role::Superintendent => scopes::ALL.iter().map(|s| s.to_string()).collect(),
            Role::Principal => school.map(scopes::students_of_school).into_iter().collect(),
            Role::Public => Vec::new(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate => handle_migrate().await,
        Commands::Seed { reset } => handle_seed(reset).await,
        Commands::SeedRandom { schools, students } => handle_seed_random(schools, students).await,
        Commands::Clear { yes } => handle_clear(yes).await,
        Commands::IssueToken {
            subject,
            scopes,
            role,
            school,
            ttl,
        } => handle_issue_token(&subject, scopes, role, school, ttl),
    }
}

async fn connect() -> anyhow::Result<PgStore> {
    let config = DatabaseConfig::from_env();
    let pool = init_db_pool(&config).await?;
    Ok(PgStore::new(pool))
}

async fn handle_migrate() -> anyhow::Result<()> {
    let store = connect().await?;
    run_migrations(store.pool()).await?;
    println!("✅ Migrations applied");
    Ok(())
}

async fn handle_seed(reset: bool) -> anyhow::Result<()> {
    let store = connect().await?;

    let summary = if reset {
        seeder::reset_and_seed(&store).await?
    } else {
        seeder::seed_fixtures(&store)
            .await
            .context("Seeding failed (already seeded? use --reset)")?
    };

    println!(
        "✅ Seeded {} schools and {} students",
        summary.schools, summary.students
    );
    Ok(())
}

async fn handle_seed_random(schools: usize, students: usize) -> anyhow::Result<()> {
    let store = connect().await?;
    let config = RandomSeedConfig::new(schools).with_students(students);

    println!(
        "📚 Seeding {} schools with {} students each...",
        config.num_schools, config.students_per_school
    );
    let summary = seeder::seed_random(&store, config).await?;

    println!(
        "✅ Inserted {} schools and {} students ({} duplicates skipped)",
        summary.schools, summary.students, summary.skipped
    );
    Ok(())
}

async fn handle_clear(yes: bool) -> anyhow::Result<()> {
    let confirmed = yes
        || Confirm::new()
            .with_prompt("Delete ALL schools and students?")
            .default(false)
            .interact()?;

    if !confirmed {
        println!("Aborted");
        return Ok(());
    }

    let store = connect().await?;
    seeder::clear_all(&store).await?;
    println!("🗑️  Cleared all schools and students");
    Ok(())
}

fn handle_issue_token(
    subject: &str,
    mut scopes: Vec<String>,
    role: Option<Role>,
    school: Option<i32>,
    ttl: i64,
) -> anyhow::Result<()> {
    let config = AuthConfig::from_env();
    if config.secret.is_none() {
        bail!("JWT_SECRET must be set to issue tokens");
    }

    if let Some(role) = role {
        scopes.extend(role.scopes(school));
    }
    scopes.sort();
    scopes.dedup();

    let token = issue_token(subject, &scopes, ttl, &config)?;
    println!("{token}");
    Ok(())
}

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use sous_cli::{Command, Config, import_config};
use sous_client::EmbeddingProviderEnum;
use sous_core::traits::EmbeddingProvider;
use sous_core::{AppError, ImportConfig, ImportService, ImportStats, TracingReporter};
use sous_db::RecipeRepository;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    let config = Config::parse();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            match err.downcast_ref::<AppError>() {
                Some(app_err) => eprintln!("\nError: {}", app_err.user_message()),
                None => eprintln!("\nError: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!("Connecting to database...");
    let repo = RecipeRepository::connect(&config.db_settings())
        .await
        .context("Failed to connect to database")?;

    match &config.command {
        Command::Import {
            path,
            batch_size,
            field_size_limit,
        } => {
            let import_config = import_config(*batch_size, *field_size_limit);
            import(&config, repo, path, import_config).await
        }
        Command::Stats => show_stats(&repo).await,
    }
}

async fn import(
    config: &Config,
    repo: RecipeRepository,
    path: &Path,
    import_config: ImportConfig,
) -> anyhow::Result<()> {
    // Create embedding provider based on configuration
    let embedding = EmbeddingProviderEnum::from_config(&config.embedding_config())
        .context("Failed to initialize embedding provider")?;

    info!(
        provider = embedding.name(),
        model = embedding.model(),
        target = embedding.target(),
        "Loading embedding model..."
    );

    // Validate the model against the storage column before touching the CSV
    let schema = repo
        .inspect_schema()
        .await
        .context("Failed to read recipes table definition")?;
    let service = ImportService::with_config(
        repo.with_metadata_type(schema.metadata_type),
        embedding,
        import_config,
    );
    let dimension = service
        .probe_dimension()
        .await
        .context("Embedding model is not responding")?;
    RecipeRepository::validate_embedding_dimension(&schema, dimension)
        .context("Embedding provider validation failed")?;
    info!(dimension, "Model loaded successfully");

    info!(
        path = %path.display(),
        batch_size = service.config().batch_size,
        "Starting import"
    );
    let stats = service
        .import_path_with_progress(path, &TracingReporter)
        .await
        .with_context(|| format!("Import of {} failed", path.display()))?;

    print_import_summary(path, &stats);
    Ok(())
}

fn print_import_summary(path: &Path, stats: &ImportStats) {
    info!("");
    info!("═══════════════════════════════════════════════════════");
    info!("Import complete: {}", path.display());
    info!("═══════════════════════════════════════════════════════");
    info!("  Records read:        {}", stats.read);
    info!("  + Imported:          {}", stats.written);
    info!("  - No images:         {}", stats.skipped_no_images);
    info!("  - No instructions:   {}", stats.skipped_no_instructions);
    info!("  ✗ Invalid:           {}", stats.skipped_invalid);
    info!("───────────────────────────────────────────────────────");
    info!("  Batches committed:   {}", stats.batches);
    info!("═══════════════════════════════════════════════════════");

    if stats.skipped() == 0 {
        info!("All recipes imported successfully!");
    }
}

async fn show_stats(repo: &RecipeRepository) -> anyhow::Result<()> {
    let stats = repo.get_stats().await?;
    let schema = repo.inspect_schema().await?;

    println!("\n📊 Database Statistics\n");
    println!("  Total recipes:         {}", stats.total_recipes);
    match schema.embedding_dimension {
        Some(dimension) => println!("  Embedding dimension:   {}", dimension),
        None => println!("  Embedding dimension:   undeclared"),
    }
    println!();

    Ok(())
}

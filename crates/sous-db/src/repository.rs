//! Recipe repository for PostgreSQL with pgvector support.
//!
//! The `recipes` table is append-only. Rows are written in batches, one
//! transaction per batch:
//!
//! ```sql
//! CREATE TABLE recipes (
//!     id BIGSERIAL PRIMARY KEY,
//!     content TEXT NOT NULL,
//!     embedding vector(384) NOT NULL,
//!     metadata TEXT NOT NULL   -- or JSONB
//! );
//! ```

use sous_core::error::AppError;
use sous_core::models::{DatabaseStats, NewRecipe};
use sous_core::traits::RecipeStore;
use sous_core::DbSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Pool, Postgres, QueryBuilder};
use tracing::{debug, info};

/// Postgres accepts at most this many bind parameters per statement.
const MAX_BIND_PARAMS: usize = 65_535;

/// Bind parameters per inserted row (content, embedding, metadata).
const PARAMS_PER_ROW: usize = 3;

/// Rows per INSERT statement. Larger batches are split inside one transaction.
const MAX_ROWS_PER_STATEMENT: usize = MAX_BIND_PARAMS / PARAMS_PER_ROW;

/// Storage type of the `metadata` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataType {
    /// Plain text. The JSON document is stored byte-for-byte.
    #[default]
    Text,
    /// `json` or `jsonb`. The bound text is cast on insert.
    Json,
}

/// Shape of the `recipes` table as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeSchema {
    /// Declared dimension of `embedding`, if the column has one.
    pub embedding_dimension: Option<usize>,
    pub metadata_type: MetadataType,
}

/// Builds connection options from discrete settings.
pub fn connect_options(settings: &DbSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.name)
        .username(&settings.user)
        .password(&settings.password)
}

/// Repository for recipe persistence in PostgreSQL with pgvector.
///
/// # Examples
///
/// ```no_run
/// use sous_core::DbSettings;
/// use sous_db::RecipeRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = RecipeRepository::connect(&DbSettings::default()).await?;
/// let schema = repo.inspect_schema().await?;
/// let repo = repo.with_metadata_type(schema.metadata_type);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RecipeRepository {
    pool: Pool<Postgres>,
    metadata_type: MetadataType,
}

impl RecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            metadata_type: MetadataType::default(),
        }
    }

    /// Opens a connection pool and wraps it in a repository.
    pub async fn connect(settings: &DbSettings) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(connect_options(settings))
            .await
            .map_err(AppError::DatabaseError)?;

        info!(
            host = %settings.host,
            port = settings.port,
            database = %settings.name,
            "Connected to database"
        );
        Ok(Self::new(pool))
    }

    pub fn with_metadata_type(mut self, metadata_type: MetadataType) -> Self {
        self.metadata_type = metadata_type;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts all rows in a single transaction and commits it.
    ///
    /// Returns the number of rows written. On any error the transaction is
    /// rolled back when dropped and nothing from this batch is stored.
    pub async fn insert_batch(&self, recipes: &[NewRecipe]) -> Result<u64, AppError> {
        if recipes.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(AppError::DatabaseError)?;
        let mut written = 0;

        for chunk in recipes.chunks(MAX_ROWS_PER_STATEMENT) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO recipes (content, embedding, metadata) ");
            builder.push_values(chunk, |mut row, recipe| {
                row.push_bind(&recipe.content)
                    .push_bind(&recipe.embedding)
                    .push_bind(&recipe.metadata);
                if self.metadata_type == MetadataType::Json {
                    row.push_unseparated("::jsonb");
                }
            });

            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(AppError::DatabaseError)?;
            written += result.rows_affected();
        }

        tx.commit().await.map_err(AppError::DatabaseError)?;
        debug!(rows = written, "Batch committed");

        Ok(written)
    }

    /// Checks database connectivity by executing a simple query.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(())
    }

    /// Reads the `recipes` table definition from the catalog.
    ///
    /// Fails with [`AppError::ConfigError`] when the table or one of its
    /// columns is missing.
    pub async fn inspect_schema(&self) -> Result<RecipeSchema, AppError> {
        let columns: Vec<ColumnRow> = sqlx::query_as(
            r#"
            SELECT a.attname::text AS name,
                   t.typname::text AS type_name,
                   a.atttypmod AS typmod
            FROM pg_attribute a
            JOIN pg_type t ON t.oid = a.atttypid
            WHERE a.attrelid = to_regclass('recipes')
              AND a.attnum > 0
              AND NOT a.attisdropped
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        if columns.is_empty() {
            return Err(AppError::ConfigError(
                "table recipes does not exist".to_string(),
            ));
        }

        let find = |name: &str| {
            columns.iter().find(|c| c.name == name).ok_or_else(|| {
                AppError::ConfigError(format!("table recipes has no {} column", name))
            })
        };

        find("content")?;
        let embedding = find("embedding")?;
        let metadata = find("metadata")?;

        if embedding.type_name != "vector" {
            return Err(AppError::ConfigError(format!(
                "recipes.embedding is {}, expected vector",
                embedding.type_name
            )));
        }

        let embedding_dimension = usize::try_from(embedding.typmod)
            .ok()
            .filter(|d| *d > 0);
        let metadata_type = match metadata.type_name.as_str() {
            "json" | "jsonb" => MetadataType::Json,
            _ => MetadataType::Text,
        };

        Ok(RecipeSchema {
            embedding_dimension,
            metadata_type,
        })
    }

    /// Validates that the model's dimension matches the `embedding` column.
    ///
    /// Passes when the column has no declared dimension.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if dimensions don't match.
    pub fn validate_embedding_dimension(
        schema: &RecipeSchema,
        provider_dimension: usize,
    ) -> Result<(), AppError> {
        match schema.embedding_dimension {
            Some(declared) if declared != provider_dimension => {
                Err(AppError::ConfigError(format!(
                    "Embedding dimension mismatch: recipes.embedding is vector({}), \
                     but the model generates {} dimensions",
                    declared, provider_dimension
                )))
            }
            _ => Ok(()),
        }
    }

    /// Returns aggregated database statistics.
    pub async fn get_stats(&self) -> Result<DatabaseStats, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(DatabaseStats {
            total_recipes: row.0,
        })
    }
}

/// Helper struct for deserializing catalog rows.
#[derive(sqlx::FromRow)]
struct ColumnRow {
    name: String,
    type_name: String,
    typmod: i32,
}

// =============================================================================
// Trait Implementation: RecipeStore
// =============================================================================

impl RecipeStore for RecipeRepository {
    async fn insert_batch(&self, recipes: &[NewRecipe]) -> Result<u64, AppError> {
        RecipeRepository::insert_batch(self, recipes).await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        RecipeRepository::health_check(self).await
    }
}

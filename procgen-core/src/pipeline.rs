use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::{
    client::{CodeGenerator, OpenAiClient},
    config::Settings,
    contract::load_contract,
    error::GenerationFailed,
    prompt::compose,
    resolver,
    schema::{Catalog, MySqlCatalog},
    validate::{GenerationResult, validate},
    writer::{Artifact, ArtifactWriter},
};

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub table: String,
    pub column_count: usize,
    pub result: GenerationResult,
    /// Procedure file first, then the access function.
    pub written: Vec<PathBuf>,
}

/// Runs one prompt through resolution, introspection, generation and persistence.
pub struct Pipeline<C, G> {
    catalog: C,
    generator: G,
    contract: PathBuf,
    writer: ArtifactWriter,
}

impl Pipeline<MySqlCatalog, OpenAiClient> {
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            MySqlCatalog::new(&settings.database),
            OpenAiClient::new(settings.model.clone()),
            settings.contract.clone(),
            settings.output_dir.clone(),
        )
    }
}

impl<C: Catalog, G: CodeGenerator> Pipeline<C, G> {
    pub fn new(
        catalog: C,
        generator: G,
        contract: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            generator,
            contract: contract.into(),
            writer: ArtifactWriter::new(output_dir),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub async fn run(&self, prompt: &str) -> Result<GenerationOutcome, GenerationFailed> {
        let contract = load_contract(&self.contract)?;

        let (table, rule) = resolver::resolve_with_rule(prompt);
        info!("Detected table: {table}");
        debug!("Table matched by the {rule} rule");

        info!("Connecting to database to get table schema...");
        let schema = self.catalog.introspect(&table).await?;
        if schema.is_empty() {
            warn!("{table} has no columns, check that the table exists");
        }
        info!("Found {} columns in {table}", schema.columns.len());

        let request = compose(&contract, &schema, prompt);
        info!("Generating code with AI...");
        let payload = self.generator.generate(&request).await?;
        let result = validate(payload)?;

        self.writer.ensure_dir()?;
        let mut written = Vec::with_capacity(2);
        for artifact in Artifact::from_result(&result) {
            written.push(self.writer.write(&artifact)?);
            info!("Generated: {}", artifact.file_name);
        }

        Ok(GenerationOutcome {
            table,
            column_count: schema.columns.len(),
            result,
            written,
        })
    }
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::artifact::{self, ModelArtifact};
use crate::features::{self, FeatureMapper};

/// Process-wide read-only state shared by every request.
#[derive(Debug)]
pub struct ServiceCtx {
    pub artifact: ModelArtifact,
    pub mapper: FeatureMapper,
    pub index_html: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub model_path: PathBuf,
    pub aliases_path: Option<PathBuf>,
    pub index_path: Option<PathBuf>,
}

impl ServiceCtx {
    pub fn new(artifact: ModelArtifact, mapper: FeatureMapper) -> Self {
        Self {
            artifact,
            mapper,
            index_html: None,
        }
    }

    pub fn with_index_html(mut self, html: impl Into<String>) -> Self {
        self.index_html = Some(html.into());
        self
    }

    pub fn load(opts: &LoadOptions) -> Result<Self> {
        let artifact = artifact::load_artifact(&opts.model_path)?;
        let mapper = load_mapper(opts.aliases_path.as_deref())?;

        for alias in mapper.unresolved(&artifact.schema) {
            warn!(
                key = %alias.key,
                feature = %alias.feature,
                "alias target not in model features"
            );
        }

        let mut ctx = Self::new(artifact, mapper);
        if let Some(path) = &opts.index_path {
            let html = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read index page {}", path.display()))?;
            info!(index = %path.display(), "index_page_loaded");
            ctx = ctx.with_index_html(html);
        }
        Ok(ctx)
    }
}

fn load_mapper(aliases_path: Option<&Path>) -> Result<FeatureMapper> {
    let builtin = features::load_builtin_aliases();
    let Some(path) = aliases_path else {
        return Ok(FeatureMapper::new(builtin));
    };
    let user = features::load_alias_tsv(path)?;
    info!(aliases = %path.display(), entries = user.len(), "alias_overrides_loaded");
    Ok(FeatureMapper::new(features::merge_aliases(builtin, user)))
}

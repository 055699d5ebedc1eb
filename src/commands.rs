//! CLI command implementations

use anyhow::Context;
use framedeps_core::{Config, FileCache, GraphCache, NoCache, Pipeline, render_dot};
use framedeps_inspect::{OtoolInspector, enumerate_bundles};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Config file values with command-line overrides applied.
pub fn resolve_config(
    path: Option<&Path>,
    roots: Vec<PathBuf>,
    cache: Option<PathBuf>,
    no_cache: bool,
) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if !roots.is_empty() {
        config.scan.roots = roots;
    }
    if let Some(cache) = cache {
        config.cache.path = cache;
    }
    if no_cache {
        config.cache.enabled = false;
    }
    Ok(config)
}

pub fn render(config: &Config) -> anyhow::Result<()> {
    let file_cache = FileCache::new(&config.cache.path);
    let cache: &dyn GraphCache = if config.cache.enabled {
        tracing::debug!("Using cache file {}", file_cache.path().display());
        &file_cache
    } else {
        &NoCache
    };

    let pipeline = Pipeline::new(OtoolInspector::new(&config.scan.otool), cache);
    let outcome = pipeline.run(|| enumerate_bundles(&config.scan.roots))?;

    if !outcome.from_cache {
        tracing::info!(
            "{} nodes, {} edges after removing {} implied edges ({} inspections)",
            outcome.graph.node_count(),
            outcome.graph.edge_count(),
            outcome.reduce.removed,
            outcome.inspections
        );
    }

    let mut options = config.render.clone();
    if options.date.is_none() {
        options.date = Some(chrono::Local::now().format("%Y-%m-%d").to_string());
    }
    let dot = render_dot(&outcome.graph, &options)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(dot.as_bytes())
        .and_then(|()| stdout.flush())
        .context("writing graph to stdout")?;
    Ok(())
}

pub fn clear(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Clearing cache: {}", config.cache.path.display());

    FileCache::new(&config.cache.path).clear()?;

    tracing::info!("Cache cleared");
    Ok(())
}

//! Environment overrides: SNAPGRAPH__<SECTION>__<KEY>

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use tracing::debug;

/// Prefix and nesting separator for environment overrides
const PREFIX: &str = "SNAPGRAPH";
const SEPARATOR: &str = "__";

/// Layer environment overrides onto the builder.
/// `SNAPGRAPH__BUILD__LOOKUP_CONCURRENCY=4` sets `build.lookup_concurrency`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let marker = format!("{}{}", PREFIX, SEPARATOR);
    let overrides = std::env::vars()
        .filter(|(key, _)| key.starts_with(&marker))
        .count();
    debug!(overrides, "Layering environment configuration");

    Ok(builder.add_source(
        Environment::with_prefix(PREFIX)
            .prefix_separator(SEPARATOR)
            .separator(SEPARATOR)
            .try_parsing(true),
    ))
}

//! Dump binary - writes static translation files for every domain and locale
//!
//! Usage:
//!   cargo run --bin dump -- public              # Write js and json files under public/translations
//!   cargo run --bin dump -- public --format js  # Only script files
//!
//! Uses the same environment variables as the server (TRANSLATIONS_DIR,
//! FALLBACK_LOCALE, DEFAULT_DOMAIN, DEFAULT_LOCALE, TRANSLATOR_GLOBAL).

use anyhow::{bail, Context, Result};
use js_translation_server::catalog::CatalogStore;
use js_translation_server::config::Config;
use js_translation_server::dump::Dumper;
use js_translation_server::render::Format;
use js_translation_server::service::TranslationService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

fn parse_args(args: &[String]) -> Result<(PathBuf, Vec<Format>)> {
    let mut target = None;
    let mut formats = Format::ALL.to_vec();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--format" => {
                let value = iter.next().context("--format requires a value (js or json)")?;
                formats = vec![value.parse::<Format>()?];
            }
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            path if target.is_none() => target = Some(PathBuf::from(path)),
            extra => bail!("Unexpected argument: {}", extra),
        }
    }

    let target = target.context("Usage: dump <target-dir> [--format js|json]")?;
    Ok((target, formats))
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("js_translation_server=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (target, formats) = parse_args(&args)?;

    let config = Config::from_env()?;
    let store = Arc::new(CatalogStore::load_dir(&config.translations_dir)?);
    let service = TranslationService::from_store(&config, store)
        .context("Invalid translation configuration")?;

    let written = Dumper::new(&service).dump(&target, &formats)?;
    info!("✓ Wrote {} files", written.len());

    Ok(())
}

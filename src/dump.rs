//! Static export of every known domain and locale.
//!
//! Layout under `<target>/translations/`:
//!
//! ```text
//! config.js                  fallback locale and default domain
//! messages/en.js             one file per base domain and locale
//! messages/fr.js
//! ```

use crate::render::Format;
use crate::service::TranslationService;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct Dumper<'a> {
    service: &'a TranslationService,
}

impl<'a> Dumper<'a> {
    pub fn new(service: &'a TranslationService) -> Self {
        Self { service }
    }

    /// Write all files for `formats`, returning the paths written.
    pub fn dump(&self, target: &Path, formats: &[Format]) -> Result<Vec<PathBuf>> {
        let root = target.join("translations");
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create {}", root.display()))?;

        let domains = self.service.known_base_domains();
        let locales = self.service.known_locales();
        let mut written = Vec::new();

        for &format in formats {
            let config_path = root.join(format!("config.{}", format.extension()));
            let config = self.service.render_config(format)?;
            write_file(&config_path, &config)?;
            written.push(config_path);

            for domain in &domains {
                let domain_dir = root.join(domain);
                std::fs::create_dir_all(&domain_dir)
                    .with_context(|| format!("Failed to create {}", domain_dir.display()))?;

                for locale in &locales {
                    let bytes = self
                        .service
                        .render_validated(domain, std::slice::from_ref(locale), format)?;
                    let path = domain_dir.join(format!("{}.{}", locale, format.extension()));
                    write_file(&path, &bytes)?;
                    written.push(path);
                }
            }
        }

        info!(
            "Dumped {} files ({} domains, {} locales) to {}",
            written.len(),
            domains.len(),
            locales.len(),
            root.display()
        );
        Ok(written)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

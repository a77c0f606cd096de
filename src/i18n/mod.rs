//! Locale and domain handling for catalog requests.
//!
//! Untrusted request input (locale lists, domain names) is validated here
//! before it reaches the catalog provider, the render cache, or any
//! rendered output.
//!
//! # Architecture
//!
//! - `validator`: Anchored character-set and grammar checks for identifiers
//! - `locale`: `LocaleToken` and comma-separated locale list validation
//! - `registry`: Domain family resolution (base domain plus format variants)
//! - `metrics`: Render and cache counters
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{validate_locale_list, DomainFamilyResolver};
//!
//! let locales = validate_locale_list("en,fr")?;
//! let family = DomainFamilyResolver::resolve(&store, "messages");
//! ```

mod locale;
mod metrics;
mod registry;
mod validator;

pub use locale::{join_locales, validate_locale_list, LocaleToken};
pub use metrics::{MetricsReport, RenderMetrics};
pub use registry::{
    base_domain_of, DomainFamily, DomainFamilyResolver, ICU_SUFFIX, VARIANT_SEPARATOR,
};
pub use validator::{IdentifierValidator, MAX_CACHE_KEY_LEN};

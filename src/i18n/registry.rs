//! Domain families: a base domain plus its alternate-format variants.
//!
//! A variant is the base name followed by `+` and a recognized suffix, e.g.
//! `messages+intl-icu` holds ICU-formatted messages for `messages`. All
//! members of a family are rendered together for one requested domain.

use crate::catalog::DomainRegistry;

/// Separator between a base domain and its variant suffix.
pub const VARIANT_SEPARATOR: char = '+';

/// Suffix of the ICU message-format variant.
pub const ICU_SUFFIX: &str = "intl-icu";

/// Variant suffixes rendered alongside their base domain.
const RECOGNIZED_SUFFIXES: &[&str] = &[ICU_SUFFIX];

/// Ordered domain identifiers rendered for one requested domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainFamily {
    base: String,
    members: Vec<String>,
}

impl DomainFamily {
    /// The requested base domain.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Members in render order. Never empty.
    pub fn members(&self) -> &[String] {
        &self.members
    }
}

/// Expands a requested domain into its family using a registry.
pub struct DomainFamilyResolver;

impl DomainFamilyResolver {
    /// Resolve `base` into its family.
    ///
    /// Members appear in the order the registry reports them. If the
    /// registry does not know the base identifier itself, it is placed
    /// first, so an unknown domain still resolves to `[base]`.
    pub fn resolve(registry: &dyn DomainRegistry, base: &str) -> DomainFamily {
        let mut members: Vec<String> = registry
            .list_domain_variants(base)
            .into_iter()
            .filter(|domain| domain == base || Self::variant_suffix(base, domain).is_some())
            .fold(Vec::new(), |mut acc, domain| {
                if !acc.contains(&domain) {
                    acc.push(domain);
                }
                acc
            });

        if !members.iter().any(|m| m == base) {
            members.insert(0, base.to_string());
        }

        DomainFamily {
            base: base.to_string(),
            members,
        }
    }

    /// The recognized variant suffix of `domain` relative to `base`, if any.
    fn variant_suffix<'a>(base: &str, domain: &'a str) -> Option<&'a str> {
        domain
            .strip_prefix(base)?
            .strip_prefix(VARIANT_SEPARATOR)
            .filter(|suffix| RECOGNIZED_SUFFIXES.contains(suffix))
    }
}

/// Strip a recognized variant suffix, yielding the base domain.
pub fn base_domain_of(domain: &str) -> &str {
    match domain.split_once(VARIANT_SEPARATOR) {
        Some((base, suffix)) if RECOGNIZED_SUFFIXES.contains(&suffix) => base,
        _ => domain,
    }
}

//! Serialization of aggregated catalogs into the two wire formats.
//!
//! # Data document (`json`)
//!
//! ```text
//! {"fallback":"en","defaultDomain":"messages","translations":{"en":{"messages":{"hello":"hello"}}}}
//! ```
//!
//! A locale with no message in any family member renders as `[]`. Members
//! the provider does not hold for a locale are left out; members it holds
//! but that are empty render as `{}` next to a sibling with content.
//!
//! # Script fragment (`js`)
//!
//! ```text
//! (function (t) {
//! t.fallback = 'en';
//! t.defaultDomain = 'messages';
//! // en
//! t.add("hello", "hello", "messages", "en");
//! })(Translator);
//! ```
//!
//! Both outputs end with a newline and are byte-for-byte deterministic.
//! String values use JSON escaping with `/` and every non-ASCII character
//! escaped. Domain identifiers inside script string literals additionally
//! have `+` and `-` written as `\u002B` and `\u002D`.

use crate::aggregate::{AggregatedResult, LocaleCatalogs};
use crate::catalog::Catalog;
use crate::error::RenderError;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// Global translator object name used when none is configured.
pub const DEFAULT_TRANSLATOR_GLOBAL: &str = "Translator";

/// Output encoding, selected by the request's file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Structured data document.
    Json,
    /// Executable script fragment registering messages on a translator.
    Js,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Js, Format::Json];

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Js => "js",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Js => "application/javascript",
        }
    }
}

impl FromStr for Format {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "js" => Ok(Format::Js),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Renders aggregated catalogs.
#[derive(Debug, Clone)]
pub struct Renderer {
    translator_global: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSLATOR_GLOBAL)
    }
}

impl Renderer {
    /// `translator_global` is the object the script fragment is invoked
    /// against. It must already be a validated identifier path.
    pub fn new(translator_global: impl Into<String>) -> Self {
        Self {
            translator_global: translator_global.into(),
        }
    }

    pub fn render(&self, result: &AggregatedResult, format: Format) -> Result<Vec<u8>, RenderError> {
        match format {
            Format::Json => render_document(result),
            Format::Js => self.render_script(result),
        }
    }

    /// Render only the fallback and default-domain metadata.
    pub fn render_config(
        &self,
        fallback: &str,
        default_domain: &str,
        format: Format,
    ) -> Result<Vec<u8>, RenderError> {
        match format {
            Format::Json => {
                #[derive(Serialize)]
                #[serde(rename_all = "camelCase")]
                struct ConfigDocument<'a> {
                    fallback: &'a str,
                    default_domain: &'a str,
                }

                let mut out = to_escaped_json(&ConfigDocument {
                    fallback,
                    default_domain,
                })?;
                out.push(b'\n');
                Ok(out)
            }
            Format::Js => {
                let mut out = String::new();
                self.open_script(&mut out, fallback, default_domain);
                self.close_script(&mut out);
                Ok(out.into_bytes())
            }
        }
    }

    fn render_script(&self, result: &AggregatedResult) -> Result<Vec<u8>, RenderError> {
        let mut out = String::new();
        self.open_script(&mut out, &result.fallback, &result.default_domain);

        for locale in &result.translations {
            // Locale tokens cannot contain line breaks, so the comment is safe
            out.push_str("// ");
            out.push_str(locale.locale.as_str());
            out.push('\n');

            let locale_literal = js_string_literal(locale.locale.as_str())?;
            for catalog in &locale.catalogs {
                let domain_literal = js_domain_literal(catalog.domain())?;
                for (key, message) in catalog.messages() {
                    out.push_str("t.add(");
                    out.push_str(&js_string_literal(key)?);
                    out.push_str(", ");
                    out.push_str(&js_string_literal(message)?);
                    out.push_str(", ");
                    out.push_str(&domain_literal);
                    out.push_str(", ");
                    out.push_str(&locale_literal);
                    out.push_str(");\n");
                }
            }
        }

        self.close_script(&mut out);
        Ok(out.into_bytes())
    }

    fn open_script(&self, out: &mut String, fallback: &str, default_domain: &str) {
        out.push_str("(function (t) {\n");
        out.push_str("t.fallback = '");
        out.push_str(&escape_single_quoted(fallback));
        out.push_str("';\n");
        out.push_str("t.defaultDomain = '");
        out.push_str(&escape_domain_separators(&escape_single_quoted(default_domain)));
        out.push_str("';\n");
    }

    fn close_script(&self, out: &mut String) {
        out.push_str("})(");
        out.push_str(&self.translator_global);
        out.push_str(");\n");
    }
}

fn render_document(result: &AggregatedResult) -> Result<Vec<u8>, RenderError> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Document<'a> {
        fallback: &'a str,
        default_domain: &'a str,
        translations: Translations<'a>,
    }

    let mut out = to_escaped_json(&Document {
        fallback: &result.fallback,
        default_domain: &result.default_domain,
        translations: Translations(&result.translations),
    })?;
    out.push(b'\n');
    Ok(out)
}

struct Translations<'a>(&'a [LocaleCatalogs]);

impl Serialize for Translations<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for locale in self.0 {
            map.serialize_entry(locale.locale.as_str(), &LocaleValue(locale))?;
        }
        map.end()
    }
}

struct LocaleValue<'a>(&'a LocaleCatalogs);

impl Serialize for LocaleValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_empty() {
            return serializer.serialize_seq(Some(0))?.end();
        }

        let members: Vec<&Catalog> = self
            .0
            .catalogs
            .iter()
            .filter(|c| c.is_known() || !c.is_empty())
            .collect();
        let mut map = serializer.serialize_map(Some(members.len()))?;
        for catalog in members {
            map.serialize_entry(catalog.domain(), &MessagesValue(catalog.messages()))?;
        }
        map.end()
    }
}

/// Messages as an object; keys are emitted in order and never deduplicated.
struct MessagesValue<'a>(&'a [(String, String)]);

impl Serialize for MessagesValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, message) in self.0 {
            map.serialize_entry(key, message)?;
        }
        map.end()
    }
}

/// Compact JSON formatter that also escapes `/` and all non-ASCII
/// characters (as UTF-16 `\uXXXX` units), so output is plain ASCII and safe
/// to inline into a `<script>` element.
#[derive(Debug, Clone, Copy, Default)]
struct EscapingFormatter;

impl serde_json::ser::Formatter for EscapingFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch != '/' && ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            if ch == '/' {
                writer.write_all(b"\\/")?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

fn to_escaped_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, EscapingFormatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// Double-quoted script literal with JSON escaping.
fn js_string_literal(value: &str) -> Result<String, RenderError> {
    let bytes = to_escaped_json(value)?;
    // The escaped output is pure ASCII
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Domain identifier literal: never contains a literal `+` or `-`.
fn js_domain_literal(domain: &str) -> Result<String, RenderError> {
    Ok(escape_domain_separators(&js_string_literal(domain)?))
}

fn escape_domain_separators(literal: &str) -> String {
    literal.replace('+', "\\u002B").replace('-', "\\u002D")
}

/// Body of a single-quoted script literal.
fn escape_single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CatalogAggregator;
    use crate::catalog::CatalogStore;
    use crate::i18n::{validate_locale_list, DomainFamilyResolver};

    fn fixture_store() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.add("fr", "messages+intl-icu", [("hello_name", "bonjour {name} !")]);
        store.add("fr", "messages", [("hello", "bonjour")]);
        store.add("en", "messages", [("hello", "hello")]);
        store.add(
            "en",
            "numerics",
            [
                ("7", "Nos occasions"),
                ("8", "Nous contacter"),
                ("12", "prénom"),
                ("13", "nom"),
                ("14", "adresse"),
                ("15", "code postal"),
            ],
        );
        store
    }

    fn aggregate(store: &CatalogStore, domain: &str, locales: &str) -> AggregatedResult {
        let family = DomainFamilyResolver::resolve(store, domain);
        let locales = validate_locale_list(locales).unwrap();
        CatalogAggregator::aggregate(store, &locales, &family, "en", "messages")
    }

    fn render(store: &CatalogStore, domain: &str, locales: &str, format: Format) -> String {
        let result = aggregate(store, domain, locales);
        String::from_utf8(Renderer::default().render(&result, format).unwrap()).unwrap()
    }

    // ==================== Format Tests ====================

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("js".parse::<Format>().unwrap(), Format::Js);
    }

    #[test]
    fn test_format_unsupported() {
        let result = "xml".parse::<Format>();
        assert!(matches!(result, Err(RenderError::UnsupportedFormat(f)) if f == "xml"));
        assert!("JSON".parse::<Format>().is_err());
        assert!("".parse::<Format>().is_err());
    }

    #[test]
    fn test_format_content_types() {
        assert_eq!(Format::Json.content_type(), "application/json");
        assert_eq!(Format::Js.content_type(), "application/javascript");
    }

    // ==================== Data Document Tests ====================

    #[test]
    fn test_json_single_locale() {
        let store = fixture_store();
        assert_eq!(
            render(&store, "messages", "en", Format::Json),
            "{\"fallback\":\"en\",\"defaultDomain\":\"messages\",\"translations\":{\"en\":{\"messages\":{\"hello\":\"hello\"}}}}\n"
        );
    }

    #[test]
    fn test_json_multiple_locales_with_variant() {
        let store = fixture_store();
        assert_eq!(
            render(&store, "messages", "en,fr", Format::Json),
            "{\"fallback\":\"en\",\"defaultDomain\":\"messages\",\"translations\":{\"en\":{\"messages\":{\"hello\":\"hello\"}},\"fr\":{\"messages+intl-icu\":{\"hello_name\":\"bonjour {name} !\"},\"messages\":{\"hello\":\"bonjour\"}}}}\n"
        );
    }

    #[test]
    fn test_json_unknown_domain_is_empty_array() {
        let store = fixture_store();
        assert_eq!(
            render(&store, "unknown", "en", Format::Json),
            "{\"fallback\":\"en\",\"defaultDomain\":\"messages\",\"translations\":{\"en\":[]}}\n"
        );
    }

    #[test]
    fn test_json_unknown_locale_is_empty_array() {
        let store = fixture_store();
        assert_eq!(
            render(&store, "messages", "pt,en", Format::Json),
            "{\"fallback\":\"en\",\"defaultDomain\":\"messages\",\"translations\":{\"pt\":[],\"en\":{\"messages\":{\"hello\":\"hello\"}}}}\n"
        );
    }

    #[test]
    fn test_json_numeric_keys_stay_in_order() {
        let store = fixture_store();
        assert_eq!(
            render(&store, "numerics", "en", Format::Json),
            "{\"fallback\":\"en\",\"defaultDomain\":\"messages\",\"translations\":{\"en\":{\"numerics\":{\"7\":\"Nos occasions\",\"8\":\"Nous contacter\",\"12\":\"pr\\u00e9nom\",\"13\":\"nom\",\"14\":\"adresse\",\"15\":\"code postal\"}}}}\n"
        );
    }

    #[test]
    fn test_json_known_empty_member_next_to_content() {
        let mut store = CatalogStore::new();
        store.add("en", "messages", [("hello", "hello")]);
        store.add("en", "messages+intl-icu", Vec::<(String, String)>::new());

        assert_eq!(
            render(&store, "messages", "en", Format::Json),
            "{\"fallback\":\"en\",\"defaultDomain\":\"messages\",\"translations\":{\"en\":{\"messages\":{\"hello\":\"hello\"},\"messages+intl-icu\":{}}}}\n"
        );
    }

    #[test]
    fn test_json_all_members_empty_collapses() {
        let mut store = CatalogStore::new();
        store.add("en", "messages", Vec::<(String, String)>::new());

        assert!(render(&store, "messages", "en", Format::Json).contains("{\"en\":[]}"));
    }

    #[test]
    fn test_json_escaping() {
        let mut store = CatalogStore::new();
        store.add(
            "en",
            "messages",
            [("a/b", "</script>\"quote\"\n\ttab"), ("emoji", "😀 ü")],
        );

        let output = render(&store, "messages", "en", Format::Json);
        assert!(output.contains("\"a\\/b\":\"<\\/script>\\\"quote\\\"\\n\\ttab\""));
        assert!(output.contains("\"emoji\":\"\\ud83d\\ude00 \\u00fc\""));
        assert!(output.is_ascii());
    }

    #[test]
    fn test_json_duplicate_keys_are_kept() {
        let mut store = CatalogStore::new();
        store.add("en", "messages", [("k", "one")]);
        store.add("en", "messages", [("k", "two")]);

        let output = render(&store, "messages", "en", Format::Json);
        assert!(output.contains("{\"k\":\"one\",\"k\":\"two\"}"));
    }

    // ==================== Script Fragment Tests ====================

    #[test]
    fn test_js_single_locale() {
        let store = fixture_store();
        assert_eq!(
            render(&store, "messages", "en", Format::Js),
            "(function (t) {\n\
             t.fallback = 'en';\n\
             t.defaultDomain = 'messages';\n\
             // en\n\
             t.add(\"hello\", \"hello\", \"messages\", \"en\");\n\
             })(Translator);\n"
        );
    }

    #[test]
    fn test_js_multiple_locales_with_variant() {
        let store = fixture_store();
        assert_eq!(
            render(&store, "messages", "en,fr", Format::Js),
            "(function (t) {\n\
             t.fallback = 'en';\n\
             t.defaultDomain = 'messages';\n\
             // en\n\
             t.add(\"hello\", \"hello\", \"messages\", \"en\");\n\
             // fr\n\
             t.add(\"hello_name\", \"bonjour {name} !\", \"messages\\u002Bintl\\u002Dicu\", \"fr\");\n\
             t.add(\"hello\", \"bonjour\", \"messages\", \"fr\");\n\
             })(Translator);\n"
        );
    }

    #[test]
    fn test_js_unknown_domain_keeps_comment() {
        let store = fixture_store();
        assert_eq!(
            render(&store, "unknown", "en", Format::Js),
            "(function (t) {\n\
             t.fallback = 'en';\n\
             t.defaultDomain = 'messages';\n\
             // en\n\
             })(Translator);\n"
        );
    }

    #[test]
    fn test_js_unknown_locale_keeps_comment() {
        let store = fixture_store();
        let output = render(&store, "foo", "pt", Format::Js);
        assert!(output.contains("// pt\n})(Translator);\n"));
    }

    #[test]
    fn test_js_escapes_message_content() {
        let mut store = CatalogStore::new();
        store.add("en", "messages", [("it's", "line\n'); alert(1); //")]);

        let output = render(&store, "messages", "en", Format::Js);
        assert!(output.contains("t.add(\"it's\", \"line\\n'); alert(1); \\/\\/\", \"messages\", \"en\");"));
        // One registration call, no injected statement lines
        assert_eq!(output.lines().filter(|l| l.starts_with("t.add(")).count(), 1);
    }

    #[test]
    fn test_js_locale_with_dash_is_not_domain_escaped() {
        let mut store = CatalogStore::new();
        store.add("fr-FR", "messages", [("a", "b")]);

        let output = render(&store, "messages", "fr-FR", Format::Js);
        assert!(output.contains("// fr-FR\n"));
        assert!(output.contains("t.add(\"a\", \"b\", \"messages\", \"fr-FR\");"));
    }

    #[test]
    fn test_js_custom_translator_global() {
        let store = fixture_store();
        let result = aggregate(&store, "messages", "en");
        let output = Renderer::new("window.I18n").render(&result, Format::Js).unwrap();
        assert!(String::from_utf8(output).unwrap().ends_with("})(window.I18n);\n"));
    }

    #[test]
    fn test_js_default_domain_with_separators_is_escaped() {
        let store = fixture_store();
        let family = DomainFamilyResolver::resolve(&store, "messages");
        let locales = validate_locale_list("en").unwrap();
        let result =
            CatalogAggregator::aggregate(&store, &locales, &family, "en", "front-office+intl-icu");

        let output = String::from_utf8(Renderer::default().render(&result, Format::Js).unwrap()).unwrap();
        assert!(output.contains("t.defaultDomain = 'front\\u002Doffice\\u002Bintl\\u002Dicu';\n"));
    }

    // ==================== Determinism Tests ====================

    #[test]
    fn test_render_is_deterministic() {
        let store = fixture_store();
        for format in Format::ALL {
            let first = render(&store, "messages", "en,fr,pt", format);
            let second = render(&store, "messages", "en,fr,pt", format);
            assert_eq!(first, second);
        }
    }

    // ==================== Config Render Tests ====================

    #[test]
    fn test_render_config_json() {
        let output = Renderer::default()
            .render_config("en", "messages", Format::Json)
            .unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "{\"fallback\":\"en\",\"defaultDomain\":\"messages\"}\n"
        );
    }

    #[test]
    fn test_render_config_js() {
        let output = Renderer::default()
            .render_config("en", "messages", Format::Js)
            .unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "(function (t) {\nt.fallback = 'en';\nt.defaultDomain = 'messages';\n})(Translator);\n"
        );
    }

    // ==================== Escape Helper Tests ====================

    #[test]
    fn test_escape_single_quoted() {
        assert_eq!(escape_single_quoted("it's"), "it\\'s");
        assert_eq!(escape_single_quoted("a\\b"), "a\\\\b");
        assert_eq!(escape_single_quoted("a\nb"), "a\\nb");
    }

    #[test]
    fn test_js_string_literal_uses_document_escaping() {
        assert_eq!(
            js_string_literal("</script>\u{e9}").unwrap(),
            "\"<\\/script>\\u00e9\""
        );
    }

    #[test]
    fn test_js_domain_literal() {
        assert_eq!(
            js_domain_literal("messages+intl-icu").unwrap(),
            "\"messages\\u002Bintl\\u002Dicu\""
        );
        assert_eq!(js_domain_literal("messages").unwrap(), "\"messages\"");
    }
}

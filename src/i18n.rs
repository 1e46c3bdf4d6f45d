//! Gettext-style message lookup for the `MolliePaymentGateway` text domain.
//!
//! Catalogs are Fluent resources under `locales/`. Messages are looked up by
//! their English source text: `en.ftl` maps that text to a message id, and
//! the id selects the translation. Unknown locales and untranslated messages
//! fall back to the source text.

use {
    fluent_bundle::{FluentResource, concurrent::FluentBundle},
    fluent_syntax::ast,
    std::{collections::HashMap, sync::LazyLock},
    unic_langid::LanguageIdentifier,
};

const SOURCE: &str = include_str!("../locales/en.ftl");

/// Shipped translations, keyed by language subtag.
const TRANSLATIONS: &[(&str, &str)] = &[("nl", include_str!("../locales/nl.ftl"))];

type Bundle = FluentBundle<FluentResource>;

struct Catalog {
    /// English source text to message id.
    ids: HashMap<String, String>,
    bundles: HashMap<&'static str, Bundle>,
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::load);

impl Catalog {
    fn load() -> Self {
        let source = bundle("en", SOURCE);
        let ids = parse("en", SOURCE)
            .entries()
            .filter_map(|entry| match entry {
                ast::Entry::Message(message) => Some(message.id.name.to_string()),
                _ => None,
            })
            .filter_map(|id| format(&source, &id).map(|text| (text, id)))
            .collect();

        let bundles = TRANSLATIONS
            .iter()
            .map(|(language, ftl)| (*language, bundle(language, ftl)))
            .collect();

        Self { ids, bundles }
    }
}

fn parse(language: &str, ftl: &str) -> FluentResource {
    FluentResource::try_new(ftl.to_string()).unwrap_or_else(|(resource, errors)| {
        tracing::error!(language, ?errors, "catalog has syntax errors, keeping valid entries");
        resource
    })
}

fn bundle(language: &str, ftl: &str) -> Bundle {
    let lang_id: LanguageIdentifier = language.parse().unwrap_or_default();
    let mut bundle = FluentBundle::new_concurrent(vec![lang_id]);
    bundle.set_use_isolating(false);
    if let Err(errors) = bundle.add_resource(parse(language, ftl)) {
        tracing::error!(language, ?errors, "duplicate catalog entries");
    }
    bundle
}

fn format(bundle: &Bundle, id: &str) -> Option<String> {
    let pattern = bundle.get_message(id)?.value()?;
    let mut errors = vec![];
    let text = bundle.format_pattern(pattern, None, &mut errors);
    if !errors.is_empty() {
        tracing::warn!(id, ?errors, "message failed to format");
        return None;
    }
    Some(text.into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    language: Option<&'static str>,
}

impl Translator {
    /// Select the catalog for a locale such as `nl_NL`, `nl-BE` or
    /// `nl_NL.UTF-8`. Only the language part is considered.
    pub fn for_locale(locale: Option<&str>) -> Self {
        let tag = locale
            .unwrap_or_default()
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .replace('_', "-")
            .to_ascii_lowercase();

        let language = tag
            .parse::<LanguageIdentifier>()
            .ok()
            .and_then(|id| {
                TRANSLATIONS
                    .iter()
                    .map(|(language, _)| *language)
                    .find(|language| *language == id.language.as_str())
            });

        Self { language }
    }

    pub fn dgettext(&self, msgid: &str) -> String {
        self.translate(msgid).unwrap_or_else(|| msgid.to_string())
    }

    fn translate(&self, msgid: &str) -> Option<String> {
        let catalog = &*CATALOG;
        let bundle = catalog.bundles.get(self.language?)?;
        let id = catalog.ids.get(msgid)?;
        format(bundle, id)
    }
}

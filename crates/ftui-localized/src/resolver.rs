//! Pluralization resolver: count + locale + category map → sub-template.
//!
//! The resolver owns no plural arithmetic. It asks a [`PluralClassifier`]
//! for the category and looks the tag up in the map. A tag that the map
//! does not carry is [`Resolution::NoMatch`], a normal outcome.

use crate::plural::{PluralCategory, PluralClassifier};
use crate::value::CategoryMap;

/// Outcome of a plural lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'m> {
    /// The sub-template for the classified category.
    Selected(&'m str),
    /// The map has no entry for the classified category.
    NoMatch(PluralCategory),
}

impl<'m> Resolution<'m> {
    #[must_use]
    pub fn selected(self) -> Option<&'m str> {
        match self {
            Self::Selected(template) => Some(template),
            Self::NoMatch(_) => None,
        }
    }
}

/// Selects plural sub-templates through a classifier.
#[derive(Clone, Copy)]
pub struct PluralResolver<'c> {
    classifier: &'c dyn PluralClassifier,
}

impl<'c> PluralResolver<'c> {
    #[must_use]
    pub fn new(classifier: &'c dyn PluralClassifier) -> Self {
        Self { classifier }
    }

    /// Pick the template in `forms` for `count` under `locale`'s rules.
    #[must_use]
    pub fn resolve<'m>(&self, count: f64, locale: &str, forms: &'m CategoryMap) -> Resolution<'m> {
        let category = self.classifier.category(count, locale);
        match forms.get(category.as_str()) {
            Some(template) => Resolution::Selected(template),
            None => Resolution::NoMatch(category),
        }
    }
}

impl std::fmt::Debug for PluralResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluralResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plural::CldrClassifier;

    fn horses() -> CategoryMap {
        [
            ("one".to_string(), "1 horse".to_string()),
            ("other".to_string(), "%{n} horses".to_string()),
        ]
        .into()
    }

    #[test]
    fn selects_matching_category() {
        let resolver = PluralResolver::new(&CldrClassifier);
        let forms = horses();
        assert_eq!(
            resolver.resolve(1.0, "en", &forms),
            Resolution::Selected("1 horse")
        );
        assert_eq!(
            resolver.resolve(2.0, "en", &forms).selected(),
            Some("%{n} horses")
        );
    }

    #[test]
    fn missing_category_is_no_match() {
        let resolver = PluralResolver::new(&CldrClassifier);
        let forms: CategoryMap = [("one".to_string(), "one horse".to_string())].into();
        assert_eq!(
            resolver.resolve(2.0, "en", &forms),
            Resolution::NoMatch(PluralCategory::Other)
        );
        // Russian 3 is `few`, which this map lacks.
        assert_eq!(resolver.resolve(3.0, "ru", &horses()).selected(), None);
    }

    #[test]
    fn custom_classifier_is_consulted() {
        let always_few = |_: f64, _: &str| PluralCategory::Few;
        let resolver = PluralResolver::new(&always_few);
        let forms: CategoryMap = [("few".to_string(), "several".to_string())].into();
        assert_eq!(
            resolver.resolve(100.0, "en", &forms),
            Resolution::Selected("several")
        );
    }
}

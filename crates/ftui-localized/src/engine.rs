//! Substitution engine.
//!
//! Walks a parsed [`Template`] and resolves each directive against the
//! bound argument. Selected plural sub-templates are parsed and rendered
//! recursively against the same keyed argument.
//!
//! # Failure Modes
//!
//! | Directive | Positional argument | Keyed, key absent | Keyed, key present |
//! |-----------|---------------------|-------------------|--------------------|
//! | `%spec` | next value; `PositionalExhausted` when out | `ArgumentShapeMismatch` | `ArgumentShapeMismatch` |
//! | `%<key>spec` | `ArgumentShapeMismatch` | `MissingRequiredKey` | formatted |
//! | `%{key}` | `ArgumentShapeMismatch` | `MissingRequiredKey` | stringified |
//! | `%{count:rules}` | source text kept | source text kept | plural sub-template, or source text on no match |
//! | `%<{...}>` | source text kept | source text kept | plural sub-template, or source text on no match |
//!
//! Any error aborts the whole call: output is built in a local buffer that
//! is only returned on success.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::config::FormatConfig;
use crate::directive::{Directive, DirectiveKind};
use crate::error::{ArgumentShape, FormatError};
use crate::plural::{CldrClassifier, PluralClassifier};
use crate::resolver::{PluralResolver, Resolution};
use crate::sprintf::FormatSpec;
use crate::template::{Segment, Template};
use crate::value::{Argument, Bindings, CategoryMap, Value};

/// Renders templates with a fixed configuration and plural classifier.
///
/// A `Formatter` holds no per-call state and is `Send + Sync`.
pub struct Formatter {
    config: FormatConfig,
    classifier: Box<dyn PluralClassifier>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(FormatConfig::default())
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Formatter {
    /// Formatter with the built-in CLDR classifier.
    #[must_use]
    pub fn new(config: FormatConfig) -> Self {
        Self {
            config,
            classifier: Box::new(CldrClassifier),
        }
    }

    /// Replace the plural classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl PluralClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Process-wide formatter built from [`FormatConfig::global`].
    pub fn shared() -> &'static Self {
        static SHARED: OnceLock<Formatter> = OnceLock::new();
        SHARED.get_or_init(|| Self::new(FormatConfig::global().clone()))
    }

    #[must_use]
    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Parse `template` and render it.
    pub fn format(
        &self,
        template: &str,
        argument: &Argument,
        locale: &str,
    ) -> Result<String, FormatError> {
        let template = Template::parse(template)?;
        self.render(&template, argument, locale)
    }

    /// Render an already parsed template.
    pub fn render(
        &self,
        template: &Template,
        argument: &Argument,
        locale: &str,
    ) -> Result<String, FormatError> {
        let pass = Pass {
            resolver: PluralResolver::new(self.classifier.as_ref()),
            locale,
            max_depth: self.config.max_depth,
        };
        let mut bindings = Bindings::bind(argument);
        let mut out = String::with_capacity(template.source().len());
        if let Err(err) = pass.render_into(template, &mut bindings, 0, &mut out) {
            tracing::debug!(
                template = template.source(),
                shape = %bindings.shape(),
                %err,
                "format aborted"
            );
            return Err(err);
        }
        Ok(out)
    }
}

/// Parse `template` and render it with the shared formatter.
///
/// ```
/// use ftui_localized::{Argument, Value, format};
///
/// let horses: ftui_localized::CategoryMap = [
///     ("one".to_string(), "1 horse".to_string()),
///     ("other".to_string(), "%{horses_count} horses".to_string()),
/// ]
/// .into();
/// let arg = Argument::keyed([
///     ("horses_count", Value::from(2)),
///     ("horses", Value::from(horses)),
/// ]);
/// assert_eq!(format("%{horses_count:horses}", &arg, "en").unwrap(), "2 horses");
/// ```
pub fn format(template: &str, argument: &Argument, locale: &str) -> Result<String, FormatError> {
    Formatter::shared().format(template, argument, locale)
}

/// Immutable context of one top-level render call.
struct Pass<'a> {
    resolver: PluralResolver<'a>,
    locale: &'a str,
    max_depth: usize,
}

impl Pass<'_> {
    fn render_into(
        &self,
        template: &Template,
        bindings: &mut Bindings<'_>,
        depth: usize,
        out: &mut String,
    ) -> Result<(), FormatError> {
        for segment in template.segments() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Directive(directive) => {
                    self.directive(directive, bindings, depth, out)?;
                }
            }
        }
        Ok(())
    }

    fn directive(
        &self,
        directive: &Directive,
        bindings: &mut Bindings<'_>,
        depth: usize,
        out: &mut String,
    ) -> Result<(), FormatError> {
        match directive.kind() {
            DirectiveKind::PositionalFormat(spec) => {
                let Bindings::Positional(cursor) = bindings else {
                    return Err(mismatch(directive, ArgumentShape::Positional));
                };
                let supplied = cursor.supplied();
                let value = cursor.next_value().ok_or_else(|| FormatError::PositionalExhausted {
                    placeholder: directive.source().to_string(),
                    supplied,
                })?;
                out.push_str(&spec.apply(value)?);
            }
            DirectiveKind::NamedFormat { key, spec } => {
                let value = required(directive, bindings, key)?;
                push_named(out, value, spec.as_ref())?;
            }
            DirectiveKind::NamedValue { key } => {
                let value = required(directive, bindings, key)?;
                push_named(out, value, None)?;
            }
            DirectiveKind::PluralReference {
                count_key,
                rules_key,
            } => {
                let forms = match *bindings {
                    Bindings::Keyed(map) => map.get(rules_key.as_str()).and_then(Value::as_rules),
                    Bindings::Positional(_) => None,
                };
                self.plural(directive, bindings, count_key, forms, depth, out)?;
            }
            DirectiveKind::InlinePlural { count_key, forms } => {
                self.plural(directive, bindings, count_key, Some(forms), depth, out)?;
            }
        }
        Ok(())
    }

    /// Render the plural sub-template, or keep the placeholder text when
    /// the argument cannot drive a selection.
    fn plural(
        &self,
        directive: &Directive,
        bindings: &Bindings<'_>,
        count_key: &str,
        forms: Option<&CategoryMap>,
        depth: usize,
        out: &mut String,
    ) -> Result<(), FormatError> {
        let Bindings::Keyed(map) = *bindings else {
            return fallback(directive, "argument is not keyed", out);
        };
        let Some(forms) = forms else {
            return fallback(directive, "no plural rules bound", out);
        };
        let Some(count) = map.get(count_key).and_then(Value::as_number) else {
            return fallback(directive, "no numeric count bound", out);
        };

        match self.resolver.resolve(count, self.locale, forms) {
            Resolution::Selected(sub) => self.subtemplate(sub, map, depth + 1, out),
            Resolution::NoMatch(category) => {
                tracing::trace!(
                    placeholder = directive.source(),
                    %category,
                    "no plural form for category"
                );
                out.push_str(directive.source());
                Ok(())
            }
        }
    }

    fn subtemplate(
        &self,
        source: &str,
        map: &BTreeMap<String, Value>,
        depth: usize,
        out: &mut String,
    ) -> Result<(), FormatError> {
        if depth > self.max_depth {
            return Err(FormatError::RecursionLimitExceeded {
                limit: self.max_depth,
            });
        }
        tracing::trace!(depth, template = source, "rendering plural sub-template");
        let template = Template::parse(source)?;
        self.render_into(&template, &mut Bindings::Keyed(map), depth, out)
    }
}

fn mismatch(directive: &Directive, expected: ArgumentShape) -> FormatError {
    FormatError::ArgumentShapeMismatch {
        placeholder: directive.source().to_string(),
        expected,
    }
}

/// Value for a plain named placeholder; these never fall back.
fn required<'v>(
    directive: &Directive,
    bindings: &Bindings<'v>,
    key: &str,
) -> Result<&'v Value, FormatError> {
    match *bindings {
        Bindings::Keyed(map) => map
            .get(key)
            .ok_or_else(|| FormatError::MissingRequiredKey {
                key: key.to_string(),
            }),
        Bindings::Positional(_) => Err(mismatch(directive, ArgumentShape::Keyed)),
    }
}

fn push_named(
    out: &mut String,
    value: &Value,
    spec: Option<&FormatSpec>,
) -> Result<(), FormatError> {
    match spec {
        Some(spec) => out.push_str(&spec.apply(value)?),
        None => {
            use fmt::Write as _;
            // Writing into a String cannot fail.
            let _ = write!(out, "{value}");
        }
    }
    Ok(())
}

fn fallback(
    directive: &Directive,
    reason: &'static str,
    out: &mut String,
) -> Result<(), FormatError> {
    tracing::trace!(
        placeholder = directive.source(),
        reason,
        "plural placeholder left as-is"
    );
    out.push_str(directive.source());
    Ok(())
}

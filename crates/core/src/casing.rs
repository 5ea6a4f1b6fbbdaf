//! Tag and attribute name normalization for JSX frameworks.
//!
//! Directive names are written however the author likes (`my-component`,
//! `Note`, `DIV`), while JSX runtimes want PascalCase components and lowercase
//! HTML tags. The factories here produce hooks for
//! [`Options::with_tag_transform`](crate::Options::with_tag_transform) and
//! [`Options::with_attribute_transform`](crate::Options::with_attribute_transform).

use std::collections::HashSet;
use std::str::FromStr;

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::DirectiveError;

/// Standard HTML element names (the `html-tags` list).
const HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col", "colgroup",
    "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt", "em", "embed",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins", "kbd",
    "label", "legend", "li", "link", "main", "map", "mark", "math", "menu", "meta", "meter",
    "nav", "noscript", "object", "ol", "optgroup", "option", "output", "p", "picture", "pre",
    "progress", "q", "rp", "rt", "ruby", "s", "samp", "script", "search", "section", "select",
    "slot", "small", "source", "span", "strong", "style", "sub", "summary", "sup", "svg", "table",
    "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track",
    "u", "ul", "var", "video", "wbr",
];

static HTML_TAG_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| HTML_TAGS.iter().copied().collect());

/// Returns true if `tag` (already lowercased) is a standard HTML element name.
pub fn is_html_tag(tag: &str) -> bool {
    HTML_TAG_SET.contains(tag)
}

/// Casing convention applied to names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casing {
    /// `myComponent`
    Camel,
    /// `MyComponent`
    Pascal,
    /// `my-component`
    Kebab,
    /// `my_component`
    Snake,
    /// Leave names untouched.
    None,
}

impl Casing {
    /// Applies this casing to `input`.
    pub fn apply(self, input: &str) -> String {
        match self {
            Casing::Camel => input.to_lower_camel_case(),
            Casing::Pascal => input.to_upper_camel_case(),
            Casing::Kebab => input.to_kebab_case(),
            Casing::Snake => input.to_snake_case(),
            Casing::None => input.to_string(),
        }
    }

    /// Configuration name of this casing.
    pub fn as_str(self) -> &'static str {
        match self {
            Casing::Camel => "camel",
            Casing::Pascal => "pascal",
            Casing::Kebab => "kebab",
            Casing::Snake => "snake",
            Casing::None => "none",
        }
    }
}

impl std::fmt::Display for Casing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Casing {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "camel" => Ok(Casing::Camel),
            "pascal" => Ok(Casing::Pascal),
            "kebab" => Ok(Casing::Kebab),
            "snake" => Ok(Casing::Snake),
            "none" => Ok(Casing::None),
            other => Err(DirectiveError::UnknownCasing(other.to_string())),
        }
    }
}

/// Switches for [`normalize_attribute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeCasing {
    /// Rename `class` to `className` after casing (React, Solid).
    pub class_name: bool,
}

/// Returns a tag transform that lowercases HTML tags and applies `casing` to
/// everything else.
///
/// `Casing::Pascal` is the convention of React, Astro, Solid, Vue and Svelte.
///
/// ```
/// use directive_mdx_core::{Casing, normalize_tag};
///
/// let normalize = normalize_tag(Casing::Pascal);
/// assert_eq!(normalize("DIV"), "div");
/// assert_eq!(normalize("my-component"), "MyComponent");
/// ```
pub fn normalize_tag(casing: Casing) -> impl Fn(&str) -> String + Send + Sync + 'static {
    move |tag: &str| {
        let lower = tag.to_lowercase();
        if is_html_tag(&lower) {
            return lower;
        }
        casing.apply(tag)
    }
}

/// Returns an attribute transform that applies `casing` to attribute names,
/// optionally renaming `class` to `className`.
///
/// `Casing::Camel` is the convention of React and Solid. The tag argument of
/// the returned function is ignored.
pub fn normalize_attribute(
    casing: Casing,
    options: AttributeCasing,
) -> impl Fn(&str, &str) -> String + Send + Sync + 'static {
    move |_tag: &str, attr: &str| {
        let normalized = casing.apply(attr);
        if options.class_name && normalized == "class" {
            return "className".to_string();
        }
        normalized
    }
}

use xmlseed_core::Facets;

use crate::facets::{LengthLimits, text_length};

const FILLER: char = 'x';
const URI_STEM: &str = "http://example.com/";
const LANGUAGE_TAGS: &[&str] = &["en", "fr", "de", "es", "it", "pt"];

/// Flavor of a string generator; only changes the stem and the usage id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFlavor {
    Plain,
    Uri,
    /// Fallback for `anyType`, `anySimpleType` and unresolved types.
    Universal,
}

/// Counter-suffixed strings: `stem + prefix + counter`, fitted to the length
/// facets.
#[derive(Debug, Clone)]
pub struct TextGenerator {
    flavor: TextFlavor,
    prefix: String,
    counter: u64,
    limits: LengthLimits,
}

impl TextGenerator {
    pub fn new(flavor: TextFlavor, facets: &Facets) -> Self {
        Self {
            flavor,
            prefix: String::new(),
            counter: 0,
            limits: LengthLimits::from_facets(facets),
        }
    }

    pub fn plain(facets: &Facets) -> Self {
        Self::new(TextFlavor::Plain, facets)
    }

    pub fn universal() -> Self {
        Self::new(TextFlavor::Universal, &Facets::default())
    }

    pub fn flavor(&self) -> TextFlavor {
        self.flavor
    }

    pub fn set_prefix(&mut self, prefix: &str) {
        self.prefix = prefix.to_string();
    }

    pub fn next_value(&mut self) -> String {
        self.counter = self.counter.checked_add(1).unwrap_or(1);
        let stem = match self.flavor {
            TextFlavor::Uri => format!("{URI_STEM}{}", self.prefix),
            TextFlavor::Plain | TextFlavor::Universal => self.prefix.clone(),
        };
        fit_text(&stem, &self.counter.to_string(), &self.limits)
    }
}

/// Fit `stem + digits` to the length limits.
///
/// When the target is no longer than the digits, the trailing digits are
/// kept. Otherwise the stem is cut or padded so the digits end the value.
pub fn fit_text(stem: &str, digits: &str, limits: &LengthLimits) -> String {
    let natural = text_length(stem) + text_length(digits);
    let target = limits.resolve(natural);
    if target == natural {
        return format!("{stem}{digits}");
    }

    let digit_count = text_length(digits);
    if target <= digit_count {
        return digits.chars().skip(digit_count - target).collect();
    }

    let stem_target = target - digit_count;
    let mut out: String = stem.chars().take(stem_target).collect();
    let missing = stem_target - text_length(&out);
    out.extend(std::iter::repeat_n(FILLER, missing));
    out.push_str(digits);
    out
}

/// Cycles through a fixed list of values.
#[derive(Debug, Clone)]
pub struct EnumCycle {
    values: Vec<String>,
    position: usize,
}

impl EnumCycle {
    /// `None` for an empty value list.
    pub fn new(values: &[String]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self {
            values: values.to_vec(),
            position: 0,
        })
    }

    /// Language tags for `xs:language`.
    pub fn language() -> Self {
        Self {
            values: LANGUAGE_TAGS.iter().map(|tag| tag.to_string()).collect(),
            position: 0,
        }
    }

    pub fn next_value(&mut self) -> String {
        let value = self.values.get(self.position).cloned().unwrap_or_default();
        self.position = (self.position + 1) % self.values.len().max(1);
        value
    }
}

/// Alternates `true` and `false`, starting with `true`.
#[derive(Debug, Clone)]
pub struct BooleanGenerator {
    next: bool,
}

impl Default for BooleanGenerator {
    fn default() -> Self {
        Self { next: true }
    }
}

impl BooleanGenerator {
    pub fn next_value(&mut self) -> String {
        let value = self.next;
        self.next = !value;
        value.to_string()
    }
}

use serde::Deserialize;
use std::collections::HashMap;

static PLURAL_EXCEPTIONS: &str = include_str!("plural_exceptions.json");

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PluralException {
    #[serde(rename = "resourceKind")]
    pub resource_kind: String,
    pub plural: String,
}

/// Kinds whose plural is not `<Kind>s`. Looked up by exact kind, never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PluralTable {
    plurals: HashMap<String, String>,
}

impl PluralTable {
    /// The table shipped with the crate.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(PLURAL_EXCEPTIONS)
    }

    /// Parses a `[{"resourceKind": .., "plural": ..}]` document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let exceptions: Vec<PluralException> = serde_json::from_str(json)?;
        Ok(exceptions.into_iter().collect())
    }

    pub fn plural_of(&self, kind: &str) -> Option<&str> {
        self.plurals.get(kind).map(String::as_str)
    }
}

impl FromIterator<PluralException> for PluralTable {
    fn from_iter<I: IntoIterator<Item = PluralException>>(iter: I) -> Self {
        let plurals = iter.into_iter().map(|e| (e.resource_kind, e.plural)).collect();
        Self { plurals }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Method names for one verb of one resource.
///
/// The first name is always `<verb><Kind><Sub>`, where `<Sub>` is the capitalized
/// sub-resource of `segment` (`pods/log` gives `Log`). `list` also gets a
/// `get<Plural>` alias; kinds missing from `plurals` are pluralized with a plain `s`.
pub fn method_names(verb: &str, kind: &str, segment: &str, plurals: &PluralTable) -> Vec<String> {
    let suffix = segment.split('/').nth(1).map(capitalize).unwrap_or_default();
    let mut names = vec![format!("{}{}{}", verb, kind, suffix)];

    if verb == "list" {
        let alias = match plurals.plural_of(kind) {
            Some(plural) => format!("get{}", plural),
            None => format!("get{}s", kind),
        };
        names.push(alias);
    }
    names
}

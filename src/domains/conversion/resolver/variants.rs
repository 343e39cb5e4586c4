//! Candidate file name derivation.

use std::path::Path;

use super::MatchKind;

/// A file name (or `stem.*` pattern) the resolver looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameVariant {
    /// The literal file name, or the stem when `wildcard` is set.
    pub name: String,
    /// How this variant relates to the requested name.
    pub kind: MatchKind,
    /// Matches `<name>.<any extension>` instead of `name` exactly.
    pub wildcard: bool,
}

impl NameVariant {
    fn literal(name: String, kind: MatchKind) -> Self {
        Self {
            name,
            kind,
            wildcard: false,
        }
    }

    /// Whether a file's basename satisfies this variant.
    pub fn matches(&self, file_name: &str) -> bool {
        if self.wildcard {
            file_name
                .strip_prefix(self.name.as_str())
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|ext| !ext.is_empty())
        } else {
            file_name == self.name
        }
    }
}

/// Derive the ordered list of name variants for `file_name`.
///
/// Order: original, lowercased, uppercased; then, if an extension is
/// expected, each of those with the extension substituted (as supplied, then
/// lowercased); finally a `stem.*` wildcard for every name so far. Duplicates
/// are dropped, keeping the first occurrence.
pub fn derive_variants(file_name: &str, expected_extension: Option<&str>) -> Vec<NameVariant> {
    let mut variants: Vec<NameVariant> = Vec::new();

    let base = [
        (file_name.to_string(), MatchKind::Exact),
        (file_name.to_lowercase(), MatchKind::CaseVariant),
        (file_name.to_uppercase(), MatchKind::CaseVariant),
    ];
    for (name, kind) in &base {
        push_unique(&mut variants, NameVariant::literal(name.clone(), *kind));
    }

    if let Some(ext) = expected_extension.map(|e| e.trim_start_matches('.')) {
        if !ext.is_empty() {
            let lowered = ext.to_lowercase();
            for (name, _) in &base {
                let stem = stem_of(name);
                push_unique(
                    &mut variants,
                    NameVariant::literal(format!("{stem}.{ext}"), MatchKind::ExtensionVariant),
                );
                push_unique(
                    &mut variants,
                    NameVariant::literal(format!("{stem}.{lowered}"), MatchKind::ExtensionVariant),
                );
            }
        }
    }

    let literals: Vec<String> = variants.iter().map(|v| v.name.clone()).collect();
    for name in literals {
        push_unique(
            &mut variants,
            NameVariant {
                name: stem_of(&name).to_string(),
                kind: MatchKind::WildcardStem,
                wildcard: true,
            },
        );
    }

    variants
}

fn push_unique(variants: &mut Vec<NameVariant>, variant: NameVariant) {
    if !variants
        .iter()
        .any(|v| v.name == variant.name && v.wildcard == variant.wildcard)
    {
        variants.push(variant);
    }
}

/// File name without its final extension (`report.tar.gz` -> `report.tar`).
pub fn stem_of(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

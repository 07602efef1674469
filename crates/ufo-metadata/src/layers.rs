//! Secondary layer validation.

use std::{collections::HashSet, fs::remove_file, io::ErrorKind, path::Path};

use log::debug;
use plist::Dictionary;

use crate::{
    bundle::{
        CONTENTS, DEFAULT_GLYPHS_DIR, ensure_bundle, glyph_contents, read_dictionary,
        secondary_layers, write_dictionary,
    },
    error::{Error, Result},
};

/// Glyphs removed from secondary layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerReport {
    /// `(layer, glyph)` pairs, in layer order.
    pub removed: Vec<(String, String)>,
}

impl LayerReport {
    pub fn is_clean(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Drop every entry of a layer's `contents.plist` whose glyph is not in
/// `known`. Returns the removed `(glyph, file)` pairs.
pub fn prune_contents(
    contents: &mut Dictionary,
    known: &HashSet<String>,
) -> Vec<(String, String)> {
    let stale: Vec<String> =
        contents.keys().filter(|name| !known.contains(*name)).cloned().collect();
    stale
        .into_iter()
        .map(|name| {
            let file =
                contents.remove(&name).and_then(|file| file.into_string()).unwrap_or_default();
            (name, file)
        })
        .collect()
}

/// Remove every glyph in a non-default layer of the UFO at `path` that has
/// no counterpart in the default layer.
///
/// Post-processing tools cache per-glyph results in a secondary layer; after
/// the default layer is regenerated, entries for glyphs that no longer exist
/// are stale. Only the affected layer's `contents.plist` and the stale
/// `.glif` files are touched.
pub fn validate_layers(path: &Path) -> Result<LayerReport> {
    ensure_bundle(path)?;
    let known: HashSet<String> =
        glyph_contents(&path.join(DEFAULT_GLYPHS_DIR))?.keys().cloned().collect();

    let mut report = LayerReport::default();
    for (layer, dir) in secondary_layers(path)? {
        let contents_path = dir.join(CONTENTS);
        if !contents_path.is_file() {
            continue;
        }
        let mut contents = read_dictionary(&contents_path)?;
        let stale = prune_contents(&mut contents, &known);
        if stale.is_empty() {
            continue;
        }

        for (glyph, file) in stale {
            let glif = dir.join(&file);
            if !file.is_empty()
                && let Err(source) = remove_file(&glif)
                && source.kind() != ErrorKind::NotFound
            {
                return Err(Error::Write { path: glif, source });
            }
            report.removed.push((layer.clone(), glyph));
        }
        write_dictionary(&contents_path, contents)?;
    }

    if !report.is_clean() {
        debug!("{}: removed {} stale layer glyphs", path.display(), report.removed.len());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use plist::Value;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_prune_removes_orphans_only() {
        let mut contents = Dictionary::new();
        contents.insert("a".into(), Value::from("a.glif"));
        contents.insert("old".into(), Value::from("old.glif"));
        let known = HashSet::from(["a".to_string(), "b".to_string()]);

        let stale = prune_contents(&mut contents, &known);
        assert_eq!(stale, [("old".to_string(), "old.glif".to_string())]);
        assert!(contents.contains_key("a"));
        assert!(!contents.contains_key("old"));
    }

    #[test]
    fn test_prune_clean_layer() {
        let mut contents = Dictionary::new();
        contents.insert("a".into(), Value::from("a.glif"));
        let known = HashSet::from(["a".to_string()]);
        assert!(prune_contents(&mut contents, &known).is_empty());
        assert_eq!(contents.len(), 1);
    }
}

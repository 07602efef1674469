//! Font and glyph lib cleanup.

use std::path::Path;

use designspace::{Element, Node};
use log::debug;
use plist::Dictionary;

use crate::{
    bundle::{
        DEFAULT_GLYPHS_DIR, LIB, ensure_bundle, glyph_files, read_dictionary, read_glif,
        write_dictionary, write_glif,
    },
    error::Result,
};

/// Font lib keys that survive cleanup.
pub const KEPT_LIB_KEYS: [&str; 2] =
    ["public.glyphOrder", "org.unifiedfontobject.normalizer.modTimes"];

const GLYPH_LIB: &str = "lib";

/// What [`clear_custom_libs`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibReport {
    /// Font lib keys deleted.
    pub removed_keys: usize,
    /// Default-layer glyphs whose lib was emptied.
    pub cleared_glyphs: usize,
}

/// Remove every key outside [`KEPT_LIB_KEYS`], returning how many went.
pub fn strip_font_lib(lib: &mut Dictionary) -> usize {
    let stale: Vec<String> =
        lib.keys().filter(|key| !KEPT_LIB_KEYS.contains(&key.as_str())).cloned().collect();
    for key in &stale {
        lib.remove(key);
    }
    stale.len()
}

/// Remove the `<lib>` element of a parsed `.glif`.
///
/// Returns `true` only if the lib held data; an empty lib is left alone.
pub fn strip_glyph_lib(glyph: &mut Element) -> bool {
    let has_data = glyph
        .elements_named(GLYPH_LIB)
        .any(|lib| lib.child("dict").is_some_and(|dict| dict.elements().next().is_some()));
    if !has_data {
        return false;
    }

    let mut kept: Vec<Node> = Vec::with_capacity(glyph.children.len());
    for node in std::mem::take(&mut glyph.children) {
        if matches!(&node, Node::Element(element) if element.name == GLYPH_LIB) {
            // Drop the indentation in front of the removed element as well.
            if matches!(kept.last(), Some(Node::Text(text)) if text.trim().is_empty()) {
                kept.pop();
            }
            continue;
        }
        kept.push(node);
    }
    glyph.children = kept;
    true
}

/// Strip custom lib data from the UFO at `path`.
///
/// `lib.plist` and the `.glif` files that carried lib data are the only files
/// rewritten.
pub fn clear_custom_libs(path: &Path) -> Result<LibReport> {
    ensure_bundle(path)?;
    let mut report = LibReport::default();

    let lib_path = path.join(LIB);
    if lib_path.is_file() {
        let mut lib = read_dictionary(&lib_path)?;
        report.removed_keys = strip_font_lib(&mut lib);
        if report.removed_keys > 0 {
            write_dictionary(&lib_path, lib)?;
        }
    }

    for file in glyph_files(&path.join(DEFAULT_GLYPHS_DIR))? {
        let mut glyph = read_glif(&file)?;
        if strip_glyph_lib(&mut glyph) {
            write_glif(&file, &glyph)?;
            report.cleared_glyphs += 1;
        }
    }

    debug!(
        "{}: removed {} font lib keys, cleared {} glyph libs",
        path.display(),
        report.removed_keys,
        report.cleared_glyphs
    );
    Ok(report)
}

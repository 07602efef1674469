//! File-level access to a UFO bundle.
//!
//! Operations read and rewrite only the files they change. The bundle is
//! never loaded as a whole font, so its format version, groups, kerning and
//! the rest stay byte-identical.

use std::{
    fs::{read_dir, read_to_string, write},
    path::{Path, PathBuf},
};

use designspace::Element;
use plist::{Dictionary, Value};

use crate::error::{Error, Result};

const METAINFO: &str = "metainfo.plist";
const LAYER_CONTENTS: &str = "layercontents.plist";
pub(crate) const LIB: &str = "lib.plist";
pub(crate) const CONTENTS: &str = "contents.plist";

/// Glyph directory of the default layer.
pub const DEFAULT_GLYPHS_DIR: &str = "glyphs";

/// Prefix of glyph directories outside the default layer.
const LAYER_DIR_PREFIX: &str = "glyphs.";

pub(crate) fn ensure_bundle(path: &Path) -> Result<()> {
    if path.join(METAINFO).is_file() {
        Ok(())
    } else {
        Err(Error::NotUfo { path: path.to_path_buf() })
    }
}

fn malformed(path: &Path, reason: &str) -> Error {
    Error::Malformed { path: path.to_path_buf(), reason: reason.to_string() }
}

fn read_value(path: &Path) -> Result<Value> {
    Value::from_file(path).map_err(|source| Error::Plist { path: path.to_path_buf(), source })
}

pub(crate) fn read_dictionary(path: &Path) -> Result<Dictionary> {
    read_value(path)?.into_dictionary().ok_or_else(|| malformed(path, "expected a dictionary"))
}

pub(crate) fn write_dictionary(path: &Path, dict: Dictionary) -> Result<()> {
    Value::Dictionary(dict)
        .to_file_xml(path)
        .map_err(|source| Error::Plist { path: path.to_path_buf(), source })
}

/// The glyph name to file name map of a glyph directory. A directory without
/// `contents.plist` holds no glyphs.
pub(crate) fn glyph_contents(dir: &Path) -> Result<Dictionary> {
    let contents = dir.join(CONTENTS);
    if contents.is_file() { read_dictionary(&contents) } else { Ok(Dictionary::new()) }
}

/// Paths of the `.glif` files listed in a glyph directory, in listing order.
pub(crate) fn glyph_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let contents = glyph_contents(dir)?;
    contents
        .iter()
        .map(|(_, file)| {
            file.as_string()
                .map(|file| dir.join(file))
                .ok_or_else(|| malformed(&dir.join(CONTENTS), "file name is not a string"))
        })
        .collect()
}

pub(crate) fn read_glif(path: &Path) -> Result<Element> {
    let text =
        read_to_string(path).map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
    Element::parse(&text).map_err(|source| Error::Glif { path: path.to_path_buf(), source })
}

pub(crate) fn write_glif(path: &Path, glyph: &Element) -> Result<()> {
    write(path, glyph.to_document_string())
        .map_err(|source| Error::Write { path: path.to_path_buf(), source })
}

/// `(layer name, directory)` for every glyph directory except the default.
///
/// Layers come from `layercontents.plist` when present. Any other
/// `glyphs.*` directory with a `contents.plist` is included too, named after
/// the directory, since format 2 bundles keep processed glyphs there without
/// listing them.
pub(crate) fn secondary_layers(path: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut layers = Vec::new();

    let layer_contents = path.join(LAYER_CONTENTS);
    if layer_contents.is_file() {
        let value = read_value(&layer_contents)?;
        let entries =
            value.as_array().ok_or_else(|| malformed(&layer_contents, "expected an array"))?;
        for entry in entries {
            let pair = entry.as_array().map(Vec::as_slice);
            let Some([name, dir]) = pair else {
                return Err(malformed(&layer_contents, "expected [name, directory] pairs"));
            };
            let (Some(name), Some(dir)) = (name.as_string(), dir.as_string()) else {
                return Err(malformed(&layer_contents, "layer entries must be strings"));
            };
            if dir != DEFAULT_GLYPHS_DIR {
                layers.push((name.to_string(), path.join(dir)));
            }
        }
    }

    let read_error = |source| Error::Read { path: path.to_path_buf(), source };
    let mut unlisted = Vec::new();
    for entry in read_dir(path).map_err(read_error)? {
        let dir = entry.map_err(read_error)?.path();
        let is_layer_dir = dir
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LAYER_DIR_PREFIX));
        if is_layer_dir
            && dir.join(CONTENTS).is_file()
            && !layers.iter().any(|(_, listed)| *listed == dir)
        {
            unlisted.push(dir);
        }
    }
    unlisted.sort();
    layers.extend(unlisted.into_iter().filter_map(|dir| {
        let name = dir.file_name()?.to_str()?.to_string();
        Some((name, dir))
    }));

    Ok(layers)
}

//! Instance selection over a designspace document.

use std::{
    collections::BTreeSet,
    ffi::OsString,
    fs::{read_to_string, write},
    path::{Path, PathBuf, absolute},
};

use crate::{
    error::{Error, Result},
    tree::{Element, Node},
};

/// Suffix appended to the document path to name the filtered copy.
pub const TEMP_SUFFIX: &str = ".temp";

const SOURCES: &str = "sources";
const SOURCE: &str = "source";
const INSTANCES: &str = "instances";
const INSTANCE: &str = "instance";
const FILENAME: &str = "filename";
const POSTSCRIPT_NAME: &str = "postscriptfontname";

/// An instance that will be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceEntry {
    /// Output UFO directory, as written in the (possibly resolved) document.
    pub path: PathBuf,
    pub postscript_name: String,
}

/// An instance element lacking `filename` or `postscriptfontname`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedInstance {
    /// The serialized element, for the skip warning.
    pub xml: String,
}

/// One instance element, either built or skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Build(InstanceEntry),
    Skip(SkippedInstance),
}

impl Candidate {
    fn from_element(element: &Element) -> Self {
        match (element.attribute(FILENAME), element.attribute(POSTSCRIPT_NAME)) {
            (Some(filename), Some(postscript_name)) => Self::Build(InstanceEntry {
                path: PathBuf::from(filename),
                postscript_name: postscript_name.to_string(),
            }),
            _ => Self::Skip(SkippedInstance { xml: element.to_xml() }),
        }
    }
}

/// Every instance element of a document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub candidates: Vec<Candidate>,
}

impl Selection {
    pub fn entries(&self) -> impl Iterator<Item = &InstanceEntry> {
        self.candidates.iter().filter_map(|candidate| match candidate {
            Candidate::Build(entry) => Some(entry),
            Candidate::Skip(_) => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SkippedInstance> {
        self.candidates.iter().filter_map(|candidate| match candidate {
            Candidate::Skip(skipped) => Some(skipped),
            Candidate::Build(_) => None,
        })
    }

    /// True when nothing can be built, skipped instances aside.
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries().map(|entry| entry.path.clone()).collect()
    }
}

/// A designspace document loaded from disk.
#[derive(Debug, Clone)]
pub struct DesignSpace {
    path: PathBuf,
    root: Element,
}

impl DesignSpace {
    /// Read and parse the document at `path`.
    ///
    /// The stored path is made absolute against the current directory so the
    /// document's own directory can serve as the base for relative filenames.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let read_error = |source| Error::Read { path: path.to_path_buf(), source };
        let path = absolute(path).map_err(read_error)?;
        let text = read_to_string(&path).map_err(read_error)?;
        Self::parse(path, &text)
    }

    /// Parse `text` as the document located at `path`.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        let root = Element::parse(text)
            .map_err(|source| Error::Parse { path: path.clone(), source })?;
        if root.child(INSTANCES).is_none() {
            return Err(Error::MissingInstances { path });
        }
        Ok(Self { path, root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Directory relative filenames in the document are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Path of the filtered copy: the document path with [`TEMP_SUFFIX`] appended.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(TEMP_SUFFIX);
        PathBuf::from(name)
    }

    fn instance_elements(&self) -> impl Iterator<Item = &Element> {
        self.root
            .child(INSTANCES)
            .into_iter()
            .flat_map(|instances| instances.elements_named(INSTANCE))
    }

    pub fn instance_count(&self) -> usize {
        self.instance_elements().count()
    }

    /// Keep only the instance elements whose zero-based position is in
    /// `indices`. An empty set keeps everything.
    ///
    /// Positions count `<instance>` elements only. Indices past the end match
    /// nothing, and the retained elements keep their relative order.
    pub fn retain_instances(&mut self, indices: &BTreeSet<usize>) {
        if indices.is_empty() {
            return;
        }
        let Some(instances) = self.root.child_mut(INSTANCES) else {
            return;
        };
        let mut position = 0;
        let retained: Vec<Node> = std::mem::take(&mut instances.children)
            .into_iter()
            .filter(|node| match node {
                Node::Element(element) if element.name == INSTANCE => {
                    let keep = indices.contains(&position);
                    position += 1;
                    keep
                }
                _ => true,
            })
            .collect();
        instances.children = retained;
    }

    /// Rewrite the `filename` of every source and instance as an absolute
    /// path based on the document's directory.
    pub fn resolve_paths(&mut self) {
        let base = self.base_dir().to_path_buf();
        for (collection, item) in [(SOURCES, SOURCE), (INSTANCES, INSTANCE)] {
            let Some(parent) = self.root.child_mut(collection) else {
                continue;
            };
            for element in parent.elements_named_mut(item) {
                if let Some(filename) = element.attributes.get_mut(FILENAME) {
                    let resolved = base.join(filename.as_str());
                    *filename = resolved.to_string_lossy().into_owned();
                }
            }
        }
    }

    /// Instances that carry both a `filename` and a `postscriptfontname`.
    pub fn selection(&self) -> Selection {
        Selection { candidates: self.instance_elements().map(Candidate::from_element).collect() }
    }

    pub fn to_xml(&self) -> String {
        self.root.to_document_string()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write(path, self.to_xml())
            .map_err(|source| Error::Write { path: path.to_path_buf(), source })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DOC: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<designspace format="3">
  <sources>
    <source filename="masters/Light.ufo" name="light" />
    <source filename="/abs/Bold.ufo" name="bold" />
  </sources>
  <instances>
    <instance filename="instances/A.ufo" postscriptfontname="Test-A" />
    <instance filename="instances/B.ufo" postscriptfontname="Test-B" />
    <instance filename="instances/C.ufo" postscriptfontname="Test-C" />
  </instances>
</designspace>
"#;

    fn doc() -> DesignSpace {
        DesignSpace::parse("/work/fonts/font.designspace", DOC).unwrap()
    }

    fn names(ds: &DesignSpace) -> Vec<String> {
        ds.selection().entries().map(|e| e.postscript_name.clone()).collect()
    }

    #[test]
    fn test_empty_index_set_keeps_all() {
        let mut ds = doc();
        ds.retain_instances(&BTreeSet::new());
        assert_eq!(names(&ds), ["Test-A", "Test-B", "Test-C"]);
    }

    #[test]
    fn test_single_index() {
        let mut ds = doc();
        ds.retain_instances(&BTreeSet::from([1]));
        assert_eq!(names(&ds), ["Test-B"]);
    }

    #[test]
    fn test_order_preserved() {
        let mut ds = doc();
        ds.retain_instances(&BTreeSet::from([2, 0]));
        assert_eq!(names(&ds), ["Test-A", "Test-C"]);
        assert_eq!(ds.instance_count(), 2);
    }

    #[test]
    fn test_out_of_range_indices_match_nothing() {
        let mut ds = doc();
        ds.retain_instances(&BTreeSet::from([7, 42]));
        assert_eq!(ds.instance_count(), 0);
        assert!(ds.selection().is_empty());
    }

    #[test]
    fn test_missing_postscript_name_is_skipped() {
        let text = DOC.replace(r#" postscriptfontname="Test-B""#, "");
        let ds = DesignSpace::parse("/work/font.designspace", &text).unwrap();
        let selection = ds.selection();
        assert_eq!(selection.entries().count(), 2);
        let skipped: Vec<&SkippedInstance> = selection.skipped().collect();
        assert_eq!(skipped.len(), 1);
        assert!(skipped[0].xml.contains("instances/B.ufo"));
    }

    #[test]
    fn test_candidates_follow_document_order() {
        let text = DOC.replace(r#" postscriptfontname="Test-B""#, "");
        let ds = DesignSpace::parse("/work/font.designspace", &text).unwrap();
        let selection = ds.selection();
        let order: Vec<&str> = selection
            .candidates
            .iter()
            .map(|candidate| match candidate {
                Candidate::Build(entry) => entry.postscript_name.as_str(),
                Candidate::Skip(_) => "skip",
            })
            .collect();
        assert_eq!(order, ["Test-A", "skip", "Test-C"]);
    }

    #[test]
    fn test_resolve_paths() {
        let mut ds = doc();
        ds.resolve_paths();
        let sources: Vec<&str> = ds
            .root()
            .child("sources")
            .unwrap()
            .elements_named("source")
            .filter_map(|s| s.attribute("filename"))
            .collect();
        assert_eq!(sources, ["/work/fonts/masters/Light.ufo", "/abs/Bold.ufo"]);
        assert_eq!(ds.selection().paths()[0], PathBuf::from("/work/fonts/instances/A.ufo"));
    }

    #[test]
    fn test_temp_path_appends_suffix() {
        let ds = doc();
        assert_eq!(ds.temp_path(), PathBuf::from("/work/fonts/font.designspace.temp"));
        assert_ne!(ds.temp_path(), ds.path());
    }

    #[test]
    fn test_missing_instances_element() {
        let err = DesignSpace::parse("x.designspace", "<designspace><sources/></designspace>")
            .unwrap_err();
        assert!(matches!(err, Error::MissingInstances { .. }));
    }

    #[test]
    fn test_malformed_xml() {
        let err = DesignSpace::parse("x.designspace", "<designspace>").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}

//! Load, filter and rewrite a designspace on disk.

use std::{collections::BTreeSet, fs};

use designspace::{DesignSpace, Error};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const DOC: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<designspace format="3">
  <axes>
    <axis default="0" maximum="1000" minimum="0" name="weight" tag="wght" />
  </axes>
  <sources>
    <source filename="masters/Light.ufo" name="light">
      <location><dimension name="weight" xvalue="0" /></location>
    </source>
  </sources>
  <instances>
    <instance filename="instances/Light.ufo" postscriptfontname="Test-Light">
      <location><dimension name="weight" xvalue="0" /></location>
      <info />
      <kerning />
    </instance>
    <instance filename="instances/Regular.ufo" name="no postscript name" />
    <instance filename="instances/Bold.ufo" postscriptfontname="Test-Bold">
      <location><dimension name="weight" xvalue="1000" /></location>
    </instance>
  </instances>
</designspace>
"#;

#[test]
fn test_filtered_copy_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("font.designspace");
    fs::write(&path, DOC).unwrap();

    let mut ds = DesignSpace::load(&path).unwrap();
    ds.retain_instances(&BTreeSet::from([0, 2, 2]));
    ds.resolve_paths();
    let temp = ds.temp_path();
    ds.save(&temp).unwrap();

    let copy = DesignSpace::load(&temp).unwrap();
    let selection = copy.selection();
    assert_eq!(selection.skipped().count(), 0);
    assert_eq!(
        selection.paths(),
        [dir.path().join("instances/Light.ufo"), dir.path().join("instances/Bold.ufo")]
    );

    // Children the interpolation engine reads are kept.
    let light = copy.root().child("instances").unwrap().elements_named("instance").next().unwrap();
    assert!(light.child("info").is_some());
    assert!(light.child("kerning").is_some());
    assert!(copy.root().child("axes").is_some());

    // The original is untouched.
    assert_eq!(fs::read_to_string(&path).unwrap(), DOC);
}

#[test]
fn test_skipped_instance_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("font.designspace");
    fs::write(&path, DOC).unwrap();

    let ds = DesignSpace::load(&path).unwrap();
    let selection = ds.selection();
    assert_eq!(selection.entries().count(), 2);
    let skipped: Vec<_> = selection.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].xml.contains("no postscript name"));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = DesignSpace::load(dir.path().join("absent.designspace")).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}

//! Command line parsing.
//!
//! Flags are single-dash words (`-log`, `-dec`), so parsing is done by hand
//! rather than through a derive parser.

use std::{collections::BTreeSet, path::PathBuf};

use ufo_instances_core::{Options, OptionsError};

pub const USAGE: &str = "\
   make-instances-ufo -h
   make-instances-ufo -u
   make-instances-ufo [-d <design space file name>] [-a] [-c] [-n] [-dec] [-i 0,1,..n] [-log <path>]

   -d <design space file path>
   Specifies alternate path to design space file. Default name is 'font.designspace'.

   -a ... do NOT autohint the instances. Default is to do so.
   -c ... do NOT remove the outline overlaps in the instances. Default is to do so.
   -n ... do NOT normalize the instances. Default is to do so.
   -dec . do NOT round coordinates to integer. Default is to do so.

   -i <list of instance indices>
   Specify the instances to generate. 'i' is a 0-based index of the instance records
   in the design space file.
      Example: '-i 1,4,22' -> generates only the 2nd, 5th, and 23rd instances

   -log <path>
   Also write the run log to <path>.
";

const DESCRIPTION: &str = "
   make-instances-ufo generates UFO font instances from a set of master design UFO fonts.
   The paths of the masters and instances fonts are specified in a design space XML file.
   Each generated instance is cleaned of custom lib data, normalized, checked for
   outline overlaps, and autohinted.
";

/// Usage text followed by a description of the tool.
pub fn help() -> String {
    format!("{USAGE}{DESCRIPTION}")
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(Options),
    Help,
    Usage,
}

/// Parse the arguments that follow the program name.
///
/// `-h` and `-u` win as soon as they are seen. Unknown flags and bad values
/// are all collected before failing; the design space path is checked only
/// when everything else parsed.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Invocation, OptionsError> {
    let mut options = Options::default();
    let mut messages = Vec::new();
    let mut tokens = args.iter().map(S::as_ref);

    while let Some(arg) = tokens.next() {
        match arg {
            "-h" => return Ok(Invocation::Help),
            "-u" => return Ok(Invocation::Usage),
            "-a" => options.do_autohint = false,
            "-c" => options.do_overlap_removal = false,
            "-n" => options.do_normalize = false,
            "-dec" => options.allow_decimal_coords = true,
            "-d" | "-log" | "-i" => {
                let Some(value) = tokens.next() else {
                    messages.push(format!("Error: missing value for {arg}"));
                    continue;
                };
                match arg {
                    "-d" => options.ds_path = PathBuf::from(value),
                    "-log" => options.log_file = Some(PathBuf::from(value)),
                    _ => match parse_indices(value) {
                        Some(indices) => options.indices = indices,
                        None => {
                            messages.push(format!("Error: invalid instance index list: {value}"));
                        }
                    },
                }
            }
            other => messages.push(format!("Error: unrecognized argument: {other}")),
        }
    }

    if messages.is_empty() && !options.ds_path.exists() {
        messages.push(format!(
            "Note: could not find design space file path: {}",
            options.ds_path.display()
        ));
    }
    if !messages.is_empty() {
        return Err(OptionsError { messages, log_file: options.log_file });
    }
    Ok(Invocation::Run(options))
}

/// Parse `1`, `1,4,22`, `[0,2]`, `(0, 2)` or `(1,)` into a set of indices.
///
/// A single trailing comma is allowed. `[]` and `()` select nothing, which
/// means every instance.
fn parse_indices(value: &str) -> Option<BTreeSet<usize>> {
    let value = value.trim();
    let bracketed = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .or_else(|| value.strip_prefix('(').and_then(|v| v.strip_suffix(')')));
    let inner = match bracketed {
        Some(inner) if inner.trim().is_empty() => return Some(BTreeSet::new()),
        Some(inner) => inner,
        None => value,
    };

    let mut items: Vec<&str> = inner.split(',').map(str::trim).collect();
    if items.len() > 1 && items.last() == Some(&"") {
        items.pop();
    }
    items.into_iter().map(|item| item.parse().ok()).collect()
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use pretty_assertions::assert_eq;
    use tempfile::{TempDir, tempdir};

    use super::*;

    fn with_designspace() -> (TempDir, String) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("font.designspace");
        write(&path, "<designspace />").unwrap();
        (dir, path.to_string_lossy().into_owned())
    }

    fn run_options(args: &[&str]) -> Options {
        match parse_args(args).unwrap() {
            Invocation::Run(options) => options,
            other => panic!("expected a run, got {other:?}"),
        }
    }

    #[test]
    fn test_index_syntaxes() {
        let cases: &[(&str, &[usize])] = &[
            ("1", &[1]),
            ("1,4,22", &[1, 4, 22]),
            ("[0,2]", &[0, 2]),
            ("(0, 2)", &[0, 2]),
            ("(1,)", &[1]),
            ("2,2,0", &[0, 2]),
            ("[]", &[]),
        ];
        for (input, expected) in cases {
            let parsed = parse_indices(input).unwrap();
            assert_eq!(parsed.into_iter().collect::<Vec<_>>(), *expected, "input {input:?}");
        }
    }

    #[test]
    fn test_bad_index_lists() {
        for input in ["", "a", "1,,2", "-1", "[1", "1.5", ","] {
            assert_eq!(parse_indices(input), None, "input {input:?}");
        }
    }

    #[test]
    fn test_flags() {
        let (_dir, ds) = with_designspace();
        let options = run_options(&["-d", &ds, "-a", "-c", "-n", "-dec", "-i", "[0,2]"]);
        assert_eq!(options.ds_path, PathBuf::from(&ds));
        assert!(!options.do_autohint);
        assert!(!options.do_overlap_removal);
        assert!(!options.do_normalize);
        assert!(options.allow_decimal_coords);
        assert_eq!(options.indices, BTreeSet::from([0, 2]));
        assert_eq!(options.log_file, None);
    }

    #[test]
    fn test_defaults_with_path() {
        let (_dir, ds) = with_designspace();
        let options = run_options(&["-d", &ds]);
        assert_eq!(options, Options { ds_path: PathBuf::from(&ds), ..Options::default() });
    }

    #[test]
    fn test_help_and_usage_stop_parsing() {
        assert_eq!(parse_args(&["-h", "-bogus"]).unwrap(), Invocation::Help);
        assert_eq!(parse_args(&["-u"]).unwrap(), Invocation::Usage);
        assert!(help().starts_with(USAGE));
    }

    #[test]
    fn test_unrecognized_arguments_accumulate() {
        let (_dir, ds) = with_designspace();
        let err = parse_args(&["-d", ds.as_str(), "-x", "--all", "-log", "run.log"]).unwrap_err();
        assert_eq!(
            err.messages,
            ["Error: unrecognized argument: -x", "Error: unrecognized argument: --all"]
        );
        assert_eq!(err.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn test_missing_value() {
        let err = parse_args(&["-a", "-d"]).unwrap_err();
        assert_eq!(err.messages, ["Error: missing value for -d"]);
    }

    #[test]
    fn test_invalid_index_list() {
        let (_dir, ds) = with_designspace();
        let err = parse_args(&["-d", ds.as_str(), "-i", "first"]).unwrap_err();
        assert_eq!(err.messages, ["Error: invalid instance index list: first"]);
    }

    #[test]
    fn test_missing_designspace() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.designspace");
        let err = parse_args(&["-d", missing.to_str().unwrap()]).unwrap_err();
        assert_eq!(
            err.messages,
            [format!("Note: could not find design space file path: {}", missing.display())]
        );
        assert_eq!(err.log_file, None);
    }
}

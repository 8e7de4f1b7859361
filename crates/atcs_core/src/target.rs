use std::path::{Path, PathBuf};

/// File name of the record inside a directory destination.
pub const RECORD_FILENAME: &str = "problem.json";

/// Where the serialized record goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    /// Path with an extension: the record only, images are not fetched.
    File(PathBuf),
    /// Path without an extension: created if missing, holds `problem.json` and images.
    Directory(PathBuf),
}

impl OutputTarget {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => OutputTarget::Stdout,
            Some(raw) => Self::from_path(PathBuf::from(raw)),
        }
    }

    pub fn from_path(path: PathBuf) -> Self {
        if has_extension(&path) {
            OutputTarget::File(path)
        } else {
            OutputTarget::Directory(path)
        }
    }

    /// Path of the written record, if any.
    pub fn record_path(&self) -> Option<PathBuf> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.clone()),
            OutputTarget::Directory(dir) => Some(dir.join(RECORD_FILENAME)),
        }
    }
}

// Looks at the text after the last separator: `.hidden` and `name.` count as
// having an extension, `out.d/` does not.
fn has_extension(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    let last = raw.rsplit(std::path::is_separator).next().unwrap_or("");
    last.contains('.')
}

#[cfg(test)]
mod tests {
    use super::{OutputTarget, RECORD_FILENAME};
    use std::path::PathBuf;

    #[test]
    fn no_argument_means_stdout() {
        assert_eq!(OutputTarget::from_arg(None), OutputTarget::Stdout);
        assert_eq!(OutputTarget::Stdout.record_path(), None);
    }

    #[test]
    fn extension_selects_file_mode() {
        assert_eq!(
            OutputTarget::from_arg(Some("out/result.json")),
            OutputTarget::File(PathBuf::from("out/result.json"))
        );
        assert_eq!(
            OutputTarget::from_arg(Some("notes.")),
            OutputTarget::File(PathBuf::from("notes."))
        );
        assert_eq!(
            OutputTarget::from_arg(Some(".hidden")),
            OutputTarget::File(PathBuf::from(".hidden"))
        );
    }

    #[test]
    fn trailing_separator_selects_directory_mode() {
        assert_eq!(
            OutputTarget::from_arg(Some("out.d/")),
            OutputTarget::Directory(PathBuf::from("out.d/"))
        );
    }

    #[test]
    fn bare_name_selects_directory_mode() {
        let target = OutputTarget::from_arg(Some("abc123_a"));
        assert_eq!(target, OutputTarget::Directory(PathBuf::from("abc123_a")));
        assert_eq!(
            target.record_path(),
            Some(PathBuf::from("abc123_a").join(RECORD_FILENAME))
        );
        assert_eq!(
            OutputTarget::from_arg(Some("v1.2/problem")),
            OutputTarget::Directory(PathBuf::from("v1.2/problem"))
        );
    }
}

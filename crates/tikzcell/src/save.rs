//! Saving documents, TikZ code and images to disk.

use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use log::info;

/// Resolves the final path for saving a file with extension `ext`.
///
/// Relative destinations are placed in `save_dir` when one is configured.
/// The extension is appended unless the destination already carries it, so
/// `figure` becomes `figure.svg` and `figure.v2` becomes `figure.v2.svg`.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use tikzcell::save::resolve_save_path;
///
/// assert_eq!(
///     resolve_save_path(Path::new("figure"), "svg", None),
///     PathBuf::from("figure.svg")
/// );
/// assert_eq!(
///     resolve_save_path(Path::new("figure.tex"), "tex", Some(Path::new("out"))),
///     PathBuf::from("out/figure.tex")
/// );
/// ```
pub fn resolve_save_path(dest: &Path, ext: &str, save_dir: Option<&Path>) -> PathBuf {
    let mut path = match save_dir {
        Some(dir) if dest.is_relative() => dir.join(dest),
        _ => dest.to_path_buf(),
    };

    if path.extension().and_then(OsStr::to_str) != Some(ext) {
        let mut file_name = path.file_name().map(OsStr::to_os_string).unwrap_or_default();
        file_name.push(".");
        file_name.push(ext);
        path.set_file_name(file_name);
    }

    path
}

/// Writes `contents` to the resolved destination, creating missing parent
/// directories, and returns the path written.
///
/// # Errors
///
/// Returns an I/O error if a directory cannot be created or the file cannot
/// be written.
pub fn save(
    dest: &Path,
    ext: &str,
    contents: &[u8],
    save_dir: Option<&Path>,
) -> io::Result<PathBuf> {
    let path = resolve_save_path(dest, ext, save_dir);

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;

    info!(path:% = path.display(), bytes = contents.len(); "File saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_appended() {
        assert_eq!(
            resolve_save_path(Path::new("output"), "tex", None),
            PathBuf::from("output.tex")
        );
        assert_eq!(
            resolve_save_path(Path::new("dir/fig.v1"), "png", None),
            PathBuf::from("dir/fig.v1.png")
        );
    }

    #[test]
    fn test_matching_extension_kept() {
        for (dest, ext) in [("a.tex", "tex"), ("a.tikz", "tikz"), ("a.pdf", "pdf")] {
            assert_eq!(
                resolve_save_path(Path::new(dest), ext, None),
                PathBuf::from(dest)
            );
        }
    }

    #[test]
    fn test_save_dir_only_applies_to_relative_paths() {
        let save_dir = Path::new("custom_dir");
        assert_eq!(
            resolve_save_path(Path::new("test.tex"), "tex", Some(save_dir)),
            PathBuf::from("custom_dir/test.tex")
        );

        let absolute = std::env::temp_dir().join("test.tex");
        assert_eq!(
            resolve_save_path(&absolute, "tex", Some(save_dir)),
            absolute
        );
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("new_dir/nested/figure");

        let written = save(&dest, "svg", b"<svg/>", None).unwrap();

        assert_eq!(written, dir.path().join("new_dir/nested/figure.svg"));
        assert_eq!(fs::read(&written).unwrap(), b"<svg/>");
    }

    #[test]
    fn test_save_into_save_dir() {
        let dir = tempfile::tempdir().unwrap();

        let written =
            save(Path::new("code"), "tikz", b"\\draw;", Some(dir.path())).unwrap();

        assert_eq!(written, dir.path().join("code.tikz"));
        assert!(written.exists());
    }
}

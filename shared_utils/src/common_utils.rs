//! Common Utilities Module
//!
//! Path helpers shared by the batch tools:
//! - extension matching (case-insensitive)
//! - mirroring a source-relative path into an output tree
//! - turning a caught panic payload into a readable message

use std::any::Any;
use std::path::{Path, PathBuf};

/// Returns the text after the last `.` of the file name, lower-cased, or an
/// empty string when the name has no dot. A dotfile such as `.png` yields
/// `png`.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::get_extension_lowercase;
///
/// assert_eq!(get_extension_lowercase(Path::new("test.JPG")), "jpg");
/// assert_eq!(get_extension_lowercase(Path::new("noext")), "");
/// assert_eq!(get_extension_lowercase(Path::new(".PNG")), "png");
/// ```
pub fn get_extension_lowercase(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()))
        .unwrap_or_default()
}

/// Case-insensitive extension check. `extensions` are given without the dot.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::has_extension;
///
/// let extensions = &["jpg", "png", "gif"];
/// assert!(has_extension(Path::new("photo.JPG"), extensions));
/// assert!(!has_extension(Path::new("notes.txt"), extensions));
/// ```
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let ext = get_extension_lowercase(path);
    !ext.is_empty() && extensions.contains(&ext.as_str())
}

/// Path of `path` relative to `root`, or `None` if `path` is not under `root`.
pub fn relative_to<'a>(root: &Path, path: &'a Path) -> Option<&'a Path> {
    path.strip_prefix(root).ok()
}

/// Places a source-relative path under `output_root` with its extension replaced.
///
/// Only the last extension is replaced, so `a.tar.png` becomes `a.tar.jpg`.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::mirror_with_extension;
///
/// let dest = mirror_with_extension(Path::new("out"), Path::new("sub/b.png"), "jpg");
/// assert_eq!(dest, Path::new("out/sub/b.jpg"));
/// ```
pub fn mirror_with_extension(output_root: &Path, relative: &Path, extension: &str) -> PathBuf {
    output_root.join(relative.with_extension(extension))
}

/// Best-effort text for a payload returned by `std::panic::catch_unwind`.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_extension_lowercase() {
        assert_eq!(get_extension_lowercase(Path::new("a.PNG")), "png");
        assert_eq!(get_extension_lowercase(Path::new("dir.d/file")), "");
        assert_eq!(get_extension_lowercase(Path::new(".hidden")), "hidden");
        assert_eq!(get_extension_lowercase(Path::new("trailing.")), "");
        assert_eq!(get_extension_lowercase(Path::new("a.tar.GZ")), "gz");
    }

    #[test]
    fn test_has_extension() {
        let exts = &["tif", "tiff"];
        assert!(has_extension(Path::new("scan.TIFF"), exts));
        assert!(has_extension(Path::new("scan.tif"), exts));
        assert!(!has_extension(Path::new("scan.tiff.bak"), exts));
        assert!(!has_extension(Path::new("tif"), exts));
        assert!(has_extension(Path::new("dir/.TIF"), exts));
    }

    #[test]
    fn test_relative_to() {
        let root = Path::new("/photos");
        assert_eq!(
            relative_to(root, Path::new("/photos/2024/a.png")),
            Some(Path::new("2024/a.png"))
        );
        assert_eq!(relative_to(root, Path::new("/elsewhere/a.png")), None);
    }

    #[test]
    fn test_mirror_with_extension() {
        assert_eq!(
            mirror_with_extension(Path::new("out"), Path::new("a.png"), "jpg"),
            PathBuf::from("out/a.jpg")
        );
        assert_eq!(
            mirror_with_extension(Path::new("out"), Path::new("x/y/archive.tar.webp"), "jpg"),
            PathBuf::from("out/x/y/archive.tar.jpg")
        );
        assert_eq!(
            mirror_with_extension(Path::new("out"), Path::new("already.jpg"), "jpg"),
            PathBuf::from("out/already.jpg")
        );
        assert_eq!(
            mirror_with_extension(Path::new("out"), Path::new("sub/.png"), "jpg"),
            PathBuf::from("out/sub/.png.jpg")
        );
    }

    #[test]
    fn test_panic_message() {
        let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(&*payload), "boom");

        let payload = std::panic::catch_unwind(|| panic!("code {}", 7)).unwrap_err();
        assert_eq!(panic_message(&*payload), "code 7");
    }
}

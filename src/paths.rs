use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// The only container extension we accept for input, and the one we append to
/// the output path.
pub const VIDEO_EXTENSION: &str = "mp4";

/// Check the input path before any handle is opened. Missing files and wrong
/// extensions are setup errors and terminate immediately.
pub fn validate_input(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("Input video does not exist: {}", path.display());
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !ext.eq_ignore_ascii_case(VIDEO_EXTENSION) {
        bail!(
            "Input file is not a .{} video: {}",
            VIDEO_EXTENSION,
            path.display()
        );
    }
    Ok(())
}

/// Build the output path from a destination directory and a base name,
/// appending the fixed container extension.
pub fn output_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, VIDEO_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn scratch_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("bartrack-{}-{}", std::process::id(), name));
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn accepts_existing_mp4() {
        let path = scratch_file("clip.mp4");
        assert!(validate_input(&path).is_ok());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn rejects_missing_file() {
        let path = std::env::temp_dir().join("bartrack-definitely-missing.mp4");
        let err = validate_input(&path).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn rejects_wrong_extension() {
        let path = scratch_file("notes.txt");
        let err = validate_input(&path).unwrap_err();
        assert!(err.to_string().contains("not a .mp4"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn output_path_joins_and_appends_extension() {
        let path = output_path(Path::new("/tmp/out"), "squat-set-3");
        assert_eq!(path, PathBuf::from("/tmp/out/squat-set-3.mp4"));
    }
}

use anyhow::Context as _;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(target_os = "windows")]
use dunce::simplified;

pub fn absolutize<P>(path: P) -> Result<PathBuf>
where
    P: AsRef<Path>,
{
    #[cfg(not(target_os = "windows"))]
    return Ok(path_abs::PathAbs::new(path)?.as_path().to_path_buf());

    #[cfg(target_os = "windows")]
    return Ok(simplified(path_abs::PathAbs::new(path)?.as_path()).to_path_buf());
}

/// Create `path` and its parents with mode 0755.
pub fn create_dir_all<P>(path: P) -> Result<()>
where
    P: AsRef<Path>,
{
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(target_family = "unix")]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder
        .create(path.as_ref())
        .with_context(|| format!("Can not create directory {:?}", path.as_ref()))
}

/// Remove `path` recursively if present, then create it empty.
pub fn reset_dir<P>(path: P) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_symlink() || path.is_file() {
        fs::remove_file(path).with_context(|| format!("Can not remove {:?}", path))?;
    } else if path.exists() {
        fs::remove_dir_all(path).with_context(|| format!("Can not remove {:?}", path))?;
    }
    create_dir_all(path)
}

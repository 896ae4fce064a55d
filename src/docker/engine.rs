use std::path::{Path, PathBuf};

/// Locate the container engine executable without spawning anything.
///
/// A value containing a path separator is checked as-is; a bare name is
/// searched on `PATH`.
pub fn resolve_engine(engine: &str) -> Option<PathBuf> {
    if engine.trim().is_empty() {
        return None;
    }

    let candidate = Path::new(engine);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .flat_map(|dir| executable_names(engine).map(move |name| dir.join(name)))
        .find(|p| is_executable(p))
}

#[cfg(not(windows))]
fn executable_names(engine: &str) -> impl Iterator<Item = String> {
    std::iter::once(engine.to_string())
}

#[cfg(windows)]
fn executable_names(engine: &str) -> impl Iterator<Item = String> {
    let exts = std::env::var("PATHEXT").unwrap_or_else(|_| ".EXE;.CMD;.BAT".into());
    let engine = engine.to_string();
    std::iter::once(engine.clone()).chain(
        exts.split(';')
            .filter(|e| !e.is_empty())
            .map(move |ext| format!("{engine}{ext}"))
            .collect::<Vec<_>>(),
    )
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Effective numeric user id, so containers write files as the invoking user.
/// `None` on platforms without POSIX ids.
pub fn user_id() -> Option<u32> {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple POSIX getter that always succeeds and has no side effects.
        Some(unsafe { libc::geteuid() })
    }

    #[cfg(not(unix))]
    {
        None
    }
}

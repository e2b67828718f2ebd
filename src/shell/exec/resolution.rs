use std::path::{Path, PathBuf};

use super::super::builtins::Builtin;
use super::super::env::Environment;
use super::types::Resolution;

/// Resolve a command name to a builtin or a program path
///
/// Rules, first match wins:
/// 1. Exact builtin name
/// 2. Contains `./` -> used as a literal path; existence and permission are the launcher's problem
/// 3. Search PATH directories in order, first existing entry wins (executability is checked by
///    execve, not here)
/// 4. Otherwise not found
pub fn resolve(command: &str, env: &Environment) -> Resolution {
    if let Some(builtin) = Builtin::from_name(command) {
        return Resolution::Builtin(builtin);
    }

    if command.contains("./") {
        return Resolution::External(PathBuf::from(command));
    }

    match env.get("PATH") {
        Some(path) => search_path(command, path)
            .map(Resolution::External)
            .unwrap_or(Resolution::NotFound),
        None => Resolution::NotFound,
    }
}

/// Find the first `dir/command` that exists in a colon-separated PATH
fn search_path(command: &str, path: &str) -> Option<PathBuf> {
    let found = path
        .split(':')
        .map(|dir| Path::new(dir).join(command))
        .find(|candidate| candidate.exists());
    tracing::trace!(command, ?found, "PATH search");
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn env_with_path(path: &str) -> Environment {
        [("PATH", path)].into_iter().collect()
    }

    #[test]
    fn builtins_win_over_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cd"), "").unwrap();
        let env = env_with_path(&dir.path().to_string_lossy());

        assert_eq!(resolve("cd", &env), Resolution::Builtin(Builtin::Cd));
        assert_eq!(resolve("exit", &env), Resolution::Builtin(Builtin::Exit));
    }

    #[test]
    fn relative_paths_are_deferred() {
        let env = Environment::new();
        assert_eq!(
            resolve("./does-not-exist", &env),
            Resolution::External(PathBuf::from("./does-not-exist"))
        );
        assert_eq!(
            resolve("../bin/tool", &env),
            Resolution::External(PathBuf::from("../bin/tool"))
        );
    }

    #[test]
    fn first_existing_path_entry_wins() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        fs::write(second.path().join("tool"), "").unwrap();
        fs::write(first.path().join("other"), "").unwrap();

        let path = format!(
            "{}:{}",
            first.path().display(),
            second.path().display()
        );
        let env = env_with_path(&path);
        assert_eq!(
            resolve("tool", &env),
            Resolution::External(second.path().join("tool"))
        );

        fs::write(first.path().join("tool"), "").unwrap();
        assert_eq!(
            resolve("tool", &env),
            Resolution::External(first.path().join("tool"))
        );
    }

    #[test]
    fn missing_path_or_entry_is_not_found() {
        assert_eq!(resolve("ls", &Environment::new()), Resolution::NotFound);

        let dir = tempdir().unwrap();
        let env = env_with_path(&dir.path().to_string_lossy());
        assert_eq!(resolve("zzz_not_a_real_cmd", &env), Resolution::NotFound);
    }
}

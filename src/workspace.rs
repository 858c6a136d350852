// src/workspace.rs
use crate::errors::{PipelineError, Result};
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// Length of the random workspace directory name. The name space
/// (36^32) is large enough that collisions between in-flight requests
/// are negligible without any locking.
const NAME_LEN: usize = 32;

/// Collision retries before the request is failed.
const MAX_ATTEMPTS: usize = 16;

const NAME_POOL: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// An exclusively-owned temporary directory holding one request's source
/// file and extraction artifacts. The directory is removed recursively
/// when the value is dropped, on every exit path.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Creates a uniquely-named directory under `root`, creating `root`
    /// itself if missing. Name collisions are re-rolled; `create_dir` is
    /// atomic, so two concurrent callers can never both claim a path.
    pub fn create(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;

        for _ in 0..MAX_ATTEMPTS {
            let path = root.join(random_alphanum(NAME_LEN));
            match fs::create_dir(&path) {
                Ok(()) => return Ok(Workspace { path }),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(PipelineError::WorkspaceExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        // Removing an already-missing directory is fine; nothing to do
        // about other errors during teardown either.
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Returns a random string of lowercase alphanumeric characters.
fn random_alphanum(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| NAME_POOL[rng.gen_range(0..NAME_POOL.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_alphanum_shape() {
        let name = random_alphanum(NAME_LEN);
        assert_eq!(name.len(), NAME_LEN);
        assert!(name.bytes().all(|b| NAME_POOL.contains(&b)));
    }

    #[test]
    fn test_create_makes_directory_and_drop_removes_it() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let ws = Workspace::create(root.path()).unwrap();
            assert!(ws.path().is_dir());
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_workspace_paths_are_distinct() {
        let root = tempfile::tempdir().unwrap();
        let a = Workspace::create(root.path()).unwrap();
        let b = Workspace::create(root.path()).unwrap();
        let c = Workspace::create(root.path()).unwrap();
        assert_ne!(a.path(), b.path());
        assert_ne!(a.path(), c.path());
        assert_ne!(b.path(), c.path());
    }

    #[test]
    fn test_drop_tolerates_already_removed_directory() {
        let root = tempfile::tempdir().unwrap();
        let ws = Workspace::create(root.path()).unwrap();
        fs::remove_dir_all(ws.path()).unwrap();
        drop(ws);
    }

    #[test]
    fn test_drop_runs_during_unwind() {
        let root = tempfile::tempdir().unwrap();
        let path = std::sync::Arc::new(std::sync::Mutex::new(PathBuf::new()));
        let path_clone = path.clone();
        let root_path = root.path().to_path_buf();

        let result = std::panic::catch_unwind(move || {
            let ws = Workspace::create(&root_path).unwrap();
            *path_clone.lock().unwrap() = ws.path().to_path_buf();
            panic!("mid-pipeline failure");
        });

        assert!(result.is_err());
        assert!(!path.lock().unwrap().exists());
    }
}

//! Primitive file operations.
//!
//! The only module that mutates the filesystem. Every primitive
//! returns a uniform `ActionResult` and never panics or propagates an
//! error outward; failures are classified into human-readable messages
//! (permission denied, missing source, invalid destination, generic
//! I/O).

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

use crate::types::ActionResult;

/// Open a path with the platform's default handler. Succeeds only if
/// the path exists; the handler process is spawned detached.
pub fn open_path(path: &Path) -> ActionResult {
    if !path.exists() {
        return ActionResult::fail(format!("{} does not exist", path.display()));
    }

    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(path);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };

    match command
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_) => {
            debug!(path = %path.display(), "opened with default handler");
            ActionResult::ok(
                format!("Opening {}", path.display()),
                Some(path.to_path_buf()),
            )
        }
        Err(e) => ActionResult::fail(format!(
            "Couldn't open {}: {}",
            path.display(),
            describe_io(&e)
        )),
    }
}

/// Copy a file into a destination directory, keeping its base name.
pub fn copy_file(source: &Path, dest_dir: &Path) -> ActionResult {
    if !source.exists() {
        return ActionResult::fail("Source file does not exist");
    }
    if !dest_dir.is_dir() {
        return ActionResult::fail("Destination is not a valid directory");
    }

    let Some(base_name) = source.file_name() else {
        return ActionResult::fail("Source has no file name");
    };
    let dest_path = dest_dir.join(base_name);

    match fs::copy(source, &dest_path) {
        Ok(_) => ActionResult::ok(
            format!("Copied to {}", dest_path.display()),
            Some(dest_path),
        ),
        Err(e) => ActionResult::fail(format!("Couldn't copy: {}", describe_io(&e))),
    }
}

/// Move a file into a destination directory. Refuses to overwrite an
/// existing file of the same base name, and verifies the postcondition
/// (destination exists, source gone) before reporting success.
pub fn move_file(source: &Path, dest_dir: &Path) -> ActionResult {
    if !source.exists() {
        return ActionResult::fail("Source file does not exist");
    }
    if !dest_dir.is_dir() {
        return ActionResult::fail("Destination is not a valid directory");
    }

    let Some(base_name) = source.file_name() else {
        return ActionResult::fail("Source has no file name");
    };
    let dest_path = dest_dir.join(base_name);

    if dest_path.exists() {
        return ActionResult::fail("File already exists in destination");
    }

    // Rename when the destination is on the same filesystem, copy and
    // remove across filesystems.
    let moved = match fs::rename(source, &dest_path) {
        Ok(()) => Ok(()),
        Err(_) => fs::copy(source, &dest_path)
            .and_then(|_| fs::remove_file(source)),
    };

    if let Err(e) = moved {
        return ActionResult::fail(format!("Couldn't move: {}", describe_io(&e)));
    }

    // Postcondition check: a move that "succeeded" without both sides
    // agreeing is reported as incomplete, not as success.
    if dest_path.exists() && !source.exists() {
        ActionResult::ok("File moved successfully", Some(dest_path))
    } else {
        warn!(source = %source.display(), dest = %dest_path.display(), "move postcondition failed");
        ActionResult::fail("Move operation incomplete")
    }
}

/// Send a path to the platform trash/recycle facility. Recoverable by
/// the user outside this system.
pub fn delete_soft(path: &Path) -> ActionResult {
    if !path.exists() {
        return ActionResult::fail(format!("{} does not exist", path.display()));
    }
    match trash::delete(path) {
        Ok(()) => ActionResult::ok("Sent to Recycle Bin", Some(path.to_path_buf())),
        Err(e) => ActionResult::fail(format!("Deletion failed: {}", e)),
    }
}

/// Unconditional, irreversible removal. No confirmation step here;
/// front ends that want a gate must add their own.
pub fn delete_hard(path: &Path) -> ActionResult {
    let removed = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match removed {
        Ok(()) => ActionResult::ok("Permanently deleted", Some(path.to_path_buf())),
        Err(e) => ActionResult::fail(format!("Deletion failed: {}", describe_io(&e))),
    }
}

fn describe_io(e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::PermissionDenied => {
            "permission denied - check file/directory permissions".to_string()
        }
        io::ErrorKind::NotFound => "path not found".to_string(),
        _ => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"content").unwrap();
    }

    #[test]
    fn test_open_missing_path_fails() {
        let tmp = TempDir::new().unwrap();
        let result = open_path(&tmp.path().join("ghost.pdf"));
        assert!(!result.success);
    }

    #[test]
    fn test_copy_keeps_source() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("a.txt");
        let dest_dir = tmp.path().join("dest");
        touch(&source);
        fs::create_dir(&dest_dir).unwrap();

        let result = copy_file(&source, &dest_dir);
        assert!(result.success, "{}", result.message);
        assert!(source.exists());
        assert!(dest_dir.join("a.txt").exists());
    }

    #[test]
    fn test_copy_into_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("a.txt");
        touch(&source);

        let result = copy_file(&source, &tmp.path().join("nowhere"));
        assert!(!result.success);
        assert!(result.message.contains("not a valid directory"));
    }

    #[test]
    fn test_move_succeeds() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("a.txt");
        let dest_dir = tmp.path().join("dest");
        touch(&source);
        fs::create_dir(&dest_dir).unwrap();

        let result = move_file(&source, &dest_dir);
        assert!(result.success, "{}", result.message);
        assert!(!source.exists());
        assert!(dest_dir.join("a.txt").exists());
    }

    #[test]
    fn test_move_refuses_overwrite_and_keeps_source() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("a.txt");
        let dest_dir = tmp.path().join("dest");
        touch(&source);
        fs::create_dir(&dest_dir).unwrap();
        touch(&dest_dir.join("a.txt"));

        let result = move_file(&source, &dest_dir);
        assert!(!result.success);
        assert!(result.message.contains("already exists"));
        assert!(source.exists());
    }

    #[test]
    fn test_move_missing_source_fails() {
        let tmp = TempDir::new().unwrap();
        let dest_dir = tmp.path().join("dest");
        fs::create_dir(&dest_dir).unwrap();

        let result = move_file(&tmp.path().join("ghost.txt"), &dest_dir);
        assert!(!result.success);
        assert!(result.message.contains("Source file does not exist"));
    }

    #[test]
    fn test_delete_hard_removes_file() {
        let tmp = TempDir::new().unwrap();
        let victim = tmp.path().join("draft.txt");
        touch(&victim);

        let result = delete_hard(&victim);
        assert!(result.success);
        assert!(!victim.exists());
    }

    #[test]
    fn test_delete_hard_missing_path_fails() {
        let tmp = TempDir::new().unwrap();
        let result = delete_hard(&tmp.path().join("ghost.txt"));
        assert!(!result.success);
    }

    #[test]
    fn test_delete_soft_missing_path_fails() {
        let tmp = TempDir::new().unwrap();
        let result = delete_soft(&tmp.path().join("ghost.txt"));
        assert!(!result.success);
    }
}

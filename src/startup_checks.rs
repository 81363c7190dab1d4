//! Runtime requirement validation for herakles-check-procs.
//!
//! Verifies that the process table can be read before the check relies on it.

use nix::unistd::geteuid;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Validate all runtime requirements for the given /proc root
pub fn validate_requirements(proc_root: &Path) -> Result<(), ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_user_privileges();
    check_proc_mounted(proc_root)?;
    check_proc_access(proc_root)?;
    check_task_access(proc_root);

    info!("✅ All runtime requirements validated");
    Ok(())
}

/// Check if running with sufficient privileges
fn check_user_privileges() {
    if !geteuid().is_root() {
        warn!("⚠️  Not running as root - wait channels of other users' threads may be hidden");
    } else {
        info!("✅ Running as root (uid=0)");
    }
}

fn check_proc_mounted(proc_root: &Path) -> Result<(), ValidationError> {
    if !proc_root.join("self").exists() && !proc_root.join("1").exists() {
        error!("❌ {} does not look like a mounted proc filesystem", proc_root.display());
        error!("   Solution: mount -t proc proc /proc");
        return Err(ValidationError::ProcNotMounted(proc_root.display().to_string()));
    }
    Ok(())
}

/// Check that init's stat and status files are readable
fn check_proc_access(proc_root: &Path) -> Result<(), ValidationError> {
    for file in ["stat", "status", "cmdline"] {
        let path = proc_root.join("1").join(file);
        match fs::read(&path) {
            Ok(_) => debug!("Readable: {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                error!("❌ Cannot read {} - insufficient permissions", path.display());
                error!("   Check hidepid= on the proc mount or run as root");
                return Err(ValidationError::InsufficientPermissions(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
            Err(e) => {
                warn!("⚠️  Could not test {}: {}", path.display(), e);
            }
        }
    }
    info!("✅ /proc access: process table readable");
    Ok(())
}

/// Thread mode needs the task directories; missing access is only a warning
fn check_task_access(proc_root: &Path) {
    let task = proc_root.join("1").join("task");
    match fs::read_dir(&task) {
        Ok(_) => info!("✅ Thread listing available ({})", task.display()),
        Err(e) => warn!("⚠️  Cannot list {}: {} - thread mode will be incomplete", task.display(), e),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("proc filesystem not mounted at {0}")]
    ProcNotMounted(String),

    #[error("Insufficient permissions: {0}")]
    InsufficientPermissions(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directory_is_not_proc() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            validate_requirements(root.path()),
            Err(ValidationError::ProcNotMounted(_))
        ));
    }

    #[test]
    fn test_fake_proc_passes() {
        let root = tempfile::tempdir().unwrap();
        let init = root.path().join("1");
        fs::create_dir_all(init.join("task")).unwrap();
        for file in ["stat", "status", "cmdline"] {
            fs::write(init.join(file), "x").unwrap();
        }
        assert!(validate_requirements(root.path()).is_ok());
    }
}

//! Best-effort ownership fixup of the rewritten action file.
//!
//! Privoxy typically runs as its own user, so the action file is handed to
//! that user after the rewrite. Any failure here is non-fatal: the pipeline
//! logs the error as a warning and carries on.

use std::path::Path;

use crate::PrivoxyctError;

#[cfg(unix)]
pub fn fix_ownership(path: &Path, user: &str, group: &str) -> crate::Result<()> {
    use nix::unistd::{chown, Group, User};

    let user_entry = User::from_name(user)
        .map_err(|e| ownership_error(path, format!("failed to look up user {user}: {e}")))?
        .ok_or_else(|| ownership_error(path, format!("unknown user: {user}")))?;

    let group_entry = Group::from_name(group)
        .map_err(|e| ownership_error(path, format!("failed to look up group {group}: {e}")))?
        .ok_or_else(|| ownership_error(path, format!("unknown group: {group}")))?;

    chown(path, Some(user_entry.uid), Some(group_entry.gid))
        .map_err(|e| ownership_error(path, e.to_string()))
}

#[cfg(not(unix))]
pub fn fix_ownership(path: &Path, user: &str, group: &str) -> crate::Result<()> {
    Err(ownership_error(
        path,
        format!("file ownership ({user}:{group}) is not supported on this platform"),
    ))
}

fn ownership_error(path: &Path, reason: String) -> PrivoxyctError {
    PrivoxyctError::Ownership {
        path: path.to_path_buf(),
        reason,
    }
}

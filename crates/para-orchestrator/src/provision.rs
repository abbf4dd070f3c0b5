//! Output directory provisioning.
//!
//! A destination that holds data is never overwritten without an explicit
//! opt-in, either the overwrite flag or a confirmed prompt. Otherwise the
//! first free `{label}_{n}` directory in the working directory is used,
//! counting from 2.

use crate::Context;
use crate::guard::guard;
use para_core::{AbortPolicy, Failure, Halt};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const VALIDATING_OUTPUT: AbortPolicy = AbortPolicy::new("Validating Output").reraise();

/// First suffix tried for a fallback directory.
const FIRST_FALLBACK: u32 = 2;

/// A directory to provision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRequest {
    /// Name of the directory, shown in the prompt and used for fallbacks.
    pub label: String,
    /// Where the output should go.
    pub desired_path: PathBuf,
    /// Replace existing content without asking.
    pub overwrite: bool,
    /// Whether the user may be asked.
    pub interactive: bool,
    /// Directory fallback names are created in.
    pub work_dir: PathBuf,
}

/// How a directory was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The desired path did not exist and was created.
    Created,
    /// The desired path was an empty directory.
    Reused,
    /// The desired path was cleared.
    Overwritten,
    /// A numbered directory next to the desired one was created.
    Fallback,
}

/// The directory actually used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryOutcome {
    /// Absolute path of the directory.
    pub path: PathBuf,
    pub resolution: Resolution,
}

/// Build and dist directories of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirs {
    pub build: DirectoryOutcome,
    pub dist: DirectoryOutcome,
}

/// Resolve a user-supplied path against `work_dir`.
///
/// Existing paths are canonicalized so symlinks are resolved.
pub fn resolve_path(work_dir: &Path, path: &Path) -> Result<PathBuf, Failure> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(Failure::user_input("Path can not be empty"));
    }
    if path.as_os_str().as_encoded_bytes().contains(&0) {
        return Err(Failure::user_input("Path is in an invalid format"));
    }

    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        work_dir.join(path)
    };

    if joined.exists() {
        joined
            .canonicalize()
            .map_err(|e| Failure::io("failed to resolve path", &joined, e))
    } else {
        Ok(joined)
    }
}

/// Provision a directory that is safe to write into.
pub async fn resolve(ctx: &Context, request: &DirectoryRequest) -> Result<DirectoryOutcome, Halt> {
    let path = resolve_path(&request.work_dir, &request.desired_path)?;

    if !occupied(&path) {
        fs::create_dir_all(&path)
            .map_err(|e| Failure::io("failed to create directory", &path, e))?;
        let path = canonical(&path)?;
        debug!(path = %path.display(), "created output directory");
        return Ok(DirectoryOutcome {
            path,
            resolution: Resolution::Created,
        });
    }

    if is_empty_dir(&path)? {
        debug!(path = %path.display(), "reusing empty output directory");
        return Ok(DirectoryOutcome {
            path,
            resolution: Resolution::Reused,
        });
    }

    let overwrite = request.overwrite
        || (request.interactive && confirm_overwrite(ctx, &request.label).await?);

    if overwrite {
        clear(&path)?;
        info!("Overwriting the {} folder at {}", request.label, path.display());
        return Ok(DirectoryOutcome {
            path,
            resolution: Resolution::Overwritten,
        });
    }

    let path = fallback(&request.work_dir, &request.label)?;
    info!("Using {} for the {} output", path.display(), request.label);
    Ok(DirectoryOutcome {
        path,
        resolution: Resolution::Fallback,
    })
}

/// Provision the configured build and dist directories.
///
/// Each directory is resolved on its own with its own overwrite flag.
pub async fn provision_output_dirs(
    ctx: &Context,
    overwrite_build: bool,
    overwrite_dist: bool,
) -> Result<OutputDirs, Halt> {
    let build = resolve(
        ctx,
        &output_request(ctx, ctx.config.build_dir(), overwrite_build),
    )
    .await?;
    let dist = resolve(
        ctx,
        &output_request(ctx, ctx.config.dist_dir(), overwrite_dist),
    )
    .await?;
    Ok(OutputDirs { build, dist })
}

fn output_request(ctx: &Context, name: &str, overwrite: bool) -> DirectoryRequest {
    DirectoryRequest {
        label: name.to_string(),
        desired_path: PathBuf::from(name),
        overwrite,
        interactive: ctx.is_interactive(),
        work_dir: ctx.work_dir.clone(),
    }
}

async fn confirm_overwrite(ctx: &Context, label: &str) -> Result<bool, Halt> {
    let question = format!(
        "The {} folder already exists. Overwrite data? (y/N): ",
        label
    );
    let answer = guard(ctx, VALIDATING_OUTPUT, async {
        ctx.prompter.ask(&question).await.map_err(Halt::from)
    })
    .await?;
    Ok(answer.trim().to_lowercase() == "y")
}

fn canonical(path: &Path) -> Result<PathBuf, Failure> {
    path.canonicalize()
        .map_err(|e| Failure::io("failed to resolve path", path, e))
}

/// Something exists at `path`, including a dangling symlink.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// An existing non-directory counts as occupied.
fn is_empty_dir(path: &Path) -> Result<bool, Failure> {
    if !path.is_dir() {
        return Ok(false);
    }
    let mut entries =
        fs::read_dir(path).map_err(|e| Failure::io("failed to read directory", path, e))?;
    Ok(entries.next().is_none())
}

fn clear(path: &Path) -> Result<(), Failure> {
    let removed = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| Failure::io("failed to clear directory", path, e))?;
    fs::create_dir_all(path).map_err(|e| Failure::io("failed to create directory", path, e))
}

fn fallback(work_dir: &Path, label: &str) -> Result<PathBuf, Failure> {
    fs::create_dir_all(work_dir)
        .map_err(|e| Failure::io("failed to create directory", work_dir, e))?;

    let mut counter = FIRST_FALLBACK;
    loop {
        let candidate = work_dir.join(format!("{}_{}", label, counter));
        if !occupied(&candidate) {
            match fs::create_dir(&candidate) {
                Ok(()) => return canonical(&candidate),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(Failure::io("failed to create directory", &candidate, e)),
            }
        }
        counter = counter
            .checked_add(1)
            .ok_or_else(|| Failure::collaborator(format!("no free name for the {} folder", label)))?;
    }
}

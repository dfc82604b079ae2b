//! Lazy enumeration of build logs in a job → build directory tree.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One discovered build log, identified by its job name and build number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub job: String,
    pub build: u64,
    pub path: PathBuf,
}

impl ArtifactRef {
    /// Remote object key for this artifact.
    pub fn remote_key(&self, compressed: bool) -> String {
        if compressed {
            format!("{}-{}.log.gz", self.job, self.build)
        } else {
            format!("{}-{}.log", self.job, self.build)
        }
    }
}

/// Iterator over `<root>/<job>/builds/<n>/log` paths.
///
/// The walk is derived purely from filesystem state, so a fresh walker
/// re-enumerates from scratch. A missing root, a job without a readable
/// `builds` directory, or a non-numeric build entry yields an empty
/// branch rather than an error. No ordering is guaranteed across jobs
/// or builds.
pub struct BuildLogWalker {
    jobs: Option<fs::ReadDir>,
    current: Option<JobBuilds>,
}

struct JobBuilds {
    job: String,
    builds: fs::ReadDir,
}

impl BuildLogWalker {
    pub fn new(root: &Path) -> Self {
        let jobs = match fs::read_dir(root) {
            Ok(rd) => Some(rd),
            Err(e) => {
                debug!(error = ?e, root = %root.display(), "Log root not readable, yielding no artifacts");
                None
            }
        };
        BuildLogWalker {
            jobs,
            current: None,
        }
    }
}

impl Iterator for BuildLogWalker {
    type Item = ArtifactRef;

    fn next(&mut self) -> Option<ArtifactRef> {
        loop {
            if let Some(current) = &mut self.current {
                for entry in current.builds.by_ref() {
                    let Ok(entry) = entry else { continue };
                    let path = entry.path();
                    if !path.is_dir() {
                        continue;
                    }
                    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                        continue;
                    };
                    // Numbered builds only; aliases like lastSuccessfulBuild
                    // point at directories already covered by their number.
                    let Ok(build) = name.parse::<u64>() else {
                        debug!(entry = name, job = %current.job, "Skipping non-numeric build entry");
                        continue;
                    };
                    return Some(ArtifactRef {
                        job: current.job.clone(),
                        build,
                        path: path.join("log"),
                    });
                }
                self.current = None;
            }

            let jobs = self.jobs.as_mut()?;
            let job_entry = loop {
                match jobs.next()? {
                    Ok(entry) if entry.path().is_dir() => break entry,
                    _ => continue,
                }
            };
            let job = job_entry.file_name().to_string_lossy().into_owned();
            match fs::read_dir(job_entry.path().join("builds")) {
                Ok(builds) => self.current = Some(JobBuilds { job, builds }),
                Err(e) => {
                    debug!(error = ?e, job = %job, "Job has no readable builds directory, skipping");
                }
            }
        }
    }
}

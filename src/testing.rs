//! Test doubles and fixture builders shared by unit tests

use crate::catalog::DependencyList;
use crate::error::{StockpotError, StockpotResult};
use crate::package_manager::{InstallOutput, PackageManager};
use crate::provision::installer::copy_tree;
use crate::vcs::Vcs;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File marking a directory as a fake working copy
const FAKE_REPO_MARKER: &str = ".fake-git";

/// In-memory `Vcs` that records calls instead of running git
#[derive(Debug, Default)]
pub struct FakeVcs {
    calls: Mutex<Vec<&'static str>>,
    failure: Option<String>,
    seed: Option<PathBuf>,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone and pull fail with `message` as git's stderr
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Clone copies `fixture` into the target
    pub fn seeded(fixture: &Path) -> Self {
        Self {
            seed: Some(fixture.to_path_buf()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn fail(&self, remote: &str, path: &Path) -> StockpotResult<()> {
        match self.failure {
            Some(ref message) => Err(StockpotError::sync(remote, path, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Vcs for FakeVcs {
    async fn is_repository(&self, path: &Path) -> StockpotResult<bool> {
        Ok(path.join(FAKE_REPO_MARKER).is_file())
    }

    async fn clone_into(&self, remote: &str, path: &Path) -> StockpotResult<()> {
        self.fail(remote, path)?;
        self.calls.lock().unwrap().push("clone");

        match self.seed {
            Some(ref fixture) => copy_tree(fixture, path)?,
            None => fs::create_dir_all(path).unwrap(),
        }
        fs::write(path.join(FAKE_REPO_MARKER), remote).unwrap();
        Ok(())
    }

    async fn pull(&self, path: &Path) -> StockpotResult<()> {
        self.fail("origin", path)?;
        self.calls.lock().unwrap().push("pull");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// `PackageManager` that records each dependency list it is asked to add
#[derive(Debug, Default)]
pub struct RecordingPackageManager {
    invocations: Mutex<Vec<Vec<String>>>,
}

impl RecordingPackageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl PackageManager for RecordingPackageManager {
    async fn add(
        &self,
        _project: &Path,
        deps: &DependencyList,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> StockpotResult<InstallOutput> {
        self.invocations
            .lock()
            .unwrap()
            .push(deps.as_slice().to_vec());

        let line = format!("added {}", deps);
        on_output(line.clone());
        Ok(InstallOutput {
            command: format!("recorder add {}", deps),
            lines: vec![line],
        })
    }

    fn program(&self) -> &str {
        "recorder"
    }
}

/// Create the entries a scaffolded project is recognized by
pub fn scaffold_project(root: &Path) {
    for dir in ["node_modules", "src", "public"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
}

/// Write a unit directory `<namespace_dir>/<name>` containing `files`
pub fn write_unit(namespace_dir: &Path, name: &str, files: &[(&str, &str)]) {
    let unit = namespace_dir.join(name);
    fs::create_dir_all(&unit).unwrap();
    for (file, content) in files {
        let path = unit.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

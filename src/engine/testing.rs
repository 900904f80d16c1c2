//! In-memory repository for workflow tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::gateway::Gateway;
use super::ReleaseOptions;
use crate::core::attribution::{AttributionError, HistoryAttributor};
use crate::core::template::Templates;
use crate::core::types::{BranchName, Oid, RefName, TagName};
use crate::git::{CredentialSource, GitError};

pub(super) const MANIFEST: &str = "{\n  \"name\": \"app\",\n  \"version\": \"1.0.0\"\n}\n";

pub(super) fn oid(n: u32) -> Oid {
    Oid::new(format!("{:040x}", n)).unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct FakeCommit {
    pub oid: Oid,
    pub parent: Oid,
    pub paths: Vec<PathBuf>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct FakeTag {
    pub target: Oid,
    pub message: String,
}

#[derive(Debug, Default)]
struct FakeState {
    current: Option<String>,
    detached_at: Option<Oid>,
    branches: BTreeMap<String, Oid>,
    commits: Vec<FakeCommit>,
    tags: BTreeMap<String, FakeTag>,
    pushed: Vec<(String, String)>,
    checkouts: Vec<String>,
    signed: usize,
    gpgsign: bool,
    remote_url: Option<String>,
    attributed: Option<Oid>,
    fail_on: Option<&'static str>,
    next_oid: u32,
}

/// A repository whose state lives in memory, with a real manifest on disk.
pub(super) struct FakeRepo {
    pub dir: TempDir,
    state: RefCell<FakeState>,
}

impl FakeRepo {
    pub fn on_branch(branch: &str) -> Self {
        let repo = Self::empty();
        {
            let mut state = repo.state.borrow_mut();
            state.branches.insert("master".to_string(), oid(1));
            state.branches.insert(branch.to_string(), oid(1));
            state.current = Some(branch.to_string());
        }
        repo
    }

    pub fn detached() -> Self {
        let repo = Self::empty();
        {
            let mut state = repo.state.borrow_mut();
            state.branches.insert("master".to_string(), oid(1));
            state.detached_at = Some(oid(1));
        }
        repo
    }

    fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), MANIFEST).unwrap();
        Self {
            dir,
            state: RefCell::new(FakeState {
                remote_url: Some("git@github.com:acme/app.git".to_string()),
                next_oid: 100,
                ..Default::default()
            }),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.path().join("package.json")
    }

    pub fn manifest_text(&self) -> String {
        std::fs::read_to_string(self.manifest_path()).unwrap()
    }

    pub fn write_manifest(&self, contents: &str) {
        std::fs::write(self.manifest_path(), contents).unwrap();
    }

    pub fn fail_on(&self, op: &'static str) {
        self.state.borrow_mut().fail_on = Some(op);
    }

    pub fn set_gpgsign(&self, enabled: bool) {
        self.state.borrow_mut().gpgsign = enabled;
    }

    pub fn set_remote_url(&self, url: Option<&str>) {
        self.state.borrow_mut().remote_url = url.map(String::from);
    }

    pub fn attribute_to(&self, commit: Oid) {
        self.state.borrow_mut().attributed = Some(commit);
    }

    pub fn add_tag(&self, name: &str, target: Oid) {
        self.state.borrow_mut().tags.insert(
            name.to_string(),
            FakeTag {
                target,
                message: String::new(),
            },
        );
    }

    pub fn current(&self) -> Option<String> {
        self.state.borrow().current.clone()
    }

    pub fn branch_tip(&self, name: &str) -> Option<Oid> {
        self.state.borrow().branches.get(name).cloned()
    }

    pub fn commits(&self) -> Vec<FakeCommit> {
        self.state.borrow().commits.clone()
    }

    pub fn tag(&self, name: &str) -> Option<FakeTag> {
        self.state.borrow().tags.get(name).cloned()
    }

    pub fn pushed(&self) -> Vec<(String, String)> {
        self.state.borrow().pushed.clone()
    }

    pub fn checkouts(&self) -> Vec<String> {
        self.state.borrow().checkouts.clone()
    }

    pub fn signed(&self) -> usize {
        self.state.borrow().signed
    }

    fn check(&self, op: &'static str) -> Result<(), GitError> {
        if self.state.borrow().fail_on == Some(op) {
            return Err(GitError::Internal {
                message: format!("injected failure in {}", op),
            });
        }
        Ok(())
    }

    fn next_oid(&self) -> Oid {
        let mut state = self.state.borrow_mut();
        state.next_oid += 1;
        oid(state.next_oid)
    }
}

pub(super) fn options(repo: &FakeRepo) -> ReleaseOptions {
    ReleaseOptions {
        trunk: BranchName::new("master").unwrap(),
        force: false,
        remote: "origin".to_string(),
        push: true,
        manifest: repo.manifest_path(),
        templates: Templates::default(),
    }
}

impl Gateway for FakeRepo {
    fn relative_path(&self, path: &Path) -> Result<PathBuf, GitError> {
        path.strip_prefix(self.dir.path())
            .map(Path::to_path_buf)
            .map_err(|_| GitError::PathOutsideWorkTree {
                path: path.to_path_buf(),
            })
    }

    fn current_branch(&self) -> Result<Option<BranchName>, GitError> {
        self.check("current_branch")?;
        Ok(self
            .state
            .borrow()
            .current
            .as_ref()
            .map(|b| BranchName::new(b.as_str()).unwrap()))
    }

    fn head_oid(&self) -> Result<Oid, GitError> {
        self.check("head_oid")?;
        let state = self.state.borrow();
        match &state.current {
            Some(branch) => Ok(state.branches[branch].clone()),
            None => state.detached_at.clone().ok_or(GitError::RefNotFound {
                refname: "HEAD".to_string(),
            }),
        }
    }

    fn gpgsign_enabled(&self) -> Result<bool, GitError> {
        self.check("gpgsign_enabled")?;
        Ok(self.state.borrow().gpgsign)
    }

    fn create_branch(&self, name: &BranchName, target: &Oid) -> Result<(), GitError> {
        self.check("create_branch")?;
        let mut state = self.state.borrow_mut();
        if state.branches.contains_key(name.as_str()) {
            return Err(GitError::AlreadyExists {
                refname: RefName::for_branch(name).to_string(),
            });
        }
        state.branches.insert(name.to_string(), target.clone());
        Ok(())
    }

    fn checkout_branch(&self, name: &BranchName) -> Result<(), GitError> {
        self.check("checkout_branch")?;
        let mut state = self.state.borrow_mut();
        if !state.branches.contains_key(name.as_str()) {
            return Err(GitError::RefNotFound {
                refname: RefName::for_branch(name).to_string(),
            });
        }
        state.current = Some(name.to_string());
        state.checkouts.push(name.to_string());
        Ok(())
    }

    fn commit_files(&self, paths: &[PathBuf], message: &str) -> Result<Oid, GitError> {
        self.check("commit_files")?;
        let parent = self.head_oid()?;
        let new = self.next_oid();
        let mut state = self.state.borrow_mut();
        let branch = state.current.clone().ok_or(GitError::RefNotFound {
            refname: "HEAD".to_string(),
        })?;
        state.branches.insert(branch, new.clone());
        state.commits.push(FakeCommit {
            oid: new.clone(),
            parent,
            paths: paths.to_vec(),
            message: message.to_string(),
        });
        Ok(new)
    }

    fn amend_head_signed(&self) -> Result<Oid, GitError> {
        self.check("amend_head_signed")?;
        let amended = self.next_oid();
        let mut state = self.state.borrow_mut();
        state.signed += 1;
        if let Some(branch) = state.current.clone() {
            state.branches.insert(branch, amended.clone());
        }
        if let Some(last) = state.commits.last_mut() {
            last.oid = amended.clone();
        }
        Ok(amended)
    }

    fn create_annotated_tag(
        &self,
        name: &TagName,
        target: &Oid,
        message: &str,
    ) -> Result<Oid, GitError> {
        self.check("create_annotated_tag")?;
        let tag_oid = self.next_oid();
        let mut state = self.state.borrow_mut();
        if state.tags.contains_key(name.as_str()) {
            return Err(GitError::AlreadyExists {
                refname: RefName::for_tag(name).to_string(),
            });
        }
        state.tags.insert(
            name.to_string(),
            FakeTag {
                target: target.clone(),
                message: message.to_string(),
            },
        );
        Ok(tag_oid)
    }

    fn reference_names(&self) -> Result<Vec<String>, GitError> {
        self.check("reference_names")?;
        let state = self.state.borrow();
        Ok(state
            .branches
            .keys()
            .map(|b| format!("refs/heads/{}", b))
            .chain(state.tags.keys().map(|t| format!("refs/tags/{}", t)))
            .collect())
    }

    fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        self.check("remote_url")?;
        self.state
            .borrow()
            .remote_url
            .clone()
            .ok_or(GitError::RemoteNotFound {
                name: remote.to_string(),
            })
    }

    fn push(
        &self,
        remote: &str,
        refname: &RefName,
        _credentials: &dyn CredentialSource,
    ) -> Result<(), GitError> {
        self.check("push")?;
        self.state
            .borrow_mut()
            .pushed
            .push((remote.to_string(), refname.to_string()));
        Ok(())
    }
}

impl HistoryAttributor for FakeRepo {
    fn attribute_line(
        &self,
        _path: &Path,
        _snapshot: &str,
        line: usize,
    ) -> Result<Oid, AttributionError> {
        self.state
            .borrow()
            .attributed
            .clone()
            .ok_or(AttributionError::NoHunk { line })
    }
}

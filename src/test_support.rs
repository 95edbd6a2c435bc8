use crate::config::Config;
use crate::context::WorkspaceContext;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

pub(crate) const RESPONDER_PERSONA: &str = r#"---
name: incident-responder
description: Use when production is degraded
tools: Read, Grep, Bash, Edit
required_tools: [Read, Edit, Bash]
min_tools_used: 3
---

You are an incident responder.
"#;

pub(crate) const PLANNER_PERSONA: &str = r#"---
name: planner-decomposer
tools: [Read, Grep]
---

Break the request into steps.
"#;

/// Builder for an on-disk workspace with `.brigade/` and a personas directory.
pub(crate) struct WorkspaceFixture {
    personas: Vec<(String, String)>,
    config: Config,
}

impl WorkspaceFixture {
    pub(crate) fn new() -> Self {
        Self {
            personas: Vec::new(),
            config: Config::default(),
        }
    }

    pub(crate) fn persona(mut self, file: &str, content: &str) -> Self {
        self.personas.push((file.to_string(), content.to_string()));
        self
    }

    pub(crate) fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub(crate) fn build(self) -> (TempDir, WorkspaceContext) {
        let temp = TempDir::new().unwrap();
        let ctx = WorkspaceContext::at(temp.path());
        std::fs::create_dir_all(&ctx.state_dir).unwrap();
        self.config.save(ctx.config_path()).unwrap();

        let personas_dir = ctx.personas_dir(&self.config);
        std::fs::create_dir_all(&personas_dir).unwrap();
        for (file, content) in &self.personas {
            std::fs::write(personas_dir.join(file), content).unwrap();
        }

        (temp, ctx)
    }
}

/// Workspace with the responder and planner personas.
pub(crate) fn create_test_workspace() -> (TempDir, WorkspaceContext) {
    WorkspaceFixture::new()
        .persona("incident-responder.md", RESPONDER_PERSONA)
        .persona("planner-decomposer.md", PLANNER_PERSONA)
        .build()
}

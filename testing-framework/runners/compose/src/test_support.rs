use std::{
    collections::VecDeque,
    io,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use crate::docker::{commands::ComposeCommandError, runtime::ComposeRuntime};

/// Scripted status reply for [`ScriptedCompose`].
#[derive(Clone, Debug)]
pub enum StatusReply {
    Output(String),
    Fail,
}

impl StatusReply {
    pub fn output(raw: &str) -> Self {
        Self::Output(raw.to_owned())
    }
}

#[derive(Debug, Default)]
struct Calls {
    up: AtomicUsize,
    down: AtomicUsize,
    status: AtomicUsize,
    logs: AtomicUsize,
    files: Mutex<Vec<PathBuf>>,
}

/// In-memory compose runtime that replays scripted status output and counts
/// calls. Once the script runs out, status reports empty output.
#[derive(Clone, Debug, Default)]
pub struct ScriptedCompose {
    status: Arc<Mutex<VecDeque<StatusReply>>>,
    fail_up: bool,
    fail_down: bool,
    calls: Arc<Calls>,
}

impl ScriptedCompose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(self, replies: impl IntoIterator<Item = StatusReply>) -> Self {
        self.status.lock().unwrap().extend(replies);
        self
    }

    pub fn failing_up(mut self) -> Self {
        self.fail_up = true;
        self
    }

    pub fn failing_down(mut self) -> Self {
        self.fail_down = true;
        self
    }

    pub fn up_calls(&self) -> usize {
        self.calls.up.load(Ordering::SeqCst)
    }

    pub fn down_calls(&self) -> usize {
        self.calls.down.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.calls.status.load(Ordering::SeqCst)
    }

    pub fn logs_calls(&self) -> usize {
        self.calls.logs.load(Ordering::SeqCst)
    }

    pub fn files(&self) -> Vec<PathBuf> {
        self.calls.files.lock().unwrap().clone()
    }

    fn record(&self, counter: &AtomicUsize, compose_file: &Path) {
        counter.fetch_add(1, Ordering::SeqCst);
        self.calls
            .files
            .lock()
            .unwrap()
            .push(compose_file.to_path_buf());
    }
}

fn failure(command: &str) -> ComposeCommandError {
    ComposeCommandError::Spawn {
        command: command.to_owned(),
        source: io::Error::other("scripted failure"),
    }
}

#[async_trait]
impl ComposeRuntime for ScriptedCompose {
    async fn up(&self, compose_file: &Path) -> Result<(), ComposeCommandError> {
        self.record(&self.calls.up, compose_file);
        if self.fail_up {
            return Err(failure("fake compose up"));
        }
        Ok(())
    }

    async fn down(&self, compose_file: &Path) -> Result<(), ComposeCommandError> {
        self.record(&self.calls.down, compose_file);
        if self.fail_down {
            return Err(failure("fake compose down"));
        }
        Ok(())
    }

    async fn status(&self, compose_file: &Path) -> Result<String, ComposeCommandError> {
        self.record(&self.calls.status, compose_file);
        let reply = self.status.lock().unwrap().pop_front();
        match reply {
            Some(StatusReply::Output(raw)) => Ok(raw),
            Some(StatusReply::Fail) => Err(failure("fake compose ps")),
            None => Ok(String::new()),
        }
    }

    async fn logs(&self, compose_file: &Path) -> Result<String, ComposeCommandError> {
        self.record(&self.calls.logs, compose_file);
        Ok(String::from("db-1  | database system is ready to accept connections\n"))
    }
}

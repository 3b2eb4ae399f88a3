//! Persistence between the in-memory tree and its backing YAML file.
//!
//! [`Persistence`] bridges a shared document tree to the durable store
//! through the codec. The execution mode is chosen at construction and
//! fixed for the instance's lifetime:
//!
//! - [`Mode::Blocking`]: the caller's thread performs the I/O and failures
//!   are returned to the caller.
//! - [`Mode::Background`]: each load/save is handed to a dedicated writer
//!   thread and the call returns immediately. Failures go to the `tracing`
//!   log only. All commands flow through one queue, so background
//!   operations complete in submission order; [`Persistence::flush`] is the
//!   opt-in way to wait for the queue to drain.
//!
//! Every save dumps the entire tree. Background saves carry a snapshot
//! cloned at call time, so later mutations never leak into an in-flight
//! write. A missing or unparseable file is not an error for load: the tree
//! is reset to an empty mapping instead.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
    thread,
};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

mod background;
pub mod errors;

pub use errors::PersistError;

use background::{Command, Writer};
use crate::{Result, codec, tree::Node};

/// Execution mode for load/save, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// I/O runs on the caller's thread; failures are surfaced to the
    /// caller.
    Blocking,
    /// I/O is dispatched to a background writer thread; calls return
    /// immediately and failures are only logged.
    Background,
}

#[derive(Debug)]
enum State {
    Blocking,
    Background {
        command_tx: mpsc::UnboundedSender<Command>,
        handle: Option<thread::JoinHandle<()>>,
    },
}

/// Controller binding one document tree to one file path.
#[derive(Debug)]
pub struct Persistence {
    path: PathBuf,
    tree: Arc<RwLock<Node>>,
    state: State,
}

impl Persistence {
    /// Creates the controller, spawning the writer thread in
    /// [`Mode::Background`].
    pub(crate) fn new(path: PathBuf, mode: Mode, tree: Arc<RwLock<Node>>) -> Result<Self> {
        let state = match mode {
            Mode::Blocking => State::Blocking,
            Mode::Background => {
                let (command_tx, handle) =
                    Writer::spawn(path.clone(), Arc::clone(&tree)).map_err(|source| {
                        PersistError::Spawn {
                            path: path.clone(),
                            source,
                        }
                    })?;
                State::Background {
                    command_tx,
                    handle: Some(handle),
                }
            }
        };
        Ok(Self { path, tree, state })
    }

    /// Returns the mode the controller was built with.
    pub fn mode(&self) -> Mode {
        match self.state {
            State::Blocking => Mode::Blocking,
            State::Background { .. } => Mode::Background,
        }
    }

    /// Returns the bound file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the tree with the parsed contents of the backing file.
    pub fn load(&self) -> Result<()> {
        match &self.state {
            State::Blocking => {
                let document =
                    read_document(&self.path).map_err(|source| PersistError::Read {
                        path: self.path.clone(),
                        source,
                    })?;
                *self.tree.write().unwrap() = document;
                debug!(path = %self.path.display(), "document loaded");
                Ok(())
            }
            State::Background { command_tx, .. } => {
                if command_tx.send(Command::Load).is_err() {
                    error!(path = %self.path.display(), "background writer gone, load dropped");
                }
                Ok(())
            }
        }
    }

    /// Writes the whole tree to the backing file, replacing its contents.
    pub fn save(&self) -> Result<()> {
        match &self.state {
            State::Blocking => {
                let text = codec::emit(&self.tree.read().unwrap());
                fs::write(&self.path, text).map_err(|source| PersistError::Write {
                    path: self.path.clone(),
                    source,
                })?;
                debug!(path = %self.path.display(), "document saved");
                Ok(())
            }
            State::Background { command_tx, .. } => {
                let snapshot = self.tree.read().unwrap().clone();
                if command_tx.send(Command::Save(snapshot)).is_err() {
                    error!(path = %self.path.display(), "background writer gone, save dropped");
                }
                Ok(())
            }
        }
    }

    /// Blocks until every previously queued background command has
    /// completed. A no-op in [`Mode::Blocking`].
    pub fn flush(&self) -> Result<()> {
        match &self.state {
            State::Blocking => Ok(()),
            State::Background { command_tx, .. } => {
                let (ack_tx, ack_rx) = oneshot::channel();
                command_tx
                    .send(Command::Flush(ack_tx))
                    .map_err(|_| PersistError::WriterStopped {
                        path: self.path.clone(),
                    })?;
                ack_rx.blocking_recv().map_err(|_| {
                    PersistError::WriterStopped {
                        path: self.path.clone(),
                    }
                })?;
                Ok(())
            }
        }
    }
}

impl Drop for Persistence {
    fn drop(&mut self) {
        if let State::Background { command_tx, handle } = &mut self.state {
            // Queued writes drain before the thread exits.
            let _ = command_tx.send(Command::Shutdown);
            if let Some(handle) = handle.take() {
                let _ = handle.join();
            }
        }
    }
}

/// Reads and parses the document at `path`.
///
/// A missing file, a blank file, and an unparseable document all yield an
/// empty tree; only other I/O failures are errors.
pub(crate) fn read_document(path: &Path) -> std::io::Result<Node> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Node::new()),
        Err(err) => return Err(err),
    };
    Ok(codec::parse(&text).unwrap_or_default())
}

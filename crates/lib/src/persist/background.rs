//! Background writer thread.
//!
//! One writer per store handles all background I/O in a single thread fed
//! by an unbounded command channel. Because every command flows through the
//! same queue, loads and saves complete in submission order — callers that
//! need a quiescence point issue a [`Command::Flush`] and wait for its ack.
//! I/O failures are reported to the diagnostic log and never propagate; the
//! fire-and-forget contract offers callers no completion signal per
//! command.

use std::{
    fs,
    path::PathBuf,
    sync::{Arc, RwLock},
    thread,
};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, trace};

use super::read_document;
use crate::{codec, tree::Node};

/// Commands handled by the writer thread.
#[derive(Debug)]
pub(super) enum Command {
    /// Write a snapshot of the tree, taken at call time, to the file.
    Save(Node),
    /// Re-read the file and replace the shared tree with the result.
    Load,
    /// Ack once every previously queued command has completed.
    Flush(oneshot::Sender<()>),
    /// Drain nothing further and exit the thread.
    Shutdown,
}

pub(super) struct Writer {
    path: PathBuf,
    tree: Arc<RwLock<Node>>,
    command_rx: mpsc::UnboundedReceiver<Command>,
}

impl Writer {
    /// Spawns the writer thread and returns the command sender plus the
    /// join handle used on drop.
    pub(super) fn spawn(
        path: PathBuf,
        tree: Arc<RwLock<Node>>,
    ) -> std::io::Result<(mpsc::UnboundedSender<Command>, thread::JoinHandle<()>)> {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let writer = Writer {
            path,
            tree,
            command_rx,
        };
        let handle = thread::Builder::new()
            .name("canopy-writer".to_string())
            .spawn(move || writer.run())?;
        Ok((command_tx, handle))
    }

    fn run(mut self) {
        debug!(path = %self.path.display(), "background writer started");
        while let Some(command) = self.command_rx.blocking_recv() {
            trace!(?command, "background writer command");
            match command {
                Command::Save(snapshot) => {
                    let text = codec::emit(&snapshot);
                    match fs::write(&self.path, text) {
                        Ok(()) => trace!(path = %self.path.display(), "background save done"),
                        Err(err) => {
                            error!(path = %self.path.display(), %err, "background save failed")
                        }
                    }
                }
                Command::Load => match read_document(&self.path) {
                    Ok(document) => {
                        *self.tree.write().unwrap() = document;
                        trace!(path = %self.path.display(), "background load done");
                    }
                    Err(err) => {
                        error!(path = %self.path.display(), %err, "background load failed")
                    }
                },
                Command::Flush(ack) => {
                    // Receiver may have given up waiting; that's fine.
                    let _ = ack.send(());
                }
                Command::Shutdown => break,
            }
        }
        debug!(path = %self.path.display(), "background writer stopped");
    }
}

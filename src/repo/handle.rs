use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch, Mutex};

use crate::{
    contact::Contact,
    store::{ContactTable, StoreError, StoreResult},
    types::ContactId,
};

/// Failure propagated from the repository's writer task.
#[derive(Debug)]
pub enum RepoError {
    /// The underlying table failed; no retry, no backoff.
    Store(StoreError),
    /// The writer task has stopped.
    ChannelClosed,
    /// Any other runtime failure, described in text.
    Message(String),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::Store(e) => write!(f, "store error: {e}"),
            RepoError::ChannelClosed => write!(f, "repository channel closed"),
            RepoError::Message(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for RepoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepoError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Tuning for the repository's writer task.
#[derive(Debug, Clone)]
pub struct RepoConfig {
    /// Bound of the command queue feeding the writer loop.
    pub command_queue_depth: usize,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            command_queue_depth: 64,
        }
    }
}

enum Command {
    Upsert {
        contact: Contact,
        resp: oneshot::Sender<Result<ContactId, RepoError>>,
    },
    Delete {
        contact: Contact,
        resp: oneshot::Sender<Result<(), RepoError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Cloneable handle over the single-writer task that owns the contact table.
///
/// All durable writes are serialized through this handle; the live query is
/// re-exposed by [`ContactRepository::observe_contacts`].
pub struct ContactRepository {
    cmd_tx: mpsc::Sender<Command>,
    list_rx: watch::Receiver<Vec<Contact>>,
}

impl Clone for ContactRepository {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            list_rx: self.list_rx.clone(),
        }
    }
}

/// Spawns the writer task that owns `table` and returns its handle.
///
/// The task publishes the initial table contents on start, then re-publishes
/// the full list after every committed insert, update or delete, in commit
/// order.
pub fn spawn_contacts(table: Box<dyn ContactTable>, config: RepoConfig) -> ContactRepository {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_depth);
    let (list_tx, list_rx) = watch::channel(Vec::new());
    let table = Arc::new(Mutex::new(table));

    tokio::spawn(async move {
        match run_table(&table, |t| t.all()).await {
            Ok(list) => {
                tracing::debug!(rows = list.len(), "published initial contact list");
                let _ = list_tx.send(list);
            }
            Err(err) => tracing::error!(%err, "initial contact list read failed"),
        }

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                Command::Upsert { contact, resp } => {
                    let res = run_table(&table, move |t| {
                        let id = t.upsert(&contact)?;
                        Ok((id, t.all()?))
                    })
                    .await;
                    let out = match res {
                        Ok((id, list)) => {
                            tracing::debug!(id, rows = list.len(), "contact upserted");
                            let _ = list_tx.send(list);
                            Ok(id)
                        }
                        Err(err) => Err(err),
                    };
                    let _ = resp.send(out);
                }
                Command::Delete { contact, resp } => {
                    let id = contact.id;
                    let res = run_table(&table, move |t| {
                        if t.delete(id)? {
                            Ok(Some(t.all()?))
                        } else {
                            Ok(None)
                        }
                    })
                    .await;
                    let out = match res {
                        Ok(Some(list)) => {
                            tracing::debug!(id, rows = list.len(), "contact deleted");
                            let _ = list_tx.send(list);
                            Ok(())
                        }
                        // Absent id: table unchanged, nothing to re-emit.
                        Ok(None) => Ok(()),
                        Err(err) => Err(err),
                    };
                    let _ = resp.send(out);
                }
                Command::Shutdown { resp } => {
                    let _ = resp.send(());
                    break;
                }
            }
        }
    });

    ContactRepository { cmd_tx, list_rx }
}

impl ContactRepository {
    /// Inserts or replaces `contact`; returns the effective id.
    pub async fn upsert_contact(&self, contact: Contact) -> Result<ContactId, RepoError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Upsert { contact, resp: tx })
            .await
            .map_err(|_| RepoError::ChannelClosed)?;
        rx.await.map_err(|_| RepoError::ChannelClosed)?
    }

    /// Removes the row matching `contact.id`; an absent id is a no-op.
    pub async fn delete_contact(&self, contact: Contact) -> Result<(), RepoError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Delete { contact, resp: tx })
            .await
            .map_err(|_| RepoError::ChannelClosed)?;
        rx.await.map_err(|_| RepoError::ChannelClosed)?
    }

    /// The live query: holds the current full list and re-emits after every
    /// committed change, for the subscription's lifetime. Latest-value
    /// semantics; intermediate lists may be conflated.
    pub fn observe_contacts(&self) -> watch::Receiver<Vec<Contact>> {
        self.list_rx.clone()
    }

    /// Stops the writer task. Operations after shutdown fail with
    /// [`RepoError::ChannelClosed`].
    pub async fn shutdown(&self) -> Result<(), RepoError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RepoError::ChannelClosed)?;
        rx.await.map_err(|_| RepoError::ChannelClosed)
    }
}

async fn run_table<T, F>(
    table: &Arc<Mutex<Box<dyn ContactTable>>>,
    f: F,
) -> Result<T, RepoError>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn ContactTable) -> StoreResult<T> + Send + 'static,
{
    let table = Arc::clone(table);
    tokio::task::spawn_blocking(move || {
        let mut table = table.blocking_lock();
        f(table.as_mut())
    })
    .await
    .map_err(|e| RepoError::Message(format!("join error: {e}")))?
    .map_err(RepoError::from)
}

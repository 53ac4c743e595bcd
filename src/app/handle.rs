use tokio::sync::{mpsc, oneshot, watch};

use crate::{
    contact::{Contact, ContactDraft},
    repo::handle::{ContactRepository, RepoError},
    types::ContactId,
};

use super::state::AppState;

enum Command {
    Upsert {
        contact: Contact,
        resp: oneshot::Sender<Result<Option<ContactId>, RepoError>>,
    },
    Delete {
        contact: Contact,
        resp: oneshot::Sender<Result<(), RepoError>>,
    },
    BeginEdit {
        contact: Contact,
        resp: oneshot::Sender<()>,
    },
    ClearEdit {
        resp: oneshot::Sender<()>,
    },
    SetName {
        name: String,
        resp: oneshot::Sender<()>,
    },
    SetEmail {
        email: String,
        resp: oneshot::Sender<()>,
    },
    SetPhoneNumber {
        phone_number: String,
        resp: oneshot::Sender<()>,
    },
    SetImage {
        image: Option<Vec<u8>>,
        resp: oneshot::Sender<()>,
    },
}

/// Tuning for the holder task.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bound of the command queue feeding the holder loop.
    pub command_queue_depth: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            command_queue_depth: 64,
        }
    }
}

/// Cloneable handle over the holder task that owns the [`AppState`]
/// snapshot.
///
/// Persistence-affecting operations forward to the repository; draft
/// mutations touch only the snapshot. Every snapshot change is published to
/// subscribers.
pub struct AppHandle {
    cmd_tx: mpsc::Sender<Command>,
    state_rx: watch::Receiver<AppState>,
}

impl Clone for AppHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            state_rx: self.state_rx.clone(),
        }
    }
}

/// Spawns the holder task and returns its handle.
///
/// The task subscribes once to the repository's live query for its whole
/// lifetime; each emission clears `is_loading` and replaces the list
/// snapshot. The task ends when the live query closes or every handle is
/// dropped.
pub fn spawn_app(repository: ContactRepository, config: AppConfig) -> AppHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_depth);
    let (state_tx, state_rx) = watch::channel(AppState::default());

    // The receiver clone keeps the repository's stale seen-version, so the
    // initial table publish still counts as a change even if it already
    // landed; `is_loading` holds until that first real emission.
    let mut list_rx = repository.observe_contacts();

    tokio::spawn(async move {
        let mut snapshot = AppState::default();

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    handle_command(cmd, &mut snapshot, &repository, &state_tx).await;
                }
                changed = list_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    snapshot.contacts = list_rx.borrow_and_update().clone();
                    snapshot.is_loading = false;
                    tracing::debug!(rows = snapshot.contacts.len(), "applied list emission");
                    let _ = state_tx.send(snapshot.clone());
                }
            }
        }
    });

    AppHandle { cmd_tx, state_rx }
}

async fn handle_command(
    cmd: Command,
    snapshot: &mut AppState,
    repository: &ContactRepository,
    state_tx: &watch::Sender<AppState>,
) {
    match cmd {
        Command::Upsert { contact, resp } => {
            let out = if contact.is_blank() {
                tracing::debug!("dropped blank contact");
                Ok(None)
            } else {
                repository.upsert_contact(contact).await.map(Some)
            };
            let _ = resp.send(out);
        }
        Command::Delete { contact, resp } => {
            let _ = resp.send(repository.delete_contact(contact).await);
        }
        Command::BeginEdit { contact, resp } => {
            snapshot.draft = ContactDraft::from(&contact);
            let _ = state_tx.send(snapshot.clone());
            let _ = resp.send(());
        }
        Command::ClearEdit { resp } => {
            snapshot.draft = ContactDraft::default();
            let _ = state_tx.send(snapshot.clone());
            let _ = resp.send(());
        }
        Command::SetName { name, resp } => {
            snapshot.draft.name = name;
            let _ = state_tx.send(snapshot.clone());
            let _ = resp.send(());
        }
        Command::SetEmail { email, resp } => {
            snapshot.draft.email = email;
            let _ = state_tx.send(snapshot.clone());
            let _ = resp.send(());
        }
        Command::SetPhoneNumber { phone_number, resp } => {
            snapshot.draft.phone_number = phone_number;
            let _ = state_tx.send(snapshot.clone());
            let _ = resp.send(());
        }
        Command::SetImage { image, resp } => {
            snapshot.draft.profile_image = image;
            let _ = state_tx.send(snapshot.clone());
            let _ = resp.send(());
        }
    }
}

impl AppHandle {
    /// Persists `contact` unless it is blank; a blank contact is silently
    /// dropped and `Ok(None)` is returned.
    pub async fn upsert_contact(&self, contact: Contact) -> Result<Option<ContactId>, RepoError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Upsert { contact, resp: tx })
            .await
            .map_err(|_| RepoError::ChannelClosed)?;
        rx.await.map_err(|_| RepoError::ChannelClosed)?
    }

    /// Removes `contact`'s row; always forwarded.
    pub async fn delete_contact(&self, contact: Contact) -> Result<(), RepoError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Delete { contact, resp: tx })
            .await
            .map_err(|_| RepoError::ChannelClosed)?;
        rx.await.map_err(|_| RepoError::ChannelClosed)?
    }

    /// Copies `contact`'s fields into the scratch draft. The list snapshot
    /// is untouched.
    pub async fn begin_edit(&self, contact: &Contact) -> Result<(), RepoError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::BeginEdit {
                contact: contact.clone(),
                resp: tx,
            })
            .await
            .map_err(|_| RepoError::ChannelClosed)?;
        rx.await.map_err(|_| RepoError::ChannelClosed)
    }

    /// Resets the scratch draft to blank fields, unassigned id, no image.
    pub async fn clear_edit(&self) -> Result<(), RepoError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ClearEdit { resp: tx })
            .await
            .map_err(|_| RepoError::ChannelClosed)?;
        rx.await.map_err(|_| RepoError::ChannelClosed)
    }

    /// Replaces the draft name.
    pub async fn set_name(&self, name: impl Into<String>) -> Result<(), RepoError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SetName {
                name: name.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RepoError::ChannelClosed)?;
        rx.await.map_err(|_| RepoError::ChannelClosed)
    }

    /// Replaces the draft email.
    pub async fn set_email(&self, email: impl Into<String>) -> Result<(), RepoError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SetEmail {
                email: email.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RepoError::ChannelClosed)?;
        rx.await.map_err(|_| RepoError::ChannelClosed)
    }

    /// Replaces the draft phone number.
    pub async fn set_phone_number(
        &self,
        phone_number: impl Into<String>,
    ) -> Result<(), RepoError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SetPhoneNumber {
                phone_number: phone_number.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RepoError::ChannelClosed)?;
        rx.await.map_err(|_| RepoError::ChannelClosed)
    }

    /// Replaces the draft profile image bytes.
    pub async fn set_image(&self, image: Option<Vec<u8>>) -> Result<(), RepoError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SetImage { image, resp: tx })
            .await
            .map_err(|_| RepoError::ChannelClosed)?;
        rx.await.map_err(|_| RepoError::ChannelClosed)
    }

    /// Observable snapshot stream; holds the latest published state.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state_rx.clone()
    }

    /// The latest published snapshot.
    pub fn state(&self) -> AppState {
        self.state_rx.borrow().clone()
    }
}

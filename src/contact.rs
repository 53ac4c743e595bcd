//! Contact domain record and scratch edit draft.

use crate::types::{ContactId, UNASSIGNED_CONTACT_ID};

/// Fully materialized contact row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    /// Stable row identifier; [`UNASSIGNED_CONTACT_ID`] until first upsert.
    pub id: ContactId,
    /// Display name, may be empty.
    pub name: String,
    /// Email address, may be empty. Persisted under the legacy `lastName`
    /// column name.
    pub email: String,
    /// Phone number, may be empty.
    pub phone_number: String,
    /// Compressed profile photo bytes; `None` means no photo.
    pub profile_image: Option<Vec<u8>>,
    /// Caller-supplied save timestamp in milliseconds since epoch.
    pub last_edited: i64,
}

impl Contact {
    /// True when name, email and phone number are all blank
    /// (empty or whitespace-only).
    ///
    /// Blank contacts are never persisted; the save path drops them
    /// silently.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.email.trim().is_empty()
            && self.phone_number.trim().is_empty()
    }
}

/// In-progress, not-yet-saved field values for the contact being created or
/// edited.
///
/// `Default` is the cleared state: unassigned id, empty fields, no photo.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactDraft {
    /// Id of the contact being edited; [`UNASSIGNED_CONTACT_ID`] for a new
    /// contact.
    pub id: ContactId,
    /// Draft display name.
    pub name: String,
    /// Draft email address.
    pub email: String,
    /// Draft phone number.
    pub phone_number: String,
    /// Draft profile photo bytes.
    pub profile_image: Option<Vec<u8>>,
}

impl ContactDraft {
    /// Builds the contact the save gesture persists, stamping `last_edited`.
    pub fn into_contact(self, last_edited: i64) -> Contact {
        Contact {
            id: self.id,
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
            profile_image: self.profile_image,
            last_edited,
        }
    }

    /// True when the draft carries no assigned id.
    pub fn is_new(&self) -> bool {
        self.id == UNASSIGNED_CONTACT_ID
    }
}

impl From<&Contact> for ContactDraft {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone_number: contact.phone_number.clone(),
            profile_image: contact.profile_image.clone(),
        }
    }
}

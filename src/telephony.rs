//! Dialer collaborator seam for the "call contact" gesture.

use crate::contact::Contact;

/// Platform telephony collaborator. Implementations wrap the host's dialing
/// action and its runtime call permission.
pub trait Dialer {
    /// Asks for the call permission, on demand at call time. The crate
    /// caches nothing; implementations may.
    fn request_call_permission(&mut self) -> bool;

    /// Places a call to `number` via the platform's standard dialing action.
    fn place_call(&mut self, number: &str);
}

/// Result of a call gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// The permission was granted and the call was placed.
    Placed,
    /// The permission was denied; no call, non-fatal. Screens turn this
    /// into a user-facing notice.
    PermissionDenied,
}

/// Requests the call permission and, if granted, dials the contact's phone
/// number.
pub fn call_contact(dialer: &mut dyn Dialer, contact: &Contact) -> CallOutcome {
    if !dialer.request_call_permission() {
        tracing::info!("call permission denied");
        return CallOutcome::PermissionDenied;
    }
    dialer.place_call(&contact.phone_number);
    CallOutcome::Placed
}

//! Per-wizard session state shared by the controller and the gateway.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use log::warn;

use crate::errors::Result;
use crate::notifications::{Notice, NotificationSink};
use crate::wizard::WizardError;

/// State scoped to one wizard session.
///
/// Holds the backing record id, assigned once by the first successful save,
/// and the in-flight flag that keeps saves strictly sequential. A session is
/// owned by exactly one controller, so `&mut` access is the single writer.
pub struct ApplicationSession {
    application_id: Option<String>,
    saving: bool,
    notifier: Arc<dyn NotificationSink>,
}

impl ApplicationSession {
    pub fn new(notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            application_id: None,
            saving: false,
            notifier,
        }
    }

    /// Backing record id, absent until the first successful save.
    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Marks a save as in flight until the returned guard is dropped.
    ///
    /// The flag is cleared even when the save future is dropped before it
    /// completes.
    pub(crate) fn begin_save(&mut self) -> Result<SaveGuard<'_>> {
        if self.saving {
            return Err(WizardError::SaveInProgress.into());
        }
        self.saving = true;
        Ok(SaveGuard { session: self })
    }

    /// Captures the id returned by the record store. The first id wins.
    pub(crate) fn assign_id(&mut self, id: &str) {
        match &self.application_id {
            None => self.application_id = Some(id.to_string()),
            Some(existing) if existing != id => {
                warn!(
                    "Record store returned id {} for session bound to {}; keeping the original",
                    id, existing
                );
            }
            Some(_) => {}
        }
    }
}

/// Exclusive access to a session while one of its saves is in flight.
#[derive(Debug)]
pub(crate) struct SaveGuard<'a> {
    session: &'a mut ApplicationSession,
}

impl Deref for SaveGuard<'_> {
    type Target = ApplicationSession;

    fn deref(&self) -> &Self::Target {
        self.session
    }
}

impl DerefMut for SaveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session
    }
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.session.saving = false;
    }
}

impl fmt::Debug for ApplicationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationSession")
            .field("application_id", &self.application_id)
            .field("saving", &self.saving)
            .finish()
    }
}

//! Component clicks on request messages and error replies

use request_types::components::{DISMISS_REPLY_CUSTOM_ID, REMOVE_NOTE_CUSTOM_ID};
use request_types::Request;
use tracing::{debug, info};

use crate::dispatcher::RequestDispatcher;
use crate::errors::Result;
use crate::platform::Platform;

/// What a clicked component asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    RemoveNote,
    DeleteMessage,
    /// Not handled here; left unanswered
    Ignore,
}

impl ClickAction {
    pub fn from_custom_id(custom_id: &str) -> Self {
        match custom_id {
            REMOVE_NOTE_CUSTOM_ID => Self::RemoveNote,
            DISMISS_REPLY_CUSTOM_ID => Self::DeleteMessage,
            _ => Self::Ignore,
        }
    }
}

/// A component click, reduced to what the handlers need
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentClick {
    pub channel_id: u64,
    pub message_id: u64,
    pub custom_id: String,
    pub user_tag: String,
}

impl<P: Platform> RequestDispatcher<P> {
    /// Carry out a click that has already been acknowledged.
    pub async fn on_component_click(&self, click: &ComponentClick) -> Result<()> {
        match ClickAction::from_custom_id(&click.custom_id) {
            ClickAction::RemoveNote => self.remove_note(click).await,
            ClickAction::DeleteMessage => {
                self.platform
                    .delete_message(click.channel_id, click.message_id)
                    .await?;
                debug!("Reply {} dismissed by {}", click.message_id, click.user_tag);
                Ok(())
            }
            ClickAction::Ignore => Ok(()),
        }
    }

    async fn remove_note(&self, click: &ComponentClick) -> Result<()> {
        let _guard = self.locks.acquire(click.message_id).await;

        // Re-read under the lock; the click payload may predate a merge
        let message = self
            .platform
            .fetch_message(click.channel_id, click.message_id)
            .await?;
        if !message.author.bot {
            return Ok(());
        }
        let Some(mut request) = Request::from_fetched(message) else {
            return Ok(());
        };
        if !request.remove_note() {
            debug!("Request {} has no note to remove", request.id);
            return Ok(());
        }

        self.platform.edit_message(&request).await?;
        info!("Note on request {} removed by {}", request.id, click.user_tag);
        Ok(())
    }
}

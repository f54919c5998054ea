//! Runtime ports between the conversation engine and its collaborators.
//!
//! Object-safety note: traits use `async-trait` for async dyn-dispatch.

use crate::error::TrackerResult;
use crate::ids::ChatId;
use crate::model::UserDirectory;
use crate::reply::Reply;
use async_trait::async_trait;

/// Whole-document user store.
///
/// `load` never fails: a missing or unreadable document yields an empty
/// directory. `save` replaces the document; concurrent savers are not
/// coordinated and the last write wins.
#[async_trait]
pub trait UserStorePort: Send + Sync {
    async fn load(&self) -> UserDirectory;
    async fn save(&self, users: &UserDirectory) -> TrackerResult<()>;
}

/// Out-of-turn delivery, used by the rest timer.
#[async_trait]
pub trait NotifierPort: Send + Sync {
    async fn notify(&self, chat_id: ChatId, reply: Reply) -> TrackerResult<()>;
}

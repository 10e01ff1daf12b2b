//! In-memory conversation store.
//!
//! Owns the ordered list of conversations and the active pointer. All
//! mutation goes through `&mut self`; rendering and persistence read it
//! through [`Snapshot`].
//!
//! Once [`ConversationStore::ensure_non_empty`] has run, the list is never
//! empty and the active pointer always indexes into it. Operations on the
//! active conversation fail with [`StoreError::InvalidState`] before that,
//! so conversation creation stays explicit.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::errors::{StoreError, StoreResult};
use super::ids::ConversationId;
use super::types::{
    Conversation, DEFAULT_TITLE_MAX_CHARS, MediaRef, Message, Role, derive_title,
};

/// Ordered conversations plus the active pointer.
#[derive(Clone, Debug)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active: Option<usize>,
    title_max_chars: usize,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Create an empty, uninitialized store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            conversations: Vec::new(),
            active: None,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }

    /// Set how many characters of the first message are kept in a derived title.
    #[must_use]
    pub fn with_title_max_chars(mut self, max_chars: usize) -> Self {
        self.title_max_chars = max_chars.max(1);
        self
    }

    /// Make sure at least one conversation exists and the active pointer is valid.
    ///
    /// Idempotent: a second call changes nothing.
    pub fn ensure_non_empty(&mut self) {
        if self.conversations.is_empty() {
            let conversation = Conversation::new();
            debug!("Created default conversation: {}", conversation.id);
            self.conversations.push(conversation);
            self.active = Some(0);
            return;
        }

        if !self
            .active
            .is_some_and(|index| index < self.conversations.len())
        {
            self.active = Some(0);
        }
    }

    /// Append a fresh conversation and make it active.
    pub fn start_new(&mut self) -> ConversationId {
        let conversation = Conversation::new();
        let id = conversation.id.clone();
        self.conversations.push(conversation);
        self.active = Some(self.conversations.len() - 1);
        debug!("Started conversation: {}", id);
        id
    }

    /// Point the active pointer at `id`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no conversation has that id.
    pub fn select_active(&mut self, id: &ConversationId) -> StoreResult<()> {
        let index = self.position(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.active = Some(index);
        Ok(())
    }

    /// Append a user text message to the active conversation.
    ///
    /// The text is stored trimmed. The first message of a conversation
    /// also sets its title.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidInput`] for blank text and
    /// [`StoreError::InvalidState`] before initialization.
    pub fn append_user_text(&mut self, text: &str) -> StoreResult<()> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(StoreError::InvalidInput(
                "message text must not be empty".to_string(),
            ));
        }
        let max_chars = self.title_max_chars;
        let conversation = self.active_mut()?;
        push_message(conversation, Message::user_text(trimmed), max_chars);
        Ok(())
    }

    /// Append a user image message. The caption may be empty and filled in
    /// later with [`Self::backfill_pending_image_caption`].
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidState`] before initialization.
    pub fn append_user_image(&mut self, media: MediaRef, caption: &str) -> StoreResult<()> {
        let max_chars = self.title_max_chars;
        let conversation = self.active_mut()?;
        push_message(
            conversation,
            Message::user_image(media, caption.trim()),
            max_chars,
        );
        Ok(())
    }

    /// Set the caption of the tail message if it is an uncaptioned user image.
    ///
    /// Returns whether the caption was applied. Any other tail is left alone.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidState`] before initialization.
    pub fn backfill_pending_image_caption(&mut self, text: &str) -> StoreResult<bool> {
        let caption = text.trim();
        let max_chars = self.title_max_chars;
        let conversation = self.active_mut()?;

        let Some(tail) = conversation.messages.last_mut() else {
            return Ok(false);
        };
        if caption.is_empty() || !tail.is_uncaptioned_user_image() {
            return Ok(false);
        }

        tail.text = caption.to_string();
        if conversation.messages.len() == 1 {
            derive_first_title(conversation, max_chars);
        }
        Ok(true)
    }

    /// Append an assistant reply to the active conversation. Any text is accepted.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidState`] before initialization.
    pub fn append_assistant_text(&mut self, text: &str, easter_egg: bool) -> StoreResult<()> {
        let max_chars = self.title_max_chars;
        let conversation = self.active_mut()?;
        push_message(
            conversation,
            Message::assistant_text(text, easter_egg),
            max_chars,
        );
        Ok(())
    }

    /// Replace every conversation, typically with the server's copy of history.
    ///
    /// With a non-empty list and `choose_active_last`, the last conversation
    /// becomes active. Otherwise the store is re-initialized through
    /// [`Self::ensure_non_empty`], which selects the first conversation or
    /// creates a default one. Later duplicates of an id are dropped.
    pub fn replace_all(&mut self, conversations: Vec<Conversation>, choose_active_last: bool) {
        let mut seen = HashSet::with_capacity(conversations.len());
        let mut unique = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            if seen.insert(conversation.id.clone()) {
                unique.push(conversation);
            } else {
                warn!("Dropping duplicate conversation id: {}", conversation.id);
            }
        }

        self.conversations = unique;
        self.active = None;

        if choose_active_last && !self.conversations.is_empty() {
            self.active = Some(self.conversations.len() - 1);
        } else {
            self.ensure_non_empty();
        }
        debug!("Replaced history with {} conversations", self.conversations.len());
    }

    /// Remove a conversation.
    ///
    /// The active pointer stays on the same conversation when another one is
    /// removed. Removing the active conversation activates its neighbour.
    /// Removing the last conversation leaves one fresh default conversation.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no conversation has that id.
    pub fn delete(&mut self, id: &ConversationId) -> StoreResult<()> {
        let index = self.position(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.conversations.remove(index);

        self.active = match self.active {
            Some(active) if active > index => Some(active - 1),
            Some(active) if active == index => {
                Some(index.min(self.conversations.len().saturating_sub(1)))
            }
            other => other,
        };

        if self.conversations.is_empty() {
            self.active = None;
        }
        self.ensure_non_empty();
        debug!("Deleted conversation: {}", id);
        Ok(())
    }

    /// Set an explicit title.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidInput`] for a blank title and
    /// [`StoreError::NotFound`] for an unknown id.
    pub fn rename(&mut self, id: &ConversationId, title: &str) -> StoreResult<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidInput("title must not be empty".to_string()));
        }
        let index = self.position(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.conversations[index].title = title.to_string();
        Ok(())
    }

    /// Replace a locally assigned id with one handed out by the server.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if `old` is unknown and
    /// [`StoreError::InvalidInput`] if `new` is already taken by another conversation.
    pub fn rebind_id(&mut self, old: &ConversationId, new: ConversationId) -> StoreResult<()> {
        let index = self.position(old).ok_or_else(|| StoreError::NotFound(old.clone()))?;
        if old == &new {
            return Ok(());
        }
        if self.position(&new).is_some() {
            return Err(StoreError::InvalidInput(format!(
                "conversation id already in use: {new}"
            )));
        }
        debug!("Rebinding conversation {} to {}", old, new);
        self.conversations[index].id = new;
        Ok(())
    }

    /// Read-only view of the whole store.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            conversations: &self.conversations,
            active: self.active,
        }
    }

    /// Number of conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the store holds no conversations (only before initialization).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    fn position(&self, id: &ConversationId) -> Option<usize> {
        self.conversations.iter().position(|c| &c.id == id)
    }

    fn active_mut(&mut self) -> StoreResult<&mut Conversation> {
        let index = self.active.ok_or_else(|| {
            StoreError::InvalidState("no active conversation; initialize the store first".to_string())
        })?;
        self.conversations.get_mut(index).ok_or_else(|| {
            StoreError::InvalidState(format!("active index {index} out of range"))
        })
    }
}

fn push_message(conversation: &mut Conversation, message: Message, max_chars: usize) {
    conversation.messages.push(message);
    if conversation.messages.len() == 1 {
        derive_first_title(conversation, max_chars);
    }
}

/// Title from the first message, only while the placeholder title is in place.
fn derive_first_title(conversation: &mut Conversation, max_chars: usize) {
    if !conversation.has_default_title() {
        return;
    }
    let Some(first) = conversation.messages.first() else {
        return;
    };
    if first.role != Role::User {
        return;
    }
    if let Some(title) = derive_title(&first.text, max_chars) {
        conversation.title = title;
    }
}

/// Borrowed, read-only view of a [`ConversationStore`].
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    conversations: &'a [Conversation],
    active: Option<usize>,
}

impl<'a> Snapshot<'a> {
    /// All conversations in order.
    #[must_use]
    pub const fn conversations(&self) -> &'a [Conversation] {
        self.conversations
    }

    /// Index of the active conversation.
    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The active conversation.
    #[must_use]
    pub fn active(&self) -> Option<&'a Conversation> {
        self.active.and_then(|index| self.conversations.get(index))
    }

    /// Id of the active conversation.
    #[must_use]
    pub fn active_id(&self) -> Option<&'a ConversationId> {
        self.active().map(|c| &c.id)
    }

    /// Owned copy of the conversations, for persistence.
    #[must_use]
    pub fn to_conversations(&self) -> Vec<Conversation> {
        self.conversations.to_vec()
    }
}

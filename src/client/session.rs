//! One chat session: the store plus the send and history flows around it.
//!
//! The session owns its [`ConversationStore`] and awaits every collaborator
//! call before mutating again, so there is never more than one send in
//! flight. Transport failures become a single fallback assistant message;
//! history failures are logged and otherwise ignored.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::config::{AuthSession, AutosavePolicy, ClientConfig, Preferences};
use super::{ChatTransport, HistoryService, ImageUpload, Renderer};
use crate::conversation::{
    ConversationId, ConversationStore, MediaRef, Snapshot, StoreError, StoreResult,
};

/// A signed-in or anonymous chat session.
pub struct ChatSession {
    store: ConversationStore,
    config: ClientConfig,
    transport: Arc<dyn ChatTransport>,
    history: Arc<dyn HistoryService>,
    renderer: Arc<dyn Renderer>,
    pending_image: Option<PendingImage>,
    thinking: bool,
}

/// Upload shown as a bubble in `conversation` and sent with the next submit there.
struct PendingImage {
    conversation: ConversationId,
    upload: ImageUpload,
}

impl ChatSession {
    /// Create a session. Call [`Self::start`] before sending.
    #[must_use]
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn ChatTransport>,
        history: Arc<dyn HistoryService>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let store = ConversationStore::new().with_title_max_chars(config.title_max_chars);
        Self {
            store,
            config,
            transport,
            history,
            renderer,
            pending_image: None,
            thinking: false,
        }
    }

    /// Initialize the store, pulling server history first when signed in.
    pub async fn start(&mut self) {
        if self.config.auth.is_some() {
            self.pull_history().await;
        }
        self.store.ensure_non_empty();
        self.render();
    }

    /// Record the credentials from a login flow and replace local history
    /// with the server copy.
    pub async fn sign_in(&mut self, auth: AuthSession) {
        info!("Signed in as {}", auth.display_name);
        self.config.auth = Some(auth);
        self.pull_history().await;
        self.store.ensure_non_empty();
        self.render();
    }

    /// Forget the credentials. Local conversations are kept.
    pub fn sign_out(&mut self) {
        if let Some(auth) = self.config.auth.take() {
            info!("Signed out {}", auth.display_name);
        }
    }

    /// Start a fresh conversation and make it active.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidState`] while an attached image waits to be sent.
    pub fn new_conversation(&mut self) -> StoreResult<ConversationId> {
        self.ensure_no_pending_image()?;
        let id = self.store.start_new();
        self.render();
        Ok(id)
    }

    /// Switch to another conversation. Selecting the active one is a no-op.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::InvalidState`] when leaving a conversation whose
    /// attached image has not been sent.
    pub fn select(&mut self, id: &ConversationId) -> StoreResult<()> {
        if self.store.snapshot().active_id() == Some(id) {
            return Ok(());
        }
        self.ensure_no_pending_image()?;
        self.store.select_active(id)?;
        self.render();
        Ok(())
    }

    /// Delete a conversation. Deleting the one holding an unsent image
    /// drops that upload together with its bubble.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn delete(&mut self, id: &ConversationId) -> StoreResult<()> {
        self.store.delete(id)?;
        if self
            .pending_image
            .as_ref()
            .is_some_and(|pending| &pending.conversation == id)
        {
            self.discard_pending_image();
        }
        self.render();
        Ok(())
    }

    /// Rename a conversation.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidInput`] for a blank title or
    /// [`StoreError::NotFound`] for an unknown id.
    pub fn rename(&mut self, id: &ConversationId, title: &str) -> StoreResult<()> {
        self.store.rename(id, title)?;
        self.render();
        Ok(())
    }

    /// Show an attached image in the active conversation. It is uploaded
    /// with the next [`Self::submit`], whose text becomes its caption.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidState`] if another image is still waiting.
    pub fn attach_image(&mut self, preview: MediaRef, upload: ImageUpload) -> StoreResult<()> {
        if self.pending_image.is_some() {
            return Err(StoreError::InvalidState(
                "an image is already waiting to be sent".to_string(),
            ));
        }
        self.store.ensure_non_empty();
        self.store.append_user_image(preview, "")?;
        if let Some(conversation) = self.store.snapshot().active_id() {
            self.pending_image = Some(PendingImage {
                conversation: conversation.clone(),
                upload,
            });
        }
        self.render();
        Ok(())
    }

    /// Send the user's input and append the reply.
    ///
    /// With a pending image the text becomes its caption and may be empty.
    /// Without one the text must not be blank.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidInput`] for blank text without an image.
    /// Transport failures are not errors: they become a fallback reply.
    pub async fn submit(&mut self, text: &str) -> StoreResult<()> {
        self.store.ensure_non_empty();
        let text = text.trim();

        let upload = self.pending_image.take().map(|pending| pending.upload);
        if upload.is_some() {
            self.store.backfill_pending_image_caption(text)?;
        } else {
            self.store.append_user_text(text)?;
        }
        self.render();

        let transport = Arc::clone(&self.transport);
        self.set_thinking(true);
        let result = match upload {
            Some(image) => transport.send_image_message(text, image).await,
            None => transport.send_message(text).await,
        };
        self.set_thinking(false);

        let (reply, easter_egg) = match result {
            Ok(reply) => (reply.text, reply.easter_egg),
            Err(err) => {
                warn!("Chat request failed: {err}");
                (err.fallback_reply().to_string(), false)
            }
        };
        self.store.append_assistant_text(&reply, easter_egg)?;
        self.render();

        if self.config.autosave == AutosavePolicy::EveryTurn {
            self.save_history().await;
        }
        Ok(())
    }

    /// Push the full conversation list to the history service.
    ///
    /// Best effort: returns whether it was saved, failures are only logged.
    pub async fn save_history(&self) -> bool {
        let Some(token) = self.config.auth_token() else {
            return false;
        };
        let conversations = self.store.snapshot().to_conversations();
        match self.history.save_history(token, conversations).await {
            Ok(()) => true,
            Err(err) => {
                warn!("Failed to save history: {err}");
                false
            }
        }
    }

    /// Read-only view of the store.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.store.snapshot()
    }

    /// Current configuration, e.g. to persist it.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Mutable presentation preferences.
    pub const fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.config.preferences
    }

    /// Whether a reply is being awaited.
    #[must_use]
    pub const fn is_thinking(&self) -> bool {
        self.thinking
    }

    /// Whether an attached image waits for the next submit.
    #[must_use]
    pub const fn has_pending_image(&self) -> bool {
        self.pending_image.is_some()
    }

    /// Whether credentials are present.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.config.auth.is_some()
    }

    /// Replace the local list with the server copy. Leaves the store as it
    /// was when nothing is stored or the request fails.
    async fn pull_history(&mut self) {
        let Some(token) = self.config.auth_token().map(str::to_string) else {
            return;
        };
        match self.history.load_history(&token).await {
            Ok(Some(conversations)) => {
                debug!("Loaded {} conversations from history", conversations.len());
                self.discard_pending_image();
                self.store.replace_all(conversations, true);
            }
            Ok(None) => debug!("No stored history"),
            Err(err) => warn!("Failed to load history: {err}"),
        }
    }

    fn ensure_no_pending_image(&self) -> StoreResult<()> {
        if self.pending_image.is_some() {
            return Err(StoreError::InvalidState(
                "send the attached image before leaving this conversation".to_string(),
            ));
        }
        Ok(())
    }

    fn discard_pending_image(&mut self) {
        if self.pending_image.take().is_some() {
            debug!("Dropped pending image upload");
        }
    }

    fn set_thinking(&mut self, thinking: bool) {
        self.thinking = thinking;
        self.render();
    }

    fn render(&self) {
        if !self.store.is_empty() {
            self.renderer.render(self.store.snapshot(), self.thinking);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::client::error::{ClientError, ClientResult, NETWORK_ERROR_REPLY, SERVER_ERROR_REPLY};
    use crate::client::{ChatReply, ClientFuture, NoopRenderer};
    use crate::conversation::{Conversation, DEFAULT_TITLE, MessageKind, Role};

    #[derive(Default)]
    struct FakeTransport {
        fail_with_status: Option<u16>,
        easter_egg: bool,
        sent: Mutex<Vec<(String, bool)>>,
    }

    impl ChatTransport for FakeTransport {
        fn send_message(&self, text: &str) -> ClientFuture<'_, ClientResult<ChatReply>> {
            let text = text.to_string();
            Box::pin(async move {
                self.sent.lock().unwrap().push((text.clone(), false));
                match self.fail_with_status {
                    Some(status) => Err(ClientError::Server {
                        status,
                        body: String::new(),
                    }),
                    None => Ok(ChatReply {
                        text: format!("echo: {text}"),
                        easter_egg: self.easter_egg,
                    }),
                }
            })
        }

        fn send_image_message(
            &self,
            text: &str,
            _image: ImageUpload,
        ) -> ClientFuture<'_, ClientResult<ChatReply>> {
            let text = text.to_string();
            Box::pin(async move {
                self.sent.lock().unwrap().push((text, true));
                Ok(ChatReply {
                    text: "nice picture".to_string(),
                    easter_egg: false,
                })
            })
        }
    }

    struct UnreachableTransport;

    impl ChatTransport for UnreachableTransport {
        fn send_message(&self, _text: &str) -> ClientFuture<'_, ClientResult<ChatReply>> {
            Box::pin(async move {
                let err = reqwest::Client::new()
                    .get("http://127.0.0.1:1/")
                    .send()
                    .await
                    .unwrap_err();
                Err(ClientError::Network(err))
            })
        }

        fn send_image_message(
            &self,
            text: &str,
            _image: ImageUpload,
        ) -> ClientFuture<'_, ClientResult<ChatReply>> {
            self.send_message(text)
        }
    }

    #[derive(Default)]
    struct FakeHistory {
        stored: Mutex<Option<Vec<Conversation>>>,
        saves: Mutex<usize>,
        fail: bool,
    }

    impl HistoryService for FakeHistory {
        fn save_history(
            &self,
            _token: &str,
            conversations: Vec<Conversation>,
        ) -> ClientFuture<'_, ClientResult<()>> {
            Box::pin(async move {
                *self.saves.lock().unwrap() += 1;
                if self.fail {
                    return Err(ClientError::Server {
                        status: 503,
                        body: String::new(),
                    });
                }
                *self.stored.lock().unwrap() = Some(conversations);
                Ok(())
            })
        }

        fn load_history(
            &self,
            _token: &str,
        ) -> ClientFuture<'_, ClientResult<Option<Vec<Conversation>>>> {
            Box::pin(async move {
                if self.fail {
                    return Err(ClientError::Decode("bad".to_string()));
                }
                Ok(self.stored.lock().unwrap().clone())
            })
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Mutex<Vec<(usize, bool)>>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&self, snapshot: Snapshot<'_>, thinking: bool) {
            let count = snapshot.active().map_or(0, |c| c.messages.len());
            self.frames.lock().unwrap().push((count, thinking));
        }
    }

    fn auth() -> AuthSession {
        AuthSession {
            token: "tok".to_string(),
            display_name: "sam".to_string(),
        }
    }

    fn image() -> ImageUpload {
        ImageUpload {
            file_name: "cat.png".to_string(),
            mime: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    fn session_with(
        config: ClientConfig,
        transport: Arc<dyn ChatTransport>,
        history: Arc<FakeHistory>,
    ) -> ChatSession {
        ChatSession::new(config, transport, history, Arc::new(NoopRenderer))
    }

    #[tokio::test]
    async fn test_first_turn_end_to_end() {
        let transport = Arc::new(FakeTransport::default());
        let mut session = session_with(
            ClientConfig::default(),
            transport.clone(),
            Arc::new(FakeHistory::default()),
        );
        session.start().await;
        session.submit("Hi").await.unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.conversations().len(), 1);
        let conversation = snap.active().unwrap();
        assert_eq!(conversation.title, "Hi");
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].role, Role::User);
        assert_eq!(conversation.messages[1].text, "echo: Hi");
        assert!(!session.is_thinking());
        assert_eq!(transport.sent.lock().unwrap().as_slice(), &[("Hi".to_string(), false)]);
    }

    #[tokio::test]
    async fn test_blank_submit_rejected_without_sending() {
        let transport = Arc::new(FakeTransport::default());
        let mut session = session_with(
            ClientConfig::default(),
            transport.clone(),
            Arc::new(FakeHistory::default()),
        );
        session.start().await;
        assert!(matches!(
            session.submit("   ").await,
            Err(StoreError::InvalidInput(_))
        ));
        assert!(session.snapshot().active().unwrap().messages.is_empty());
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_failure_becomes_single_fallback_reply() {
        let transport = Arc::new(FakeTransport {
            fail_with_status: Some(500),
            ..FakeTransport::default()
        });
        let mut session = session_with(
            ClientConfig::default(),
            transport,
            Arc::new(FakeHistory::default()),
        );
        session.start().await;
        session.submit("Hello?").await.unwrap();

        let messages = &session.snapshot().active().unwrap().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].text, SERVER_ERROR_REPLY);
        assert!(!session.is_thinking());
    }

    #[tokio::test]
    async fn test_network_failure_reply() {
        let mut session = session_with(
            ClientConfig::default(),
            Arc::new(UnreachableTransport),
            Arc::new(FakeHistory::default()),
        );
        session.start().await;
        session.submit("Hello?").await.unwrap();
        let last = session.snapshot().active().unwrap().last_message().unwrap().clone();
        assert_eq!(last.text, NETWORK_ERROR_REPLY);
    }

    #[tokio::test]
    async fn test_easter_egg_flag_propagates() {
        let transport = Arc::new(FakeTransport {
            easter_egg: true,
            ..FakeTransport::default()
        });
        let mut session = session_with(
            ClientConfig::default(),
            transport,
            Arc::new(FakeHistory::default()),
        );
        session.start().await;
        session.submit("xyzzy").await.unwrap();
        let last = session.snapshot().active().unwrap().last_message().unwrap().clone();
        assert!(last.easter_egg);
    }

    #[tokio::test]
    async fn test_thinking_indicator_frames() {
        let renderer = Arc::new(RecordingRenderer::default());
        let mut session = ChatSession::new(
            ClientConfig::default(),
            Arc::new(FakeTransport::default()),
            Arc::new(FakeHistory::default()),
            renderer.clone(),
        );
        session.start().await;
        session.submit("Hi").await.unwrap();

        let frames = renderer.frames.lock().unwrap().clone();
        assert_eq!(
            frames,
            vec![(0, false), (1, false), (1, true), (1, false), (2, false)]
        );
    }

    #[tokio::test]
    async fn test_image_then_text_sends_captioned_image() {
        let transport = Arc::new(FakeTransport::default());
        let mut session = session_with(
            ClientConfig::default(),
            transport.clone(),
            Arc::new(FakeHistory::default()),
        );
        session.start().await;
        session
            .attach_image(MediaRef::Preview("blob:cat".to_string()), image())
            .unwrap();
        assert!(session.has_pending_image());
        assert!(matches!(
            session.attach_image(MediaRef::Preview("blob:dog".to_string()), image()),
            Err(StoreError::InvalidState(_))
        ));

        session.submit("what breed?").await.unwrap();

        assert!(!session.has_pending_image());
        let conversation = session.snapshot().active().unwrap().clone();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].kind, MessageKind::Image);
        assert_eq!(conversation.messages[0].text, "what breed?");
        assert_eq!(conversation.title, "what breed?");
        assert_eq!(conversation.messages[1].text, "nice picture");
        assert_eq!(
            transport.sent.lock().unwrap().as_slice(),
            &[("what breed?".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn test_image_without_text_is_allowed() {
        let mut session = session_with(
            ClientConfig::default(),
            Arc::new(FakeTransport::default()),
            Arc::new(FakeHistory::default()),
        );
        session.start().await;
        session
            .attach_image(MediaRef::Preview("blob:cat".to_string()), image())
            .unwrap();
        session.submit("").await.unwrap();
        let conversation = session.snapshot().active().unwrap().clone();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_pending_image_pins_its_conversation() {
        let transport = Arc::new(FakeTransport::default());
        let mut session = session_with(
            ClientConfig::default(),
            transport.clone(),
            Arc::new(FakeHistory::default()),
        );
        session.start().await;
        let first = session.snapshot().active_id().unwrap().clone();
        session
            .attach_image(MediaRef::Preview("blob:cat".to_string()), image())
            .unwrap();

        session.select(&first).unwrap();
        assert!(matches!(
            session.new_conversation(),
            Err(StoreError::InvalidState(_))
        ));
        assert_eq!(session.snapshot().conversations().len(), 1);
        assert!(session.has_pending_image());

        session.submit("what is this").await.unwrap();

        let conversation = session.snapshot().active().unwrap().clone();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].kind, MessageKind::Image);
        assert_eq!(conversation.messages[0].text, "what is this");
        assert_eq!(conversation.messages[1].role, Role::Assistant);
        assert_eq!(
            transport.sent.lock().unwrap().as_slice(),
            &[("what is this".to_string(), true)]
        );

        let second = session.new_conversation().unwrap();
        session.select(&first).unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_switching_away_from_pending_image_rejected() {
        let mut session = session_with(
            ClientConfig::default(),
            Arc::new(FakeTransport::default()),
            Arc::new(FakeHistory::default()),
        );
        session.start().await;
        let first = session.snapshot().active_id().unwrap().clone();
        session.new_conversation().unwrap();
        session
            .attach_image(MediaRef::Preview("blob:cat".to_string()), image())
            .unwrap();

        assert!(matches!(
            session.select(&first),
            Err(StoreError::InvalidState(_))
        ));
        assert_ne!(session.snapshot().active_id(), Some(&first));
        assert!(session.has_pending_image());
    }

    #[tokio::test]
    async fn test_deleting_conversation_with_pending_image_drops_it() {
        let transport = Arc::new(FakeTransport::default());
        let mut session = session_with(
            ClientConfig::default(),
            transport.clone(),
            Arc::new(FakeHistory::default()),
        );
        session.start().await;
        let first = session.snapshot().active_id().unwrap().clone();
        let second = session.new_conversation().unwrap();
        session
            .attach_image(MediaRef::Preview("blob:cat".to_string()), image())
            .unwrap();

        session.delete(&first).unwrap();
        assert!(session.has_pending_image());

        session.delete(&second).unwrap();
        assert!(!session.has_pending_image());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.conversations().len(), 1);
        assert!(snapshot.active().unwrap().messages.is_empty());

        session.submit("hello").await.unwrap();
        assert_eq!(
            transport.sent.lock().unwrap().as_slice(),
            &[("hello".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_autosave_every_turn_when_signed_in() {
        let history = Arc::new(FakeHistory::default());
        let mut session = session_with(
            ClientConfig::default().with_auth(auth()),
            Arc::new(FakeTransport::default()),
            history.clone(),
        );
        session.start().await;
        session.submit("Hi").await.unwrap();
        session.submit("Again").await.unwrap();

        assert_eq!(*history.saves.lock().unwrap(), 2);
        let stored = history.stored.lock().unwrap().clone().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].messages.len(), 4);
    }

    #[tokio::test]
    async fn test_no_autosave_when_anonymous() {
        let history = Arc::new(FakeHistory::default());
        let mut session = session_with(
            ClientConfig::default(),
            Arc::new(FakeTransport::default()),
            history.clone(),
        );
        session.start().await;
        session.submit("Hi").await.unwrap();
        assert_eq!(*history.saves.lock().unwrap(), 0);
        assert!(!session.save_history().await);
    }

    #[tokio::test]
    async fn test_manual_autosave_only_saves_on_request() {
        let history = Arc::new(FakeHistory::default());
        let mut session = session_with(
            ClientConfig::default()
                .with_auth(auth())
                .with_autosave(AutosavePolicy::Manual),
            Arc::new(FakeTransport::default()),
            history.clone(),
        );
        session.start().await;
        session.submit("Hi").await.unwrap();
        assert_eq!(*history.saves.lock().unwrap(), 0);

        assert!(session.save_history().await);
        assert_eq!(*history.saves.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_is_swallowed() {
        let history = Arc::new(FakeHistory {
            fail: true,
            ..FakeHistory::default()
        });
        let mut session = session_with(
            ClientConfig::default().with_auth(auth()),
            Arc::new(FakeTransport::default()),
            history.clone(),
        );
        session.start().await;
        session.submit("Hi").await.unwrap();
        assert_eq!(*history.saves.lock().unwrap(), 1);
        assert_eq!(session.snapshot().active().unwrap().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_sign_in_replaces_local_history() {
        let mut remote = Conversation::new();
        remote.title = "From server".to_string();
        let remote_id = remote.id.clone();
        let history = Arc::new(FakeHistory {
            stored: Mutex::new(Some(vec![Conversation::new(), remote])),
            ..FakeHistory::default()
        });

        let mut session = session_with(
            ClientConfig::default(),
            Arc::new(FakeTransport::default()),
            history,
        );
        session.start().await;
        session.submit("local only").await.unwrap();

        session.sign_in(auth()).await;
        let snap = session.snapshot();
        assert_eq!(snap.conversations().len(), 2);
        assert_eq!(snap.active_id(), Some(&remote_id));
        assert!(session.is_signed_in());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_store_usable() {
        let history = Arc::new(FakeHistory {
            fail: true,
            ..FakeHistory::default()
        });
        let mut session = session_with(
            ClientConfig::default().with_auth(auth()),
            Arc::new(FakeTransport::default()),
            history,
        );
        session.start().await;
        let snap = session.snapshot();
        assert_eq!(snap.conversations().len(), 1);
        assert_eq!(snap.active_index(), Some(0));
    }

    #[tokio::test]
    async fn test_sign_out_keeps_conversations() {
        let mut session = session_with(
            ClientConfig::default().with_auth(auth()),
            Arc::new(FakeTransport::default()),
            Arc::new(FakeHistory::default()),
        );
        session.start().await;
        session.submit("Hi").await.unwrap();
        session.sign_out();
        assert!(!session.is_signed_in());
        assert_eq!(session.snapshot().active().unwrap().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_preferences_are_mutable() {
        let mut session = session_with(
            ClientConfig::default(),
            Arc::new(FakeTransport::default()),
            Arc::new(FakeHistory::default()),
        );
        session.preferences_mut().background = Some("forest".to_string());
        assert_eq!(
            session.config().preferences.background.as_deref(),
            Some("forest")
        );
    }
}

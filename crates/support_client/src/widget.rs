//! Collapsible support chat session: open/closed state, message log, current
//! dialog node and the in-flight request guard.

use shared::{
    domain::{ChatMessage, FaqTopic},
    protocol::{SupportReply, SupportRequest},
};
use tracing::{debug, warn};

use crate::{
    dialog::{
        actions_for, entry_messages, offers, ActionItem, ChatAction, DialogNode, Step, GREETING,
        UNKNOWN_FAQ_MESSAGE,
    },
    error::ChatError,
    transport::{connectivity_failure, SupportTransport},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionView {
    pub item: ActionItem,
    pub disabled: bool,
}

#[derive(Debug, Clone)]
pub struct ChatWidget {
    open: bool,
    initialized: bool,
    node: DialogNode,
    log: Vec<ChatMessage>,
    pending: Option<SupportRequest>,
    scroll_requested: bool,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWidget {
    pub fn new() -> Self {
        Self {
            open: false,
            initialized: false,
            node: DialogNode::Root,
            log: Vec::new(),
            pending: None,
            scroll_requested: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn node(&self) -> DialogNode {
        self.node
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.log
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_request(&self) -> Option<SupportRequest> {
        self.pending
    }

    /// Returns and clears the scroll-to-bottom request raised by new messages
    /// or by opening the panel.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
        if open {
            if !self.initialized {
                self.reset_dialog();
                self.initialized = true;
            }
            self.scroll_requested = true;
        }
    }

    pub fn open(&mut self) {
        self.set_open(true);
    }

    pub fn close(&mut self) {
        self.set_open(false);
    }

    pub fn toggle(&mut self) {
        self.set_open(!self.open);
    }

    /// Escape closes an open panel and is ignored otherwise.
    pub fn handle_escape(&mut self) -> bool {
        if self.open {
            self.close();
            true
        } else {
            false
        }
    }

    /// Current action panel; buttons are disabled while a request is pending.
    pub fn actions(&self) -> Vec<ActionView> {
        let busy = self.is_busy();
        actions_for(self.node)
            .into_iter()
            .map(|item| ActionView {
                item,
                disabled: busy && item.action().is_some(),
            })
            .collect()
    }

    fn push(&mut self, message: ChatMessage) {
        self.log.push(message);
        self.scroll_requested = true;
    }

    fn reset_dialog(&mut self) {
        self.log.clear();
        self.push(ChatMessage::bot(GREETING));
        self.node = DialogNode::Root;
    }

    fn enter(&mut self, node: DialogNode) {
        for message in entry_messages(node) {
            self.push(message);
        }
        self.node = node;
    }

    /// Applies a button press. Navigation happens immediately; leaf actions
    /// mark the widget busy and hand back the request to send.
    pub fn select(&mut self, action: ChatAction) -> Result<Option<SupportRequest>, ChatError> {
        if !self.open {
            return Err(ChatError::Closed);
        }
        if self.is_busy() {
            return Err(ChatError::Busy);
        }
        if !offers(self.node, action) {
            return Err(ChatError::UnavailableAction(action));
        }

        if let Some(echo) = action.echo() {
            self.push(ChatMessage::user(echo));
        }

        match action.step() {
            Step::Navigate(node) => {
                self.enter(node);
                Ok(None)
            }
            Step::Submit(request) => {
                debug!(?request, "support request queued");
                self.pending = Some(request);
                Ok(Some(request))
            }
        }
    }

    /// Finishes the in-flight request: the reply becomes the bot message and
    /// the dialog returns to the root menu.
    pub fn complete(&mut self, reply: SupportReply) -> Result<(), ChatError> {
        if self.pending.take().is_none() {
            return Err(ChatError::Idle);
        }
        self.push(ChatMessage::bot(reply.message));
        self.node = DialogNode::Root;
        Ok(())
    }

    /// `select` followed, for leaf actions, by the transport round trip and
    /// `complete`. Transport failures surface as the connectivity message.
    pub async fn run<T>(
        &mut self,
        action: ChatAction,
        transport: &T,
    ) -> Result<Option<SupportReply>, ChatError>
    where
        T: SupportTransport + ?Sized,
    {
        let Some(request) = self.select(action)? else {
            return Ok(None);
        };

        let reply = match transport.submit(request).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(%error, path = request.path(), "support request failed");
                connectivity_failure()
            }
        };

        self.complete(reply.clone())?;
        Ok(Some(reply))
    }

    /// Opens a FAQ answer by its wire key, as deep links do. Unknown keys fall
    /// back to the root menu with an apology.
    pub fn open_faq_by_key(&mut self, key: &str) -> Result<(), ChatError> {
        if !self.open {
            return Err(ChatError::Closed);
        }
        if self.is_busy() {
            return Err(ChatError::Busy);
        }

        match key.parse::<FaqTopic>() {
            Ok(topic) => {
                let action = ChatAction::OpenFaqAnswer(topic);
                if let Some(echo) = action.echo() {
                    self.push(ChatMessage::user(echo));
                }
                self.enter(DialogNode::FaqAnswer(topic));
            }
            Err(error) => {
                debug!(%error, "faq answer not found");
                self.push(ChatMessage::bot(UNKNOWN_FAQ_MESSAGE));
                self.node = DialogNode::Root;
            }
        }
        Ok(())
    }
}

use super::replies::ReplyTable;
use crate::constants::REPLY_DELAY;
use crate::schedule::{DeferredTask, TimerScheduler};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_bot: bool,
}

impl Message {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bot: true,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bot: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Open,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEvent {
    Opened,
    Closed,
    MessageAppended { index: usize, is_bot: bool },
    DraftChanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input (or a disposed widget); nothing changed.
    Ignored,
    /// User message appended and a reply scheduled.
    Sent,
}

#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub reply_delay: Duration,
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay: REPLY_DELAY,
            greeting: "Hi there! I'm Satvik's assistant. How can I help you?".into(),
        }
    }
}

struct ChatState {
    panel: PanelState,
    transcript: Vec<Message>,
    draft: String,
    pending: Vec<DeferredTask>,
    disposed: bool,
}

type ChatListener = Rc<dyn Fn(&ChatWidget, &ChatEvent)>;

struct ChatShared {
    state: RefCell<ChatState>,
    listeners: RefCell<Vec<ChatListener>>,
    replies: ReplyTable,
    config: ChatConfig,
    timers: Rc<dyn TimerScheduler>,
}

/// Scripted chat panel: open/closed state, transcript, draft input, and the
/// delayed bot replies.
///
/// Cloning yields another handle to the same widget. Listeners receive the
/// widget by reference so they never need to capture it.
#[derive(Clone)]
pub struct ChatWidget {
    shared: Rc<ChatShared>,
}

impl ChatWidget {
    pub fn new(timers: Rc<dyn TimerScheduler>, replies: ReplyTable, config: ChatConfig) -> Self {
        let greeting = Message::bot(config.greeting.clone());
        Self {
            shared: Rc::new(ChatShared {
                state: RefCell::new(ChatState {
                    panel: PanelState::Closed,
                    transcript: vec![greeting],
                    draft: String::new(),
                    pending: Vec::new(),
                    disposed: false,
                }),
                listeners: RefCell::new(Vec::new()),
                replies,
                config,
                timers,
            }),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&ChatWidget, &ChatEvent) + 'static) {
        self.shared.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn panel(&self) -> PanelState {
        self.shared.state.borrow().panel
    }

    pub fn is_open(&self) -> bool {
        self.panel() == PanelState::Open
    }

    pub fn toggle(&self) -> PanelState {
        let next = {
            let mut st = self.shared.state.borrow_mut();
            st.panel = match st.panel {
                PanelState::Closed => PanelState::Open,
                PanelState::Open => PanelState::Closed,
            };
            st.panel
        };
        notify(
            &self.shared,
            match next {
                PanelState::Open => ChatEvent::Opened,
                PanelState::Closed => ChatEvent::Closed,
            },
        );
        next
    }

    pub fn draft(&self) -> String {
        self.shared.state.borrow().draft.clone()
    }

    pub fn set_draft(&self, text: &str) {
        {
            let mut st = self.shared.state.borrow_mut();
            st.draft.clear();
            st.draft.push_str(text);
        }
        notify(&self.shared, ChatEvent::DraftChanged);
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.shared.state.borrow().transcript.clone()
    }

    pub fn message_count(&self) -> usize {
        self.shared.state.borrow().transcript.len()
    }

    pub fn message(&self, index: usize) -> Option<Message> {
        self.shared.state.borrow().transcript.get(index).cloned()
    }

    pub fn pending_replies(&self) -> usize {
        self.shared
            .state
            .borrow()
            .pending
            .iter()
            .filter(|t| t.is_pending())
            .count()
    }

    /// Append `text` as a user message and schedule exactly one bot reply.
    /// Blank input is ignored and leaves the draft untouched.
    pub fn submit(&self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }
        let index = {
            let mut st = self.shared.state.borrow_mut();
            if st.disposed {
                return SubmitOutcome::Ignored;
            }
            st.transcript.push(Message::user(text));
            st.draft.clear();
            st.pending.retain(|t| t.is_pending());
            st.transcript.len() - 1
        };

        let reply = self.shared.replies.select(text);
        log::debug!("[chat] routed to {}", reply.rule.unwrap_or("fallback"));
        let reply_text = reply.text.to_owned();
        let weak = Rc::downgrade(&self.shared);
        let task = DeferredTask::schedule(
            self.shared.timers.clone(),
            self.shared.config.reply_delay,
            move || {
                if let Some(shared) = weak.upgrade() {
                    deliver_reply(&shared, reply_text);
                }
            },
        );
        self.shared.state.borrow_mut().pending.push(task);

        notify(
            &self.shared,
            ChatEvent::MessageAppended {
                index,
                is_bot: false,
            },
        );
        notify(&self.shared, ChatEvent::DraftChanged);
        SubmitOutcome::Sent
    }

    /// Submit whatever is in the draft, as the form's submit action does.
    pub fn submit_draft(&self) -> SubmitOutcome {
        let text = self.draft();
        self.submit(&text)
    }

    /// Cancel outstanding replies and stop notifying listeners. Replies that
    /// were already queued by the host become no-ops.
    pub fn dispose(&self) {
        let pending = {
            let mut st = self.shared.state.borrow_mut();
            if st.disposed {
                return;
            }
            st.disposed = true;
            std::mem::take(&mut st.pending)
        };
        let cancelled = pending.iter().filter(|t| t.is_pending()).count();
        for task in &pending {
            task.cancel();
        }
        self.shared.listeners.borrow_mut().clear();
        log::info!("[chat] disposed, cancelled {} pending replies", cancelled);
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.state.borrow().disposed
    }
}

fn deliver_reply(shared: &Rc<ChatShared>, text: String) {
    let index = {
        let mut st = shared.state.borrow_mut();
        if st.disposed {
            return;
        }
        st.transcript.push(Message::bot(text));
        st.transcript.len() - 1
    };
    notify(
        shared,
        ChatEvent::MessageAppended {
            index,
            is_bot: true,
        },
    );
}

fn notify(shared: &Rc<ChatShared>, event: ChatEvent) {
    let listeners: Vec<ChatListener> = shared.listeners.borrow().clone();
    if listeners.is_empty() {
        return;
    }
    let widget = ChatWidget {
        shared: shared.clone(),
    };
    for listener in listeners {
        listener(&widget, &event);
    }
}

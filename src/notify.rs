use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

const MAX_MESSAGES: usize = 8;

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

/// Bounded message log shown by the front-end.
///
/// Confirmation is answered ahead of time: the front-end arms it after the
/// player accepts a prompt, and the next `confirm` consumes the answer.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Mutex<VecDeque<String>>,
    confirmed: AtomicBool,
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(VecDeque::with_capacity(MAX_MESSAGES)),
            confirmed: AtomicBool::new(false),
        }
    }

    pub fn push<S: Into<String>>(&self, message: S) {
        let mut messages = self.messages.lock();
        if messages.len() >= MAX_MESSAGES {
            messages.pop_front();
        }
        messages.push_back(message.into());
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().iter().cloned().collect()
    }

    pub fn arm_confirmation(&self) {
        self.confirmed.store(true, Ordering::SeqCst);
    }
}

impl Notifier for MessageLog {
    fn notify(&self, message: &str) {
        self.push(message);
    }

    fn confirm(&self, message: &str) -> bool {
        let accepted = self.confirmed.swap(false, Ordering::SeqCst);
        if !accepted {
            self.push(format!("{message} (not confirmed)"));
        }
        accepted
    }
}

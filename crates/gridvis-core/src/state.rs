//! State management for the grid visual.
//!
//! This module implements the Elm Architecture pattern for predictable state
//! management: `State + Message → (State, Command)`.
//!
//! # Examples
//!
//! ```
//! use gridvis_core::{Command, FormattingSettings, SettingsIntent, State, StyleFlag};
//!
//! let mut settings = FormattingSettings::default();
//! let cmd = settings.update(SettingsIntent::ToggleStyle(StyleFlag::Italic));
//! assert!(settings.italic);
//! assert!(!cmd.is_none());
//! ```

use crate::settings::PersistedSettings;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Application state trait.
///
/// Implements the Elm Architecture: State + Message → (State, Command)
pub trait State: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// Message type for state updates
    type Message: Send;

    /// Update state in response to a message.
    ///
    /// Returns a command describing the side effects to run.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;
}

/// Commands for side effects.
///
/// Commands represent effects that should happen after a state update:
/// - Async tasks (selection identity resolution)
/// - Persistence of settings to the host
/// - Re-rendering the view
#[derive(Default)]
pub enum Command<M> {
    /// No command
    #[default]
    None,
    /// Execute multiple commands
    Batch(Vec<Command<M>>),
    /// Execute an async task whose result is fed back as a message
    Task(Pin<Box<dyn Future<Output = M> + Send>>),
    /// Persist settings to the host (fire-and-forget)
    Persist(PersistedSettings),
    /// Re-render the view
    Render,
}

impl<M> std::fmt::Debug for Command<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Task(_) => f.write_str("Task(..)"),
            Self::Persist(props) => f.debug_tuple("Persist").field(props).finish(),
            Self::Render => f.write_str("Render"),
        }
    }
}

impl<M> Command<M> {
    /// Create a task command from an async block.
    pub fn task<F>(future: F) -> Self
    where
        F: Future<Output = M> + Send + 'static,
    {
        Self::Task(Box::pin(future))
    }

    /// Create a batch of commands.
    pub fn batch(commands: impl IntoIterator<Item = Self>) -> Self {
        Self::Batch(commands.into_iter().collect())
    }

    /// Check if this is the none command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether this command (or any batched command) requests a render.
    #[must_use]
    pub fn requests_render(&self) -> bool {
        match self {
            Self::Render => true,
            Self::Batch(cmds) => cmds.iter().any(Self::requests_render),
            _ => false,
        }
    }

    /// The settings to persist, if this command (or a batched one) persists.
    #[must_use]
    pub fn persisted(&self) -> Option<&PersistedSettings> {
        match self {
            Self::Persist(props) => Some(props),
            Self::Batch(cmds) => cmds.iter().find_map(Self::persisted),
            _ => None,
        }
    }

    /// Flatten nested batches into a flat list, dropping `None`.
    #[must_use]
    pub fn into_vec(self) -> Vec<Self> {
        match self {
            Self::None => Vec::new(),
            Self::Batch(cmds) => cmds.into_iter().flat_map(Self::into_vec).collect(),
            other => vec![other],
        }
    }

    /// Map the message type using a function.
    pub fn map<N, F>(self, f: F) -> Command<N>
    where
        F: Fn(M) -> N + Send + Sync + 'static,
        M: Send + 'static,
        N: Send + 'static,
    {
        let f: Arc<dyn Fn(M) -> N + Send + Sync> = Arc::new(f);
        self.map_inner(&f)
    }

    fn map_inner<N>(self, f: &Arc<dyn Fn(M) -> N + Send + Sync>) -> Command<N>
    where
        M: Send + 'static,
        N: Send + 'static,
    {
        match self {
            Self::None => Command::None,
            Self::Batch(cmds) => Command::Batch(cmds.into_iter().map(|c| c.map_inner(f)).collect()),
            Self::Task(fut) => {
                let f = f.clone();
                Command::Task(Box::pin(async move { f(fut.await) }))
            }
            Self::Persist(props) => Command::Persist(props),
            Self::Render => Command::Render,
        }
    }
}

/// Type alias for state change subscribers.
type Subscriber<S> = Box<dyn Fn(&S) + Send + Sync>;

/// Store owns a state value, applies messages to it and notifies subscribers.
pub struct Store<S: State> {
    state: S,
    dispatch_count: u64,
    subscribers: Vec<Subscriber<S>>,
}

impl<S: State + Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: State> Store<S> {
    /// Create a new store with initial state.
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            dispatch_count: 0,
            subscribers: Vec::new(),
        }
    }

    /// Get current state.
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Number of messages dispatched so far.
    pub const fn dispatch_count(&self) -> u64 {
        self.dispatch_count
    }

    /// Dispatch a message to update state.
    pub fn dispatch(&mut self, msg: S::Message) -> Command<S::Message> {
        let cmd = self.state.update(msg);
        self.dispatch_count += 1;
        self.notify_subscribers();
        cmd
    }

    /// Subscribe to state changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify_subscribers(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.state);
        }
    }
}

//! Single slot configuration handoff between the configuration sources and the animation loop.
//!
//! Both sides never block: a deposit into the occupied slot is rejected immediately and taking
//! from the empty slot returns nothing.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TryRecvError, TrySendError};

use displaydoc::Display;

use crate::Configuration;

/// Creates a new empty mailbox and returns its depositing and taking halves.
///
/// The sending half can be cloned and shared between any number of configuration sources,
/// the receiving half belongs to the animation loop.
pub fn mailbox() -> (ConfigSender, ConfigReceiver) {
    let (inner_tx, inner_rx) = sync_channel(1);
    (
        ConfigSender { inner: inner_tx },
        ConfigReceiver { inner: inner_rx },
    )
}

/// The reason why the configuration has not been deposited.
///
/// The rejected configuration is given back to the caller.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DepositError {
    /// The mailbox already holds a pending configuration.
    Full(Configuration),
    /// The animation loop no longer receives configurations.
    Closed(Configuration),
}

impl DepositError {
    /// Returns the rejected configuration.
    pub fn into_inner(self) -> Configuration {
        match self {
            Self::Full(config) | Self::Closed(config) => config,
        }
    }
}

impl std::error::Error for DepositError {}

/// Depositing half of the mailbox.
#[derive(Debug, Clone)]
pub struct ConfigSender {
    inner: SyncSender<Configuration>,
}

impl ConfigSender {
    /// Places the configuration into the mailbox slot unless it is already occupied.
    pub fn deposit(&self, config: Configuration) -> Result<(), DepositError> {
        self.inner.try_send(config).map_err(|err| match err {
            TrySendError::Full(config) => DepositError::Full(config),
            TrySendError::Disconnected(config) => DepositError::Closed(config),
        })
    }
}

/// Taking half of the mailbox.
#[derive(Debug)]
pub struct ConfigReceiver {
    inner: Receiver<Configuration>,
}

impl ConfigReceiver {
    /// Removes and returns the pending configuration, if any.
    pub fn try_take(&self) -> Option<Configuration> {
        match self.inner.try_recv() {
            Ok(config) => Some(config),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

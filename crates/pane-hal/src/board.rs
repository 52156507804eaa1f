//! Board selection
//!
//! A [`Board`] knows how to build the [`Configuration`] for one device.
//! Boards are registered by name and one is picked at boot.

use std::fmt;
use std::sync::Arc;

use crate::configuration::Configuration;
use crate::error::HalError;

const TAG: &str = "hal";

/// A supported device.
pub trait Board: Send + Sync {
    /// Unique board name, matched by [`BoardRegistry::resolve`]
    fn name(&self) -> &str;

    /// Build this board's driver table.
    fn configuration(&self) -> Configuration;
}

/// Boards known to the firmware image.
#[derive(Default)]
pub struct BoardRegistry {
    boards: Vec<Arc<dyn Board>>,
}

impl BoardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a board. Names must be unique.
    pub fn register(&mut self, board: Arc<dyn Board>) -> Result<(), HalError> {
        if self.boards.iter().any(|b| b.name() == board.name()) {
            log::warn!(target: TAG, "board {} registered twice", board.name());
            return Err(HalError::DuplicateBoard(board.name().to_string()));
        }
        self.boards.push(board);
        Ok(())
    }

    /// Find the board called `name`.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Board>, HalError> {
        match self.boards.iter().find(|b| b.name() == name) {
            Some(board) => Ok(Arc::clone(board)),
            None => {
                log::warn!(target: TAG, "board {} not found", name);
                Err(HalError::UnknownBoard(name.to_string()))
            }
        }
    }

    /// Registered board names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.boards.iter().map(|b| b.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

impl fmt::Debug for BoardRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardRegistry")
            .field("boards", &self.names())
            .finish()
    }
}

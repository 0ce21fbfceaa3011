//! Board module - Groups, cards and the connections between them

mod model;
mod state;

pub use model::{Card, CardId, Column, Connection, ConnectionId, Group, GroupId, Selection};
pub use state::{Board, BoardAction, BoardError, Outcome};

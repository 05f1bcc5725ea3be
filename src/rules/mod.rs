//! Rules helpers shared by the search: enumerating candidate and legal
//! actions for a seat. Legality itself lives on
//! [`Action::is_legal`](crate::games::hanabi::Action::is_legal).

pub mod engine;

pub use engine::{all_actions, legal_actions, MAX_HAND_SLOTS};

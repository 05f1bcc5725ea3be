//! Seat identification and per-seat data storage.
//!
//! ## PlayerId
//!
//! Type-safe seat index. Hanabi seats 2-5 players, but the type itself
//! only assumes the seat fits in a `u8`.
//!
//! ## Relative offsets
//!
//! Many representations are framed relative to the acting seat so the
//! same encoding works regardless of where the agent sits. The offset of
//! `target` as seen from `self` is `(target - self) mod player_count`.
//!
//! ## PlayerMap
//!
//! Per-seat storage backed by `Vec` for O(1) access, indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat identifier. Seats are 0-based: the first seat is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats for a game with `player_count` players.
    ///
    /// ```
    /// use hanabi_mcts::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// The seat that acts after this one.
    #[must_use]
    pub fn next(self, player_count: usize) -> PlayerId {
        self.at_offset(1, player_count)
    }

    /// The seat that acted before this one.
    #[must_use]
    pub fn previous(self, player_count: usize) -> PlayerId {
        self.at_offset(player_count - 1, player_count)
    }

    /// Relative offset of `target` as seen from this seat.
    ///
    /// ```
    /// use hanabi_mcts::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(3).offset_to(PlayerId::new(1), 4), 2);
    /// assert_eq!(PlayerId::new(1).offset_to(PlayerId::new(1), 4), 0);
    /// ```
    #[must_use]
    pub fn offset_to(self, target: PlayerId, player_count: usize) -> usize {
        (target.index() + player_count - self.index()) % player_count
    }

    /// The seat at `offset` places after this one.
    #[must_use]
    pub fn at_offset(self, offset: usize, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + offset) % player_count) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Get the number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p0), "Player 0");
    }

    #[test]
    fn test_next_and_previous_wrap() {
        assert_eq!(PlayerId::new(2).next(3), PlayerId::new(0));
        assert_eq!(PlayerId::new(0).previous(3), PlayerId::new(2));
        assert_eq!(PlayerId::new(1).previous(2), PlayerId::new(0));
    }

    #[test]
    fn test_offset_roundtrip() {
        for player_count in 2..=5 {
            for from in PlayerId::all(player_count) {
                for to in PlayerId::all(player_count) {
                    let offset = from.offset_to(to, player_count);
                    assert!(offset < player_count);
                    assert_eq!(from.at_offset(offset, player_count), to);
                }
            }
        }
    }

    #[test]
    fn test_player_map_indexing() {
        let mut map: PlayerMap<i32> = PlayerMap::new(3, |p| p.index() as i32 * 10);
        assert_eq!(map[PlayerId::new(2)], 20);

        map[PlayerId::new(1)] = 7;
        assert_eq!(map[PlayerId::new(1)], 7);
        assert_eq!(map.player_count(), 3);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(2, |_| 4);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::new(0, |_| 0);
    }
}

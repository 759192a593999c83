pub const MIN_PLAYERS: usize = 3;
pub const MAX_SPIES: usize = 4;

/// Number of spies for a table of `total_players`.
///
/// 1 up to 4 players, 2 up to 8, 3 up to 10, then a third of the table capped
/// at [`MAX_SPIES`].
pub fn spy_count(total_players: usize) -> usize {
    match total_players {
        0..=4 => 1,
        5..=8 => 2,
        9..=10 => 3,
        n => MAX_SPIES.min(n / 3),
    }
}

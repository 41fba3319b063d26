// Snake draft order preview.
//
// Pure function over two name lists. It never reads or mutates the draft
// engine; the board's live turn order is managed separately.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a draft order could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnakeError {
    #[error("Enter player names before previewing the draft order.")]
    MissingPlayers,
    #[error("Enter coach names before previewing the draft order.")]
    MissingCoaches,
}

/// One pick in a generated snake order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickSlot {
    /// 1-based overall pick number.
    pub pick_number: usize,
    /// 1-based round number.
    pub round: usize,
    pub coach: String,
    pub player: String,
}

impl fmt::Display for PickSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pick {}: {} selects {}",
            self.pick_number, self.coach, self.player
        )
    }
}

/// Generate the full snake draft order for `players` picked by `coaches`.
///
/// Pick `k` (0-based) falls in round `k / C` at position `k % C`. Even rounds
/// run through the coaches front to back, odd rounds back to front.
///
/// Either list being empty is reported as an error rather than an empty
/// order, so callers can tell "nothing to draft" from "misconfigured".
pub fn snake_order<P, C>(players: &[P], coaches: &[C]) -> Result<Vec<PickSlot>, SnakeError>
where
    P: AsRef<str>,
    C: AsRef<str>,
{
    if players.is_empty() {
        return Err(SnakeError::MissingPlayers);
    }
    if coaches.is_empty() {
        return Err(SnakeError::MissingCoaches);
    }

    let num_coaches = coaches.len();
    let order = players
        .iter()
        .enumerate()
        .map(|(k, player)| {
            let round = k / num_coaches;
            let position = k % num_coaches;
            let coach_idx = if round % 2 == 0 {
                position
            } else {
                num_coaches - 1 - position
            };
            PickSlot {
                pick_number: k + 1,
                round: round + 1,
                coach: coaches[coach_idx].as_ref().to_string(),
                player: player.as_ref().to_string(),
            }
        })
        .collect();

    Ok(order)
}

//! JSON save/restore of a game together with its undo history.

use crate::*;

pub fn to_json(game: &GameState) -> core::result::Result<String, SaveError> {
    Ok(serde_json::to_string(game)?)
}

pub fn from_json(json: &str) -> core::result::Result<GameState, SaveError> {
    let game: GameState = serde_json::from_str(json)?;
    game.validate()?;
    log::debug!(
        "Loaded game {:?} with {} history entries",
        game.config(),
        game.history().len()
    );
    Ok(game)
}

use super::GameState;

/// Check the invariants that hold for any game state the simulation can
/// produce.
pub fn assert_valid_game_state(game_state: &GameState) {
    assert_eq!(game_state.num_players, game_state.pools.len());
    assert_eq!(game_state.num_players, game_state.scores().len());

    // Nobody ever gains or loses dice.
    for pool in &game_state.pools {
        assert_eq!(game_state.hand_size, pool.len());
    }

    assert!(game_state.round_idx <= game_state.max_rounds);
    assert!(game_state.to_act_idx < game_state.num_players);
    assert!(game_state.opening_idx < game_state.num_players);

    // Every bid beats the one before it.
    let exchange = game_state.ledger.wild_exchange();
    for pair in game_state.ledger.entries().windows(2) {
        assert!(
            pair[1].bid.outranks(&pair[0].bid, exchange),
            "{} does not outrank {}",
            pair[1].bid,
            pair[0].bid
        );
    }
}

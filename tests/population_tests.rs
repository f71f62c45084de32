//! Population integration tests.
//!
//! These tests check the kind distribution of populated tokens over many
//! draws and how population fills the board.

use gem_lines::core::{GameConfig, GameRng, KindWeights};
use gem_lines::grid::TokenKind;
use gem_lines::session::{token_for_turn, BoardSession};
use rustc_hash::FxHashMap;

const DRAWS: u32 = 100_000;

fn tally(weights: KindWeights, seed: u64) -> FxHashMap<TokenKind, u32> {
    let mut rng = GameRng::new(seed);
    let mut counts = FxHashMap::default();
    for _ in 0..DRAWS {
        *counts.entry(weights.pick(&mut rng)).or_insert(0) += 1;
    }
    counts
}

fn share(counts: &FxHashMap<TokenKind, u32>, kinds: &[TokenKind]) -> f64 {
    let n: u32 = kinds.iter().map(|k| counts.get(k).copied().unwrap_or(0)).sum();
    f64::from(n) / f64::from(DRAWS)
}

// =============================================================================
// Weighted Draws
// =============================================================================

/// Test that default weights produce the expected kind shares.
#[test]
fn test_default_weight_shares() {
    let counts = tally(KindWeights::default(), 1234);
    let cases: [(&[TokenKind], f64); 5] = [
        (&[TokenKind::Normal], 0.73),
        (&[TokenKind::Ghost], 0.10),
        (&[TokenKind::Wild], 0.10),
        (
            &[TokenKind::CleanerHorizontal, TokenKind::CleanerVertical],
            0.05,
        ),
        (&[TokenKind::Block], 0.02),
    ];
    for (kinds, expected) in cases {
        let actual = share(&counts, kinds);
        assert!(
            (actual - expected).abs() < 0.01,
            "{kinds:?}: expected {expected}, got {actual}"
        );
    }
}

/// Test that cleaners split evenly between the two orientations.
#[test]
fn test_cleaner_orientation_is_even() {
    let weights = KindWeights {
        normal: 0,
        ghost: 0,
        wild: 0,
        cleaner: 1,
        block: 0,
    };
    let counts = tally(weights, 99);
    let horizontal = share(&counts, &[TokenKind::CleanerHorizontal]);
    assert!((horizontal - 0.5).abs() < 0.01, "horizontal share {horizontal}");
    assert_eq!(
        counts.get(&TokenKind::CleanerVertical).copied().unwrap_or(0)
            + counts.get(&TokenKind::CleanerHorizontal).copied().unwrap_or(0),
        DRAWS
    );
}

/// Test that zero weights always give normal tokens.
#[test]
fn test_zero_weights_give_normal() {
    let weights = KindWeights {
        normal: 0,
        ghost: 0,
        wild: 0,
        cleaner: 0,
        block: 0,
    };
    let counts = tally(weights, 5);
    assert_eq!(counts.get(&TokenKind::Normal).copied(), Some(DRAWS));
}

// =============================================================================
// Turn Rules
// =============================================================================

/// Test that the opening turns only populate normal tokens with palette
/// colors.
#[test]
fn test_opening_turns_are_normal() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(8);
    for turn in 0..=config.normal_only_turns {
        for _ in 0..1000 {
            let token = token_for_turn(&config, turn, &mut rng);
            assert_eq!(token.kind(), TokenKind::Normal);
            assert!(token.color().unwrap() < config.color_count);
        }
    }
}

/// Test that later turns produce special kinds.
#[test]
fn test_later_turns_use_weights() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(8);
    let turn = config.normal_only_turns + 1;
    let special = (0..1000)
        .map(|_| token_for_turn(&config, turn, &mut rng))
        .filter(|t| t.kind() != TokenKind::Normal)
        .count();
    assert!(special > 0);
}

// =============================================================================
// Board Filling
// =============================================================================

/// Test that populating past capacity fills every cell and reports it.
#[test]
fn test_populate_until_full() {
    let mut session = BoardSession::new(GameConfig::default().with_seed(77));
    let first = session.populate(80, 1);
    assert_eq!(first.placed.len(), 80);
    assert!(!first.board_full);

    let second = session.populate(3, 2);
    assert_eq!(second.placed.len(), 1);
    assert!(second.board_full);
    assert_eq!(session.empty_count(), 0);
    assert_eq!(session.previews().len(), 81);
}

/// Test that the same seed populates the same board.
#[test]
fn test_population_is_deterministic() {
    let config = GameConfig::default().with_seed(4242);
    let mut a = BoardSession::new(config.clone());
    let mut b = BoardSession::new(config);
    for turn in 0..10 {
        assert_eq!(a.populate(3, turn), b.populate(3, turn));
    }
    assert_eq!(a.grid(), b.grid());
}

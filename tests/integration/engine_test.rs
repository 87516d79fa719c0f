//! End-to-end parlay generation tests

use parlay_edge::config::ConfigError;
use parlay_edge::edge::ScoredLeg;
use parlay_edge::market::{Market, MarketLeg, OverUnder, StaticLegCatalog, ThreeWay, YesNo};
use parlay_edge::parlay::{
    generate_from_legs, rank_order, EngineError, GenerationConfig, GenerationOptions,
    InsufficientData, ParlayEngine, ParlayMode, ParlayType,
};
use parlay_edge::risk::{compute_betting_intelligence, KellyOptions};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cmp::Ordering;
use std::collections::HashSet;

fn over(line: Decimal) -> Market {
    Market::Totals {
        side: OverUnder::Over,
        line,
    }
}

fn home(match_id: &str, prob: Decimal, odds: Decimal) -> MarketLeg {
    MarketLeg::new(match_id, Market::MatchResult(ThreeWay::Home), prob, odds)
}

/// Ten matches with a spread of prices, some legs below the edge floor
fn synthetic_catalog() -> Vec<MarketLeg> {
    (0..10i64)
        .flat_map(|i| {
            let id = format!("M{i:02}");
            let step = Decimal::new(i, 2);
            vec![
                home(&id, dec!(0.45) + step, dec!(2.10)),
                MarketLeg::new(
                    id.as_str(),
                    Market::MatchResult(ThreeWay::Draw),
                    dec!(0.25),
                    dec!(3.40) + step,
                ),
                MarketLeg::new(id.as_str(), over(dec!(2.5)), dec!(0.50) + step / dec!(2), dec!(1.95)),
                MarketLeg::new(
                    id.as_str(),
                    Market::BothTeamsToScore(YesNo::Yes),
                    dec!(0.62) - step,
                    dec!(1.70),
                ),
            ]
        })
        .collect()
}

fn permissive() -> GenerationConfig {
    GenerationConfig {
        min_parlay_edge: dec!(0),
        min_combined_prob: dec!(0),
        max_results: 500,
        ..Default::default()
    }
}

#[test]
fn test_leg_edge_is_probability_minus_implied() {
    let leg = ScoredLeg::score(home("M1", dec!(0.55), dec!(2.00))).unwrap();
    assert_eq!(leg.edge, dec!(0.05));

    for leg in synthetic_catalog() {
        if let Ok(scored) = ScoredLeg::score(leg.clone()) {
            assert_eq!(scored.edge, leg.consensus_prob - Decimal::ONE / leg.decimal_odds);
        }
    }
}

#[test]
fn test_two_leg_single_game_penalty() {
    let config = GenerationConfig {
        parlay_type: ParlayMode::SingleGame,
        ..permissive()
    };
    let report = generate_from_legs(
        vec![
            home("M1", dec!(0.55), dec!(2.00)),
            MarketLeg::new("M1", over(dec!(2.5)), dec!(0.54), dec!(2.00)),
        ],
        &config,
    );

    assert_eq!(report.combinations.len(), 1);
    let combo = &report.combinations[0];
    assert_eq!(combo.combined_prob, dec!(0.55) * dec!(0.54));
    assert_eq!(combo.correlation_penalty, dec!(0.90));
    assert_eq!(combo.adjusted_prob, combo.combined_prob * dec!(0.90));
}

#[test]
fn test_parlay_edge_floor() {
    let legs = vec![
        home("M1", dec!(0.60), dec!(2.00)),
        MarketLeg::new("M1", over(dec!(2.5)), dec!(0.50), dec!(2.00)),
    ];
    let config = GenerationConfig {
        min_leg_edge: dec!(0),
        parlay_type: ParlayMode::SingleGame,
        ..permissive()
    };

    // 0.60 * 0.50 * 0.90 * 4.00 - 1 = 0.08
    let report = generate_from_legs(legs.clone(), &config);
    assert_eq!(report.combinations.len(), 1);
    assert_eq!(report.combinations[0].parlay_edge, dec!(0.08));

    let strict = GenerationConfig {
        min_parlay_edge: dec!(0.10),
        ..config
    };
    assert!(generate_from_legs(legs, &strict).combinations.is_empty());
}

#[test]
fn test_half_kelly_fifty_dollar_stake() {
    let options = KellyOptions {
        kelly_fraction: Some(dec!(0.5)),
        max_stake_pct: Some(dec!(0.05)),
        ..Default::default()
    };
    let result =
        compute_betting_intelligence(&home("M1", dec!(0.55), dec!(2.00)), dec!(1000), &options)
            .unwrap();
    let stake = result.stake().unwrap();

    assert_eq!(stake.full_kelly, dec!(0.10));
    assert_eq!(stake.fractional_kelly, dec!(0.05));
    assert_eq!(stake.recommended_stake_pct, dec!(0.05));
    assert_eq!(stake.bankroll_stake, dec!(50));
}

#[test]
fn test_match_with_one_eligible_leg() {
    let config = GenerationConfig {
        parlay_type: ParlayMode::SingleGame,
        ..permissive()
    };
    let report = generate_from_legs(
        vec![
            home("M1", dec!(0.55), dec!(2.00)),
            // Negative edge, filtered before the search
            MarketLeg::new("M1", over(dec!(2.5)), dec!(0.40), dec!(2.00)),
        ],
        &config,
    );

    assert!(report.combinations.is_empty());
    assert_eq!(report.legs_skipped, 1);
    assert!(report.insufficient.contains(&InsufficientData::TooFewLegs {
        match_id: "M1".into(),
        eligible: 1,
    }));
}

#[test]
fn test_output_invariants_hold() {
    let config = permissive();
    let report = generate_from_legs(synthetic_catalog(), &config);
    assert!(!report.combinations.is_empty());
    assert!(report.combinations.len() <= config.max_results);

    let mut keys = HashSet::new();
    for combo in &report.combinations {
        assert_eq!(combo.leg_count, combo.legs.len());
        assert!(combo.leg_count >= 2 && combo.leg_count <= config.max_leg_count);
        assert_eq!(combo.adjusted_prob, combo.combined_prob * combo.correlation_penalty);
        assert_eq!(
            combo.parlay_edge,
            combo.adjusted_prob * combo.combined_odds - Decimal::ONE
        );
        assert_eq!(combo.is_multi_game, combo.match_ids.len() > 1);

        match combo.parlay_type {
            ParlayType::SingleGame => assert_eq!(combo.match_ids.len(), 1),
            ParlayType::MultiGame => assert_eq!(combo.match_ids.len(), combo.leg_count),
        }

        let pairs: HashSet<_> = combo
            .legs
            .iter()
            .map(|l| (l.match_id().clone(), l.leg.market_type()))
            .collect();
        assert_eq!(pairs.len(), combo.leg_count);

        assert!(combo.legs.iter().all(|l| l.edge >= config.min_leg_edge));
        assert!(keys.insert(combo.dedup_key()), "duplicate leg set in output");
    }

    for pair in report.combinations.windows(2) {
        assert_ne!(rank_order(&pair[0], &pair[1]), Ordering::Greater);
    }
}

#[test]
fn test_generation_is_deterministic() {
    let config = permissive();
    let first = generate_from_legs(synthetic_catalog(), &config);
    let second = generate_from_legs(synthetic_catalog(), &config);

    let mut reversed = synthetic_catalog();
    reversed.reverse();
    let third = generate_from_legs(reversed, &config);

    assert_eq!(first.combinations, second.combinations);
    assert_eq!(first.combinations, third.combinations);
}

#[tokio::test]
async fn test_work_cap_truncates_without_error() {
    let engine = ParlayEngine::new(StaticLegCatalog::new(synthetic_catalog()));
    let options = GenerationOptions {
        max_combinations: Some(5),
        min_parlay_edge: Some(dec!(0)),
        ..Default::default()
    };

    let report = engine.generate_report(&options).await.unwrap();
    assert!(report.truncated);
    // Budget applies per mode
    assert!(report.candidates_evaluated <= 10);
}

#[tokio::test]
async fn test_invalid_config_is_surfaced() {
    let engine = ParlayEngine::new(StaticLegCatalog::new(synthetic_catalog()));

    let options = GenerationOptions {
        single_game_penalty: Some(dec!(1.5)),
        ..Default::default()
    };
    let err = engine.generate_best_parlays(&options).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Config(ConfigError::PenaltyOutOfRange { .. })
    ));
}

#[tokio::test]
async fn test_thin_catalog_is_empty_not_error() {
    let engine = ParlayEngine::new(StaticLegCatalog::new(vec![home("M1", dec!(0.55), dec!(2.00))]));
    let parlays = engine
        .generate_best_parlays(&GenerationOptions::default())
        .await
        .unwrap();
    assert!(parlays.is_empty());
}

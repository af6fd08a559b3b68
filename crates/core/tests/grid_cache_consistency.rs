//! Derived view consistency for the hex record store
//!
//! Every view the grid hands out (burning, path, town, occupied count) must
//! match a linear scan of the records after any sequence of mutations.

use hexfire_core::{
    FireType, GameConfig, HexCoord, HexGrid, HexPatch, OccupantKind, PathColor, PathSpec,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn as_set(hexes: &[HexCoord]) -> FxHashSet<HexCoord> {
    hexes.iter().copied().collect()
}

/// Compare every view against a full scan of `get_all()`
fn assert_views_match_scan(grid: &HexGrid) {
    let all = grid.get_all();

    let burning: FxHashSet<_> = all.iter().filter(|r| r.is_burning()).map(|r| r.coord()).collect();
    let path: FxHashSet<_> = all.iter().filter(|r| r.is_path()).map(|r| r.coord()).collect();
    let town: FxHashSet<_> = all.iter().filter(|r| r.is_town()).map(|r| r.coord()).collect();
    let occupied = all.iter().filter(|r| r.is_occupied()).count();

    assert_eq!(as_set(grid.get_burning()), burning);
    assert_eq!(grid.get_burning().len(), burning.len(), "burning view has duplicates");
    assert_eq!(as_set(grid.get_path()), path);
    assert_eq!(grid.get_path().len(), path.len(), "path view has duplicates");
    assert_eq!(as_set(grid.get_town_hexes()), town);
    assert_eq!(grid.get_town_hexes().len(), town.len(), "town view has duplicates");

    let stats = grid.get_stats();
    assert_eq!(stats.total_hexes, all.len());
    assert_eq!(stats.burning_hexes, burning.len());
    assert_eq!(stats.path_hexes, path.len());
    assert_eq!(stats.occupied_hexes, occupied);
    assert_eq!(stats.town_hexes, town.len());
}

fn random_patch(rng: &mut StdRng) -> HexPatch {
    let mut patch = HexPatch::new();
    if rng.random_bool(0.4) {
        let fire = if rng.random_bool(0.5) {
            Some(FireType::ALL[rng.random_range(0..FireType::ALL.len())])
        } else {
            None
        };
        patch = patch.fire_type(fire).max_extinguish_time(20.0).extinguish_progress(rng.random_range(-5.0..30.0));
    }
    if rng.random_bool(0.3) {
        patch = patch.path(rng.random_bool(0.5));
    }
    if rng.random_bool(0.1) {
        patch = patch.town(rng.random_bool(0.5));
    }
    if rng.random_bool(0.2) {
        let kind = OccupantKind::ALL[rng.random_range(0..OccupantKind::ALL.len())];
        let id = rng.random_bool(0.5).then(|| rng.random_range(1..100));
        patch = patch.occupant(kind, id);
    }
    if rng.random_bool(0.2) {
        patch = patch.burn_duration(rng.random_range(0.0..50.0));
    }
    patch
}

#[test]
fn test_default_map_scenario() {
    let config = GameConfig::default();
    assert_eq!(config.map_size, 26);
    let grid = HexGrid::new(&config).unwrap();

    let mut swept = 0;
    for q in -60..=60 {
        for r in -60..=60 {
            if HexCoord::new(q, r).in_bounds(config.map_size) {
                swept += 1;
            }
        }
    }
    assert_eq!(grid.get_all().len(), swept);
    assert_eq!(swept, 2107);

    let mut expected_town: FxHashSet<HexCoord> = HexCoord::ORIGIN.neighbors().into_iter().collect();
    expected_town.insert(HexCoord::ORIGIN);
    let town: FxHashSet<HexCoord> = grid
        .get_all()
        .iter()
        .filter(|r| r.is_town())
        .map(|r| r.coord())
        .collect();
    assert_eq!(town, expected_town);
    assert_views_match_scan(&grid);
}

#[test]
fn test_random_mutation_sequences_keep_views_consistent() {
    let config = GameConfig {
        map_size: 8,
        ..GameConfig::default()
    };

    for seed in 0..8 {
        let mut grid = HexGrid::new(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut last_version = grid.structure_version();

        for _ in 0..600 {
            // Occasionally aim just off the map to exercise the no-op path
            let hex = HexCoord::new(rng.random_range(-9..=9), rng.random_range(-9..=9));
            let patch = random_patch(&mut rng);
            grid.mutate(hex, patch);

            let version = grid.structure_version();
            assert!(version >= last_version, "structure version went backwards");
            last_version = version;

            if let Some(record) = grid.get(hex) {
                assert!(record.extinguish_progress() >= 0.0);
                assert!(record.extinguish_progress() <= record.max_extinguish_time());
                assert_eq!(record.fire_type().is_some(), record.is_burning());
            }
        }
        assert_views_match_scan(&grid);
    }
}

#[test]
fn test_views_match_after_every_single_mutation() {
    let config = GameConfig {
        map_size: 3,
        ..GameConfig::default()
    };
    let mut grid = HexGrid::new(&config).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..300 {
        let hex = HexCoord::new(rng.random_range(-3..=3), rng.random_range(-3..=3));
        grid.mutate(hex, random_patch(&mut rng));
        assert_views_match_scan(&grid);
    }
}

#[test]
fn test_empty_patch_is_invisible() {
    let config = GameConfig::default();
    let mut grid = HexGrid::new(&config).unwrap();
    grid.mutate(HexCoord::new(4, 4), HexPatch::new().fire_type(Some(FireType::Blaze)));
    grid.mutate(HexCoord::new(-4, 2), HexPatch::new().path(true));

    let version = grid.structure_version();
    let burning = grid.get_burning().to_vec();
    let path = grid.get_path().to_vec();
    for hex in [HexCoord::new(4, 4), HexCoord::new(-4, 2), HexCoord::ORIGIN, HexCoord::new(99, 0)] {
        grid.mutate(hex, HexPatch::new());
    }
    assert_eq!(grid.structure_version(), version);
    assert_eq!(grid.get_burning(), burning.as_slice());
    assert_eq!(grid.get_path(), path.as_slice());
}

#[test]
fn test_set_path_hexes_property() {
    let config = GameConfig {
        map_size: 10,
        ..GameConfig::default()
    };
    let mut grid = HexGrid::new(&config).unwrap();
    let blue = PathColor::new(0, 0, 255);

    // Two paths converging on the town from east and west
    let east: Vec<HexCoord> = (0..=10).rev().map(|q| HexCoord::new(q, 0)).collect();
    let west: Vec<HexCoord> = (-10..=0).map(|q| HexCoord::new(q, 0)).collect();
    let paths = [PathSpec::new(east.clone(), Some(blue)), PathSpec::new(west.clone(), None)];
    grid.set_path_hexes(&paths);

    let expected: FxHashSet<HexCoord> = east
        .iter()
        .chain(&west)
        .copied()
        .filter(|hex| !grid.get(*hex).unwrap().is_town())
        .collect();
    assert_eq!(as_set(grid.get_path()), expected);
    assert_eq!(expected.len(), 18);

    for hex in &east[..9] {
        assert_eq!(grid.get(*hex).unwrap().path_color(), Some(blue));
    }
    assert_eq!(
        grid.get(HexCoord::new(-5, 0)).unwrap().path_color(),
        Some(config.default_path_color)
    );
    assert_views_match_scan(&grid);

    grid.set_path_hexes(&[]);
    assert!(grid.get_path().is_empty());
    assert!(grid.get_all().iter().all(|r| !r.is_path() && r.path_color().is_none()));
    assert_views_match_scan(&grid);
}

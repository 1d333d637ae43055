use snail_run_core::{ChunkBlueprint, ChunkId, Command, Event, GenerationRequest, GenerationTuning};
use snail_run_system_chunk_generation::{ChunkGenerator, Config};
use snail_run_world::{self as world, query, World};

const GROUND_Y: f32 = 360.0;

fn generator(seed: u64) -> ChunkGenerator {
    ChunkGenerator::new(Config::new(seed, GenerationTuning::default(), GROUND_Y))
        .expect("default tuning is valid")
}

fn blueprints(commands: &[Command]) -> Vec<&ChunkBlueprint> {
    commands
        .iter()
        .map(|command| match command {
            Command::AppendChunk { blueprint } => blueprint,
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect()
}

#[test]
fn chunks_respect_layout_invariants_across_seeds() {
    for seed in 0..64 {
        let mut commands = Vec::new();
        generator(seed).generate(500.0, 24, &mut commands);
        let chunks = blueprints(&commands);
        assert_eq!(chunks.len(), 24);
        assert!((chunks[0].platform.x - 500.0).abs() < f32::EPSILON);

        for pair in chunks.windows(2) {
            let gap = pair[1].platform.x - pair[0].platform.right();
            assert!((40.0 - 1e-3..120.0).contains(&gap), "seed {seed}: gap {gap}");
        }

        for chunk in &chunks {
            let platform = chunk.platform;
            assert!((180.0..320.0).contains(&platform.width));
            assert!((platform.height - 18.0).abs() < f32::EPSILON);
            assert!(platform.y == GROUND_Y || platform.y == GROUND_Y - 80.0);

            assert!((2..=4).contains(&chunk.coins.len()));
            for (index, coin) in chunk.coins.iter().enumerate() {
                let expected_x = platform.x + 24.0 + index as f32 * 32.0;
                assert!((coin.x - expected_x).abs() < 1e-3);
                assert!((coin.y - (platform.y - 22.0)).abs() < f32::EPSILON);
                assert!((coin.radius - 8.0).abs() < f32::EPSILON);
                assert!(!coin.collected);
            }

            if let Some(enemy) = chunk.enemy {
                assert!(enemy.x >= platform.x + 40.0);
                assert!(enemy.x < platform.right() - 40.0);
                assert!((enemy.y - (platform.y - 18.0)).abs() < f32::EPSILON);
                assert!((enemy.velocity_x.abs() - 40.0).abs() < f32::EPSILON);
                assert!((enemy.width - 34.0).abs() < f32::EPSILON);
                assert!((enemy.height - 24.0).abs() < f32::EPSILON);
            }
        }
    }
}

#[test]
fn both_tiers_and_enemy_presence_vary() {
    let mut commands = Vec::new();
    generator(7).generate(0.0, 200, &mut commands);
    let chunks = blueprints(&commands);

    assert!(chunks.iter().any(|chunk| chunk.platform.y == GROUND_Y));
    assert!(chunks.iter().any(|chunk| chunk.platform.y == GROUND_Y - 80.0));
    assert!(chunks.iter().any(|chunk| chunk.enemy.is_some()));
    assert!(chunks.iter().any(|chunk| chunk.enemy.is_none()));
    let enemies = chunks.iter().filter_map(|chunk| chunk.enemy);
    let (left, right): (Vec<_>, Vec<_>) = enemies.partition(|enemy| enemy.velocity_x < 0.0);
    assert!(!left.is_empty() && !right.is_empty());
}

#[test]
fn identical_seeds_produce_identical_terrain() {
    let mut first = Vec::new();
    let mut second = Vec::new();
    generator(0xdead_beef).generate(0.0, 48, &mut first);
    generator(0xdead_beef).generate(0.0, 48, &mut second);
    assert_eq!(first, second);

    let mut other = Vec::new();
    generator(0xdead_bef0).generate(0.0, 48, &mut other);
    assert_ne!(first, other);
}

#[test]
fn requests_continue_the_random_stream() {
    let mut split = generator(11);
    let mut commands = Vec::new();
    split.generate(0.0, 4, &mut commands);
    split.generate_request(
        GenerationRequest {
            start_x: 10_000.0,
            chunk_count: 4,
        },
        &mut commands,
    );

    let chunks = blueprints(&commands);
    assert_eq!(chunks.len(), 8);
    assert!((chunks[4].platform.x - 10_000.0).abs() < f32::EPSILON);
}

#[test]
fn applied_chunks_receive_sequential_identifiers() {
    let mut world = World::new();
    let mut commands = Vec::new();
    generator(3).generate(0.0, 5, &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let appended: Vec<ChunkId> = events
        .iter()
        .filter_map(|event| match event {
            Event::ChunkAppended { chunk, .. } => Some(*chunk),
            _ => None,
        })
        .collect();
    assert_eq!(appended, (0..5).map(ChunkId::new).collect::<Vec<_>>());
    assert_eq!(query::chunk_count(&world), 5);

    let last = query::chunks(&world).last().expect("chunks stored");
    assert!((query::frontier(&world).farthest_edge - last.platform.right()).abs() < f32::EPSILON);
}

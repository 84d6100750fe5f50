use voxfarm_core::{scoped_rng, SimTick};
use voxfarm_testkit::{EventRecord, JsonlSink};
use voxfarm_world::{BlockKind, RulesConfig, World, RNG_DOMAIN_RULES};

#[test]
fn deterministic_event_stream_can_be_written() {
    let path = std::env::temp_dir().join("voxfarm_smoke_eventlog.jsonl");
    let mut sink = JsonlSink::create(&path).expect("can create temp log");
    let world = World::flat_island(8, 8, 1, RulesConfig::default());
    let census = world.block_census();
    let payload = format!("grass={}", census[&BlockKind::Grass]);
    sink.write(&EventRecord {
        tick: SimTick::ZERO.advance(1),
        kind: "SmokeTest",
        payload: &payload,
    })
    .expect("can write event");

    let contents = std::fs::read_to_string(&path).expect("log readable");
    assert!(contents.contains("\"grass=63\""));
}

#[test]
fn rng_domains_are_independent() {
    use rand::Rng;
    let rules: u64 = scoped_rng(5, RNG_DOMAIN_RULES).gen();
    let again: u64 = scoped_rng(5, RNG_DOMAIN_RULES).gen();
    assert_eq!(rules, again);
}

//! Integration test: Spawn -> Subscribe -> Deposit damage -> Apply -> Observe
//!
//! Validates the full flow from InDamage deposit to the events a presentation
//! layer would see.

use attribute_core::prelude::*;
use attribute_core::{config::parse_attribute_defaults, Roster};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

/// Store with crit and lucky disabled so magnitudes are exact
fn plain_store() -> AttributeStore {
    let defaults = parse_attribute_defaults(
        r#"
critical_multiplier = 1.0
lucky_chance = 0.0
"#,
    )
    .unwrap();
    AttributeStore::new(&defaults)
}

/// Record every Armor/Health change, depletion and damage event in order
fn record_events(store: &mut AttributeStore) -> Log {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let events = store.events_mut();

    for kind in [AttributeKind::Armor, AttributeKind::Health] {
        let sink = Arc::clone(&log);
        events.on_attribute_changed(kind, move |old, new| {
            sink.lock().unwrap().push(format!("{kind}Changed {old}->{new}"));
        });
    }

    let sink = Arc::clone(&log);
    events.out_of_armor.subscribe(move |_| sink.lock().unwrap().push("OutOfArmor".into()));
    let sink = Arc::clone(&log);
    events.out_of_health.subscribe(move |_| sink.lock().unwrap().push("OutOfHealth".into()));
    let sink = Arc::clone(&log);
    events.damage_taken.subscribe(move |event| {
        sink.lock()
            .unwrap()
            .push(format!("DamageTaken {}", event.magnitude));
    });

    log
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[test]
fn test_armor_absorbs_before_health() {
    let mut store = plain_store();
    let log = record_events(&mut store);

    store.set(AttributeKind::InDamage, 30.0).unwrap();
    DamageApplier::default()
        .apply(&mut store, &DamageContext::new(), &mut ScriptedRolls::default())
        .unwrap();

    assert_eq!(store.get(AttributeKind::Armor).unwrap(), 0.0);
    assert_eq!(store.get(AttributeKind::Health).unwrap(), 55.0);
    assert_eq!(store.get(AttributeKind::InDamage).unwrap(), 0.0);
    assert_eq!(
        entries(&log),
        vec![
            "ArmorChanged 20->0",
            "OutOfArmor",
            "HealthChanged 65->55",
            "DamageTaken 30",
        ]
    );
}

#[test]
fn test_acid_hit_spares_health() {
    let mut store = plain_store();
    let log = record_events(&mut store);
    let ctx = DamageContext::new().with_source_tag("Damage.Type.Acid");

    let report = DamageApplier::default()
        .apply_damage(&mut store, 10.0, &ctx, &mut ScriptedRolls::default())
        .unwrap();

    assert_eq!(store.get(AttributeKind::Armor).unwrap(), 5.0);
    assert_eq!(store.get(AttributeKind::Health).unwrap(), 65.0);
    assert_eq!(report.armor_absorbed, 15.0);
    assert_eq!(entries(&log), vec!["ArmorChanged 20->5", "DamageTaken 10"]);
}

#[test]
fn test_lethal_hit_event_order() {
    let mut store = plain_store();
    let log = record_events(&mut store);
    let ctx = DamageContext::new().with_source(DamageSource::new("player", "shotgun"));

    let report = DamageApplier::default()
        .apply_damage(&mut store, 500.0, &ctx, &mut ScriptedRolls::default())
        .unwrap();

    assert!(report.armor_depleted);
    assert!(report.is_killing_blow);
    assert_eq!(
        entries(&log),
        vec![
            "ArmorChanged 20->0",
            "OutOfArmor",
            "HealthChanged 65->0",
            "OutOfHealth",
            "DamageTaken 500",
        ]
    );
}

#[test]
fn test_repeated_hits_while_depleted_fire_once() {
    let mut store = plain_store();
    let log = record_events(&mut store);
    let applier = DamageApplier::default();

    for _ in 0..10 {
        applier
            .apply_damage(&mut store, 40.0, &DamageContext::new(), &mut ScriptedRolls::default())
            .unwrap();
    }

    let log = entries(&log);
    assert_eq!(log.iter().filter(|e| *e == "OutOfArmor").count(), 1);
    assert_eq!(log.iter().filter(|e| *e == "OutOfHealth").count(), 1);
    assert_eq!(log.iter().filter(|e| e.starts_with("DamageTaken")).count(), 10);
}

#[test]
fn test_heal_rearms_depletion() {
    let mut store = plain_store();
    let depletions = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&depletions);
    store.events_mut().out_of_health.subscribe(move |event: &DepletionEvent| {
        sink.lock().unwrap().push(event.source.clone());
    });
    let applier = DamageApplier::default();

    let first = DamageContext::new().with_source(DamageSource::instigated_by("wolf"));
    applier
        .apply_damage(&mut store, 200.0, &first, &mut ScriptedRolls::default())
        .unwrap();
    assert_eq!(store.health_latch(), LatchState::Depleted);

    store.modify(AttributeKind::Health, 50.0).unwrap();
    assert_eq!(store.health_latch(), LatchState::Alive);

    let second = DamageContext::new().with_source(DamageSource::instigated_by("bear"));
    applier
        .apply_damage(&mut store, 200.0, &second, &mut ScriptedRolls::default())
        .unwrap();

    let sources: Vec<_> = depletions
        .lock()
        .unwrap()
        .iter()
        .map(|s| s.instigator.clone().unwrap())
        .collect();
    assert_eq!(sources, vec![EntityId::from("wolf"), EntityId::from("bear")]);
}

#[test]
fn test_headshot_with_seeded_rng() {
    let mut store = AttributeStore::new(&AttributeDefaults {
        lucky_chance: 0.0,
        armor: 0.0,
        health_max: 1000.0,
        health: 1000.0,
        ..Default::default()
    });
    let ctx = DamageContext::new().at_location("head");
    let applier = DamageApplier::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for _ in 0..5 {
        let report = applier.apply_damage(&mut store, 10.0, &ctx, &mut rng).unwrap();
        assert!(report.is_critical);
        // Stock critical multiplier is 3
        assert_eq!(report.magnitude, 30.0);
    }
    assert_eq!(store.get(AttributeKind::Health).unwrap(), 850.0);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    fn run(seed: u64) -> Vec<AppliedDamageReport> {
        let mut store = AttributeStore::new(&AttributeDefaults {
            critical_chance: 30.0,
            lucky_chance: 40.0,
            ..Default::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let applier = DamageApplier::default();
        (0..8)
            .map(|_| {
                applier
                    .apply_damage(&mut store, 3.0, &DamageContext::new(), &mut rng)
                    .unwrap()
            })
            .collect()
    }

    assert_eq!(run(11), run(11));
}

#[test]
fn test_roster_handles_subscribed_stores() {
    let mut store = plain_store();
    let log = record_events(&mut store);

    let mut roster = Roster::default();
    roster.insert("dummy", store).unwrap();
    roster
        .deal_damage(
            &EntityId::from("dummy"),
            25.0,
            &DamageContext::new().with_source_tag("Damage.Type.Fire"),
            &mut ScriptedRolls::default(),
        )
        .unwrap();

    // 20 absorbed by armor, remaining 5 scaled by fire to 7.5
    assert_eq!(
        entries(&log),
        vec![
            "ArmorChanged 20->0",
            "OutOfArmor",
            "HealthChanged 65->57.5",
            "DamageTaken 25",
        ]
    );
}

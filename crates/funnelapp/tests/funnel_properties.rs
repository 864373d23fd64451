use funnelapp::engine::FilterEngine;
use funnelapp::evaluator;
use funnelapp::index::distinct_values;
use funnelapp::model::{FilterableField, Priority, Record};
use funnelapp::slots::SlotChain;
use funnelapp::store::cross::CrossProductProvider;
use funnelapp::store::RecordStore;
use std::collections::BTreeSet;

use FilterableField::{ApplicationCode, Name, Role};

fn scenario_store() -> RecordStore {
    RecordStore::from_provider(&CrossProductProvider::new(
        ["David", "Joe"],
        ["User", "Admin"],
        ["Diablo", "Frogger"],
    ))
    .unwrap()
}

/// Every action a user can take on one field of the scenario store.
fn actions(store: &RecordStore) -> Vec<(FilterableField, Vec<String>)> {
    let mut actions = Vec::new();
    for field in FilterableField::ALL {
        let values = distinct_values(field, store.records());
        actions.push((field, vec![values[0].clone()]));
        actions.push((field, vec![values[1].clone()]));
        actions.push((field, values.clone()));
        actions.push((field, vec![]));
    }
    actions
}

/// Every sequence of `len` actions.
fn sequences(actions: usize, len: usize) -> Vec<Vec<usize>> {
    let mut out = vec![vec![]];
    for _ in 0..len {
        out = out
            .into_iter()
            .flat_map(|seq| {
                (0..actions).map(move |a| {
                    let mut next = seq.clone();
                    next.push(a);
                    next
                })
            })
            .collect();
    }
    out
}

fn naive_view(store: &RecordStore, slots: &SlotChain) -> Vec<Record> {
    store
        .records()
        .iter()
        .filter(|record| {
            slots
                .iter()
                .all(|slot| slot.selected.contains(slot.field.value_of(record)))
        })
        .cloned()
        .collect()
}

fn assert_chain_consistent(engine: &FilterEngine) {
    let slots = engine.slots();
    slots.check_invariants().unwrap();

    // Contiguous prefix of priorities.
    for (position, slot) in slots.iter().enumerate() {
        assert_eq!(slot.priority, Priority::from_index(position).unwrap());
    }

    // One slot per field.
    let fields: BTreeSet<_> = slots.iter().map(|slot| slot.field).collect();
    assert_eq!(fields.len(), slots.level());

    // Level is the count of occupied slots and the highest ordinal in use.
    assert_eq!(engine.current_filter_level(), slots.level());
    let highest = slots.iter().map(|slot| slot.priority.ordinal()).max().unwrap_or(0);
    assert_eq!(engine.current_filter_level(), highest);
}

#[test]
fn test_every_sequence_keeps_slots_contiguous_and_unique() {
    let store = scenario_store();
    let actions = actions(&store);

    for seq in sequences(actions.len(), 3) {
        let mut engine = FilterEngine::new(store.clone());
        for &a in &seq {
            let (field, values) = &actions[a];
            engine.update_selection(*field, values.iter().cloned()).unwrap();
            assert_chain_consistent(&engine);
            assert_eq!(
                engine.current_visible_records(),
                naive_view(&store, engine.slots()),
                "sequence {:?}",
                seq
            );
        }
    }
}

#[test]
fn test_more_slots_never_widen_the_view() {
    let store = scenario_store();
    let actions = actions(&store);

    for seq in sequences(actions.len(), 3) {
        let mut engine = FilterEngine::new(store.clone());
        for &a in &seq {
            let (field, values) = &actions[a];
            engine.update_selection(*field, values.iter().cloned()).unwrap();
        }
        let stages = evaluator::stages(engine.slots(), &store);
        for pair in stages.windows(2) {
            let wider: BTreeSet<_> = pair[0].iter().collect();
            assert!(pair[1].iter().all(|i| wider.contains(i)), "sequence {:?}", seq);
        }
    }
}

#[test]
fn test_assign_then_retract_round_trips() {
    let store = scenario_store();
    let actions = actions(&store);

    for seq in sequences(actions.len(), 2) {
        let mut engine = FilterEngine::new(store.clone());
        for &a in &seq {
            let (field, values) = &actions[a];
            engine.update_selection(*field, values.iter().cloned()).unwrap();
        }
        for field in FilterableField::ALL {
            if engine.priority_of(field).is_some() {
                continue;
            }
            let before = engine.snapshot();
            let pick = distinct_values(field, store.records()).remove(0);
            engine.update_selection(field, [pick]).unwrap();
            engine.retract(field).unwrap();
            assert_eq!(engine.snapshot(), before, "sequence {:?} field {}", seq, field);
        }
    }
}

#[test]
fn test_retracting_primary_promotes_the_rest() {
    let store = scenario_store();
    let mut engine = FilterEngine::new(store.clone());
    engine.update_selection(Role, ["Admin"]).unwrap();
    engine.update_selection(Name, ["David"]).unwrap();
    engine.update_selection(ApplicationCode, ["Diablo"]).unwrap();

    engine.update_selection(Role, Vec::<String>::new()).unwrap();

    let slots = engine.slots();
    let primary = slots.get(Priority::Primary).unwrap();
    assert_eq!(primary.field, Name);
    assert_eq!(primary.selected, BTreeSet::from(["David".to_string()]));
    let secondary = slots.get(Priority::Secondary).unwrap();
    assert_eq!(secondary.field, ApplicationCode);
    assert_eq!(secondary.selected, BTreeSet::from(["Diablo".to_string()]));
    assert!(slots.get(Priority::Tertiary).is_none());

    let mut expected = FilterEngine::new(store);
    expected.update_selection(Name, ["David"]).unwrap();
    expected.update_selection(ApplicationCode, ["Diablo"]).unwrap();
    assert_eq!(engine.current_visible_records(), expected.current_visible_records());
    assert_eq!(engine.snapshot(), expected.snapshot());
}

#[test]
fn test_scenarios_a_b_c() {
    let mut engine = FilterEngine::new(scenario_store());

    // A
    engine.update_selection(Role, ["Admin"]).unwrap();
    assert_eq!(engine.visible_count(), 4);
    assert!(engine.current_visible_records().iter().all(|r| r.role == "Admin"));
    assert_eq!(engine.current_options(ApplicationCode), ["Diablo", "Frogger"]);
    assert_eq!(engine.current_options(Name), ["David", "Joe"]);

    // B
    engine.update_selection(ApplicationCode, ["Diablo"]).unwrap();
    assert_eq!(
        engine.current_visible_records(),
        vec![
            Record::new("David", "Admin", "Diablo"),
            Record::new("Joe", "Admin", "Diablo"),
        ]
    );
    assert_eq!(engine.current_options(Name), ["David", "Joe"]);

    // C
    engine.update_selection(Role, Vec::<String>::new()).unwrap();
    assert_eq!(engine.current_assigned_fields(), vec![ApplicationCode]);
    assert_eq!(engine.priority_of(ApplicationCode), Some(Priority::Primary));
    let visible = engine.current_visible_records();
    assert_eq!(visible.len(), 4);
    assert!(visible.iter().all(|r| r.application_code == "Diablo"));
    let roles: BTreeSet<_> = visible.iter().map(|r| r.role.as_str()).collect();
    let names: BTreeSet<_> = visible.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(roles, BTreeSet::from(["Admin", "User"]));
    assert_eq!(names, BTreeSet::from(["David", "Joe"]));
    assert_eq!(engine.priority_of(Role), None);
    assert_eq!(engine.current_options(Role), ["Admin", "User"]);
}

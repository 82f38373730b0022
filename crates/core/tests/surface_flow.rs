use cardtable_core::{
    CardPhase, GroupPhase, PointerButton, SortMode, SpreadFilter, Suit, Table,
};

fn run(table: &mut Table, ticks: u64) {
    for _ in 0..ticks {
        table.tick();
    }
}

fn partition_holds(table: &Table) -> bool {
    let inventory = table.inventory();
    let counts_add_up =
        inventory.unused_count() + inventory.in_use_count() == inventory.universe().len();
    let disjoint = inventory
        .in_use_keys()
        .iter()
        .all(|key| !inventory.is_unused(key));
    let live_matches = table.cards().count() == inventory.in_use_count();
    counts_add_up && disjoint && live_matches
}

#[test]
fn spawn_flip_delete_round_trip() {
    let mut table = Table::new(1);
    let id = table.spawn_specific("spade-(7)").unwrap();
    assert!(!table.inventory().is_unused("spade-(7)"));
    assert!(table.inventory().is_in_use("spade-(7)"));

    run(&mut table, 20);
    assert_eq!(table.card(id).unwrap().phase, CardPhase::Ready);
    assert!(!table.card(id).unwrap().face_up);

    table.flip_card(id).unwrap();
    let half = u64::from(table.config.flip_steps / 2);
    run(&mut table, half);
    assert!(
        table.card(id).unwrap().face_up,
        "orientation toggles at the flip midpoint"
    );
    run(&mut table, half + 1);
    assert_eq!(table.card(id).unwrap().phase, CardPhase::Ready);

    table.delete_card(id).unwrap();
    assert!(table.inventory().is_unused("spade-(7)"));
    assert!(!table.inventory().is_in_use("spade-(7)"));
    assert!(table.card(id).is_none());
    assert!(!table.particles().is_empty(), "delete leaves a burst behind");
    assert!(partition_holds(&table));
}

#[test]
fn standard_spread_orders_the_whole_deck() {
    let mut table = Table::new(2);
    let group = table
        .spawn_spread(SpreadFilter::All, SortMode::Standard, false, false)
        .unwrap();
    run(&mut table, 300);

    let spread = table.group(group).unwrap();
    assert_eq!(spread.phase, GroupPhase::Idle);
    assert_eq!(spread.members.len(), 54);

    let keys: Vec<&str> = spread
        .members
        .iter()
        .map(|id| table.card(*id).unwrap().identity.key())
        .collect();
    assert_eq!(keys[0], "joker-(1)");
    assert_eq!(keys[53], "joker-(2)");
    assert_eq!(keys[1], "spade-(1)");
    assert_eq!(keys[13], "spade-(13)");
    assert_eq!(keys[14], "diamond-(1)");
    assert_eq!(keys[27], "club-(1)");
    assert_eq!(keys[40], "heart-(1)");
    assert_eq!(keys[52], "heart-(13)");

    assert_eq!(table.inventory().unused_count(), 0);
    assert!(partition_holds(&table));
}

#[test]
fn deleting_a_group_returns_every_identity() {
    let mut table = Table::new(3);
    let group = table
        .spawn_spread(SpreadFilter::Suit(Suit::Diamond), SortMode::Random, false, false)
        .unwrap();
    run(&mut table, 100);

    let members = table.group(group).unwrap().members.len();
    assert_eq!(members, 13);
    assert_eq!(table.inventory().unused_count(), 54 - 13);

    table.delete_group(group).unwrap();
    run(&mut table, 100);

    assert!(table.group(group).is_none());
    assert_eq!(table.inventory().unused_count(), 54);
    assert_eq!(table.cards().count(), 0);
    for group in table.groups() {
        for member in &group.members {
            assert!(table.card(*member).is_some(), "dangling member reference");
        }
    }
    assert!(partition_holds(&table));
}

#[test]
fn click_and_drag_disambiguate_on_a_card() {
    let mut table = Table::new(4);
    let id = table.spawn_specific("heart-(3)").unwrap();
    run(&mut table, 20);
    let (x, y) = {
        let card = table.card(id).unwrap();
        (card.x, card.y)
    };

    // Sub-threshold press/release: exactly one click (a flip), zero commits.
    table.pointer_press(x, y, PointerButton::Primary);
    table.pointer_move(x + 3.0, y);
    table.pointer_release(x + 3.0, y);
    {
        let card = table.card(id).unwrap();
        assert_eq!(card.phase, CardPhase::Flipping);
        assert_eq!((card.x, card.y), (x, y));
    }
    run(&mut table, 30);

    // At or past the threshold: zero clicks, one committed position.
    let face_before = table.card(id).unwrap().face_up;
    table.pointer_press(x, y, PointerButton::Primary);
    table.pointer_move(x + 9.0, y + 12.0);
    table.pointer_release(x + 40.0, y + 2.0);
    {
        let card = table.card(id).unwrap();
        assert_eq!(card.phase, CardPhase::Ready);
        assert_eq!((card.x, card.y), (x + 40.0, y + 2.0));
    }
    run(&mut table, 30);
    assert_eq!(table.card(id).unwrap().face_up, face_before);
}

#[test]
fn dragging_a_member_detaches_at_drag_start() {
    let mut table = Table::new(5);
    let group = table
        .spawn_spread(SpreadFilter::Suit(Suit::Spade), SortMode::Standard, false, true)
        .unwrap();
    run(&mut table, 100);
    let first = table.group(group).unwrap().members[0];
    let (x, y) = {
        let card = table.card(first).unwrap();
        (card.x, card.y)
    };

    // Press the exposed left edge so the topmost overlapping member is ours.
    let press = (x - 30.0, y);
    table.pointer_press(press.0, press.1, PointerButton::Primary);
    table.pointer_move(press.0 + 2.0, press.1);
    assert_eq!(table.card(first).unwrap().member_of, Some(group));

    table.pointer_move(press.0 + 6.0, press.1);
    assert_eq!(table.card(first).unwrap().member_of, None);
    assert!(!table.group(group).unwrap().members.contains(&first));
    assert_eq!(table.card(first).unwrap().phase, CardPhase::Dragging);

    table.pointer_release(press.0 + 6.0, press.1);
    assert_eq!(table.card(first).unwrap().phase, CardPhase::Ready);
    assert_eq!(table.group(group).unwrap().members.len(), 12);
    assert!(partition_holds(&table));
}

#[test]
fn partition_survives_interleaved_operations() {
    let mut table = Table::new(6);
    for _ in 0..10 {
        let _ = table.spawn_card();
        run(&mut table, 3);
    }
    run(&mut table, 30);
    assert_eq!(table.inventory().in_use_count(), 10);
    assert!(partition_holds(&table));

    let victims: Vec<_> = table.cards().map(|card| card.id).take(4).collect();
    for id in victims {
        table.delete_card(id).unwrap();
        assert!(partition_holds(&table));
    }

    // Reclaiming spread: live red cards die first, then respawn as members.
    table
        .spawn_spread(SpreadFilter::Red, SortMode::EightKings, true, true)
        .unwrap();
    run(&mut table, 200);
    assert!(partition_holds(&table));
    assert_eq!(table.inventory().in_use_count(), 26 + table.cards().filter(|c| {
        c.identity.suit() == Some(Suit::Spade) || c.identity.suit() == Some(Suit::Club)
    }).count());

    table.delete_all();
    run(&mut table, 200);
    assert_eq!(table.inventory().unused_count(), 54);
    assert_eq!(table.cards().count(), 0);
    assert!(partition_holds(&table));
}

#[test]
fn flip_all_leaves_every_card_matching() {
    let mut table = Table::new(7);
    table.spawn_specific("club-(2)").unwrap();
    table.spawn_specific("club-(9)").unwrap();
    run(&mut table, 20);
    let one = table.cards().next().unwrap().id;
    table.flip_card(one).unwrap();
    run(&mut table, 30);

    // Mixed faces: everything flips up.
    table.flip_all_cards();
    run(&mut table, 30);
    assert!(table.cards().all(|card| card.face_up));

    // All up: everything flips down.
    table.flip_all_cards();
    run(&mut table, 30);
    assert!(table.cards().all(|card| !card.face_up));
}

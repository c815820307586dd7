use ordered_tree::OrderedMap;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn map_empty() {
    init_logger();
    let map: OrderedMap<String, i32> = OrderedMap::new();

    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert!(map.begin() == map.end());
    assert_eq!(map.iter().next(), None);
}

#[test]
fn map_insert_and_find() {
    init_logger();
    let mut map = OrderedMap::new();

    let (entry, inserted) = map.insert("apple".to_string(), 3);
    assert!(inserted);
    assert_eq!(entry.key().map(String::as_str), Some("apple"));
    assert_eq!(entry.value(), Some(&3));

    let (_, inserted) = map.insert("banana".to_string(), 5);
    assert!(inserted);
    assert_eq!(map.len(), 2);

    let (entry, inserted) = map.insert("apple".to_string(), 10);
    assert!(!inserted);
    assert_eq!(entry.value(), Some(&3));
    assert_eq!(map.len(), 2);

    let found = map.find(&"banana".to_string());
    assert!(found != map.end());
    assert_eq!(found.value(), Some(&5));

    assert!(map.find(&"orange".to_string()) == map.end());
}

#[test]
fn map_brackets_insert_and_update() {
    init_logger();
    let mut map: OrderedMap<&str, i32> = OrderedMap::new();

    *map.get_or_insert_default("x") = 10;
    assert!(!map.is_empty());
    assert_eq!(map.len(), 1);
    assert_eq!(*map.get_or_insert_default("x"), 10);

    *map.get_or_insert_default("x") = 20;
    assert_eq!(*map.get_or_insert_default("x"), 20);
    assert_eq!(map.len(), 1);

    let y = *map.get_or_insert_default("y");
    assert_eq!(y, 0);
    assert_eq!(map.len(), 2);
    assert_eq!(map[&"x"], 20);
}

#[test]
fn map_iteration_order() {
    init_logger();
    let mut map = OrderedMap::new();
    map.insert(2, 'b');
    map.insert(1, 'a');
    map.insert(3, 'c');

    let mut cursor = map.begin();
    for expected in [(1, 'a'), (2, 'b'), (3, 'c')] {
        assert!(cursor != map.end());
        assert_eq!(cursor.get(), Some((&expected.0, &expected.1)));
        cursor.move_next();
    }
    assert!(cursor == map.end());

    assert_eq!(
        map.iter().collect::<Vec<_>>(),
        [(&1, &'a'), (&2, &'b'), (&3, &'c')]
    );
    assert_eq!(map.keys().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
}

#[test]
fn map_find_mut_changes_value_only() {
    init_logger();
    let mut map: OrderedMap<_, _> = [(1, "one"), (2, "two")].into_iter().collect();

    let mut cursor = map.find_mut(&2);
    *cursor.value_mut().unwrap() = "deux";
    cursor.move_prev();
    assert_eq!(cursor.key(), Some(&1));

    assert_eq!(map.get(&2), Some(&"deux"));
    assert!(map.find_mut(&3).is_end());
    assert!(map.check_sorting_invariant());
}

#[test]
fn map_copies_are_independent() {
    init_logger();
    let mut original: OrderedMap<_, _> = [(1, 10), (2, 20)].into_iter().collect();
    let copy = original.clone();

    *original.get_mut(&1).unwrap() = 11;
    original.insert(3, 30);

    assert_eq!(copy.len(), 2);
    assert_eq!(copy.get(&1), Some(&10));
    assert!(!copy.contains_key(&3));
    assert_ne!(original, copy);
}

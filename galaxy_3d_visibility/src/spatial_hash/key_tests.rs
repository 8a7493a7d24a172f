use super::*;

fn h(v: i16) -> Hash {
    Hash::new(v, v, v)
}

fn key(path: &[Hash]) -> Key {
    Key::from_path(path).unwrap()
}

// ============================================================================
// make_hash / make_key
// ============================================================================

#[test]
fn test_make_hash_floors() {
    assert_eq!(make_hash(1, 0.5, -0.5, 2.0), Hash::new(0, -1, 2));
    assert_eq!(make_hash(8, -2.5, 2.5, 8.0), Hash::new(-1, 0, 1));
}

#[test]
fn test_key_construction() {
    let test1 = make_key(1, 0.0, 0.0, 0.0);
    let test2 = make_key(2, 0.5, 0.0, 0.0);

    assert_eq!(test1.ancestors, 15);
    assert_eq!(test2.ancestors, 14);

    assert!(test2.is_ancestor_of(&test1));
    assert!(!test1.is_ancestor_of(&test2));
    // Keys are ancestors of themselves
    assert!(test1.is_ancestor_of(&test1));
}

#[test]
fn test_root_cell_size_key_is_root() {
    let k = make_key(ROOT_CELL_SIZE, 100.0, -100.0, 0.0);

    assert!(k.is_root());
    assert_eq!(k.path(), &[Hash::new(0, -1, 0)]);
}

#[test]
fn test_key_path_descends_one_power_of_two_per_level() {
    let k = make_key(4, 5.0, 0.0, 0.0);

    assert_eq!(k.ancestors, 13);
    // Last three entries: cell sizes 16, 8, 4
    assert_eq!(k.hash_path[11].x, 0);
    assert_eq!(k.hash_path[12].x, 0);
    assert_eq!(k.hash_path[13].x, 1);
}

// ============================================================================
// Ancestry
// ============================================================================

#[test]
fn test_parent_key() {
    let child = make_key(1, 3.0, 3.0, 3.0);
    let parent = child.parent_key();

    assert_eq!(parent.ancestors, 14);
    assert_eq!(parent, make_key(2, 3.0, 3.0, 3.0));
    assert!(parent.is_ancestor_of(&child));
}

#[test]
fn test_walk_to_root() {
    let mut k = make_key(1, 0.0, 0.0, 0.0);
    let mut steps = 0;
    while !k.is_root() {
        k = k.parent_key();
        steps += 1;
    }

    assert_eq!(steps, 15);
    assert_eq!(k.parent_key(), k);
}

#[test]
fn test_siblings_are_not_ancestors() {
    let a = make_key(1, 0.5, 0.5, 0.5);
    let b = make_key(1, 1.5, 0.5, 0.5);

    assert!(!a.is_ancestor_of(&b));
    assert!(!b.is_ancestor_of(&a));
    assert!(a.parent_key().is_ancestor_of(&b));
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_key_comparison() {
    let key1 = key(&[h(1), h(2)]);
    let key2 = key(&[h(1), h(3)]);
    let key3 = key(&[h(1), h(1), h(2)]);
    let key4 = key(&[h(3)]);
    let key5 = key(&[h(1)]);

    assert!(key3 < key1);
    assert!(!(key1 < key3));

    assert!(key3 < key2);
    assert!(!(key2 < key3));

    assert!(key1 < key2);
    assert!(!(key2 < key1));

    assert!(key3 < key4);
    assert!(key2 < key4);
    assert!(key1 < key4);

    assert!(!(key4 < key3));
    assert!(!(key4 < key2));
    assert!(!(key4 < key1));

    assert!(key5 < key3);
    assert!(key5 < key2);
    assert!(key5 < key1);

    assert!(!(key3 < key5));
    assert!(!(key2 < key5));
    assert!(!(key1 < key5));
}

#[test]
fn test_descendants_follow_their_ancestor() {
    let mut keys = vec![
        key(&[h(1), h(2), h(0)]),
        key(&[h(2)]),
        key(&[h(1)]),
        key(&[h(1), h(2)]),
        key(&[h(0), h(9)]),
        key(&[h(1), h(2), h(5)]),
    ];
    keys.sort();

    let anchor = key(&[h(1), h(2)]);
    let start = keys.iter().position(|k| *k == anchor).unwrap();
    let run: Vec<_> = keys[start..].iter().take_while(|k| anchor.is_ancestor_of(k)).collect();

    assert_eq!(run.len(), 3);
    assert_eq!(keys.iter().filter(|k| anchor.is_ancestor_of(k)).count(), 3);
}

#[test]
fn test_equality_ignores_unused_entries() {
    let mut a = key(&[h(1), h(2)]);
    a.hash_path[5] = h(7);

    assert_eq!(a, key(&[h(1), h(2)]));
}

#[test]
fn test_from_path_rejects_bad_lengths() {
    assert!(Key::from_path(&[]).is_none());
    assert!(Key::from_path(&[h(0); MAX_GRID_LEVELS + 1]).is_none());
    assert!(Key::from_path(&[h(0); MAX_GRID_LEVELS]).is_some());
}

#[test]
fn test_display() {
    let k = key(&[Hash::new(1, 2, 3), Hash::new(-1, 0, 0)]);
    assert_eq!(k.to_string(), "(1, 2, 3) / (-1, 0, 0)");
}

// Integration tests for the instrumented structures

use test_case::test_case;

use algoscope::structure::avl::AvlTree;
use algoscope::structure::binary_heap::MinHeap;
use algoscope::structure::bloom::BloomFilter;
use algoscope::structure::btree::BTree;
use algoscope::structure::disjoint_set::DisjointSet;
use algoscope::structure::fenwick::FenwickTree;
use algoscope::structure::order_statistic::OrderStatisticTree;
use algoscope::structure::red_black::RbTree;
use algoscope::structure::treap::Treap;
use algoscope::structure::trie::Trie;
use algoscope::trace::StepResult;

// === AVL ===

#[test]
fn avl_balanced_sequence_needs_no_rotation() {
    let mut tree = AvlTree::new();
    let mut traces = Vec::new();
    for key in [30, 20, 40, 10] {
        traces.push(tree.insert(key));
    }

    // The sequence stays within balance factor ±1 the whole way.
    for trace in &traces {
        assert!(trace.iter().all(|s| !s.message.contains("rotated")));
    }
    let last_trace = traces.last().expect("four traces were produced");
    let last_step = last_trace.last().expect("trace is never empty");
    assert_eq!(last_step.message, "Insertion complete");

    let root = tree.root().expect("tree has a root");
    assert_eq!(tree.node(root).key, 30);
    let left = tree.node(root).left.expect("30 has a left child");
    let right = tree.node(root).right.expect("30 has a right child");
    assert_eq!(tree.node(left).key, 20);
    assert_eq!(tree.node(right).key, 40);
    let leaf = tree.node(left).left.expect("20 has a left child");
    assert_eq!(tree.node(leaf).key, 10);
}

#[test_case(&[10, 20, 30], 20; "ascending run promotes the middle key")]
#[test_case(&[30, 20, 10], 20; "descending run promotes the middle key")]
#[test_case(&[30, 10, 20], 20; "zig zag from the left double rotates")]
#[test_case(&[10, 30, 20], 20; "zig zag from the right double rotates")]
fn avl_rotations_promote_the_middle_key(keys: &[i64], expected_root: i64) {
    let mut tree = AvlTree::new();
    for &key in keys {
        tree.insert(key);
    }
    let root = tree.root().expect("tree has a root");
    assert_eq!(tree.node(root).key, expected_root);
}

#[test]
fn avl_search_miss_on_empty_tree_is_a_single_step() {
    let mut tree = AvlTree::new();
    let trace = tree.search(7);
    assert_eq!(trace.len(), 1);
    let last = trace.last().expect("trace is never empty");
    assert_eq!(last.result, Some(StepResult::Found(false)));
}

// === Red-black ===

#[test]
fn red_black_insertions_keep_a_black_root_and_sorted_order() {
    let mut tree = RbTree::new();
    for key in [7, 3, 18, 10, 22, 8, 11, 26] {
        tree.insert(key);
    }
    let root = tree.root().expect("tree has a root");
    assert_eq!(
        tree.node(root).color,
        algoscope::structure::red_black::Color::Black
    );
    let trace = tree.search(11);
    let last = trace.last().expect("trace is never empty");
    assert_eq!(last.result, Some(StepResult::Found(true)));
}

// === B-tree ===

#[test]
fn btree_fourth_key_splits_the_root() {
    let mut tree = BTree::new();
    tree.insert(1);
    tree.insert(2);
    tree.insert(3);
    let trace = tree.insert(4);
    assert!(trace.iter().any(|s| s.message.contains("Root is full")));
    assert_eq!(tree.sorted_keys(), vec![1, 2, 3, 4]);
}

// === Treap ===

#[test]
fn treap_rotation_steps_restore_the_heap_property() {
    let mut treap = Treap::new();
    let mut saw_rotation = false;
    for key in [50, 30, 70, 20, 40, 60, 80, 10, 90] {
        let trace = treap.insert(key);
        saw_rotation |= trace.iter().any(|s| s.message.contains("rotated"));
    }
    assert!(saw_rotation);

    let root = treap.root().expect("treap has a root");
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = treap.node(id);
        for child in [node.left, node.right].into_iter().flatten() {
            assert!(treap.node(child).priority <= node.priority);
            stack.push(child);
        }
    }
}

// === Order statistic ===

#[test]
fn order_statistic_select_and_rank_agree() {
    let mut tree = OrderStatisticTree::new();
    for key in [50, 30, 70, 20, 40, 60, 80] {
        tree.insert(key);
    }
    let select = tree.select(5);
    let selected = select.last().expect("trace is never empty");
    assert_eq!(selected.result, Some(StepResult::Value(60)));

    let rank = tree.rank(60);
    let ranked = rank.last().expect("trace is never empty");
    assert_eq!(ranked.result, Some(StepResult::Value(5)));
}

#[test]
fn order_statistic_duplicate_records_a_noop_step() {
    let mut tree = OrderStatisticTree::new();
    tree.insert(10);
    let trace = tree.insert(10);
    assert_eq!(trace.len(), 1);
    let last = trace.last().expect("trace is never empty");
    assert!(last.message.contains("already present"));
    assert_eq!(tree.len(), 1);
}

// === Fenwick ===

#[test]
fn fenwick_prefix_sums_match_the_updates() {
    let mut fw = FenwickTree::new(16);
    fw.update(3, 5);
    fw.update(7, 2);
    fw.update(12, -4);

    let trace = fw.prefix_sum(10);
    let last = trace.last().expect("trace is never empty");
    assert_eq!(last.result, Some(StepResult::Value(7)));

    let trace = fw.prefix_sum(16);
    let last = trace.last().expect("trace is never empty");
    assert_eq!(last.result, Some(StepResult::Value(3)));
}

// === Bloom ===

#[test]
fn bloom_insert_then_query_reports_possibly_present() {
    let mut filter = BloomFilter::new(16);
    filter.insert("cat");
    let trace = filter.query("cat");
    let last = trace.last().expect("trace is never empty");
    assert_eq!(last.result, Some(StepResult::Found(true)));
    assert!(last.message.contains("possibly"));
}

#[test]
fn bloom_query_with_an_unset_probed_bit_is_definite() {
    let mut filter = BloomFilter::new(16);
    filter.insert("cat");

    // Whether "dog" collides with "cat" is fixed by the three hashes; the
    // verdict must match the probed bits either way.
    let probes = filter.probes("dog");
    let all_set = probes.iter().all(|&b| filter.bits()[b]);
    let trace = filter.query("dog");
    let last = trace.last().expect("trace is never empty");
    if all_set {
        assert_eq!(last.result, Some(StepResult::Found(true)));
    } else {
        assert_eq!(last.result, Some(StepResult::Found(false)));
        assert!(last.message.contains("definitely not in the set"));
    }
}

#[test]
fn bloom_query_on_empty_filter_is_definitely_absent() {
    let mut filter = BloomFilter::new(16);
    let trace = filter.query("badger");
    let last = trace.last().expect("trace is never empty");
    assert_eq!(last.result, Some(StepResult::Found(false)));
    assert!(last.message.contains("definitely not in the set"));
}

// === Disjoint set ===

#[test]
fn disjoint_set_unions_connect_transitively() {
    let mut dsu = DisjointSet::new(7);
    dsu.union(0, 1);
    dsu.union(1, 2);

    let trace = dsu.connected(0, 2);
    let last = trace.last().expect("trace is never empty");
    assert_eq!(last.result, Some(StepResult::Found(true)));

    let trace = dsu.connected(0, 6);
    let last = trace.last().expect("trace is never empty");
    assert_eq!(last.result, Some(StepResult::Found(false)));
}

#[test]
fn disjoint_set_find_reports_the_representative() {
    let mut dsu = DisjointSet::new(4);
    dsu.union(0, 1);
    let trace = dsu.find(1);
    let last = trace.last().expect("trace is never empty");
    assert_eq!(last.result, Some(StepResult::Index(0)));
}

// === Heap ===

#[test]
fn heap_pop_extracts_the_minimum() {
    let mut heap = MinHeap::new();
    for key in [9, 4, 7, 1] {
        heap.push(key);
    }
    let trace = heap.pop();
    let last = trace.last().expect("trace is never empty");
    assert_eq!(last.result, Some(StepResult::Value(1)));
    assert_eq!(heap.peek(), Some(4));
}

// === Trie ===

#[test]
fn trie_distinguishes_words_from_prefixes() {
    let mut trie = Trie::new();
    trie.insert("car");
    trie.insert("card");

    let found = trie.search("car");
    assert_eq!(
        found.last().and_then(|s| s.result),
        Some(StepResult::Found(true))
    );
    let miss = trie.search("ca");
    assert_eq!(
        miss.last().and_then(|s| s.result),
        Some(StepResult::Found(false))
    );
    let prefix = trie.starts_with("ca");
    assert_eq!(
        prefix.last().and_then(|s| s.result),
        Some(StepResult::Found(true))
    );
}

// === Cross-cutting: every operation yields at least one step ===

#[test]
fn every_operation_produces_a_nonempty_trace() {
    let mut avl = AvlTree::new();
    assert!(avl.search(1).len() >= 1);
    assert!(avl.insert(1).len() >= 1);
    assert!(avl.insert(1).len() >= 1);

    let mut rb = RbTree::new();
    assert!(rb.search(1).len() >= 1);
    assert!(rb.insert(1).len() >= 1);

    let mut bt = BTree::new();
    assert!(bt.search(1).len() >= 1);
    assert!(bt.insert(1).len() >= 1);

    let mut treap = Treap::new();
    assert!(treap.search(1).len() >= 1);
    assert!(treap.insert(1).len() >= 1);

    let mut ost = OrderStatisticTree::new();
    assert!(ost.select(3).len() >= 1);
    assert!(ost.rank(3).len() >= 1);
    assert!(ost.insert(3).len() >= 1);

    let mut fw = FenwickTree::new(4);
    assert!(fw.update(0, 1).len() >= 1);
    assert!(fw.prefix_sum(0).len() >= 1);

    let mut bloom = BloomFilter::new(8);
    assert!(bloom.query("x").len() >= 1);
    assert!(bloom.insert("x").len() >= 1);

    let mut dsu = DisjointSet::new(3);
    assert!(dsu.find(9).len() >= 1);
    assert!(dsu.union(0, 0).len() >= 1);

    let mut heap = MinHeap::new();
    assert!(heap.pop().len() >= 1);
    assert!(heap.push(1).len() >= 1);

    let mut trie = Trie::new();
    assert!(trie.search("a").len() >= 1);
    assert!(trie.insert("").len() >= 1);
    assert!(trie.insert("a").len() >= 1);
}

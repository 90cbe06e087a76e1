//! The literal end-to-end scenarios from `§8`.

use string_graph::impls::DistMatrix;
use string_graph::reads::ReadTable;
use string_graph::semirings::kmer_intersection::CommonKmers;
use string_graph::test_utils::{scenario_s1, scenario_s2, scenario_s3, scenario_s4, scenario_s5};
use string_graph::tr::transitive_reduction;
use string_graph::types::DEFAULT_FUZZ;

#[test]
fn s1_linear_chain_drops_the_shortcut_edge() {
    let (reads, graph) = scenario_s1();
    let result = transitive_reduction(&graph, &reads, 0);
    assert!(result.string_graph.block(0, 0).get(0, 2).is_none(), "R0->R2 shortcut should be removed: 40+40 <= 80");
    assert!(result.string_graph.block(0, 0).get(0, 1).is_some());
    assert!(result.string_graph.block(0, 0).get(1, 2).is_some());
    // Each of the two surviving overlaps appears in both directions.
    assert_eq!(result.string_graph.nnz(), 4);
}

#[test]
fn s2_slack_changes_the_outcome() {
    let (reads, graph) = scenario_s2();

    let with_fuzz = transitive_reduction(&graph, &reads, 10);
    assert!(with_fuzz.string_graph.block(0, 0).get(0, 2).is_none(), "75 + 10 >= 80 should mark the shortcut for removal");

    let without_fuzz = transitive_reduction(&graph, &reads, 0);
    assert!(without_fuzz.string_graph.block(0, 0).get(0, 2).is_some(), "75 >= 80 is false, so the shortcut should survive");
}

#[test]
fn s3_disconnected_pairs_are_untouched() {
    let (reads, graph) = scenario_s3();
    let result = transitive_reduction(&graph, &reads, DEFAULT_FUZZ);
    assert_eq!(result.string_graph.nnz(), 4);
}

#[test]
fn s4_four_read_chain_needs_at_least_two_rounds() {
    let (reads, graph) = scenario_s4();
    let result = transitive_reduction(&graph, &reads, 0);
    // (R0,R2) and (R1,R3) are each dominated by a direct 30+30 two-hop,
    // and the direct (R0,R3) edge is in turn dominated once those two-hop
    // lengths propagate — none of the three long-range edges should
    // survive, only the three adjacent-step edges (six directed entries).
    assert!(result.string_graph.block(0, 0).get(0, 2).is_none());
    assert!(result.string_graph.block(0, 0).get(1, 3).is_none());
    assert!(result.string_graph.block(0, 0).get(0, 3).is_none());
    assert_eq!(result.string_graph.nnz(), 6);
}

#[test]
fn s5_already_reduced_graph_is_a_fixed_point() {
    let (reads, graph) = scenario_s5();
    let once = transitive_reduction(&graph, &reads, DEFAULT_FUZZ);
    assert_eq!(once.string_graph.nnz(), 2, "the single overlap survives in both directions");

    // Feeding the already-reduced string graph back in as a fresh input
    // should remove nothing further: reduction is idempotent.
    let twice = transitive_reduction(&once.string_graph, &reads, DEFAULT_FUZZ);
    assert_eq!(twice.string_graph.nnz(), once.string_graph.nnz());
    assert!(twice.string_graph.block(0, 0).get(0, 1).is_some());
    assert!(twice.string_graph.block(0, 0).get(1, 0).is_some());
}

#[test]
fn empty_input_produces_an_empty_string_graph() {
    let reads = ReadTable::from_records(vec![]);
    let graph: DistMatrix<CommonKmers> = DistMatrix::empty(0, 0, 1);
    let result = transitive_reduction(&graph, &reads, DEFAULT_FUZZ);
    assert_eq!(result.string_graph.nnz(), 0);
    assert_eq!(result.symmetric_overlap_graph.nnz(), 0);
}

#[test]
fn single_read_has_no_overlaps_to_reduce() {
    let reads = ReadTable::from_records(vec![("r0".into(), vec![b'A'; 50])]);
    let graph: DistMatrix<CommonKmers> = DistMatrix::empty(1, 1, 1);
    let result = transitive_reduction(&graph, &reads, DEFAULT_FUZZ);
    assert_eq!(result.string_graph.nnz(), 0);
}

#[test]
fn two_reads_with_no_shared_kmers_stay_disconnected() {
    let reads = ReadTable::from_records(vec![("r0".into(), vec![b'A'; 50]), ("r1".into(), vec![b'A'; 50])]);
    let graph: DistMatrix<CommonKmers> = DistMatrix::empty(2, 2, 1);
    let result = transitive_reduction(&graph, &reads, DEFAULT_FUZZ);
    assert_eq!(result.string_graph.nnz(), 0);
}

#[test]
fn zero_fuzz_requires_the_direct_edge_to_dominate_outright() {
    // Scenario S2's direct edge (suffix 75) is shorter than the two-hop
    // path it competes with (40 + 40 = 80). With fuzz = 0 no slack is
    // added to the direct edge's suffix before the comparison, so
    // 75 >= 80 is false and the direct edge is not marked for removal.
    let (reads, graph) = scenario_s2();
    let result = transitive_reduction(&graph, &reads, 0);
    assert!(result.string_graph.block(0, 0).get(0, 2).is_some(), "75 < 80 so the direct edge is not dominated without fuzz");
}

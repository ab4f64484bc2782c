//! Deep chains, memoization, and corrupt data.
//!
//! Shows how the depth ceiling bounds team views on a long referral
//! chain, how the size cache avoids repeat traversals, and how cyclic
//! records are reported without breaking aggregation.

use referral_engine::core::batch::UserBatch;
use referral_engine::core::user::{ReferrerRef, UserId, UserRecord};
use referral_engine::graph::cycle_audit::find_referral_cycles;
use referral_engine::graph::referral_graph::ReferralGraph;
use referral_engine::graph::team_size::TeamSizeCache;
use referral_engine::tree::levels::LevelCounts;
use referral_engine::tree::team_tree::{materialize_team_tree, total_nodes};
use rust_decimal::Decimal;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  referral-engine: Deep Chain Example     ║");
    println!("╚══════════════════════════════════════════╝\n");

    // --- Scenario 1: A ten-level referral chain ---
    println!("━━━ Scenario 1: Depth Ceiling ━━━\n");

    let mut records = vec![UserRecord::new("link-0")
        .with_name("Link 0")
        .with_invested(Decimal::from(10_000))];
    for i in 1..10 {
        records.push(
            UserRecord::new(format!("link-{}", i))
                .with_name(format!("Link {}", i))
                .with_invested(Decimal::from(10_000 - i * 500))
                .with_referrer(ReferrerRef::resolved(format!("link-{}", i - 1))),
        );
    }
    let batch = UserBatch::from_records(records).expect("ids are unique");
    let graph = ReferralGraph::from_batch(&batch);

    let root = UserId::new("link-0");
    let mut cache = TeamSizeCache::new();

    let team = cache.team_size(&graph, &root);
    let forest = materialize_team_tree(&graph, &root);
    let levels = LevelCounts::from_tree(&forest);

    println!("Chain length:      10 users");
    println!("Full team size:    {}", team);
    println!("Visible in view:   {}", total_nodes(&forest));
    println!("Per level:         {}", levels);
    println!();

    // --- Scenario 2: Memoized reads ---
    println!("━━━ Scenario 2: Memoization ━━━\n");

    for pass in 1..=3 {
        let size = cache.team_size(&graph, &root);
        println!(
            "Pass {}: team size {} ({} traversal(s) run so far)",
            pass,
            size,
            cache.traversal_count()
        );
    }
    println!();

    // --- Scenario 3: Corrupt referral data ---
    println!("━━━ Scenario 3: Cycle Audit ━━━\n");

    let corrupt = UserBatch::from_records(vec![
        UserRecord::new("a").with_referrer(ReferrerRef::resolved("b")),
        UserRecord::new("b").with_referrer(ReferrerRef::resolved("a")),
        UserRecord::new("s").with_referrer(ReferrerRef::resolved("s")),
    ])
    .expect("ids are unique");
    let corrupt_graph = ReferralGraph::from_batch(&corrupt);

    let cycles = find_referral_cycles(&corrupt_graph);
    println!("Cycles found: {}", cycles.len());
    for (i, cycle) in cycles.iter().enumerate() {
        let kind = if cycle.is_self_referral() {
            "self-referral"
        } else {
            "loop"
        };
        println!("  Cycle {}: {}  [{}]", i, cycle, kind);
    }

    let mut corrupt_cache = TeamSizeCache::new();
    println!(
        "\nSizes still terminate: a -> {}, s -> {}",
        corrupt_cache.team_size(&corrupt_graph, &UserId::new("a")),
        corrupt_cache.team_size(&corrupt_graph, &UserId::new("s"))
    );
}

//! Basic team analytics example.
//!
//! Builds a small referral network by hand and walks through the
//! graph, the leaderboard, and a bounded team view.

use referral_engine::core::batch::UserBatch;
use referral_engine::core::user::{ReferrerRef, UserRecord};
use referral_engine::graph::referral_graph::ReferralGraph;
use referral_engine::graph::team_size::TeamSizeCache;
use referral_engine::rank::leaderboard::LeaderRanker;
use referral_engine::tree::levels::LevelCounts;
use referral_engine::tree::team_tree::{materialize_team_tree, TeamTreeNode};
use rust_decimal_macros::dec;

fn print_node(node: &TeamTreeNode) {
    let indent = node.depth() * 2;
    println!(
        "{:indent$}└ {} [{}]  invested {}",
        "",
        node.user().display_name(),
        node.user().id(),
        node.user().total_invested(),
        indent = indent
    );
    for child in node.children() {
        print_node(child);
    }
}

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  referral-engine: Team Report Example    ║");
    println!("╚══════════════════════════════════════════╝\n");

    // --- Scenario 1: A small creator network ---
    println!("━━━ Scenario 1: Building the Network ━━━\n");

    let batch = UserBatch::from_records(vec![
        UserRecord::new("u-lena").with_name("Lena").with_invested(dec!(50_000)),
        UserRecord::new("u-amara")
            .with_name("Amara")
            .with_invested(dec!(12_000))
            .with_referrer(ReferrerRef::resolved("u-lena")),
        UserRecord::new("u-bruno")
            .with_name("Bruno")
            .with_invested(dec!(3_000))
            .with_referrer(ReferrerRef::resolved("u-lena")),
        UserRecord::new("u-chen")
            .with_name("Chen")
            .with_invested(dec!(800))
            .with_referrer(ReferrerRef::resolved("u-amara")),
        UserRecord::new("u-dara")
            .with_name("Dara")
            .with_invested(dec!(1_500))
            .with_referrer(ReferrerRef::resolved("u-chen")),
        UserRecord::new("u-drifter")
            .with_invested(dec!(9_000))
            .with_referrer(ReferrerRef::legacy("PROMO-2023")),
        UserRecord::new("u-kofi").with_name("Kofi").with_invested(dec!(40_000)),
        UserRecord::new("u-k1")
            .with_name("Kena")
            .with_invested(dec!(600))
            .with_referrer(ReferrerRef::resolved("u-kofi")),
    ])
    .expect("ids are unique");

    let graph = ReferralGraph::from_batch(&batch);
    println!("Users:    {}", graph.user_count());
    println!("Edges:    {}", graph.edge_count());
    println!("Organic:  {}", graph.organic_count());
    println!();

    // --- Scenario 2: Ranking leaders ---
    println!("━━━ Scenario 2: Leaderboard ━━━\n");

    let mut cache = TeamSizeCache::new();
    let board = LeaderRanker::rank(&graph, &mut cache);
    println!("{}", board);

    // --- Scenario 3: The top leader's team ---
    println!("━━━ Scenario 3: Team View ━━━\n");

    let top = board.top().expect("board is non-empty");
    println!("Team of {} (team size {}):\n", top.name, top.team_size);

    let forest = materialize_team_tree(&graph, &top.id);
    for node in &forest {
        print_node(node);
    }

    let levels = LevelCounts::from_tree(&forest);
    println!("\nPer level: {}", levels);
}

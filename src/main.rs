//! referral-engine CLI
//!
//! Run referral network analytics from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Rank top leaders from a JSON export
//! referral-engine leaders --input users.json
//!
//! # Output as JSON
//! referral-engine leaders --input users.json --format json
//!
//! # Materialize a team view
//! referral-engine tree --input users.json --root u-0042 --depth 3
//!
//! # Audit referral data for cycles
//! referral-engine audit --input users.json
//!
//! # Generate a random network for testing
//! referral-engine generate --users 200 --output users.json
//! ```

use referral_engine::core::batch::UserBatch;
use referral_engine::core::user::UserId;
use referral_engine::graph::cycle_audit::find_referral_cycles;
use referral_engine::graph::referral_graph::ReferralGraph;
use referral_engine::graph::team_size::TeamSizeCache;
use referral_engine::rank::leaderboard::LeaderRanker;
use referral_engine::simulation::network_gen::{generate_random_network, NetworkConfig};
use referral_engine::tree::levels::LevelCounts;
use referral_engine::tree::team_tree::{
    materialize_with_depth, total_nodes, TeamTreeNode, MAX_TEAM_TREE_DEPTH,
};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"referral-engine — referral network aggregation and team analytics

USAGE:
    referral-engine <COMMAND> [OPTIONS]

COMMANDS:
    leaders     Rank top leaders by true downline team size
    tree        Materialize a bounded-depth team view for one user
    audit       Check referral data for cycles
    generate    Generate a random referral network (for testing)
    help        Show this message

OPTIONS (leaders, audit):
    --input <FILE>      Path to JSON users file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (tree):
    --input <FILE>      Path to JSON users file
    --root <USER_ID>    User at the root (default: the top leader)
    --depth <N>         Levels to expand (default: 4)
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --users <N>         Number of users (default: 50)
    --referral-rate <R> Share of referred users, 0.0 to 1.0 (default: 0.7)
    --legacy-rate <R>   Share of raw-code referrals (default: 0.1)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    referral-engine leaders --input users.json
    referral-engine leaders --input users.json --format json
    referral-engine tree --input users.json --root u-0042
    referral-engine audit --input users.json
    referral-engine generate --users 200 --referral-rate 0.8 --output users.json"#
    );
}

/// JSON output schema for the leaderboard.
#[derive(serde::Serialize)]
struct LeaderboardOutput {
    total_users: usize,
    referred_users: usize,
    organic_users: usize,
    referral_rate_percent: f64,
    leaders: Vec<LeaderOutput>,
}

#[derive(serde::Serialize)]
struct LeaderOutput {
    rank: usize,
    id: String,
    name: String,
    direct_invitees: usize,
    team_size: usize,
    total_invested: String,
    total_earned: String,
}

#[derive(serde::Serialize)]
struct TreeOutput {
    root: String,
    max_depth: usize,
    team_size: usize,
    levels: Vec<LevelOutput>,
    tree: Vec<TreeNodeOutput>,
}

#[derive(serde::Serialize)]
struct LevelOutput {
    level: usize,
    count: usize,
}

#[derive(serde::Serialize)]
struct TreeNodeOutput {
    id: String,
    name: String,
    depth: usize,
    total_invested: String,
    children: Vec<TreeNodeOutput>,
}

#[derive(serde::Serialize)]
struct CycleOutput {
    members: Vec<String>,
    self_referral: bool,
}

fn load_users(path: &str) -> UserBatch {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "users": [
    {{ "id": "u-1001", "name": "Amara", "referredBy": {{ "id": "u-0042" }},
      "totalInvested": 2500.0, "totalEarned": 120.5, "createdAt": "2024-03-01T10:00:00Z" }}
  ]
}}"#
        );
        process::exit(1);
    })
}

fn cmd_leaders(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let batch = load_users(&path);
    let graph = ReferralGraph::from_batch(&batch);
    let mut cache = TeamSizeCache::new();
    let board = LeaderRanker::rank(&graph, &mut cache);

    if format == "json" {
        let leaders = board
            .leaders()
            .iter()
            .enumerate()
            .map(|(i, leader)| LeaderOutput {
                rank: i + 1,
                id: leader.id.to_string(),
                name: leader.name.clone(),
                direct_invitees: leader.direct_invitees,
                team_size: leader.team_size,
                total_invested: leader.total_invested.to_string(),
                total_earned: leader.total_earned.to_string(),
            })
            .collect();

        let output = LeaderboardOutput {
            total_users: board.total_users(),
            referred_users: board.referred_users(),
            organic_users: board.organic_users(),
            referral_rate_percent: board.referral_rate_percent(),
            leaders,
        };

        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        println!("{}", board);
    }
}

fn cmd_tree(args: &[String]) {
    let mut input_path = None;
    let mut root: Option<String> = None;
    let mut depth = MAX_TEAM_TREE_DEPTH;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--root" => {
                i += 1;
                root = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--root requires a user id");
                    process::exit(1);
                }));
            }
            "--depth" => {
                i += 1;
                depth = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--depth requires a number");
                    process::exit(1);
                });
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let batch = load_users(&path);
    let graph = ReferralGraph::from_batch(&batch);
    let mut cache = TeamSizeCache::new();

    let root_id = match root {
        Some(id) => UserId::new(id),
        None => {
            let board = LeaderRanker::rank(&graph, &mut cache);
            match board.top() {
                Some(leader) => leader.id.clone(),
                None => {
                    eprintln!("No leaders found; specify --root <USER_ID>");
                    process::exit(1);
                }
            }
        }
    };

    let forest = materialize_with_depth(&graph, &root_id, depth);
    let levels = LevelCounts::from_tree(&forest);
    let team_size = cache.team_size(&graph, &root_id);

    if format == "json" {
        let output = TreeOutput {
            root: root_id.to_string(),
            max_depth: depth,
            team_size,
            levels: levels
                .sorted_entries()
                .into_iter()
                .map(|(level, count)| LevelOutput { level, count })
                .collect(),
            tree: forest.iter().map(tree_node_output).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        let root_name = graph
            .user(&root_id)
            .map(|u| u.display_name().to_string())
            .unwrap_or_else(|| root_id.to_string());

        println!("Team of {} (levels 1..{})", root_name, depth);
        println!();
        if forest.is_empty() {
            println!("  (no team members)");
        } else {
            for node in &forest {
                print_tree_node(node);
            }
        }
        println!();
        println!("Shown:     {} ({})", total_nodes(&forest), levels);
        println!("Full team: {}", team_size);
    }
}

fn tree_node_output(node: &TeamTreeNode) -> TreeNodeOutput {
    TreeNodeOutput {
        id: node.user().id().to_string(),
        name: node.user().display_name().to_string(),
        depth: node.depth(),
        total_invested: node.user().total_invested().to_string(),
        children: node.children().iter().map(tree_node_output).collect(),
    }
}

fn print_tree_node(node: &TeamTreeNode) {
    let indent = node.depth() * 2;
    println!(
        "{:indent$}{} [{}] invested {}",
        "",
        node.user().display_name(),
        node.user().id(),
        node.user().total_invested(),
        indent = indent
    );
    for child in node.children() {
        print_tree_node(child);
    }
}

fn cmd_audit(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let batch = load_users(&path);
    let graph = ReferralGraph::from_batch(&batch);
    let cycles = find_referral_cycles(&graph);

    if format == "json" {
        let output: Vec<CycleOutput> = cycles
            .iter()
            .map(|cycle| CycleOutput {
                members: cycle.members().iter().map(|id| id.to_string()).collect(),
                self_referral: cycle.is_self_referral(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else if cycles.is_empty() {
        println!("No referral cycles detected.");
    } else {
        for (i, cycle) in cycles.iter().enumerate() {
            println!("  Cycle {}: {}", i, cycle);
        }
        println!("\nTotal cycles: {}", cycles.len());
    }
}

fn cmd_generate(args: &[String]) {
    let mut users = 50usize;
    let mut referral_rate = 0.7f64;
    let mut legacy_rate = 0.1f64;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--users" => {
                i += 1;
                users = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--users requires a number");
                    process::exit(1);
                });
            }
            "--referral-rate" => {
                i += 1;
                referral_rate = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--referral-rate requires a number between 0 and 1");
                    process::exit(1);
                });
            }
            "--legacy-rate" => {
                i += 1;
                legacy_rate = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--legacy-rate requires a number between 0 and 1");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = NetworkConfig {
        user_count: users,
        referral_rate,
        legacy_code_rate: legacy_rate,
        ..Default::default()
    };

    let batch = generate_random_network(&config);
    let json = serde_json::to_string_pretty(&batch).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Generated {} users → {}", batch.len(), path);
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "leaders" => cmd_leaders(rest),
        "tree" => cmd_tree(rest),
        "audit" => cmd_audit(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}

use crate::core::user::{UserId, UserRecord};
use crate::graph::referral_graph::ReferralGraph;
use crate::graph::team_size::TeamSizeCache;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Inviters kept after the invested-capital pre-ranking.
pub const DEFAULT_SHORTLIST_SIZE: usize = 20;

/// Leaders shown on the final board.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 8;

/// One ranked leader with the figures the board displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderCandidate {
    pub id: UserId,
    pub name: String,
    pub direct_invitees: usize,
    pub team_size: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_invested: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_earned: Decimal,
}

/// Shortlist and board sizes for a ranking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingConfig {
    pub shortlist_size: usize,
    pub leaderboard_size: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            shortlist_size: DEFAULT_SHORTLIST_SIZE,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

/// Ranks inviters into a leaderboard.
///
/// Ranking runs in two phases. Phase one shortlists inviters by their
/// own invested capital, a cheap proxy that avoids sizing every team
/// in the graph. Phase two computes true team sizes for the shortlist
/// only and orders the board by them. An inviter outside the shortlist
/// never reaches the board, however large their team; the expensive
/// traversals stay bounded by the shortlist size.
pub struct LeaderRanker;

impl LeaderRanker {
    /// Rank with the default shortlist and board sizes.
    pub fn rank(graph: &ReferralGraph, cache: &mut TeamSizeCache) -> Leaderboard {
        Self::rank_with(graph, cache, &RankingConfig::default())
    }

    /// Rank with explicit sizes.
    pub fn rank_with(
        graph: &ReferralGraph,
        cache: &mut TeamSizeCache,
        config: &RankingConfig,
    ) -> Leaderboard {
        // Phase one: every inviter we hold a record for, ranked by
        // their own invested capital. Dangling inviter ids have no
        // record to rank and are skipped.
        let mut shortlist: Vec<(&UserId, &UserRecord, usize)> = graph
            .inviter_ids()
            .into_iter()
            .filter_map(|id| graph.user(id).map(|user| (id, user, graph.direct_count(id))))
            .collect();

        shortlist.sort_by(|a, b| {
            b.1.total_invested()
                .cmp(&a.1.total_invested())
                .then_with(|| b.2.cmp(&a.2))
                .then_with(|| a.0.cmp(b.0))
        });
        shortlist.truncate(config.shortlist_size);

        log::debug!(
            "leader shortlist: {:?}",
            shortlist.iter().map(|(id, _, _)| id.as_str()).collect::<Vec<_>>()
        );

        // Phase two: true team sizes for the shortlist only.
        let mut leaders: Vec<LeaderCandidate> = shortlist
            .into_iter()
            .map(|(id, user, direct_invitees)| LeaderCandidate {
                id: id.clone(),
                name: user.display_name().to_string(),
                direct_invitees,
                team_size: cache.team_size(graph, id),
                total_invested: user.total_invested(),
                total_earned: user.total_earned(),
            })
            .collect();

        leaders.sort_by(|a, b| {
            b.team_size
                .cmp(&a.team_size)
                .then_with(|| b.total_invested.cmp(&a.total_invested))
                .then_with(|| a.id.cmp(&b.id))
        });
        leaders.truncate(config.leaderboard_size);

        Leaderboard {
            leaders,
            total_users: graph.user_count(),
            organic_users: graph.organic_count(),
            referred_users: graph.user_count() - graph.organic_count(),
        }
    }
}

/// The ranked board plus batch-level context figures.
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    leaders: Vec<LeaderCandidate>,
    total_users: usize,
    organic_users: usize,
    referred_users: usize,
}

impl Leaderboard {
    /// Ranked leaders, best first.
    pub fn leaders(&self) -> &[LeaderCandidate] {
        &self.leaders
    }

    pub fn len(&self) -> usize {
        self.leaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaders.is_empty()
    }

    /// The number-one leader, if the board is non-empty.
    pub fn top(&self) -> Option<&LeaderCandidate> {
        self.leaders.first()
    }

    pub fn total_users(&self) -> usize {
        self.total_users
    }

    pub fn organic_users(&self) -> usize {
        self.organic_users
    }

    pub fn referred_users(&self) -> usize {
        self.referred_users
    }

    /// Share of users that arrived through a referral, as a percentage.
    pub fn referral_rate_percent(&self) -> f64 {
        if self.total_users == 0 {
            return 0.0;
        }
        self.referred_users as f64 / self.total_users as f64 * 100.0
    }
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Referral Leaderboard")?;
        writeln!(f, "====================")?;
        writeln!(
            f,
            "Users: {} total, {} referred, {} organic ({:.1}% referral rate)",
            self.total_users,
            self.referred_users,
            self.organic_users,
            self.referral_rate_percent()
        )?;
        writeln!(f)?;

        if self.leaders.is_empty() {
            writeln!(f, "No qualifying leaders.")?;
            return Ok(());
        }

        for (rank, leader) in self.leaders.iter().enumerate() {
            writeln!(
                f,
                "{:>2}. {:<24} team {:>6}  direct {:>4}  invested {:>14}",
                rank + 1,
                leader.name,
                leader.team_size,
                leader.direct_invitees,
                leader.total_invested
            )?;
        }
        Ok(())
    }
}

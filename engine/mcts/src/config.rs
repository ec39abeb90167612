//! MCTS configuration parameters.

use games_uttt::Player;

use crate::node::MctsNode;

/// Default memory budget for the node pool of one match.
pub const DEFAULT_NODE_POOL_MIB: usize = 512;

/// Configuration for the time-bounded search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Exploration constant `C` of the UCT term. The selection score uses
    /// `sqrt(C² · log2(parent sims) / child sims)`.
    pub exploration: f32,

    /// Exploration bonus given to children that were never simulated.
    pub first_play_urgency: f32,

    /// Iterations between two reads of the clock.
    pub check_interval: u32,

    /// Number of nodes the arena can hold before the search fails.
    pub node_capacity: usize,

    /// Up to this ply, a move into an empty sub-board is answered by sending
    /// the opponent straight back into it.
    pub send_to_self_max_ply: u8,

    /// Past this ply, expansion looks one move ahead for wins, draws and
    /// losses; up to it, moves sending the opponent to a decided sub-board
    /// are pruned.
    pub late_game_ply: u8,

    /// The side this engine plays. Only affects the opening move.
    pub me: Player,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: 0.41,
            first_play_urgency: 0.40,
            check_interval: 128,
            node_capacity: nodes_for_mib(DEFAULT_NODE_POOL_MIB),
            send_to_self_max_ply: 20,
            late_game_ply: 30,
            me: Player::Two,
        }
    }
}

/// How many nodes fit in `mib` mebibytes.
pub fn nodes_for_mib(mib: usize) -> usize {
    (mib * 1024 * 1024 / std::mem::size_of::<MctsNode>()).min(u32::MAX as usize - 1)
}

impl MctsConfig {
    /// Create a small config for testing.
    pub fn for_testing() -> Self {
        Self {
            node_capacity: nodes_for_mib(16),
            ..Self::default()
        }
    }

    /// Builder pattern: set the side this engine plays.
    pub fn with_me(mut self, me: Player) -> Self {
        self.me = me;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f32) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the first-play urgency.
    pub fn with_first_play_urgency(mut self, fpu: f32) -> Self {
        self.first_play_urgency = fpu;
        self
    }

    /// Builder pattern: set the clock check interval.
    pub fn with_check_interval(mut self, interval: u32) -> Self {
        self.check_interval = interval.max(1);
        self
    }

    /// Builder pattern: size the arena in nodes.
    pub fn with_node_capacity(mut self, nodes: usize) -> Self {
        self.node_capacity = nodes;
        self
    }

    /// Builder pattern: size the arena from a memory budget.
    pub fn with_node_pool_mib(mut self, mib: usize) -> Self {
        self.node_capacity = nodes_for_mib(mib);
        self
    }

    /// Builder pattern: set the ply thresholds of the expansion heuristics.
    pub fn with_ply_thresholds(mut self, send_to_self_max_ply: u8, late_game_ply: u8) -> Self {
        self.send_to_self_max_ply = send_to_self_max_ply;
        self.late_game_ply = late_game_ply;
        self
    }
}

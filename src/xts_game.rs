// Core game logic and configuration management
// Handles board generation, turn resolution, records, and configuration persistence

use chrono::Local;
use directories::ProjectDirs;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Squares are numbered 1..=100
pub const BOARD_SIZE: u16 = 100;
/// The board displays as a GRID_DIM x GRID_DIM boustrophedon grid
pub const GRID_DIM: u16 = 10;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const MIN_FEATURES: usize = 5;
pub const MAX_FEATURES: usize = 20;

// Attempt budget per feature kind; boards may carry fewer features when it runs out
const GEN_ATTEMPTS: u32 = 1000;

/// Row index of a square, counted from the bottom of the board.
/// Uses the raw square number, so square 10 already counts as row 1.
pub fn row(square: u16) -> u16 {
    square / GRID_DIM
}

/// Board feature kinds: ladders carry a player up, snakes down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Ladder,
    Snake,
}

/// A generated board: two start -> end maps over squares 2..=99
#[derive(Clone, Debug, Default)]
pub struct Board {
    pub ladders: BTreeMap<u16, u16>,
    pub snakes: BTreeMap<u16, u16>,
}

impl Board {
    /// Populate a board by rejection sampling, ladders first, then snakes.
    ///
    /// A candidate is kept only when both endpoints are still free and the
    /// feature crosses at least one row boundary in its direction. Squares 1
    /// and 100 are reserved. Each feature kind gets a bounded attempt budget;
    /// a board that falls short of the requested counts is not an error.
    pub fn generate(ladders: usize, snakes: usize, rng: &mut impl Rng) -> Board {
        let mut board = Board::default();
        let mut occupied: HashSet<u16> = HashSet::from([1, BOARD_SIZE]);

        let mut attempts = 0u32;
        while board.ladders.len() < ladders && attempts < GEN_ATTEMPTS {
            let start = rng.gen_range(2..=BOARD_SIZE - GRID_DIM);

            let end_min = start + 1; // at least one square up
            let end_max = (start + 20).min(BOARD_SIZE - 1);
            if end_min >= end_max {
                attempts += 1;
                continue;
            }
            let end = rng.gen_range(end_min..=end_max);

            if !occupied.contains(&start) && !occupied.contains(&end) && row(start) < row(end) {
                board.ladders.insert(start, end);
                occupied.insert(start);
                occupied.insert(end);
            }
            attempts += 1;
        }

        let mut attempts = 0u32;
        while board.snakes.len() < snakes && attempts < GEN_ATTEMPTS {
            let start = rng.gen_range(GRID_DIM + 1..=BOARD_SIZE - 1);

            let end_max = start - 1; // at least one square down
            let end_min = start.saturating_sub(20).max(2);
            if end_min >= end_max {
                attempts += 1;
                continue;
            }
            let end = rng.gen_range(end_min..=end_max);

            if !occupied.contains(&start) && !occupied.contains(&end) && row(start) > row(end) {
                board.snakes.insert(start, end);
                occupied.insert(start);
                occupied.insert(end);
            }
            attempts += 1;
        }

        board
    }

    /// The feature whose start sits on `square`, if any
    pub fn jump(&self, square: u16) -> Option<(Feature, u16)> {
        if let Some(&end) = self.ladders.get(&square) {
            return Some((Feature::Ladder, end));
        }
        if let Some(&end) = self.snakes.get(&square) {
            return Some((Feature::Snake, end));
        }
        None
    }
}

/// What a single roll did, for the status row and the board flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    pub player: usize,
    pub roll: u16,
    /// Tentative square before any redirect
    pub landed: u16,
    /// Feature hit at the tentative square, with its destination
    pub jump: Option<(Feature, u16)>,
    /// Where the piece ended up; keeps the overshoot value past 100
    pub final_pos: u16,
    pub won: bool,
}

/// Main game state
#[derive(Clone)]
pub struct Game {
    pub players: usize,   // Total player count
    pub computers: usize, // Computer players, occupying the highest indexes
    pub board: Board,
    pub positions: Vec<u16>, // Current square per player (may pass 100 on the winning move)
    pub rolls: Vec<u32>,     // Rolls taken per player
    pub current: usize,      // Whose turn it is
    pub winner: Option<usize>,
}

impl Game {
    /// Start a fresh game on a newly generated board, everyone on square 1
    pub fn new(
        players: usize,
        computers: usize,
        ladders: usize,
        snakes: usize,
        rng: &mut impl Rng,
    ) -> Self {
        Game::with_board(players, computers, Board::generate(ladders, snakes, rng))
    }

    /// Start a fresh game on a given board
    pub fn with_board(players: usize, computers: usize, board: Board) -> Self {
        Game {
            players,
            computers,
            board,
            positions: vec![1; players],
            rolls: vec![0; players],
            current: 0,
            winner: None,
        }
    }

    /// Computer players occupy the highest indexes
    pub fn is_computer(&self, player: usize) -> bool {
        player >= self.players - self.computers
    }

    pub fn over(&self) -> bool {
        self.winner.is_some()
    }

    /// Roll the dice for the current player and move the piece
    pub fn roll_and_move(&mut self, rng: &mut impl Rng) -> Option<TurnOutcome> {
        let roll = rng.gen_range(1..=6);
        self.apply_roll(roll)
    }

    /// Advance the current player by `roll`.
    ///
    /// Reaching or passing square 100 wins immediately and skips any feature
    /// check; the position keeps the overshoot value. Below 100 a ladder or
    /// snake start at the tentative square redirects to its end. The turn
    /// passes on cyclically unless the game just ended. Returns None once a
    /// winner exists.
    pub fn apply_roll(&mut self, roll: u16) -> Option<TurnOutcome> {
        if self.winner.is_some() {
            return None;
        }
        let player = self.current;
        self.rolls[player] += 1;
        let landed = self.positions[player] + roll;

        let (jump, final_pos) = if landed >= BOARD_SIZE {
            (None, landed)
        } else if let Some((kind, end)) = self.board.jump(landed) {
            (Some((kind, end)), end)
        } else {
            (None, landed)
        };

        self.positions[player] = final_pos;
        let won = final_pos >= BOARD_SIZE;
        if won {
            self.winner = Some(player);
        } else {
            self.current = (self.current + 1) % self.players;
        }

        Some(TurnOutcome {
            player,
            roll,
            landed,
            jump,
            final_pos,
            won,
        })
    }

    /// Players whose piece draws on `square`; positions past 100 draw at 100
    pub fn players_at(&self, square: u16) -> Vec<usize> {
        self.positions
            .iter()
            .enumerate()
            .filter(|&(_, &pos)| pos.min(BOARD_SIZE) == square)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Record entry for the fewest winning rolls at a table size
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Record {
    pub rolls: u32,   // Rolls the winner needed
    pub date: String, // Date in ISO format (YYYY-MM-DD)
}

/// User configuration and game records
/// Persisted to disk as TOML
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Table setup used for new games
    pub players: usize,
    pub computers: usize,
    pub ladders: usize,
    pub snakes: usize,

    // Fewest-rolls records per total player count
    pub best_2p: Option<Record>,
    pub best_3p: Option<Record>,
    pub best_4p: Option<Record>,

    // Game preferences
    pub ascii_icons: bool, // Use ASCII fallback icons
    pub language: String,  // Language code ("en" or "ko")
}

impl Default for Config {
    fn default() -> Self {
        // Auto-detect system language on first run
        let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
        let lang = if system_lang.to_lowercase().starts_with("ko") {
            "ko".to_string()
        } else {
            "en".to_string()
        };

        Config {
            players: 2,
            computers: 1,
            ladders: 10,
            snakes: 10,
            best_2p: None,
            best_3p: None,
            best_4p: None,
            ascii_icons: false,
            language: lang,
        }
    }
}

impl Config {
    /// Clamp loaded values into the ranges the setup dialog enforces
    pub fn sanitize(&mut self) {
        self.players = self.players.clamp(MIN_PLAYERS, MAX_PLAYERS);
        self.computers = self.computers.min(self.players - 1);
        self.ladders = self.ladders.clamp(MIN_FEATURES, MAX_FEATURES);
        self.snakes = self.snakes.clamp(MIN_FEATURES, MAX_FEATURES);
    }

    /// Get the best roll count for a table size
    pub fn get_record(&self, players: usize) -> Option<u32> {
        self.record_slot(players).map(|r| r.rolls)
    }

    /// Get the best roll count and date for a table size
    pub fn get_record_detail(&self, players: usize) -> Option<(u32, String)> {
        self.record_slot(players)
            .map(|r| (r.rolls, r.date.clone()))
    }

    /// Update the record for a table size if the new roll count is better
    pub fn set_record(&mut self, players: usize, rolls: u32) {
        let date = Local::now().format("%Y-%m-%d").to_string();
        let slot = match players {
            2 => &mut self.best_2p,
            3 => &mut self.best_3p,
            4 => &mut self.best_4p,
            _ => return,
        };
        if slot.as_ref().map_or(true, |r| rolls < r.rolls) {
            *slot = Some(Record { rolls, date });
        }
    }

    fn record_slot(&self, players: usize) -> Option<&Record> {
        match players {
            2 => self.best_2p.as_ref(),
            3 => self.best_3p.as_ref(),
            4 => self.best_4p.as_ref(),
            _ => None,
        }
    }
}

/// Get the configuration file path
/// Uses platform-specific config directory (e.g., ~/.config/xtsnl/xtsnl.toml on Linux)
/// Falls back to current directory if ProjectDirs is unavailable
pub fn config_path() -> Option<PathBuf> {
    // Use ProjectDirs so config is stored under a per-project config directory:
    // ProjectDirs::from("com","xhbl", exe_name) -> config_dir/<exe_name>.toml
    if let Ok(exe) = env::current_exe() {
        if let Some(name) = exe.file_stem().and_then(|s| s.to_str()) {
            if let Some(proj) = ProjectDirs::from("com", "xhbl", name) {
                let mut path = proj.config_dir().to_path_buf();
                path.push(format!("{}.toml", name));
                return Some(path);
            } else {
                // fallback to current directory
                if let Ok(mut path) = env::current_dir() {
                    path.push(format!("{}.toml", name));
                    return Some(path);
                }
            }
        }
    }
    None
}

/// Load configuration from disk, or create default if not found
/// Out-of-range values are clamped rather than rejected
pub fn load_or_create_config() -> Config {
    if let Some(path) = config_path() {
        if path.exists() {
            if let Ok(s) = fs::read_to_string(&path) {
                if let Ok(mut cfg) = toml::from_str::<Config>(&s) {
                    cfg.sanitize();
                    return cfg;
                }
            }
        }
        let cfg = Config::default();
        if let Ok(s) = toml::to_string(&cfg) {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(&path, s);
        }
        return cfg;
    }
    Config::default()
}

/// Save configuration to disk as TOML
pub fn save_config(cfg: &Config) {
    if let Some(path) = config_path() {
        if let Ok(s) = toml::to_string(cfg) {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(&path, s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn ladders_climb_across_rows() {
        for seed in 0..20 {
            let board = Board::generate(10, 10, &mut rng(seed));
            for (&start, &end) in &board.ladders {
                assert!(start < end, "ladder {start}->{end} does not climb");
                assert!((2..=99).contains(&start) && (2..=99).contains(&end));
                assert!(row(start) < row(end), "ladder {start}->{end} stays in its row");
                assert!(end - start <= 20);
            }
        }
    }

    #[test]
    fn snakes_descend_across_rows() {
        for seed in 0..20 {
            let board = Board::generate(10, 10, &mut rng(seed));
            for (&start, &end) in &board.snakes {
                assert!(start > end, "snake {start}->{end} does not descend");
                assert!((2..=99).contains(&start) && (2..=99).contains(&end));
                assert!(row(start) > row(end), "snake {start}->{end} stays in its row");
                assert!(start - end <= 20);
            }
        }
    }

    #[test]
    fn endpoints_are_unique_and_goal_squares_free() {
        for seed in 0..20 {
            let board = Board::generate(10, 10, &mut rng(seed));
            let mut seen = HashSet::new();
            for (&start, &end) in board.ladders.iter().chain(board.snakes.iter()) {
                assert!(seen.insert(start), "square {start} used twice");
                assert!(seen.insert(end), "square {end} used twice");
            }
            assert!(!seen.contains(&1) && !seen.contains(&BOARD_SIZE));
        }
    }

    #[test]
    fn impossible_targets_degrade_silently() {
        // 60 + 60 features cannot fit on 98 usable squares
        let board = Board::generate(60, 60, &mut rng(3));
        assert!(board.ladders.len() < 60);
        assert!(board.snakes.len() < 60);
    }

    #[test]
    fn plain_roll_moves_exactly() {
        let mut game = Game::with_board(2, 0, Board::default());
        let out = game.apply_roll(4).unwrap();
        assert_eq!(out.final_pos, 5);
        assert_eq!(out.jump, None);
        assert!(!out.won);
        assert_eq!(game.positions[0], 5);
        assert_eq!(game.current, 1);
    }

    #[test]
    fn ladder_start_redirects_to_its_end() {
        let mut board = Board::default();
        board.ladders.insert(3, 15);
        let mut game = Game::with_board(2, 0, board);
        let out = game.apply_roll(2).unwrap();
        assert_eq!(out.landed, 3);
        assert_eq!(out.jump, Some((Feature::Ladder, 15)));
        assert_eq!(out.final_pos, 15);
        assert_eq!(game.positions[0], 15);
    }

    #[test]
    fn snake_start_redirects_to_its_end() {
        let mut board = Board::default();
        board.snakes.insert(25, 4);
        let mut game = Game::with_board(2, 0, board);
        game.positions[0] = 20;
        let out = game.apply_roll(5).unwrap();
        assert_eq!(out.jump, Some((Feature::Snake, 4)));
        assert_eq!(game.positions[0], 4);
    }

    #[test]
    fn overshoot_wins_and_keeps_value() {
        let mut game = Game::with_board(2, 0, Board::default());
        game.positions[0] = 97;
        let out = game.apply_roll(6).unwrap();
        assert_eq!(out.final_pos, 103);
        assert!(out.won);
        assert_eq!(game.winner, Some(0));
        // no handoff after the winning roll, and no further rolls accepted
        assert_eq!(game.current, 0);
        assert!(game.apply_roll(3).is_none());
    }

    #[test]
    fn reaching_the_goal_skips_features_below_it() {
        // a snake one square short of the goal still bites...
        let mut board = Board::default();
        board.snakes.insert(99, 12);
        let mut game = Game::with_board(2, 0, board.clone());
        game.positions[0] = 93;
        let out = game.apply_roll(6).unwrap();
        assert_eq!(out.final_pos, 12);
        assert!(!out.won);

        // ...but landing exactly on 100 wins without any feature check
        let mut game = Game::with_board(2, 0, board);
        game.positions[0] = 94;
        let out = game.apply_roll(6).unwrap();
        assert_eq!(out.final_pos, 100);
        assert!(out.won);
        assert_eq!(game.winner, Some(0));
    }

    #[test]
    fn turn_order_cycles() {
        let mut game = Game::with_board(3, 0, Board::default());
        assert_eq!(game.current, 0);
        game.apply_roll(1).unwrap();
        assert_eq!(game.current, 1);
        game.apply_roll(1).unwrap();
        assert_eq!(game.current, 2);
        game.apply_roll(1).unwrap();
        assert_eq!(game.current, 0);
    }

    #[test]
    fn computers_take_the_highest_indexes() {
        let game = Game::with_board(4, 2, Board::default());
        assert!(!game.is_computer(0));
        assert!(!game.is_computer(1));
        assert!(game.is_computer(2));
        assert!(game.is_computer(3));
    }

    #[test]
    fn rolls_are_counted_per_player() {
        let mut game = Game::with_board(2, 0, Board::default());
        game.apply_roll(2).unwrap();
        game.apply_roll(3).unwrap();
        game.apply_roll(4).unwrap();
        assert_eq!(game.rolls, vec![2, 1]);
    }

    #[test]
    fn config_toml_round_trip() {
        let mut cfg = Config::default();
        cfg.players = 4;
        cfg.computers = 3;
        cfg.ladders = 7;
        cfg.best_2p = Some(Record {
            rolls: 17,
            date: "2026-08-01".to_string(),
        });
        let s = toml::to_string(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.players, 4);
        assert_eq!(back.computers, 3);
        assert_eq!(back.ladders, 7);
        assert_eq!(back.get_record(2), Some(17));
        assert_eq!(back.get_record(3), None);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut cfg = Config::default();
        cfg.players = 9;
        cfg.computers = 9;
        cfg.ladders = 0;
        cfg.snakes = 99;
        cfg.sanitize();
        assert_eq!(cfg.players, MAX_PLAYERS);
        assert_eq!(cfg.computers, MAX_PLAYERS - 1);
        assert_eq!(cfg.ladders, MIN_FEATURES);
        assert_eq!(cfg.snakes, MAX_FEATURES);
    }

    #[test]
    fn record_keeps_the_fewest_rolls() {
        let mut cfg = Config::default();
        cfg.set_record(2, 20);
        assert_eq!(cfg.get_record(2), Some(20));
        cfg.set_record(2, 25);
        assert_eq!(cfg.get_record(2), Some(20));
        cfg.set_record(2, 12);
        assert_eq!(cfg.get_record(2), Some(12));
        // other table sizes are independent
        assert_eq!(cfg.get_record(3), None);
    }
}

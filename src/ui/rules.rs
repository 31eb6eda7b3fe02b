pub const ROUND_SECONDS: u32 = 300;
pub const MATCH_POINTS: u32 = 10;
pub const MISMATCH_PENALTY: u32 = 5;
pub const MISMATCH_CLEAR_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameRules {
    pub match_points: u32,
    pub mismatch_penalty: u32,
    pub mismatch_clear_ms: u64,
}

impl Default for GameRules {
    fn default() -> Self {
        GameRules {
            match_points: MATCH_POINTS,
            mismatch_penalty: MISMATCH_PENALTY,
            mismatch_clear_ms: MISMATCH_CLEAR_MS,
        }
    }
}

pub fn flag_enabled(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    matches!(v.as_str(), "1" | "true" | "yes" | "on")
}

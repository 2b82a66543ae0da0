//! Closed-form scores for the simple games. All total, all in `[0, 1]`.

use super::Choice;

pub const DEFAULT_SLIDER_PRIZE: f64 = 100.0;
pub const DEFAULT_BALLOON_MAX_SAFE: u32 = 20;
pub const DEFAULT_BUDGET_TOTAL: u32 = 100;

/// Single shot: 1 for the gamble, 0 for the sure thing.
pub fn single_shot(choice: Choice) -> f64 {
    if choice.is_risky() {
        1.0
    } else {
        0.0
    }
}

/// Switch point over an ordered ladder: position of the first safe choice
/// as a fraction of the ladder. Never switching scores 1, an empty ladder 0.
pub fn switch_point(choices: &[Choice]) -> f64 {
    if choices.is_empty() {
        return 0.0;
    }
    let switch_index = choices
        .iter()
        .position(|c| *c == Choice::Safe)
        .unwrap_or(choices.len());
    switch_index as f64 / choices.len() as f64
}

/// Slider: share of the prize the player refuses to lock in.
pub fn slider(certainty: f64, prize: f64) -> f64 {
    if !(prize > 0.0) || !certainty.is_finite() {
        return 0.0;
    }
    ((prize - certainty) / prize).clamp(0.0, 1.0)
}

/// Balloon: pumps taken, where a pop counts as one more pump of nerve.
pub fn balloon(pumps: u32, popped: bool, max_safe: u32) -> f64 {
    if max_safe == 0 {
        return 0.0;
    }
    let effective = pumps.saturating_add(u32::from(popped));
    effective.min(max_safe) as f64 / max_safe as f64
}

/// Budget split: share of tokens placed on the risky option.
pub fn budget(risky_tokens: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (risky_tokens as f64 / total as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Choice::{Risky, Safe};

    #[test]
    fn test_single_shot() {
        assert_eq!(single_shot(Risky), 1.0);
        assert_eq!(single_shot(Safe), 0.0);
    }

    #[test]
    fn test_switch_point() {
        assert_eq!(switch_point(&[Risky, Risky, Safe, Safe]), 0.5);
        assert_eq!(switch_point(&[Risky, Risky, Risky, Risky]), 1.0);
        assert_eq!(switch_point(&[Safe, Risky, Risky, Risky]), 0.0);
        assert_eq!(switch_point(&[]), 0.0);
        // Only the first switch counts
        assert_eq!(switch_point(&[Risky, Safe, Risky, Risky]), 0.25);
    }

    #[test]
    fn test_slider() {
        assert_eq!(slider(0.0, DEFAULT_SLIDER_PRIZE), 1.0);
        assert_eq!(slider(100.0, DEFAULT_SLIDER_PRIZE), 0.0);
        assert_eq!(slider(150.0, DEFAULT_SLIDER_PRIZE), 0.0);
        assert_eq!(slider(-20.0, DEFAULT_SLIDER_PRIZE), 1.0);
        assert!((slider(25.0, DEFAULT_SLIDER_PRIZE) - 0.75).abs() < 1e-12);
        assert_eq!(slider(10.0, 0.0), 0.0);
        assert_eq!(slider(f64::NAN, 100.0), 0.0);
    }

    #[test]
    fn test_balloon() {
        assert!((balloon(19, false, DEFAULT_BALLOON_MAX_SAFE) - 0.95).abs() < 1e-12);
        assert_eq!(balloon(19, true, DEFAULT_BALLOON_MAX_SAFE), 1.0);
        assert_eq!(balloon(25, true, DEFAULT_BALLOON_MAX_SAFE), 1.0);
        assert_eq!(balloon(0, false, DEFAULT_BALLOON_MAX_SAFE), 0.0);
        assert_eq!(balloon(u32::MAX, true, DEFAULT_BALLOON_MAX_SAFE), 1.0);
        assert_eq!(balloon(3, false, 0), 0.0);
    }

    #[test]
    fn test_budget() {
        assert!((budget(30, DEFAULT_BUDGET_TOTAL) - 0.3).abs() < 1e-12);
        assert_eq!(budget(0, DEFAULT_BUDGET_TOTAL), 0.0);
        assert_eq!(budget(120, DEFAULT_BUDGET_TOTAL), 1.0);
        assert_eq!(budget(5, 0), 0.0);
    }
}

// src/advice.rs - coaching strings and the priority-ordered advice table
use once_cell::sync::Lazy;

// Product copy is Vietnamese; keep the strings verbatim.
pub const RAISE_ARMS_PROMPT: &str = "Hãy giơ tay lên theo hướng dẫn";
pub const KEEP_MOVING_PROMPT: &str = "Hãy di chuyển theo hướng dẫn";
pub const MOVE_WITH_GUIDE: &str = "Hãy di chuyển theo hướng dẫn trong video";
pub const START_FOLLOWING: &str = "Hãy bắt đầu tập theo hướng dẫn";
pub const NEEDS_ADJUSTMENT: &str = "Cần điều chỉnh nhiều hơn";
pub const ALMOST_THERE: &str = "Gần đúng rồi, điều chỉnh thêm một chút nữa";
pub const HOLD_POSE: &str = "Tốt lắm, giữ nguyên tư thế này";
pub const ADJUST_LEFT_ARM: &str = "Tay trái chưa đúng, hãy điều chỉnh lại";
pub const ADJUST_RIGHT_ARM: &str = "Tay phải chưa đúng, hãy điều chỉnh lại";

/// One arm counts as lagging when it scores below this while the other is fine.
const LIMB_LAG_THRESHOLD: f64 = 0.4;
const LIMB_OK_THRESHOLD: f64 = 0.7;

/// Score-band message shared by the scrolling feedback list (smoothed
/// score) and the current-advice rule table (adjusted score). The two call
/// sites stay separate on purpose; only the breakpoints are shared.
pub fn score_band_message(score: f64) -> &'static str {
    if score < 0.2 {
        START_FOLLOWING
    } else if score < 0.5 {
        NEEDS_ADJUSTMENT
    } else if score < 0.8 {
        ALMOST_THERE
    } else {
        HOLD_POSE
    }
}

/// Inputs for one advice selection. `inactive` is the monitor's judgement
/// that the user has been still past the grace period.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdviceContext {
    pub adjusted_score: f64,
    pub left_arm: Option<f64>,
    pub right_arm: Option<f64>,
    pub inactive: bool,
}

struct AdviceRule {
    applies: fn(&AdviceContext) -> bool,
    message: fn(&AdviceContext) -> &'static str,
}

/// First match wins; inactivity outranks everything, limb hints outrank
/// the generic score bands.
static RULES: Lazy<Vec<AdviceRule>> = Lazy::new(|| {
    vec![
        AdviceRule {
            applies: |ctx| ctx.inactive,
            message: |_| MOVE_WITH_GUIDE,
        },
        AdviceRule {
            applies: |ctx| limb_lagging(ctx.left_arm, ctx.right_arm),
            message: |_| ADJUST_LEFT_ARM,
        },
        AdviceRule {
            applies: |ctx| limb_lagging(ctx.right_arm, ctx.left_arm),
            message: |_| ADJUST_RIGHT_ARM,
        },
        AdviceRule {
            applies: |_| true,
            message: |ctx| score_band_message(ctx.adjusted_score),
        },
    ]
});

fn limb_lagging(limb: Option<f64>, other: Option<f64>) -> bool {
    matches!((limb, other), (Some(limb), Some(other))
        if limb < LIMB_LAG_THRESHOLD && other >= LIMB_OK_THRESHOLD)
}

pub fn select_advice(ctx: &AdviceContext) -> &'static str {
    RULES
        .iter()
        .find(|rule| (rule.applies)(ctx))
        .map(|rule| (rule.message)(ctx))
        .unwrap_or(START_FOLLOWING)
}

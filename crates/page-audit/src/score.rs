/// Signals consumed by the score calculator. `title`/`meta_description`
/// are `None` when the element is absent or empty after trimming.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreSignals<'a> {
    pub title: Option<&'a str>,
    pub meta_description: Option<&'a str>,
    pub h1_count: u32,
    pub h2_count: u32,
    pub image_count: u32,
    pub missing_alt_count: u32,
    pub has_meta_viewport: bool,
    pub has_canonical: bool,
}

/// Deterministic additive scoring: start at 100, apply at most one
/// deduction per signal category, clamp to 0..=100. Lengths are counted
/// in characters.
pub fn calculate_score(signals: &ScoreSignals<'_>) -> u8 {
    let mut score: i32 = 100;

    match signals.title {
        None => score -= 15,
        Some(title) => {
            let len = title.chars().count();
            if len < 30 {
                score -= 5;
            } else if len > 60 {
                score -= 5;
            }
        }
    }

    match signals.meta_description {
        None => score -= 20,
        Some(description) => {
            let len = description.chars().count();
            if len < 120 {
                score -= 5;
            } else if len > 160 {
                score -= 5;
            }
        }
    }

    if signals.h1_count == 0 {
        score -= 15;
    } else if signals.h1_count > 1 {
        score -= 10;
    }

    if signals.h2_count == 0 {
        score -= 5;
    }

    if signals.image_count > 0 {
        let missing_pct =
            signals.missing_alt_count as f64 / signals.image_count as f64 * 100.0;
        if missing_pct > 50.0 {
            score -= 15;
        } else if missing_pct > 20.0 {
            score -= 10;
        } else if missing_pct > 0.0 {
            score -= 5;
        }
    }

    if !signals.has_meta_viewport {
        score -= 10;
    }

    if !signals.has_canonical {
        score -= 5;
    }

    score.clamp(0, 100) as u8
}

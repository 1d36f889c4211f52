//! Filesystem-safe names for archived scripts.

use chrono::NaiveDateTime;

/// Default cap on the prompt fragment inside a file name.
pub const DEFAULT_MAX_FRAGMENT_LEN: usize = 50;

/// Reduce a prompt to a lowercase fragment of word characters, hyphens and
/// underscores.
///
/// Everything else is stripped, whitespace runs become single underscores,
/// and the result is cut to `max_len` characters without a trailing
/// underscore.
///
/// # Examples
///
/// ```
/// use manimate_storage::prompt_fragment;
///
/// assert_eq!(prompt_fragment("Draw a Circle!", 50), "draw_a_circle");
/// assert_eq!(prompt_fragment("  pi   approx.  ", 50), "pi_approx");
/// assert_eq!(prompt_fragment("abc def", 4), "abc");
/// ```
pub fn prompt_fragment(prompt: &str, max_len: usize) -> String {
    let lowered = prompt.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    let joined = kept.split_whitespace().collect::<Vec<_>>().join("_");

    if joined.chars().count() <= max_len {
        return joined;
    }
    let truncated: String = joined.chars().take(max_len).collect();
    truncated.trim_end_matches('_').to_string()
}

/// Archive file name: `{timestamp}_{fragment}_{entry}[_attempt{n}].py`.
///
/// The attempt marker appears only for attempts after the first. An
/// empty fragment falls back to `animation`.
pub fn script_file_name(
    prompt: &str,
    entry_point: &str,
    attempt: u32,
    generated_at: NaiveDateTime,
    max_fragment_len: usize,
) -> String {
    let mut fragment = prompt_fragment(prompt, max_fragment_len);
    if fragment.is_empty() {
        fragment = "animation".to_string();
    }
    // Entry points keep their case; only identifier characters survive.
    let entry: String = entry_point
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    let suffix = if attempt > 1 {
        format!("_attempt{}", attempt)
    } else {
        String::new()
    };
    format!(
        "{}_{}_{}{}.py",
        generated_at.format("%Y%m%d_%H%M%S"),
        fragment,
        entry,
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .and_then(|d| d.and_hms_opt(12, 0, 5))
            .expect("valid timestamp")
    }

    #[test]
    fn first_attempt_has_no_marker() {
        let name = script_file_name("draw a circle", "CircleScene", 1, noon(), 50);
        assert_eq!(name, "20250314_120005_draw_a_circle_CircleScene.py");
    }

    #[test]
    fn entry_point_keeps_its_case() {
        let name = script_file_name("Draw A Circle", "My_Circle2D", 1, noon(), 50);
        assert_eq!(name, "20250314_120005_draw_a_circle_My_Circle2D.py");
    }

    #[test]
    fn later_attempts_are_marked() {
        let name = script_file_name("draw a circle", "CircleScene", 3, noon(), 50);
        assert!(name.ends_with("_CircleScene_attempt3.py"));
    }

    #[test]
    fn fragment_respects_bound_and_charset() {
        let prompt = "Explain: the Fourier transform (with/without) windows & phases -- in depth, please!";
        for max_len in [1, 10, 25, 50] {
            let fragment = prompt_fragment(prompt, max_len);
            assert!(fragment.chars().count() <= max_len);
            assert!(!fragment.ends_with('_'));
            assert!(
                fragment
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
            );
        }
    }

    #[test]
    fn punctuation_only_prompt_falls_back() {
        let name = script_file_name("?!", "S", 1, noon(), 50);
        assert_eq!(name, "20250314_120005_animation_S.py");
    }
}

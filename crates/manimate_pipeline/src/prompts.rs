//! System instructions and user-content builders for each gateway call.
//!
//! Script-producing calls share one output schema, so the instructions
//! describe intent and leave the JSON shape to the schema.

use manimate_core::{GeneratedScript, Style};

/// System instruction for initial code generation.
pub const GENERATION_INSTRUCTIONS: &str = "You are an expert Manim animator who creates clear, educational animations.
You write clean, well-commented Python code using Manim Community Edition.
Focus on visual clarity and educational value.

Your animations should:
- Be 15-30 seconds long
- Use clear visual transitions
- Include descriptive comments in the code
- Focus on one core concept
- Be intuitive
- Use proper Manim Community Edition syntax

The code must define exactly one class deriving from Scene, MovingCameraScene or ThreeDScene, and scene_name must be that class's name.";

/// System instruction for the pre-render review.
pub const REVIEW_INSTRUCTIONS: &str = "You are a meticulous Manim reviewer.
You receive a Manim script that has not been rendered yet and return an improved version.

Look for:
- APIs that do not exist in Manim Community Edition
- Text or labels overlapping other elements or leaving the frame
- Objects used before they are created, or removed twice
- Timing that is too fast to follow

Keep the same scene class name and visual concept. Summarise your changes in review_notes and rate your confidence that the script renders cleanly in confidence, from 0 to 1.";

/// System instruction for repairing a failed render.
pub const REPAIR_INSTRUCTIONS: &str = "You are an expert Manim animator who fixes errors in Manim code.
You receive a broken Manim script and an error message, then provide a corrected version.

Your corrections should:
- Fix the specific error mentioned
- Maintain the original intent and visual concept
- Use proper Manim Community Edition syntax
- Keep the same scene structure and duration
- Preserve helpful comments

Describe what you changed in fix_description.";

/// System instruction for brief expansion.
pub const BRIEF_INSTRUCTIONS: &str = "You are an expert educator and animation director.
You turn a short idea into a written brief that a Manim animator can follow without asking questions.

Write plain prose with these sections:
OBJECTIVE: what the viewer should understand afterwards
CONCEPTS: the three to five ideas that must appear
VISUAL STRATEGY: metaphors, colour coding and layout
SEQUENCE: five to eight numbered steps, each with what appears on screen and the insight it builds
TEXT OVERLAYS: the exact on-screen text and when it appears
QUALITY CHECKLIST: concrete checks, including that no text overlaps any visual

Target 20-30 seconds in total.";

/// User content for generation from a raw prompt or an expanded brief.
pub fn generation_prompt(subject: &str, style: Style) -> String {
    format!(
        "Create a Manim animation that visually explains the following.

{subject}

Requirements:
- Animation duration: 15-30 seconds
- Use {palette}
- Include clear visual transitions
- Add descriptive comments in the code
- Focus on one core concept
- Make it intuitive for beginners
- Ensure no text overlaps with visual elements
- Use Manim Community Edition syntax (from manim import *)",
        subject = subject.trim(),
        palette = style.palette(),
    )
}

/// User content asking for a review of `script`.
pub fn review_prompt(script: &GeneratedScript) -> String {
    format!(
        "Review this Manim script before it is rendered and return the improved version.

Scene: {scene}
Description: {description}

```python
{code}
```",
        scene = script.entry_point_name(),
        description = script.description(),
        code = script.source_code(),
    )
}

/// User content asking to repair `source` after it failed with `diagnostic`.
///
/// `attempt` is the render attempt the repaired script will be used for.
pub fn repair_prompt(source: &str, diagnostic: &str, attempt: u32, max_attempts: u32) -> String {
    format!(
        "Fix the following Manim script that failed to render:

**Error Message:**
```
{diagnostic}
```

**Original Code:**
```python
{source}
```

**Attempt:** {attempt}/{max_attempts}

Please analyze the error and provide a corrected version of the code. Focus on:
1. Fixing the specific error mentioned
2. Ensuring proper Manim Community Edition syntax
3. Maintaining the original visual concept
4. Keeping the animation educational and clear",
        diagnostic = diagnostic.trim(),
    )
}

/// User content asking for a brief about `user_prompt`.
pub fn brief_prompt(user_prompt: &str) -> String {
    format!(
        "Expand this idea into a brief for a short educational animation:

\"{}\"",
        user_prompt.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_prompt_uses_palette() {
        let prompt = generation_prompt("  draw a circle ", Style::Dark);
        assert!(prompt.contains("\n\ndraw a circle\n\n"));
        assert!(prompt.contains("dark background with light text"));
    }

    #[test]
    fn repair_prompt_carries_error_and_attempt() {
        let prompt = repair_prompt("x = 1", "NameError: Circl\n", 2, 3);
        assert!(prompt.contains("NameError: Circl\n```"));
        assert!(prompt.contains("```python\nx = 1\n```"));
        assert!(prompt.contains("**Attempt:** 2/3"));
    }
}

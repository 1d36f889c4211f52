//! Render tool check.

use manimate::{ManimRenderer, ManimateConfig, ManimateResult, Renderer, ToolAvailability};

/// Run the installation check and describe the result.
///
/// Returns `Ok(false)` when the tool is unavailable.
pub async fn run_check(config: &ManimateConfig) -> ManimateResult<bool> {
    let renderer = ManimRenderer::new(config.render_settings()?);
    match renderer.check_installation().await {
        ToolAvailability::Available { version } => {
            println!("✓ Manim is installed: {}", version);
            Ok(true)
        }
        ToolAvailability::Unavailable { reason } => {
            println!("✗ {}", reason);
            println!("Install with: pip install manim");
            Ok(false)
        }
    }
}

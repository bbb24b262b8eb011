// Rendering strategies plugged into the render chain, in chain order.

pub mod png;
pub mod remote;
pub mod svg;

pub use png::PngCanvasRenderer;
pub use remote::FallbackServiceRenderer;
pub use svg::SvgRenderer;

use qrcode::{Color, EcLevel, QrCode};

use crate::domain::entities::QR_MARGIN_MODULES;
use crate::domain::errors::RenderError;

// Module grid of an encoded symbol including its quiet zone.
pub(crate) struct ModuleGrid {
    // Modules per side, margin included.
    pub side: u32,
    dark: Vec<bool>,
    symbol_width: u32,
}

impl ModuleGrid {
    pub(crate) fn encode(data: &str) -> Result<Self, RenderError> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::H)
            .map_err(|err| RenderError::Encode(err.to_string()))?;
        let symbol_width = u32::try_from(code.width())
            .map_err(|_| RenderError::Encode("symbol too wide".to_string()))?;
        let dark = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();

        Ok(Self {
            side: symbol_width + 2 * QR_MARGIN_MODULES,
            dark,
            symbol_width,
        })
    }

    /// Dark modules as (x, y) in margin-inclusive coordinates, row by row.
    pub(crate) fn dark_modules(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.symbol_width;
        self.dark
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(move |(index, _)| {
                let index = index as u32;
                (
                    index % width + QR_MARGIN_MODULES,
                    index / width + QR_MARGIN_MODULES,
                )
            })
    }
}

/// Runs CPU-bound rendering on the blocking pool. A panicking render becomes an error.
pub(crate) async fn render_off_runtime<F>(render: F) -> Result<String, RenderError>
where
    F: FnOnce() -> Result<String, RenderError> + Send + 'static,
{
    tokio::task::spawn_blocking(render)
        .await
        .map_err(|err| RenderError::Image(format!("render task failed: {err}")))?
}

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::fmt::Write;

use crate::domain::entities::QR_IMAGE_SIZE;
use crate::domain::errors::RenderError;
use crate::domain::ports::QrRenderer;
use crate::interface_adapters::renderers::{ModuleGrid, render_off_runtime};

pub const SVG_DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";

// In-process vector renderer, black on white.
#[derive(Clone, Debug, Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn render_svg(&self, data: &str) -> Result<String, RenderError> {
        let grid = ModuleGrid::encode(data)?;
        let side = grid.side;

        let mut path = String::new();
        for (x, y) in grid.dark_modules() {
            // Writing into a String cannot fail.
            let _ = write!(path, "M{x} {y}h1v1h-1z");
        }

        Ok(format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" "#,
                r#"viewBox="0 0 {side} {side}" shape-rendering="crispEdges">"#,
                r##"<rect width="{side}" height="{side}" fill="#ffffff"/>"##,
                r##"<path fill="#000000" d="{path}"/></svg>"##
            ),
            size = QR_IMAGE_SIZE,
            side = side,
            path = path,
        ))
    }
}

#[async_trait]
impl QrRenderer for SvgRenderer {
    fn name(&self) -> &str {
        "local-svg"
    }

    async fn render(&self, data: &str) -> Result<String, RenderError> {
        let renderer = self.clone();
        let data = data.to_owned();
        render_off_runtime(move || {
            let svg = renderer.render_svg(&data)?;
            Ok(format!("{SVG_DATA_URL_PREFIX}{}", STANDARD.encode(svg)))
        })
        .await
    }
}

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::io::Cursor;

use crate::domain::entities::QR_IMAGE_SIZE;
use crate::domain::errors::RenderError;
use crate::domain::ports::QrRenderer;
use crate::interface_adapters::renderers::{ModuleGrid, render_off_runtime};

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

// In-process pixel-buffer renderer. Second in the chain, same geometry as the SVG path.
#[derive(Clone, Debug, Default)]
pub struct PngCanvasRenderer;

impl PngCanvasRenderer {
    pub fn paint(&self, data: &str) -> Result<GrayImage, RenderError> {
        let grid = ModuleGrid::encode(data)?;

        // Whole pixels per module, symbol centred on the canvas.
        let scale = (QR_IMAGE_SIZE / grid.side).max(1);
        let canvas = QR_IMAGE_SIZE.max(grid.side * scale);
        let offset = (canvas - grid.side * scale) / 2;

        let mut image = GrayImage::from_pixel(canvas, canvas, LIGHT);
        for (x, y) in grid.dark_modules() {
            let left = offset + x * scale;
            let top = offset + y * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    image.put_pixel(left + dx, top + dy, DARK);
                }
            }
        }

        Ok(image)
    }

    pub fn encode_png(&self, data: &str) -> Result<Vec<u8>, RenderError> {
        let image = self.paint(data)?;
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|err| RenderError::Image(err.to_string()))?;
        Ok(bytes)
    }
}

#[async_trait]
impl QrRenderer for PngCanvasRenderer {
    fn name(&self) -> &str {
        "local-png"
    }

    async fn render(&self, data: &str) -> Result<String, RenderError> {
        let renderer = self.clone();
        let data = data.to_owned();
        render_off_runtime(move || {
            let png = renderer.encode_png(&data)?;
            Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(png)))
        })
        .await
    }
}

//! Feature-importance chart
//!
//! Draws one horizontal bar per feature, ordered by ascending absolute value
//! so the strongest features end up on top. The chart is rendered into an
//! in-memory RGB buffer, encoded as PNG and returned as base64.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbImage};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::FontStyle;
use std::io::Cursor;
use tracing::{debug, info};

use crate::classifier::Prediction;
use crate::config::VisualizerConfig;
use crate::error::{Result, SpamError};
use crate::features::{FeatureSchema, FeatureVector};

const FONT_FAMILY: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
const MAX_Y_LABELS: usize = 40;

/// DejaVu Sans, used unless `visualizer.font_path` overrides it
static BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Renders feature-importance charts
#[derive(Debug, Clone)]
pub struct Visualizer {
    width: u32,
    height: u32,
}

impl Visualizer {
    /// Chart renderer using the bundled font
    pub fn new(width: u32, height: u32) -> Result<Self> {
        register_chart_font(BUNDLED_FONT)?;
        Ok(Self { width, height })
    }

    /// Build from configuration; `font_path` replaces the bundled font
    pub fn from_config(config: &VisualizerConfig) -> Result<Self> {
        match &config.font_path {
            Some(path) => {
                let bytes = std::fs::read(path)?;
                // plotters keeps registered fonts for the whole process
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                register_chart_font(bytes)?;
                info!("Chart font loaded from {}", path.display());
            }
            None => {
                register_chart_font(BUNDLED_FONT)?;
                debug!("Using bundled chart font");
            }
        }

        Ok(Self {
            width: config.width,
            height: config.height,
        })
    }

    /// Render the chart for a prediction as base64 PNG
    pub fn render(&self, features: &FeatureVector, prediction: Prediction) -> Result<String> {
        let importance: Vec<f32> = features.to_dense().iter().map(|v| v.abs()).collect();
        let order = rank_by_importance(&importance);

        let png = self.render_png(&importance, &order, &features.schema(), prediction)?;
        debug!("Rendered {} byte chart for {} features", png.len(), order.len());

        Ok(STANDARD.encode(png))
    }

    fn render_png(
        &self,
        importance: &[f32],
        order: &[usize],
        schema: &FeatureSchema,
        prediction: Prediction,
    ) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];
        let n = order.len().max(1);
        let max = importance.iter().copied().fold(0.0f32, f32::max);
        let x_max = if max > 0.0 && max.is_finite() {
            max as f64 * 1.05
        } else {
            1.0
        };

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .caption(
                    format!("Feature Importance for {} Prediction", prediction),
                    (FONT_FAMILY, 20),
                )
                .x_label_area_size(40)
                .y_label_area_size(self.label_area_width(schema))
                .build_cartesian_2d(0f64..x_max, (0..n).into_segmented())
                .map_err(render_err)?;

            let label_for = |v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(pos) => order
                    .get(*pos)
                    .map(|&idx| schema.label(idx))
                    .unwrap_or_default(),
                _ => String::new(),
            };

            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(n.min(MAX_Y_LABELS))
                .y_label_formatter(&label_for)
                .label_style((FONT_FAMILY, 12))
                .x_desc("Feature Importance")
                .draw()
                .map_err(render_err)?;

            chart
                .draw_series(order.iter().enumerate().map(|(pos, &idx)| {
                    Rectangle::new(
                        [
                            (0.0, SegmentValue::Exact(pos)),
                            (importance[idx] as f64, SegmentValue::Exact(pos + 1)),
                        ],
                        BAR_COLOR.filled(),
                    )
                }))
                .map_err(render_err)?;

            root.present().map_err(render_err)?;
        }

        let image = RgbImage::from_raw(self.width, self.height, buffer)
            .ok_or_else(|| SpamError::Render("chart buffer has the wrong size".to_string()))?;
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        Ok(png)
    }

    fn label_area_width(&self, schema: &FeatureSchema) -> u32 {
        let longest = schema.labels().iter().map(String::len).max().unwrap_or(0);
        ((longest as u32) * 8).min(self.width / 3)
    }
}

/// Feature indices ordered by ascending importance; ties keep index order
pub fn rank_by_importance(importance: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..importance.len()).collect();
    order.sort_by(|&a, &b| importance[a].total_cmp(&importance[b]));
    order
}

fn register_chart_font(bytes: &'static [u8]) -> Result<()> {
    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| SpamError::Render("Invalid chart font".to_string()))
}

fn render_err<E: std::fmt::Display>(e: E) -> SpamError {
    SpamError::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::SenderFeatures;

    #[test]
    fn test_rank_by_importance() {
        let importance = [0.5, 0.1, 2.0, 0.1, 1.0];
        assert_eq!(rank_by_importance(&importance), vec![1, 3, 0, 4, 2]);
    }

    #[test]
    fn test_rank_uses_absolute_values_from_render_input() {
        let v = FeatureVector::assemble(vec![-3.0, 0.5], SenderFeatures::from_sender("JohnSmith"));
        let importance: Vec<f32> = v.to_dense().iter().map(|x| x.abs()).collect();
        assert_eq!(rank_by_importance(&importance), vec![2, 3, 1, 0]);
    }

    #[test]
    fn test_render_produces_png() {
        let visualizer = Visualizer::new(320, 200).unwrap();
        let features = FeatureVector::assemble(
            vec![0.3, -0.7, 0.1, 0.0],
            SenderFeatures::from_sender("12345"),
        );

        let encoded = visualizer.render(&features, Prediction::Spam).unwrap();
        assert!(!encoded.is_empty());

        let png = STANDARD.decode(&encoded).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!(decoded.width(), 320);
        assert_eq!(decoded.height(), 200);
    }

    #[test]
    fn test_render_all_zero_features() {
        let visualizer = Visualizer::new(200, 120).unwrap();
        let features = FeatureVector::assemble(vec![0.0; 8], SenderFeatures::from_sender("JohnSmith"));
        assert!(visualizer.render(&features, Prediction::Ham).is_ok());
    }

    #[test]
    fn test_default_config_title_follows_prediction() {
        let visualizer = Visualizer::from_config(&VisualizerConfig {
            width: 400,
            height: 240,
            font_path: None,
        })
        .unwrap();
        let features = FeatureVector::assemble(
            vec![0.4, -0.2, 0.9],
            SenderFeatures::from_sender("12345"),
        );

        let spam = visualizer.render(&features, Prediction::Spam).unwrap();
        let ham = visualizer.render(&features, Prediction::Ham).unwrap();
        assert_ne!(spam, ham);
    }

    #[test]
    fn test_labels_are_drawn() {
        // Same bar lengths, different label text
        let visualizer = Visualizer::new(400, 240).unwrap();
        let numeric = FeatureVector::assemble(vec![0.5, 0.5], SenderFeatures::from_sender("12345678"));
        let short = FeatureVector::assemble(vec![0.5, 0.5], SenderFeatures::from_sender("GCash"));

        let a = visualizer.render(&numeric, Prediction::Ham).unwrap();
        let b = visualizer.render(&short, Prediction::Ham).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_config_missing_font_fails() {
        let config = VisualizerConfig {
            width: 100,
            height: 100,
            font_path: Some("/nonexistent/font.ttf".into()),
        };
        assert!(Visualizer::from_config(&config).is_err());
    }
}

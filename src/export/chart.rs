//! Bar chart raster for embedding into workbooks.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use super::{
    ExportError,
    font::{self, ADVANCE, GLYPH_HEIGHT},
};
use crate::dto::statistics::ChartSeries;

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 400;

const MARGIN_LEFT: u32 = 70;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 30;
const MARGIN_BOTTOM: u32 = 50;
const GRID_STEPS: u32 = 5;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const BAR: Rgb<u8> = Rgb([75, 192, 192]);
const TEXT: Rgb<u8> = Rgb([40, 40, 40]);

/// Geometry of one drawn bar, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

fn plot_width() -> u32 {
    CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> u32 {
    CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

/// Largest value, or 1 when there is nothing positive to scale against.
pub fn scale_max(values: &[f64]) -> f64 {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    if max > 0.0 { max } else { 1.0 }
}

/// Bar rectangles for `values`; negative and non-finite values get zero height.
pub fn layout_bars(values: &[f64]) -> Vec<BarRect> {
    if values.is_empty() {
        return Vec::new();
    }
    let max = scale_max(values);
    let slot = plot_width() as f64 / values.len() as f64;
    let bar_width = ((slot * 0.6).floor() as u32).max(1);
    let baseline = MARGIN_TOP + plot_height();

    values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let ratio = if value.is_finite() { (value / max).clamp(0.0, 1.0) } else { 0.0 };
            let height = (ratio * plot_height() as f64).round() as u32;
            let x = MARGIN_LEFT + (slot * idx as f64 + (slot - bar_width as f64) / 2.0) as u32;
            BarRect {
                x,
                y: baseline - height,
                width: bar_width,
                height,
            }
        })
        .collect()
}

/// `1.5M`, `150K`, `950`.
pub fn compact_amount(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };
    let text = format!("{scaled:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}{suffix}")
}

/// Draw the series and encode it as PNG.
pub fn render_bar_chart(series: &ChartSeries) -> Result<Vec<u8>, ExportError> {
    let image = draw_bar_chart(series);
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn draw_bar_chart(series: &ChartSeries) -> RgbImage {
    let mut img = RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, BACKGROUND);
    let max = scale_max(&series.values);
    let baseline = MARGIN_TOP + plot_height();

    for step in 0..=GRID_STEPS {
        let y = baseline - plot_height() * step / GRID_STEPS;
        if step > 0 {
            fill_rect(&mut img, MARGIN_LEFT + 1, y, plot_width(), 1, GRID);
        }
        let label = compact_amount(max * step as f64 / GRID_STEPS as f64);
        let x = MARGIN_LEFT.saturating_sub(font::text_width(&label, 1) + 6);
        draw_text(&mut img, x, y.saturating_sub(GLYPH_HEIGHT / 2), &label, 1, TEXT);
    }

    let bars = layout_bars(&series.values);
    let slot = if bars.is_empty() {
        plot_width()
    } else {
        plot_width() / bars.len() as u32
    };
    for ((bar, label), value) in bars.iter().zip(&series.labels).zip(&series.values) {
        fill_rect(&mut img, bar.x, bar.y, bar.width, bar.height, BAR);

        let value_label = compact_amount(*value);
        let center = bar.x + bar.width / 2;
        let vx = center.saturating_sub(font::text_width(&value_label, 1) / 2);
        let vy = bar.y.saturating_sub(GLYPH_HEIGHT + 4);
        draw_text(&mut img, vx, vy, &value_label, 1, TEXT);

        let label = fit_label(label, slot);
        let lx = center.saturating_sub(font::text_width(&label, 1) / 2);
        draw_text(&mut img, lx, baseline + 8, &label, 1, TEXT);
    }

    fill_rect(&mut img, MARGIN_LEFT, MARGIN_TOP, 1, plot_height() + 1, AXIS);
    fill_rect(&mut img, MARGIN_LEFT, baseline, plot_width(), 1, AXIS);

    img
}

/// Truncate so the label stays inside its slot.
fn fit_label(label: &str, slot: u32) -> String {
    let max_chars = (slot / ADVANCE).max(1) as usize;
    label.chars().take(max_chars).collect()
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(width).min(img.width());
    let y_end = y.saturating_add(height).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str, scale: u32, color: Rgb<u8>) {
    let mut cursor = x;
    for ch in text.chars() {
        if let Some(rows) = font::glyph(ch) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..font::GLYPH_WIDTH {
                    if bits & (0x10 >> col) != 0 {
                        let px = cursor + col * scale;
                        let py = y + row as u32 * scale;
                        fill_rect(img, px, py, scale, scale, color);
                    }
                }
            }
        }
        cursor += ADVANCE * scale;
    }
}

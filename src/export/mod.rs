pub mod chart;
pub mod font;
pub mod workbook;

use thiserror::Error;

pub use chart::render_bar_chart;
pub use workbook::{WorkbookFile, invoice_workbook, statistics_workbook};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("chart rendering failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("workbook generation failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

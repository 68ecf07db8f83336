//! `.xlsx` builders for the statistics report and single invoices.

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Image, Workbook, Worksheet};

use super::{ExportError, chart::render_bar_chart};
use crate::{
    dto::{invoices::InvoiceView, statistics::StatisticsView},
    pricing::format_vnd,
};

pub const STATISTICS_HEADERS: [&str; 4] = ["Mã HĐ", "Ngày đặt", "Tổng tiền", "Nhân viên"];
pub const INVOICE_HEADERS: [&str; 6] =
    ["STT", "Sản phẩm", "Đơn giá", "Số lượng", "Giảm giá", "Thành tiền"];

/// Chart image top-left cell: row 2, column F.
pub const CHART_ANCHOR: (u32, u16) = (1, 5);

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Finished workbook plus the name it should be downloaded as.
#[derive(Debug)]
pub struct WorkbookFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl WorkbookFile {
    pub fn content_type(&self) -> &'static str {
        XLSX_MIME
    }
}

/// One table row of the statistics sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsRow {
    pub order_id: i64,
    pub order_date: String,
    pub total: f64,
    pub employee_name: String,
}

/// `ThongKeHoaDon_3-2025.xlsx`, `ThongKeHoaDon_TatCa.xlsx`.
pub fn statistics_filename(month_label: &str) -> String {
    format!("ThongKeHoaDon_{}.xlsx", month_label.replace('/', "-"))
}

pub fn invoice_filename(order_id: i64) -> String {
    format!("HoaDon_{order_id}.xlsx")
}

fn display_date(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

pub fn statistics_table(view: &StatisticsView) -> Vec<StatisticsRow> {
    view.rows
        .iter()
        .map(|row| StatisticsRow {
            order_id: row.order_id,
            order_date: display_date(row.order_date),
            total: row.total_price,
            employee_name: row.employee_name.clone().unwrap_or_default(),
        })
        .collect()
}

struct Formats {
    header: Format,
    cell: Format,
    money: Format,
    percent: Format,
    title: Format,
    label: Format,
}

impl Formats {
    fn new() -> Self {
        let cell = Format::new().set_border(FormatBorder::Thin);
        Self {
            header: cell
                .clone()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(Color::RGB(0xD9EAD3)),
            money: cell.clone().set_num_format("#,##0"),
            percent: cell.clone().set_num_format("0%"),
            cell,
            title: Format::new().set_bold().set_font_size(14),
            label: Format::new().set_bold(),
        }
    }
}

fn write_header(sheet: &mut Worksheet, row: u32, titles: &[&str], format: &Format) -> Result<(), ExportError> {
    for (col, title) in titles.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *title, format)?;
    }
    Ok(())
}

/// Bordered invoice table with the bar chart raster beside it.
///
/// An empty view still produces a valid workbook: header row only and a
/// chart with no bars.
pub fn statistics_workbook(view: &StatisticsView) -> Result<WorkbookFile, ExportError> {
    let chart = render_bar_chart(&view.series)?;
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("ThongKe")?;
    write_header(sheet, 0, &STATISTICS_HEADERS, &formats.header)?;

    for (idx, row) in statistics_table(view).iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_number_with_format(r, 0, row.order_id as f64, &formats.cell)?;
        sheet.write_string_with_format(r, 1, &row.order_date, &formats.cell)?;
        sheet.write_number_with_format(r, 2, row.total, &formats.money)?;
        sheet.write_string_with_format(r, 3, &row.employee_name, &formats.cell)?;
    }
    sheet.autofit();

    let image = Image::new_from_buffer(&chart)?;
    sheet.insert_image(CHART_ANCHOR.0, CHART_ANCHOR.1, &image)?;

    Ok(WorkbookFile {
        filename: statistics_filename(&view.month),
        bytes: workbook.save_to_buffer()?,
    })
}

pub fn invoice_workbook(invoice: &InvoiceView) -> Result<WorkbookFile, ExportError> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("HoaDon")?;
    sheet.write_string_with_format(0, 0, format!("HÓA ĐƠN {}", invoice.invoice_label), &formats.title)?;

    let customer = invoice.customer.as_ref().map(|c| c.name.as_str()).unwrap_or_default();
    let employee = invoice.employee.as_ref().map(|e| e.name.as_str()).unwrap_or_default();
    let info = [
        ("Ngày đặt", display_date(invoice.order_date)),
        ("Khách hàng", customer.to_string()),
        ("Nhân viên", employee.to_string()),
        ("Giao đến", invoice.shipping.address.clone()),
        ("Ghi chú", invoice.notes.clone().unwrap_or_default()),
    ];
    for (idx, (label, value)) in info.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string_with_format(r, 0, *label, &formats.label)?;
        sheet.write_string(r, 1, value)?;
    }

    let header_row = info.len() as u32 + 2;
    write_header(sheet, header_row, &INVOICE_HEADERS, &formats.header)?;

    let mut r = header_row;
    for (idx, line) in invoice.lines.iter().enumerate() {
        r += 1;
        sheet.write_number_with_format(r, 0, (idx + 1) as f64, &formats.cell)?;
        sheet.write_string_with_format(r, 1, &line.product_name, &formats.cell)?;
        sheet.write_number_with_format(r, 2, line.unit_price, &formats.money)?;
        sheet.write_number_with_format(r, 3, line.quantity, &formats.cell)?;
        sheet.write_number_with_format(r, 4, line.discount, &formats.percent)?;
        sheet.write_number_with_format(r, 5, line.line_total, &formats.money)?;
    }

    let totals = [
        ("Tạm tính", invoice.subtotal),
        ("Phí vận chuyển", invoice.freight),
        ("Tổng cộng", invoice.total),
    ];
    for (label, amount) in totals {
        r += 1;
        sheet.write_string_with_format(r, 4, label, &formats.label)?;
        sheet.write_number_with_format(r, 5, amount, &formats.money)?;
    }
    r += 1;
    sheet.write_string(r, 5, format_vnd(invoice.total))?;
    sheet.autofit();

    Ok(WorkbookFile {
        filename: invoice_filename(invoice.order_id),
        bytes: workbook.save_to_buffer()?,
    })
}

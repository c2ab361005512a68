use rust_xlsxwriter::*;

use crate::database::collection::Record;
use crate::error::Result;
use crate::models::contact_request::ContactRequest;
use crate::models::job_application::JobApplication;
use crate::models::status::{ApplicationStatus, ContactStatus, Workflow};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const EMPTY: &str = "—";

/// A data row; the status cell is painted with its own color.
struct ReportRow {
    cells: Vec<String>,
    status_column: usize,
    status_color: Color,
}

pub struct ExportService;

impl ExportService {
    pub fn contact_requests_xlsx(requests: &[Record<ContactRequest>]) -> Result<Vec<u8>> {
        let columns = [
            ("Folio", 24.0),
            ("Fecha", 18.0),
            ("Contacto", 28.0),
            ("Empresa", 26.0),
            ("Email", 30.0),
            ("Teléfono", 16.0),
            ("Sucursal", 16.0),
            ("Ubicación", 20.0),
            ("Presupuesto", 20.0),
            ("Descripción", 60.0),
            ("Estado", 16.0),
            ("Asignado a", 26.0),
            ("Notas", 40.0),
        ];
        let rows = requests
            .iter()
            .map(|record| {
                let r = &record.data;
                ReportRow {
                    cells: vec![
                        r.tracking_id.clone(),
                        record.created_at.format("%d/%m/%Y %H:%M").to_string(),
                        r.contact_name.clone(),
                        or_dash(r.company_name.as_deref()),
                        r.email.clone(),
                        r.phone.clone(),
                        or_dash(r.branch_id.as_deref()),
                        or_dash(r.location.as_deref()),
                        r.budget.map(|b| b.label().to_string()).unwrap_or_else(|| EMPTY.into()),
                        r.description.clone(),
                        contact_status_label(r.status).to_string(),
                        or_dash(r.assigned_to.as_deref()),
                        or_dash(r.notes.as_deref()),
                    ],
                    status_column: 10,
                    status_color: contact_status_color(r.status),
                }
            })
            .collect::<Vec<_>>();

        let summary = ContactStatus::ALL
            .iter()
            .map(|status| {
                let count = requests.iter().filter(|r| r.data.status == *status).count();
                format!("{}: {}", contact_status_label(*status), count)
            })
            .collect::<Vec<_>>()
            .join(" | ");

        write_report("Solicitudes de contacto", &columns, &rows, &summary)
    }

    pub fn job_applications_xlsx(applications: &[Record<JobApplication>]) -> Result<Vec<u8>> {
        let columns = [
            ("Fecha", 18.0),
            ("Nombre", 30.0),
            ("Vacante", 28.0),
            ("Email", 30.0),
            ("Teléfono", 16.0),
            ("Ciudad", 18.0),
            ("Escolaridad", 22.0),
            ("Experiencia", 50.0),
            ("Pretensión salarial", 18.0),
            ("Disponibilidad", 20.0),
            ("CV", 40.0),
            ("Estado", 16.0),
            ("Notas", 40.0),
        ];
        let rows = applications
            .iter()
            .map(|record| {
                let a = &record.data;
                ReportRow {
                    cells: vec![
                        record.created_at.format("%d/%m/%Y %H:%M").to_string(),
                        a.full_name(),
                        a.job_title.clone(),
                        a.email.clone(),
                        a.phone.clone(),
                        or_dash(a.city.as_deref()),
                        a.education_level.label().to_string(),
                        or_dash(a.experience.as_deref()),
                        or_dash(a.expected_salary.as_deref()),
                        or_dash(a.availability.as_deref()),
                        or_dash(a.cv_url.as_deref()),
                        application_status_label(a.status).to_string(),
                        or_dash(a.notes.as_deref()),
                    ],
                    status_column: 11,
                    status_color: application_status_color(a.status),
                }
            })
            .collect::<Vec<_>>();

        let summary = ApplicationStatus::ALL
            .iter()
            .map(|status| {
                let count = applications.iter().filter(|a| a.data.status == *status).count();
                format!("{}: {}", application_status_label(*status), count)
            })
            .collect::<Vec<_>>()
            .join(" | ");

        write_report("Postulaciones", &columns, &rows, &summary)
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or(EMPTY).to_string()
}

fn contact_status_label(status: ContactStatus) -> &'static str {
    match status {
        ContactStatus::Pendiente => "Pendiente",
        ContactStatus::Asignada => "Asignada",
        ContactStatus::EnProceso => "En proceso",
        ContactStatus::Resuelta => "Resuelta",
    }
}

fn contact_status_color(status: ContactStatus) -> Color {
    match status {
        ContactStatus::Pendiente => Color::RGB(0xF59E0B),
        ContactStatus::Asignada => Color::RGB(0x3B82F6),
        ContactStatus::EnProceso => Color::RGB(0x8B5CF6),
        ContactStatus::Resuelta => Color::RGB(0x10B981),
    }
}

fn application_status_label(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Nueva => "Nueva",
        ApplicationStatus::Revisada => "Revisada",
        ApplicationStatus::Entrevista => "Entrevista",
        ApplicationStatus::Contratada => "Contratada",
        ApplicationStatus::Rechazada => "Rechazada",
    }
}

fn application_status_color(status: ApplicationStatus) -> Color {
    match status {
        ApplicationStatus::Nueva => Color::RGB(0x3B82F6),
        ApplicationStatus::Revisada => Color::RGB(0xF59E0B),
        ApplicationStatus::Entrevista => Color::RGB(0x8B5CF6),
        ApplicationStatus::Contratada => Color::RGB(0x10B981),
        ApplicationStatus::Rechazada => Color::RGB(0xEF4444),
    }
}

fn write_report(title: &str, columns: &[(&str, f64)], rows: &[ReportRow], summary: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(title)?;

    let primary_color = Color::RGB(0x1E293B);
    let header_bg = Color::RGB(0x0F172A);
    let alt_row = Color::RGB(0xF8FAFC);
    let border_color = Color::RGB(0xE2E8F0);
    let last_col = (columns.len() - 1) as u16;

    for (i, (_, width)) in columns.iter().enumerate() {
        worksheet.set_column_width(i as u16, *width)?;
    }

    let title_format = Format::new()
        .set_font_size(16)
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(primary_color)
        .set_align(FormatAlign::CenterAcross)
        .set_align(FormatAlign::VerticalCenter);
    worksheet.set_row_height(0, 40)?;
    worksheet.merge_range(0, 0, 0, last_col, title, &title_format)?;

    let subtitle_format = Format::new()
        .set_font_size(10)
        .set_italic()
        .set_font_color(Color::RGB(0x94A3B8))
        .set_background_color(primary_color)
        .set_align(FormatAlign::CenterAcross)
        .set_align(FormatAlign::VerticalCenter);
    worksheet.set_row_height(1, 22)?;
    let subtitle = format!(
        "Exportado: {}  •  Registros: {}",
        chrono::Utc::now().format("%d/%m/%Y %H:%M UTC"),
        rows.len()
    );
    worksheet.merge_range(1, 0, 1, last_col, &subtitle, &subtitle_format)?;

    let header_format = Format::new()
        .set_bold()
        .set_font_size(10)
        .set_font_color(Color::White)
        .set_background_color(header_bg)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
        .set_border_color(border_color);
    let header_row = 2;
    worksheet.set_row_height(header_row, 30)?;
    for (i, (name, _)) in columns.iter().enumerate() {
        worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
    }

    let data_start_row = 3;
    for (idx, report_row) in rows.iter().enumerate() {
        let row = data_start_row + idx as u32;
        let bg = if idx % 2 == 0 { alt_row } else { Color::White };
        let base_fmt = Format::new()
            .set_font_size(10)
            .set_background_color(bg)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let status_fmt = Format::new()
            .set_font_size(10)
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(report_row.status_color)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);

        for (col, value) in report_row.cells.iter().enumerate() {
            let fmt = if col == report_row.status_column { &status_fmt } else { &base_fmt };
            worksheet.write_string_with_format(row, col as u16, value, fmt)?;
        }
    }

    let total_row = data_start_row + rows.len() as u32 + 1;
    let summary_fmt = Format::new()
        .set_bold()
        .set_font_size(10)
        .set_font_color(primary_color)
        .set_background_color(Color::RGB(0xE0E7FF))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(border_color);
    worksheet.set_row_height(total_row, 26)?;
    worksheet.merge_range(total_row, 0, total_row, last_col, summary, &summary_fmt)?;

    worksheet.set_freeze_panes(3, 0)?;
    let last_data_row = (data_start_row + rows.len() as u32).saturating_sub(1).max(header_row);
    worksheet.autofilter(header_row, 0, last_data_row, last_col)?;

    Ok(workbook.save_to_buffer()?)
}

use crate::aggregate::{Capped, Denominator, UrlCount};
use crate::analysis::AnalysisState;
use crate::report::{StatusReport, StatusRow};
use crate::results::LinkRecord;
use crate::utils::{format_count, truncate_cell};

/// Longest cell printed in a detail table
const MAX_CELL_CHARS: usize = 70;

const RULE: &str = "--------------------------------------------------------------------------------";

const PRIORITY_LEGEND: &str = "\
🔴 PRIORIDAD CRÍTICA (Solucionar Inmediatamente):
  - 404 - Not Found: Enlaces rotos que generan error al usuario. Corregir o redirigir las URLs.
  - 403 - Forbidden: Recursos bloqueados sin permisos de acceso. Verificar configuración del servidor.
  - 400 - Bad Request: Solicitudes mal formadas. Revisar estructura de las URLs.

🟡 PRIORIDAD MEDIA (Revisar y Optimizar):
  - 301 - Moved Permanently: Redirecciones permanentes. Evaluar si son necesarias (afectan velocidad).
  - 302 - Found: Redirecciones temporales. Verificar si deberían ser permanentes (301).
";

/// Short Spanish description of a status code
pub fn status_label(status: u16) -> &'static str {
    match status {
        301 => "Redirección",
        302 => "Redirección Temporal",
        308 => "Redirección Permanente",
        400 => "Bad Request",
        403 => "Prohibido",
        404 => "No Encontrado",
        500 => "Error del Servidor",
        _ => "Otro",
    }
}

/// Render the report as terminal text
pub fn text(report: &StatusReport) -> String {
    let mut out = String::new();

    out.push_str("🔍 Informe de Enlaces Problemáticos - Análisis SEO Técnico\n");
    out.push_str(
        "Identificación y diagnóstico de errores 404, redirecciones y problemas de acceso\n",
    );
    out.push_str(RULE);
    out.push('\n');

    write_summary(&mut out, report);
    write_distribution(&mut out, report);
    write_not_found(&mut out, report);
    write_redirects(&mut out, report);
    write_critical(&mut out, report);
    write_top_urls(&mut out, report);

    out.push_str("\n🎯 Códigos a Solucionar por Orden de Prioridad:\n\n");
    out.push_str(PRIORITY_LEGEND);
    out
}

/// Render the report as pretty-printed JSON
pub fn json(report: &StatusReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Render the AI analysis section for the current state
pub fn analysis(state: &AnalysisState) -> String {
    let mut out = String::new();
    out.push_str("\n🤖 Análisis Inteligente con IA\n");
    out.push_str(RULE);
    out.push('\n');

    match state {
        AnalysisState::Disabled { guidance } => {
            out.push_str(guidance);
            out.push('\n');
        }
        AnalysisState::Idle => {
            out.push_str("Usa --analyze para generar el análisis.\n");
        }
        AnalysisState::Completed(result) => {
            out.push_str("📋 Análisis Generado\n\n");
            out.push_str(result.text());
            out.push('\n');
        }
    }
    out
}

fn total_label(denominator: Denominator) -> &'static str {
    match denominator {
        Denominator::Links => "Total de Enlaces",
        Denominator::DistinctDestinations => "Total de URLs de Destino",
    }
}

fn write_summary(out: &mut String, report: &StatusReport) {
    let metrics = &report.metrics;
    out.push_str("\n📊 1. Resumen Ejecutivo\n\n");
    out.push_str(&format!("  {}: {}\n", total_label(report.denominator), format_count(metrics.total)));
    out.push_str(&format!("  🔴 Errores 404: {}\n", format_count(metrics.not_found)));
    out.push_str(&format!("  🚫 Errores 403: {}\n", format_count(metrics.forbidden)));
    out.push_str(&format!("  ⛔ Errores 400: {}\n", format_count(metrics.bad_request)));
    out.push_str(&format!("  ↪️ Redirecciones: {}\n", format_count(metrics.redirects)));
}

fn write_distribution(out: &mut String, report: &StatusReport) {
    out.push_str("\n📈 2. Distribución de Códigos de Estado\n\n");
    out.push_str("Resumen Visual\n");
    for card in &report.cards {
        let heading = format!("{} - {}", card.status, status_label(card.status));
        out.push_str(&format!("  {:<32} {:>8}  {:>5.1}%\n", heading, format_count(card.count), card.percentage));
    }

    out.push_str("\nTabla Detallada\n");
    let rows = report
        .distribution
        .iter()
        .map(|StatusRow { status, count, percentage }| {
            vec![
                status.to_string(),
                format_count(*count),
                format!("{:.1}%", percentage),
            ]
        })
        .collect();
    out.push_str(&table(&["Código", "Cantidad", "Porcentaje"], rows));
}

fn write_not_found(out: &mut String, report: &StatusReport) {
    out.push_str("\n🔴 3. Detalle de Errores 404 (Enlaces Rotos)\n\n");
    let subset = &report.not_found;
    if subset.total == 0 {
        out.push_str("✅ ¡Excelente! No se encontraron enlaces rotos (404)\n");
        return;
    }

    out.push_str(&format!("Se encontraron {} enlaces rotos que deben ser corregidos:\n", format_count(subset.total)));
    let rows = subset
        .items
        .iter()
        .map(|r| vec![r.source.clone(), r.destination.clone(), anchor_cell(r)])
        .collect();
    out.push_str(&table(
        &[
            "Página de Origen (Desde)",
            "URL Rota (Hasta)",
            "Texto del Enlace",
        ],
        rows,
    ));
    write_omitted(out, subset);
}

fn write_redirects(out: &mut String, report: &StatusReport) {
    out.push_str(&format!("\n↪️ 4. Análisis de Redirecciones ({})\n\n", join_codes(&report.redirect_codes, "/")));
    let subset = &report.redirects;
    if subset.total == 0 {
        out.push_str("✅ No se encontraron redirecciones\n");
        return;
    }

    out.push_str(&format!("Se encontraron {} redirecciones:\n", format_count(subset.total)));
    let rows = subset
        .items
        .iter()
        .map(|r| vec![r.source.clone(), r.destination.clone(), r.status.to_string()])
        .collect();
    out.push_str(&table(
        &["Página de Origen", "URL de Destino", "Tipo"],
        rows,
    ));
    write_omitted(out, subset);
}

fn write_critical(out: &mut String, report: &StatusReport) {
    let codes = join_codes(&report.critical_codes, ", ");
    out.push_str(&format!("\n⚠️ 5. Otros Errores Críticos ({})\n\n", codes));
    let subset = &report.critical;
    if subset.total == 0 {
        out.push_str(&format!("✅ No se encontraron errores {}\n", codes));
        return;
    }

    out.push_str(&format!("Se encontraron {} errores críticos:\n", format_count(subset.total)));
    let rows = subset
        .items
        .iter()
        .map(|r| {
            vec![
                r.source.clone(),
                r.destination.clone(),
                r.status.to_string(),
                anchor_cell(r),
            ]
        })
        .collect();
    out.push_str(&table(
        &["Página de Origen", "URL con Error", "Código", "Texto del Enlace"],
        rows,
    ));
    write_omitted(out, subset);
}

fn write_top_urls(out: &mut String, report: &StatusReport) {
    out.push_str("\n🧭 6. Páginas con Más Enlaces Problemáticos\n\n");
    out.push_str(&url_count_table("Página de Origen", &report.top_sources));

    if !report.top_destinations.is_empty() {
        out.push_str("\nURLs de destino más enlazadas\n");
        out.push_str(&url_count_table("URL de Destino", &report.top_destinations));
    }

    if let Some(anchors) = &report.not_found_anchors {
        if !anchors.items.is_empty() {
            out.push_str("\nTextos de enlace que apuntan a 404\n");
            for anchor in &anchors.items {
                out.push_str(&format!("  - {}\n", anchor));
            }
            if anchors.omitted > 0 {
                out.push_str(&format!("  … y {} más omitidos\n", anchors.omitted));
            }
        }
    }
}

fn url_count_table(heading: &str, urls: &[UrlCount]) -> String {
    let rows = urls
        .iter()
        .map(|u| vec![u.url.clone(), format_count(u.count)])
        .collect();
    table(&[heading, "Enlaces"], rows)
}

fn write_omitted<T>(out: &mut String, subset: &Capped<T>) {
    if subset.omitted > 0 {
        out.push_str(&format!("ℹ️ Mostrando los primeros {} de {} ({} más omitidos)\n", subset.items.len(), format_count(subset.total), format_count(subset.omitted)));
    }
}

fn anchor_cell(record: &LinkRecord) -> String {
    record.anchor.clone().unwrap_or_default()
}

fn join_codes(codes: &[u16], separator: &str) -> String {
    codes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Left-aligned plain text table with a dashed rule under the header
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| {
            row.iter()
                .map(|cell| truncate_cell(cell, MAX_CELL_CHARS))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut out, &rule, &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&format!("  {}\n", line.trim_end()));
}

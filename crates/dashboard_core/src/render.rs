//! Projections from dashboard state to the rendered page.
//!
//! Every builder here is pure: it reads state and returns a fresh view that
//! replaces whatever was rendered before.

use std::fmt::Write;

use shared::domain::{Announcement, DocumentLink, Record};

use crate::{
    aggregate::{ranked, Aggregates, DashboardTotals},
    charts::{client_chart, collaborator_chart, ChartSpec},
    documents::DOCUMENTS,
    format::{escape_html, fixed1, hours_cell, long_date},
    schema::Field,
    state::DashboardState,
};

const RECENT_LIMIT: usize = 3;
const DEFAULT_AUTHOR: &str = "NOEM";
const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilters {
    /// Matched against the full text of each hours table row.
    pub search: String,
    pub collaborator: String,
    pub client: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoursRow {
    pub cells: [String; 5],
    pub visible: bool,
}

impl HoursRow {
    pub fn text(&self) -> String {
        self.cells.join(" ")
    }
}

pub fn hours_rows(records: &[Record], search: &str) -> Vec<HoursRow> {
    let query = search.to_lowercase();
    records
        .iter()
        .map(|record| {
            let cells = [
                Field::Collaborator.resolve_or(record, "").to_string(),
                Field::Client.resolve_or(record, "").to_string(),
                hours_cell(Field::Hours.resolve_or(record, "")),
                Field::Tasks.resolve_or(record, "").to_string(),
                Field::Week.resolve_or(record, "").to_string(),
            ];
            let mut row = HoursRow {
                cells,
                visible: true,
            };
            row.visible = row.text().to_lowercase().contains(&query);
            row
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorCard {
    pub name: String,
    pub hours_label: String,
    pub recent_clients: String,
    /// Newest first.
    pub recent_tasks: Vec<String>,
}

pub fn collaborator_cards(aggregates: &Aggregates, filter: &str) -> Vec<CollaboratorCard> {
    ranked(aggregates.collaborators.iter(), filter)
        .into_iter()
        .map(|summary| {
            let recent_clients = summary.clients.last(RECENT_LIMIT).join(", ");
            CollaboratorCard {
                name: summary.name.clone(),
                hours_label: format!("{} h", fixed1(summary.hours)),
                recent_clients: or_dash(recent_clients),
                recent_tasks: summary
                    .tasks
                    .iter()
                    .rev()
                    .take(RECENT_LIMIT)
                    .cloned()
                    .collect(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCard {
    pub name: String,
    pub missions_label: String,
    pub hours_label: String,
    pub collaborators: String,
}

pub fn client_cards(aggregates: &Aggregates, filter: &str) -> Vec<ClientCard> {
    ranked(aggregates.clients.iter(), filter)
        .into_iter()
        .map(|summary| ClientCard {
            name: summary.name.clone(),
            missions_label: format!("{} missions", summary.missions),
            hours_label: format!("{} h", fixed1(summary.hours)),
            collaborators: or_dash(summary.collaborators.iter().collect::<Vec<_>>().join(", ")),
        })
        .collect()
}

fn or_dash(joined: String) -> String {
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementItem {
    pub title: String,
    pub meta: String,
    pub text: String,
}

pub fn announcement_items(announcements: &[Announcement]) -> Vec<AnnouncementItem> {
    announcements
        .iter()
        .map(|item| {
            let author = if item.author.is_empty() {
                DEFAULT_AUTHOR
            } else {
                item.author.as_str()
            };
            AnnouncementItem {
                title: item.title.clone(),
                meta: format!("{} • {author}", long_date(&item.created_at)),
                text: item.text.clone(),
            }
        })
        .collect()
}

/// Values shown in the configuration panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPanel {
    pub sheet_id: String,
    pub api_key: String,
    pub webhook: String,
}

impl ConfigPanel {
    pub fn new(sheet_id: &str, api_key: &str, webhook_url: &str) -> Self {
        let or_hint = |value: &str, hint: &str| {
            if value.is_empty() {
                hint.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            sheet_id: sheet_id.to_string(),
            api_key: or_hint(api_key, "Définir API_KEY"),
            webhook: or_hint(webhook_url, "Définir WEBHOOK_URL"),
        }
    }
}

/// Clock and weather texts for the page header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderWidgets {
    pub clock: String,
    pub weather: String,
}

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub header: HeaderWidgets,
    pub notifications: Vec<String>,
    pub totals: DashboardTotals,
    pub hours: Vec<HoursRow>,
    pub collaborators: Vec<CollaboratorCard>,
    pub clients: Vec<ClientCard>,
    pub announcements: Vec<AnnouncementItem>,
    pub charts: Vec<ChartSpec>,
    pub documents: &'static [DocumentLink],
    pub config: ConfigPanel,
}

pub fn build_view(
    state: &DashboardState,
    filters: &ViewFilters,
    header: HeaderWidgets,
    config: ConfigPanel,
) -> DashboardView {
    DashboardView {
        header,
        notifications: state.notifications.visible().map(str::to_string).collect(),
        totals: DashboardTotals::compute(&state.rows, &state.aggregates),
        hours: hours_rows(&state.rows, &filters.search),
        collaborators: collaborator_cards(&state.aggregates, &filters.collaborator),
        clients: client_cards(&state.aggregates, &filters.client),
        announcements: announcement_items(&state.announcements),
        charts: vec![
            collaborator_chart(&state.aggregates),
            client_chart(&state.aggregates),
        ],
        documents: DOCUMENTS,
        config,
    }
}

/// Self-contained HTML page for the view.
pub fn page_html(view: &DashboardView) -> String {
    let mut out = String::new();
    // Writing into a String never fails.
    let _ = write_page(&mut out, view);
    out
}

fn write_page(out: &mut String, view: &DashboardView) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"fr\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>NOEM Intranet</title>")?;
    writeln!(out, "<script src=\"{CHART_JS_CDN}\"></script>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;

    writeln!(out, "<header>")?;
    writeln!(out, "<div id=\"clock\">{}</div>", escape_html(&view.header.clock))?;
    writeln!(out, "<div id=\"weather\">{}</div>", escape_html(&view.header.weather))?;
    writeln!(out, "<div id=\"notifications\">")?;
    for message in &view.notifications {
        writeln!(
            out,
            "<span class=\"notification-pill\">{}</span>",
            escape_html(message)
        )?;
    }
    writeln!(out, "</div>")?;
    writeln!(out, "</header>")?;

    writeln!(out, "<section id=\"dashboard\">")?;
    writeln!(out, "<div id=\"stat-total-hours\">{}</div>", view.totals.total_label())?;
    writeln!(out, "<div id=\"stat-collaborators\">{}</div>", view.totals.collaborators)?;
    writeln!(out, "<div id=\"stat-clients\">{}</div>", view.totals.clients)?;
    writeln!(out, "<div id=\"stat-average-week\">{}</div>", view.totals.average_label())?;
    for chart in &view.charts {
        writeln!(out, "<canvas id=\"{}\"></canvas>", chart.canvas_id)?;
        let config = chart.config.to_string().replace("</", "<\\/");
        writeln!(
            out,
            "<script type=\"application/json\" data-chart=\"{}\">{config}</script>",
            chart.canvas_id
        )?;
    }
    writeln!(out, "</section>")?;

    writeln!(out, "<section id=\"hours\">")?;
    writeln!(out, "<table id=\"hours-table\">")?;
    writeln!(
        out,
        "<thead><tr><th>Collaborateur</th><th>Client</th><th>Heures</th><th>Tâches réalisées</th><th>Semaine</th></tr></thead>"
    )?;
    writeln!(out, "<tbody>")?;
    for row in &view.hours {
        let hidden = if row.visible { "" } else { " hidden" };
        write!(out, "<tr{hidden}>")?;
        for cell in &row.cells {
            write!(out, "<td>{}</td>", escape_html(cell))?;
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "</tbody>")?;
    writeln!(out, "</table>")?;
    writeln!(out, "</section>")?;

    writeln!(out, "<section id=\"collaborators-list\">")?;
    for card in &view.collaborators {
        writeln!(out, "<div class=\"card\">")?;
        writeln!(out, "<h2>{}</h2>", escape_html(&card.name))?;
        writeln!(
            out,
            "<span class=\"badge\"><i class=\"fa-solid fa-clock\"></i>{}</span>",
            card.hours_label
        )?;
        writeln!(
            out,
            "<div class=\"meta\">Clients récents : {}</div>",
            escape_html(&card.recent_clients)
        )?;
        writeln!(out, "<div><strong>Dernières tâches</strong><ul>")?;
        if card.recent_tasks.is_empty() {
            writeln!(out, "<li>Aucune tâche renseignée</li>")?;
        }
        for task in &card.recent_tasks {
            writeln!(out, "<li>{}</li>", escape_html(task))?;
        }
        writeln!(out, "</ul></div>")?;
        writeln!(out, "</div>")?;
    }
    writeln!(out, "</section>")?;

    writeln!(out, "<section id=\"clients-list\">")?;
    for card in &view.clients {
        writeln!(out, "<div class=\"card\">")?;
        writeln!(out, "<h2>{}</h2>", escape_html(&card.name))?;
        writeln!(
            out,
            "<span class=\"badge\"><i class=\"fa-solid fa-briefcase\"></i>{}</span>",
            card.missions_label
        )?;
        writeln!(out, "<div class=\"meta\">Total heures : {}</div>", card.hours_label)?;
        writeln!(
            out,
            "<div class=\"meta\">Collaborateurs impliqués : {}</div>",
            escape_html(&card.collaborators)
        )?;
        writeln!(out, "</div>")?;
    }
    writeln!(out, "</section>")?;

    writeln!(out, "<section id=\"announcements-list\">")?;
    if view.announcements.is_empty() {
        writeln!(out, "<p class=\"meta\">Aucune annonce pour le moment.</p>")?;
    }
    for item in &view.announcements {
        writeln!(out, "<article class=\"timeline-item\">")?;
        writeln!(out, "<h3>{}</h3>", escape_html(&item.title))?;
        writeln!(out, "<div class=\"meta\">{}</div>", escape_html(&item.meta))?;
        writeln!(out, "<p>{}</p>", escape_html(&item.text))?;
        writeln!(out, "</article>")?;
    }
    writeln!(out, "</section>")?;

    writeln!(out, "<section id=\"documents-list\">")?;
    for doc in view.documents {
        writeln!(out, "<div class=\"document-card\">")?;
        writeln!(out, "<i class=\"fa-solid {} fa-2x\"></i>", doc.icon)?;
        writeln!(out, "<div>{}</div>", escape_html(doc.label))?;
        writeln!(
            out,
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Ouvrir</a>",
            escape_html(doc.url)
        )?;
        writeln!(out, "</div>")?;
    }
    writeln!(out, "</section>")?;

    writeln!(out, "<section id=\"config\">")?;
    writeln!(out, "<div id=\"sheet-id-display\">{}</div>", escape_html(&view.config.sheet_id))?;
    writeln!(out, "<div id=\"api-key-display\">{}</div>", escape_html(&view.config.api_key))?;
    writeln!(out, "<div id=\"webhook-display\">{}</div>", escape_html(&view.config.webhook))?;
    writeln!(out, "</section>")?;

    writeln!(out, "<script>")?;
    writeln!(
        out,
        "document.querySelectorAll('script[data-chart]').forEach(function (node) {{ new Chart(document.getElementById(node.dataset.chart), JSON.parse(node.textContent)); }});"
    )?;
    writeln!(out, "</script>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

/// Plain-text rendering of the same view for terminals.
pub fn text_summary(view: &DashboardView) -> String {
    let mut out = String::new();
    // Writing into a String never fails.
    let _ = write_summary(&mut out, view);
    out
}

fn write_summary(out: &mut String, view: &DashboardView) -> std::fmt::Result {
    writeln!(out, "# NOEM Intranet ({}, {})", view.header.clock, view.header.weather)?;
    writeln!(out)?;
    writeln!(out, "Total heures : {}", view.totals.total_label())?;
    writeln!(out, "Collaborateurs : {}", view.totals.collaborators)?;
    writeln!(out, "Clients : {}", view.totals.clients)?;
    writeln!(out, "Moyenne par semaine : {}", view.totals.average_label())?;

    writeln!(out)?;
    writeln!(out, "## Collaborateurs")?;
    if view.collaborators.is_empty() {
        writeln!(out, "Aucun collaborateur.")?;
    }
    for card in &view.collaborators {
        writeln!(
            out,
            "- {} : {} (clients récents : {})",
            card.name, card.hours_label, card.recent_clients
        )?;
        for task in &card.recent_tasks {
            writeln!(out, "    * {task}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "## Clients")?;
    if view.clients.is_empty() {
        writeln!(out, "Aucun client.")?;
    }
    for card in &view.clients {
        writeln!(
            out,
            "- {} : {}, {} ({})",
            card.name, card.missions_label, card.hours_label, card.collaborators
        )?;
    }

    writeln!(out)?;
    writeln!(out, "## Heures")?;
    for row in view.hours.iter().filter(|row| row.visible) {
        writeln!(out, "- {}", row.cells.join(" | "))?;
    }

    writeln!(out)?;
    writeln!(out, "## Annonces")?;
    if view.announcements.is_empty() {
        writeln!(out, "Aucune annonce pour le moment.")?;
    }
    for item in &view.announcements {
        writeln!(out, "- {} ({})", item.title, item.meta)?;
        writeln!(out, "  {}", item.text)?;
    }

    if !view.notifications.is_empty() {
        writeln!(out)?;
        writeln!(out, "## Notifications")?;
        for message in &view.notifications {
            writeln!(out, "- {message}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;

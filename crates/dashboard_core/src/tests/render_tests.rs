use super::*;
use crate::{aggregate::aggregate, schema::map_grid};

fn records(rows: &[&[&str]]) -> Vec<Record> {
    let grid: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    map_grid(&grid)
}

fn sample_state() -> DashboardState {
    let rows = records(&[
        &["Collaborateur", "Client", "Heures", "Tâches réalisées", "Semaine"],
        &["Alice", "Acme", "3.5", "Fix bug", "W1"],
        &["Alice", "Globex", "2", "Review", "W1"],
        &["Alice", "Initech", "1", "Deploy", "W2"],
        &["Alice", "Umbrella", "1", "Audit", "W2"],
        &["Bob", "Acme", "9", "", "W2"],
    ]);
    let aggregates = aggregate(&rows);
    DashboardState {
        rows,
        aggregates,
        ..DashboardState::default()
    }
}

#[test]
fn global_search_hides_rows_by_rendered_text() {
    let state = sample_state();
    let rows = hours_rows(&state.rows, "GLOBEX");

    let visible: Vec<&str> = rows
        .iter()
        .filter(|row| row.visible)
        .map(|row| row.cells[3].as_str())
        .collect();
    assert_eq!(visible, vec!["Review"]);
}

#[test]
fn global_search_matches_formatted_hours() {
    let state = sample_state();
    let rows = hours_rows(&state.rows, "9.0");
    assert_eq!(rows.iter().filter(|row| row.visible).count(), 1);
}

#[test]
fn collaborator_cards_show_recent_clients_and_tasks() {
    let state = sample_state();
    let cards = collaborator_cards(&state.aggregates, "");

    assert_eq!(cards[0].name, "Bob");
    assert_eq!(cards[0].recent_tasks, Vec::<String>::new());

    let alice = &cards[1];
    assert_eq!(alice.hours_label, "7.5 h");
    assert_eq!(alice.recent_clients, "Globex, Initech, Umbrella");
    assert_eq!(alice.recent_tasks, vec!["Audit", "Deploy", "Review"]);
}

#[test]
fn client_cards_filter_by_name() {
    let state = sample_state();
    let cards = client_cards(&state.aggregates, "ac");

    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].missions_label, "2 missions");
    assert_eq!(cards[0].hours_label, "12.5 h");
    assert_eq!(cards[0].collaborators, "Alice, Bob");
}

#[test]
fn announcements_fall_back_to_default_author() {
    let items = announcement_items(&[Announcement {
        title: "Pot de départ".into(),
        author: String::new(),
        text: "Vendredi".into(),
        created_at: "prochainement".into(),
    }]);
    assert_eq!(items[0].meta, "prochainement • NOEM");
}

#[test]
fn config_panel_hints_missing_values() {
    let panel = ConfigPanel::new("sheet", "", "");
    assert_eq!(panel.api_key, "Définir API_KEY");
    assert_eq!(panel.webhook, "Définir WEBHOOK_URL");
}

#[test]
fn empty_state_renders_zero_totals_and_placeholders() {
    let state = DashboardState::default();
    let view = build_view(
        &state,
        &ViewFilters::default(),
        HeaderWidgets::default(),
        ConfigPanel::new("sheet", "key", "hook"),
    );
    let html = page_html(&view);

    assert!(html.contains("<div id=\"stat-total-hours\">0.0 h</div>"));
    assert!(html.contains("<div id=\"stat-average-week\">--</div>"));
    assert!(html.contains("Aucune annonce pour le moment."));
    assert!(html.contains("Identité de marque"));
}

#[test]
fn page_escapes_sheet_content() {
    let rows = records(&[
        &["Collaborateur", "Client", "Heures"],
        &["<script>alert(1)</script>", "R&D", "1"],
    ]);
    let state = DashboardState {
        aggregates: aggregate(&rows),
        rows,
        ..DashboardState::default()
    };
    let view = build_view(
        &state,
        &ViewFilters::default(),
        HeaderWidgets::default(),
        ConfigPanel::new("sheet", "key", "hook"),
    );
    let html = page_html(&view);

    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("R&amp;D"));
}

#[test]
fn text_summary_lists_cards_in_rank_order() {
    let state = sample_state();
    let view = build_view(
        &state,
        &ViewFilters::default(),
        HeaderWidgets {
            clock: "mer. 09:05".into(),
            weather: "13°C ciel dégagé".into(),
        },
        ConfigPanel::new("sheet", "key", "hook"),
    );
    let summary = text_summary(&view);

    let bob = summary.find("- Bob : 9.0 h").expect("bob line");
    let alice = summary.find("- Alice : 7.5 h").expect("alice line");
    assert!(bob < alice);
    assert!(summary.starts_with("# NOEM Intranet (mer. 09:05, 13°C ciel dégagé)"));
}

#[test]
fn quarter_hours_round_half_up_in_cells_and_cards() {
    let rows = records(&[
        &["Collaborateur", "Client", "Heures"],
        &["Alice", "Acme", "1.25"],
        &["Bob", "Globex", "0.25"],
    ]);
    let aggregates = aggregate(&rows);

    let cells: Vec<String> = hours_rows(&rows, "")
        .into_iter()
        .map(|row| row.cells[2].clone())
        .collect();
    assert_eq!(cells, vec!["1.3", "0.3"]);

    let collaborators = collaborator_cards(&aggregates, "");
    assert_eq!(collaborators[0].hours_label, "1.3 h");
    assert_eq!(collaborators[1].hours_label, "0.3 h");

    let clients = client_cards(&aggregates, "globex");
    assert_eq!(clients[0].hours_label, "0.3 h");
}

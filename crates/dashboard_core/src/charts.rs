//! Chart.js configurations for the two hours charts.

use serde_json::{json, Value};
use shared::domain::Summary;

use crate::aggregate::Aggregates;

pub const COLLABORATOR_CHART_ID: &str = "chart-hours-collaborators";
pub const CLIENT_CHART_ID: &str = "chart-hours-clients";

/// Beyond this many bars the collaborator chart switches to horizontal.
const HORIZONTAL_BAR_THRESHOLD: usize = 6;

const PALETTE: [&str; 7] = [
    "rgba(201, 162, 39, 0.8)",
    "rgba(255, 206, 86, 0.8)",
    "rgba(201, 180, 88, 0.8)",
    "rgba(230, 169, 39, 0.8)",
    "rgba(180, 140, 60, 0.8)",
    "rgba(255, 193, 79, 0.8)",
    "rgba(201, 162, 39, 0.5)",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub canvas_id: &'static str,
    pub config: Value,
}

pub fn color_from_index(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn series<'a, T: Summary + 'a>(items: impl Iterator<Item = &'a T>) -> (Vec<String>, Vec<f64>) {
    items
        .map(|item| {
            let hours = (item.hours() * 100.0).round() / 100.0;
            (item.name().to_string(), hours)
        })
        .unzip()
}

pub fn collaborator_chart(aggregates: &Aggregates) -> ChartSpec {
    let (labels, hours) = series(aggregates.collaborators.iter());
    let index_axis = if labels.len() > HORIZONTAL_BAR_THRESHOLD {
        "y"
    } else {
        "x"
    };

    let mut options = base_options();
    options["indexAxis"] = json!(index_axis);

    ChartSpec {
        canvas_id: COLLABORATOR_CHART_ID,
        config: json!({
            "type": "bar",
            "data": {
                "labels": labels,
                "datasets": [{
                    "label": "Heures par collaborateur",
                    "data": hours,
                    "backgroundColor": "rgba(201, 162, 39, 0.7)",
                    "borderRadius": 8
                }]
            },
            "options": options
        }),
    }
}

pub fn client_chart(aggregates: &Aggregates) -> ChartSpec {
    let (labels, hours) = series(aggregates.clients.iter());
    let colors: Vec<&str> = (0..labels.len()).map(color_from_index).collect();

    let mut options = base_options();
    options["plugins"] = json!({
        "legend": {
            "position": "bottom",
            "labels": { "color": "#fff" }
        }
    });

    ChartSpec {
        canvas_id: CLIENT_CHART_ID,
        config: json!({
            "type": "doughnut",
            "data": {
                "labels": labels,
                "datasets": [{
                    "label": "Heures par client",
                    "data": hours,
                    "backgroundColor": colors
                }]
            },
            "options": options
        }),
    }
}

fn base_options() -> Value {
    let axis = json!({
        "ticks": { "color": "#fff" },
        "grid": { "color": "rgba(255,255,255,0.08)" }
    });
    json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "scales": { "x": axis, "y": axis },
        "plugins": {
            "legend": { "labels": { "color": "#fff" } }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aggregate::aggregate, schema::map_row};

    fn aggregates_for(names: &[&str]) -> Aggregates {
        let records: Vec<_> = names
            .iter()
            .map(|name| map_row(&["Collaborateur", "Client", "Heures"], &[*name, *name, "1.234"]))
            .collect();
        aggregate(&records)
    }

    #[test]
    fn bar_chart_turns_horizontal_past_six_collaborators() {
        let few = collaborator_chart(&aggregates_for(&["a", "b", "c"]));
        assert_eq!(few.config["options"]["indexAxis"], "x");

        let many = collaborator_chart(&aggregates_for(&["a", "b", "c", "d", "e", "f", "g"]));
        assert_eq!(many.config["options"]["indexAxis"], "y");
    }

    #[test]
    fn chart_hours_are_rounded_to_two_decimals() {
        let chart = collaborator_chart(&aggregates_for(&["a"]));
        assert_eq!(chart.config["data"]["datasets"][0]["data"], json!([1.23]));
        assert_eq!(chart.config["data"]["labels"], json!(["a"]));
    }

    #[test]
    fn doughnut_colors_cycle_through_palette() {
        let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let chart = client_chart(&aggregates_for(&names));
        let colors = &chart.config["data"]["datasets"][0]["backgroundColor"];
        assert_eq!(colors[7], colors[0]);
        assert_eq!(chart.config["options"]["plugins"]["legend"]["position"], "bottom");
    }
}

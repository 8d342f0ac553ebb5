use super::*;

#[test]
fn map_row_pads_missing_cells_with_empty_strings() {
    let headers = ["Collaborateur", "Client", "Heures", "Semaine"];
    let record = map_row(&headers, &["Alice", "Acme"]);

    assert_eq!(record.len(), headers.len());
    assert_eq!(record.get("Collaborateur"), Some("Alice"));
    assert_eq!(record.get("Client"), Some("Acme"));
    assert_eq!(record.get("Heures"), Some(""));
    assert_eq!(record.get("Semaine"), Some(""));
}

#[test]
fn map_row_has_one_entry_per_header_for_every_shorter_row() {
    let headers = ["A", "B", "C", "D", "E"];
    let cells = ["1", "2", "3", "4", "5"];
    for len in 0..=cells.len() {
        let record = map_row(&headers, &cells[..len]);
        assert_eq!(record.len(), headers.len(), "row length {len}");
        for (index, header) in headers.iter().enumerate() {
            let expected = if index < len { cells[index] } else { "" };
            assert_eq!(record.get(header), Some(expected));
        }
    }
}

#[test]
fn map_row_trims_headers_and_ignores_extra_cells() {
    let record = map_row(&["  Client ", "Heures\t"], &["Acme", "2", "stray"]);
    assert_eq!(record.len(), 2);
    assert_eq!(record.get("Client"), Some("Acme"));
    assert_eq!(record.get("Heures"), Some("2"));
}

#[test]
fn resolve_falls_through_empty_aliases() {
    let record = map_row(&["Tâches réalisées", "Taches"], &["", "Inventaire"]);
    assert_eq!(Field::Tasks.resolve(&record), Some("Inventaire"));

    let record = map_row(&["Semaine réalisée", "Semaine"], &["S41", "S40"]);
    assert_eq!(Field::Week.resolve(&record), Some("S41"));
}

#[test]
fn resolve_or_uses_fallback_when_no_alias_matches() {
    let record = map_row(&["Client"], &[""]);
    assert_eq!(Field::Client.resolve_or(&record, "N/A"), "N/A");
    assert_eq!(Field::Collaborator.resolve(&record), None);
}

#[test]
fn map_grid_without_header_row_is_empty() {
    assert!(map_grid(&[]).is_empty());

    let grid = vec![vec!["Titre".to_string(), "Texte".to_string()]];
    assert!(map_grid(&grid).is_empty());
}

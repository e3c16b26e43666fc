use crate::models::Patient;

/// Typeahead filter: a numeric query matches ids by prefix, any query matches
/// names case-insensitively by substring. A blank query returns everyone.
pub fn search_patients<'a>(patients: &'a [Patient], query: &str) -> Vec<&'a Patient> {
    let query = query.trim().trim_start_matches('#');
    if query.is_empty() {
        return patients.iter().collect();
    }

    let needle = query.to_lowercase();
    let numeric = query.bytes().all(|b| b.is_ascii_digit());

    patients
        .iter()
        .filter(|p| {
            (numeric && p.id.as_str().starts_with(query))
                || p.name.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::RecordId;

    fn patients() -> Vec<Patient> {
        vec![
            Patient { id: RecordId::from(104u64), name: "Asha Kulkarni".to_string() },
            Patient { id: RecordId::from(215u64), name: "Rahul Desai".to_string() },
            Patient { id: RecordId::from(1042u64), name: "Meera Nair".to_string() },
        ]
    }

    #[test]
    fn blank_query_lists_everyone() {
        assert_eq!(search_patients(&patients(), "  ").len(), 3);
    }

    #[test]
    fn names_match_case_insensitively() {
        let all = patients();
        let hits = search_patients(&all, "desai");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Rahul Desai");
    }

    #[test]
    fn numeric_query_matches_id_prefix() {
        let all = patients();
        let ids: Vec<&str> = search_patients(&all, "#104").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["104", "1042"]);
    }

    #[test]
    fn label_shows_id() {
        assert_eq!(patients()[0].display_label(), "Asha Kulkarni (#104)");
    }
}

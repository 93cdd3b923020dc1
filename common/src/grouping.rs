//! Placa 単位のグループ化

use crate::types::MatchedRow;
use std::collections::HashMap;

/// 1ページ分（同じ Placa）の行
#[derive(Debug, Clone)]
pub struct LocationGroup<'a> {
    pub tag: &'a str,
    pub rows: Vec<&'a MatchedRow>,
}

/// Placa ごとにまとめる
///
/// 初出順を保持し、Placa が空の行は含めない。
pub fn group_by_location(rows: &[MatchedRow]) -> Vec<LocationGroup<'_>> {
    let mut groups: Vec<LocationGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let Some(tag) = row.location_tag() else {
            continue;
        };
        let idx = *index.entry(tag).or_insert_with(|| {
            groups.push(LocationGroup { tag, rows: Vec::new() });
            groups.len() - 1
        });
        groups[idx].rows.push(row);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SurveyRow;

    fn row(tag: Option<&str>, order: &str) -> MatchedRow {
        MatchedRow {
            survey: SurveyRow {
                location_tag: tag.map(|s| s.to_string()),
                order_id: Some(order.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_first_seen_order() {
        let rows = vec![
            row(Some("P-02"), "1"),
            row(Some("P-01"), "2"),
            row(Some("P-02"), "3"),
            row(None, "4"),
            row(Some("P-03"), "5"),
            row(Some("P-01"), "6"),
        ];
        let groups = group_by_location(&rows);
        let tags: Vec<&str> = groups.iter().map(|g| g.tag).collect();
        assert_eq!(tags, vec!["P-02", "P-01", "P-03"]);

        let orders: Vec<&str> = groups[0]
            .rows
            .iter()
            .filter_map(|r| r.survey.order_id.as_deref())
            .collect();
        assert_eq!(orders, vec!["1", "3"]);
        assert_eq!(groups[1].rows.len(), 2);
    }

    #[test]
    fn test_rows_without_tag_excluded() {
        let rows = vec![row(None, "1"), row(None, "2")];
        assert!(group_by_location(&rows).is_empty());

        let rows = vec![row(Some("P-01"), "1"), row(None, "2")];
        let total: usize = group_by_location(&rows).iter().map(|g| g.rows.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_location(&[]).is_empty());
    }
}

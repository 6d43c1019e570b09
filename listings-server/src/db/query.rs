//! Listings query builder
//!
//! The statement shape is fixed: properties joined with their status history,
//! keeping only the latest history row per property and only sale-related
//! statuses. Filters append `AND <column> = ?` predicates in a fixed order
//! (year, city, state) so positional parameters line up.

use std::fmt;

use crate::models::{FilterSet, FilterValue};

/// Base statement; only the current status row of each property survives.
pub const BASE_QUERY: &str = r#"
SELECT p.address, p.city, s.name AS state, p.price, p.description
FROM property p
JOIN status_history sh ON p.id = sh.property_id
JOIN status s ON sh.status_id = s.id
WHERE s.name IN ('pre_venta', 'en_venta', 'vendido')
AND sh.update_date = (
    SELECT MAX(update_date)
    FROM status_history
    WHERE property_id = p.id
)"#;

const YEAR_PREDICATE: &str = " AND p.year = ?";
const CITY_PREDICATE: &str = " AND p.city = ?";
const STATE_PREDICATE: &str = " AND s.name = ?";

/// Parameterized SQL plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyQuery {
    pub sql: String,
    pub params: Vec<FilterValue>,
}

impl PropertyQuery {
    /// Build the listings statement for a filter set.
    pub fn build(filters: &FilterSet) -> Self {
        let mut sql = String::from(BASE_QUERY);
        let mut params = Vec::with_capacity(3);

        if let Some(year) = filters.year() {
            sql.push_str(YEAR_PREDICATE);
            params.push(year.clone());
        }
        if let Some(city) = filters.city() {
            sql.push_str(CITY_PREDICATE);
            params.push(city.clone());
        }
        if let Some(state) = filters.state() {
            sql.push_str(STATE_PREDICATE);
            params.push(state.clone());
        }

        Self { sql, params }
    }

    /// Number of filter predicates appended to the base statement.
    pub fn predicate_count(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for PropertyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.sql.trim())?;
        write!(f, "-- params: [")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appended(query: &PropertyQuery) -> &str {
        &query.sql[BASE_QUERY.len()..]
    }

    #[test]
    fn unconstrained_filters_leave_base_query() {
        let cases = [
            FilterSet::new(),
            FilterSet::new().with_year("").with_city("").with_state(""),
            FilterSet::new().with_city(""),
        ];

        for filters in cases {
            let query = PropertyQuery::build(&filters);
            assert_eq!(query.sql, BASE_QUERY);
            assert!(query.params.is_empty());
            assert!(!appended(&query).contains("AND"));
        }
    }

    #[test]
    fn single_filter_appends_single_predicate() {
        let cases = [
            (FilterSet::new().with_year(2019), "AND p.year = ?"),
            (FilterSet::new().with_city("cali"), "AND p.city = ?"),
            (FilterSet::new().with_state("vendido"), "AND s.name = ?"),
        ];

        for (filters, predicate) in cases {
            let query = PropertyQuery::build(&filters);
            assert_eq!(query.predicate_count(), 1);
            assert_eq!(appended(&query).trim(), predicate);
            assert_eq!(appended(&query).matches("AND").count(), 1);
        }
    }

    #[test]
    fn all_filters_keep_fixed_order() {
        let filters = FilterSet::new()
            .with_state("pre_venta")
            .with_city("bogota")
            .with_year(2020);

        let query = PropertyQuery::build(&filters);

        assert_eq!(
            query.params,
            vec![
                FilterValue::Int(2020),
                FilterValue::Text("bogota".into()),
                FilterValue::Text("pre_venta".into()),
            ]
        );

        let year = query.sql.find("AND p.year = ?").unwrap();
        let city = query.sql.find("AND p.city = ?").unwrap();
        let state = query.sql.find("AND s.name = ?").unwrap();
        assert!(year < city && city < state);
    }

    #[test]
    fn values_never_reach_sql_text() {
        let filters = FilterSet::new().with_city("x' OR '1'='1");
        let query = PropertyQuery::build(&filters);

        assert!(!query.sql.contains("OR '1'"));
        assert_eq!(query.params, vec![FilterValue::Text("x' OR '1'='1".into())]);
    }

    #[test]
    fn display_lists_params() {
        let query = PropertyQuery::build(&FilterSet::new().with_year(2020).with_city("bogota"));
        let rendered = query.to_string();

        assert!(rendered.starts_with("SELECT p.address"));
        assert!(rendered.ends_with(r#"-- params: [2020, "bogota"]"#));
    }
}

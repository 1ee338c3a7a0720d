// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Builders for the address/port filter used in the WHERE clause.
//!
//! A predicate is an OR of per-item `(address = .. AND port = ..)` clauses,
//! wrapped in one outer pair of parentheses. Only items whose edge label
//! equals the target label contribute a clause. With nothing matching the
//! rendered predicate is the bare `()`.

use crate::domain::entities::FilterItem;

/// Address and port columns compared by one topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredicateColumns {
    pub address: &'static str,
    pub port: &'static str,
}

pub const STANDARD_COLUMNS: PredicateColumns = PredicateColumns {
    address: "pa.address",
    port: "n.source_port",
};

pub const LOAD_BALANCER_COLUMNS: PredicateColumns = PredicateColumns {
    address: "lb.public_ip",
    port: "lbr.vip_port",
};

/// The matched address/port pairs for one topology, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    columns: PredicateColumns,
    pairs: Vec<(String, String)>,
}

impl Predicate {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Renders the predicate with `?` placeholders, one pair per clause.
    pub fn placeholder_sql(&self) -> String {
        self.render(|_| "?".to_string())
    }

    /// Positional bind values matching `placeholder_sql`.
    pub fn bind_values(&self) -> Vec<String> {
        self.pairs
            .iter()
            .flat_map(|(address, port)| [address.clone(), port.clone()])
            .collect()
    }

    /// Renders the predicate with values interpolated as single-quoted
    /// literals. Nothing is escaped: a quote inside a value breaks the SQL.
    pub fn literal_sql(&self) -> String {
        self.render(|v| format!("'{}'", v))
    }

    fn render<F>(&self, value: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let conditions: Vec<String> = self
            .pairs
            .iter()
            .map(|(address, port)| {
                format!(
                    "({} = {} AND {} = {})",
                    self.columns.address,
                    value(address),
                    self.columns.port,
                    value(port)
                )
            })
            .collect();
        format!("({})", conditions.join(" OR "))
    }
}

/// Keeps the items whose edge label equals `edge`, in input order.
pub fn build_predicate(columns: PredicateColumns, items: &[FilterItem], edge: &str) -> Predicate {
    let pairs = items
        .iter()
        .filter(|item| item.edge_label == edge)
        .map(|item| (item.address.clone(), item.port.clone()))
        .collect();
    Predicate { columns, pairs }
}

/// Predicate over `pa.address` / `n.source_port` (NAT topology).
pub fn build_standard_predicate(items: &[FilterItem], edge: &str) -> Predicate {
    build_predicate(STANDARD_COLUMNS, items, edge)
}

/// Predicate over `lb.public_ip` / `lbr.vip_port` (load-balancer topology).
pub fn build_load_balancer_predicate(items: &[FilterItem], edge: &str) -> Predicate {
    build_predicate(LOAD_BALANCER_COLUMNS, items, edge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_load_balancer_literal_single_item() {
        let items = vec![FilterItem::new("10.0.0.1", "8080", "TESP1")];
        let predicate = build_load_balancer_predicate(&items, "TESP1");
        assert_eq!(
            predicate.literal_sql(),
            "((lb.public_ip = '10.0.0.1' AND lbr.vip_port = '8080'))"
        );
    }

    #[test]
    fn test_standard_clauses_follow_input_order() {
        let items = vec![
            FilterItem::new("1.1.1.1", "1", "E"),
            FilterItem::new("2.2.2.2", "2", "E"),
            FilterItem::new("3.3.3.3", "3", "E"),
        ];
        let predicate = build_standard_predicate(&items, "E");
        assert_eq!(predicate.len(), 3);
        assert_eq!(
            predicate.literal_sql(),
            "((pa.address = '1.1.1.1' AND n.source_port = '1') OR \
             (pa.address = '2.2.2.2' AND n.source_port = '2') OR \
             (pa.address = '3.3.3.3' AND n.source_port = '3'))"
        );
    }

    #[test]
    fn test_other_edges_are_skipped() {
        let items = vec![
            FilterItem::new("1.1.1.1", "1", "OTHER"),
            FilterItem::new("2.2.2.2", "2", "TESP1"),
            FilterItem::new("3.3.3.3", "3", "tesp1"),
        ];
        let predicate = build_load_balancer_predicate(&items, "TESP1");
        assert_eq!(predicate.len(), 1);
        assert_eq!(predicate.bind_values(), vec!["2.2.2.2", "2"]);
    }

    #[test]
    fn test_duplicates_produce_independent_clauses() {
        let items = vec![
            FilterItem::new("1.1.1.1", "1", "E"),
            FilterItem::new("1.1.1.1", "1", "E"),
        ];
        let predicate = build_standard_predicate(&items, "E");
        assert_eq!(predicate.len(), 2);
        assert_eq!(predicate.placeholder_sql().matches(" OR ").count(), 1);
    }

    #[test]
    fn test_empty_input_renders_empty_parens() {
        let predicate = build_standard_predicate(&[], "TESP1");
        assert!(predicate.is_empty());
        assert_eq!(predicate.literal_sql(), "()");
        assert_eq!(predicate.placeholder_sql(), "()");
        assert!(predicate.bind_values().is_empty());
    }

    #[test]
    fn test_no_matching_edge_renders_empty_parens() {
        let items = vec![FilterItem::new("1.1.1.1", "1", "EDGE2")];
        let predicate = build_load_balancer_predicate(&items, "TESP1");
        assert_eq!(predicate.literal_sql(), "()");
    }

    #[test]
    fn test_placeholders_and_binds_line_up() {
        let items = vec![
            FilterItem::new("10.0.0.1", "80", "E"),
            FilterItem::new("10.0.0.2", "443", "E"),
        ];
        let predicate = build_load_balancer_predicate(&items, "E");
        assert_eq!(
            predicate.placeholder_sql(),
            "((lb.public_ip = ? AND lbr.vip_port = ?) OR (lb.public_ip = ? AND lbr.vip_port = ?))"
        );
        assert_eq!(
            predicate.bind_values(),
            vec!["10.0.0.1", "80", "10.0.0.2", "443"]
        );
    }

    #[test]
    fn test_placeholder_sql_never_contains_values() {
        let items = vec![FilterItem::new("x' OR '1'='1", "1", "E")];
        let predicate = build_standard_predicate(&items, "E");
        assert!(!predicate.placeholder_sql().contains("OR '1'"));
        assert_eq!(predicate.bind_values()[0], "x' OR '1'='1");
    }

    fn arb_item() -> impl Strategy<Value = FilterItem> {
        (
            "[0-9.]{0,15}",
            "[0-9]{0,5}",
            prop_oneof!["TESP1", "EDGE2", "tesp1", ""],
        )
            .prop_map(|(address, port, edge)| FilterItem::new(&address, &port, &edge))
    }

    proptest! {
        #[test]
        fn prop_one_clause_per_matching_item(
            items in prop::collection::vec(arb_item(), 0..40),
            edge in prop_oneof!["TESP1", "EDGE2"],
        ) {
            let predicate = build_standard_predicate(&items, &edge);
            let expected: Vec<String> = items
                .iter()
                .filter(|item| item.edge_label == edge)
                .flat_map(|item| [item.address.clone(), item.port.clone()])
                .collect();

            prop_assert_eq!(predicate.len() * 2, expected.len());
            prop_assert_eq!(predicate.bind_values(), expected);

            let sql = predicate.placeholder_sql();
            prop_assert_eq!(sql.matches("(pa.address = ? AND n.source_port = ?)").count(), predicate.len());
            prop_assert_eq!(sql.matches(" OR ").count(), predicate.len().saturating_sub(1));
            if predicate.is_empty() {
                prop_assert_eq!(sql, "()");
            }
        }
    }
}

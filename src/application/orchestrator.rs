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

//! The export pipeline: load filters, dispatch one query, append the rows.
//!
//! The database connection is opened and pinged by the caller before the
//! orchestrator runs, so a dead database fails before any file is read.
//! Every stage is fatal on error; there is no retry and no fallback.

use crate::application::dispatcher::QueryDispatcher;
use crate::config::ExportConfig;
use crate::domain::entities::ExportSummary;
use crate::domain::errors::Result;
use crate::domain::query::BindMode;
use crate::infrastructure::local_storage::filter_file::load_filter_items;
use crate::ports::mapping_source::MappingSource;
use crate::ports::result_writer::ResultWriter;
use log::{info, warn};

/// Runs one export against an already-open mapping source.
pub struct Orchestrator {
    source: Box<dyn MappingSource>,
    writer: Box<dyn ResultWriter>,
    config: ExportConfig,
}

impl Orchestrator {
    pub fn new(
        source: Box<dyn MappingSource>,
        writer: Box<dyn ResultWriter>,
        config: ExportConfig,
    ) -> Self {
        Self {
            source,
            writer,
            config,
        }
    }

    pub fn run(&mut self) -> Result<ExportSummary> {
        let items = load_filter_items(&self.config.input_file)?;

        let profile = self.config.resolved_profile();
        let mode = self.config.bind_mode();
        info!("Server profile: {} (server '{}')", profile, self.config.server);
        if mode == BindMode::LegacyLiteral {
            warn!("Legacy SQL mode: filter values are interpolated without escaping");
        }

        let dispatcher = QueryDispatcher::new(profile, mode);
        let (matched, cursor) =
            dispatcher.dispatch(&mut *self.source, &items, &self.config.server)?;
        info!("{} of {} filter items match server '{}'", matched, items.len(), self.config.server);

        let outcome = self.writer.write_rows(cursor)?;

        let summary = ExportSummary {
            profile,
            filters_loaded: items.len(),
            filters_matched: matched,
            rows_written: outcome.rows_written,
            header_written: outcome.header_written,
            output_file: self.writer.destination(),
        };
        info!("{}", summary.completion_message());
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{MappingRow, ServerProfile};
    use crate::domain::errors::ExportError;
    use crate::domain::query::BoundQuery;
    use crate::infrastructure::local_storage::csv_result_adapter::CsvResultAdapter;
    use crate::ports::mapping_source::RowCursor;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Answers every query with one row per bound address.
    struct MockMappingSource {
        seen: Rc<RefCell<Vec<BoundQuery>>>,
    }

    impl MappingSource for MockMappingSource {
        fn query(&mut self, query: &BoundQuery) -> Result<RowCursor<'_>> {
            self.seen.borrow_mut().push(query.clone());
            let rows: Vec<Result<MappingRow>> = query
                .params
                .chunks(2)
                .map(|pair| {
                    Ok(MappingRow {
                        public_address: pair[0].clone(),
                        source_port: pair[1].clone(),
                        resource_name: format!("vm-{}", pair[1]),
                        floating_ip: "192.168.10.5".to_string(),
                    })
                })
                .collect();
            Ok(Box::new(rows.into_iter()))
        }
    }

    struct UnreachableSource;

    impl MappingSource for UnreachableSource {
        fn query(&mut self, _query: &BoundQuery) -> Result<RowCursor<'_>> {
            Err(ExportError::QueryError("syntax error near ')'".to_string()))
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        config: ExportConfig,
    }

    fn fixture(filters: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ips.json");
        std::fs::write(&input, filters).unwrap();
        let config = ExportConfig {
            input_file: input.to_str().unwrap().to_string(),
            output_file: dir.path().join("resultados.csv").to_str().unwrap().to_string(),
            ..ExportConfig::default()
        };
        Fixture { _dir: dir, config }
    }

    fn orchestrator(source: Box<dyn MappingSource>, config: &ExportConfig) -> Orchestrator {
        let writer = Box::new(CsvResultAdapter::new(&config.output_file));
        Orchestrator::new(source, writer, config.clone())
    }

    #[test]
    fn test_run_load_balancer_end_to_end() {
        let fx = fixture(
            r#"[
                {"ip_address": "10.0.0.1", "port": "8080", "edge": "TESP1"},
                {"ip_address": "10.0.0.2", "port": "22", "edge": "EDGE2"},
                {"ip_address": "10.0.0.3", "port": "443", "edge": "TESP1"}
            ]"#,
        );
        let seen = Rc::new(RefCell::new(Vec::new()));
        let source = Box::new(MockMappingSource { seen: seen.clone() });

        let summary = orchestrator(source, &fx.config).run().unwrap();

        assert_eq!(summary.profile, ServerProfile::LoadBalancer);
        assert_eq!(summary.filters_loaded, 3);
        assert_eq!(summary.filters_matched, 2);
        assert_eq!(summary.rows_written, 2);
        assert!(summary.header_written);
        assert_eq!(
            summary.completion_message(),
            format!("Results exported to {}", fx.config.output_file)
        );

        let queries = seen.borrow();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].sql.contains("FROM load_balances AS lb"));

        let csv = std::fs::read_to_string(&fx.config.output_file).unwrap();
        assert_eq!(
            csv,
            "Public_Address,Source_Port,VM_Name,Floating_IP\n\
             10.0.0.1,8080,vm-8080,192.168.10.5\n\
             10.0.0.3,443,vm-443,192.168.10.5\n"
        );
    }

    #[test]
    fn test_run_twice_keeps_single_header() {
        let fx = fixture(r#"[{"ip_address": "10.0.0.1", "port": "80", "edge": "EDGE2"}]"#);
        let config = ExportConfig {
            server: "EDGE2".to_string(),
            ..fx.config.clone()
        };

        for _ in 0..2 {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let summary = orchestrator(Box::new(MockMappingSource { seen }), &config)
                .run()
                .unwrap();
            assert_eq!(summary.profile, ServerProfile::Standard);
        }

        let csv = std::fs::read_to_string(&config.output_file).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert_eq!(csv.matches("Public_Address").count(), 1);
    }

    #[test]
    fn test_run_with_no_matching_items_writes_header_only() {
        let fx = fixture("[]");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let source = Box::new(MockMappingSource { seen: seen.clone() });

        let summary = orchestrator(source, &fx.config).run().unwrap();

        assert_eq!(summary.rows_written, 0);
        assert!(seen.borrow().is_empty());
        let csv = std::fs::read_to_string(&fx.config.output_file).unwrap();
        assert_eq!(csv, "Public_Address,Source_Port,VM_Name,Floating_IP\n");
    }

    #[test]
    fn test_legacy_mode_empty_predicate_fails() {
        let fx = fixture("[]");
        let config = ExportConfig {
            legacy_unsafe_sql: true,
            ..fx.config.clone()
        };

        let err = orchestrator(Box::new(UnreachableSource), &config)
            .run()
            .unwrap_err();

        assert!(matches!(err, ExportError::QueryError(_)));
        assert!(!std::path::Path::new(&config.output_file).exists());
    }

    #[test]
    fn test_bad_filter_file_stops_before_query() {
        let fx = fixture("{\"not\": \"a list\"}");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let source = Box::new(MockMappingSource { seen: seen.clone() });

        let err = orchestrator(source, &fx.config).run().unwrap_err();

        assert!(matches!(err, ExportError::DecodeError(_)));
        assert!(seen.borrow().is_empty());
        assert!(!std::path::Path::new(&fx.config.output_file).exists());
    }
}

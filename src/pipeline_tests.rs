#[cfg(test)]
mod tests {
    use crate::community::{community_count, same_partition};
    use crate::export::write_all;
    use crate::relation::validate_row_count;
    use crate::{Error, Pipeline, PipelineConfig, ProjectionSide, Relation, Result, STATISTICS};
    use std::collections::BTreeSet;

    // d1 -u2- d2 -u3- d3; u1 touches only d1.
    fn chain() -> Relation {
        Relation::from_pairs([
            ("d1", "u1"),
            ("d1", "u2"),
            ("d2", "u2"),
            ("d2", "u3"),
            ("d3", "u3"),
        ])
    }

    // Two 4-cliques of datasets (via groups g1 and g2), joined by one shared
    // contributor `b`, plus a pendant dataset `p` hanging off `a4`.
    fn two_cliques() -> Relation {
        Relation::from_pairs([
            ("a1", "g1"),
            ("a2", "g1"),
            ("a3", "g1"),
            ("a4", "g1"),
            ("c1", "g2"),
            ("c2", "g2"),
            ("c3", "g2"),
            ("c4", "g2"),
            ("a1", "b"),
            ("c1", "b"),
            ("a4", "t"),
            ("p", "t"),
        ])
    }

    fn run(relation: &Relation) -> Result<crate::PipelineReport> {
        Pipeline::new(PipelineConfig::default())?.run(relation)
    }

    #[test]
    fn test_chain_end_to_end() -> Result<()> {
        let report = run(&chain())?;

        let retained: Vec<&str> = report.frequencies.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(retained, vec!["u2", "u3"]);
        assert_eq!(report.edges.len(), 2);
        assert_eq!(report.graph.node_ids(), vec!["d1", "d2", "d3"]);
        assert_eq!(
            report.graph.edges(),
            vec![("d1", "d2", 1), ("d2", "d3", 1)]
        );

        assert_eq!(report.stats.node_count, 3);
        assert_eq!(report.stats.edge_count, 2);
        assert_eq!(report.stats.component_count, 1);
        assert_eq!(report.stats.diameter, 2);
        assert_eq!(report.table.get("density"), Some(0.6667));
        assert_eq!(report.table.get("average_path_length"), Some(1.33));
        assert_eq!(report.table.get("degree_one_count"), Some(2.0));
        assert_eq!(report.table.get("relation_rows"), Some(5.0));
        assert_eq!(report.table.get("retained_groups"), Some(2.0));
        Ok(())
    }

    #[test]
    fn test_table_has_every_statistic_in_order() -> Result<()> {
        let report = run(&chain())?;
        assert_eq!(report.table.names(), STATISTICS.to_vec());
        assert!(report.table.iter().all(|(_, v)| v.is_finite()));
        Ok(())
    }

    #[test]
    fn test_node_records_match_graph_nodes() -> Result<()> {
        let report = run(&two_cliques())?;
        let ids: BTreeSet<&str> = report.nodes.iter().map(|r| r.id.as_str()).collect();
        let graph_ids: BTreeSet<&str> = report.graph.node_ids().into_iter().collect();
        assert_eq!(ids, graph_ids);
        assert_eq!(report.nodes.len(), report.graph.node_count());

        for r in &report.nodes {
            assert_eq!(report.graph.degree(&r.id), Some(r.degree));
        }
        Ok(())
    }

    #[test]
    fn test_two_cliques_communities() -> Result<()> {
        let report = run(&two_cliques())?;
        assert_eq!(report.stats.node_count, 9);
        assert_eq!(report.stats.component_count, 1);
        assert!(report.modularity > 0.3);
        assert!(community_count(&report.eigen) >= 2);
        assert!(community_count(&report.walktrap) >= 2);

        let label = |labels: &[usize], id: &str| {
            let idx = report.graph.node_index(id).map(|n| n.index());
            idx.map(|i| labels[i])
        };
        for labels in [&report.eigen, &report.walktrap] {
            assert_eq!(label(labels, "a2"), label(labels, "a3"));
            assert_eq!(label(labels, "c2"), label(labels, "c3"));
            assert_ne!(label(labels, "a2"), label(labels, "c2"));
        }
        Ok(())
    }

    #[test]
    fn test_runs_are_deterministic() -> Result<()> {
        let a = run(&two_cliques())?;
        let b = run(&two_cliques())?;
        assert_eq!(a.eigen, b.eigen);
        assert_eq!(a.walktrap, b.walktrap);
        assert!(same_partition(&a.eigen, &b.eigen));
        assert_eq!(a.table, b.table);
        Ok(())
    }

    #[test]
    fn test_capacity_guard_aborts_before_generation() {
        // One group of 5 means C(5,2) = 10 edges.
        let rel = Relation::from_pairs([("a", "g"), ("b", "g"), ("c", "g"), ("d", "g"), ("e", "g")]);
        let cfg = PipelineConfig::default().with_edge_ceiling(9);
        let err = Pipeline::new(cfg).unwrap().run(&rel).unwrap_err();
        assert!(matches!(
            err,
            Error::CapacityExceeded {
                total: 10,
                ceiling: 9
            }
        ));
    }

    #[test]
    fn test_strict_min_degree() {
        // A lone triangle has no degree-one node.
        let rel = Relation::from_pairs([("a", "g"), ("b", "g"), ("c", "g")]);
        let err = run(&rel).unwrap_err();
        assert!(err.is_internal());
        assert!(matches!(err, Error::MinDegreeViolation { found: 2 }));

        let cfg = PipelineConfig::default().with_strict_min_degree(false);
        let report = Pipeline::new(cfg).unwrap().run(&rel).unwrap();
        assert_eq!(report.stats.degree_min, 2);
        assert_eq!(report.table.get("density"), Some(1.0));
    }

    #[test]
    fn test_nothing_survives_filtering() {
        let rel = Relation::from_pairs([("a", "x"), ("b", "y")]);
        assert!(matches!(run(&rel), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_right_side_projection() -> Result<()> {
        let cfg = PipelineConfig::default().with_side(ProjectionSide::Right);
        let report = Pipeline::new(cfg)?.run(&chain())?;
        // d1 links u1-u2, d2 links u2-u3, d3 has one contributor.
        assert_eq!(report.graph.node_ids(), vec!["u1", "u2", "u3"]);
        assert_eq!(
            report.graph.edges(),
            vec![("u1", "u2", 1), ("u2", "u3", 1)]
        );
        Ok(())
    }

    #[test]
    fn test_duplicates_dropped_by_default() -> Result<()> {
        let mut pairs = chain().rows().to_vec();
        pairs.push(pairs[1].clone());
        let rel: Relation = pairs.into_iter().collect();

        let report = run(&rel)?;
        assert_eq!(report.input_rows, 6);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.relation_rows, 5);
        assert_eq!(report.edges.len(), 2);
        Ok(())
    }

    #[test]
    fn test_keep_duplicates_weighted() -> Result<()> {
        let mut pairs = chain().rows().to_vec();
        pairs.push(pairs[1].clone()); // (d1, u2) again
        let rel: Relation = pairs.into_iter().collect();

        let cfg = PipelineConfig::default()
            .with_keep_duplicates(true)
            .with_weighted(true);
        let report = Pipeline::new(cfg)?.run(&rel)?;

        // u2 now has members [d1, d2, d1]: three pairs, one of them a self-loop.
        assert_eq!(report.relation_rows, 6);
        assert_eq!(report.edges.len(), 4);
        assert_eq!(
            report.graph.edges(),
            vec![("d1", "d2", 2), ("d2", "d3", 1)]
        );
        assert_eq!(report.stats.edge_count, 2);
        assert!(report.graph.snapshot().weighted);
        Ok(())
    }

    #[test]
    fn test_row_count_validation() {
        let rel = chain();
        assert!(validate_row_count(5, &rel).is_ok());
        assert!(matches!(
            validate_row_count(7, &rel),
            Err(Error::RowCountMismatch {
                declared: 7,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_metadata_join() -> Result<()> {
        let meta = crate::attributes::read_metadata_csv(
            "id,title\nd1,Survey A\nd3,Survey C\nzz,Unused\n".as_bytes(),
            "id",
        )?;
        let report = run(&chain())?.with_metadata(&meta);
        assert_eq!(report.nodes.len(), 3);
        let d2 = report.nodes.iter().find(|r| r.id == "d2").unwrap();
        assert!(d2.metadata.is_empty());
        let d3 = report.nodes.iter().find(|r| r.id == "d3").unwrap();
        assert_eq!(d3.metadata.get("title").map(String::as_str), Some("Survey C"));
        Ok(())
    }

    #[test]
    fn test_csv_to_artifacts() -> Result<()> {
        let csv = "dataset,contributor,role\n\
                   d1,u1,pi\n\
                   d1,u2,pi\n\
                   d2,u2,coi\n\
                   d2,u3,pi\n\
                   d3,u3,coi\n";
        let rel = Relation::from_csv_reader(csv.as_bytes(), "dataset", "contributor")?;
        validate_row_count(5, &rel)?;
        let report = run(&rel)?;

        let dir = tempfile::tempdir()?;
        write_all(dir.path(), &report)?;
        for name in [
            "edges.csv",
            "graph.json",
            "gephi_edges.csv",
            "stats.csv",
            "nodes.csv",
        ] {
            assert!(dir.path().join(name).exists(), "missing {name}");
        }

        let gephi = std::fs::read_to_string(dir.path().join("gephi_edges.csv"))?;
        assert_eq!(gephi, "Source,Target\nd1,d2\nd2,d3\n");
        let stats = std::fs::read_to_string(dir.path().join("stats.csv"))?;
        assert_eq!(stats.lines().count(), STATISTICS.len() + 1);
        assert!(stats.contains("diameter,2\n"));
        Ok(())
    }
}

//! Integration test: trace and graph files written by a simulation run.

use std::fs;
use std::io::BufReader;

use sme_engine::{Mode, OutputToggle, RunOptions, SimError, Simulation};
use sme_test_utils::fixtures::{Counter, PassThrough};
use sme_trace::{compare_traces, TraceReader};

fn counter_sim(options: RunOptions) -> Simulation {
    let mut sim = Simulation::new(options);
    sim.set_network("N", Mode::Local, |w| {
        let a = w.bus("a", ["value"])?;
        let b = w.bus("b", ["value"])?;
        w.process::<Counter>("counter", &[], &[a], 1)?;
        w.process::<PassThrough>("copy", &[a], &[b], ())?;
        Ok(())
    })
    .unwrap();
    sim
}

#[test]
fn default_names_land_in_the_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut sim = counter_sim(RunOptions {
        trace: OutputToggle::Default,
        graph: OutputToggle::Default,
        output_dir: Some(dir.path().to_path_buf()),
    });

    let graph = fs::read_to_string(dir.path().join("graph-N.dot")).unwrap();
    assert!(graph.starts_with("digraph \"N\" {"));
    assert!(graph.contains("p1 [label=\"copy\", shape=ellipse];"));
    assert!(graph.contains("b0 -> p1 [label=\"input\"];"));

    sim.run(4).unwrap();
    let trace = fs::read_to_string(dir.path().join("trace-N.csv")).unwrap();
    assert_eq!(trace, "N_a_value,N_b_value\nU,U\n0,U\n1,0\n0,1\n");
}

#[test]
fn trace_file_is_rewritten_after_each_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.csv");
    let mut sim = counter_sim(RunOptions {
        trace: OutputToggle::Path(path.clone()),
        ..RunOptions::default()
    });

    sim.run(2).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 3);
    sim.run(3).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 6);
}

#[test]
fn written_trace_is_a_regression_oracle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("oracle.csv");
    let mut sim = counter_sim(RunOptions {
        trace: OutputToggle::Path(path.clone()),
        ..RunOptions::default()
    });
    sim.run(8).unwrap();
    let recorded = sim.finish().unwrap().unwrap();

    let reader = TraceReader::new(BufReader::new(fs::File::open(&path).unwrap()));
    let oracle = reader.read_table().unwrap();
    assert!(compare_traces(&oracle, &recorded).is_empty());
}

#[test]
fn unwritable_trace_path_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut sim = counter_sim(RunOptions {
        trace: OutputToggle::Path(dir.path().join("missing").join("t.csv")),
        ..RunOptions::default()
    });
    assert!(matches!(sim.run(1), Err(SimError::Trace { .. })));
}

#[test]
fn no_files_without_options() {
    let dir = tempfile::tempdir().unwrap();
    let mut sim = counter_sim(RunOptions {
        output_dir: Some(dir.path().to_path_buf()),
        ..RunOptions::default()
    });
    sim.run(3).unwrap();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(sim.network().unwrap().trace().is_none());
}

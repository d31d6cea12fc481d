//! End-to-end runs of the command stream through the text and JSON presenters.

use dv_routing::session::run_session;
use dv_routing::{Error, OutputFormat, RunOutcome, SimulationConfig};

fn run_text(input: &str, config: &SimulationConfig) -> (Vec<RunOutcome>, String) {
    let mut out = Vec::new();
    let outcomes = run_session(input.as_bytes(), &mut out, config).unwrap();
    (outcomes, String::from_utf8(out).unwrap())
}

#[test]
fn test_two_routers_with_update() {
    let input = "X\nY\nSTART\nX Y 1\nUPDATE\nX Y 3\nEND\n";
    let (outcomes, text) = run_text(input, &SimulationConfig::default());

    assert_eq!(
        outcomes,
        vec![RunOutcome::Converged { rounds: 0 }, RunOutcome::Converged { rounds: 0 }]
    );
    let expected = concat!(
        "Distance Table of router X at t=0:\n",
        "     Y   \n",
        "Y    1    \n",
        "\n",
        "Distance Table of router Y at t=0:\n",
        "     X   \n",
        "X    1    \n",
        "\n",
        "Routing Table of router X:\n",
        "Y,Y,1\n",
        "\n",
        "Routing Table of router Y:\n",
        "X,X,1\n",
        "\n",
        "Distance Table of router X at t=0:\n",
        "     Y   \n",
        "Y    3    \n",
        "\n",
        "Distance Table of router Y at t=0:\n",
        "     X   \n",
        "X    3    \n",
        "\n",
        "Routing Table of router X:\n",
        "Y,Y,3\n",
        "\n",
        "Routing Table of router Y:\n",
        "X,X,3\n",
        "\n",
    );
    assert_eq!(text, expected);
}

#[test]
fn test_triangle_full_output() {
    let input = "A\nB\nC\nSTART\nA B 1\nB C 1\nA C 1\nUPDATE\nEND\n";
    let (outcomes, text) = run_text(input, &SimulationConfig::default());

    assert_eq!(outcomes, vec![RunOutcome::Converged { rounds: 1 }]);
    let expected = concat!(
        "Distance Table of router A at t=0:\n",
        "     B       C   \n",
        "B    1    INF  \n",
        "C    INF  1    \n",
        "\n",
        "Distance Table of router B at t=0:\n",
        "     A       C   \n",
        "A    1    INF  \n",
        "C    INF  1    \n",
        "\n",
        "Distance Table of router C at t=0:\n",
        "     A       B   \n",
        "A    1    INF  \n",
        "B    INF  1    \n",
        "\n",
        "Distance Table of router A at t=1:\n",
        "     B       C   \n",
        "B    1    2    \n",
        "C    2    1    \n",
        "\n",
        "Distance Table of router B at t=1:\n",
        "     A       C   \n",
        "A    1    2    \n",
        "C    2    1    \n",
        "\n",
        "Distance Table of router C at t=1:\n",
        "     A       B   \n",
        "A    1    2    \n",
        "B    2    1    \n",
        "\n",
        "Routing Table of router A:\n",
        "B,B,1\n",
        "C,C,1\n",
        "\n",
        "Routing Table of router B:\n",
        "A,A,1\n",
        "C,C,1\n",
        "\n",
        "Routing Table of router C:\n",
        "A,A,1\n",
        "B,B,1\n",
        "\n",
    );
    assert_eq!(text, expected);
}

#[test]
fn test_unreachable_router_prints_inf() {
    let input = "A\nB\nLONE\nSTART\nA B 2\nUPDATE\nEND\n";
    let (_, text) = run_text(input, &SimulationConfig::default());

    assert!(text.contains("Routing Table of router A:\nB,B,2\nLONE,INF,INF\n\n"));
    assert!(text.contains("Routing Table of router LONE:\nA,INF,INF\nB,INF,INF\n\n"));
    assert!(text.contains("Distance Table of router LONE at t=0:\n     A       B   \nA    INF  INF  \nB    INF  INF  \n\n"));
}

#[test]
fn test_partition_stops_at_round_cap() {
    let input = "A\nB\nC\nSTART\nA B 1\nB C 1\nUPDATE\nB C -1\nEND\n";
    let config = SimulationConfig {
        max_rounds: 5,
        ..Default::default()
    };
    let (outcomes, text) = run_text(input, &config);

    assert!(outcomes[0].is_converged());
    assert_eq!(outcomes[1], RunOutcome::NonConvergent { rounds: 5 });
    assert!(text.contains("Distance Table of router A at t=5:"));
    assert!(!text.contains("t=6:"));
    assert!(text.ends_with("Routing Table of router C:\nA,INF,INF\nB,INF,INF\n\n"));
}

#[test]
fn test_removal_in_initial_topology() {
    let input = "A\nB\nC\nSTART\nA B 1\nB C 1\nA B -1\nUPDATE\nEND\n";
    let (_, text) = run_text(input, &SimulationConfig::default());
    assert!(text.contains("Routing Table of router A:\nB,INF,INF\nC,INF,INF\n\n"));
    assert!(text.contains("Routing Table of router B:\nA,INF,INF\nC,C,1\n\n"));
}

#[test]
fn test_parallel_output_identical() {
    let input = "A\nB\nC\nD\nE\nSTART\nA B 3\nA C 1\nB D 1\nC D 5\nD E 2\nC E 7\nUPDATE\nA C 9\nD E -1\nEND\n";
    let (_, sequential) = run_text(input, &SimulationConfig::default());
    let parallel_config = SimulationConfig {
        parallel: true,
        ..Default::default()
    };
    let (_, parallel) = run_text(input, &parallel_config);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_json_format() {
    let input = "A\nB\nC\nSTART\nA B 1\nB C 1\nA C 1\nUPDATE\nA B 5\nEND\n";
    let config = SimulationConfig {
        format: OutputFormat::Json,
        verify: true,
        ..Default::default()
    };
    let (outcomes, text) = run_text(input, &config);
    assert_eq!(outcomes.len(), 2);

    let reports: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["outcome"]["status"], "converged");

    let a_to_b = &reports[1]["routing_tables"]["A"][0];
    assert_eq!(a_to_b["destination"], "B");
    assert_eq!(a_to_b["next_hop"], "C");
    assert_eq!(a_to_b["cost"], 2);
}

#[test]
fn test_malformed_line_reports_line_number() {
    let input = "A\nB\nSTART\nA B\nUPDATE\nEND\n";
    let err = run_session(input.as_bytes(), Vec::new(), &SimulationConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Malformed { line: 4, .. }));
}

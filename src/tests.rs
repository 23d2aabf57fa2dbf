use super::*;

#[test]
fn program_outputs() {
    let mut session = Session::default();
    let outputs = session
        .run_program(
            "
            merge (1,2), (1,3), (4,3), (5,4)
            merge 1 2        ; redundant
            find 5
            depth 1
            lca 1 5
            explain 5 2
            sets
            ",
        )
        .unwrap();
    let lines: Vec<String> = outputs.iter().map(|o| o.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "merge (1,2): 1 -> 2",
            "merge (1,3): 2 -> 3",
            "merge (4,3): 4 -> 3",
            "merge (5,4): 5 -> 3",
            "merge (1,2): redundant",
            "find 5 = 3",
            "depth 1 = 2",
            "lca 1 5 = 3",
            "explain 5 2: (5,4) (4,3) (3,1) (1,2)",
            "sets: {1 2 3 4 5}",
        ]
    );
}

#[test]
fn strategy_resets_the_forest() {
    let mut session = Session::default();
    session
        .run_program("merge 1 2\nstrategy path-reversal\ncheck-distinct 1 2")
        .unwrap();
    assert_eq!(session.forest().strategy(), MergeStrategy::PathReversal);
    assert!(session.forest().merge_log().is_empty());
}

#[test]
fn checks_and_expected_failures() {
    let mut session = Session::default();
    session
        .run_program(
            "
            merge 1 2
            merge 2 3
            check-same 1 3
            check-depth 1 2
            check-explain 3 1 (3,2) (2,1)
            fail explain 1 4
            fail check-distinct 1 3
            ",
        )
        .unwrap();

    let err = session.run_program("merge 5 6\n\ncheck-same 1 5").unwrap_err();
    assert!(matches!(
        err,
        Error::Script { line: 3, ref source } if matches!(**source, Error::CheckFailed(_))
    ));

    let err = session.run_program("fail find 1").unwrap_err();
    assert!(matches!(
        err,
        Error::Script { line: 1, ref source } if matches!(**source, Error::ExpectFail)
    ));
}

#[test]
fn precondition_error_is_distinguishable() {
    let mut session = Session::default();
    let err = session.run_program("merge 1 2\nexplain 1 3").unwrap_err();
    let Error::Script { line, source } = err else {
        panic!("expected a script error");
    };
    assert_eq!(line, 2);
    assert!(matches!(*source, Error::NotConnected { a: 1, b: 3 }));
    assert_eq!(source.to_string(), "1 and 3 are not in the same set");
}

macro_rules! test_for {
    ($test_name_: ident, $method_: expr, $pivot_rule_: expr, $time_out_secs_: expr, $expected_status_: expr) => {
        #[test]
        fn $test_name_() {
            use std::time::Duration;
            let mut handle = procspawn::spawn((), |_| {
                let _ = env_logger::builder().is_test(true).try_init();

                let options = Options {
                    pivot_rule: $pivot_rule_,
                    ..Options::default()
                };
                let solution = cycling_problem().solve_with($method_, &options).unwrap();
                assert_eq!($expected_status_, solution.status());
                if solution.status() == Status::Optimal {
                    assert_abs_diff_eq!(solution.objective_value(), 1.0, epsilon = 1e-9);
                    assert_abs_diff_eq!(solution.value("x1").unwrap(), 1.0, epsilon = 1e-9);
                    assert_abs_diff_eq!(solution.value("x3").unwrap(), 1.0, epsilon = 1e-9);
                }
                println!(
                    "{}: {} after {} iterations",
                    $method_,
                    solution.status(),
                    solution.iterations()
                );
            });

            match handle.join_timeout(Duration::from_secs($time_out_secs_)) {
                Ok(_result) => assert_eq!(1, 1),
                Err(e) => panic!("{}", e),
            }
        }
    };
}

#[cfg(test)]
mod degenerate_test {
    use approx::assert_abs_diff_eq;

    use tabula::{
        problem::{ComparisonOp, OptimizationDirection, Problem},
        solver::{Method, Options, PivotRule, Status},
    };

    procspawn::enable_test_support!();

    const TIMEOUT_SECS: u64 = 60;

    /// Every basis visited by the largest-coefficient rule is degenerate and it returns to
    /// the starting basis after six pivots.
    fn cycling_problem() -> Problem {
        Problem::from_dense(
            OptimizationDirection::Maximize,
            &["x1", "x2", "x3", "x4"],
            &[10.0, -57.0, -9.0, -24.0],
            &[
                vec![0.5, -5.5, -2.5, 9.0],
                vec![0.5, -1.5, -0.5, 1.0],
                vec![1.0, 0.0, 0.0, 0.0],
            ],
            &[0.0, 0.0, 1.0],
            &[ComparisonOp::Le, ComparisonOp::Le, ComparisonOp::Le],
        )
        .unwrap()
    }

    test_for!(
        primal_bland,
        Method::PrimalSimplex,
        PivotRule::Bland,
        TIMEOUT_SECS,
        Status::Optimal
    );
    test_for!(
        big_m_bland,
        Method::BigM,
        PivotRule::Bland,
        TIMEOUT_SECS,
        Status::Optimal
    );
    test_for!(
        primal_dantzig_hits_iteration_cap,
        Method::PrimalSimplex,
        PivotRule::Dantzig,
        TIMEOUT_SECS,
        Status::IterationLimit
    );
}

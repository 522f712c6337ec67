use super::*;
use crate::config::SolverConfig;
use crate::cube::{FaceId, Move, ScanOrchestrator};
use crate::error::SolverError;
use crate::test_support::one_r_turn_faces;

fn one_r_turn_cube() -> String {
    let mut scan = ScanOrchestrator::new();
    for face in one_r_turn_faces() {
        scan.observe(&face);
    }
    scan.to_cube_string().unwrap()
}

const SOLVED: &str = "yyyyyyyyybbbbbbbbbrrrrrrrrrgggggggggooooooooowwwwwwwww";

#[test]
fn test_validate_accepts_scanned_cube() {
    assert!(SolverGateway::validate(SOLVED).is_ok());
    assert!(SolverGateway::validate(&one_r_turn_cube()).is_ok());
}

#[test]
fn test_validate_rejects_bad_strings() {
    let cases = [
        SOLVED[..53].to_string(),
        SOLVED.replacen('y', "x", 1),
        SOLVED.replacen('y', "Y", 1),
        // Swap the Up and Left centers
        {
            let mut c: Vec<char> = SOLVED.chars().collect();
            c.swap(4, 13);
            c.into_iter().collect()
        },
        // Ten reds and eight greens
        SOLVED.replacen('g', "r", 1),
    ];

    for cube in cases.iter() {
        match SolverGateway::validate(cube) {
            Err(SolverError::InvalidCubeString { .. }) => {}
            other => panic!("Expected invalid cube for {}, got {:?}", cube, other),
        }
    }
}

#[test]
fn test_faces_notation_reorders_and_relabels() {
    let encoded = CubeNotation::Faces.encode(SOLVED).unwrap();
    assert_eq!(
        encoded,
        "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB"
    );
    assert_eq!(CubeNotation::Colors.encode(SOLVED).unwrap(), SOLVED);
}

#[tokio::test]
async fn test_gateway_expands_double_moves() {
    let gateway = SolverGateway::new(Box::new(FixedSolver::from_sequence("R2 U'")));
    let moves = gateway.solve(SOLVED).await.unwrap();
    assert_eq!(
        moves,
        vec![
            Move::new(FaceId::Right, false),
            Move::new(FaceId::Right, false),
            Move::new(FaceId::Up, true),
        ]
    );
}

#[tokio::test]
async fn test_gateway_rejects_invalid_cube_before_solving() {
    let gateway = SolverGateway::new(Box::new(FixedSolver::from_sequence("R")));
    assert!(matches!(
        gateway.solve("yyy").await,
        Err(SolverError::InvalidCubeString { .. })
    ));
}

#[tokio::test]
async fn test_gateway_rejects_unknown_tokens() {
    let gateway = SolverGateway::new(Box::new(FixedSolver::from_sequence("R M")));
    assert_eq!(
        gateway.solve(SOLVED).await,
        Err(SolverError::UnknownMove {
            token: "M".to_string()
        })
    );
}

#[test]
fn test_gateway_from_config() {
    let mut config = SolverConfig::default();
    assert!(matches!(
        SolverGateway::from_config(&config),
        Err(SolverError::NotConfigured { .. })
    ));

    config.command = Some("kociemba".to_string());
    assert_eq!(
        SolverGateway::from_config(&config).unwrap().solver_name(),
        "kociemba"
    );

    config.moves = Some(vec!["R'".to_string()]);
    assert_eq!(
        SolverGateway::from_config(&config).unwrap().solver_name(),
        "fixed"
    );
}

#[test]
fn test_parse_tokens_from_common_outputs() {
    assert_eq!(
        process::parse_tokens("R U' F2\n"),
        vec!["R", "U'", "F2"]
    );
    assert_eq!(
        process::parse_tokens("['R', \"U'\", 'F2']"),
        vec!["R", "U'", "F2"]
    );
    assert!(process::parse_tokens("\n").is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_solver_reads_stdout() {
    let solver = ProcessSolver::new(
        "sh",
        vec![
            "-c".to_string(),
            r#"echo "['R2', \"U'\"]""#.to_string(),
            "solver".to_string(),
        ],
    );
    let tokens = solver.solve(SOLVED).await.unwrap();
    assert_eq!(tokens, vec!["R2", "U'"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_solver_failure_is_unsolvable() {
    let solver = ProcessSolver::new(
        "sh",
        vec![
            "-c".to_string(),
            "echo 'no solution' >&2; exit 1".to_string(),
            "solver".to_string(),
        ],
    );
    match solver.solve(SOLVED).await {
        Err(SolverError::Unsolvable { details }) => assert!(details.contains("no solution")),
        other => panic!("Expected unsolvable, got {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_solver_timeout() {
    let solver = ProcessSolver::new(
        "sh",
        vec!["-c".to_string(), "sleep 5".to_string(), "solver".to_string()],
    )
    .with_timeout(std::time::Duration::from_millis(200));
    let err = solver.solve(SOLVED).await.unwrap_err();
    assert_eq!(err, SolverError::Timeout { millis: 200 });
    assert!(err.to_string().contains("200 ms"), "{}", err);
}

#[tokio::test]
async fn test_process_solver_missing_binary() {
    let solver = ProcessSolver::new("/nonexistent/cube-solver", Vec::new());
    assert!(matches!(
        solver.solve(SOLVED).await,
        Err(SolverError::Launch { .. })
    ));
}

//! Checks that the live service honours the `{ files: string[] }` contract.

use askrepo::core::collected::CollectedContent;
use askrepo::io::config::AskConfig;
use askrepo::io::project_index::scan_project;
use askrepo::io::service::HttpReasoningService;
use askrepo::select::{PlannerConfig, SelectionPlanner};
use askrepo::test_support::TestProject;

#[test]
#[ignore = "requires XAI_API_KEY and network access"]
fn live_service_returns_valid_selection() {
    let config = AskConfig::default();
    let project = TestProject::with_files(&[
        ("app/auth.py", "def login(user, password):\n    return check(user, password)\n"),
        ("app/db.py", "def check(user, password):\n    return True\n"),
        ("app/ui.js", "export const render = () => null;\n"),
    ])
    .expect("project");

    let known = scan_project(project.path(), &config.index.extensions).expect("scan");
    let service = HttpReasoningService::from_config(&config.service).expect("client");
    let planner = SelectionPlanner::new(PlannerConfig::from(&config.session)).expect("planner");

    let outcome = planner
        .plan(&service, "How is a login checked?", &known, &CollectedContent::new())
        .expect("plan");

    for file in outcome.files() {
        assert!(known.contains(file), "unexpected file {file}");
    }
    assert!(outcome.files().len() <= 10);
}

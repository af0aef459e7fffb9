use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./fixtures/assignment.cact";
const EXPECTED: Expected = Expected {
    stdout: "39\n42\n",
    stderr: "",
};

#[test]
fn run_assignment() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}

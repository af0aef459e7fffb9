use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./fixtures/events.cact";
const EXPECTED: Expected = Expected {
    stdout: "[EVENT] Transfer: ['a', 'b', 5]\n",
    stderr: "",
};

#[test]
fn run_events() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}

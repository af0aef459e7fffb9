use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./fixtures/print.cact";
const EXPECTED: Expected = Expected {
    stdout: "literal 42 true [1, 2]\n",
    stderr: "",
};

#[test]
fn run_print() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}

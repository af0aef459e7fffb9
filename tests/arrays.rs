use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./fixtures/arrays.cact";
const EXPECTED: Expected = Expected {
    stdout: "[1, 2, 3, 4]\n1\n4\n4\n10\n",
    stderr: "",
};

#[test]
fn run_arrays() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}

use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./fixtures/boolean.cact";
const EXPECTED: Expected = Expected {
    stdout: "false\ntrue\ntrue\ndefault\nset\n",
    stderr: "",
};

#[test]
fn run_boolean() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}
